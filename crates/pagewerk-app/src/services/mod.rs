// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: data directory, settings, and the commands that drive a
// restore session from the command line.

pub mod commands;
pub mod data_dir;
pub mod settings;
