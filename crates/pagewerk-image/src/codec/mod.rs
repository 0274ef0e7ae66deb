// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec module — decode fetched page bytes, encode restored pages as JPEG.

pub mod processor;

pub use processor::ImageProcessor;
