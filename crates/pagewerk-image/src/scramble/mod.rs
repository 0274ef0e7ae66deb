// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scramble module — resolution profiles, the tile permutation, and the
// descrambler that applies them.

pub mod descramble;
pub mod permutation;
pub mod profile;

pub use descramble::{ChunkSize, RestoredPage, TileDescrambler};
pub use permutation::{GRID_COLS, GRID_ROWS, TilePermutation};
pub use profile::{DEFAULT_PROFILE, ProfileResolver, ResolutionProfile};
