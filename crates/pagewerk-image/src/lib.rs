// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-image — Pixel work for the Pagewerk restore pipeline.
//
// Provides the resolution profile table, the validated tile permutation, the
// descrambler that reassembles a scrambled page, and the JPEG codec wrapper.

pub mod codec;
pub mod scramble;

// Re-export the primary structs so callers can use `pagewerk_image::TileDescrambler` etc.
pub use codec::processor::ImageProcessor;
pub use scramble::descramble::{RestoredPage, TileDescrambler};
pub use scramble::permutation::TilePermutation;
pub use scramble::profile::{ProfileResolver, ResolutionProfile};
