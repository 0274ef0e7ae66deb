// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolution profiles — where the scrambled rectangle sits for a given page size.
//
// The host serves a handful of page widths; each one has its own scrambled
// rectangle. Unknown sizes fall back to the default rectangle rather than
// failing, because slight size variants are common.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Axis-aligned rectangle of the page that holds the scrambled tile grid.
///
/// Everything outside it is left untouched by the scramble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionProfile {
    pub tile_rect_width: u32,
    pub tile_rect_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ResolutionProfile {
    /// Rectangle anchored at the image origin.
    pub const fn at_origin(tile_rect_width: u32, tile_rect_height: u32) -> Self {
        Self {
            tile_rect_width,
            tile_rect_height,
            offset_x: 0,
            offset_y: 0,
        }
    }

    /// Smallest source width this profile can be applied to.
    pub fn required_width(&self) -> u32 {
        self.offset_x.saturating_add(self.tile_rect_width)
    }

    /// Smallest source height this profile can be applied to.
    pub fn required_height(&self) -> u32 {
        self.offset_y.saturating_add(self.tile_rect_height)
    }
}

/// Profile used when the page size has no exact entry.
pub const DEFAULT_PROFILE: ResolutionProfile = ResolutionProfile::at_origin(736, 1184);

/// Known page sizes `(width, height)` and their scrambled rectangles.
const KNOWN_PROFILES: [((u32, u32), ResolutionProfile); 3] = [
    ((764, 1200), ResolutionProfile::at_origin(736, 1184)),
    ((822, 1200), ResolutionProfile::at_origin(800, 1184)),
    ((844, 1200), ResolutionProfile::at_origin(832, 1184)),
];

/// Maps decoded page dimensions to a [`ResolutionProfile`].
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    entries: Vec<((u32, u32), ResolutionProfile)>,
    fallback: ResolutionProfile,
}

impl Default for ProfileResolver {
    fn default() -> Self {
        Self {
            entries: KNOWN_PROFILES.to_vec(),
            fallback: DEFAULT_PROFILE,
        }
    }
}

impl ProfileResolver {
    /// Resolver with a custom table, for hosts with other page sizes.
    pub fn new(
        entries: Vec<((u32, u32), ResolutionProfile)>,
        fallback: ResolutionProfile,
    ) -> Self {
        Self { entries, fallback }
    }

    /// Exact `(width, height)` lookup; the fallback profile otherwise. Never fails.
    pub fn resolve(&self, width: u32, height: u32) -> ResolutionProfile {
        match self
            .entries
            .iter()
            .find(|(size, _)| *size == (width, height))
        {
            Some((_, profile)) => *profile,
            None => {
                debug!(width, height, "no exact profile, using fallback");
                self.fallback
            }
        }
    }
}
