// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tile descrambler — puts the chunks of a scrambled page back in place.
//
// The page is split into a scrambled rectangle (see `profile`) and untouched
// margins. The rectangle is cut into a fixed grid of equal chunks which the
// publisher shuffled with a self-inverse permutation. Chunks are always read
// from the source buffer and written into a separate output buffer, so no
// chunk is overwritten before it has been copied.

use image::{RgbImage, imageops};
use tracing::{debug, info, instrument};

use pagewerk_core::error::{PagewerkError, Result};

use super::permutation::TilePermutation;
use super::profile::{ProfileResolver, ResolutionProfile};
use crate::codec::ImageProcessor;

/// Pixel size of one grid chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize {
    pub width: u32,
    pub height: u32,
}

/// A restored page, encoded and ready for export.
#[derive(Debug, Clone)]
pub struct RestoredPage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub profile: ResolutionProfile,
}

/// Stateless descrambler: permutation plus profile table.
#[derive(Debug, Clone)]
pub struct TileDescrambler {
    permutation: TilePermutation,
    resolver: ProfileResolver,
}

impl TileDescrambler {
    /// Descrambler for the publisher's 4x4 scheme and known page sizes.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(
            TilePermutation::standard()?,
            ProfileResolver::default(),
        ))
    }

    pub fn new(permutation: TilePermutation, resolver: ProfileResolver) -> Self {
        Self {
            permutation,
            resolver,
        }
    }

    pub fn permutation(&self) -> &TilePermutation {
        &self.permutation
    }

    pub fn resolver(&self) -> &ProfileResolver {
        &self.resolver
    }

    /// Profile for a decoded page of `width x height`.
    pub fn profile_for(&self, width: u32, height: u32) -> ResolutionProfile {
        self.resolver.resolve(width, height)
    }

    /// Validate `profile` against a `width x height` source and return the
    /// chunk size.
    ///
    /// The source must contain the whole rectangle, and the rectangle must
    /// split evenly into the grid.
    pub fn chunk_size(
        &self,
        width: u32,
        height: u32,
        profile: &ResolutionProfile,
    ) -> Result<ChunkSize> {
        if width < profile.required_width() || height < profile.required_height() {
            return Err(PagewerkError::SourceTooSmall {
                width,
                height,
                required_width: profile.required_width(),
                required_height: profile.required_height(),
            });
        }

        let (rows, cols) = (self.permutation.rows(), self.permutation.cols());
        if profile.tile_rect_width % cols != 0 || profile.tile_rect_height % rows != 0 {
            return Err(PagewerkError::NonIntegerTileSize {
                rect_width: profile.tile_rect_width,
                rect_height: profile.tile_rect_height,
                rows,
                cols,
            });
        }

        Ok(ChunkSize {
            width: profile.tile_rect_width / cols,
            height: profile.tile_rect_height / rows,
        })
    }

    /// Rebuild `source` with every chunk moved to its restored cell.
    ///
    /// Pixels outside the rectangle are copied through unchanged. The input is
    /// never mutated.
    #[instrument(skip(self, source), fields(width = source.width(), height = source.height()))]
    pub fn descramble(&self, source: &RgbImage, profile: &ResolutionProfile) -> Result<RgbImage> {
        let chunk = self.chunk_size(source.width(), source.height(), profile)?;

        // Margins come along with the clone; the rectangle is overwritten below.
        let mut output = source.clone();

        for ((row, col), (target_row, target_col)) in self.permutation.cells() {
            let src_x = profile.offset_x + (col - 1) * chunk.width;
            let src_y = profile.offset_y + (row - 1) * chunk.height;
            let dst_x = profile.offset_x + (target_col - 1) * chunk.width;
            let dst_y = profile.offset_y + (target_row - 1) * chunk.height;

            let block = imageops::crop_imm(source, src_x, src_y, chunk.width, chunk.height).to_image();
            imageops::replace(&mut output, &block, i64::from(dst_x), i64::from(dst_y));
        }

        debug!(
            chunk_width = chunk.width,
            chunk_height = chunk.height,
            "chunks reassembled"
        );
        Ok(output)
    }

    /// Decode a fetched page, descramble it, and encode it as JPEG.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn restore_bytes(&self, data: &[u8], jpeg_quality: u8) -> Result<RestoredPage> {
        let decoded = ImageProcessor::from_bytes(data)?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(PagewerkError::ImageLoad("source image has zero size".into()));
        }

        let profile = self.profile_for(width, height);
        let restored = self.descramble(&decoded.into_rgb8(), &profile)?;
        let bytes = ImageProcessor::from_rgb(restored).to_jpeg_bytes(jpeg_quality)?;

        info!(width, height, bytes = bytes.len(), "page restored");
        Ok(RestoredPage {
            bytes,
            width,
            height,
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Image where every chunk of the rectangle has its own flat colour and the
    /// margins are grey.
    fn cell_coloured(width: u32, height: u32, profile: &ResolutionProfile) -> RgbImage {
        let cw = profile.tile_rect_width / 4;
        let ch = profile.tile_rect_height / 4;
        RgbImage::from_fn(width, height, |x, y| {
            let inside = x >= profile.offset_x
                && y >= profile.offset_y
                && x < profile.required_width()
                && y < profile.required_height();
            if !inside {
                return Rgb([128, 128, 128]);
            }
            let col = (x - profile.offset_x) / cw;
            let row = (y - profile.offset_y) / ch;
            Rgb([(row * 60) as u8, (col * 60) as u8, 7])
        })
    }

    fn colour_of_cell(img: &RgbImage, profile: &ResolutionProfile, row: u32, col: u32) -> Rgb<u8> {
        let cw = profile.tile_rect_width / 4;
        let ch = profile.tile_rect_height / 4;
        *img.get_pixel(
            profile.offset_x + (col - 1) * cw + cw / 2,
            profile.offset_y + (row - 1) * ch + ch / 2,
        )
    }

    #[test]
    fn standard_profile_chunk_size() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile::at_origin(736, 1184);
        let chunk = d.chunk_size(764, 1200, &profile).expect("valid geometry");
        assert_eq!(chunk, ChunkSize { width: 184, height: 296 });
    }

    #[test]
    fn indivisible_width_is_rejected() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile::at_origin(735, 1184);
        let err = d.chunk_size(764, 1200, &profile).unwrap_err();
        assert!(matches!(err, PagewerkError::NonIntegerTileSize { rect_width: 735, .. }));
    }

    #[test]
    fn small_source_is_rejected() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile::at_origin(736, 1184);
        let err = d.chunk_size(700, 1200, &profile).unwrap_err();
        assert!(matches!(
            err,
            PagewerkError::SourceTooSmall { width: 700, height: 1200, .. }
        ));
    }

    #[test]
    fn offset_counts_toward_required_size() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile {
            tile_rect_width: 16,
            tile_rect_height: 16,
            offset_x: 4,
            offset_y: 0,
        };
        assert!(d.chunk_size(19, 16, &profile).is_err());
        assert!(d.chunk_size(20, 16, &profile).is_ok());
    }

    #[test]
    fn chunks_move_to_transposed_cells() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile::at_origin(32, 48);
        let source = cell_coloured(40, 52, &profile);
        let restored = d.descramble(&source, &profile).expect("descramble");

        for row in 1..=4 {
            for col in 1..=4 {
                assert_eq!(
                    colour_of_cell(&restored, &profile, col, row),
                    colour_of_cell(&source, &profile, row, col),
                    "chunk ({row},{col})"
                );
            }
        }
    }

    #[test]
    fn margins_are_copied_through() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile::at_origin(32, 48);
        let source = cell_coloured(40, 52, &profile);
        let restored = d.descramble(&source, &profile).expect("descramble");

        for y in 0..52 {
            for x in 32..40 {
                assert_eq!(restored.get_pixel(x, y), source.get_pixel(x, y));
            }
        }
        for y in 48..52 {
            for x in 0..32 {
                assert_eq!(restored.get_pixel(x, y), source.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn descrambling_twice_restores_scrambled_layout() {
        let d = TileDescrambler::standard().expect("descrambler");
        for profile in [
            ResolutionProfile::at_origin(32, 48),
            ResolutionProfile {
                tile_rect_width: 24,
                tile_rect_height: 24,
                offset_x: 3,
                offset_y: 5,
            },
        ] {
            let width = profile.required_width() + 6;
            let height = profile.required_height() + 2;
            let source = RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x * 7 % 251) as u8, (y * 13 % 251) as u8, ((x + y) % 256) as u8])
            });
            let once = d.descramble(&source, &profile).expect("first pass");
            let twice = d.descramble(&once, &profile).expect("second pass");
            assert_eq!(twice, source);
            assert_ne!(once, source);
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let d = TileDescrambler::standard().expect("descrambler");
        let profile = ResolutionProfile::at_origin(32, 48);
        let source = cell_coloured(32, 48, &profile);
        let copy = source.clone();
        let _ = d.descramble(&source, &profile).expect("descramble");
        assert_eq!(source, copy);
    }

    #[test]
    fn restore_bytes_produces_jpeg_of_same_size() {
        let d = TileDescrambler::standard().expect("descrambler");
        let source = RgbImage::from_pixel(764, 1200, Rgb([30, 60, 90]));
        let png = {
            let mut buf = std::io::Cursor::new(Vec::new());
            source
                .write_to(&mut buf, image::ImageFormat::Png)
                .expect("encode png");
            buf.into_inner()
        };

        let page = d.restore_bytes(&png, 95).expect("restore");
        assert_eq!((page.width, page.height), (764, 1200));
        assert_eq!(page.profile.tile_rect_width, 736);
        assert_eq!(&page.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn restore_bytes_rejects_small_page() {
        let d = TileDescrambler::standard().expect("descrambler");
        let source = RgbImage::from_pixel(700, 1200, Rgb([0, 0, 0]));
        let png = {
            let mut buf = std::io::Cursor::new(Vec::new());
            source
                .write_to(&mut buf, image::ImageFormat::Png)
                .expect("encode png");
            buf.into_inner()
        };
        assert!(matches!(
            d.restore_bytes(&png, 95),
            Err(PagewerkError::SourceTooSmall { .. })
        ));
    }
}
