// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode fetched page bytes into pixels and encode restored
// pixels back to JPEG. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, RgbImage};
use pagewerk_core::error::PagewerkError;
use tracing::{debug, instrument};

/// Codec wrapper around a single in-memory page image.
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&fetched)?
///     .to_jpeg_bytes(95)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PagewerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            PagewerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an RGB buffer (the descrambler's output type).
    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return 8-bit RGB pixels.
    ///
    /// Alpha is dropped; JPEG pages never carry it.
    pub fn into_rgb8(self) -> RgbImage {
        match self.image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, PagewerkError> {
        let mut buffer = Vec::new();
        let quality = quality.clamp(1, 100);
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        match &self.image {
            DynamicImage::ImageRgb8(rgb) => rgb.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        }
        .map_err(|err| PagewerkError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}
