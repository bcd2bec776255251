//! Decoded pixel data resolved from an image reference

use crate::error::ConversionError;
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Raw interleaved samples, one byte per channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,

    /// Channels per pixel, alpha included
    pub channels: u8,

    /// Whether the last channel is alpha
    pub alpha: bool,

    pub samples: Vec<u8>,
}

impl RawImage {
    /// Colour channels, alpha excluded
    pub fn colorants(&self) -> u8 {
        self.channels.saturating_sub(u8::from(self.alpha))
    }

    /// CMYK-like data has to go through RGB before it can be stored as PNG
    pub fn needs_rgb_conversion(&self) -> bool {
        self.colorants() > 3
    }

    /// Number of samples for `channels` per pixel, `None` on overflow
    fn sample_count(&self, channels: usize) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(channels)
    }

    fn checked_sample_count(&self, channels: usize) -> Result<usize, ConversionError> {
        self.sample_count(channels).ok_or_else(|| {
            ConversionError::ImageEncoding(format!(
                "{}x{}x{} pixmap is too large",
                self.width, self.height, channels
            ))
        })
    }

    /// Convert four-colorant (CMYK) samples to RGB, keeping alpha
    pub fn to_rgb(&self) -> Result<RawImage, ConversionError> {
        if self.colorants() != 4 {
            return Err(ConversionError::ImageEncoding(format!(
                "cannot convert {} colorants to RGB",
                self.colorants()
            )));
        }
        let stride = self.channels as usize;
        let out_channels = if self.alpha { 4 } else { 3 };
        let expected = self.checked_sample_count(stride)?;
        if self.samples.len() < expected {
            return Err(ConversionError::ImageEncoding(format!(
                "expected {} CMYK samples, got {}",
                expected,
                self.samples.len()
            )));
        }
        let mut samples = Vec::with_capacity(self.checked_sample_count(out_channels)?);

        for px in self.samples[..expected].chunks_exact(stride) {
            let k = 255 - u16::from(px[3]);
            for &c in &px[..3] {
                samples.push(((255 - u16::from(c)) * k / 255) as u8);
            }
            if self.alpha {
                samples.push(px[4]);
            }
        }

        Ok(RawImage {
            width: self.width,
            height: self.height,
            channels: out_channels as u8,
            alpha: self.alpha,
            samples,
        })
    }

    /// Serialize as PNG, converting CMYK-like data to RGB first
    pub fn to_png(&self) -> Result<Vec<u8>, ConversionError> {
        if self.needs_rgb_conversion() {
            return self.to_rgb()?.to_png();
        }

        let expected = self.checked_sample_count(self.channels as usize)?;
        if self.samples.len() < expected {
            return Err(ConversionError::ImageEncoding(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.channels,
                self.samples.len()
            )));
        }
        let samples = self.samples[..expected].to_vec();
        let (w, h) = (self.width, self.height);

        let dynamic = match (self.colorants(), self.alpha) {
            (1, false) => GrayImage::from_raw(w, h, samples).map(DynamicImage::ImageLuma8),
            (1, true) => GrayAlphaImage::from_raw(w, h, samples).map(DynamicImage::ImageLumaA8),
            (3, false) => RgbImage::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
            (3, true) => RgbaImage::from_raw(w, h, samples).map(DynamicImage::ImageRgba8),
            (n, _) => {
                return Err(ConversionError::ImageEncoding(format!(
                    "unsupported colour layout with {} colorants",
                    n
                )))
            }
        }
        .ok_or_else(|| ConversionError::ImageEncoding("pixel buffer too small".to_string()))?;

        let mut out = Cursor::new(Vec::new());
        dynamic
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| ConversionError::ImageEncoding(e.to_string()))?;
        Ok(out.into_inner())
    }
}
