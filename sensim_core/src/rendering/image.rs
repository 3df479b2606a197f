use crate::error::{SensimError, SensimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pixel layout of a rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    #[serde(rename = "L_INT8")]
    L8,
    #[serde(rename = "RGB_INT8")]
    Rgb8,
    #[serde(rename = "RGBA_INT8")]
    Rgba8,
    #[serde(rename = "BGR_INT8")]
    Bgr8,
    #[serde(rename = "R_FLOAT32")]
    R32F,
    #[serde(rename = "RGB_FLOAT32")]
    Rgb32F,
}

impl PixelFormat {
    /// Samples per pixel
    pub fn channel_count(self) -> usize {
        match self {
            PixelFormat::L8 | PixelFormat::R32F => 1,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 | PixelFormat::Rgb32F => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, PixelFormat::R32F | PixelFormat::Rgb32F)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PixelFormat::L8 => "L_INT8",
            PixelFormat::Rgb8 => "RGB_INT8",
            PixelFormat::Rgba8 => "RGBA_INT8",
            PixelFormat::Bgr8 => "BGR_INT8",
            PixelFormat::R32F => "R_FLOAT32",
            PixelFormat::Rgb32F => "RGB_FLOAT32",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixelFormat {
    type Err = SensimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L_INT8" | "L8" => Ok(PixelFormat::L8),
            "RGB_INT8" | "RGB8" => Ok(PixelFormat::Rgb8),
            "RGBA_INT8" | "RGBA8" => Ok(PixelFormat::Rgba8),
            "BGR_INT8" | "BGR8" => Ok(PixelFormat::Bgr8),
            "R_FLOAT32" => Ok(PixelFormat::R32F),
            "RGB_FLOAT32" => Ok(PixelFormat::Rgb32F),
            other => Err(SensimError::config(format!("unknown pixel format '{}'", other))),
        }
    }
}

/// Sample storage, matching [`PixelFormat::is_float`]
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl ImageData {
    pub fn len(&self) -> usize {
        match self {
            ImageData::U8(data) => data.len(),
            ImageData::F32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row-major, interleaved image produced by a render target
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: ImageData,
}

impl Image {
    /// Zero-filled image
    ///
    /// Fails when the sample count does not fit in memory addressing.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> SensimResult<Self> {
        let samples = Self::expected_samples(width, height, format)?;
        let data = if format.is_float() {
            ImageData::F32(vec![0.0; samples])
        } else {
            ImageData::U8(vec![0; samples])
        };
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Wrap 8-bit samples
    pub fn from_u8(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> SensimResult<Self> {
        Self::from_data(width, height, format, ImageData::U8(data))
    }

    /// Wrap 32-bit float samples
    pub fn from_f32(width: u32, height: u32, format: PixelFormat, data: Vec<f32>) -> SensimResult<Self> {
        Self::from_data(width, height, format, ImageData::F32(data))
    }

    fn from_data(width: u32, height: u32, format: PixelFormat, data: ImageData) -> SensimResult<Self> {
        let float_data = matches!(data, ImageData::F32(_));
        if float_data != format.is_float() {
            return Err(SensimError::config(format!(
                "sample type does not match pixel format {}",
                format
            )));
        }

        let expected = Self::expected_samples(width, height, format)?;
        if data.len() != expected {
            return Err(SensimError::config(format!(
                "{}x{} {} image needs {} samples, got {}",
                width,
                height,
                format,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    fn expected_samples(width: u32, height: u32, format: PixelFormat) -> SensimResult<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.channel_count()))
            .ok_or_else(|| {
                SensimError::config(format!(
                    "{}x{} {} image exceeds the addressable sample count",
                    width, height, format
                ))
            })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channel_count(&self) -> usize {
        self.format.channel_count()
    }

    /// Total number of pixel-channel samples
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &ImageData {
        &self.data
    }

    /// Mutable access to samples; the buffer length is fixed
    pub fn data_mut(&mut self) -> &mut ImageData {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_sizes() {
        let rgb = Image::new(4, 3, PixelFormat::Rgb8).unwrap();
        assert_eq!(rgb.sample_count(), 36);
        assert!(matches!(rgb.data(), ImageData::U8(_)));

        let depth = Image::new(4, 3, PixelFormat::R32F).unwrap();
        assert_eq!(depth.sample_count(), 12);
        assert!(matches!(depth.data(), ImageData::F32(_)));
    }

    #[test]
    fn test_from_u8_validates_length() {
        assert!(Image::from_u8(2, 2, PixelFormat::L8, vec![0; 4]).is_ok());
        assert!(Image::from_u8(2, 2, PixelFormat::Rgb8, vec![0; 4]).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert!(matches!(
            Image::from_u8(u32::MAX, u32::MAX, PixelFormat::Rgba8, Vec::new()),
            Err(SensimError::Config(_))
        ));
        assert!(matches!(
            Image::from_f32(u32::MAX, u32::MAX, PixelFormat::Rgb32F, Vec::new()),
            Err(SensimError::Config(_))
        ));
    }

    #[test]
    fn test_sample_type_must_match_format() {
        assert!(Image::from_f32(1, 1, PixelFormat::L8, vec![0.0]).is_err());
        assert!(Image::from_u8(1, 1, PixelFormat::R32F, vec![0]).is_err());
    }

    #[test]
    fn test_pixel_format_names_round_trip() {
        for format in [
            PixelFormat::L8,
            PixelFormat::Rgb8,
            PixelFormat::Rgba8,
            PixelFormat::Bgr8,
            PixelFormat::R32F,
            PixelFormat::Rgb32F,
        ] {
            assert_eq!(format.as_str().parse::<PixelFormat>().unwrap(), format);
        }
        assert!("YUV".parse::<PixelFormat>().is_err());
    }
}
