use image::{DynamicImage, GrayImage, Luma};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load page image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed page: {0}")]
    Encode(String),
}

/// Size bounds applied to a page before OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScale {
    /// Pages whose longer edge is below this are upscaled (3x at most).
    pub min_edge: u32,
    /// Pages whose longer edge is above this are downscaled to fit.
    pub max_edge: u32,
}

impl Default for PageScale {
    fn default() -> Self {
        // A letter/A4 page rendered at ~3x (216 DPI) has a long edge of ~2500 px.
        Self { min_edge: 1600, max_edge: 3600 }
    }
}

/// Decode a page image and return normalized PNG bytes.
pub fn prepare_page_bytes(data: &[u8], scale: PageScale) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(normalize(img, scale))
}

fn rescale(img: DynamicImage, scale: PageScale) -> DynamicImage {
    use image::imageops::FilterType;

    let long_edge = img.width().max(img.height());
    if long_edge == 0 {
        return img;
    }
    if long_edge > scale.max_edge {
        return img.resize(scale.max_edge, scale.max_edge, FilterType::Lanczos3);
    }
    if long_edge < scale.min_edge {
        let factor = (scale.min_edge / long_edge).clamp(1, 3);
        if factor > 1 {
            return img.resize_exact(
                img.width() * factor,
                img.height() * factor,
                FilterType::CatmullRom,
            );
        }
    }
    img
}

/// Rescale, grayscale, then stretch contrast to the full 0..=255 range.
fn normalize(img: DynamicImage, scale: PageScale) -> DynamicImage {
    let mut gray: GrayImage = rescale(img, scale).to_luma8();

    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &Luma([v])| (lo.min(v), hi.max(v)));

    if hi > lo {
        let span = u32::from(hi - lo);
        let lut: [u8; 256] = std::array::from_fn(|v| {
            let v = (v as u8).clamp(lo, hi);
            (u32::from(v - lo) * 255 / span) as u8
        });
        for Luma([v]) in gray.pixels_mut() {
            *v = lut[usize::from(*v)];
        }
    }

    DynamicImage::ImageLuma8(gray)
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_fn(width, height, |_, _| Luma([value])))
    }

    fn small() -> PageScale {
        PageScale { min_edge: 30, max_edge: 100 }
    }

    #[test]
    fn uniform_page_survives() {
        let result = normalize(solid_gray(40, 40, 128), small());
        assert_eq!((result.width(), result.height()), (40, 40));
    }

    #[test]
    fn contrast_stretched_to_full_range() {
        let img = DynamicImage::ImageLuma8(ImageBuffer::from_fn(64, 1, |x, _| {
            Luma([60 + x as u8])
        }));
        let gray = normalize(img, small()).to_luma8();
        let values: Vec<u8> = gray.pixels().map(|p| p[0]).collect();
        assert_eq!(values.first(), Some(&0));
        assert_eq!(values.last(), Some(&255));
    }

    #[test]
    fn small_scan_is_upscaled_at_most_three_times() {
        let result = normalize(solid_gray(5, 4, 10), small());
        assert_eq!((result.width(), result.height()), (15, 12));
    }

    #[test]
    fn huge_page_is_downscaled() {
        let result = normalize(solid_gray(300, 150, 200), small());
        assert!(result.width() <= 100 && result.height() <= 100);
    }

    #[test]
    fn page_bytes_come_back_as_png() {
        let mut jpeg = Vec::new();
        solid_gray(8, 8, 100)
            .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();
        let result = prepare_page_bytes(&jpeg, small()).unwrap();
        assert_eq!(&result[..4], b"\x89PNG");
    }
}
