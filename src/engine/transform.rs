//! Pixel transforms on a decoded image. No I/O, no shared state.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};

/// Filter used for the single resample pass.
const SCALE_FILTER: FilterType = FilterType::Triangle;

/// New dimensions for `factor`, truncated toward zero (integer-cast semantics).
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    (
        (f64::from(width) * factor) as u32,
        (f64::from(height) * factor) as u32,
    )
}

/// Resample `img` by `factor`, keeping its pixel format. None when either new side would be 0.
pub fn scale(img: &DynamicImage, factor: f64) -> Option<DynamicImage> {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = scaled_dimensions(width, height, factor);
    if new_width == 0 || new_height == 0 {
        return None;
    }
    Some(img.resize_exact(new_width, new_height, SCALE_FILTER))
}

/// Negate one packed `0xAARRGGBB` pixel: each colour byte becomes `255 - byte`, alpha kept.
pub fn negate_argb(argb: u32) -> u32 {
    (argb & 0xFF00_0000) | (!argb & 0x00FF_FFFF)
}

/// Replace the first `color_channels` channels of every pixel with `255 - value`.
fn invert_channels<P>(buf: &mut ImageBuffer<P, Vec<u8>>, color_channels: usize)
where
    P: Pixel<Subpixel = u8>,
{
    for pixel in buf.pixels_mut() {
        for c in pixel.channels_mut().iter_mut().take(color_channels) {
            *c = 255 - *c;
        }
    }
}

/// Negate `img` in place. 8-bit RGB(A) and grey(+alpha) keep their format; any other format
/// is converted to 8-bit RGBA first. Alpha is never touched.
pub fn negate(img: &mut DynamicImage) {
    match img {
        DynamicImage::ImageRgb8(buf) => invert_channels(buf, 3),
        DynamicImage::ImageRgba8(buf) => invert_channels(buf, 3),
        DynamicImage::ImageLuma8(buf) => invert_channels(buf, 1),
        DynamicImage::ImageLumaA8(buf) => invert_channels(buf, 1),
        other => {
            let mut rgba = other.to_rgba8();
            invert_channels(&mut rgba, 3);
            *other = DynamicImage::ImageRgba8(rgba);
        }
    }
}
