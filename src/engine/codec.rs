//! Decode/encode glue around the `image` crate.

use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::path::Path;

use crate::error::TaskError;

/// Decode the image at `path`. Format is sniffed from content, falling back to the extension.
///
/// `Ok(None)` means the bytes are not a usable image (DecodeSkip), including truncated data the
/// decoders report as `UnexpectedEof`. Only failing to open the file or sniff its header is an
/// I/O error.
pub fn decode(path: &Path) -> Result<Option<DynamicImage>, TaskError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| TaskError::io(path, e))?;
    match reader.decode() {
        Ok(img) => Ok(Some(img)),
        Err(e) => {
            log::debug!("undecodable {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Encode `img` as `format` into `path`, creating or truncating it.
pub fn encode(img: &DynamicImage, format: ImageFormat, path: &Path) -> Result<(), TaskError> {
    encodable_for(img, format)
        .save_with_format(path, format)
        .map_err(|e| match e {
            ImageError::IoError(source) => TaskError::io(path, source),
            other => TaskError::Encode {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })
}

/// Narrow the pixel format to one the target encoder accepts; unchanged when already accepted.
fn encodable_for(img: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;
    match (format, img) {
        (ImageFormat::Jpeg, ImageRgb8(_) | ImageLuma8(_)) => Cow::Borrowed(img),
        (ImageFormat::Jpeg, _) => Cow::Owned(ImageRgb8(img.to_rgb8())),
        (ImageFormat::Gif, ImageRgb8(_) | ImageRgba8(_)) => Cow::Borrowed(img),
        (ImageFormat::Gif, _) => Cow::Owned(ImageRgba8(img.to_rgba8())),
        (ImageFormat::Bmp, ImageRgb8(_) | ImageRgba8(_) | ImageLuma8(_) | ImageLumaA8(_)) => {
            Cow::Borrowed(img)
        }
        (ImageFormat::Bmp, _) => Cow::Owned(ImageRgba8(img.to_rgba8())),
        _ => Cow::Borrowed(img),
    }
}
