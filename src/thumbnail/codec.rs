use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader, ImageResult};

/// Decodes source images and encodes cached thumbnails.
///
/// This is the only place the cache touches pixel data, so tests can count or fake it.
pub trait ImageCodec {
    /// Decodes the image at `path`, whatever its format
    fn decode(&self, path: &Path) -> ImageResult<DynamicImage> {
        Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
    }

    /// Writes `image` as PNG
    fn encode_png(&self, image: &DynamicImage, out: &mut dyn Write) -> ImageResult<()> {
        // float buffers have no PNG representation
        let image = match image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8()))
            }
            other => Cow::Borrowed(other),
        };
        image.write_with_encoder(PngEncoder::new(out))
    }
}

/// Codec backed by the `image` crate decoders
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {}
