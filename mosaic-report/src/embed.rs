//! Image embedding as data URIs.

use crate::common::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, ImageOutputFormat};

const JPEG_QUALITY: u8 = 90;

/// An image ready to be inlined into an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime: &'static str,
    pub size: PixelSize,
    pub data_uri: String,
}

impl EmbeddedImage {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read image file '{}'", path.display()))?;
        Self::from_bytes(bytes)
            .with_context(|| format!("failed to load image file '{}'", path.display()))
    }

    /// Embed browser-friendly formats as-is and re-encode the others to JPEG.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes).context("unrecognized image format")?;

        let (mime, bytes) = match browser_mime(format) {
            Some(mime) => (mime, bytes),
            None => {
                info!("re-encode {:?} image to JPEG", format);
                let decoded = image::load_from_memory_with_format(&bytes, format)?;
                let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
                let mut encoded = vec![];
                rgb.write_to(&mut encoded, ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
                ("image/jpeg", encoded)
            }
        };

        let imagesize::ImageSize { width, height } = imagesize::blob_size(&bytes)
            .map_err(|err| format_err!("unable to read image size: {:?}", err))?;
        ensure!(width > 0 && height > 0, "the image is empty");

        let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));

        Ok(Self {
            mime,
            size: PixelSize::new(width, height),
            data_uri,
        })
    }
}

fn browser_mime(format: ImageFormat) -> Option<&'static str> {
    let mime = match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        _ => return None,
    };
    Some(mime)
}
