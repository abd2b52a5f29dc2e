//! Texture entries and PNG conversion
//!
//! Callers hand over textures in whatever representation they already
//! have: raw RGBA pixels, a decoded image, or bytes a paint surface has
//! already encoded. Everything becomes PNG bytes before packaging.

use std::io::Cursor;

use crate::exceptions::{GarbError, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Pixel data for one texture part
#[derive(Debug)]
pub enum TextureBuffer {
    /// Raw RGBA8 pixels, row-major, 4 bytes per pixel
    Rgba {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// A decoded image of any supported color type
    Image(image::DynamicImage),
    /// Bytes a paint surface already PNG-encoded
    Png(Vec<u8>),
}

impl TextureBuffer {
    /// Convert the buffer into PNG-encoded bytes
    pub fn into_png_bytes(self) -> Result<Vec<u8>> {
        match self {
            TextureBuffer::Rgba {
                width,
                height,
                pixels,
            } => {
                let img = image::RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
                    GarbError::UnsupportedImage(format!(
                        "Pixel buffer does not match {width}x{height} RGBA dimensions"
                    ))
                })?;
                let mut png = Cursor::new(Vec::new());
                img.write_to(&mut png, image::ImageFormat::Png)?;
                Ok(png.into_inner())
            }
            TextureBuffer::Image(img) => {
                let mut png = Cursor::new(Vec::new());
                img.write_to(&mut png, image::ImageFormat::Png)?;
                Ok(png.into_inner())
            }
            TextureBuffer::Png(bytes) => {
                if bytes.len() < PNG_SIGNATURE.len() || bytes[..8] != PNG_SIGNATURE {
                    return Err(GarbError::UnsupportedImage(
                        "Pre-encoded buffer is not a PNG stream".to_string(),
                    ));
                }
                Ok(bytes)
            }
        }
    }
}

/// An ordered set of named texture entries
///
/// Entries keep first-insertion order; a `None` buffer marks a part the
/// caller left unpainted.
#[derive(Debug, Default)]
pub struct TextureSet {
    entries: Vec<(String, Option<TextureBuffer>)>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one part. Replacement keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, buffer: Option<TextureBuffer>) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = buffer;
        } else {
            self.entries.push((name, buffer));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Part names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl IntoIterator for TextureSet {
    type Item = (String, Option<TextureBuffer>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
