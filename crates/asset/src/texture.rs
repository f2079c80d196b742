//! Image decoding for texture upload.
//! PNG files decode to RGBA8 with rows top-to-bottom.

use crate::{
    error::{AssetError, AssetResult},
    store::{AssetStore, read_bytes},
};

/// Decoded RGBA8 pixels, row-major, first row is the top of the image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub const BYTES_PER_PIXEL: u32 = 4;

    /// Byte length of a tightly packed `width` x `height` RGBA8 image, or
    /// `None` when it does not fit in memory.
    pub fn rgba8_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::BYTES_PER_PIXEL as usize)
    }

    /// Wrap RGBA8 pixels. Panics if `data` does not hold exactly one RGBA8
    /// value per pixel.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            Some(data.len()),
            Self::rgba8_len(width, height),
            "{width}x{height} RGBA8 image given {} bytes",
            data.len()
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Decode an in-memory image file. `name` labels errors.
    pub fn decode(name: &str, bytes: &[u8]) -> AssetResult<Self> {
        let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            path: name.to_owned(),
            source,
        })?;

        // The decoder always yields rows top-to-bottom.
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new_rgba8(width, height, rgba.into_raw()))
    }

    /// RGBA of the pixel at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL as usize;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Non-empty, with exactly one RGBA8 value per pixel.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && Self::rgba8_len(self.width, self.height) == Some(self.data.len())
    }
}

/// Read and decode an image asset.
pub fn load_image<S: AssetStore + ?Sized>(store: &S, path: &str) -> AssetResult<ImageData> {
    let bytes = read_bytes(store, path)?;
    let image = ImageData::decode(path, &bytes)?;
    log::info!(
        "Loaded texture {} {}x{} with {} bytes",
        path,
        image.width,
        image.height,
        image.data.len()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;
    use crate::store::MemoryAssetStore;

    fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_top_row_first() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 255, 128]));
        let store = MemoryAssetStore::new().with_file("tex/anchor.png", png_bytes(img.into()));

        let image = load_image(&store, "tex/anchor.png").unwrap();
        assert!(image.is_valid());
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(image.pixel(1, 1), Some([0, 0, 255, 128]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn rgb_png_gets_opaque_alpha() {
        let img = RgbImage::from_pixel(3, 1, Rgb([10, 20, 30]));
        let image = ImageData::decode("rgb.png", &png_bytes(img.into())).unwrap();
        assert_eq!(image.data.len(), 12);
        assert_eq!(image.pixel(2, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn corrupt_file_is_decode_error() {
        let store = MemoryAssetStore::new().with_file("tex/bad.png", b"\x89PNG\r\n\x1a\ngarbage".to_vec());
        match load_image(&store, "tex/bad.png") {
            Err(AssetError::Decode { path, .. }) => assert_eq!(path, "tex/bad.png"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_a_decode_error() {
        let store = MemoryAssetStore::new();
        assert!(load_image(&store, "tex/none.png").unwrap_err().is_missing());
    }

    #[test]
    fn validity_tracks_pixel_buffer_length() {
        let mut image = ImageData::new_rgba8(2, 3, vec![7; 24]);
        assert!(image.is_valid());
        assert_eq!(image.pixel(1, 2), Some([7, 7, 7, 7]));

        image.data.truncate(4);
        assert!(!image.is_valid());
        assert_eq!(image.pixel(1, 2), None);
        image.data = Vec::new();
        image.width = 0;
        assert!(!image.is_valid());
    }

    #[test]
    #[should_panic(expected = "2x2 RGBA8 image given 3 bytes")]
    fn short_pixel_buffer_is_rejected() {
        let _ = ImageData::new_rgba8(2, 2, vec![0; 3]);
    }
}
