//! Texture upload into a texture object the caller has already bound.

use asset::{AssetStore, ImageData, load_image};

use crate::{
    backend::{GlBackend, TextureTarget},
    check::check_gl_error,
    error::{RendererError, RendererResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureOptions {
    pub generate_mipmaps: bool,
    /// `GL_REPEAT` wrapping instead of `GL_CLAMP_TO_EDGE`.
    pub repeat: bool,
}

/// Decode the image at `path` and upload it to the texture bound at `target`.
///
/// Returns the uploaded width and height. Missing and undecodable files are
/// reported as [`RendererError::Asset`] before any GL call is made.
pub fn load_texture<G, S>(
    gl: &G,
    store: &S,
    path: &str,
    target: TextureTarget,
    options: TextureOptions,
) -> RendererResult<(u32, u32)>
where
    G: GlBackend + ?Sized,
    S: AssetStore + ?Sized,
{
    let image = load_image(store, path)?;
    upload_image(gl, target, &image, options)?;
    Ok((image.width, image.height))
}

/// Upload decoded RGBA8 pixels, top row first, and set sampling parameters.
pub fn upload_image<G: GlBackend + ?Sized>(
    gl: &G,
    target: TextureTarget,
    image: &ImageData,
    options: TextureOptions,
) -> RendererResult<()> {
    if !image.is_valid() {
        return Err(RendererError::InvalidImage {
            width: image.width,
            height: image.height,
            len: image.data.len(),
        });
    }
    let (Ok(width), Ok(height)) = (i32::try_from(image.width), i32::try_from(image.height)) else {
        return Err(RendererError::TextureTooLarge {
            width: image.width,
            height: image.height,
        });
    };

    gl.tex_image_2d_rgba8(target, width, height, &image.data);

    let min_filter = if options.generate_mipmaps {
        gl.generate_mipmap(target);
        glow::LINEAR_MIPMAP_LINEAR
    } else {
        glow::LINEAR
    };
    let wrap = if options.repeat {
        glow::REPEAT
    } else {
        glow::CLAMP_TO_EDGE
    };
    gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, min_filter as i32);
    gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
    gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap as i32);
    gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap as i32);

    check_gl_error(gl, "tex_image_2d");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use asset::{AssetError, MemoryAssetStore};
    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;
    use crate::backend::mock::{MockGl, Upload};

    fn solid(size: u32) -> ImageData {
        ImageData::new_rgba8(size, size, vec![200; (size * size * 4) as usize])
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn uploads_decoded_pixels_to_bound_target() {
        let gl = MockGl::default();
        let store = MemoryAssetStore::new().with_file("models/trigrid.png", png(4, 2));

        let size = load_texture(
            &gl,
            &store,
            "models/trigrid.png",
            TextureTarget::TEXTURE_2D,
            TextureOptions::default(),
        )
        .unwrap();

        assert_eq!(size, (4, 2));
        assert_eq!(
            *gl.uploads.borrow(),
            vec![Upload {
                target: TextureTarget::TEXTURE_2D,
                width: 4,
                height: 2,
                bytes: 32,
            }]
        );
        let params = gl.tex_params.borrow();
        assert!(params.contains(&(glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32)));
        assert!(params.contains(&(glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32)));
        assert_eq!(gl.mipmaps.get(), 0);
    }

    #[test]
    fn mipmaps_and_repeat_on_request() {
        let gl = MockGl::default();
        let image = solid(16);
        let options = TextureOptions {
            generate_mipmaps: true,
            repeat: true,
        };
        upload_image(&gl, TextureTarget::TEXTURE_2D, &image, options).unwrap();

        assert_eq!(gl.mipmaps.get(), 1);
        let params = gl.tex_params.borrow();
        assert!(params.contains(&(glow::TEXTURE_MIN_FILTER, glow::LINEAR_MIPMAP_LINEAR as i32)));
        assert!(params.contains(&(glow::TEXTURE_WRAP_T, glow::REPEAT as i32)));
    }

    #[test]
    fn missing_and_corrupt_files_do_not_upload() {
        let gl = MockGl::default();
        let store = MemoryAssetStore::new().with_file("bad.png", b"not a png".to_vec());

        let missing = load_texture(
            &gl,
            &store,
            "none.png",
            TextureTarget::TEXTURE_2D,
            TextureOptions::default(),
        );
        assert!(matches!(
            missing,
            Err(RendererError::Asset(AssetError::Missing(_)))
        ));

        let corrupt = load_texture(
            &gl,
            &store,
            "bad.png",
            TextureTarget::TEXTURE_2D,
            TextureOptions::default(),
        );
        assert!(matches!(
            corrupt,
            Err(RendererError::Asset(AssetError::Decode { .. }))
        ));
        assert!(gl.uploads.borrow().is_empty());
    }

    #[test]
    #[should_panic(expected = "GL error after tex_image_2d()")]
    fn gl_error_after_upload_is_fatal() {
        let gl = MockGl::default();
        gl.push_error(glow::INVALID_ENUM);
        let image = solid(8);
        let _ = upload_image(
            &gl,
            TextureTarget::from_raw(0xdead),
            &image,
            TextureOptions::default(),
        );
    }

    #[test]
    fn short_pixel_buffer_is_rejected_before_upload() {
        let gl = MockGl::default();
        let image = ImageData {
            data: vec![0; 4],
            width: 64,
            height: 64,
        };
        let err = upload_image(&gl, TextureTarget::TEXTURE_2D, &image, TextureOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RendererError::InvalidImage {
                width: 64,
                height: 64,
                len: 4
            }
        ));
        assert!(gl.uploads.borrow().is_empty());
        assert!(gl.tex_params.borrow().is_empty());
    }

    #[test]
    fn empty_image_is_rejected() {
        let gl = MockGl::default();
        let image = ImageData {
            data: Vec::new(),
            width: 0,
            height: 0,
        };
        let err = upload_image(&gl, TextureTarget::TEXTURE_2D, &image, TextureOptions::default())
            .unwrap_err();
        assert!(matches!(err, RendererError::InvalidImage { len: 0, .. }));
        assert!(gl.uploads.borrow().is_empty());
    }
}
