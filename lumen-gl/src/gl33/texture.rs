use gl::types::*;
use lumen::scope::Defer;
use lumen::texture::{MagFilter, MinFilter, Sampler, TexelFormat, TextureOpt, Wrap};
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::gl33::shader::Uniformable;
use crate::gl33::state::GLState;
use crate::gl33::GL33;

/// Errors that might happen when creating textures.
#[non_exhaustive]
#[derive(Debug)]
pub enum TextureError {
  /// The image file couldn’t be read or decoded.
  ImageDecodeFailed {
    /// Path of the image.
    path: PathBuf,
    /// Decoder error.
    source: image::ImageError,
  },
  /// The image has a channel count other than 3 or 4.
  UnsupportedChannels(u8),
  /// The number of texels doesn’t match the requested size.
  TexelCountMismatch {
    /// Texels needed by the size.
    expected: usize,
    /// Texels provided.
    found: usize,
  },
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::ImageDecodeFailed {
        ref path,
        ref source,
      } => write!(f, "cannot decode {}: {}", path.display(), source),

      TextureError::UnsupportedChannels(channels) => write!(
        f,
        "unsupported channel count: {} (expected 3 or 4)",
        channels
      ),

      TextureError::TexelCountMismatch { expected, found } => write!(
        f,
        "wrong texel count: expected {}, found {}",
        expected, found
      ),
    }
  }
}

impl error::Error for TextureError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TextureError::ImageDecodeFailed { source, .. } => Some(source),
      _ => None,
    }
  }
}

/// 8-bit texels decoded from an image file, ready to be uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
  /// Width, in texels.
  pub width: u32,
  /// Height, in texels.
  pub height: u32,
  /// Texel format; tells how many bytes each texel takes.
  pub format: TexelFormat,
  /// Rows of texels, the first row being the bottom one if the image was flipped.
  pub texels: Vec<u8>,
}

impl DecodedImage {
  /// Size of a row, in bytes.
  pub fn row_bytes(&self) -> usize {
    self.width as usize * self.format.channels()
  }

  /// Bytes of the texel at (`x`, `y`), `y` counting rows from the start of the buffer; `None`
  /// outside of the image.
  pub fn texel(&self, x: u32, y: u32) -> Option<&[u8]> {
    if x >= self.width || y >= self.height {
      return None;
    }

    let channels = self.format.channels();
    let start = y as usize * self.row_bytes() + x as usize * channels;
    self.texels.get(start..start + channels)
  }
}

/// Decode an image file into 8-bit RGB or RGBA texels.
///
/// With `flip_vertical`, rows are reversed so that the first row of the buffer is the bottom row
/// of the picture, which is where OpenGL expects `v = 0`.
pub fn decode_image(path: impl AsRef<Path>, flip_vertical: bool) -> Result<DecodedImage, TextureError> {
  let path = path.as_ref();
  let img = image::open(path).map_err(|source| TextureError::ImageDecodeFailed {
    path: path.to_owned(),
    source,
  })?;
  let img = if flip_vertical { img.flipv() } else { img };

  let channels = img.color().channel_count();
  let format = TexelFormat::from_channels(channels).ok_or(TextureError::UnsupportedChannels(channels))?;

  let ((width, height), texels) = match format {
    TexelFormat::RGB => {
      let rgb = img.to_rgb8();
      (rgb.dimensions(), rgb.into_raw())
    }

    TexelFormat::RGBA => {
      let rgba = img.to_rgba8();
      (rgba.dimensions(), rgba.into_raw())
    }
  };

  log::debug!(
    "decoded {}: {}×{} {:?}",
    path.display(),
    width,
    height,
    format
  );

  Ok(DecodedImage {
    width,
    height,
    format,
    texels,
  })
}

/// A texture unit, as seen by samplers in shaders.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextureUnit(pub u32);

impl Uniformable for TextureUnit {
  unsafe fn update(self, location: GLint) {
    gl::Uniform1i(location, self.0 as GLint);
  }
}

/// A texture living on the GPU.
///
/// The texture object is deleted when dropped.
#[derive(Debug)]
pub struct Texture {
  handle: GLuint,
  target: GLenum,
  size: [u32; 2],
  state: Rc<RefCell<GLState>>,
}

impl Texture {
  /// OpenGL name of the texture.
  pub fn handle(&self) -> GLuint {
    self.handle
  }

  /// Width and height (layer count for array textures).
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Bind the texture to the texture unit `unit`.
  pub fn bind(&self, unit: TextureUnit) {
    let mut state = self.state.borrow_mut();

    unsafe {
      state.set_texture_unit(unit.0);
      state.bind_texture(self.target, self.handle);
    }
  }

  /// Read the base level back as 8-bit texels of the given format, rows from bottom to top.
  pub fn read_texels(&self, format: TexelFormat) -> Vec<u8> {
    let len = self.size[0] as usize * self.size[1] as usize * format.channels();
    let mut texels = vec![0u8; len];

    self.bind(TextureUnit(0));

    unsafe {
      let _alignment = relax_row_alignment(gl::PACK_ALIGNMENT, self.size[0] as usize * format.channels());
      gl::GetTexImage(
        self.target,
        0,
        opengl_pixel_format(format),
        gl::UNSIGNED_BYTE,
        texels.as_mut_ptr() as *mut c_void,
      );
    }

    texels
  }
}

impl Drop for Texture {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_texture(self.handle);

    unsafe {
      gl::DeleteTextures(1, &self.handle);
    }

    log::trace!("released texture {}", self.handle);
  }
}

impl GL33 {
  /// Load an image file into a mipmapped 2D texture.
  pub fn upload_texture(&mut self, path: impl AsRef<Path>, opt: TextureOpt) -> Result<Texture, TextureError> {
    let image = decode_image(path, opt.flip_vertical())?;
    Ok(self.new_texture_2d(&image, opt.sampler()))
  }

  /// Upload already decoded texels into a 2D texture.
  ///
  /// The mipmap chain is generated when the minification filter samples it.
  ///
  /// The texture is left bound to the current texture unit.
  pub fn new_texture_2d(&mut self, image: &DecodedImage, sampler: Sampler) -> Texture {
    let texture = self.new_texture(gl::TEXTURE_2D, [image.width, image.height]);

    unsafe {
      set_sampler(gl::TEXTURE_2D, &sampler);

      let _alignment = relax_row_alignment(gl::UNPACK_ALIGNMENT, image.row_bytes());
      let format = opengl_pixel_format(image.format);

      gl::TexImage2D(
        gl::TEXTURE_2D,
        0,
        opengl_sized_format(image.format) as GLint,
        image.width as GLsizei,
        image.height as GLsizei,
        0,
        format,
        gl::UNSIGNED_BYTE,
        image.texels.as_ptr() as *const c_void,
      );

      if sampler.min_filter.uses_mipmaps() {
        gl::GenerateMipmap(gl::TEXTURE_2D);
      }
    }

    log::debug!(
      "texture {} uploaded ({}×{})",
      texture.handle,
      image.width,
      image.height
    );

    texture
  }

  /// Create a 1D array texture of `layers` rows of `width` RGB float texels.
  ///
  /// Texels are stored with an unsigned normalized RGB format, so components outside of
  /// *[0; 1]* are clamped. Sampling uses linear filters and clamps to the edges.
  pub fn new_texture_1d_array(
    &mut self,
    width: u32,
    layers: u32,
    texels: &[[f32; 3]],
  ) -> Result<Texture, TextureError> {
    let expected = width as usize * layers as usize;

    if texels.len() != expected {
      return Err(TextureError::TexelCountMismatch {
        expected,
        found: texels.len(),
      });
    }

    let texture = self.new_texture(gl::TEXTURE_1D_ARRAY, [width, layers]);
    let sampler = Sampler {
      wrap_s: Wrap::ClampToEdge,
      wrap_t: Wrap::ClampToEdge,
      min_filter: MinFilter::Linear,
      mag_filter: MagFilter::Linear,
    };

    unsafe {
      set_sampler(gl::TEXTURE_1D_ARRAY, &sampler);
      gl::TexImage2D(
        gl::TEXTURE_1D_ARRAY,
        0,
        gl::RGB as GLint,
        width as GLsizei,
        layers as GLsizei,
        0,
        gl::RGB,
        gl::FLOAT,
        texels.as_ptr() as *const c_void,
      );
    }

    Ok(texture)
  }

  fn new_texture(&mut self, target: GLenum, size: [u32; 2]) -> Texture {
    let mut handle: GLuint = 0;

    unsafe {
      gl::GenTextures(1, &mut handle);
      self.state.borrow_mut().bind_texture(target, handle);
    }

    Texture {
      handle,
      target,
      size,
      state: self.state.clone(),
    }
  }
}

/// Relax the pixel alignment for rows that are not 4-byte aligned; the default alignment is
/// restored when the returned guard goes out of scope.
fn relax_row_alignment(pname: GLenum, row_bytes: usize) -> Option<Defer<impl FnOnce()>> {
  if row_bytes % 4 == 0 {
    return None;
  }

  unsafe {
    gl::PixelStorei(pname, 1);
  }

  Some(Defer::new(move || unsafe {
    gl::PixelStorei(pname, 4);
  }))
}

unsafe fn set_sampler(target: GLenum, sampler: &Sampler) {
  gl::TexParameteri(target, gl::TEXTURE_WRAP_S, opengl_wrap(sampler.wrap_s) as GLint);
  gl::TexParameteri(target, gl::TEXTURE_WRAP_T, opengl_wrap(sampler.wrap_t) as GLint);
  gl::TexParameteri(
    target,
    gl::TEXTURE_MIN_FILTER,
    opengl_min_filter(sampler.min_filter) as GLint,
  );
  gl::TexParameteri(
    target,
    gl::TEXTURE_MAG_FILTER,
    opengl_mag_filter(sampler.mag_filter) as GLint,
  );
}

fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

fn opengl_min_filter(filter: MinFilter) -> GLenum {
  match filter {
    MinFilter::Nearest => gl::NEAREST,
    MinFilter::Linear => gl::LINEAR,
    MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
    MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
    MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
  }
}

fn opengl_mag_filter(filter: MagFilter) -> GLenum {
  match filter {
    MagFilter::Nearest => gl::NEAREST,
    MagFilter::Linear => gl::LINEAR,
  }
}

fn opengl_pixel_format(format: TexelFormat) -> GLenum {
  match format {
    TexelFormat::RGB => gl::RGB,
    TexelFormat::RGBA => gl::RGBA,
  }
}

fn opengl_sized_format(format: TexelFormat) -> GLenum {
  match format {
    TexelFormat::RGB => gl::RGB8,
    TexelFormat::RGBA => gl::RGBA8,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage, Rgba, RgbaImage};
  use std::env;
  use std::fs;

  const RED: [u8; 3] = [255, 0, 0];
  const BLUE: [u8; 3] = [0, 0, 255];

  fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("lumen-gl-{}-{}", std::process::id(), name))
  }

  // 3×2 image: top row red, bottom row blue
  fn two_row_image(name: &str) -> PathBuf {
    let path = temp_path(name);
    let img = RgbImage::from_fn(3, 2, |_, y| if y == 0 { Rgb(RED) } else { Rgb(BLUE) });
    img.save(&path).unwrap();
    path
  }

  #[test]
  fn flipped_decode_puts_top_row_last() {
    let path = two_row_image("flip.png");
    let image = decode_image(&path, true).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(image.format, TexelFormat::RGB);
    assert_eq!((image.width, image.height), (3, 2));
    assert_eq!(image.row_bytes(), 9);
    // first row in memory is v = 0, the bottom of the picture
    assert_eq!(image.texel(0, 0), Some(&BLUE[..]));
    assert_eq!(image.texel(2, 1), Some(&RED[..]));
    assert_eq!(image.texel(3, 0), None);
    assert_eq!(image.texel(0, 2), None);
  }

  #[test]
  fn unflipped_decode_keeps_file_order() {
    let path = two_row_image("noflip.png");
    let image = decode_image(&path, false).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(image.texel(0, 0), Some(&RED[..]));
    assert_eq!(image.texel(1, 1), Some(&BLUE[..]));
  }

  #[test]
  fn alpha_images_decode_as_rgba() {
    let path = temp_path("alpha.png");
    RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])).save(&path).unwrap();
    let image = decode_image(&path, true).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(image.format, TexelFormat::RGBA);
    assert_eq!(image.texels.len(), 16);
    assert_eq!(image.texel(1, 1), Some(&[1, 2, 3, 4][..]));
  }

  #[test]
  fn grayscale_images_are_rejected() {
    let path = temp_path("gray.png");
    image::GrayImage::new(2, 2).save(&path).unwrap();
    let err = decode_image(&path, true).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, TextureError::UnsupportedChannels(1)));
  }

  #[test]
  fn missing_file_reports_path() {
    let err = decode_image("does/not/exist.jpg", true).unwrap_err();

    match err {
      TextureError::ImageDecodeFailed { ref path, .. } => {
        assert_eq!(path, Path::new("does/not/exist.jpg"))
      }
      _ => panic!("unexpected error: {}", err),
    }

    assert!(err.to_string().starts_with("cannot decode does/not/exist.jpg"));
  }

  #[test]
  fn sampler_enums() {
    assert_eq!(opengl_wrap(Wrap::Repeat), gl::REPEAT);
    assert_eq!(opengl_min_filter(MinFilter::LinearMipmapLinear), gl::LINEAR_MIPMAP_LINEAR);
    assert_eq!(opengl_mag_filter(MagFilter::Linear), gl::LINEAR);
    assert_eq!(opengl_sized_format(TexelFormat::RGBA), gl::RGBA8);
  }
}
