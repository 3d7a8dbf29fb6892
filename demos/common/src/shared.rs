use lumen::texture::TextureOpt;
use lumen::vertex::VertexAttrib;
use lumen_gl::gl33::{Program, Texture};
use lumen_gl::GL33;

use crate::{DemoError, PlatformServices};

/// Color every demo clears the screen with.
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.];

/// Two triangles covering a quad made of four vertices (top-right, bottom-right, bottom-left,
/// top-left).
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Position-only vertices.
pub const POSITION_LAYOUT: [VertexAttrib; 1] = [VertexAttrib::new(0, 3, 0)];

/// Vertices made of a position followed by a texture coordinate.
pub const TEXTURED_LAYOUT: [VertexAttrib; 2] =
  [VertexAttrib::new(0, 3, 0), VertexAttrib::new(1, 2, 3)];

/// Floats per vertex in [`TEXTURED_LAYOUT`].
pub const TEXTURED_STRIDE: usize = 5;

/// Central quad with texture coordinates, laid out as [`TEXTURED_LAYOUT`].
#[rustfmt::skip]
pub const TEXTURED_QUAD: [f32; 20] = [
   0.5,  0.5, 0.,  1., 1.,
   0.5, -0.5, 0.,  1., 0.,
  -0.5, -0.5, 0.,  0., 0.,
  -0.5,  0.5, 0.,  0., 1.,
];

/// Build a program, turning diagnostics into an error if the platform asks for strict shaders.
pub fn build_program(
  platform: &impl PlatformServices,
  context: &mut GL33,
  vs: &str,
  fs: &str,
) -> Result<Program, DemoError> {
  let built = context.build_program(vs, fs);

  if platform.strict_shaders() {
    Ok(built.strict()?)
  } else {
    Ok(built.ignore_diagnostics())
  }
}

/// Load a texture by name with the default options (repeat, trilinear, flipped).
pub fn load_texture(
  platform: &impl PlatformServices,
  context: &mut GL33,
  name: &str,
) -> Result<Texture, DemoError> {
  let path = platform.texture_path(name);
  let texture = context.upload_texture(&path, TextureOpt::default())?;

  log::info!("loaded texture {}", path.display());

  Ok(texture)
}
