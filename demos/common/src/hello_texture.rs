//! Map an image onto the central quad.
//!
//! The image is flipped while decoding so that its first row ends up at `v = 0`, which is what
//! OpenGL calls the bottom of a texture; without that, the picture would be upside down.

use crate::{
  shared::{
    build_program, load_texture, CLEAR_COLOR, QUAD_INDICES, TEXTURED_LAYOUT, TEXTURED_QUAD,
    TEXTURED_STRIDE,
  },
  DemoError, Example, LoopFeedback, PlatformServices,
};
use lumen::time::FrameTime;
use lumen_gl::gl33::{Program, Tess, Texture, TextureUnit, Uniform};
use lumen_gl::GL33;

const VS: &str = include_str!("hello-texture-vs.glsl");
const FS: &str = include_str!("texture-fs.glsl");

pub const TEXTURE: &str = "container.jpg";

pub struct LocalExample {
  texture: Texture,
  tess: Tess,
  program: Program,
  u_texture0: Uniform<TextureUnit>,
}

impl Example for LocalExample {
  const TITLE: &'static str = "HelloTexture";

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut GL33,
  ) -> Result<Self, DemoError> {
    let program = build_program(platform, context, VS, FS)?;
    let tess = context.upload_geometry(
      &TEXTURED_QUAD,
      TEXTURED_STRIDE,
      &TEXTURED_LAYOUT,
      Some(&QUAD_INDICES),
    )?;
    let texture = load_texture(platform, context, TEXTURE)?;
    let u_texture0 = program.uniform("u_texture0");

    Ok(LocalExample {
      texture,
      tess,
      program,
      u_texture0,
    })
  }

  fn render_frame(&mut self, _: &FrameTime, context: &mut GL33) -> LoopFeedback {
    context.clear(CLEAR_COLOR);

    self.program.set(&self.u_texture0, TextureUnit(0));
    self.texture.bind(TextureUnit(0));
    self.tess.render();

    LoopFeedback::Continue
  }
}
