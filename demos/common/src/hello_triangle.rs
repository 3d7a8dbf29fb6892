//! Draw an orange rectangle made of two indexed triangles.
//!
//! The four corners are uploaded once and the six indices pick them to form the two triangles, so
//! the shared edge isn’t duplicated in the vertex buffer.

use crate::{
  shared::{build_program, CLEAR_COLOR, POSITION_LAYOUT, QUAD_INDICES},
  DemoError, Example, LoopFeedback, PlatformServices,
};
use lumen::time::FrameTime;
use lumen_gl::gl33::{Program, Tess};
use lumen_gl::GL33;

const VS: &str = include_str!("hello-triangle-vs.glsl");
const FS: &str = include_str!("hello-triangle-fs.glsl");

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
   0.5,  0.5, 0.,
   0.5, -0.5, 0.,
  -0.5, -0.5, 0.,
  -0.5,  0.5, 0.,
];

pub struct LocalExample {
  // drop order: geometry, then program
  tess: Tess,
  program: Program,
}

impl Example for LocalExample {
  const TITLE: &'static str = "HelloTriangle";

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut GL33,
  ) -> Result<Self, DemoError> {
    let program = build_program(platform, context, VS, FS)?;
    let tess = context.upload_geometry(&VERTICES, 3, &POSITION_LAYOUT, Some(&QUAD_INDICES))?;

    Ok(LocalExample { tess, program })
  }

  fn render_frame(&mut self, _: &FrameTime, context: &mut GL33) -> LoopFeedback {
    context.clear(CLEAR_COLOR);

    self.program.bind();
    self.tess.render();

    LoopFeedback::Continue
  }
}
