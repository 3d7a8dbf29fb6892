//! Upload an indexed quad and read both buffers back from the GPU.
//!
//! What comes back must be byte-for-byte what was handed over: the vertex floats, in order, then
//! the indices. Nothing is displayed; the window closes after the first frame.

use crate::{
  shared::{QUAD_INDICES, TEXTURED_LAYOUT, TEXTURED_QUAD, TEXTURED_STRIDE},
  DemoError, Example, LoopFeedback, PlatformServices,
};
use lumen::time::FrameTime;
use lumen_gl::GL33;

pub struct LocalExample;

impl Example for LocalExample {
  const TITLE: &'static str = "Funtest: geometry read-back";

  fn bootstrap(_: &mut impl PlatformServices, context: &mut GL33) -> Result<Self, DemoError> {
    let tess = context.upload_geometry(
      &TEXTURED_QUAD,
      TEXTURED_STRIDE,
      &TEXTURED_LAYOUT,
      Some(&QUAD_INDICES),
    )?;

    assert_eq!(tess.vertex_count(), 4);
    assert_eq!(tess.index_count(), 6);
    assert_eq!(tess.vertex_buffer().read_back_f32(), TEXTURED_QUAD);

    let indices = tess.index_buffer().map(|buffer| buffer.read_back_u32());
    assert_eq!(indices.as_deref(), Some(&QUAD_INDICES[..]));

    log::info!("geometry read back intact");

    Ok(LocalExample)
  }

  fn render_frame(&mut self, _: &FrameTime, _: &mut GL33) -> LoopFeedback {
    LoopFeedback::Exit
  }
}
