//! Open a window and clear it every frame. Nothing else.

use crate::{shared::CLEAR_COLOR, DemoError, Example, LoopFeedback, PlatformServices};
use lumen::time::FrameTime;
use lumen_gl::GL33;

pub struct LocalExample;

impl Example for LocalExample {
  const TITLE: &'static str = "HelloWindow";

  fn bootstrap(_: &mut impl PlatformServices, _: &mut GL33) -> Result<Self, DemoError> {
    Ok(LocalExample)
  }

  fn render_frame(&mut self, _: &FrameTime, context: &mut GL33) -> LoopFeedback {
    context.clear(CLEAR_COLOR);
    LoopFeedback::Continue
  }
}
