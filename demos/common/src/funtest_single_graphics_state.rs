//! Only one graphics state may exist per thread.
//!
//! The platform already created one for the window; asking for another on the same thread must
//! fail instead of handing out a second cache that would disagree with the first.

use crate::{DemoError, Example, LoopFeedback, PlatformServices};
use lumen::time::FrameTime;
use lumen_gl::gl33::StateQueryError;
use lumen_gl::GL33;

pub struct LocalExample;

impl Example for LocalExample {
  const TITLE: &'static str = "Funtest: single graphics state";

  fn bootstrap(_: &mut impl PlatformServices, _: &mut GL33) -> Result<Self, DemoError> {
    match GL33::new() {
      Err(StateQueryError::UnavailableGLState) => log::info!("second graphics state refused"),
      Err(e) => panic!("unexpected graphics state error: {:?}", e),
      Ok(_) => panic!("a second graphics state was created on the same thread"),
    }

    Ok(LocalExample)
  }

  fn render_frame(&mut self, _: &FrameTime, _: &mut GL33) -> LoopFeedback {
    LoopFeedback::Exit
  }
}
