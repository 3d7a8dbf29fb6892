//! lumen demos.
//!
//! This project provides a set of small OpenGL 3.3 demos, each one introducing a single concept:
//! opening a window, drawing indexed geometry, sampling a texture, flying a camera around and
//! animating vertices from a shader.
//!
//! # Demo architecture
//!
//! Demos are simple modules exposed from this crate. They do not depend on any windowing
//! concept, such as system events or window handles. Whenever a demo requires user interaction,
//! an abstract [`InputAction`] is used, which the platform code running the demo produces from
//! its own events. Anything else the platform provides (where assets live, how strict shader
//! building is) goes through [`PlatformServices`].
//!
//! Demos allocate their GPU resources in [`Example::bootstrap`] and draw one frame per call to
//! [`Example::render_frame`]. Resources are released when the demo is dropped.
//!
//! # Error handling
//!
//! Bootstrap failures (a texture that cannot be decoded, a geometry with a broken layout, a
//! shader that fails to build in strict mode) are returned as [`DemoError`]; the platform reports
//! them and exits with a failure code.

use lumen::camera::{Direction, Movement};
use lumen::shader::ProgramError;
use lumen::tess::TessError;
use lumen::time::FrameTime;
use lumen_gl::gl33::TextureError;
use lumen_gl::GL33;
use std::{error, fmt, path::PathBuf};

pub mod camera;
pub mod hello_shader;
pub mod hello_texture;
pub mod hello_triangle;
pub mod hello_window;
mod shared;

#[cfg(feature = "funtest")]
pub mod funtest_geometry_read_back;
#[cfg(feature = "funtest")]
pub mod funtest_single_graphics_state;
#[cfg(feature = "funtest")]
pub mod funtest_texture_flip;
#[cfg(feature = "funtest")]
pub mod funtest_unlinked_program;

/// Example interface.
pub trait Example: Sized {
  /// Title of the demo window.
  const TITLE: &'static str;

  /// Bootstrap the example.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut GL33,
  ) -> Result<Self, DemoError>;

  /// React to an input action.
  ///
  /// Actions are delivered after the frame has been presented, with the timing of that frame.
  fn handle_action(&mut self, action: InputAction, _time: &FrameTime) -> LoopFeedback {
    match action {
      InputAction::Quit => LoopFeedback::Exit,
      _ => LoopFeedback::Continue,
    }
  }

  /// Render a frame of the example.
  fn render_frame(&mut self, time: &FrameTime, context: &mut GL33) -> LoopFeedback;
}

/// A type used to pass “inputs” to examples.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// A movement key went down.
  Move(Direction),

  /// A movement key went up.
  StopMoving(Direction),

  /// The cursor moved, in window coordinates (origin top-left, y growing downward).
  CursorMoved { x: f32, y: f32 },

  /// The cursor entered the window.
  CursorEntered,

  /// Vertical scroll.
  VScroll { amount: f32 },

  /// Framebuffer size changed.
  Resized { width: u32, height: u32 },
}

/// Whether the frame loop should go on.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback {
  Continue,
  Exit,
}

/// Services the platform offers to examples.
pub trait PlatformServices {
  /// Path of a texture, given its file name.
  fn texture_path(&self, name: &str) -> PathBuf;

  /// Whether shader compilation and link failures abort the example.
  fn strict_shaders(&self) -> bool;

  /// How movement keys translate cameras.
  fn movement(&self) -> Movement;
}

/// Errors that prevent an example from starting.
#[derive(Debug)]
pub enum DemoError {
  /// A shader program failed to build (strict mode only).
  Program(ProgramError),
  /// A geometry couldn’t be uploaded.
  Geometry(TessError),
  /// A texture couldn’t be loaded.
  Texture(TextureError),
}

impl fmt::Display for DemoError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DemoError::Program(ref e) => write!(f, "Failed to build shader program: {}", e),
      DemoError::Geometry(ref e) => write!(f, "Failed to upload geometry: {}", e),
      DemoError::Texture(ref e) => write!(f, "Failed to load texture: {}", e),
    }
  }
}

impl error::Error for DemoError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      DemoError::Program(e) => Some(e),
      DemoError::Geometry(e) => Some(e),
      DemoError::Texture(e) => Some(e),
    }
  }
}

impl From<ProgramError> for DemoError {
  fn from(e: ProgramError) -> Self {
    DemoError::Program(e)
  }
}

impl From<TessError> for DemoError {
  fn from(e: TessError) -> Self {
    DemoError::Geometry(e)
  }
}

impl From<TextureError> for DemoError {
  fn from(e: TextureError) -> Self {
    DemoError::Texture(e)
  }
}
