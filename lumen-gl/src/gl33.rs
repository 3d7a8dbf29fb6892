//! OpenGL 3.3 backend.
//!
//! [`GL33`] owns the cached graphics state of the current context. Every GPU object it creates
//! ([`Program`], [`Tess`], [`Texture`], …) keeps a handle on that state and releases its
//! resources when dropped.

mod buffer;
mod shader;
mod state;
mod tess;
mod texture;

pub use self::buffer::Buffer;
pub use self::shader::{BuiltProgram, Program, Uniform, Uniformable};
use self::state::GLState;
pub use self::state::StateQueryError;
pub use self::tess::Tess;
pub use self::texture::{decode_image, DecodedImage, Texture, TextureError, TextureUnit};

use gl::types::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Upper bound on errors drained from the error queue at once; a lost context never empties it.
const MAX_DRAINED_ERRORS: usize = 16;

/// The OpenGL 3.3 backend.
///
/// A context must be current on the calling thread before creating it.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL33 {
  /// Create a new OpenGL 3.3 backend from the current context.
  ///
  /// Fails if another backend is already alive on this thread.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| GL33 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Set the rendering viewport, in pixels.
  pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
    unsafe { self.state.borrow_mut().set_viewport([x, y, width, height]) }
  }

  /// Clear the color buffer with `color`.
  pub fn clear(&mut self, color: [f32; 4]) {
    unsafe {
      self.state.borrow_mut().set_clear_color(color);
      gl::Clear(gl::COLOR_BUFFER_BIT);
    }
  }

  /// Pop the pending errors of the context.
  pub fn drain_errors(&mut self) -> Vec<GLenum> {
    let mut errors = Vec::new();

    while errors.len() < MAX_DRAINED_ERRORS {
      match unsafe { gl::GetError() } {
        gl::NO_ERROR => break,
        err => errors.push(err),
      }
    }

    errors
  }

  /// Drain the pending errors of the context and log them.
  ///
  /// Returns how many errors were found.
  pub fn report_errors(&mut self) -> usize {
    let errors = self.drain_errors();

    for &err in &errors {
      log::warn!("OpenGL error: {} (0x{:x})", error_name(err), err);
    }

    errors.len()
  }
}

/// Human-readable name of an OpenGL error code.
pub fn error_name(err: GLenum) -> &'static str {
  match err {
    gl::NO_ERROR => "GL_NO_ERROR",
    gl::INVALID_ENUM => "GL_INVALID_ENUM",
    gl::INVALID_VALUE => "GL_INVALID_VALUE",
    gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
    gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
    gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
    gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
    gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
    _ => "unknown OpenGL error",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_names() {
    assert_eq!(error_name(gl::INVALID_ENUM), "GL_INVALID_ENUM");
    assert_eq!(error_name(gl::OUT_OF_MEMORY), "GL_OUT_OF_MEMORY");
    assert_eq!(error_name(0xdead), "unknown OpenGL error");
  }
}
