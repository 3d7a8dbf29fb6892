use gl::types::*;
use std::cell::RefCell;
use std::mem;
use std::os::raw::c_void;
use std::rc::Rc;

use crate::gl33::state::{Bind, GLState};

/// Binding point a buffer is filled through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BufferTarget {
  Array,
  ElementArray,
}

/// Wrapped OpenGL buffer.
///
/// The GPU storage is released when the buffer is dropped.
#[derive(Debug)]
pub struct Buffer {
  handle: GLuint,
  bytes: usize,
  state: Rc<RefCell<GLState>>,
}

impl Buffer {
  /// Create a buffer and fill it with `data` (`STATIC_DRAW`).
  ///
  /// Element buffers get attached to the vertex array currently bound.
  pub(crate) unsafe fn from_slice<T>(
    state: &Rc<RefCell<GLState>>,
    target: BufferTarget,
    data: &[T],
  ) -> Self
  where
    T: Copy,
  {
    let mut handle: GLuint = 0;
    gl::GenBuffers(1, &mut handle);

    let bytes = mem::size_of_val(data);
    let gl_target = match target {
      BufferTarget::Array => {
        state.borrow_mut().bind_array_buffer(handle, Bind::Forced);
        gl::ARRAY_BUFFER
      }

      BufferTarget::ElementArray => {
        state
          .borrow_mut()
          .bind_element_array_buffer(handle, Bind::Forced);
        gl::ELEMENT_ARRAY_BUFFER
      }
    };

    gl::BufferData(
      gl_target,
      bytes as isize,
      data.as_ptr() as *const c_void,
      gl::STATIC_DRAW,
    );

    log::trace!("uploaded buffer {} ({} bytes)", handle, bytes);

    Buffer {
      handle,
      bytes,
      state: state.clone(),
    }
  }

  /// OpenGL name of the buffer.
  pub fn handle(&self) -> GLuint {
    self.handle
  }

  /// Size of the storage, in bytes.
  pub fn byte_len(&self) -> usize {
    self.bytes
  }

  /// Read the whole storage back from the GPU.
  ///
  /// The copy-read binding point is used so that neither the array binding nor the vertex array
  /// state is disturbed.
  pub fn read_back(&self) -> Vec<u8> {
    let mut bytes = vec![0u8; self.bytes];

    unsafe {
      gl::BindBuffer(gl::COPY_READ_BUFFER, self.handle);
      gl::GetBufferSubData(
        gl::COPY_READ_BUFFER,
        0,
        self.bytes as isize,
        bytes.as_mut_ptr() as *mut c_void,
      );
      gl::BindBuffer(gl::COPY_READ_BUFFER, 0);
    }

    bytes
  }

  /// Read the storage back as 32-bit floats.
  pub fn read_back_f32(&self) -> Vec<f32> {
    self
      .read_back()
      .chunks_exact(4)
      .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
      .collect()
  }

  /// Read the storage back as 32-bit unsigned integers.
  pub fn read_back_u32(&self) -> Vec<u32> {
    self
      .read_back()
      .chunks_exact(4)
      .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
      .collect()
  }
}

impl Drop for Buffer {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_buffer(self.handle);
      gl::DeleteBuffers(1, &self.handle);
    }

    log::trace!("released buffer {}", self.handle);
  }
}
