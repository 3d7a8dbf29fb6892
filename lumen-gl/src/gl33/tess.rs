use gl::types::*;
use lumen::scope::ReleaseStack;
use lumen::tess::TessError;
use lumen::vertex::{check_indices, check_layout, stride_bytes, VertexAttrib};
use std::cell::RefCell;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use crate::gl33::buffer::{Buffer, BufferTarget};
use crate::gl33::state::{Bind, GLState};
use crate::gl33::GL33;

/// Wrapped vertex array object.
#[derive(Debug)]
struct VertexArray {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_vertex_array(self.handle);

    unsafe {
      gl::DeleteVertexArrays(1, &self.handle);
    }

    log::trace!("released vertex array {}", self.handle);
  }
}

/// Geometry living on the GPU: a vertex array recording one interleaved vertex buffer and,
/// optionally, one index buffer.
///
/// Dropping a `Tess` releases the index buffer, then the vertex buffer, then the vertex array.
#[derive(Debug)]
pub struct Tess {
  vertex_count: usize,
  index_count: usize,
  // fields drop in declaration order
  index_buffer: Option<Buffer>,
  vertex_buffer: Buffer,
  vao: VertexArray,
}

impl Tess {
  /// Number of vertices.
  pub fn vertex_count(&self) -> usize {
    self.vertex_count
  }

  /// Number of indices; zero for non-indexed geometry.
  pub fn index_count(&self) -> usize {
    self.index_count
  }

  /// Whether the geometry is drawn through its index buffer.
  pub fn is_indexed(&self) -> bool {
    self.index_buffer.is_some()
  }

  /// The vertex buffer.
  pub fn vertex_buffer(&self) -> &Buffer {
    &self.vertex_buffer
  }

  /// The index buffer, if any.
  pub fn index_buffer(&self) -> Option<&Buffer> {
    self.index_buffer.as_ref()
  }

  /// Draw the whole geometry with the currently bound program.
  pub fn render(&self) {
    unsafe {
      self
        .vao
        .state
        .borrow_mut()
        .bind_vertex_array(self.vao.handle, Bind::Cached);

      if self.is_indexed() {
        gl::DrawElements(
          gl::TRIANGLES,
          self.index_count as GLsizei,
          gl::UNSIGNED_INT,
          ptr::null(),
        );
      } else {
        gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count as GLsizei);
      }
    }
  }
}

impl GL33 {
  /// Upload interleaved float vertices, and optional triangle indices, to the GPU.
  ///
  /// `stride` is the width of a vertex in floats and `attribs` tells where each attribute sits in
  /// it. The layout is checked before anything gets allocated. Once the vertex array has recorded
  /// everything, the array binding and the vertex array are unbound (in that order), leaving the
  /// index buffer attached to the vertex array.
  pub fn upload_geometry(
    &mut self,
    vertices: &[f32],
    stride: usize,
    attribs: &[VertexAttrib],
    indices: Option<&[u32]>,
  ) -> Result<Tess, TessError> {
    let vertex_count = check_layout(vertices.len(), stride, attribs)?;

    if let Some(indices) = indices {
      check_indices(indices, vertex_count)?;
    }

    let state = &self.state;
    let mut restore = ReleaseStack::new();

    let mut handle: GLuint = 0;
    unsafe {
      gl::GenVertexArrays(1, &mut handle);
      state.borrow_mut().bind_vertex_array(handle, Bind::Forced);
    }

    let vao = VertexArray {
      handle,
      state: state.clone(),
    };
    restore.defer(|| unsafe { state.borrow_mut().unbind_vertex_array() });

    let vertex_buffer = unsafe { Buffer::from_slice(state, BufferTarget::Array, vertices) };
    restore.defer(|| unsafe { state.borrow_mut().bind_array_buffer(0, Bind::Cached) });

    unsafe { set_vertex_pointers(stride, attribs) };

    let index_buffer =
      indices.map(|indices| unsafe { Buffer::from_slice(state, BufferTarget::ElementArray, indices) });

    restore.release();

    log::debug!(
      "geometry uploaded: {} vertices, {} indices",
      vertex_count,
      indices.map_or(0, |i| i.len())
    );

    Ok(Tess {
      vertex_count,
      index_count: indices.map_or(0, |i| i.len()),
      index_buffer,
      vertex_buffer,
      vao,
    })
  }
}

/// Describe every attribute to the currently bound vertex array; the data comes from the
/// currently bound array buffer.
unsafe fn set_vertex_pointers(stride: usize, attribs: &[VertexAttrib]) {
  let stride = stride_bytes(stride) as GLsizei;

  for attrib in attribs {
    gl::VertexAttribPointer(
      attrib.location as GLuint,
      attrib.components as GLint,
      gl::FLOAT,
      gl::FALSE,
      stride,
      attrib.byte_offset() as *const c_void,
    );
    gl::EnableVertexAttribArray(attrib.location as GLuint);
  }
}
