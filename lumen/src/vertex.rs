//! Interleaved vertex layouts.
//!
//! Vertices are flat runs of 32-bit floats. A vertex is `stride` floats wide and each attribute
//! picks `components` consecutive floats from it, starting `offset` floats into the vertex. For
//! instance, a position followed by a texture coordinate is:
//!
//! ```
//! use lumen::vertex::VertexAttrib;
//!
//! const STRIDE: usize = 5;
//! const LAYOUT: [VertexAttrib; 2] = [
//!   VertexAttrib::new(0, 3, 0), // vec3 position
//!   VertexAttrib::new(1, 2, 3), // vec2 texture coordinate
//! ];
//!
//! assert_eq!(lumen::vertex::check_layout(20, STRIDE, &LAYOUT), Ok(4));
//! ```

use crate::tess::TessError;
use std::mem;

/// Size, in bytes, of a single vertex component.
pub const COMPONENT_SIZE: usize = mem::size_of::<f32>();

/// A single non-normalized float attribute inside an interleaved vertex.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttrib {
  /// Shader location (`layout (location = N)`).
  pub location: u32,
  /// Number of floats (1 to 4).
  pub components: u8,
  /// Offset from the start of the vertex, in floats.
  pub offset: usize,
}

impl VertexAttrib {
  /// Declare an attribute.
  pub const fn new(location: u32, components: u8, offset: usize) -> Self {
    VertexAttrib {
      location,
      components,
      offset,
    }
  }

  /// Offset from the start of the vertex, in bytes.
  pub fn byte_offset(&self) -> usize {
    self.offset * COMPONENT_SIZE
  }

  /// Offset of the first float past this attribute.
  pub fn end(&self) -> usize {
    self.offset + self.components as usize
  }
}

/// Stride of a vertex in bytes.
pub fn stride_bytes(stride: usize) -> usize {
  stride * COMPONENT_SIZE
}

/// Check that `len` floats split into vertices of `stride` floats described by `attribs`.
///
/// Returns the number of vertices.
pub fn check_layout(len: usize, stride: usize, attribs: &[VertexAttrib]) -> Result<usize, TessError> {
  if stride == 0 {
    return Err(TessError::EmptyStride);
  }

  if len % stride != 0 {
    return Err(TessError::StrideMismatch { len, stride });
  }

  for (i, attrib) in attribs.iter().enumerate() {
    if !(1..=4).contains(&attrib.components) {
      return Err(TessError::InvalidComponentCount {
        location: attrib.location,
        components: attrib.components,
      });
    }

    if attrib.end() > stride {
      return Err(TessError::AttributeOutOfBounds {
        location: attrib.location,
        end: attrib.end(),
        stride,
      });
    }

    if attribs[..i].iter().any(|a| a.location == attrib.location) {
      return Err(TessError::DuplicateLocation(attrib.location));
    }
  }

  Ok(len / stride)
}

/// Check that every index refers to one of the `vertex_count` vertices.
pub fn check_indices(indices: &[u32], vertex_count: usize) -> Result<(), TessError> {
  match indices.iter().find(|&&i| i as usize >= vertex_count) {
    Some(&index) => Err(TessError::IndexOutOfRange {
      index,
      vertex_count,
    }),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const QUAD_LAYOUT: [VertexAttrib; 2] = [VertexAttrib::new(0, 3, 0), VertexAttrib::new(1, 2, 3)];

  #[test]
  fn byte_offsets() {
    assert_eq!(QUAD_LAYOUT[0].byte_offset(), 0);
    assert_eq!(QUAD_LAYOUT[1].byte_offset(), 12);
    assert_eq!(stride_bytes(5), 20);
  }

  #[test]
  fn position_only_layout() {
    let layout = [VertexAttrib::new(0, 3, 0)];
    assert_eq!(check_layout(12, 3, &layout), Ok(4));
  }

  #[test]
  fn empty_geometry_is_fine() {
    assert_eq!(check_layout(0, 5, &QUAD_LAYOUT), Ok(0));
  }

  #[test]
  fn zero_stride_is_rejected() {
    assert_eq!(check_layout(0, 0, &[]), Err(TessError::EmptyStride));
  }

  #[test]
  fn truncated_vertex_is_rejected() {
    assert_eq!(
      check_layout(19, 5, &QUAD_LAYOUT),
      Err(TessError::StrideMismatch { len: 19, stride: 5 })
    );
  }

  #[test]
  fn attribute_past_stride_is_rejected() {
    assert_eq!(
      check_layout(16, 4, &QUAD_LAYOUT),
      Err(TessError::AttributeOutOfBounds {
        location: 1,
        end: 5,
        stride: 4
      })
    );
  }

  #[test]
  fn bad_component_count_is_rejected() {
    let layout = [VertexAttrib::new(0, 5, 0)];
    assert_eq!(
      check_layout(10, 5, &layout),
      Err(TessError::InvalidComponentCount {
        location: 0,
        components: 5
      })
    );

    let layout = [VertexAttrib::new(2, 0, 0)];
    assert!(check_layout(10, 5, &layout).is_err());
  }

  #[test]
  fn duplicate_location_is_rejected() {
    let layout = [VertexAttrib::new(0, 3, 0), VertexAttrib::new(0, 2, 3)];
    assert_eq!(
      check_layout(10, 5, &layout),
      Err(TessError::DuplicateLocation(0))
    );
  }

  #[test]
  fn indices_must_reference_vertices() {
    assert_eq!(check_indices(&[0, 1, 3, 1, 2, 3], 4), Ok(()));
    assert_eq!(
      check_indices(&[0, 1, 4], 4),
      Err(TessError::IndexOutOfRange {
        index: 4,
        vertex_count: 4
      })
    );
  }
}
