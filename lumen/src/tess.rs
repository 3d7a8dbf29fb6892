//! Geometry errors.

use std::{error, fmt};

/// Errors raised when describing geometry to upload.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TessError {
  /// The stride, in floats, is zero.
  EmptyStride,
  /// The number of floats is not a multiple of the stride.
  StrideMismatch {
    /// Number of floats provided.
    len: usize,
    /// Declared stride, in floats.
    stride: usize,
  },
  /// An attribute has a component count outside of `1..=4`.
  InvalidComponentCount {
    /// Attribute location.
    location: u32,
    /// Declared component count.
    components: u8,
  },
  /// An attribute reads past the end of a vertex.
  AttributeOutOfBounds {
    /// Attribute location.
    location: u32,
    /// Offset, in floats, of the first float past the attribute.
    end: usize,
    /// Declared stride, in floats.
    stride: usize,
  },
  /// Two attributes share the same location.
  DuplicateLocation(u32),
  /// An index references a vertex that doesn’t exist.
  IndexOutOfRange {
    /// Faulty index.
    index: u32,
    /// Number of vertices available.
    vertex_count: usize,
  },
}

impl fmt::Display for TessError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TessError::EmptyStride => f.write_str("vertex stride cannot be zero"),

      TessError::StrideMismatch { len, stride } => write!(
        f,
        "{} floats cannot be split in vertices of {} floats",
        len, stride
      ),

      TessError::InvalidComponentCount {
        location,
        components,
      } => write!(
        f,
        "attribute {} has {} components (expected 1 to 4)",
        location, components
      ),

      TessError::AttributeOutOfBounds {
        location,
        end,
        stride,
      } => write!(
        f,
        "attribute {} ends at float {} but vertices are {} floats wide",
        location, end, stride
      ),

      TessError::DuplicateLocation(location) => {
        write!(f, "attribute location {} declared more than once", location)
      }

      TessError::IndexOutOfRange {
        index,
        vertex_count,
      } => write!(
        f,
        "index {} is out of range (only {} vertices)",
        index, vertex_count
      ),
    }
  }
}

impl error::Error for TessError {}
