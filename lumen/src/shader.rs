//! Shader stages and program errors.
//!
//! Compilation and link diagnostics coming from the driver are captured through a fixed-size
//! info-log buffer of [`INFO_LOG_BUDGET`] bytes; anything past that is cut.

use std::{error, fmt};

/// Number of bytes reserved to fetch a compile or link info log.
pub const INFO_LOG_BUDGET: usize = 512;

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that shader stages can emit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// The driver refused to allocate a stage object.
  CannotCreate(StageType),
  /// Occurs when a shader fails to compile; carries the (possibly truncated) info log.
  CompilationFailed(StageType, String),
}

impl StageError {
  /// Type of the stage that failed.
  pub fn stage_type(&self) -> StageType {
    match *self {
      StageError::CannotCreate(ty) | StageError::CompilationFailed(ty, _) => ty,
    }
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CannotCreate(ty) => write!(f, "unable to create {}", ty),
      StageError::CompilationFailed(ty, ref log) => write!(f, "{} compilation error: {}", ty, log),
    }
  }
}

impl error::Error for StageError {}

/// Errors that a shader program can generate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// A shader stage failed to compile.
  StageError(StageError),
  /// Program link failed; carries the (possibly truncated) info log.
  LinkFailed(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::StageError(ref e) => write!(f, "shader program has stage error: {}", e),
      ProgramError::LinkFailed(ref log) => write!(f, "shader program failed to link: {}", log),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::StageError(e) => Some(e),
      ProgramError::LinkFailed(_) => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::StageError(e)
  }
}

/// Turn the raw bytes of an info-log buffer into text.
///
/// `written` is the length reported by the driver; the text also stops at the first NUL byte, and
/// never goes past the buffer. Invalid UTF-8 is replaced and trailing whitespace is removed.
pub fn info_log_text(buffer: &[u8], written: usize) -> String {
  let bytes = &buffer[..written.min(buffer.len())];
  let bytes = match bytes.iter().position(|&b| b == 0) {
    Some(nul) => &bytes[..nul],
    None => bytes,
  };

  String::from_utf8_lossy(bytes).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_log_stops_at_reported_length() {
    let buffer = b"0:1(1): error: syntax error\nGARBAGE";
    assert_eq!(info_log_text(buffer, 27), "0:1(1): error: syntax error");
  }

  #[test]
  fn info_log_stops_at_nul() {
    let mut buffer = [0u8; INFO_LOG_BUDGET];
    buffer[..5].copy_from_slice(b"oops\n");

    assert_eq!(info_log_text(&buffer, INFO_LOG_BUDGET), "oops");
  }

  #[test]
  fn info_log_never_reads_past_buffer() {
    assert_eq!(info_log_text(b"short", 4096), "short");
    assert_eq!(info_log_text(b"", 12), "");
  }

  #[test]
  fn info_log_tolerates_invalid_utf8() {
    let text = info_log_text(&[b'o', b'k', 0xff, b'!'], 4);
    assert!(text.starts_with("ok"));
    assert!(text.ends_with('!'));
  }

  #[test]
  fn program_error_wraps_stage_error() {
    let stage = StageError::CompilationFailed(StageType::FragmentShader, "bad".to_owned());
    let err = ProgramError::from(stage.clone());

    assert_eq!(stage.stage_type(), StageType::FragmentShader);
    assert_eq!(
      err.to_string(),
      "shader program has stage error: fragment shader compilation error: bad"
    );
  }
}
