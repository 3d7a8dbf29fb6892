use cgmath::Matrix4;
use gl::types::*;
use lumen::shader::{info_log_text, ProgramError, StageError, StageType, INFO_LOG_BUDGET};
use std::cell::RefCell;
use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::gl33::state::GLState;
use crate::gl33::GL33;

/// A compiled (or not) shader stage.
#[derive(Debug)]
struct Stage {
  handle: GLuint,
  ty: StageType,
}

impl Stage {
  /// Create the stage object and compile `src` into it.
  ///
  /// Only a refused allocation is an error here; see [`Stage::compilation_status`].
  fn new(ty: StageType, src: &str) -> Result<Self, StageError> {
    unsafe {
      let handle = gl::CreateShader(opengl_shader_type(ty));

      if handle == 0 {
        return Err(StageError::CannotCreate(ty));
      }

      let src_ptr = src.as_ptr() as *const GLchar;
      let src_len = src.len() as GLint;
      gl::ShaderSource(handle, 1, &src_ptr, &src_len);
      gl::CompileShader(handle);

      Ok(Stage { handle, ty })
    }
  }

  fn compilation_status(&self) -> Result<(), StageError> {
    unsafe {
      let mut compiled: GLint = gl::FALSE.into();
      gl::GetShaderiv(self.handle, gl::COMPILE_STATUS, &mut compiled);

      if compiled == GLint::from(gl::TRUE) {
        Ok(())
      } else {
        let mut buffer = [0u8; INFO_LOG_BUDGET];
        let mut written: GLsizei = 0;
        gl::GetShaderInfoLog(
          self.handle,
          INFO_LOG_BUDGET as GLsizei,
          &mut written,
          buffer.as_mut_ptr() as *mut GLchar,
        );

        Err(StageError::CompilationFailed(
          self.ty,
          info_log_text(&buffer, written.max(0) as usize),
        ))
      }
    }
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }
  }
}

/// A linked (or not) shader program.
///
/// The program object is deleted when dropped.
#[derive(Debug)]
pub struct Program {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Program {
  fn link(&self) -> Result<(), ProgramError> {
    unsafe {
      gl::LinkProgram(self.handle);

      if self.is_linked() {
        Ok(())
      } else {
        let mut buffer = [0u8; INFO_LOG_BUDGET];
        let mut written: GLsizei = 0;
        gl::GetProgramInfoLog(
          self.handle,
          INFO_LOG_BUDGET as GLsizei,
          &mut written,
          buffer.as_mut_ptr() as *mut GLchar,
        );

        Err(ProgramError::LinkFailed(info_log_text(
          &buffer,
          written.max(0) as usize,
        )))
      }
    }
  }

  /// OpenGL name of the program.
  pub fn handle(&self) -> GLuint {
    self.handle
  }

  /// Whether the last link succeeded.
  pub fn is_linked(&self) -> bool {
    let mut linked: GLint = gl::FALSE.into();

    unsafe {
      gl::GetProgramiv(self.handle, gl::LINK_STATUS, &mut linked);
    }

    linked == GLint::from(gl::TRUE)
  }

  /// Make this program the current one.
  pub fn bind(&self) {
    unsafe { self.state.borrow_mut().use_program(self.handle) }
  }

  /// Look a uniform up by name.
  ///
  /// Absent uniforms (optimized out, misspelled, or an unlinked program) give an unbound
  /// [`Uniform`] that silently ignores updates.
  pub fn uniform<T>(&self, name: &str) -> Uniform<T>
  where
    T: Uniformable,
  {
    let location = self.uniform_location(name);

    if location < 0 {
      log::debug!("uniform {} is not active in program {}", name, self.handle);
    }

    Uniform {
      location,
      _t: PhantomData,
    }
  }

  fn uniform_location(&self, name: &str) -> GLint {
    if !self.is_linked() {
      return -1;
    }

    match CString::new(name) {
      Ok(c_name) => unsafe { gl::GetUniformLocation(self.handle, c_name.as_ptr() as *const GLchar) },

      Err(_) => {
        log::warn!("uniform name {:?} contains a NUL byte", name);
        -1
      }
    }
  }

  /// Bind the program and update `uniform` with `value`.
  pub fn set<T>(&self, uniform: &Uniform<T>, value: T)
  where
    T: Uniformable,
  {
    self.bind();

    if uniform.is_bound() {
      unsafe { value.update(uniform.location) }
    }
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_program(self.handle);

    unsafe {
      gl::DeleteProgram(self.handle);
    }

    log::trace!("released program {}", self.handle);
  }
}

/// Outcome of [`GL33::build_program`].
///
/// A program is always produced; the diagnostics collected while compiling and linking are kept
/// next to it so that callers decide whether they are fatal.
#[derive(Debug)]
pub struct BuiltProgram {
  /// The program, possibly unlinked.
  pub program: Program,
  /// Compilation and link failures, in the order they were found.
  pub diagnostics: Vec<ProgramError>,
}

impl BuiltProgram {
  /// Whether nothing went wrong.
  pub fn is_clean(&self) -> bool {
    self.diagnostics.is_empty()
  }

  /// Keep the program whatever the diagnostics; they have already been logged.
  pub fn ignore_diagnostics(self) -> Program {
    self.program
  }

  /// Turn the first diagnostic into an error.
  pub fn strict(self) -> Result<Program, ProgramError> {
    match self.diagnostics.into_iter().next() {
      Some(err) => Err(err),
      None => Ok(self.program),
    }
  }
}

impl GL33 {
  /// Compile a vertex and a fragment shader and link them into a program.
  ///
  /// Failures don’t stop the build: each info log is logged at error level and recorded in
  /// [`BuiltProgram::diagnostics`], and a stage that failed to compile still gets attached. The
  /// stage objects are deleted once the link has been attempted.
  pub fn build_program(&mut self, vertex_src: &str, fragment_src: &str) -> BuiltProgram {
    let program = Program {
      handle: unsafe { gl::CreateProgram() },
      state: self.state.clone(),
    };
    let mut diagnostics: Vec<ProgramError> = Vec::new();

    let stages = [
      Stage::new(StageType::VertexShader, vertex_src),
      Stage::new(StageType::FragmentShader, fragment_src),
    ];

    for stage in &stages {
      match stage {
        Ok(stage) => {
          if let Err(err) = stage.compilation_status() {
            let err = ProgramError::from(err);
            report(&err);
            diagnostics.push(err);
          }

          unsafe {
            gl::AttachShader(program.handle, stage.handle);
          }
        }

        Err(err) => {
          let err = ProgramError::from(err.clone());
          report(&err);
          diagnostics.push(err);
        }
      }
    }

    if let Err(err) = program.link() {
      report(&err);
      diagnostics.push(err);
    }

    // stages are released here, attached or not
    drop(stages);

    if diagnostics.is_empty() {
      log::debug!("program {} linked", program.handle);
    }

    BuiltProgram {
      program,
      diagnostics,
    }
  }
}

// Info logs are emitted as the driver wrote them.
fn report(err: &ProgramError) {
  match err {
    ProgramError::StageError(StageError::CompilationFailed(_, text))
    | ProgramError::LinkFailed(text) => log::error!("{}", text),
    _ => log::error!("{}", err),
  }
}

/// A shader uniform, typed by the value it holds.
///
/// An unbound uniform has location `-1`; updating it does nothing.
pub struct Uniform<T> {
  location: GLint,
  _t: PhantomData<*const T>,
}

impl<T> Uniform<T> {
  /// Location of the uniform in its program.
  pub fn location(&self) -> GLint {
    self.location
  }

  /// Whether the uniform exists in its program.
  pub fn is_bound(&self) -> bool {
    self.location >= 0
  }
}

impl<T> fmt::Debug for Uniform<T> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Uniform")
      .field("location", &self.location)
      .finish()
  }
}

/// Types that can be sent to a shader uniform.
pub trait Uniformable: Sized {
  /// Update the uniform at `location` of the current program.
  ///
  /// # Safety
  ///
  /// The program owning `location` must be in use.
  unsafe fn update(self, location: GLint);
}

impl Uniformable for f32 {
  unsafe fn update(self, location: GLint) {
    gl::Uniform1f(location, self);
  }
}

impl Uniformable for i32 {
  unsafe fn update(self, location: GLint) {
    gl::Uniform1i(location, self);
  }
}

impl Uniformable for [f32; 3] {
  unsafe fn update(self, location: GLint) {
    gl::Uniform3fv(location, 1, self.as_ptr());
  }
}

impl Uniformable for [f32; 4] {
  unsafe fn update(self, location: GLint) {
    gl::Uniform4fv(location, 1, self.as_ptr());
  }
}

impl Uniformable for Matrix4<f32> {
  unsafe fn update(self, location: GLint) {
    let columns: [[f32; 4]; 4] = self.into();
    gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr() as *const GLfloat);
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}
