//! OpenGL backend.
//!
//! This crate exports the [OpenGL](https://www.khronos.org/opengl/) 3.3 core-profile backend of
//! the lumen demos. The backend type is [`GL33`]; every GPU object it creates (programs, vertex
//! arrays, buffers, textures) releases its handle when dropped.
//!
//! A `GL33` must be created on the thread owning a current OpenGL context, after the GL entry
//! points have been loaded. `lumen-glfw` takes care of both.

pub mod gl33;

pub use gl33::GL33;
