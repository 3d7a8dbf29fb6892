//! # Backend-agnostic core of the lumen demos
//!
//! lumen is a small harness for learning-style OpenGL 3.3 demos. This crate holds everything that
//! does not need a live graphics context, so that it can be reasoned about (and tested) without a
//! window:
//!
//! - **Scoped release**: [`scope::Defer`] and [`scope::ReleaseStack`] run release actions when
//!   their scope is left, on every exit path, in reverse registration order.
//! - **Camera**: [`camera::Camera`] is a fly camera fed by keyboard, cursor and scroll events,
//!   producing view and projection matrices.
//! - **Timing**: [`time::FrameTime`] tracks the frame-to-frame delta used to scale motion.
//! - **Shared types**: shader stage errors, vertex attribute layouts, geometry errors and texture
//!   sampling parameters. The OpenGL backend (`lumen-gl`) maps those onto real GPU objects.
//!
//! # What’s not included
//!
//! No window, no event loop and no GL entry point lives here. Opening a window and getting a
//! context is the job of `lumen-glfw`; talking to the driver is the job of `lumen-gl`.

#![deny(missing_docs)]

pub mod camera;
pub mod scope;
pub mod shader;
pub mod tess;
pub mod texture;
pub mod time;
pub mod vertex;
