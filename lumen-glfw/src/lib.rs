//! [GLFW](https://crates.io/crates/glfw) backend for the lumen demos.
//!
//! [`GlfwSurface::new_gl33`] runs the whole context bootstrap: it initializes GLFW with an error
//! reporter, asks for an OpenGL 3.3 core context, opens the window, makes its context current,
//! loads the GL entry points and hands back the event receiver along with a [`GL33Context`].

#![deny(missing_docs)]

use glfw::{
  Action, Context as _, Glfw, InitError, Key, OpenGlProfileHint, Window, WindowEvent, WindowHint,
  WindowMode,
};
pub use lumen_gl::gl33::StateQueryError;
use lumen_gl::GL33;
use lumen_windowing::{CursorMode, WindowDim, WindowOpt};
use std::{error, fmt, os::raw::c_void, sync::mpsc::Receiver};

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError {
  /// GLFW failed to initialize.
  EnvInitFailed(InitError),

  /// The window (and its context) couldn’t be created.
  WindowCreateFailed,

  /// The OpenGL entry points couldn’t be loaded.
  GlLoaderFailed,

  /// The graphics state is not available.
  ///
  /// This error is generated when the initialization code is called on a thread on which the
  /// graphics state has already been acquired.
  GraphicsStateError(StateQueryError),
}

impl fmt::Display for GlfwSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::EnvInitFailed(ref e) => write!(f, "Failed to initialize GLFW: {}", e),
      GlfwSurfaceError::WindowCreateFailed => f.write_str("Failed to create GLFW window"),
      GlfwSurfaceError::GlLoaderFailed => f.write_str("Failed to load the OpenGL entry points"),
      GlfwSurfaceError::GraphicsStateError(ref e) => {
        write!(f, "failed to get graphics state: {}", e)
      }
    }
  }
}

impl From<InitError> for GlfwSurfaceError {
  fn from(e: InitError) -> Self {
    GlfwSurfaceError::EnvInitFailed(e)
  }
}

impl error::Error for GlfwSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::EnvInitFailed(e) => Some(e),
      GlfwSurfaceError::GraphicsStateError(e) => Some(e),
      _ => None,
    }
  }
}

// Every error reported by GLFW ends up here, whatever the call that raised it.
fn report_error(err: glfw::Error, description: String, _: &()) {
  log::error!("error_code: {} description: {}", err as i32, description);
}

/// GLFW surface.
///
/// This type is a helper that exposes two important concepts: the GLFW event receiver that you
/// can use to poll events and the [`GL33Context`], which allows you to perform the rendering part.
#[derive(Debug)]
pub struct GlfwSurface {
  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped OpenGL context.
  pub context: GL33Context,
}

impl GlfwSurface {
  /// Initialize GLFW and open a window with a current OpenGL 3.3 core context.
  ///
  /// Keyboard, cursor, scroll, cursor-enter, close and framebuffer-size events are polled. On
  /// failure, everything created so far is torn down before the error is returned.
  pub fn new_gl33(title: &str, win_opt: WindowOpt) -> Result<Self, GlfwSurfaceError> {
    let mut glfw = glfw::init(Some(glfw::Callback {
      f: report_error as fn(glfw::Error, String, &()),
      data: (),
    }))?;

    // OpenGL hints
    glfw.window_hint(WindowHint::ContextVersion(3, 3));
    glfw.window_hint(WindowHint::OpenGlProfile(OpenGlProfileHint::Core));
    #[cfg(target_os = "macos")]
    glfw.window_hint(WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(WindowHint::Samples(win_opt.num_samples()));

    let (mut window, events_rx) =
      create_window(&mut glfw, title, win_opt.dim()).ok_or(GlfwSurfaceError::WindowCreateFailed)?;

    window.make_current();

    window.set_key_polling(true);
    window.set_cursor_pos_polling(true);
    window.set_cursor_enter_polling(true);
    window.set_scroll_polling(true);
    window.set_framebuffer_size_polling(true);
    window.set_close_polling(true);

    window.set_cursor_mode(match win_opt.cursor_mode() {
      CursorMode::Visible => glfw::CursorMode::Normal,
      CursorMode::Invisible => glfw::CursorMode::Hidden,
      CursorMode::Disabled => glfw::CursorMode::Disabled,
    });

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    if !gl::Viewport::is_loaded() || !gl::ClearColor::is_loaded() {
      return Err(GlfwSurfaceError::GlLoaderFailed);
    }

    let gl = GL33::new().map_err(GlfwSurfaceError::GraphicsStateError)?;
    let mut context = GL33Context { gl, window };

    let [width, height] = context.framebuffer_size();
    context.gl.set_viewport(0, 0, width as i32, height as i32);

    log::debug!("OpenGL 3.3 context ready ({}×{})", width, height);

    Ok(GlfwSurface { events_rx, context })
  }
}

fn create_window(
  glfw: &mut Glfw,
  title: &str,
  dim: &WindowDim,
) -> Option<(Window, Receiver<(f64, WindowEvent)>)> {
  match *dim {
    WindowDim::Windowed { width, height } => {
      glfw.create_window(width, height, title, WindowMode::Windowed)
    }

    WindowDim::Fullscreen => glfw.with_primary_monitor(|glfw, monitor| {
      let monitor = monitor?;
      let mode = monitor.get_video_mode()?;
      glfw.create_window(mode.width, mode.height, title, WindowMode::FullScreen(monitor))
    }),

    WindowDim::FullscreenRestricted { width, height } => {
      glfw.with_primary_monitor(|glfw, monitor| {
        glfw.create_window(width, height, title, WindowMode::FullScreen(monitor?))
      })
    }
  }
}

/// OpenGL 3.3 context.
///
/// This type also re-exports the GLFW window, if you need access to it. GPU objects created from
/// the backend must be dropped before the context.
#[derive(Debug)]
pub struct GL33Context {
  /// OpenGL 3.3 state.
  gl: GL33,

  /// Wrapped GLFW window.
  pub window: Window,
}

impl GL33Context {
  /// The OpenGL backend.
  pub fn backend(&mut self) -> &mut GL33 {
    &mut self.gl
  }

  /// Size of the framebuffer, in pixels.
  pub fn framebuffer_size(&self) -> [u32; 2] {
    let (w, h) = self.window.get_framebuffer_size();
    [w.max(0) as u32, h.max(0) as u32]
  }

  /// Seconds elapsed since GLFW was initialized.
  pub fn time(&self) -> f64 {
    self.window.glfw.get_time()
  }

  /// Whether the window was asked to close.
  pub fn should_close(&self) -> bool {
    self.window.should_close()
  }

  /// Ask the window to close; the frame loop stops before the next frame.
  pub fn close(&mut self) {
    self.window.set_should_close(true);
  }

  /// Present the back buffer.
  pub fn swap_buffers(&mut self) {
    self.window.swap_buffers();
  }

  /// Pump the pending window events into the event receiver.
  pub fn poll_events(&mut self) {
    self.window.glfw.poll_events();
  }

  /// Surface-level reaction to a window event, run before demos see it: the viewport follows the
  /// framebuffer size and `Escape` closes the window.
  pub fn handle_window_event(&mut self, event: &WindowEvent) {
    match *event {
      WindowEvent::FramebufferSize(width, height) => {
        log::debug!("framebuffer resized to {}×{}", width, height);
        self.gl.set_viewport(0, 0, width, height);
      }

      WindowEvent::Key(Key::Escape, _, Action::Press, _) => self.close(),

      _ => (),
    }
  }
}
