mod platform;

use glfw::{Action, Key, WindowEvent};
use lumen::camera::Direction;
use lumen::time::FrameTime;
use lumen_demos::{Example, InputAction, LoopFeedback};
use lumen_glfw::GlfwSurface;
use lumen_windowing::{CursorMode, WindowDim, WindowOpt};
use platform::DesktopPlatformServices;
use std::{path::PathBuf, process::ExitCode};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long, default_value = "resources/textures")]
  /// Directory where to pick textures from.
  textures: PathBuf,

  #[structopt(short, long)]
  /// List available examples.
  list_examples: bool,

  #[structopt(long)]
  /// Width of the window (800 if windowed).
  width: Option<u32>,

  #[structopt(long)]
  /// Height of the window (600 if windowed).
  height: Option<u32>,

  #[structopt(long)]
  /// Open in fullscreen, at the monitor resolution unless both --width and --height are given.
  fullscreen: bool,

  #[structopt(long)]
  /// Number of samples used for multisampling.
  samples: Option<u32>,

  #[structopt(long)]
  /// Move the camera for as long as movement keys are held, instead of once per key press.
  continuous_movement: bool,

  #[structopt(long)]
  /// Abort when a shader fails to compile or link.
  strict_shaders: bool,

  #[structopt(long)]
  /// Capture the cursor, for mouse-look.
  grab_cursor: bool,

  #[structopt(long)]
  /// Hide the cursor while it is over the window.
  hide_cursor: bool,

  /// Example to run.
  example: Option<String>,
}

impl CLIOpts {
  fn window_dim(&self) -> WindowDim {
    match (self.fullscreen, self.width, self.height) {
      (true, Some(width), Some(height)) => WindowDim::FullscreenRestricted { width, height },
      (true, _, _) => WindowDim::Fullscreen,
      (false, width, height) => WindowDim::Windowed {
        width: width.unwrap_or(800),
        height: height.unwrap_or(600),
      },
    }
  }

  fn window_opt(&self) -> WindowOpt {
    let cursor_mode = if self.grab_cursor {
      CursorMode::Disabled
    } else if self.hide_cursor {
      CursorMode::Invisible
    } else {
      CursorMode::Visible
    };

    WindowOpt::default()
      .set_dim(self.window_dim())
      .set_cursor_mode(cursor_mode)
      .set_num_samples(self.samples)
  }
}

/// Macro to declaratively add examples.
macro_rules! examples {
  (examples: $($ex_name:literal, $test_ident:ident),* , funtests: $($fun_name:literal, $fun_ident:ident),* $(,)?) => {
    fn show_available_examples() {
      println!("available examples:");
      $( println!("  - {}", $ex_name); )*

      #[cfg(feature = "funtest")]
      {
        println!("\navailable functional tests:");
        $( println!("  - {}", $fun_name); )*
      }
    }

    // create a function that will run an example based on its name
    fn pick_and_run_example(cli_opts: CLIOpts) -> ExitCode {
      let example_name = cli_opts.example.as_deref();
      match example_name {
        $(
          Some($ex_name) => run_example::<lumen_demos::$test_ident::LocalExample>(&cli_opts),
        )*

        $(
          #[cfg(feature = "funtest")]
          Some($fun_name) => run_example::<lumen_demos::$fun_ident::LocalExample>(&cli_opts),
        )*

        _ => {
          log::error!("no example found");
          show_available_examples();
          ExitCode::FAILURE
        }
      }
    }
  }
}

// Run an example until its window closes.
fn run_example<E>(cli_opts: &CLIOpts) -> ExitCode
where
  E: Example,
{
  let mut services = DesktopPlatformServices::new(cli_opts);

  let surface = match GlfwSurface::new_gl33(E::TITLE, cli_opts.window_opt()) {
    Ok(surface) => surface,
    Err(e) => {
      log::error!("{}", e);
      return ExitCode::FAILURE;
    }
  };
  let mut context = surface.context;
  let events = surface.events_rx;

  let mut example = match E::bootstrap(&mut services, context.backend()) {
    Ok(example) => example,
    Err(e) => {
      log::error!("{}", e);
      return ExitCode::FAILURE;
    }
  };

  let mut time = FrameTime::new();

  // the initial framebuffer size may differ from the requested window size (HiDPI); let the
  // example know before its first frame
  let [width, height] = context.framebuffer_size();
  if example.handle_action(InputAction::Resized { width, height }, &time) == LoopFeedback::Exit {
    context.close();
  }

  while !context.should_close() {
    time.tick(context.time() as f32);

    if example.render_frame(&time, context.backend()) == LoopFeedback::Exit {
      break;
    }

    context.backend().report_errors();
    context.swap_buffers();
    context.poll_events();

    for (_, event) in glfw::flush_messages(&events) {
      context.handle_window_event(&event);

      if let Some(action) = adapt_events(event) {
        if example.handle_action(action, &time) == LoopFeedback::Exit {
          context.close();
        }
      }
    }
  }

  // GPU resources go before the context they live in
  drop(example);
  log::debug!("{} closed", E::TITLE);

  ExitCode::SUCCESS
}

fn movement_direction(key: Key) -> Option<Direction> {
  match key {
    Key::W => Some(Direction::Forward),
    Key::S => Some(Direction::Backward),
    Key::A => Some(Direction::Left),
    Key::D => Some(Direction::Right),
    _ => None,
  }
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close => Some(InputAction::Quit),

    WindowEvent::Key(key, _, Action::Press, _) => {
      log::debug!("key press: {:?}", key);
      movement_direction(key).map(InputAction::Move)
    }

    WindowEvent::Key(key, _, Action::Release, _) => {
      movement_direction(key).map(InputAction::StopMoving)
    }

    WindowEvent::CursorPos(x, y) => Some(InputAction::CursorMoved {
      x: x as _,
      y: y as _,
    }),

    WindowEvent::CursorEnter(true) => Some(InputAction::CursorEntered),

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width.max(0) as _,
      height: height.max(0) as _,
    }),

    WindowEvent::Scroll(_, amount) => Some(InputAction::VScroll {
      amount: amount as f32,
    }),

    _ => None,
  }
}

examples! {
  examples:
  "hello-window", hello_window,
  "hello-triangle", hello_triangle,
  "hello-texture", hello_texture,
  "camera", camera,
  "hello-shader", hello_shader,

  // functional tests
  funtests:
  "funtest-geometry-read-back", funtest_geometry_read_back,
  "funtest-single-graphics-state", funtest_single_graphics_state,
  "funtest-texture-flip", funtest_texture_flip,
  "funtest-unlinked-program", funtest_unlinked_program,
}

fn main() -> ExitCode {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_examples {
    show_available_examples();
    ExitCode::SUCCESS
  } else {
    pick_and_run_example(cli_opts)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glfw::Modifiers;
  use std::iter;

  fn key(key: Key, action: Action) -> WindowEvent {
    WindowEvent::Key(key, 0, action, Modifiers::empty())
  }

  #[test]
  fn movement_keys() {
    assert_eq!(
      adapt_events(key(Key::W, Action::Press)),
      Some(InputAction::Move(Direction::Forward))
    );
    assert_eq!(
      adapt_events(key(Key::A, Action::Press)),
      Some(InputAction::Move(Direction::Left))
    );
    assert_eq!(
      adapt_events(key(Key::D, Action::Release)),
      Some(InputAction::StopMoving(Direction::Right))
    );
  }

  #[test]
  fn repeats_do_not_move() {
    assert_eq!(adapt_events(key(Key::S, Action::Repeat)), None);
  }

  #[test]
  fn escape_is_left_to_the_surface() {
    assert_eq!(adapt_events(key(Key::Escape, Action::Press)), None);
    assert_eq!(adapt_events(WindowEvent::Close), Some(InputAction::Quit));
  }

  #[test]
  fn cursor_and_scroll() {
    assert_eq!(
      adapt_events(WindowEvent::CursorPos(12.5, 300.)),
      Some(InputAction::CursorMoved { x: 12.5, y: 300. })
    );
    assert_eq!(
      adapt_events(WindowEvent::CursorEnter(true)),
      Some(InputAction::CursorEntered)
    );
    assert_eq!(adapt_events(WindowEvent::CursorEnter(false)), None);
    assert_eq!(
      adapt_events(WindowEvent::Scroll(0., -2.)),
      Some(InputAction::VScroll { amount: -2. })
    );
  }

  #[test]
  fn minimized_framebuffer() {
    assert_eq!(
      adapt_events(WindowEvent::FramebufferSize(1024, 0)),
      Some(InputAction::Resized {
        width: 1024,
        height: 0
      })
    );
  }

  fn cli(args: &[&str]) -> CLIOpts {
    CLIOpts::from_iter(iter::once("lumen-demos-desktop").chain(args.iter().copied()))
  }

  #[test]
  fn window_options_follow_the_command_line() {
    let opts = cli(&["--width", "1024", "--grab-cursor", "--hide-cursor"]);
    let win_opt = opts.window_opt();

    assert_eq!(win_opt.dim(), &WindowDim::Windowed { width: 1024, height: 600 });
    assert_eq!(win_opt.cursor_mode(), CursorMode::Disabled);
    assert_eq!(win_opt.num_samples(), None);
    assert_eq!(opts.example, None);
  }

  #[test]
  fn hidden_cursor_and_multisampling() {
    let win_opt = cli(&["--hide-cursor", "--samples", "4", "camera"]).window_opt();

    assert_eq!(win_opt.cursor_mode(), CursorMode::Invisible);
    assert_eq!(win_opt.num_samples(), Some(4));
    assert_eq!(win_opt.dim().size(), Some([800, 600]));
  }

  #[test]
  fn fullscreen_takes_the_monitor_size_unless_fully_sized() {
    assert_eq!(cli(&["--fullscreen"]).window_dim(), WindowDim::Fullscreen);
    assert_eq!(
      cli(&["--fullscreen", "--width", "1280"]).window_dim(),
      WindowDim::Fullscreen
    );
    assert_eq!(
      cli(&["--fullscreen", "--width", "1280", "--height", "720"]).window_dim(),
      WindowDim::FullscreenRestricted {
        width: 1280,
        height: 720
      }
    );
  }
}
