//! Fly around a textured quad lying on the ground.
//!
//! `W`, `A`, `S` and `D` move the camera, the cursor orients it and the scroll wheel zooms. The
//! quad is tilted by −55° around the X axis so that moving around actually shows some
//! perspective.

use crate::{
  shared::{
    build_program, load_texture, CLEAR_COLOR, QUAD_INDICES, TEXTURED_LAYOUT, TEXTURED_QUAD,
    TEXTURED_STRIDE,
  },
  DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{Deg, Matrix4};
use lumen::camera::Camera;
use lumen::time::FrameTime;
use lumen_gl::gl33::{Program, Tess, Texture, TextureUnit, Uniform};
use lumen_gl::GL33;

const VS: &str = include_str!("camera-vs.glsl");
const FS: &str = include_str!("texture-fs.glsl");

const TEXTURE: &str = "container.jpg";

// aspect ratio of the default 800×600 window
const INITIAL_ASPECT_RATIO: f32 = 800. / 600.;

/// Camera driven by input actions, along with the aspect ratio of the surface it renders to.
#[derive(Clone, Debug, PartialEq)]
pub struct FlyCamera {
  camera: Camera,
  aspect_ratio: f32,
}

impl FlyCamera {
  pub fn new(camera: Camera) -> Self {
    FlyCamera {
      camera,
      aspect_ratio: INITIAL_ASPECT_RATIO,
    }
  }

  pub fn camera(&self) -> &Camera {
    &self.camera
  }

  pub fn aspect_ratio(&self) -> f32 {
    self.aspect_ratio
  }

  /// Apply an input action; `delta_time` scales movements.
  pub fn handle_action(&mut self, action: &InputAction, delta_time: f32) -> LoopFeedback {
    match *action {
      InputAction::Quit => return LoopFeedback::Exit,
      InputAction::Move(dir) => self.camera.key_pressed(dir, delta_time),
      InputAction::StopMoving(dir) => self.camera.key_released(dir),
      InputAction::CursorMoved { x, y } => self.camera.cursor_moved(x, y),
      // the cursor may come back anywhere; don’t turn that into a jump
      InputAction::CursorEntered => self.camera.reset_mouse(),
      InputAction::VScroll { amount } => self.camera.scrolled(amount),

      InputAction::Resized { width, height } => {
        // a minimized window has no height; keep the last ratio
        if height > 0 {
          self.aspect_ratio = width as f32 / height as f32;
        }
      }
    }

    LoopFeedback::Continue
  }

  /// Per-frame update (held movement keys).
  pub fn step(&mut self, delta_time: f32) {
    self.camera.step(delta_time);
  }

  pub fn view(&self) -> Matrix4<f32> {
    self.camera.view()
  }

  pub fn projection(&self) -> Matrix4<f32> {
    self.camera.projection(self.aspect_ratio)
  }
}

/// Model matrix of the quad.
pub fn model() -> Matrix4<f32> {
  Matrix4::from_angle_x(Deg(-55.))
}

pub struct LocalExample {
  texture: Texture,
  tess: Tess,
  program: Program,
  u_model: Uniform<Matrix4<f32>>,
  u_view: Uniform<Matrix4<f32>>,
  u_projection: Uniform<Matrix4<f32>>,
  u_texture0: Uniform<TextureUnit>,
  fly: FlyCamera,
}

impl Example for LocalExample {
  const TITLE: &'static str = "Camera";

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut GL33,
  ) -> Result<Self, DemoError> {
    let program = build_program(platform, context, VS, FS)?;
    let tess = context.upload_geometry(
      &TEXTURED_QUAD,
      TEXTURED_STRIDE,
      &TEXTURED_LAYOUT,
      Some(&QUAD_INDICES),
    )?;
    let texture = load_texture(platform, context, TEXTURE)?;

    let camera = Camera::default().set_movement(platform.movement());
    log::info!("camera movement: {:?}", camera.movement());

    Ok(LocalExample {
      texture,
      tess,
      u_model: program.uniform("u_model"),
      u_view: program.uniform("u_view"),
      u_projection: program.uniform("u_projection"),
      u_texture0: program.uniform("u_texture0"),
      program,
      fly: FlyCamera::new(camera),
    })
  }

  fn handle_action(&mut self, action: InputAction, time: &FrameTime) -> LoopFeedback {
    self.fly.handle_action(&action, time.delta_time())
  }

  fn render_frame(&mut self, time: &FrameTime, context: &mut GL33) -> LoopFeedback {
    self.fly.step(time.delta_time());

    context.clear(CLEAR_COLOR);

    let program = &self.program;
    program.set(&self.u_model, model());
    program.set(&self.u_view, self.fly.view());
    program.set(&self.u_projection, self.fly.projection());
    program.set(&self.u_texture0, TextureUnit(0));

    self.texture.bind(TextureUnit(0));
    self.tess.render();

    LoopFeedback::Continue
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{InnerSpace as _, Vector3, Vector4};
  use lumen::camera::{front_from_angles, Direction, Movement};

  fn fly() -> FlyCamera {
    FlyCamera::new(Camera::default())
  }

  #[test]
  fn cursor_sweep_turns_the_camera() {
    let mut fly = fly();

    // seed
    fly.handle_action(&InputAction::CursorMoved { x: 0., y: 300. }, 0.016);

    for n in 1..=120 {
      fly.handle_action(
        &InputAction::CursorMoved {
          x: 10. * n as f32,
          y: 300.,
        },
        0.016,
      );
    }

    let camera = fly.camera();
    assert!((camera.yaw() - 30.).abs() < 1e-3);
    assert!((camera.front() - front_from_angles(30., 0.)).magnitude() < 1e-5);
  }

  #[test]
  fn reentering_the_window_does_not_jump() {
    let mut fly = fly();

    fly.handle_action(&InputAction::CursorMoved { x: 400., y: 300. }, 0.);
    fly.handle_action(&InputAction::CursorEntered, 0.);
    fly.handle_action(&InputAction::CursorMoved { x: 10., y: 590. }, 0.);

    assert_eq!(fly.camera().yaw(), -90.);
    assert_eq!(fly.camera().pitch(), 0.);
  }

  #[test]
  fn scrolling_zooms_within_bounds() {
    let mut fly = fly();

    fly.handle_action(&InputAction::VScroll { amount: 100. }, 0.);
    assert_eq!(fly.camera().fov(), 1.);

    fly.handle_action(&InputAction::VScroll { amount: -3. }, 0.);
    assert_eq!(fly.camera().fov(), 4.);
  }

  #[test]
  fn resize_updates_the_aspect_ratio() {
    let mut fly = fly();
    assert!((fly.aspect_ratio() - 4. / 3.).abs() < 1e-6);

    fly.handle_action(
      &InputAction::Resized {
        width: 1920,
        height: 1080,
      },
      0.,
    );
    assert!((fly.aspect_ratio() - 16. / 9.).abs() < 1e-6);

    fly.handle_action(
      &InputAction::Resized {
        width: 1920,
        height: 0,
      },
      0.,
    );
    assert!((fly.aspect_ratio() - 16. / 9.).abs() < 1e-6);
  }

  #[test]
  fn press_moves_once_per_event() {
    let mut fly = fly();

    fly.handle_action(&InputAction::Move(Direction::Forward), 0.5);
    fly.step(0.5);
    fly.step(0.5);

    // 2.5 units/s for half a second, once
    assert!((fly.camera().position() - Vector3::new(0., 0., 1.75)).magnitude() < 1e-6);
  }

  #[test]
  fn held_keys_move_every_frame() {
    let mut fly = FlyCamera::new(Camera::default().set_movement(Movement::Continuous));

    fly.handle_action(&InputAction::Move(Direction::Right), 0.1);
    fly.step(0.1);
    fly.step(0.1);
    fly.handle_action(&InputAction::StopMoving(Direction::Right), 0.1);
    fly.step(0.1);

    assert!((fly.camera().position() - Vector3::new(0.5, 0., 3.)).magnitude() < 1e-6);
  }

  #[test]
  fn quit_exits() {
    assert_eq!(fly().handle_action(&InputAction::Quit, 0.), LoopFeedback::Exit);
    assert_eq!(
      fly().handle_action(&InputAction::VScroll { amount: 1. }, 0.),
      LoopFeedback::Continue
    );
  }

  #[test]
  fn model_tilts_the_quad_backward() {
    // the top edge of the quad goes away from the viewer
    let top = model() * Vector4::new(0., 0.5, 0., 1.);

    assert!(top.z < 0.);
    assert!((top.y - 0.5 * 55f32.to_radians().cos()).abs() < 1e-6);
  }
}
