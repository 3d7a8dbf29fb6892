//! Fly camera.
//!
//! A first-person camera described by a position, a unit front vector and a constant world-up
//! vector. Orientation is stored as Euler angles in degrees (yaw around the world-up axis, pitch
//! around the camera’s right axis); the front vector is recomputed from them on every cursor
//! event.
//!
//! The camera reacts to three kinds of input:
//!
//! - Movement keys ([`Direction`]) translate the position by `CAMERA_SPEED · Δt` along the front
//!   vector or the right vector.
//! - Cursor positions (window space, origin top-left, y growing downward) rotate the camera.
//! - Vertical scroll zooms by shrinking or widening the field of view.

use cgmath::{perspective, Deg, EuclideanSpace as _, InnerSpace as _, Matrix4, Point3, Vector3};

/// Translation speed, in units per second.
pub const CAMERA_SPEED: f32 = 2.5;

/// Degrees of rotation per pixel of cursor motion.
pub const MOUSE_SENSITIVITY: f32 = 0.1;

/// Pitch is kept in `[-PITCH_LIMIT, PITCH_LIMIT]` degrees so that the front vector never becomes
/// colinear with the world-up vector.
pub const PITCH_LIMIT: f32 = 89.;

/// Narrowest field of view, in degrees.
pub const FOV_MIN: f32 = 1.;

/// Widest (and initial) field of view, in degrees.
pub const FOV_MAX: f32 = 45.;

/// Near clipping plane distance used by [`Camera::projection`].
pub const Z_NEAR: f32 = 0.1;

/// Far clipping plane distance used by [`Camera::projection`].
pub const Z_FAR: f32 = 100.;

const INITIAL_YAW: f32 = -90.;
const INITIAL_PITCH: f32 = 0.;

// center of the default 800×600 window
const INITIAL_CURSOR: [f32; 2] = [400., 300.];

/// Direction of a camera translation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
  /// Along the front vector.
  Forward,
  /// Against the front vector.
  Backward,
  /// Against the right vector.
  Left,
  /// Along the right vector.
  Right,
}

impl Direction {
  const ALL: [Direction; 4] = [
    Direction::Forward,
    Direction::Backward,
    Direction::Left,
    Direction::Right,
  ];

  fn index(self) -> usize {
    match self {
      Direction::Forward => 0,
      Direction::Backward => 1,
      Direction::Left => 2,
      Direction::Right => 3,
    }
  }
}

/// How movement keys translate the camera.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Movement {
  /// One displacement per key press event, scaled by the delta time of the frame that delivered
  /// the event. Holding a key down does nothing more.
  OnPress,
  /// Keys are tracked as held or released, and every frame translates the camera along all held
  /// directions (see [`Camera::step`]).
  Continuous,
}

impl Default for Movement {
  fn default() -> Self {
    Movement::OnPress
  }
}

/// Fly camera state.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
  position: Vector3<f32>,
  front: Vector3<f32>,
  world_up: Vector3<f32>,
  yaw: f32,
  pitch: f32,
  fov: f32,
  last_cursor: [f32; 2],
  first_mouse: bool,
  movement: Movement,
  held: [bool; 4],
}

impl Default for Camera {
  /// Camera at `(0, 0, 3)` looking down the negative Z axis.
  fn default() -> Self {
    Camera::new(Vector3::new(0., 0., 3.), Vector3::new(0., 0., -1.))
  }
}

impl Camera {
  /// Create a camera at `position`, looking along `front`.
  ///
  /// Yaw starts at −90° and pitch at 0°, which matches a front vector of `(0, 0, -1)`; the first
  /// cursor event only seeds the last known cursor position.
  pub fn new(position: Vector3<f32>, front: Vector3<f32>) -> Self {
    Camera {
      position,
      front: front.normalize(),
      world_up: Vector3::unit_y(),
      yaw: INITIAL_YAW,
      pitch: INITIAL_PITCH,
      fov: FOV_MAX,
      last_cursor: INITIAL_CURSOR,
      first_mouse: true,
      movement: Movement::default(),
      held: [false; 4],
    }
  }

  /// Change the way movement keys are interpreted.
  pub fn set_movement(self, movement: Movement) -> Self {
    Camera {
      movement,
      held: [false; 4],
      ..self
    }
  }

  /// Current position.
  pub fn position(&self) -> Vector3<f32> {
    self.position
  }

  /// Current front vector (unit length).
  pub fn front(&self) -> Vector3<f32> {
    self.front
  }

  /// World-up vector; always `(0, 1, 0)`.
  pub fn world_up(&self) -> Vector3<f32> {
    self.world_up
  }

  /// Yaw, in degrees.
  pub fn yaw(&self) -> f32 {
    self.yaw
  }

  /// Pitch, in degrees, within `[-PITCH_LIMIT, PITCH_LIMIT]`.
  pub fn pitch(&self) -> f32 {
    self.pitch
  }

  /// Vertical field of view, in degrees, within `[FOV_MIN, FOV_MAX]`.
  pub fn fov(&self) -> f32 {
    self.fov
  }

  /// Movement mode.
  pub fn movement(&self) -> Movement {
    self.movement
  }

  /// Unit vector a translation in `dir` moves along.
  pub fn direction_vector(&self, dir: Direction) -> Vector3<f32> {
    match dir {
      Direction::Forward => self.front,
      Direction::Backward => -self.front,
      Direction::Left => -self.right(),
      Direction::Right => self.right(),
    }
  }

  fn right(&self) -> Vector3<f32> {
    self.front.cross(self.world_up).normalize()
  }

  /// Translate by `CAMERA_SPEED · delta_time` in `dir`.
  pub fn translate(&mut self, dir: Direction, delta_time: f32) {
    self.position += self.direction_vector(dir) * (CAMERA_SPEED * delta_time);
  }

  /// A movement key went down.
  pub fn key_pressed(&mut self, dir: Direction, delta_time: f32) {
    match self.movement {
      Movement::OnPress => self.translate(dir, delta_time),
      Movement::Continuous => self.held[dir.index()] = true,
    }
  }

  /// A movement key went up.
  pub fn key_released(&mut self, dir: Direction) {
    self.held[dir.index()] = false;
  }

  /// Per-frame update; translates along every held direction in [`Movement::Continuous`] mode and
  /// does nothing otherwise.
  pub fn step(&mut self, delta_time: f32) {
    if self.movement != Movement::Continuous {
      return;
    }

    for dir in Direction::ALL {
      if self.held[dir.index()] {
        self.translate(dir, delta_time);
      }
    }
  }

  /// The cursor moved to `(x, y)`, in window space.
  pub fn cursor_moved(&mut self, x: f32, y: f32) {
    if self.first_mouse {
      self.last_cursor = [x, y];
      self.first_mouse = false;
      return;
    }

    let [last_x, last_y] = self.last_cursor;
    // window y grows downward
    let x_offset = (x - last_x) * MOUSE_SENSITIVITY;
    let y_offset = (last_y - y) * MOUSE_SENSITIVITY;
    self.last_cursor = [x, y];

    self.yaw += x_offset;
    self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    self.front = front_from_angles(self.yaw, self.pitch);
  }

  /// Forget the last cursor position; the next cursor event seeds it again without rotating.
  pub fn reset_mouse(&mut self) {
    self.first_mouse = true;
  }

  /// Vertical scroll by `dy`; scrolling up narrows the field of view.
  pub fn scrolled(&mut self, dy: f32) {
    self.fov = (self.fov - dy).clamp(FOV_MIN, FOV_MAX);
  }

  /// World-to-view matrix.
  pub fn view(&self) -> Matrix4<f32> {
    let eye = Point3::from_vec(self.position);
    Matrix4::look_at_rh(eye, eye + self.front, self.world_up)
  }

  /// Perspective projection for the given aspect ratio (width / height).
  pub fn projection(&self, aspect_ratio: f32) -> Matrix4<f32> {
    perspective(Deg(self.fov), aspect_ratio, Z_NEAR, Z_FAR)
  }
}

/// Unit front vector for the given yaw and pitch, in degrees.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vector3<f32> {
  let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());

  Vector3::new(
    yaw.cos() * pitch.cos(),
    pitch.sin(),
    yaw.sin() * pitch.cos(),
  )
  .normalize()
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{InnerSpace as _, MetricSpace as _, Vector4};

  const EPS: f32 = 1e-5;

  fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!(a.distance(b) < EPS, "{:?} != {:?}", a, b);
  }

  #[test]
  fn initial_state() {
    let cam = Camera::default();

    assert_eq!(cam.position(), Vector3::new(0., 0., 3.));
    assert_eq!(cam.front(), Vector3::new(0., 0., -1.));
    assert_eq!(cam.world_up(), Vector3::new(0., 1., 0.));
    assert_eq!(cam.yaw(), -90.);
    assert_eq!(cam.pitch(), 0.);
    assert_eq!(cam.fov(), 45.);
  }

  #[test]
  fn first_cursor_event_does_not_rotate() {
    let mut cam = Camera::default();
    let front = cam.front();

    cam.cursor_moved(1234., -567.);

    assert_eq!(cam.yaw(), -90.);
    assert_eq!(cam.pitch(), 0.);
    assert_eq!(cam.front(), front);
  }

  #[test]
  fn reset_mouse_reseeds_without_rotating() {
    let mut cam = Camera::default();
    cam.cursor_moved(0., 0.);
    cam.cursor_moved(10., 0.);
    let yaw = cam.yaw();

    cam.reset_mouse();
    cam.cursor_moved(500., 500.);
    assert_eq!(cam.yaw(), yaw);

    cam.cursor_moved(510., 500.);
    assert!((cam.yaw() - (yaw + 1.)).abs() < EPS);
  }

  #[test]
  fn horizontal_sweep_turns_yaw() {
    let mut cam = Camera::default();
    cam.cursor_moved(400., 300.);

    for n in 1..=120 {
      cam.cursor_moved(400. + 10. * n as f32, 300.);

      let yaw = -90. + n as f32;
      assert!((cam.yaw() - yaw).abs() < 1e-3);

      let yaw = yaw.to_radians();
      assert_close(cam.front(), Vector3::new(yaw.cos(), 0., yaw.sin()));
    }

    assert!((cam.yaw() - 30.).abs() < 1e-3);
  }

  #[test]
  fn cursor_moving_up_pitches_up() {
    let mut cam = Camera::default();
    cam.cursor_moved(0., 100.);
    cam.cursor_moved(0., 50.);

    assert!((cam.pitch() - 5.).abs() < EPS);
    assert!(cam.front().y > 0.);
  }

  #[test]
  fn pitch_is_clamped() {
    let mut cam = Camera::default();
    cam.cursor_moved(0., 0.);

    cam.cursor_moved(0., -1e6);
    assert_eq!(cam.pitch(), 89.);

    cam.cursor_moved(0., 1e6);
    assert_eq!(cam.pitch(), -89.);
  }

  #[test]
  fn front_stays_unit_length() {
    let mut cam = Camera::default();
    let path = [
      (0., 0.),
      (13., -7.),
      (-250., 33.),
      (1e4, 1e4),
      (-3e3, -9e5),
      (0.5, 0.25),
    ];

    for (x, y) in path {
      cam.cursor_moved(x, y);
      assert!((cam.front().magnitude() - 1.).abs() < 1e-6);
      assert!(cam.pitch() >= -PITCH_LIMIT && cam.pitch() <= PITCH_LIMIT);
    }
  }

  #[test]
  fn scroll_clamps_fov() {
    let mut cam = Camera::default();

    cam.scrolled(10.);
    assert_eq!(cam.fov(), 35.);

    cam.scrolled(100.);
    assert_eq!(cam.fov(), FOV_MIN);

    cam.scrolled(-3.);
    assert_eq!(cam.fov(), 4.);

    cam.scrolled(-1000.);
    assert_eq!(cam.fov(), FOV_MAX);
  }

  #[test]
  fn key_presses_accumulate_scaled_displacements() {
    let mut cam = Camera::default();
    let events = [
      (Direction::Forward, 0.016),
      (Direction::Forward, 0.033),
      (Direction::Right, 0.020),
      (Direction::Backward, 0.010),
      (Direction::Left, 0.050),
    ];

    let mut expected = cam.position();
    for (dir, dt) in events {
      expected += cam.direction_vector(dir) * (CAMERA_SPEED * dt);
      cam.key_pressed(dir, dt);
    }

    assert_close(cam.position(), expected);
    // front is -Z and right is +X for the initial orientation
    assert_close(
      cam.position(),
      Vector3::new(
        CAMERA_SPEED * (0.020 - 0.050),
        0.,
        3. - CAMERA_SPEED * (0.016 + 0.033 - 0.010),
      ),
    );
  }

  #[test]
  fn continuous_movement_translates_per_frame() {
    let mut cam = Camera::default().set_movement(Movement::Continuous);

    cam.key_pressed(Direction::Forward, 0.5);
    // pressing alone does not move in continuous mode
    assert_eq!(cam.position(), Vector3::new(0., 0., 3.));

    cam.step(0.1);
    cam.step(0.1);
    assert_close(cam.position(), Vector3::new(0., 0., 3. - 2. * 0.1 * CAMERA_SPEED));

    cam.key_released(Direction::Forward);
    cam.step(0.1);
    assert_close(cam.position(), Vector3::new(0., 0., 3. - 2. * 0.1 * CAMERA_SPEED));
  }

  #[test]
  fn step_is_inert_in_on_press_mode() {
    let mut cam = Camera::default();

    cam.key_released(Direction::Left);
    cam.step(1.);
    assert_eq!(cam.position(), Vector3::new(0., 0., 3.));
  }

  #[test]
  fn view_looks_along_front() {
    let cam = Camera::default();
    let view = cam.view();

    // the point straight ahead lands on the negative view-space Z axis
    let ahead = view * Vector4::new(0., 0., 0., 1.);
    assert!((ahead.x).abs() < EPS);
    assert!((ahead.y).abs() < EPS);
    assert!((ahead.z + 3.).abs() < EPS);
  }

  #[test]
  fn projection_follows_fov() {
    let mut cam = Camera::default();
    let wide = cam.projection(800. / 600.);

    cam.scrolled(20.);
    let narrow = cam.projection(800. / 600.);

    // a narrower field of view magnifies
    assert!(narrow.y.y > wide.y.y);
  }
}
