//! Frame timing.

/// Frame-to-frame timing state.
///
/// [`FrameTime::tick`] must be called exactly once per frame, at the very start of the iteration,
/// with the current time of a monotonic clock, in seconds. Everything that moves during that frame
/// is scaled by [`FrameTime::delta_time`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
  last_frame: f32,
  delta_time: f32,
}

impl FrameTime {
  /// Timing state before the first frame: both the last frame time and the delta are zero.
  pub fn new() -> Self {
    Self::default()
  }

  /// Start a new frame at time `now` and return the delta with the previous one.
  pub fn tick(&mut self, now: f32) -> f32 {
    self.delta_time = now - self.last_frame;
    self.last_frame = now;
    self.delta_time
  }

  /// Seconds elapsed between the previous frame and the current one.
  pub fn delta_time(&self) -> f32 {
    self.delta_time
  }

  /// Time at which the current frame started.
  pub fn now(&self) -> f32 {
    self.last_frame
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_tick_measures_from_zero() {
    let mut time = FrameTime::new();

    assert_eq!(time.tick(0.25), 0.25);
    assert_eq!(time.now(), 0.25);
  }

  #[test]
  fn delta_is_difference_with_previous_tick() {
    let mut time = FrameTime::new();

    time.tick(1.0);
    time.tick(1.5);
    assert_eq!(time.delta_time(), 0.5);

    time.tick(1.75);
    assert_eq!(time.delta_time(), 0.25);
    assert_eq!(time.now(), 1.75);
  }
}
