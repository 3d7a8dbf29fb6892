//! Animate a quad from the vertex shader.
//!
//! Vertex positions for each keyframe are stored in a 1D array texture, one layer per keyframe,
//! one texel per vertex. Every frame, the animation time `u_t` sweeps *[0; 3]* and the vertex
//! shader picks the keyframe from its integral part: the vertex attribute itself for keyframe 0,
//! then the texture layers.
//!
//! The shader reads a layer at `gl_VertexID / 4.0`. With indexed drawing, `gl_VertexID` is the
//! index being drawn, so the six drawn vertices only ever address four texture coordinates and
//! the vertices shared by both triangles read the same texels. The previous and next keyframes
//! are also always the same one, so positions jump from a keyframe to the next instead of being
//! blended.

use crate::{
  shared::{build_program, CLEAR_COLOR, POSITION_LAYOUT, QUAD_INDICES},
  DemoError, Example, LoopFeedback, PlatformServices,
};
use lumen::time::FrameTime;
use lumen_gl::gl33::{Program, Tess, Texture, TextureUnit, Uniform};
use lumen_gl::GL33;

const VS: &str = include_str!("hello-shader-vs.glsl");
const FS: &str = include_str!("hello-shader-fs.glsl");

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
   0.9,  0.9, 0.,
   0.9, -0.9, 0.,
  -0.9, -0.9, 0.,
  -0.9,  0.9, 0.,
];

/// Texels per keyframe layer.
pub const KEYFRAME_WIDTH: u32 = 4;

/// Number of keyframe layers.
pub const KEYFRAME_LAYERS: u32 = 2;

/// Keyframe positions, layer after layer.
#[rustfmt::skip]
pub const KEYFRAMES: [[f32; 3]; 8] = [
  // first layer
  [ 0.5,  0.5, 0.],
  [ 0.5, -0.5, 0.],
  [-0.5, -0.5, 0.],
  [-0.5,  0.5, 0.],
  // second layer
  [ 0.1,  0.1, 0.],
  [ 0.1, -0.1, 0.],
  [-0.1, -0.1, 0.],
  [-0.1,  0.1, 0.],
];

/// Animation time uploaded as `u_t` at time `now` (in seconds); always in *[0; 3]*.
pub fn animation_time(now: f64) -> f32 {
  ((now.sin() + 1.) * 1.5) as f32
}

/// Where the vertex shader reads a position from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Keyframe {
  /// The vertex attribute.
  Attribute,
  /// A layer of the keyframe texture.
  Layer(u32),
}

/// Keyframe selected for animation time `t`.
pub fn keyframe(t: f32) -> Keyframe {
  match t.floor() as i32 {
    frame if frame < 1 => Keyframe::Attribute,
    1 => Keyframe::Layer(0),
    _ => Keyframe::Layer(1),
  }
}

/// Texture coordinate the vertex shader samples a keyframe layer at.
pub fn sample_coordinate(vertex_id: u32) -> f32 {
  vertex_id as f32 / KEYFRAME_WIDTH as f32
}

/// Value read from a keyframe layer at texture coordinate `s`, as the GPU samples it: texels are
/// stored clamped to *[0; 1]*, then linearly filtered with clamp-to-edge wrapping.
pub fn sample_layer(layer: u32, s: f32) -> [f32; 3] {
  let width = KEYFRAME_WIDTH as usize;
  let row = &KEYFRAMES[layer as usize * width..(layer as usize + 1) * width];
  let stored = |i: usize| row[i].map(|c| c.clamp(0., 1.));

  let u = s * KEYFRAME_WIDTH as f32 - 0.5;
  let base = u.floor();
  let frac = u - base;
  let texel = |i: f32| stored(i.max(0.).min((width - 1) as f32) as usize);

  let (a, b) = (texel(base), texel(base + 1.));
  [
    a[0] + (b[0] - a[0]) * frac,
    a[1] + (b[1] - a[1]) * frac,
    a[2] + (b[2] - a[2]) * frac,
  ]
}

/// Position the vertex shader outputs for the vertex `vertex_id` at animation time `t`.
pub fn animated_position(vertex_id: u32, t: f32) -> [f32; 3] {
  match keyframe(t) {
    Keyframe::Attribute => {
      let i = vertex_id as usize * 3;
      [VERTICES[i], VERTICES[i + 1], VERTICES[i + 2]]
    }

    Keyframe::Layer(layer) => sample_layer(layer, sample_coordinate(vertex_id)),
  }
}

pub struct LocalExample {
  keyframes: Texture,
  tess: Tess,
  program: Program,
  u_t: Uniform<f32>,
  u_frame_positions: Uniform<TextureUnit>,
}

impl Example for LocalExample {
  const TITLE: &'static str = "HelloShader";

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut GL33,
  ) -> Result<Self, DemoError> {
    let program = build_program(platform, context, VS, FS)?;
    let tess = context.upload_geometry(&VERTICES, 3, &POSITION_LAYOUT, Some(&QUAD_INDICES))?;
    let keyframes = context.new_texture_1d_array(KEYFRAME_WIDTH, KEYFRAME_LAYERS, &KEYFRAMES)?;

    Ok(LocalExample {
      keyframes,
      tess,
      u_t: program.uniform("u_t"),
      u_frame_positions: program.uniform("u_frame_positions"),
      program,
    })
  }

  fn render_frame(&mut self, time: &FrameTime, context: &mut GL33) -> LoopFeedback {
    context.clear(CLEAR_COLOR);

    let t = animation_time(time.now() as f64);
    log::debug!("u_t: {} ({:?})", t, keyframe(t));

    self.program.set(&self.u_t, t);
    self.program.set(&self.u_frame_positions, TextureUnit(0));
    self.keyframes.bind(TextureUnit(0));
    self.tess.render();

    LoopFeedback::Continue
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn animation_time_stays_in_range() {
    for i in -2000..2000 {
      let t = animation_time(i as f64 * 0.01);
      assert!((0. ..=3.).contains(&t), "u_t = {}", t);
    }

    assert_eq!(animation_time(0.), 1.5);
    assert!((animation_time(std::f64::consts::FRAC_PI_2) - 3.).abs() < 1e-6);
    assert!(animation_time(-std::f64::consts::FRAC_PI_2).abs() < 1e-6);
  }

  #[test]
  fn keyframe_follows_integral_part() {
    assert_eq!(keyframe(0.), Keyframe::Attribute);
    assert_eq!(keyframe(0.99), Keyframe::Attribute);
    assert_eq!(keyframe(1.), Keyframe::Layer(0));
    assert_eq!(keyframe(1.5), Keyframe::Layer(0));
    assert_eq!(keyframe(2.), Keyframe::Layer(1));
    assert_eq!(keyframe(3.), Keyframe::Layer(1));
  }

  #[test]
  fn shared_vertices_read_the_same_texels() {
    let coords: Vec<f32> = QUAD_INDICES.iter().map(|&i| sample_coordinate(i)).collect();

    assert_eq!(coords, [0., 0.25, 0.75, 0.25, 0.5, 0.75]);

    // indices 1 and 3 are drawn twice and land on the same positions both times
    for t in [1.2, 2.5] {
      assert_eq!(animated_position(1, t), animated_position(QUAD_INDICES[3], t));
      assert_eq!(animated_position(3, t), animated_position(QUAD_INDICES[5], t));
    }
  }

  #[test]
  fn keyframe_zero_uses_the_attribute() {
    assert_eq!(animated_position(0, 0.5), [0.9, 0.9, 0.]);
    assert_eq!(animated_position(2, 0.5), [-0.9, -0.9, 0.]);
  }

  #[test]
  fn layers_are_sampled_between_texels() {
    // vertex 0 reads the left edge, clamped to the first texel
    assert_eq!(animated_position(0, 1.5), [0.5, 0.5, 0.]);
    // vertex 1 reads halfway between texels 0 and 1; the negative component is stored as 0
    assert_eq!(animated_position(1, 1.5), [0.5, 0.25, 0.]);
    // second layer
    assert_eq!(animated_position(0, 2.5), [0.1, 0.1, 0.]);
    assert_eq!(animated_position(2, 2.5), [0.05, 0., 0.]);
  }
}
