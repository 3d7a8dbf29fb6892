//! Build a program out of a broken fragment shader.
//!
//! The build must not stop at the first failure: the compile log and the link log are both
//! reported, a program object still comes out, and it is simply unusable. Looking up a uniform
//! on it yields an unbound uniform that can be set without effect.

use crate::{DemoError, Example, LoopFeedback, PlatformServices};
use lumen::shader::{ProgramError, StageError, StageType};
use lumen::time::FrameTime;
use lumen_gl::GL33;

const VS: &str = include_str!("hello-triangle-vs.glsl");

const BROKEN_FS: &str = "#version 330 core
out vec4 frag_color;
uniform float u_alpha;

void main() {
  frag_color = vec4(1., 0.5, 0.2, u_alpha)
}
";

pub struct LocalExample;

impl Example for LocalExample {
  const TITLE: &'static str = "Funtest: unlinked program";

  fn bootstrap(_: &mut impl PlatformServices, context: &mut GL33) -> Result<Self, DemoError> {
    let built = context.build_program(VS, BROKEN_FS);

    assert!(!built.is_clean());
    assert!(built.diagnostics.iter().any(|e| matches!(
      e,
      ProgramError::StageError(StageError::CompilationFailed(StageType::FragmentShader, _))
    )));
    assert!(built
      .diagnostics
      .iter()
      .any(|e| matches!(e, ProgramError::LinkFailed(_))));

    let program = built.ignore_diagnostics();
    assert!(!program.is_linked());

    let u_alpha = program.uniform::<f32>("u_alpha");
    assert!(!u_alpha.is_bound());
    program.set(&u_alpha, 1.);

    log::info!("broken program reported and left unlinked");

    Ok(LocalExample)
  }

  fn render_frame(&mut self, _: &FrameTime, _: &mut GL33) -> LoopFeedback {
    LoopFeedback::Exit
  }
}
