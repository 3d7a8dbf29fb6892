//! Check which way up images land on the GPU.
//!
//! A 2×2 image with a red top row and a blue bottom row is written to a temporary file and
//! uploaded with the default options. OpenGL stores rows from the bottom up, so once flipped, the
//! first row read back must be the blue one.

use crate::{DemoError, Example, LoopFeedback, PlatformServices};
use image::{Rgb, RgbImage};
use lumen::texture::{TexelFormat, TextureOpt};
use lumen::time::FrameTime;
use lumen_gl::GL33;
use std::env;

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

pub struct LocalExample;

impl Example for LocalExample {
  const TITLE: &'static str = "Funtest: texture flip";

  fn bootstrap(_: &mut impl PlatformServices, context: &mut GL33) -> Result<Self, DemoError> {
    let path = env::temp_dir().join(format!("lumen-funtest-flip-{}.png", std::process::id()));
    let img = RgbImage::from_fn(2, 2, |_, y| if y == 0 { Rgb(RED) } else { Rgb(BLUE) });

    if let Err(e) = img.save(&path) {
      panic!("cannot write {}: {}", path.display(), e);
    }

    let texture = context.upload_texture(&path, TextureOpt::default());
    let _ = std::fs::remove_file(&path);
    let texture = texture?;

    let texels = texture.read_texels(TexelFormat::RGB);
    assert_eq!(texture.size(), [2, 2]);
    assert_eq!(&texels[..3], &BLUE, "first row should be the bottom of the image");
    assert_eq!(&texels[6..9], &RED, "last row should be the top of the image");

    log::info!("texture rows stored bottom-up");

    Ok(LocalExample)
  }

  fn render_frame(&mut self, _: &FrameTime, _: &mut GL33) -> LoopFeedback {
    LoopFeedback::Exit
  }
}
