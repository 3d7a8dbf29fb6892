//! Platform services implementation.

use crate::CLIOpts;
use lumen::camera::Movement;
use lumen_demos::PlatformServices;
use std::path::PathBuf;

/// Desktop implementation of the [`PlatformServices`] API.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  texture_root: PathBuf,
  strict_shaders: bool,
  movement: Movement,
}

impl DesktopPlatformServices {
  pub fn new(cli_opts: &CLIOpts) -> Self {
    let movement = if cli_opts.continuous_movement {
      Movement::Continuous
    } else {
      Movement::OnPress
    };

    Self {
      texture_root: cli_opts.textures.clone(),
      strict_shaders: cli_opts.strict_shaders,
      movement,
    }
  }
}

impl PlatformServices for DesktopPlatformServices {
  fn texture_path(&self, name: &str) -> PathBuf {
    self.texture_root.join(name)
  }

  fn strict_shaders(&self) -> bool {
    self.strict_shaders
  }

  fn movement(&self) -> Movement {
    self.movement
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use structopt::StructOpt as _;

  #[test]
  fn defaults() {
    let opts = CLIOpts::from_iter(["lumen-demos-desktop", "camera"]);
    let services = DesktopPlatformServices::new(&opts);

    assert_eq!(
      services.texture_path("container.jpg"),
      PathBuf::from("resources/textures/container.jpg")
    );
    assert!(!services.strict_shaders());
    assert_eq!(services.movement(), Movement::OnPress);
  }

  #[test]
  fn flags() {
    let opts = CLIOpts::from_iter([
      "lumen-demos-desktop",
      "-t",
      "/tmp/assets",
      "--strict-shaders",
      "--continuous-movement",
      "camera",
    ]);
    let services = DesktopPlatformServices::new(&opts);

    assert_eq!(
      services.texture_path("wall.jpg"),
      PathBuf::from("/tmp/assets/wall.jpg")
    );
    assert!(services.strict_shaders());
    assert_eq!(services.movement(), Movement::Continuous);
  }
}
