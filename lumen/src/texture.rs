//! Texture sampling parameters and texel formats.

/// How to wrap texture coordinates while sampling textures?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  /// If textures coordinates lay outside of *[0;1]*, they will be clamped to either *0* or *1* for
  /// every components.
  ClampToEdge,
  /// Textures coordinates are repeated if they lay outside of *[0;1]*. Picture this as:
  ///
  /// ```ignore
  /// // given the frac function returning the fractional part of a floating number:
  /// coord_ith = frac(coord_ith); // always between [0;1]
  /// ```
  Repeat,
  /// Same as `Repeat` but it will alternatively repeat between *[0;1]* and *[1;0]*.
  MirroredRepeat,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MinFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
  /// This filter will select the nearest mipmap between two samples and will perform a nearest
  /// interpolation afterwards.
  NearestMipmapNearest,
  /// This filter will select the nearest mipmap between two samples and will perform a linear
  /// interpolation afterwards.
  NearestMipmapLinear,
  /// This filter will linearly interpolate between two mipmaps, which selected texels would have
  /// been interpolated with a nearest filter.
  LinearMipmapNearest,
  /// This filter will linearly interpolate between two mipmaps, which selected texels would have
  /// been linarily interpolated as well.
  LinearMipmapLinear,
}

impl MinFilter {
  /// Whether sampling with this filter reads mipmap levels.
  pub fn uses_mipmaps(self) -> bool {
    !matches!(self, MinFilter::Nearest | MinFilter::Linear)
  }
}

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
}

/// A sampler configures how a texture is read in shaders.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampler {
  /// How to wrap the *s* coordinate.
  pub wrap_s: Wrap,
  /// How to wrap the *t* coordinate.
  pub wrap_t: Wrap,
  /// Minification filter.
  pub min_filter: MinFilter,
  /// Magnification filter.
  pub mag_filter: MagFilter,
}

impl Default for Sampler {
  /// Default value is:
  ///
  /// - `wrap_s`: [`Wrap::Repeat`]
  /// - `wrap_t`: [`Wrap::Repeat`]
  /// - `min_filter`: [`MinFilter::LinearMipmapLinear`]
  /// - `mag_filter`: [`MagFilter::Linear`]
  fn default() -> Self {
    Sampler {
      wrap_s: Wrap::Repeat,
      wrap_t: Wrap::Repeat,
      min_filter: MinFilter::LinearMipmapLinear,
      mag_filter: MagFilter::Linear,
    }
  }
}

/// Options used when loading a texture from an image file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextureOpt {
  sampler: Sampler,
  flip_vertical: bool,
}

impl Default for TextureOpt {
  /// Defaults:
  ///
  /// - `sampler` set to `Sampler::default()`.
  /// - `flip_vertical` set to `true`, so that the first texel row is the bottom of the image.
  fn default() -> Self {
    TextureOpt {
      sampler: Sampler::default(),
      flip_vertical: true,
    }
  }
}

impl TextureOpt {
  /// Change the sampler.
  #[inline]
  pub fn set_sampler(self, sampler: Sampler) -> Self {
    TextureOpt { sampler, ..self }
  }

  /// Get the sampler.
  #[inline]
  pub fn sampler(&self) -> Sampler {
    self.sampler
  }

  /// Flip (or not) the image vertically while decoding it.
  #[inline]
  pub fn set_flip_vertical(self, flip_vertical: bool) -> Self {
    TextureOpt {
      flip_vertical,
      ..self
    }
  }

  /// Whether the image is flipped vertically while decoding it.
  #[inline]
  pub fn flip_vertical(&self) -> bool {
    self.flip_vertical
  }
}

/// Format of 8-bit-per-channel texels.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TexelFormat {
  /// Red, green and blue.
  RGB,
  /// Red, green, blue and alpha.
  RGBA,
}

impl TexelFormat {
  /// Pick the format matching a channel count; only 3 and 4 channels are supported.
  pub fn from_channels(channels: u8) -> Option<Self> {
    match channels {
      3 => Some(TexelFormat::RGB),
      4 => Some(TexelFormat::RGBA),
      _ => None,
    }
  }

  /// Number of channels (and bytes) per texel.
  pub fn channels(self) -> usize {
    match self {
      TexelFormat::RGB => 3,
      TexelFormat::RGBA => 4,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sampler_defaults() {
    let sampler = Sampler::default();

    assert_eq!(sampler.wrap_s, Wrap::Repeat);
    assert_eq!(sampler.wrap_t, Wrap::Repeat);
    assert_eq!(sampler.min_filter, MinFilter::LinearMipmapLinear);
    assert_eq!(sampler.mag_filter, MagFilter::Linear);
    assert!(sampler.min_filter.uses_mipmaps());
  }

  #[test]
  fn only_mipmap_filters_use_mipmaps() {
    assert!(!MinFilter::Nearest.uses_mipmaps());
    assert!(!MinFilter::Linear.uses_mipmaps());
    assert!(MinFilter::NearestMipmapNearest.uses_mipmaps());
    assert!(MinFilter::LinearMipmapNearest.uses_mipmaps());
  }

  #[test]
  fn texture_opt_defaults_to_flipping() {
    let opt = TextureOpt::default();
    assert!(opt.flip_vertical());
    assert!(!opt.set_flip_vertical(false).flip_vertical());
  }

  #[test]
  fn format_from_channels() {
    assert_eq!(TexelFormat::from_channels(3), Some(TexelFormat::RGB));
    assert_eq!(TexelFormat::from_channels(4), Some(TexelFormat::RGBA));
    assert_eq!(TexelFormat::from_channels(1), None);
    assert_eq!(TexelFormat::from_channels(2), None);
    assert_eq!(TexelFormat::RGBA.channels(), 4);
  }
}
