#![forbid(unsafe_code)]

//! Provides the decoded image type.

use alloc::vec::Vec;

use crate::pixel_formats::RGBA8;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// You don't ever need to call this function yourself, but it's how
/// [`ImageData`] converts 2d coordinates into pixel index values. If you'd like
/// to use the exact same function it does for some reason, you can.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// Rounds to the nearest integer, with halves going up (so `-0.5` becomes `0`
/// and `2.5` becomes `3`).
///
/// Non-finite values, and values outside the `i64` range, give `None`.
#[inline]
#[must_use]
fn round_half_up(v: f64) -> Option<i64> {
  let shifted = v + 0.5;
  if !(shifted >= i64::MIN as f64 && shifted < i64::MAX as f64) {
    return None;
  }
  // `as` truncates toward zero, so step down for negatives.
  let t = shifted as i64;
  if (t as f64) > shifted {
    t.checked_sub(1)
  } else {
    Some(t)
  }
}

/// A decoded image.
///
/// * `pixels` is always `width * height * 4` bytes: RGBA8 pixels, row-major,
///   starting at the top left.
/// * `trailer` is every byte that came after the end of the PNG data. It's not
///   interpreted at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImageData {
  width: u32,
  height: u32,
  pixels: Vec<u8>,
  trailer: Vec<u8>,
}
impl ImageData {
  /// The caller must ensure `pixels.len() == width * height * 4`.
  #[inline]
  #[must_use]
  pub(crate) fn new(width: u32, height: u32, pixels: Vec<u8>, trailer: Vec<u8>) -> Self {
    debug_assert_eq!(pixels.len(), xy_width_to_index(0, height, width) * 4);
    Self { width, height, pixels, trailer }
  }

  /// Width in pixels.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  /// Height in pixels.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  /// The RGBA8 bytes of the image.
  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[u8] {
    &self.pixels
  }

  /// The image as a slice of [`RGBA8`] values.
  #[inline]
  #[must_use]
  pub fn rgba(&self) -> &[RGBA8] {
    bytemuck::cast_slice(&self.pixels)
  }

  /// Bytes that followed the `IEND` chunk.
  #[inline]
  #[must_use]
  pub fn trailer(&self) -> &[u8] {
    &self.trailer
  }

  /// Gives up the image, returning the RGBA8 bytes and the trailer bytes.
  #[inline]
  #[must_use]
  pub fn into_pixels(self) -> (Vec<u8>, Vec<u8>) {
    (self.pixels, self.trailer)
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_rgba(&self, x: u32, y: u32) -> Option<RGBA8> {
    if x < self.width && y < self.height {
      self.rgba().get(xy_width_to_index(x, y, self.width)).copied()
    } else {
      None
    }
  }

  /// Gets the pixel nearest to `(x, y)` packed as `0xRRGGBBAA`.
  ///
  /// Each coordinate is rounded to the nearest integer first. Any position
  /// outside the image gives `0`, which is also what a fully transparent black
  /// pixel looks like.
  #[must_use]
  pub fn get_pixel(&self, x: f64, y: f64) -> u32 {
    let (Some(x), Some(y)) = (round_half_up(x), round_half_up(y)) else {
      return 0;
    };
    match (u32::try_from(x), u32::try_from(y)) {
      (Ok(x), Ok(y)) => self.get_rgba(x, y).map(RGBA8::to_u32_be).unwrap_or(0),
      _ => 0,
    }
  }
}
