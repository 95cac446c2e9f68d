#![forbid(unsafe_code)]

//! Module for pixel formats.
//!
//! PNG stores pixels in many formats, but the decoder's output is always
//! [`RGBA8`]. Palette entries are always [`RGB8`].
//!
//! ## Between Bit Depths
//! When a channel has fewer than 8 bits, the decoder keeps the bit pattern as
//! the top bits of the output and then copies that pattern down however many
//! times is required to fill in all of the lower bits. For 1, 2, and 4 bit
//! channels this is exactly the same as `value * 255 / max_value`.

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8-bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An 8-bits per channel RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  /// Makes a gray pixel.
  #[inline]
  #[must_use]
  pub const fn gray(y: u8, a: u8) -> Self {
    Self { r: y, g: y, b: y, a }
  }

  /// The pixel's bytes as `r`, `g`, `b`, `a`.
  #[inline]
  #[must_use]
  pub const fn to_array(self) -> [u8; 4] {
    [self.r, self.g, self.b, self.a]
  }

  /// The pixel packed into a `u32` with `r` in the high byte and `a` in the
  /// low byte.
  #[inline]
  #[must_use]
  pub const fn to_u32_be(self) -> u32 {
    u32::from_be_bytes(self.to_array())
  }
}
impl From<RGB8> for RGBA8 {
  /// Opaque.
  #[inline]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    Self { r, g, b, a: 0xFF }
  }
}
impl From<[u8; 4]> for RGBA8 {
  #[inline]
  fn from([r, g, b, a]: [u8; 4]) -> Self {
    Self { r, g, b, a }
  }
}

#[test]
fn test_rgba8_to_u32_be() {
  let p = RGBA8 { r: 0x11, g: 0x22, b: 0x33, a: 0x44 };
  assert_eq!(p.to_u32_be(), 0x1122_3344);
  assert_eq!(RGBA8::from(RGB8 { r: 1, g: 2, b: 3 }), RGBA8 { r: 1, g: 2, b: 3, a: 255 });
  assert_eq!(RGBA8::gray(7, 9).to_array(), [7, 7, 7, 9]);
}
