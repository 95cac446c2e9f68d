use super::*;

use bitfrob::u8_replicate_bits;

/// Reads sample number `n` of an unfiltered scanline.
///
/// Samples are packed high bits first, so with 2-bit samples the first sample
/// of each byte is `0b1100_0000`.
#[inline]
pub fn unpack_sample(scanline: &[u8], bit_depth: u8, n: usize) -> PngResult<u8> {
  Ok(match bit_depth {
    1 => (scanline[n >> 3] >> (7 - (n & 7))) & 0b1,
    2 => (scanline[n >> 2] >> ((3 - (n & 3)) << 1)) & 0b11,
    4 => (scanline[n >> 1] >> ((1 - (n & 1)) << 2)) & 0b1111,
    8 => scanline[n],
    other => return Err(PngError::UnsupportedBitDepth(other)),
  })
}

/// Turns unfiltered scanlines into RGBA8 pixels.
///
/// Samples below 8 bits are scaled up to the full `0..=255` range (the bit
/// pattern is replicated into the lower bits), except for palette indexes,
/// which are used as-is.
#[derive(Debug, Clone, Copy)]
pub struct PixelSynthesizer<'b> {
  header: IHDR,
  palette: &'b [RGB8],
  transparency: Option<tRNS<'b>>,
}
impl<'b> PixelSynthesizer<'b> {
  /// The palette and transparency are only used with indexed color.
  #[inline]
  #[must_use]
  pub fn new(header: IHDR, palette: Option<PLTE<'b>>, transparency: Option<tRNS<'b>>) -> Self {
    let palette = match palette {
      Some(plte) if header.color_type == PngColorType::Index => plte.entries(),
      _ => &[],
    };
    let transparency = transparency.filter(|_| header.color_type == PngColorType::Index);
    Self { header, palette, transparency }
  }

  /// Reads all of the samples of pixel `x` in the scanline.
  ///
  /// Unused entries of the output are 0.
  #[inline]
  pub fn samples(&self, scanline: &[u8], x: usize) -> PngResult<[u8; 4]> {
    let count = self.header.samples_per_pixel();
    let mut samples = [0_u8; 4];
    for (i, s) in samples.iter_mut().enumerate().take(count) {
      *s = unpack_sample(scanline, self.header.bit_depth, x * count + i)?;
    }
    Ok(samples)
  }

  #[inline]
  fn scale(&self, sample: u8) -> u8 {
    if self.header.bit_depth < 8 {
      u8_replicate_bits(u32::from(self.header.bit_depth), sample)
    } else {
      sample
    }
  }

  /// Converts one pixel's samples into a color.
  #[inline]
  pub fn to_rgba(&self, samples: [u8; 4]) -> PngResult<RGBA8> {
    Ok(match self.header.color_type {
      PngColorType::Y => RGBA8::gray(self.scale(samples[0]), 0xFF),
      PngColorType::YA => RGBA8::gray(self.scale(samples[0]), self.scale(samples[1])),
      PngColorType::RGB => RGBA8 {
        r: self.scale(samples[0]),
        g: self.scale(samples[1]),
        b: self.scale(samples[2]),
        a: 0xFF,
      },
      PngColorType::RGBA => RGBA8 {
        r: self.scale(samples[0]),
        g: self.scale(samples[1]),
        b: self.scale(samples[2]),
        a: self.scale(samples[3]),
      },
      PngColorType::Index => {
        let i = samples[0];
        let RGB8 { r, g, b } =
          *self.palette.get(usize::from(i)).ok_or(PngError::InvalidPaletteIndex(i))?;
        let a = self.transparency.map(|trns| trns.alpha_of(i)).unwrap_or(0xFF);
        RGBA8 { r, g, b, a }
      }
    })
  }

  /// Appends the RGBA8 bytes of every pixel of the scanline to `out`.
  pub fn extend_scanline(&self, scanline: &[u8], out: &mut Vec<u8>) -> PngResult<()> {
    for x in 0..(self.header.width as usize) {
      let rgba = self.to_rgba(self.samples(scanline, x)?)?;
      out.extend_from_slice(&rgba.to_array());
    }
    Ok(())
  }
}
