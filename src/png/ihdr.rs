use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels (samples per pixel) in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::UnsupportedColorType(value)),
    })
  }
}

/// Image Header
///
/// Only the header values that this crate can decode are representable:
/// compression, filter, and interlace methods must all be 0, and the bit
/// depth is 1, 2, 4, or 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
}
impl IHDR {
  /// Samples per pixel.
  #[inline]
  #[must_use]
  pub const fn samples_per_pixel(&self) -> usize {
    self.color_type.channel_count()
  }

  /// Bits used by one pixel in a scanline.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.samples_per_pixel()
  }

  /// How far back the Sub, Average, and Paeth filters look, in bytes.
  ///
  /// Filtering is per byte within a pixel when pixels are more than 1 byte
  /// each, and per byte when pixels are 1 byte or less.
  #[inline]
  #[must_use]
  pub const fn bytes_per_complete_pixel(&self) -> usize {
    let bytes = (self.bits_per_pixel() + 7) / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes of sample data in one scanline, not counting the filter byte.
  ///
  /// When pixels are less than 8 bits it's possible to end up with partial
  /// bytes on the end, so we round up.
  #[inline]
  pub fn bytes_per_scanline(&self) -> PngResult<usize> {
    let bits_per_line =
      self.bits_per_pixel().checked_mul(self.width.try_into()?).ok_or(PngError::DimensionsTooLarge)?;
    Ok((bits_per_line / 8) + (bits_per_line % 8 != 0) as usize)
  }

  /// The exact length of the decompressed (filtered) image data: each line is
  /// a filter byte plus the scanline.
  #[inline]
  pub fn get_zlib_decompression_requirement(&self) -> PngResult<usize> {
    let bytes_per_filterline = self.bytes_per_scanline()? + 1;
    bytes_per_filterline.checked_mul(self.height.try_into()?).ok_or(PngError::DimensionsTooLarge)
  }

  /// The length of the final RGBA8 pixel buffer.
  #[inline]
  pub fn rgba8_len(&self) -> PngResult<usize> {
    let w: usize = self.width.try_into()?;
    let h: usize = self.height.try_into()?;
    w.checked_mul(h).and_then(|p| p.checked_mul(4)).ok_or(PngError::DimensionsTooLarge)
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  /// Parses the 13 byte payload of an `IHDR` chunk.
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        if *compression_method != 0 {
          return Err(PngError::UnsupportedCompressionMethod(*compression_method));
        }
        if *filter_method != 0 {
          return Err(PngError::UnsupportedFilterMethod(*filter_method));
        }
        if *interlace_method != 0 {
          return Err(PngError::UnsupportedInterlaceMethod(*interlace_method));
        }
        let color_type = PngColorType::try_from(*color_type)?;
        let bit_depth = match *bit_depth {
          1 | 2 | 4 | 8 => *bit_depth,
          other => return Err(PngError::UnsupportedBitDepth(other)),
        };
        let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
        let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
        if width == 0 || height == 0 {
          return Err(PngError::WidthOrHeightZero);
        }
        Ok(Self { width, height, bit_depth, color_type })
      }
      _ => Err(PngError::FirstChunkNotHeader),
    }
  }
}

/// Gets the [IHDR] out of the PNG bytes.
///
/// This checks the PNG signature first, and then requires that the very first
/// chunk be the header. The first chunk's length and type are checked before
/// its payload is read, so any other first chunk is
/// [`PngError::FirstChunkNotHeader`] even if it's cut short.
pub fn read_header(bytes: &[u8]) -> PngResult<IHDR> {
  if !is_png_signature_correct(bytes) {
    return Err(PngError::InvalidSignature);
  }
  let rest = bytes.get(PNG_SIGNATURE.len()..).unwrap_or(&[]);
  let (chunk_len, rest) = try_split_off_u32_be(rest).ok_or(PngError::UnexpectedEndOfInput)?;
  let (chunk_ty, rest) =
    try_split_off_byte_array::<4>(rest).ok_or(PngError::UnexpectedEndOfInput)?;
  if chunk_len != 13 || PngChunkType(chunk_ty) != PngChunkType::IHDR {
    return Err(PngError::FirstChunkNotHeader);
  }
  let (data, _) = try_split_off_slice(rest, 13).ok_or(PngError::UnexpectedEndOfInput)?;
  IHDR::try_from(data)
}
