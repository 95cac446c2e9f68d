#![forbid(unsafe_code)]

use core::{fmt, num::TryFromIntError};

use miniz_oxide::MZError;

/// Shorthand for results from this crate.
pub type PngResult<T> = Result<T, PngError>;

/// The decoding stage where a byte count didn't come out right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CopyStage {
  /// Compressed bytes given to the decompressor vs. all `IDAT` bytes.
  Compressed,
  /// Decompressed bytes vs. what the header says the scanlines need.
  Decompressed,
  /// Output bytes vs. `width * height * 4`.
  Pixels,
}

/// An error from decoding PNG data.
///
/// Every variant is terminal for the decode call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The data doesn't start with the PNG signature.
  InvalidSignature,

  /// The first chunk isn't a 13 byte `IHDR` chunk.
  FirstChunkNotHeader,

  /// The header's compression method isn't 0.
  UnsupportedCompressionMethod(u8),

  /// The header's filter method isn't 0.
  UnsupportedFilterMethod(u8),

  /// The header's interlace method isn't 0.
  ///
  /// Interlaced images are not supported.
  UnsupportedInterlaceMethod(u8),

  /// The header's color type isn't one of 0, 2, 3, 4, or 6.
  UnsupportedColorType(u8),

  /// The bit depth isn't one of 1, 2, 4, or 8.
  UnsupportedBitDepth(u8),

  /// A scanline started with a filter type byte other than 0 through 4.
  UnsupportedScanlineFilter(u8),

  /// An indexed color image has no palette, or an empty one.
  MissingPalette,

  /// The palette chunk's length isn't a multiple of 3.
  MalformedPalette,

  /// A pixel used a palette index past the end of the palette.
  InvalidPaletteIndex(u8),

  /// The declared width and/or height of this image is 0.
  WidthOrHeightZero,

  /// The image is larger than the decoder was configured to accept, or its
  /// size can't be computed in a `usize`.
  DimensionsTooLarge,

  /// A chunk runs past the end of the data, or there's no `IEND` chunk.
  UnexpectedEndOfInput,

  /// A byte count didn't match at the end of a stage.
  ///
  /// Malformed input usually causes this, but it's kept separate from the
  /// other errors so that decoder bugs are easy to spot.
  CopyMismatch {
    /// where the mismatch happened
    stage: CopyStage,
    /// how many bytes there should have been
    expected: usize,
    /// how many bytes there were
    actual: usize,
  },

  /// The zlib stream inside the `IDAT` chunks is broken.
  Decompression(MZError),

  /// The allocator couldn't give us enough space.
  Alloc,
}
impl From<MZError> for PngError {
  #[inline]
  fn from(e: MZError) -> Self {
    Self::Decompression(e)
  }
}
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for PngError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::DimensionsTooLarge
  }
}
impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidSignature => write!(f, "Invalid PNG header."),
      Self::FirstChunkNotHeader => write!(f, "First PNG chunk is not IHDR."),
      Self::UnsupportedCompressionMethod(m) => write!(f, "Unsupported compression method: {m}"),
      Self::UnsupportedFilterMethod(m) => write!(f, "Unsupported filter method: {m}"),
      Self::UnsupportedInterlaceMethod(m) => write!(f, "Unsupported interlace method: {m}"),
      Self::UnsupportedColorType(t) => write!(f, "Unsupported color type: {t}"),
      Self::UnsupportedBitDepth(d) => write!(f, "Unsupported bit depth: {d}"),
      Self::UnsupportedScanlineFilter(x) => write!(f, "Unsupported scanline filter: {x}"),
      Self::MissingPalette => write!(f, "Indexed color image has no palette."),
      Self::MalformedPalette => write!(f, "Palette length is not a multiple of 3."),
      Self::InvalidPaletteIndex(i) => write!(f, "Invalid palette index recorded: {i}"),
      Self::WidthOrHeightZero => write!(f, "Image width or height is 0."),
      Self::DimensionsTooLarge => write!(f, "Image dimensions are too large."),
      Self::UnexpectedEndOfInput => write!(f, "Unexpected end of PNG data."),
      Self::CopyMismatch { stage, expected, actual } => write!(
        f,
        "Copy error: extraneous or insufficient data ({stage:?}: expected {expected} bytes, got {actual})."
      ),
      Self::Decompression(e) => write!(f, "Zlib stream error: {e:?}"),
      Self::Alloc => write!(f, "Allocation failed."),
    }
  }
}
#[cfg(feature = "std")]
impl std::error::Error for PngError {}
