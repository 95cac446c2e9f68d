#![forbid(unsafe_code)]

//! Holds all the tools for decoding PNG data.
//!
//! ## Automated PNG Decoding
//! If you just want the pixels, call [`decode`] (or [`decode_png`]) and you
//! get back an [`ImageData`] with the image as RGBA8 bytes. Every supported
//! pixel format is converted for you.
//!
//! ## Decoding a PNG Yourself
//! The pieces that `decode` is made of are also public, if you want to do
//! something a little different.
//!
//! The general format of a PNG is that the information is stored in "chunks".
//! There's four "critical" chunk types:
//! * **Header** - This has all the important information about the image's
//!   dimensions, pixel format, and if the image is interlaced or not. Using
//!   this information you'll know how many bytes the decompression should
//!   produce, and how much final space is required after unfiltering.
//! * **Palette** - If an image uses indexed color it will have a palette of
//!   what index values map to what `RGB8` values.
//! * **Image Data** - One or more chunks of compressed data. All of the
//!   compressed data forms a single zlib data stream.
//! * **End** - The last chunk, lets you know you had the full PNG and your data
//!   wasn't truncated accidentally.
//!
//! If you only need the header, use [`read_header`]. To look at every chunk,
//! use a [`RawPngChunkIter`].
//!
//! When storing the PNG, the raw pixel values are first "filtered" (to try and
//! make them more compression-friendly), and then compressed into a Zlib data
//! stream. To decode the PNG you reverse the operations:
//!
//! * **Decompression:** A [`ZlibStream`] takes each `IDAT` payload in turn and
//!   hands out the decompressed bytes in pieces of whatever size.
//! * **Unfiltering:** The decompressed data is a series of lines, each with an
//!   extra byte on the front which says what filter method was used for that
//!   line. A [`ScanlineReconstructor`] undoes the filters, keeping only the
//!   line above the current one.
//! * **Pixel Format Changes:** The PNG's stored pixel format is probably not
//!   RGBA8. Particularly, any pixel format that packs multiple pixels within a
//!   byte is unlikely to be usable by common code. A [`PixelSynthesizer`]
//!   turns each unfiltered line into RGBA8.
//!
//! Interlaced images and 16-bit channels are not supported.

use core::fmt::{Debug, Write};

use alloc::vec::Vec;

use crate::{error::*, image::ImageData, parser_helpers::*, pixel_formats::*};

/// Emits a `log::debug!` line, but only when the options ask for tracing.
macro_rules! trace {
  ($opts:expr, $($arg:tt)+) => {
    if $opts.trace {
      log::debug!($($arg)+);
    }
  };
}

mod chunks;
pub use chunks::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod trns;
pub use trns::*;

mod inflate;
pub use inflate::*;

mod unfilter;
pub use unfilter::*;

mod unpack;
pub use unpack::*;


/// The first eight bytes of every PNG.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not* PNG
///   data.
#[inline]
#[must_use]
pub const fn is_png_signature_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// Settings for a [`decode`] call.
///
/// None of the settings change the output of a successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
  /// Log what the decoder is doing with `log::debug!`.
  pub trace: bool,
  /// The largest width or height that will be decoded. Bigger images fail
  /// with [`PngError::DimensionsTooLarge`] before anything is allocated.
  ///
  /// There's no limit by default.
  pub max_dimension: u32,
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self { trace: false, max_dimension: u32::MAX }
  }
}
impl DecodeOptions {
  /// Sets if tracing is on.
  #[inline]
  #[must_use]
  pub const fn with_trace(self, trace: bool) -> Self {
    Self { trace, ..self }
  }

  /// Sets the dimension limit.
  #[inline]
  #[must_use]
  pub const fn with_max_dimension(self, max_dimension: u32) -> Self {
    Self { max_dimension, ..self }
  }
}

/// Decodes PNG bytes into RGBA8 pixels.
///
/// Anything after the `IEND` chunk is kept as the image's trailer.
///
/// ## Failure
/// Every problem ends the decode with an error, there's no partial output.
/// Errors include, but are not limited to:
/// * The data isn't a PNG, or it's cut short.
/// * The header uses a format this crate can't decode (interlacing, 16-bit
///   channels).
/// * An indexed color image without a palette, or a pixel using an index
///   that the palette doesn't have.
/// * Broken zlib data, or the wrong amount of it.
/// * Allocation failure.
pub fn decode(bytes: &[u8], options: DecodeOptions) -> PngResult<ImageData> {
  let header = read_header(bytes)?;
  trace!(options, "Verified PNG header.");
  trace!(
    options,
    "PNG is {}x{}, {}-bit, color type {}.",
    header.width,
    header.height,
    header.bit_depth,
    header.color_type as u8
  );
  if header.width > options.max_dimension || header.height > options.max_dimension {
    return Err(PngError::DimensionsTooLarge);
  }

  let scan = scan_chunks(bytes, &header, &options)?;
  let synth = PixelSynthesizer::new(header, scan.palette, scan.transparency);

  let pixels_len = header.rgba8_len()?;
  let mut pixels: Vec<u8> = Vec::new();
  pixels.try_reserve_exact(pixels_len)?;

  let mut unfilter = ScanlineReconstructor::new(&header)?;
  let mut zlib = ZlibStream::new()?;
  {
    let mut sink = |decompressed: &[u8]| {
      unfilter.push(decompressed, |line| synth.extend_scanline(line, &mut pixels))
    };
    for idat in scan.idat.iter() {
      zlib.write(idat, &mut sink)?;
    }
    zlib.finish(&mut sink)?;
  }
  trace!(options, "End of zlib stream after {} compressed bytes.", zlib.total_in());

  let idat_len = scan.idat_len();
  if zlib.total_in() != idat_len {
    return Err(PngError::CopyMismatch {
      stage: CopyStage::Compressed,
      expected: idat_len,
      actual: zlib.total_in(),
    });
  }
  unfilter.finish()?;
  if pixels.len() != pixels_len {
    return Err(PngError::CopyMismatch {
      stage: CopyStage::Pixels,
      expected: pixels_len,
      actual: pixels.len(),
    });
  }
  trace!(
    options,
    "Decoded {} compressed bytes into {} filtered bytes and {} pixel bytes.",
    idat_len,
    unfilter.received(),
    pixels.len()
  );

  let trailer = bytes.get(scan.trailer_offset..).unwrap_or(&[]).to_vec();
  Ok(ImageData::new(header.width, header.height, pixels, trailer))
}

/// Decodes PNG bytes using the default [`DecodeOptions`].
#[inline]
pub fn decode_png(bytes: &[u8]) -> PngResult<ImageData> {
  decode(bytes, DecodeOptions::default())
}
