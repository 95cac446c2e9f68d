use super::*;

/// The four byte tag that says what kind of chunk a chunk is.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkType {
  /// Image Header
  pub const IHDR: Self = Self(*b"IHDR");
  /// Palette
  pub const PLTE: Self = Self(*b"PLTE");
  /// Image Data
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image End
  pub const IEND: Self = Self(*b"IEND");
  /// Transparency
  pub const tRNS: Self = Self(*b"tRNS");
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for b in self.0 {
      if b.is_ascii_graphic() {
        f.write_char(b as char)?;
      } else {
        write!(f, "\\x{b:02X}")?;
      }
    }
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPngChunk<'b> {
  /// The chunk's type tag.
  pub chunk_ty: PngChunkType,
  /// Byte offset of the chunk (its length field) within the full PNG bytes.
  pub offset: usize,
  /// The chunk's payload.
  pub data: &'b [u8],
  /// The CRC value stored after the payload. This crate never checks it.
  pub declared_crc: u32,
}
impl RawPngChunk<'_> {
  /// Byte offset of whatever comes after this chunk.
  #[inline]
  #[must_use]
  pub const fn end_offset(&self) -> usize {
    // length + type + data + crc
    self.offset + 4 + 4 + self.data.len() + 4
  }
}
impl Debug for RawPngChunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawPngChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("offset", &self.offset)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// If a chunk claims to be longer than the bytes that are left you get a
/// single [`PngError::UnexpectedEndOfInput`] and then the iterator is done.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPngChunkIter<'b> {
  bytes: &'b [u8],
  offset: usize,
}
impl<'b> RawPngChunkIter<'b> {
  /// Pass the full PNG bytes, it will skip the PNG signature automatically.
  ///
  /// The signature bytes are *not* checked, use [`is_png_signature_correct`]
  /// for that.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self { bytes: rest, offset: 8 },
      _ => Self { bytes: &[], offset: bytes.len() },
    }
  }

  /// Byte offset (within the full PNG bytes) of the next chunk.
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }
}
impl<'b> Iterator for RawPngChunkIter<'b> {
  type Item = PngResult<RawPngChunk<'b>>;
  fn next(&mut self) -> Option<Self::Item> {
    if self.bytes.is_empty() {
      return None;
    }
    let parse = |bytes: &'b [u8]| -> Option<(PngChunkType, &'b [u8], u32, &'b [u8])> {
      let (chunk_len, rest) = try_split_off_u32_be(bytes)?;
      let (chunk_ty, rest) = try_split_off_byte_array::<4>(rest)?;
      let (data, rest) = try_split_off_slice(rest, usize::try_from(chunk_len).ok()?)?;
      let (declared_crc, rest) = try_split_off_u32_be(rest)?;
      Some((PngChunkType(chunk_ty), data, declared_crc, rest))
    };
    match parse(self.bytes) {
      Some((chunk_ty, data, declared_crc, rest)) => {
        let chunk = RawPngChunk { chunk_ty, offset: self.offset, data, declared_crc };
        self.offset = chunk.end_offset();
        self.bytes = rest;
        Some(Ok(chunk))
      }
      None => {
        self.offset += self.bytes.len();
        self.bytes = &[];
        Some(Err(PngError::UnexpectedEndOfInput))
      }
    }
  }
}

/// What the chunk scan found in a PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkScan<'b> {
  /// Every `IDAT` payload, in the order they appear.
  pub idat: Vec<&'b [u8]>,
  /// The first `PLTE` chunk, for indexed color only.
  pub palette: Option<PLTE<'b>>,
  /// The first `tRNS` chunk.
  pub transparency: Option<tRNS<'b>>,
  /// Byte offset just past the `IEND` chunk.
  pub trailer_offset: usize,
}
impl ChunkScan<'_> {
  /// Total length of the compressed image data.
  #[inline]
  #[must_use]
  pub fn idat_len(&self) -> usize {
    self.idat.iter().map(|d| d.len()).sum()
  }
}

/// Walks every chunk after the header, up to and including `IEND`.
///
/// Chunks other than `IDAT`, `PLTE`, `tRNS`, and `IEND` are skipped. The
/// checksum of each chunk is not checked. The palette is only read for
/// indexed color images, which must have a non-empty one.
pub fn scan_chunks<'b>(
  bytes: &'b [u8], header: &IHDR, options: &DecodeOptions,
) -> PngResult<ChunkScan<'b>> {
  let mut it = RawPngChunkIter::new(bytes);
  // the header was already checked, it's always the first chunk.
  it.next().transpose()?;

  let mut idat: Vec<&'b [u8]> = Vec::new();
  let mut palette: Option<PLTE<'b>> = None;
  let mut transparency: Option<tRNS<'b>> = None;
  let mut trailer_offset: Option<usize> = None;

  for chunk in it {
    let chunk = chunk?;
    trace!(options, "{:?} chunk at {}, {} bytes.", chunk.chunk_ty, chunk.offset, chunk.data.len());
    match chunk.chunk_ty {
      PngChunkType::IDAT => idat.push(chunk.data),
      PngChunkType::PLTE if palette.is_none() && header.color_type == PngColorType::Index => {
        palette = Some(PLTE::try_from(chunk.data)?)
      }
      PngChunkType::tRNS if transparency.is_none() => transparency = Some(tRNS::from(chunk.data)),
      PngChunkType::IEND => {
        trailer_offset = Some(chunk.end_offset());
        break;
      }
      _ => (),
    }
  }

  let trailer_offset = trailer_offset.ok_or(PngError::UnexpectedEndOfInput)?;
  if header.color_type == PngColorType::Index
    && palette.map(|p| p.entries().is_empty()).unwrap_or(true)
  {
    return Err(PngError::MissingPalette);
  }
  Ok(ChunkScan { idat, palette, transparency, trailer_offset })
}
