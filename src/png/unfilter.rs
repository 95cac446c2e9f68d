use super::*;

/// The filter applied to one scanline, from the scanline's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  /// The bytes are stored as-is.
  None = 0,
  /// Delta from the byte one pixel to the left.
  Sub = 1,
  /// Delta from the byte one scanline up.
  Up = 2,
  /// Delta from the average of left and up.
  Average = 3,
  /// Delta from whichever of left, up, and upper left is the [`paeth_predict`]
  /// choice.
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      _ => return Err(PngError::UnsupportedScanlineFilter(value)),
    })
  }
}

/// The Paeth predictor: picks whichever of `a` (left), `b` (up), or `c` (upper
/// left) is closest to `a + b - c`.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note(Lokathor): The PNG standard is extremely specific that you shall not,
  // under any circumstances, alter the order of evaluation of this
  // expression's tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Unfilters `filtered` bytes into `current[start..]`.
///
/// `current[..start]` must already be unfiltered, and `previous` is the whole
/// unfiltered scanline above (all zero for the first scanline). Anything to
/// the left of the scanline start counts as zero.
fn unfilter_bytes(
  filter: FilterType, bpp: usize, start: usize, filtered: &[u8], current: &mut [u8],
  previous: &[u8],
) {
  for (i, f) in (start..).zip(filtered.iter().copied()) {
    let a = if i >= bpp { current[i - bpp] } else { 0 };
    let b = previous[i];
    let c = if i >= bpp { previous[i - bpp] } else { 0 };
    current[i] = f.wrapping_add(match filter {
      FilterType::None => 0,
      FilterType::Sub => a,
      FilterType::Up => b,
      FilterType::Average => ((a as u32 + b as u32) / 2) as u8,
      FilterType::Paeth => paeth_predict(a, b, c),
    });
  }
}

/// Undoes scanline filtering on decompressed data that arrives in pieces of
/// any size.
///
/// Give it bytes with [`push`](Self::push); each time a scanline is completed
/// it's passed out to the `op`. Call [`finish`](Self::finish) once the
/// decompressed data is over to check that exactly the right amount arrived.
#[derive(Debug, Clone)]
pub struct ScanlineReconstructor {
  bpp: usize,
  height: u32,
  /// scanlines completed so far
  line: u32,
  /// the current scanline's filter, or `None` if the next byte is a filter
  /// type byte.
  filter: Option<FilterType>,
  /// bytes of the current scanline unfiltered so far
  pos: usize,
  previous: Vec<u8>,
  current: Vec<u8>,
  received: usize,
  expected: usize,
}
impl ScanlineReconstructor {
  /// Makes a reconstructor for the image the header describes.
  pub fn new(header: &IHDR) -> PngResult<Self> {
    let bytes_per_scanline = header.bytes_per_scanline()?;
    let expected = header.get_zlib_decompression_requirement()?;
    let mut previous = Vec::new();
    previous.try_reserve_exact(bytes_per_scanline)?;
    previous.resize(bytes_per_scanline, 0);
    let mut current = Vec::new();
    current.try_reserve_exact(bytes_per_scanline)?;
    current.resize(bytes_per_scanline, 0);
    Ok(Self {
      bpp: header.bytes_per_complete_pixel(),
      height: header.height,
      line: 0,
      filter: None,
      pos: 0,
      previous,
      current,
      received: 0,
      expected,
    })
  }

  /// Scanlines completed so far.
  #[inline]
  #[must_use]
  pub const fn lines_done(&self) -> u32 {
    self.line
  }

  /// Decompressed bytes taken in so far.
  #[inline]
  #[must_use]
  pub const fn received(&self) -> usize {
    self.received
  }

  /// Takes in the next piece of decompressed data.
  ///
  /// The `op` gets each unfiltered scanline (without the filter byte), top to
  /// bottom. Data past the last scanline is an error, as is any error from
  /// the `op`.
  pub fn push<F>(&mut self, mut data: &[u8], mut op: F) -> PngResult<()>
  where
    F: FnMut(&[u8]) -> PngResult<()>,
  {
    while !data.is_empty() {
      if self.line >= self.height {
        return Err(PngError::CopyMismatch {
          stage: CopyStage::Decompressed,
          expected: self.expected,
          actual: self.received + data.len(),
        });
      }
      let filter = match self.filter {
        Some(filter) => filter,
        None => {
          let filter = FilterType::try_from(data[0])?;
          data = &data[1..];
          self.received += 1;
          // the scanline we just finished becomes the one above.
          core::mem::swap(&mut self.previous, &mut self.current);
          self.filter = Some(filter);
          filter
        }
      };
      let take = (self.current.len() - self.pos).min(data.len());
      let (filtered, rest) = data.split_at(take);
      unfilter_bytes(filter, self.bpp, self.pos, filtered, &mut self.current, &self.previous);
      self.pos += take;
      self.received += take;
      data = rest;
      if self.pos == self.current.len() {
        op(&self.current)?;
        self.line += 1;
        self.pos = 0;
        self.filter = None;
      }
    }
    Ok(())
  }

  /// Checks that every scanline arrived in full.
  pub fn finish(&self) -> PngResult<()> {
    if self.line == self.height && self.filter.is_none() && self.received == self.expected {
      Ok(())
    } else {
      Err(PngError::CopyMismatch {
        stage: CopyStage::Decompressed,
        expected: self.expected,
        actual: self.received,
      })
    }
  }
}
