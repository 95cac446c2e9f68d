use super::*;

use alloc::boxed::Box;
use miniz_oxide::{
  inflate::stream::{inflate, InflateState},
  DataFormat, MZError, MZFlush, MZStatus, StreamResult,
};

/// Size of the window that decompressed bytes pass through.
pub const INFLATE_WINDOW_LEN: usize = 16 * 1024;

/// Streaming zlib decompression of the `IDAT` data.
///
/// Compressed bytes go in with [`write`](Self::write) (one call per `IDAT`
/// chunk is fine, any split is fine), and decompressed bytes come out through
/// the `sink` closure, one window at a time. The windows don't line up with
/// scanlines or with the input chunks.
pub struct ZlibStream {
  state: Box<InflateState>,
  window: Vec<u8>,
  total_in: usize,
  total_out: usize,
  finished: bool,
}
impl ZlibStream {
  /// A new stream with the default window size.
  #[inline]
  pub fn new() -> PngResult<Self> {
    Self::with_window_len(INFLATE_WINDOW_LEN)
  }

  /// A new stream that hands out at most `window_len` bytes per `sink` call.
  pub fn with_window_len(window_len: usize) -> PngResult<Self> {
    let mut window = Vec::new();
    window.try_reserve_exact(window_len.max(1))?;
    window.resize(window_len.max(1), 0);
    Ok(Self {
      state: InflateState::new_boxed(DataFormat::Zlib),
      window,
      total_in: 0,
      total_out: 0,
      finished: false,
    })
  }

  /// Compressed bytes consumed so far.
  #[inline]
  #[must_use]
  pub const fn total_in(&self) -> usize {
    self.total_in
  }

  /// Decompressed bytes produced so far.
  #[inline]
  #[must_use]
  pub const fn total_out(&self) -> usize {
    self.total_out
  }

  /// If the end of the zlib stream has been reached.
  #[inline]
  #[must_use]
  pub const fn is_finished(&self) -> bool {
    self.finished
  }

  fn step<F>(&mut self, input: &[u8], flush: MZFlush, sink: &mut F) -> PngResult<StreamResult>
  where
    F: FnMut(&[u8]) -> PngResult<()>,
  {
    let result = inflate(&mut self.state, input, &mut self.window, flush);
    self.total_in += result.bytes_consumed;
    self.total_out += result.bytes_written;
    if result.bytes_written > 0 {
      sink(&self.window[..result.bytes_written])?;
    }
    Ok(result)
  }

  /// Pushes more compressed bytes into the stream.
  ///
  /// Once the zlib stream has ended any further input is left unconsumed
  /// (see [`total_in`](Self::total_in)).
  pub fn write<F>(&mut self, mut input: &[u8], mut sink: F) -> PngResult<()>
  where
    F: FnMut(&[u8]) -> PngResult<()>,
  {
    while !self.finished {
      let StreamResult { bytes_consumed, bytes_written, status } =
        self.step(input, MZFlush::None, &mut sink)?;
      input = &input[bytes_consumed..];
      match status {
        Ok(MZStatus::StreamEnd) => self.finished = true,
        Ok(MZStatus::Ok) => {
          let window_was_filled = bytes_written == self.window.len();
          if (input.is_empty() && !window_was_filled) || (bytes_consumed == 0 && bytes_written == 0)
          {
            break;
          }
        }
        // PNG never uses a preset dictionary.
        Ok(MZStatus::NeedDict) => return Err(PngError::Decompression(MZError::Data)),
        // no progress is possible until more input arrives.
        Err(MZError::Buf) => break,
        Err(e) => return Err(e.into()),
      }
    }
    Ok(())
  }

  /// Signals that there's no more input and drains the rest of the output.
  ///
  /// A zlib stream that doesn't end with the input is an error.
  pub fn finish<F>(&mut self, mut sink: F) -> PngResult<()>
  where
    F: FnMut(&[u8]) -> PngResult<()>,
  {
    while !self.finished {
      let StreamResult { bytes_written, status, .. } = self.step(&[], MZFlush::Finish, &mut sink)?;
      match status {
        Ok(MZStatus::StreamEnd) => self.finished = true,
        Ok(MZStatus::NeedDict) => return Err(PngError::Decompression(MZError::Data)),
        // still draining
        Ok(MZStatus::Ok) | Err(MZError::Buf) if bytes_written > 0 => (),
        Ok(MZStatus::Ok) => return Err(PngError::Decompression(MZError::Buf)),
        Err(e) => return Err(e.into()),
      }
    }
    Ok(())
  }
}
