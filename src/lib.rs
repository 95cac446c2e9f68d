#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! A crate for decoding PNG data into RGBA8 pixels.
//!
//! ```no_run
//! let png: &[u8] = unimplemented!("data from somewhere");
//! let image = pngload::decode_png(png).unwrap();
//! let top_left: u32 = image.get_pixel(0.0, 0.0);
//! ```
//!
//! Greyscale, greyscale + alpha, RGB, RGBA, and indexed color images with 1,
//! 2, 4, or 8 bits per channel are supported. Interlaced images are not.
//!
//! The [`png`] module has the individual decoding stages, if you want to work
//! with those directly.
//!
//! ## Features
//! * `std` (default): Implements `std::error::Error` for [`PngError`].

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod pixel_formats;
pub use pixel_formats::*;

mod parser_helpers;

pub mod error;
pub use error::*;

pub mod image;
pub use image::*;

pub mod png;
pub use png::{decode, decode_png, DecodeOptions};
