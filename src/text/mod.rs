//! Text handling for captured process output.
//!
//! Child processes hand us raw bytes. This module turns them into text:
//!
//! - [`decoder`] resolves a [`TextDecoder`] from the configured [`Encoding`]
//!   and decodes chunks that may split multi-byte sequences
//! - [`normalize`] removes NUL bytes, collapses `\r\n`, and optionally strips
//!   trailing whitespace

pub mod decoder;
pub mod normalize;

pub use decoder::{Encoding, TextDecoder, decode_all, resolve_decoder};
pub use normalize::{fix_text, normalize_text, text_from_terminated};
