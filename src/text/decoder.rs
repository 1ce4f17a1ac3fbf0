//! Pluggable text decoders keyed by [`Encoding`].
//!
//! A decoder is resolved once per run and fed chunks in the order the OS
//! delivers them. Incomplete multi-byte sequences at the end of a chunk are
//! held back until the next chunk arrives; malformed sequences become
//! U+FFFD instead of aborting capture.

use serde::{Deserialize, Serialize};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding of a child process's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// No decoding; bytes are taken as they come.
    #[default]
    None,
    /// Detect the encoding (a UTF-8 BOM is honoured).
    Auto,
    /// UTF-8.
    Utf8,
    /// The platform ANSI code page.
    Ansi,
    /// The OEM/console code page.
    Oem,
}

impl Encoding {
    /// Parse an encoding name as accepted in job files and on the command line.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "auto" => Some(Self::Auto),
            "utf8" | "utf-8" => Some(Self::Utf8),
            "ansi" => Some(Self::Ansi),
            "oem" => Some(Self::Oem),
            _ => None,
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::None => write!(f, "none"),
            Encoding::Auto => write!(f, "auto"),
            Encoding::Utf8 => write!(f, "utf8"),
            Encoding::Ansi => write!(f, "ansi"),
            Encoding::Oem => write!(f, "oem"),
        }
    }
}

/// Incremental bytes-to-text decoding.
pub trait TextDecoder: Send {
    /// Decode the next chunk. Bytes that end mid-sequence are kept for the
    /// next call.
    fn decode(&mut self, bytes: &[u8]) -> String;

    /// Flush whatever is still pending (lossily).
    fn finish(&mut self) -> String;
}

/// Resolve the decoder for an encoding.
///
/// Non-UTF-8 code pages only exist on Windows consoles; everywhere else the
/// console code page is UTF-8, so `Ansi` and `Oem` decode as UTF-8.
pub fn resolve_decoder(encoding: Encoding) -> Box<dyn TextDecoder> {
    match encoding {
        Encoding::None => Box::new(PassthroughDecoder::default()),
        Encoding::Auto | Encoding::Utf8 | Encoding::Ansi | Encoding::Oem => {
            Box::new(Utf8Decoder::default())
        }
    }
}

/// Decode a complete buffer with a fresh decoder for `encoding`.
pub fn decode_all(encoding: Encoding, bytes: &[u8]) -> String {
    let mut decoder = resolve_decoder(encoding);
    let mut text = decoder.decode(bytes);
    text.push_str(&decoder.finish());
    text
}

/// Takes bytes as UTF-8 without any BOM handling.
#[derive(Debug, Default)]
pub struct PassthroughDecoder {
    pending: Vec<u8>,
}

impl TextDecoder for PassthroughDecoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        drain_valid(&mut self.pending)
    }

    fn finish(&mut self) -> String {
        flush(&mut self.pending)
    }
}

/// UTF-8 decoder that drops a leading byte-order mark.
#[derive(Debug)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    at_start: bool,
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            at_start: true,
        }
    }
}

impl TextDecoder for Utf8Decoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        if self.at_start {
            // Could still turn into a BOM once more bytes arrive.
            if self.pending.len() < UTF8_BOM.len() && UTF8_BOM.starts_with(&self.pending) {
                return String::new();
            }
            if self.pending.starts_with(UTF8_BOM) {
                self.pending.drain(..UTF8_BOM.len());
            }
            self.at_start = false;
        }

        drain_valid(&mut self.pending)
    }

    fn finish(&mut self) -> String {
        self.at_start = false;
        flush(&mut self.pending)
    }
}

/// Decode the longest prefix of `pending` that does not end mid-sequence.
///
/// Invalid sequences are replaced with U+FFFD; an incomplete trailing
/// sequence stays in `pending`.
fn drain_valid(pending: &mut Vec<u8>) -> String {
    let mut out = String::new();
    let mut consumed = 0;

    loop {
        let rest = &pending[consumed..];
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.push_str(s);
                consumed = pending.len();
                break;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&rest[..valid]));
                match e.error_len() {
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        consumed += valid + len;
                    }
                    None => {
                        consumed += valid;
                        break;
                    }
                }
            }
        }
    }

    pending.drain(..consumed);
    out
}

fn flush(pending: &mut Vec<u8>) -> String {
    let out = String::from_utf8_lossy(pending).into_owned();
    pending.clear();
    out
}
