//! Normalization of captured output buffers.

/// Whitespace as the C locale classifies it, plus the line terminators.
fn is_trailing_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

/// Normalize a captured buffer in place.
///
/// Removes every NUL byte and the `\r` of each `\r\n` pair (a lone `\r` is
/// kept), strips trailing whitespace when `strip_trailing_whitespace` is set,
/// and finally appends a single NUL terminator.
///
/// A buffer that is already normalized (no NUL bytes other than the
/// terminator, no `\r\n` pairs) comes back unchanged. Removing a NUL or a
/// `\r` can bring a new `\r\n` pair together, so `"\r\r\n"` needs one pass
/// per stacked `\r` to fully collapse.
pub fn fix_text(output: &mut Vec<u8>, strip_trailing_whitespace: bool) {
    let mut out_index = 0;
    let mut in_index = 0;

    while in_index < output.len() {
        let c = output[in_index];
        in_index += 1;
        let crlf = c == b'\r' && output.get(in_index) == Some(&b'\n');
        if !crlf && c != b'\0' {
            output[out_index] = c;
            out_index += 1;
        }
    }

    if strip_trailing_whitespace {
        while out_index > 0 && is_trailing_whitespace(output[out_index - 1]) {
            out_index -= 1;
        }
    }

    output.truncate(out_index);
    output.push(b'\0');
}

/// Read text from a terminated buffer, stopping at the first NUL.
pub fn text_from_terminated(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == b'\0').unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

/// Normalize decoded text, returning it without the terminator.
///
/// Only ASCII bytes are ever removed, so valid UTF-8 stays valid.
pub fn normalize_text(text: String, strip_trailing_whitespace: bool) -> String {
    let mut buffer = text.into_bytes();
    fix_text(&mut buffer, strip_trailing_whitespace);
    text_from_terminated(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(input: &[u8], strip: bool) -> Vec<u8> {
        let mut buf = input.to_vec();
        fix_text(&mut buf, strip);
        buf
    }

    #[test]
    fn removes_nul_bytes_and_terminates() {
        assert_eq!(fixed(b"a\0b\0", false), b"ab\0");
    }

    #[test]
    fn collapses_crlf_but_keeps_lone_cr() {
        assert_eq!(fixed(b"a\r\nb\rc\r", false), b"a\nb\rc\r\0");
    }

    #[test]
    fn cr_before_nul_then_lf_is_kept() {
        // The pair check looks at the raw input, so "\r\0\n" is not a pair.
        assert_eq!(fixed(b"x\r\0\n", false), b"x\r\n\0");
    }

    #[test]
    fn strips_trailing_whitespace_when_requested() {
        assert_eq!(fixed(b"hello \t\r\n\x0b\x0c\n", true), b"hello\0");
        assert_eq!(fixed(b"hello\n", false), b"hello\n\0");
    }

    #[test]
    fn leading_whitespace_is_untouched() {
        assert_eq!(fixed(b"  hi  ", true), b"  hi\0");
    }

    #[test]
    fn empty_buffer_becomes_terminator() {
        assert_eq!(fixed(b"", true), b"\0");
        assert_eq!(fixed(b" \n", true), b"\0");
    }

    #[test]
    fn normalized_buffer_is_unchanged() {
        let inputs: [&[u8]; 4] = [b"a\r\nb\0c \n", b"plain", b"x\ry\n", b""];
        for input in inputs {
            for strip in [false, true] {
                let once = fixed(input, strip);
                let twice = fixed(&once, strip);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn stacked_cr_collapses_one_pair_per_pass() {
        assert_eq!(fixed(b"\r\r\n", false), b"\r\n\0");
        assert_eq!(fixed(b"\r\r\n\n", false), b"\r\n\n\0");
    }

    #[test]
    fn normalize_text_drops_terminator() {
        assert_eq!(normalize_text("hello\r\n".to_string(), false), "hello\n");
        assert_eq!(normalize_text("hello\n".to_string(), true), "hello");
        assert_eq!(normalize_text("héllo wörld \n".to_string(), true), "héllo wörld");
    }

    #[test]
    fn text_from_terminated_stops_at_nul() {
        assert_eq!(text_from_terminated(b"abc\0def"), "abc");
        assert_eq!(text_from_terminated(b"abc"), "abc");
    }
}
