//! CRLF line scanning, shared by every scalar decoder's header/body line.

use memchr::memchr;

/// Outcome of scanning for a terminating CRLF starting at some offset.
pub(crate) enum LineScan<'a> {
    /// The line's content (excluding CRLF) and the number of bytes consumed
    /// including the CRLF.
    Complete(&'a [u8], usize),
    /// Not enough bytes buffered yet to know where the line ends.
    Incomplete,
    /// A lone `\r` was found that is not followed by `\n` within the
    /// buffered bytes, and strict mode was requested.
    Malformed,
}

/// Strict CRLF scan: any `\r` not immediately followed by `\n` is malformed.
/// Used for every numeric/header line (integer, double, big number, and
/// every length prefix) where embedded content is never expected.
pub(crate) fn scan_strict(data: &[u8]) -> LineScan<'_> {
    match memchr(b'\r', data) {
        Some(pos) => {
            if pos + 1 < data.len() {
                if data[pos + 1] == b'\n' {
                    LineScan::Complete(&data[..pos], pos + 2)
                } else {
                    LineScan::Malformed
                }
            } else {
                LineScan::Incomplete
            }
        }
        None => LineScan::Incomplete,
    }
}

/// Tolerant CRLF scan: a lone `\r` not followed by `\n` is treated as
/// ordinary content and the scan continues past it, per the source's
/// tolerance for stray `\r` inside simple-string/simple-error bodies.
pub(crate) fn scan_tolerant(data: &[u8]) -> LineScan<'_> {
    let mut search_from = 0;
    loop {
        match memchr(b'\r', &data[search_from..]) {
            Some(rel) => {
                let pos = search_from + rel;
                if pos + 1 < data.len() {
                    if data[pos + 1] == b'\n' {
                        return LineScan::Complete(&data[..pos], pos + 2);
                    }
                    search_from = pos + 1;
                } else {
                    return LineScan::Incomplete;
                }
            }
            None => return LineScan::Incomplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_scan_finds_crlf() {
        match scan_strict(b"42\r\nrest") {
            LineScan::Complete(line, consumed) => {
                assert_eq!(line, b"42");
                assert_eq!(consumed, 4);
            }
            _ => panic!("expected complete"),
        }
    }

    #[test]
    fn strict_scan_incomplete_without_lf() {
        assert!(matches!(scan_strict(b"42\r"), LineScan::Incomplete));
        assert!(matches!(scan_strict(b"42"), LineScan::Incomplete));
    }

    #[test]
    fn strict_scan_malformed_on_lone_cr() {
        assert!(matches!(scan_strict(b"4\r2\r\n"), LineScan::Malformed));
    }

    #[test]
    fn tolerant_scan_skips_lone_cr() {
        match scan_tolerant(b"fo\ro\r\nrest") {
            LineScan::Complete(line, consumed) => {
                assert_eq!(line, b"fo\ro");
                assert_eq!(consumed, 6);
            }
            _ => panic!("expected complete"),
        }
    }
}
