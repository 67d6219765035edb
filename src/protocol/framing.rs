//! Line codec for the switcher connection
//!
//! TCP gives no guarantee that a read ends on a line boundary, so the decoder
//! waits for a `\n` before yielding. Lines are trimmed and blank ones skipped.
//! On orderly close an unterminated tail is yielded as a last line.

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use super::LINE_TERMINATOR;

/// Upper bound for an unterminated line before it is discarded
pub const MAX_PENDING_BYTES: usize = 64 * 1024;

/// Newline-delimited text codec
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFramer {
    /// Bytes already searched for a terminator
    next_index: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn trimmed_line(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Decoder for LineFramer {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if src.len() > MAX_PENDING_BYTES {
                    warn!(
                        pending = src.len(),
                        "studio: discarding oversized unterminated line"
                    );
                    src.clear();
                    self.next_index = 0;
                } else {
                    self.next_index = src.len();
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset);
            src.advance(1);
            self.next_index = 0;

            if let Some(line) = trimmed_line(&line) {
                return Ok(Some(line));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        let rest = src.split();
        Ok(trimmed_line(&rest))
    }
}

impl Encoder<String> for LineFramer {
    type Error = io::Error;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(line.len() + LINE_TERMINATOR.len());
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(LINE_TERMINATOR.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer, buf: &mut BytesMut) -> Vec<String> {
        std::iter::from_fn(|| framer.decode(buf).unwrap()).collect()
    }

    #[test]
    fn test_complete_lines() {
        let mut framer = LineFramer::new();
        let mut buf = BytesMut::from(&b"PmIS:1\nPwIS:2\n"[..]);
        assert_eq!(drain(&mut framer, &mut buf), vec!["PmIS:1", "PwIS:2"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_line_split_across_reads() {
        let mut framer = LineFramer::new();
        let mut buf = BytesMut::from(&b"ILC:0:Cam"[..]);
        assert!(framer.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 9);

        buf.extend_from_slice(b" 1:0:0:0:0:0:Camera\nFO");
        assert_eq!(
            drain(&mut framer, &mut buf),
            vec!["ILC:0:Cam 1:0:0:0:0:0:Camera"]
        );

        buf.extend_from_slice(b"ut\n");
        assert_eq!(drain(&mut framer, &mut buf), vec!["FOut"]);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let mut framer = LineFramer::new();
        let mut buf = BytesMut::from(&b"\r\n  \nCut\r\n\n"[..]);
        assert_eq!(drain(&mut framer, &mut buf), vec!["Cut"]);
    }

    #[test]
    fn test_eof_flushes_tail() {
        let mut framer = LineFramer::new();
        let mut buf = BytesMut::from(&b"FIn\nTrASp:500"[..]);
        assert_eq!(framer.decode_eof(&mut buf).unwrap().as_deref(), Some("FIn"));
        assert_eq!(
            framer.decode_eof(&mut buf).unwrap().as_deref(),
            Some("TrASp:500")
        );
        assert_eq!(framer.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_oversized_unterminated_line_is_dropped() {
        let mut framer = LineFramer::new();
        let mut buf = BytesMut::from(&vec![b'x'; MAX_PENDING_BYTES + 1][..]);
        assert!(framer.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());

        // the stream stays usable afterwards
        buf.extend_from_slice(b"PmIS:1\n");
        assert_eq!(drain(&mut framer, &mut buf), vec!["PmIS:1"]);
    }

    #[test]
    fn test_encode_appends_terminator() {
        let mut framer = LineFramer::new();
        let mut buf = BytesMut::new();
        framer.encode("SPrI:2".to_string(), &mut buf).unwrap();
        framer.encode("RCut".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"SPrI:2\nRCut\n");
    }
}
