//! Incremental UTF-8 decoding of shell output.
//!
//! Output arrives in arbitrary chunks, so a multi-byte sequence can be split
//! across two reads. The decoder holds back an incomplete trailing sequence
//! until the next chunk and replaces genuinely invalid bytes with U+FFFD.
//! Decoding never fails.

/// Text produced from one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// Number of invalid sequences replaced with U+FFFD
    pub replaced: usize,
}

#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Bytes of an incomplete sequence carried over from the previous chunk
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk of the stream.
    pub fn decode(&mut self, bytes: &[u8]) -> Decoded {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut decoded = Decoded {
            text: String::with_capacity(input.len()),
            replaced: 0,
        };
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    decoded.text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        decoded.text.push_str(valid);
                    }
                    match e.error_len() {
                        Some(len) => {
                            decoded.text.push(char::REPLACEMENT_CHARACTER);
                            decoded.replaced += 1;
                            rest = &after[len..];
                        }
                        None => {
                            // Truncated sequence at the end of the chunk
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        decoded
    }

    /// Flush at end of stream: a dangling partial sequence becomes one
    /// replacement char.
    pub fn finish(&mut self) -> Decoded {
        if self.pending.is_empty() {
            return Decoded::default();
        }
        self.pending.clear();
        Decoded {
            text: char::REPLACEMENT_CHARACTER.to_string(),
            replaced: 1,
        }
    }

    /// Whether bytes are being held back waiting for the rest of a sequence
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
