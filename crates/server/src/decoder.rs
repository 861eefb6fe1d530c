use encoding_rs::{CoderResult, Decoder, UTF_8};

/// `BodyDecoder` accumulates request body chunks as UTF-8 text.
///
/// A multi-byte sequence split across two chunks is held back inside the
/// decoder until the rest of it arrives. Whatever is still incomplete when
/// [`BodyDecoder::finish`] is called gets flushed as U+FFFD.
pub struct BodyDecoder {
    decoder: Decoder,
    text: String,
}

impl Default for BodyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder_without_bom_handling(),
            text: String::new(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        self.decode(chunk, false);
    }

    /// Text decoded so far, without any pending partial sequence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn finish(mut self) -> String {
        self.decode(&[], true);
        self.text
    }

    fn decode(&mut self, mut input: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or_else(|| input.len().saturating_add(4));
            self.text.reserve(needed);

            let (result, read, _replaced) =
                self.decoder.decode_to_string(input, &mut self.text, last);
            input = &input[read..];

            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }
}
