use std::fmt::Display;

use crate::codec::{CELL_WIDTH, Codec};
use crate::error::CodecError;

/// A chunk that could not be converted and was left out of the output.
#[derive(Debug)]
pub struct ChunkFailure {
    /// Zero-based chunk index in the input.
    pub index: usize,
    /// Input chunk (one character, or up to six bits).
    pub chunk: String,
    /// Why it failed.
    pub error: CodecError,
}

/// Result of a text-level conversion: converted text plus skipped chunks.
#[derive(Debug, Default)]
pub struct Conversion {
    /// Concatenated output of every chunk that converted.
    pub output: String,
    /// Chunks that failed, in input order.
    pub failures: Vec<ChunkFailure>,
}

impl Conversion {
    /// `true` if no chunk was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Split a bit stream into consecutive cells. The last one may be short.
///
/// # Example
/// ```
/// use br_codec::text::cells;
/// assert_eq!(cells("10000011000001"), ["100000", "110000", "01"]);
/// ```
#[must_use]
pub fn cells(bits: &str) -> Vec<String> {
    let chars: Vec<char> = bits.chars().collect();
    chars
        .chunks(CELL_WIDTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn convert<T, I, F>(chunks: I, mut step: F) -> Conversion
where
    T: Display,
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Result<String, CodecError>,
{
    let mut conversion = Conversion::default();
    for (index, chunk) in chunks.into_iter().enumerate() {
        match step(&chunk) {
            Ok(out) => conversion.output.push_str(&out),
            Err(error) => {
                log::warn!("Fragment {index} « {chunk} » ignoré : {error}");
                conversion.failures.push(ChunkFailure {
                    index,
                    chunk: chunk.to_string(),
                    error,
                });
            }
        }
    }
    conversion
}

impl Codec {
    /// ASCII text → Braille bit stream, one cell per character.
    ///
    /// # Example
    /// ```
    /// use br_codec::Codec;
    /// let codec = Codec::from_sources(
    ///     "01100001,100000\n01100010,110000\n".as_bytes(),
    ///     "".as_bytes(),
    ///     "".as_bytes(),
    /// ).unwrap();
    /// assert_eq!(codec.text_to_braille("ab").output, "100000110000");
    /// ```
    #[must_use]
    pub fn text_to_braille(&self, text: &str) -> Conversion {
        convert(text.chars(), |&c| self.char_to_braille(c))
    }

    /// Braille bit stream → lower-case ASCII text, six bits at a time.
    #[must_use]
    pub fn braille_to_text(&self, bits: &str) -> Conversion {
        convert(cells(bits), |cell| self.braille_to_char(cell))
    }

    /// Braille bit stream → Braille Unicode characters, six bits at a time.
    #[must_use]
    pub fn braille_to_unicode(&self, bits: &str) -> Conversion {
        convert(cells(bits), |cell| {
            self.braille_to_codepoint(cell).map(String::from)
        })
    }

    /// ASCII text → Braille Unicode characters, through the Braille cell of each character.
    #[must_use]
    pub fn text_to_unicode(&self, text: &str) -> Conversion {
        convert(text.chars(), |&c| {
            let cell = self.char_to_braille(c)?;
            self.braille_to_codepoint(&cell).map(String::from)
        })
    }
}
