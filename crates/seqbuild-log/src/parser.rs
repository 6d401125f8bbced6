use crate::ir::ErrorRecord;

/// Extracts [`ErrorRecord`]s from captured build output.
///
/// The extractor works on whole lines. [`parse`](Self::parse) handles a
/// complete block of output in one call; [`update`](Self::update) and
/// [`finish`](Self::finish) accept the same text in arbitrary chunks and
/// produce the same records.
#[derive(Debug, Default)]
pub struct ErrorExtractor {
    buffer: String,
}

impl ErrorExtractor {
    /// Creates an extractor with an empty line buffer.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Extracts every error record from `input`, in input order.
    ///
    /// Lines are split on `\n` or `\r\n`. Lines without `: error:` are
    /// dropped. This never fails.
    pub fn parse(&self, input: &str) -> Vec<ErrorRecord> {
        input.lines().filter_map(ErrorRecord::from_line).collect()
    }

    /// Appends `chunk` and returns records for every line it completed.
    ///
    /// An unterminated trailing line stays buffered until more input or
    /// [`finish`](Self::finish) arrives.
    pub fn update(&mut self, chunk: &str) -> Vec<ErrorRecord> {
        self.buffer.push_str(chunk);

        let Some(last_nl) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let records = self.parse(&self.buffer[..=last_nl]);
        self.buffer.replace_range(..=last_nl, "");
        records
    }

    /// Consumes the extractor and processes whatever is left in the buffer.
    pub fn finish(self) -> Vec<ErrorRecord> {
        self.parse(&self.buffer)
    }
}

/// Shorthand for `ErrorExtractor::new().parse(input)`.
pub fn extract_errors(input: &str) -> Vec<ErrorRecord> {
    ErrorExtractor::new().parse(input)
}
