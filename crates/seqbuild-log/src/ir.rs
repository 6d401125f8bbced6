use serde::{Deserialize, Serialize};

/// Substring that marks a line of build output as an error.
pub const ERROR_MARKER: &str = ": error:";

/// One error line recovered from build output.
///
/// `line` and `col` are the raw text fragments found between the colons; they
/// are not validated. Use [`ErrorRecord::position`] for a numeric view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<String>,
    pub message: String,
}

impl ErrorRecord {
    /// Builds a record from a single line of output.
    ///
    /// Returns `None` when the line does not contain [`ERROR_MARKER`].
    /// The location fields come from the `:`-separated segments in front of
    /// the first marker; `message` is the whole line, untouched.
    pub fn from_line(line: &str) -> Option<Self> {
        let marker = line.find(ERROR_MARKER)?;
        let mut segments = line[..marker].split(':');

        Some(Self {
            file: segments.next().unwrap_or_default().to_string(),
            line: segments.next().map(str::to_string),
            col: segments.next().map(str::to_string),
            message: line.to_string(),
        })
    }

    /// Numeric line/column, if both fragments are present and decimal.
    pub fn position(&self) -> Option<Position> {
        let line = self.line.as_deref()?.trim().parse().ok()?;
        let column = self.col.as_deref()?.trim().parse().ok()?;
        Some(Position { line, column })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}
