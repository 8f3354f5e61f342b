use std::fmt;
use std::ops::Range;

//===========================================================================//

/// A span of byte offsets within a table source file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SrcSpan {
    start: usize,
    end: usize,
}

impl SrcSpan {
    /// Constructs a span from the given the byte range.
    pub fn from_byte_range(range: Range<usize>) -> SrcSpan {
        assert!(range.start <= range.end);
        SrcSpan { start: range.start, end: range.end }
    }

    pub(crate) fn end_span(&self) -> SrcSpan {
        SrcSpan { start: self.end, end: self.end }
    }

    /// Returns the one-based line number on which this span starts within
    /// `source`.
    pub fn line_in(&self, source: &str) -> usize {
        let start = self.start.min(source.len());
        1 + source.as_bytes()[..start].iter().filter(|&&b| b == b'\n').count()
    }
}

impl fmt::Display for SrcSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

//===========================================================================//

/// A specialized `Result` type for parsing operations.
pub type ParseResult<V> = Result<V, Vec<ParseError>>;

//===========================================================================//

/// An error encountered while parsing a table source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    /// The primary location in the file where the error occurred.
    pub span: SrcSpan,
    /// The error message to report to the user.
    pub message: String,
    /// Any additional label annotations for this error.
    pub labels: Vec<ParseErrorLabel>,
}

impl ParseError {
    /// Constructs a parse error with the given span and message, and other
    /// fields initially empty.
    pub fn new(span: SrcSpan, message: String) -> ParseError {
        ParseError { span, message, labels: Vec::new() }
    }

    /// Adds an additional label to the error.
    pub fn with_label(mut self, span: SrcSpan, message: String) -> ParseError {
        self.labels.push(ParseErrorLabel { span, message });
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}: {}", self.span, self.message)?;
        for label in self.labels.iter() {
            write!(f, " ({} at bytes {})", label.message, label.span)?;
        }
        Ok(())
    }
}

//===========================================================================//

/// An additional label annotation for a [`ParseError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseErrorLabel {
    /// The location in the file to which the label applies.
    pub span: SrcSpan,
    /// The message to attach to the label.
    pub message: String,
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::SrcSpan;

    #[test]
    fn end_of_span() {
        let span = SrcSpan::from_byte_range(4..9);
        assert_eq!(span.end_span(), SrcSpan::from_byte_range(9..9));
        assert_eq!(span.to_string(), "4..9");
    }

    #[test]
    fn line_numbers() {
        let source = "foo\nbar\nbaz";
        assert_eq!(SrcSpan::from_byte_range(0..3).line_in(source), 1);
        assert_eq!(SrcSpan::from_byte_range(4..7).line_in(source), 2);
        assert_eq!(SrcSpan::from_byte_range(8..11).line_in(source), 3);
        assert_eq!(SrcSpan::from_byte_range(50..51).line_in(source), 3);
    }
}

//===========================================================================//
