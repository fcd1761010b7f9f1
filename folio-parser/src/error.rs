use std::error::Error;
use std::fmt;

use pest::Span;

use super::Rule;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// Input is invalid in some way.
    InvalidInput { message: String },
    /// A holding or sub-transaction does not have the shape of a record.
    InvalidRecord { path: String, message: String },
    /// Parser has reached an invalid state (most likely a bug in the parser).
    InvalidParserState { message: String },
}

#[derive(Debug)]
pub struct ParseError {
    /// The type of error.
    pub kind: ParseErrorKind,
    /// The (line, column) location of the error in the input.
    pub location: (usize, usize),
    source: Option<Box<dyn Error + 'static + Send + Sync>>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)?;
            }
            ParseErrorKind::InvalidRecord { path, message } => {
                // Records are addressed by path, not by position in the text.
                return write!(f, "Invalid record at {}: {}", path, message);
            }
            ParseErrorKind::InvalidParserState { message } => {
                write!(f, "Parser has reached an invalid state (please report this as a bug): expected {}", message)?;
            }
        }
        write!(f, " at line {} column {}", self.location.0, self.location.1)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl ParseError {
    pub fn is_invalid_record(&self) -> bool {
        matches!(self.kind, ParseErrorKind::InvalidRecord { .. })
    }

    pub(crate) fn invalid_state_with_span<T: ToString>(msg: T, span: Span) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidParserState {
                message: msg.to_string(),
            },
            location: span.start_pos().line_col(),
            source: None,
        }
    }

    pub(crate) fn invalid_input<T: ToString>(msg: T) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: msg.to_string(),
            },
            location: (1, 1),
            source: None,
        }
    }

    pub(crate) fn invalid_input_with_span<T: ToString>(msg: T, span: Span) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: msg.to_string(),
            },
            location: span.start_pos().line_col(),
            source: None,
        }
    }

    pub(crate) fn invalid_record<P: ToString, T: ToString>(path: P, msg: T) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidRecord {
                path: path.to_string(),
                message: msg.to_string(),
            },
            location: (0, 0),
            source: None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: format!("malformed JSON: {}", err),
            },
            location: (err.line(), err.column()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(|rule| {
            match *rule {
                Rule::EOI => "end of input",
                Rule::WHITESPACE => "whitespace",
                Rule::COMMENT => "comment",
                Rule::bare_word => "bare word",
                Rule::double_quote => "double quotation mark",
                Rule::inner_quoted_str => "inner part of a quoted string",
                Rule::quoted_str => "quoted string",
                Rule::name => "name",
                Rule::key => "column key",
                Rule::label => "column label",
                Rule::separator => "'=' or ':'",
                Rule::column => "column",
                Rule::column_list => "list of columns",
                Rule::columns => "column specification",
            }
            .to_string()
        });
        let location = match &err.line_col {
            pest::error::LineColLocation::Pos(ref p) => *p,
            pest::error::LineColLocation::Span(ref p, _) => *p,
        };
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: format!("{}", err),
            },
            location,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_errors_show_their_path() {
        let err = ParseError::invalid_record("[2].user_transactions[0]", "expected an object, found a string");
        assert!(err.is_invalid_record());
        assert_eq!(
            err.to_string(),
            "Invalid record at [2].user_transactions[0]: expected an object, found a string"
        );
    }

    #[test]
    fn json_errors_keep_their_location() {
        let err: ParseError = serde_json::from_str::<serde_json::Value>("[\n  {\"a\": }\n]")
            .unwrap_err()
            .into();
        assert!(!err.is_invalid_record());
        assert_eq!(err.location.0, 2);
        assert!(err.source().is_some());
    }
}
