use std::io;

use thiserror::Error;

/// A table that cannot be given column widths.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DegenerateLayout {
    #[error("there are no rows to lay out, not even a header")]
    EmptyRows,
    #[error("the header row has no columns")]
    NoColumns,
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("the columns have no width to scale")]
    ZeroWidth,
    #[error("the target width must be positive and finite, got {0}")]
    InvalidTargetWidth(f64),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("degenerate layout: {0}")]
    Layout(#[from] DegenerateLayout),
    #[error("identity column '{0}' is not one of the table columns")]
    UnknownIdentityColumn(String),
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
    #[error("an io error occurred")]
    Io(#[from] io::Error),
    #[error("could not serialize the table plan")]
    Json(#[from] serde_json::Error),
}
