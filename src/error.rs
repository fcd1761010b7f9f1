use std::io;

use folio_core::ColumnSpecError;
use folio_parser::error::ParseError;
use folio_render::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("invalid column set: {0}")]
    Columns(#[from] ColumnSpecError),
    #[error("an io error occurred")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
