use typed_builder::TypedBuilder;

pub use column::{Column, ColumnSpec, ColumnSpecError, DEFAULT_COLUMNS};
pub use record::{Holding, Record, SubTransaction};
pub use row::{DisplayRow, RowSource, RowStyle, Shade};
pub use scalar::{cell_text, Scalar};

pub mod column;
pub mod record;
pub mod row;
pub mod scalar;

/// Represents the complete ledger consisting of a number of holdings, in input order.
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder)]
pub struct Ledger<'a> {
    #[builder(default)]
    pub holdings: Vec<Holding<'a>>,
}

impl<'a> Ledger<'a> {
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Total number of sub-transactions across every holding.
    pub fn sub_transaction_count(&self) -> usize {
        self.holdings.iter().map(|h| h.sub_transactions.len()).sum()
    }
}
