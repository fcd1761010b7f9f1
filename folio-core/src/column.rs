use std::borrow::Cow;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use lazy_static::lazy_static;
use typed_builder::TypedBuilder;

/// A table column: the record field it displays and its header label.
#[derive(Clone, Debug, Eq, PartialEq, Hash, TypedBuilder)]
pub struct Column<'a> {
    /// Field looked up in holdings and sub-transactions.
    #[builder(setter(into))]
    pub key: Cow<'a, str>,

    /// Header text.
    #[builder(setter(into))]
    pub label: Cow<'a, str>,
}

impl<'a> Column<'a> {
    pub fn new(key: impl Into<Cow<'a, str>>, label: impl Into<Cow<'a, str>>) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
        }
    }

    pub fn into_owned(self) -> Column<'static> {
        Column {
            key: Cow::Owned(self.key.into_owned()),
            label: Cow::Owned(self.label.into_owned()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColumnSpecError {
    Empty,
    DuplicateKey(String),
}

impl fmt::Display for ColumnSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpecError::Empty => write!(f, "a table needs at least one column"),
            ColumnSpecError::DuplicateKey(key) => write!(f, "column key '{}' is used twice", key),
        }
    }
}

impl Error for ColumnSpecError {}

/// Ordered column definitions of a table. Keys are unique and the spec is never empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnSpec<'a> {
    columns: Vec<Column<'a>>,
}

impl<'a> ColumnSpec<'a> {
    pub fn new(columns: Vec<Column<'a>>) -> Result<Self, ColumnSpecError> {
        if columns.is_empty() {
            return Err(ColumnSpecError::Empty);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_ref()) {
                return Err(ColumnSpecError::DuplicateKey(column.key.to_string()));
            }
        }
        Ok(ColumnSpec { columns })
    }

    /// Builds a spec from `(key, label)` pairs.
    pub fn from_pairs<I, K, L>(pairs: I) -> Result<Self, ColumnSpecError>
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<Cow<'a, str>>,
        L: Into<Cow<'a, str>>,
    {
        Self::new(pairs.into_iter().map(|(k, l)| Column::new(k, l)).collect())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<'a>> {
        self.columns.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_ref())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_ref())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn into_owned(self) -> ColumnSpec<'static> {
        ColumnSpec {
            columns: self.columns.into_iter().map(Column::into_owned).collect(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s ColumnSpec<'a> {
    type Item = &'s Column<'a>;
    type IntoIter = std::slice::Iter<'s, Column<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

const DEFAULT_PAIRS: [(&str, &str); 26] = [
    ("symbol", "Sym"),
    ("transaction_type", "Type"),
    ("lastTradedPrice", "LTP"),
    ("quantity", "Q"),
    ("price", "Pr"),
    ("unreal_gain", "Unr"),
    ("earnings_per_share", "E"),
    ("book_value_per_share", "B"),
    ("return_on_asset", "ROA"),
    ("return_on_equity", "ROE"),
    ("market_cap", "MCap"),
    ("price_loans", "P/L"),
    ("price_earnings", "P/E"),
    ("price_book", "P/B"),
    ("transactionId", "Trans"),
    ("total_investments", "Total In"),
    ("current_value", "Curr"),
    ("unrealProfitPer", "Unreal %"),
    ("amountReceivable", "Amount"),
    ("sectorName", "Sector"),
    ("securityName", "Security"),
    ("dailyChange", "Daily"),
    ("perChange", "Perce"),
    ("interest_income", "Interest"),
    ("net_profit", "Net"),
    ("cash_equivalents", "Cash E"),
];

lazy_static! {
    /// The portfolio summary columns used when no column spec is given.
    pub static ref DEFAULT_COLUMNS: ColumnSpec<'static> = ColumnSpec {
        columns: DEFAULT_PAIRS.iter().map(|&(k, l)| Column::new(k, l)).collect(),
    };
}
