use std::ops::Deref;

use serde::{Serialize, Serializer};

use super::column::ColumnSpec;
use super::record::{Holding, SubTransaction};
use super::scalar::cell_text;

/// The text of one table row, one cell per column.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct DisplayRow(Vec<String>);

impl DisplayRow {
    pub fn new(cells: Vec<String>) -> Self {
        DisplayRow(cells)
    }

    /// A row of `len` empty cells.
    pub fn blank(len: usize) -> Self {
        DisplayRow(vec![String::new(); len])
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0
    }
}

impl Deref for DisplayRow {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for DisplayRow {
    fn from(cells: Vec<String>) -> Self {
        DisplayRow(cells)
    }
}

impl From<Vec<&str>> for DisplayRow {
    fn from(cells: Vec<&str>) -> Self {
        DisplayRow(cells.into_iter().map(String::from).collect())
    }
}

/// Which of two alternating shades a row gets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Shade {
    Even,
    Odd,
}

impl Shade {
    pub fn for_ordinal(ordinal: usize) -> Self {
        if ordinal % 2 == 0 {
            Shade::Even
        } else {
            Shade::Odd
        }
    }
}

/// Style tag attached 1:1 to every display row, resolved to colours at render time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RowStyle {
    Header,
    Primary(Shade),
    Secondary(Shade),
}

impl RowStyle {
    pub fn tag(&self) -> &'static str {
        match self {
            RowStyle::Header => "header",
            RowStyle::Primary(Shade::Even) => "primary-even",
            RowStyle::Primary(Shade::Odd) => "primary-odd",
            RowStyle::Secondary(Shade::Even) => "secondary-even",
            RowStyle::Secondary(Shade::Odd) => "secondary-odd",
        }
    }
}

impl Serialize for RowStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Where a display row comes from.
///
/// A holding without sub-transactions yields one `Primary` row. A holding with sub-transactions
/// yields one `Secondary` row per sub-transaction and none for itself; `identity` is what the
/// identity column shows for that row.
#[derive(Clone, Debug, PartialEq)]
pub enum RowSource<'r, 'a> {
    Header,
    Primary {
        holding: &'r Holding<'a>,
        /// Position of the holding in the ledger.
        ordinal: usize,
    },
    Secondary {
        sub: &'r SubTransaction<'a>,
        identity: String,
        /// Position of the parent holding in the ledger.
        holding_ordinal: usize,
        /// Position of the sub-transaction within its parent.
        position: usize,
    },
}

impl RowSource<'_, '_> {
    /// Materializes the row text. `identity_index` is only consulted for `Secondary` rows.
    pub fn cells(&self, columns: &ColumnSpec<'_>, identity_index: usize) -> DisplayRow {
        match self {
            RowSource::Header => columns.labels().map(String::from).collect::<Vec<_>>().into(),
            RowSource::Primary { holding, .. } => columns
                .keys()
                .map(|key| cell_text(holding.get(key)))
                .collect::<Vec<_>>()
                .into(),
            RowSource::Secondary { sub, identity, .. } => {
                let mut cells = DisplayRow::blank(columns.len()).into_cells();
                for (cell, key) in cells.iter_mut().zip(columns.keys()) {
                    if let Some(value) = sub.get(key) {
                        *cell = value.to_string();
                    }
                }
                if let Some(cell) = cells.get_mut(identity_index) {
                    *cell = identity.clone();
                }
                cells.into()
            }
        }
    }
}
