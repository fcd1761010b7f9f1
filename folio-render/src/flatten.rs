use log::debug;
use serde::Serialize;
use typed_builder::TypedBuilder;

use folio_core::{ColumnSpec, DisplayRow, Ledger, RowSource, RowStyle, Shade, SubTransaction};

use crate::config::SecondaryShading;
use crate::error::RenderError;

/// Display rows of a ledger with their style tags. The first row is always the header.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FlatTable {
    pub rows: Vec<DisplayRow>,
    pub styles: Vec<RowStyle>,
}

impl FlatTable {
    pub fn header(&self) -> Option<&DisplayRow> {
        self.rows.first()
    }

    /// Rows below the header.
    pub fn body(&self) -> &[DisplayRow] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DisplayRow, RowStyle)> {
        self.rows.iter().zip(self.styles.iter().copied())
    }
}

/// Turns holdings into display rows.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct Flattener {
    #[builder(default)]
    pub secondary_shading: SecondaryShading,

    /// Put in front of the display name in the identity cell of sub-transaction rows.
    #[builder(default, setter(strip_option, into))]
    pub secondary_marker: Option<String>,
}

impl Flattener {
    /// Row sources in display order, header first.
    pub fn expand<'r, 'a>(&self, ledger: &'r Ledger<'a>) -> Vec<RowSource<'r, 'a>> {
        let mut sources = Vec::with_capacity(1 + ledger.len() + ledger.sub_transaction_count());
        sources.push(RowSource::Header);

        for (ordinal, holding) in ledger.holdings.iter().enumerate() {
            if holding.has_sub_transactions() {
                for (position, sub) in holding.sub_transactions.iter().enumerate() {
                    sources.push(RowSource::Secondary {
                        sub,
                        identity: self.identity(sub),
                        holding_ordinal: ordinal,
                        position,
                    });
                }
            } else {
                sources.push(RowSource::Primary { holding, ordinal });
            }
        }
        sources
    }

    pub fn style(&self, source: &RowSource<'_, '_>) -> RowStyle {
        match source {
            RowSource::Header => RowStyle::Header,
            RowSource::Primary { ordinal, .. } => RowStyle::Primary(Shade::for_ordinal(*ordinal)),
            RowSource::Secondary { position, .. } => match self.secondary_shading {
                SecondaryShading::Fixed => RowStyle::Secondary(Shade::Even),
                SecondaryShading::Alternating => RowStyle::Secondary(Shade::for_ordinal(*position)),
            },
        }
    }

    pub fn flatten(
        &self,
        ledger: &Ledger<'_>,
        columns: &ColumnSpec<'_>,
        identity_key: &str,
    ) -> Result<FlatTable, RenderError> {
        let identity_index = columns
            .index_of(identity_key)
            .ok_or_else(|| RenderError::UnknownIdentityColumn(identity_key.to_string()))?;

        let sources = self.expand(ledger);
        let mut table = FlatTable {
            rows: Vec::with_capacity(sources.len()),
            styles: Vec::with_capacity(sources.len()),
        };
        for source in &sources {
            table.rows.push(source.cells(columns, identity_index));
            table.styles.push(self.style(source));
        }

        debug!(
            "flattened {} holdings into {} rows of {} columns",
            ledger.len(),
            table.body().len(),
            columns.len()
        );
        Ok(table)
    }

    fn identity(&self, sub: &SubTransaction<'_>) -> String {
        match &self.secondary_marker {
            Some(marker) => format!("{}{}", marker, sub.display_name_text()),
            None => sub.display_name_text(),
        }
    }
}

/// Flattens `ledger` with the default [`Flattener`].
pub fn flatten(
    ledger: &Ledger<'_>,
    columns: &ColumnSpec<'_>,
    identity_key: &str,
) -> Result<FlatTable, RenderError> {
    Flattener::default().flatten(ledger, columns, identity_key)
}
