//! Turns a portfolio ledger (holdings, some with per-user sub-transactions) into a table plan:
//! display rows with style tags, column widths, page box and colours, ready for a PDF backend.
//!
//! ```no_run
//! use chrono::Local;
//! use folio::{build_plan, LedgerOptions, Preset, DEFAULT_COLUMNS};
//!
//! let json = std::fs::read_to_string("data.json")?;
//! let plan = build_plan(
//!     &json,
//!     &DEFAULT_COLUMNS,
//!     &LedgerOptions::default(),
//!     &Preset::A4Portrait.config(),
//!     Local::now().naive_local(),
//! )?;
//! println!("{}", plan.document_name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use chrono::NaiveDateTime;
use log::debug;

pub use folio_core::{Column, ColumnSpec, DisplayRow, Ledger, RowStyle, DEFAULT_COLUMNS};
pub use folio_parser::{parse_columns, parse_ledger, read_json, LedgerOptions};
pub use folio_render::{
    ConfigOverrides, FlatTable, JsonRenderer, PageGeometry, Preset, RenderConfig, Renderer,
    SecondaryShading, TablePlan, TextRenderer, Theme,
};

pub use error::{Error, Result};

pub mod error;

/// Decodes `ledger_json` and flattens it with the flattener `config` describes.
pub fn build_table(
    ledger_json: &str,
    columns: &ColumnSpec<'_>,
    options: &LedgerOptions,
    config: &RenderConfig,
) -> Result<FlatTable> {
    let document = read_json(ledger_json)?;
    let ledger = parse_ledger(&document, options)?;
    Ok(config
        .flattener()
        .flatten(&ledger, columns, &config.identity_column)?)
}

/// Decodes `ledger_json` and lays it out as a table plan.
pub fn build_plan(
    ledger_json: &str,
    columns: &ColumnSpec<'_>,
    options: &LedgerOptions,
    config: &RenderConfig,
    timestamp: NaiveDateTime,
) -> Result<TablePlan> {
    let document = read_json(ledger_json)?;
    let ledger = parse_ledger(&document, options)?;
    Ok(folio_render::plan(&ledger, columns, config, timestamp)?)
}

/// Replaces labels that merely repeat their key with the built-in label for that key, if any.
pub fn with_default_labels(columns: ColumnSpec<'_>) -> Result<ColumnSpec<'_>> {
    let columns = columns
        .iter()
        .map(|column| {
            if column.label != column.key {
                return column.clone();
            }
            match DEFAULT_COLUMNS.iter().find(|d| d.key == column.key) {
                Some(default) => {
                    debug!("labelling column '{}' as '{}'", column.key, default.label);
                    Column {
                        key: column.key.clone(),
                        label: default.label.clone(),
                    }
                }
                None => column.clone(),
            }
        })
        .collect();
    Ok(ColumnSpec::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indoc::indoc;

    const LEDGER: &str = indoc! {r#"
        [
          {"symbol": "AAA", "quantity": 5.0},
          {"symbol": "BBB", "quantity": 3.0, "user_transactions": [
            {"user_name": "bob", "quantity": 2.0},
            {"user_name": "alice", "quantity": 1.0}
          ]}
        ]
    "#};

    #[test]
    fn builds_a_table() -> anyhow::Result<()> {
        let columns = parse_columns("symbol = Sym, quantity = Q")?;
        let table = build_table(LEDGER, &columns, &LedgerOptions::default(), &RenderConfig::default())?;
        let names: Vec<_> = table.body().iter().map(|row| row[0].as_str()).collect();
        assert_eq!(names, vec!["AAA", "bob", "alice"]);
        Ok(())
    }

    #[test]
    fn builds_a_plan() -> anyhow::Result<()> {
        let timestamp = NaiveDate::from_ymd_opt(2023, 12, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap();
        let plan = build_plan(
            LEDGER,
            &DEFAULT_COLUMNS,
            &LedgerOptions::default(),
            &Preset::DarkA4.config(),
            timestamp,
        )?;
        assert_eq!(plan.document_name, "darkcolored_20231201_093000.pdf");
        assert_eq!(plan.column_widths.len(), DEFAULT_COLUMNS.len());
        Ok(())
    }

    #[test]
    fn errors_keep_their_origin() {
        let columns = parse_columns("symbol").unwrap();
        let err = build_table("[1]", &columns, &LedgerOptions::default(), &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ref e) if e.is_invalid_record()));

        let err = build_table(
            LEDGER,
            &parse_columns("quantity").unwrap(),
            &LedgerOptions::default(),
            &RenderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn default_labels_fill_in_bare_keys() -> anyhow::Result<()> {
        let columns = with_default_labels(parse_columns("symbol, quantity = Qty, sectorName, custom")?)?;
        let labels: Vec<_> = columns.labels().collect();
        assert_eq!(labels[..2], ["Sym", "Qty"]);
        assert_eq!(labels[3], "custom");
        Ok(())
    }
}
