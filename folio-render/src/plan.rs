use chrono::NaiveDateTime;
use log::info;
use serde::Serialize;

use folio_core::{ColumnSpec, DisplayRow, Ledger, RowStyle};

use crate::config::{Margins, RenderConfig};
use crate::error::RenderError;
use crate::flatten::FlatTable;
use crate::layout::compute_widths;
use crate::theme::Rgb;

pub const FONT_NAME: &str = "Helvetica";
pub const GRID_WIDTH: f64 = 0.25;

/// Everything a page-description backend needs to draw one table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TablePlan {
    pub document_name: String,
    pub page: Page,
    pub page_background: Option<Rgb>,
    pub font: Font,
    pub grid: Grid,
    /// Vertical padding inside every cell.
    pub cell_padding: f64,
    /// The header row is drawn again at the top of every page.
    pub repeat_header: bool,
    pub column_widths: Vec<f64>,
    pub rows: Vec<PlannedRow>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Font {
    pub name: String,
    pub size: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    pub width: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlannedRow {
    pub cells: DisplayRow,
    pub style: RowStyle,
    pub fill: Rgb,
    pub text: Rgb,
}

impl TablePlan {
    pub fn header(&self) -> Option<&PlannedRow> {
        self.rows.first()
    }

    pub fn table_width(&self) -> f64 {
        self.column_widths.iter().sum()
    }
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.pdf`
pub fn document_name(prefix: &str, timestamp: NaiveDateTime) -> String {
    format!("{}_{}.pdf", prefix, timestamp.format("%Y%m%d_%H%M%S"))
}

/// Lays out an already flattened table.
pub fn plan_table(
    table: FlatTable,
    config: &RenderConfig,
    timestamp: NaiveDateTime,
) -> Result<TablePlan, RenderError> {
    config.validate()?;
    let column_widths = compute_widths(&table.rows, &config.metrics(), config.target_width())?;
    let (width, height) = config.page_size(&column_widths);
    let palette = config.theme.palette();

    let rows = table
        .rows
        .into_iter()
        .zip(table.styles)
        .map(|(cells, style)| PlannedRow {
            cells,
            style,
            fill: palette.fill(style),
            text: palette.text(style),
        })
        .collect();

    let plan = TablePlan {
        document_name: document_name(&config.file_prefix, timestamp),
        page: Page {
            width,
            height,
            margins: config.margins,
        },
        page_background: palette.page_background,
        font: Font {
            name: FONT_NAME.to_string(),
            size: config.font_size,
        },
        grid: Grid {
            width: GRID_WIDTH,
            color: palette.grid,
        },
        cell_padding: config.cell_padding,
        repeat_header: true,
        column_widths,
        rows,
    };
    info!(
        "planned {} ({} rows, {:.1}x{:.1}pt)",
        plan.document_name,
        plan.rows.len(),
        plan.page.width,
        plan.page.height
    );
    Ok(plan)
}

/// Flattens `ledger` and lays it out according to `config`.
pub fn plan(
    ledger: &Ledger<'_>,
    columns: &ColumnSpec<'_>,
    config: &RenderConfig,
    timestamp: NaiveDateTime,
) -> Result<TablePlan, RenderError> {
    config.validate()?;
    let table = config
        .flattener()
        .flatten(ledger, columns, &config.identity_column)?;
    plan_table(table, config, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 30))
            .unwrap()
    }

    #[test]
    fn document_names() {
        assert_eq!(
            document_name("portfolio_A4portrait", timestamp()),
            "portfolio_A4portrait_20240309_070530.pdf"
        );
    }

    #[test]
    fn empty_table_is_degenerate() {
        let err = plan_table(FlatTable::default(), &RenderConfig::default(), timestamp()).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
    }

    #[test]
    fn invalid_config_is_rejected_before_layout() {
        let mut config = RenderConfig::default();
        config.font_size = -1.0;
        let err = plan_table(FlatTable::default(), &config, timestamp()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }
}
