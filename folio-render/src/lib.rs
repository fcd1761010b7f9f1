use std::io::Write;

use folio_core::DisplayRow;

pub use config::{
    ConfigOverrides, Margins, PageGeometry, Preset, RenderConfig, SecondaryShading, Theme, A4, MM,
};
pub use error::{DegenerateLayout, RenderError};
pub use flatten::{flatten, FlatTable, Flattener};
pub use layout::{compute_widths, fit_to_width, max_cell_lengths, CellMetrics, DEFAULT_CHAR_WIDTH_FACTOR};
pub use plan::{document_name, plan, plan_table, Font, Grid, Page, PlannedRow, TablePlan};
pub use theme::{Palette, Rgb};

pub mod config;
mod error;
pub mod flatten;
pub mod layout;
pub mod plan;
pub mod theme;


pub trait Renderer<T, W: Write> {
    type Error;
    fn render(&self, renderable: T, write: &mut W) -> Result<(), Self::Error>;
}

/// Writes tables and plans as JSON for downstream drawing backends.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn pretty() -> Self {
        JsonRenderer { pretty: true }
    }

    fn write<T: serde::Serialize, W: Write>(&self, value: &T, write: &mut W) -> Result<(), RenderError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *write, value)?;
        } else {
            serde_json::to_writer(&mut *write, value)?;
        }
        writeln!(write)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a FlatTable, W> for JsonRenderer {
    type Error = RenderError;
    fn render(&self, table: &'a FlatTable, write: &mut W) -> Result<(), Self::Error> {
        self.write(table, write)
    }
}

impl<'a, W: Write> Renderer<&'a TablePlan, W> for JsonRenderer {
    type Error = RenderError;
    fn render(&self, plan: &'a TablePlan, write: &mut W) -> Result<(), Self::Error> {
        self.write(plan, write)
    }
}

/// Writes a plain-text preview with left-aligned, space-padded columns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct TextRenderer {}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_rows<'r, W: Write>(
        &self,
        rows: impl Iterator<Item = &'r DisplayRow>,
        write: &mut W,
    ) -> Result<(), RenderError> {
        let all: Vec<DisplayRow> = rows.cloned().collect();
        let widths = max_cell_lengths(&all)?;

        for (i, row) in all.iter().enumerate() {
            render_row(write, row, &widths)?;
            if i == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                render_row(write, &DisplayRow::new(rule), &widths)?;
            }
        }
        Ok(())
    }
}

fn render_row<W: Write>(write: &mut W, row: &DisplayRow, widths: &[usize]) -> Result<(), RenderError> {
    let mut line = String::new();
    for (i, (cell, width)) in row.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    writeln!(write, "{}", line.trim_end())?;
    Ok(())
}

impl<'a, W: Write> Renderer<&'a FlatTable, W> for TextRenderer {
    type Error = RenderError;
    fn render(&self, table: &'a FlatTable, write: &mut W) -> Result<(), Self::Error> {
        self.write_rows(table.rows.iter(), write)
    }
}

impl<'a, W: Write> Renderer<&'a TablePlan, W> for TextRenderer {
    type Error = RenderError;
    fn render(&self, plan: &'a TablePlan, write: &mut W) -> Result<(), Self::Error> {
        writeln!(
            write,
            "{} ({:.1} x {:.1} pt)",
            plan.document_name, plan.page.width, plan.page.height
        )?;
        writeln!(write)?;
        self.write_rows(plan.rows.iter().map(|r| &r.cells), write)
    }
}

/// Writes `plan` as pretty JSON.
pub fn render<W: Write>(w: &mut W, plan: &TablePlan) -> Result<(), RenderError> {
    JsonRenderer::pretty().render(plan, w)
}
