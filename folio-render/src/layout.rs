use log::debug;
use typed_builder::TypedBuilder;

use folio_core::DisplayRow;

use crate::error::DegenerateLayout;

/// Average glyph width of Helvetica relative to the font size, as observed on ledger tables.
pub const DEFAULT_CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Font and spacing figures that turn a character count into a column width.
#[derive(Copy, Clone, Debug, PartialEq, TypedBuilder)]
pub struct CellMetrics {
    pub font_size: f64,

    /// Horizontal space added to every column, in points.
    pub padding: f64,

    #[builder(default = DEFAULT_CHAR_WIDTH_FACTOR)]
    pub char_width_factor: f64,
}

impl CellMetrics {
    /// Estimated width of one character.
    pub fn glyph_width(&self) -> f64 {
        self.font_size * self.char_width_factor
    }

    /// Width of a column whose longest cell has `chars` characters.
    pub fn column_width(&self, chars: usize) -> f64 {
        self.glyph_width() * chars as f64 + self.padding
    }
}

/// Longest cell of every column, in characters, over all rows including the header.
pub fn max_cell_lengths(rows: &[DisplayRow]) -> Result<Vec<usize>, DegenerateLayout> {
    let header = rows.first().ok_or(DegenerateLayout::EmptyRows)?;
    let expected = header.len();
    if expected == 0 {
        return Err(DegenerateLayout::NoColumns);
    }

    let mut lengths = vec![0; expected];
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(DegenerateLayout::ColumnMismatch {
                row: row_index,
                expected,
                found: row.len(),
            });
        }
        for (max, cell) in lengths.iter_mut().zip(row.iter()) {
            *max = (*max).max(cell.chars().count());
        }
    }
    Ok(lengths)
}

/// Computes one width per column from the longest cell in that column.
///
/// Without a target the raw widths are returned and the table is as wide as their sum. With a
/// target every width is scaled by the same factor so that they add up to `target_total_width`.
pub fn compute_widths(
    rows: &[DisplayRow],
    metrics: &CellMetrics,
    target_total_width: Option<f64>,
) -> Result<Vec<f64>, DegenerateLayout> {
    let raw: Vec<f64> = max_cell_lengths(rows)?
        .into_iter()
        .map(|chars| metrics.column_width(chars))
        .collect();

    match target_total_width {
        Some(target) => fit_to_width(raw, target),
        None => Ok(raw),
    }
}

/// Scales `widths` uniformly so they sum to `target`.
pub fn fit_to_width(widths: Vec<f64>, target: f64) -> Result<Vec<f64>, DegenerateLayout> {
    if !target.is_finite() || target <= 0.0 {
        return Err(DegenerateLayout::InvalidTargetWidth(target));
    }
    let total: f64 = widths.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(DegenerateLayout::ZeroWidth);
    }

    let scale = target / total;
    debug!("scaling {} columns from {:.2}pt to {:.2}pt (x{:.4})", widths.len(), total, target, scale);
    Ok(widths.into_iter().map(|w| w * scale).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<DisplayRow> {
        vec![
            DisplayRow::from(vec!["Sym", "Q", "Sector"]),
            DisplayRow::from(vec!["NABIL", "5.00", ""]),
            DisplayRow::from(vec!["bob", "1250.00", "Banks"]),
        ]
    }

    fn metrics() -> CellMetrics {
        CellMetrics::builder().font_size(10.0).padding(4.0).char_width_factor(0.5).build()
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let rows = vec![
            DisplayRow::from(vec!["Sym"]),
            DisplayRow::from(vec!["↳ bob"]),
        ];
        assert_eq!(max_cell_lengths(&rows), Ok(vec![5]));
    }

    #[test]
    fn raw_widths() {
        assert_eq!(max_cell_lengths(&rows()), Ok(vec![5, 7, 6]));
        assert_eq!(compute_widths(&rows(), &metrics(), None), Ok(vec![29.0, 39.0, 34.0]));
    }

    #[test]
    fn default_factor() {
        let metrics = CellMetrics::builder().font_size(7.0).padding(5.0).build();
        assert_eq!(metrics.char_width_factor, DEFAULT_CHAR_WIDTH_FACTOR);
        assert!((metrics.column_width(10) - 47.0).abs() < 1e-9);
    }

    #[test]
    fn scaled_widths_sum_to_target_and_keep_proportions() {
        for target in [1.0, 102.0, 555.27, 10_000.0] {
            let widths = compute_widths(&rows(), &metrics(), Some(target)).unwrap();
            let total: f64 = widths.iter().sum();
            assert!((total - target).abs() < 1e-9 * target.max(1.0), "{} != {}", total, target);
            assert!((widths[1] / widths[0] - 39.0 / 29.0).abs() < 1e-12);
        }
    }

    #[test]
    fn widths_are_deterministic() {
        let first = compute_widths(&rows(), &metrics(), Some(500.0)).unwrap();
        let second = compute_widths(&rows(), &metrics(), Some(500.0)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn widths_grow_with_the_longest_cell() {
        let mut longer = rows();
        longer.push(DisplayRow::from(vec!["A", "B", "Hydro Power"]));
        let before = compute_widths(&rows(), &metrics(), None).unwrap();
        let after = compute_widths(&longer, &metrics(), None).unwrap();
        assert_eq!(before[..2], after[..2]);
        assert!(after[2] > before[2]);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(compute_widths(&[], &metrics(), None), Err(DegenerateLayout::EmptyRows));
        assert_eq!(
            compute_widths(&[DisplayRow::new(Vec::new())], &metrics(), None),
            Err(DegenerateLayout::NoColumns)
        );

        let mut ragged = rows();
        ragged.push(DisplayRow::from(vec!["only", "two"]));
        assert_eq!(
            compute_widths(&ragged, &metrics(), None),
            Err(DegenerateLayout::ColumnMismatch {
                row: 3,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn invalid_targets() {
        assert_eq!(
            compute_widths(&rows(), &metrics(), Some(0.0)),
            Err(DegenerateLayout::InvalidTargetWidth(0.0))
        );
        assert!(matches!(
            compute_widths(&rows(), &metrics(), Some(f64::NAN)),
            Err(DegenerateLayout::InvalidTargetWidth(_))
        ));

        let empty = vec![DisplayRow::from(vec![""])];
        let no_padding = CellMetrics::builder().font_size(10.0).padding(0.0).build();
        assert_eq!(
            compute_widths(&empty, &no_padding, Some(100.0)),
            Err(DegenerateLayout::ZeroWidth)
        );
    }
}
