//! Wrapping the console text into screen rows.
//!
//! Each row remembers the char offset it starts at, which is what turns a
//! mouse click on a cell back into a console position and a console cursor
//! position into a cell.

use unicode_width::UnicodeWidthChar;

/// One screen row of wrapped console text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualRow {
    /// Char offset of the first char on this row
    pub start: usize,
    /// Whether this row begins a logical line rather than continuing a
    /// wrapped one
    pub starts_line: bool,
    /// Display text, with control chars replaced by spaces
    pub text: String,
    /// Column width of each char in `text`
    widths: Vec<usize>,
}

impl VisualRow {
    fn new(start: usize, starts_line: bool) -> Self {
        Self {
            start,
            starts_line,
            text: String::new(),
            widths: Vec::new(),
        }
    }

    /// Number of chars on the row (excluding a terminating newline)
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    fn width(&self) -> usize {
        self.widths.iter().sum()
    }

    fn push(&mut self, c: char, width: usize) {
        self.text.push(c);
        self.widths.push(width);
    }
}

/// Wrap `text` to `width` columns. Always returns at least one row; a
/// trailing newline produces an empty last row for the cursor to sit on.
pub fn wrap_rows(text: &str, width: u16) -> Vec<VisualRow> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut row = VisualRow::new(0, true);

    for (offset, c) in text.chars().enumerate() {
        if c == '\n' {
            rows.push(std::mem::replace(&mut row, VisualRow::new(offset + 1, true)));
            continue;
        }

        let (display, w) = display_char(c);
        if !row.is_empty() && row.width() + w > width {
            rows.push(std::mem::replace(&mut row, VisualRow::new(offset, false)));
        }
        row.push(display, w);
    }
    rows.push(row);
    rows
}

fn display_char(c: char) -> (char, usize) {
    if c.is_control() {
        return (' ', 1);
    }
    match c.width() {
        Some(w) => (c, w),
        None => (' ', 1),
    }
}

/// Screen cell `(column, row index)` of console position `position`.
pub fn cell_for_position(rows: &[VisualRow], position: usize) -> (usize, usize) {
    let index = rows
        .iter()
        .rposition(|row| row.start <= position)
        .unwrap_or(0);
    let Some(row) = rows.get(index) else {
        return (0, 0);
    };
    let chars_before = (position - row.start.min(position)).min(row.len());
    let column = row.widths[..chars_before].iter().sum();
    (column, index)
}

/// Console position under the cell at `column` of row `row_index`.
///
/// Clicks past the end of a row land at the row's end; clicks below the
/// last row land at the end of the text.
pub fn position_for_cell(rows: &[VisualRow], column: usize, row_index: usize) -> usize {
    let Some(row) = rows.get(row_index).or_else(|| rows.last()) else {
        return 0;
    };
    if row_index >= rows.len() {
        return row.start + row.len();
    }

    let mut used = 0;
    for (i, w) in row.widths.iter().enumerate() {
        if column < used + w {
            return row.start + i;
        }
        used += w;
    }
    row.start + row.len()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rows tile the text: each starts where the previous one ended,
        /// skipping one char for the newline that separates logical lines.
        #[test]
        fn prop_rows_cover_text_without_gaps(text in "[a-z日 \n]{0,40}", width in 1u16..20) {
            let rows = wrap_rows(&text, width);
            let char_count = text.chars().count();

            prop_assert_eq!(rows[0].start, 0);
            for pair in rows.windows(2) {
                let gap = usize::from(pair[1].starts_line);
                prop_assert_eq!(pair[1].start, pair[0].start + pair[0].len() + gap);
            }
            let last = &rows[rows.len() - 1];
            prop_assert_eq!(last.start + last.len(), char_count);

            for row in &rows {
                prop_assert!(row.width() <= usize::from(width) || row.len() == 1);
            }
        }

        /// Clicking the cell the cursor is drawn in lands on the same position.
        #[test]
        fn prop_cell_round_trips_to_position(text in "[a-z日 \n]{0,40}", width in 1u16..20) {
            let rows = wrap_rows(&text, width);
            for position in 0..=text.chars().count() {
                let (column, row) = cell_for_position(&rows, position);
                prop_assert_eq!(position_for_cell(&rows, column, row), position);
            }
        }
    }
}
