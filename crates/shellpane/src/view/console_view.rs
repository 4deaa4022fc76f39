//! Console pane rendering.
//!
//! The display text (scrollback plus pending line) is wrapped to the pane
//! width and the visible window is picked from the bottom, offset by the
//! user's scroll. The returned [`RenderedView`] keeps the rows that were
//! drawn so the next mouse click can be mapped back to a console position.

use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use shellpane_core::{Console, ProcessState, ShellChannel};

use super::layout::{cell_for_position, position_for_cell, wrap_rows, VisualRow};
use super::theme::Theme;

/// What was drawn in the last frame
#[derive(Debug, Clone, Default)]
pub struct RenderedView {
    /// Screen area holding console text (excludes the status line)
    pub body: Rect,
    /// Index of the first wrapped row shown at the top of `body`
    pub first_row: usize,
    /// Scroll actually applied, after clamping
    pub scroll: usize,
    pub rows: Vec<VisualRow>,
}

impl RenderedView {
    /// Console position under screen cell `(x, y)`, if it lies in the body.
    pub fn position_at(&self, x: u16, y: u16) -> Option<usize> {
        if !self.body.contains(Position::new(x, y)) {
            return None;
        }
        let column = usize::from(x - self.body.x);
        let row = self.first_row + usize::from(y - self.body.y);
        Some(position_for_cell(&self.rows, column, row))
    }

    /// Rows scrolled back at most: everything above the first page
    pub fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(usize::from(self.body.height))
    }
}

/// Draw the console into `area` and return what ended up on screen.
pub fn render<C: ShellChannel>(
    frame: &mut Frame,
    area: Rect,
    console: &Console<C>,
    theme: Theme,
    scroll: usize,
) -> RenderedView {
    let [body, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let rows = wrap_rows(&console.display_text(), body.width);
    let height = usize::from(body.height);
    let max_scroll = rows.len().saturating_sub(height);
    let scroll = scroll.min(max_scroll);
    let first_row = max_scroll - scroll;

    let styles = row_styles(&rows, console.boundary().offset(), theme);
    let lines: Vec<Line> = rows
        .iter()
        .zip(styles)
        .skip(first_row)
        .take(height)
        .map(|(row, style)| Line::from(Span::styled(row.text.clone(), style)))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(theme.text()), body);

    frame.render_widget(
        Paragraph::new(status_text(console, theme, scroll)).style(theme.status_bar()),
        status,
    );

    let (column, row) = cell_for_position(&rows, console.cursor_position());
    if scroll == 0 && row >= first_row && row < first_row + height {
        let x = body.x + column.min(usize::from(body.width.saturating_sub(1))) as u16;
        let y = body.y + (row - first_row) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }

    RenderedView {
        body,
        first_row,
        scroll,
        rows,
    }
}

/// System messages are coloured by level and a wrapped message keeps its
/// colour on continuation rows. The pending line is always plain text.
fn row_styles(rows: &[VisualRow], boundary: usize, theme: Theme) -> Vec<Style> {
    let mut current = theme.text();
    rows.iter()
        .map(|row| {
            if row.start >= boundary && row.starts_line {
                current = theme.text();
            } else if row.starts_line {
                current = if row.text.starts_with("[ERROR] ") {
                    theme.error()
                } else if row.text.starts_with("[INFO] ") {
                    theme.info()
                } else {
                    theme.text()
                };
            }
            current
        })
        .collect()
}

fn status_text<C: ShellChannel>(console: &Console<C>, theme: Theme, scroll: usize) -> String {
    let state = match console.process_state() {
        ProcessState::Starting => "starting".to_string(),
        ProcessState::Running => "running".to_string(),
        ProcessState::Exited(Some(code)) => format!("exited ({code})"),
        ProcessState::Exited(None) => "exited".to_string(),
        ProcessState::Terminated => "terminated".to_string(),
    };
    let mut text = format!(
        " shell: {state} | history: {} | theme: {}",
        console.history().len(),
        theme.name()
    );
    if scroll > 0 {
        text.push_str(&format!(" | scrolled back {scroll}"));
    }
    text.push_str(" | Ctrl+Q quit  Ctrl+L clear  Ctrl+T theme");
    text
}
