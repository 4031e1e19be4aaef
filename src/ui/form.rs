//! Form field primitives and validation plumbing
//!
//! Each entity form is a fixed set of fields with index-based focus. Raw
//! field text is parsed into the typed request payload on submit; parse
//! failures and `validator` failures land in the same per-field error map
//! and keep the submit handler from running.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use indexmap::IndexMap;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use rust_decimal::Decimal;
use validator::ValidationErrors;

/// Per-field error messages, in field declaration order
pub type FieldErrors = IndexMap<String, String>;

/// Flatten `validator` output into one message per field
pub fn collect_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let message = field_errors
                .first()
                .and_then(|e| e.message.clone())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is not valid", field));
            (field.to_string(), message)
        })
        .collect()
}

/// `None` for blank input, trimmed `Some` otherwise
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a `YYYY-MM-DD` date field
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| "Expected a YYYY-MM-DD date".to_string())
}

/// Parse an optional `YYYY-MM-DD` date field
pub fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    match optional_text(raw) {
        None => Ok(None),
        Some(text) => parse_date(&text).map(Some),
    }
}

/// Parse a non-negative amount field
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| "Expected a number".to_string())?;
    if amount < Decimal::ZERO {
        return Err("Must not be negative".to_string());
    }
    Ok(amount)
}

/// Parse a positive integer field
pub fn parse_count(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| "Expected a whole number".to_string())
}

// ---------------------------------------------------------------------------
// TextInput
// ---------------------------------------------------------------------------

/// Single-line text input; editing happens at the end of the buffer
#[derive(Debug, Clone)]
pub struct TextInput {
    pub label: &'static str,
    pub key: &'static str,
    value: String,
}

impl TextInput {
    pub fn new(label: &'static str, key: &'static str) -> Self {
        Self {
            label,
            key,
            value: String::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Returns true when the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// SelectField
// ---------------------------------------------------------------------------

/// One selectable option of a dropdown-style field
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub id: i64,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Dropdown-style field cycled with Left/Right
#[derive(Debug, Clone)]
pub struct SelectField {
    pub label: &'static str,
    pub key: &'static str,
    options: Vec<SelectOption>,
    selected: Option<usize>,
}

impl SelectField {
    pub fn new(label: &'static str, key: &'static str) -> Self {
        Self {
            label,
            key,
            options: Vec::new(),
            selected: None,
        }
    }

    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
        if let Some(i) = self.selected {
            if i >= self.options.len() {
                self.selected = None;
            }
        }
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected.map(|i| self.options[i].id)
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.map(|i| self.options[i].label.as_str())
    }

    /// Pre-select the option carrying `id` (edit mode defaults)
    pub fn select_id(&mut self, id: i64) {
        self.selected = self.options.iter().position(|o| o.id == id);
    }

    pub fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.options.len(),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.options.len() - 1,
            Some(i) => i - 1,
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Right => {
                self.select_next();
                true
            }
            KeyCode::Left => {
                self.select_prev();
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// MultiSelect
// ---------------------------------------------------------------------------

/// Bounded multi-reference picker: one selector row per chosen id, rows can
/// be added up to `max_rows` and removed down to `min_rows`, and an id held
/// by one row is excluded from every sibling row's option list, so the same
/// reference cannot be picked twice.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    pub label: &'static str,
    pub key: &'static str,
    options: Vec<SelectOption>,
    rows: Vec<Option<i64>>,
    active_row: usize,
    min_rows: usize,
    max_rows: usize,
}

impl MultiSelect {
    pub fn new(label: &'static str, key: &'static str, min_rows: usize, max_rows: usize) -> Self {
        Self {
            label,
            key,
            options: Vec::new(),
            rows: vec![None; min_rows.max(1)],
            active_row: 0,
            min_rows: min_rows.max(1),
            max_rows,
        }
    }

    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    /// Pre-fill one row per id (edit mode defaults)
    pub fn select_ids(&mut self, ids: &[i64]) {
        let capped = &ids[..ids.len().min(self.max_rows)];
        if capped.is_empty() {
            self.rows = vec![None; self.min_rows];
        } else {
            self.rows = capped.iter().copied().map(Some).collect();
        }
        self.active_row = 0;
    }

    pub fn rows(&self) -> &[Option<i64>] {
        &self.rows
    }

    pub fn active_row(&self) -> usize {
        self.active_row
    }

    /// Chosen ids, in row order
    pub fn selected_ids(&self) -> Vec<i64> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Options available to one row: the full set minus ids held by siblings
    pub fn options_for_row(&self, row: usize) -> Vec<&SelectOption> {
        let taken: Vec<i64> = self
            .rows
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != row)
            .filter_map(|(_, id)| *id)
            .collect();
        self.options
            .iter()
            .filter(|o| !taken.contains(&o.id))
            .collect()
    }

    pub fn add_row(&mut self) -> bool {
        if self.rows.len() >= self.max_rows {
            return false;
        }
        self.rows.push(None);
        self.active_row = self.rows.len() - 1;
        true
    }

    pub fn remove_active_row(&mut self) -> bool {
        if self.rows.len() <= self.min_rows {
            return false;
        }
        self.rows.remove(self.active_row);
        if self.active_row >= self.rows.len() {
            self.active_row = self.rows.len() - 1;
        }
        true
    }

    fn cycle_active(&mut self, forward: bool) {
        let available: Vec<i64> = self
            .options_for_row(self.active_row)
            .into_iter()
            .map(|o| o.id)
            .collect();
        if available.is_empty() {
            return;
        }
        let current = self.rows[self.active_row];
        let position = current.and_then(|id| available.iter().position(|&o| o == id));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => available.len() - 1,
            (Some(i), true) => (i + 1) % available.len(),
            (Some(i), false) => (i + available.len() - 1) % available.len(),
        };
        self.rows[self.active_row] = Some(available[next]);
    }

    pub fn label_for(&self, id: i64) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Right => {
                self.cycle_active(true);
                true
            }
            KeyCode::Left => {
                self.cycle_active(false);
                true
            }
            KeyCode::Up => {
                self.active_row = self.active_row.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.active_row + 1 < self.rows.len() {
                    self.active_row += 1;
                }
                true
            }
            KeyCode::Char('+') => {
                self.add_row();
                true
            }
            KeyCode::Char('-') => {
                self.remove_active_row();
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

fn label_span(label: &str, focused: bool) -> Span<'_> {
    if focused {
        Span::styled(
            format!("▸ {}: ", label),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("  {}: ", label), Style::default().fg(Color::Gray))
    }
}

fn error_span(error: Option<&str>) -> Span<'_> {
    match error {
        Some(message) => Span::styled(
            format!("  ✗ {}", message),
            Style::default().fg(Color::Red),
        ),
        None => Span::raw(""),
    }
}

/// Draw a one-line text field: label, value, optional error
pub fn render_text_input(
    frame: &mut Frame,
    area: Rect,
    input: &TextInput,
    focused: bool,
    error: Option<&str>,
) {
    let mut value = input.value().to_string();
    if focused {
        value.push('▏');
    }
    let line = Line::from(vec![
        label_span(input.label, focused),
        Span::raw(value),
        error_span(error),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a one-line select field: label, current option, optional error
pub fn render_select(
    frame: &mut Frame,
    area: Rect,
    select: &SelectField,
    focused: bool,
    error: Option<&str>,
) {
    let value = match select.selected_label() {
        Some(label) => format!("‹ {} ›", label),
        None => "‹ none ›".to_string(),
    };
    let line = Line::from(vec![
        label_span(select.label, focused),
        Span::raw(value),
        error_span(error),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the multi-select block: one line per selector row plus a hint line
pub fn render_multi_select(
    frame: &mut Frame,
    area: Rect,
    multi: &MultiSelect,
    focused: bool,
    error: Option<&str>,
) {
    let mut lines = vec![Line::from(vec![
        label_span(multi.label, focused),
        error_span(error),
    ])];
    for (i, row) in multi.rows().iter().enumerate() {
        let marker = if focused && i == multi.active_row() {
            "▸"
        } else {
            " "
        };
        let value = match row.and_then(|id| multi.label_for(id)) {
            Some(label) => format!("‹ {} ›", label),
            None => "‹ none ›".to_string(),
        };
        lines.push(Line::from(format!("   {} {}. {}", marker, i + 1, value)));
    }
    if focused {
        lines.push(Line::from(Span::styled(
            "     +/- add or remove a row, ←/→ choose",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new(1, "Ursula K. Le Guin"),
            SelectOption::new(2, "Italo Calvino"),
            SelectOption::new(3, "Stanisław Lem"),
            SelectOption::new(4, "Octavia Butler"),
        ]
    }

    #[test]
    fn test_sibling_rows_exclude_chosen_ids() {
        let mut multi = MultiSelect::new("Authors", "author_ids", 1, 3);
        multi.set_options(options());
        multi.select_ids(&[1]);
        multi.add_row();

        let second_row = multi.options_for_row(1);
        assert!(second_row.iter().all(|o| o.id != 1));
        assert_eq!(second_row.len(), 3);

        // the row holding an id keeps it in its own list
        let first_row = multi.options_for_row(0);
        assert!(first_row.iter().any(|o| o.id == 1));
    }

    #[test]
    fn test_cycling_skips_taken_ids() {
        let mut multi = MultiSelect::new("Authors", "author_ids", 1, 3);
        multi.set_options(options());
        multi.select_ids(&[2]);
        multi.add_row();

        // cycle through every option of the second row: id 2 never appears
        for _ in 0..8 {
            multi.cycle_active(true);
            assert_ne!(multi.rows()[1], Some(2));
        }
    }

    #[test]
    fn test_row_bounds() {
        let mut multi = MultiSelect::new("Authors", "author_ids", 1, 3);
        multi.set_options(options());
        assert!(multi.add_row());
        assert!(multi.add_row());
        assert!(!multi.add_row());
        assert_eq!(multi.rows().len(), 3);

        assert!(multi.remove_active_row());
        assert!(multi.remove_active_row());
        assert!(!multi.remove_active_row());
        assert_eq!(multi.rows().len(), 1);
    }

    #[test]
    fn test_selected_ids_skip_empty_rows() {
        let mut multi = MultiSelect::new("Authors", "author_ids", 1, 3);
        multi.set_options(options());
        multi.select_ids(&[3, 1]);
        multi.add_row();
        assert_eq!(multi.selected_ids(), vec![3, 1]);
    }

    #[test]
    fn test_select_field_wraps() {
        let mut select = SelectField::new("Genre", "genre_id");
        select.set_options(vec![SelectOption::new(1, "Fiction"), SelectOption::new(2, "Poetry")]);
        select.select_next();
        assert_eq!(select.selected_id(), Some(1));
        select.select_prev();
        assert_eq!(select.selected_id(), Some(2));
        select.select_next();
        assert_eq!(select.selected_id(), Some(1));
    }

    #[test]
    fn test_date_parsing() {
        assert!(parse_date("2025-03-01").is_ok());
        assert!(parse_date("01-03-2025").is_err());
        assert_eq!(parse_optional_date("  ").unwrap(), None);
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_amount("12.50").unwrap(), Decimal::new(12_50, 2));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("twelve").is_err());
    }
}
