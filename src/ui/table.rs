//! Generic table presentation adapter
//!
//! Binds entity rows to column definitions and renders a sortable,
//! filterable, column-toggleable grid. It only ever holds the current
//! server page: filtering and sorting are client-local to those rows, while
//! page changes are the owning screen's job (pagination state plus a
//! re-fetch). The adapter never slices pages itself.

use std::collections::HashSet;

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Row, Table, TableState};
use ratatui::Frame;

/// One column of a table: a stable id, a header label and a cell accessor
pub struct ColumnDef<T> {
    pub id: &'static str,
    pub header: &'static str,
    pub accessor: fn(&T) -> String,
}

impl<T> ColumnDef<T> {
    pub fn new(id: &'static str, header: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            id,
            header,
            accessor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

pub struct TableAdapter<T> {
    columns: Vec<ColumnDef<T>>,
    hidden: HashSet<&'static str>,
    rows: Vec<T>,
    filter: String,
    /// (column index, direction); None renders rows in fetch order
    sort: Option<(usize, SortDirection)>,
    selected: Option<usize>,
    state: TableState,
}

impl<T> TableAdapter<T> {
    pub fn new(columns: Vec<ColumnDef<T>>) -> Self {
        Self {
            columns,
            hidden: HashSet::new(),
            rows: Vec::new(),
            filter: String::new(),
            sort: None,
            selected: None,
            state: TableState::default(),
        }
    }

    /// Replace the rows with a freshly fetched page
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.clamp_selection();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    // -- filtering ---------------------------------------------------------

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.clamp_selection();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.clamp_selection();
    }

    // -- sorting -----------------------------------------------------------

    /// Cycle sort through every visible column, ascending then descending,
    /// then back to fetch order
    pub fn cycle_sort(&mut self) {
        let visible = self.visible_column_indices();
        if visible.is_empty() {
            self.sort = None;
            return;
        }
        self.sort = match self.sort {
            None => Some((visible[0], SortDirection::Ascending)),
            Some((col, SortDirection::Ascending)) => Some((col, SortDirection::Descending)),
            Some((col, SortDirection::Descending)) => {
                let pos = visible.iter().position(|&i| i == col);
                match pos.and_then(|p| visible.get(p + 1)) {
                    Some(&next) => Some((next, SortDirection::Ascending)),
                    None => None,
                }
            }
        };
        self.clamp_selection();
    }

    /// Human-readable sort indicator for the footer
    pub fn sort_label(&self) -> Option<String> {
        self.sort.map(|(col, dir)| {
            let arrow = match dir {
                SortDirection::Ascending => "↑",
                SortDirection::Descending => "↓",
            };
            format!("{} {}", self.columns[col].header, arrow)
        })
    }

    // -- column visibility -------------------------------------------------

    /// Toggle visibility of the n-th column (0-based). At least one column
    /// stays visible.
    pub fn toggle_column(&mut self, index: usize) {
        let Some(column) = self.columns.get(index) else {
            return;
        };
        if self.hidden.contains(column.id) {
            self.hidden.remove(column.id);
        } else if self.visible_column_indices().len() > 1 {
            self.hidden.insert(column.id);
            if matches!(self.sort, Some((col, _)) if col == index) {
                self.sort = None;
            }
        }
    }

    pub fn column_headers(&self) -> Vec<(&'static str, bool)> {
        self.columns
            .iter()
            .map(|c| (c.header, !self.hidden.contains(c.id)))
            .collect()
    }

    fn visible_column_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !self.hidden.contains(c.id))
            .map(|(i, _)| i)
            .collect()
    }

    // -- view + selection --------------------------------------------------

    /// Indices of `rows` after filter and sort, in display order
    fn view_indices(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        let visible = self.visible_column_indices();
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| {
                if needle.is_empty() {
                    return true;
                }
                visible.iter().any(|&c| {
                    (self.columns[c].accessor)(&self.rows[i])
                        .to_lowercase()
                        .contains(&needle)
                })
            })
            .collect();

        if let Some((col, direction)) = self.sort {
            let accessor = self.columns[col].accessor;
            indices.sort_by(|&a, &b| {
                let ordering = accessor(&self.rows[a])
                    .to_lowercase()
                    .cmp(&accessor(&self.rows[b]).to_lowercase());
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        indices
    }

    /// Cell text of the current view, row-major (display order)
    pub fn view_cells(&self) -> Vec<Vec<String>> {
        let visible = self.visible_column_indices();
        self.view_indices()
            .into_iter()
            .map(|i| {
                visible
                    .iter()
                    .map(|&c| (self.columns[c].accessor)(&self.rows[i]))
                    .collect()
            })
            .collect()
    }

    pub fn view_len(&self) -> usize {
        self.view_indices().len()
    }

    pub fn select_next(&mut self) {
        let len = self.view_len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.view_len() == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    /// The row under the cursor, in display order
    pub fn selected(&self) -> Option<&T> {
        let view = self.view_indices();
        self.selected
            .and_then(|i| view.get(i))
            .map(|&i| &self.rows[i])
    }

    fn clamp_selection(&mut self) {
        let len = self.view_len();
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
    }

    // -- rendering ---------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame, area: Rect, block: Block) {
        let visible = self.visible_column_indices();
        let header = Row::new(
            visible
                .iter()
                .map(|&c| self.columns[c].header.to_string())
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .view_cells()
            .into_iter()
            .map(Row::new)
            .collect();

        let widths = visible
            .iter()
            .map(|_| Constraint::Ratio(1, visible.len().max(1) as u32))
            .collect::<Vec<_>>();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        self.state.select(self.selected);
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct RowData {
        name: &'static str,
        city: &'static str,
    }

    fn adapter() -> TableAdapter<RowData> {
        let mut table = TableAdapter::new(vec![
            ColumnDef::new("name", "Name", |r: &RowData| r.name.to_string()),
            ColumnDef::new("city", "City", |r: &RowData| r.city.to_string()),
        ]);
        table.set_rows(vec![
            RowData { name: "Carol", city: "Lyon" },
            RowData { name: "Alice", city: "Oslo" },
            RowData { name: "Bob", city: "Turin" },
        ]);
        table
    }

    #[test]
    fn test_filter_narrows_current_page_only() {
        let mut table = adapter();
        table.push_filter_char('o');
        // "o" matches every row it was given
        assert_eq!(table.view_len(), 3);
        table.push_filter_char('s');
        let cells = table.view_cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0][0], "Alice");
    }

    #[test]
    fn test_sort_cycles_columns_and_directions() {
        let mut table = adapter();
        table.cycle_sort();
        assert_eq!(table.view_cells()[0][0], "Alice");
        table.cycle_sort();
        assert_eq!(table.view_cells()[0][0], "Carol");
        table.cycle_sort();
        // now sorting on the second column, ascending
        assert_eq!(table.view_cells()[0][1], "Lyon");
        table.cycle_sort();
        table.cycle_sort();
        // full cycle: back to fetch order
        assert_eq!(table.view_cells()[0][0], "Carol");
    }

    #[test]
    fn test_hidden_column_is_excluded_from_cells() {
        let mut table = adapter();
        table.toggle_column(1);
        let cells = table.view_cells();
        assert_eq!(cells[0].len(), 1);
        assert_eq!(table.column_headers()[1], ("City", false));
        table.toggle_column(1);
        assert_eq!(table.view_cells()[0].len(), 2);
    }

    #[test]
    fn test_last_visible_column_cannot_be_hidden() {
        let mut table = adapter();
        table.toggle_column(0);
        table.toggle_column(1);
        assert_eq!(table.view_cells()[0].len(), 1);
    }

    #[test]
    fn test_selection_follows_view_order_and_clamps() {
        let mut table = adapter();
        table.select_next();
        table.select_next();
        table.cycle_sort();
        // selection index survives; resolved against the sorted view
        assert_eq!(table.selected().unwrap().name, "Carol");
        table.push_filter_char('z');
        assert!(table.selected().is_none());
    }
}
