//! One module per management section
//!
//! Screens are thin controllers: they fetch the current page on entry and on
//! page/limit changes, hand rows to the table adapter, and map row actions
//! onto façade calls and routes. All shared list behavior lives in
//! [`ListState`].

pub mod authors;
pub mod books;
pub mod borrowings;
pub mod dashboard;
pub mod fine_tickets;
pub mod genres;
pub mod members;
pub mod publishers;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::api::{PageData, PageQuery};
use crate::pagination::Pagination;

use super::table::{ColumnDef, TableAdapter};
use super::widgets::render_confirm;

/// Page sizes the `l` key cycles through
const LIMIT_STEPS: [u32; 3] = [10, 25, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Normal,
    /// `/` pressed: keystrokes edit the client-local filter
    Filter,
    /// `c` pressed: digit keys toggle column visibility
    Columns,
}

/// What a key did to a list screen, for the owning screen to act on
pub enum ListAction {
    None,
    /// Not a list key; the app may treat it as a global key
    Unhandled,
    /// Page or limit changed: fetch the page again
    Refetch,
    Add,
    Edit(i64),
    /// Enter on a row; screens without a detail view treat it as edit
    Open(i64),
    /// Deletion confirmed through the dialog
    Delete(i64),
    /// Screen-specific row action (`r`), e.g. mark a borrowing returned
    Extra(i64),
}

/// Shared state and key handling for every listing screen
pub struct ListState<T> {
    pub table: TableAdapter<T>,
    pub pagination: Pagination,
    pub mode: ListMode,
    pub pending_delete: Option<i64>,
    id_of: fn(&T) -> i64,
}

impl<T> ListState<T> {
    pub fn new(columns: Vec<ColumnDef<T>>, limit: u32, id_of: fn(&T) -> i64) -> Self {
        Self {
            table: TableAdapter::new(columns),
            pagination: Pagination::new(limit),
            mode: ListMode::Normal,
            pending_delete: None,
            id_of,
        }
    }

    /// Query for the current page
    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.pagination.current_page(), self.pagination.limit())
    }

    /// Install a freshly fetched page
    pub fn apply_page(&mut self, page: PageData<T>) {
        self.pagination.set_total_items(page.total_items);
        self.table.set_rows(page.data);
    }

    fn selected_id(&self) -> Option<i64> {
        self.table.selected().map(self.id_of)
    }

    fn cycle_limit(&mut self) {
        let current = self.pagination.limit();
        let position = LIMIT_STEPS.iter().position(|&l| l == current);
        let next = match position {
            Some(i) => LIMIT_STEPS[(i + 1) % LIMIT_STEPS.len()],
            None => LIMIT_STEPS[0],
        };
        self.pagination.set_limit(next);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        // A pending confirm dialog swallows everything but its own keys; a
        // declined confirm issues no request at all.
        if let Some(id) = self.pending_delete {
            match key.code {
                KeyCode::Char('y') => {
                    self.pending_delete = None;
                    return ListAction::Delete(id);
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.pending_delete = None;
                    return ListAction::None;
                }
                _ => return ListAction::None,
            }
        }

        match self.mode {
            ListMode::Filter => match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.mode = ListMode::Normal;
                    ListAction::None
                }
                KeyCode::Backspace => {
                    self.table.pop_filter_char();
                    ListAction::None
                }
                KeyCode::Char(c) => {
                    self.table.push_filter_char(c);
                    ListAction::None
                }
                _ => ListAction::None,
            },
            ListMode::Columns => match key.code {
                KeyCode::Esc | KeyCode::Char('c') => {
                    self.mode = ListMode::Normal;
                    ListAction::None
                }
                KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                    self.table.toggle_column(c as usize - '1' as usize);
                    ListAction::None
                }
                _ => ListAction::None,
            },
            ListMode::Normal => match key.code {
                KeyCode::Down => {
                    self.table.select_next();
                    ListAction::None
                }
                KeyCode::Up => {
                    self.table.select_prev();
                    ListAction::None
                }
                KeyCode::Right => {
                    if self.pagination.next_page() {
                        ListAction::Refetch
                    } else {
                        ListAction::None
                    }
                }
                KeyCode::Left => {
                    if self.pagination.prev_page() {
                        ListAction::Refetch
                    } else {
                        ListAction::None
                    }
                }
                KeyCode::Char('l') => {
                    self.cycle_limit();
                    ListAction::Refetch
                }
                KeyCode::Char('/') => {
                    self.table.clear_filter();
                    self.mode = ListMode::Filter;
                    ListAction::None
                }
                KeyCode::Char('s') => {
                    self.table.cycle_sort();
                    ListAction::None
                }
                KeyCode::Char('c') => {
                    self.mode = ListMode::Columns;
                    ListAction::None
                }
                KeyCode::Char('a') => ListAction::Add,
                KeyCode::Char('e') => match self.selected_id() {
                    Some(id) => ListAction::Edit(id),
                    None => ListAction::None,
                },
                KeyCode::Enter => match self.selected_id() {
                    Some(id) => ListAction::Open(id),
                    None => ListAction::None,
                },
                KeyCode::Char('d') => {
                    self.pending_delete = self.selected_id();
                    ListAction::None
                }
                KeyCode::Char('r') => match self.selected_id() {
                    Some(id) => ListAction::Extra(id),
                    None => ListAction::None,
                },
                _ => ListAction::Unhandled,
            },
        }
    }

    fn footer(&self) -> String {
        let pages = self.pagination.total_pages();
        let mut footer = format!(
            "page {}/{} · {} items · limit {} [l]",
            self.pagination.current_page(),
            pages,
            self.pagination.total_items(),
            self.pagination.limit(),
        );
        if let Some(sort) = self.table.sort_label() {
            footer.push_str(&format!(" · sort {} [s]", sort));
        }
        if !self.table.filter().is_empty() || self.mode == ListMode::Filter {
            footer.push_str(&format!(" · filter “{}”", self.table.filter()));
        }
        if self.pagination.at_last_page() {
            footer.push_str(" · next ⊘");
        }
        footer
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, title: &str, confirm_message: &str) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let block = Block::bordered().title(format!(" {} ", title));
        self.table.render(frame, table_area, block);

        let footer = match self.mode {
            ListMode::Columns => {
                let columns = self
                    .table
                    .column_headers()
                    .iter()
                    .enumerate()
                    .map(|(i, (header, visible))| {
                        format!("{}:{}{}", i + 1, header, if *visible { "" } else { " (off)" })
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                format!("columns · {} · esc to leave", columns)
            }
            _ => self.footer(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(footer)).style(Style::default().fg(Color::DarkGray)),
            footer_area,
        );

        if self.pending_delete.is_some() {
            render_confirm(frame, confirm_message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    struct RowData {
        id: i64,
        name: &'static str,
    }

    fn page(total_items: u64) -> PageData<RowData> {
        PageData {
            data: vec![
                RowData { id: 1, name: "alpha" },
                RowData { id: 2, name: "beta" },
            ],
            limit: 10,
            current_page: 1,
            total_items,
            total_pages: total_items.div_ceil(10) as u32,
        }
    }

    fn list() -> ListState<RowData> {
        let mut list = ListState::new(
            vec![ColumnDef::new("name", "Name", |r: &RowData| r.name.to_string())],
            10,
            |r| r.id,
        );
        list.apply_page(page(25));
        list
    }

    fn press(list: &mut ListState<RowData>, code: KeyCode) -> ListAction {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_declined_confirm_issues_no_delete() {
        let mut list = list();
        press(&mut list, KeyCode::Char('d'));
        assert_eq!(list.pending_delete, Some(1));
        let action = press(&mut list, KeyCode::Char('n'));
        assert!(matches!(action, ListAction::None));
        assert_eq!(list.pending_delete, None);
    }

    #[test]
    fn test_confirmed_delete_targets_selected_row() {
        let mut list = list();
        press(&mut list, KeyCode::Down);
        press(&mut list, KeyCode::Char('d'));
        let action = press(&mut list, KeyCode::Char('y'));
        assert!(matches!(action, ListAction::Delete(2)));
    }

    #[test]
    fn test_page_change_requests_refetch_until_last_page() {
        let mut list = list();
        assert!(matches!(press(&mut list, KeyCode::Right), ListAction::Refetch));
        assert!(matches!(press(&mut list, KeyCode::Right), ListAction::Refetch));
        // 25 items at limit 10: page 3 is the last, next is a no-op
        assert!(matches!(press(&mut list, KeyCode::Right), ListAction::None));
        assert_eq!(list.pagination.current_page(), 3);
    }

    #[test]
    fn test_limit_cycle_resets_page_and_refetches() {
        let mut list = list();
        press(&mut list, KeyCode::Right);
        let action = press(&mut list, KeyCode::Char('l'));
        assert!(matches!(action, ListAction::Refetch));
        assert_eq!(list.pagination.limit(), 25);
        assert_eq!(list.pagination.current_page(), 1);
    }

    #[test]
    fn test_filter_mode_captures_section_digits() {
        let mut list = list();
        press(&mut list, KeyCode::Char('/'));
        let action = press(&mut list, KeyCode::Char('3'));
        assert!(matches!(action, ListAction::None));
        assert_eq!(list.table.filter(), "3");
    }
}
