//! Borrowing management screens
//!
//! The form assembles the parent record and a client-side working list of
//! book lines; nothing is persisted until submit, when the two-phase
//! workflow runs (parent first, items second). Partial successes get their
//! own warning toast, distinct from the generic error one.

use chrono::{Duration, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::models::borrowing::{
    Borrowing, CreateBorrowing, CreateBorrowingItem, UpdateBorrowing,
};
use crate::models::enums::BorrowingStatus;
use crate::models::Book;
use crate::services::borrowing_workflow::SubmitOutcome;
use crate::ui::form::{
    parse_amount, parse_date, render_select, render_text_input, FieldErrors, SelectField,
    SelectOption, TextInput,
};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::authors::form_help;
use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<Borrowing>> {
    vec![
        ColumnDef::new("id", "ID", |b: &Borrowing| b.id.to_string()),
        ColumnDef::new("member", "Member", |b: &Borrowing| {
            b.member
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| format!("#{}", b.member_id))
        }),
        ColumnDef::new("status", "Status", |b: &Borrowing| b.status.to_string()),
        ColumnDef::new("borrowed", "Borrowed", |b: &Borrowing| {
            b.borrowing_date.to_string()
        }),
        ColumnDef::new("due", "Due", |b: &Borrowing| b.due_date.to_string()),
        ColumnDef::new("returned", "Returned", |b: &Borrowing| {
            b.returned_date.map(|d| d.to_string()).unwrap_or_default()
        }),
    ]
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct BorrowingListScreen {
    list: ListState<Borrowing>,
}

impl BorrowingListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |b| b.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.borrowings.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing borrowings failed: {}", err);
                ctx.toasts.error(err.user_message());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> ScreenOutcome {
        match self.list.handle_key(key) {
            ListAction::Refetch => {
                self.refresh(ctx);
                ScreenOutcome::Handled
            }
            ListAction::Add => ScreenOutcome::Navigate(Route::BorrowingAdd),
            ListAction::Edit(id) | ListAction::Open(id) => {
                ScreenOutcome::Navigate(Route::BorrowingEdit(id))
            }
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.borrowings.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Borrowing deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting borrowing {} failed: {}", id, err);
                        ctx.toasts.error(err.user_message());
                    }
                }
                ScreenOutcome::Handled
            }
            // `r`: mark the selected borrowing as returned
            ListAction::Extra(id) => {
                match ctx.block_on(ctx.api.borrowings.mark_returned(id)) {
                    Ok(_) => {
                        ctx.toasts.success("Borrowing marked as returned");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("returning borrowing {} failed: {}", id, err);
                        ctx.toasts.error(err.user_message());
                    }
                }
                ScreenOutcome::Handled
            }
            ListAction::None => ScreenOutcome::Handled,
            ListAction::Unhandled => ScreenOutcome::Unhandled,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.list
            .render(frame, area, "Borrowings · r mark returned", "Delete this borrowing?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

const FIELD_COUNT: usize = 8;
const FOCUS_MEMBER: usize = 0;
const FOCUS_BORROWED: usize = 1;
const FOCUS_DUE: usize = 2;
const FOCUS_STATUS: usize = 3;
const FOCUS_RECORDED_BY: usize = 4;
const FOCUS_ITEM_BOOK: usize = 5;
const FOCUS_ITEM_QTY: usize = 6;
const FOCUS_ITEM_PRICE: usize = 7;

fn status_options() -> Vec<SelectOption> {
    BorrowingStatus::all()
        .iter()
        .enumerate()
        .map(|(i, s)| SelectOption::new(i as i64, s.to_string()))
        .collect()
}

fn status_at(index: i64) -> BorrowingStatus {
    BorrowingStatus::all()
        .get(index as usize)
        .copied()
        .unwrap_or(BorrowingStatus::Borrowing)
}

pub struct BorrowingFormScreen {
    id: Option<i64>,
    member: SelectField,
    borrowing_date: TextInput,
    due_date: TextInput,
    status: SelectField,
    recorded_by: TextInput,
    // item line editor
    item_book: SelectField,
    item_quantity: TextInput,
    item_price: TextInput,
    /// Working list, client-side only until submit
    items: Vec<CreateBorrowingItem>,
    /// Books backing the item editor, kept for titles and price defaults
    books: Vec<Book>,
    focus: usize,
    errors: FieldErrors,
    is_submitting: bool,
}

impl BorrowingFormScreen {
    fn empty(ctx: &mut Ctx) -> Self {
        let today = Local::now().date_naive();
        let due = today + Duration::days(ctx.config.ui.loan_period_days);
        let mut status = SelectField::new("Status", "status");
        status.set_options(status_options());
        status.select_id(0);
        Self {
            id: None,
            member: SelectField::new("Member", "member_id"),
            borrowing_date: TextInput::new("Borrowed on", "borrowing_date")
                .with_value(today.to_string()),
            due_date: TextInput::new("Due on", "due_date").with_value(due.to_string()),
            status,
            recorded_by: TextInput::new("Recorded by", "recorded_by").with_value("admin"),
            item_book: SelectField::new("Book", "book_id"),
            item_quantity: TextInput::new("Qty", "quantity").with_value("1"),
            item_price: TextInput::new("Price", "price"),
            items: Vec::new(),
            books: Vec::new(),
            focus: 0,
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load members and books for the two dropdowns, in parallel
    fn load_options(&mut self, ctx: &mut Ctx) {
        match ctx.block_on(ctx.services.reference.borrowing_form_options()) {
            Ok((members, books)) => {
                self.member.set_options(
                    members
                        .iter()
                        .map(|m| SelectOption::new(m.id, m.select_label()))
                        .collect(),
                );
                self.item_book.set_options(
                    books
                        .iter()
                        .map(|b| SelectOption::new(b.id, b.title.clone()))
                        .collect(),
                );
                self.books = books;
            }
            Err(err) => {
                tracing::error!("loading borrowing form options failed: {}", err);
                ctx.toasts.error(err.user_message());
            }
        }
    }

    pub fn add(ctx: &mut Ctx) -> Self {
        let mut screen = Self::empty(ctx);
        screen.load_options(ctx);
        screen
    }

    /// Load the borrowing and its current item list; `None` sends the caller
    /// back to the list
    pub fn edit(ctx: &mut Ctx, id: i64) -> Option<Self> {
        let borrowing = match ctx.block_on(ctx.api.borrowings.get(id)) {
            Ok(borrowing) => borrowing,
            Err(err) => {
                tracing::error!("loading borrowing {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                return None;
            }
        };

        let mut screen = Self::empty(ctx);
        screen.load_options(ctx);
        screen.id = Some(id);
        screen.member.select_id(borrowing.member_id);
        screen
            .borrowing_date
            .set_value(borrowing.borrowing_date.to_string());
        screen.due_date.set_value(borrowing.due_date.to_string());
        let status_index = BorrowingStatus::all()
            .iter()
            .position(|s| *s == borrowing.status)
            .unwrap_or(0);
        screen.status.select_id(status_index as i64);
        screen
            .recorded_by
            .set_value(borrowing.updated_by.or(borrowing.created_by).unwrap_or_else(|| "admin".to_string()));

        match ctx.block_on(ctx.api.borrowing_items.for_borrowing(id)) {
            Ok(existing) => {
                screen.items = existing
                    .into_iter()
                    .map(|item| CreateBorrowingItem {
                        borrowing_id: Some(item.borrowing_id),
                        book_id: item.book_id,
                        quantity: item.quantity,
                        price: item.price,
                        returned_date: item.returned_date,
                    })
                    .collect();
            }
            Err(err) => {
                tracing::error!("loading items of borrowing {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
            }
        }

        Some(screen)
    }

    fn book_title(&self, book_id: i64) -> String {
        self.books
            .iter()
            .find(|b| b.id == book_id)
            .map(|b| b.title.clone())
            .unwrap_or_else(|| format!("book #{}", book_id))
    }

    /// Commit the line editor into the working list
    fn push_item_line(&mut self, ctx: &mut Ctx) {
        self.errors.clear();

        let Some(book_id) = self.item_book.selected_id() else {
            self.errors
                .insert("book_id".to_string(), "Pick a book".to_string());
            return;
        };
        let quantity = match self.item_quantity.value().trim().parse::<u32>() {
            Ok(quantity) if quantity > 0 => quantity,
            _ => {
                self.errors
                    .insert("quantity".to_string(), "Quantity must be positive".to_string());
                return;
            }
        };
        // Blank price falls back to the book's current price
        let price = if self.item_price.value().trim().is_empty() {
            self.books
                .iter()
                .find(|b| b.id == book_id)
                .map(|b| b.price)
                .unwrap_or(Decimal::ZERO)
        } else {
            match parse_amount(self.item_price.value()) {
                Ok(price) => price,
                Err(message) => {
                    self.errors.insert("price".to_string(), message);
                    return;
                }
            }
        };

        self.items.push(CreateBorrowingItem {
            borrowing_id: self.id,
            book_id,
            quantity,
            price,
            returned_date: None,
        });
        ctx.toasts
            .success(format!("Added {}", self.book_title(book_id)));
        self.item_quantity.set_value("1");
        self.item_price.set_value("");
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();

        let Some(member_id) = self.member.selected_id() else {
            self.errors
                .insert("member_id".to_string(), "Pick a member".to_string());
            return ScreenOutcome::Handled;
        };
        let borrowing_date = match parse_date(self.borrowing_date.value()) {
            Ok(date) => date,
            Err(message) => {
                self.errors.insert("borrowing_date".to_string(), message);
                return ScreenOutcome::Handled;
            }
        };
        // Due date is prefilled from the loan period and not checked against
        // the borrowing date beyond being a date at all.
        let due_date = match parse_date(self.due_date.value()) {
            Ok(date) => date,
            Err(message) => {
                self.errors.insert("due_date".to_string(), message);
                return ScreenOutcome::Handled;
            }
        };
        let status = status_at(self.status.selected_id().unwrap_or(0));
        let recorded_by = self.recorded_by.value().trim().to_string();
        let items = self.items.clone();

        self.is_submitting = true;
        let outcome = match self.id {
            None => {
                let payload = CreateBorrowing {
                    member_id,
                    status,
                    borrowing_date,
                    due_date,
                    returned_date: None,
                    created_by: recorded_by,
                };
                ctx.block_on(ctx.services.borrowing_workflow.submit_new(payload, items))
            }
            Some(id) => {
                let payload = UpdateBorrowing {
                    member_id: Some(member_id),
                    status: Some(status),
                    borrowing_date: Some(borrowing_date),
                    due_date: Some(due_date),
                    returned_date: None,
                    updated_by: Some(recorded_by),
                };
                ctx.block_on(
                    ctx.services
                        .borrowing_workflow
                        .submit_update(id, payload, items),
                )
            }
        };
        self.is_submitting = false;

        let editing = self.id.is_some();
        match outcome {
            Ok(SubmitOutcome::Success { .. }) => {
                ctx.toasts.success(if editing {
                    "Borrowing updated"
                } else {
                    "Borrowing created"
                });
                ScreenOutcome::Navigate(Route::Borrowings)
            }
            Ok(SubmitOutcome::PartialSuccess { detail, .. }) => {
                ctx.toasts.warning(format!(
                    "Borrowing saved, but its book list failed: {}",
                    detail
                ));
                if editing {
                    // The parent update stuck; stay here so the items can be
                    // retried.
                    ScreenOutcome::Handled
                } else {
                    ScreenOutcome::Navigate(Route::Borrowings)
                }
            }
            Ok(SubmitOutcome::Rejected { message }) => {
                ctx.toasts.error(message);
                ScreenOutcome::Handled
            }
            Err(AppError::Validation(message)) => {
                ctx.toasts.warning(message);
                ScreenOutcome::Handled
            }
            Err(err) => {
                tracing::error!("submitting borrowing failed: {}", err);
                ctx.toasts.error(err.user_message());
                ScreenOutcome::Handled
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> ScreenOutcome {
        if self.is_submitting {
            return ScreenOutcome::Handled;
        }
        match key.code {
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Borrowings),
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                return ScreenOutcome::Handled;
            }
            KeyCode::BackTab => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                return ScreenOutcome::Handled;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.submit(ctx);
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.items.pop().is_some() {
                    ctx.toasts.success("Removed the last book line");
                }
                return ScreenOutcome::Handled;
            }
            KeyCode::Enter if self.focus >= FOCUS_ITEM_BOOK => {
                self.push_item_line(ctx);
                return ScreenOutcome::Handled;
            }
            _ => {}
        }
        match self.focus {
            FOCUS_MEMBER => self.member.handle_key(key),
            FOCUS_BORROWED => self.borrowing_date.handle_key(key),
            FOCUS_DUE => self.due_date.handle_key(key),
            FOCUS_STATUS => self.status.handle_key(key),
            FOCUS_RECORDED_BY => self.recorded_by.handle_key(key),
            FOCUS_ITEM_BOOK => self.item_book.handle_key(key),
            FOCUS_ITEM_QTY => self.item_quantity.handle_key(key),
            _ => self.item_price.handle_key(key),
        };
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit borrowing "
        } else {
            " Add borrowing "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // member
            Constraint::Length(1), // borrowed on
            Constraint::Length(1), // due on
            Constraint::Length(1), // status
            Constraint::Length(1), // recorded by
            Constraint::Length(1), // section header
            Constraint::Length(1), // book
            Constraint::Length(1), // qty
            Constraint::Length(1), // price
            Constraint::Min(3),    // working list
            Constraint::Length(1), // help
        ])
        .split(inner);

        render_select(
            frame,
            rows[0],
            &self.member,
            self.focus == FOCUS_MEMBER,
            self.errors.get("member_id").map(String::as_str),
        );
        render_text_input(
            frame,
            rows[1],
            &self.borrowing_date,
            self.focus == FOCUS_BORROWED,
            self.errors.get("borrowing_date").map(String::as_str),
        );
        render_text_input(
            frame,
            rows[2],
            &self.due_date,
            self.focus == FOCUS_DUE,
            self.errors.get("due_date").map(String::as_str),
        );
        render_select(
            frame,
            rows[3],
            &self.status,
            self.focus == FOCUS_STATUS,
            self.errors.get("status").map(String::as_str),
        );
        render_text_input(
            frame,
            rows[4],
            &self.recorded_by,
            self.focus == FOCUS_RECORDED_BY,
            None,
        );
        frame.render_widget(
            Paragraph::new(Line::from("── Borrowed books ──"))
                .style(Style::default().fg(Color::Gray)),
            rows[5],
        );
        render_select(
            frame,
            rows[6],
            &self.item_book,
            self.focus == FOCUS_ITEM_BOOK,
            self.errors.get("book_id").map(String::as_str),
        );
        render_text_input(
            frame,
            rows[7],
            &self.item_quantity,
            self.focus == FOCUS_ITEM_QTY,
            self.errors.get("quantity").map(String::as_str),
        );
        render_text_input(
            frame,
            rows[8],
            &self.item_price,
            self.focus == FOCUS_ITEM_PRICE,
            self.errors.get("price").map(String::as_str),
        );

        let mut list_lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Line::from(format!(
                    "  {}. {} ×{} @ {}",
                    i + 1,
                    self.book_title(item.book_id),
                    item.quantity,
                    item.price
                ))
            })
            .collect();
        if list_lines.is_empty() {
            list_lines.push(Line::from(Span::styled(
                "  no books yet; enter on a book line adds one",
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(list_lines), rows[9]);

        let help = if self.is_submitting {
            form_help(true)
        } else {
            format!(
                "{} · enter add book · ctrl+d drop last",
                form_help(false)
            )
        };
        frame.render_widget(
            Paragraph::new(Line::from(help)).style(Style::default().fg(Color::DarkGray)),
            rows[10],
        );
    }
}
