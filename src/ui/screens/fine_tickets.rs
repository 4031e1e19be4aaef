//! Fine ticket management screens

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::models::enums::{FineTicketStatus, PaymentMethod};
use crate::models::fine_ticket::{CreateFineTicket, FineTicket, UpdateFineTicket};
use crate::ui::form::{
    parse_amount, parse_optional_date, render_select, render_text_input, FieldErrors, SelectField,
    SelectOption, TextInput,
};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::authors::form_help;
use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<FineTicket>> {
    vec![
        ColumnDef::new("id", "ID", |f: &FineTicket| f.id.to_string()),
        ColumnDef::new("borrowing", "Borrowing", |f: &FineTicket| {
            format!("#{}", f.borrowing_id)
        }),
        ColumnDef::new("amount", "Amount", |f: &FineTicket| {
            f.total_fine_amount.to_string()
        }),
        ColumnDef::new("status", "Status", |f: &FineTicket| f.status.to_string()),
        ColumnDef::new("method", "Method", |f: &FineTicket| {
            f.payment_method.to_string()
        }),
        ColumnDef::new("paid", "Paid on", |f: &FineTicket| {
            f.payment_date.map(|d| d.to_string()).unwrap_or_default()
        }),
    ]
}

fn status_options() -> Vec<SelectOption> {
    FineTicketStatus::all()
        .iter()
        .enumerate()
        .map(|(i, s)| SelectOption::new(i as i64, s.to_string()))
        .collect()
}

fn method_options() -> Vec<SelectOption> {
    PaymentMethod::all()
        .iter()
        .enumerate()
        .map(|(i, m)| SelectOption::new(i as i64, m.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct FineTicketListScreen {
    list: ListState<FineTicket>,
}

impl FineTicketListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |f| f.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.fine_tickets.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing fine tickets failed: {}", err);
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
            ListAction::Add => ScreenOutcome::Navigate(Route::FineTicketAdd),
            ListAction::Edit(id) | ListAction::Open(id) => {
                ScreenOutcome::Navigate(Route::FineTicketEdit(id))
            }
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.fine_tickets.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Fine ticket deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting fine ticket {} failed: {}", id, err);
                        ctx.toasts.error(err.user_message());
                    }
                }
                ScreenOutcome::Handled
            }
            ListAction::Extra(_) | ListAction::None => ScreenOutcome::Handled,
            ListAction::Unhandled => ScreenOutcome::Unhandled,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.list
            .render(frame, area, "Fine tickets", "Delete this fine ticket?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

const FIELD_COUNT: usize = 5;

pub struct FineTicketFormScreen {
    id: Option<i64>,
    borrowing: SelectField,
    amount: TextInput,
    status: SelectField,
    payment_method: SelectField,
    payment_date: TextInput,
    focus: usize,
    errors: FieldErrors,
    is_submitting: bool,
}

impl FineTicketFormScreen {
    fn empty() -> Self {
        let mut status = SelectField::new("Status", "status");
        status.set_options(status_options());
        status.select_id(0);
        let mut payment_method = SelectField::new("Payment method", "payment_method");
        payment_method.set_options(method_options());
        payment_method.select_id(0);
        Self {
            id: None,
            borrowing: SelectField::new("Borrowing", "borrowing_id"),
            amount: TextInput::new("Fine amount", "total_fine_amount"),
            status,
            payment_method,
            payment_date: TextInput::new("Payment date", "payment_date"),
            focus: 0,
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load the borrowings the ticket can reference
    fn load_options(&mut self, ctx: &mut Ctx) {
        match ctx.block_on(ctx.services.reference.borrowings()) {
            Ok(borrowings) => {
                self.borrowing.set_options(
                    borrowings
                        .iter()
                        .map(|b| {
                            let member = b
                                .member
                                .as_ref()
                                .map(|m| m.name.clone())
                                .unwrap_or_else(|| format!("member #{}", b.member_id));
                            SelectOption::new(b.id, format!("#{} · {} · {}", b.id, member, b.status))
                        })
                        .collect(),
                );
            }
            Err(err) => {
                tracing::error!("loading borrowings for fine ticket form failed: {}", err);
                ctx.toasts.error(err.user_message());
            }
        }
    }

    pub fn add(ctx: &mut Ctx) -> Self {
        let mut screen = Self::empty();
        screen.load_options(ctx);
        screen
    }

    /// Load the record being edited; `None` sends the caller back to the list
    pub fn edit(ctx: &mut Ctx, id: i64) -> Option<Self> {
        let ticket = match ctx.block_on(ctx.api.fine_tickets.get(id)) {
            Ok(ticket) => ticket,
            Err(err) => {
                tracing::error!("loading fine ticket {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                return None;
            }
        };

        let mut screen = Self::empty();
        screen.load_options(ctx);
        screen.id = Some(id);
        screen.borrowing.select_id(ticket.borrowing_id);
        screen.amount.set_value(ticket.total_fine_amount.to_string());
        let status_index = FineTicketStatus::all()
            .iter()
            .position(|s| *s == ticket.status)
            .unwrap_or(0);
        screen.status.select_id(status_index as i64);
        let method_index = PaymentMethod::all()
            .iter()
            .position(|m| *m == ticket.payment_method)
            .unwrap_or(0);
        screen.payment_method.select_id(method_index as i64);
        screen
            .payment_date
            .set_value(ticket.payment_date.map(|d| d.to_string()).unwrap_or_default());
        Some(screen)
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();

        let Some(borrowing_id) = self.borrowing.selected_id() else {
            self.errors
                .insert("borrowing_id".to_string(), "Pick a borrowing".to_string());
            return ScreenOutcome::Handled;
        };
        let total_fine_amount = match parse_amount(self.amount.value()) {
            Ok(amount) => amount,
            Err(message) => {
                self.errors.insert("total_fine_amount".to_string(), message);
                return ScreenOutcome::Handled;
            }
        };
        let payment_date = match parse_optional_date(self.payment_date.value()) {
            Ok(date) => date,
            Err(message) => {
                self.errors.insert("payment_date".to_string(), message);
                return ScreenOutcome::Handled;
            }
        };
        let status = FineTicketStatus::all()
            .get(self.status.selected_id().unwrap_or(0) as usize)
            .copied()
            .unwrap_or(FineTicketStatus::Unpaid);
        let payment_method = PaymentMethod::all()
            .get(self.payment_method.selected_id().unwrap_or(0) as usize)
            .copied()
            .unwrap_or(PaymentMethod::Cash);

        self.is_submitting = true;
        let result = match self.id {
            None => {
                let payload = CreateFineTicket {
                    borrowing_id,
                    total_fine_amount,
                    status,
                    payment_method,
                    payment_date,
                };
                ctx.block_on(ctx.api.fine_tickets.create(&payload))
                    .map(|_| "Fine ticket created")
            }
            Some(id) => {
                let payload = UpdateFineTicket {
                    borrowing_id: Some(borrowing_id),
                    total_fine_amount: Some(total_fine_amount),
                    status: Some(status),
                    payment_method: Some(payment_method),
                    payment_date,
                };
                ctx.block_on(ctx.api.fine_tickets.update(id, &payload))
                    .map(|_| "Fine ticket updated")
            }
        };
        self.is_submitting = false;

        match result {
            Ok(message) => {
                ctx.toasts.success(message);
                ScreenOutcome::Navigate(Route::FineTickets)
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!("saving fine ticket failed: {}", err);
                }
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
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::FineTickets),
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
            _ => {}
        }
        match self.focus {
            0 => self.borrowing.handle_key(key),
            1 => self.amount.handle_key(key),
            2 => self.status.handle_key(key),
            3 => self.payment_method.handle_key(key),
            _ => self.payment_date.handle_key(key),
        };
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit fine ticket "
        } else {
            " Add fine ticket "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [borrowing_area, amount_area, status_area, method_area, paid_area, _, help_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(inner);

        render_select(
            frame,
            borrowing_area,
            &self.borrowing,
            self.focus == 0,
            self.errors.get("borrowing_id").map(String::as_str),
        );
        render_text_input(
            frame,
            amount_area,
            &self.amount,
            self.focus == 1,
            self.errors.get("total_fine_amount").map(String::as_str),
        );
        render_select(
            frame,
            status_area,
            &self.status,
            self.focus == 2,
            self.errors.get("status").map(String::as_str),
        );
        render_select(
            frame,
            method_area,
            &self.payment_method,
            self.focus == 3,
            self.errors.get("payment_method").map(String::as_str),
        );
        render_text_input(
            frame,
            paid_area,
            &self.payment_date,
            self.focus == 4,
            self.errors.get("payment_date").map(String::as_str),
        );
        frame.render_widget(
            Paragraph::new(Line::from(form_help(self.is_submitting)))
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}
