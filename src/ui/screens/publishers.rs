//! Publisher management screens

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use validator::Validate;

use crate::models::publisher::{CreatePublisher, Publisher, UpdatePublisher};
use crate::ui::form::{collect_errors, render_text_input, FieldErrors, TextInput};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::authors::form_help;
use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<Publisher>> {
    vec![
        ColumnDef::new("id", "ID", |p: &Publisher| p.id.to_string()),
        ColumnDef::new("name", "Name", |p: &Publisher| p.name.clone()),
        ColumnDef::new("address", "Address", |p: &Publisher| {
            p.address.clone().unwrap_or_default()
        }),
        ColumnDef::new("contact", "Contact", |p: &Publisher| {
            p.contact_number.clone().unwrap_or_default()
        }),
    ]
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct PublisherListScreen {
    list: ListState<Publisher>,
}

impl PublisherListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |p| p.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.publishers.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing publishers failed: {}", err);
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
            ListAction::Add => ScreenOutcome::Navigate(Route::PublisherAdd),
            ListAction::Edit(id) | ListAction::Open(id) => {
                ScreenOutcome::Navigate(Route::PublisherEdit(id))
            }
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.publishers.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Publisher deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting publisher {} failed: {}", id, err);
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
            .render(frame, area, "Publishers", "Delete this publisher?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

const FIELD_COUNT: usize = 3;

pub struct PublisherFormScreen {
    id: Option<i64>,
    name: TextInput,
    address: TextInput,
    contact_number: TextInput,
    focus: usize,
    errors: FieldErrors,
    is_submitting: bool,
}

impl PublisherFormScreen {
    pub fn add() -> Self {
        Self {
            id: None,
            name: TextInput::new("Name", "name"),
            address: TextInput::new("Address", "address"),
            contact_number: TextInput::new("Contact number", "contact_number"),
            focus: 0,
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load the record being edited; `None` sends the caller back to the list
    pub fn edit(ctx: &mut Ctx, id: i64) -> Option<Self> {
        match ctx.block_on(ctx.api.publishers.get(id)) {
            Ok(publisher) => {
                let mut screen = Self::add();
                screen.id = Some(id);
                screen.name.set_value(publisher.name);
                screen
                    .address
                    .set_value(publisher.address.unwrap_or_default());
                screen
                    .contact_number
                    .set_value(publisher.contact_number.unwrap_or_default());
                Some(screen)
            }
            Err(err) => {
                tracing::error!("loading publisher {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                None
            }
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();

        let result = match self.id {
            None => {
                let payload = CreatePublisher {
                    name: self.name.value().trim().to_string(),
                    address: self.address.value().trim().to_string(),
                    contact_number: self.contact_number.value().trim().to_string(),
                };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.publishers.create(&payload));
                self.is_submitting = false;
                result.map(|_| "Publisher created")
            }
            Some(id) => {
                let payload = UpdatePublisher {
                    name: Some(self.name.value().trim().to_string()),
                    address: Some(self.address.value().trim().to_string()),
                    contact_number: Some(self.contact_number.value().trim().to_string()),
                };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.publishers.update(id, &payload));
                self.is_submitting = false;
                result.map(|_| "Publisher updated")
            }
        };

        match result {
            Ok(message) => {
                ctx.toasts.success(message);
                ScreenOutcome::Navigate(Route::Publishers)
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!("saving publisher failed: {}", err);
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
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Publishers),
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
            0 => self.name.handle_key(key),
            1 => self.address.handle_key(key),
            _ => self.contact_number.handle_key(key),
        };
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit publisher "
        } else {
            " Add publisher "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name_area, address_area, contact_area, _, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        render_text_input(
            frame,
            name_area,
            &self.name,
            self.focus == 0,
            self.errors.get("name").map(String::as_str),
        );
        render_text_input(
            frame,
            address_area,
            &self.address,
            self.focus == 1,
            self.errors.get("address").map(String::as_str),
        );
        render_text_input(
            frame,
            contact_area,
            &self.contact_number,
            self.focus == 2,
            self.errors.get("contact_number").map(String::as_str),
        );
        frame.render_widget(
            Paragraph::new(Line::from(form_help(self.is_submitting)))
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}
