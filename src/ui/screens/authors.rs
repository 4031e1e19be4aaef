//! Author management screens

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use validator::Validate;

use crate::models::author::{Author, CreateAuthor, UpdateAuthor};
use crate::ui::form::{collect_errors, optional_text, render_text_input, FieldErrors, TextInput};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<Author>> {
    vec![
        ColumnDef::new("id", "ID", |a: &Author| a.id.to_string()),
        ColumnDef::new("name", "Name", |a: &Author| a.name.clone()),
        ColumnDef::new("bio", "Bio", |a: &Author| a.bio.clone().unwrap_or_default()),
    ]
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct AuthorListScreen {
    list: ListState<Author>,
}

impl AuthorListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |a| a.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.authors.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing authors failed: {}", err);
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
            ListAction::Add => ScreenOutcome::Navigate(Route::AuthorAdd),
            ListAction::Edit(id) | ListAction::Open(id) => {
                ScreenOutcome::Navigate(Route::AuthorEdit(id))
            }
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.authors.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Author deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting author {} failed: {}", id, err);
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
            .render(frame, area, "Authors", "Delete this author?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

const FIELD_COUNT: usize = 2;

pub struct AuthorFormScreen {
    id: Option<i64>,
    name: TextInput,
    bio: TextInput,
    focus: usize,
    errors: FieldErrors,
    is_submitting: bool,
}

impl AuthorFormScreen {
    pub fn add() -> Self {
        Self {
            id: None,
            name: TextInput::new("Name", "name"),
            bio: TextInput::new("Bio", "bio"),
            focus: 0,
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load the record being edited; `None` sends the caller back to the list
    pub fn edit(ctx: &mut Ctx, id: i64) -> Option<Self> {
        match ctx.block_on(ctx.api.authors.get(id)) {
            Ok(author) => {
                let mut screen = Self::add();
                screen.id = Some(id);
                screen.name.set_value(author.name);
                screen.bio.set_value(author.bio.unwrap_or_default());
                Some(screen)
            }
            Err(err) => {
                tracing::error!("loading author {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                None
            }
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();

        let result = match self.id {
            None => {
                let payload = CreateAuthor {
                    name: self.name.value().trim().to_string(),
                    bio: optional_text(self.bio.value()),
                };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.authors.create(&payload));
                self.is_submitting = false;
                result.map(|_| "Author created")
            }
            Some(id) => {
                let payload = UpdateAuthor {
                    name: Some(self.name.value().trim().to_string()),
                    bio: optional_text(self.bio.value()),
                };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.authors.update(id, &payload));
                self.is_submitting = false;
                result.map(|_| "Author updated")
            }
        };

        match result {
            Ok(message) => {
                ctx.toasts.success(message);
                ScreenOutcome::Navigate(Route::Authors)
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!("saving author failed: {}", err);
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
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Authors),
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
            _ => self.bio.handle_key(key),
        };
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit author "
        } else {
            " Add author "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name_area, bio_area, _, help_area] = Layout::vertical([
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
            bio_area,
            &self.bio,
            self.focus == 1,
            self.errors.get("bio").map(String::as_str),
        );
        frame.render_widget(
            Paragraph::new(Line::from(form_help(self.is_submitting)))
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}

pub(super) fn form_help(is_submitting: bool) -> String {
    if is_submitting {
        "saving…".to_string()
    } else {
        "tab next field · ctrl+s save · esc cancel".to_string()
    }
}
