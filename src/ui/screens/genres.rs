//! Genre management screens

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use validator::Validate;

use crate::models::genre::{CreateGenre, Genre, UpdateGenre};
use crate::ui::form::{collect_errors, render_text_input, FieldErrors, TextInput};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::authors::form_help;
use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<Genre>> {
    vec![
        ColumnDef::new("id", "ID", |g: &Genre| g.id.to_string()),
        ColumnDef::new("name", "Name", |g: &Genre| g.name.clone()),
    ]
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct GenreListScreen {
    list: ListState<Genre>,
}

impl GenreListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |g| g.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.genres.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing genres failed: {}", err);
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
            ListAction::Add => ScreenOutcome::Navigate(Route::GenreAdd),
            ListAction::Edit(id) | ListAction::Open(id) => {
                ScreenOutcome::Navigate(Route::GenreEdit(id))
            }
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.genres.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Genre deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting genre {} failed: {}", id, err);
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
        self.list.render(frame, area, "Genres", "Delete this genre?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

pub struct GenreFormScreen {
    id: Option<i64>,
    name: TextInput,
    errors: FieldErrors,
    is_submitting: bool,
}

impl GenreFormScreen {
    pub fn add() -> Self {
        Self {
            id: None,
            name: TextInput::new("Name", "name"),
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load the record being edited; `None` sends the caller back to the list
    pub fn edit(ctx: &mut Ctx, id: i64) -> Option<Self> {
        match ctx.block_on(ctx.api.genres.get(id)) {
            Ok(genre) => {
                let mut screen = Self::add();
                screen.id = Some(id);
                screen.name.set_value(genre.name);
                Some(screen)
            }
            Err(err) => {
                tracing::error!("loading genre {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                None
            }
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();
        let name = self.name.value().trim().to_string();

        let result = match self.id {
            None => {
                let payload = CreateGenre { name };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.genres.create(&payload));
                self.is_submitting = false;
                result.map(|_| "Genre created")
            }
            Some(id) => {
                let payload = UpdateGenre { name: Some(name) };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.genres.update(id, &payload));
                self.is_submitting = false;
                result.map(|_| "Genre updated")
            }
        };

        match result {
            Ok(message) => {
                ctx.toasts.success(message);
                ScreenOutcome::Navigate(Route::Genres)
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!("saving genre failed: {}", err);
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
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Genres),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.submit(ctx);
            }
            _ => {}
        }
        self.name.handle_key(key);
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit genre "
        } else {
            " Add genre "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name_area, _, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        render_text_input(
            frame,
            name_area,
            &self.name,
            true,
            self.errors.get("name").map(String::as_str),
        );
        frame.render_widget(
            Paragraph::new(Line::from(form_help(self.is_submitting)))
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}
