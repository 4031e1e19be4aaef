//! Member management screens

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use validator::Validate;

use crate::models::enums::MemberType;
use crate::models::member::{CreateMember, Member, UpdateMember};
use crate::ui::form::{
    collect_errors, parse_date, render_select, render_text_input, FieldErrors, SelectField,
    SelectOption, TextInput,
};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::authors::form_help;
use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<Member>> {
    vec![
        ColumnDef::new("id", "ID", |m: &Member| m.id.to_string()),
        ColumnDef::new("name", "Name", |m: &Member| m.name.clone()),
        ColumnDef::new("email", "Email", |m: &Member| m.email.clone()),
        ColumnDef::new("phone", "Phone", |m: &Member| m.phone_number.clone()),
        ColumnDef::new("type", "Type", |m: &Member| m.member_type.to_string()),
        ColumnDef::new("enrolled", "Enrolled", |m: &Member| {
            m.enrollment_date.to_string()
        }),
    ]
}

/// The member-type options are a fixed enum, not a fetched collection
fn member_type_options() -> Vec<SelectOption> {
    MemberType::all()
        .iter()
        .enumerate()
        .map(|(i, t)| SelectOption::new(i as i64, t.to_string()))
        .collect()
}

fn member_type_at(index: i64) -> MemberType {
    MemberType::all()
        .get(index as usize)
        .copied()
        .unwrap_or(MemberType::UndergraduateStudent)
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct MemberListScreen {
    list: ListState<Member>,
}

impl MemberListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |m| m.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.members.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing members failed: {}", err);
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
            ListAction::Add => ScreenOutcome::Navigate(Route::MemberAdd),
            ListAction::Edit(id) | ListAction::Open(id) => {
                ScreenOutcome::Navigate(Route::MemberEdit(id))
            }
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.members.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Member deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting member {} failed: {}", id, err);
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
            .render(frame, area, "Members", "Delete this member?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

const FIELD_COUNT: usize = 6;

pub struct MemberFormScreen {
    id: Option<i64>,
    name: TextInput,
    email: TextInput,
    phone_number: TextInput,
    address: TextInput,
    member_type: SelectField,
    enrollment_date: TextInput,
    focus: usize,
    errors: FieldErrors,
    is_submitting: bool,
}

impl MemberFormScreen {
    pub fn add() -> Self {
        let mut member_type = SelectField::new("Member type", "member_type");
        member_type.set_options(member_type_options());
        member_type.select_id(0);
        Self {
            id: None,
            name: TextInput::new("Name", "name"),
            email: TextInput::new("Email", "email"),
            phone_number: TextInput::new("Phone number", "phone_number"),
            address: TextInput::new("Address", "address"),
            member_type,
            enrollment_date: TextInput::new("Enrollment date", "enrollment_date")
                .with_value(Local::now().date_naive().to_string()),
            focus: 0,
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load the record being edited; `None` sends the caller back to the list
    pub fn edit(ctx: &mut Ctx, id: i64) -> Option<Self> {
        match ctx.block_on(ctx.api.members.get(id)) {
            Ok(member) => {
                let mut screen = Self::add();
                screen.id = Some(id);
                screen.name.set_value(member.name);
                screen.email.set_value(member.email);
                screen.phone_number.set_value(member.phone_number);
                screen.address.set_value(member.address);
                let index = MemberType::all()
                    .iter()
                    .position(|t| *t == member.member_type)
                    .unwrap_or(0);
                screen.member_type.select_id(index as i64);
                screen
                    .enrollment_date
                    .set_value(member.enrollment_date.to_string());
                Some(screen)
            }
            Err(err) => {
                tracing::error!("loading member {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                None
            }
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();

        let enrollment_date = match parse_date(self.enrollment_date.value()) {
            Ok(date) => date,
            Err(message) => {
                self.errors.insert("enrollment_date".to_string(), message);
                return ScreenOutcome::Handled;
            }
        };
        let member_type = member_type_at(self.member_type.selected_id().unwrap_or(0));

        let result = match self.id {
            None => {
                let payload = CreateMember {
                    name: self.name.value().trim().to_string(),
                    email: self.email.value().trim().to_string(),
                    phone_number: self.phone_number.value().trim().to_string(),
                    address: self.address.value().trim().to_string(),
                    member_type,
                    enrollment_date,
                };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.members.create(&payload));
                self.is_submitting = false;
                result.map(|_| "Member created")
            }
            Some(id) => {
                let payload = UpdateMember {
                    name: Some(self.name.value().trim().to_string()),
                    email: Some(self.email.value().trim().to_string()),
                    phone_number: Some(self.phone_number.value().trim().to_string()),
                    address: Some(self.address.value().trim().to_string()),
                    member_type: Some(member_type),
                    enrollment_date: Some(enrollment_date),
                };
                if let Err(errors) = payload.validate() {
                    self.errors = collect_errors(&errors);
                    return ScreenOutcome::Handled;
                }
                self.is_submitting = true;
                let result = ctx.block_on(ctx.api.members.update(id, &payload));
                self.is_submitting = false;
                result.map(|_| "Member updated")
            }
        };

        match result {
            Ok(message) => {
                ctx.toasts.success(message);
                ScreenOutcome::Navigate(Route::Members)
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!("saving member failed: {}", err);
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
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Members),
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
            1 => self.email.handle_key(key),
            2 => self.phone_number.handle_key(key),
            3 => self.address.handle_key(key),
            4 => self.member_type.handle_key(key),
            _ => self.enrollment_date.handle_key(key),
        };
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit member "
        } else {
            " Add member "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name_area, email_area, phone_area, address_area, type_area, enrolled_area, _, help_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
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
            email_area,
            &self.email,
            self.focus == 1,
            self.errors.get("email").map(String::as_str),
        );
        render_text_input(
            frame,
            phone_area,
            &self.phone_number,
            self.focus == 2,
            self.errors.get("phone_number").map(String::as_str),
        );
        render_text_input(
            frame,
            address_area,
            &self.address,
            self.focus == 3,
            self.errors.get("address").map(String::as_str),
        );
        render_select(
            frame,
            type_area,
            &self.member_type,
            self.focus == 4,
            self.errors.get("member_type").map(String::as_str),
        );
        render_text_input(
            frame,
            enrolled_area,
            &self.enrollment_date,
            self.focus == 5,
            self.errors.get("enrollment_date").map(String::as_str),
        );
        frame.render_widget(
            Paragraph::new(Line::from(form_help(self.is_submitting)))
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}
