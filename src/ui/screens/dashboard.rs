//! Dashboard: collection totals and the latest borrowings

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::services::dashboard::DashboardSummary;
use crate::ui::{Ctx, ScreenOutcome};

pub struct DashboardScreen {
    summary: Option<DashboardSummary>,
}

impl DashboardScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self { summary: None };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        match ctx.block_on(ctx.services.dashboard.summary()) {
            Ok(summary) => self.summary = Some(summary),
            Err(err) => {
                tracing::error!("loading dashboard failed: {}", err);
                ctx.toasts.error(err.user_message());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> ScreenOutcome {
        match key.code {
            KeyCode::Char('g') => {
                self.refresh(ctx);
                ScreenOutcome::Handled
            }
            _ => ScreenOutcome::Unhandled,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(" Dashboard · g refresh ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(summary) = &self.summary else {
            frame.render_widget(Paragraph::new("No data. Is the API reachable?"), inner);
            return;
        };

        let [totals_area, recent_area] =
            Layout::vertical([Constraint::Length(7), Constraint::Min(3)]).areas(inner);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let totals = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("  Books        "),
                Span::styled(summary.total_books.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("  Authors      "),
                Span::styled(summary.total_authors.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("  Members      "),
                Span::styled(summary.total_members.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("  Borrowings   "),
                Span::styled(summary.total_borrowings.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("  Fine tickets "),
                Span::styled(summary.total_fine_tickets.to_string(), bold),
            ]),
        ];
        frame.render_widget(Paragraph::new(totals), totals_area);

        let mut recent = vec![Line::from(Span::styled(
            "  Latest borrowings",
            Style::default().fg(Color::Gray),
        ))];
        for borrowing in &summary.recent_borrowings {
            let member = borrowing
                .member
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| format!("member #{}", borrowing.member_id));
            recent.push(Line::from(format!(
                "  #{} · {} · {} · due {}",
                borrowing.id, member, borrowing.status, borrowing.due_date
            )));
        }
        frame.render_widget(Paragraph::new(recent), recent_area);
    }
}
