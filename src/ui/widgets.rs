//! Small shared widgets: confirm dialog, toast stack, sidebar

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use super::toast::{ToastKind, Toasts};

/// Center a box of the given size inside `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Modal yes/no prompt; the caller owns the pending action
pub fn render_confirm(frame: &mut Frame, message: &str) {
    let area = centered_rect((message.len() as u16 + 6).max(30), 5, frame.area());
    frame.render_widget(Clear, area);
    let body = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("[y] confirm   [n] cancel"),
    ])
    .block(
        Block::bordered()
            .title(" Confirm ")
            .style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(body, area);
}

/// Toast stack in the top-right corner
pub fn render_toasts(frame: &mut Frame, toasts: &Toasts) {
    if toasts.is_empty() {
        return;
    }
    let items: Vec<ListItem> = toasts
        .iter()
        .map(|toast| {
            let (symbol, color) = match toast.kind {
                ToastKind::Success => ("✓", Color::Green),
                ToastKind::Warning => ("!", Color::Yellow),
                ToastKind::Error => ("✗", Color::Red),
            };
            ListItem::new(format!(" {} {} ", symbol, toast.message))
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        })
        .collect();

    let height = items.len() as u16 + 2;
    let width = toasts
        .iter()
        .map(|t| t.message.len() as u16 + 6)
        .max()
        .unwrap_or(20)
        .min(frame.area().width / 2);
    let area = Rect {
        x: frame.area().right().saturating_sub(width + 1),
        y: 1,
        width,
        height: height.min(frame.area().height),
    };
    frame.render_widget(Clear, area);
    frame.render_widget(List::new(items).block(Block::bordered()), area);
}
