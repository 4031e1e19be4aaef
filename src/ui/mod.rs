//! Terminal UI: application shell, routing and the event loop
//!
//! The event loop is synchronous; network work is bridged into the Tokio
//! runtime with `Handle::block_on`, so every handler awaits its calls
//! sequentially and the screen shows its loading/submitting state until the
//! response lands. There is no timeout and no cancellation anywhere in that
//! path.

pub mod form;
pub mod screens;
pub mod table;
pub mod toast;
pub mod widgets;

use std::future::Future;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, List, ListItem, Paragraph};
use ratatui::{Frame, Terminal};

use crate::api::Api;
use crate::config::AppConfig;
use crate::services::Services;

use self::screens::{
    authors, books, borrowings, dashboard, fine_tickets, genres, members, publishers,
};
use self::toast::Toasts;

/// Client-side routes, mirroring the management sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Books,
    BookAdd,
    BookEdit(i64),
    BookDetail(i64),
    Authors,
    AuthorAdd,
    AuthorEdit(i64),
    Genres,
    GenreAdd,
    GenreEdit(i64),
    Publishers,
    PublisherAdd,
    PublisherEdit(i64),
    Members,
    MemberAdd,
    MemberEdit(i64),
    Borrowings,
    BorrowingAdd,
    BorrowingEdit(i64),
    FineTickets,
    FineTicketAdd,
    FineTicketEdit(i64),
}

impl Route {
    /// The sidebar section a route belongs to
    fn section(&self) -> usize {
        match self {
            Route::Dashboard => 0,
            Route::Books | Route::BookAdd | Route::BookEdit(_) | Route::BookDetail(_) => 1,
            Route::Authors | Route::AuthorAdd | Route::AuthorEdit(_) => 2,
            Route::Genres | Route::GenreAdd | Route::GenreEdit(_) => 3,
            Route::Publishers | Route::PublisherAdd | Route::PublisherEdit(_) => 4,
            Route::Members | Route::MemberAdd | Route::MemberEdit(_) => 5,
            Route::Borrowings | Route::BorrowingAdd | Route::BorrowingEdit(_) => 6,
            Route::FineTickets | Route::FineTicketAdd | Route::FineTicketEdit(_) => 7,
        }
    }
}

const SECTIONS: [(&str, Route); 8] = [
    ("1 Dashboard", Route::Dashboard),
    ("2 Books", Route::Books),
    ("3 Authors", Route::Authors),
    ("4 Genres", Route::Genres),
    ("5 Publishers", Route::Publishers),
    ("6 Members", Route::Members),
    ("7 Borrowings", Route::Borrowings),
    ("8 Fine tickets", Route::FineTickets),
];

/// What a screen did with a key press
pub enum ScreenOutcome {
    Handled,
    /// Not a screen key; the app may treat it as a global key
    Unhandled,
    Navigate(Route),
}

/// Everything screens need to do their work, passed explicitly
pub struct Ctx {
    pub config: AppConfig,
    pub api: Api,
    pub services: Services,
    pub toasts: Toasts,
    rt: tokio::runtime::Handle,
}

impl Ctx {
    pub fn new(
        config: AppConfig,
        api: Api,
        services: Services,
        rt: tokio::runtime::Handle,
    ) -> Self {
        Self {
            config,
            api,
            services,
            toasts: Toasts::new(),
            rt,
        }
    }

    /// Run a façade call to completion on the runtime. The calling handler
    /// (and with it the UI) suspends until the response resolves.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.rt.block_on(future)
    }
}

enum Screen {
    Dashboard(dashboard::DashboardScreen),
    BookList(books::BookListScreen),
    BookForm(books::BookFormScreen),
    BookDetail(books::BookDetailScreen),
    AuthorList(authors::AuthorListScreen),
    AuthorForm(authors::AuthorFormScreen),
    GenreList(genres::GenreListScreen),
    GenreForm(genres::GenreFormScreen),
    PublisherList(publishers::PublisherListScreen),
    PublisherForm(publishers::PublisherFormScreen),
    MemberList(members::MemberListScreen),
    MemberForm(members::MemberFormScreen),
    BorrowingList(borrowings::BorrowingListScreen),
    BorrowingForm(borrowings::BorrowingFormScreen),
    FineTicketList(fine_tickets::FineTicketListScreen),
    FineTicketForm(fine_tickets::FineTicketFormScreen),
}

pub struct App {
    ctx: Ctx,
    route: Route,
    screen: Screen,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, rt: tokio::runtime::Handle) -> Self {
        let client = crate::api::ApiClient::new(&config.api);
        let api = Api::new(client);
        let services = Services::new(api.clone());
        let mut ctx = Ctx::new(config, api, services, rt);
        let screen = Screen::Dashboard(dashboard::DashboardScreen::new(&mut ctx));
        Self {
            ctx,
            route: Route::Dashboard,
            screen,
            should_quit: false,
        }
    }

    /// Drive the terminal until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            self.ctx.toasts.prune();
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the screen for a route. Screens fetch their data in the
    /// constructor; an edit screen whose record cannot be loaded falls back
    /// to its listing route.
    fn navigate(&mut self, route: Route) {
        let ctx = &mut self.ctx;
        let built: Option<Screen> = match route {
            Route::Dashboard => Some(Screen::Dashboard(dashboard::DashboardScreen::new(ctx))),
            Route::Books => Some(Screen::BookList(books::BookListScreen::new(ctx))),
            Route::BookAdd => Some(Screen::BookForm(books::BookFormScreen::add(ctx))),
            Route::BookEdit(id) => books::BookFormScreen::edit(ctx, id).map(Screen::BookForm),
            Route::BookDetail(id) => books::BookDetailScreen::new(ctx, id).map(Screen::BookDetail),
            Route::Authors => Some(Screen::AuthorList(authors::AuthorListScreen::new(ctx))),
            Route::AuthorAdd => Some(Screen::AuthorForm(authors::AuthorFormScreen::add())),
            Route::AuthorEdit(id) => {
                authors::AuthorFormScreen::edit(ctx, id).map(Screen::AuthorForm)
            }
            Route::Genres => Some(Screen::GenreList(genres::GenreListScreen::new(ctx))),
            Route::GenreAdd => Some(Screen::GenreForm(genres::GenreFormScreen::add())),
            Route::GenreEdit(id) => genres::GenreFormScreen::edit(ctx, id).map(Screen::GenreForm),
            Route::Publishers => Some(Screen::PublisherList(publishers::PublisherListScreen::new(
                ctx,
            ))),
            Route::PublisherAdd => Some(Screen::PublisherForm(publishers::PublisherFormScreen::add())),
            Route::PublisherEdit(id) => {
                publishers::PublisherFormScreen::edit(ctx, id).map(Screen::PublisherForm)
            }
            Route::Members => Some(Screen::MemberList(members::MemberListScreen::new(ctx))),
            Route::MemberAdd => Some(Screen::MemberForm(members::MemberFormScreen::add())),
            Route::MemberEdit(id) => {
                members::MemberFormScreen::edit(ctx, id).map(Screen::MemberForm)
            }
            Route::Borrowings => Some(Screen::BorrowingList(borrowings::BorrowingListScreen::new(
                ctx,
            ))),
            Route::BorrowingAdd => Some(Screen::BorrowingForm(borrowings::BorrowingFormScreen::add(
                ctx,
            ))),
            Route::BorrowingEdit(id) => {
                borrowings::BorrowingFormScreen::edit(ctx, id).map(Screen::BorrowingForm)
            }
            Route::FineTickets => Some(Screen::FineTicketList(
                fine_tickets::FineTicketListScreen::new(ctx),
            )),
            Route::FineTicketAdd => Some(Screen::FineTicketForm(
                fine_tickets::FineTicketFormScreen::add(ctx),
            )),
            Route::FineTicketEdit(id) => {
                fine_tickets::FineTicketFormScreen::edit(ctx, id).map(Screen::FineTicketForm)
            }
        };

        match built {
            Some(screen) => {
                self.screen = screen;
                self.route = route;
            }
            // Load failed; the constructor already raised a toast
            None => {
                let fallback = SECTIONS[route.section()].1;
                if fallback != self.route {
                    self.navigate(fallback);
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits, whatever has focus
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let ctx = &mut self.ctx;
        let outcome = match &mut self.screen {
            Screen::Dashboard(screen) => screen.handle_key(key, ctx),
            Screen::BookList(screen) => screen.handle_key(key, ctx),
            Screen::BookForm(screen) => screen.handle_key(key, ctx),
            Screen::BookDetail(screen) => screen.handle_key(key, ctx),
            Screen::AuthorList(screen) => screen.handle_key(key, ctx),
            Screen::AuthorForm(screen) => screen.handle_key(key, ctx),
            Screen::GenreList(screen) => screen.handle_key(key, ctx),
            Screen::GenreForm(screen) => screen.handle_key(key, ctx),
            Screen::PublisherList(screen) => screen.handle_key(key, ctx),
            Screen::PublisherForm(screen) => screen.handle_key(key, ctx),
            Screen::MemberList(screen) => screen.handle_key(key, ctx),
            Screen::MemberForm(screen) => screen.handle_key(key, ctx),
            Screen::BorrowingList(screen) => screen.handle_key(key, ctx),
            Screen::BorrowingForm(screen) => screen.handle_key(key, ctx),
            Screen::FineTicketList(screen) => screen.handle_key(key, ctx),
            Screen::FineTicketForm(screen) => screen.handle_key(key, ctx),
        };

        match outcome {
            ScreenOutcome::Navigate(route) => self.navigate(route),
            ScreenOutcome::Handled => {}
            ScreenOutcome::Unhandled => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let index = c as usize - '1' as usize;
                    if let Some(&(_, route)) = SECTIONS.get(index) {
                        self.navigate(route);
                    }
                }
                _ => {}
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(20), Constraint::Min(40)])
                .areas(frame.area());

        self.draw_sidebar(frame, sidebar_area);

        let ctx = &self.ctx;
        match &mut self.screen {
            Screen::Dashboard(screen) => screen.render(frame, content_area),
            Screen::BookList(screen) => screen.render(frame, content_area),
            Screen::BookForm(screen) => screen.render(frame, content_area),
            Screen::BookDetail(screen) => screen.render(frame, content_area),
            Screen::AuthorList(screen) => screen.render(frame, content_area),
            Screen::AuthorForm(screen) => screen.render(frame, content_area),
            Screen::GenreList(screen) => screen.render(frame, content_area),
            Screen::GenreForm(screen) => screen.render(frame, content_area),
            Screen::PublisherList(screen) => screen.render(frame, content_area),
            Screen::PublisherForm(screen) => screen.render(frame, content_area),
            Screen::MemberList(screen) => screen.render(frame, content_area),
            Screen::MemberForm(screen) => screen.render(frame, content_area),
            Screen::BorrowingList(screen) => screen.render(frame, content_area),
            Screen::BorrowingForm(screen) => screen.render(frame, content_area),
            Screen::FineTicketList(screen) => screen.render(frame, content_area),
            Screen::FineTicketForm(screen) => screen.render(frame, content_area),
        }

        widgets::render_toasts(frame, &ctx.toasts);
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let current = self.route.section();
        let items: Vec<ListItem> = SECTIONS
            .iter()
            .enumerate()
            .map(|(i, (label, _))| {
                let style = if i == current {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(*label).style(style)
            })
            .collect();

        let [list_area, help_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).areas(area);
        frame.render_widget(
            List::new(items).block(Block::bordered().title(" Biblio ")),
            list_area,
        );
        frame.render_widget(
            Paragraph::new(vec![Line::from("1-8 section"), Line::from("q quit")])
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}
