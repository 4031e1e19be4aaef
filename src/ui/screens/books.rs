//! Book management screens: listing, add/edit form, detail view
//!
//! The form is the one with relational fields: genre and publisher dropdowns
//! plus the bounded author multi-select. The referenced collections are
//! loaded together when the form is entered.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use rust_decimal::Decimal;
use validator::Validate;

use crate::models::book::{is_valid_isbn, Book, CreateBook, UpdateBook};
use crate::services::reference_data::BookFormOptions;
use crate::ui::form::{
    collect_errors, optional_text, parse_amount, parse_count, parse_optional_date, render_multi_select,
    render_select, render_text_input, FieldErrors, MultiSelect, SelectField, SelectOption, TextInput,
};
use crate::ui::table::ColumnDef;
use crate::ui::{Ctx, Route, ScreenOutcome};

use super::authors::form_help;
use super::{ListAction, ListState};

fn columns() -> Vec<ColumnDef<Book>> {
    vec![
        ColumnDef::new("id", "ID", |b: &Book| b.id.to_string()),
        ColumnDef::new("title", "Title", |b: &Book| b.title.clone()),
        ColumnDef::new("isbn", "ISBN", |b: &Book| b.isbn.clone()),
        ColumnDef::new("price", "Price", |b: &Book| b.price.to_string()),
        ColumnDef::new("quantity", "Qty", |b: &Book| b.quantity.to_string()),
        ColumnDef::new("published", "Published", |b: &Book| {
            b.publish_date.map(|d| d.to_string()).unwrap_or_default()
        }),
    ]
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct BookListScreen {
    list: ListState<Book>,
}

impl BookListScreen {
    pub fn new(ctx: &mut Ctx) -> Self {
        let mut screen = Self {
            list: ListState::new(columns(), ctx.config.ui.page_limit, |b| b.id),
        };
        screen.refresh(ctx);
        screen
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        let query = self.list.query();
        match ctx.block_on(ctx.api.books.list(&query)) {
            Ok(page) => self.list.apply_page(page),
            Err(err) => {
                tracing::error!("listing books failed: {}", err);
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
            ListAction::Add => ScreenOutcome::Navigate(Route::BookAdd),
            ListAction::Edit(id) => ScreenOutcome::Navigate(Route::BookEdit(id)),
            ListAction::Open(id) => ScreenOutcome::Navigate(Route::BookDetail(id)),
            ListAction::Delete(id) => {
                match ctx.block_on(ctx.api.books.delete(id)) {
                    Ok(()) => {
                        ctx.toasts.success("Book deleted");
                        self.refresh(ctx);
                    }
                    Err(err) => {
                        tracing::error!("deleting book {} failed: {}", id, err);
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
        self.list.render(frame, area, "Books", "Delete this book?");
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

const FIELD_COUNT: usize = 11;
const FOCUS_GENRE: usize = 8;
const FOCUS_PUBLISHER: usize = 9;
const FOCUS_AUTHORS: usize = 10;

pub struct BookFormScreen {
    id: Option<i64>,
    title: TextInput,
    isbn: TextInput,
    price: TextInput,
    quantity: TextInput,
    total_page: TextInput,
    publish_date: TextInput,
    description: TextInput,
    image_url: TextInput,
    genre: SelectField,
    publisher: SelectField,
    authors: MultiSelect,
    focus: usize,
    errors: FieldErrors,
    is_submitting: bool,
}

impl BookFormScreen {
    fn empty() -> Self {
        Self {
            id: None,
            title: TextInput::new("Title", "title"),
            isbn: TextInput::new("ISBN", "isbn"),
            price: TextInput::new("Price", "price"),
            quantity: TextInput::new("Quantity", "quantity").with_value("1"),
            total_page: TextInput::new("Pages", "total_page"),
            publish_date: TextInput::new("Publish date", "publish_date"),
            description: TextInput::new("Description", "description"),
            image_url: TextInput::new("Image URL", "image_url"),
            genre: SelectField::new("Genre", "genre_id"),
            publisher: SelectField::new("Publisher", "publisher_id"),
            authors: MultiSelect::new("Authors", "author_ids", 1, 3),
            focus: 0,
            errors: FieldErrors::new(),
            is_submitting: false,
        }
    }

    /// Load the reference collections the dropdowns need
    fn load_options(&mut self, ctx: &mut Ctx) {
        match ctx.block_on(ctx.services.reference.book_form_options()) {
            Ok(BookFormOptions {
                genres,
                authors,
                publishers,
            }) => {
                self.genre.set_options(
                    genres
                        .into_iter()
                        .map(|g| SelectOption::new(g.id, g.name))
                        .collect(),
                );
                self.publisher.set_options(
                    publishers
                        .into_iter()
                        .map(|p| SelectOption::new(p.id, p.name))
                        .collect(),
                );
                self.authors.set_options(
                    authors
                        .into_iter()
                        .map(|a| SelectOption::new(a.id, a.name))
                        .collect(),
                );
            }
            Err(err) => {
                tracing::error!("loading book form options failed: {}", err);
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
        let book = match ctx.block_on(ctx.api.books.get(id)) {
            Ok(book) => book,
            Err(err) => {
                tracing::error!("loading book {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                return None;
            }
        };

        let mut screen = Self::empty();
        screen.load_options(ctx);
        screen.id = Some(id);
        screen.title.set_value(book.title);
        screen.isbn.set_value(book.isbn);
        screen.price.set_value(book.price.to_string());
        screen.quantity.set_value(book.quantity.to_string());
        screen.total_page.set_value(book.total_page.to_string());
        screen
            .publish_date
            .set_value(book.publish_date.map(|d| d.to_string()).unwrap_or_default());
        screen
            .description
            .set_value(book.description.unwrap_or_default());
        screen.image_url.set_value(book.image_url.unwrap_or_default());
        screen.genre.select_id(book.genre_id);
        screen.publisher.select_id(book.publisher_id);
        let author_ids: Vec<i64> = book.authors.iter().map(|a| a.author_id).collect();
        screen.authors.select_ids(&author_ids);
        Some(screen)
    }

    /// Parse the raw fields into a create payload, collecting per-field errors
    fn build_payload(&mut self) -> Option<CreateBook> {
        let mut errors = FieldErrors::new();

        let price = match parse_amount(self.price.value()) {
            Ok(price) if price > Decimal::ZERO => price,
            Ok(_) => {
                errors.insert("price".to_string(), "Price must be above zero".to_string());
                Decimal::ZERO
            }
            Err(message) => {
                errors.insert("price".to_string(), message);
                Decimal::ZERO
            }
        };
        let quantity = match parse_count(self.quantity.value()) {
            Ok(quantity) => quantity,
            Err(message) => {
                errors.insert("quantity".to_string(), message);
                0
            }
        };
        let total_page = match parse_count(self.total_page.value()) {
            Ok(pages) => pages,
            Err(message) => {
                errors.insert("total_page".to_string(), message);
                0
            }
        };
        let publish_date = match parse_optional_date(self.publish_date.value()) {
            Ok(date) => date,
            Err(message) => {
                errors.insert("publish_date".to_string(), message);
                None
            }
        };
        if !is_valid_isbn(self.isbn.value()) {
            errors.insert("isbn".to_string(), "Not a valid ISBN-10/13".to_string());
        }
        let genre_id = self.genre.selected_id().unwrap_or_else(|| {
            errors.insert("genre_id".to_string(), "Pick a genre".to_string());
            0
        });
        let publisher_id = self.publisher.selected_id().unwrap_or_else(|| {
            errors.insert("publisher_id".to_string(), "Pick a publisher".to_string());
            0
        });

        let payload = CreateBook {
            title: self.title.value().trim().to_string(),
            isbn: self.isbn.value().trim().to_string(),
            price,
            quantity,
            total_page,
            publish_date,
            description: optional_text(self.description.value()),
            image_url: optional_text(self.image_url.value()),
            genre_id,
            publisher_id,
            author_ids: self.authors.selected_ids(),
        };

        if let Err(validation) = payload.validate() {
            for (field, message) in collect_errors(&validation) {
                errors.entry(field).or_insert(message);
            }
        }

        if errors.is_empty() {
            Some(payload)
        } else {
            self.errors = errors;
            None
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> ScreenOutcome {
        self.errors.clear();
        let Some(payload) = self.build_payload() else {
            return ScreenOutcome::Handled;
        };

        self.is_submitting = true;
        let result = match self.id {
            None => ctx
                .block_on(ctx.api.books.create(&payload))
                .map(|_| "Book created"),
            Some(id) => {
                let update = UpdateBook {
                    title: Some(payload.title),
                    isbn: Some(payload.isbn),
                    price: Some(payload.price),
                    quantity: Some(payload.quantity),
                    total_page: Some(payload.total_page),
                    publish_date: payload.publish_date,
                    description: payload.description,
                    image_url: payload.image_url,
                    genre_id: Some(payload.genre_id),
                    publisher_id: Some(payload.publisher_id),
                    author_ids: Some(payload.author_ids),
                };
                ctx.block_on(ctx.api.books.update(id, &update))
                    .map(|_| "Book updated")
            }
        };
        self.is_submitting = false;

        match result {
            Ok(message) => {
                ctx.toasts.success(message);
                ScreenOutcome::Navigate(Route::Books)
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!("saving book failed: {}", err);
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
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Books),
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
            0 => self.title.handle_key(key),
            1 => self.isbn.handle_key(key),
            2 => self.price.handle_key(key),
            3 => self.quantity.handle_key(key),
            4 => self.total_page.handle_key(key),
            5 => self.publish_date.handle_key(key),
            6 => self.description.handle_key(key),
            7 => self.image_url.handle_key(key),
            FOCUS_GENRE => self.genre.handle_key(key),
            FOCUS_PUBLISHER => self.publisher.handle_key(key),
            _ => self.authors.handle_key(key),
        };
        ScreenOutcome::Handled
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.id.is_some() {
            " Edit book "
        } else {
            " Add book "
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        let text_fields = [
            (&self.title, "title"),
            (&self.isbn, "isbn"),
            (&self.price, "price"),
            (&self.quantity, "quantity"),
            (&self.total_page, "total_page"),
            (&self.publish_date, "publish_date"),
            (&self.description, "description"),
            (&self.image_url, "image_url"),
        ];
        for (i, (input, key)) in text_fields.iter().enumerate() {
            render_text_input(
                frame,
                rows[i],
                input,
                self.focus == i,
                self.errors.get(*key).map(String::as_str),
            );
        }
        render_select(
            frame,
            rows[8],
            &self.genre,
            self.focus == FOCUS_GENRE,
            self.errors.get("genre_id").map(String::as_str),
        );
        render_select(
            frame,
            rows[9],
            &self.publisher,
            self.focus == FOCUS_PUBLISHER,
            self.errors.get("publisher_id").map(String::as_str),
        );
        render_multi_select(
            frame,
            rows[10],
            &self.authors,
            self.focus == FOCUS_AUTHORS,
            self.errors.get("author_ids").map(String::as_str),
        );
        frame.render_widget(
            Paragraph::new(Line::from(form_help(self.is_submitting)))
                .style(Style::default().fg(Color::DarkGray)),
            rows[12],
        );
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

pub struct BookDetailScreen {
    book: Book,
}

impl BookDetailScreen {
    /// Fetch the detail payload; `None` sends the caller back to the list
    pub fn new(ctx: &mut Ctx, id: i64) -> Option<Self> {
        match ctx.block_on(ctx.api.books.get(id)) {
            Ok(book) => Some(Self { book }),
            Err(err) => {
                tracing::error!("loading book {} failed: {}", id, err);
                ctx.toasts.error(err.user_message());
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Ctx) -> ScreenOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => ScreenOutcome::Navigate(Route::Books),
            KeyCode::Char('e') => ScreenOutcome::Navigate(Route::BookEdit(self.book.id)),
            _ => ScreenOutcome::Unhandled,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let book = &self.book;
        let genre = book
            .genre
            .as_ref()
            .map(|g| g.name.clone())
            .unwrap_or_else(|| format!("#{}", book.genre_id));
        let publisher = book
            .publisher
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", book.publisher_id));
        let authors = if book.author_details.is_empty() {
            book.authors
                .iter()
                .map(|a| format!("#{}", a.author_id))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            book.author_details
                .iter()
                .map(|a| a.name.clone())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let lines = vec![
            Line::from(format!("Title      {}", book.title)),
            Line::from(format!("ISBN       {}", book.isbn)),
            Line::from(format!("Price      {}", book.price)),
            Line::from(format!("Quantity   {}", book.quantity)),
            Line::from(format!("Pages      {}", book.total_page)),
            Line::from(format!(
                "Published  {}",
                book.publish_date.map(|d| d.to_string()).unwrap_or_default()
            )),
            Line::from(format!("Genre      {}", genre)),
            Line::from(format!("Publisher  {}", publisher)),
            Line::from(format!("Authors    {}", authors)),
            Line::from(""),
            Line::from(book.description.clone().unwrap_or_default()),
            Line::from(""),
            Line::from(Span::styled(
                "e edit · esc back",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title(format!(" {} ", book.title))),
            area,
        );
    }
}
