use std::time::Duration;

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Frame, Terminal, widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap}, layout::{Layout, Constraint, Direction, Rect}, style::{Style, Modifier, Color}};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use todo_pad::{
    client::TodoClient,
    config::ClientConfig,
    domain::page::DEFAULT_LIMIT,
    telemetry,
    ui::{editor_view::PLACEHOLDER, App, EditorState, Field, Request, Response},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    telemetry::init_file_if_requested(&config.log_file)?;
    let client = TodoClient::new(&config.api_url)?;
    let mut app = App::new(client, DEFAULT_LIMIT);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { Browse, Search, Edit(Field) }

/// Runs requests off the UI loop; responses come back through the channel.
struct Dispatcher {
    client: TodoClient,
    tx: UnboundedSender<Response>,
}

impl Dispatcher {
    fn send(&self, request: Option<Request>) {
        let Some(request) = request else { return };
        let (client, tx) = (self.client.clone(), self.tx.clone());
        tokio::spawn(async move {
            let response = request.execute(&client).await;
            let _ = tx.send(response);
        });
    }
}

fn drain(app: &mut App<TodoClient>, rx: &mut UnboundedReceiver<Response>, dispatcher: &Dispatcher) {
    while let Ok(response) = rx.try_recv() {
        // failures are kept in `last_error` for the footer
        let _ = app.apply(response);
        dispatcher.send(app.next_queued());
    }
}

async fn run(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App<TodoClient>) -> Result<()> {
    let poll = Duration::from_millis(50);
    let mut mode = Mode::Browse;
    let mut list_state = ListState::default();
    let (tx, mut rx) = unbounded_channel();
    let dispatcher = Dispatcher { client: app.api().clone(), tx };
    dispatcher.send(app.request_refresh());

    loop {
        drain(app, &mut rx, &dispatcher);
        terminal.draw(|f| draw(f, app, mode, &mut list_state))?;

        if !event::poll(poll)? { continue; }
        let Event::Key(key) = event::read()? else { continue };
        // Only act on key presses; ignore repeats and releases to prevent duplicate input
        if key.kind != KeyEventKind::Press { continue; }

        match mode {
            Mode::Browse => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Up => move_selection(app, -1),
                KeyCode::Down => move_selection(app, 1),
                KeyCode::Left | KeyCode::PageUp => dispatcher.send(app.request_previous_page()),
                KeyCode::Right | KeyCode::PageDown => dispatcher.send(app.request_next_page()),
                KeyCode::Char('r') => dispatcher.send(app.request_refresh()),
                KeyCode::Char('n') => dispatcher.send(Some(app.request_create())),
                KeyCode::Char('d') => dispatcher.send(app.request_delete()),
                KeyCode::Char('/') => mode = Mode::Search,
                KeyCode::Enter | KeyCode::Char('e') if app.editor.state() != EditorState::Empty => mode = Mode::Edit(Field::Title),
                KeyCode::Tab if app.editor.state() != EditorState::Empty => mode = Mode::Edit(Field::Description),
                _ => {}
            },
            Mode::Search => match key.code {
                KeyCode::Esc | KeyCode::Enter => mode = Mode::Browse,
                KeyCode::Backspace => { let mut q = app.list.search().to_string(); q.pop(); app.list.set_search(q); }
                KeyCode::Char(c) => { let q = format!("{}{c}", app.list.search()); app.list.set_search(q); }
                _ => {}
            },
            Mode::Edit(field) => match key.code {
                // leaving a field is a blur: save if changed
                KeyCode::Esc | KeyCode::Enter => { dispatcher.send(app.request_save(field)); mode = Mode::Browse; }
                KeyCode::Tab => { dispatcher.send(app.request_save(field)); mode = Mode::Edit(field.toggle()); }
                KeyCode::Backspace => { if let Some(buf) = app.editor.buffer_mut(field) { buf.pop(); } }
                KeyCode::Char(c) => { if let Some(buf) = app.editor.buffer_mut(field) { buf.push(c); } }
                _ => {}
            },
        }
    }
    Ok(())
}

fn move_selection(app: &mut App<TodoClient>, delta: isize) {
    let ids: Vec<_> = app.list.filtered().iter().map(|t| t.id).collect();
    if ids.is_empty() { return; }
    let current = app.list.selected_id().and_then(|id| ids.iter().position(|x| *x == id));
    let next = match current {
        Some(i) => i.saturating_add_signed(delta).min(ids.len() - 1),
        None => 0,
    };
    app.select(ids[next]);
}

fn draw(f: &mut Frame, app: &App<TodoClient>, mode: Mode, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let help = match mode {
        Mode::Browse => "↑/↓ select, ←/→ page, n: new, Enter: edit title, Tab: edit description, d: delete, /: search, r: reload, q: quit",
        Mode::Search => "Type to filter this page, Enter/Esc to finish",
        Mode::Edit(_) => "Type to edit, Tab: other field, Enter/Esc: done (saves on leave)",
    };
    let header = Paragraph::new(help).block(Block::default().borders(Borders::ALL).title("TODO"));
    f.render_widget(header, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    draw_list(f, app, middle[0], list_state);
    draw_editor(f, app, mode, middle[1]);

    let footer_text = match (mode, app.last_error()) {
        (_, Some(err)) => format!("error: {err}"),
        (Mode::Search, None) => format!("Search: {}_", app.list.search()),
        (_, None) if app.list.search().is_empty() => app.api().base_url().to_string(),
        (_, None) => format!("Search: {}", app.list.search()),
    };
    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL).title("info"));
    f.render_widget(footer, chunks[2]);
}

fn draw_list(f: &mut Frame, app: &App<TodoClient>, area: Rect, list_state: &mut ListState) {
    let title = format!("Page {} of {}", app.list.current_page(), app.list.total_pages());
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.list.is_loading() {
        f.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    }
    if let Some(msg) = app.list.empty_message() {
        f.render_widget(Paragraph::new(msg).block(block), area);
        return;
    }

    let filtered = app.list.filtered();
    let items: Vec<ListItem> = filtered
        .iter()
        .map(|t| ListItem::new(format!("{}  ({})\n  {}", t.title, t.created_at.format("%Y-%m-%d"), t.description)))
        .collect();
    list_state.select(app.list.selected_id().and_then(|id| filtered.iter().position(|t| t.id == id)));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, list_state);
}

fn draw_editor(f: &mut Frame, app: &App<TodoClient>, mode: Mode, area: Rect) {
    let (Some(title), Some(description)) = (app.editor.text(Field::Title), app.editor.text(Field::Description)) else {
        let placeholder = Paragraph::new(PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("editor"));
        f.render_widget(placeholder, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    let focused = |field: Field| if mode == Mode::Edit(field) { Style::default().fg(Color::Yellow) } else { Style::default() };
    let cursor = |field: Field| if mode == Mode::Edit(field) { "_" } else { "" };

    let editor_title = if app.editor.is_saving() { "title (Saving...)" } else { "title" };
    let title_widget = Paragraph::new(format!("{title}{}", cursor(Field::Title)))
        .block(Block::default().borders(Borders::ALL).border_style(focused(Field::Title)).title(editor_title));
    f.render_widget(title_widget, rows[0]);

    let description_widget = Paragraph::new(format!("{description}{}", cursor(Field::Description)))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(focused(Field::Description)).title("description"));
    f.render_widget(description_widget, rows[1]);
}
