// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod binder;

pub use binder::{ColumnBinding, ListBinder, ListRow, UNTITLED_LABEL};

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use notepad_app::{
    AlternativeAction, AppCommand, AppEvent, AppState, CaseSensitivity, Column, Filter, Intent,
    LIST_PROJECTION, Locator, LocatorError, MenuEntry, NavigationRequest, NoteId, RowActivation,
    ScreenMode, Snapshot, SortOrder, activate_row, filter_for_search, menu_entries,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);
const PAGE_ROWS: isize = 10;

type ScreenTerminal = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub request_id: u64,
    pub locator: Locator,
    pub projection: Vec<Column>,
    pub filter: Option<Filter>,
    pub sort: SortOrder,
}

#[derive(Debug)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    QueryFinished {
        request_id: u64,
        result: Result<Snapshot, String>,
    },
    DeleteFinished {
        request_id: u64,
        locator: Locator,
        result: Result<usize, String>,
    },
}

// The `spawn_*` methods may complete on another thread; the defaults run
// inline and post the result on `tx` before returning.
pub trait ListRuntime {
    fn query(&mut self, request: &QueryRequest) -> Result<Snapshot>;
    fn delete(&mut self, locator: &Locator) -> Result<usize>;
    fn navigate(&mut self, request: &NavigationRequest) -> Result<()>;
    fn alternative_actions(&mut self) -> Result<Vec<AlternativeAction>> {
        Ok(Vec::new())
    }
    fn run_alternative(&mut self, action: &AlternativeAction, locator: &Locator) -> Result<()>;
    fn spawn_query(&mut self, request: QueryRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let request_id = request.request_id;
        let result = self
            .query(&request)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::QueryFinished { request_id, result })
            .map_err(|_| anyhow!("list event channel closed"))?;
        Ok(())
    }
    fn spawn_delete(
        &mut self,
        request_id: u64,
        locator: Locator,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .delete(&locator)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::DeleteFinished {
            request_id,
            locator,
            result,
        })
        .map_err(|_| anyhow!("list event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOptions {
    pub intent: Intent,
    pub case: CaseSensitivity,
    pub sort: SortOrder,
    pub query_timeout: Duration,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            intent: Intent::default(),
            case: CaseSensitivity::default(),
            sort: SortOrder::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenExit {
    Quit,
    Picked(Locator),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("delete failed: {0}")]
    Delete(String),
    #[error("query timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
    #[error("{action} failed: {message}")]
    Navigation { action: String, message: String },
    #[error("list binding failed: {0}")]
    Binding(String),
}

impl ListError {
    fn hint(&self) -> &'static str {
        match self {
            Self::Query(_) | Self::Binding(_) | Self::TimedOut(_) => {
                "showing previous results; ctrl+r to retry"
            }
            Self::Delete(_) => "list refreshed; try again",
            Self::Navigation { .. } => "check [editor] command in the config",
        }
    }

    fn is_banner(&self) -> bool {
        matches!(self, Self::Query(_) | Self::TimedOut(_) | Self::Binding(_))
    }

    fn status_message(&self) -> String {
        format!("{self}; {}", self.hint())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Handoff {
    Navigate(NavigationRequest),
    Alternative(AlternativeAction),
}

impl Handoff {
    fn label(&self) -> String {
        match self {
            Self::Navigate(request) => request.action.label().to_owned(),
            Self::Alternative(action) => action.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Exit(ScreenExit),
    Handoff(Handoff),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingQuery {
    request_id: u64,
    issued_at: Instant,
    timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct MenuUiState {
    entries: Vec<MenuEntry>,
    cursor: usize,
}

#[derive(Debug)]
struct ViewData {
    options: ScreenOptions,
    base: Locator,
    binder: ListBinder,
    cursor: usize,
    menu: MenuUiState,
    pending_query: Option<PendingQuery>,
    last_request_id: u64,
    banner: Option<ListError>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(options: ScreenOptions) -> Result<Self, LocatorError> {
        let base = options.intent.base_locator()?;
        Ok(Self {
            options,
            base,
            binder: ListBinder::default(),
            cursor: 0,
            menu: MenuUiState::default(),
            pending_query: None,
            last_request_id: 0,
            banner: None,
            help_visible: false,
            status_token: 0,
        })
    }

    fn next_request_id(&mut self) -> u64 {
        self.last_request_id = self.last_request_id.wrapping_add(1);
        self.last_request_id
    }

    fn selected_id(&self) -> Option<NoteId> {
        self.binder.row_id(self.cursor)
    }
}

pub fn run_app<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: ScreenOptions,
) -> Result<ScreenExit> {
    let mut view_data = ViewData::new(options).context("resolve list locator")?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (internal_tx, internal_rx) = mpsc::channel();
    issue_query(state, runtime, &mut view_data, &internal_tx);

    let result = loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);
        check_query_timeout(state, &mut view_data, &internal_tx, Instant::now());

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            break Err(error).context("draw frame");
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => break Err(error),
        };
        if !has_event {
            continue;
        }

        let key = match event::read().context("read event") {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(error) => break Err(error),
        };

        match handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
            KeyOutcome::Continue => {}
            KeyOutcome::Exit(exit) => break Ok(exit),
            KeyOutcome::Handoff(handoff) => {
                if let Err(error) = suspend_terminal(&mut terminal) {
                    break Err(error);
                }
                complete_handoff(state, runtime, &mut view_data, &internal_tx, handoff);
                if let Err(error) = resume_terminal(&mut terminal) {
                    break Err(error);
                }
            }
        }
    };

    view_data.binder.release();
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn suspend_terminal(terminal: &mut ScreenTerminal) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn resume_terminal(terminal: &mut ScreenTerminal) -> Result<()> {
    execute!(terminal.backend_mut(), EnterAlternateScreen).context("enter alternate screen")?;
    enable_raw_mode().context("enable raw mode")?;
    terminal.clear().context("clear terminal")?;
    Ok(())
}

fn process_internal_events<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::QueryFinished { request_id, result } => {
                handle_query_finished(state, view_data, tx, request_id, result);
            }
            InternalEvent::DeleteFinished {
                request_id,
                locator,
                result,
            } => {
                match result {
                    Ok(0) => {
                        let message = format!("note already gone: {locator}");
                        emit_status(state, view_data, tx, message);
                    }
                    Ok(count) => {
                        info!(request_id, %locator, count, "note deleted");
                        emit_status(state, view_data, tx, "note deleted");
                    }
                    Err(error) => report_error(state, view_data, tx, ListError::Delete(error)),
                }
                issue_query(state, runtime, view_data, tx);
            }
        }
    }
}

fn handle_query_finished(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request_id: u64,
    result: Result<Snapshot, String>,
) {
    let Some(pending) = view_data
        .pending_query
        .filter(|pending| pending.request_id == request_id)
    else {
        debug!(request_id, "discarding superseded query result");
        return;
    };
    view_data.pending_query = None;

    match result {
        Ok(snapshot) => {
            let rows = snapshot.len();
            match view_data.binder.change_snapshot(snapshot) {
                Ok(()) => {
                    debug!(
                        request_id,
                        rows,
                        elapsed_ms = pending.issued_at.elapsed().as_millis() as u64,
                        "list query bound"
                    );
                    view_data.banner = None;
                    clamp_cursor(view_data);
                }
                Err(error) => {
                    report_error(state, view_data, tx, ListError::Binding(format!("{error:#}")));
                }
            }
        }
        Err(error) => report_error(state, view_data, tx, ListError::Query(error)),
    }
}

fn check_query_timeout(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    now: Instant,
) {
    let timeout = view_data.options.query_timeout;
    let Some(pending) = view_data.pending_query.as_mut() else {
        return;
    };
    if pending.timed_out || now.saturating_duration_since(pending.issued_at) < timeout {
        return;
    }
    pending.timed_out = true;
    warn!(request_id = pending.request_id, ?timeout, "list query timed out");
    report_error(state, view_data, tx, ListError::TimedOut(timeout));
}

fn issue_query<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let request_id = view_data.next_request_id();
    let request = QueryRequest {
        request_id,
        locator: view_data.base,
        projection: LIST_PROJECTION.to_vec(),
        filter: filter_for_search(&state.search_text, view_data.options.case),
        sort: view_data.options.sort,
    };
    debug!(request_id, search = %state.search_text, "issuing list query");
    view_data.pending_query = Some(PendingQuery {
        request_id,
        issued_at: Instant::now(),
        timed_out: false,
    });
    if let Err(error) = runtime.spawn_query(request, tx.clone()) {
        view_data.pending_query = None;
        report_error(state, view_data, tx, ListError::Query(format!("{error:#}")));
    }
}

fn start_delete<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    id: NoteId,
) {
    let request_id = view_data.next_request_id();
    let locator = view_data.base.with_appended_id(id);
    info!(request_id, %locator, "deleting note");
    if let Err(error) = runtime.spawn_delete(request_id, locator, tx.clone()) {
        report_error(state, view_data, tx, ListError::Delete(format!("{error:#}")));
    }
}

fn complete_handoff<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    handoff: Handoff,
) {
    let result = match &handoff {
        Handoff::Navigate(request) => runtime.navigate(request),
        Handoff::Alternative(action) => runtime.run_alternative(action, &view_data.base),
    };
    if let Err(error) = result {
        warn!(action = %handoff.label(), error = %format!("{error:#}"), "handoff failed");
        report_error(
            state,
            view_data,
            tx,
            ListError::Navigation {
                action: handoff.label(),
                message: format!("{error:#}"),
            },
        );
    }
    // The note may have changed while we were away.
    issue_query(state, runtime, view_data, tx);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn report_error(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    error: ListError,
) {
    warn!(%error, "list screen error");
    let message = error.status_message();
    if error.is_banner() {
        view_data.banner = Some(error);
    }
    emit_status(state, view_data, internal_tx, message);
}

fn apply_app_events<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    events: Vec<AppEvent>,
) {
    for event in events {
        match event {
            AppEvent::SearchChanged(_) => issue_query(state, runtime, view_data, tx),
            AppEvent::DeleteConfirmed(id) => start_delete(state, runtime, view_data, tx, id),
            AppEvent::DeleteCanceled(_) => emit_status(state, view_data, tx, "delete canceled"),
            AppEvent::ModeChanged(_) | AppEvent::StatusUpdated(_) | AppEvent::StatusCleared => {}
        }
    }
}

fn handle_key_event<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('q') {
        return KeyOutcome::Exit(ScreenExit::Quit);
    }
    if ctrl && key.code == KeyCode::Char('r') {
        issue_query(state, runtime, view_data, internal_tx);
        return KeyOutcome::Continue;
    }
    if ctrl && key.code == KeyCode::Char('u') {
        let events = state.dispatch(AppCommand::ClearSearch);
        apply_app_events(state, runtime, view_data, internal_tx, events);
        return KeyOutcome::Continue;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return KeyOutcome::Continue;
    }

    match state.mode {
        ScreenMode::Search => {
            handle_search_key(state, runtime, view_data, internal_tx, key);
            KeyOutcome::Continue
        }
        ScreenMode::ConfirmDelete(_) => {
            let command = match key.code {
                KeyCode::Char('y') | KeyCode::Enter => AppCommand::ConfirmDelete,
                KeyCode::Char('n') | KeyCode::Esc => AppCommand::CancelDelete,
                _ => return KeyOutcome::Continue,
            };
            let events = state.dispatch(command);
            apply_app_events(state, runtime, view_data, internal_tx, events);
            KeyOutcome::Continue
        }
        ScreenMode::Menu => handle_menu_key(state, view_data, key),
        ScreenMode::Browse => handle_browse_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_search_key<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc => AppCommand::LeaveSearch,
        KeyCode::Enter => AppCommand::SubmitSearch,
        KeyCode::Backspace => AppCommand::SearchBackspace,
        KeyCode::Up => {
            move_cursor(view_data, -1);
            return;
        }
        KeyCode::Down => {
            move_cursor(view_data, 1);
            return;
        }
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            AppCommand::SearchInput(ch)
        }
        _ => return,
    };
    let events = state.dispatch(command);
    apply_app_events(state, runtime, view_data, internal_tx, events);
}

fn handle_menu_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let last = view_data.menu.entries.len().saturating_sub(1);
            view_data.menu.cursor = (view_data.menu.cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.menu.cursor = view_data.menu.cursor.saturating_sub(1);
        }
        KeyCode::Esc | KeyCode::Char('m') => {
            state.dispatch(AppCommand::CloseMenu);
        }
        KeyCode::Enter => {
            let entry = view_data.menu.entries.get(view_data.menu.cursor).cloned();
            state.dispatch(AppCommand::CloseMenu);
            return match entry {
                Some(MenuEntry::AddNote) => KeyOutcome::Handoff(Handoff::Navigate(
                    NavigationRequest::insert(view_data.base),
                )),
                Some(MenuEntry::Alternative(action)) => {
                    KeyOutcome::Handoff(Handoff::Alternative(action))
                }
                None => KeyOutcome::Continue,
            };
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_browse_key<R: ListRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Exit(ScreenExit::Quit),
        KeyCode::Char('j') | KeyCode::Down => move_cursor(view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(view_data, -1),
        KeyCode::PageDown => move_cursor(view_data, PAGE_ROWS),
        KeyCode::PageUp => move_cursor(view_data, -PAGE_ROWS),
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.cursor = view_data.binder.len().saturating_sub(1);
        }
        KeyCode::Char('/') => {
            state.dispatch(AppCommand::FocusSearch);
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char('a') => {
            return KeyOutcome::Handoff(Handoff::Navigate(NavigationRequest::insert(
                view_data.base,
            )));
        }
        KeyCode::Char('m') => open_menu(state, runtime, view_data),
        KeyCode::Esc => {
            let events = state.dispatch(AppCommand::ClearSearch);
            apply_app_events(state, runtime, view_data, internal_tx, events);
        }
        KeyCode::Enter => {
            let Some(id) = view_data.selected_id() else {
                emit_status(state, view_data, internal_tx, "no note selected");
                return KeyOutcome::Continue;
            };
            return match activate_row(&view_data.options.intent, &view_data.base, id) {
                RowActivation::ReturnSelection(locator) => {
                    info!(%locator, "note picked");
                    KeyOutcome::Exit(ScreenExit::Picked(locator))
                }
                RowActivation::Navigate(request) => {
                    KeyOutcome::Handoff(Handoff::Navigate(request))
                }
            };
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let Some(id) = view_data.selected_id() else {
                emit_status(state, view_data, internal_tx, "no note selected");
                return KeyOutcome::Continue;
            };
            state.dispatch(AppCommand::RequestDelete(id));
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn open_menu<R: ListRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    let alternatives = runtime.alternative_actions().unwrap_or_else(|error| {
        warn!(error = %format!("{error:#}"), "loading alternative actions failed");
        Vec::new()
    });
    view_data.menu = MenuUiState {
        entries: menu_entries(&view_data.base, &alternatives),
        cursor: 0,
    };
    state.dispatch(AppCommand::OpenMenu);
}

fn move_cursor(view_data: &mut ViewData, delta: isize) {
    let len = view_data.binder.len();
    if len == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = view_data.cursor.saturating_add_signed(delta);
    view_data.cursor = next.min(len - 1);
}

fn clamp_cursor(view_data: &mut ViewData) {
    view_data.cursor = view_data
        .cursor
        .min(view_data.binder.len().saturating_sub(1));
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let search_style = if state.mode == ScreenMode::Search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let search = Paragraph::new(search_bar_text(state))
        .style(search_style)
        .block(
            Block::default()
                .title(screen_title(view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(search, layout[0]);

    render_list(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[2]);

    if let ScreenMode::ConfirmDelete(id) = state.mode {
        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(confirm_overlay_text(view_data, id)).block(
            Block::default()
                .title("delete")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(confirm, area);
    }

    if state.mode == ScreenMode::Menu {
        let area = centered_rect(44, 40, frame.area());
        frame.render_widget(Clear, area);
        let menu = Paragraph::new(menu_overlay_text(&view_data.menu))
            .block(Block::default().title("menu").borders(Borders::ALL));
        frame.render_widget(menu, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_list(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let (title, border_style) = match &view_data.banner {
        Some(banner) => (
            format!("{} | {banner}", list_title(view_data)),
            Style::default().fg(Color::Red),
        ),
        None => (list_title(view_data), Style::default()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let rows = view_data.binder.items();
    if rows.is_empty() {
        let empty = Paragraph::new(empty_list_text(state))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = rows
        .into_iter()
        .map(|row| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    row.primary,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    row.secondary,
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Cyan))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(view_data.cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn screen_title(view_data: &ViewData) -> String {
    format!(
        "notepad | {} | {}",
        view_data.options.intent.action.label(),
        view_data.base
    )
}

fn list_title(view_data: &ViewData) -> String {
    let count = view_data.binder.len();
    let noun = if count == 1 { "note" } else { "notes" };
    match view_data.pending_query {
        Some(pending) if !pending.timed_out => format!("{count} {noun} | loading"),
        _ => format!("{count} {noun}"),
    }
}

fn search_bar_text(state: &AppState) -> String {
    match (state.mode, state.search_text.is_empty()) {
        (ScreenMode::Search, _) => format!("/{}_", state.search_text),
        (_, true) => "press / to search titles".to_owned(),
        (_, false) => format!("/{}", state.search_text),
    }
}

fn empty_list_text(state: &AppState) -> String {
    if state.search_text.is_empty() {
        "no notes yet; press a to add one".to_owned()
    } else {
        format!("no titles contain {:?}", state.search_text)
    }
}

fn confirm_overlay_text(view_data: &ViewData, id: NoteId) -> String {
    let title = view_data
        .binder
        .items()
        .into_iter()
        .find(|row| row.id == id)
        .map_or_else(|| format!("note {id}"), |row| row.primary);
    format!("delete {title:?}?\n\ny/enter delete | n/esc keep")
}

fn menu_overlay_text(menu: &MenuUiState) -> String {
    menu.entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if index == menu.cursor { ">" } else { " " };
            format!("{marker} {}", entry.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let (mode, hints) = match state.mode {
        ScreenMode::Browse => {
            let enter = if view_data.options.intent.action.returns_selection() {
                "pick"
            } else {
                "edit"
            };
            (
                "LIST",
                format!("j/k move | enter {enter} | / search | d delete | m menu | a add | ? help"),
            )
        }
        ScreenMode::Search => (
            "SEARCH",
            "type to filter | enter/esc done | ctrl+u clear".to_owned(),
        ),
        ScreenMode::ConfirmDelete(_) => ("CONFIRM", "y delete | n keep".to_owned()),
        ScreenMode::Menu => ("MENU", "j/k move | enter choose | esc close".to_owned()),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ctrl+r requery | ctrl+u clear search\n\
list: j/k up/down pgup/pgdn g/G | enter open or pick | d/del delete | q quit\n\
list: / search | esc clear search | m menu | a add | ? help\n\
search: type to filter titles | backspace | enter or esc back to list\n\
delete: y/enter confirm | n/esc cancel\n\
menu: j/k | enter choose | esc/m close"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
