//! Application state and event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use log::{debug, info, warn};
use rowdeck_lib::error::ValidationError;
use rowdeck_lib::form::{Field, FormMode, FormSession};
use rowdeck_lib::model::Row;
use rowdeck_lib::seed::{Seeder, SystemClock};
use rowdeck_lib::source::{DataSource, HttpDataSource};
use rowdeck_lib::store::{RowStore, StoreCommand};
use rowdeck_lib::submit::{PendingCommit, SubmitDelay};
use rowdeck_lib::window::WindowController;

use crate::terminal::TerminalGuard;
use crate::view;

/// Spinner animation and submit poll cadence.
const TICK: Duration = Duration::from_millis(100);

/// Timeout for the one-shot seed fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The modal currently covering the table, if any.
pub enum Modal {
    /// Add or edit form.
    Form {
        session: FormSession,
        active: Field,
        errors: Option<ValidationError>,
    },
    /// Delete confirmation.
    ConfirmDelete { id: String, name: String },
}

/// Top-level application state.
pub struct App {
    pub(crate) store: RowStore,
    pub(crate) window: WindowController,
    pub(crate) modal: Option<Modal>,
    pub(crate) pending: Option<PendingCommit>,
    pub(crate) selected: usize,
    pub(crate) spinner_tick: usize,
    pub(crate) status_line: Option<String>,
    seeder: Seeder,
    clock: SystemClock,
    submit_delay: SubmitDelay,
    should_quit: bool,
}

impl App {
    /// Fresh application state.
    pub fn new() -> Self {
        Self {
            store: RowStore::new(),
            window: WindowController::new(),
            modal: None,
            pending: None,
            selected: 0,
            spinner_tick: 0,
            status_line: None,
            seeder: Seeder::new(),
            clock: SystemClock,
            submit_delay: SubmitDelay::default(),
            should_quit: false,
        }
    }

    /// Runs the seed load and then the interactive loop until quit.
    pub async fn run(mut self) -> io::Result<()> {
        let mut guard = TerminalGuard::new()?;

        self.load_seed(&mut guard).await?;
        self.window.reset();

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK);
        while !self.should_quit {
            view::draw(guard.stdout(), &self)?;
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => self.on_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(error)) => warn!("event stream error: {error}"),
                    None => break,
                },
                _ = ticker.tick() => {
                    self.spinner_tick = self.spinner_tick.wrapping_add(1);
                    self.poll_submit();
                }
            }
        }
        Ok(())
    }

    /// Drives the single-shot load, animating the spinner while the fetch
    /// is in flight.
    async fn load_seed(&mut self, guard: &mut TerminalGuard) -> io::Result<()> {
        let source = HttpDataSource::demo().with_timeout(FETCH_TIMEOUT);
        if let Err(error) = self.store.begin_load() {
            warn!("seed load skipped: {error}");
            return Ok(());
        }

        let fetch = source.fetch();
        tokio::pin!(fetch);
        let mut ticker = tokio::time::interval(TICK);
        let outcome = loop {
            view::draw_loading(guard.stdout(), self.spinner_tick)?;
            tokio::select! {
                outcome = &mut fetch => break outcome,
                _ = ticker.tick() => self.spinner_tick = self.spinner_tick.wrapping_add(1),
            }
        };

        match self.store.complete_load(outcome, &mut self.seeder) {
            Ok(count) => info!("seeded {count} rows from {}", source.url()),
            Err(error) => {
                warn!("seed load failed: {error}");
                self.status_line = Some("Seed load failed; starting with an empty table".into());
            }
        }
        Ok(())
    }

    /// The row under the cursor, if any.
    pub(crate) fn selected_row(&self) -> Option<&Row> {
        self.window.visible_slice(self.store.rows()).get(self.selected)
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // A submission in flight disables the modal, except for cancelling
        // the whole thing: a dismissed dialog must never commit later.
        if self.pending.is_some() {
            if key.code == KeyCode::Esc {
                self.pending = None;
                self.modal = None;
                info!("submission cancelled before commit");
            }
            return;
        }

        self.status_line = None;
        match &self.modal {
            None => self.on_table_key(key),
            Some(Modal::Form { .. }) => self.on_form_key(key),
            Some(Modal::ConfirmDelete { .. }) => self.on_confirm_key(key),
        }
    }

    fn on_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('a') => {
                self.modal = Some(Modal::Form {
                    session: FormSession::add(&self.clock),
                    active: Field::Language,
                    errors: None,
                });
            }
            KeyCode::Char('e') => {
                if let Some(row) = self.selected_row().cloned() {
                    self.modal = Some(Modal::Form {
                        session: FormSession::edit(&row),
                        active: Field::Name,
                        errors: None,
                    });
                }
            }
            KeyCode::Char('d') => {
                if let Some(row) = self.selected_row().cloned() {
                    self.modal = Some(Modal::ConfirmDelete {
                        id: row.id,
                        name: row.name,
                    });
                }
            }
            _ => {}
        }
    }

    /// Moves the selection down; running past the last revealed row while
    /// more remain hidden is the sentinel-visibility event.
    fn select_next(&mut self) {
        let total = self.store.len();
        let visible = self.window.visible_slice(self.store.rows()).len();
        if self.selected + 1 < visible {
            self.selected += 1;
        } else if self.window.has_more(total) {
            self.window.on_sentinel_visible(total);
            self.selected += 1;
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.modal = None,
            KeyCode::Enter => self.submit_form(),
            _ => {
                let Some(Modal::Form { session, active, .. }) = self.modal.as_mut() else {
                    return;
                };
                match key.code {
                    KeyCode::Tab | KeyCode::Down => *active = next_editable(session, *active, 1),
                    KeyCode::BackTab | KeyCode::Up => *active = next_editable(session, *active, -1),
                    KeyCode::Backspace => {
                        let mut value = session.value(*active).to_string();
                        value.pop();
                        session.set(*active, value);
                    }
                    KeyCode::Char(c) => {
                        let mut value = session.value(*active).to_string();
                        value.push(c);
                        session.set(*active, value);
                    }
                    _ => {}
                }
            }
        }
    }

    fn submit_form(&mut self) {
        let Some(Modal::Form { session, errors, .. }) = self.modal.as_mut() else {
            return;
        };
        match session.validate() {
            Ok(payload) => {
                let command = match session.mode() {
                    FormMode::Add => StoreCommand::Add(payload),
                    FormMode::Edit => StoreCommand::Update(payload),
                };
                self.pending = Some(self.submit_delay.start(command));
            }
            Err(validation) => {
                debug!("form validation failed: {validation}");
                *errors = Some(validation);
            }
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => self.modal = None,
            KeyCode::Enter | KeyCode::Char('y') => {
                if let Some(Modal::ConfirmDelete { id, .. }) = &self.modal {
                    self.pending = Some(self.submit_delay.start(StoreCommand::Remove(id.clone())));
                }
            }
            _ => {}
        }
    }

    /// Applies a pending commit once its delay has elapsed.
    fn poll_submit(&mut self) {
        if !self.pending.as_ref().is_some_and(PendingCommit::is_ready) {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };
        match self.store.apply(pending.into_command()) {
            Ok(true) => debug!("commit applied, {} rows", self.store.len()),
            Ok(false) => self.status_line = Some("Row no longer exists".into()),
            Err(error) => {
                warn!("commit rejected: {error}");
                self.status_line = Some(error.to_string());
            }
        }
        self.modal = None;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let visible = self.window.visible_slice(self.store.rows()).len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Steps through the session's editable fields, wrapping at both ends.
fn next_editable(session: &FormSession, current: Field, direction: isize) -> Field {
    let editable: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| session.is_editable(*field))
        .collect();
    if editable.is_empty() {
        return current;
    }
    let position = editable.iter().position(|field| *field == current).unwrap_or(0);
    let len = editable.len() as isize;
    let next = (position as isize + direction).rem_euclid(len);
    editable[next as usize]
}
