//! Application state and core logic

use crate::config::DeskConfig;
use crate::platform::COPY_MODIFIER;
use crate::registry::{
    find_member, DispatchMode, InMemoryRegistry, LookupOutcome, RegistryClient,
    RegistryClientTrait, SubmissionDispatcher, GENERIC_FAILURE,
};
use crate::state::{
    ActiveWizard, AppState, Catalog, EncodeResult, EncodeTicket, FileEncoder, FormKind,
    Notification, SubmitOutcome, View, Wizard, WizardError,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Registry handle shared with background submissions
pub type SharedRegistry = Arc<Mutex<Box<dyn RegistryClientTrait>>>;

/// Results of background work, delivered back to the event loop
#[derive(Debug)]
pub enum AppEvent {
    Encoded {
        session: u64,
        ticket: EncodeTicket,
        result: std::result::Result<String, WizardError>,
    },
    Submitted {
        session: u64,
        outcome: SubmitOutcome,
    },
    LookedUp {
        ticket: u64,
        outcome: LookupOutcome,
    },
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Registry backend
    registry: SharedRegistry,
    catalog: Catalog,
    encoder: FileEncoder,
    submit_timeout: Option<Duration>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// In-flight member lookup, aborted when the gate is left
    lookup_task: Option<JoinHandle<()>>,
    next_session: u64,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub async fn new(config: DeskConfig) -> Result<Self> {
        let registry: Box<dyn RegistryClientTrait> = if config.is_offline() {
            tracing::info!("Using in-process registry");
            Box::new(InMemoryRegistry::new())
        } else {
            Box::new(RegistryClient::new(config.address()).await?)
        };
        Self::with_registry(config, registry)
    }

    /// Build an app around an existing backend
    pub fn with_registry(config: DeskConfig, registry: Box<dyn RegistryClientTrait>) -> Result<Self> {
        let catalog = Catalog::new(config.max_upload_bytes())?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            state: AppState::default(),
            registry: Arc::new(Mutex::new(registry)),
            catalog,
            encoder: FileEncoder::new(config.max_upload_bytes()),
            submit_timeout: config.submit_timeout(),
            events_tx,
            events_rx,
            lookup_task: None,
            next_session: 0,
            quit: false,
        })
    }

    /// Refresh the connection indicator
    pub async fn check_connection(&mut self) {
        self.state.registry_connected = self.registry.lock().await.check_connection().await;
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Per-tick housekeeping
    pub fn tick(&mut self) {
        self.state.expire_notification();
        self.pump_events();
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.state.notify(Notification::error(message));
    }

    /// Sessions and lookup tickets share one counter
    fn issue_session(&mut self) -> u64 {
        self.next_session += 1;
        self.next_session
    }

    fn open_wizard(&mut self, wizard: Wizard, dispatcher: SubmissionDispatcher) {
        let session = self.issue_session();
        let dispatcher = dispatcher.with_timeout(self.submit_timeout);
        self.state.active = Some(ActiveWizard::new(session, wizard, dispatcher));
        self.state.current_view = View::Wizard;
    }

    fn start_form(&mut self, kind: FormKind) {
        match kind {
            FormKind::MembershipRenewal => {
                self.state.renewal_gate = Default::default();
                self.state.current_view = View::RenewalLookup;
            }
            _ => {
                let definition = self.catalog.get(kind);
                let dispatcher = SubmissionDispatcher::new(definition.kind, DispatchMode::Create);
                self.open_wizard(Wizard::new(definition), dispatcher);
            }
        }
    }

    fn back_to_menu(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
        self.state.renewal_gate = Default::default();
        self.state.active = None;
        self.state.current_view = View::Menu;
    }

    /// Handle key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state.current_view {
            View::Menu => self.handle_menu_key(key),
            View::RenewalLookup => self.handle_lookup_key(key),
            View::Wizard => self.handle_wizard_key(key).await,
        }
        Ok(())
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.menu_next(),
            KeyCode::Up | KeyCode::Char('k') => self.state.menu_prev(),
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Enter => match self.state.selected_menu_item().form_kind() {
                Some(kind) => self.start_form(kind),
                None => self.quit = true,
            },
            _ => {}
        }
    }

    fn handle_lookup_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.back_to_menu();
            return;
        }
        // The identifier is frozen while its lookup runs
        if self.state.renewal_gate.is_pending() {
            return;
        }
        match key.code {
            KeyCode::Enter => self.start_lookup(),
            KeyCode::Backspace => {
                self.state.renewal_gate.identifier.pop();
            }
            KeyCode::Char(c) => self.state.renewal_gate.identifier.push(c),
            _ => {}
        }
    }

    /// Look the member up in the background, bounded by the submit timeout
    fn start_lookup(&mut self) {
        let ticket = self.issue_session();
        let Some(identifier) = self.state.renewal_gate.begin_lookup(ticket) else {
            return;
        };

        let registry = Arc::clone(&self.registry);
        let limit = self.submit_timeout;
        let tx = self.events_tx.clone();
        self.lookup_task = Some(tokio::spawn(async move {
            let call = async {
                let mut client = registry.lock().await;
                find_member(client.as_mut(), &identifier).await
            };
            let outcome = match limit {
                Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                    tracing::warn!(?limit, "member lookup timed out");
                    LookupOutcome::TimedOut
                }),
                None => call.await,
            };
            let _ = tx.send(AppEvent::LookedUp { ticket, outcome });
        }));
    }

    async fn handle_wizard_key(&mut self, key: KeyEvent) {
        let Some(active) = self.state.active.as_mut() else {
            self.back_to_menu();
            return;
        };

        if active.wizard.is_submitted() {
            match key.code {
                KeyCode::Char('y') if key.modifiers.contains(COPY_MODIFIER) => self.copy_receipt(),
                KeyCode::Esc | KeyCode::Enter => self.back_to_menu(),
                _ => {}
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                // A submission cannot be abandoned once started
                if active.wizard.is_submitting() {
                    self.state.notify(Notification::info("Saving, please wait"));
                } else {
                    self.back_to_menu();
                }
            }
            KeyCode::Tab => active.focus_next(),
            KeyCode::BackTab => active.focus_prev(),
            KeyCode::Char('n') if ctrl => {
                if let Err(e) = active.wizard.advance() {
                    tracing::debug!("advance rejected: {e}");
                }
                active.sync_focus();
            }
            KeyCode::Char('b') if ctrl => {
                let _ = active.wizard.retreat();
                active.sync_focus();
            }
            KeyCode::Char('s') if ctrl => self.start_submit(),
            KeyCode::Char(c @ '1'..='9') if key.modifiers.contains(KeyModifiers::ALT) => {
                let target = usize::from(c as u8 - b'1');
                if let Err(e) = active.wizard.jump_to_completed_step(target) {
                    self.state.notify(Notification::info(e.to_string()));
                } else {
                    active.sync_focus();
                }
            }
            // Other Alt chords, Alt+0 included, do nothing
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => {}
            KeyCode::Enter => {
                if active.focused_kind().is_some_and(|k| k.is_file()) {
                    self.attach_file().await;
                } else if active.focused_kind().is_some_and(|k| k.is_multiline()) {
                    active.push_char('\n');
                } else {
                    active.focus_next();
                }
            }
            KeyCode::Backspace => active.pop_char(),
            KeyCode::Char(c) if !ctrl => active.push_char(c),
            _ => {}
        }
    }

    /// Size-check the typed path, then encode it in the background
    async fn attach_file(&mut self) {
        let Some(active) = self.state.active.as_ref() else {
            return;
        };
        let Some(field) = active.focused_field().map(str::to_string) else {
            return;
        };
        let path = active.draft(&field);
        if path.trim().is_empty() {
            self.notify_error("Type the path of a file first");
            return;
        }

        let file = match self.encoder.select(path.trim()).await {
            Ok(file) => file,
            Err(e) => {
                // Rejected before the field is touched
                self.notify_error(e.to_string());
                return;
            }
        };

        let Some(active) = self.state.active.as_mut() else {
            return;
        };
        let ticket = match active.wizard.begin_encode(&field) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.notify_error(e.to_string());
                return;
            }
        };

        tracing::debug!(field = %field, file = %file.name, size = file.size, "Encoding attachment");
        let session = active.session;
        let encoder = self.encoder;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = encoder.encode(&file).await;
            let _ = tx.send(AppEvent::Encoded {
                session,
                ticket,
                result,
            });
        });
    }

    /// Validate everything and dispatch in the background
    fn start_submit(&mut self) {
        let Some(active) = self.state.active.as_mut() else {
            return;
        };
        let snapshot = match active.wizard.begin_submit() {
            Ok(snapshot) => snapshot,
            // Already in flight: nothing to do
            Err(WizardError::AlreadySubmitting) => return,
            Err(e) => {
                self.notify_error(e.to_string());
                return;
            }
        };

        let session = active.session;
        let dispatcher = active.dispatcher.clone();
        let registry = Arc::clone(&self.registry);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let call = tokio::spawn(async move {
                let mut client = registry.lock().await;
                dispatcher.dispatch(client.as_mut(), &snapshot).await
            });
            // A panicking backend must still release the wizard
            let outcome = call.await.unwrap_or_else(|e| {
                tracing::error!("Submission task failed: {e}");
                SubmitOutcome::Failure(GENERIC_FAILURE.to_string())
            });
            let _ = tx.send(AppEvent::Submitted { session, outcome });
        });
    }

    /// Apply finished background work to the active wizard
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        let current_session = self.state.active.as_ref().map(|a| a.session);
        match event {
            AppEvent::Encoded {
                session,
                ticket,
                result,
            } => {
                if current_session != Some(session) {
                    return;
                }
                let Some(active) = self.state.active.as_mut() else {
                    return;
                };
                match result {
                    Ok(data_url) => {
                        if active.wizard.complete_encode(&ticket, data_url) == EncodeResult::Applied {
                            self.state.notify(Notification::info("Attachment added"));
                        }
                    }
                    Err(e) => {
                        if active.wizard.fail_encode(&ticket) {
                            self.notify_error(e.to_string());
                        }
                    }
                }
            }
            AppEvent::Submitted { session, outcome } => {
                if current_session != Some(session) {
                    return;
                }
                if let Some(active) = self.state.active.as_mut() {
                    active.wizard.finish_submit(outcome);
                }
            }
            AppEvent::LookedUp { ticket, outcome } => {
                if self.state.current_view != View::RenewalLookup {
                    return;
                }
                let definition = self.catalog.get(FormKind::MembershipRenewal);
                let Some(start) = self
                    .state
                    .renewal_gate
                    .finish_lookup(ticket, outcome, definition)
                else {
                    return;
                };
                self.lookup_task = None;
                self.state.notify(Notification::info(format!(
                    "Renewing membership {}",
                    start.membership_number
                )));
                self.open_wizard(start.wizard, start.dispatcher);
            }
        }
    }

    fn copy_receipt(&mut self) {
        let reference = self
            .state
            .active
            .as_ref()
            .and_then(|a| a.wizard.receipt())
            .map(|r| r.reference.clone());
        if let Some(reference) = reference {
            match copy_to_clipboard(&reference) {
                Ok(()) => self.state.notify(Notification::info(format!("Copied {reference}"))),
                Err(e) => self.notify_error(format!("Could not copy: {e}")),
            }
        }
    }

    #[cfg(test)]
    async fn wait_for_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply_event(event);
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::testing::HangingRegistry;
    use crate::registry::{MockRegistryClientTrait, LOOKUP_FAILURE, LOOKUP_TIMEOUT};
    use crate::state::{FieldValue, MenuItem, Receipt};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::io::Write;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    fn offline_app() -> App {
        App::with_registry(DeskConfig::default(), Box::new(InMemoryRegistry::new())).unwrap()
    }

    fn active(app: &App) -> &ActiveWizard {
        app.state.active.as_ref().expect("wizard open")
    }

    /// Open the gallery form and fill the details step
    async fn gallery_on_media_step(app: &mut App, content_type: &str) {
        app.state.menu_index = 2;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        type_text(app, "Health camp").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(app, "programs").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(app, content_type).await;
        app.handle_key(ctrl('n')).await.unwrap();
    }

    #[tokio::test]
    async fn test_menu_navigation_and_quit() {
        let mut app = offline_app();
        app.handle_key(key(KeyCode::Up)).await.unwrap();
        assert_eq!(app.state.selected_menu_item(), MenuItem::Quit);
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_gallery_video_submission_end_to_end() {
        let mut app = offline_app();
        gallery_on_media_step(&mut app, "video").await;
        assert_eq!(active(&app).wizard.current_step(), 1);

        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "https://example.org/camp").await;
        app.handle_key(ctrl('s')).await.unwrap();
        assert!(active(&app).wizard.is_submitting());

        // Second submit while in flight is ignored
        app.handle_key(ctrl('s')).await.unwrap();

        app.wait_for_event().await;
        let wizard = &active(&app).wizard;
        assert!(wizard.is_submitted());
        assert_eq!(wizard.receipt().unwrap().reference, "G-0001");
    }

    #[tokio::test]
    async fn test_double_submit_dispatches_once() {
        let mut client = MockRegistryClientTrait::new();
        client.expect_create_media().times(1).returning(|_| {
            Ok(SubmitOutcome::Success(Receipt {
                id: "1".to_string(),
                reference: "G-1".to_string(),
            }))
        });
        let mut app = App::with_registry(DeskConfig::default(), Box::new(client)).unwrap();
        gallery_on_media_step(&mut app, "video").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "https://example.org/camp").await;

        app.handle_key(ctrl('s')).await.unwrap();
        app.handle_key(ctrl('s')).await.unwrap();
        app.wait_for_event().await;

        assert!(active(&app).wizard.is_submitted());
        // Mock verifies `times(1)` when the app (and its registry) drops
    }

    #[tokio::test]
    async fn test_esc_blocked_while_submitting() {
        let mut app = offline_app();
        gallery_on_media_step(&mut app, "video").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "https://example.org/camp").await;
        app.handle_key(ctrl('s')).await.unwrap();

        app.handle_key(key(KeyCode::Esc)).await.unwrap();

        assert_eq!(app.state.current_view, View::Wizard);
        app.wait_for_event().await;
    }

    #[tokio::test]
    async fn test_oversized_file_is_notification_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let config = DeskConfig {
            max_upload_bytes: Some(16),
            ..Default::default()
        };
        let mut app = App::with_registry(config, Box::new(InMemoryRegistry::new())).unwrap();
        gallery_on_media_step(&mut app, "image").await;
        type_text(&mut app, &path.display().to_string()).await;

        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        let wizard = &active(&app).wizard;
        assert_eq!(wizard.value("image"), &FieldValue::Empty);
        assert!(!wizard.state().was_checked("image"));
        assert!(!wizard.is_encoding("image"));
        let note = app.state.notification.as_ref().expect("notification raised");
        assert!(note.message.contains("huge.png"));
    }

    #[tokio::test]
    async fn test_attached_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camp.jpg");
        let content = b"\xff\xd8\xff\xe0 jpeg-ish bytes";
        std::fs::File::create(&path).unwrap().write_all(content).unwrap();

        let mut app = offline_app();
        gallery_on_media_step(&mut app, "image").await;
        type_text(&mut app, &path.display().to_string()).await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(active(&app).wizard.is_encoding("image"));

        app.wait_for_event().await;

        let value = active(&app).wizard.value("image").clone();
        let preview = crate::state::DataUrl::parse(value.as_data_url().unwrap()).unwrap();
        assert_eq!(preview.mime, "image/jpeg");
        assert_eq!(preview.bytes, content.to_vec());
    }

    #[tokio::test]
    async fn test_stale_session_events_are_dropped() {
        let mut app = offline_app();
        gallery_on_media_step(&mut app, "video").await;
        let old_session = active(&app).session;
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        gallery_on_media_step(&mut app, "video").await;

        app.apply_event(AppEvent::Submitted {
            session: old_session,
            outcome: SubmitOutcome::Failure("late".to_string()),
        });

        assert!(active(&app).wizard.page_error().is_none());
    }

    #[tokio::test]
    async fn test_renewal_not_found_stays_on_lookup() {
        let mut app = offline_app();
        app.handle_key(key(KeyCode::Down)).await.unwrap();
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.state.current_view, View::RenewalLookup);

        type_text(&mut app, "M-0042").await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.wait_for_event().await;

        assert_eq!(app.state.current_view, View::RenewalLookup);
        assert!(!app.state.renewal_gate.is_pending());
        assert_eq!(
            app.state.renewal_gate.page_error(),
            Some("No member found with number M-0042")
        );
        assert!(app.state.active.is_none());
    }

    #[tokio::test]
    async fn test_renewal_found_opens_prefilled_wizard() {
        let mut registry = InMemoryRegistry::new();
        let mut fields = std::collections::HashMap::new();
        fields.insert("full_name".to_string(), "Farah Khan".to_string());
        let number = registry.insert_member(fields);
        let mut app = App::with_registry(DeskConfig::default(), Box::new(registry)).unwrap();

        app.handle_key(key(KeyCode::Down)).await.unwrap();
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        type_text(&mut app, &number).await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.state.renewal_gate.is_pending());
        app.wait_for_event().await;

        assert_eq!(app.state.current_view, View::Wizard);
        assert_eq!(active(&app).wizard.value("full_name").as_text(), "Farah Khan");
        assert!(matches!(
            active(&app).dispatcher.mode(),
            DispatchMode::Update { .. }
        ));
    }

    fn hanging_app(timeout_secs: Option<u64>) -> App {
        let config = DeskConfig {
            submit_timeout_secs: timeout_secs,
            ..Default::default()
        };
        App::with_registry(config, Box::new(HangingRegistry)).unwrap()
    }

    async fn open_renewal_lookup(app: &mut App, identifier: &str) {
        app.state.menu_index = 1;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.state.current_view, View::RenewalLookup);
        type_text(app, identifier).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_lookup_times_out_on_gate() {
        let mut app = hanging_app(Some(5));
        open_renewal_lookup(&mut app, "M-0001").await;

        // Returns at once; the lookup runs in the background
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.state.renewal_gate.is_pending());
        assert!(app.state.renewal_gate.page_error().is_none());

        // Keys still reach the app while the registry is silent
        app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(app.state.renewal_gate.identifier, "M-0001");

        app.wait_for_event().await;

        let gate = &app.state.renewal_gate;
        assert!(!gate.is_pending());
        assert_eq!(gate.page_error(), Some(LOOKUP_TIMEOUT));
        assert_eq!(app.state.current_view, View::RenewalLookup);
        assert!(app.state.active.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_esc_abandons_pending_lookup() {
        let mut app = hanging_app(None);
        open_renewal_lookup(&mut app, "M-0001").await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.state.renewal_gate.is_pending());

        app.handle_key(key(KeyCode::Esc)).await.unwrap();

        assert_eq!(app.state.current_view, View::Menu);
        assert!(!app.state.renewal_gate.is_pending());
        // The aborted task no longer holds the registry
        let registry = Arc::clone(&app.registry);
        let lock = tokio::time::timeout(Duration::from_secs(1), registry.lock()).await;
        assert!(lock.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_result_from_abandoned_gate_is_dropped() {
        let mut app = offline_app();
        open_renewal_lookup(&mut app, "M-0001").await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        let abandoned = app.next_session;
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        open_renewal_lookup(&mut app, "M-0002").await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        app.apply_event(AppEvent::LookedUp {
            ticket: abandoned,
            outcome: LookupOutcome::NotFound,
        });
        assert!(app.state.renewal_gate.is_pending());
        assert!(app.state.renewal_gate.page_error().is_none());

        app.wait_for_event().await;
        assert_eq!(
            app.state.renewal_gate.page_error(),
            Some("No member found with number M-0002")
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_message() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_lookup_member()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("unavailable")));
        let mut app = App::with_registry(DeskConfig::default(), Box::new(client)).unwrap();
        open_renewal_lookup(&mut app, "M-0001").await;

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.wait_for_event().await;

        assert_eq!(app.state.renewal_gate.page_error(), Some(LOOKUP_FAILURE));
    }

    #[tokio::test]
    async fn test_blocked_advance_shows_errors() {
        let mut app = offline_app();
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.handle_key(ctrl('n')).await.unwrap();

        let wizard = &active(&app).wizard;
        assert_eq!(wizard.current_step(), 0);
        assert_eq!(
            wizard.errors_for("full_name"),
            &["Full name is required".to_string()]
        );
    }

    #[tokio::test]
    async fn test_alt_digit_jumps_back() {
        let mut app = offline_app();
        gallery_on_media_step(&mut app, "video").await;
        let alt_one = KeyEvent {
            code: KeyCode::Char('1'),
            modifiers: KeyModifiers::ALT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        app.handle_key(alt_one).await.unwrap();
        assert_eq!(active(&app).wizard.current_step(), 0);
        assert_eq!(active(&app).focused, 0);
    }

    #[tokio::test]
    async fn test_alt_zero_is_ignored() {
        let mut app = offline_app();
        gallery_on_media_step(&mut app, "video").await;
        let alt_zero = KeyEvent {
            code: KeyCode::Char('0'),
            modifiers: KeyModifiers::ALT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };

        app.handle_key(alt_zero).await.unwrap();

        let active = active(&app);
        assert_eq!(active.wizard.current_step(), 1);
        let focused = active.focused_field().unwrap();
        assert_eq!(active.draft(focused), "");
    }
}
