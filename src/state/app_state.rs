//! Application state definitions

use super::forms::{FieldKind, FormKind, Wizard};
use crate::registry::{RenewalGate, SubmissionDispatcher};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a transient notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Menu,
    /// Membership number prompt before the renewal wizard
    RenewalLookup,
    Wizard,
}

/// Entries on the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    NewMembership,
    RenewMembership,
    GalleryUpload,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::NewMembership,
        MenuItem::RenewMembership,
        MenuItem::GalleryUpload,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewMembership => "New membership application",
            Self::RenewMembership => "Renew membership",
            Self::GalleryUpload => "Upload gallery media",
            Self::Quit => "Quit",
        }
    }

    pub fn form_kind(&self) -> Option<FormKind> {
        match self {
            Self::NewMembership => Some(FormKind::MembershipApplication),
            Self::RenewMembership => Some(FormKind::MembershipRenewal),
            Self::GalleryUpload => Some(FormKind::GalleryUpload),
            Self::Quit => None,
        }
    }
}

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A short-lived message that is not tied to any field
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= NOTIFICATION_TTL
    }
}

/// A running wizard with its input buffers and focus
pub struct ActiveWizard {
    /// Distinguishes results of background tasks from earlier wizards
    pub session: u64,
    pub wizard: Wizard,
    pub dispatcher: SubmissionDispatcher,
    /// Index into the current step's fields
    pub focused: usize,
    /// Raw text being edited per field; file fields hold the path
    drafts: HashMap<String, String>,
    focused_step: usize,
}

impl ActiveWizard {
    pub fn new(session: u64, wizard: Wizard, dispatcher: SubmissionDispatcher) -> Self {
        let focused_step = wizard.current_step();
        Self {
            session,
            wizard,
            dispatcher,
            focused: 0,
            drafts: HashMap::new(),
            focused_step,
        }
    }

    fn step_fields(&self) -> &[String] {
        self.wizard
            .definition()
            .steps
            .fields_of(self.wizard.current_step())
    }

    /// Reset focus when the step changed underneath us
    pub fn sync_focus(&mut self) {
        if self.focused_step != self.wizard.current_step() {
            self.focused_step = self.wizard.current_step();
            self.focused = 0;
        }
    }

    pub fn focused_field(&self) -> Option<&str> {
        self.step_fields().get(self.focused).map(String::as_str)
    }

    pub fn focused_kind(&self) -> Option<FieldKind> {
        let field = self.focused_field()?;
        self.wizard.definition().schema.field(field).map(|f| f.kind)
    }

    pub fn focus_next(&mut self) {
        let count = self.step_fields().len();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.step_fields().len();
        if count > 0 {
            self.focused = if self.focused == 0 {
                count - 1
            } else {
                self.focused - 1
            };
        }
    }

    /// Text shown in the input box for a field
    pub fn draft(&self, field: &str) -> String {
        self.drafts
            .get(field)
            .cloned()
            .unwrap_or_else(|| self.wizard.value(field).input_text())
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(field) = self.focused_field().map(str::to_string) else {
            return;
        };
        if self.wizard.state().is_locked() {
            return;
        }
        let mut text = self.draft(&field);
        edit(&mut text);
        let is_file = self.focused_kind().is_some_and(|k| k.is_file());
        if !is_file {
            // Value is only set from a file when the path is confirmed
            if let Err(e) = self.wizard.set_input(&field, &text) {
                tracing::debug!("input ignored: {e}");
                return;
            }
        }
        self.drafts.insert(field, text);
    }

    pub fn push_char(&mut self, c: char) {
        self.edit_focused(|text| text.push(c));
    }

    pub fn pop_char(&mut self) {
        self.edit_focused(|text| {
            text.pop();
        });
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    pub current_view: View,
    pub menu_index: usize,
    pub renewal_gate: RenewalGate,
    pub active: Option<ActiveWizard>,
    pub notification: Option<Notification>,
    pub registry_connected: bool,
}

impl AppState {
    pub fn selected_menu_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_index.min(MenuItem::ALL.len() - 1)]
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MenuItem::ALL.len();
    }

    pub fn menu_prev(&mut self) {
        self.menu_index = if self.menu_index == 0 {
            MenuItem::ALL.len() - 1
        } else {
            self.menu_index - 1
        };
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Drop the notification once it has been visible long enough
    pub fn expire_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }
}
