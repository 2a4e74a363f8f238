//! Interface to the presentation layer.
//!
//! The orchestrator never draws anything. It asks a [`Presenter`] to show,
//! update, and destroy windows and refers to them only by [`WindowHandle`].

use std::fmt;

use dahouse_session::{FieldValue, ProfileField, UserProfile};

use crate::locale::Texts;

/// Opaque reference to a window owned by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Initial contents of the login screen.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub title: String,
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

/// One labelled value on the user-info screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub field: ProfileField,
    pub label: &'static str,
    pub value: String,
}

/// Contents of the user-info screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub title: String,
    pub rows: Vec<ProfileRow>,
    /// Set when the profile could not be loaded.
    pub error: Option<String>,
}

impl ProfileView {
    /// Every row shows a placeholder while the profile is in flight.
    pub fn loading(texts: &Texts) -> Self {
        Self::filled(texts, |_| texts.loading.to_string(), None)
    }

    /// Rows populated from a fetched profile.
    pub fn from_profile(texts: &Texts, profile: &UserProfile) -> Self {
        Self::filled(
            texts,
            |field| match profile.get(field) {
                None => texts.not_available.to_string(),
                Some(FieldValue::Bool(true)) => texts.yes.to_string(),
                Some(FieldValue::Bool(false)) => texts.no.to_string(),
                Some(value) => value.to_string(),
            },
            None,
        )
    }

    /// Every row marked as failed, with a message for the whole screen.
    pub fn failed(texts: &Texts, message: &str) -> Self {
        Self::filled(
            texts,
            |_| texts.field_error.to_string(),
            Some(message.to_string()),
        )
    }

    fn filled(texts: &Texts, value: impl Fn(ProfileField) -> String, error: Option<String>) -> Self {
        let rows = ProfileField::ALL
            .into_iter()
            .map(|field| ProfileRow {
                field,
                label: field_label(texts, field),
                value: value(field),
            })
            .collect();
        Self {
            title: texts.user_info_title.to_string(),
            rows,
            error,
        }
    }

    /// Value shown for `field`.
    pub fn value(&self, field: ProfileField) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.field == field)
            .map(|r| r.value.as_str())
    }
}

fn field_label(texts: &Texts, field: ProfileField) -> &'static str {
    match field {
        ProfileField::Id => texts.field_id,
        ProfileField::Email => texts.field_email,
        ProfileField::Username => texts.field_username,
        ProfileField::Role => texts.field_role,
        ProfileField::Shift => texts.field_shift,
        ProfileField::RegisteredAt => texts.field_registered_at,
    }
}

/// The visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
    /// Modal offering to open `download_url`.
    UpdateAvailable,
}

/// A dismissible message shown on top of the active window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub download_url: Option<String>,
}

impl Notice {
    pub fn info(texts: &Texts, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: texts.info_title.into(),
            message: message.into(),
            download_url: None,
        }
    }

    pub fn error(texts: &Texts, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: texts.error_title.into(),
            message: message.into(),
            download_url: None,
        }
    }

    pub fn update_available(texts: &Texts, version: &str, download_url: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::UpdateAvailable,
            title: texts.update_available_title.into(),
            message: format!("{}: {version}", texts.new_version),
            download_url: Some(download_url.into()),
        }
    }
}

/// Presentation layer driven by the orchestrator.
///
/// Implementations own the actual windows. User input travels back to the
/// orchestrator as [`UiEvent`](crate::UiEvent)s on a channel, never through
/// this trait.
pub trait Presenter: Send + 'static {
    /// Shows the login screen and returns its handle.
    fn show_login(&mut self, form: &LoginForm) -> WindowHandle;

    /// Replaces the error line of a login screen.
    fn show_login_error(&mut self, window: WindowHandle, message: &str);

    /// Shows the user-info screen and returns its handle.
    fn show_user_info(&mut self, view: &ProfileView) -> WindowHandle;

    /// Replaces the contents of a user-info screen.
    fn update_profile(&mut self, window: WindowHandle, view: &ProfileView);

    /// Shows a blocking, indeterminate progress overlay above `parent`.
    fn show_loading(&mut self, parent: WindowHandle, message: &str) -> WindowHandle;

    /// Shows a notice above `parent`.
    fn show_notice(&mut self, parent: WindowHandle, notice: &Notice);

    /// Destroys a window or overlay.
    fn destroy(&mut self, window: WindowHandle);
}
