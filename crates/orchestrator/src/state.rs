//! Orchestrator state.

use std::fmt;

/// Which screen an orchestrator is showing.
///
/// | State | Visible |
/// |---|---|
/// | `LoggedOut` | Login |
/// | `Authenticating` | Login with the loading overlay |
/// | `LoggedIn` | User info |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppState {
    #[default]
    LoggedOut,
    Authenticating,
    LoggedIn,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppState::LoggedOut => "logged-out",
            AppState::Authenticating => "authenticating",
            AppState::LoggedIn => "logged-in",
        };
        f.write_str(name)
    }
}
