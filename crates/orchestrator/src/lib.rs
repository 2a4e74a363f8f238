//! Window orchestration for the DAHOUSE desktop client.
//!
//! An [`Orchestrator`] owns one login/user-info window flow. It drives an
//! external [`Presenter`] through opaque [`WindowHandle`]s and runs every
//! network call on a worker task, receiving the result back on its own loop.
//!
//! ```text
//!   LoggedOut --submit--> Authenticating --ok--> LoggedIn
//!       ^                       |                   |
//!       +-------failure---------+                   |
//!       +------------------logout-------------------+
//! ```

pub mod locale;
pub mod orchestrator;
pub mod presenter;
pub mod state;
pub mod worker;

pub use locale::{Locale, Texts};
pub use orchestrator::{FinishHook, Flow, Orchestrator, UiEvent, UrlOpener};
pub use presenter::{LoginForm, Notice, NoticeKind, Presenter, ProfileRow, ProfileView, WindowHandle};
pub use state::AppState;
pub use worker::{Completion, JobId, JobOutcome};
