//! Tray handle and control commands.
//!
//! A native tray icon needs platform libraries this crate does not pull in.
//! What lives here is the channel-based interface that any tray backend (or
//! the console front-end) uses to drive the supervisor.

use tokio::sync::mpsc;
use tracing::debug;

use crate::menu::{MenuAction, MenuState, action_from_menu_id};

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Display name shown in the tray tooltip.
    pub app_name: String,
    pub open_label: String,
    pub exit_label: String,
}

impl Default for TrayConfig {
    fn default() -> Self {
        let menu = MenuState::default();
        Self {
            app_name: menu.app_name,
            open_label: menu.open_label,
            exit_label: menu.exit_label,
        }
    }
}

/// Commands sent from the tray to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Open,
    Exit,
}

impl From<MenuAction> for TrayCommand {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::Open => TrayCommand::Open,
            MenuAction::Exit => TrayCommand::Exit,
        }
    }
}

/// The supervisor is gone and no longer accepts commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tray supervisor is not running")]
pub struct TrayClosed;

/// Sending side of the tray control channel.
///
/// Cheap to clone; every tray backend thread gets its own copy.
#[derive(Debug, Clone)]
pub struct TrayHandle {
    command_tx: mpsc::Sender<TrayCommand>,
    menu: MenuState,
}

impl TrayHandle {
    /// Creates a handle and the receiver to give to the supervisor.
    pub fn new(config: TrayConfig) -> (Self, mpsc::Receiver<TrayCommand>) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let handle = Self {
            command_tx,
            menu: MenuState {
                app_name: config.app_name,
                open_label: config.open_label,
                exit_label: config.exit_label,
            },
        };
        (handle, command_rx)
    }

    /// Labels for the context menu.
    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub async fn open(&self) -> Result<(), TrayClosed> {
        self.send(TrayCommand::Open).await
    }

    pub async fn exit(&self) -> Result<(), TrayClosed> {
        self.send(TrayCommand::Exit).await
    }

    pub async fn dispatch(&self, action: MenuAction) -> Result<(), TrayClosed> {
        self.send(action.into()).await
    }

    async fn send(&self, command: TrayCommand) -> Result<(), TrayClosed> {
        debug!(?command, "tray command");
        self.command_tx.send(command).await.map_err(|_| TrayClosed)
    }

    /// Sends a command from a thread outside the runtime.
    ///
    /// Panics if called from within an async context, like
    /// [`mpsc::Sender::blocking_send`].
    pub fn blocking_send(&self, command: TrayCommand) -> Result<(), TrayClosed> {
        debug!(?command, "tray command");
        self.command_tx
            .blocking_send(command)
            .map_err(|_| TrayClosed)
    }

    /// Handles a click on the menu item `menu_id`.
    ///
    /// Returns `Ok(false)` for unknown ids.
    pub fn blocking_dispatch_menu_id(&self, menu_id: &str) -> Result<bool, TrayClosed> {
        match action_from_menu_id(menu_id) {
            Some(action) => self.blocking_send(action.into()).map(|()| true),
            None => {
                debug!(%menu_id, "unknown tray menu id");
                Ok(false)
            }
        }
    }
}
