//! Tray side of the DAHOUSE desktop client.
//!
//! The tray exposes two actions, Open and Exit. They reach the
//! [`TraySupervisor`] as [`TrayCommand`]s over a channel:
//! - Open starts a window orchestrator unless one still holds its
//!   [`InstanceLease`]
//! - Exit terminates the whole process
//!
//! The supervisor runs on its own task, so Exit is handled even while an
//! orchestrator is waiting on the network.

mod menu;
mod supervisor;
mod tray;

pub use menu::{MenuAction, MenuItem, MenuState, TRAY_MENU_EXIT, TRAY_MENU_OPEN, action_from_menu_id};
pub use supervisor::{InstanceLease, ProcessExit, Spawner, Terminator, TraySupervisor};
pub use tray::{TrayClosed, TrayCommand, TrayConfig, TrayHandle};
