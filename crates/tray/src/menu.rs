//! Context menu of the tray icon.

pub const TRAY_MENU_OPEN: &str = "tray_open";
pub const TRAY_MENU_EXIT: &str = "tray_exit";

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Show the login window unless one is already up.
    Open,
    /// Terminate the application.
    Exit,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<MenuAction> {
    match menu_id {
        TRAY_MENU_OPEN => Some(MenuAction::Open),
        TRAY_MENU_EXIT => Some(MenuAction::Exit),
        _ => None,
    }
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable id reported by the tray backend on click.
    pub id: &'static str,
    /// Display text.
    pub label: String,
    pub enabled: bool,
    pub action: Option<MenuAction>,
}

/// Labels used to build the context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    /// Shown as the icon tooltip.
    pub app_name: String,
    pub open_label: String,
    pub exit_label: String,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            app_name: "DAHOUSE".into(),
            open_label: "Abrir".into(),
            exit_label: "Salir".into(),
        }
    }
}

impl MenuState {
    /// Builds the menu items, Open first.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        vec![
            MenuItem {
                id: TRAY_MENU_OPEN,
                label: self.open_label.clone(),
                enabled: true,
                action: Some(MenuAction::Open),
            },
            MenuItem {
                id: TRAY_MENU_EXIT,
                label: self.exit_label.clone(),
                enabled: true,
                action: Some(MenuAction::Exit),
            },
        ]
    }
}
