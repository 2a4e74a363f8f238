//! User-facing strings.

use serde::{Deserialize, Serialize};

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn texts(self) -> &'static Texts {
        match self {
            Locale::Es => &ES,
            Locale::En => &EN,
        }
    }
}

#[derive(Debug)]
pub struct Texts {
    pub app_name: &'static str,
    pub login_title: &'static str,
    pub user_info_title: &'static str,
    pub tray_open: &'static str,
    pub tray_exit: &'static str,

    pub missing_fields: &'static str,
    pub logging_in: &'static str,
    pub invalid_credentials: &'static str,
    pub user_not_found: &'static str,
    pub server_unreachable: &'static str,
    pub unknown_login_error: &'static str,
    pub save_credentials_failed: &'static str,
    pub load_credentials_failed: &'static str,

    pub loading: &'static str,
    pub loading_profile: &'static str,
    pub profile_fetch_failed: &'static str,
    pub field_error: &'static str,
    pub not_available: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub field_id: &'static str,
    pub field_email: &'static str,
    pub field_username: &'static str,
    pub field_role: &'static str,
    pub field_shift: &'static str,
    pub field_registered_at: &'static str,

    pub checking_updates: &'static str,
    pub update_available_title: &'static str,
    pub new_version: &'static str,
    pub up_to_date: &'static str,
    pub update_check_failed: &'static str,
    pub open_browser_failed: &'static str,
    pub info_title: &'static str,
    pub error_title: &'static str,
}

static ES: Texts = Texts {
    app_name: "DAHOUSE",
    login_title: "DAHOUSE - Iniciar sesión",
    user_info_title: "DAHOUSE - Información del Usuario",
    tray_open: "Abrir",
    tray_exit: "Salir",

    missing_fields: "Por favor, ingresa usuario y contraseña.",
    logging_in: "Iniciando sesión...",
    invalid_credentials: "Credenciales incorrectas.",
    user_not_found: "Usuario no encontrado.",
    server_unreachable: "No se pudo conectar al servidor.",
    unknown_login_error: "Error desconocido al iniciar sesión.",
    save_credentials_failed: "No se pudieron guardar tus datos.",
    load_credentials_failed: "No se pudieron leer tus datos guardados.",

    loading: "Cargando...",
    loading_profile: "Cargando información del usuario...",
    profile_fetch_failed: "No se pudo obtener la información del usuario.",
    field_error: "Error al cargar",
    not_available: "No disponible",
    yes: "Sí",
    no: "No",
    field_id: "ID",
    field_email: "Correo Electrónico",
    field_username: "Nombre de Usuario",
    field_role: "Rol",
    field_shift: "Jornada",
    field_registered_at: "Fecha de Registro",

    checking_updates: "Buscando actualizaciones...",
    update_available_title: "Actualización Disponible",
    new_version: "Nueva versión disponible",
    up_to_date: "Estás utilizando la última versión.",
    update_check_failed: "No se pudo verificar actualizaciones.",
    open_browser_failed: "No se pudo abrir el navegador.",
    info_title: "Información",
    error_title: "Error",
};

static EN: Texts = Texts {
    app_name: "DAHOUSE",
    login_title: "DAHOUSE - Sign in",
    user_info_title: "DAHOUSE - User Information",
    tray_open: "Open",
    tray_exit: "Exit",

    missing_fields: "Please enter username and password.",
    logging_in: "Signing in...",
    invalid_credentials: "Incorrect credentials.",
    user_not_found: "User not found.",
    server_unreachable: "Cannot connect to server.",
    unknown_login_error: "Unknown error while signing in.",
    save_credentials_failed: "Could not save your details.",
    load_credentials_failed: "Could not read your saved details.",

    loading: "Loading...",
    loading_profile: "Loading user information...",
    profile_fetch_failed: "Could not fetch user information.",
    field_error: "Error loading",
    not_available: "Not available",
    yes: "Yes",
    no: "No",
    field_id: "ID",
    field_email: "Email",
    field_username: "Username",
    field_role: "Role",
    field_shift: "Shift",
    field_registered_at: "Registered",

    checking_updates: "Checking for updates...",
    update_available_title: "Update Available",
    new_version: "New version available",
    up_to_date: "You are running the latest version.",
    update_check_failed: "Could not check for updates.",
    open_browser_failed: "Could not open the browser.",
    info_title: "Information",
    error_title: "Error",
};
