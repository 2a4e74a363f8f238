//! Terminal front-end.
//!
//! Windows are rendered as text blocks on stdout and user input is read as
//! line commands from stdin on a dedicated thread. Tray commands go to the
//! supervisor, everything else to the running orchestrator.

use std::io::BufRead;
use std::sync::Arc;

use dahouse_orchestrator::{LoginForm, Notice, NoticeKind, Presenter, ProfileView, UiEvent, WindowHandle};
use dahouse_tray::{MenuState, TrayCommand, TrayHandle};
use tokio::sync::{mpsc, watch};
use tracing::debug;

const NO_WINDOW: &str = "No window is open. Type 'open' first.";

/// What the input thread needs to know about the running orchestrator.
#[derive(Debug, Clone, Default)]
struct LinkState {
    events: Option<mpsc::Sender<UiEvent>>,
    window: Option<WindowHandle>,
    form: Option<LoginForm>,
    download_url: Option<String>,
}

/// Shared between the presenter (writer) and the input thread (reader).
#[derive(Debug, Clone)]
pub struct ConsoleLink(Arc<watch::Sender<LinkState>>);

impl Default for ConsoleLink {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(LinkState::default());
        Self(Arc::new(tx))
    }
}

impl ConsoleLink {
    /// Routes input to a newly spawned orchestrator.
    pub fn attach(&self, events: mpsc::Sender<UiEvent>) {
        self.0.send_replace(LinkState {
            events: Some(events),
            ..LinkState::default()
        });
    }

    fn update(&self, f: impl FnOnce(&mut LinkState)) {
        self.0.send_modify(f);
    }

    fn window(&self) -> Option<WindowHandle> {
        self.0.borrow().window
    }

    fn form(&self) -> Option<LoginForm> {
        self.0.borrow().form.clone()
    }

    fn download_url(&self) -> Option<String> {
        self.0.borrow().download_url.clone()
    }

    /// Forwards an event to the orchestrator, if one is still running.
    fn send(&self, event: UiEvent) -> Result<(), String> {
        let events = self.0.borrow().events.clone();
        let events = events.ok_or(NO_WINDOW)?;
        events.blocking_send(event).map_err(|_| NO_WINDOW.to_string())
    }
}

/// Prints windows to stdout.
pub struct ConsolePresenter {
    link: ConsoleLink,
    next: u64,
}

impl ConsolePresenter {
    pub fn new(link: ConsoleLink) -> Self {
        Self { link, next: 0 }
    }

    fn handle(&mut self) -> WindowHandle {
        self.next += 1;
        WindowHandle(self.next)
    }
}

impl Presenter for ConsolePresenter {
    fn show_login(&mut self, form: &LoginForm) -> WindowHandle {
        let window = self.handle();
        println!("== {} ==", form.title);
        println!("  user:     {}", form.username);
        println!("  password: {}", "*".repeat(form.password.chars().count()));
        println!("  remember: {}", if form.remember { "[x]" } else { "[ ]" });
        println!("  (login [<user> <password> [remember]], close)");

        let form = form.clone();
        self.link.update(|s| {
            s.window = Some(window);
            s.form = Some(form);
        });
        window
    }

    fn show_login_error(&mut self, _window: WindowHandle, message: &str) {
        println!("  ! {message}");
    }

    fn show_user_info(&mut self, view: &ProfileView) -> WindowHandle {
        let window = self.handle();
        println!("== {} ==", view.title);
        print_rows(view);
        println!("  (update, logout, close)");

        self.link.update(|s| {
            s.window = Some(window);
            s.form = None;
        });
        window
    }

    fn update_profile(&mut self, _window: WindowHandle, view: &ProfileView) {
        print_rows(view);
        if let Some(error) = &view.error {
            println!("  ! {error}");
        }
    }

    fn show_loading(&mut self, _parent: WindowHandle, message: &str) -> WindowHandle {
        println!("  ... {message}");
        self.handle()
    }

    fn show_notice(&mut self, _parent: WindowHandle, notice: &Notice) {
        let marker = match notice.kind {
            NoticeKind::Info => "i",
            NoticeKind::Error => "!",
            NoticeKind::UpdateAvailable => "*",
        };
        println!("  [{marker}] {}: {}", notice.title, notice.message);

        if let Some(url) = &notice.download_url {
            println!("      {url}  (download)");
            let url = url.clone();
            self.link.update(|s| s.download_url = Some(url));
        }
    }

    fn destroy(&mut self, window: WindowHandle) {
        debug!(%window, "destroy");
        self.link.update(|s| {
            if s.window == Some(window) {
                s.window = None;
                s.form = None;
                s.download_url = None;
            }
        });
    }
}

fn print_rows(view: &ProfileView) {
    for row in &view.rows {
        println!("  {:<20} {}", format!("{}:", row.label), row.value);
    }
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Tray(TrayCommand),
    /// `login` alone submits the form as shown.
    Login(Option<(String, String, bool)>),
    Logout,
    Update,
    Download,
    Close,
    Help,
}

const LOGIN_USAGE: &str = "usage: login [<user> <password> [remember]]";

/// Parses one line. Blank lines yield `Ok(None)`.
///
/// Tray entries are accepted both as `open`/`exit` and by their menu label.
fn parse_command(line: &str, menu: &MenuState) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let head = head.to_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match head.as_str() {
        "open" => Command::Tray(TrayCommand::Open),
        "exit" | "quit" => Command::Tray(TrayCommand::Exit),
        h if h == menu.open_label.to_lowercase() => Command::Tray(TrayCommand::Open),
        h if h == menu.exit_label.to_lowercase() => Command::Tray(TrayCommand::Exit),
        "login" => match args.as_slice() {
            [] => Command::Login(None),
            [user, pass] => Command::Login(Some((user.to_string(), pass.to_string(), false))),
            [user, pass, "remember" | "-r"] => {
                Command::Login(Some((user.to_string(), pass.to_string(), true)))
            }
            _ => return Err(LOGIN_USAGE.into()),
        },
        "logout" => Command::Logout,
        "update" => Command::Update,
        "download" => Command::Download,
        "close" => Command::Close,
        "help" | "?" => Command::Help,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(Some(command))
}

fn dispatch(command: Command, tray: &TrayHandle, link: &ConsoleLink) -> Result<(), String> {
    let event = match command {
        Command::Help => {
            print_help(tray.menu());
            return Ok(());
        }
        Command::Tray(command) => return tray.blocking_send(command).map_err(|e| e.to_string()),
        Command::Login(Some((username, password, remember))) => UiEvent::Submit {
            username,
            password,
            remember,
        },
        Command::Login(None) => {
            let form = link.form().ok_or(NO_WINDOW)?;
            UiEvent::Submit {
                username: form.username,
                password: form.password,
                remember: form.remember,
            }
        }
        Command::Logout => UiEvent::Logout,
        Command::Update => UiEvent::CheckForUpdates,
        Command::Download => UiEvent::OpenDownload {
            url: link.download_url().ok_or("No update has been offered.")?,
        },
        Command::Close => UiEvent::Close {
            window: link.window().ok_or(NO_WINDOW)?,
        },
    };
    link.send(event)
}

fn print_help(menu: &MenuState) {
    println!("{} tray:", menu.app_name);
    for item in menu.build_menu() {
        println!("  {:<10} ({})", item.label, item.id);
    }
    println!("window: login, logout, update, download, close, help");
}

fn read_commands(input: impl BufRead, tray: &TrayHandle, link: &ConsoleLink) {
    print_help(tray.menu());
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        let result = parse_command(&line, tray.menu())
            .and_then(|command| command.map_or(Ok(()), |c| dispatch(c, tray, link)));
        if let Err(message) = result {
            println!("{message}");
        }
    }
    debug!("console input closed");
}

/// Starts the stdin reader thread.
pub fn spawn_reader(
    tray: TrayHandle,
    link: ConsoleLink,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("console-input".into())
        .spawn(move || read_commands(std::io::stdin().lock(), &tray, &link))
}
