//! Wires the tray supervisor, orchestrators, and console front-end together.

use std::path::PathBuf;

use dahouse_credentials::CredentialStore;
use dahouse_orchestrator::Orchestrator;
use dahouse_session::{ApiClient, SessionClient};
use dahouse_tray::{InstanceLease, ProcessExit, TrayConfig, TrayHandle, TraySupervisor};
use dahouse_updates::UpdateChecker;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::console::{self, ConsoleLink, ConsolePresenter};

/// Runs the client until Exit is requested from the tray or Ctrl-C.
pub async fn run(config: Config, config_file: PathBuf) -> anyhow::Result<()> {
    let locale = config.locale;
    let texts = locale.texts();

    let store = CredentialStore::new(config.credentials_file(&config_file));
    let api = ApiClient::new(config.api_config())?;
    let updates = UpdateChecker::new(config.update_config(env!("CARGO_PKG_VERSION")))?;
    tracing::debug!(path = %store.path().display(), "credential store");

    // -- Tray --
    let (tray, commands) = TrayHandle::new(TrayConfig {
        app_name: texts.app_name.into(),
        open_label: texts.tray_open.into(),
        exit_label: texts.tray_exit.into(),
    });
    let link = ConsoleLink::default();

    // -- Supervisor --
    let spawn_link = link.clone();
    let spawner = move |lease: InstanceLease| {
        let (events_tx, events_rx) = mpsc::channel(16);
        spawn_link.attach(events_tx);

        let orchestrator = Orchestrator::new(
            ConsolePresenter::new(spawn_link.clone()),
            store.clone(),
            SessionClient::new(api.clone()),
            updates.clone(),
            locale,
        )
        .with_finish_hook(Box::new(move || lease.release()));
        tokio::spawn(orchestrator.run(events_rx));
    };
    let supervisor = TraySupervisor::new(spawner, ProcessExit);
    let supervisor_task = tokio::spawn(supervisor.run(commands));

    // -- Input --
    console::spawn_reader(tray.clone(), link)?;

    let signal_tray = tray.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("SIGINT received");
            if let Err(e) = signal_tray.exit().await {
                tracing::warn!("failed to forward exit: {e}");
            }
        }
    });

    if config.open_on_start {
        tray.open().await?;
    }
    tracing::info!("DAHOUSE ready");

    supervisor_task.await?;
    Ok(())
}
