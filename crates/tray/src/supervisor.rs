//! Open/Exit dispatch loop.

use std::ops::ControlFlow;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::tray::TrayCommand;

/// Marks one orchestrator as alive until released or dropped.
///
/// The supervisor accepts a new Open as soon as the lease is released, even
/// if the task that held it has not returned yet.
#[derive(Debug)]
pub struct InstanceLease {
    alive: watch::Sender<bool>,
}

impl InstanceLease {
    fn new() -> (Self, watch::Receiver<bool>) {
        let (alive, rx) = watch::channel(true);
        (Self { alive }, rx)
    }

    /// Reports that the window flow is over.
    pub fn release(&self) {
        if self.alive.send_replace(false) {
            debug!("instance lease released");
        }
    }
}

impl Drop for InstanceLease {
    fn drop(&mut self) {
        self.release();
    }
}

/// Starts a new window orchestrator that holds `lease` for its lifetime.
pub trait Spawner: Send {
    fn spawn(&mut self, lease: InstanceLease);
}

impl<F> Spawner for F
where
    F: FnMut(InstanceLease) + Send,
{
    fn spawn(&mut self, lease: InstanceLease) {
        self(lease)
    }
}

/// Ends the application.
pub trait Terminator: Send {
    fn terminate(&mut self);
}

/// Exits the process immediately with status 0.
///
/// Outstanding requests and open windows are abandoned without cleanup.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&mut self) {
        info!("exit requested from tray");
        std::process::exit(0);
    }
}

/// Keeps at most one orchestrator alive and handles Exit.
pub struct TraySupervisor<S, T> {
    spawner: S,
    terminator: T,
    instance: Option<watch::Receiver<bool>>,
}

impl<S: Spawner, T: Terminator> TraySupervisor<S, T> {
    pub fn new(spawner: S, terminator: T) -> Self {
        Self {
            spawner,
            terminator,
            instance: None,
        }
    }

    /// True while the last spawned orchestrator still holds its lease.
    pub fn is_instance_running(&self) -> bool {
        self.instance.as_ref().is_some_and(|alive| *alive.borrow())
    }

    /// Applies one command. Breaks after `Exit`.
    pub fn handle(&mut self, command: TrayCommand) -> ControlFlow<()> {
        match command {
            TrayCommand::Open => {
                if self.is_instance_running() {
                    debug!("window already open, ignoring Open");
                } else {
                    info!("opening login window");
                    let (lease, alive) = InstanceLease::new();
                    self.instance = Some(alive);
                    self.spawner.spawn(lease);
                }
                ControlFlow::Continue(())
            }
            TrayCommand::Exit => {
                self.terminator.terminate();
                ControlFlow::Break(())
            }
        }
    }

    /// Processes commands until `Exit` or until every sender is dropped.
    pub async fn run(mut self, mut commands: mpsc::Receiver<TrayCommand>) {
        while let Some(command) = commands.recv().await {
            if self.handle(command).is_break() {
                return;
            }
        }
        debug!("tray channel closed");
    }
}
