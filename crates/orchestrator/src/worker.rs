//! Worker tasks for blocking-looking network calls.
//!
//! Each call runs on its own tokio task. Its outcome is delivered back to
//! the orchestrator loop as a [`Completion`], tagged with the job and the
//! window it was started for, so the loop can drop results whose window no
//! longer exists. A panicking call still produces a completion.

use std::fmt;
use std::future::Future;

use dahouse_session::{AccessToken, AuthError, FetchError, UserProfile};
use dahouse_updates::{CheckError, UpdateStatus};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::presenter::WindowHandle;

/// Identifies one in-flight job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// What a job produced.
#[derive(Debug)]
pub enum JobOutcome {
    Login(Result<AccessToken, AuthError>),
    Profile(Result<UserProfile, FetchError>),
    Update(Result<UpdateStatus, CheckError>),
    /// The job panicked before producing a result.
    Panicked,
}

/// Result of a job, addressed to the window that started it.
#[derive(Debug)]
pub struct Completion {
    pub job: JobId,
    pub target: WindowHandle,
    pub outcome: JobOutcome,
}

/// Runs `work` on a new task and sends its outcome to `completions`.
///
/// If the receiver is gone by the time the job finishes, the outcome is
/// discarded.
pub(crate) fn spawn_job<F>(
    job: JobId,
    target: WindowHandle,
    completions: mpsc::Sender<Completion>,
    work: F,
) where
    F: Future<Output = JobOutcome> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = match tokio::spawn(work).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%job, "job failed: {e}");
                JobOutcome::Panicked
            }
        };

        let completion = Completion {
            job,
            target,
            outcome,
        };
        if completions.send(completion).await.is_err() {
            debug!(%job, %target, "completion dropped, orchestrator is gone");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outcome_is_delivered() {
        let (tx, mut rx) = mpsc::channel(4);
        spawn_job(JobId(1), WindowHandle(10), tx, async {
            JobOutcome::Login(Err(AuthError::UserNotFound))
        });

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.job, JobId(1));
        assert_eq!(completion.target, WindowHandle(10));
        assert!(matches!(
            completion.outcome,
            JobOutcome::Login(Err(AuthError::UserNotFound))
        ));
    }

    #[tokio::test]
    async fn panic_is_reported() {
        let (tx, mut rx) = mpsc::channel(4);
        fn explode() -> JobOutcome {
            panic!("boom")
        }
        spawn_job(JobId(2), WindowHandle(10), tx, async { explode() });

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.job, JobId(2));
        assert!(matches!(completion.outcome, JobOutcome::Panicked));
    }

    #[tokio::test]
    async fn closed_receiver_is_tolerated() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        spawn_job(JobId(3), WindowHandle(1), tx, async { JobOutcome::Panicked });
        // Give the job time to run; it must not panic the runtime.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
}
