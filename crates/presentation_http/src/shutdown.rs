//! Bounded graceful shutdown

use std::{future::Future, time::Duration};

use tokio::sync::oneshot;
use tracing::{info, warn};

/// How a server run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// The server finished on its own
    Completed,
    /// Connections were still open when the grace period ran out
    TimedOut,
}

/// Drive `server` to completion, abandoning it `grace` after `signalled` fires
///
/// A dropped `signalled` sender never starts the grace period.
pub async fn run_until_drained<F, E>(
    server: F,
    signalled: oneshot::Receiver<()>,
    grace: Duration,
) -> Result<Drain, E>
where
    F: Future<Output = Result<(), E>>,
{
    let deadline = async {
        if signalled.await.is_err() {
            std::future::pending::<()>().await;
        }
        info!("Waiting up to {:?} for connections to close...", grace);
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.map(|()| Drain::Completed),
        () = deadline => {
            warn!("Connections still open after {:?}, forcing shutdown", grace);
            Ok(Drain::TimedOut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn server_that_finishes_completes() {
        let (_tx, rx) = oneshot::channel();
        let drain = run_until_drained(async { Ok::<(), ()>(()) }, rx, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(drain, Drain::Completed);
    }

    #[tokio::test]
    async fn stuck_server_is_abandoned_after_grace() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        let drain = run_until_drained(
            std::future::pending::<Result<(), ()>>(),
            rx,
            Duration::from_millis(20),
        )
        .await
        .unwrap();
        assert_eq!(drain, Drain::TimedOut);
    }

    #[tokio::test]
    async fn grace_period_waits_for_the_signal() {
        let (tx, rx) = oneshot::channel::<()>();
        let server = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<(), ()>(())
        };

        let drain = run_until_drained(server, rx, Duration::from_millis(1)).await.unwrap();
        assert_eq!(drain, Drain::Completed);
        drop(tx);
    }

    #[tokio::test]
    async fn server_errors_propagate() {
        let (_tx, rx) = oneshot::channel();
        let err = run_until_drained(async { Err::<(), _>("bind failed") }, rx, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, "bind failed");
    }
}
