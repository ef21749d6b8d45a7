//! Ctrl-C forwarding for the prompt loop.

use std::future::{Future, pending};
use std::io;

use tokio::signal;
use tokio::sync::mpsc;

/// Forwards every Ctrl-C press to the returned receiver.
///
/// Once the listener is installed, Ctrl-C no longer terminates the process,
/// so a single listener has to serve both the prompt and the turns.
pub fn listen_for_interrupts() -> mpsc::UnboundedReceiver<()> {
    forward_signals(signal::ctrl_c)
}

fn forward_signals<F, Fut>(mut next_signal: F) -> mpsc::UnboundedReceiver<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = io::Result<()>> + Send,
{
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(err) = next_signal().await {
                tracing::warn!("cannot listen for Ctrl-C: {err}");
                // Keep the sender alive so the receiver never fires.
                pending::<()>().await;
            }
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Semaphore;
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_every_press_is_forwarded() {
        let presses = Arc::new(Semaphore::new(0));
        let mut rx = forward_signals({
            let presses = Arc::clone(&presses);
            move || {
                let presses = Arc::clone(&presses);
                async move {
                    presses
                        .acquire()
                        .await
                        .map(|permit| permit.forget())
                        .map_err(io::Error::other)
                }
            }
        });

        presses.add_permits(1);
        assert_eq!(rx.recv().await, Some(()));
        presses.add_permits(2);
        assert_eq!(rx.recv().await, Some(()));
        assert_eq!(rx.recv().await, Some(()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_listener_never_fires() {
        let mut rx = forward_signals(|| async {
            Err(io::Error::other("signals are not supported"))
        });

        let result = timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(result.is_err());
    }
}
