use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Coalesce values from `rx`, calling `on_settle` with the latest one once no
/// new value has arrived for `quiet`. Every new value restarts the timer.
///
/// Returns when the sender side is dropped; a value still pending at that
/// point is discarded.
pub async fn debounce<T, F>(mut rx: UnboundedReceiver<T>, quiet: Duration, mut on_settle: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;

    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(value) => pending = Some(value),
                None => return,
            },
            Some(value) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => return,
                    },
                    _ = tokio::time::sleep(quiet) => on_settle(value),
                }
            }
        }
    }
}
