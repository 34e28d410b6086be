//! Task-based debounce scheduler

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to the single scheduled action of a [`Debouncer`].
#[derive(Debug)]
struct PendingTimer {
    cancellation_token: CancellationToken,
    settled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Runs at most one pending action, `delay` after the most recent call to
/// [`Debouncer::schedule`].
///
/// Scheduling cancels whatever was pending before. Once an action has
/// settled it runs to completion; cancellation only affects the wait.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<PendingTimer>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `action` to run once after `delay`, replacing any pending action.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, action: F, delay: Duration)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let cancellation_token = CancellationToken::new();
        let settled = Arc::new(AtomicBool::new(false));

        let token = cancellation_token.clone();
        let settled_flag = settled.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    log::trace!("Debounced action cancelled before settling");
                }
                _ = tokio::time::sleep(delay) => {
                    // Lost the race against cancel()
                    if settled_flag.swap(true, Ordering::SeqCst) {
                        return;
                    }
                    log::trace!("Debounce settled after {:?}", delay);
                    action.await;
                }
            }
        });

        self.pending = Some(PendingTimer {
            cancellation_token,
            settled,
            handle,
        });
    }

    /// Drop the pending action if it has not settled yet.
    ///
    /// Returns true when a waiting action was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) => {
                let was_waiting = !timer.settled.swap(true, Ordering::SeqCst);
                timer.cancellation_token.cancel();
                was_waiting
            }
            None => false,
        }
    }

    /// True while an action is scheduled but its delay has not elapsed.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|timer| {
            !timer.settled.load(Ordering::SeqCst) && !timer.handle.is_finished()
        })
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn FnOnce() + Send>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let make = move |value: &str| {
            let sink = sink.clone();
            let value = value.to_string();
            Box::new(move || sink.lock().unwrap().push(value)) as Box<dyn FnOnce() + Send>
        };
        (fired, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_action_fires() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new();
        let delay = Duration::from_millis(500);

        for value in ["a", "ab", "abc"] {
            let action = make(value);
            debouncer.schedule(async move { action() }, delay);
            sleep(Duration::from_millis(30)).await;
        }

        sleep(Duration::from_millis(600)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["abc".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_waits_for_full_delay() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new();

        let action = make("x");
        debouncer.schedule(async move { action() }, Duration::from_millis(400));
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(399)).await;
        assert!(fired.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.lock().unwrap().len(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_action() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new();

        let action = make("x");
        debouncer.schedule(async move { action() }, Duration::from_millis(100));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        sleep(Duration::from_millis(200)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_action_is_not_interrupted_by_reschedule() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new();

        let slow = make("slow");
        debouncer.schedule(
            async move {
                sleep(Duration::from_millis(1000)).await;
                slow();
            },
            Duration::from_millis(100),
        );

        sleep(Duration::from_millis(150)).await;
        assert!(!debouncer.is_pending());
        // Already settled: nothing left to cancel
        assert!(!debouncer.cancel());

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["slow".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_at_deadline_never_runs_action() {
        let (fired, make) = recorder();
        let mut debouncer = Debouncer::new();
        let mut cancelled = 0;

        for i in 0..50 {
            let action = make(&i.to_string());
            debouncer.schedule(async move { action() }, Duration::from_millis(1));
            std::thread::sleep(Duration::from_millis(1));
            if debouncer.cancel() {
                cancelled += 1;
            }
        }

        sleep(Duration::from_millis(20)).await;
        assert_eq!(fired.lock().unwrap().len(), 50 - cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_action() {
        let (fired, make) = recorder();
        {
            let mut debouncer = Debouncer::new();
            let action = make("x");
            debouncer.schedule(async move { action() }, Duration::from_millis(100));
        }
        sleep(Duration::from_millis(200)).await;
        assert!(fired.lock().unwrap().is_empty());
    }
}
