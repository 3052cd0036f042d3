//! Periodic refresh tick.
//!
//! A background thread sends one [`Tick`] per period on an mpsc channel; the
//! receiving side recomputes display views via `Tracker::refresh` and
//! renders. The tick path performs no I/O and never touches the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Fixed tick period in milliseconds. Not configurable at runtime.
pub const TICK_MS: u64 = 1000;

/// Granularity of the stop-flag check inside one period, so `stop()` never
/// waits out a full tick.
const STOP_POLL_MS: u64 = 25;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_MS)
}

/// Marker message sent once per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Cancellable periodic ticker. Stops on [`Ticker::stop`], on drop, or when
/// the receiving end hangs up.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns the tick thread. The first tick is sent immediately so a fresh
    /// display never waits a full period.
    pub fn start(tx: Sender<Tick>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                if tx.send(Tick).is_err() {
                    break;
                }
                let mut waited = 0;
                while waited < TICK_MS && !flag.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(STOP_POLL_MS));
                    waited += STOP_POLL_MS;
                }
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Cancels the tick and waits for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Instant;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn first_tick_arrives_immediately_and_stop_is_prompt() {
        let (tx, rx) = channel();
        let ticker = Ticker::start(tx);
        rx.recv_timeout(Duration::from_millis(500))
            .expect("first tick should not wait a full period");

        let begin = Instant::now();
        ticker.stop();
        assert!(begin.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn dropping_the_receiver_ends_the_thread() {
        let (tx, rx) = channel();
        let ticker = Ticker::start(tx);
        drop(rx);
        // stop() joins; a thread stuck sending would hang this call
        ticker.stop();
    }
}
