use parking_lot::{Condvar, Mutex, MutexGuard};

use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A background thread that calls a sweep function once per period until it is stopped.
///
/// Waiting happens on a condvar rather than a plain sleep so [`Reaper::stop`]
/// wakes the thread immediately instead of after the current period.
pub(crate) struct Reaper {
    signal: Arc<Signal>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

struct Signal {
    stopped: Mutex<bool>,
    cvar: Condvar,
}

impl Reaper {
    /// Spawn the reaper thread
    ///
    /// The sweep may return [`ControlFlow::Break`] to end the loop on its own,
    /// for example once the state it sweeps has been dropped.
    pub(crate) fn spawn<F>(period: Duration, sweep: F) -> std::io::Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let signal = Arc::new(Signal {
            stopped: Mutex::new(false),
            cvar: Condvar::new(),
        });

        let handle = thread::Builder::new()
            .name("ttl-map-reaper".into())
            .spawn({
                let signal = signal.clone();
                move || run(&signal, period, sweep)
            })?;

        Ok(Reaper {
            signal,
            handle: Mutex::new(Some(handle)),
        })
    }

    pub(crate) fn is_stopped(&self) -> bool {
        *self.signal.stopped.lock()
    }

    /// Signal the thread to exit and wait for it, calling this more than once is a no-op
    pub(crate) fn stop(&self) {
        {
            let mut stopped = self.signal.stopped.lock();
            *stopped = true;
            self.signal.cvar.notify_all();
        }

        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("reaper thread panicked");
            }
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<F>(signal: &Signal, period: Duration, mut sweep: F)
where
    F: FnMut() -> ControlFlow<()>,
{
    tracing::trace!(?period, "reaper started");

    let mut stopped = signal.stopped.lock();
    while !*stopped {
        match Instant::now().checked_add(period) {
            Some(deadline) => {
                // loop to ride out spurious wakeups
                while !*stopped && !signal.cvar.wait_until(&mut stopped, deadline).timed_out() {}
            }
            None => signal.cvar.wait(&mut stopped),
        }

        if *stopped {
            break;
        }

        // release the flag while sweeping so stop() never waits on the map lock
        if MutexGuard::unlocked(&mut stopped, &mut sweep).is_break() {
            break;
        }
    }

    tracing::trace!("reaper stopped");
}
