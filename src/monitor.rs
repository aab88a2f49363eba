use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use std::thread::{self, JoinHandle};
use std::time;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, trace};

use super::collector::CollectionResult;
use super::simulator::Simulator;

// Results the monitor will hold on to before dropping new ones.
const RESULT_BACKLOG: usize = 64;

/// A [`Simulator`] behind a single lock.
///
/// Every call runs to completion while holding the lock, so a collection is
/// never observed half done.
#[derive(Clone, Debug)]
pub struct SharedSimulator {
    inner: Arc<Mutex<Simulator>>,
}

impl SharedSimulator {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulator)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Simulator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Simulator) -> R,
    {
        f(&mut self.lock())
    }
}

// The monitor is responsible for automatically triggering garbage collections.
// It polls the simulator's auto collect check on a fixed cadence and hands
// every collection it causes to whoever is listening on `results`.
pub struct Monitor {
    simulator: SharedSimulator,

    flag: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,

    sender: Sender<CollectionResult>,
    receiver: Receiver<CollectionResult>,

    wait_duration: u64,
}

impl Monitor {
    pub fn new(simulator: SharedSimulator) -> Self {
        let wait_duration = simulator.with(|sim| sim.monitor_wait_time());
        let (sender, receiver) = bounded(RESULT_BACKLOG);

        Self {
            simulator,
            flag: AtomicBool::new(false),
            handle: Mutex::new(None),
            sender,
            receiver,
            wait_duration,
        }
    }

    pub fn results(&self) -> Receiver<CollectionResult> {
        self.receiver.clone()
    }

    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Blocks until the polling thread has exited.
    pub fn stop(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);

        self.flag.store(false, Ordering::Relaxed);

        if let Some(handle) = handle.take() {
            // a panicking poll has nothing left to clean up
            let _ = handle.join();
        }
    }

    pub fn start(self: Arc<Self>) {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);

        if self
            .flag
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        let monitor = self.clone();
        *handle = Some(thread::spawn(move || monitor.monitor()));
    }

    fn monitor(&self) {
        debug!("monitor started");

        loop {
            self.sleep();

            if self.should_stop_monitoring() {
                break;
            }

            self.test_trigger();
        }

        debug!("monitor stopped");
    }

    fn test_trigger(&self) {
        let Some(result) = self.simulator.with(Simulator::check_auto_collect) else {
            return;
        };

        if let Err(TrySendError::Full(_)) = self.sender.try_send(result) {
            trace!("monitor backlog full, dropping collection result");
        }
    }

    fn should_stop_monitoring(&self) -> bool {
        !self.flag.load(Ordering::Relaxed)
    }

    fn sleep(&self) {
        let duration = time::Duration::from_millis(self.wait_duration);

        thread::sleep(duration);
    }
}
