//! Recurring Tick Scheduling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Callback run on every tick
pub type Task = Box<dyn FnMut() + Send + 'static>;

/// Runs a task repeatedly at a fixed interval until its handle is cancelled
pub trait Scheduler {
    type Handle: TaskHandle;

    fn schedule(&mut self, interval: Duration, task: Task) -> Self::Handle;
}

/// Cancels a scheduled task. Once `cancel` returns no callback is running
/// and none will start.
pub trait TaskHandle {
    fn cancel(&self);
    fn is_cancelled(&self) -> bool;
}

#[derive(Debug, Clone, Default)]
struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Cancellation state held while a callback runs, so `cancel` waits for an
/// in-flight callback on another worker to finish
#[derive(Debug, Clone, Default)]
struct RunGate(Arc<Mutex<bool>>);

impl RunGate {
    /// Run `task` unless cancelled. Returns false once cancelled.
    fn run(&self, task: &mut Task) -> bool {
        let cancelled = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *cancelled {
            return false;
        }
        task();
        true
    }

    fn close(&self) -> bool {
        let mut cancelled = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        !std::mem::replace(&mut *cancelled, true)
    }

    fn is_closed(&self) -> bool {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scheduler backed by `tokio::time::interval`
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler on the runtime of the calling task
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTaskHandle;

    fn schedule(&mut self, interval: Duration, mut task: Task) -> TokioTaskHandle {
        let interval = interval.max(Duration::from_millis(1));
        let gate = RunGate::default();
        let task_gate = gate.clone();

        info!("Scheduling task every {:?}", interval);
        let join = self.runtime.spawn(async move {
            // First tick one full interval after scheduling
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !task_gate.run(&mut task) {
                    break;
                }
            }
            debug!("Scheduled task stopped");
        });

        TokioTaskHandle { gate, join }
    }
}

/// Handle to a tokio-scheduled task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TokioTaskHandle {
    gate: RunGate,
    join: JoinHandle<()>,
}

impl TaskHandle for TokioTaskHandle {
    /// Blocks while a callback is running on another worker
    fn cancel(&self) {
        if self.gate.close() {
            info!("Cancelling scheduled task");
        }
        self.join.abort();
    }

    fn is_cancelled(&self) -> bool {
        self.gate.is_closed()
    }
}

impl Drop for TokioTaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct ManualEntry {
    interval: Duration,
    elapsed: Duration,
    task: Task,
    cancelled: CancelFlag,
}

/// Scheduler advanced by hand, for driving ticks without waiting
#[derive(Default)]
pub struct ManualScheduler {
    entries: Vec<ManualEntry>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live task `ticks` times
    pub fn advance(&mut self, ticks: usize) {
        for _ in 0..ticks {
            for entry in self.entries.iter_mut() {
                if !entry.cancelled.is_set() {
                    (entry.task)();
                }
            }
        }
        self.prune();
    }

    /// Let `by` elapse, running each live task once per whole interval
    pub fn advance_by(&mut self, by: Duration) {
        for entry in self.entries.iter_mut() {
            entry.elapsed += by;
            while entry.elapsed >= entry.interval && !entry.cancelled.is_set() {
                entry.elapsed -= entry.interval;
                (entry.task)();
            }
        }
        self.prune();
    }

    /// Number of tasks not yet cancelled
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.cancelled.is_set()).count()
    }

    fn prune(&mut self) {
        self.entries.retain(|e| !e.cancelled.is_set());
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTaskHandle;

    fn schedule(&mut self, interval: Duration, task: Task) -> ManualTaskHandle {
        let cancelled = CancelFlag::default();
        self.entries.push(ManualEntry {
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            task,
            cancelled: cancelled.clone(),
        });
        ManualTaskHandle { cancelled }
    }
}

/// Handle to a manually scheduled task. Dropping it cancels the task.
#[derive(Debug)]
pub struct ManualTaskHandle {
    cancelled: CancelFlag,
}

impl TaskHandle for ManualTaskHandle {
    fn cancel(&self) {
        self.cancelled.set();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.is_set()
    }
}

impl Drop for ManualTaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
