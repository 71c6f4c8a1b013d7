//! Runs collectors forever on jittered intervals.
//!
//! Every task gets its own tokio task. A pass always runs to completion before the next delay is
//! drawn, so a task never overlaps itself and missed ticks are not queued. Cancellation is only
//! observed between passes.

use crate::collectors::Collector;
use mongo_exporter_config::TaskSchedule;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A collector together with its cadence.
pub struct ScheduledTask {
    pub name: &'static str,
    pub schedule: TaskSchedule,
    pub collector: Box<dyn Collector>,
}

impl ScheduledTask {
    pub fn new(schedule: TaskSchedule, collector: Box<dyn Collector>) -> Self {
        Self {
            name: collector.name(),
            schedule,
            collector,
        }
    }
}

/// Uniform delay in `[min_interval, max_interval]` at millisecond resolution.
pub fn jittered_delay(schedule: &TaskSchedule) -> Duration {
    let min = schedule.min_interval.as_millis() as u64;
    let max = (schedule.max_interval.as_millis() as u64).max(min);
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

/// Sleeps for `delay` unless cancelled first. Returns whether the full delay elapsed.
async fn wait(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Spawns the task's loop and returns immediately.
pub fn start_task(task: ScheduledTask, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(run_task(task, cancel))
}

async fn run_task(task: ScheduledTask, cancel: CancellationToken) {
    let ScheduledTask {
        name,
        schedule,
        mut collector,
    } = task;
    info!(
        task = name,
        min_interval = ?schedule.min_interval,
        max_interval = ?schedule.max_interval,
        "Task started"
    );

    if !schedule.run_immediately && !wait(&cancel, jittered_delay(&schedule)).await {
        debug!(task = name, "Task stopped before its first pass");
        return;
    }

    while !cancel.is_cancelled() {
        match collector.collect().await {
            Ok(()) => debug!(task = name, "Pass completed"),
            Err(error) => warn!(task = name, %error, "Pass failed"),
        }

        if !wait(&cancel, jittered_delay(&schedule)).await {
            break;
        }
    }

    debug!(task = name, "Task stopped");
}

/// Ordered registration list started with a fixed stagger between tasks.
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    stagger: Duration,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(cancel: CancellationToken, stagger: Duration) -> Self {
        Self {
            tasks: Vec::new(),
            stagger,
            cancel,
        }
    }

    pub fn register(&mut self, task: ScheduledTask) -> &mut Self {
        self.tasks.push(task);
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Starts tasks in registration order. The handle resolves once every task has stopped.
    pub fn start(self) -> JoinHandle<()> {
        let Self { tasks, stagger, cancel } = self;

        tokio::spawn(async move {
            let mut handles = Vec::with_capacity(tasks.len());
            for (index, task) in tasks.into_iter().enumerate() {
                if index > 0 && !wait(&cancel, stagger).await {
                    break;
                }
                handles.push(start_task(task, cancel.clone()));
            }

            for handle in handles {
                if let Err(err) = handle.await {
                    error!(%err, "Task aborted");
                }
            }
        })
    }
}
