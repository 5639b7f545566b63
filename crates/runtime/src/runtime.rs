//! Tick driver.
//!
//! The runtime owns the scheduler and the context and advances them one
//! tick at a time. Each tick runs three phases in order: sensing
//! ([`BotContext::begin_tick`]), one scheduler evaluation, and diagnostics
//! publication. Everything happens on the calling thread; bounded waits
//! inside tasks block it.

use std::time::Duration;

use serde::Serialize;
use task_scheduler::{Scheduler, TickResult};
use tracing::{debug, info};

use crate::api::{Diagnostics, DiagnosticsSink, Result, RuntimeError, TracingSink};
use crate::context::BotContext;
use crate::presets::TaskList;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Pause after a tick in which no task activated.
    pub idle_backoff_ms: u64,
    /// Stop after this many ticks (unbounded when `None`).
    pub max_ticks: Option<u64>,
}

impl RuntimeConfig {
    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            idle_backoff_ms: 600,
            max_ticks: None,
        }
    }
}

/// Outcome of [`Runtime::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    /// Simulated or wall time covered by the run.
    pub elapsed_ms: u64,
    pub stop_reason: Option<String>,
    pub diagnostics: Diagnostics,
}

impl RunSummary {
    pub fn stopped(&self) -> bool {
        self.stop_reason.is_some()
    }
}

pub struct Runtime {
    config: RuntimeConfig,
    scheduler: Scheduler<BotContext>,
    context: BotContext,
    sink: Box<dyn DiagnosticsSink>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn context(&self) -> &BotContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut BotContext {
        &mut self.context
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Task names in priority order.
    pub fn task_names(&self) -> Vec<&'static str> {
        self.scheduler.task_names().collect()
    }

    /// Runs a single tick.
    ///
    /// Returns [`RuntimeError::Stopped`] when a task ended the run, either
    /// during this tick or an earlier one.
    pub fn step(&mut self) -> Result<TickResult> {
        if let Some(reason) = self.context.stop_reason() {
            return Err(RuntimeError::Stopped {
                reason: reason.clone(),
            });
        }

        self.context.begin_tick();
        let result = self.scheduler.tick(&mut self.context);
        self.context.set_current_task(result.task_name());
        if result.is_idle() {
            self.context.counters.idle_ticks += 1;
        }

        self.sink.publish(&self.context.diagnostics());

        match self.context.stop_reason() {
            Some(reason) => Err(RuntimeError::Stopped {
                reason: reason.clone(),
            }),
            None => Ok(result),
        }
    }

    /// Ticks until a task stops the run or `max_ticks` is reached.
    ///
    /// A stop requested by a task is a normal end of the run and is reported
    /// in the summary rather than as an error.
    pub fn run(&mut self) -> Result<RunSummary> {
        let started = self.context.now();
        let mut ticks = 0;
        info!(tasks = ?self.task_names(), "run started");

        loop {
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                info!(ticks, "tick limit reached");
                break;
            }

            match self.step() {
                Ok(result) => {
                    ticks += 1;
                    if result.is_idle() {
                        debug!("no task activated, backing off");
                        self.context.clock.sleep(self.config.idle_backoff());
                    }
                }
                Err(RuntimeError::Stopped { .. }) => {
                    ticks += 1;
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        let diagnostics = self.context.diagnostics();
        let summary = RunSummary {
            ticks,
            elapsed_ms: self.context.now().elapsed_since(started).as_millis() as u64,
            stop_reason: diagnostics.stop_reason.clone(),
            diagnostics,
        };
        info!(
            ticks = summary.ticks,
            worked = summary.diagnostics.counters.nodes_worked,
            retreats = summary.diagnostics.counters.retreats,
            stopped = summary.stopped(),
            "run finished"
        );
        Ok(summary)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    tasks: TaskList,
    sink: Option<Box<dyn DiagnosticsSink>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            tasks: Vec::new(),
            sink: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Ordered task list, highest priority first
    pub fn tasks(mut self, tasks: TaskList) -> Self {
        self.tasks = tasks;
        self
    }

    /// Diagnostics sink (defaults to [`TracingSink`])
    pub fn sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self, context: BotContext) -> Result<Runtime> {
        if self.tasks.is_empty() {
            return Err(RuntimeError::NoTasks);
        }

        Ok(Runtime {
            config: self.config,
            scheduler: Scheduler::new(self.tasks),
            context,
            sink: self.sink.unwrap_or_else(|| Box::new(TracingSink)),
        })
    }
}
