//! Result of a single scheduler tick.

/// What the scheduler did during one tick.
///
/// # Tick Semantics
///
/// Every tick either runs exactly one task or runs nothing:
/// - `Idle`: No task activated; the caller should back off and poll again
/// - `Ran`: The named task activated and its `execute` was called once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickResult {
    /// No task activated this tick.
    Idle,

    /// A task activated and was executed.
    Ran {
        /// Name of the task that ran.
        task: &'static str,
        /// The value returned by `execute` ("did meaningful work").
        ///
        /// This is informational only and never feeds back into scheduling.
        progressed: bool,
    },
}

impl TickResult {
    /// Returns `true` if a task ran this tick.
    #[inline]
    pub fn ran(self) -> bool {
        matches!(self, TickResult::Ran { .. })
    }

    /// Returns `true` if nothing ran this tick.
    #[inline]
    pub fn is_idle(self) -> bool {
        matches!(self, TickResult::Idle)
    }

    /// Name of the task that ran, if any.
    #[inline]
    pub fn task_name(self) -> Option<&'static str> {
        match self {
            TickResult::Ran { task, .. } => Some(task),
            TickResult::Idle => None,
        }
    }

    /// Returns `true` if a task ran and reported meaningful work.
    #[inline]
    pub fn progressed(self) -> bool {
        matches!(
            self,
            TickResult::Ran {
                progressed: true,
                ..
            }
        )
    }
}
