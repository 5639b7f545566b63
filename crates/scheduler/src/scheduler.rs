//! Priority scheduler.
//!
//! The [`Scheduler`] holds an ordered list of tasks and, once per tick, runs
//! the first one whose predicate is true. It behaves like a selector node
//! that stops at the first *activated* child rather than the first
//! successful one: whether `execute` made progress does not matter.

use crate::{Task, TickResult};

/// Runs at most one task per tick, chosen by list position.
///
/// # Semantics
///
/// On each [`tick`](Scheduler::tick) the scheduler scans tasks from index 0
/// upward:
/// - The first task whose `activate` returns `true` is executed, then the
///   tick ends immediately
/// - Tasks after it are neither executed nor asked to activate
/// - If no task activates, the tick returns [`TickResult::Idle`]
///
/// Priority is the list position: inserting a behavior at the right
/// urgency is a list insertion. There is no preemption, weighting or
/// fairness.
pub struct Scheduler<C> {
    tasks: Vec<Box<dyn Task<C>>>,
}

impl<C> Scheduler<C> {
    /// Creates a scheduler with the given tasks, highest priority first.
    ///
    /// An empty list is allowed; such a scheduler always returns `Idle`.
    pub fn new(tasks: Vec<Box<dyn Task<C>>>) -> Self {
        Self { tasks }
    }

    /// Replaces the task list with a new ordered list.
    pub fn register_tasks(&mut self, tasks: Vec<Box<dyn Task<C>>>) {
        self.tasks = tasks;
    }

    /// Inserts a task at `index` (0 = highest priority).
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, task: Box<dyn Task<C>>) {
        self.tasks.insert(index, task);
    }

    /// Appends a task at the lowest priority.
    pub fn push(&mut self, task: Box<dyn Task<C>>) {
        self.tasks.push(task);
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no tasks are registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task names in priority order (for debugging and diagnostics).
    pub fn task_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.iter().map(|t| t.name())
    }

    /// Evaluates one tick against the context.
    pub fn tick(&mut self, ctx: &mut C) -> TickResult {
        // First activated task wins
        let Some(index) = self.tasks.iter().position(|t| t.activate(ctx)) else {
            return TickResult::Idle;
        };

        let task = &mut self.tasks[index];
        let progressed = task.execute(ctx);
        TickResult::Ran {
            task: task.name(),
            progressed,
        }
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnTask;

    #[derive(Default)]
    struct TestContext {
        value: i32,
        log: Vec<&'static str>,
    }

    struct Increment;
    impl Task<TestContext> for Increment {
        fn name(&self) -> &'static str {
            "increment"
        }
        fn activate(&self, _ctx: &TestContext) -> bool {
            true
        }
        fn execute(&mut self, ctx: &mut TestContext) -> bool {
            ctx.value += 1;
            ctx.log.push("increment");
            true
        }
    }

    struct Decrement;
    impl Task<TestContext> for Decrement {
        fn name(&self) -> &'static str {
            "decrement"
        }
        fn activate(&self, _ctx: &TestContext) -> bool {
            true
        }
        fn execute(&mut self, ctx: &mut TestContext) -> bool {
            ctx.value -= 1;
            ctx.log.push("decrement");
            true
        }
    }

    struct Never;
    impl Task<TestContext> for Never {
        fn name(&self) -> &'static str {
            "never"
        }
        fn activate(&self, _ctx: &TestContext) -> bool {
            false
        }
        fn execute(&mut self, ctx: &mut TestContext) -> bool {
            ctx.log.push("never");
            true
        }
    }

    #[test]
    fn first_activated_task_wins() {
        let mut scheduler = Scheduler::new(vec![
            Box::new(Never),
            Box::new(Increment),
            Box::new(Decrement), // Should not execute
        ]);

        let mut ctx = TestContext::default();
        let result = scheduler.tick(&mut ctx);

        assert_eq!(
            result,
            TickResult::Ran {
                task: "increment",
                progressed: true
            }
        );
        assert_eq!(ctx.value, 1);
        assert_eq!(ctx.log, vec!["increment"]);
    }

    #[test]
    fn idle_when_nothing_activates() {
        let mut scheduler = Scheduler::new(vec![Box::new(Never), Box::new(Never)]);

        let mut ctx = TestContext::default();
        assert_eq!(scheduler.tick(&mut ctx), TickResult::Idle);
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn empty_scheduler_is_idle() {
        let mut scheduler: Scheduler<TestContext> = Scheduler::default();
        let mut ctx = TestContext::default();
        assert!(scheduler.tick(&mut ctx).is_idle());
    }

    #[test]
    fn exactly_one_execution_per_tick() {
        let mut scheduler = Scheduler::new(vec![Box::new(Increment), Box::new(Decrement)]);

        let mut ctx = TestContext::default();
        for _ in 0..25 {
            scheduler.tick(&mut ctx);
        }

        assert_eq!(ctx.log.len(), 25);
        assert!(ctx.log.iter().all(|name| *name == "increment"));
        assert_eq!(ctx.value, 25);
    }

    #[test]
    fn unproductive_execute_is_not_retried_within_tick() {
        let mut scheduler = Scheduler::new(vec![
            Box::new(FnTask::new(
                "stalled",
                |_: &TestContext| true,
                |ctx: &mut TestContext| {
                    ctx.log.push("stalled");
                    false
                },
            )) as Box<dyn Task<TestContext>>,
            Box::new(Increment),
        ]);

        let mut ctx = TestContext::default();
        let result = scheduler.tick(&mut ctx);

        assert_eq!(result.task_name(), Some("stalled"));
        assert!(!result.progressed());
        assert_eq!(ctx.log, vec!["stalled"]);
    }

    #[test]
    fn insert_changes_priority() {
        let mut scheduler = Scheduler::new(vec![Box::new(Increment)]);
        scheduler.insert(0, Box::new(Decrement));

        let names: Vec<_> = scheduler.task_names().collect();
        assert_eq!(names, vec!["decrement", "increment"]);

        let mut ctx = TestContext::default();
        scheduler.tick(&mut ctx);
        assert_eq!(ctx.value, -1);
    }

    #[test]
    fn predicates_see_fresh_state_every_tick() {
        let mut scheduler = Scheduler::new(vec![
            Box::new(FnTask::new(
                "cap",
                |ctx: &TestContext| ctx.value >= 2,
                |ctx: &mut TestContext| {
                    ctx.log.push("cap");
                    true
                },
            )) as Box<dyn Task<TestContext>>,
            Box::new(Increment),
        ]);

        let mut ctx = TestContext::default();
        let ran: Vec<_> = (0..4)
            .filter_map(|_| scheduler.tick(&mut ctx).task_name())
            .collect();

        assert_eq!(ran, vec!["increment", "increment", "cap", "cap"]);
    }
}
