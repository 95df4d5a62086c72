use super::*;

pub type TimerId = i64;

/// A delayed visual step. Every action names the node it touches so it can
/// existence-check before mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Filter reveal: `aos-animate` plus a bar re-render on a shown card.
    RevealBenchmarkCard(NodeId),
    /// Filter hide: take a faded-out card out of layout flow.
    CollapseBenchmarkCard(NodeId),
    /// Recommendation swap: show the matching result card.
    ActivateResultCard(NodeId),
    /// Staggered hero entrance after page load.
    AnimateHeroElement(NodeId),
    /// Easter egg: start the notification's exit animation.
    DismissNotification(NodeId),
    /// Drop a transient node (ripple, notification).
    RemoveNode(NodeId),
}

impl DeferredAction {
    pub fn target(&self) -> NodeId {
        match self {
            Self::RevealBenchmarkCard(node)
            | Self::CollapseBenchmarkCard(node)
            | Self::ActivateResultCard(node)
            | Self::AnimateHeroElement(node)
            | Self::DismissNotification(node)
            | Self::RemoveNode(node) => *node,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::RevealBenchmarkCard(_) => "reveal_benchmark_card",
            Self::CollapseBenchmarkCard(_) => "collapse_benchmark_card",
            Self::ActivateResultCard(_) => "activate_result_card",
            Self::AnimateHeroElement(_) => "animate_hero_element",
            Self::DismissNotification(_) => "dismiss_notification",
            Self::RemoveNode(_) => "remove_node",
        }
    }
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    id: TimerId,
    due_at: i64,
    order: i64,
    action: DeferredAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: i64,
    pub order: i64,
    pub action: DeferredAction,
}

/// Virtual-clock timer queue. Tasks run in (due time, scheduling order).
#[derive(Debug)]
pub struct TimerQueue {
    tasks: Vec<ScheduledTask>,
    now_ms: i64,
    step_limit: usize,
    next_timer_id: TimerId,
    next_task_order: i64,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            now_ms: 0,
            step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }
}

impl TimerQueue {
    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn set_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Config(
                "timer step limit requires at least 1 step".into(),
            ));
        }
        self.step_limit = max_steps;
        Ok(())
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    pub fn schedule(&mut self, delay_ms: i64, action: DeferredAction) -> TimerId {
        let delay_ms = delay_ms.max(0);
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            action,
        });
        id
    }

    /// Returns whether a pending timer was removed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cleared = self.tasks.len();
        self.tasks.clear();
        cleared
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .tasks
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                action: task.action.clone(),
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn set_now(&mut self, now_ms: i64) {
        self.now_ms = now_ms;
    }

    /// Removes the next task due at or before `due_limit` (any task if `None`).
    /// When `advance_clock` is set the clock jumps to the task's due time.
    pub(crate) fn pop_next(
        &mut self,
        due_limit: Option<i64>,
        advance_clock: bool,
    ) -> Option<PendingTimer> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)?;
        let task = self.tasks.remove(idx);
        if advance_clock && task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        Some(PendingTimer {
            id: task.id,
            due_at: task.due_at,
            order: task.order,
            action: task.action,
        })
    }

    pub(crate) fn step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        Error::TimerStepLimit(format!(
            "limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}",
            self.step_limit,
            self.now_ms,
            self.tasks.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_next_orders_by_due_time_then_schedule_order() {
        let mut queue = TimerQueue::default();
        let late = queue.schedule(300, DeferredAction::CollapseBenchmarkCard(NodeId(1)));
        let early = queue.schedule(50, DeferredAction::RevealBenchmarkCard(NodeId(2)));
        let tie = queue.schedule(50, DeferredAction::RevealBenchmarkCard(NodeId(3)));

        let order = std::iter::from_fn(|| queue.pop_next(None, true))
            .map(|timer| timer.id)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![early, tie, late]);
        assert_eq!(queue.now_ms(), 300);
    }

    #[test]
    fn due_limit_leaves_future_tasks_pending() {
        let mut queue = TimerQueue::default();
        queue.schedule(100, DeferredAction::ActivateResultCard(NodeId(1)));
        queue.schedule(600, DeferredAction::RemoveNode(NodeId(2)));
        queue.set_now(150);
        assert!(queue.pop_next(Some(150), false).is_some());
        assert!(queue.pop_next(Some(150), false).is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.now_ms(), 150);
    }

    #[test]
    fn cancel_reports_whether_a_timer_was_pending() {
        let mut queue = TimerQueue::default();
        let id = queue.schedule(600, DeferredAction::RemoveNode(NodeId(4)));
        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.is_empty());
    }

    #[test]
    fn negative_delay_is_clamped_to_now() {
        let mut queue = TimerQueue::default();
        queue.set_now(40);
        queue.schedule(-10, DeferredAction::RemoveNode(NodeId(1)));
        assert_eq!(queue.pending()[0].due_at, 40);
    }

    #[test]
    fn zero_step_limit_is_rejected() {
        let mut queue = TimerQueue::default();
        assert!(matches!(queue.set_step_limit(0), Err(Error::Config(_))));
        assert!(queue.set_step_limit(5).is_ok());
        assert_eq!(queue.step_limit(), 5);
    }
}
