//! Real-time scheduling helpers
//!
//! Everything here is driven by an explicit `now` in milliseconds, so the
//! owner decides which clock to use and can cancel all pending work at once.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<T> {
    id: TaskId,
    due_ms: f64,
    payload: T,
}

/// Cancellable one-shot timers
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `payload` once `now >= due_ms`
    pub fn schedule(&mut self, due_ms: f64, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due_ms,
            payload,
        });
        id
    }

    /// Returns whether the task was still pending
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Remove and return every due task, earliest first (ties in schedule order)
    pub fn poll(&mut self, now_ms: f64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.due_ms <= now_ms);
        self.tasks = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|t| t.payload).collect()
    }
}

/// Fixed-period sampler
///
/// Fires at most once per call no matter how many periods were missed.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    next_ms: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_ms: None,
        }
    }

    /// Whether a sample is due; the first call always fires
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.next_ms {
            Some(next) if now_ms < next => false,
            _ => {
                self.next_ms = Some(now_ms + self.period_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.next_ms = None;
    }
}

/// Fixed timestep accumulator
///
/// Converts variable display frame times into whole simulation steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt_ms: f64,
    max_steps: u32,
    accumulator: f64,
    last_ms: Option<f64>,
}

impl FixedTimestep {
    pub fn new(dt_ms: f64, max_steps: u32) -> Self {
        Self {
            dt_ms,
            max_steps,
            accumulator: 0.0,
            last_ms: None,
        }
    }

    /// Feed the current time; returns how many steps to run. Backlog beyond
    /// `max_steps` is dropped rather than replayed.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let elapsed = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => self.dt_ms,
        };
        self.last_ms = Some(now_ms);

        self.accumulator = (self.accumulator + elapsed).min(self.dt_ms * self.max_steps as f64);
        let steps = (self.accumulator / self.dt_ms).floor() as u32;
        self.accumulator -= steps as f64 * self.dt_ms;
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_ms = None;
    }
}
