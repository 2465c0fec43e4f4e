use std::time::{Duration, Instant};

pub trait Stopper {
    fn stop(&self) -> bool;
    fn init(&mut self);
}

/// Cooperative wall-clock budget. Long running searches poll `stop` between steps; a timer
/// without a budget only stops on Ctrl-C (with the `handle-ctrlc` feature).
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start: Instant,
    budget: Option<Duration>,
}

impl Timer {
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self::new(Some(budget))
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left until the budget runs out, `None` for an unlimited timer.
    pub fn remaining(&self) -> Option<Duration> {
        self.budget
            .map(|budget| budget.checked_sub(self.elapsed()).unwrap_or_default())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Stopper for Timer {
    fn stop(&self) -> bool {
        #[cfg(feature = "handle-ctrlc")]
        {
            if crate::signals::received_ctrl_c() {
                return true;
            }
        }
        match self.budget {
            Some(budget) => self.start.elapsed() >= budget,
            None => false,
        }
    }

    fn init(&mut self) {
        self.start = Instant::now();
    }
}
