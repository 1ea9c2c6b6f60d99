/// Debounced inactivity timer.
///
/// Timestamps are milliseconds on whatever monotonic clock the caller
/// drives the chain with. The timer fires at most once per `restart`.
#[derive(Debug, Clone)]
pub struct IdleTimer {
    timeout_ms: f64,
    deadline: Option<f64>,
}

impl IdleTimer {
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            timeout_ms: timeout_ms.max(0.0),
            deadline: None,
        }
    }

    /// Cancel any pending deadline and arm a new one at `now + timeout`.
    pub fn restart(&mut self, now_ms: f64) {
        self.cancel();
        self.deadline = Some(now_ms + self.timeout_ms);
    }

    /// Disarm the timer. Safe to call when already disarmed.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once when `now` reaches the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn timeout_ms(&self) -> f64 {
        self.timeout_ms
    }
}
