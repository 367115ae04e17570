//! Virtual-clock deadlines for the hide, invulnerability and capture windows

/// Instant (in simulation milliseconds) at which a window closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    until_ms: Option<u64>,
}

impl Deadline {
    /// Arm for `duration_ms` from `now_ms`, replacing any outstanding deadline
    pub fn arm(&mut self, now_ms: u64, duration_ms: u64) {
        self.until_ms = Some(now_ms.saturating_add(duration_ms));
    }

    pub fn cancel(&mut self) {
        self.until_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.until_ms.is_some()
    }

    /// Disarm and report true once `now_ms` has reached the deadline
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.until_ms {
            Some(until) if now_ms >= until => {
                self.until_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// The three timed windows of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub hide: Deadline,
    pub invulnerability: Deadline,
    pub capture: Deadline,
}

impl Timers {
    pub fn cancel_all(&mut self) {
        self.hide.cancel();
        self.invulnerability.cancel();
        self.capture.cancel();
    }
}
