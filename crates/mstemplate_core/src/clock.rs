//! Time source abstraction.
//!
//! Callers that stamp records or responses take a `Clock` so tests can pin
//! the current time.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, SystemClock};
    use chrono::Utc;

    #[test]
    fn system_clock_is_not_behind_wall_clock() {
        let before = Utc::now();
        assert!(SystemClock.now() >= before);
    }
}
