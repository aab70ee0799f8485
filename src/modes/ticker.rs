use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// The periodic tick source driving a session.
///
/// The interval is never adjusted in place: when the session reports a new
/// tick epoch, the old interval is dropped and a fresh one installed, so no
/// tick scheduled under a previous speed can fire afterwards.
pub struct TickSource {
    interval: Interval,
    epoch: u64,
    period: Duration,
}

impl TickSource {
    pub fn new(epoch: u64, period: Duration) -> Self {
        Self {
            interval: Self::install(period),
            epoch,
            period,
        }
    }

    fn install(period: Duration) -> Interval {
        // First tick one full period from now, as a freshly started timer would
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Replace the interval if `epoch` moved on. Returns true when replaced.
    pub fn sync(&mut self, epoch: u64, period: Duration) -> bool {
        if epoch == self.epoch {
            return false;
        }
        self.interval = Self::install(period);
        self.epoch = epoch;
        self.period = period;
        tracing::trace!(epoch, period_ms = period.as_millis() as u64, "tick source replaced");
        true
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
