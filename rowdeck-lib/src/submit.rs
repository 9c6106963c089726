//! Simulated submit latency
//!
//! The original design holds every commit back by a fixed interval to fake
//! asynchronous persistence, with the triggering control disabled while the
//! commit is in flight. Here that is an explicit asynchronous step with a
//! pluggable duration: the shell starts at most one [`PendingCommit`] per
//! modal, polls or awaits its completion, and cancels the whole commit by
//! dropping it before the deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio::time::sleep_until;

use crate::store::StoreCommand;

/// Latency applied to form submissions by default.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(2);

/// Pluggable commit latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitDelay {
    duration: Duration,
}

impl SubmitDelay {
    /// Delay of the given duration.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// The configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Starts the latency task for one command.
    pub fn start(&self, command: StoreCommand) -> PendingCommit {
        PendingCommit {
            command,
            deadline: Instant::now() + self.duration,
        }
    }
}

impl Default for SubmitDelay {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

/// A submission waiting out its latency.
///
/// Dropping the value before the deadline abandons the commit; nothing
/// reaches the store.
#[derive(Debug)]
pub struct PendingCommit {
    command: StoreCommand,
    deadline: Instant,
}

impl PendingCommit {
    /// The command that will be applied.
    pub fn command(&self) -> &StoreCommand {
        &self.command
    }

    /// When the delay elapses.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns `true` once the delay has elapsed.
    ///
    /// For tick-driven shells that poll instead of awaiting.
    pub fn is_ready(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Extracts the command for application to the store.
    pub fn into_command(self) -> StoreCommand {
        self.command
    }

    /// Sleeps until the deadline, then yields the command.
    pub async fn wait(self) -> StoreCommand {
        sleep_until(self.deadline).await;
        self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remove_command() -> StoreCommand {
        StoreCommand::Remove("1".into())
    }

    #[tokio::test]
    async fn zero_delay_completes_immediately() {
        let pending = SubmitDelay::new(Duration::ZERO).start(remove_command());
        assert!(pending.is_ready());
        assert_eq!(pending.wait().await, remove_command());
    }

    #[tokio::test]
    async fn long_delay_is_not_ready_up_front() {
        let pending = SubmitDelay::default().start(remove_command());
        assert!(!pending.is_ready());
        assert_eq!(pending.command(), &remove_command());
        // Dropping before the deadline abandons the commit.
        drop(pending);
    }

    #[tokio::test]
    async fn wait_yields_after_the_configured_duration() {
        let delay = SubmitDelay::new(Duration::from_millis(10));
        let started = Instant::now();
        let command = delay.start(remove_command()).wait().await;
        assert_eq!(command, remove_command());
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
