use std::time::Duration;

/// Lifecycle of a feed connection.
///
/// `Connecting -> Open -> Closed`; a reconnect attempt re-enters
/// `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// What to do after the connection closes on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    /// Stay closed.
    #[default]
    None,
    FixedDelay(Duration),
    /// Doubles the delay after each failed attempt, capped at `max`.
    Backoff { initial: Duration, max: Duration },
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt number `attempt` (0-based), or `None`
    /// to give up.
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        match *self {
            ReconnectPolicy::None => None,
            ReconnectPolicy::FixedDelay(delay) => Some(delay),
            ReconnectPolicy::Backoff { initial, max } => {
                let factor = 2u32.saturating_pow(attempt.min(16));
                Some(initial.saturating_mul(factor).min(max))
            }
        }
    }
}
