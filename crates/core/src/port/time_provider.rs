// Clock port
//
// `Token.issued_at` is stamped through this port rather than read from the
// system clock, so issuance tests can pin timestamps.

pub trait TimeProvider: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall-clock provider used by the daemon
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
