//! Expiry Arithmetic
//!
//! Rules for turning a `set` expiration into a lifetime, and a remaining
//! lifetime into whole seconds. Every backend uses these so TTLs agree.

use std::time::Duration;

// == Expiry ==
/// Resolved lifetime of a `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Entry lives for this many seconds
    After(u64),
    /// Entry is expired on arrival and must not be stored
    Immediate,
}

impl Expiry {
    /// Resolves an optional caller expiration against the default timeout.
    ///
    /// `None` uses `default_timeout`. Zero or negative values mean
    /// immediate expiration, never "no expiration".
    pub fn resolve(expire: Option<i64>, default_timeout: u64) -> Self {
        match expire {
            None => Self::from_secs(default_timeout),
            Some(secs) if secs <= 0 => Expiry::Immediate,
            Some(secs) => Expiry::After(secs as u64),
        }
    }

    fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Expiry::Immediate
        } else {
            Expiry::After(secs)
        }
    }

    /// Lifetime as a duration, or `None` for immediate expiration.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Expiry::After(secs) => Some(Duration::from_secs(*secs)),
            Expiry::Immediate => None,
        }
    }
}

/// Rounds a remaining lifetime up to whole seconds.
///
/// A live entry with any time left reports at least 1, which keeps it
/// distinguishable from the `(0, None)` miss result.
pub fn remaining_secs(remaining: Duration) -> u64 {
    if remaining.subsec_nanos() > 0 {
        remaining.as_secs() + 1
    } else {
        remaining.as_secs()
    }
}
