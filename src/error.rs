use std::time::Duration;

use thiserror::Error;

/// Errors returned when building a [`crate::TtlMap`].
///
/// Once a map exists none of its operations fail, a missing or expired key is
/// reported as `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// Every entry would be born expired
    #[error("ttl must be greater than zero")]
    ZeroTtl,

    /// `now + ttl` cannot be represented as an [`std::time::Instant`]
    #[error("ttl of {0:?} is too large to compute a deadline")]
    TtlOverflow(Duration),

    #[error("minimum sweep interval must be greater than zero")]
    ZeroSweepInterval,

    /// The OS refused to start the background sweeper
    #[error("failed to spawn reaper thread: {0}")]
    SpawnReaper(#[from] std::io::Error),
}
