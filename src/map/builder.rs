use super::{ReadMode, TtlMap};
use crate::Error;

use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;

use std::hash::{BuildHasher, Hash};
use std::time::{Duration, Instant};

/// The reaper never sweeps more often than this unless configured otherwise
pub const DEFAULT_MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Configures and builds a [`TtlMap`]
///
/// ```rust
/// use ttl_map::{ReadMode, TtlMap, TtlMapBuilder};
/// use std::time::Duration;
///
/// let sessions: TtlMap<u64, String> = TtlMapBuilder::new(Duration::from_secs(30))
///     .read_mode(ReadMode::Shared)
///     .capacity(1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct TtlMapBuilder {
    pub(crate) ttl: Duration,
    pub(crate) read_mode: ReadMode,
    pub(crate) min_sweep_interval: Duration,
    pub(crate) capacity: Option<usize>,
}

impl TtlMapBuilder {
    pub fn new(ttl: Duration) -> Self {
        TtlMapBuilder {
            ttl,
            read_mode: ReadMode::default(),
            min_sweep_interval: DEFAULT_MIN_SWEEP_INTERVAL,
            capacity: None,
        }
    }

    pub fn read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Lower bound on the reaper's period, which is otherwise equal to the ttl
    pub fn min_sweep_interval(mut self, interval: Duration) -> Self {
        self.min_sweep_interval = interval;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// How often the reaper sweeps a map built with this configuration
    pub fn sweep_interval(&self) -> Duration {
        self.ttl.max(self.min_sweep_interval)
    }

    pub fn build<K, V>(self) -> Result<TtlMap<K, V>, Error>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.build_with_hasher(DefaultHashBuilder::default())
    }

    pub fn build_with_hasher<K, V, S>(self, build_hasher: S) -> Result<TtlMap<K, V, S>, Error>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
        S: BuildHasher + Send + Sync + 'static,
    {
        self.validate()?;

        let entries = match self.capacity {
            Some(capacity) => HashMap::with_capacity_and_hasher(capacity, build_hasher),
            None => HashMap::with_hasher(build_hasher),
        };

        TtlMap::from_parts(self.ttl, self.read_mode, self.sweep_interval(), entries)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.ttl.is_zero() {
            return Err(Error::ZeroTtl);
        }

        if self.min_sweep_interval.is_zero() {
            return Err(Error::ZeroSweepInterval);
        }

        if Instant::now().checked_add(self.ttl).is_none() {
            return Err(Error::TtlOverflow(self.ttl));
        }

        Ok(())
    }
}
