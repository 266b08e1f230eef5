pub mod builder;

use crate::entry::Entry;
use crate::reaper::Reaper;
use crate::Error;

use builder::TtlMapBuilder;

use hashbrown::hash_map::{DefaultHashBuilder, HashMap};
use parking_lot::RwLock;

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// How [`TtlMap::get`] locks the map while it looks up and touches an entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Reads take the map lock exclusively, serializing every operation on every key
    #[default]
    Exclusive,
    /// Reads share the map lock and rely on the entry's own lock for the touch,
    /// so lookups only wait on writers
    Shared,
}

/// A concurrent map where every entry expires once it hasn't been read or written for `ttl`.
///
/// Reading a live entry pushes its deadline out by a full `ttl` ("sliding expiration").
/// Expired entries are invisible to lookups right away, and are removed from memory by a
/// background reaper that sweeps the map every `max(ttl, min_sweep_interval)`.
///
/// Cloning is cheap and every clone refers to the same entries. The reaper stops when
/// [`TtlMap::close`] is called or the last clone is dropped.
pub struct TtlMap<K, V, S = DefaultHashBuilder> {
    shared: Arc<Shared<K, V, S>>,
    reaper: Arc<Reaper>,
}

struct Shared<K, V, S> {
    ttl: Duration,
    read_mode: ReadMode,
    entries: RwLock<HashMap<K, Entry<V>, S>>,
}

impl<K, V, S> Clone for TtlMap<K, V, S> {
    fn clone(&self) -> Self {
        TtlMap {
            shared: self.shared.clone(),
            reaper: self.reaper.clone(),
        }
    }
}

impl<K, V> TtlMap<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create a map with the default configuration, see [`TtlMapBuilder`] for the options
    pub fn new(ttl: Duration) -> Result<Self, Error> {
        TtlMapBuilder::new(ttl).build()
    }
}

impl<K, V, S> TtlMap<K, V, S>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    pub(crate) fn from_parts(
        ttl: Duration,
        read_mode: ReadMode,
        sweep_interval: Duration,
        entries: HashMap<K, Entry<V>, S>,
    ) -> Result<Self, Error> {
        let shared = Arc::new(Shared {
            ttl,
            read_mode,
            entries: RwLock::new(entries),
        });

        let reaper = Reaper::spawn(sweep_interval, {
            let shared = Arc::downgrade(&shared);
            move || sweep(&shared)
        })?;

        Ok(TtlMap {
            shared,
            reaper: Arc::new(reaper),
        })
    }
}

fn sweep<K, V, S>(shared: &Weak<Shared<K, V, S>>) -> ControlFlow<()>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    match shared.upgrade() {
        Some(shared) => {
            shared.purge_expired();
            ControlFlow::Continue(())
        }
        None => ControlFlow::Break(()),
    }
}

impl<K, V, S> TtlMap<K, V, S> {
    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    pub fn read_mode(&self) -> ReadMode {
        self.shared.read_mode
    }

    /// The number of keys held, including expired entries the reaper hasn't removed yet
    pub fn len(&self) -> usize {
        self.shared.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.shared.entries.write().clear();
    }

    /// Stop the background reaper and wait for it to exit
    ///
    /// The map stays usable: expired entries are still hidden from lookups,
    /// they just aren't reclaimed until [`TtlMap::purge_expired`] is called.
    pub fn close(&self) {
        self.reaper.stop();
    }

    pub fn is_closed(&self) -> bool {
        self.reaper.is_stopped()
    }
}

impl<K, V, S> TtlMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Insert a value with a fresh deadline, replacing any previous entry for the key
    pub fn insert(&self, key: K, value: V) {
        let entry = Entry::with_ttl(value, self.shared.ttl);

        self.shared.entries.write().insert(key, entry);
    }

    /// Get a live value, extending its deadline to a full ttl from now
    ///
    /// Missing and expired keys both return `None`, and a miss never modifies the map.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let ttl = self.shared.ttl;

        match self.shared.read_mode {
            ReadMode::Exclusive => touch_live(&*self.shared.entries.write(), key, ttl),
            ReadMode::Shared => touch_live(&*self.shared.entries.read(), key, ttl),
        }
    }

    /// Whether the key holds a live entry, without extending it
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared
            .entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remove a key, returning its value if the entry was still live
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.shared.entries.write().remove(key)?;

        if entry.is_expired() {
            None
        } else {
            Some(entry.into_value())
        }
    }

    /// Remove every expired entry now, returning how many were removed
    ///
    /// The reaper calls this on every tick.
    pub fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }
}

impl<K, V, S> Shared<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();

        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "purged expired entries");
        } else {
            tracing::trace!(remaining = entries.len(), "nothing to purge");
        }

        removed
    }
}

fn touch_live<K, V, S, Q>(entries: &HashMap<K, Entry<V>, S>, key: &Q, ttl: Duration) -> Option<V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    V: Clone,
    S: BuildHasher,
{
    let entry = entries.get(key)?;
    if entry.is_expired() {
        return None;
    }

    entry.touch(ttl);
    Some(entry.value().clone())
}
