use parking_lot::RwLock;
use std::time::{Duration, Instant};

/// A single value in a [`crate::TtlMap`] and the instant it stops being visible.
///
/// The deadline sits behind its own lock so touching one entry never contends
/// with lookups of unrelated keys. A deadline of `None` means the entry is
/// already expired.
pub(crate) struct Entry<V> {
    value: V,
    expires_at: RwLock<Option<Instant>>,
}

impl<V> Entry<V> {
    /// Creates an entry with no deadline, callers must [`Entry::touch`] it before it can be seen
    pub(crate) fn new(value: V) -> Self {
        Entry {
            value,
            expires_at: RwLock::new(None),
        }
    }

    pub(crate) fn with_ttl(value: V, ttl: Duration) -> Self {
        let entry = Entry::new(value);
        entry.touch(ttl);

        entry
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }

    /// Push the deadline out to `now + ttl`
    pub(crate) fn touch(&self, ttl: Duration) {
        let mut expires_at = self.expires_at.write();

        // an unrepresentable deadline falls back to the expired sentinel
        *expires_at = Instant::now().checked_add(ttl);
    }

    pub(crate) fn is_expired(&self) -> bool {
        match *self.expires_at.read() {
            Some(at) => at < Instant::now(),
            None => true,
        }
    }
}
