use std::collections::HashMap;
use std::hash::Hash;

/// Proof that a read was started for `key` at a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    key: K,
    generation: u64,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: Option<V>,
    stale: bool,
    generation: u64,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            value: None,
            stale: true,
            generation: 0,
        }
    }
}

/// Keyed results of reads.
///
/// A read result is only applied if no [`QueryCache::cancel`] happened for
/// its key since the read began, so a late response cannot overwrite an
/// optimistic write.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(|entry| entry.value.as_ref())
    }

    /// Missing and invalidated entries both need a fetch.
    pub fn is_stale(&self, key: &K) -> bool {
        self.entries.get(key).map_or(true, |entry| {
            entry.stale || entry.value.is_none()
        })
    }

    pub fn set(&mut self, key: K, value: V) {
        let entry = self.entries.entry(key).or_default();
        entry.value = Some(value);
        entry.stale = false;
    }

    /// Puts a snapshot back. `None` empties the entry.
    pub fn restore(&mut self, key: K, snapshot: Option<V>) {
        let entry = self.entries.entry(key).or_default();
        entry.stale = snapshot.is_none();
        entry.value = snapshot;
    }

    pub fn begin_fetch(&mut self, key: K) -> FetchTicket<K> {
        let generation = self.entries.entry(key.clone()).or_default().generation;
        FetchTicket { key, generation }
    }

    /// Stores the result of the read behind `ticket`. Returns `false` when the
    /// read was cancelled in the meantime and the result was dropped.
    pub fn finish_fetch(&mut self, ticket: FetchTicket<K>, value: V) -> bool {
        let entry = self.entries.entry(ticket.key).or_default();
        if entry.generation != ticket.generation {
            return false;
        }
        entry.value = Some(value);
        entry.stale = false;
        true
    }

    /// Supersedes every read of `key` still in flight.
    pub fn cancel(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.generation += 1;
        }
    }

    pub fn invalidate(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.stale = true;
        }
    }
}
