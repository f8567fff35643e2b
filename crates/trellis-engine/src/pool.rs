//! Type-keyed adapter recycling.
//!
//! One pool instance serves one adapter type (plus the shared template
//! pool). Keys identify interchangeable adapters; the pool is an LRU map
//! of keys to bounded stacks of instances. Both capacities are fixed:
//! exceeding `max_keys` evicts the least-recently-used key with its whole
//! sub-pool, and a put into a full sub-pool drops the incoming instance.

/// Which concrete adapter type an adapter (or key) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Custom,
    Image,
    ChunkedText,
    ParameterizedText,
    List,
    GridRow,
    Stack,
    Template,
}

/// Identity used to decide whether two adapters are interchangeable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecyclerKey {
    /// One key for the whole adapter type.
    Singleton(AdapterKind),
    /// Text adapters are only interchangeable within one text shape.
    /// Size is kept in centi-dp so the key stays hashable.
    Text { kind: AdapterKind, font_size_centi_dp: u32, italic: bool },
    /// All instantiations of one template are mutually poolable,
    /// regardless of binding context.
    Template { template_id: String },
}

impl RecyclerKey {
    pub fn text(kind: AdapterKind, font_size_dp: f32, italic: bool) -> Self {
        RecyclerKey::Text {
            kind,
            font_size_centi_dp: (font_size_dp * 100.0).round() as u32,
            italic,
        }
    }

    pub fn template(template_id: impl Into<String>) -> Self {
        RecyclerKey::Template { template_id: template_id.into() }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, RecyclerKey::Template { .. })
    }
}

struct PoolEntry<A> {
    key: RecyclerKey,
    items: Vec<A>,
}

/// LRU of bounded per-key pools. Entries are ordered least-recently-used
/// first; touching a key moves it to the back.
pub struct KeyedRecyclerPool<A> {
    max_keys: usize,
    capacity_per_pool: usize,
    entries: Vec<PoolEntry<A>>,
}

impl<A> KeyedRecyclerPool<A> {
    pub fn new(max_keys: usize, capacity_per_pool: usize) -> Self {
        KeyedRecyclerPool { max_keys, capacity_per_pool, entries: Vec::new() }
    }

    /// Takes an instance for `key`, if one is pooled. Unknown keys return
    /// `None` without side effects.
    pub fn get(&mut self, key: &RecyclerKey) -> Option<A> {
        let pos = self.entries.iter().position(|e| &e.key == key)?;
        let mut entry = self.entries.remove(pos);
        let item = entry.items.pop();
        self.entries.push(entry);
        item
    }

    /// Offers an instance back. A new key beyond `max_keys` evicts the
    /// least-recently-used key and its entire sub-pool; a full sub-pool
    /// drops the incoming instance.
    pub fn put(&mut self, key: RecyclerKey, item: A) {
        if let Some(pos) = self.entries.iter().position(|e| e.key == key) {
            let mut entry = self.entries.remove(pos);
            if entry.items.len() < self.capacity_per_pool {
                entry.items.push(item);
            }
            self.entries.push(entry);
            return;
        }
        if self.entries.len() >= self.max_keys {
            let evicted = self.entries.remove(0);
            log::debug!("recycler evicting key {:?} ({} pooled)", evicted.key, evicted.items.len());
        }
        self.entries.push(PoolEntry { key, items: vec![item] });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn pooled_for(&self, key: &RecyclerKey) -> usize {
        self.entries.iter().find(|e| &e.key == key).map_or(0, |e| e.items.len())
    }
}
