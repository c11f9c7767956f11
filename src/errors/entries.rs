use crate::error::{EngineError, Result};

/// One sub-item of a container-shaped error: either a bare name or a
/// key/value pair whose key is the uniqueness discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Name(String),
    Pair { key: String, value: String },
}

impl Entry {
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Entry::Pair {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The string entries are sorted and deduplicated on.
    pub fn sort_key(&self) -> &str {
        match self {
            Entry::Name(name) => name,
            Entry::Pair { key, .. } => key,
        }
    }

    pub fn shape(&self) -> EntryShape {
        match self {
            Entry::Name(_) => EntryShape::Name,
            Entry::Pair { .. } => EntryShape::Pair,
        }
    }

    /// Render for the granular message: the name itself, or `key : value`.
    pub fn render(&self) -> String {
        match self {
            Entry::Name(name) => name.clone(),
            Entry::Pair { key, value } => format!("{} : {}", key, value),
        }
    }
}

/// Shape of the entries a given container kind holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryShape {
    Name,
    Pair,
}

impl EntryShape {
    fn label(self) -> &'static str {
        match self {
            EntryShape::Name => "name entry",
            EntryShape::Pair => "pair entry",
        }
    }
}

/// Ordered, deduplicating set of homogeneous entries.
///
/// Entries stay sorted by their sort key (the name itself, or the pair key),
/// so reports are deterministic regardless of the order failures arrived in.
/// Backed by a sorted `Vec` with binary-search insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySet {
    shape: EntryShape,
    items: Vec<Entry>,
}

impl EntrySet {
    /// Create an empty set of bare-name entries.
    pub fn names() -> Self {
        Self {
            shape: EntryShape::Name,
            items: Vec::new(),
        }
    }

    /// Create an empty set of key/value pair entries.
    pub fn pairs() -> Self {
        Self {
            shape: EntryShape::Pair,
            items: Vec::new(),
        }
    }

    pub fn shape(&self) -> EntryShape {
        self.shape
    }

    /// Insert an entry, keeping sort order. Returns `Ok(false)` without
    /// modifying the set when the entry is an empty name or its key is
    /// already present (the first occurrence wins). Rejects entries of the
    /// wrong shape with a `TypeMismatch`.
    pub fn add(&mut self, entry: Entry) -> Result<bool> {
        if entry.shape() != self.shape {
            return Err(EngineError::TypeMismatch {
                expected: self.shape.label(),
                found: entry.shape().label(),
            });
        }
        Ok(self.insert(entry))
    }

    /// Insert an entry whose shape is known to match (the concrete error
    /// kinds construct their own entries, so the shape cannot be wrong).
    pub(crate) fn insert(&mut self, entry: Entry) -> bool {
        debug_assert_eq!(entry.shape(), self.shape);
        if entry.sort_key().is_empty() {
            return false;
        }
        match self
            .items
            .binary_search_by(|existing| existing.sort_key().cmp(entry.sort_key()))
        {
            Ok(_) => false,
            Err(position) => {
                self.items.insert(position, entry);
                true
            }
        }
    }

    /// Union a same-shape set into this one without the per-entry shape check.
    pub(crate) fn union(&mut self, other: &EntrySet) {
        debug_assert_eq!(self.shape, other.shape);
        for entry in &other.items {
            self.insert(entry.clone());
        }
    }

    /// Convenience for name-shaped sets.
    pub fn add_name(&mut self, name: impl Into<String>) -> Result<bool> {
        self.add(Entry::Name(name.into()))
    }

    /// Convenience for pair-shaped sets.
    pub fn add_pair(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<bool> {
        self.add(Entry::pair(key, value))
    }

    /// Union the other set into this one. Idempotent and order-independent:
    /// every entry goes through `add`, so duplicates are dropped.
    pub fn merge(&mut self, other: &EntrySet) -> Result<()> {
        if other.shape != self.shape {
            return Err(EngineError::TypeMismatch {
                expected: self.shape.label(),
                found: other.shape.label(),
            });
        }
        self.union(other);
        Ok(())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items
            .binary_search_by(|existing| existing.sort_key().cmp(key))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter()
    }

    /// Comma-joined rendering of all entries in sorted order.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(Entry::render)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
