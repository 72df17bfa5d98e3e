//! Insertion-ordered keyed collections
//!
//! Keys compare by SameValueZero. Deleted entries leave tombstones so that a
//! live iterator's position stays valid; entries added while iterating are
//! still reached. Tombstones are compacted away once they outnumber live
//! entries and no iterator is pinning the slot positions.

use std::collections::HashMap;

use super::{JsString, Value};

/// Hashable projection of a value under SameValueZero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyHash {
    Undefined,
    Null,
    Boolean(bool),
    Number(u64),
    BigInt(i128),
    String(JsString),
    Symbol(usize),
    Object(usize),
}

impl KeyHash {
    fn of(value: &Value) -> Self {
        match value {
            Value::Undefined => KeyHash::Undefined,
            Value::Null => KeyHash::Null,
            Value::Boolean(b) => KeyHash::Boolean(*b),
            Value::Number(n) if n.is_nan() => KeyHash::Number(f64::NAN.to_bits()),
            // +0 and -0 share a key
            Value::Number(n) if *n == 0.0 => KeyHash::Number(0f64.to_bits()),
            Value::Number(n) => KeyHash::Number(n.to_bits()),
            Value::BigInt(n) => KeyHash::BigInt(*n),
            Value::String(s) => KeyHash::String(s.clone()),
            Value::Symbol(symbol) => KeyHash::Symbol(symbol.addr()),
            Value::Object(object) => KeyHash::Object(object.addr()),
        }
    }
}

/// Normalize `-0` to `+0`, as `Map.prototype.set` and `Set.prototype.add` do.
fn canonical_key(key: Value) -> Value {
    match key {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    }
}

/// Keyed-pair collection preserving insertion order.
#[derive(Debug, Default)]
pub struct OrderedMap {
    entries: Vec<Option<(Value, Value)>>,
    index: HashMap<KeyHash, usize>,
    pins: usize,
}

impl Clone for OrderedMap {
    fn clone(&self) -> Self {
        // Pins belong to iterators over the original
        Self {
            entries: self.entries.clone(),
            index: self.index.clone(),
            pins: 0,
        }
    }
}

impl OrderedMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        let slot = *self.index.get(&KeyHash::of(key))?;
        self.entries[slot].as_ref().map(|(_, value)| value)
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &Value) -> bool {
        self.index.contains_key(&KeyHash::of(key))
    }

    /// Insert or overwrite. Overwriting keeps the original position.
    pub fn set(&mut self, key: Value, value: Value) {
        let hash = KeyHash::of(&key);
        if let Some(&slot) = self.index.get(&hash) {
            if let Some(entry) = self.entries[slot].as_mut() {
                entry.1 = value;
            }
            return;
        }
        self.index.insert(hash, self.entries.len());
        self.entries.push(Some((canonical_key(key), value)));
    }

    /// Remove `key`, returning whether it was present.
    pub fn delete(&mut self, key: &Value) -> bool {
        match self.index.remove(&KeyHash::of(key)) {
            Some(slot) => {
                self.entries[slot] = None;
                self.compact_if_sparse();
                true
            }
            None => false,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        if self.pins == 0 {
            self.entries.clear();
            return;
        }
        for entry in &mut self.entries {
            *entry = None;
        }
    }

    /// Keep slot positions stable while an iterator walks them.
    pub(crate) fn pin(&mut self) {
        self.pins += 1;
    }

    /// Release a [`pin`](Self::pin); compaction may run again.
    pub(crate) fn unpin(&mut self) {
        self.pins = self.pins.saturating_sub(1);
        self.compact_if_sparse();
    }

    /// Drop tombstones once they outnumber live entries, unless pinned.
    fn compact_if_sparse(&mut self) {
        let live = self.index.len();
        if self.pins > 0 || self.entries.len() - live <= live {
            return;
        }
        self.entries.retain(Option::is_some);
        for (slot, entry) in self.entries.iter().enumerate() {
            if let Some((key, _)) = entry {
                self.index.insert(KeyHash::of(key), slot);
            }
        }
    }

    /// Number of slots including tombstones; iterator positions range over this.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Entry at slot `position`, `None` for a tombstone.
    pub fn entry_at(&self, position: usize) -> Option<(&Value, &Value)> {
        self.entries
            .get(position)?
            .as_ref()
            .map(|(key, value)| (key, value))
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.entries
            .iter()
            .flatten()
            .map(|(key, value)| (key, value))
    }
}

impl FromIterator<(Value, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

/// Uniqueness-enforcing collection preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    members: OrderedMap,
}

impl OrderedSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add `value` unless an equal member exists.
    pub fn add(&mut self, value: Value) {
        if !self.members.has(&value) {
            self.members.set(value, Value::Undefined);
        }
    }

    /// Whether `value` is a member.
    pub fn has(&self, value: &Value) -> bool {
        self.members.has(value)
    }

    /// Remove `value`, returning whether it was a member.
    pub fn delete(&mut self, value: &Value) -> bool {
        self.members.delete(value)
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub(crate) fn pin(&mut self) {
        self.members.pin();
    }

    pub(crate) fn unpin(&mut self) {
        self.members.unpin();
    }

    /// Number of slots including tombstones.
    pub fn slot_count(&self) -> usize {
        self.members.slot_count()
    }

    /// Member at slot `position`, `None` for a tombstone.
    pub fn member_at(&self, position: usize) -> Option<&Value> {
        self.members.entry_at(position).map(|(member, _)| member)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.members.iter().map(|(member, _)| member)
    }
}

impl FromIterator<Value> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}
