use bitvec::prelude::*;

use super::Value;

/// Indexed storage that may contain holes.
///
/// Present slots are tracked in a bit vector so that a hole and an explicit
/// `undefined` stay distinguishable. `len` may run past the last present
/// slot, as with `new Array(5)`.
#[derive(Debug, Clone, Default)]
pub struct SparseArray {
    /// Slot storage; holes hold `Undefined`
    slots: Vec<Value>,

    /// One bit per slot, set when the slot is present
    present: BitVec,

    /// Logical length
    len: usize,
}

impl SparseArray {
    /// Empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Array of `len` holes.
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: Vec::new(),
            present: BitVec::new(),
            len,
        }
    }

    /// Dense array of `values`.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let slots: Vec<Value> = values.into_iter().collect();
        let len = slots.len();
        Self {
            present: bitvec![1; len],
            slots,
            len,
        }
    }

    /// Array where `None` marks a hole.
    pub fn from_slots(slots: impl IntoIterator<Item = Option<Value>>) -> Self {
        let mut array = Self::new();
        for slot in slots {
            match slot {
                Some(value) => array.push(value),
                None => array.len += 1,
            }
        }
        array
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether slot `index` holds a value.
    pub fn has(&self, index: usize) -> bool {
        self.present.get(index).map_or(false, |bit| *bit)
    }

    /// Value at `index`; `None` for holes and out-of-range indices.
    pub fn get(&self, index: usize) -> Option<&Value> {
        if self.has(index) {
            self.slots.get(index)
        } else {
            None
        }
    }

    /// Store `value` at `index`, growing the length if needed.
    pub fn set(&mut self, index: usize, value: Value) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, Value::Undefined);
            self.present.resize(index + 1, false);
        }
        self.slots[index] = value;
        self.present.set(index, true);
        self.len = self.len.max(index + 1);
    }

    /// Append at the current length.
    pub fn push(&mut self, value: Value) {
        let index = self.len;
        self.set(index, value);
    }

    /// Punch a hole at `index`; the length is unchanged.
    pub fn delete(&mut self, index: usize) -> bool {
        if !self.has(index) {
            return false;
        }
        self.slots[index] = Value::Undefined;
        self.present.set(index, false);
        true
    }

    /// Set the logical length, dropping slots past it.
    pub fn set_len(&mut self, len: usize) {
        if len < self.slots.len() {
            self.slots.truncate(len);
            self.present.truncate(len);
        }
        self.len = len;
    }

    /// Number of present slots.
    pub fn present_count(&self) -> usize {
        self.present.count_ones()
    }

    /// Every slot up to the length, `None` for holes.
    pub fn slots(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        (0..self.len).map(move |index| self.get(index))
    }
}
