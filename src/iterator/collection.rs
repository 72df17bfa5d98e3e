use super::{IterStep, IteratorObject};
use crate::value::{Object, ObjectKind, Value};
use crate::IterationError;

/// Pin the collection in `target` so its slot positions survive deletes.
fn pin(target: &Object) -> bool {
    let Some(mut kind) = target.try_kind_mut() else {
        return false;
    };
    match &mut *kind {
        ObjectKind::Map(map) => map.pin(),
        ObjectKind::Set(set) => set.pin(),
        _ => return false,
    }
    true
}

/// Release a pin. If the collection is borrowed right now the pin is kept,
/// which only postpones compaction.
fn unpin(target: &Object) {
    if let Some(mut kind) = target.try_kind_mut() {
        match &mut *kind {
            ObjectKind::Map(map) => map.unpin(),
            ObjectKind::Set(set) => set.unpin(),
            _ => {}
        }
    }
}

/// Iterator over the `[key, value]` entries of a map.
#[derive(Debug)]
pub struct MapIterator {
    target: Object,
    position: usize,
    done: bool,
    pinned: bool,
}

impl MapIterator {
    /// Iterate `target`'s entries in insertion order.
    pub fn new(target: Object) -> Self {
        let pinned = pin(&target);
        Self {
            target,
            position: 0,
            done: false,
            pinned,
        }
    }

    fn finish(&mut self) {
        self.done = true;
        if std::mem::take(&mut self.pinned) {
            unpin(&self.target);
        }
    }

    /// Next live entry at or after the cursor, skipping tombstones.
    fn advance(&mut self) -> Option<(Value, Value)> {
        let kind = self.target.kind();
        let ObjectKind::Map(map) = &*kind else {
            return None;
        };
        while self.position < map.slot_count() {
            let slot = self.position;
            self.position += 1;
            if let Some((key, value)) = map.entry_at(slot) {
                return Some((key.clone(), value.clone()));
            }
        }
        None
    }
}

impl IteratorObject for MapIterator {
    fn next(&mut self) -> Result<IterStep, IterationError> {
        if self.done {
            return Ok(IterStep::done());
        }
        match self.advance() {
            Some((key, value)) => Ok(IterStep::yielded(Value::array([key, value]))),
            None => {
                self.finish();
                Ok(IterStep::done())
            }
        }
    }

    fn kind(&self) -> &'static str {
        "Map Iterator"
    }
}

impl Drop for MapIterator {
    fn drop(&mut self) {
        if self.pinned {
            unpin(&self.target);
        }
    }
}

/// Iterator over the members of a set.
#[derive(Debug)]
pub struct SetIterator {
    target: Object,
    position: usize,
    done: bool,
    pinned: bool,
}

impl SetIterator {
    /// Iterate `target`'s members in insertion order.
    pub fn new(target: Object) -> Self {
        let pinned = pin(&target);
        Self {
            target,
            position: 0,
            done: false,
            pinned,
        }
    }

    fn finish(&mut self) {
        self.done = true;
        if std::mem::take(&mut self.pinned) {
            unpin(&self.target);
        }
    }

    fn advance(&mut self) -> Option<Value> {
        let kind = self.target.kind();
        let ObjectKind::Set(set) = &*kind else {
            return None;
        };
        while self.position < set.slot_count() {
            let slot = self.position;
            self.position += 1;
            if let Some(member) = set.member_at(slot) {
                return Some(member.clone());
            }
        }
        None
    }
}

impl IteratorObject for SetIterator {
    fn next(&mut self) -> Result<IterStep, IterationError> {
        if self.done {
            return Ok(IterStep::done());
        }
        match self.advance() {
            Some(member) => Ok(IterStep::yielded(member)),
            None => {
                self.finish();
                Ok(IterStep::done())
            }
        }
    }

    fn kind(&self) -> &'static str {
        "Set Iterator"
    }
}

impl Drop for SetIterator {
    fn drop(&mut self) {
        if self.pinned {
            unpin(&self.target);
        }
    }
}
