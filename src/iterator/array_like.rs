use super::{IterStep, IteratorObject};
use crate::value::{Object, Value};
use crate::IterationError;

/// Iterator over an array or arguments object.
///
/// Length and slots are read on every step, so writes made while iterating
/// are observed. Holes produce `undefined`; the element count always equals
/// the length.
#[derive(Debug)]
pub struct ArrayLikeIterator {
    target: Object,
    index: usize,
    done: bool,
}

impl ArrayLikeIterator {
    /// Iterate `target` from index 0.
    pub fn new(target: Object) -> Self {
        Self {
            target,
            index: 0,
            done: false,
        }
    }
}

impl IteratorObject for ArrayLikeIterator {
    fn next(&mut self) -> Result<IterStep, IterationError> {
        if self.done {
            return Ok(IterStep::done());
        }
        let len = self.target.indexed_len().unwrap_or(0);
        if self.index >= len {
            self.done = true;
            return Ok(IterStep::done());
        }
        let value = self.target.indexed_get(self.index).unwrap_or(Value::Undefined);
        self.index += 1;
        Ok(IterStep::yielded(value))
    }

    fn kind(&self) -> &'static str {
        "Array Iterator"
    }
}
