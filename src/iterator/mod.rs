//! Iterator protocol
//!
//! An iterator is any value that can be stepped:
//! - native iterator objects (built-in or wrapped Rust closures)
//! - objects whose `next` property is callable and returns `{ value, done }`
//!
//! Built-in iterators are fused: after the first `done` they keep reporting
//! `done`.

mod array_like;
mod collection;
mod string;

pub use array_like::ArrayLikeIterator;
pub use collection::{MapIterator, SetIterator};
pub use string::{code_point_end, CodePoints, StringIterator};

use std::fmt;

use crate::value::{Object, PropertyKey, Value};
use crate::IterationError;

/// Stateful producer of elements.
pub trait IteratorObject: fmt::Debug {
    /// Produce the next element.
    fn next(&mut self) -> Result<IterStep, IterationError>;

    /// Tag shown by inspection, e.g. `Array Iterator`.
    fn kind(&self) -> &'static str;
}

/// Outcome of one step: a value, or exhaustion.
#[derive(Debug, Clone, PartialEq)]
pub struct IterStep {
    /// Produced element; `undefined` once done
    pub value: Value,
    /// Whether the iterator is exhausted
    pub done: bool,
}

impl IterStep {
    /// A produced element.
    pub fn yielded(value: Value) -> Self {
        Self { value, done: false }
    }

    /// Exhaustion marker.
    pub fn done() -> Self {
        Self {
            value: Value::Undefined,
            done: true,
        }
    }

    /// Materialize as a `{ value, done }` result object.
    pub fn to_object(&self) -> Object {
        let object = Object::ordinary();
        object.set_property("value", self.value.clone());
        object.set_property("done", self.done);
        object
    }

    fn from_result_object(result: Value) -> Result<Self, IterationError> {
        let Some(object) = result.as_object() else {
            return Err(IterationError::InvalidStepResult(result.to_string()));
        };
        let done = object
            .get(&PropertyKey::from("done"))
            .map_or(false, |done| done.truthy());
        let value = object
            .get(&PropertyKey::from("value"))
            .unwrap_or(Value::Undefined);
        Ok(Self { value, done })
    }
}

impl Value {
    /// Advance this iterator by one element.
    ///
    /// Fails with [`IterationError::NotAnIterator`] when the value has no way
    /// to be stepped, which is what a misbehaving capability leaves behind.
    pub fn step(&self) -> Result<IterStep, IterationError> {
        let Some(object) = self.as_object() else {
            return Err(IterationError::NotAnIterator(self.to_string()));
        };
        if let Some(step) = object.step_native() {
            return step;
        }
        match object.get(&PropertyKey::from("next")) {
            Some(next) if next.is_callable() => {
                IterStep::from_result_object(next.call(self, &[])?)
            }
            _ => Err(IterationError::NotAnIterator(self.to_string())),
        }
    }

    /// Drain this iterator through a Rust iterator.
    pub fn steps(&self) -> Steps {
        Steps {
            iterator: self.clone(),
            finished: false,
        }
    }
}

/// Adapts an iterator value to [`std::iter::Iterator`], stopping at the first
/// `done` or error.
#[derive(Debug)]
pub struct Steps {
    iterator: Value,
    finished: bool,
}

impl Iterator for Steps {
    type Item = Result<Value, IterationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.iterator.step() {
            Ok(step) if step.done => {
                self.finished = true;
                None
            }
            Ok(step) => Some(Ok(step.value)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Native iterator backed by a closure; `Ok(None)` means done.
pub(crate) struct FnIterator<F> {
    name: &'static str,
    next: F,
    done: bool,
}

impl<F> FnIterator<F> {
    pub(crate) fn new(name: &'static str, next: F) -> Self {
        Self {
            name,
            next,
            done: false,
        }
    }
}

impl<F> fmt::Debug for FnIterator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnIterator")
            .field("name", &self.name)
            .field("done", &self.done)
            .finish()
    }
}

impl<F> IteratorObject for FnIterator<F>
where
    F: FnMut() -> Result<Option<Value>, IterationError>,
{
    fn next(&mut self) -> Result<IterStep, IterationError> {
        if self.done {
            return Ok(IterStep::done());
        }
        match (self.next)()? {
            Some(value) => Ok(IterStep::yielded(value)),
            None => {
                self.done = true;
                Ok(IterStep::done())
            }
        }
    }

    fn kind(&self) -> &'static str {
        self.name
    }
}
