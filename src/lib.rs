//! # Iterator resolution for dynamically typed values
//!
//! This library decides whether a value is iterable under the iteration
//! protocol and, if it is, hands back an iterator object that produces its
//! elements lazily and in order.
//!
//! ## Resolution order
//!
//! 1. **Custom capability**: a callable stored under the iteration key (the
//!    well-known `Symbol.iterator`, or `"@@iterator"` where symbols are
//!    unavailable) always wins, even on strings, arrays and collections
//! 2. **Strings**: one code point per step, tolerant of unpaired surrogates
//! 3. **Array-likes**: arrays and arguments objects, holes yield `undefined`
//! 4. **Maps**: `[key, value]` pairs in insertion order
//! 5. **Sets**: members in insertion order
//! 6. Anything else is not iterable and resolves to `None`
//!
//! ## Usage Example
//!
//! ```
//! use get_iterator::{resolve, Value};
//!
//! let value = Value::string("a\u{1F4A9}z");
//! let iterator = resolve(&value).unwrap().expect("strings are iterable");
//! let items: Vec<Value> = iterator.steps().collect::<Result<_, _>>().unwrap();
//! assert_eq!(items.len(), 3);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod value;       // Dynamic value model
pub mod iterator;    // Iterator protocol and built-in iterators
pub mod resolver;    // Capability check and shape dispatch
pub mod realm;       // Intrinsic prototypes
pub mod environment; // Feature flags and deployment variants
pub mod literal;     // Literal syntax for building values

// Re-exports for convenience
pub use value::{JsString, Object, ObjectKind, PropertyKey, Symbol, Value};
pub use iterator::{IterStep, IteratorObject, Steps};
pub use resolver::{Resolver, Shape};
pub use realm::{Intrinsic, Realm};
pub use environment::{Features, ResolverConfig, Variant};

use thiserror::Error;

/// Errors raised while resolving or stepping an iterator.
///
/// Non-iterability is not an error: [`resolve`] returns `Ok(None)` for it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IterationError {
    /// A user-supplied callable threw.
    #[error("uncaught exception: {0}")]
    Thrown(String),

    /// Attempted to step a value that is not iterator-shaped.
    #[error("{0} is not an iterator")]
    NotAnIterator(String),

    /// An iterator's `next` returned something other than an object.
    #[error("iterator result {0} is not an object")]
    InvalidStepResult(String),
}

impl IterationError {
    /// Helper for constructing errors thrown from native callables.
    pub fn thrown(msg: impl Into<String>) -> Self {
        IterationError::Thrown(msg.into())
    }
}

/// Resolve an iterator for `value` using the default configuration.
///
/// Returns `Ok(None)` when the value is not iterable. The only error is one
/// thrown by the value's own iteration capability.
pub fn resolve(value: &Value) -> Result<Option<Value>, IterationError> {
    Resolver::default().resolve(value)
}
