//! Dynamic value model
//!
//! The resolver needs to tell apart exactly the kinds of values the
//! iteration protocol cares about:
//! - Primitives (undefined, null, booleans, numbers, big integers, strings, symbols)
//! - Objects (arrays, arguments, functions, boxed primitives, collections, iterators)
//!
//! Objects are shared handles, so an iterator sees later mutations of the
//! collection it walks.

mod array;
mod collection;
mod display;
mod object;
mod string;

pub use array::SparseArray;
pub use collection::{OrderedMap, OrderedSet};
pub use display::format_number;
pub use object::{Arguments, Function, NativeFn, Object, ObjectKind, RegExpSource};
pub use string::{is_high_surrogate, is_low_surrogate, JsString};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::IterationError;

/// Any value the resolver can be handed.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value
    Undefined,
    /// Explicit null
    Null,
    /// Boolean primitive
    Boolean(bool),
    /// IEEE 754 number
    Number(f64),
    /// Big integer primitive
    BigInt(i128),
    /// String primitive
    String(JsString),
    /// Symbol primitive
    Symbol(Symbol),
    /// Reference to an object
    Object(Object),
}

impl Value {
    /// String primitive from Rust text.
    pub fn string(s: &str) -> Self {
        Value::String(JsString::from(s))
    }

    /// Dense array holding `items`.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Object(Object::array(items))
    }

    /// `true` for `undefined` and `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(object) if object.is_callable() => "function",
            Value::Object(_) => "object",
        }
    }

    /// Borrow the object handle, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrow the string primitive, if this is one.
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value can be called.
    pub fn is_callable(&self) -> bool {
        self.as_object().map_or(false, Object::is_callable)
    }

    /// Call the value with `this` and `args`.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, IterationError> {
        match self {
            Value::Object(object) => object.call(this, args),
            other => Err(IterationError::thrown(format!("{other} is not a function"))),
        }
    }

    /// `Object(value)`: box primitives, pass objects through.
    ///
    /// Nullish values produce a fresh ordinary object.
    pub fn to_object(&self) -> Object {
        match self {
            Value::Object(object) => object.clone(),
            Value::Undefined | Value::Null => Object::ordinary(),
            primitive => Object::new(ObjectKind::Primitive(primitive.clone())),
        }
    }

    /// `ToBoolean`.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::BigInt(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Object(_) => true,
        }
    }

    /// SameValueZero: like `===` but `NaN` equals itself.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self.same_non_number(other),
        }
    }

    /// SameValue: SameValueZero that also tells `+0` from `-0`.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                (a.is_nan() && b.is_nan()) || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            _ => self.same_non_number(other),
        }
    }

    fn same_non_number(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Structural comparison in the manner of a deep-equal assertion:
    /// primitives by SameValue, arrays element-wise, boxed primitives by
    /// their contents, everything else by identity.
    pub fn deep_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b) || a.structurally_equal(b),
            _ => self.same_value(other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_equal(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(JsString::from(s))
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// Identity-compared symbol.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

#[derive(Debug)]
struct SymbolData {
    description: Option<String>,
}

thread_local! {
    static ITERATOR: Symbol = Symbol::new(Some("Symbol.iterator"));
}

impl Symbol {
    /// Fresh symbol, distinct from every other.
    pub fn new(description: Option<&str>) -> Self {
        Self(Rc::new(SymbolData {
            description: description.map(str::to_string),
        }))
    }

    /// The well-known `Symbol.iterator`.
    pub fn iterator() -> Self {
        ITERATOR.with(Symbol::clone)
    }

    /// Description given at creation.
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// Key of an object property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String-keyed property
    String(JsString),
    /// Symbol-keyed property
    Symbol(Symbol),
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(JsString::from(s))
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::BigInt(1).type_of(), "bigint");
        assert_eq!(Value::from(Object::function("f", |_, _| Ok(Value::Undefined))).type_of(), "function");
        assert_eq!(Value::array([]).type_of(), "object");
    }

    #[test]
    fn test_same_value_zero() {
        assert!(Value::Number(f64::NAN).same_value_zero(&Value::Number(f64::NAN)));
        assert!(Value::Number(0.0).same_value_zero(&Value::Number(-0.0)));
        assert!(!Value::Number(0.0).same_value(&Value::Number(-0.0)));
        assert!(!Value::from(1).same_value_zero(&Value::string("1")));
    }

    #[test]
    fn test_iterator_symbol_is_singleton() {
        assert_eq!(Symbol::iterator(), Symbol::iterator());
        assert_ne!(Symbol::new(Some("Symbol.iterator")), Symbol::iterator());
    }

    #[test]
    fn test_to_object_boxes_primitives() {
        let boxed = Value::string("foo").to_object();
        assert!(matches!(&*boxed.kind(), ObjectKind::Primitive(Value::String(_))));

        let object = Object::ordinary();
        assert!(Value::from(object.clone()).to_object().ptr_eq(&object));
    }

    #[test]
    fn test_deep_equal_arrays() {
        let a = Value::array([Value::from(1), Value::string("a")]);
        let b = Value::array([Value::from(1), Value::string("a")]);
        assert_eq!(a, b);
        assert_ne!(Value::from(Object::ordinary()), Value::from(Object::ordinary()));
    }
}
