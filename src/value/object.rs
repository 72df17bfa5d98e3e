use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::{OrderedMap, OrderedSet, PropertyKey, SparseArray, Value};
use crate::iterator::{FnIterator, IterStep, IteratorObject};
use crate::IterationError;

/// Signature of a native callable: `(this, args) -> result`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, IterationError>;

/// Shared, interior-mutable object handle.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

struct ObjectData {
    kind: ObjectKind,
    properties: HashMap<PropertyKey, Value>,
}

/// Internal shape of an object.
pub enum ObjectKind {
    /// Plain `{}` object
    Ordinary,
    /// Array, possibly sparse
    Array(SparseArray),
    /// Arguments object of a call
    Arguments(Arguments),
    /// Callable
    Function(Function),
    /// Regular expression
    RegExp(RegExpSource),
    /// Boxed primitive, e.g. `Object('foo')`
    Primitive(Value),
    /// Keyed-pair collection
    Map(OrderedMap),
    /// Uniqueness-enforcing collection
    Set(OrderedSet),
    /// Native iterator
    Iterator(Box<dyn IteratorObject>),
}

/// Positional arguments captured from a call.
#[derive(Debug, Clone)]
pub struct Arguments {
    /// Whether the call ran in strict mode.
    pub strict: bool,
    /// Argument values by position.
    pub values: SparseArray,
}

/// Named native callable.
#[derive(Clone)]
pub struct Function {
    name: String,
    call: Rc<NativeFn>,
}

impl Function {
    /// Function name, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish()
    }
}

/// Source text and flags of a regular expression. Never executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExpSource {
    /// Pattern text between the slashes
    pub source: String,
    /// Flag letters
    pub flags: String,
}

impl ObjectKind {
    /// Class name as shown by inspection, e.g. `Array`.
    pub fn class_name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Arguments(_) => "Arguments",
            ObjectKind::Function(_) => "Function",
            ObjectKind::RegExp(_) => "RegExp",
            ObjectKind::Primitive(Value::String(_)) => "String",
            ObjectKind::Primitive(Value::Number(_)) => "Number",
            ObjectKind::Primitive(Value::Boolean(_)) => "Boolean",
            ObjectKind::Primitive(Value::BigInt(_)) => "BigInt",
            ObjectKind::Primitive(Value::Symbol(_)) => "Symbol",
            ObjectKind::Primitive(_) => "Object",
            ObjectKind::Map(_) => "Map",
            ObjectKind::Set(_) => "Set",
            ObjectKind::Iterator(_) => "Iterator",
        }
    }
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Iterator(iterator) => write!(f, "Iterator({})", iterator.kind()),
            other => f.write_str(other.class_name()),
        }
    }
}

impl Object {
    /// Wrap `kind` in a fresh object with no own properties.
    pub fn new(kind: ObjectKind) -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            kind,
            properties: HashMap::new(),
        })))
    }

    /// Plain `{}`.
    pub fn ordinary() -> Self {
        Self::new(ObjectKind::Ordinary)
    }

    /// Dense array.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::new(ObjectKind::Array(SparseArray::from_values(items)))
    }

    /// Array backed by `storage`, holes included.
    pub fn sparse_array(storage: SparseArray) -> Self {
        Self::new(ObjectKind::Array(storage))
    }

    /// Arguments object of a call with `args`.
    pub fn arguments(args: impl IntoIterator<Item = Value>, strict: bool) -> Self {
        Self::new(ObjectKind::Arguments(Arguments {
            strict,
            values: SparseArray::from_values(args),
        }))
    }

    /// Native function.
    pub fn function<F>(name: &str, call: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, IterationError> + 'static,
    {
        Self::new(ObjectKind::Function(Function {
            name: name.to_string(),
            call: Rc::new(call),
        }))
    }

    /// Regular expression `/source/flags`.
    pub fn regexp(source: &str, flags: &str) -> Self {
        Self::new(ObjectKind::RegExp(RegExpSource {
            source: source.to_string(),
            flags: flags.to_string(),
        }))
    }

    /// Map holding `entries`.
    pub fn map(entries: OrderedMap) -> Self {
        Self::new(ObjectKind::Map(entries))
    }

    /// Set holding `members`.
    pub fn set(members: OrderedSet) -> Self {
        Self::new(ObjectKind::Set(members))
    }

    /// Native iterator object.
    pub fn iterator(iterator: impl IteratorObject + 'static) -> Self {
        Self::new(ObjectKind::Iterator(Box::new(iterator)))
    }

    /// Native iterator driven by `next`; `Ok(None)` ends the sequence.
    pub fn iterator_from_fn<F>(name: &'static str, next: F) -> Self
    where
        F: FnMut() -> Result<Option<Value>, IterationError> + 'static,
    {
        Self::iterator(FnIterator::new(name, next))
    }

    /// Borrow the internal kind.
    pub fn kind(&self) -> Ref<'_, ObjectKind> {
        Ref::map(self.0.borrow(), |data| &data.kind)
    }

    /// Mutably borrow the internal kind.
    pub fn kind_mut(&self) -> RefMut<'_, ObjectKind> {
        RefMut::map(self.0.borrow_mut(), |data| &mut data.kind)
    }

    /// Own property lookup.
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        self.0.borrow().properties.get(key).cloned()
    }

    /// Define or overwrite an own property.
    pub fn set_property(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) {
        self.0
            .borrow_mut()
            .properties
            .insert(key.into(), value.into());
    }

    /// Remove an own property, returning whether it existed.
    pub fn delete_property(&self, key: &PropertyKey) -> bool {
        self.0.borrow_mut().properties.remove(key).is_some()
    }

    /// Own property keys; string keys first, each group sorted.
    pub fn property_keys(&self) -> Vec<PropertyKey> {
        let data = self.0.borrow();
        let mut strings: Vec<_> = data
            .properties
            .keys()
            .filter_map(|key| match key {
                PropertyKey::String(s) => Some(s.clone()),
                PropertyKey::Symbol(_) => None,
            })
            .collect();
        strings.sort();
        let symbols = data.properties.keys().filter_map(|key| match key {
            PropertyKey::Symbol(symbol) => Some(PropertyKey::Symbol(symbol.clone())),
            PropertyKey::String(_) => None,
        });
        let mut keys: Vec<_> = strings.into_iter().map(PropertyKey::String).collect();
        keys.extend(symbols);
        keys
    }

    /// Whether the object is a function.
    pub fn is_callable(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Function(_))
    }

    /// Call with `this` and `args`. The object borrow is released before the
    /// callee runs, so it may freely touch this object.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, IterationError> {
        let call = match &self.0.borrow().kind {
            ObjectKind::Function(function) => Rc::clone(&function.call),
            _ => {
                return Err(IterationError::thrown(format!(
                    "{} is not a function",
                    Value::Object(self.clone())
                )))
            }
        };
        call(this, args)
    }

    /// Advance a native iterator; `None` if this is not one.
    pub(crate) fn step_native(&self) -> Option<Result<IterStep, IterationError>> {
        match &mut self.0.borrow_mut().kind {
            ObjectKind::Iterator(iterator) => Some(iterator.next()),
            _ => None,
        }
    }

    /// Length of an array or arguments object.
    pub fn indexed_len(&self) -> Option<usize> {
        match &self.0.borrow().kind {
            ObjectKind::Array(array) => Some(array.len()),
            ObjectKind::Arguments(args) => Some(args.values.len()),
            _ => None,
        }
    }

    /// Element `index` of an array or arguments object; holes read as `undefined`.
    pub fn indexed_get(&self, index: usize) -> Option<Value> {
        let data = self.0.borrow();
        let storage = match &data.kind {
            ObjectKind::Array(array) => array,
            ObjectKind::Arguments(args) => &args.values,
            _ => return None,
        };
        Some(storage.get(index).cloned().unwrap_or(Value::Undefined))
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Borrow for display; fails while the object is being mutated.
    pub(crate) fn try_kind(&self) -> Option<Ref<'_, ObjectKind>> {
        self.0
            .try_borrow()
            .ok()
            .map(|data| Ref::map(data, |data| &data.kind))
    }

    /// Mutable borrow that fails instead of panicking while borrowed.
    pub(crate) fn try_kind_mut(&self) -> Option<RefMut<'_, ObjectKind>> {
        self.0
            .try_borrow_mut()
            .ok()
            .map(|data| RefMut::map(data, |data| &mut data.kind))
    }

    /// Content comparison used by [`Value::deep_equal`]: arrays element-wise
    /// (holes equal `undefined`), boxed primitives by value.
    pub(crate) fn structurally_equal(&self, other: &Object) -> bool {
        let (Some(left), Some(right)) = (self.try_kind(), other.try_kind()) else {
            return false;
        };
        match (&*left, &*right) {
            (ObjectKind::Array(a), ObjectKind::Array(b)) => {
                a.len() == b.len()
                    && a.slots().zip(b.slots()).all(|(x, y)| {
                        let x = x.cloned().unwrap_or(Value::Undefined);
                        let y = y.cloned().unwrap_or(Value::Undefined);
                        x.deep_equal(&y)
                    })
            }
            (ObjectKind::Primitive(a), ObjectKind::Primitive(b)) => a.same_value(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Value::Object(self.clone()), f)
    }
}
