//! Iterator resolution
//!
//! Resolution is an ordered chain of checks:
//! 1. Custom capability (takes precedence over everything below)
//! 2. String
//! 3. Array-like (arrays, arguments objects)
//! 4. Map-like
//! 5. Set-like
//! 6. Built-in iterator (resolves to itself)
//! 7. Not iterable
//!
//! The resolver holds only its configuration and realm; it keeps no state
//! between calls.

mod capability;

use tracing::{debug, trace};

use crate::environment::{Features, ResolverConfig};
use crate::iterator::{ArrayLikeIterator, MapIterator, SetIterator, StringIterator};
use crate::realm::Realm;
use crate::value::{JsString, Object, ObjectKind, Value};
use crate::IterationError;

/// Outcome of shape classification.
#[derive(Debug, Clone)]
pub enum Shape {
    /// The value carries a callable iteration capability
    Capability(Value),
    /// String primitive or boxed string
    String(JsString),
    /// Array or arguments object
    ArrayLike(Object),
    /// Keyed-pair collection
    MapLike(Object),
    /// Uniqueness-enforcing collection
    SetLike(Object),
    /// Native iterator, iterable as itself
    Iterator(Object),
    /// Nothing to iterate
    NotIterable,
}

impl Shape {
    /// Short name for logs and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Capability(_) => "capability",
            Shape::String(_) => "string",
            Shape::ArrayLike(_) => "array-like",
            Shape::MapLike(_) => "map-like",
            Shape::SetLike(_) => "set-like",
            Shape::Iterator(_) => "iterator",
            Shape::NotIterable => "not-iterable",
        }
    }

    /// Whether resolution would produce an iterator.
    pub fn is_iterable(&self) -> bool {
        !matches!(self, Shape::NotIterable)
    }
}

/// Resolves iterators for values.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
    realm: Realm,
}

impl Resolver {
    /// Resolver with pristine intrinsics.
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_realm(config, Realm::new())
    }

    /// Resolver whose capability lookups also consult `realm`.
    pub fn with_realm(config: ResolverConfig, realm: Realm) -> Self {
        Self { config, realm }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Realm in use.
    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    /// Features after the variant has been applied.
    pub fn features(&self) -> Features {
        self.config.effective_features()
    }

    /// Decide how `value` would be iterated, without invoking anything.
    pub fn classify(&self, value: &Value) -> Shape {
        let features = self.features();
        if let Some(method) = capability::find(value, &features, &self.realm) {
            return Shape::Capability(method);
        }

        let object = match value {
            Value::String(s) => return Shape::String(s.clone()),
            Value::Object(object) => object,
            _ => return Shape::NotIterable,
        };
        let shape = match &*object.kind() {
            ObjectKind::Primitive(Value::String(s)) => Shape::String(s.clone()),
            ObjectKind::Array(_) | ObjectKind::Arguments(_) => Shape::ArrayLike(object.clone()),
            ObjectKind::Map(_) => Shape::MapLike(object.clone()),
            ObjectKind::Set(_) => Shape::SetLike(object.clone()),
            ObjectKind::Iterator(_) => Shape::Iterator(object.clone()),
            _ => Shape::NotIterable,
        };
        shape
    }

    /// Resolve an iterator for `value`.
    ///
    /// `Ok(None)` means not iterable. A capability's result is returned
    /// unvalidated; an exception it throws is returned as the error.
    pub fn resolve(&self, value: &Value) -> Result<Option<Value>, IterationError> {
        let shape = self.classify(value);
        trace!(shape = shape.name(), "classified value");

        let iterator = match shape {
            Shape::Capability(method) => {
                debug!("invoking custom iteration capability");
                return method.call(value, &[]).map(Some);
            }
            Shape::String(s) => Object::iterator(StringIterator::new(s)),
            Shape::ArrayLike(object) => Object::iterator(ArrayLikeIterator::new(object)),
            Shape::MapLike(object) => Object::iterator(MapIterator::new(object)),
            Shape::SetLike(object) => Object::iterator(SetIterator::new(object)),
            Shape::Iterator(object) => object,
            Shape::NotIterable => return Ok(None),
        };
        Ok(Some(Value::Object(iterator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Variant;
    use crate::value::{OrderedSet, Symbol};

    fn drain(resolver: &Resolver, value: &Value) -> Vec<Value> {
        resolver
            .resolve(value)
            .unwrap()
            .expect("value is iterable")
            .steps()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_classify_shapes() {
        let resolver = Resolver::default();
        assert_eq!(resolver.classify(&Value::from("x")).name(), "string");
        assert_eq!(resolver.classify(&Value::from("x").to_object().into()).name(), "string");
        assert_eq!(resolver.classify(&Value::array([])).name(), "array-like");
        assert_eq!(resolver.classify(&Object::arguments([], true).into()).name(), "array-like");
        assert_eq!(resolver.classify(&Object::set(OrderedSet::new()).into()).name(), "set-like");
        assert_eq!(resolver.classify(&Value::from(1)).name(), "not-iterable");
        assert!(!resolver.classify(&Value::Null).is_iterable());
    }

    #[test]
    fn test_capability_takes_precedence() {
        let resolver = Resolver::default();
        let array = Object::array([Value::from(1)]);
        array.set_property(
            Symbol::iterator(),
            Object::function("fake", |_, _| {
                let iterator = crate::resolve(&Value::from("ab"))?;
                Ok(iterator.unwrap_or(Value::Undefined))
            }),
        );
        let value = Value::from(array);
        assert_eq!(resolver.classify(&value).name(), "capability");
        assert_eq!(drain(&resolver, &value), vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_capability_receives_value_as_this() {
        let resolver = Resolver::default();
        let object = Object::ordinary();
        object.set_property(
            Symbol::iterator(),
            Object::function("self", |this, args| {
                assert!(args.is_empty());
                Ok(this.clone())
            }),
        );
        let value = Value::from(object);
        let result = resolver.resolve(&value).unwrap().unwrap();
        assert!(result.same_value(&value));
    }

    #[test]
    fn test_built_in_iterator_resolves_to_itself() {
        let resolver = Resolver::default();
        let array = Value::array([Value::from(1), Value::from(2)]);
        let iterator = resolver.resolve(&array).unwrap().unwrap();
        assert_eq!(resolver.classify(&iterator).name(), "iterator");

        let again = resolver.resolve(&iterator).unwrap().expect("iterators are iterable");
        assert!(again.same_value(&iterator));

        // Both handles share one position
        assert_eq!(iterator.step().unwrap().value, Value::from(1));
        assert_eq!(drain(&resolver, &again), vec![Value::from(2)]);
    }

    #[test]
    fn test_iterator_capability_override_wins() {
        let mut realm = Realm::new();
        realm.define(
            crate::realm::Intrinsic::IteratorPrototype,
            Symbol::iterator(),
            Object::function("replace", |_, _| Ok(Value::from(0))),
        );
        let resolver = Resolver::with_realm(ResolverConfig::default(), realm);
        let iterator = resolver.resolve(&Value::from("ab")).unwrap().unwrap();
        assert_eq!(resolver.classify(&iterator).name(), "capability");
        assert_eq!(resolver.resolve(&iterator).unwrap(), Some(Value::from(0)));
    }

    #[test]
    fn test_legacy_key_without_symbols() {
        let legacy = Resolver::new(ResolverConfig::default().with_features(Features::legacy()));
        let object = Object::ordinary();
        object.set_property(Symbol::iterator(), Object::function("sym", |_, _| Ok(Value::Null)));
        let value = Value::from(object.clone());
        assert!(legacy.resolve(&value).unwrap().is_none());

        object.set_property("@@iterator", Object::function("legacy", |_, _| Ok(Value::from(7))));
        assert_eq!(legacy.resolve(&value).unwrap(), Some(Value::from(7)));

        // The native variant ignores the probe and uses the symbol
        let native = Resolver::new(legacy.config().with_variant(Variant::Native));
        assert_eq!(native.resolve(&value).unwrap(), Some(Value::Null));
    }
}
