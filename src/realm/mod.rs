//! Intrinsic prototypes
//!
//! A realm holds the properties installed on built-in prototypes. Primitives
//! have no own properties, so boxing a primitive for a capability lookup
//! means consulting its prototype here. This is how a polyfill that makes
//! numbers iterable is modelled.

use std::collections::HashMap;

use crate::value::{ObjectKind, PropertyKey, Value};

/// Built-in prototype objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    /// `Object.prototype`, the end of every chain
    ObjectPrototype,
    /// `String.prototype`
    StringPrototype,
    /// `Number.prototype`
    NumberPrototype,
    /// `Boolean.prototype`
    BooleanPrototype,
    /// `BigInt.prototype`
    BigIntPrototype,
    /// `Symbol.prototype`
    SymbolPrototype,
    /// `Array.prototype`
    ArrayPrototype,
    /// `Function.prototype`
    FunctionPrototype,
    /// `RegExp.prototype`
    RegExpPrototype,
    /// `Map.prototype`
    MapPrototype,
    /// `Set.prototype`
    SetPrototype,
    /// `%IteratorPrototype%`
    IteratorPrototype,
}

/// Properties installed on intrinsic prototypes.
#[derive(Debug, Clone, Default)]
pub struct Realm {
    prototypes: HashMap<Intrinsic, HashMap<PropertyKey, Value>>,
}

impl Realm {
    /// Realm with pristine prototypes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `value` under `key` on `intrinsic`.
    pub fn define(
        &mut self,
        intrinsic: Intrinsic,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.prototypes
            .entry(intrinsic)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Remove `key` from `intrinsic`, returning the old value.
    pub fn remove(&mut self, intrinsic: Intrinsic, key: &PropertyKey) -> Option<Value> {
        self.prototypes.get_mut(&intrinsic)?.remove(key)
    }

    /// Property `key` of `intrinsic` itself, not following the chain.
    pub fn get(&self, intrinsic: Intrinsic, key: &PropertyKey) -> Option<&Value> {
        self.prototypes.get(&intrinsic)?.get(key)
    }

    /// Look `key` up along the chain starting at `intrinsic`.
    pub fn lookup(&self, intrinsic: Intrinsic, key: &PropertyKey) -> Option<&Value> {
        self.get(intrinsic, key).or_else(|| {
            if intrinsic == Intrinsic::ObjectPrototype {
                None
            } else {
                self.get(Intrinsic::ObjectPrototype, key)
            }
        })
    }

    /// Prototype a value's own lookup continues on; `None` for nullish values.
    pub fn prototype_of(value: &Value) -> Option<Intrinsic> {
        let intrinsic = match value {
            Value::Undefined | Value::Null => return None,
            Value::Boolean(_) => Intrinsic::BooleanPrototype,
            Value::Number(_) => Intrinsic::NumberPrototype,
            Value::BigInt(_) => Intrinsic::BigIntPrototype,
            Value::String(_) => Intrinsic::StringPrototype,
            Value::Symbol(_) => Intrinsic::SymbolPrototype,
            Value::Object(object) => match &*object.kind() {
                ObjectKind::Ordinary | ObjectKind::Arguments(_) => Intrinsic::ObjectPrototype,
                ObjectKind::Array(_) => Intrinsic::ArrayPrototype,
                ObjectKind::Function(_) => Intrinsic::FunctionPrototype,
                ObjectKind::RegExp(_) => Intrinsic::RegExpPrototype,
                ObjectKind::Map(_) => Intrinsic::MapPrototype,
                ObjectKind::Set(_) => Intrinsic::SetPrototype,
                ObjectKind::Iterator(_) => Intrinsic::IteratorPrototype,
                ObjectKind::Primitive(inner) => return Self::prototype_of(inner),
            },
        };
        Some(intrinsic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, Symbol};

    #[test]
    fn test_lookup_falls_back_to_object_prototype() {
        let mut realm = Realm::new();
        realm.define(Intrinsic::ObjectPrototype, "shared", 1);
        realm.define(Intrinsic::NumberPrototype, "own", 2);

        let shared = PropertyKey::from("shared");
        assert_eq!(realm.lookup(Intrinsic::NumberPrototype, &shared), Some(&Value::from(1)));
        assert_eq!(realm.get(Intrinsic::NumberPrototype, &shared), None);
        assert_eq!(
            realm.lookup(Intrinsic::NumberPrototype, &PropertyKey::from("own")),
            Some(&Value::from(2))
        );
    }

    #[test]
    fn test_remove() {
        let mut realm = Realm::new();
        let key = PropertyKey::Symbol(Symbol::iterator());
        realm.define(Intrinsic::StringPrototype, key.clone(), Value::Null);
        assert!(realm.remove(Intrinsic::StringPrototype, &key).is_some());
        assert!(realm.get(Intrinsic::StringPrototype, &key).is_none());
    }

    #[test]
    fn test_prototype_of() {
        assert_eq!(Realm::prototype_of(&Value::Null), None);
        assert_eq!(Realm::prototype_of(&Value::from(1)), Some(Intrinsic::NumberPrototype));
        assert_eq!(
            Realm::prototype_of(&Value::from(1).to_object().into()),
            Some(Intrinsic::NumberPrototype)
        );
        assert_eq!(
            Realm::prototype_of(&Value::from(Object::arguments([], false))),
            Some(Intrinsic::ObjectPrototype)
        );
    }
}
