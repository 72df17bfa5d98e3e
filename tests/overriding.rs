//! Custom iteration capabilities: precedence, prototype installs, legacy
//! keys and misbehaving capabilities

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use get_iterator::environment::LEGACY_ITERATOR_KEY;
use get_iterator::iterator::IterStep;
use get_iterator::value::SparseArray;
use get_iterator::{
    resolve, Features, Intrinsic, IterationError, Object, Realm, Resolver, ResolverConfig,
    Shape, Symbol, Value, Variant,
};
use test_case::test_case;

fn yields_fake() -> Object {
    Object::function("fakeIterator", |_, _| {
        Ok(resolve(&Value::array(fake_values()))?.unwrap_or(Value::Undefined))
    })
}

/// Capability that iterates `0..this` for a numeric receiver.
fn count_up() -> Object {
    Object::function("countUp", |this, _| {
        let Value::Number(limit) = this else {
            return Err(IterationError::thrown("receiver is not a number"));
        };
        let limit = *limit as i32;
        let mut next = 0;
        Ok(Value::Object(Object::iterator_from_fn("Count Iterator", move || {
            if next >= limit {
                return Ok(None);
            }
            next += 1;
            Ok(Some(Value::from(next - 1)))
        })))
    })
}

#[test_case(Variant::Standard ; "standard")]
#[test_case(Variant::Native ; "native")]
fn prototype_capability_makes_numbers_iterable(variant: Variant) {
    let mut realm = Realm::new();
    realm.define(Intrinsic::NumberPrototype, Symbol::iterator(), count_up());
    let resolver = Resolver::with_realm(ResolverConfig::default().with_variant(variant), realm);

    assert_yields(&resolver, &Value::from(3), &numbers(&[0, 1, 2]));
    assert_yields(&resolver, &Value::from(0), &[]);
    assert_not_iterable(&resolver, &Value::from(true));
}

#[test]
fn object_prototype_capability_reaches_every_object() {
    let mut realm = Realm::new();
    realm.define(Intrinsic::ObjectPrototype, Symbol::iterator(), yields_fake());
    let resolver = Resolver::with_realm(ResolverConfig::default(), realm);

    assert_yields(&resolver, &Object::ordinary().into(), &fake_values());
    assert_yields(&resolver, &Value::array(numbers(&[1])), &fake_values());
    assert_yields(&resolver, &Value::from("abc"), &fake_values());
    assert_not_iterable(&resolver, &Value::Null);
}

#[test]
fn capability_beats_every_shape() {
    let resolver = resolver_for(Variant::Standard);
    let sparse = Object::sparse_array(SparseArray::with_len(5));
    sparse.set_property(Symbol::iterator(), yields_fake());
    assert!(matches!(resolver.classify(&sparse.clone().into()), Shape::Capability(_)));
    assert_yields(&resolver, &sparse.into(), &fake_values());
}

#[test]
fn capability_receives_value_as_this() {
    let seen = Rc::new(Cell::new(false));
    let object = Object::ordinary();
    let target = object.clone();
    let flag = Rc::clone(&seen);
    object.set_property(
        Symbol::iterator(),
        Object::function("check", move |this, args| {
            let is_target = this.as_object().is_some_and(|o| o.ptr_eq(&target));
            flag.set(is_target && args.is_empty());
            Ok(Value::array([]))
        }),
    );
    resolver_for(Variant::Standard).resolve(&object.into()).unwrap();
    assert!(seen.get());
}

#[test]
fn malformed_capability_result_is_returned_as_is() {
    let object = Object::ordinary();
    object.set_property(Symbol::iterator(), Object::function("bad", |_, _| Ok(Value::from(42))));

    let resolved = resolver_for(Variant::Standard).resolve(&object.into()).unwrap();
    let iterator = resolved.expect("capability result is passed through");
    assert_eq!(iterator, Value::from(42));
    assert!(matches!(iterator.step(), Err(IterationError::NotAnIterator(_))));
}

#[test]
fn throwing_capability_propagates() {
    let object = Object::ordinary();
    object.set_property(
        Symbol::iterator(),
        Object::function("boom", |_, _| Err(IterationError::thrown("boom"))),
    );
    let result = resolver_for(Variant::Standard).resolve(&object.into());
    assert_eq!(result, Err(IterationError::Thrown("boom".to_string())));
}

#[test]
fn non_callable_capability_falls_through() {
    let resolver = resolver_for(Variant::Standard);
    let array = Object::array(numbers(&[1, 2]));
    array.set_property(Symbol::iterator(), "not a function");
    assert_yields(&resolver, &array.into(), &numbers(&[1, 2]));

    let plain = Object::ordinary();
    plain.set_property(Symbol::iterator(), Value::Null);
    assert_not_iterable(&resolver, &plain.into());
}

#[test]
fn protocol_objects_with_next_are_stepped() {
    let object = Object::ordinary();
    object.set_property(
        Symbol::iterator(),
        Object::function("protocol", |_, _| {
            let count = Rc::new(Cell::new(0));
            let iterator = Object::ordinary();
            iterator.set_property(
                "next",
                Object::function("next", move |_, _| {
                    let n = count.get();
                    count.set(n + 1);
                    let step = if n < 2 {
                        IterStep::yielded(Value::from(n))
                    } else {
                        IterStep::done()
                    };
                    Ok(Value::Object(step.to_object()))
                }),
            );
            Ok(Value::Object(iterator))
        }),
    );
    assert_yields(&resolver_for(Variant::Standard), &object.into(), &numbers(&[0, 1]));
}

#[test]
fn next_returning_a_primitive_is_rejected() {
    let iterator = Object::ordinary();
    iterator.set_property("next", Object::function("next", |_, _| Ok(Value::from(1))));
    let result = Value::Object(iterator).step();
    assert!(matches!(result, Err(IterationError::InvalidStepResult(_))));
}

#[test]
fn legacy_key_is_used_without_symbol_support() {
    let legacy = Resolver::new(ResolverConfig::default().with_features(Features::legacy()));

    let keyed = Object::ordinary();
    keyed.set_property(LEGACY_ITERATOR_KEY, yields_fake());
    assert_yields(&legacy, &keyed.clone().into(), &fake_values());

    let symbol_keyed = Object::ordinary();
    symbol_keyed.set_property(Symbol::iterator(), yields_fake());
    assert_not_iterable(&legacy, &symbol_keyed.clone().into());

    // Built-in shapes do not depend on the capability key
    assert_yields(&legacy, &Value::from("ab"), &strings(&["a", "b"]));

    // The native variant always has symbols
    let native = Resolver::new(legacy.config().with_variant(Variant::Native));
    assert_yields(&native, &symbol_keyed.into(), &fake_values());
    assert_not_iterable(&native, &keyed.into());
}
