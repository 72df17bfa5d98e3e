//! Arrays and arguments objects

mod common;

use common::*;
use get_iterator::value::SparseArray;
use get_iterator::{Object, ObjectKind, Value, Variant};
use test_case::test_case;

#[test_case(Variant::Standard ; "standard")]
#[test_case(Variant::Native ; "native")]
fn arrays(variant: Variant) {
    let resolver = resolver_for(variant);
    assert_yields(&resolver, &Value::array([]), &[]);
    assert_yields(&resolver, &Value::array(numbers(&[1, 2])), &numbers(&[1, 2]));
}

#[test_case(Variant::Standard ; "standard")]
#[test_case(Variant::Native ; "native")]
fn sparse_array_does_not_skip_holes(variant: Variant) {
    let resolver = resolver_for(variant);
    let sparse = SparseArray::from_slots([Some(Value::from(1)), None, Some(Value::from(3))]);
    assert_yields(
        &resolver,
        &Object::sparse_array(sparse).into(),
        &[Value::from(1), Value::Undefined, Value::from(3)],
    );
}

#[test]
fn all_hole_array_yields_length_undefineds() {
    let resolver = resolver_for(Variant::Standard);
    let items = drain(&resolver, &Object::sparse_array(SparseArray::with_len(4)).into());
    assert_eq!(items, vec![Value::Undefined; 4]);
}

#[test_case(Variant::Standard ; "standard")]
#[test_case(Variant::Native ; "native")]
fn array_with_fake_iterator(variant: Variant) {
    assert_fake_iterator(&resolver_for(variant), &Value::array(numbers(&[1, 2, 3])));
}

#[test_case(true ; "strict")]
#[test_case(false ; "sloppy")]
fn arguments_objects(strict: bool) {
    for variant in [Variant::Standard, Variant::Native] {
        let resolver = resolver_for(variant);
        assert_yields(&resolver, &Object::arguments([], strict).into(), &[]);
        assert_yields(
            &resolver,
            &Object::arguments(numbers(&[1, 2, 3]), strict).into(),
            &numbers(&[1, 2, 3]),
        );
        assert_fake_iterator(&resolver, &Object::arguments(numbers(&[1, 2, 3]), strict).into());
    }
}

#[test]
fn array_mutation_is_observed() {
    let resolver = resolver_for(Variant::Standard);
    let array = Object::array(numbers(&[1, 2]));
    let iterator = resolver.resolve(&array.clone().into()).unwrap().unwrap();

    assert_eq!(iterator.step().unwrap().value, Value::from(1));
    if let ObjectKind::Array(storage) = &mut *array.kind_mut() {
        storage.set(1, Value::from("two"));
        storage.push(Value::from(3));
    }
    let rest: Vec<Value> = iterator.steps().collect::<Result<_, _>>().unwrap();
    assert_eq!(rest, vec![Value::from("two"), Value::from(3)]);
}

#[test]
fn shrinking_array_ends_early() {
    let resolver = resolver_for(Variant::Standard);
    let array = Object::array(numbers(&[1, 2, 3]));
    let iterator = resolver.resolve(&array.clone().into()).unwrap().unwrap();

    iterator.step().unwrap();
    if let ObjectKind::Array(storage) = &mut *array.kind_mut() {
        storage.set_len(1);
    }
    assert!(iterator.step().unwrap().done);
}
