#![allow(dead_code)]

use get_iterator::{resolve, Object, Resolver, ResolverConfig, Symbol, Value, Variant};

/// Values yielded by every fake capability.
pub fn fake_values() -> Vec<Value> {
    ["fake", "iterator", "scary"].into_iter().map(Value::from).collect()
}

pub fn resolver_for(variant: Variant) -> Resolver {
    Resolver::new(ResolverConfig::default().with_variant(variant))
}

/// Resolve and drain `value`, panicking with a readable message if it is not
/// iterable or its iterator misbehaves.
pub fn drain(resolver: &Resolver, value: &Value) -> Vec<Value> {
    let iterator = resolver
        .resolve(value)
        .expect("resolution does not throw")
        .unwrap_or_else(|| panic!("{value} is not iterable"));
    iterator
        .steps()
        .collect::<Result<_, _>>()
        .unwrap_or_else(|err| panic!("iterating {value} failed: {err}"))
}

/// Drain `value` and compare element-wise, reporting the first mismatch.
pub fn assert_yields(resolver: &Resolver, value: &Value, expected: &[Value]) {
    let actual = drain(resolver, value);
    for (index, (got, want)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(got, want, "index {index} of {value}: expected {want}, got {got}");
    }
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {} values from {value}, got {}",
        expected.len(),
        actual.len()
    );
}

pub fn assert_not_iterable(resolver: &Resolver, value: &Value) {
    let resolved = resolver.resolve(value).expect("resolution does not throw");
    assert!(resolved.is_none(), "{value} should not be iterable");
}

/// Box `value` and give it an iteration capability that yields
/// [`fake_values`] instead of its own elements.
pub fn with_fake_iterator(value: &Value) -> Value {
    let object = value.to_object();
    object.set_property(
        Symbol::iterator(),
        Object::function("fakeIterator", |_, _| {
            let iterator = resolve(&Value::array(fake_values()))?;
            Ok(iterator.expect("arrays are iterable"))
        }),
    );
    Value::Object(object)
}

/// The capability overrides whatever the value would otherwise yield.
pub fn assert_fake_iterator(resolver: &Resolver, value: &Value) {
    let faked = with_fake_iterator(value);
    assert_yields(resolver, &faked, &fake_values());
}

pub fn strings(items: &[&str]) -> Vec<Value> {
    items.iter().copied().map(Value::from).collect()
}

pub fn numbers(items: &[i32]) -> Vec<Value> {
    items.iter().copied().map(Value::from).collect()
}
