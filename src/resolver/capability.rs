use tracing::trace;

use crate::environment::Features;
use crate::realm::{Intrinsic, Realm};
use crate::value::Value;

/// Find a callable iteration capability on `value`.
///
/// Primitives are boxed: their lookup starts at the realm prototype for
/// their type. Objects check own properties first, then their prototype
/// chain. Nullish values never carry one. A property that is present but not
/// callable does not count.
pub(super) fn find(value: &Value, features: &Features, realm: &Realm) -> Option<Value> {
    let key = features.capability_key();

    let own = value.as_object().and_then(|object| object.get(&key));
    let found = match own {
        Some(method) => Some(method),
        None => {
            let intrinsic = Realm::prototype_of(value)?;
            if !intrinsic_available(intrinsic, features) {
                return None;
            }
            realm.lookup(intrinsic, &key).cloned()
        }
    };

    match found {
        Some(method) if method.is_callable() => Some(method),
        Some(method) => {
            trace!(%method, "ignoring non-callable iteration capability");
            None
        }
        None => None,
    }
}

/// Big-integer prototypes only exist where big integers do.
fn intrinsic_available(intrinsic: Intrinsic, features: &Features) -> bool {
    intrinsic != Intrinsic::BigIntPrototype || features.big_int
}
