//! Attribute Bags
//!
//! Every outcome carries an ordered name -> value mapping. Keys are unique,
//! insertion order is preserved, and re-assigning a name overwrites in place
//! (last write wins). Names starting with [`RESERVED_PREFIX`] are internal
//! bookkeeping: readable through raw `get`, excluded from public enumeration.

use serde_json::Value;

/// Ordered attribute mapping attached to every outcome.
///
/// `serde_json::Map` with the `preserve_order` feature keeps insertion order,
/// which the aggregation accessors rely on for deterministic output shapes.
pub type Attrs = serde_json::Map<String, Value>;

/// Prefix marking internal bookkeeping attributes.
pub const RESERVED_PREFIX: &str = "upshot_";

/// Attribute names with pass-through semantics understood by capture.
pub const DESCRIPTION_ATTR: &str = "description";
pub const BACKTRACE_ATTR: &str = "backtrace";
pub const EXCEPTION_ATTR: &str = "exception";

/// Reserved transaction bookkeeping attributes, pre-populated on every
/// transaction's root outcome.
pub const ROLLED_BACK_ATTR: &str = "upshot_transaction_rolled_back";
pub const HALTED_ATTR: &str = "upshot_transaction_halted";

/// Merge `src` into `dst`, last write wins.
pub(crate) fn merge(dst: &mut Attrs, src: Attrs) {
    for (name, value) in src {
        dst.insert(name, value);
    }
}

/// Build an [`Attrs`] bag from `name => value` pairs.
///
/// Values go through `serde_json::json!`, so anything serializable works:
///
/// ```
/// use upshot::attrs;
///
/// let attrs = attrs! { "description" => "charge card", "amount" => 42 };
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => { $crate::Attrs::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attrs::new();
        $(attrs.insert(($name).to_string(), $crate::json!($value));)+
        attrs
    }};
}
