//! PropertyMap: string-keyed values, the `Map` variant and `Record` storage.

use std::collections::HashMap;
use super::Value;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;

/// Build a `Value::Map` from (key, value) pairs.
pub fn map_of<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Value
where
    K: Into<String>,
    V: Into<Value>,
{
    Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
}
