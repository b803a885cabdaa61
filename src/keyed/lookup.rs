use std::collections::HashMap;
use std::hash::Hash;

/// Value at the position of the first key equal to `find_key`.
///
/// `None` when the key is absent or its position is past the end of `values`.
pub fn find_value_at_key<'a, T>(find_key: &str, keys: &[String], values: &'a [T]) -> Option<&'a T> {
    let position = keys.iter().position(|key| key == find_key)?;
    values.get(position)
}

/// Build a map from `source`; later items overwrite earlier ones on key clashes.
pub fn key_map<S, K, V>(
    source: impl IntoIterator<Item = S>,
    key_fn: impl Fn(&S) -> K,
    value_fn: impl Fn(&S) -> V,
) -> HashMap<K, V>
where
    K: Eq + Hash,
{
    let mut map = HashMap::new();
    for item in source {
        map.insert(key_fn(&item), value_fn(&item));
    }
    map
}
