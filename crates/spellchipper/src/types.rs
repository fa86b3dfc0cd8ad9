//! # Common Types

/// Token id type used by the tokenization services and tensors.
pub type TokenId = u32;

/// Type Alias for hash maps in this crate.
pub type SCHashMap<K, V> = foldhash::HashMap<K, V>;

/// Create a new hash map with the given capacity.
pub fn hash_map_with_capacity<K, V>(capacity: usize) -> SCHashMap<K, V> {
    foldhash::HashMapExt::with_capacity(capacity)
}

/// Compile-time check that a value is [`Send`].
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: &S) {}

/// Compile-time check that a value is [`Sync`].
#[cfg(test)]
pub(crate) fn check_is_sync<S: Sync>(_: &S) {}
