//! Process-wide directory of named groups. Written once per group at
//! configuration time, read on every request, never shrunk.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use super::{Group, Loader};

static GROUPS: LazyLock<RwLock<HashMap<String, Arc<Group>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Creates and registers a group.
///
/// # Panics
/// Panics if a group with the same name already exists. Group names are a
/// process-wide namespace; a silent replacement would strand callers on a
/// stale handle.
pub fn new_group(name: &str, cache_bytes: usize, loader: Arc<dyn Loader>) -> Arc<Group> {
    let mut groups = GROUPS.write().expect("group registry poisoned");

    if groups.contains_key(name) {
        // Release the lock before panicking; a poisoned registry would take
        // every other group down with this one.
        drop(groups);
        panic!("group {:?} is already registered", name);
    }

    let group = Arc::new(Group::new(name, cache_bytes, loader));
    groups.insert(name.to_string(), group.clone());
    group
}

/// Returns the named group previously created with [`new_group`].
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GROUPS
        .read()
        .expect("group registry poisoned")
        .get(name)
        .cloned()
}

/// Returns every registered group, for the stats surface.
pub fn list_groups() -> Vec<Arc<Group>> {
    GROUPS
        .read()
        .expect("group registry poisoned")
        .values()
        .cloned()
        .collect()
}

/// Drops a group so its name can be reused. The registry is append-only in
/// production; this exists so tests can reclaim names.
#[cfg(test)]
pub(crate) fn unregister(name: &str) -> Option<Arc<Group>> {
    GROUPS
        .write()
        .expect("group registry poisoned")
        .remove(name)
}
