use numpath_core::PathPrefix;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_prefix(key: &str) -> Option<PathPrefix> {
    let raw = local_storage().and_then(|s| s.get_item(key).ok().flatten())?;
    raw.parse().ok()
}

pub(crate) fn store_prefix(key: &str, prefix: Option<&PathPrefix>) {
    let Some(storage) = local_storage() else {
        return;
    };
    let _ = match prefix {
        Some(prefix) => storage.set_item(key, &prefix.to_string()),
        None => storage.remove_item(key),
    };
}
