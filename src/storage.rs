use tracing::debug;

/// A string key-value slot provider, such as eframe's app storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

impl<'a> KeyValueStore for dyn eframe::Storage + 'a {
    fn get(&self, key: &str) -> Option<String> {
        self.get_string(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.set_string(key, value);
    }
}

/// One persisted string value: read once at startup, rewritten on every commit of a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedValue {
    key: String,
    value: String,
}

impl PersistedValue {
    /// Reads `key` from `store`, or uses `default` if the store is unavailable or the key is absent.
    pub fn read<S: KeyValueStore + ?Sized>(store: Option<&S>, key: &str, default: &str) -> Self {
        let value = match store.and_then(|store| store.get(key)) {
            Some(value) => value,
            None => {
                debug!(key, default, "no persisted value, using default");
                default.to_string()
            }
        };

        Self {
            key: key.to_string(),
            value,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Records `value` and writes it through. Unchanged values and a missing store skip the write.
    pub fn commit<S: KeyValueStore + ?Sized>(&mut self, store: Option<&mut S>, value: &str) {
        if self.value == value {
            return;
        }
        self.value = value.to_string();

        match store {
            Some(store) => store.set(&self.key, self.value.clone()),
            None => debug!(key = %self.key, "storage unavailable, value not persisted"),
        }
    }
}
