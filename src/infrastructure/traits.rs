//! I/O boundary traits for testability
//!
//! These traits abstract the process environment and the filesystem,
//! allowing services to be tested with in-memory implementations.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;

/// Key/value lookup the binder resolves source keys against.
pub trait EnvSource {
    /// Value for `key`, or `None` if the key is not present at all.
    ///
    /// A present-but-empty value is `Some("")`.
    fn get(&self, key: &str) -> Option<String>;
}

impl EnvSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<T: EnvSource + ?Sized> EnvSource for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Ordered stack of sources; the first layer holding a key answers,
/// even when its value is empty.
#[derive(Default)]
pub struct LayeredEnv {
    layers: Vec<Box<dyn EnvSource>>,
}

impl LayeredEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than the existing ones.
    pub fn with(mut self, layer: impl EnvSource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl EnvSource for LayeredEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn given_key_in_both_layers_when_looking_up_then_first_layer_wins() {
        let env = LayeredEnv::new()
            .with(map(&[("A", "top")]))
            .with(map(&[("A", "bottom"), ("B", "only-bottom")]));

        assert_eq!(env.get("A").as_deref(), Some("top"));
        assert_eq!(env.get("B").as_deref(), Some("only-bottom"));
        assert_eq!(env.get("C"), None);
    }

    #[test]
    fn given_empty_value_in_first_layer_when_looking_up_then_empty_shadows_lower() {
        let env = LayeredEnv::new()
            .with(map(&[("A", "")]))
            .with(map(&[("A", "bottom")]));

        assert_eq!(env.get("A").as_deref(), Some(""));
    }
}
