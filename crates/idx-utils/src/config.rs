//! Configuration lookup utilities

use std::collections::HashMap;

/// Source of configuration values keyed by variable name
///
/// Values are trimmed and empty strings are reported as absent.
pub trait EnvSource {
    /// Raw lookup, without normalization
    fn raw(&self, key: &str) -> Option<String>;

    /// Get a trimmed, non-empty value
    fn get(&self, key: &str) -> Option<String> {
        self.raw(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get a value parsed into `T`, ignoring values that fail to parse
    fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| value.parse().ok())
    }
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn raw(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn raw(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_get_trims_and_skips_empty() {
        let env = source(&[("A", "  value "), ("B", "   ")]);
        // HashMap has an inherent `get`, so go through the trait explicitly
        assert_eq!(EnvSource::get(&env, "A").as_deref(), Some("value"));
        assert_eq!(EnvSource::get(&env, "B"), None);
        assert_eq!(EnvSource::get(&env, "C"), None);
    }

    #[test]
    fn test_parse() {
        let env = source(&[("N", "42"), ("BAD", "forty")]);
        assert_eq!(env.parse::<u64>("N"), Some(42));
        assert_eq!(env.parse::<u64>("BAD"), None);
    }
}
