use std::collections::HashMap;
use std::env;

/// Immutable copy of the process environment, captured once at startup.
///
/// Discovery is a pure function of a snapshot, so tests can feed fixed
/// variable sets without touching the real process environment.
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    /// Builds a snapshot from fixed pairs; used by tests and embedders.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}
