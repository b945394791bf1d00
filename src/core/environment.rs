//! Environment overlay for provider arguments.
//!
//! Every recognized argument can be supplied through a variable named
//! `{PREFIX}_{PROVIDER}_{ARGUMENT}` (uppercased). Values are read through an
//! [`EnvSource`] so callers and tests can substitute the process environment.

use super::Data;
use super::schema::{JsonType, Rule};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// Prefix used when the caller does not pass one
pub const DEFAULT_ENV_PREFIX: &str = "NOTIFIERS";

/// Key/value lookup the pipeline reads environment values from
pub trait EnvSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, mostly useful for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Builds the variable name for one argument, e.g. `NOTIFIERS_DUMMY_MESSAGE`
///
/// A trailing `_` on the prefix is tolerated, so `MY_` and `MY` are equivalent.
pub fn environ_key(prefix: &str, provider: &str, argument: &str) -> String {
    let prefix = prefix.trim_end_matches('_');
    format!("{prefix}_{provider}_{argument}").to_uppercase()
}

/// Collects the environment values of every declared argument
///
/// Empty values are ignored. A value is converted to the argument's declared
/// type when the rule names exactly one of integer, number or boolean and the
/// string parses as such; anything else stays a string.
pub fn collect_environs(
    env: &dyn EnvSource,
    prefix: &str,
    provider: &str,
    arguments: &IndexMap<String, Rule>,
) -> Data {
    tracing::debug!(prefix, provider, "collecting environs");

    let mut environs = Data::new();
    for (argument, rule) in arguments {
        let key = environ_key(prefix, provider, argument);
        let Some(raw) = env.get(&key).filter(|value| !value.is_empty()) else {
            continue;
        };
        tracing::trace!(key = %key, "found environ");
        environs.insert(argument.clone(), coerce(raw, rule));
    }
    environs
}

fn coerce(raw: String, rule: &Rule) -> Value {
    let converted = match rule.single_type() {
        Some(JsonType::Integer) => raw.trim().parse::<i64>().ok().map(Value::from),
        Some(JsonType::Number) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        Some(JsonType::Boolean) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    converted.unwrap_or(Value::String(raw))
}
