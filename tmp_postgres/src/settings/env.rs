//! Environment provider that knows the shape of [`Settings`](super::Settings).
//!
//! Wraps `figment::providers::Env`. Text knobs keep the raw string even when
//! it looks like a number or boolean, so `TMP_POSTGRES_PASSWORD=1234` stays a
//! password. List knobs split on commas unless the value starts with `[`,
//! which is parsed as an inline array instead. Everything else is parsed the
//! way `Env` parses it.

use figment::{
    Metadata, Profile, Provider,
    error::Error,
    providers::Env,
    util::nest,
    value::{Dict, Map, Value},
};

/// Keys whose values are always strings.
const TEXT_KEYS: &[&str] = &[
    "host",
    "socket_directory",
    "data_directory",
    "dbname",
    "user",
    "password",
];

/// Keys whose values are lists of strings.
const LIST_KEYS: &[&str] = &["postgres_config"];

/// Environment provider for settings.
#[derive(Clone)]
pub struct SettingsEnv {
    inner: Env,
}

impl SettingsEnv {
    /// Read variables starting with `prefix`, with the prefix stripped.
    #[must_use]
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            inner: Env::prefixed(prefix),
        }
    }

    fn parse_value(key: &str, raw: &str) -> Value {
        let trimmed = raw.trim();
        if TEXT_KEYS.contains(&key) {
            Value::from(raw.to_owned())
        } else if LIST_KEYS.contains(&key) && !trimmed.starts_with('[') {
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::from(item.to_owned()))
                .collect::<Vec<_>>()
                .into()
        } else {
            trimmed
                .parse()
                .unwrap_or_else(|_| Value::from(trimmed.to_owned()))
        }
    }
}

impl Provider for SettingsEnv {
    fn metadata(&self) -> Metadata {
        self.inner.metadata()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.inner.profile.clone())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        for (key, raw) in self.inner.iter() {
            let value = Self::parse_value(key.as_str(), &raw);
            let Some(nested) = nest(key.as_str(), value).into_dict() else {
                return Err(Error::from(format!(
                    "environment key `{key}` produced a non-object value"
                )));
            };
            dict.extend(nested);
        }
        Ok(self.inner.profile.collect(dict))
    }
}
