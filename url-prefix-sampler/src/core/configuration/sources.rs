// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt::Display, str::FromStr};

use crate::core::configuration::supported_configurations::SupportedConfigurations;

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceOrigin {
    Default,
    EnvVar,
    Code,
}

#[derive(Debug, PartialEq)]
pub(crate) struct ConfigKey<T> {
    pub(crate) value: T,
    pub(crate) origin: ConfigSourceOrigin,
}

/// A value a source holds for a key but that cannot be used
#[derive(Debug, PartialEq)]
pub(crate) struct RejectedValue {
    pub desired_type: &'static str,
    pub error: Cow<'static, str>,
    /// Lossy rendering of what the source held
    pub value: String,
    pub origin: ConfigSourceOrigin,
}

/// Where `URL_SAMPLER_*` values are read from
pub(crate) trait ConfigurationSource {
    fn origin(&self) -> ConfigSourceOrigin;

    /// Raw value of `key`, `Ok(None)` when this source does not set it
    fn raw(&self, key: SupportedConfigurations) -> Result<Option<String>, RejectedValue>;
}

/// Process environment, keyed by the configuration name
pub(crate) struct EnvSource;

impl ConfigurationSource for EnvSource {
    fn origin(&self) -> ConfigSourceOrigin {
        ConfigSourceOrigin::EnvVar
    }

    fn raw(&self, key: SupportedConfigurations) -> Result<Option<String>, RejectedValue> {
        let Some(value) = std::env::var_os(key.as_str()) else {
            return Ok(None);
        };
        value.into_string().map(Some).map_err(|value| RejectedValue {
            desired_type: "UTF-8 string",
            error: Cow::Borrowed("value is not valid unicode"),
            value: value.to_string_lossy().into_owned(),
            origin: self.origin(),
        })
    }
}

/// Sources of configuration, highest precedence first
pub(crate) struct ConfigSources {
    sources: Vec<Box<dyn ConfigurationSource>>,
}

impl ConfigSources {
    pub fn from_env() -> Self {
        Self {
            sources: vec![Box::new(EnvSource)],
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn push<C: ConfigurationSource + 'static>(&mut self, source: C) {
        self.sources.push(Box::new(source));
    }

    /// Parses the value of `key` from the highest precedence source that sets it.
    ///
    /// A value that is set but unusable stops the lookup, lower precedence sources are not
    /// consulted for that key.
    pub fn lookup<T>(
        &self,
        key: SupportedConfigurations,
    ) -> Result<Option<ConfigKey<T>>, RejectedValue>
    where
        T: FromStr,
        T::Err: Display,
    {
        for source in &self.sources {
            let Some(raw) = source.raw(key)? else {
                continue;
            };
            return match raw.parse::<T>() {
                Ok(value) => Ok(Some(ConfigKey {
                    value,
                    origin: source.origin(),
                })),
                Err(e) => Err(RejectedValue {
                    desired_type: std::any::type_name::<T>(),
                    error: Cow::Owned(e.to_string()),
                    value: raw,
                    origin: source.origin(),
                }),
            };
        }
        Ok(None)
    }
}

/// In memory source, lets tests configure the sampler without touching the process environment
#[cfg(test)]
pub(crate) struct HashMapSource {
    map: std::collections::HashMap<&'static str, String>,
    origin: ConfigSourceOrigin,
}

#[cfg(test)]
impl HashMapSource {
    pub(crate) fn from_iter<V: ToString, T: IntoIterator<Item = (&'static str, V)>>(
        map: T,
        origin: ConfigSourceOrigin,
    ) -> Self {
        HashMapSource {
            map: map.into_iter().map(|(k, v)| (k, v.to_string())).collect(),
            origin,
        }
    }
}

#[cfg(test)]
impl ConfigurationSource for HashMapSource {
    fn origin(&self) -> ConfigSourceOrigin {
        self.origin
    }

    fn raw(&self, key: SupportedConfigurations) -> Result<Option<String>, RejectedValue> {
        Ok(self.map.get(key.as_str()).cloned())
    }
}
