// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::ConfigurationError;

/// Returns true if `target` starts with at least one of `prefixes`.
pub fn matches<S: AsRef<str>>(target: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|p| target.starts_with(p.as_ref()))
}

/// A set of non-empty string prefixes matched against request targets.
///
/// Order has no effect on matching. The `Display` rendering sorts the entries so descriptions
/// stay stable whatever order the configuration listed them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrefixList {
    prefixes: Vec<String>,
}

impl PrefixList {
    /// Builds a list, rejecting empty prefixes. `list` names the list in errors.
    pub fn new<I, S>(list: &'static str, prefixes: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        if let Some(index) = prefixes.iter().position(|p| p.is_empty()) {
            return Err(ConfigurationError::EmptyPrefix { list, index });
        }
        Ok(PrefixList { prefixes })
    }

    /// Builds a list from an untyped JSON value, as handed over by a config loader.
    ///
    /// `null` is an empty list. Anything but an array of non-empty strings is rejected.
    pub fn from_json_value(
        list: &'static str,
        value: &serde_json::Value,
    ) -> Result<Self, ConfigurationError> {
        let items = match value {
            serde_json::Value::Null => return Ok(PrefixList::default()),
            serde_json::Value::Array(items) => items,
            other => {
                return Err(ConfigurationError::NotAList {
                    list,
                    found: json_type_name(other),
                })
            }
        };

        let mut prefixes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                serde_json::Value::String(s) => prefixes.push(s.clone()),
                other => {
                    return Err(ConfigurationError::NonStringEntry {
                        list,
                        index,
                        found: json_type_name(other),
                    })
                }
            }
        }
        Self::new(list, prefixes)
    }

    /// Parses either a JSON array or a comma separated list. A blank string is an empty list.
    pub fn parse(list: &'static str, s: &str) -> Result<Self, ConfigurationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(PrefixList::default());
        }
        if trimmed.starts_with('[') {
            let value: serde_json::Value =
                serde_json::from_str(trimmed).map_err(|e| ConfigurationError::InvalidValue {
                    name: list,
                    value: s.to_string(),
                    error: e.to_string(),
                })?;
            return Self::from_json_value(list, &value);
        }
        Self::new(list, trimmed.split(',').map(str::trim))
    }

    pub fn matches(&self, target: &str) -> bool {
        matches(target, &self.prefixes)
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl fmt::Display for PrefixList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<&str> = self.iter().collect();
        sorted.sort_unstable();
        write!(f, "{}", sorted.join(","))
    }
}

/// Wrapper used to parse a prefix list from a configuration source.
///
/// The list name is only known by the caller, errors carry a generic one.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ParsedPrefixList(pub PrefixList);

impl FromStr for ParsedPrefixList {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrefixList::parse("prefix list", s).map(ParsedPrefixList)
    }
}

impl<'de> Deserialize<'de> for PrefixList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        PrefixList::from_json_value("prefix list", &value).map_err(serde::de::Error::custom)
    }
}
