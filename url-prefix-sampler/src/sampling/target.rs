// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use opentelemetry::{KeyValue, Value};

use crate::core::constants::attr;
use crate::core::error::ConfigurationError;

/// Attribute keys the request target is read from.
///
/// HTTP instrumentations either report a single combined target (`http.target`) or split it
/// into `url.path` and `url.query`. Which one is in use depends on the instrumentation, so the
/// keys are configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetKeys {
    path: Cow<'static, str>,
    query: Option<Cow<'static, str>>,
}

impl TargetKeys {
    /// `http.target`, which already carries the query string
    pub const fn legacy() -> Self {
        TargetKeys {
            path: Cow::Borrowed(attr::HTTP_TARGET),
            query: None,
        }
    }

    /// `url.path` followed by `url.query`
    pub const fn semconv() -> Self {
        TargetKeys {
            path: Cow::Borrowed(attr::URL_PATH),
            query: Some(Cow::Borrowed(attr::URL_QUERY)),
        }
    }

    pub fn custom(path: impl Into<String>, query: Option<String>) -> Self {
        TargetKeys {
            path: Cow::Owned(path.into()),
            query: query.map(Cow::Owned),
        }
    }

    pub fn path_key(&self) -> &str {
        &self.path
    }

    pub fn query_key(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Derives the matchable target from span attributes.
    ///
    /// Returns the path with the query appended as is, no `?` is inserted. When a key is
    /// repeated the last value wins; values that are not strings are ignored. An empty result
    /// means the span does not come from an inbound request.
    pub fn extract_target<'a>(&self, attributes: &'a [KeyValue]) -> Cow<'a, str> {
        let mut path: Option<&'a str> = None;
        let mut query: Option<&'a str> = None;

        for kv in attributes {
            let Value::String(value) = &kv.value else {
                continue;
            };
            let key = kv.key.as_str();
            if key == self.path {
                path = Some(value.as_str());
            } else if self.query.as_deref() == Some(key) {
                query = Some(value.as_str());
            }
        }

        match (path, query) {
            (Some(p), None) => Cow::Borrowed(p),
            (None, Some(q)) => Cow::Borrowed(q),
            (Some(p), Some(q)) => Cow::Owned(format!("{p}{q}")),
            (None, None) => Cow::Borrowed(""),
        }
    }
}

impl Default for TargetKeys {
    fn default() -> Self {
        Self::semconv()
    }
}

impl FromStr for TargetKeys {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("legacy") => Ok(Self::legacy()),
            s if s.eq_ignore_ascii_case("semconv") => Ok(Self::semconv()),
            other => Err(ConfigurationError::UnknownTargetKeys(other.to_string())),
        }
    }
}

impl fmt::Display for TargetKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::legacy() {
            write!(f, "legacy")
        } else if *self == Self::semconv() {
            write!(f, "semconv")
        } else {
            match &self.query {
                Some(query) => write!(f, "{}+{}", self.path, query),
                None => write!(f, "{}", self.path),
            }
        }
    }
}

/// Extracts the request target with the default key convention.
pub fn extract_target(attributes: &[KeyValue]) -> Cow<'_, str> {
    TargetKeys::default().extract_target(attributes)
}
