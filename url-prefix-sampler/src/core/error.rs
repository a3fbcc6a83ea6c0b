// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[repr(transparent)]
pub struct Error {
    inner: anyhow::Error,
}

impl Error {
    /// Returns the configuration error behind this error, if that is what it wraps
    pub fn as_configuration_error(&self) -> Option<&ConfigurationError> {
        self.inner.downcast_ref::<ConfigurationError>()
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Sync + Send + 'static,
{
    fn from(error: E) -> Self {
        Self {
            inner: anyhow::Error::new(error),
        }
    }
}

impl From<Error> for Box<dyn std::error::Error + Send + Sync> {
    fn from(error: Error) -> Box<dyn std::error::Error + Send + Sync> {
        error.inner.into()
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

/// Malformed sampler configuration.
///
/// Only ever produced while building the sampler, never while taking a decision.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{list} entry {index} must be a string, found {found}")]
    NonStringEntry {
        list: &'static str,
        index: usize,
        found: &'static str,
    },
    #[error("{list} entry {index} is an empty prefix")]
    EmptyPrefix { list: &'static str, index: usize },
    #[error("{list} must be a list of strings, found {found}")]
    NotAList {
        list: &'static str,
        found: &'static str,
    },
    #[error("failed to parse {name}={value:?}: {error}")]
    InvalidValue {
        name: &'static str,
        value: String,
        error: String,
    },
    #[error("unknown span kind {0:?}")]
    UnknownSpanKind(String),
    #[error("unknown span kind policy {0:?}")]
    UnknownPolicy(String),
    #[error("unknown target key convention {0:?}, expected `legacy` or `semconv`")]
    UnknownTargetKeys(String),
    #[error("unknown sampler config field {0:?}, expected one of `allowlist`, `blocklist`, `allow_parent_trace`")]
    UnknownField(String),
}
