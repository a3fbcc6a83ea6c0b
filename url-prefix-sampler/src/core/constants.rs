// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared constants for the url-prefix-sampler crate

/// Attribute keys the request target is extracted from
pub mod attr {
    /// Combined path and query key of the pre-1.21 HTTP conventions
    pub const HTTP_TARGET: &str = "http.target";
    /// Path key of the stable URL conventions
    pub const URL_PATH: &str = opentelemetry_semantic_conventions::attribute::URL_PATH;
    /// Query key of the stable URL conventions
    pub const URL_QUERY: &str = opentelemetry_semantic_conventions::attribute::URL_QUERY;
}

/// Names used in sampler descriptions
pub mod description {
    pub const URL_PREFIX_SAMPLER: &str = "ConfiguredURLPrefixSampler";
    pub const CLIENT_SPAN_OVERRIDE: &str = "SpanKindBasedSampler";
    pub const SPAN_KIND_SAMPLER: &str = "SpanKindBasedSampler";
    pub const ALWAYS_ON: &str = "AlwaysOnSampler";
    pub const ALWAYS_OFF: &str = "AlwaysOffSampler";
}

/// Names of the prefix lists, as reported in configuration errors
pub mod list {
    pub const ALLOWLIST: &str = "allowlist";
    pub const BLOCKLIST: &str = "blocklist";
}
