// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Every configuration key the sampler reads
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedConfigurations {
    URL_SAMPLER_ALLOWLIST,
    URL_SAMPLER_BLOCKLIST,
    URL_SAMPLER_ALLOW_PARENT_TRACE,
    URL_SAMPLER_TARGET_KEYS,
    URL_SAMPLER_CLIENT_ALWAYS_SAMPLE,
    URL_SAMPLER_SPAN_KIND_OVERRIDES,
    URL_SAMPLER_LOG_LEVEL,
}

impl SupportedConfigurations {
    pub const ALL: [SupportedConfigurations; 7] = [
        Self::URL_SAMPLER_ALLOWLIST,
        Self::URL_SAMPLER_BLOCKLIST,
        Self::URL_SAMPLER_ALLOW_PARENT_TRACE,
        Self::URL_SAMPLER_TARGET_KEYS,
        Self::URL_SAMPLER_CLIENT_ALWAYS_SAMPLE,
        Self::URL_SAMPLER_SPAN_KIND_OVERRIDES,
        Self::URL_SAMPLER_LOG_LEVEL,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::URL_SAMPLER_ALLOWLIST => "URL_SAMPLER_ALLOWLIST",
            Self::URL_SAMPLER_BLOCKLIST => "URL_SAMPLER_BLOCKLIST",
            Self::URL_SAMPLER_ALLOW_PARENT_TRACE => "URL_SAMPLER_ALLOW_PARENT_TRACE",
            Self::URL_SAMPLER_TARGET_KEYS => "URL_SAMPLER_TARGET_KEYS",
            Self::URL_SAMPLER_CLIENT_ALWAYS_SAMPLE => "URL_SAMPLER_CLIENT_ALWAYS_SAMPLE",
            Self::URL_SAMPLER_SPAN_KIND_OVERRIDES => "URL_SAMPLER_SPAN_KIND_OVERRIDES",
            Self::URL_SAMPLER_LOG_LEVEL => "URL_SAMPLER_LOG_LEVEL",
        }
    }
}
