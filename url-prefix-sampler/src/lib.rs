// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Head sampling of traces by request URL prefix.
//!
//! Spans are kept or dropped when they start, from the request target found in their attributes
//! matched against an allowlist and a blocklist of prefixes. Client spans and other span kinds
//! can be given their own policy.
//!
//! # Usage
//! ```rust
//! use opentelemetry_sdk::trace::SdkTracerProvider;
//! use url_prefix_sampler::Config;
//!
//! // Picks up the URL_SAMPLER_* environment variables
//! let config = Config::builder().build().expect("invalid sampler configuration");
//!
//! let tracer_provider =
//!     url_prefix_sampler::configure_tracer_provider(SdkTracerProvider::builder(), &config)
//!         .build();
//! # let _ = tracer_provider.shutdown();
//! ```

pub mod core;
pub mod sampler;
pub mod sampling;

use std::sync::Arc;

use opentelemetry_sdk::trace::TracerProviderBuilder;

pub use crate::core::{Config, ConfigurationError, Error, Result};
pub use crate::sampler::OtelSampler;
pub use crate::sampling::{
    ClientSpanOverride, ConstantSampler, PrefixList, Sampler, SamplerConfig, SamplerMap,
    SamplingOutcome, SamplingRequest, SpanKindPolicy, SpanKindSampler, TargetKeys,
    UrlPrefixSampler,
};

/// Assembles the sampler described by `config`.
///
/// The URL prefix sampler is the root. Span kind overrides, if any, are layered on top of it and
/// the client span override wraps everything when enabled.
pub fn build_sampler(config: &Config) -> Arc<dyn Sampler> {
    let root: Arc<dyn Sampler> = Arc::new(UrlPrefixSampler::new(
        config.sampler_config(),
        config.target_keys().clone(),
    ));

    let sampler = if config.span_kind_overrides().is_empty() {
        root
    } else {
        let overrides: SamplerMap = config
            .span_kind_overrides()
            .iter()
            .map(|(kind, policy)| (kind.clone(), policy.to_sampler(&root)))
            .collect();
        Arc::new(SpanKindSampler::new(root, overrides))
    };

    let sampler: Arc<dyn Sampler> = if config.client_always_sample() {
        Arc::new(ClientSpanOverride::new(sampler))
    } else {
        sampler
    };

    sampler_info!("using sampler {}", sampler.description());
    sampler
}

/// Installs the sampler described by `config` on a tracer provider builder.
///
/// Nothing is registered globally, the caller decides what to do with the provider.
pub fn configure_tracer_provider(
    tracer_provider_builder: TracerProviderBuilder,
    config: &Config,
) -> TracerProviderBuilder {
    tracer_provider_builder.with_sampler(OtelSampler::new(build_sampler(config)))
}
