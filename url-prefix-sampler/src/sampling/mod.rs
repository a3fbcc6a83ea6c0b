// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Sampling decision engine
//!
//! - Prefix matching of request targets against allow and block lists
//! - Extraction of the request target from span attributes
//! - The URL prefix sampler itself
//! - Span kind based overrides and composition

pub mod prefix_matcher;
pub mod span_kind_sampler;
pub mod target;
pub mod types;
pub mod url_prefix_sampler;

pub use prefix_matcher::PrefixList;
pub use span_kind_sampler::{
    parse_span_kind_policies, ClientSpanOverride, SamplerMap, SpanKindPolicy, SpanKindSampler,
};
pub use target::TargetKeys;
pub use types::{ConstantSampler, Sampler, SamplingOutcome, SamplingRequest};
pub use url_prefix_sampler::{SamplerConfig, UrlPrefixSampler};
