// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use opentelemetry::trace::{SamplingDecision, SpanKind};

use crate::core::constants::description;
use crate::core::error::ConfigurationError;

use super::types::{ConstantSampler, Sampler, SamplingOutcome, SamplingRequest};

static SPAN_KINDS: [SpanKind; 5] = [
    SpanKind::Client,
    SpanKind::Server,
    SpanKind::Producer,
    SpanKind::Consumer,
    SpanKind::Internal,
];

fn kind_index(kind: &SpanKind) -> usize {
    match kind {
        SpanKind::Client => 0,
        SpanKind::Server => 1,
        SpanKind::Producer => 2,
        SpanKind::Consumer => 3,
        SpanKind::Internal => 4,
    }
}

/// Lowercase name of a span kind, as used in descriptions and configuration
pub fn span_kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Client => "client",
        SpanKind::Server => "server",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
        SpanKind::Internal => "internal",
    }
}

pub fn parse_span_kind(s: &str) -> Result<SpanKind, ConfigurationError> {
    let s = s.trim();
    SPAN_KINDS
        .iter()
        .find(|kind| span_kind_name(kind).eq_ignore_ascii_case(s))
        .cloned()
        .ok_or_else(|| ConfigurationError::UnknownSpanKind(s.to_string()))
}

/// Always samples client spans, other kinds are decided by `base`.
///
/// Outgoing calls stay traceable this way even when the inbound request that triggered them
/// was not sampled.
#[derive(Debug, Clone)]
pub struct ClientSpanOverride<S> {
    base: S,
}

impl<S: Sampler> ClientSpanOverride<S> {
    pub fn new(base: S) -> Self {
        ClientSpanOverride { base }
    }

    pub fn base(&self) -> &S {
        &self.base
    }
}

impl<S: Sampler> Sampler for ClientSpanOverride<S> {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome {
        if matches!(request.span_kind, SpanKind::Client) {
            return request.outcome(SamplingDecision::RecordAndSample);
        }
        self.base.should_sample(request)
    }

    fn description(&self) -> String {
        format!(
            "{}{{base:{}}}",
            description::CLIENT_SPAN_OVERRIDE,
            self.base.description()
        )
    }
}

/// Samplers indexed by span kind
#[derive(Debug, Clone, Default)]
pub struct SamplerMap {
    samplers: [Option<Arc<dyn Sampler>>; 5],
}

impl SamplerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampler for `kind`, replacing any previous one
    pub fn with(mut self, kind: SpanKind, sampler: Arc<dyn Sampler>) -> Self {
        self.insert(kind, sampler);
        self
    }

    pub fn insert(&mut self, kind: SpanKind, sampler: Arc<dyn Sampler>) {
        self.samplers[kind_index(&kind)] = Some(sampler);
    }

    pub fn get(&self, kind: &SpanKind) -> Option<&Arc<dyn Sampler>> {
        self.samplers[kind_index(kind)].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.samplers.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.samplers.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpanKind, &Arc<dyn Sampler>)> {
        SPAN_KINDS
            .iter()
            .zip(self.samplers.iter())
            .filter_map(|(kind, sampler)| Some((kind, sampler.as_ref()?)))
    }
}

impl FromIterator<(SpanKind, Arc<dyn Sampler>)> for SamplerMap {
    fn from_iter<T: IntoIterator<Item = (SpanKind, Arc<dyn Sampler>)>>(iter: T) -> Self {
        let mut map = SamplerMap::new();
        for (kind, sampler) in iter {
            map.insert(kind, sampler);
        }
        map
    }
}

/// Delegates each span to the sampler configured for its kind, or to `root` when there is none.
#[derive(Debug, Clone)]
pub struct SpanKindSampler {
    root: Arc<dyn Sampler>,
    config: SamplerMap,
}

impl SpanKindSampler {
    pub fn new(root: Arc<dyn Sampler>, config: SamplerMap) -> Self {
        SpanKindSampler { root, config }
    }
}

impl Sampler for SpanKindSampler {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome {
        match self.config.get(request.span_kind) {
            Some(sampler) => sampler.should_sample(request),
            None => self.root.should_sample(request),
        }
    }

    fn description(&self) -> String {
        let mut config: Vec<String> = self
            .config
            .iter()
            .map(|(kind, sampler)| format!("{}:{}", span_kind_name(kind), sampler.description()))
            .collect();
        config.sort();

        format!(
            "{}{{root:{},config:{{{}}}}}",
            description::SPAN_KIND_SAMPLER,
            self.root.description(),
            config.join(",")
        )
    }
}

/// Policy applied to one span kind when overrides come from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKindPolicy {
    AlwaysOn,
    AlwaysOff,
    /// Decided by the allow/block lists
    UrlPrefix,
}

impl FromStr for SpanKindPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("always_on") => Ok(SpanKindPolicy::AlwaysOn),
            s if s.eq_ignore_ascii_case("always_off") => Ok(SpanKindPolicy::AlwaysOff),
            s if s.eq_ignore_ascii_case("url_prefix") => Ok(SpanKindPolicy::UrlPrefix),
            other => Err(ConfigurationError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for SpanKindPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpanKindPolicy::AlwaysOn => "always_on",
            SpanKindPolicy::AlwaysOff => "always_off",
            SpanKindPolicy::UrlPrefix => "url_prefix",
        })
    }
}

impl SpanKindPolicy {
    /// Sampler implementing the policy, `url_prefix` is shared for [`SpanKindPolicy::UrlPrefix`]
    pub fn to_sampler(self, url_prefix: &Arc<dyn Sampler>) -> Arc<dyn Sampler> {
        match self {
            SpanKindPolicy::AlwaysOn => Arc::new(ConstantSampler::always_on()),
            SpanKindPolicy::AlwaysOff => Arc::new(ConstantSampler::always_off()),
            SpanKindPolicy::UrlPrefix => url_prefix.clone(),
        }
    }
}

/// Parses `kind:policy` pairs separated by commas, e.g. `producer:always_on,internal:always_off`.
///
/// A kind given twice keeps its last policy.
pub fn parse_span_kind_policies(
    s: &str,
) -> Result<Vec<(SpanKind, SpanKindPolicy)>, ConfigurationError> {
    s.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<(SpanKind, SpanKindPolicy), ConfigurationError> {
            let (kind, policy) = pair
                .split_once(':')
                .ok_or_else(|| ConfigurationError::UnknownPolicy(pair.to_string()))?;
            Ok((parse_span_kind(kind)?, policy.parse::<SpanKindPolicy>()?))
        })
        .collect()
}
