// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! OpenTelemetry SDK sampler

use std::sync::Arc;

use opentelemetry::trace::{Link, SamplingResult, SpanKind, TraceContextExt, TraceId};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::ShouldSample;

use crate::sampling::{Sampler, SamplingRequest};

/// Plugs a [`Sampler`] into an OpenTelemetry tracer provider.
///
/// Only the parent context, the span kind and the attributes are looked at. The trace id, the
/// span name and the links never influence the decision.
#[derive(Debug, Clone)]
pub struct OtelSampler {
    sampler: Arc<dyn Sampler>,
}

impl OtelSampler {
    pub fn new(sampler: Arc<dyn Sampler>) -> Self {
        Self { sampler }
    }

    pub fn description(&self) -> String {
        self.sampler.description()
    }
}

impl ShouldSample for OtelSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        _trace_id: TraceId,
        _name: &str,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
        _links: &[Link],
    ) -> SamplingResult {
        let parent = parent_context
            .filter(|c| c.has_active_span())
            .map(|c| c.span().span_context().clone());

        self.sampler
            .should_sample(&SamplingRequest::new(
                span_kind,
                parent.as_ref(),
                attributes,
            ))
            .to_otel_result()
    }
}
