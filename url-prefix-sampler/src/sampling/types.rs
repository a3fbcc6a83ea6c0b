// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Type definitions and traits for sampling

use std::fmt;
use std::sync::Arc;

use opentelemetry::trace::{SamplingDecision, SpanContext, SpanKind, TraceState};
use opentelemetry::KeyValue;

use crate::core::constants::description;

/// Everything a sampler looks at when a span starts.
///
/// Borrowed from the tracing runtime for the duration of one decision.
#[derive(Debug, Clone, Copy)]
pub struct SamplingRequest<'a> {
    pub span_kind: &'a SpanKind,
    /// Context of the parent span, `None` for root spans
    pub parent: Option<&'a SpanContext>,
    pub attributes: &'a [KeyValue],
}

impl<'a> SamplingRequest<'a> {
    pub fn new(
        span_kind: &'a SpanKind,
        parent: Option<&'a SpanContext>,
        attributes: &'a [KeyValue],
    ) -> Self {
        SamplingRequest {
            span_kind,
            parent,
            attributes,
        }
    }

    /// A missing parent counts as not sampled
    pub fn is_parent_sampled(&self) -> bool {
        self.parent.is_some_and(SpanContext::is_sampled)
    }

    /// Trace state to carry over onto the new span
    pub fn parent_trace_state(&self) -> TraceState {
        self.parent
            .map(|p| p.trace_state().clone())
            .unwrap_or_default()
    }

    /// Builds the outcome for `decision`, copying the parent trace state verbatim
    pub fn outcome(&self, decision: SamplingDecision) -> SamplingOutcome {
        SamplingOutcome {
            decision,
            trace_state: self.parent_trace_state(),
        }
    }
}

/// A sampling decision together with the trace state handed to the new span.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOutcome {
    pub decision: SamplingDecision,
    pub trace_state: TraceState,
}

impl SamplingOutcome {
    pub fn is_sampled(&self) -> bool {
        self.decision == SamplingDecision::RecordAndSample
    }

    pub fn to_otel_result(self) -> opentelemetry::trace::SamplingResult {
        opentelemetry::trace::SamplingResult {
            decision: self.decision,
            attributes: Vec::new(),
            trace_state: self.trace_state,
        }
    }
}

/// A decision function over sampling requests.
///
/// Implementations hold only immutable configuration: they are shared across threads and
/// called concurrently without any locking.
pub trait Sampler: fmt::Debug + Send + Sync {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome;

    /// Human readable rendering of the configuration, stable across runs
    fn description(&self) -> String;
}

impl<S: Sampler + ?Sized> Sampler for Arc<S> {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome {
        (**self).should_sample(request)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome {
        (**self).should_sample(request)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// Sampler that always takes the same decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantSampler {
    sample: bool,
}

impl ConstantSampler {
    pub const fn always_on() -> Self {
        ConstantSampler { sample: true }
    }

    pub const fn always_off() -> Self {
        ConstantSampler { sample: false }
    }
}

impl Sampler for ConstantSampler {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome {
        request.outcome(if self.sample {
            SamplingDecision::RecordAndSample
        } else {
            SamplingDecision::Drop
        })
    }

    fn description(&self) -> String {
        if self.sample {
            description::ALWAYS_ON.to_string()
        } else {
            description::ALWAYS_OFF.to_string()
        }
    }
}
