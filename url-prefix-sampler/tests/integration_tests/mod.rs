// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::{SpanKind, Tracer, TracerProvider};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use url_prefix_sampler::{configure_tracer_provider, Config};

mod env_config;
mod tracer_provider;

pub fn make_test_tracer(config: &Config) -> (SdkTracerProvider, SdkTracer) {
    let tracer_provider = configure_tracer_provider(SdkTracerProvider::builder(), config).build();
    let tracer = tracer_provider.tracer("url-prefix-sampler-tests");
    (tracer_provider, tracer)
}

/// Starts a span and returns it, the caller decides on the parent context
pub fn start_span(
    tracer: &SdkTracer,
    cx: &opentelemetry::Context,
    kind: SpanKind,
    attributes: Vec<KeyValue>,
) -> opentelemetry_sdk::trace::Span {
    tracer
        .span_builder("test")
        .with_kind(kind)
        .with_attributes(attributes)
        .start_with_context(tracer, cx)
}
