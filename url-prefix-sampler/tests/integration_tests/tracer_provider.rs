// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::{Span, SpanKind, TraceContextExt};
use opentelemetry::{Context, KeyValue};
use url_prefix_sampler::{Config, PrefixList, SpanKindPolicy, TargetKeys};

use crate::{make_test_tracer, start_span};

fn list(name: &'static str, prefixes: &[&str]) -> PrefixList {
    PrefixList::new(name, prefixes.iter().copied()).expect("valid prefixes")
}

fn api_config(allow_parent_trace: bool, client_always_sample: bool) -> Config {
    Config::builder()
        .set_allowlist(list("allowlist", &["/api", "/graphql"]))
        .set_blocklist(list("blocklist", &["/api/internal"]))
        .set_allow_parent_trace(allow_parent_trace)
        .set_target_keys(TargetKeys::semconv())
        .set_client_always_sample(client_always_sample)
        .set_span_kind_overrides(vec![])
        .build()
        .expect("valid configuration")
}

#[test]
fn test_root_server_spans() {
    let (tracer_provider, tracer) = make_test_tracer(&api_config(false, true));
    let cx = Context::new();

    for (path, query, sampled) in [
        ("/api/users", None, true),
        ("/graphql", Some("?op=list"), true),
        ("/api/internal/health", None, false),
        ("/static/app.js", None, false),
    ] {
        let mut attributes = vec![KeyValue::new("url.path", path)];
        if let Some(query) = query {
            attributes.push(KeyValue::new("url.query", query));
        }
        let mut span = start_span(&tracer, &cx, SpanKind::Server, attributes);
        assert_eq!(span.span_context().is_sampled(), sampled, "{path}");
        assert_eq!(span.is_recording(), sampled, "{path}");
        span.end();
    }

    tracer_provider.shutdown().expect("failed to shutdown");
}

#[test]
fn test_client_spans_are_always_sampled() {
    let (tracer_provider, tracer) = make_test_tracer(&api_config(false, true));
    let span = start_span(
        &tracer,
        &Context::new(),
        SpanKind::Client,
        vec![KeyValue::new("url.path", "/api/internal/secret")],
    );
    assert!(span.span_context().is_sampled());
    drop(span);
    tracer_provider.shutdown().expect("failed to shutdown");

    let (tracer_provider, tracer) = make_test_tracer(&api_config(false, false));
    let span = start_span(
        &tracer,
        &Context::new(),
        SpanKind::Client,
        vec![KeyValue::new("url.path", "/static")],
    );
    assert!(!span.span_context().is_sampled());
    drop(span);
    tracer_provider.shutdown().expect("failed to shutdown");
}

#[test]
fn test_children_without_target_follow_parent() {
    let (tracer_provider, tracer) = make_test_tracer(&api_config(false, false));

    for (path, sampled) in [("/api/users", true), ("/static", false)] {
        let parent = start_span(
            &tracer,
            &Context::new(),
            SpanKind::Server,
            vec![KeyValue::new("url.path", path)],
        );
        let cx = Context::new().with_span(parent);
        let child = start_span(&tracer, &cx, SpanKind::Internal, vec![]);
        assert_eq!(child.span_context().is_sampled(), sampled, "{path}");
        assert_eq!(
            child.span_context().trace_id(),
            cx.span().span_context().trace_id()
        );
    }

    tracer_provider.shutdown().expect("failed to shutdown");
}

#[test]
fn test_parent_trace_forces_child_target() {
    for (allow_parent_trace, child_path, sampled) in [
        (false, "/static", false),
        (true, "/static", true),
        // blocked targets stay dropped even under a sampled parent
        (true, "/api/internal/x", false),
    ] {
        let (tracer_provider, tracer) = make_test_tracer(&api_config(allow_parent_trace, false));
        let parent = start_span(
            &tracer,
            &Context::new(),
            SpanKind::Server,
            vec![KeyValue::new("url.path", "/api/users")],
        );
        assert!(parent.span_context().is_sampled());

        let cx = Context::new().with_span(parent);
        let child = start_span(
            &tracer,
            &cx,
            SpanKind::Server,
            vec![KeyValue::new("url.path", child_path)],
        );
        assert_eq!(
            child.span_context().is_sampled(),
            sampled,
            "allow_parent_trace={allow_parent_trace} {child_path}"
        );
        tracer_provider.shutdown().expect("failed to shutdown");
    }
}

#[test]
fn test_legacy_target_key() {
    let config = Config::builder()
        .set_allowlist(list("allowlist", &["/api"]))
        .set_blocklist(list("blocklist", &[]))
        .set_target_keys(TargetKeys::legacy())
        .set_client_always_sample(false)
        .set_span_kind_overrides(vec![])
        .build()
        .expect("valid configuration");
    let (tracer_provider, tracer) = make_test_tracer(&config);

    let span = start_span(
        &tracer,
        &Context::new(),
        SpanKind::Server,
        vec![KeyValue::new("http.target", "/api/users?id=1")],
    );
    assert!(span.span_context().is_sampled());

    // semconv keys are ignored under the legacy convention
    let span = start_span(
        &tracer,
        &Context::new(),
        SpanKind::Server,
        vec![KeyValue::new("url.path", "/api/users")],
    );
    assert!(!span.span_context().is_sampled());

    tracer_provider.shutdown().expect("failed to shutdown");
}

#[test]
fn test_span_kind_overrides() {
    let config = Config::builder()
        .set_allowlist(list("allowlist", &["/api"]))
        .set_blocklist(list("blocklist", &[]))
        .set_target_keys(TargetKeys::semconv())
        .set_client_always_sample(false)
        .set_span_kind_overrides(vec![
            (SpanKind::Producer, SpanKindPolicy::AlwaysOn),
            (SpanKind::Internal, SpanKindPolicy::AlwaysOff),
        ])
        .build()
        .expect("valid configuration");
    let (tracer_provider, tracer) = make_test_tracer(&config);
    let cx = Context::new();

    for (kind, path, sampled) in [
        (SpanKind::Producer, "/static", true),
        (SpanKind::Internal, "/api/users", false),
        (SpanKind::Server, "/api/users", true),
        (SpanKind::Consumer, "/static", false),
    ] {
        let span = start_span(&tracer, &cx, kind.clone(), vec![KeyValue::new("url.path", path)]);
        assert_eq!(span.span_context().is_sampled(), sampled, "{kind:?} {path}");
    }

    tracer_provider.shutdown().expect("failed to shutdown");
}
