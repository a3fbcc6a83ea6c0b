// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Mutex, MutexGuard};

use opentelemetry::trace::{Span, SpanKind};
use opentelemetry::{Context, KeyValue};
use url_prefix_sampler::{build_sampler, Config, ConfigurationError};

use crate::{make_test_tracer, start_span};

const ENV: [(&str, &str); 2] = [
    ("URL_SAMPLER_ALLOWLIST", r#"["/api"]"#),
    ("URL_SAMPLER_BLOCKLIST", "/api/internal"),
];

// Only this module touches the URL_SAMPLER_* environment variables, other tests override every
// value they depend on with setters.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn test_config_from_environment() {
    let _env = lock_env();
    for (key, value) in ENV {
        std::env::set_var(key, value);
    }
    let config = Config::builder().build();
    std::env::set_var("URL_SAMPLER_BLOCKLIST", r#"["/api", 1]"#);
    let invalid = Config::builder().build();
    for (key, _) in ENV {
        std::env::remove_var(key);
    }

    let config = config.expect("valid configuration");
    assert_eq!(
        build_sampler(&config).description(),
        "SpanKindBasedSampler{base:ConfiguredURLPrefixSampler{allowlist:/api,blocklist:/api/internal,allowParentTrace:false}}"
    );

    let (tracer_provider, tracer) = make_test_tracer(&config);
    let span = start_span(
        &tracer,
        &Context::new(),
        SpanKind::Server,
        vec![KeyValue::new("url.path", "/api/users")],
    );
    assert!(span.span_context().is_sampled());
    tracer_provider.shutdown().expect("failed to shutdown");

    let err = invalid.expect_err("non string entries are rejected");
    assert!(matches!(
        err.as_configuration_error(),
        Some(ConfigurationError::InvalidValue {
            name: "URL_SAMPLER_BLOCKLIST",
            ..
        })
    ));
}

#[cfg(unix)]
#[test]
fn test_non_unicode_environment_value_is_rejected() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let _env = lock_env();
    std::env::set_var(
        "URL_SAMPLER_BLOCKLIST",
        OsString::from_vec(b"/admin,/\xff".to_vec()),
    );
    let result = Config::builder().build();
    std::env::remove_var("URL_SAMPLER_BLOCKLIST");

    let err = result.expect_err("an undecodable blocklist must not be ignored");
    match err.as_configuration_error() {
        Some(ConfigurationError::InvalidValue { name, value, .. }) => {
            assert_eq!(*name, "URL_SAMPLER_BLOCKLIST");
            assert_eq!(value, "/admin,/\u{fffd}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}
