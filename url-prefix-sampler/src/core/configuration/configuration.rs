// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{fmt::Display, str::FromStr};

use opentelemetry::trace::SpanKind;

use crate::core::configuration::sources::{ConfigKey, ConfigSourceOrigin, ConfigSources};
use crate::core::configuration::supported_configurations::SupportedConfigurations;
use crate::core::error::{ConfigurationError, Result};
use crate::core::log::LevelFilter;
use crate::sampler_debug;
use crate::sampling::prefix_matcher::ParsedPrefixList;
use crate::sampling::{parse_span_kind_policies, PrefixList, SamplerConfig, SpanKindPolicy, TargetKeys};

/// Wrapper to parse "," separated `kind:policy` pairs
#[derive(Debug, Default, Clone, PartialEq)]
struct ParsedSpanKindPolicies(Vec<(SpanKind, SpanKindPolicy)>);

impl FromStr for ParsedSpanKindPolicies {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_span_kind_policies(s).map(ParsedSpanKindPolicies)
    }
}

#[derive(Debug, Clone)]
struct ConfigItem<T> {
    name: SupportedConfigurations,
    value: T,
    origin: ConfigSourceOrigin,
}

impl<T> ConfigItem<T> {
    fn new(name: SupportedConfigurations, default: T) -> Self {
        Self {
            name,
            value: default,
            origin: ConfigSourceOrigin::Default,
        }
    }

    fn set_code(&mut self, value: T) {
        self.value = value;
        self.origin = ConfigSourceOrigin::Code;
    }

    fn value(&self) -> &T {
        &self.value
    }
}

/// Applies the highest precedence value found in the sources to config items.
///
/// The first value that fails to parse is recorded as an error for its key, lower precedence
/// sources are not consulted for that key.
struct ConfigItemSourceUpdater<'a> {
    sources: &'a ConfigSources,
    errors: Vec<(SupportedConfigurations, ConfigurationError)>,
}

impl ConfigItemSourceUpdater<'_> {
    fn update_parsed<T>(&mut self, item: ConfigItem<T>) -> ConfigItem<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.update_parsed_with_transform(item, |value: T| value)
    }

    fn update_parsed_with_transform<ParsedConfig, ItemType, F>(
        &mut self,
        mut item: ConfigItem<ItemType>,
        transform: F,
    ) -> ConfigItem<ItemType>
    where
        ParsedConfig: FromStr,
        ParsedConfig::Err: Display,
        F: FnOnce(ParsedConfig) -> ItemType,
    {
        match self.sources.lookup::<ParsedConfig>(item.name) {
            Ok(Some(ConfigKey { value, origin })) => {
                item.value = transform(value);
                item.origin = origin;
            }
            Ok(None) => {}
            Err(rejected) => {
                sampler_debug!(
                    "{} from {:?} could not be read as {}",
                    item.name.as_str(),
                    rejected.origin,
                    rejected.desired_type
                );
                self.errors.push((
                    item.name,
                    ConfigurationError::InvalidValue {
                        name: item.name.as_str(),
                        value: rejected.value,
                        error: rejected.error.into_owned(),
                    },
                ));
            }
        }
        item
    }
}

/// Configuration of the URL prefix sampler
///
/// Established once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefixes of the targets to sample, empty means all
    allowlist: ConfigItem<PrefixList>,
    /// Prefixes of the targets never to sample, wins over the allowlist
    blocklist: ConfigItem<PrefixList>,
    /// Let a sampled parent force through targets that are not on the allowlist
    allow_parent_trace: ConfigItem<bool>,
    /// Attribute keys the target is read from
    target_keys: ConfigItem<TargetKeys>,
    /// Sample every client span regardless of the other rules
    client_always_sample: ConfigItem<bool>,
    /// Per span kind policies replacing the URL prefix decision
    span_kind_overrides: ConfigItem<Vec<(SpanKind, SpanKindPolicy)>>,
    log_level_filter: ConfigItem<LevelFilter>,
}

fn default_config() -> Config {
    Config {
        allowlist: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_ALLOWLIST,
            PrefixList::default(),
        ),
        blocklist: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_BLOCKLIST,
            PrefixList::default(),
        ),
        allow_parent_trace: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_ALLOW_PARENT_TRACE,
            false,
        ),
        target_keys: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_TARGET_KEYS,
            TargetKeys::default(),
        ),
        client_always_sample: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_CLIENT_ALWAYS_SAMPLE,
            true,
        ),
        span_kind_overrides: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_SPAN_KIND_OVERRIDES,
            Vec::new(),
        ),
        log_level_filter: ConfigItem::new(
            SupportedConfigurations::URL_SAMPLER_LOG_LEVEL,
            LevelFilter::default(),
        ),
    }
}

impl Config {
    fn from_sources(
        sources: &ConfigSources,
    ) -> (Self, Vec<(SupportedConfigurations, ConfigurationError)>) {
        let default = default_config();
        let mut cisu = ConfigItemSourceUpdater {
            sources,
            errors: Vec::new(),
        };

        let config = Self {
            allowlist: cisu
                .update_parsed_with_transform(default.allowlist, |ParsedPrefixList(l)| l),
            blocklist: cisu
                .update_parsed_with_transform(default.blocklist, |ParsedPrefixList(l)| l),
            allow_parent_trace: cisu.update_parsed(default.allow_parent_trace),
            target_keys: cisu.update_parsed(default.target_keys),
            client_always_sample: cisu.update_parsed(default.client_always_sample),
            span_kind_overrides: cisu.update_parsed_with_transform(
                default.span_kind_overrides,
                |ParsedSpanKindPolicies(p)| p,
            ),
            log_level_filter: cisu.update_parsed(default.log_level_filter),
        };
        (config, cisu.errors)
    }

    pub(crate) fn builder_with_sources(sources: &ConfigSources) -> ConfigBuilder {
        let (config, errors) = Config::from_sources(sources);
        ConfigBuilder { config, errors }
    }

    /// Creates a new builder, seeded from the `URL_SAMPLER_*` environment variables
    pub fn builder() -> ConfigBuilder {
        Self::builder_with_sources(&ConfigSources::from_env())
    }

    pub fn allowlist(&self) -> &PrefixList {
        self.allowlist.value()
    }

    pub fn blocklist(&self) -> &PrefixList {
        self.blocklist.value()
    }

    pub fn allow_parent_trace(&self) -> bool {
        *self.allow_parent_trace.value()
    }

    /// The allow/block part of the configuration
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            allowlist: self.allowlist.value().clone(),
            blocklist: self.blocklist.value().clone(),
            allow_parent_trace: *self.allow_parent_trace.value(),
        }
    }

    pub fn target_keys(&self) -> &TargetKeys {
        self.target_keys.value()
    }

    pub fn client_always_sample(&self) -> bool {
        *self.client_always_sample.value()
    }

    pub fn span_kind_overrides(&self) -> &[(SpanKind, SpanKindPolicy)] {
        self.span_kind_overrides.value()
    }

    pub fn log_level_filter(&self) -> &LevelFilter {
        self.log_level_filter.value()
    }

    /// Where each configuration value came from
    pub fn origins(&self) -> Vec<(&'static str, ConfigSourceOrigin)> {
        [
            (self.allowlist.name, self.allowlist.origin),
            (self.blocklist.name, self.blocklist.origin),
            (self.allow_parent_trace.name, self.allow_parent_trace.origin),
            (self.target_keys.name, self.target_keys.origin),
            (self.client_always_sample.name, self.client_always_sample.origin),
            (self.span_kind_overrides.name, self.span_kind_overrides.origin),
            (self.log_level_filter.name, self.log_level_filter.origin),
        ]
        .into_iter()
        .map(|(name, origin)| (name.as_str(), origin))
        .collect()
    }
}

pub struct ConfigBuilder {
    config: Config,
    errors: Vec<(SupportedConfigurations, ConfigurationError)>,
}

impl ConfigBuilder {
    /// Finalizes the builder and returns the configuration
    ///
    /// Fails on the first configuration value that could not be parsed and was not overridden
    /// by a setter.
    pub fn build(&self) -> Result<Config> {
        if let Some((_, error)) = self.errors.first() {
            return Err(error.clone().into());
        }
        if self.config.log_level_filter.origin != ConfigSourceOrigin::Default {
            crate::core::log::set_max_level(*self.config.log_level_filter.value());
        }
        let config = self.config.clone();
        sampler_debug!("sampler configuration: {config:?}");
        Ok(config)
    }

    fn clear_error(&mut self, name: SupportedConfigurations) {
        self.errors.retain(|(n, _)| *n != name);
    }

    /// Prefixes of the request targets to sample. An empty list samples every target.
    ///
    /// **Default**: `(none)`
    ///
    /// Env variable: `URL_SAMPLER_ALLOWLIST`, a JSON array or a comma separated list
    pub fn set_allowlist(&mut self, allowlist: PrefixList) -> &mut Self {
        self.clear_error(self.config.allowlist.name);
        self.config.allowlist.set_code(allowlist);
        self
    }

    /// Prefixes of the request targets never to sample, even when allowed.
    ///
    /// **Default**: `(none)`
    ///
    /// Env variable: `URL_SAMPLER_BLOCKLIST`, a JSON array or a comma separated list
    pub fn set_blocklist(&mut self, blocklist: PrefixList) -> &mut Self {
        self.clear_error(self.config.blocklist.name);
        self.config.blocklist.set_code(blocklist);
        self
    }

    /// When true, a span whose target is not allowed is still sampled if its parent was.
    ///
    /// **Default**: `false`
    ///
    /// Env variable: `URL_SAMPLER_ALLOW_PARENT_TRACE`
    pub fn set_allow_parent_trace(&mut self, allow_parent_trace: bool) -> &mut Self {
        self.clear_error(self.config.allow_parent_trace.name);
        self.config.allow_parent_trace.set_code(allow_parent_trace);
        self
    }

    /// Sets the allowlist, the blocklist and the parent policy at once
    pub fn set_sampler_config(&mut self, config: SamplerConfig) -> &mut Self {
        self.set_allowlist(config.allowlist)
            .set_blocklist(config.blocklist)
            .set_allow_parent_trace(config.allow_parent_trace)
    }

    /// Attribute keys the request target is read from.
    ///
    /// **Default**: `semconv` (`url.path` + `url.query`)
    ///
    /// Env variable: `URL_SAMPLER_TARGET_KEYS`, `legacy` or `semconv`
    pub fn set_target_keys(&mut self, target_keys: TargetKeys) -> &mut Self {
        self.clear_error(self.config.target_keys.name);
        self.config.target_keys.set_code(target_keys);
        self
    }

    /// Sample every client span, whatever the other rules decide.
    ///
    /// **Default**: `true`
    ///
    /// Env variable: `URL_SAMPLER_CLIENT_ALWAYS_SAMPLE`
    pub fn set_client_always_sample(&mut self, client_always_sample: bool) -> &mut Self {
        self.clear_error(self.config.client_always_sample.name);
        self.config.client_always_sample.set_code(client_always_sample);
        self
    }

    /// Replaces the per span kind policies.
    ///
    /// **Default**: `(none)`
    ///
    /// Env variable: `URL_SAMPLER_SPAN_KIND_OVERRIDES`, e.g. `producer:always_on,internal:always_off`
    pub fn set_span_kind_overrides(
        &mut self,
        overrides: Vec<(SpanKind, SpanKindPolicy)>,
    ) -> &mut Self {
        self.clear_error(self.config.span_kind_overrides.name);
        self.config.span_kind_overrides.set_code(overrides);
        self
    }

    /// Adds a policy for one span kind, on top of the ones already configured
    pub fn add_span_kind_override(&mut self, kind: SpanKind, policy: SpanKindPolicy) -> &mut Self {
        let mut overrides = self.config.span_kind_overrides.value().clone();
        overrides.push((kind, policy));
        self.set_span_kind_overrides(overrides)
    }

    /// **Default**: `ERROR`
    ///
    /// Env variable: `URL_SAMPLER_LOG_LEVEL`
    pub fn set_log_level_filter(&mut self, filter: LevelFilter) -> &mut Self {
        self.clear_error(self.config.log_level_filter.name);
        self.config.log_level_filter.set_code(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::configuration::sources::HashMapSource;

    fn builder_from(pairs: &[(&'static str, &str)]) -> ConfigBuilder {
        let mut sources = ConfigSources::empty();
        sources.push(HashMapSource::from_iter(
            pairs.iter().copied(),
            ConfigSourceOrigin::EnvVar,
        ));
        Config::builder_with_sources(&sources)
    }

    #[test]
    fn test_defaults() {
        let config = builder_from(&[]).build().unwrap();
        assert!(config.allowlist().is_empty());
        assert!(config.blocklist().is_empty());
        assert!(!config.allow_parent_trace());
        assert_eq!(config.target_keys(), &TargetKeys::semconv());
        assert!(config.client_always_sample());
        assert!(config.span_kind_overrides().is_empty());
        assert_eq!(*config.log_level_filter(), LevelFilter::Error);
        assert!(config
            .origins()
            .iter()
            .all(|(_, origin)| *origin == ConfigSourceOrigin::Default));
    }

    #[test]
    fn test_from_env_sources() {
        let _lock = crate::core::log::MAX_LEVEL_TEST_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let config = builder_from(&[
            ("URL_SAMPLER_ALLOWLIST", r#"["/api", "/graphql"]"#),
            ("URL_SAMPLER_BLOCKLIST", "/api/internal,/api/health"),
            ("URL_SAMPLER_ALLOW_PARENT_TRACE", "true"),
            ("URL_SAMPLER_TARGET_KEYS", "legacy"),
            ("URL_SAMPLER_CLIENT_ALWAYS_SAMPLE", "false"),
            ("URL_SAMPLER_SPAN_KIND_OVERRIDES", "producer:always_on"),
            ("URL_SAMPLER_LOG_LEVEL", "warn"),
        ])
        .build()
        .unwrap();

        assert_eq!(config.allowlist().to_string(), "/api,/graphql");
        assert_eq!(config.blocklist().to_string(), "/api/health,/api/internal");
        assert!(config.allow_parent_trace());
        assert_eq!(config.target_keys(), &TargetKeys::legacy());
        assert!(!config.client_always_sample());
        assert_eq!(
            config.span_kind_overrides(),
            &[(SpanKind::Producer, SpanKindPolicy::AlwaysOn)]
        );
        assert_eq!(*config.log_level_filter(), LevelFilter::Warn);
        assert_eq!(crate::core::log::max_level(), LevelFilter::Warn);
        assert!(config
            .origins()
            .iter()
            .all(|(_, origin)| *origin == ConfigSourceOrigin::EnvVar));

        crate::core::log::set_max_level(LevelFilter::default());
    }

    #[test]
    fn test_non_string_entries_fail_fast() {
        let err = builder_from(&[("URL_SAMPLER_ALLOWLIST", r#"["1", 2, false]"#)])
            .build()
            .unwrap_err();
        match err.as_configuration_error() {
            Some(ConfigurationError::InvalidValue { name, value, .. }) => {
                assert_eq!(*name, "URL_SAMPLER_ALLOWLIST");
                assert_eq!(value, r#"["1", 2, false]"#);
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert!(builder_from(&[("URL_SAMPLER_BLOCKLIST", r#"["1", 2, false]"#)])
            .build()
            .is_err());
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        for (key, value) in [
            ("URL_SAMPLER_ALLOW_PARENT_TRACE", "yes"),
            ("URL_SAMPLER_TARGET_KEYS", "otel"),
            ("URL_SAMPLER_CLIENT_ALWAYS_SAMPLE", "1"),
            ("URL_SAMPLER_SPAN_KIND_OVERRIDES", "egress:always_on"),
            ("URL_SAMPLER_LOG_LEVEL", "verbose"),
            ("URL_SAMPLER_ALLOWLIST", "/api,,/static"),
        ] {
            assert!(
                builder_from(&[(key, value)]).build().is_err(),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_setter_overrides_invalid_source_value() {
        let mut builder = builder_from(&[("URL_SAMPLER_ALLOW_PARENT_TRACE", "yes")]);
        assert!(builder.build().is_err());

        let config = builder.set_allow_parent_trace(true).build().unwrap();
        assert!(config.allow_parent_trace());
    }

    #[test]
    fn test_setters() {
        let config = builder_from(&[("URL_SAMPLER_ALLOWLIST", "/from-env")])
            .set_sampler_config(SamplerConfig {
                allowlist: PrefixList::new("allowlist", ["/api"]).unwrap(),
                blocklist: PrefixList::new("blocklist", ["/api/internal"]).unwrap(),
                allow_parent_trace: true,
            })
            .set_target_keys(TargetKeys::custom("route", None))
            .add_span_kind_override(SpanKind::Internal, SpanKindPolicy::AlwaysOff)
            .add_span_kind_override(SpanKind::Consumer, SpanKindPolicy::UrlPrefix)
            .build()
            .unwrap();

        assert_eq!(config.allowlist().to_string(), "/api");
        assert_eq!(config.blocklist().to_string(), "/api/internal");
        assert_eq!(config.target_keys().path_key(), "route");
        assert_eq!(config.span_kind_overrides().len(), 2);
        assert_eq!(
            config.sampler_config(),
            SamplerConfig {
                allowlist: PrefixList::new("allowlist", ["/api"]).unwrap(),
                blocklist: PrefixList::new("blocklist", ["/api/internal"]).unwrap(),
                allow_parent_trace: true,
            }
        );
        assert!(config
            .origins()
            .contains(&("URL_SAMPLER_ALLOWLIST", ConfigSourceOrigin::Code)));
    }
}
