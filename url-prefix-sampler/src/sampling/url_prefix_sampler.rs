// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::SamplingDecision;
use serde::{Deserialize, Serialize};

use crate::core::constants::{description, list};
use crate::core::error::ConfigurationError;
use crate::sampler_warn;

use super::prefix_matcher::PrefixList;
use super::target::TargetKeys;
use super::types::{Sampler, SamplingOutcome, SamplingRequest};

static NULL: serde_json::Value = serde_json::Value::Null;

const FIELDS: [&str; 3] = [list::ALLOWLIST, list::BLOCKLIST, "allow_parent_trace"];

/// Allow/block configuration of a [`UrlPrefixSampler`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerConfig {
    #[serde(default)]
    pub allowlist: PrefixList,
    #[serde(default)]
    pub blocklist: PrefixList,
    /// When set, a sampled parent forces through targets that are not on the allowlist.
    /// Blocked targets are dropped either way.
    #[serde(default)]
    pub allow_parent_trace: bool,
}

impl SamplerConfig {
    /// Parses a config such as `{"allowlist": ["/api"], "blocklist": [], "allow_parent_trace": false}`
    ///
    /// Entries are validated one by one so the error names the offending list and index.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidValue {
                name: "sampler config",
                value: json.to_string(),
                error: e.to_string(),
            })?;
        let Some(fields) = value.as_object() else {
            return Err(ConfigurationError::InvalidValue {
                name: "sampler config",
                value: json.to_string(),
                error: "expected a JSON object".to_string(),
            });
        };
        if let Some(unknown) = fields.keys().find(|k| !FIELDS.contains(&k.as_str())) {
            return Err(ConfigurationError::UnknownField(unknown.clone()));
        }
        let field = |name: &str| value.get(name).unwrap_or(&NULL);

        let allow_parent_trace = match field("allow_parent_trace") {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            other => {
                return Err(ConfigurationError::InvalidValue {
                    name: "allow_parent_trace",
                    value: other.to_string(),
                    error: "expected a boolean".to_string(),
                })
            }
        };

        Ok(SamplerConfig {
            allowlist: PrefixList::from_json_value(list::ALLOWLIST, field(list::ALLOWLIST))?,
            blocklist: PrefixList::from_json_value(list::BLOCKLIST, field(list::BLOCKLIST))?,
            allow_parent_trace,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Samples inbound requests by the prefix of their target (path and query).
///
/// Decision table, evaluated per span:
/// 1. No target: the span is not an inbound request and follows its parent.
/// 2. The target is allowed when the allowlist is empty or one of its prefixes matches.
/// 3. A target that is not allowed is dropped, unless `allow_parent_trace` is set and the
///    parent was sampled.
/// 4. A target matching the blocklist is dropped, whatever the allowlist says.
#[derive(Debug, Clone, Default)]
pub struct UrlPrefixSampler {
    config: SamplerConfig,
    target_keys: TargetKeys,
}

impl UrlPrefixSampler {
    pub fn new(config: SamplerConfig, target_keys: TargetKeys) -> Self {
        for allowed in config.allowlist.iter() {
            if let Some(blocked) = config.blocklist.iter().find(|b| allowed.starts_with(b)) {
                sampler_warn!(
                    "allowlist prefix {allowed:?} is covered by blocklist prefix {blocked:?}, it will never be sampled"
                );
            }
        }
        UrlPrefixSampler {
            config,
            target_keys,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn target_keys(&self) -> &TargetKeys {
        &self.target_keys
    }

    /// The decision for an already extracted target
    pub fn decide(&self, target: &str, is_parent_sampled: bool) -> SamplingDecision {
        if target.is_empty() {
            return if is_parent_sampled {
                SamplingDecision::RecordAndSample
            } else {
                SamplingDecision::Drop
            };
        }

        let allowed = self.config.allowlist.is_empty() || self.config.allowlist.matches(target);
        let sample = allowed || (self.config.allow_parent_trace && is_parent_sampled);

        if !sample || self.config.blocklist.matches(target) {
            SamplingDecision::Drop
        } else {
            SamplingDecision::RecordAndSample
        }
    }
}

impl Sampler for UrlPrefixSampler {
    fn should_sample(&self, request: &SamplingRequest<'_>) -> SamplingOutcome {
        let target = self.target_keys.extract_target(request.attributes);
        request.outcome(self.decide(&target, request.is_parent_sampled()))
    }

    fn description(&self) -> String {
        format!(
            "{}{{allowlist:{},blocklist:{},allowParentTrace:{}}}",
            description::URL_PREFIX_SAMPLER,
            self.config.allowlist,
            self.config.blocklist,
            self.config.allow_parent_trace
        )
    }
}
