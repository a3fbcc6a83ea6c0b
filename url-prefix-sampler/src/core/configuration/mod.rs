// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Sampler configuration
//!
//! Values are resolved in this order, first match wins:
//! 1. setters called on the [`ConfigBuilder`]
//! 2. `URL_SAMPLER_*` environment variables
//! 3. defaults

#[allow(clippy::module_inception)]
mod configuration;
mod sources;
mod supported_configurations;

pub use configuration::{Config, ConfigBuilder};
pub use sources::ConfigSourceOrigin;
pub use supported_configurations::SupportedConfigurations;
