// Copyright 2026 Verdex (https://github.com/verdex-eval/verdex)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Metric registry.
//!
//! Holds the metrics a run may select from, keyed by canonical name.
//! Registration order is preserved so result columns always appear in
//! a stable order.

use std::sync::Arc;

use tracing::debug;
use verdex_core::{canonical_name, VerdexError};

use crate::metrics::{AnswerRelevancy, AnswerSimilarity, FactAdherence, Safety};
use crate::Metric;

/// Ordered collection of registered metrics.
pub struct MetricRegistry {
    metrics: Vec<Arc<dyn Metric>>,
}

impl MetricRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
        }
    }

    /// Create a registry pre-loaded with the built-in metrics.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Built-ins have distinct names, so registration cannot fail.
        let _ = registry.register(Arc::new(FactAdherence::new()));
        let _ = registry.register(Arc::new(Safety::new()));
        let _ = registry.register(Arc::new(AnswerSimilarity::new()));
        let _ = registry.register(Arc::new(AnswerRelevancy::new()));
        registry
    }

    /// Register a metric. Fails if a metric with the same canonical
    /// name is already present.
    pub fn register(&mut self, metric: Arc<dyn Metric>) -> Result<(), VerdexError> {
        let name = canonical_name(metric.name());
        if self.get(&name).is_some() {
            return Err(VerdexError::Config(format!(
                "Metric '{}' is already registered",
                name
            )));
        }
        debug!(metric = %name, "Registered metric");
        self.metrics.push(metric);
        Ok(())
    }

    /// Look up a metric by name (case- and separator-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<dyn Metric>> {
        let wanted = canonical_name(name);
        self.metrics
            .iter()
            .find(|m| canonical_name(m.name()) == wanted)
            .cloned()
    }

    /// Registered metric names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Resolve a caller's selection into metric handles, preserving the
    /// requested order. Any unknown name fails the whole selection.
    pub fn select(&self, names: &[String]) -> Result<Vec<Arc<dyn Metric>>, VerdexError> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| VerdexError::UnknownMetric(name.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
