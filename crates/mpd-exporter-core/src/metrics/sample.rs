//! One metric value produced by a scrape.

use super::descriptors::MetricDescriptor;

/// A value plus its label values, tied to a static descriptor.
///
/// `labels` has exactly one value per label name of the descriptor, in the
/// descriptor's order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub descriptor: &'static MetricDescriptor,
    pub value: f64,
    pub labels: Vec<String>,
}

impl MetricSample {
    pub fn new(descriptor: &'static MetricDescriptor, value: f64, labels: Vec<String>) -> Self {
        debug_assert_eq!(
            labels.len(),
            descriptor.labels.len(),
            "label count mismatch for {}",
            descriptor.name
        );
        Self {
            descriptor,
            value,
            labels,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Value of the label called `name`, if the descriptor declares it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.descriptor
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    /// `(label name, label value)` pairs in descriptor order.
    pub fn label_pairs(&self) -> Vec<(&'static str, &str)> {
        self.descriptor
            .labels
            .iter()
            .copied()
            .zip(self.labels.iter().map(String::as_str))
            .collect()
    }
}
