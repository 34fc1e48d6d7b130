//! Exposition through `prometheus-client`.

use std::fmt;

use prometheus_client::collector::Collector;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{
    DescriptorEncoder, EncodeLabelValue, EncodeMetric, LabelValueEncoder,
};
use prometheus_client::metrics::MetricType;
use prometheus_client::metrics::gauge::ConstGauge;
use prometheus_client::registry::Registry;

use super::descriptors::describe;
use super::sample::MetricSample;
use crate::collector::MpdCollector;

/// Content type of the text produced by [`render`].
pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// A label value as it must appear between the quotes of the text format.
///
/// Song tags and file paths routinely carry `"` and `\`; unescaped they
/// would break every line after them.
struct EscapedValue<'a>(&'a str);

impl EncodeLabelValue for EscapedValue<'_> {
    fn encode(&self, encoder: &mut LabelValueEncoder) -> Result<(), fmt::Error> {
        write_escaped(encoder, self.0)
    }
}

/// Writes `value` with `\`, `"` and newline escaped.
fn write_escaped<W: fmt::Write>(writer: &mut W, value: &str) -> fmt::Result {
    let mut rest = value;
    while let Some(pos) = rest.find(['\\', '"', '\n']) {
        writer.write_str(&rest[..pos])?;
        writer.write_str(match rest.as_bytes()[pos] {
            b'\\' => "\\\\",
            b'"' => "\\\"",
            _ => "\\n",
        })?;
        rest = &rest[pos + 1..];
    }
    writer.write_str(rest)
}

/// Writes `samples` as gauge families, one per descriptor, in [`describe`] order.
///
/// Descriptors without samples are skipped.
pub fn encode_samples(
    mut encoder: DescriptorEncoder,
    samples: &[MetricSample],
) -> Result<(), fmt::Error> {
    for descriptor in describe() {
        let mut family = samples
            .iter()
            .filter(|s| s.descriptor.name == descriptor.name)
            .peekable();
        if family.peek().is_none() {
            continue;
        }

        let mut metric_encoder = encoder.encode_descriptor(
            descriptor.name,
            descriptor.help,
            None,
            MetricType::Gauge,
        )?;
        for sample in family {
            let labels: Vec<(&str, EscapedValue)> = sample
                .label_pairs()
                .into_iter()
                .map(|(name, value)| (name, EscapedValue(value)))
                .collect();
            let sample_encoder = metric_encoder.encode_family(&labels)?;
            ConstGauge::new(sample.value).encode(sample_encoder)?;
        }
    }
    Ok(())
}

/// Renders every collector registered in `registry`.
pub fn render(registry: &Registry) -> Result<String, fmt::Error> {
    let mut buf = String::new();
    encode(&mut buf, registry)?;
    Ok(buf)
}

impl Collector for MpdCollector {
    fn encode(&self, encoder: DescriptorEncoder) -> Result<(), fmt::Error> {
        let samples = self.collect();
        encode_samples(encoder, &samples)
    }
}
