//! Audio outputs.

use super::{MpdCollector, parse_float, text_field};
use crate::error::CollectError;
use crate::metrics::{MetricSample, OUTPUT_ENABLED};
use crate::mpd::Attrs;

/// One configured audio output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDevice<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub plugin: &'a str,
    /// `1.0` when enabled, `0.0` when disabled.
    pub enabled: f64,
    pub attribute: &'a str,
}

impl<'a> OutputDevice<'a> {
    /// Reads an `outputs` record. Fails if `outputenabled` is not a number.
    pub fn from_attrs(attrs: &'a Attrs) -> Result<Self, CollectError> {
        Ok(Self {
            id: text_field(attrs, "outputid"),
            name: text_field(attrs, "outputname"),
            plugin: text_field(attrs, "plugin"),
            enabled: parse_float(attrs, "outputenabled")?,
            attribute: text_field(attrs, "attribute"),
        })
    }
}

impl MpdCollector {
    /// Emits one enabled flag per output, in daemon order.
    ///
    /// Fail-fast: the first output whose flag does not parse ends the step,
    /// and no later output is emitted.
    pub(crate) fn push_outputs(
        &self,
        outputs: &[Attrs],
        samples: &mut Vec<MetricSample>,
    ) -> Result<(), CollectError> {
        for attrs in outputs {
            let output = OutputDevice::from_attrs(attrs)?;
            samples.push(MetricSample::new(
                &OUTPUT_ENABLED,
                output.enabled,
                vec![
                    self.host().to_string(),
                    output.id.to_string(),
                    output.name.to_string(),
                    output.plugin.to_string(),
                    output.attribute.to_string(),
                ],
            ));
        }
        Ok(())
    }
}
