//! Stats step: `stats`, `status` and `outputs`.

use super::{MpdCollector, parse_float};
use crate::error::CollectError;
use crate::metrics::{ALBUMS, ARTISTS, MetricDescriptor, MetricSample, PLAYTIME, SONGS};
use crate::mpd::{Attrs, MpdClient};

static COUNTERS: [(&MetricDescriptor, &str); 4] = [
    (&SONGS, "songs"),
    (&ALBUMS, "albums"),
    (&ARTISTS, "artists"),
    (&PLAYTIME, "playtime"),
];

impl MpdCollector {
    /// Queries `stats`, `status` and `outputs`, then emits the four counters
    /// followed by one enabled flag per output.
    ///
    /// All three queries run before anything is emitted, so a failed query
    /// leaves this step without samples. A value that does not parse ends the
    /// step; the samples before it are kept.
    pub(crate) fn collect_stats(
        &self,
        client: &mut MpdClient,
        samples: &mut Vec<MetricSample>,
    ) -> Result<(), CollectError> {
        let stats = client.stats()?;
        let status = client.status()?;
        let outputs = client.outputs()?;

        self.log_status(&status);
        self.push_counters(&stats, samples)?;
        self.push_outputs(&outputs, samples)
    }

    fn push_counters(
        &self,
        stats: &Attrs,
        samples: &mut Vec<MetricSample>,
    ) -> Result<(), CollectError> {
        for &(descriptor, field) in &COUNTERS {
            let value = parse_float(stats, field)?;
            samples.push(MetricSample::new(
                descriptor,
                value,
                vec![self.host().to_string()],
            ));
        }
        Ok(())
    }
}
