use anyhow::{Context, Result};
use async_trait::async_trait;
use dlnacast_core::{MediaProber, ProbeReport};

/// Prober over ffprobe JSON documents saved next to the media
///
/// `source` is the path of the JSON document itself.
pub struct JsonFileProber;

#[async_trait]
impl MediaProber for JsonFileProber {
    async fn probe(&self, source: &str) -> Result<ProbeReport> {
        let contents = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read probe report {}", source))?;

        let report = ProbeReport::from_ffprobe_json(&contents)
            .with_context(|| format!("Failed to decode probe report {}", source))?;

        tracing::debug!(
            "Probed {}: container '{}', {} streams",
            source,
            report.container_format,
            report.streams.len()
        );
        Ok(report)
    }
}
