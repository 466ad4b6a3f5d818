use crate::models::ProbeReport;
use crate::options::EncoderDirectives;
use anyhow::Result;
use async_trait::async_trait;

/// External media inspector (ffprobe or similar)
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Inspect a media source (path or URL) and describe its container and streams
    async fn probe(&self, source: &str) -> Result<ProbeReport>;
}

/// External encoding engine driven by negotiated directives
#[async_trait]
pub trait TranscodeEngine: Send + Sync {
    /// Start encoding `source` with the given input/output directives
    async fn transcode(&self, source: &str, directives: &EncoderDirectives) -> Result<()>;
}
