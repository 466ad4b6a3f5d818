use crate::decision::{evaluate, TranscodeDecision};
use crate::error::Result;
use crate::header::{build_content_features_header, serving_headers};
use crate::models::ProbeReport;
use crate::options::{build_directives, DirectiveFilters, EncoderDirectives};
use crate::profile::DeviceProfile;
use serde::Serialize;

/// Everything a streaming session needs to serve one media item
#[derive(Clone, Debug, Serialize)]
pub struct Negotiation {
    pub profile: String,
    pub decision: TranscodeDecision,
    pub content_features: String,
    /// Profile content type after the renderer's MIME remap
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub directives: EncoderDirectives,
}

/// Run the decision once and derive the header and encoder directives from it
///
/// Fails before anything is built when the probe report is unusable.
pub fn negotiate(
    report: &ProbeReport,
    profile: &DeviceProfile,
    friendly_name: &str,
    filters: &DirectiveFilters,
) -> Result<Negotiation> {
    let decision = evaluate(report, profile)?;

    let content_features = build_content_features_header(&decision, profile);
    let content_type = profile
        .remap_mime(friendly_name, &profile.content_type)
        .to_string();
    let headers = serving_headers(&decision, profile, &content_type);
    let directives = build_directives(&decision, filters);

    tracing::info!(
        device = %friendly_name,
        profile = %profile.name,
        transcode = decision.needs_transcoding,
        "Negotiated playback"
    );

    Ok(Negotiation {
        profile: profile.name.clone(),
        decision,
        content_features,
        content_type,
        headers,
        directives,
    })
}
