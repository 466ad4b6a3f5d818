/// DLNA content-features header construction
///
/// contentFeatures.dlna.org fields:
/// - DLNA.ORG_PN: media profile of the served (transcoded) stream
/// - DLNA.ORG_OP: ab, a = TimeSeekRange supported, b = byte RANGE supported
/// - DLNA.ORG_CI: 1 when the media is transcoded
/// - DLNA.ORG_PS: supported play speeds
/// - DLNA.ORG_FLAGS: primary flag word in hex, followed by 24 reserved zero digits
use crate::decision::TranscodeDecision;
use crate::profile::DeviceProfile;

pub const CONTENT_FEATURES_HEADER: &str = "contentFeatures.dlna.org";
pub const TRANSFER_MODE_HEADER: &str = "transferMode.dlna.org";
pub const PROTOCOL_INFO_HEADER: &str = "protocolInfo";

/// Only time seek is served
const OPERATIONS: &str = "DLNA.ORG_OP=10;";
/// Output is always reported as transcoded
const CONVERSION_INDICATOR: &str = "DLNA.ORG_CI=1;";
/// Normal play speed only; no separator before FLAGS
const PLAY_SPEED: &str = "DLNA.ORG_PS=1";
const FLAGS_PADDING: &str = "000000000000000000000000";

/// Build the contentFeatures.dlna.org value a renderer reads before streaming
pub fn build_content_features_header(_decision: &TranscodeDecision, profile: &DeviceProfile) -> String {
    let mut header = String::with_capacity(128);

    header.push_str(&format!("DLNA.ORG_PN={};", profile.transcoded_media_profile));
    header.push_str(OPERATIONS);
    header.push_str(CONVERSION_INDICATOR);
    header.push_str(PLAY_SPEED);
    header.push_str(&format!("DLNA.ORG_FLAGS={:x}", profile.flags.bits()));
    header.push_str(FLAGS_PADDING);

    header
}

/// `http-get:*:<mime>:*` protocolInfo for a served content type
pub fn protocol_info(content_type: &str) -> String {
    format!("http-get:*:{}:*", content_type)
}

/// Response headers the serving layer attaches to a media stream, in order
///
/// `content_type` is the MIME actually served, i.e. after the renderer's remap.
pub fn serving_headers(
    decision: &TranscodeDecision,
    profile: &DeviceProfile,
    content_type: &str,
) -> Vec<(String, String)> {
    vec![
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Content-Type".to_string(), content_type.to_string()),
        (PROTOCOL_INFO_HEADER.to_string(), protocol_info(content_type)),
        (
            CONTENT_FEATURES_HEADER.to_string(),
            build_content_features_header(decision, profile),
        ),
        (TRANSFER_MODE_HEADER.to_string(), "Streaming".to_string()),
    ]
}
