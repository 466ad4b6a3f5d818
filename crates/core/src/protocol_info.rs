/// Renderer sink capabilities (ConnectionManager GetProtocolInfo)
///
/// A renderer advertises what it can play as a comma-separated list of
/// `<protocol>:<network>:<contentFormat>:<additionalInfo>` entries.
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProtocolInfo {
    pub protocol: String,
    pub network: String,
    pub content_format: String,
    pub additional_info: String,
}

impl ProtocolInfo {
    /// Parse one entry; `None` with fewer than four fields. The last field keeps any extra colons.
    pub fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.trim().splitn(4, ':');
        let protocol = parts.next()?.trim();
        let network = parts.next()?.trim();
        let content_format = parts.next()?.trim();
        let additional_info = parts.next()?.trim();

        if protocol.is_empty() || content_format.is_empty() {
            return None;
        }

        Some(Self {
            protocol: protocol.to_string(),
            network: network.to_string(),
            content_format: content_format.to_string(),
            additional_info: additional_info.to_string(),
        })
    }
}

/// Parsed sink protocol list of a renderer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SinkCapabilities {
    pub entries: Vec<ProtocolInfo>,
}

impl SinkCapabilities {
    pub fn parse(sink: &str) -> Self {
        let entries = sink
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .filter_map(|entry| {
                let parsed = ProtocolInfo::parse(entry);
                if parsed.is_none() {
                    tracing::debug!("Skipping malformed protocolInfo entry: {}", entry);
                }
                parsed
            })
            .collect::<Vec<_>>();

        tracing::debug!("Renderer advertises {} sink protocols", entries.len());
        Self { entries }
    }

    /// Whether any http-get entry accepts `mime` (exact or `*`)
    pub fn supports_mime(&self, mime: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry.protocol == "http-get"
                && (entry.content_format == "*" || entry.content_format.eq_ignore_ascii_case(mime))
        })
    }

    pub fn mime_types(&self) -> Vec<&str> {
        let mut mimes: Vec<&str> = self.entries.iter().map(|e| e.content_format.as_str()).collect();
        mimes.sort_unstable();
        mimes.dedup();
        mimes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINK: &str = "http-get:*:video/mp4:DLNA.ORG_PN=AVC_MP4_HP_HD_AAC,\
        http-get:*:audio/mpeg:*,garbage,,\
        rtsp-rtp-udp:*:video/mp4:*,http-get:*:audio/mpeg:DLNA.ORG_PN=MP3";

    #[test]
    fn test_parse_sink_list() {
        let caps = SinkCapabilities::parse(SINK);

        assert_eq!(caps.entries.len(), 4);
        assert_eq!(caps.entries[0].content_format, "video/mp4");
        assert_eq!(caps.entries[0].additional_info, "DLNA.ORG_PN=AVC_MP4_HP_HD_AAC");
        assert_eq!(caps.mime_types(), vec!["audio/mpeg", "video/mp4"]);
    }

    #[test]
    fn test_supports_mime() {
        let caps = SinkCapabilities::parse(SINK);

        assert!(caps.supports_mime("video/mp4"));
        assert!(caps.supports_mime("AUDIO/MPEG"));
        assert!(!caps.supports_mime("video/x-matroska"));
    }

    #[test]
    fn test_wildcard_format() {
        let caps = SinkCapabilities::parse("http-get:*:*:*");
        assert!(caps.supports_mime("video/x-matroska"));
    }

    #[test]
    fn test_additional_info_keeps_colons() {
        let info = ProtocolInfo::parse("http-get:*:video/mp4:DLNA.ORG_PN=X:extra").unwrap();
        assert_eq!(info.additional_info, "DLNA.ORG_PN=X:extra");
        assert!(ProtocolInfo::parse("http-get:*:video/mp4").is_none());
    }

    #[test]
    fn test_empty_sink() {
        assert!(SinkCapabilities::parse("").entries.is_empty());
    }
}
