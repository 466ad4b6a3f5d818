use crate::error::{NegotiationError, Result};
use crate::models::ProbeReport;
use crate::profile::DeviceProfile;
use serde::Serialize;

/// Outcome of matching a probe report against a device profile
///
/// Computed once per streaming session and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscodeDecision {
    /// Container format of the source, needed for audio passthrough
    pub container_format: String,
    pub is_video_media: bool,
    pub is_audio_media: bool,
    pub format_needs_transcoding: bool,
    pub audio_needs_transcoding: bool,
    pub video_needs_transcoding: bool,
    pub needs_transcoding: bool,
}

/// Decide whether `report` must be transcoded for a renderer using `profile`
///
/// Only the first audio and first video stream are consulted. A codec absent
/// from the profile's trigger sets never forces a transcode on its own.
pub fn evaluate(report: &ProbeReport, profile: &DeviceProfile) -> Result<TranscodeDecision> {
    if report.container_format.trim().is_empty() {
        tracing::warn!("Rejecting probe report without container format");
        return Err(NegotiationError::InvalidProbeData(
            "missing container format".to_string(),
        ));
    }
    if report.streams.is_empty() {
        tracing::warn!(container = %report.container_format, "Rejecting probe report without streams");
        return Err(NegotiationError::InvalidProbeData(format!(
            "no streams in '{}' container",
            report.container_format
        )));
    }

    let video = report.primary_video();
    let audio = report.primary_audio();

    let format_needs_transcoding = !profile.valid_formats.contains(&report.container_format);

    let audio_needs_transcoding = audio.is_some_and(|stream| {
        profile.audio_needs_transcoding_codecs.contains(&stream.codec) || format_needs_transcoding
    });
    let video_needs_transcoding = video.is_some_and(|stream| {
        profile.video_needs_transcoding_codecs.contains(&stream.codec) || format_needs_transcoding
    });

    let is_video_media = video.is_some();
    let is_audio_media = audio.is_some() && !is_video_media;

    let needs_transcoding = if is_video_media {
        audio_needs_transcoding || video_needs_transcoding
    } else if is_audio_media {
        audio_needs_transcoding
    } else {
        false
    };

    let decision = TranscodeDecision {
        container_format: report.container_format.clone(),
        is_video_media,
        is_audio_media,
        format_needs_transcoding,
        audio_needs_transcoding,
        video_needs_transcoding,
        needs_transcoding,
    };

    tracing::debug!(
        container = %decision.container_format,
        profile = %profile.name,
        video = decision.is_video_media,
        audio = decision.is_audio_media,
        needs_transcoding = decision.needs_transcoding,
        "Evaluated transcode decision"
    );

    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StreamInfo, StreamKind};

    fn report(container: &str, streams: &[(StreamKind, &str)]) -> ProbeReport {
        ProbeReport::new(
            container,
            streams
                .iter()
                .map(|(kind, codec)| StreamInfo::new(*kind, *codec))
                .collect(),
        )
    }

    #[test]
    fn test_audio_only_passthrough() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(&report("mp3", &[(StreamKind::Audio, "mp3")]), &profile).unwrap();

        assert!(decision.is_audio_media);
        assert!(!decision.is_video_media);
        assert!(!decision.format_needs_transcoding);
        assert!(!decision.audio_needs_transcoding);
        assert!(!decision.needs_transcoding);
    }

    #[test]
    fn test_audio_only_trigger_codec() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(&report("mp4,m4a", &[(StreamKind::Audio, "aac")]), &profile).unwrap();

        assert!(decision.is_audio_media);
        assert!(decision.audio_needs_transcoding);
        assert!(decision.needs_transcoding);
    }

    #[test]
    fn test_video_trigger_codec_in_valid_container() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(
            &report("mp4,m4a", &[(StreamKind::Video, "h264"), (StreamKind::Audio, "mp3")]),
            &profile,
        )
        .unwrap();

        assert!(decision.is_video_media);
        assert!(!decision.is_audio_media);
        assert!(!decision.format_needs_transcoding);
        assert!(decision.video_needs_transcoding);
        assert!(!decision.audio_needs_transcoding);
        assert!(decision.needs_transcoding);
    }

    #[test]
    fn test_invalid_container_forces_both() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(
            &report("matroska,webm", &[(StreamKind::Video, "vp9"), (StreamKind::Audio, "opus")]),
            &profile,
        )
        .unwrap();

        assert!(decision.format_needs_transcoding);
        assert!(decision.video_needs_transcoding);
        assert!(decision.audio_needs_transcoding);
        assert!(decision.needs_transcoding);
    }

    #[test]
    fn test_audio_only_invalid_container() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(&report("ogg", &[(StreamKind::Audio, "vorbis")]), &profile).unwrap();

        assert!(decision.is_audio_media);
        assert!(decision.format_needs_transcoding);
        assert!(decision.audio_needs_transcoding);
        assert!(decision.needs_transcoding);
    }

    #[test]
    fn test_video_without_audio() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(&report("mp4,m4a", &[(StreamKind::Video, "h264")]), &profile).unwrap();

        assert!(decision.is_video_media);
        assert!(!decision.audio_needs_transcoding);
        assert!(decision.video_needs_transcoding);
        assert!(decision.needs_transcoding);

        let decision = evaluate(&report("mp4,m4a", &[(StreamKind::Video, "mpeg4")]), &profile).unwrap();
        assert!(!decision.audio_needs_transcoding);
        assert!(!decision.needs_transcoding);
    }

    #[test]
    fn test_unknown_codec_in_valid_container() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(
            &report("mp4,m4a", &[(StreamKind::Video, "mystery"), (StreamKind::Audio, "mp3")]),
            &profile,
        )
        .unwrap();

        assert!(!decision.video_needs_transcoding);
        assert!(!decision.needs_transcoding);
    }

    #[test]
    fn test_only_primary_streams_consulted() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(
            &report(
                "mp3",
                &[(StreamKind::Audio, "mp3"), (StreamKind::Audio, "aac")],
            ),
            &profile,
        )
        .unwrap();

        assert!(!decision.audio_needs_transcoding);
    }

    #[test]
    fn test_subtitle_only_is_neither() {
        let profile = DeviceProfile::generic();
        let decision = evaluate(&report("srt", &[(StreamKind::Subtitle, "subrip")]), &profile).unwrap();

        assert!(!decision.is_video_media);
        assert!(!decision.is_audio_media);
        assert!(!decision.needs_transcoding);
    }

    #[test]
    fn test_empty_streams_rejected() {
        let profile = DeviceProfile::generic();
        let result = evaluate(&report("mp4,m4a", &[]), &profile);
        assert!(matches!(result, Err(NegotiationError::InvalidProbeData(_))));
    }

    #[test]
    fn test_missing_container_rejected() {
        let profile = DeviceProfile::generic();
        let result = evaluate(&report("", &[(StreamKind::Audio, "mp3")]), &profile);
        assert!(matches!(result, Err(NegotiationError::InvalidProbeData(_))));
    }

    #[test]
    fn test_video_and_audio_media_exclusive() {
        let profile = DeviceProfile::generic();
        let layouts: [&[(StreamKind, &str)]; 4] = [
            &[(StreamKind::Video, "h264")],
            &[(StreamKind::Audio, "mp3")],
            &[(StreamKind::Audio, "aac"), (StreamKind::Video, "hevc")],
            &[(StreamKind::Subtitle, "ass"), (StreamKind::Other, "ttf")],
        ];

        for streams in layouts {
            let decision = evaluate(&report("mp3", streams), &profile).unwrap();
            assert!(!(decision.is_video_media && decision.is_audio_media));
        }
    }
}
