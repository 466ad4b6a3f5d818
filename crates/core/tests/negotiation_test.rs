use anyhow::Result;
use async_trait::async_trait;
use dlnacast_core::*;
use std::sync::{Arc, Mutex};

struct MockProber {
    report: ProbeReport,
}

#[async_trait]
impl MediaProber for MockProber {
    async fn probe(&self, source: &str) -> Result<ProbeReport> {
        if source.is_empty() {
            anyhow::bail!("No source given");
        }
        Ok(self.report.clone())
    }
}

#[derive(Default)]
struct RecordingEngine {
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl TranscodeEngine for RecordingEngine {
    async fn transcode(&self, source: &str, directives: &EncoderDirectives) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_string(), directives.output_args()));
        Ok(())
    }
}

fn h264_aac_mp4() -> ProbeReport {
    ProbeReport::new(
        "mov,mp4,m4a,3gp,3g2,mj2",
        vec![
            StreamInfo::new(StreamKind::Video, "h264"),
            StreamInfo::new(StreamKind::Audio, "aac"),
        ],
    )
}

/// Renderer that plays H.264/AAC MP4 natively
fn mp4_native_profile() -> DeviceProfile {
    DeviceProfile {
        name: "Mp4Native".to_string(),
        match_names: vec!["Native TV".to_string()],
        valid_formats: ["mov,mp4,m4a,3gp,3g2,mj2".to_string()].into_iter().collect(),
        audio_needs_transcoding_codecs: ["ac3".to_string()].into_iter().collect(),
        video_needs_transcoding_codecs: ["hevc".to_string()].into_iter().collect(),
        ..DeviceProfile::generic()
    }
}

#[tokio::test]
async fn test_probe_negotiate_and_transcode() {
    let prober = MockProber {
        report: h264_aac_mp4(),
    };
    let engine = RecordingEngine::default();
    let registry = ProfileRegistry::builtin().with_profiles(vec![mp4_native_profile()]);

    let report = prober.probe("movie.mp4").await.unwrap();
    let profile = registry.lookup("Native TV");
    let negotiation = negotiate(&report, profile, "Native TV", &DirectiveFilters::default()).unwrap();

    assert!(!negotiation.decision.needs_transcoding);
    engine.transcode("movie.mp4", &negotiation.directives).await.unwrap();

    let calls = engine.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].1,
        vec![
            "-acodec copy",
            "-vcodec copy",
            "-copyts",
            "-preset ultrafast",
            "-tune zerolatency",
            "-crf 28",
            "-bsf:v h264_mp4toannexb",
            "-f mp4",
        ]
    );
}

#[tokio::test]
async fn test_prober_failure_propagates() {
    let prober = MockProber {
        report: h264_aac_mp4(),
    };
    assert!(prober.probe("").await.is_err());
}

#[tokio::test]
async fn test_audio_only_ffprobe_document() {
    let json = r#"{
        "streams": [{ "codec_type": "audio", "codec_name": "aac" }],
        "format": { "format_name": "mp4,m4a" }
    }"#;
    let report = ProbeReport::from_ffprobe_json(json).unwrap();
    let registry = ProfileRegistry::builtin();

    let negotiation = negotiate(
        &report,
        registry.lookup("Kitchen Speaker"),
        "Kitchen Speaker",
        &DirectiveFilters::default(),
    )
    .unwrap();

    assert!(negotiation.decision.is_audio_media);
    assert_eq!(negotiation.directives.output_args(), vec!["-acodec libvorbis", "-f ogg"]);
}

#[tokio::test]
async fn test_concurrent_sessions_share_registry() {
    let registry = Arc::new(ProfileRegistry::builtin());
    let mut handles = Vec::new();

    for i in 0..16 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            let device = if i % 2 == 0 { "Samsung DTV DMR" } else { "Generic" };
            let report = if i % 3 == 0 {
                ProbeReport::new("mp3", vec![StreamInfo::new(StreamKind::Audio, "mp3")])
            } else {
                ProbeReport::new(
                    "matroska,webm",
                    vec![
                        StreamInfo::new(StreamKind::Video, "vp9"),
                        StreamInfo::new(StreamKind::Audio, "opus"),
                    ],
                )
            };
            let profile = registry.lookup(device);
            negotiate(&report, profile, device, &DirectiveFilters::default())
                .map(|n| (i, n.decision.needs_transcoding, n.content_features))
        }));
    }

    for handle in handles {
        let (i, transcode, header) = handle.await.unwrap().unwrap();
        assert_eq!(transcode, i % 3 != 0);
        assert!(header.starts_with("DLNA.ORG_PN=AVC_MP4_HP_HD_AAC;"));
    }
}
