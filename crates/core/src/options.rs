use crate::decision::TranscodeDecision;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One encoder directive, rendered as an ffmpeg-style argument
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    AudioCodec(String),
    VideoCodec(String),
    CopyTs,
    Preset(String),
    Tune(String),
    Crf(u8),
    /// Video bitstream filter
    BitstreamFilter(String),
    Format(String),
    /// Caller-supplied directive, passed through verbatim
    Raw(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::AudioCodec(codec) => write!(f, "-acodec {}", codec),
            Directive::VideoCodec(codec) => write!(f, "-vcodec {}", codec),
            Directive::CopyTs => write!(f, "-copyts"),
            Directive::Preset(preset) => write!(f, "-preset {}", preset),
            Directive::Tune(tune) => write!(f, "-tune {}", tune),
            Directive::Crf(crf) => write!(f, "-crf {}", crf),
            Directive::BitstreamFilter(filter) => write!(f, "-bsf:v {}", filter),
            Directive::Format(format) => write!(f, "-f {}", format),
            Directive::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// Optional filter directives supplied by the caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveFilters {
    /// Input-side audio offset correction (e.g. `-itsoffset 0.3`)
    pub audio_shift_correction: Option<String>,
    /// Subtitle burn-in filter
    pub subtitle_filter: Option<String>,
    /// Video rescale filter
    pub rescale_filter: Option<String>,
}

/// Ordered input/output directive lists for the external encoder
///
/// Order is significant: the encoder applies filters positionally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderDirectives {
    pub input_options: Vec<Directive>,
    pub output_options: Vec<Directive>,
}

impl EncoderDirectives {
    pub fn input_args(&self) -> Vec<String> {
        self.input_options.iter().map(ToString::to_string).collect()
    }

    pub fn output_args(&self) -> Vec<String> {
        self.output_options.iter().map(ToString::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.input_options.is_empty() && self.output_options.is_empty()
    }
}

fn video_trailer() -> [Directive; 6] {
    [
        Directive::CopyTs,
        Directive::Preset("ultrafast".to_string()),
        Directive::Tune("zerolatency".to_string()),
        Directive::Crf(28),
        Directive::BitstreamFilter("h264_mp4toannexb".to_string()),
        Directive::Format("mp4".to_string()),
    ]
}

/// Translate a decision into encoder directives
pub fn build_directives(decision: &TranscodeDecision, filters: &DirectiveFilters) -> EncoderDirectives {
    let mut directives = EncoderDirectives::default();
    let input = &mut directives.input_options;
    let output = &mut directives.output_options;

    if decision.is_video_media {
        if decision.audio_needs_transcoding || filters.audio_shift_correction.is_some() {
            if let Some(shift) = &filters.audio_shift_correction {
                input.push(Directive::Raw(shift.clone()));
            }
            output.push(Directive::AudioCodec("aac".to_string()));
        } else {
            output.push(Directive::AudioCodec("copy".to_string()));
        }

        if decision.video_needs_transcoding
            || filters.subtitle_filter.is_some()
            || filters.rescale_filter.is_some()
        {
            if let Some(subtitle) = &filters.subtitle_filter {
                output.push(Directive::Raw(subtitle.clone()));
            }
            if let Some(rescale) = &filters.rescale_filter {
                output.push(Directive::Raw(rescale.clone()));
            }
            output.push(Directive::VideoCodec("libx264".to_string()));
        } else {
            output.push(Directive::VideoCodec("copy".to_string()));
        }

        output.extend(video_trailer());
    } else if decision.is_audio_media {
        if decision.audio_needs_transcoding {
            output.push(Directive::AudioCodec("libvorbis".to_string()));
            output.push(Directive::Format("ogg".to_string()));
        } else {
            output.push(Directive::Format(decision.container_format.clone()));
        }
    }

    tracing::debug!(
        input = directives.input_options.len(),
        output = directives.output_options.len(),
        "Built encoder directives"
    );

    directives
}
