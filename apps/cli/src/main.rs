mod prober;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dlnacast_core::{
    negotiate, DeviceProfile, DirectiveFilters, MediaItem, MediaProber, ProfileRegistry,
    SinkCapabilities,
};
use prober::JsonFileProber;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dlnacast", about = "Negotiate DLNA playback for a media item")]
struct Cli {
    /// Device profile config (TOML); defaults to <config dir>/dlnacast/profiles.toml
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide transcoding and print headers and encoder directives
    Negotiate {
        /// Saved `ffprobe -show_format -show_streams -print_format json` output
        #[arg(long)]
        probe: PathBuf,
        /// Renderer friendly name
        #[arg(long)]
        device: String,
        /// Input-side audio shift correction directive
        #[arg(long)]
        audio_shift: Option<String>,
        /// Subtitle filter directive
        #[arg(long)]
        subtitle: Option<String>,
        /// Rescale filter directive
        #[arg(long)]
        rescale: Option<String>,
        /// Renderer sink protocolInfo list (GetProtocolInfo), to check the served MIME against
        #[arg(long)]
        sink: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known device profiles
    Profiles,
    /// Print the MIME type a renderer should be sent
    Remap {
        #[arg(long)]
        device: String,
        #[arg(long)]
        mime: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dlnacast=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = load_registry(cli.profiles.as_deref())?;

    match cli.command {
        Command::Negotiate {
            probe,
            device,
            audio_shift,
            subtitle,
            rescale,
            sink,
            json,
        } => {
            let report = JsonFileProber.probe(&probe.to_string_lossy()).await?;
            let profile = registry.lookup(&device);
            let filters = DirectiveFilters {
                audio_shift_correction: audio_shift,
                subtitle_filter: subtitle,
                rescale_filter: rescale,
            };

            let negotiation = negotiate(&report, profile, &device, &filters)?;
            let item = analyzed_item(&probe, profile);
            let accepts = sink_accepts(sink.as_deref(), &negotiation.content_type);

            if json {
                let output = serde_json::json!({
                    "media": item,
                    "negotiation": negotiation,
                    "sink_accepts_content_type": accepts,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let decision = &negotiation.decision;
                println!("media: {} ({})", item.id, item.filename.as_deref().unwrap_or("-"));
                println!("profile: {}", negotiation.profile);
                println!("video media: {}", decision.is_video_media);
                println!("audio media: {}", decision.is_audio_media);
                println!("needs transcoding: {}", decision.needs_transcoding);
                println!("content type: {}", negotiation.content_type);
                if let Some(accepts) = accepts {
                    println!("renderer accepts content type: {}", accepts);
                }
                for (name, value) in &negotiation.headers {
                    println!("{}: {}", name, value);
                }
                println!("input options: {}", negotiation.directives.input_args().join(" "));
                println!("output options: {}", negotiation.directives.output_args().join(" "));
            }
        }
        Command::Profiles => {
            for profile in registry.profiles() {
                println!(
                    "{} [{}] pn={} flags={:x}",
                    profile.name,
                    profile.match_names.join(", "),
                    profile.transcoded_media_profile,
                    profile.flags.bits()
                );
            }
        }
        Command::Remap { device, mime } => {
            println!("{}", registry.lookup(&device).remap_mime(&device, &mime));
        }
    }

    Ok(())
}

/// Media item for the probed file, analyzed against `profile`
fn analyzed_item(probe: &Path, profile: &DeviceProfile) -> MediaItem {
    let mut item = MediaItem::new();
    if let Some(name) = probe.file_name() {
        item = item.with_filename(name.to_string_lossy());
    }
    item.set_profile(profile.name.as_str());
    item
}

/// Whether the renderer's sink list accepts the served MIME; `None` without a list
fn sink_accepts(sink: Option<&str>, content_type: &str) -> Option<bool> {
    sink.map(|list| SinkCapabilities::parse(list).supports_mime(content_type))
}

/// Built-in profiles, overlaid with the config file when one exists
fn load_registry(explicit: Option<&std::path::Path>) -> Result<ProfileRegistry> {
    if let Some(path) = explicit {
        return Ok(ProfileRegistry::load(path)?);
    }

    match default_profiles_path() {
        Some(path) if path.exists() => Ok(ProfileRegistry::load(&path)?),
        _ => {
            tracing::debug!("No profile config found, using built-in profiles");
            Ok(ProfileRegistry::builtin())
        }
    }
}

fn default_profiles_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dlnacast").join("profiles.toml"))
}
