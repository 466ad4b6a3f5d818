/// Device capability profiles for DLNA renderers
///
/// Each renderer class is described by an immutable `DeviceProfile`: which
/// containers it plays as-is, which codecs force a transcode, the DLNA media
/// profile advertised for transcoded output and the protocol flag set.
/// Profiles are plain data, selected from a `ProfileRegistry` by the
/// renderer's friendly name.
use crate::error::{NegotiationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Name of the generic profile every lookup falls back to
pub const GENERIC_PROFILE_NAME: &str = "DLNA";

/// One named bit of the DLNA.ORG_FLAGS primary flag word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DlnaFlag {
    SenderPaced,
    LsopTimeBasedSeek,
    LsopByteBasedSeek,
    PlayContainer,
    S0Increasing,
    SnIncreasing,
    RtspPause,
    StreamingTransferMode,
    InteractiveTransferMode,
    BackgroundTransferMode,
    ConnectionStalling,
    DlnaVersion15,
}

impl DlnaFlag {
    pub const ALL: [DlnaFlag; 12] = [
        DlnaFlag::SenderPaced,
        DlnaFlag::LsopTimeBasedSeek,
        DlnaFlag::LsopByteBasedSeek,
        DlnaFlag::PlayContainer,
        DlnaFlag::S0Increasing,
        DlnaFlag::SnIncreasing,
        DlnaFlag::RtspPause,
        DlnaFlag::StreamingTransferMode,
        DlnaFlag::InteractiveTransferMode,
        DlnaFlag::BackgroundTransferMode,
        DlnaFlag::ConnectionStalling,
        DlnaFlag::DlnaVersion15,
    ];

    /// Bit position within the 32-bit flag word
    pub fn bit(&self) -> u32 {
        match self {
            DlnaFlag::SenderPaced => 31,
            DlnaFlag::LsopTimeBasedSeek => 30,
            DlnaFlag::LsopByteBasedSeek => 29,
            DlnaFlag::PlayContainer => 28,
            DlnaFlag::S0Increasing => 27,
            DlnaFlag::SnIncreasing => 26,
            DlnaFlag::RtspPause => 25,
            DlnaFlag::StreamingTransferMode => 24,
            DlnaFlag::InteractiveTransferMode => 23,
            DlnaFlag::BackgroundTransferMode => 22,
            DlnaFlag::ConnectionStalling => 21,
            DlnaFlag::DlnaVersion15 => 20,
        }
    }

    pub fn mask(&self) -> u32 {
        1u32 << self.bit()
    }
}

/// Enabled DLNA capability flags of a profile
///
/// Fields omitted from a config document keep their generic-profile value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlnaFlags {
    pub sender_paced: bool,
    pub lsop_time_based_seek: bool,
    pub lsop_byte_based_seek: bool,
    pub playcontainer: bool,
    pub s0_increasing: bool,
    pub sn_increasing: bool,
    pub rtsp_pause: bool,
    pub streaming_transfer_mode: bool,
    pub interactive_transfer_mode: bool,
    pub background_transfer_mode: bool,
    pub connection_stalling: bool,
    pub dlna_version_15: bool,
}

impl Default for DlnaFlags {
    fn default() -> Self {
        Self {
            sender_paced: false,
            lsop_time_based_seek: false,
            lsop_byte_based_seek: false,
            playcontainer: false,
            s0_increasing: false,
            sn_increasing: false,
            rtsp_pause: false,
            streaming_transfer_mode: true,
            interactive_transfer_mode: false,
            background_transfer_mode: false,
            connection_stalling: true,
            dlna_version_15: true,
        }
    }
}

impl DlnaFlags {
    /// No flag enabled
    pub fn none() -> Self {
        Self::from_flags(&[])
    }

    pub fn from_flags(flags: &[DlnaFlag]) -> Self {
        let mut set = Self {
            streaming_transfer_mode: false,
            connection_stalling: false,
            dlna_version_15: false,
            ..Default::default()
        };
        for flag in flags {
            *set.slot(*flag) = true;
        }
        set
    }

    pub fn is_enabled(&self, flag: DlnaFlag) -> bool {
        match flag {
            DlnaFlag::SenderPaced => self.sender_paced,
            DlnaFlag::LsopTimeBasedSeek => self.lsop_time_based_seek,
            DlnaFlag::LsopByteBasedSeek => self.lsop_byte_based_seek,
            DlnaFlag::PlayContainer => self.playcontainer,
            DlnaFlag::S0Increasing => self.s0_increasing,
            DlnaFlag::SnIncreasing => self.sn_increasing,
            DlnaFlag::RtspPause => self.rtsp_pause,
            DlnaFlag::StreamingTransferMode => self.streaming_transfer_mode,
            DlnaFlag::InteractiveTransferMode => self.interactive_transfer_mode,
            DlnaFlag::BackgroundTransferMode => self.background_transfer_mode,
            DlnaFlag::ConnectionStalling => self.connection_stalling,
            DlnaFlag::DlnaVersion15 => self.dlna_version_15,
        }
    }

    fn slot(&mut self, flag: DlnaFlag) -> &mut bool {
        match flag {
            DlnaFlag::SenderPaced => &mut self.sender_paced,
            DlnaFlag::LsopTimeBasedSeek => &mut self.lsop_time_based_seek,
            DlnaFlag::LsopByteBasedSeek => &mut self.lsop_byte_based_seek,
            DlnaFlag::PlayContainer => &mut self.playcontainer,
            DlnaFlag::S0Increasing => &mut self.s0_increasing,
            DlnaFlag::SnIncreasing => &mut self.sn_increasing,
            DlnaFlag::RtspPause => &mut self.rtsp_pause,
            DlnaFlag::StreamingTransferMode => &mut self.streaming_transfer_mode,
            DlnaFlag::InteractiveTransferMode => &mut self.interactive_transfer_mode,
            DlnaFlag::BackgroundTransferMode => &mut self.background_transfer_mode,
            DlnaFlag::ConnectionStalling => &mut self.connection_stalling,
            DlnaFlag::DlnaVersion15 => &mut self.dlna_version_15,
        }
    }

    /// Bitwise OR of every enabled flag
    pub fn bits(&self) -> u32 {
        DlnaFlag::ALL
            .iter()
            .filter(|flag| self.is_enabled(**flag))
            .fold(0u32, |acc, flag| acc | flag.mask())
    }
}

/// Capability profile of a renderer class
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub name: String,
    /// Friendly names (case-insensitive substrings) this profile applies to
    pub match_names: Vec<String>,
    /// Container formats played without transcoding
    pub valid_formats: BTreeSet<String>,
    /// Audio codecs that force a transcode even in a valid container
    pub audio_needs_transcoding_codecs: BTreeSet<String>,
    /// Video codecs that force a transcode even in a valid container
    pub video_needs_transcoding_codecs: BTreeSet<String>,
    /// DLNA.ORG_PN value advertised for transcoded output
    pub transcoded_media_profile: String,
    pub content_type: String,
    pub flags: DlnaFlags,
    /// friendly-name pattern -> (source MIME -> replacement MIME)
    pub mime_remap: BTreeMap<String, BTreeMap<String, String>>,
}

/// Case-insensitive substring match of a friendly-name pattern
pub(crate) fn name_matches(friendly_name: &str, pattern: &str) -> bool {
    !pattern.is_empty() && friendly_name.to_lowercase().contains(&pattern.to_lowercase())
}

fn set_of(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn samsung_mime_table() -> BTreeMap<String, BTreeMap<String, String>> {
    let table: BTreeMap<String, String> = [
        ("video/x-matroska", "video/x-mkv"),
        ("video/x-avi", "video/x-msvideo"),
        ("application/x-subrip", "smi/caption"),
    ]
    .iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect();

    BTreeMap::from([("Samsung DTV DMR".to_string(), table)])
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::generic()
    }
}

impl DeviceProfile {
    /// Generic DLNA renderer profile (fallback)
    pub fn generic() -> Self {
        Self {
            name: GENERIC_PROFILE_NAME.to_string(),
            match_names: Vec::new(),
            valid_formats: set_of(&["mp4,m4a", "mp3"]),
            audio_needs_transcoding_codecs: set_of(&["aac"]),
            video_needs_transcoding_codecs: set_of(&["h264"]),
            transcoded_media_profile: "AVC_MP4_HP_HD_AAC".to_string(),
            content_type: "video/mp4".to_string(),
            flags: DlnaFlags::default(),
            mime_remap: BTreeMap::new(),
        }
    }

    /// Samsung TVs: generic capabilities plus Samsung's MIME remap table
    pub fn samsung() -> Self {
        Self {
            name: "Samsung".to_string(),
            match_names: vec!["Samsung DTV DMR".to_string()],
            mime_remap: samsung_mime_table(),
            ..Self::generic()
        }
    }

    /// Whether this profile applies to a renderer with the given friendly name
    pub fn matches(&self, friendly_name: &str) -> bool {
        self.match_names
            .iter()
            .any(|pattern| name_matches(friendly_name, pattern))
    }
}

/// Partial profile as written in a config document
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileEntry {
    name: String,
    #[serde(default)]
    match_names: Option<Vec<String>>,
    #[serde(default)]
    valid_formats: Option<BTreeSet<String>>,
    #[serde(default)]
    audio_needs_transcoding_codecs: Option<BTreeSet<String>>,
    #[serde(default)]
    video_needs_transcoding_codecs: Option<BTreeSet<String>>,
    #[serde(default)]
    transcoded_media_profile: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    flags: Option<DlnaFlags>,
    #[serde(default)]
    mime_remap: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

impl ProfileEntry {
    fn into_profile(self) -> DeviceProfile {
        let base = DeviceProfile::generic();
        DeviceProfile {
            name: self.name,
            match_names: self.match_names.unwrap_or_default(),
            valid_formats: self.valid_formats.unwrap_or(base.valid_formats),
            audio_needs_transcoding_codecs: self
                .audio_needs_transcoding_codecs
                .unwrap_or(base.audio_needs_transcoding_codecs),
            video_needs_transcoding_codecs: self
                .video_needs_transcoding_codecs
                .unwrap_or(base.video_needs_transcoding_codecs),
            transcoded_media_profile: self
                .transcoded_media_profile
                .unwrap_or(base.transcoded_media_profile),
            content_type: self.content_type.unwrap_or(base.content_type),
            flags: self.flags.unwrap_or(base.flags),
            mime_remap: self.mime_remap.unwrap_or(base.mime_remap),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProfileConfig {
    #[serde(default)]
    profile: Vec<ProfileEntry>,
}

/// Parse `[[profile]]` tables from a TOML document
pub fn parse_profiles(toml_str: &str) -> Result<Vec<DeviceProfile>> {
    let config: ProfileConfig =
        toml::from_str(toml_str).map_err(|e| NegotiationError::ProfileConfig(e.to_string()))?;

    let mut seen = BTreeSet::new();
    let mut profiles = Vec::with_capacity(config.profile.len());
    for entry in config.profile {
        if entry.name.trim().is_empty() {
            return Err(NegotiationError::ProfileConfig(
                "profile name must not be empty".to_string(),
            ));
        }
        if !seen.insert(entry.name.clone()) {
            return Err(NegotiationError::ProfileConfig(format!(
                "duplicate profile '{}'",
                entry.name
            )));
        }
        profiles.push(entry.into_profile());
    }

    Ok(profiles)
}

/// Read-only set of device profiles, shared freely across sessions
#[derive(Clone, Debug)]
pub struct ProfileRegistry {
    generic: DeviceProfile,
    overrides: Vec<DeviceProfile>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Generic DLNA profile plus the built-in vendor overrides
    pub fn builtin() -> Self {
        Self {
            generic: DeviceProfile::generic(),
            overrides: vec![DeviceProfile::samsung()],
        }
    }

    /// Layer profiles on top of the built-ins; same name replaces
    pub fn with_profiles(mut self, profiles: Vec<DeviceProfile>) -> Self {
        for profile in profiles {
            if profile.name == GENERIC_PROFILE_NAME {
                tracing::debug!("Replacing generic profile from config");
                self.generic = profile;
            } else if let Some(existing) =
                self.overrides.iter_mut().find(|p| p.name == profile.name)
            {
                tracing::debug!("Replacing built-in profile '{}'", profile.name);
                *existing = profile;
            } else {
                tracing::debug!("Adding profile '{}'", profile.name);
                self.overrides.push(profile);
            }
        }
        self
    }

    /// Built-ins overlaid with a TOML config document
    pub fn with_config(toml_str: &str) -> Result<Self> {
        Ok(Self::builtin().with_profiles(parse_profiles(toml_str)?))
    }

    /// Built-ins overlaid with a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        tracing::info!("Loading device profiles from {}", path.display());
        Self::with_config(&contents)
    }

    pub fn generic(&self) -> &DeviceProfile {
        &self.generic
    }

    /// Select the profile for a renderer; falls back to the generic profile
    pub fn lookup(&self, friendly_name: &str) -> &DeviceProfile {
        match self.overrides.iter().find(|p| p.matches(friendly_name)) {
            Some(profile) => {
                tracing::debug!("Matched profile '{}' for '{}'", profile.name, friendly_name);
                profile
            }
            None => {
                tracing::debug!("No specific profile for '{}', using generic", friendly_name);
                &self.generic
            }
        }
    }

    /// Profile by its own name
    pub fn get(&self, name: &str) -> Option<&DeviceProfile> {
        std::iter::once(&self.generic)
            .chain(self.overrides.iter())
            .find(|p| p.name == name)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &DeviceProfile> {
        std::iter::once(&self.generic).chain(self.overrides.iter())
    }
}
