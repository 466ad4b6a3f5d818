use crate::profile::{name_matches, DeviceProfile};

impl DeviceProfile {
    /// Replacement MIME type for renderers known to reject the standard one
    ///
    /// Remap tables are keyed like `match_names`: an exact friendly name wins,
    /// otherwise the first key found case-insensitively inside the name.
    /// Unknown renderers and unmapped types come back unchanged.
    pub fn remap_mime<'a>(&'a self, friendly_name: &str, mime: &'a str) -> &'a str {
        let table = self.mime_remap.get(friendly_name).or_else(|| {
            self.mime_remap
                .iter()
                .find(|(pattern, _)| name_matches(friendly_name, pattern))
                .map(|(_, table)| table)
        });

        match table.and_then(|table| table.get(mime)) {
            Some(replacement) => {
                tracing::debug!("Remapped {} -> {} for '{}'", mime, replacement, friendly_name);
                replacement.as_str()
            }
            None => mime,
        }
    }
}

/// Owned variant of [`DeviceProfile::remap_mime`]
pub fn remap_mime(profile: &DeviceProfile, friendly_name: &str, mime: &str) -> String {
    profile.remap_mime(friendly_name, mime).to_string()
}
