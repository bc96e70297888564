//! Update-key to URL resolution
//!
//! Manifests carry update keys of the form `provider:id`. The resolver only
//! needs a lookup function; the provider table lives here so the core stays
//! free of site knowledge.

/// Resolve an update key to a download page URL.
///
/// Unknown providers and malformed keys yield `None`.
#[must_use]
pub fn update_url(key: &str) -> Option<String> {
    let (provider, id) = key.split_once(':')?;
    let id = id.trim();
    if id.is_empty() {
        return None;
    }

    match provider.trim().to_ascii_lowercase().as_str() {
        "nexus" => Some(format!("https://www.nexusmods.com/mods/{id}")),
        "github" => Some(format!("https://github.com/{id}/releases")),
        "curseforge" => Some(format!("https://www.curseforge.com/projects/{id}")),
        _ => None,
    }
}
