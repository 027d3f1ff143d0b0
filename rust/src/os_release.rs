//! `os-release` parsing, shared with the build script's host diagnostics.

use super::platform::Distribution;

/// The fields of `/etc/os-release` the header table cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub version_id: String,
    pub pretty_name: Option<String>,
}

impl OsRelease {
    /// Parse `os-release` contents (`KEY=value` lines, optional quotes).
    pub fn parse(contents: &str) -> OsRelease {
        let mut release = OsRelease::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let val = v.trim().trim_matches('"').trim_matches('\'').to_string();
            match k.trim() {
                "ID" => release.id = val.to_ascii_lowercase(),
                "VERSION_ID" => release.version_id = val,
                "PRETTY_NAME" => release.pretty_name = Some(val),
                _ => {}
            }
        }
        release
    }

    /// Distribution entry matching this release, if it is one we have a table row for.
    pub fn distribution(&self) -> Option<Distribution> {
        Distribution::from_os_release(&self.id, &self.version_id)
    }
}
