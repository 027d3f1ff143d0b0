//! Linux host inspection

use std::{fs, path::Path};

use super::os_release::OsRelease;

/// Read `etc/os-release` (falling back to `usr/lib/os-release`) under `root`
pub fn read_os_release(root: &Path) -> Option<OsRelease> {
    ["etc/os-release", "usr/lib/os-release"]
        .iter()
        .find_map(|rel| fs::read_to_string(root.join(rel)).ok())
        .map(|contents| OsRelease::parse(&contents))
}
