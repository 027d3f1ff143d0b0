//! Modular build system for cmp-media-sys
//!
//! This module resolves the target platform and drives the native glue build.

// Allow unused items: the shared platform/version/os_release modules carry runtime-only helpers
#![allow(dead_code)]

#[path = "../src/platform.rs"]
pub mod platform;
#[path = "../src/version.rs"]
pub mod version;
#[path = "../src/os_release.rs"]
pub mod os_release;

#[cfg(feature = "native")]
pub mod autocxx;
#[cfg(feature = "native")]
pub mod common;
#[cfg(feature = "native")]
pub mod diagnostics;
#[cfg(feature = "native")]
pub mod glue;
#[cfg(feature = "native")]
pub mod headers;
#[cfg(feature = "native")]
pub mod linux;

use std::path::PathBuf;

use platform::{HeaderSet, Selection, Target};

/// Build context containing the resolved target and all paths needed for the build.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub manifest_dir: PathBuf,
    pub out_dir: PathBuf,

    /// `rust/src/native`: glue sources and the bridge header
    pub native_src_dir: PathBuf,

    pub selection: Selection,
    pub target: Target,
    /// Table entry for `target`, already re-rooted under `sysroot`
    pub headers: HeaderSet,
    pub sysroot: Option<PathBuf>,

    pub target_triple: String,
    pub host: String,
    pub profile: String,
}

impl BuildContext {
    /// Returns true if cross-compiling
    pub fn is_cross(&self) -> bool {
        self.target_triple != self.host
    }

    /// Returns true if this is a debug build
    pub fn is_debug(&self) -> bool {
        self.profile == "debug"
    }

    /// Root under which the distribution's headers live (`/` unless a sysroot is set)
    pub fn system_root(&self) -> PathBuf {
        self.sysroot.clone().unwrap_or_else(|| PathBuf::from("/"))
    }
}
