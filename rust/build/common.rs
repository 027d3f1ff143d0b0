//! Common utilities shared across the build steps

use std::{
    env,
    path::{Path, PathBuf},
};

use super::platform::{PlatformError, Selection};
use super::{BuildContext, diagnostics};

/// Convert a potentially relative path to an absolute path
pub fn abs_path<P: AsRef<Path>>(p: P) -> PathBuf {
    if p.as_ref().is_absolute() {
        p.as_ref().to_path_buf()
    } else {
        env::current_dir().expect("current_dir failed").join(p)
    }
}

/// Check if an environment variable is set to a truthy value
pub fn is_truthy_env(name: &str) -> bool {
    env::var(name)
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Sysroot every table path is re-rooted under, if any
pub fn sysroot() -> Option<PathBuf> {
    env::var("CMP_SYSROOT")
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && p != "/")
        .map(abs_path)
}

/// Print the failure diagnostics and abort the build
pub fn fail_selection(selection: &Selection, err: &PlatformError) -> ! {
    diagnostics::report_selection_failure(selection, err);
    panic!("cmp-media-sys: {}", err);
}

/// Collect the build context from environment variables
pub fn collect_build_context() -> BuildContext {
    println!("cargo:rerun-if-env-changed=CMP_TARGET");
    println!("cargo:rerun-if-env-changed=CMP_PLATFORM");
    println!("cargo:rerun-if-env-changed=CMP_SYSROOT");
    println!("cargo:rerun-if-env-changed=CMP_RS_DIAGNOSTICS");
    println!("cargo:rerun-if-env-changed=CMP_RS_FORMAT_BINDINGS");

    let manifest_dir =
        abs_path(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let native_src_dir = manifest_dir.join("rust/src/native");
    println!("cargo:rerun-if-changed={}", native_src_dir.display());

    let selection = Selection::from_env();
    let target = selection
        .resolve()
        .unwrap_or_else(|err| fail_selection(&selection, &err));

    let sysroot = sysroot();
    let headers = match &sysroot {
        Some(root) => target.headers().with_sysroot(root),
        None => target.headers(),
    };

    println!("cargo:rustc-env=CMP_RESOLVED_TARGET={}", target);

    let target_triple = env::var("TARGET").unwrap_or_default();
    let host = env::var("HOST").unwrap_or_default();
    let profile = env::var("PROFILE").unwrap_or_else(|_| "release".into());

    BuildContext {
        manifest_dir,
        out_dir,
        native_src_dir,
        selection,
        target,
        headers,
        sysroot,
        target_triple,
        host,
        profile,
    }
}
