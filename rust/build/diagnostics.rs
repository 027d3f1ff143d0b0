use std::env;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::BuildContext;
use super::common::is_truthy_env;
use super::linux::read_os_release;
use super::platform::{Distribution, PlatformError, Selection};

/// Directories searched for misplaced headers, relative to the system root
const CANDIDATE_ROOTS: [&str; 2] = ["usr/include", "usr/local/include"];

/// Explain why no target could be resolved
pub fn report_selection_failure(selection: &Selection, err: &PlatformError) {
    println!("cargo:warning=cmp-media-sys: cannot resolve build target: {}", err);
    let features: Vec<&str> = selection.features.iter().map(|d| d.feature()).collect();
    println!("cargo:warning=  Enabled distribution features: {:?}", features);
    println!("cargo:warning=  CMP_TARGET: {:?}", selection.target_env);
    println!("cargo:warning=  CMP_PLATFORM: {:?}", selection.platform_env);
    println!(
        "cargo:warning=  Target: {} / {}",
        selection.target_os, selection.target_arch
    );

    // Only a hint; the build host is not necessarily the target
    if let Some(release) = read_os_release(Path::new("/")) {
        let name = release.pretty_name.clone().unwrap_or_else(|| release.id.clone());
        match release.distribution() {
            Some(d) => println!(
                "cargo:warning=  Build host looks like {} (enable feature `{}` or set CMP_TARGET={})",
                name,
                d.feature(),
                d.identifier()
            ),
            None => println!("cargo:warning=  Build host is {} which has no header table entry", name),
        }
    }

    let supported: Vec<&str> = Distribution::ALL.iter().map(|d| d.identifier()).collect();
    println!("cargo:warning=  Supported distributions: {}", supported.join(", "));
}

/// Find files ending in `rel` under the candidate roots
pub fn find_candidates(root: &Path, rel: &Path) -> Vec<PathBuf> {
    let Some(file_name) = rel.file_name() else {
        return Vec::new();
    };
    CANDIDATE_ROOTS
        .iter()
        .map(|r| root.join(r))
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| {
            WalkDir::new(dir)
                .max_depth(4)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
                .map(|entry| entry.into_path())
                .filter(|path| path.ends_with(rel))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// List missing headers and where copies of them were found instead
pub fn report_missing_headers(ctx: &BuildContext, missing: &[PathBuf]) {
    println!(
        "cargo:warning=cmp-media-sys: {} header(s) missing for target {}",
        missing.len(),
        ctx.target
    );
    let root = ctx.system_root();
    for header in missing {
        println!("cargo:warning=  missing: {}", header.display());
        let rel = [&ctx.headers.ffmpeg_include_dir, &ctx.headers.mpg123_include_dir]
            .into_iter()
            .find_map(|dir| header.strip_prefix(dir).ok())
            .unwrap_or(header.as_path());
        for found in find_candidates(&root, rel) {
            println!("cargo:warning=    found instead: {}", found.display());
        }
    }

    if let Some(release) = read_os_release(&root) {
        if let Some(d) = release.distribution() {
            if d != ctx.target.distribution {
                println!(
                    "cargo:warning=  {} looks like {}, but {} is selected",
                    root.display(),
                    d,
                    ctx.target.distribution
                );
            }
        }
    }
}

/// Print the resolved configuration when CMP_RS_DIAGNOSTICS is set
pub fn print_build_summary(ctx: &BuildContext) {
    if !is_truthy_env("CMP_RS_DIAGNOSTICS") {
        return;
    }
    println!("cargo:warning=Build Diagnostics:");
    println!("cargo:warning=  Target: {}", ctx.target);
    println!(
        "cargo:warning=  FFmpeg headers: {}",
        ctx.headers.ffmpeg_include_dir.display()
    );
    println!(
        "cargo:warning=  mpg123 headers: {}",
        ctx.headers.mpg123_include_dir.display()
    );
    println!("cargo:warning=  Libraries: {}", ctx.headers.library_dir.display());
    if let Some(sysroot) = &ctx.sysroot {
        println!("cargo:warning=  Sysroot: {}", sysroot.display());
    }
    if ctx.is_cross() {
        println!(
            "cargo:warning=  Cross build: {} -> {}",
            ctx.host, ctx.target_triple
        );
    }

    // Check Compiler (CC)
    if let Ok(cc) = env::var("CC") {
        println!("cargo:warning=  CC: {}", cc);
    }

    // pkg-config versions, when available, for comparison with the table
    for lib in ["libavcodec", "libmpg123"] {
        match pkg_config::Config::new()
            .cargo_metadata(false)
            .env_metadata(false)
            .probe(lib)
        {
            Ok(library) => println!("cargo:warning=  {}: {}", lib, library.version),
            Err(_) => println!("cargo:warning=  {}: not known to pkg-config", lib),
        }
    }
}
