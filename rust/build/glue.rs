//! Native glue compilation, header version probing and linking

use std::{fs, path::Path};

use super::BuildContext;
use super::platform::LINK_LIBRARIES;
use super::version::{classify_ffmpeg_major, parse_probe_value};

/// Version macros read from the resolved headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderVersions {
    pub libavcodec_major: i32,
    pub mpg123_api: i32,
}

fn glue_build(ctx: &BuildContext, generated_include_dir: &Path) -> cc::Build {
    let mut build = cc::Build::new();
    build
        .include(generated_include_dir)
        .include(&ctx.native_src_dir)
        .includes(ctx.headers.include_dirs())
        .warnings(false);
    build
}

/// Preprocess `version_probe.c` against the resolved headers
pub fn probe_header_versions(ctx: &BuildContext, generated_include_dir: &Path) -> HeaderVersions {
    let probe = ctx.native_src_dir.join("version_probe.c");
    let expanded = glue_build(ctx, generated_include_dir)
        .file(&probe)
        .try_expand()
        .unwrap_or_else(|e| panic!("Failed to preprocess {}: {}", probe.display(), e));
    let expanded = String::from_utf8_lossy(&expanded);

    let read = |key: &str| {
        parse_probe_value(&expanded, key).unwrap_or_else(|| {
            panic!(
                "{} did not expand to an integer with the {} headers",
                key, ctx.target
            )
        })
    };

    HeaderVersions {
        libavcodec_major: read("CMP_PROBE_LIBAVCODEC_VERSION_MAJOR"),
        mpg123_api: read("CMP_PROBE_MPG123_API_VERSION"),
    }
}

/// Render `native_versions.rs`, included by the `native` module
pub fn render_native_versions(versions: &HeaderVersions) -> String {
    format!(
        "/// `LIBAVCODEC_VERSION_MAJOR` of the headers used at build time.\n\
         pub const LIBAVCODEC_VERSION_MAJOR: i32 = {};\n\
         /// `MPG123_API_VERSION` of the headers used at build time.\n\
         pub const MPG123_API_VERSION: i32 = {};\n",
        versions.libavcodec_major, versions.mpg123_api
    )
}

/// Write the version constants and expose the FFmpeg bucket as `cfg(cmp_ffmpeg = "N")`
pub fn write_native_versions(ctx: &BuildContext, versions: &HeaderVersions) {
    let path = ctx.out_dir.join("native_versions.rs");
    fs::write(&path, render_native_versions(versions))
        .expect("Failed to write native_versions.rs");

    let bucket = classify_ffmpeg_major(versions.libavcodec_major);
    println!("cargo:rustc-cfg=cmp_ffmpeg=\"{}\"", bucket);
    println!(
        "cargo:warning=cmp-media-sys: {} libavcodec {} (FFmpeg {}), mpg123 API {}",
        ctx.target, versions.libavcodec_major, bucket, versions.mpg123_api
    );
}

/// Compile the C glue unit into a static library
pub fn compile_glue(ctx: &BuildContext, generated_include_dir: &Path) {
    let mut build = glue_build(ctx, generated_include_dir);
    build.file(ctx.native_src_dir.join("cmp_glue.c"));
    if ctx.is_debug() {
        build.debug(true);
    }
    build.compile("cmp_glue");
}

/// Link the system FFmpeg and mpg123 libraries from the table's library dir
pub fn link_native_libraries(ctx: &BuildContext) {
    println!(
        "cargo:rustc-link-search=native={}",
        ctx.headers.library_dir.display()
    );
    for lib in LINK_LIBRARIES {
        println!("cargo:rustc-link-lib=dylib={}", lib);
    }

    // Metadata for dependents: DEP_CMP_MEDIA_INCLUDE / DEP_CMP_MEDIA_TARGET
    let include = ctx
        .headers
        .include_dirs()
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(":");
    println!("cargo:include={}", include);
    println!("cargo:target={}", ctx.target);
}
