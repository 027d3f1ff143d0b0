//! Header verification and generation of the include glue

use std::{
    fs::{self, create_dir_all},
    path::PathBuf,
};

use super::{BuildContext, diagnostics};

/// Fail the build unless every header of the resolved table entry exists
pub fn verify_headers(ctx: &BuildContext) {
    for header in ctx.headers.all_headers() {
        println!("cargo:rerun-if-changed={}", header.display());
    }

    let missing = ctx.headers.missing_headers();
    if missing.is_empty() {
        return;
    }

    diagnostics::report_missing_headers(ctx, &missing);
    let listing = missing
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "cmp-media-sys: target {} is selected but its headers are missing:\n{}\n\
         Install the FFmpeg and mpg123 development packages for this distribution \
         or select the matching target.",
        ctx.target, listing
    );
}

/// Render `cmp_headers.h`: one absolute `#include` per table header
pub fn render_include_header(ctx: &BuildContext) -> String {
    let mut out = String::new();
    out.push_str("/* Generated by cmp-media-sys build script. Do not edit. */\n");
    out.push_str(&format!("/* target: {} */\n", ctx.target));
    out.push_str("#ifndef CMP_HEADERS_H\n#define CMP_HEADERS_H\n\n");
    out.push_str("#include <stddef.h>\n#include <sys/types.h>\n\n");
    for header in ctx.headers.all_headers() {
        out.push_str(&format!("#include <{}>\n", header.display()));
    }
    out.push_str("\n#endif\n");
    out
}

/// Write `cmp_headers.h` into OUT_DIR and return the directory holding it
pub fn write_include_header(ctx: &BuildContext) -> PathBuf {
    let include_dir = ctx.out_dir.join("include");
    create_dir_all(&include_dir).expect("Failed to create generated include dir");
    let path = include_dir.join("cmp_headers.h");
    fs::write(&path, render_include_header(ctx)).expect("Failed to write cmp_headers.h");
    include_dir
}
