//! Build script for cmp-media-sys
//!
//! With the `native` feature this script:
//! - Resolves the target distribution/architecture to a header table entry
//! - Verifies the FFmpeg and mpg123 headers exist and generates `cmp_headers.h`
//! - Probes the header version macros and compiles the C glue unit
//! - Generates Rust bindings via autocxx and emits link directives
//!
//! Without `native` nothing native is touched.
//!
//! ## Environment Variables
//!
//! - `CMP_TARGET`: Target distribution (`ubuntu-22.04`, `ubuntu-24.04`, `fedora-40`, `manjaro-24`)
//! - `CMP_PLATFORM`: Override the architecture (`amd64`, `arm64`)
//! - `CMP_SYSROOT`: Prefix applied to every header and library path
//! - `CMP_RS_DIAGNOSTICS`: Always print the build diagnostics
//! - `CMP_RS_FORMAT_BINDINGS`: Run rustfmt over the generated bindings
//! - `LIBCLANG_PATH`: Override libclang location

#[path = "build/mod.rs"]
mod build;

fn main() {
    println!("cargo:rerun-if-changed=rust/build.rs");
    println!("cargo:rerun-if-changed=rust/build");
    println!("cargo:rustc-check-cfg=cfg(cmp_ffmpeg, values(\"3\", \"4\", \"6\"))");

    #[cfg(feature = "native")]
    build_native();
}

#[cfg(feature = "native")]
fn build_native() {
    // Resolve the target and its header table entry; fails the build on any mismatch
    let ctx = build::common::collect_build_context();

    build::diagnostics::print_build_summary(&ctx);

    // Every header must be present before anything is compiled against it
    build::headers::verify_headers(&ctx);
    let generated_include_dir = build::headers::write_include_header(&ctx);

    // Record the header versions as Rust constants and cfgs
    let versions = build::glue::probe_header_versions(&ctx, &generated_include_dir);
    build::glue::write_native_versions(&ctx, &versions);

    // Bridge first, then the glue it calls into, then the system libraries
    build::autocxx::build_autocxx_bridge(&ctx);
    build::glue::compile_glue(&ctx, &generated_include_dir);
    build::glue::link_native_libraries(&ctx);

    build::autocxx::format_generated_bindings_optional(&ctx.out_dir);
}
