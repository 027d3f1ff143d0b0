//! Autocxx bridge building and code generation

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use super::BuildContext;
use super::common::is_truthy_env;

/// Build the autocxx bridge over the glue header
pub fn build_autocxx_bridge(ctx: &BuildContext) {
    println!("cargo:rerun-if-changed=rust/src/native/mod.rs");

    let mut extra_clang_args = vec!["-std=c++17".to_string()];

    // Cross builds: parse the glue header for the target, not the host
    if ctx.is_cross() && !ctx.target_triple.is_empty() {
        extra_clang_args.push(format!("--target={}", ctx.target_triple));
    }
    if let Some(sysroot) = &ctx.sysroot {
        extra_clang_args.push(format!("--sysroot={}", sysroot.display()));
    }

    let extra_clang_args_refs: Vec<&str> = extra_clang_args.iter().map(|s| s.as_str()).collect();

    let mut autocxx_builder =
        autocxx_build::Builder::new("rust/src/native/mod.rs", [&ctx.native_src_dir])
            .extra_clang_args(&extra_clang_args_refs)
            .build()
            .expect("autocxx build failed");

    autocxx_builder
        .flag_if_supported("-std=c++17")
        .include(&ctx.native_src_dir)
        .include(&ctx.manifest_dir);

    autocxx_builder.compile("cmp_media_bridge");
}

/// Generated binding files under OUT_DIR
pub fn generated_binding_files(out_dir: &Path) -> Vec<PathBuf> {
    let rs_dir = out_dir.join("autocxx-build-dir/rs");
    let Ok(rd) = fs::read_dir(&rs_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = rd
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.starts_with("autocxx-") && name.ends_with("-gen.rs"))
        })
        .collect();
    files.sort();
    files
}

/// Optionally format the generated bindings with rustfmt, for readable `cargo expand` output
pub fn format_generated_bindings_optional(out_dir: &Path) {
    if !is_truthy_env("CMP_RS_FORMAT_BINDINGS") {
        return;
    }
    for gen_rs in generated_binding_files(out_dir) {
        match Command::new("rustfmt").arg("--edition=2024").arg(&gen_rs).status() {
            Ok(status) if !status.success() => {
                println!(
                    "cargo:warning=rustfmt returned non-zero status on {}",
                    gen_rs.display()
                );
            }
            Ok(_) => {}
            Err(err) => {
                println!("cargo:warning=rustfmt not executed: {}", err);
            }
        }
    }
}
