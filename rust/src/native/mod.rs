//! Bindings to the native glue unit compiled against the resolved system headers.

use std::{
    ffi::CStr,
    sync::{Mutex, MutexGuard, PoisonError},
};

use autocxx::prelude::*;

use crate::version::{FfmpegGeneration, LibraryVersion, classify_ffmpeg_major};

include_cpp! {
    #include "cmp_glue.h"
    safety!(unsafe_ffi)
    generate!("cmp_libavcodec_version_major")
    generate!("cmp_avcodec_version")
    generate!("cmp_avformat_version")
    generate!("cmp_swresample_version")
    generate!("cmp_avutil_version")
    generate!("cmp_mpg123_api_version")
    generate!("cmp_mpg123_init")
    generate!("cmp_mpg123_exit")
    generate!("cmp_mpg123_plain_strerror")
}

// Constants probed from the headers by the build script.
include!(concat!(env!("OUT_DIR"), "/native_versions.rs"));

/// FFmpeg major version bucket of the build-time headers, also exposed as `cfg(cmp_ffmpeg)`.
#[cfg(cmp_ffmpeg = "6")]
pub const BUILD_FFMPEG_MAJOR: i32 = 6;
#[cfg(cmp_ffmpeg = "4")]
pub const BUILD_FFMPEG_MAJOR: i32 = 4;
#[cfg(cmp_ffmpeg = "3")]
pub const BUILD_FFMPEG_MAJOR: i32 = 3;

/// `<distribution>/<architecture>` the crate was built for.
pub const RESOLVED_TARGET: &str = env!("CMP_RESOLVED_TARGET");

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NativeError {
    #[error("mpg123_init failed with code {code}: {message}")]
    Mpg123Init { code: i32, message: String },
    #[error("libavcodec headers are major {header} but the linked library is major {linked}")]
    AbiMismatch { header: u32, linked: u32 },
}

/// `LIBAVCODEC_VERSION_MAJOR` as seen by the compiled glue.
pub fn libavcodec_version_major() -> i32 {
    ffi::cmp_libavcodec_version_major().0
}

/// Simplified FFmpeg major version (6, 4 or 3) of the headers the crate was built against.
pub fn ffmpeg_major_version() -> i32 {
    let major = libavcodec_version_major();
    let bucket = classify_ffmpeg_major(major);
    tracing::debug!(libavcodec_major = major, ffmpeg_major = bucket, "classified FFmpeg version");
    bucket
}

pub fn ffmpeg_generation() -> FfmpegGeneration {
    FfmpegGeneration::from_libavcodec_major(libavcodec_version_major())
}

/// Versions reported by the dynamically linked FFmpeg libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedVersions {
    pub avcodec: LibraryVersion,
    pub avformat: LibraryVersion,
    pub swresample: LibraryVersion,
    pub avutil: LibraryVersion,
}

pub fn linked_versions() -> LinkedVersions {
    LinkedVersions {
        avcodec: LibraryVersion::from_packed(ffi::cmp_avcodec_version().0),
        avformat: LibraryVersion::from_packed(ffi::cmp_avformat_version().0),
        swresample: LibraryVersion::from_packed(ffi::cmp_swresample_version().0),
        avutil: LibraryVersion::from_packed(ffi::cmp_avutil_version().0),
    }
}

/// Check that the runtime libavcodec matches the headers' major version.
pub fn check_header_abi() -> Result<LinkedVersions, NativeError> {
    let linked = linked_versions();
    let header = libavcodec_version_major().max(0) as u32;
    if linked.avcodec.major != header {
        tracing::warn!(
            header_major = header,
            linked = %linked.avcodec,
            "libavcodec header/library major version mismatch"
        );
        return Err(NativeError::AbiMismatch {
            header,
            linked: linked.avcodec.major,
        });
    }
    Ok(linked)
}

/// `MPG123_API_VERSION` of the mpg123 headers.
pub fn mpg123_api_version() -> i32 {
    ffi::cmp_mpg123_api_version().0
}

fn mpg123_strerror(code: i32) -> String {
    let ptr = unsafe { ffi::cmp_mpg123_plain_strerror(c_int(code)) };
    if ptr.is_null() {
        return format!("unknown mpg123 error {code}");
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

static MPG123_USERS: Mutex<usize> = Mutex::new(0);

fn mpg123_users() -> MutexGuard<'static, usize> {
    MPG123_USERS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Keeps the mpg123 library initialised while alive.
///
/// `mpg123_init` runs when the first guard is created and `mpg123_exit` when the
/// last one is dropped.
#[derive(Debug)]
pub struct Mpg123 {
    _private: (),
}

impl Mpg123 {
    pub fn init() -> Result<Mpg123, NativeError> {
        let mut users = mpg123_users();
        if *users == 0 {
            let code = ffi::cmp_mpg123_init().0;
            if code != 0 {
                return Err(NativeError::Mpg123Init {
                    code,
                    message: mpg123_strerror(code),
                });
            }
            tracing::debug!(api_version = mpg123_api_version(), "mpg123 initialised");
        }
        *users += 1;
        Ok(Mpg123 { _private: () })
    }

    /// Number of live guards.
    pub fn users() -> usize {
        *mpg123_users()
    }
}

impl Drop for Mpg123 {
    fn drop(&mut self) {
        let mut users = mpg123_users();
        *users = users.saturating_sub(1);
        if *users == 0 {
            ffi::cmp_mpg123_exit();
            tracing::debug!("mpg123 shut down");
        }
    }
}
