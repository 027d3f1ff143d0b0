//! Native header selection and FFmpeg/mpg123 glue for CMPlayer.
//!
//! The crate resolves where a supported Linux distribution installs the FFmpeg
//! (`libavformat`, `libavcodec`, `libswresample`, `libavutil`) and `mpg123`
//! development headers, compiles a small C glue unit against them and exposes a
//! few version queries.
//!
//! The platform table and the version classifier are always available. The
//! bindings need the `native` feature plus exactly one distribution feature
//! (`ubuntu-22-04`, `ubuntu-24-04`, `fedora-40`, `manjaro-24`) or `CMP_TARGET`.
//!
//! ```
//! use cmp_media::{Architecture, Distribution, Target, classify_ffmpeg_major};
//!
//! let headers = Target::new(Distribution::Fedora40, Architecture::Amd64).headers();
//! assert_eq!(headers.ffmpeg_include_dir, std::path::Path::new("/usr/include/ffmpeg"));
//! assert_eq!(classify_ffmpeg_major(60), 6);
//! ```

pub mod os_release;
pub mod platform;
pub mod version;

#[cfg(feature = "native")]
pub mod native;

pub use platform::{Architecture, Distribution, HeaderSet, PlatformError, Selection, Target};
pub use os_release::OsRelease;
pub use version::{FfmpegGeneration, LibraryVersion, classify_ffmpeg_major, parse_probe_value};

#[cfg(feature = "native")]
pub use native::{
    Mpg123, NativeError, ffmpeg_generation, ffmpeg_major_version, libavcodec_version_major,
};
