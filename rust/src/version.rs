//! FFmpeg version classification.

use std::fmt;

/// First `LIBAVCODEC_VERSION_MAJOR` shipped with FFmpeg 5/6/7.
pub const LIBAVCODEC_MAJOR_V6: i32 = 59;
/// `LIBAVCODEC_VERSION_MAJOR` of FFmpeg 4.x.
pub const LIBAVCODEC_MAJOR_V4: i32 = 58;

/// Map a `LIBAVCODEC_VERSION_MAJOR` value to the simplified FFmpeg major version.
///
/// Returns 6 for libavcodec 59 and newer, 4 for libavcodec 58 and 3 for anything
/// older. Every input maps to exactly one bucket.
pub const fn classify_ffmpeg_major(libavcodec_major: i32) -> i32 {
    if libavcodec_major >= LIBAVCODEC_MAJOR_V6 {
        6
    } else if libavcodec_major >= LIBAVCODEC_MAJOR_V4 {
        4
    } else {
        3
    }
}

/// The API generations callers branch on.
///
/// `V6` is the `AVChannelLayout` API (`ch_layout`), `V4` and older still expose the
/// bitmask `channel_layout` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FfmpegGeneration {
    V3OrOlder,
    V4,
    V6,
}

impl FfmpegGeneration {
    pub const fn from_libavcodec_major(libavcodec_major: i32) -> Self {
        match classify_ffmpeg_major(libavcodec_major) {
            6 => FfmpegGeneration::V6,
            4 => FfmpegGeneration::V4,
            _ => FfmpegGeneration::V3OrOlder,
        }
    }

    pub const fn as_major(self) -> i32 {
        match self {
            FfmpegGeneration::V6 => 6,
            FfmpegGeneration::V4 => 4,
            FfmpegGeneration::V3OrOlder => 3,
        }
    }

    /// Whether the channel-layout API is the `AVChannelLayout` struct.
    pub const fn has_channel_layout_struct(self) -> bool {
        matches!(self, FfmpegGeneration::V6)
    }
}

impl fmt::Display for FfmpegGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfmpegGeneration::V3OrOlder => f.write_str("FFmpeg 3 or older"),
            other => write!(f, "FFmpeg {}", other.as_major()),
        }
    }
}

/// A version in FFmpeg's packed `AV_VERSION_INT` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl LibraryVersion {
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            major: packed >> 16,
            minor: (packed >> 8) & 0xff,
            micro: packed & 0xff,
        }
    }

    pub const fn packed(self) -> u32 {
        (self.major << 16) | ((self.minor & 0xff) << 8) | (self.micro & 0xff)
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// Read the integer a `KEY=<macro>` line expanded to in preprocessor output.
///
/// Whitespace and parentheses around the value are ignored, so `KEY= ( 61 )` reads as 61.
pub fn parse_probe_value(expanded: &str, key: &str) -> Option<i32> {
    expanded.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() != key {
            return None;
        }
        let digits: String = v
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
            .collect();
        digits.parse().ok()
    })
}
