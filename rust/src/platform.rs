//! Supported build targets and the native header locations for each of them.
//!
//! This file is compiled twice: as `cmp_media::platform` and, through a `#[path]`
//! include, inside the build script. It must only depend on `std` and `thiserror`.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// FFmpeg headers the glue unit includes, relative to the FFmpeg include dir.
pub const FFMPEG_HEADERS: [&str; 5] = [
    "libavformat/avformat.h",
    "libavcodec/avcodec.h",
    "libswresample/swresample.h",
    "libavutil/opt.h",
    "libavutil/dict.h",
];

/// mpg123 headers, relative to the mpg123 include dir.
pub const MPG123_HEADERS: [&str; 2] = ["mpg123.h", "fmt123.h"];

/// Native libraries linked when the glue is built.
pub const LINK_LIBRARIES: [&str; 5] = ["avformat", "avcodec", "swresample", "avutil", "mpg123"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error(
        "no target distribution selected; enable one of the features {features} or set CMP_TARGET to one of {expected}",
        features = Distribution::feature_list(),
        expected = Distribution::identifier_list()
    )]
    NoDistribution,
    #[error(
        "conflicting target distributions selected: {selected}; enable exactly one, e.g. `--features native,{hint}` (not `--all-features`)",
        selected = join_display(.0),
        hint = Distribution::Ubuntu2404.feature()
    )]
    Conflicting(Vec<Distribution>),
    #[error(
        "unrecognized target distribution '{0}'; expected one of {expected}",
        expected = Distribution::identifier_list()
    )]
    UnknownDistribution(String),
    #[error("unrecognized target architecture '{0}'; expected amd64 (x86_64) or arm64 (aarch64)")]
    UnknownArchitecture(String),
    #[error("unsupported target operating system '{0}'; only linux targets have a header table")]
    UnsupportedOs(String),
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A supported Linux distribution release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Distribution {
    Ubuntu2204,
    Ubuntu2404,
    Fedora40,
    Manjaro24,
}

impl Distribution {
    pub const ALL: [Distribution; 4] = [
        Distribution::Ubuntu2204,
        Distribution::Ubuntu2404,
        Distribution::Fedora40,
        Distribution::Manjaro24,
    ];

    /// Canonical identifier, as accepted by `CMP_TARGET`.
    pub fn identifier(self) -> &'static str {
        match self {
            Distribution::Ubuntu2204 => "ubuntu-22.04",
            Distribution::Ubuntu2404 => "ubuntu-24.04",
            Distribution::Fedora40 => "fedora-40",
            Distribution::Manjaro24 => "manjaro-24",
        }
    }

    /// Name of the cargo feature that selects this distribution.
    pub fn feature(self) -> &'static str {
        match self {
            Distribution::Ubuntu2204 => "ubuntu-22-04",
            Distribution::Ubuntu2404 => "ubuntu-24-04",
            Distribution::Fedora40 => "fedora-40",
            Distribution::Manjaro24 => "manjaro-24",
        }
    }

    /// Environment variable cargo sets for the build script when the feature is on.
    pub fn feature_env(self) -> String {
        format!(
            "CARGO_FEATURE_{}",
            self.feature().to_ascii_uppercase().replace('-', "_")
        )
    }

    /// The preprocessor selector the old header glue was driven by.
    pub fn legacy_selector(self) -> &'static str {
        match self {
            Distribution::Ubuntu2204 => "CMP_TARGET_UBUNTU_V22_04",
            Distribution::Ubuntu2404 => "CMP_TARGET_UBUNTU_V24_04",
            Distribution::Fedora40 => "CMP_TARGET_FEDORA_V40",
            Distribution::Manjaro24 => "CMP_TARGET_MANJARO_V24",
        }
    }

    /// Match an `/etc/os-release` `ID`/`VERSION_ID` pair.
    pub fn from_os_release(id: &str, version_id: &str) -> Option<Distribution> {
        let major = version_id.split('.').next().unwrap_or_default();
        match (id, version_id, major) {
            ("ubuntu", "22.04", _) => Some(Distribution::Ubuntu2204),
            ("ubuntu", "24.04", _) => Some(Distribution::Ubuntu2404),
            ("fedora", _, "40") => Some(Distribution::Fedora40),
            // rolling release; VERSION_ID is usually absent
            ("manjaro", _, _) => Some(Distribution::Manjaro24),
            _ => None,
        }
    }

    fn identifier_list() -> String {
        join_display(&Distribution::ALL.map(Distribution::identifier))
    }

    fn feature_list() -> String {
        join_display(&Distribution::ALL.map(Distribution::feature))
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Distribution {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Distribution::ALL
            .into_iter()
            .find(|d| {
                needle.eq_ignore_ascii_case(d.identifier())
                    || needle.eq_ignore_ascii_case(d.feature())
                    || needle.eq_ignore_ascii_case(d.legacy_selector())
            })
            .ok_or_else(|| PlatformError::UnknownDistribution(needle.to_string()))
    }
}

/// CPU architecture of the build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Architecture {
    Amd64,
    Arm64,
}

impl Architecture {
    pub const ALL: [Architecture; 2] = [Architecture::Amd64, Architecture::Arm64];

    /// Map a `CARGO_CFG_TARGET_ARCH` value.
    pub fn from_target_arch(arch: &str) -> Result<Architecture, PlatformError> {
        match arch {
            "x86_64" => Ok(Architecture::Amd64),
            "aarch64" => Ok(Architecture::Arm64),
            other => Err(PlatformError::UnknownArchitecture(other.to_string())),
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            Architecture::Amd64 => "amd64",
            Architecture::Arm64 => "arm64",
        }
    }

    /// Debian multiarch tuple used under `/usr/include` and `/usr/lib`.
    pub fn multiarch_tuple(self) -> &'static str {
        match self {
            Architecture::Amd64 => "x86_64-linux-gnu",
            Architecture::Arm64 => "aarch64-linux-gnu",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Architecture {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "cmp_platform_amd64" => Ok(Architecture::Amd64),
            "arm64" | "aarch64" | "cmp_platform_arm64" => Ok(Architecture::Arm64),
            _ => Err(PlatformError::UnknownArchitecture(s.trim().to_string())),
        }
    }
}

/// A resolved (distribution, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub distribution: Distribution,
    pub architecture: Architecture,
}

impl Target {
    pub fn new(distribution: Distribution, architecture: Architecture) -> Self {
        Self {
            distribution,
            architecture,
        }
    }

    /// Every supported target, in table order.
    pub fn all() -> impl Iterator<Item = Target> {
        Distribution::ALL.into_iter().flat_map(|distribution| {
            Architecture::ALL
                .into_iter()
                .map(move |architecture| Target::new(distribution, architecture))
        })
    }

    /// Look up the header locations for this target.
    pub fn headers(&self) -> HeaderSet {
        let multiarch = |root: &str| Path::new(root).join(self.architecture.multiarch_tuple());

        match self.distribution {
            // mpg123 is not multiarch-split on 22.04
            Distribution::Ubuntu2204 => HeaderSet {
                ffmpeg_include_dir: multiarch("/usr/include"),
                mpg123_include_dir: PathBuf::from("/usr/include"),
                library_dir: multiarch("/usr/lib"),
            },
            Distribution::Ubuntu2404 => HeaderSet {
                ffmpeg_include_dir: multiarch("/usr/include"),
                mpg123_include_dir: multiarch("/usr/include"),
                library_dir: multiarch("/usr/lib"),
            },
            Distribution::Fedora40 => HeaderSet {
                ffmpeg_include_dir: PathBuf::from("/usr/include/ffmpeg"),
                mpg123_include_dir: PathBuf::from("/usr/include"),
                library_dir: PathBuf::from("/usr/lib64"),
            },
            Distribution::Manjaro24 => HeaderSet {
                ffmpeg_include_dir: PathBuf::from("/usr/include"),
                mpg123_include_dir: PathBuf::from("/usr/include"),
                library_dir: PathBuf::from("/usr/lib"),
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.distribution, self.architecture)
    }
}

/// Header search locations for one target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderSet {
    pub ffmpeg_include_dir: PathBuf,
    pub mpg123_include_dir: PathBuf,
    pub library_dir: PathBuf,
}

impl HeaderSet {
    /// Absolute paths of the FFmpeg headers, in include order.
    pub fn ffmpeg_headers(&self) -> Vec<PathBuf> {
        FFMPEG_HEADERS
            .iter()
            .map(|h| self.ffmpeg_include_dir.join(h))
            .collect()
    }

    /// Absolute paths of the mpg123 headers, in include order.
    pub fn mpg123_headers(&self) -> Vec<PathBuf> {
        MPG123_HEADERS
            .iter()
            .map(|h| self.mpg123_include_dir.join(h))
            .collect()
    }

    pub fn all_headers(&self) -> Vec<PathBuf> {
        let mut headers = self.ffmpeg_headers();
        headers.extend(self.mpg123_headers());
        headers
    }

    /// Headers of this set that are not regular files, in include order.
    pub fn missing_headers(&self) -> Vec<PathBuf> {
        self.all_headers()
            .into_iter()
            .filter(|h| !h.is_file())
            .collect()
    }

    /// Distinct include directories, FFmpeg first.
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.ffmpeg_include_dir.clone()];
        if self.mpg123_include_dir != self.ffmpeg_include_dir {
            dirs.push(self.mpg123_include_dir.clone());
        }
        dirs
    }

    /// Re-root every path under `sysroot`.
    pub fn with_sysroot(&self, sysroot: &Path) -> HeaderSet {
        let reroot = |p: &Path| sysroot.join(p.strip_prefix("/").unwrap_or(p));
        HeaderSet {
            ffmpeg_include_dir: reroot(&self.ffmpeg_include_dir),
            mpg123_include_dir: reroot(&self.mpg123_include_dir),
            library_dir: reroot(&self.library_dir),
        }
    }
}

/// Raw inputs the build script resolves a [`Target`] from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Distributions whose cargo feature is enabled.
    pub features: Vec<Distribution>,
    /// Value of `CMP_TARGET`.
    pub target_env: Option<String>,
    /// Value of `CMP_PLATFORM`.
    pub platform_env: Option<String>,
    /// Value of `CARGO_CFG_TARGET_ARCH`.
    pub target_arch: String,
    /// Value of `CARGO_CFG_TARGET_OS`.
    pub target_os: String,
}

impl Selection {
    /// Read the selection from the build-script environment.
    pub fn from_env() -> Selection {
        let non_empty = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let features = Distribution::ALL
            .into_iter()
            .filter(|d| std::env::var_os(d.feature_env()).is_some())
            .collect();
        Selection {
            features,
            target_env: non_empty("CMP_TARGET"),
            platform_env: non_empty("CMP_PLATFORM"),
            target_arch: non_empty("CARGO_CFG_TARGET_ARCH")
                .unwrap_or_else(|| std::env::consts::ARCH.to_string()),
            target_os: non_empty("CARGO_CFG_TARGET_OS")
                .unwrap_or_else(|| std::env::consts::OS.to_string()),
        }
    }

    /// Resolve to exactly one target or fail.
    pub fn resolve(&self) -> Result<Target, PlatformError> {
        if self.target_os != "linux" {
            return Err(PlatformError::UnsupportedOs(self.target_os.clone()));
        }

        let mut selected = self.features.clone();
        if let Some(name) = &self.target_env {
            selected.push(name.parse()?);
        }
        selected.sort();
        selected.dedup();

        let distribution = match selected.as_slice() {
            [] => return Err(PlatformError::NoDistribution),
            [only] => *only,
            _ => return Err(PlatformError::Conflicting(selected)),
        };

        let architecture = match &self.platform_env {
            Some(name) => name.parse()?,
            None => Architecture::from_target_arch(&self.target_arch)?,
        };

        Ok(Target::new(distribution, architecture))
    }
}
