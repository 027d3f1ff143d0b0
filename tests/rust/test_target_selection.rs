mod test_utils;

use std::env;

use serial_test::serial;
use test_utils::*;

use cmp_media::{Architecture, Distribution, PlatformError, Selection, Target};

#[test]
fn test_no_selection_is_an_error() {
    let err = linux_selection().resolve().unwrap_err();
    assert_eq!(err, PlatformError::NoDistribution);
    let msg = err.to_string();
    assert!(msg.contains("ubuntu-22-04"), "{msg}");
    assert!(msg.contains("manjaro-24"), "{msg}");
}

#[test]
fn test_single_feature_selects_target() {
    let t = with_features(&[Distribution::Ubuntu2404]).resolve().unwrap();
    assert_eq!(t, Target::new(Distribution::Ubuntu2404, Architecture::Amd64));

    let mut s = with_features(&[Distribution::Fedora40]);
    s.target_arch = "aarch64".to_string();
    assert_eq!(
        s.resolve().unwrap(),
        Target::new(Distribution::Fedora40, Architecture::Arm64)
    );
}

#[test]
fn test_target_env_selects_target() {
    let t = with_target_env("manjaro-24").resolve().unwrap();
    assert_eq!(t.distribution, Distribution::Manjaro24);

    let t = with_target_env("CMP_TARGET_UBUNTU_V22_04").resolve().unwrap();
    assert_eq!(t.distribution, Distribution::Ubuntu2204);
}

#[test]
fn test_feature_and_matching_env_agree() {
    let mut s = with_features(&[Distribution::Fedora40]);
    s.target_env = Some("fedora-40".to_string());
    assert_eq!(s.resolve().unwrap().distribution, Distribution::Fedora40);
}

#[test]
fn test_conflicting_selection_is_an_error() {
    let err = with_features(&[Distribution::Ubuntu2204, Distribution::Manjaro24])
        .resolve()
        .unwrap_err();
    assert_eq!(
        err,
        PlatformError::Conflicting(vec![Distribution::Ubuntu2204, Distribution::Manjaro24])
    );
    assert!(err.to_string().contains("ubuntu-22.04, manjaro-24"));

    let mut s = with_features(&[Distribution::Ubuntu2404]);
    s.target_env = Some("fedora-40".to_string());
    assert!(matches!(s.resolve(), Err(PlatformError::Conflicting(_))));
}

#[test]
fn test_unknown_distribution_is_named() {
    let err = with_target_env("debian-12").resolve().unwrap_err();
    assert_eq!(err, PlatformError::UnknownDistribution("debian-12".to_string()));
    assert!(err.to_string().contains("'debian-12'"));
}

#[test]
fn test_unknown_architecture_is_named() {
    let mut s = with_features(&[Distribution::Ubuntu2404]);
    s.target_arch = "riscv64".to_string();
    assert_eq!(
        s.resolve().unwrap_err(),
        PlatformError::UnknownArchitecture("riscv64".to_string())
    );

    let mut s = with_features(&[Distribution::Ubuntu2404]);
    s.platform_env = Some("ppc64le".to_string());
    assert_eq!(
        s.resolve().unwrap_err(),
        PlatformError::UnknownArchitecture("ppc64le".to_string())
    );
}

#[test]
fn test_platform_env_overrides_target_arch() {
    let mut s = with_features(&[Distribution::Ubuntu2204]);
    s.platform_env = Some("CMP_PLATFORM_ARM64".to_string());
    assert_eq!(s.resolve().unwrap().architecture, Architecture::Arm64);
}

#[test]
fn test_non_linux_target_is_rejected() {
    let mut s = with_features(&[Distribution::Ubuntu2204]);
    s.target_os = "macos".to_string();
    assert_eq!(
        s.resolve().unwrap_err(),
        PlatformError::UnsupportedOs("macos".to_string())
    );
}

#[test]
fn test_resolve_is_deterministic() {
    let s = with_features(&[Distribution::Manjaro24]);
    assert_eq!(s.resolve(), s.resolve());
    let s = linux_selection();
    assert_eq!(s.resolve(), s.resolve());
}

#[test]
fn test_identifiers_parse() {
    for d in Distribution::ALL {
        assert_eq!(d.identifier().parse::<Distribution>().unwrap(), d);
        assert_eq!(d.feature().parse::<Distribution>().unwrap(), d);
        assert_eq!(d.legacy_selector().parse::<Distribution>().unwrap(), d);
    }
    assert_eq!(" Ubuntu-24.04 ".parse::<Distribution>().unwrap(), Distribution::Ubuntu2404);
    assert_eq!(
        "cmp_target_fedora_v40".parse::<Distribution>().unwrap(),
        Distribution::Fedora40
    );
    assert_eq!(
        "cmp_platform_arm64".parse::<Architecture>().unwrap(),
        Architecture::Arm64
    );

    for (text, arch) in [
        ("amd64", Architecture::Amd64),
        ("x86_64", Architecture::Amd64),
        ("ARM64", Architecture::Arm64),
        ("aarch64", Architecture::Arm64),
    ] {
        assert_eq!(text.parse::<Architecture>().unwrap(), arch);
    }
}

#[test]
fn test_os_release_matching() {
    assert_eq!(
        Distribution::from_os_release("ubuntu", "22.04"),
        Some(Distribution::Ubuntu2204)
    );
    assert_eq!(
        Distribution::from_os_release("fedora", "40"),
        Some(Distribution::Fedora40)
    );
    assert_eq!(
        Distribution::from_os_release("manjaro", "24.1.2"),
        Some(Distribution::Manjaro24)
    );
    assert_eq!(
        Distribution::from_os_release("manjaro", ""),
        Some(Distribution::Manjaro24)
    );
    assert_eq!(Distribution::from_os_release("ubuntu", "20.04"), None);
    assert_eq!(Distribution::from_os_release("fedora", "41"), None);
}

#[test]
fn test_every_error_message_renders() {
    let cases = [
        (PlatformError::NoDistribution, "CMP_TARGET"),
        (
            PlatformError::Conflicting(Distribution::ALL.to_vec()),
            "--features native,ubuntu-24-04",
        ),
        (
            PlatformError::UnknownDistribution("arch-2024".to_string()),
            "'arch-2024'; expected one of ubuntu-22.04, ubuntu-24.04, fedora-40, manjaro-24",
        ),
        (
            PlatformError::UnknownArchitecture("riscv64".to_string()),
            "'riscv64'",
        ),
        (PlatformError::UnsupportedOs("windows".to_string()), "'windows'"),
    ];
    for (err, expected) in cases {
        let msg = err.to_string();
        assert!(msg.contains(expected), "{msg}");
        assert!(!msg.contains('{'), "{msg}");
    }
}

#[test]
fn test_all_distribution_features_conflict() {
    let err = with_features(&Distribution::ALL).resolve().unwrap_err();
    assert_eq!(err, PlatformError::Conflicting(Distribution::ALL.to_vec()));
    assert!(err.to_string().contains("--all-features"));
}

const ENV_VARS: [&str; 5] = [
    "CMP_TARGET",
    "CMP_PLATFORM",
    "CARGO_CFG_TARGET_OS",
    "CARGO_CFG_TARGET_ARCH",
    "CARGO_FEATURE_MANJARO_24",
];

fn clear_env() {
    for name in ENV_VARS {
        unsafe { env::remove_var(name) };
    }
}

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    clear_env();
    unsafe {
        env::set_var("CMP_TARGET", "fedora-40");
        env::set_var("CMP_PLATFORM", "arm64");
        env::set_var("CARGO_CFG_TARGET_OS", "linux");
    }

    let selection = Selection::from_env();
    assert_eq!(selection.target_env.as_deref(), Some("fedora-40"));
    assert_eq!(selection.platform_env.as_deref(), Some("arm64"));
    assert!(selection.features.is_empty());
    assert_eq!(
        selection.resolve().unwrap(),
        Target::new(Distribution::Fedora40, Architecture::Arm64)
    );

    clear_env();
}

#[test]
#[serial]
fn test_from_env_sees_feature_variables() {
    clear_env();
    unsafe {
        env::set_var("CARGO_FEATURE_MANJARO_24", "1");
        env::set_var("CARGO_CFG_TARGET_OS", "linux");
        env::set_var("CARGO_CFG_TARGET_ARCH", "x86_64");
        env::set_var("CMP_TARGET", "ubuntu-22.04");
    }

    let selection = Selection::from_env();
    assert_eq!(selection.features, vec![Distribution::Manjaro24]);
    assert_eq!(
        selection.resolve().unwrap_err(),
        PlatformError::Conflicting(vec![Distribution::Ubuntu2204, Distribution::Manjaro24])
    );

    clear_env();
}

#[test]
#[serial]
fn test_from_env_ignores_blank_values() {
    clear_env();
    unsafe {
        env::set_var("CMP_TARGET", "   ");
        env::set_var("CARGO_CFG_TARGET_OS", "linux");
    }

    let selection = Selection::from_env();
    assert_eq!(selection.target_env, None);
    assert_eq!(selection.resolve().unwrap_err(), PlatformError::NoDistribution);

    clear_env();
}
