use std::fs;
use std::path::Path;

use cmp_media::{Architecture, Distribution, OsRelease, Target, parse_probe_value};

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "/* header */\n").unwrap();
}

#[test]
fn test_missing_headers_in_partial_sysroot() {
    let sysroot = tempfile::tempdir().unwrap();
    let headers = Target::new(Distribution::Fedora40, Architecture::Amd64)
        .headers()
        .with_sysroot(sysroot.path());

    // FFmpeg installed, mpg123 development package missing
    for header in headers.ffmpeg_headers() {
        touch(&header);
    }

    assert_eq!(headers.missing_headers(), headers.mpg123_headers());
    assert_eq!(
        headers.missing_headers()[0],
        sysroot.path().join("usr/include/mpg123.h")
    );

    for header in headers.mpg123_headers() {
        touch(&header);
    }
    assert!(headers.missing_headers().is_empty());
}

#[test]
fn test_missing_headers_lists_every_path_in_empty_sysroot() {
    let sysroot = tempfile::tempdir().unwrap();
    let headers = Target::new(Distribution::Ubuntu2404, Architecture::Arm64)
        .headers()
        .with_sysroot(sysroot.path());
    assert_eq!(headers.missing_headers(), headers.all_headers());
    assert_eq!(headers.missing_headers().len(), 7);
}

#[test]
fn test_directory_in_place_of_header_counts_as_missing() {
    let sysroot = tempfile::tempdir().unwrap();
    let headers = Target::new(Distribution::Manjaro24, Architecture::Amd64)
        .headers()
        .with_sysroot(sysroot.path());
    fs::create_dir_all(headers.mpg123_include_dir.join("fmt123.h")).unwrap();
    assert!(
        headers
            .missing_headers()
            .contains(&headers.mpg123_include_dir.join("fmt123.h"))
    );
}

#[test]
fn test_parse_probe_value_plain_and_parenthesised() {
    let expanded = "# 1 \"version_probe.c\"\n\
                    CMP_PROBE_LIBAVCODEC_VERSION_MAJOR=61\n\
                    CMP_PROBE_MPG123_API_VERSION= ( 48 )\n";
    assert_eq!(
        parse_probe_value(expanded, "CMP_PROBE_LIBAVCODEC_VERSION_MAJOR"),
        Some(61)
    );
    assert_eq!(
        parse_probe_value(expanded, "CMP_PROBE_MPG123_API_VERSION"),
        Some(48)
    );
    assert_eq!(parse_probe_value("KEY=61", "KEY"), Some(61));
    assert_eq!(parse_probe_value("KEY= ( 61 )", "KEY"), Some(61));
}

#[test]
fn test_parse_probe_value_rejects_unexpanded_macros() {
    let expanded = "CMP_PROBE_LIBAVCODEC_VERSION_MAJOR=LIBAVCODEC_VERSION_MAJOR\n";
    assert_eq!(
        parse_probe_value(expanded, "CMP_PROBE_LIBAVCODEC_VERSION_MAJOR"),
        None
    );
    assert_eq!(parse_probe_value("OTHER=61", "KEY"), None);
    assert_eq!(parse_probe_value("", "KEY"), None);
}

#[test]
fn test_os_release_parsing() {
    let jammy = OsRelease::parse(
        "PRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\n\
         NAME=\"Ubuntu\"\n\
         VERSION_ID=\"22.04\"\n\
         ID=ubuntu\n\
         ID_LIKE=debian\n",
    );
    assert_eq!(jammy.id, "ubuntu");
    assert_eq!(jammy.version_id, "22.04");
    assert_eq!(jammy.pretty_name.as_deref(), Some("Ubuntu 22.04.4 LTS"));
    assert_eq!(jammy.distribution(), Some(Distribution::Ubuntu2204));

    let fedora = OsRelease::parse("# comment\nID=fedora\nVERSION_ID=40\n");
    assert_eq!(fedora.distribution(), Some(Distribution::Fedora40));
}

#[test]
fn test_os_release_manjaro_without_version_id() {
    let manjaro = OsRelease::parse(
        "NAME=\"Manjaro Linux\"\n\
         PRETTY_NAME=\"Manjaro Linux\"\n\
         ID=manjaro\n\
         ID_LIKE=arch\n",
    );
    assert_eq!(manjaro.version_id, "");
    assert_eq!(manjaro.distribution(), Some(Distribution::Manjaro24));
}

#[test]
fn test_os_release_unknown_host() {
    let debian = OsRelease::parse("ID=debian\nVERSION_ID='12'\n");
    assert_eq!(debian.version_id, "12");
    assert_eq!(debian.distribution(), None);
}
