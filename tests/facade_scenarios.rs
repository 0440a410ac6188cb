//! Facade-level scenarios from `SPEC_FULL.md` §8 that need a real
//! filesystem (cache directories) rather than the in-process mock used by
//! `prefetcher_properties.rs`.

use std::path::PathBuf;

use remote_image_prefetch::application::{CurrentImage, JumpDirection, RemoteImageList};
use remote_image_prefetch::infrastructure::RemoteImageListConfig;

fn base_config() -> RemoteImageListConfig {
    RemoteImageListConfig {
        www_url: String::new(),
        ..Default::default()
    }
}

/// Scenario 5: no `www_url` configured. `scan()` must fail cleanly, leave
/// the facade in a usable-but-empty state, and never spawn a worker thread.
#[test]
fn scenario_5_missing_url_fails_scan_without_side_effects() {
    let mut list = RemoteImageList::new(base_config());

    assert!(!list.scan());
    assert_eq!(list.current(), CurrentImage::None);
    // Movement verbs are no-ops on a facade that never finished scanning.
    assert!(!list.jump(JumpDirection::NextFile));
    assert!(!list.jump(JumpDirection::PrevFile));
}

/// Scenario 6: `www_cleanup_cache = true` against a cache directory holding
/// a stray file and a sub-directory. The file must be removed and the
/// sub-directory preserved, driven through the facade rather than
/// `Downloader` directly, and this must hold even though the URL is
/// unreachable (cleanup runs on creation, before any fetch is attempted).
#[test]
fn scenario_6_cleanup_runs_on_scan_before_any_fetch_and_preserves_subdirs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stale_0.jpg"), b"old").unwrap();
    std::fs::create_dir(dir.path().join("thumbnails")).unwrap();

    let config = RemoteImageListConfig {
        www_url: "http://example.invalid/never-resolves".into(),
        www_cache: Some(dir.path().to_path_buf()),
        www_cleanup_cache: true,
        www_save_to_file: false,
        www_prefetch_n: 1,
        www_cache_limit: 2,
        ..Default::default()
    };
    let mut list = RemoteImageList::new(config);

    // The ".invalid" TLD never resolves (RFC 2606), so every fetch attempt
    // fails immediately; scan() still blocks for the full first-image
    // timeout before giving up, since `DownloaderError`s are retried rather
    // than surfaced. That wait is incidental to this test - what matters is
    // the cache directory's state, which is settled during
    // `Downloader::create`, long before any fetch attempt.
    list.scan();

    assert!(!dir.path().join("stale_0.jpg").exists());
    assert!(dir.path().join("thumbnails").exists());
}

/// A placeholder configured but never reachable through the ring (no URL)
/// is still reported once `scan()` has at least attempted to load it.
#[test]
fn placeholder_is_reported_when_the_source_never_resolves() {
    let fixture_dir = tempfile::tempdir().unwrap();
    let placeholder_path: PathBuf = fixture_dir.path().join("placeholder.png");
    // A minimal 1x1 PNG, small enough to inline.
    let tiny_png: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0xCF, 0xC0, 0x00, 0x00, 0x00, 0x03, 0x00, 0x01, 0xA3, 0x0A, 0x1F, 0xA4, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];
    std::fs::write(&placeholder_path, tiny_png).unwrap();

    let config = RemoteImageListConfig {
        www_url: String::new(),
        no_image_asset: Some(placeholder_path),
        ..Default::default()
    };
    let mut list = RemoteImageList::new(config);

    // scan() still fails overall (no URL, so Downloader::create rejects
    // it), but the placeholder load runs first and its result survives the
    // early return, so current() still reports it instead of None.
    assert!(!list.scan());
    assert!(matches!(list.current(), CurrentImage::Placeholder(_)));
}
