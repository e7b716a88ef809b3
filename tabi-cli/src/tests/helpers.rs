//! Test helpers for writing optimization requests to a scratch workspace.

use camino::{Utf8Path, Utf8PathBuf};
use tabi_core::OptimizationRequest;
use tabi_core::test_support::{request, tokyo_day, weekday};
use tempfile::TempDir;

/// Temporary directory that lives as long as the returned guard.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// The Tokyo sightseeing day on a weekday outside any seasonal event.
pub(super) fn tokyo_request() -> OptimizationRequest {
    request(tokyo_day(), weekday())
}

pub(super) fn write_request(path: &Utf8Path, request: &OptimizationRequest) {
    let payload = serde_json::to_string_pretty(request).expect("serialize request");
    write_utf8(path, payload.as_bytes());
}
