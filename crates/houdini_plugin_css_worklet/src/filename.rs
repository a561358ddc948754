use std::sync::LazyLock;

use regex::Regex;

static EXTENSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\.([a-z]+)$").expect("valid regex"));

static CONTENT_HASH_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[(?:chunkhash|contenthash)(:\d+(?::\d+)?)?\]").expect("valid regex")
});

/// `[name]-[hash].js` becomes `[name]-[hash].worklet.js`.
pub fn worklet_chunk_filenames(chunk_filenames: &str) -> String {
  EXTENSION_RE.replace(chunk_filenames, ".worklet.$1").into_owned()
}

/// The parent references the worklet by filename before the worklet is rendered, so content
/// hashes are replaced with the run hash, keeping any length modifier.
pub fn worklet_entry_filenames(worklet_chunk_filenames: &str) -> String {
  CONTENT_HASH_RE.replace_all(worklet_chunk_filenames, "[hash${1}]").into_owned()
}

#[test]
fn test_worklet_chunk_filenames() {
  assert_eq!(worklet_chunk_filenames("[name].js"), "[name].worklet.js");
  assert_eq!(worklet_chunk_filenames("[name]-[hash].JS"), "[name]-[hash].worklet.JS");
  assert_eq!(worklet_chunk_filenames("chunks/[id].min.mjs"), "chunks/[id].min.worklet.mjs");
  assert_eq!(worklet_chunk_filenames("[name]"), "[name]");
  assert_eq!(worklet_chunk_filenames("[name].js2"), "[name].js2");
}

#[test]
fn test_worklet_entry_filenames() {
  assert_eq!(
    worklet_entry_filenames("[name].[contenthash].worklet.js"),
    "[name].[hash].worklet.js"
  );
  assert_eq!(
    worklet_entry_filenames("[chunkhash:8]/[name].[contenthash:8:4].worklet.js"),
    "[hash:8]/[name].[hash:8:4].worklet.js"
  );
  assert_eq!(worklet_entry_filenames("[name].[hash:6].worklet.js"), "[name].[hash:6].worklet.js");
}
