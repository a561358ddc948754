use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[(name|id|hash|contenthash|chunkhash|ext|extname)(?::(\d+))?(?::\d+)?\]")
    .expect("valid regex")
});

const DEFAULT_HASH_LEN: usize = 8;

#[derive(Debug, Default)]
pub struct FileNameRenderOptions<'me> {
  pub name: Option<&'me str>,
  pub id: Option<&'me str>,
  /// Hash of the whole build, used for `[hash]`.
  pub hash: Option<&'me str>,
  /// Hash of the rendered file, used for `[contenthash]` and `[chunkhash]`.
  pub content_hash: Option<&'me str>,
  /// Extension without the leading dot.
  pub ext: Option<&'me str>,
}

/// An output file name pattern such as `[name]-[contenthash:8].js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

impl FilenameTemplate {
  pub fn new(template: impl Into<String>) -> Self {
    Self { template: template.into() }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn has_content_hash(&self) -> bool {
    PLACEHOLDER_RE
      .captures_iter(&self.template)
      .any(|caps| matches!(&caps[1], "contenthash" | "chunkhash"))
  }

  /// Placeholders without a value in `options` are left untouched.
  pub fn render(&self, options: &FileNameRenderOptions) -> String {
    PLACEHOLDER_RE
      .replace_all(&self.template, |caps: &Captures| {
        let value = match &caps[1] {
          "name" => options.name.map(ToString::to_string),
          "id" => options.id.map(ToString::to_string),
          "hash" => options.hash.map(|hash| truncate_hash(hash, caps.get(2))),
          "contenthash" | "chunkhash" => {
            options.content_hash.map(|hash| truncate_hash(hash, caps.get(2)))
          }
          "ext" => options.ext.map(ToString::to_string),
          "extname" => {
            options.ext.map(|ext| if ext.is_empty() { String::new() } else { format!(".{ext}") })
          }
          _ => None,
        };
        value.unwrap_or_else(|| caps[0].to_string())
      })
      .into_owned()
  }
}

fn truncate_hash(hash: &str, len: Option<regex::Match<'_>>) -> String {
  let len = len.and_then(|len| len.as_str().parse::<usize>().ok()).unwrap_or(DEFAULT_HASH_LEN);
  hash.chars().take(len).collect()
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self::new(template)
  }
}

#[test]
fn test_render_filename_template() {
  let template = FilenameTemplate::new("[name]-[hash].js");
  let rendered = template.render(&FileNameRenderOptions {
    name: Some("main"),
    hash: Some("0123456789abcdef"),
    ..Default::default()
  });
  assert_eq!(rendered, "main-01234567.js");

  let template = FilenameTemplate::new("[id].[contenthash:4].worklet.js");
  let rendered = template.render(&FileNameRenderOptions {
    id: Some("0"),
    content_hash: Some("abcdef"),
    ..Default::default()
  });
  assert_eq!(rendered, "0.abcd.worklet.js");

  let template = FilenameTemplate::new("assets/[name]-[hash:6][extname]");
  let rendered = template.render(&FileNameRenderOptions {
    name: Some("noise"),
    hash: Some("fedcba987"),
    ext: Some("wasm"),
    ..Default::default()
  });
  assert_eq!(rendered, "assets/noise-fedcba.wasm");
}

#[test]
fn test_unknown_placeholders_are_kept() {
  let template = FilenameTemplate::new("[name].[query].js");
  assert_eq!(template.render(&FileNameRenderOptions::default()), "[name].[query].js");
  assert!(!template.has_content_hash());
  assert!(FilenameTemplate::new("[name].[chunkhash:8].js").has_content_hash());
}
