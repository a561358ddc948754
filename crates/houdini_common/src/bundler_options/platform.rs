use serde::Deserialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
  /// Represents the browser main thread, where `window` is the global object.
  #[default]
  Browser,
  /// Represents the Node.js environment.
  Node,
  Neutral,
  /// Workers and worklets: an isolated global scope without `window` or `document`.
  Worker,
}

impl Platform {
  pub fn default_global_object(self) -> &'static str {
    match self {
      Self::Browser => "window",
      Self::Node => "global",
      Self::Neutral => "globalThis",
      Self::Worker => "self",
    }
  }
}
