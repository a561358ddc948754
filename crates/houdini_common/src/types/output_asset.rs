use crate::StrOrBytes;

#[derive(Debug, Clone)]
pub struct OutputAsset {
  /// Relative to the output directory, always using `/`.
  pub filename: String,
  pub content: StrOrBytes,
  /// `true` for rendered chunks, `false` for emitted files such as `.wasm`.
  pub is_chunk: bool,
}

impl OutputAsset {
  pub fn filename(&self) -> &str {
    &self.filename
  }

  pub fn content_as_bytes(&self) -> &[u8] {
    self.content.as_bytes()
  }

  /// The content of a rendered chunk. Binary assets return `None`.
  pub fn code(&self) -> Option<&str> {
    self.content.as_str()
  }
}
