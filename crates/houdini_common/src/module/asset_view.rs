/// A module whose content is emitted as a separate file, e.g. `.wasm`.
#[derive(Debug, Clone)]
pub struct AssetView {
  pub source: Box<[u8]>,
}
