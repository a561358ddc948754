use serde::Deserialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WasmLoading {
  /// `.wasm` modules evaluate to `WebAssembly.compileStreaming(fetch(url))`.
  #[default]
  Fetch,
  /// `.wasm` modules evaluate to their public url.
  None,
}
