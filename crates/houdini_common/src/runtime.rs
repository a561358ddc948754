/// Names the runtime exposes to module code.
pub struct RuntimeGlobals;

impl RuntimeGlobals {
  pub const REQUIRE: &'static str = "__houdini_require__";
  /// The public path every emitted file url is prefixed with at runtime.
  pub const PUBLIC_PATH: &'static str = "__houdini_require__.p";
  pub const GLOBAL: &'static str = "__houdini_require__.g";
  pub const MAKE_NAMESPACE: &'static str = "__houdini_require__.r";
  pub const DEFINE_GETTERS: &'static str = "__houdini_require__.e";
  pub const INTEROP_DEFAULT: &'static str = "__houdini_require__.d";
  pub const EXPORT_STAR: &'static str = "__houdini_require__.s";
  pub const COMPILE_WASM: &'static str = "__houdini_require__.w";
}
