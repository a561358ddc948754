use houdini_common::ModuleType;

#[derive(Debug, Default)]
pub struct HookLoadOutput {
  pub code: String,
  /// Overrides the module type inferred from the extension of the id.
  pub module_type: Option<ModuleType>,
}
