use houdini_common::ModuleId;

#[derive(Debug)]
pub struct HookLoadArgs<'a> {
  pub id: &'a ModuleId,
}
