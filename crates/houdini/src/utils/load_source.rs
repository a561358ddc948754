use std::path::Path;

use anyhow::Context;
use houdini_common::{ModuleType, ResolvedId, StrOrBytes};
use houdini_fs::FileSystem;
use houdini_plugin::{HookLoadArgs, PluginDriver};

/// Plugins get the first chance to load a module, the file system is the fallback.
pub async fn load_source(
  plugin_driver: &PluginDriver,
  fs: &dyn FileSystem,
  resolved_id: &ResolvedId,
) -> anyhow::Result<(StrOrBytes, ModuleType)> {
  let guessed = resolved_id.module_type.or_else(|| ModuleType::from_id(&resolved_id.id));

  if let Some(output) = plugin_driver.load(&HookLoadArgs { id: &resolved_id.id }).await? {
    let module_type = output.module_type.or(guessed).unwrap_or(ModuleType::Js);
    return Ok((output.code.into(), module_type));
  }

  if resolved_id.id.is_virtual() {
    anyhow::bail!("No plugin loaded the virtual module {:?}", resolved_id.id.as_ref());
  }

  let path = Path::new(resolved_id.id.as_ref());
  let module_type = guessed.unwrap_or(ModuleType::Js);
  let source = match module_type {
    ModuleType::Wasm => StrOrBytes::Bytes(
      fs.read(path).with_context(|| format!("Failed to read {}", path.display()))?,
    ),
    ModuleType::Empty => StrOrBytes::Str(String::new()),
    ModuleType::Js | ModuleType::Ts | ModuleType::Json => StrOrBytes::Str(
      fs.read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
    ),
  };
  Ok((source, module_type))
}
