use std::path::Path;

use houdini_common::{ImportKind, ModuleId, ResolvedId};
use houdini_plugin::{HookResolveIdArgs, PluginDriver};
use houdini_resolver::Resolver;

/// Plugins get the first chance to resolve a specifier, `oxc_resolver` is the fallback.
/// Entries and imports of virtual modules resolve from `context`.
pub async fn resolve_id(
  plugin_driver: &PluginDriver,
  resolver: &Resolver,
  context: &Path,
  specifier: &str,
  importer: Option<&ModuleId>,
  kind: ImportKind,
) -> anyhow::Result<ResolvedId> {
  let args = HookResolveIdArgs { importer, specifier, kind };
  if let Some(resolved) = plugin_driver.resolve_id(&args).await? {
    return Ok(resolved);
  }

  let importer_path =
    importer.filter(|importer| !importer.is_virtual()).map(|importer| Path::new(importer.as_ref()));

  resolver
    .resolve(importer_path, Some(context), specifier)
    .map(|ret| ResolvedId::new(ret.path))
    .map_err(|err| match importer {
      Some(importer) => anyhow::anyhow!(
        "Could not resolve {specifier:?} from {:?}: {err}",
        importer.stabilize(resolver.cwd())
      ),
      None => anyhow::anyhow!("Could not resolve entry module {specifier:?}: {err}"),
    })
}
