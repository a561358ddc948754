//! Bundles CSS Houdini worklets.
//!
//! `CSS.paintWorklet.addModule("./paint.js")` (and the `animationWorklet` and `layoutWorklet`
//! variants) is rewritten to reference the public url of `./paint.js` built as a separate bundle
//! by a child compiler.

mod add_module_hook;
mod error;
mod filename;
mod options;
mod request;

use std::{
  path::Path,
  sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
  },
};

use async_trait::async_trait;
use houdini_common::{
  InputItem, ModuleId, ModuleType, Platform, ResolvedId, RuntimeGlobals, WasmLoading,
};
use houdini_plugin::{
  ChildCompilerOptions, HookLoadArgs, HookLoadOutput, HookLoadReturn, HookNoopReturn,
  HookResolveIdArgs, HookResolveIdReturn, ParserHooks, Plugin, PluginContext, SharedPlugin,
};
use houdini_utils::{concat_string, ecmascript::to_js_string_literal};
use sugar_path::SugarPath;

use crate::{
  add_module_hook::AddModuleHook,
  filename::{worklet_chunk_filenames, worklet_entry_filenames},
  request::{LoaderQuery, WorkletQuery},
};
pub use crate::{
  error::WorkletError,
  options::{CssWorkletPluginOptions, ForwardedPlugin},
};

/// Prefix of the warnings of the plugin, and first part of the cache namespace of worklet builds.
pub const CSS_WORKLET_PLUGIN_NAME: &str = "css-worklet-plugin";

const WORKLET_TYPES: [&str; 3] = ["paintWorklet", "animationWorklet", "layoutWorklet"];

#[derive(Debug, Default)]
pub struct CssWorkletPlugin {
  options: CssWorkletPluginOptions,
  next_worklet_id: Arc<AtomicU32>,
}

impl CssWorkletPlugin {
  pub fn new(options: CssWorkletPluginOptions) -> Self {
    Self { options, next_worklet_id: Arc::default() }
  }

  pub fn options(&self) -> &CssWorkletPluginOptions {
    &self.options
  }

  fn forwarded_plugins(&self, ctx: &PluginContext) -> Vec<SharedPlugin> {
    self
      .options
      .plugins
      .iter()
      .filter_map(|plugin| match plugin {
        ForwardedPlugin::Instance(plugin) => Some(Arc::clone(plugin)),
        ForwardedPlugin::Named(name) => {
          let found = ctx.find_plugin_by_name(name).map(Arc::clone);
          if found.is_none() {
            let message =
              format!("Warning ({CSS_WORKLET_PLUGIN_NAME}): Plugin {name:?} is not found.");
            ctx.diagnostics().warn(anyhow::Error::msg(message));
          }
          found
        }
      })
      .collect()
  }

  /// Builds `request` as its own bundle and returns the filename of its chunk.
  async fn compile_worklet(
    &self,
    ctx: &PluginContext,
    query: WorkletQuery,
    request: &str,
  ) -> Result<String, WorkletError> {
    let options = ctx.options();
    if self.options.global_object.is_none() && options.global_object == "window" {
      ctx.diagnostics().warn_once("css-worklet-plugin:global-object", || {
        anyhow::anyhow!(
          "Warning ({CSS_WORKLET_PLUGIN_NAME}): global_object is set to \"window\". \
           It must be set to \"self\" to support HMR in Worklets."
        )
      });
    }

    let chunk_filenames = worklet_chunk_filenames(&options.chunk_filenames);
    let cancellation_token = ctx.cancellation_token().child_token();
    let child_options = ChildCompilerOptions {
      name: CSS_WORKLET_PLUGIN_NAME.to_string(),
      context: options.cwd.join(&query.context),
      entry: InputItem::new(query.name, request),
      entry_filenames: worklet_entry_filenames(&chunk_filenames),
      chunk_filenames,
      global_object: self.options.global_object.clone().unwrap_or_else(|| "self".to_string()),
      platform: Platform::Worker,
      wasm_loading: WasmLoading::Fetch,
      plugins: self.forwarded_plugins(ctx),
      cache_namespace: Some(concat_string!("subcache ", CSS_WORKLET_PLUGIN_NAME, " ", request)),
      cancellation_token: cancellation_token.clone(),
    };

    let mut compilation = match ctx.run_child_compiler(child_options).await {
      Ok(compilation) => compilation,
      Err(_) if cancellation_token.is_cancelled() => {
        return Err(WorkletError::Cancelled { request: request.to_string() });
      }
      Err(error) => {
        return Err(WorkletError::ChildCompilation { request: request.to_string(), error });
      }
    };
    if !compilation.errors.is_empty() {
      let error = compilation.errors.swap_remove(0);
      return Err(WorkletError::ChildCompilation { request: request.to_string(), error });
    }

    compilation
      .first_file()
      .map(ToString::to_string)
      .ok_or_else(|| WorkletError::NoEntry { request: request.to_string() })
  }
}

#[async_trait]
impl Plugin for CssWorkletPlugin {
  async fn build_start(&self, _ctx: &PluginContext) -> HookNoopReturn {
    self.next_worklet_id.store(0, Ordering::Relaxed);
    Ok(())
  }

  fn register_parser_hooks(
    &self,
    _ctx: &PluginContext,
    module_type: ModuleType,
    hooks: &mut ParserHooks,
  ) {
    if !matches!(module_type, ModuleType::Js | ModuleType::Ts) {
      return;
    }
    let hook = Arc::new(AddModuleHook::new(Arc::clone(&self.next_worklet_id)));
    for worklet in WORKLET_TYPES {
      let selector = concat_string!("CSS.", worklet);
      hooks.tap_call_any_member(selector, Arc::<AddModuleHook>::clone(&hook));
    }
  }

  async fn resolve_id(
    &self,
    ctx: &PluginContext,
    args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn {
    if !request::is_loader_request(args.specifier) {
      return Ok(None);
    }
    let (LoaderQuery { name }, request) = request::decode_loader_request(args.specifier)
      .ok_or_else(|| WorkletError::InvalidRequest { id: args.specifier.to_string() })?;

    let options = ctx.options();
    let importer_dir = args
      .importer
      .filter(|importer| !importer.is_virtual())
      .and_then(|importer| Path::new(importer.as_ref()).parent())
      .unwrap_or(&options.context);
    let context = importer_dir.relative(&options.cwd).to_slash_lossy().into_owned();

    let id = request::encode_worklet_id(&WorkletQuery { name, context }, request)?;
    Ok(Some(ResolvedId { id: ModuleId::new(id), module_type: Some(ModuleType::Js) }))
  }

  async fn load(&self, ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    if !request::is_worklet_id(args.id) {
      return Ok(None);
    }
    let (query, request) = request::decode_worklet_id(args.id)
      .ok_or_else(|| WorkletError::InvalidRequest { id: args.id.to_string() })?;

    let file = self.compile_worklet(ctx, query, request).await?;
    tracing::debug!("Compiled worklet {request:?} to {file:?}");

    Ok(Some(HookLoadOutput {
      code: concat_string!(
        "module.exports = ",
        RuntimeGlobals::PUBLIC_PATH,
        " + ",
        to_js_string_literal(&file),
        ";"
      ),
      module_type: Some(ModuleType::Js),
    }))
  }
}

#[cfg(test)]
mod tests {
  use std::{
    path::PathBuf,
    sync::{Mutex, PoisonError},
  };

  use houdini_common::{ImportKind, NormalizedBundlerOptions};
  use houdini_plugin::{ChildCompilation, ChildCompilerRunner, ChildEntry, Diagnostics};
  use tokio_util::sync::CancellationToken;

  use super::*;

  #[derive(Debug)]
  struct CountPlugin;

  impl Plugin for CountPlugin {}

  /// Pretends to build the worklet and emits `files` for it.
  #[derive(Default)]
  struct StubChildCompiler {
    files: Vec<String>,
    calls: Mutex<Vec<ChildCompilerOptions>>,
  }

  impl StubChildCompiler {
    fn calls(&self) -> Vec<ChildCompilerOptions> {
      self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
  }

  #[async_trait]
  impl ChildCompilerRunner for StubChildCompiler {
    async fn run_as_child(
      &self,
      options: ChildCompilerOptions,
    ) -> anyhow::Result<ChildCompilation> {
      let name = options.entry.name.clone();
      self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(options);
      Ok(ChildCompilation {
        entries: vec![ChildEntry { name, files: self.files.clone() }],
        errors: vec![],
      })
    }
  }

  fn parent_options() -> NormalizedBundlerOptions {
    NormalizedBundlerOptions {
      input: vec![InputItem::new("main", "./src/main.js")],
      cwd: PathBuf::from("/project"),
      context: PathBuf::from("/project"),
      platform: Platform::Browser,
      entry_filenames: "[name].js".to_string(),
      chunk_filenames: "[name]-[contenthash:8].js".to_string(),
      asset_filenames: "assets/[name]-[hash][extname]".to_string(),
      dir: "dist".to_string(),
      public_path: "/static/".to_string(),
      global_object: "window".to_string(),
      wasm_loading: WasmLoading::Fetch,
    }
  }

  fn plugin_context(
    plugins: Vec<SharedPlugin>,
    child_compiler: Arc<StubChildCompiler>,
  ) -> PluginContext {
    PluginContext::new(
      Arc::new(parent_options()),
      plugins,
      Arc::new(Diagnostics::default()),
      child_compiler,
      CancellationToken::new(),
    )
  }

  fn worklet_id(name: &str, request: &str) -> ModuleId {
    let query = WorkletQuery { name: name.to_string(), context: "src".to_string() };
    ModuleId::new(request::encode_worklet_id(&query, request).unwrap())
  }

  #[tokio::test]
  async fn resolves_loader_requests_to_virtual_modules() {
    let plugin = CssWorkletPlugin::default();
    let ctx = plugin_context(vec![], Arc::default());
    let importer = ModuleId::new("/project/src/main.js");

    let resolved = plugin
      .resolve_id(
        &ctx,
        &HookResolveIdArgs {
          importer: Some(&importer),
          specifier: r#"css-worklet-loader?{"name":"0"}!./paint.js"#,
          kind: ImportKind::ParsedVariable,
        },
      )
      .await
      .unwrap()
      .unwrap();
    assert_eq!(resolved.id, worklet_id("0", "./paint.js"));
    assert_eq!(resolved.module_type, Some(ModuleType::Js));

    let ignored = plugin
      .resolve_id(
        &ctx,
        &HookResolveIdArgs {
          importer: Some(&importer),
          specifier: "./paint.js",
          kind: ImportKind::Import,
        },
      )
      .await
      .unwrap();
    assert!(ignored.is_none());
  }

  #[tokio::test]
  async fn loads_worklet_url_from_child_compiler() {
    let plugin = CssWorkletPlugin::default();
    let child_compiler = Arc::new(StubChildCompiler {
      files: vec!["0-1a2b3c4d.worklet.js".to_string(), "assets/a.wasm".to_string()],
      ..Default::default()
    });
    let ctx = plugin_context(vec![], Arc::clone(&child_compiler));

    let output = plugin
      .load(&ctx, &HookLoadArgs { id: &worklet_id("0", "./paint.js") })
      .await
      .unwrap()
      .unwrap();
    assert_eq!(output.code, r#"module.exports = __houdini_require__.p + "0-1a2b3c4d.worklet.js";"#);

    let calls = child_compiler.calls();
    let [options] = calls.as_slice() else { panic!("expected one child compilation") };
    assert_eq!(options.name, CSS_WORKLET_PLUGIN_NAME);
    assert_eq!(options.context, PathBuf::from("/project/src"));
    assert_eq!(options.entry.name.as_deref(), Some("0"));
    assert_eq!(options.entry.import, "./paint.js");
    assert_eq!(options.chunk_filenames, "[name]-[contenthash:8].worklet.js");
    assert_eq!(options.entry_filenames, "[name]-[hash:8].worklet.js");
    assert_eq!(options.global_object, "self");
    assert_eq!(options.platform, Platform::Worker);
    assert_eq!(options.wasm_loading, WasmLoading::Fetch);
    assert!(options.plugins.is_empty());
    assert_eq!(options.cache_namespace.as_deref(), Some("subcache css-worklet-plugin ./paint.js"));
  }

  #[tokio::test]
  async fn warns_about_window_global_object_once() {
    let plugin = CssWorkletPlugin::default();
    let child_compiler =
      Arc::new(StubChildCompiler { files: vec!["0.worklet.js".to_string()], ..Default::default() });
    let ctx = plugin_context(vec![], child_compiler);

    for name in ["0", "1"] {
      plugin.load(&ctx, &HookLoadArgs { id: &worklet_id(name, "./paint.js") }).await.unwrap();
    }
    let warnings = ctx.diagnostics().take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains("It must be set to \"self\""));

    let plugin = CssWorkletPlugin::new(CssWorkletPluginOptions {
      global_object: Some("globalThis".to_string()),
      ..Default::default()
    });
    let child_compiler =
      Arc::new(StubChildCompiler { files: vec!["0.worklet.js".to_string()], ..Default::default() });
    let ctx = plugin_context(vec![], Arc::clone(&child_compiler));
    plugin.load(&ctx, &HookLoadArgs { id: &worklet_id("0", "./paint.js") }).await.unwrap();
    assert!(ctx.diagnostics().is_empty());
    assert_eq!(child_compiler.calls()[0].global_object, "globalThis");
  }

  #[tokio::test]
  async fn forwards_plugins_by_instance_and_name() {
    let count: SharedPlugin = Arc::new(CountPlugin);
    let plugin = CssWorkletPlugin::new(CssWorkletPluginOptions {
      global_object: Some("self".to_string()),
      plugins: vec![
        ForwardedPlugin::from(Arc::clone(&count)),
        ForwardedPlugin::from("CountPlugin"),
        ForwardedPlugin::from("MissingPlugin"),
      ],
    });
    let child_compiler =
      Arc::new(StubChildCompiler { files: vec!["0.worklet.js".to_string()], ..Default::default() });
    let ctx = plugin_context(vec![Arc::clone(&count)], Arc::clone(&child_compiler));

    plugin.load(&ctx, &HookLoadArgs { id: &worklet_id("0", "./paint.js") }).await.unwrap();

    let forwarded = &child_compiler.calls()[0].plugins;
    assert_eq!(forwarded.len(), 2);
    assert!(forwarded.iter().all(|plugin| Arc::ptr_eq(plugin, &count)));
    let warnings = ctx.diagnostics().take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains(r#"Plugin "MissingPlugin" is not found."#));
  }

  #[tokio::test]
  async fn fails_without_emitted_files() {
    let plugin = CssWorkletPlugin::default();
    let ctx = plugin_context(vec![], Arc::default());

    let err = plugin
      .load(&ctx, &HookLoadArgs { id: &worklet_id("0", "./paint.js") })
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "CssWorkletPlugin: no entry for ./paint.js");
  }

  #[tokio::test]
  async fn ignores_other_modules() {
    let plugin = CssWorkletPlugin::default();
    let ctx = plugin_context(vec![], Arc::default());
    let id = ModuleId::new("/project/src/paint.js");
    let output = plugin.load(&ctx, &HookLoadArgs { id: &id }).await.unwrap();
    assert!(output.is_none());
  }
}
