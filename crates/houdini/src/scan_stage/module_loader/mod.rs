pub mod module_task;
pub mod task_context;

use std::{path::Path, sync::Arc};

use arcstr::ArcStr;
use futures::future::join_all;
use houdini_common::{
  AssetView, EcmaView, EntryPoint, ImportKind, ImportRecordIdx, Module, ModuleId, ModuleIdx,
  ModuleType, ModuleView, Mutation, RawImportRecord, ResolvedId, StrOrBytes,
};
use houdini_error::{BuildError, BuildResult};
use houdini_plugin::ParserOutput;
use houdini_utils::xxhash::xxhash_128;
use itertools::Itertools;
use module_task::{LoadedModule, ModuleTask};
use oxc::span::Span;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use task_context::TaskContext;

use crate::{
  cache::CachedModule,
  scan_stage::ast_scanner::{AstScanner, ScanResult},
  types::{build_cancelled::BuildCancelled, IndexModules},
  utils::{parse_to_ecma_ast::parse_to_ecma_ast, resolve_id::resolve_id},
};

type Wave = Vec<(ModuleIdx, ResolvedId)>;

struct ScannedModule {
  idx: ModuleIdx,
  id: ModuleId,
  stable_id: String,
  module_type: ModuleType,
  view: ModuleView,
}

impl ScannedModule {
  fn raw_import_records(&self) -> &[RawImportRecord] {
    match &self.view {
      ModuleView::Ecma(view) => view.import_records.as_raw_slice(),
      ModuleView::Asset(_) => &[],
    }
  }
}

#[derive(Debug)]
pub struct ModuleLoaderOutput {
  pub modules: IndexModules,
  pub entry_points: Vec<EntryPoint>,
}

/// Builds the module graph breadth-first. The modules of a wave are loaded and their imports
/// resolved concurrently, while parsing runs in discovery order, so a module gets the same index
/// and plugin parser hooks see modules in the same order on every build.
pub struct ModuleLoader<'a> {
  ctx: &'a TaskContext,
  modules: IndexVec<ModuleIdx, Option<Module>>,
  visited: FxHashMap<ModuleId, ModuleIdx>,
}

impl<'a> ModuleLoader<'a> {
  pub fn new(ctx: &'a TaskContext) -> Self {
    Self { ctx, modules: IndexVec::new(), visited: FxHashMap::default() }
  }

  pub async fn fetch_all_modules(
    mut self,
    user_defined_entries: Vec<(Option<ArcStr>, ResolvedId)>,
  ) -> BuildResult<ModuleLoaderOutput> {
    let mut wave = Wave::with_capacity(user_defined_entries.len());
    let entry_points = user_defined_entries
      .into_iter()
      .map(|(name, resolved_id)| EntryPoint { idx: self.try_alloc(resolved_id, &mut wave), name })
      .collect::<Vec<_>>();

    while !wave.is_empty() {
      let loaded = self.load_wave(std::mem::take(&mut wave)).await?;

      let mut errors = vec![];
      let scanned = loaded
        .into_iter()
        .filter_map(|module| {
          self.scan_module(module).map_err(|err| errors.extend(err.into_vec())).ok()
        })
        .collect::<Vec<_>>();
      if !errors.is_empty() {
        return Err(errors.into());
      }

      let resolutions = self.resolve_wave(&scanned).await?;
      for (module, resolved_ids) in scanned.into_iter().zip(resolutions) {
        let (resolved_ids, resolve_errors): (Vec<_>, Vec<_>) =
          resolved_ids.into_iter().partition_result();
        if !resolve_errors.is_empty() {
          errors.extend(resolve_errors);
          continue;
        }
        let import_records = module
          .raw_import_records()
          .iter()
          .cloned()
          .zip(resolved_ids)
          .map(|(raw, resolved_id)| raw.into_resolved(self.try_alloc(resolved_id, &mut wave)))
          .collect();
        let ScannedModule { idx, id, stable_id, module_type, view } = module;
        self.modules[idx] = Some(Module { idx, id, stable_id, module_type, view, import_records });
      }
      if !errors.is_empty() {
        return Err(errors.into());
      }
    }

    let modules = self
      .modules
      .into_iter()
      .collect::<Option<IndexModules>>()
      .ok_or_else(|| anyhow::anyhow!("Module graph is incomplete"))?;
    Ok(ModuleLoaderOutput { modules, entry_points })
  }

  fn try_alloc(&mut self, resolved_id: ResolvedId, wave: &mut Wave) -> ModuleIdx {
    if let Some(idx) = self.visited.get(&resolved_id.id) {
      return *idx;
    }
    let idx = self.modules.push(None);
    self.visited.insert(resolved_id.id.clone(), idx);
    wave.push((idx, resolved_id));
    idx
  }

  async fn load_wave(&self, wave: Wave) -> BuildResult<Vec<LoadedModule>> {
    let tasks =
      wave.into_iter().map(|(idx, resolved_id)| ModuleTask::new(self.ctx, idx, resolved_id).run());
    let results = tokio::select! {
      biased;
      () = self.ctx.cancellation_token.cancelled() => {
        return Err(anyhow::Error::from(BuildCancelled).into());
      }
      results = join_all(tasks) => results,
    };
    let (loaded, errors): (Vec<_>, Vec<_>) = results.into_iter().partition_result();
    if errors.is_empty() { Ok(loaded) } else { Err(errors.into()) }
  }

  async fn resolve_wave(
    &self,
    scanned: &[ScannedModule],
  ) -> BuildResult<Vec<Vec<anyhow::Result<ResolvedId>>>> {
    let TaskContext { options, resolver, plugin_driver, .. } = self.ctx;
    let tasks = scanned.iter().map(|module| {
      join_all(module.raw_import_records().iter().map(|record| {
        resolve_id(
          plugin_driver,
          resolver,
          &options.context,
          &record.specifier,
          Some(&module.id),
          record.kind,
        )
      }))
    });
    tokio::select! {
      biased;
      () = self.ctx.cancellation_token.cancelled() => {
        Err(anyhow::Error::from(BuildCancelled).into())
      }
      results = join_all(tasks) => Ok(results),
    }
  }

  fn scan_module(&self, module: LoadedModule) -> BuildResult<ScannedModule> {
    let LoadedModule { idx, resolved_id, source, module_type } = module;
    let id = resolved_id.id;
    let stable_id = id.stabilize(&self.ctx.options.cwd);
    let view = match source {
      StrOrBytes::Bytes(bytes) => ModuleView::Asset(AssetView { source: bytes.into_boxed_slice() }),
      StrOrBytes::Str(source) => {
        ModuleView::Ecma(self.scan_ecma_module(&id, &stable_id, module_type, source)?)
      }
    };
    Ok(ScannedModule { idx, id, stable_id, module_type, view })
  }

  fn scan_ecma_module(
    &self,
    id: &ModuleId,
    stable_id: &str,
    module_type: ModuleType,
    source: String,
  ) -> BuildResult<Arc<EcmaView>> {
    let source_hash = xxhash_128(source.as_bytes());
    if let Some(cached) = self
      .ctx
      .cache
      .as_ref()
      .and_then(|cache| cache.get(id, source_hash))
      .filter(|cached| cached.module_type == module_type)
    {
      return Ok(cached.view);
    }

    let (ast, scoping) = parse_to_ecma_ast(source.into(), Path::new(id.as_ref()), module_type)
      .map_err(|errors| {
        BuildError::from(
          errors.into_vec().into_iter().map(|err| err.context(stable_id.to_string())).collect_vec(),
        )
      })?;

    let parser_hooks = self.ctx.plugin_driver.parser_hooks(module_type);
    let ScanResult {
      mut import_records,
      mut mutations,
      exports_kind,
      export_bindings,
      star_exports,
      parser_output,
    } = AstScanner::new(id, module_type, &scoping, parser_hooks).scan(ast.program());

    let ParserOutput { constant_dependencies, parsed_variables, warnings, handled_calls } =
      parser_output;
    let cacheable = handled_calls == 0 && warnings.is_empty();

    let diagnostics = self.ctx.plugin_driver.context().diagnostics();
    for warning in warnings {
      diagnostics.warn(anyhow::anyhow!("{stable_id}: {warning:#}"));
    }

    mutations.extend(
      constant_dependencies.into_iter().map(|(span, content)| Mutation::Replace { span, content }),
    );
    let parsed_variables = parsed_variables
      .into_iter()
      .map(|(name, request)| {
        let record = import_records.push(RawImportRecord::new(
          request,
          ImportKind::ParsedVariable,
          Span::default(),
        ));
        (name, record)
      })
      .collect::<Vec<(String, ImportRecordIdx)>>();

    let view = Arc::new(EcmaView {
      source: ast.source().clone(),
      import_records,
      mutations,
      exports_kind,
      export_bindings,
      star_exports,
      parsed_variables,
      cacheable,
    });

    if let Some(cache) = self.ctx.cache.as_ref().filter(|_| cacheable) {
      cache.insert(id.clone(), CachedModule { source_hash, module_type, view: Arc::clone(&view) });
    }
    Ok(view)
  }
}
