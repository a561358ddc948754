mod render_chunk;
mod render_module;

use std::{ffi::OsStr, path::Path};

use houdini_common::{
  FileNameRenderOptions, FilenameTemplate, ModuleIdx, ModuleView, NormalizedBundlerOptions,
  OutputAsset,
};
use houdini_error::BuildResult;
use houdini_utils::{
  path_ext::PathExt,
  rayon::{IntoParallelRefIterator, ParallelIterator},
  sanitize_file_name::sanitize_file_name,
  xxhash::xxhash_hex,
};
use oxc_index::IndexVec;
use render_module::ModuleRenderer;
use rustc_hash::FxHashMap;

use crate::scan_stage::ScanStageOutput;

pub struct GenerateStage<'a> {
  options: &'a NormalizedBundlerOptions,
  scan_output: &'a ScanStageOutput,
}

impl<'a> GenerateStage<'a> {
  pub fn new(options: &'a NormalizedBundlerOptions, scan_output: &'a ScanStageOutput) -> Self {
    Self { options, scan_output }
  }

  /// Renders one chunk per entry, followed by the files emitted for asset modules.
  pub fn generate(&self) -> Vec<OutputAsset> {
    let run_hash = self.compute_run_hash();
    let emitted = self.emit_asset_modules();
    let asset_filenames = emitted
      .iter()
      .map(|(idx, asset)| (*idx, asset.filename.as_str()))
      .collect::<FxHashMap<_, _>>();

    let rendered_modules = self.render_modules(&asset_filenames);
    let mut assets = self.render_chunks(&rendered_modules, &run_hash);
    assets.extend(emitted.into_iter().map(|(_, asset)| asset));
    assets
  }

  /// Hash of every module of the build, used for `[hash]`.
  fn compute_run_hash(&self) -> String {
    let mut input = Vec::new();
    for module in &self.scan_output.modules {
      input.extend_from_slice(module.stable_id.as_bytes());
      input.push(0);
      match &module.view {
        ModuleView::Ecma(view) => input.extend_from_slice(view.source.as_bytes()),
        ModuleView::Asset(view) => input.extend_from_slice(&view.source),
      }
      input.push(0);
    }
    input.extend_from_slice(self.options.global_object.as_bytes());
    input.extend_from_slice(self.options.public_path.as_bytes());
    xxhash_hex(&input)
  }

  fn emit_asset_modules(&self) -> Vec<(ModuleIdx, OutputAsset)> {
    let template = FilenameTemplate::new(self.options.asset_filenames.as_str());
    self
      .scan_output
      .modules
      .iter()
      .filter_map(|module| {
        let view = module.as_asset()?;
        let path = Path::new(module.id.as_ref());
        let name = sanitize_file_name(&path.representative_file_name());
        let ext = path.extension().and_then(OsStr::to_str).unwrap_or_default();
        let hash = xxhash_hex(&view.source);
        let filename = template.render(&FileNameRenderOptions {
          name: Some(&name),
          hash: Some(&hash),
          content_hash: Some(&hash),
          ext: Some(ext),
          ..Default::default()
        });
        let content = view.source.to_vec().into();
        Some((module.idx, OutputAsset { filename, content, is_chunk: false }))
      })
      .collect()
  }

  fn render_modules(
    &self,
    asset_filenames: &FxHashMap<ModuleIdx, &str>,
  ) -> IndexVec<ModuleIdx, String> {
    let modules = &self.scan_output.modules;
    let rendered = modules
      .as_raw_slice()
      .par_iter()
      .map(|module| {
        let renderer = ModuleRenderer { module, modules };
        match &module.view {
          ModuleView::Ecma(view) => renderer.render_ecma(view),
          ModuleView::Asset(_) => {
            let filename = asset_filenames.get(&module.idx).copied().unwrap_or_default();
            renderer.render_asset(filename, self.options.wasm_loading)
          }
        }
      })
      .collect::<Vec<_>>();
    IndexVec::from_vec(rendered)
  }
}

/// Drops files emitted twice with the same content, e.g. a wasm module shared by two nested
/// builds. Different contents for one filename is an error.
pub fn finalize_assets(assets: Vec<OutputAsset>) -> BuildResult<Vec<OutputAsset>> {
  let mut seen = FxHashMap::<String, usize>::default();
  let mut finalized: Vec<OutputAsset> = Vec::with_capacity(assets.len());
  for asset in assets {
    match seen.get(&asset.filename) {
      Some(&idx) if finalized[idx].content == asset.content => {}
      Some(_) => Err(anyhow::anyhow!(
        "Multiple files with different content were emitted to the same filename {:?}",
        asset.filename
      ))?,
      None => {
        seen.insert(asset.filename.clone(), finalized.len());
        finalized.push(asset);
      }
    }
  }
  Ok(finalized)
}

#[test]
fn test_finalize_assets() {
  let asset = |filename: &str, content: &str| OutputAsset {
    filename: filename.to_string(),
    content: content.to_string().into(),
    is_chunk: true,
  };
  let finalized =
    finalize_assets(vec![asset("main.js", "a"), asset("0.worklet.js", "b"), asset("main.js", "a")])
      .unwrap();
  assert_eq!(finalized.len(), 2);

  let err = finalize_assets(vec![asset("main.js", "a"), asset("main.js", "b")]).unwrap_err();
  assert!(err.to_string().contains("\"main.js\""));
}
