use std::path::Path;

use houdini_common::{FileNameRenderOptions, FilenameTemplate, ModuleIdx, OutputAsset};
use houdini_utils::{
  path_ext::PathExt, sanitize_file_name::sanitize_file_name, xxhash::xxhash_hex,
};
use itertools::Itertools;
use oxc_index::IndexVec;
use rustc_hash::FxHashSet;

use super::GenerateStage;
use crate::runtime::{render_runtime, RuntimeRenderArgs};

impl GenerateStage<'_> {
  pub(super) fn render_chunks(
    &self,
    rendered_modules: &IndexVec<ModuleIdx, String>,
    run_hash: &str,
  ) -> Vec<OutputAsset> {
    let modules = &self.scan_output.modules;
    let template = FilenameTemplate::new(self.options.entry_filenames.as_str());

    self
      .scan_output
      .entry_points
      .iter()
      .enumerate()
      .map(|(chunk_idx, entry_point)| {
        let entry = &modules[entry_point.idx];
        let name = entry_point.name.as_deref().map_or_else(
          || sanitize_file_name(&Path::new(entry.id.as_ref()).representative_file_name()),
          ToString::to_string,
        );
        let mut id_buffer = itoa::Buffer::new();
        let preliminary_filename = template.render(&FileNameRenderOptions {
          name: Some(&name),
          id: Some(id_buffer.format(chunk_idx)),
          hash: Some(run_hash),
          ext: Some("js"),
          ..Default::default()
        });

        let chunk_modules = self
          .collect_chunk_modules(entry_point.idx)
          .into_iter()
          .map(|idx| (modules[idx].stable_id.as_str(), rendered_modules[idx].as_str()))
          .collect::<Vec<_>>();
        let code = render_runtime(&RuntimeRenderArgs {
          modules: &chunk_modules,
          entry: &entry.stable_id,
          global_object: &self.options.global_object,
          public_path: &self.options.public_path,
          chunk_depth: preliminary_filename.matches('/').count(),
        });

        let filename = if template.has_content_hash() {
          let content_hash = xxhash_hex(code.as_bytes());
          FilenameTemplate::new(preliminary_filename).render(&FileNameRenderOptions {
            content_hash: Some(&content_hash),
            ..Default::default()
          })
        } else {
          preliminary_filename
        };

        OutputAsset { filename, content: code.into(), is_chunk: true }
      })
      .collect()
  }

  /// Modules reachable from `entry`, in module order.
  fn collect_chunk_modules(&self, entry: ModuleIdx) -> Vec<ModuleIdx> {
    let mut visited = FxHashSet::default();
    let mut stack = vec![entry];
    while let Some(idx) = stack.pop() {
      if visited.insert(idx) {
        stack.extend(self.scan_output.modules[idx].dependencies());
      }
    }
    visited.into_iter().sorted_unstable().collect()
  }
}
