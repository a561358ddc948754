mod bundler_options;
mod module;
mod runtime;
mod types;

use std::sync::Arc;

pub use bundler_options::{
  filename_template::{FileNameRenderOptions, FilenameTemplate},
  input_item::InputItem,
  module_type::ModuleType,
  normalized_bundler_options::NormalizedBundlerOptions,
  platform::Platform,
  wasm_loading::WasmLoading,
  BundlerOptions,
};

pub use crate::{
  module::{
    asset_view::AssetView,
    ecma_view::{EcmaView, ExportBinding, ExportsKind, ImportBinding, ImportedName, Mutation},
    Module, ModuleView,
  },
  runtime::RuntimeGlobals,
  types::{
    entry_point::EntryPoint,
    import_kind::ImportKind,
    import_record::{RawImportRecord, ResolvedImportRecord},
    module_id::ModuleId,
    output_asset::OutputAsset,
    raw_idx::{ImportRecordIdx, ModuleIdx},
    resolved_id::ResolvedId,
    str_or_bytes::StrOrBytes,
  },
};

pub type SharedNormalizedBundlerOptions = Arc<NormalizedBundlerOptions>;
