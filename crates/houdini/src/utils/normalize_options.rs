use houdini_common::{BundlerOptions, NormalizedBundlerOptions};

pub fn normalize_options(raw_options: BundlerOptions) -> anyhow::Result<NormalizedBundlerOptions> {
  let cwd = match raw_options.cwd {
    Some(cwd) => cwd,
    None => std::env::current_dir()
      .map_err(|err| anyhow::anyhow!("Failed to get the current directory: {err}"))?,
  };
  let platform = raw_options.platform.unwrap_or_default();

  Ok(NormalizedBundlerOptions {
    input: raw_options.input.unwrap_or_default(),
    context: raw_options.context.unwrap_or_else(|| cwd.clone()),
    cwd,
    platform,
    entry_filenames: raw_options.entry_filenames.unwrap_or_else(|| "[name].js".to_string()),
    chunk_filenames: raw_options.chunk_filenames.unwrap_or_else(|| "[name]-[hash].js".to_string()),
    asset_filenames: raw_options
      .asset_filenames
      .unwrap_or_else(|| "assets/[name]-[hash][extname]".to_string()),
    dir: raw_options.dir.unwrap_or_else(|| "dist".to_string()),
    public_path: raw_options.public_path.unwrap_or_default(),
    global_object: raw_options
      .global_object
      .unwrap_or_else(|| platform.default_global_object().to_string()),
    wasm_loading: raw_options.wasm_loading.unwrap_or_default(),
  })
}

#[test]
fn test_normalize_options_defaults() {
  let options = normalize_options(BundlerOptions {
    cwd: Some("/project".into()),
    platform: Some(houdini_common::Platform::Worker),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(options.context, std::path::PathBuf::from("/project"));
  assert_eq!(options.entry_filenames, "[name].js");
  assert_eq!(options.chunk_filenames, "[name]-[hash].js");
  assert_eq!(options.global_object, "self");
  assert_eq!(options.public_path, "");
}
