use std::{
  fs,
  path::{Path, PathBuf},
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, OnceLock,
  },
};

use async_trait::async_trait;
use houdini::{BundleOutput, Bundler, BundlerOptions, InputItem, ModuleId, Plugin, SharedPlugin};
use houdini_plugin::{HookLoadArgs, HookLoadReturn, HookNoopReturn, PluginContext};
use houdini_plugin_css_worklet::{CssWorkletPlugin, CssWorkletPluginOptions, ForwardedPlugin};
use houdini_utils::xxhash::xxhash_128;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const NON_STRING_WARNING: &str = "addModule() worklet will only be bundled if passed a String.";

fn copy_dir(from: &Path, to: &Path) {
  fs::create_dir_all(to).unwrap();
  for entry in fs::read_dir(from).unwrap() {
    let entry = entry.unwrap();
    let dest = to.join(entry.file_name());
    if entry.file_type().unwrap().is_dir() {
      copy_dir(&entry.path(), &dest);
    } else {
      fs::copy(entry.path(), dest).unwrap();
    }
  }
}

/// Copies `tests/fixtures/<name>` into a temporary directory.
fn fixture(name: &str) -> (TempDir, PathBuf) {
  let dir = tempfile::tempdir().unwrap();
  let cwd = dir.path().canonicalize().unwrap();
  copy_dir(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name), &cwd);
  (dir, cwd)
}

fn bundler(cwd: &Path, input: &str, plugins: Vec<SharedPlugin>) -> Bundler {
  Bundler::with_plugins(
    BundlerOptions {
      input: Some(vec![InputItem::new("main", input)]),
      cwd: Some(cwd.to_path_buf()),
      chunk_filenames: Some("[name].js".to_string()),
      ..Default::default()
    },
    plugins,
  )
  .unwrap()
}

fn css_worklet_plugin(options: CssWorkletPluginOptions) -> SharedPlugin {
  Arc::new(CssWorkletPlugin::new(options))
}

fn code<'a>(output: &'a BundleOutput, filename: &str) -> &'a str {
  output
    .get(filename)
    .and_then(|asset| asset.code())
    .unwrap_or_else(|| {
      panic!("{filename} was not emitted: {:?}", output.filenames().collect::<Vec<_>>())
    })
}

fn warnings(output: &BundleOutput) -> Vec<String> {
  output.warnings.iter().map(|warning| format!("{warning:#}")).collect()
}

#[derive(Debug, Default)]
struct CountApplyPlugin {
  builds: AtomicUsize,
}

#[async_trait]
impl Plugin for CountApplyPlugin {
  async fn build_start(&self, _ctx: &PluginContext) -> HookNoopReturn {
    self.builds.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

#[tokio::test]
async fn bundles_worklet_as_separate_chunk() {
  let (_dir, cwd) = fixture("basic");
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let output = bundler.generate().await.unwrap();

  assert_eq!(output.filenames().collect::<Vec<_>>(), ["main.js", "0.worklet.js"]);
  let main = code(&output, "main.js");
  assert!(main.contains("CSS.paintWorklet.addModule(__houdini_worklet_0__)"));
  assert!(main.contains(r#"module.exports = __houdini_require__.p + "0.worklet.js";"#));
  assert!(main.contains("registerProperty"));
  assert!(!main.contains("'./paint.js'"));
  assert!(!main.contains("registerPaint"));

  let worklet = code(&output, "0.worklet.js");
  assert!(worklet.contains("registerPaint('checker'"));
  assert!(worklet.contains("export const size") || worklet.contains("const size = 16"));
  assert!(worklet.trim_end().ends_with("})(self);"));
  assert!(!worklet.contains("registerProperty"));

  assert_eq!(warnings(&output).len(), 1);
  assert!(warnings(&output)[0].contains(r#"global_object is set to "window""#));
}

#[tokio::test]
async fn bundles_each_worklet_once() {
  let (_dir, cwd) = fixture("multiple");
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let output = bundler.generate().await.unwrap();

  assert_eq!(output.filenames().collect::<Vec<_>>(), ["main.js", "0.worklet.js", "1.worklet.js"]);
  let main = code(&output, "main.js");
  assert!(main.contains("CSS.paintWorklet.addModule(__houdini_worklet_0__)"));
  assert!(main.contains("CSS.animationWorklet.addModule(__houdini_worklet_1__)"));
  assert!(main.contains(r#"__houdini_require__.p + "0.worklet.js""#));
  assert!(main.contains(r#"__houdini_require__.p + "1.worklet.js""#));
  assert!(code(&output, "0.worklet.js").contains("registerPaint('a'"));
  assert!(code(&output, "1.worklet.js").contains("registerAnimator('b'"));
  // The global object warning is emitted once per build.
  assert_eq!(warnings(&output).len(), 1);
}

#[tokio::test]
async fn leaves_non_string_arguments_alone() {
  let (_dir, cwd) = fixture("skip_blobs");
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let output = bundler.generate().await.unwrap();

  assert_eq!(output.filenames().collect::<Vec<_>>(), ["main.js"]);
  let main = code(&output, "main.js");
  assert!(main.contains("CSS.paintWorklet.addModule(URL.createObjectURL(blob));"));
  let warnings = warnings(&output);
  assert_eq!(warnings.len(), 1);
  assert!(warnings[0].contains(NON_STRING_WARNING));
  assert!(warnings[0].starts_with("./src/main.js"));
}

#[tokio::test]
async fn does_not_apply_parent_plugins_to_worklets() {
  let (_dir, cwd) = fixture("basic");
  let count = Arc::new(CountApplyPlugin::default());
  let mut bundler = bundler(
    &cwd,
    "./src/main.js",
    vec![
      Arc::<CountApplyPlugin>::clone(&count),
      css_worklet_plugin(CssWorkletPluginOptions::default()),
    ],
  );

  bundler.generate().await.unwrap();

  assert_eq!(count.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn forwards_plugin_instances() {
  let (_dir, cwd) = fixture("basic");
  let count = Arc::new(CountApplyPlugin::default());
  let mut bundler = bundler(
    &cwd,
    "./src/main.js",
    vec![css_worklet_plugin(CssWorkletPluginOptions {
      global_object: None,
      plugins: vec![ForwardedPlugin::Instance(Arc::<CountApplyPlugin>::clone(&count))],
    })],
  );

  bundler.generate().await.unwrap();

  assert_eq!(count.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn forwards_plugins_by_name() {
  let (_dir, cwd) = fixture("basic");
  let count = Arc::new(CountApplyPlugin::default());
  let mut bundler = bundler(
    &cwd,
    "./src/main.js",
    vec![
      Arc::<CountApplyPlugin>::clone(&count),
      css_worklet_plugin(
        CssWorkletPluginOptions::from_json(
          r#"{ "globalObject": "self", "plugins": ["CountApplyPlugin", "MissingPlugin"] }"#,
        )
        .unwrap(),
      ),
    ],
  );

  let output = bundler.generate().await.unwrap();

  assert_eq!(count.builds.load(Ordering::SeqCst), 2);
  let warnings = warnings(&output);
  assert_eq!(warnings.len(), 1);
  assert!(warnings[0].contains(r#"Plugin "MissingPlugin" is not found."#));
}

#[tokio::test]
async fn keeps_filenames_stable_across_rebuilds() {
  let (_dir, cwd) = fixture("basic");
  let mut bundler = Bundler::with_plugins(
    BundlerOptions {
      input: Some(vec![InputItem::new("main", "./src/main.js")]),
      cwd: Some(cwd.clone()),
      chunk_filenames: Some("[name]-[contenthash:8].js".to_string()),
      global_object: Some("self".to_string()),
      ..Default::default()
    },
    vec![css_worklet_plugin(CssWorkletPluginOptions::default())],
  )
  .unwrap();
  let namespace = "subcache css-worklet-plugin ./paint.js";

  let paint_id = ModuleId::new(cwd.join("src/paint.js").to_str().unwrap());
  let paint_hash = xxhash_128(&fs::read(cwd.join("src/paint.js")).unwrap());

  let first = bundler.generate().await.unwrap();
  assert!(bundler.cache().has_partition(namespace));
  let partition = bundler.cache().partition(namespace);
  // paint.js and size.js
  assert_eq!(partition.len(), 2);
  assert!(bundler.cache().get(&paint_id, paint_hash).is_none());
  let cached = partition.get(&paint_id, paint_hash).unwrap();

  let second = bundler.generate().await.unwrap();
  let reused = partition.get(&paint_id, paint_hash).unwrap();
  assert!(Arc::ptr_eq(&cached.view, &reused.view));
  assert_eq!(partition.len(), 2);

  let filenames = first.filenames().collect::<Vec<_>>();
  assert_eq!(filenames, second.filenames().collect::<Vec<_>>());
  assert_eq!(code(&first, "main.js"), code(&second, "main.js"));
  assert!(first.warnings.is_empty());

  let [_, worklet] = filenames.as_slice() else { panic!("expected two assets: {filenames:?}") };
  assert!(worklet.starts_with("0-") && worklet.ends_with(".worklet.js"));
  assert_eq!(worklet.len(), "0-12345678.worklet.js".len());

  fs::write(cwd.join("src/size.js"), "export const size = 32;\n").unwrap();
  let third = bundler.generate().await.unwrap();
  let [main, changed] = third.filenames().collect::<Vec<_>>()[..] else {
    panic!("expected two assets")
  };
  assert_eq!(main, "main.js");
  assert_ne!(changed, *worklet);
  assert!(code(&third, changed).contains("32"));
  assert!(code(&third, "main.js").contains(changed));
}

#[tokio::test]
async fn fails_when_worklet_does_not_resolve() {
  let (_dir, cwd) = fixture("missing_entry");
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let err = bundler.write().await.unwrap_err();

  assert!(err.to_string().contains("./missing.js"), "{err}");
  assert!(!cwd.join("dist").exists());
}

#[tokio::test]
async fn writes_worklets_next_to_main_chunk() {
  let (_dir, cwd) = fixture("basic");
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let output = bundler.write().await.unwrap();

  for filename in output.filenames() {
    let written = fs::read(cwd.join("dist").join(filename)).unwrap();
    assert_eq!(written, output.get(filename).unwrap().content_as_bytes());
  }
}

#[tokio::test]
async fn rewrites_typescript_modules() {
  let (_dir, cwd) = fixture("typescript");
  let mut bundler =
    bundler(&cwd, "./src/main.ts", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let output = bundler.generate().await.unwrap();

  assert_eq!(output.filenames().collect::<Vec<_>>(), ["main.js", "0.worklet.js"]);
  assert!(code(&output, "main.js").contains("CSS.paintWorklet.addModule(__houdini_worklet_0__)"));
  let worklet = code(&output, "0.worklet.js");
  assert!(worklet.contains("registerPaint"));
  assert!(!worklet.contains("CanvasRenderingContext2D"));
}

#[tokio::test]
async fn emits_wasm_of_worklets() {
  let (_dir, cwd) = fixture("wasm");
  fs::write(cwd.join("src/noise.wasm"), b"\0asm\x01\0\0\0").unwrap();
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  let output = bundler.generate().await.unwrap();

  let filenames = output.filenames().collect::<Vec<_>>();
  assert_eq!(filenames.len(), 3, "{filenames:?}");
  assert_eq!(filenames[..2], ["main.js", "0.worklet.js"]);
  assert!(filenames[2].starts_with("assets/noise-") && filenames[2].ends_with(".wasm"));
  assert!(code(&output, "0.worklet.js").contains("__houdini_require__.w("));
  assert!(code(&output, "main.js").contains(r#"__houdini_require__.p + "0.worklet.js""#));
}

/// Cancels the top-level build once the worklet's entry starts loading, and never finishes
/// loading it.
#[derive(Debug, Default)]
struct CancelOnLoadPlugin {
  token: OnceLock<CancellationToken>,
  cancelled: AtomicBool,
}

#[async_trait]
impl Plugin for CancelOnLoadPlugin {
  async fn load(&self, _ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    if args.id.ends_with("paint.js") && !self.cancelled.swap(true, Ordering::SeqCst) {
      if let Some(token) = self.token.get() {
        token.cancel();
      }
      std::future::pending::<()>().await;
    }
    Ok(None)
  }
}

#[tokio::test]
async fn cancelling_releases_worklet_cache() {
  let (_dir, cwd) = fixture("basic");
  let namespace = "subcache css-worklet-plugin ./paint.js";
  let cancel_plugin = Arc::new(CancelOnLoadPlugin::default());
  let mut bundler = bundler(
    &cwd,
    "./src/main.js",
    vec![css_worklet_plugin(CssWorkletPluginOptions {
      global_object: None,
      plugins: vec![ForwardedPlugin::Instance(Arc::<CancelOnLoadPlugin>::clone(&cancel_plugin))],
    })],
  );
  cancel_plugin.token.set(bundler.cancellation_token()).unwrap();

  let err = bundler.generate().await.unwrap_err();
  assert!(err.to_string().contains("cancelled"), "{err}");
  assert!(!bundler.cache().has_partition(namespace));

  let output = bundler.generate().await.unwrap();
  assert!(output.get("0.worklet.js").is_some());
  assert!(bundler.cache().has_partition(namespace));
}

/// Cancels the worklet build it is forwarded to.
#[derive(Debug)]
struct CancelChildPlugin;

#[async_trait]
impl Plugin for CancelChildPlugin {
  async fn load(&self, ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    if args.id.ends_with("paint.js") {
      ctx.cancellation_token().cancel();
      std::future::pending::<()>().await;
    }
    Ok(None)
  }
}

#[tokio::test]
async fn cancelled_worklet_fails_parent_build() {
  let (_dir, cwd) = fixture("basic");
  let mut bundler = bundler(
    &cwd,
    "./src/main.js",
    vec![css_worklet_plugin(CssWorkletPluginOptions {
      global_object: None,
      plugins: vec![ForwardedPlugin::Instance(Arc::new(CancelChildPlugin))],
    })],
  );

  let err = bundler.generate().await.unwrap_err();

  let message = err.to_string();
  assert!(message.contains("CssWorkletPlugin: compilation of ./paint.js was cancelled"), "{err}");
  assert!(!bundler.cache().has_partition("subcache css-worklet-plugin ./paint.js"));
}

#[tokio::test]
async fn cancelled_bundler_recovers() {
  let (_dir, cwd) = fixture("basic");
  let mut bundler =
    bundler(&cwd, "./src/main.js", vec![css_worklet_plugin(CssWorkletPluginOptions::default())]);

  bundler.cancellation_token().cancel();
  assert!(bundler.generate().await.unwrap_err().to_string().contains("cancelled"));
  assert!(bundler.generate().await.is_ok());
}
