use anyhow::Context;
use houdini_plugin::SharedPlugin;
use serde::Deserialize;

#[derive(Debug, Default, Clone)]
pub struct CssWorkletPluginOptions {
  /// Global object of worklet bundles. Defaults to `self`.
  pub global_object: Option<String>,
  /// Plugins applied to worklet builds in addition to the plugin itself. Worklet builds don't
  /// inherit the plugins of the parent build.
  pub plugins: Vec<ForwardedPlugin>,
}

#[derive(Debug, Clone)]
pub enum ForwardedPlugin {
  Instance(SharedPlugin),
  /// Looked up by [houdini_plugin::Plugin::name] among the plugins of the parent build.
  Named(String),
}

impl From<SharedPlugin> for ForwardedPlugin {
  fn from(plugin: SharedPlugin) -> Self {
    Self::Instance(plugin)
  }
}

impl From<&str> for ForwardedPlugin {
  fn from(name: &str) -> Self {
    Self::Named(name.to_string())
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCssWorkletPluginOptions {
  global_object: Option<String>,
  #[serde(default)]
  plugins: Vec<String>,
}

impl CssWorkletPluginOptions {
  /// Reads `{ "globalObject": "self", "plugins": ["PluginName"] }`. Plugins can only be
  /// forwarded by name here.
  pub fn from_json(json: &str) -> anyhow::Result<Self> {
    let raw: RawCssWorkletPluginOptions =
      serde_json::from_str(json).context("Invalid css-worklet-plugin options")?;
    Ok(Self {
      global_object: raw.global_object,
      plugins: raw.plugins.into_iter().map(ForwardedPlugin::Named).collect(),
    })
  }
}

#[test]
fn test_from_json() {
  let options =
    CssWorkletPluginOptions::from_json(r#"{ "globalObject": "globalThis", "plugins": ["Foo"] }"#)
      .unwrap();
  assert_eq!(options.global_object.as_deref(), Some("globalThis"));
  assert!(matches!(options.plugins.as_slice(), [ForwardedPlugin::Named(name)] if name == "Foo"));

  let options = CssWorkletPluginOptions::from_json("{}").unwrap();
  assert!(options.global_object.is_none());
  assert!(options.plugins.is_empty());

  assert!(CssWorkletPluginOptions::from_json(r#"{ "global_object": "self" }"#).is_err());
}
