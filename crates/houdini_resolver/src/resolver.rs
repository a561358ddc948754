use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use itertools::Itertools;
use oxc_resolver::{ResolveError, ResolveOptions as OxcResolverOptions, Resolver as OxcResolver};

use houdini_common::Platform;

#[derive(Debug)]
pub struct Resolver {
  cwd: PathBuf,
  inner: OxcResolver,
}

impl Resolver {
  pub fn new(platform: Platform, cwd: PathBuf) -> Self {
    let mut condition_names = vec!["import".to_string(), "default".to_string()];

    match platform {
      Platform::Node => {
        condition_names.push("node".to_string());
      }
      Platform::Browser => {
        condition_names.push("browser".to_string());
      }
      Platform::Worker => {
        condition_names.push("worker".to_string());
        condition_names.push("browser".to_string());
      }
      Platform::Neutral => {}
    }

    let condition_names = condition_names.into_iter().unique().collect();

    let main_fields = match platform {
      Platform::Node => {
        vec!["main".to_string(), "module".to_string()]
      }
      Platform::Browser | Platform::Worker => {
        vec!["browser".to_string(), "module".to_string(), "main".to_string()]
      }
      Platform::Neutral => vec![],
    };

    let alias_fields = match platform {
      Platform::Browser | Platform::Worker => vec![vec!["browser".to_string()]],
      _ => vec![],
    };

    let options = OxcResolverOptions {
      main_fields,
      alias_fields,
      condition_names,
      extensions: vec![
        String::from(".js"),
        String::from(".mjs"),
        String::from(".ts"),
        String::from(".json"),
      ],
      ..Default::default()
    };

    Self { cwd, inner: OxcResolver::new(options) }
  }

  pub fn cwd(&self) -> &PathBuf {
    &self.cwd
  }

  /// Drops cached file system state, so a rebuild sees files created or removed in between.
  pub fn clear_cache(&self) {
    self.inner.clear_cache();
  }
}

#[derive(Debug)]
pub struct ResolveReturn {
  pub path: ArcStr,
}

impl Resolver {
  /// Resolves `specifier` from the directory of `importer`, or from `context` when there's no
  /// importer (entries).
  pub fn resolve(
    &self,
    importer: Option<&Path>,
    context: Option<&Path>,
    specifier: &str,
  ) -> Result<ResolveReturn, ResolveError> {
    let dir = importer
      .and_then(|importer| importer.parent())
      .filter(|inner| inner.components().next().is_some())
      .or(context)
      .unwrap_or(self.cwd.as_path());

    let mut resolution = self.inner.resolve(dir, specifier);

    // Handle `{ input: 'main.js' }` -> `<context>/main.js`
    if resolution.is_err() && importer.is_none() {
      let is_specifier_path_like = specifier.starts_with('.') || specifier.starts_with('/');
      if !is_specifier_path_like {
        let result = self.inner.resolve(dir, &format!("./{specifier}"));
        if result.is_ok() {
          resolution = result;
        }
      }
    }

    resolution.map(|info| {
      let path = info.full_path().to_string_lossy().into_owned().into();
      ResolveReturn { path }
    })
  }
}

#[test]
fn test_resolve_relative_and_bare_entry() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("main.js"), "").unwrap();
  std::fs::create_dir_all(dir.path().join("worklets")).unwrap();
  std::fs::write(dir.path().join("worklets/paint.js"), "").unwrap();

  let resolver = Resolver::new(Platform::Browser, dir.path().to_path_buf());
  let main = resolver.resolve(None, None, "main.js").unwrap();
  assert!(main.path.ends_with("main.js"));

  let importer = dir.path().join("main.js");
  let paint = resolver.resolve(Some(&importer), None, "./worklets/paint").unwrap();
  assert!(paint.path.ends_with("paint.js"));

  assert!(resolver.resolve(Some(&importer), None, "./missing.js").is_err());
}
