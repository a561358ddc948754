use std::{
  borrow::Cow,
  sync::{Arc, Mutex, PoisonError},
};

use rustc_hash::FxHashSet;

/// Warnings collected during a build session. Child compilers started by the session share it,
/// so a warning emitted with [Diagnostics::warn_once] shows up once per session.
#[derive(Debug, Default)]
pub struct Diagnostics {
  warnings: Mutex<Vec<anyhow::Error>>,
  emitted_keys: Mutex<FxHashSet<Cow<'static, str>>>,
}

pub type SharedDiagnostics = Arc<Diagnostics>;

impl Diagnostics {
  pub fn warn(&self, warning: anyhow::Error) {
    tracing::warn!("{warning:#}");
    self.warnings.lock().unwrap_or_else(PoisonError::into_inner).push(warning);
  }

  /// Returns `false` if a warning with the same key was already emitted.
  pub fn warn_once(
    &self,
    key: impl Into<Cow<'static, str>>,
    warning: impl FnOnce() -> anyhow::Error,
  ) -> bool {
    let inserted =
      self.emitted_keys.lock().unwrap_or_else(PoisonError::into_inner).insert(key.into());
    if inserted {
      self.warn(warning());
    }
    inserted
  }

  pub fn len(&self) -> usize {
    self.warnings.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn take_warnings(&self) -> Vec<anyhow::Error> {
    std::mem::take(&mut *self.warnings.lock().unwrap_or_else(PoisonError::into_inner))
  }
}

#[test]
fn test_warn_once() {
  let diagnostics = Diagnostics::default();
  assert!(diagnostics.warn_once("global-object", || anyhow::anyhow!("first")));
  assert!(!diagnostics.warn_once("global-object", || anyhow::anyhow!("second")));
  diagnostics.warn(anyhow::anyhow!("third"));

  let warnings = diagnostics.take_warnings();
  assert_eq!(warnings.iter().map(ToString::to_string).collect::<Vec<_>>(), ["first", "third"]);
  assert!(diagnostics.is_empty());
}
