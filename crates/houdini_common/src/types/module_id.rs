use std::path::Path;

use arcstr::ArcStr;
use sugar_path::SugarPath;

/// `ModuleId` is the unique string identifier for each module.
/// - File modules use their absolute path.
/// - Virtual modules created by plugins start with `\0`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }

  pub fn is_virtual(&self) -> bool {
    self.0.starts_with('\0')
  }

  /// A representation of the id that doesn't depend on the machine the build runs on.
  /// It's used as the key of the module in the emitted chunk.
  pub fn stabilize(&self, cwd: &Path) -> String {
    if self.is_virtual() {
      self.0.trim_start_matches('\0').to_string()
    } else if self.as_path().is_absolute() {
      let relative = self.relative(cwd).as_path().to_slash_lossy().into_owned();
      if relative.starts_with('.') { relative } else { format!("./{relative}") }
    } else {
      self.to_string()
    }
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

#[test]
fn test_stabilize() {
  let cwd = Path::new("/project");
  assert_eq!(ModuleId::new("/project/src/main.js").stabilize(cwd), "./src/main.js");
  assert_eq!(ModuleId::new("/shared/lib.js").stabilize(cwd), "../shared/lib.js");
  assert_eq!(ModuleId::new("\0css-worklet?{}!./a.js").stabilize(cwd), "css-worklet?{}!./a.js");
}
