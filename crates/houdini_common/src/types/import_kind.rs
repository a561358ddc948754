use std::fmt::Display;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ImportKind {
  /// import foo from 'foo'
  Import,
  /// `require('foo')`
  Require,
  /// A variable a plugin bound to `require(..)` of a generated request.
  ParsedVariable,
}

impl Display for ImportKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Import => write!(f, "import-statement"),
      Self::Require => write!(f, "require-call"),
      Self::ParsedVariable => write!(f, "parsed-variable"),
    }
  }
}
