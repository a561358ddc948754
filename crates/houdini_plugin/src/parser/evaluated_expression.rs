use houdini_utils::concat_string;

/// The result of statically evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum BasicEvaluatedExpression {
  String(String),
  Number(f64),
  Boolean(bool),
  Null,
  Undefined,
  /// The value can't be known at build time.
  Unknown,
}

impl BasicEvaluatedExpression {
  pub fn is_string(&self) -> bool {
    matches!(self, Self::String(_))
  }

  pub fn as_string(&self) -> Option<&str> {
    match self {
      Self::String(value) => Some(value),
      _ => None,
    }
  }

  /// The value converted the way javascript converts it to a string, e.g. in `'a' + 1`.
  pub fn to_js_string(&self) -> Option<String> {
    match self {
      Self::String(value) => Some(value.clone()),
      Self::Number(value) => Some(number_to_js_string(*value)),
      Self::Boolean(value) => Some(value.to_string()),
      Self::Null => Some("null".to_string()),
      Self::Undefined => Some("undefined".to_string()),
      Self::Unknown => None,
    }
  }
}

fn number_to_js_string(value: f64) -> String {
  if value.is_nan() {
    "NaN".to_string()
  } else if value.is_infinite() {
    if value.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string()
  } else if value == 0.0 {
    // `-0` prints as `0`
    "0".to_string()
  } else if (1e-6..1e21).contains(&value.abs()) {
    value.to_string()
  } else {
    // `1e21` prints as `1e+21`
    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
      Some((mantissa, exponent)) if !exponent.starts_with('-') => {
        concat_string!(mantissa, "e+", exponent)
      }
      _ => exponential,
    }
  }
}

#[test]
fn test_to_js_string() {
  assert_eq!(BasicEvaluatedExpression::Number(1.0).to_js_string().as_deref(), Some("1"));
  assert_eq!(BasicEvaluatedExpression::Number(-0.0).to_js_string().as_deref(), Some("0"));
  assert_eq!(BasicEvaluatedExpression::Number(1.5).to_js_string().as_deref(), Some("1.5"));
  assert_eq!(BasicEvaluatedExpression::Number(f64::NAN).to_js_string().as_deref(), Some("NaN"));
  assert_eq!(
    BasicEvaluatedExpression::Number(1e20).to_js_string().as_deref(),
    Some("100000000000000000000")
  );
  assert_eq!(
    BasicEvaluatedExpression::Number(2f64.powi(63)).to_js_string().as_deref(),
    Some("9223372036854776000")
  );
  assert_eq!(BasicEvaluatedExpression::Number(-1e21).to_js_string().as_deref(), Some("-1e+21"));
  assert_eq!(BasicEvaluatedExpression::Number(1.5e-7).to_js_string().as_deref(), Some("1.5e-7"));
  assert_eq!(BasicEvaluatedExpression::Null.to_js_string().as_deref(), Some("null"));
  assert_eq!(BasicEvaluatedExpression::Unknown.to_js_string(), None);
}
