#[derive(Debug, thiserror::Error)]
pub enum WorkletError {
  #[error("CssWorkletPlugin: no entry for {request}")]
  NoEntry { request: String },
  #[error("CssWorkletPlugin: failed to compile {request}: {error:#}")]
  ChildCompilation { request: String, error: anyhow::Error },
  #[error("CssWorkletPlugin: compilation of {request} was cancelled")]
  Cancelled { request: String },
  #[error("CssWorkletPlugin: invalid worklet request {id:?}")]
  InvalidRequest { id: String },
}

#[test]
fn test_messages_name_the_request() {
  assert_eq!(
    WorkletError::NoEntry { request: "./paint.js".to_string() }.to_string(),
    "CssWorkletPlugin: no entry for ./paint.js"
  );
  let error = WorkletError::ChildCompilation {
    request: "./missing.js".to_string(),
    error: anyhow::anyhow!("Could not resolve entry module"),
  };
  assert_eq!(
    error.to_string(),
    "CssWorkletPlugin: failed to compile ./missing.js: Could not resolve entry module"
  );
}
