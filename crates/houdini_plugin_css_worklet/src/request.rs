//! Requests carry a JSON query between a prefix and the `!` in front of the worklet request,
//! e.g. `css-worklet-loader?{"name":"0"}!./paint.js`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Declared by rewritten modules.
const LOADER_PREFIX: &str = "css-worklet-loader?";
/// The virtual module the loader request resolves to.
const WORKLET_ID_PREFIX: &str = "\0css-worklet?";

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderQuery {
  pub name: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkletQuery {
  pub name: String,
  /// Directory of the rewritten module, relative to `cwd`.
  pub context: String,
}

pub fn is_loader_request(specifier: &str) -> bool {
  specifier.starts_with(LOADER_PREFIX)
}

pub fn is_worklet_id(id: &str) -> bool {
  id.starts_with(WORKLET_ID_PREFIX)
}

pub fn encode_loader_request(query: &LoaderQuery, request: &str) -> serde_json::Result<String> {
  encode(LOADER_PREFIX, query, request)
}

pub fn decode_loader_request(specifier: &str) -> Option<(LoaderQuery, &str)> {
  decode(LOADER_PREFIX, specifier)
}

pub fn encode_worklet_id(query: &WorkletQuery, request: &str) -> serde_json::Result<String> {
  encode(WORKLET_ID_PREFIX, query, request)
}

pub fn decode_worklet_id(id: &str) -> Option<(WorkletQuery, &str)> {
  decode(WORKLET_ID_PREFIX, id)
}

fn encode(prefix: &str, query: &impl Serialize, request: &str) -> serde_json::Result<String> {
  let mut encoded = prefix.to_string();
  encoded.push_str(&serde_json::to_string(query)?);
  encoded.push('!');
  encoded.push_str(request);
  Ok(encoded)
}

fn decode<'a, Q: DeserializeOwned>(prefix: &str, value: &'a str) -> Option<(Q, &'a str)> {
  let rest = value.strip_prefix(prefix)?;
  let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Q>();
  let query = stream.next()?.ok()?;
  let request = rest[stream.byte_offset()..].strip_prefix('!')?;
  Some((query, request))
}

#[test]
fn test_loader_request() {
  let encoded =
    encode_loader_request(&LoaderQuery { name: "0".to_string() }, "./paint.js").unwrap();
  assert_eq!(encoded, r#"css-worklet-loader?{"name":"0"}!./paint.js"#);
  assert_eq!(
    decode_loader_request(&encoded),
    Some((LoaderQuery { name: "0".to_string() }, "./paint.js"))
  );
}

#[test]
fn test_worklet_id_keeps_bangs_in_request() {
  let query = WorkletQuery { name: "1".to_string(), context: "src/a!b".to_string() };
  let encoded = encode_worklet_id(&query, "./x!y.js").unwrap();
  assert_eq!(encoded, "\0css-worklet?{\"name\":\"1\",\"context\":\"src/a!b\"}!./x!y.js");
  assert_eq!(decode_worklet_id(&encoded), Some((query, "./x!y.js")));
}

#[test]
fn test_decode_rejects_malformed_requests() {
  assert_eq!(decode_loader_request("css-worklet-loader?./paint.js"), None);
  assert_eq!(decode_loader_request(r#"css-worklet-loader?{"name":"0"}./paint.js"#), None);
  assert_eq!(decode_loader_request(r#"css-worklet-loader?{"id":0}!./paint.js"#), None);
  assert_eq!(decode_worklet_id("./paint.js"), None);
}
