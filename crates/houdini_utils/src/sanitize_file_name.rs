/// Replaces every char that is not safe in a chunk name with `_`.
pub fn sanitize_file_name(str: &str) -> String {
  str
    .chars()
    .map(|char| {
      if char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '.') { char } else { '_' }
    })
    .collect()
}

#[test]
fn test_sanitize_file_name() {
  assert_eq!(sanitize_file_name("\0+a=Z_0-"), "__a_Z_0-");
  assert_eq!(sanitize_file_name("paint.worklet"), "paint.worklet");
}
