/// Concatenates string slices into a `String`, allocating once.
///
/// ```ignore
/// let s = concat_string!("a", name, "c");
/// ```
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    use std::ops::AddAssign;
    let mut len = 0;
    $(len.add_assign(AsRef::<str>::as_ref(&$s).len());)+
    let mut buf = String::with_capacity(len);
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  let name = String::from("b");
  assert_eq!(concat_string!("a", name, "c"), "abc");
  assert_eq!(concat_string!(), "");
}
