use std::{io, path::Path};

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    std::fs::write(path, content)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }
}

#[test]
fn test_os_file_system_round_trip() {
  let dir = tempfile::tempdir().unwrap();
  let fs = OsFileSystem;
  let nested = dir.path().join("dist/assets");
  fs.create_dir_all(&nested).unwrap();
  fs.write(&nested.join("paint.worklet.js"), b"registerPaint").unwrap();
  assert!(fs.exists(&nested.join("paint.worklet.js")));
  assert_eq!(fs.read_to_string(&nested.join("paint.worklet.js")).unwrap(), "registerPaint");
}
