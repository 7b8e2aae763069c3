#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const ORDERS_PLAN: &str = r#"
source: staging.raw_orders
target: orders
date_format: dmy
columns:
  - name: Order No
    datatype: Number
    name_mapping: order_no
  - name: Placed
    datatype: Date
  - name: Paid
    datatype: Checkbox
  - name: Tags
    datatype: MultiSelect
    options: [gift, express, "C++"]
  - name: Status
    datatype: SingleSelect
    options: [open, closed]
"#;

pub const ORDERS_CSV: &str = "\
Order No,Placed,Paid,Tags,Status
#1001,03/04/2024,yes,\"gift,unknown,express\",open
A-7,2024-12-31,maybe,unknown,Open
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
