use std::path::PathBuf;

use tempfile::TempDir;

use chainkg_rs::RecordStore;

/// Temporary data directory with helpers for building integration tests.
pub struct TempDataDir {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempDataDir {
    /// A data directory holding every source file, all empty.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp data dir");
        let path = dir.path().to_path_buf();
        let data = Self { dir, path };
        for source in [
            "company.json",
            "industry.json",
            "product.json",
            "company_industry.json",
            "industry_industry.json",
            "company_product.json",
            "product_product.json",
        ] {
            data.write(source, "");
        }
        data
    }

    /// Write a source file relative to the data directory.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        std::fs::write(self.path.join(rel), content).expect("write source file");
        self
    }

    /// Write one JSON value per line.
    pub fn write_lines(&self, rel: &str, lines: &[serde_json::Value]) -> &Self {
        let content: String = lines.iter().map(|l| format!("{l}\n")).collect();
        self.write(rel, &content)
    }

    /// Remove a source file.
    pub fn remove(&self, rel: &str) -> &Self {
        std::fs::remove_file(self.path.join(rel)).expect("remove source file");
        self
    }

    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.path)
    }
}
