//! Turning source text into extracted entries

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::rules::ExtractionRule;

/// One localized string found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique, increasing in discovery order
    pub id: u64,
    pub text: String,
    pub comment: Option<String>,
    pub file: PathBuf,
}

pub struct Extractor {
    rules: Vec<ExtractionRule>,
    next_id: u64,
}

impl Extractor {
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules, next_id: 1 }
    }

    /// Run every rule over `content`, rule by rule, recording each match.
    pub fn extract_content(&mut self, file: &Path, content: &str) -> Vec<Entry> {
        let mut entries = Vec::new();
        for rule in &self.rules {
            for capture in rule.captures(content) {
                entries.push(Entry {
                    id: self.next_id,
                    text: capture.text,
                    comment: capture.comment,
                    file: file.to_path_buf(),
                });
                self.next_id += 1;
            }
        }
        entries
    }

    /// Read and extract each file in order.
    pub fn extract_files(&mut self, files: &[PathBuf]) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for file in files {
            let content = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let found = self.extract_content(file, &content);
            debug!("{}: {} strings", file.display(), found.len());
            entries.extend(found);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin_rules;
    use tempfile::TempDir;

    fn extractor() -> Extractor {
        Extractor::new(builtin_rules().unwrap())
    }

    #[test]
    fn test_rule_order_then_match_order() {
        let src = r#"
            let a = "Later".localized
            let b = NSLocalizedString("First", nil)
            let c = NSLocalizedString("Second", "with comment")
        "#;
        let entries = extractor().extract_content(Path::new("./A.swift"), src);

        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["Second", "First", "Later"]);
        assert_eq!(entries[0].comment.as_deref(), Some("with comment"));
        assert_eq!(entries[1].comment, None);
    }

    #[test]
    fn test_ids_increase_across_files() {
        let mut ex = extractor();
        let first = ex.extract_content(Path::new("a.swift"), r#""One".localized"#);
        let second = ex.extract_content(Path::new("b.swift"), r#""Two".localized"#);

        assert_eq!(first[0].id, 1);
        assert_eq!(second[0].id, 2);
        assert_eq!(second[0].file, PathBuf::from("b.swift"));
    }

    #[test]
    fn test_method_form_matches_two_rules() {
        // `.localized()` is also a `.localized` property access
        let entries = extractor().extract_content(Path::new("a.swift"), r#""Retry".localized()"#);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.text == "Retry"));
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_extract_files_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Menu.swift");
        std::fs::write(&path, r#"item.title = "Quit".localized"#).unwrap();

        let entries = extractor().extract_files(&[path.clone()]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file, path);
    }

    #[test]
    fn test_extract_files_reports_path_on_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("Gone.swift");

        let err = extractor().extract_files(&[missing]).unwrap_err();
        assert!(err.to_string().contains("Gone.swift"));
    }

    #[test]
    fn test_non_utf8_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bad.swift");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        assert!(extractor().extract_files(&[path]).is_err());
    }
}
