//! Partition extracted entries into per-file sections and a shared section

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::extract::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    pub file: PathBuf,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StringsTable {
    /// In order of each file's first kept entry
    pub files: Vec<FileSection>,
    /// Texts found in more than one file
    pub shared: Vec<Entry>,
}

impl StringsTable {
    pub fn len(&self) -> usize {
        self.files.iter().map(|f| f.entries.len()).sum::<usize>() + self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Texts used by two or more distinct files go to the shared section once;
/// everything else goes to its file's section once. The first entry in
/// discovery order wins in both cases, comment included.
pub fn classify(entries: Vec<Entry>) -> StringsTable {
    let shared_texts = texts_in_multiple_files(&entries);

    let mut table = StringsTable::default();
    let mut shared_seen: HashSet<String> = HashSet::new();
    let mut sections: HashMap<PathBuf, (usize, HashSet<String>)> = HashMap::new();

    for entry in entries {
        if shared_texts.contains(&entry.text) {
            if shared_seen.insert(entry.text.clone()) {
                debug!("#{} {:?} is shared", entry.id, entry.text);
                table.shared.push(entry);
            }
            continue;
        }

        let (index, seen) = sections.entry(entry.file.clone()).or_insert_with(|| {
            table.files.push(FileSection {
                file: entry.file.clone(),
                entries: Vec::new(),
            });
            (table.files.len() - 1, HashSet::new())
        });

        if seen.insert(entry.text.clone()) {
            table.files[*index].entries.push(entry);
        }
    }

    table
}

fn texts_in_multiple_files(entries: &[Entry]) -> HashSet<String> {
    let mut first_file: HashMap<&str, &Path> = HashMap::new();
    let mut shared = HashSet::new();

    for entry in entries {
        match first_file.get(entry.text.as_str()) {
            None => {
                first_file.insert(&entry.text, &entry.file);
            }
            Some(file) if *file != entry.file.as_path() => {
                shared.insert(entry.text.clone());
            }
            Some(_) => {}
        }
    }

    shared
}
