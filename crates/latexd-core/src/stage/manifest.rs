use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMethod {
    Linked,
    Copied,
}

/// One top-level name in the staging directory
#[derive(Debug, Clone, Serialize)]
pub struct StagedEntry {
    pub name: String,
    pub source: PathBuf,
    pub kind: EntryKind,
    pub method: StageMethod,
    /// Earlier sources of the same name that lost to `source`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StageManifest {
    pub entries: Vec<StagedEntry>,
}

impl StageManifest {
    pub fn get(&self, name: &str) -> Option<&StagedEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that shadowed a same-named file from an earlier source
    pub fn collisions(&self) -> impl Iterator<Item = &StagedEntry> {
        self.entries.iter().filter(|e| !e.overridden.is_empty())
    }
}
