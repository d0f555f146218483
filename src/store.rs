//! Memory document storage.
//!
//! One markdown document per agent, named `<root>/<agent>.md`. The store
//! owns path resolution (including identifier sanitization), the
//! read-modify-write cycle around the section patcher, and the tagged
//! lookup results the command layer maps to its output formats. The store
//! receives its root explicitly; only `resolve_root` consults the
//! environment.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use clap_complete::engine::CompletionCandidate;
use serde::Serialize;

use crate::config::{self, Config};
use crate::patch;
use crate::section::{self, Section};

/// Storage for agent memory documents under a single root directory.
pub struct MemoryStore {
    root: PathBuf,
}

/// Whether an upsert created a new section or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

impl fmt::Display for UpsertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertAction::Created => write!(f, "created"),
            UpsertAction::Updated => write!(f, "updated"),
        }
    }
}

/// Result of a completed upsert.
#[derive(Debug)]
pub struct UpsertOutcome {
    pub path: PathBuf,
    pub title: String,
    pub level: u8,
    pub action: UpsertAction,
}

/// Result of a lookup by section title.
#[derive(Debug)]
pub enum SectionLookup {
    Found(Section),
    /// No section with that title; `available` lists every known title
    NotFound { available: Vec<String> },
    /// No backing document for the agent at all
    NoDocument { hint: String },
}

/// One memory document found under the store root.
pub struct AgentEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

/// Restrict an agent identifier to `[A-Za-z0-9._-]` before it is used as
/// a file name. Other characters become `_`. Identifiers without a single
/// alphanumeric character are rejected rather than mapped to `.`/`..`.
pub fn sanitize_agent_id(id: &str) -> Result<String, String> {
    let cleaned: String = id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "invalid agent id '{}': must contain at least one alphanumeric character",
            id
        ));
    }

    Ok(cleaned)
}

/// Resolve the storage root.
///
/// Precedence: --root flag, $RECALL_ROOT, config storage.root, then the
/// platform data directory (e.g. ~/.local/share/recall).
pub fn resolve_root(cli_root: Option<PathBuf>, config: &Config) -> PathBuf {
    if let Some(root) = cli_root {
        return root;
    }
    if let Some(root) = config::env_string("RECALL_ROOT") {
        return PathBuf::from(root);
    }
    if let Some(ref root) = config.storage.root {
        return PathBuf::from(root);
    }
    dirs::data_dir()
        .map(|p| p.join("recall"))
        .unwrap_or_else(|| PathBuf::from(".recall"))
}

fn normalize_line_endings(text: String) -> String {
    // Documents are LF-delimited internally; CRLF input is normalized
    // once, here, before any scan sees it.
    if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text
    }
}

impl MemoryStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage path for an agent's memory document.
    pub fn path_for(&self, agent: &str) -> Result<PathBuf, String> {
        let name = sanitize_agent_id(agent)?;
        Ok(self.root.join(format!("{}.md", name)))
    }

    /// Load an agent's document. Missing file is `None`, not an error.
    pub fn load(&self, agent: &str) -> Result<Option<String>, String> {
        let path = self.path_for(agent)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(normalize_line_endings(text))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(format!("reading {}: {}", path.display(), e)),
        }
    }

    /// Scan an agent's document. `None` means no document exists yet.
    pub fn sections(&self, agent: &str) -> Result<Option<Vec<Section>>, String> {
        Ok(self.load(agent)?.map(|text| section::scan(&text)))
    }

    /// Look up one section by title, case-insensitively.
    pub fn lookup(&self, agent: &str, title: &str) -> Result<SectionLookup, String> {
        let Some(text) = self.load(agent)? else {
            return Ok(SectionLookup::NoDocument {
                hint: self.no_document_hint(agent),
            });
        };

        let sections = section::scan(&text);
        match section::find(&sections, title) {
            Some(s) => Ok(SectionLookup::Found(s.clone())),
            None => Ok(SectionLookup::NotFound {
                available: section::titles(&sections),
            }),
        }
    }

    /// Create or replace a section and persist the document.
    ///
    /// Read current text, patch, write back: one unit of work. No
    /// cross-process serialization is attempted; interleaved writers can
    /// lose updates.
    pub fn upsert(
        &self,
        agent: &str,
        title: &str,
        content: &str,
        level: u8,
    ) -> Result<UpsertOutcome, String> {
        if !(1..=6).contains(&level) {
            return Err(format!("invalid header level {} (must be 1-6)", level));
        }

        let path = self.path_for(agent)?;
        let text = self.load(agent)?.unwrap_or_default();

        let action = match section::find(&section::scan(&text), title) {
            Some(_) => UpsertAction::Updated,
            None => UpsertAction::Created,
        };

        let patched = patch::upsert(&text, title, content, level);

        fs::create_dir_all(&self.root)
            .map_err(|e| format!("creating {}: {}", self.root.display(), e))?;
        fs::write(&path, &patched).map_err(|e| format!("writing {}: {}", path.display(), e))?;

        Ok(UpsertOutcome {
            path,
            title: title.to_string(),
            level,
            action,
        })
    }

    /// Delete an agent's memory document.
    pub fn remove(&self, agent: &str) -> Result<PathBuf, String> {
        let path = self.path_for(agent)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(format!("no memory document for agent '{}'", agent))
            }
            Err(e) => Err(format!("removing {}: {}", path.display(), e)),
        }
    }

    /// Enumerate memory documents under the root, sorted by name.
    /// A missing root directory means no agents, not an error.
    pub fn list_agents(&self) -> Result<Vec<AgentEntry>, String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(format!("reading {}: {}", self.root.display(), e)),
        };

        let mut agents = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "md") {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            agents.push(AgentEntry { name, path, modified });
        }

        agents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(agents)
    }

    pub fn no_document_hint(&self, agent: &str) -> String {
        format!(
            "no memory document for agent '{}' yet; run 'recall upsert {} <title>' to create one",
            agent, agent
        )
    }
}

/// Completer for agent ids - returns every agent under the resolved root.
pub fn complete_agent_ids(_current: &OsStr) -> Vec<CompletionCandidate> {
    let loaded = config::load_config();
    let store = MemoryStore::new(resolve_root(None, &loaded.config));

    match store.list_agents() {
        Ok(entries) => entries
            .into_iter()
            .map(|e| CompletionCandidate::new(e.name))
            .collect(),
        Err(_) => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> MemoryStore {
        MemoryStore::new(dir.path().join("memory"))
    }

    #[test]
    fn test_sanitize_agent_id() {
        let cases = vec![
            ("claude", Ok("claude")),
            ("agent-1", Ok("agent-1")),
            ("team/lead", Ok("team_lead")),
            ("a b c", Ok("a_b_c")),
            ("session.2026-08-07", Ok("session.2026-08-07")),
            ("  padded  ", Ok("padded")),
            ("../escape", Ok(".._escape")),
            ("", Err(())),
            ("...", Err(())),
            ("///", Err(())),
        ];

        for (id, want) in cases {
            let got = sanitize_agent_id(id);
            match want {
                Ok(s) => assert_eq!(got.as_deref(), Ok(s), "sanitize({:?})", id),
                Err(()) => assert!(got.is_err(), "sanitize({:?}) should be rejected", id),
            }
        }
    }

    #[test]
    fn test_upsert_creates_document_and_directory() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let outcome = store.upsert("claude", "Notes", "hello", 3).expect("upsert failed");
        assert_eq!(outcome.action, UpsertAction::Created);
        assert!(outcome.path.ends_with("claude.md"));

        let text = store.load("claude").unwrap().expect("document missing");
        assert_eq!(text, "### Notes\n\nhello\n");
    }

    #[test]
    fn test_upsert_reports_updated_for_existing_title() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.upsert("claude", "Notes", "hello", 3).unwrap();
        let outcome = store.upsert("claude", "notes", "revised", 3).unwrap();
        assert_eq!(outcome.action, UpsertAction::Updated);

        let text = store.load("claude").unwrap().unwrap();
        assert!(text.contains("revised"));
        assert!(!text.contains("hello"));
    }

    #[test]
    fn test_upsert_rejects_out_of_range_level() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.upsert("claude", "Notes", "x", 0).is_err());
        assert!(store.upsert("claude", "Notes", "x", 7).is_err());
        // No document was written by the rejected calls
        assert!(store.load("claude").unwrap().is_none());
    }

    #[test]
    fn test_lookup_distinguishes_no_document_from_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        match store.lookup("claude", "Notes").unwrap() {
            SectionLookup::NoDocument { hint } => {
                assert!(hint.contains("upsert"), "hint should point at upsert: {}", hint)
            }
            other => panic!("expected NoDocument, got {:?}", other),
        }

        store.upsert("claude", "Skills", "- Rust", 2).unwrap();

        match store.lookup("claude", "Notes").unwrap() {
            SectionLookup::NotFound { available } => {
                assert_eq!(available, vec!["Skills"])
            }
            other => panic!("expected NotFound, got {:?}", other),
        }

        match store.lookup("claude", "skills").unwrap() {
            SectionLookup::Found(s) => {
                assert_eq!(s.title, "Skills");
                assert_eq!(s.content, "- Rust");
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_sections_none_without_document() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.sections("claude").unwrap().is_none());

        store.upsert("claude", "A", "a", 2).unwrap();
        store.upsert("claude", "B", "b", 2).unwrap();

        let sections = store.sections("claude").unwrap().expect("document missing");
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_load_normalizes_crlf() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.root().join("claude.md"), "## Notes\r\n\r\nhello\r\n").unwrap();

        let text = store.load("claude").unwrap().unwrap();
        assert_eq!(text, "## Notes\n\nhello\n");

        let sections = store.sections("claude").unwrap().unwrap();
        assert_eq!(sections[0].title, "Notes");
        assert_eq!(sections[0].content, "hello");
    }

    #[test]
    fn test_list_agents() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.list_agents().unwrap().is_empty(), "missing root lists empty");

        store.upsert("beta", "Notes", "b", 2).unwrap();
        store.upsert("alpha", "Notes", "a", 2).unwrap();
        fs::write(store.root().join("ignored.txt"), "not markdown").unwrap();

        let agents = store.list_agents().unwrap();
        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.remove("claude").is_err(), "removing absent document errors");

        store.upsert("claude", "Notes", "x", 2).unwrap();
        let path = store.remove("claude").unwrap();
        assert!(!path.exists());
        assert!(store.load("claude").unwrap().is_none());
    }

    #[test]
    fn test_same_sanitized_id_shares_a_document() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.upsert("team lead", "Notes", "x", 2).unwrap();
        let outcome = store.upsert("team/lead", "Notes", "y", 2).unwrap();
        assert_eq!(outcome.action, UpsertAction::Updated);
    }
}
