//! Saved search store
//!
//! One pretty-printed JSON file per search under the session directory.
//! Refinement overwrites the file it was loaded from; nothing is ever
//! deleted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Company, Result, ScoutError};

/// One line of the refinement transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A persisted search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub initial_prompt: String,
    pub timestamp: NaiveDateTime,
    pub last_updated: NaiveDateTime,
    pub company_count: usize,
    pub companies: Vec<Company>,
    pub conversation: Vec<TranscriptEntry>,
}

/// On-disk shape accepted by `load`
///
/// Every field may be missing so that anything `list` shows can be opened.
#[derive(Debug, Deserialize)]
struct StoredSession {
    #[serde(default)]
    initial_prompt: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    company_count: Option<usize>,
    #[serde(default)]
    companies: Vec<Company>,
    #[serde(default)]
    conversation: Vec<TranscriptEntry>,
}

impl StoredSession {
    /// Fill gaps: timestamps fall back to each other, then to `now`
    fn into_session(self, now: NaiveDateTime) -> Session {
        let parse = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|t| t.parse::<NaiveDateTime>().ok())
        };
        let created = parse(&self.timestamp);
        let updated = parse(&self.last_updated);
        let timestamp = created.or(updated).unwrap_or(now);

        Session {
            initial_prompt: self.initial_prompt.unwrap_or_default(),
            timestamp,
            last_updated: updated.unwrap_or(timestamp),
            company_count: self.company_count.unwrap_or(self.companies.len()),
            companies: self.companies,
            conversation: self.conversation,
        }
    }
}

/// Listing row for the browse menu
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub path: PathBuf,
    pub filename: String,
    /// First 60 characters of the initial prompt
    pub prompt: String,
    pub company_count: usize,
    /// Last update time as stored, falling back to creation time
    pub timestamp: String,
}

/// Loosely-typed view used for listing, so older files still show up
#[derive(Debug, Deserialize)]
struct SessionHeader {
    #[serde(default)]
    initial_prompt: Option<String>,
    #[serde(default)]
    company_count: Option<usize>,
    #[serde(default)]
    companies: Vec<IgnoredAny>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// Replace everything outside `[A-Za-z0-9_]` with `_`
pub fn sanitize_hint(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Directory-backed session storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a search
    ///
    /// With `existing`, that file is overwritten and keeps its original
    /// creation timestamp. Otherwise a new `<YYYYmmdd_HHMMSS>_<hint>.json`
    /// is created.
    pub fn save(
        &self,
        prompt: &str,
        companies: &[Company],
        hint: &str,
        conversation: &[TranscriptEntry],
        existing: Option<&Path>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let now = Local::now().naive_local();
        let (path, created) = match existing {
            Some(path) => {
                let created = self
                    .load(path)
                    .map(|previous| previous.timestamp)
                    .unwrap_or(now);
                (path.to_path_buf(), created)
            }
            None => (self.new_path(hint, now), now),
        };

        let conversation = if conversation.is_empty() {
            vec![TranscriptEntry::user(prompt)]
        } else {
            conversation.to_vec()
        };

        let session = Session {
            initial_prompt: prompt.to_string(),
            timestamp: created,
            last_updated: now,
            company_count: companies.len(),
            companies: companies.to_vec(),
            conversation,
        };

        fs::write(&path, serde_json::to_string_pretty(&session)?)?;
        debug!(path = %path.display(), companies = session.company_count, "Saved search");
        Ok(path)
    }

    fn new_path(&self, hint: &str, now: NaiveDateTime) -> PathBuf {
        let mut hint = sanitize_hint(hint);
        if hint.is_empty() {
            hint = "search".to_string();
        }
        self.dir
            .join(format!("{}_{}.json", now.format("%Y%m%d_%H%M%S"), hint))
    }

    /// Read a saved search back
    pub fn load(&self, path: &Path) -> Result<Session> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScoutError::session(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let stored: StoredSession = serde_json::from_str(&content).map_err(|e| {
            ScoutError::session(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(stored.into_session(Local::now().naive_local()))
    }

    /// Every readable saved search, newest filename first
    pub fn list(&self) -> Vec<SessionSummary> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        paths.reverse();

        paths
            .into_iter()
            .filter_map(|path| {
                let header: SessionHeader = match fs::read_to_string(&path)
                    .map_err(ScoutError::from)
                    .and_then(|content| Ok(serde_json::from_str(&content)?))
                {
                    Ok(header) => header,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable search");
                        return None;
                    }
                };

                Some(SessionSummary {
                    filename: path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    prompt: header
                        .initial_prompt
                        .unwrap_or_else(|| "Unknown".to_string())
                        .chars()
                        .take(60)
                        .collect(),
                    company_count: header.company_count.unwrap_or(header.companies.len()),
                    timestamp: header
                        .last_updated
                        .or(header.timestamp)
                        .unwrap_or_else(|| "Unknown".to_string()),
                    path,
                })
            })
            .collect()
    }
}
