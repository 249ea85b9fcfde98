//! Shared types for the FTP crate.

use crate::ftp::parser::parse_mlst_time;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─── Connection / Session ────────────────────────────────────────────

/// Configuration for a single control session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Translate names from/to ISO-8859-15 when the server lacks UTF8.
    #[serde(default)]
    pub translate_encoding: bool,
    /// Keep `.` and `..` in MLSD listings.
    #[serde(default)]
    pub list_dot_entries: bool,
    /// Control-socket dial timeout in seconds (0 = wait for the OS).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_sec: u64,
}

fn default_port() -> u16 {
    21
}
fn default_connect_timeout() -> u64 {
    15
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            translate_encoding: false,
            list_dot_entries: false,
            connect_timeout_sec: default_connect_timeout(),
        }
    }
}

impl SessionConfig {
    /// Build a config from `host:port` or `[v6-host]:port`.
    pub fn from_addr(addr: &str) -> Option<Self> {
        let (host, port) = addr.rsplit_once(':')?;
        let port = port.parse::<u16>().ok()?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() || (host.contains(':') && !addr.starts_with('[')) {
            return None;
        }
        Some(Self {
            host: host.to_string(),
            port,
            ..Self::default()
        })
    }
}

// ─── File modes ──────────────────────────────────────────────────────

/// Permission bits plus type flags, as exposed through [`FileInfo`](crate::ftp::FileInfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const DIR: u32 = 1 << 31;
    pub const SYMLINK: u32 = 1 << 27;
    pub const PERM_MASK: u32 = 0o777;

    pub fn is_dir(self) -> bool {
        self.0 & Self::DIR != 0
    }

    pub fn is_symlink(self) -> bool {
        self.0 & Self::SYMLINK != 0
    }

    pub fn perm(self) -> u32 {
        self.0 & Self::PERM_MASK
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_dir() {
            'd'
        } else if self.is_symlink() {
            'L'
        } else {
            '-'
        };
        write!(f, "{}", kind)?;
        for (i, c) in "rwxrwxrwx".chars().enumerate() {
            let bit = 1 << (8 - i);
            write!(f, "{}", if self.0 & bit != 0 { c } else { '-' })?;
        }
        Ok(())
    }
}

// ─── Directory Listing ───────────────────────────────────────────────

/// Type of an entry reported by LIST.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EntryType {
    File,
    Directory,
    Symlink,
}

/// One entry parsed from a Unix-style LIST line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryType,
    /// Size in bytes; always 0 for directories and links.
    pub size: u64,
    pub time: DateTime<Local>,
}

/// One entry from an MLSD listing or MLST reply.
///
/// Facts are stored raw; the accessors interpret them on demand and fall
/// back to zero values when a fact is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactEntry {
    name: String,
    /// Lowercased fact name → raw value (`size`, `modify`, `type`, `perm`, …).
    pub facts: HashMap<String, String>,
}

impl FactEntry {
    pub fn new(name: impl Into<String>, facts: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            facts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fact(&self, key: &str) -> Option<&str> {
        self.facts.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn size(&self) -> u64 {
        self.fact("size")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0)
    }

    pub fn mode(&self) -> FileMode {
        let mut mode = 0;
        if let Some(perm) = self.fact("perm") {
            if perm.contains('r') {
                mode |= 0o400;
            }
            if perm.contains('w') {
                mode |= 0o200;
            }
        }
        if self.is_dir() {
            mode |= FileMode::DIR;
        }
        FileMode(mode)
    }

    /// Last modification time, or the Unix epoch when unknown.
    pub fn mod_time(&self) -> DateTime<Utc> {
        self.fact("modify")
            .and_then(|s| parse_mlst_time(s).ok())
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.fact("type"), Some("dir") | Some("cdir") | Some("pdir"))
    }
}
