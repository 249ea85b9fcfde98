//! File-info capability shared by both entry kinds, and a small
//! filesystem facade over a session.

use crate::ftp::client::FtpSession;
use crate::ftp::error::FtpResult;
use crate::ftp::types::{DirectoryEntry, EntryType, FactEntry, FileMode};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filesystem-style view of a remote entry.
pub trait FileInfo: Send + Sync {
    fn name(&self) -> &str;
    fn size(&self) -> u64;
    fn mode(&self) -> FileMode;
    fn mod_time(&self) -> DateTime<Utc>;
    fn is_dir(&self) -> bool;
}

impl FileInfo for FactEntry {
    fn name(&self) -> &str {
        FactEntry::name(self)
    }

    fn size(&self) -> u64 {
        FactEntry::size(self)
    }

    fn mode(&self) -> FileMode {
        FactEntry::mode(self)
    }

    fn mod_time(&self) -> DateTime<Utc> {
        FactEntry::mod_time(self)
    }

    fn is_dir(&self) -> bool {
        FactEntry::is_dir(self)
    }
}

impl FileInfo for DirectoryEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    /// LIST entries only carry their type.
    fn mode(&self) -> FileMode {
        match self.kind {
            EntryType::File => FileMode(0),
            EntryType::Directory => FileMode(FileMode::DIR),
            EntryType::Symlink => FileMode(FileMode::SYMLINK),
        }
    }

    fn mod_time(&self) -> DateTime<Utc> {
        self.time.with_timezone(&Utc)
    }

    fn is_dir(&self) -> bool {
        self.kind == EntryType::Directory
    }
}

/// Directory reading and stat over a remote filesystem.
#[async_trait]
pub trait FileSystem {
    async fn read_dir(&mut self, dirname: &str) -> FtpResult<Vec<Box<dyn FileInfo>>>;

    /// Describe `name` itself; links are not followed.
    async fn lstat(&mut self, name: &str) -> FtpResult<Box<dyn FileInfo>>;

    fn join(&self, elems: &[&str]) -> String;
}

#[async_trait]
impl FileSystem for FtpSession {
    async fn read_dir(&mut self, dirname: &str) -> FtpResult<Vec<Box<dyn FileInfo>>> {
        let entries = self.mlist(dirname).await?;
        Ok(entries
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn FileInfo>)
            .collect())
    }

    async fn lstat(&mut self, name: &str) -> FtpResult<Box<dyn FileInfo>> {
        let entry = self.minfo(name).await?;
        Ok(Box::new(entry))
    }

    fn join(&self, elems: &[&str]) -> String {
        join_path(elems)
    }
}

/// Join slash-separated elements and clean the result: empty elements are
/// ignored, `.` is dropped and `..` removes the preceding element.
pub fn join_path(elems: &[&str]) -> String {
    let joined = elems
        .iter()
        .filter(|e| !e.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        return String::new();
    }
    clean_path(&joined)
}

fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::collections::HashMap;

    #[test]
    fn join_cleans_paths() {
        assert_eq!(join_path(&["/pub", "docs", "a.txt"]), "/pub/docs/a.txt");
        assert_eq!(join_path(&["a", "", "b/"]), "a/b");
        assert_eq!(join_path(&["/a/b", "../c"]), "/a/c");
        assert_eq!(join_path(&["/", ".."]), "/");
        assert_eq!(join_path(&["..", "x", "..", ".."]), "../..");
        assert_eq!(join_path(&["a", ".."]), ".");
        assert_eq!(join_path(&["", ""]), "");
    }

    #[test]
    fn list_entry_projection() {
        let time = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let dir = DirectoryEntry {
            name: "sub".into(),
            kind: EntryType::Directory,
            size: 0,
            time,
        };
        let info: &dyn FileInfo = &dir;
        assert!(info.is_dir());
        assert!(info.mode().is_dir());
        assert_eq!(info.mod_time(), time.with_timezone(&Utc));

        let link = DirectoryEntry {
            kind: EntryType::Symlink,
            ..dir
        };
        assert!(FileInfo::mode(&link).is_symlink());
        assert!(!FileInfo::is_dir(&link));
    }

    #[test]
    fn fact_entry_projection() {
        let mut facts = HashMap::new();
        facts.insert("type".to_string(), "file".to_string());
        facts.insert("size".to_string(), "7".to_string());
        let entry = FactEntry::new("notes.txt", facts);
        let info: Box<dyn FileInfo> = Box::new(entry);
        assert_eq!(info.name(), "notes.txt");
        assert_eq!(info.size(), 7);
        assert!(!info.is_dir());
        assert_eq!(info.mod_time(), DateTime::<Utc>::UNIX_EPOCH);
    }
}
