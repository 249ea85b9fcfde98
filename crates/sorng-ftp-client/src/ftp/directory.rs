//! Directory operations: listings, MLST, mkdir, rmdir, rename, delete.

use crate::ftp::client::FtpSession;
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::parser::{parse_list_line_at, parse_mlsx_line};
use crate::ftp::reply::Expect;
use crate::ftp::status;
use crate::ftp::types::{DirectoryEntry, FactEntry};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

impl FtpSession {
    // ─── Listings ────────────────────────────────────────────────

    /// `NLST`: bare names.
    pub async fn name_list(&mut self, path: &str) -> FtpResult<Vec<String>> {
        let raw = self.fetch_lines("NLST", path).await?;
        let encoding = self.encoding();
        Ok(raw
            .iter()
            .filter(|l| !l.is_empty())
            .map(|l| encoding.from_server(l))
            .collect())
    }

    /// `LIST`: Unix-style lines. Lines that do not parse are skipped.
    pub async fn list(&mut self, path: &str) -> FtpResult<Vec<DirectoryEntry>> {
        let raw = self.fetch_lines("LIST", path).await?;
        let encoding = self.encoding();
        let now = Local::now();

        let mut entries = Vec::new();
        for line in raw.iter().map(|l| encoding.from_server(l)) {
            match parse_list_line_at(&line, now) {
                Ok(entry) => entries.push(entry),
                Err(e) => log::warn!("Skipping LIST line: {}", e),
            }
        }
        Ok(entries)
    }

    /// `MLSD`: RFC 3659 fact lines. `.` and `..` are dropped unless
    /// `list_dot_entries` is set; lines that do not parse are skipped.
    pub async fn mlist(&mut self, path: &str) -> FtpResult<Vec<FactEntry>> {
        let raw = self.fetch_lines("MLSD", path).await?;
        let encoding = self.encoding();
        let keep_dots = self.list_dot_entries();

        let mut entries = Vec::new();
        for line in raw.iter().map(|l| encoding.from_server(l)) {
            match parse_mlsx_line(&line) {
                Ok(entry) if keep_dots || !is_dot_entry(entry.name()) => entries.push(entry),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping MLSD line: {}", e),
            }
        }
        Ok(entries)
    }

    /// `MLST`: facts for a single entry, carried on the control channel.
    ///
    /// The reply must be exactly three lines, the middle one being a
    /// space followed by the fact line.
    pub async fn minfo(&mut self, path: &str) -> FtpResult<FactEntry> {
        let reply = self
            .send_path_command(Expect::Code(status::REQUESTED_FILE_ACTION_OK), "MLST", path)
            .await?;

        match reply.lines.as_slice() {
            [_, facts, _] if facts.len() > 1 => {
                let mut chars = facts.chars();
                chars.next();
                parse_mlsx_line(chars.as_str())
            }
            _ => Err(FtpError::format(format!(
                "Unexpected MLST reply: {}",
                reply.message()
            ))),
        }
    }

    /// Run a listing command and collect the raw data-connection lines.
    ///
    /// The closing reply is always read, and its error wins over a clean read.
    async fn fetch_lines(&mut self, verb: &str, path: &str) -> FtpResult<Vec<Vec<u8>>> {
        let mut conn = self.data_path_command(0, verb, path).await?;
        let lines = read_lines(&mut conn).await;
        conn.finish().await?;
        lines
    }

    // ─── MKD / RMD ───────────────────────────────────────────────

    /// Create a directory on the remote server.
    pub async fn make_dir(&mut self, path: &str) -> FtpResult<()> {
        self.send_path_command(Expect::Code(status::PATH_CREATED), "MKD", path)
            .await?;
        Ok(())
    }

    /// Remove an empty directory.
    pub async fn remove_dir(&mut self, path: &str) -> FtpResult<()> {
        self.send_path_command(Expect::Code(status::REQUESTED_FILE_ACTION_OK), "RMD", path)
            .await?;
        Ok(())
    }

    // ─── RNFR / RNTO / DELE ──────────────────────────────────────

    /// Rename (or move) a file or directory.
    pub async fn rename(&mut self, from: &str, to: &str) -> FtpResult<()> {
        self.send_path_command(Expect::Code(status::REQUEST_FILE_PENDING), "RNFR", from)
            .await?;
        self.send_path_command(Expect::Code(status::REQUESTED_FILE_ACTION_OK), "RNTO", to)
            .await?;
        Ok(())
    }

    /// Delete a remote file.
    pub async fn delete(&mut self, path: &str) -> FtpResult<()> {
        self.send_path_command(Expect::Code(status::REQUESTED_FILE_ACTION_OK), "DELE", path)
            .await?;
        Ok(())
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

/// Split a data stream into lines without their terminators. A final
/// unterminated line is kept.
async fn read_lines<R: AsyncRead + Unpin>(reader: R) -> FtpResult<Vec<Vec<u8>>> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    loop {
        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        lines.push(buf);
    }
    Ok(lines)
}
