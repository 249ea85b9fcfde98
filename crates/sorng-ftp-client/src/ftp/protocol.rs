//! Low-level FTP command/reply codec (RFC 959 §4).
//!
//! Handles:
//! - Sending FTP commands terminated with `\r\n`
//! - Reading single-line and multi-line replies
//! - Decoding reply text per the server encoding; path arguments are
//!   encoded by [`command_line`]

use crate::ftp::encoding::ServerEncoding;
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::reply::{Expect, PendingReply, Reply};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// The FTP command/reply codec operating on split halves of the control socket.
pub struct FtpCodec {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    encoding: ServerEncoding,
}

impl FtpCodec {
    pub fn from_tcp(stream: TcpStream) -> Self {
        let (rd, wr) = stream.into_split();
        Self {
            reader: BufReader::new(rd),
            writer: wr,
            encoding: ServerEncoding::Utf8,
        }
    }

    pub fn encoding(&self) -> ServerEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: ServerEncoding) {
        self.encoding = encoding;
    }

    /// Send one command line; CRLF is appended here.
    ///
    /// The bytes go out as given. Only path arguments are transcoded, and
    /// that happens when the line is built (see [`command_line`]).
    pub async fn send_line(&mut self, line: &[u8]) -> FtpResult<()> {
        let mut framed = Vec::with_capacity(line.len() + 2);
        framed.extend_from_slice(line);
        framed.extend_from_slice(b"\r\n");
        self.writer.write_all(&framed).await?;
        self.writer.flush().await?;
        if line.starts_with(b"PASS ") {
            log::trace!(">>> PASS ****");
        } else {
            log::trace!(">>> {}", String::from_utf8_lossy(line));
        }
        Ok(())
    }

    /// Send a command whose arguments are sent untranslated (USER, PASS, TYPE...).
    pub async fn send_command(&mut self, cmd: &str) -> FtpResult<()> {
        self.send_line(cmd.as_bytes()).await
    }

    /// Read one control line, without its line terminator.
    async fn read_line(&mut self) -> FtpResult<String> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Err(FtpError::disconnected("Server closed connection"));
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        Ok(self.encoding.from_server(&buf))
    }

    /// Read a complete FTP reply (possibly multi-line).
    ///
    /// Multi-line replies look like:
    /// ```text
    /// 211-Features:
    ///  EPSV
    ///  UTF8
    /// 211 End
    /// ```
    pub async fn read_reply(&mut self) -> FtpResult<Reply> {
        let first = self.read_line().await?;
        let mut pending = PendingReply::begin(&first)?;
        while !pending.is_complete() {
            let next = self.read_line().await?;
            pending.push(&next);
        }
        let reply = pending.finish();
        log::trace!(
            "<<< {} {}",
            reply.code,
            reply.lines.last().map(String::as_str).unwrap_or("")
        );
        Ok(reply)
    }

    /// Read one reply and apply the expected-code check.
    pub async fn read_expected(&mut self, expect: Expect) -> FtpResult<Reply> {
        self.read_reply().await?.check(expect)
    }

    /// Send a command and read exactly one reply.
    pub async fn execute(&mut self, cmd: &str, expect: Expect) -> FtpResult<Reply> {
        self.execute_line(cmd.as_bytes(), expect).await
    }

    /// Send a prebuilt command line and read exactly one reply.
    pub async fn execute_line(&mut self, line: &[u8], expect: Expect) -> FtpResult<Reply> {
        self.send_line(line).await?;
        self.read_expected(expect).await
    }

    /// Best-effort `QUIT` and close, used when a session is being abandoned.
    pub async fn abandon(&mut self) {
        if let Err(e) = self.send_command("QUIT").await {
            log::debug!("QUIT while abandoning session: {}", e);
        }
        if let Err(e) = self.shutdown().await {
            log::debug!("Control socket shutdown: {}", e);
        }
    }

    /// Close the write side of the control socket.
    pub async fn shutdown(&mut self) -> FtpResult<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

/// Build `VERB path` with the path in the server encoding. An empty path
/// yields the bare verb.
pub fn command_line(encoding: ServerEncoding, verb: &str, path: &str) -> Vec<u8> {
    let mut line = verb.as_bytes().to_vec();
    if !path.is_empty() {
        line.push(b' ');
        line.extend(encoding.to_server(path));
    }
    line
}
