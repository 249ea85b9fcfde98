//! Transfer engine: REST / RETR / STOR sequencing.
//!
//! Every data command follows the same order: open the data connection,
//! send `REST` when resuming, send the command, require `125`/`150`, move
//! the payload, close the data socket, require `226`.

use crate::ftp::client::FtpSession;
use crate::ftp::data::DataConnection;
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::protocol::command_line;
use crate::ftp::reply::Expect;
use crate::ftp::status;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::net::TcpStream;

impl FtpSession {
    /// Run a command that needs a data connection.
    ///
    /// `offset` is a restart marker: nonzero sends exactly one `REST offset`
    /// before `cmd`; zero sends none. On any failure the freshly opened data
    /// socket is closed before the error is returned. `cmd` is sent as
    /// given, without path transcoding.
    pub async fn data_command(&mut self, offset: u64, cmd: &str) -> FtpResult<DataConnection<'_>> {
        self.data_line(offset, cmd.as_bytes()).await
    }

    /// [`data_command`](Self::data_command) for `VERB path`, with the path in
    /// the server encoding.
    pub(crate) async fn data_path_command(
        &mut self,
        offset: u64,
        verb: &str,
        path: &str,
    ) -> FtpResult<DataConnection<'_>> {
        let line = command_line(self.encoding(), verb, path);
        self.data_line(offset, &line).await
    }

    async fn data_line(&mut self, offset: u64, line: &[u8]) -> FtpResult<DataConnection<'_>> {
        let stream = self.open_data_stream().await?;
        match self.start_transfer(offset, line).await {
            Ok(()) => Ok(DataConnection::new(stream, self)),
            Err(e) => {
                discard(stream).await;
                Err(e)
            }
        }
    }

    async fn start_transfer(&mut self, offset: u64, line: &[u8]) -> FtpResult<()> {
        if offset != 0 {
            self.send_command(
                Expect::Code(status::REQUEST_FILE_PENDING),
                &format!("REST {}", offset),
            )
            .await?;
        }

        let reply = self.codec.execute_line(line, Expect::AcceptAny).await?;
        if reply.code != status::ALREADY_OPEN && reply.code != status::ABOUT_TO_SEND {
            return Err(FtpError::unexpected_reply(reply.code, reply.message()));
        }
        Ok(())
    }

    // ─── DOWNLOAD (RETR) ─────────────────────────────────────────

    /// Fetch a remote file as a byte stream.
    ///
    /// Read the returned handle to the end, then call
    /// [`DataConnection::finish`].
    pub async fn retr(&mut self, path: &str) -> FtpResult<DataConnection<'_>> {
        self.retr_from(path, 0).await
    }

    /// Fetch a remote file, skipping its first `offset` bytes.
    pub async fn retr_from(&mut self, path: &str, offset: u64) -> FtpResult<DataConnection<'_>> {
        log::debug!("Retrieving '{}' from offset {}", path, offset);
        self.data_path_command(offset, "RETR", path).await
    }

    // ─── UPLOAD (STOR) ───────────────────────────────────────────

    /// Store `reader`'s content as a remote file. Returns the bytes sent.
    pub async fn stor<R>(&mut self, path: &str, reader: &mut R) -> FtpResult<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.stor_from(path, reader, 0).await
    }

    /// Store `reader`'s content, with the server writing from `offset`.
    ///
    /// If copying fails the data socket is still closed, but the closing
    /// reply is not read.
    pub async fn stor_from<R>(&mut self, path: &str, reader: &mut R, offset: u64) -> FtpResult<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        log::debug!("Storing '{}' from offset {}", path, offset);
        let mut conn = self.data_path_command(offset, "STOR", path).await?;

        match tokio::io::copy(reader, &mut conn).await {
            Ok(sent) => {
                conn.finish().await?;
                Ok(sent)
            }
            Err(e) => {
                conn.close_without_reply().await;
                Err(e.into())
            }
        }
    }
}

async fn discard(mut stream: TcpStream) {
    if let Err(e) = stream.shutdown().await {
        log::debug!("Closing unused data socket: {}", e);
    }
}
