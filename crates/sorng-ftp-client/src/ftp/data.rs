//! Data-connection handle for one transfer.
//!
//! The handle owns the data socket and mutably borrows the session that
//! opened it. [`DataConnection::finish`] closes the socket and then reads the
//! `226` closing reply on the control channel. Dropping the handle without
//! `finish` leaves that reply unread and the next command will see it.

use crate::ftp::client::FtpSession;
use crate::ftp::error::FtpResult;
use crate::ftp::reply::Expect;
use crate::ftp::status;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;

pub struct DataConnection<'a> {
    stream: TcpStream,
    session: &'a mut FtpSession,
}

impl<'a> DataConnection<'a> {
    pub(crate) fn new(stream: TcpStream, session: &'a mut FtpSession) -> Self {
        Self { stream, session }
    }

    /// Close the data socket, then require the closing-data-connection reply.
    ///
    /// A bad closing reply is reported even if the payload moved cleanly.
    pub async fn finish(self) -> FtpResult<()> {
        let DataConnection {
            mut stream,
            session,
        } = self;
        if let Err(e) = stream.shutdown().await {
            log::debug!("Data socket shutdown: {}", e);
        }
        drop(stream);

        session
            .codec
            .read_expected(Expect::Code(status::CLOSING_DATA_CONNECTION))
            .await?;
        Ok(())
    }

    /// Close the data socket without reading the closing reply.
    pub(crate) async fn close_without_reply(self) {
        let DataConnection { mut stream, .. } = self;
        if let Err(e) = stream.shutdown().await {
            log::debug!("Data socket shutdown after failed copy: {}", e);
        }
    }
}

impl AsyncRead for DataConnection<'_> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for DataConnection<'_> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().stream).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_shutdown(cx)
    }
}
