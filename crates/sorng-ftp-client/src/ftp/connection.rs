//! TCP transport: establishes the FTP control connection.
//!
//! Dials the server (honouring `connect_timeout_sec`) and consumes the
//! greeting, which must be `220 Service ready`. Any other greeting gets a
//! best-effort `QUIT` before the socket is closed.

use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::protocol::FtpCodec;
use crate::ftp::reply::{Expect, Reply};
use crate::ftp::status;
use crate::ftp::types::SessionConfig;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Establish the control connection and return a ready-to-use codec
/// **plus** the server greeting.
pub async fn connect(config: &SessionConfig) -> FtpResult<(FtpCodec, Reply)> {
    let target = (config.host.as_str(), config.port);

    let dial = TcpStream::connect(target);
    let tcp = if config.connect_timeout_sec > 0 {
        let dur = Duration::from_secs(config.connect_timeout_sec);
        timeout(dur, dial).await.map_err(|_| {
            FtpError::connection_failed(format!(
                "TCP connect to {}:{} timed out",
                config.host, config.port
            ))
        })?
    } else {
        dial.await
    }
    .map_err(|e| {
        FtpError::connection_failed(format!(
            "TCP connect to {}:{}: {}",
            config.host, config.port, e
        ))
    })?;

    tcp.set_nodelay(true).ok();

    let mut codec = FtpCodec::from_tcp(tcp);
    match codec.read_expected(Expect::Code(status::READY)).await {
        Ok(greeting) => Ok((codec, greeting)),
        Err(e) => {
            codec.abandon().await;
            Err(e)
        }
    }
}
