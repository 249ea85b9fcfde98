//! Data-connection negotiation for FTP transfers.
//!
//! Two passive modes are used (RFC 959 + RFC 2428):
//! - **PASV**: server opens a port, client connects
//! - **EPSV**: extended passive, port only
//!
//! Servers advertising `EPSV` or `nat6` go straight to EPSV. Everyone else
//! gets PASV first and EPSV only if PASV yields no usable port. Either way
//! the client dials the control host, never the address inside the reply.

use crate::ftp::client::FtpSession;
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::reply::Expect;
use crate::ftp::status;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::net::TcpStream;

lazy_static! {
    static ref PASV_RE: Regex = Regex::new(
        r"\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)"
    )
    .expect("valid PASV regex");
}

/// Delimiter used in `EPSV` replies.
pub const EPSV_DELIMITER: char = '|';

impl FtpSession {
    /// Obtain a port from the server and dial it.
    pub(crate) async fn open_data_stream(&mut self) -> FtpResult<TcpStream> {
        let epsv_aware = self.has_feature("nat6") || self.has_feature("EPSV");

        let mut port = 0;
        if !epsv_aware {
            match self.pasv().await {
                Ok(p) => port = p,
                Err(e) => log::debug!("PASV unusable, falling back to EPSV: {}", e),
            }
        }
        if port == 0 {
            port = self.epsv().await?;
        }

        log::debug!("Opening data connection to {}:{}", self.host(), port);
        TcpStream::connect((self.host(), port)).await.map_err(|e| {
            FtpError::connection_failed(format!(
                "Data connect to {}:{}: {}",
                self.host(),
                port,
                e
            ))
        })
    }

    /// Issue `PASV` and return the announced port.
    async fn pasv(&mut self) -> FtpResult<u16> {
        let reply = self
            .send_command(Expect::Code(status::PASSIVE_MODE), "PASV")
            .await?;
        parse_pasv_reply(&reply.message())
    }

    /// Issue `EPSV` and return the announced port.
    async fn epsv(&mut self) -> FtpResult<u16> {
        let reply = self
            .send_command(Expect::Code(status::EXTENDED_PASSIVE_MODE), "EPSV")
            .await?;
        parse_epsv_reply(&reply.message())
    }
}

// ─── PASV ────────────────────────────────────────────────────────────

/// Parse `(h1,h2,h3,h4,p1,p2)` from a 227 reply; the port is `p1*256+p2`.
pub fn parse_pasv_reply(text: &str) -> FtpResult<u16> {
    let caps = PASV_RE
        .captures(text)
        .ok_or_else(|| FtpError::format(format!("Invalid PASV reply: {}", text)))?;

    let octet = |i: usize| {
        caps[i]
            .parse::<u8>()
            .map_err(|_| FtpError::format(format!("PASV number out of range: {}", text)))
    };
    // Host octets are validated but unused: the control host is dialled.
    for i in 1..=4 {
        octet(i)?;
    }
    let p1 = octet(5)? as u16;
    let p2 = octet(6)? as u16;
    Ok(p1 * 256 + p2)
}

// ─── EPSV ────────────────────────────────────────────────────────────

/// Parse `|||port|` from a 229 reply.
pub fn parse_epsv_reply(text: &str) -> FtpResult<u16> {
    parse_epsv_reply_with(text, EPSV_DELIMITER)
}

/// Parse an EPSV reply using an arbitrary single-character delimiter.
pub fn parse_epsv_reply_with(text: &str, delimiter: char) -> FtpResult<u16> {
    let invalid = || FtpError::format(format!("Invalid EPSV reply: {}", text));

    let opener: String = std::iter::repeat(delimiter).take(3).collect();
    let start = text.find(&opener).ok_or_else(invalid)? + opener.len();
    let end = start + text[start..].find(delimiter).ok_or_else(invalid)?;
    text[start..end].trim().parse::<u16>().map_err(|_| invalid())
}
