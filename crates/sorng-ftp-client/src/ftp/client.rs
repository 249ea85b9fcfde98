//! Stateful FTP control session: owns the control connection and issues commands.
//!
//! Lifecycle: `connect()` → greeting → FEAT → `login()` → commands → `quit()`.
//!
//! Exactly one command/reply exchange is in flight at a time: every helper
//! sends one line and consumes the complete reply before returning. Data
//! transfers borrow the session mutably (see `data.rs`), so nothing else can
//! be sent until the transfer's closing reply has been read.

use crate::ftp::connection;
use crate::ftp::encoding::ServerEncoding;
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::protocol::{command_line, FtpCodec};
use crate::ftp::reply::{Expect, Reply};
use crate::ftp::status;
use crate::ftp::types::SessionConfig;
use std::collections::HashMap;

/// A connected FTP control session.
pub struct FtpSession {
    pub(crate) codec: FtpCodec,
    host: String,
    greeting: String,
    /// FEAT command name (case as received) → parameters.
    features: HashMap<String, String>,
    translate_encoding: bool,
    list_dot_entries: bool,
}

impl FtpSession {
    /// Connect to `host:port` (or `[v6-host]:port`) with default settings.
    pub async fn connect(addr: &str) -> FtpResult<Self> {
        let config = SessionConfig::from_addr(addr)
            .ok_or_else(|| FtpError::invalid_config(format!("Invalid address '{}'", addr)))?;
        Self::connect_with(config).await
    }

    /// Connect using an explicit configuration.
    ///
    /// Reads the `220` greeting and runs feature discovery. Any failure in
    /// either step closes the control socket before the error is returned.
    pub async fn connect_with(config: SessionConfig) -> FtpResult<Self> {
        if config.host.is_empty() {
            return Err(FtpError::invalid_config("Host must not be empty"));
        }

        let (codec, greeting) = connection::connect(&config).await?;
        log::debug!("Connected to {}:{}: {}", config.host, config.port, greeting.message());

        let mut session = Self {
            codec,
            host: config.host,
            greeting: greeting.message(),
            features: HashMap::new(),
            translate_encoding: config.translate_encoding,
            list_dot_entries: config.list_dot_entries,
        };

        if let Err(e) = session.feat().await {
            session.codec.abandon().await;
            return Err(e);
        }
        session.refresh_encoding();
        Ok(session)
    }

    // ─── Authentication ──────────────────────────────────────────

    /// Authenticate, then switch the transfer type to binary (`TYPE I`).
    ///
    /// Credentials are sent as given; the server encoding only applies to paths.
    pub async fn login(&mut self, user: &str, password: &str) -> FtpResult<()> {
        let reply = self
            .send_command(Expect::AcceptAny, &format!("USER {}", user))
            .await?;

        match reply.code {
            status::LOGGED_IN => {}
            status::USER_OK => {
                let pass = self
                    .send_command(Expect::AcceptAny, &format!("PASS {}", password))
                    .await?;
                if pass.code != status::LOGGED_IN {
                    return Err(FtpError::auth_failed(pass.code, pass.message()));
                }
            }
            code => return Err(FtpError::auth_failed(code, reply.message())),
        }

        self.send_command(Expect::Code(status::COMMAND_OK), "TYPE I")
            .await?;
        Ok(())
    }

    /// Log the current user out (`REIN`); the connection stays open.
    pub async fn logout(&mut self) -> FtpResult<()> {
        self.send_command(Expect::Code(status::READY), "REIN").await?;
        Ok(())
    }

    // ─── Command helper ──────────────────────────────────────────

    /// Send one command line and read exactly one reply.
    ///
    /// With `Expect::Code` a different reply code becomes a protocol error
    /// carrying the received code and message; `Expect::AcceptAny` hands
    /// every reply back for inspection.
    pub async fn send_command(&mut self, expect: Expect, cmd: &str) -> FtpResult<Reply> {
        self.codec.execute(cmd, expect).await
    }

    /// Like [`send_command`](Self::send_command) for `VERB path`, with the
    /// path in the server encoding.
    pub(crate) async fn send_path_command(
        &mut self,
        expect: Expect,
        verb: &str,
        path: &str,
    ) -> FtpResult<Reply> {
        let line = command_line(self.encoding(), verb, path);
        self.codec.execute_line(&line, expect).await
    }

    // ─── FEAT discovery ──────────────────────────────────────────────

    /// Populate the feature map from `FEAT` (RFC 2389).
    ///
    /// A server that does not answer `211` simply has no extra features.
    async fn feat(&mut self) -> FtpResult<()> {
        let reply = self.send_command(Expect::AcceptAny, "FEAT").await?;
        if reply.code != status::SYSTEM {
            log::debug!("FEAT not supported ({}), assuming no features", reply.code);
            return Ok(());
        }

        for line in reply.lines.iter().filter(|l| l.starts_with(' ')) {
            let line = line.trim();
            let (command, desc) = line.split_once(' ').unwrap_or((line, ""));
            if command.is_empty() {
                continue;
            }
            self.features.insert(command.to_string(), desc.to_string());
        }
        log::debug!("Server features: {:?}", self.features.keys().collect::<Vec<_>>());
        Ok(())
    }

    // ─── Encoding policy ─────────────────────────────────────────

    /// Names are transcoded only when translation is enabled **and** the
    /// server did not advertise `UTF8`. A server without FEAT counts as not
    /// advertising it.
    fn refresh_encoding(&mut self) {
        let encoding = if self.translate_encoding && !self.has_feature("UTF8") {
            ServerEncoding::Latin9
        } else {
            ServerEncoding::Utf8
        };
        self.codec.set_encoding(encoding);
    }

    pub fn encoding(&self) -> ServerEncoding {
        self.codec.encoding()
    }

    pub fn translate_encoding(&self) -> bool {
        self.translate_encoding
    }

    pub fn set_translate_encoding(&mut self, enabled: bool) {
        self.translate_encoding = enabled;
        self.refresh_encoding();
    }

    pub fn list_dot_entries(&self) -> bool {
        self.list_dot_entries
    }

    pub fn set_list_dot_entries(&mut self, enabled: bool) {
        self.list_dot_entries = enabled;
    }

    // ─── Accessors ───────────────────────────────────────────────

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn features(&self) -> &HashMap<String, String> {
        &self.features
    }

    /// Case-sensitive membership check against the FEAT names.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    // ─── PWD / CWD / CDUP ────────────────────────────────────────

    /// Change into `path`.
    pub async fn change_dir(&mut self, path: &str) -> FtpResult<()> {
        self.send_path_command(Expect::Code(status::REQUESTED_FILE_ACTION_OK), "CWD", path)
            .await?;
        Ok(())
    }

    /// Move to the parent directory.
    pub async fn change_dir_to_parent(&mut self) -> FtpResult<()> {
        self.send_command(Expect::Code(status::REQUESTED_FILE_ACTION_OK), "CDUP")
            .await?;
        Ok(())
    }

    /// Current remote directory, taken from the quoted part of the PWD reply.
    pub async fn current_dir(&mut self) -> FtpResult<String> {
        let reply = self
            .send_command(Expect::Code(status::PATH_CREATED), "PWD")
            .await?;
        parse_pwd(&reply.message())
    }

    // ─── NOOP / QUIT ─────────────────────────────────────────────

    /// Keep an idle control connection alive.
    pub async fn noop(&mut self) -> FtpResult<()> {
        self.send_command(Expect::Code(status::COMMAND_OK), "NOOP")
            .await?;
        Ok(())
    }

    /// Send `QUIT` and close the control socket.
    pub async fn quit(mut self) -> FtpResult<()> {
        self.codec.send_command("QUIT").await?;
        self.codec.shutdown().await
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Extract the path between the first and last `"` of a PWD reply.
pub(crate) fn parse_pwd(text: &str) -> FtpResult<String> {
    match (text.find('"'), text.rfind('"')) {
        (Some(start), Some(end)) if end > start => Ok(text[start + 1..end].to_string()),
        _ => Err(FtpError::format(format!("Unsupported PWD reply: {}", text))),
    }
}
