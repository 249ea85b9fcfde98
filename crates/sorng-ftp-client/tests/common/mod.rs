//! In-process FTP server used by the integration tests.
//!
//! Serves a single control connection over loopback, keeps files in memory
//! keyed by their raw (wire-encoded) names and records every command line
//! it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const USER: &str = "test";
pub const PASSWORD: &str = "secret";

/// Behaviour switches for one mock server.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Names advertised in the FEAT reply.
    pub features: Vec<String>,
    pub reject_pasv: bool,
    pub reject_rest: bool,
    /// Lines served on the data connection for LIST.
    pub list_lines: Vec<String>,
    /// Lines served on the data connection for MLSD.
    pub mlsd_lines: Vec<String>,
    /// Raw MLST reply (CRLF-separated) replacing the generated one.
    pub mlst_reply: Option<String>,
    /// Greeting sent on connect instead of `220 mock ready`.
    pub greeting: Option<String>,
    /// Answer FEAT with 500, like servers predating RFC 2389.
    pub reject_feat: bool,
    /// Reply to USER instead of `331 Password required`.
    pub user_reply: Option<String>,
    /// Password accepted by PASS instead of [`PASSWORD`].
    pub password: Option<String>,
    /// Reply sent after a RETR/STOR payload instead of `226 Transfer complete`.
    pub closing_reply: Option<String>,
}

impl MockConfig {
    pub fn with_features(features: &[&str]) -> Self {
        Self {
            features: features.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct State {
    commands: Vec<String>,
    raw_commands: Vec<Vec<u8>>,
    files: HashMap<Vec<u8>, Vec<u8>>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    state: Arc<Mutex<State>>,
    task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(config: MockConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(State::default()));

        let shared = state.clone();
        let task = tokio::spawn(async move {
            if let Ok((stream, _)) = listener.accept().await {
                let session = MockSession {
                    config,
                    state: shared,
                    data: None,
                    rest: 0,
                    rename_from: None,
                };
                let _ = session.run(stream).await;
            }
        });

        Self { addr, state, task }
    }

    /// Wait for the control connection to end, then return every command received.
    pub async fn finished(self) -> Vec<String> {
        let MockServer { state, task, .. } = self;
        let _ = task.await;
        let commands = state.lock().unwrap().commands.clone();
        commands
    }

    /// `127.0.0.1:port`, ready for `FtpSession::connect`.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn put_file(&self, name: &[u8], data: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(name.to_vec(), data.to_vec());
    }

    pub fn file(&self, name: &[u8]) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(name).cloned()
    }

    /// Every command line received so far, lossily decoded.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Every command line received so far, as the bytes sent.
    pub fn raw_commands(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().raw_commands.clone()
    }

    /// The verb of every command received so far.
    pub fn verbs(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }
}

struct MockSession {
    config: MockConfig,
    state: Arc<Mutex<State>>,
    data: Option<TcpListener>,
    rest: u64,
    rename_from: Option<Vec<u8>>,
}

impl MockSession {
    async fn run(mut self, stream: TcpStream) -> io::Result<()> {
        let (rd, mut wr) = stream.into_split();
        let mut rd = BufReader::new(rd);
        let greeting = self.config.greeting.clone();
        reply(&mut wr, greeting.as_deref().unwrap_or("220 mock ready")).await?;

        loop {
            let mut raw = Vec::new();
            if rd.read_until(b'\n', &mut raw).await? == 0 {
                return Ok(());
            }
            while matches!(raw.last(), Some(b'\n') | Some(b'\r')) {
                raw.pop();
            }
            {
                let mut state = self.state.lock().unwrap();
                state.commands.push(String::from_utf8_lossy(&raw).into_owned());
                state.raw_commands.push(raw.clone());
            }

            let (verb, arg) = match raw.iter().position(|b| *b == b' ') {
                Some(i) => (&raw[..i], raw[i + 1..].to_vec()),
                None => (&raw[..], Vec::new()),
            };
            let verb = String::from_utf8_lossy(verb).to_ascii_uppercase();
            if !self.handle(&verb, arg, &mut wr).await? {
                return Ok(());
            }
        }
    }

    async fn handle(&mut self, verb: &str, arg: Vec<u8>, wr: &mut OwnedWriteHalf) -> io::Result<bool> {
        match verb {
            "USER" => {
                let text = self.config.user_reply.clone();
                reply(wr, text.as_deref().unwrap_or("331 Password required")).await?;
            }
            "PASS" => {
                let expected = self.config.password.as_deref().unwrap_or(PASSWORD);
                if arg == expected.as_bytes() {
                    reply(wr, "230 Logged in").await?;
                } else {
                    reply(wr, "530 Login incorrect").await?;
                }
            }
            "TYPE" => reply(wr, "200 Type set to I").await?,
            "FEAT" if self.config.reject_feat => reply(wr, "500 FEAT not understood").await?,
            "FEAT" => {
                let mut text = String::from("211-Features:\r\n");
                for feature in &self.config.features {
                    text.push_str(&format!(" {}\r\n", feature));
                }
                text.push_str("211 End");
                reply(wr, &text).await?;
            }
            "PASV" if self.config.reject_pasv => reply(wr, "500 PASV not understood").await?,
            "PASV" => {
                let port = self.open_data().await?;
                let text = format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{}).",
                    port / 256,
                    port % 256
                );
                reply(wr, &text).await?;
            }
            "EPSV" => {
                let port = self.open_data().await?;
                reply(wr, &format!("229 Entering Extended Passive Mode (|||{}|)", port)).await?;
            }
            "REST" if self.config.reject_rest => reply(wr, "502 REST not implemented").await?,
            "REST" => match String::from_utf8_lossy(&arg).parse::<u64>() {
                Ok(offset) => {
                    self.rest = offset;
                    reply(wr, &format!("350 Restarting at {}", offset)).await?;
                }
                Err(_) => reply(wr, "501 Bad offset").await?,
            },
            "RETR" => {
                let content = self.state.lock().unwrap().files.get(&arg).cloned();
                match content {
                    None => reply(wr, "550 No such file").await?,
                    Some(content) => {
                        let start = (std::mem::take(&mut self.rest) as usize).min(content.len());
                        reply(wr, "150 Opening data connection").await?;
                        self.send_data(&content[start..]).await?;
                        self.closing_reply(wr).await?;
                    }
                }
            }
            "STOR" => {
                let offset = std::mem::take(&mut self.rest) as usize;
                reply(wr, "150 Ok to send data").await?;
                let mut conn = self.accept_data().await?;
                let mut received = Vec::new();
                conn.read_to_end(&mut received).await?;
                {
                    let mut state = self.state.lock().unwrap();
                    let file = state.files.entry(arg).or_default();
                    file.truncate(offset);
                    file.extend_from_slice(&received);
                }
                self.closing_reply(wr).await?;
            }
            "LIST" => {
                let lines = self.config.list_lines.clone();
                self.send_lines(wr, lines.iter().map(|l| l.as_bytes().to_vec()).collect())
                    .await?;
            }
            "MLSD" => {
                let lines = self.config.mlsd_lines.clone();
                self.send_lines(wr, lines.iter().map(|l| l.as_bytes().to_vec()).collect())
                    .await?;
            }
            "NLST" => {
                let mut names: Vec<Vec<u8>> =
                    self.state.lock().unwrap().files.keys().cloned().collect();
                names.sort();
                self.send_lines(wr, names).await?;
            }
            "MLST" => {
                if let Some(text) = self.config.mlst_reply.clone() {
                    reply(wr, &text).await?;
                } else {
                    let size = self.state.lock().unwrap().files.get(&arg).map(Vec::len);
                    let name = String::from_utf8_lossy(&arg).into_owned();
                    match size {
                        Some(size) => {
                            let text = format!(
                                "250-Listing {name}\r\n type=file;size={size};modify=20240101120000; {name}\r\n250 End"
                            );
                            reply(wr, &text).await?;
                        }
                        None => reply(wr, "550 No such file").await?,
                    }
                }
            }
            "CWD" if arg == b"missing" => reply(wr, "550 No such directory").await?,
            "CWD" | "CDUP" => reply(wr, "250 Directory changed").await?,
            "PWD" => reply(wr, "257 \"/home/test\" is the current directory").await?,
            "MKD" => {
                let text = format!("257 \"{}\" created", String::from_utf8_lossy(&arg));
                reply(wr, &text).await?;
            }
            "RMD" => reply(wr, "250 Directory removed").await?,
            "DELE" => {
                let removed = self.state.lock().unwrap().files.remove(&arg);
                match removed {
                    Some(_) => reply(wr, "250 File deleted").await?,
                    None => reply(wr, "550 No such file").await?,
                }
            }
            "RNFR" => {
                let exists = self.state.lock().unwrap().files.contains_key(&arg);
                if exists {
                    self.rename_from = Some(arg);
                    reply(wr, "350 Ready for RNTO").await?;
                } else {
                    reply(wr, "550 No such file").await?;
                }
            }
            "RNTO" => match self.rename_from.take() {
                Some(from) => {
                    {
                        let mut state = self.state.lock().unwrap();
                        if let Some(content) = state.files.remove(&from) {
                            state.files.insert(arg, content);
                        }
                    }
                    reply(wr, "250 Rename successful").await?;
                }
                None => reply(wr, "503 RNFR required first").await?,
            },
            "NOOP" => reply(wr, "200 NOOP ok").await?,
            "REIN" => reply(wr, "220 Service ready for new user").await?,
            "QUIT" => {
                reply(wr, "221 Goodbye").await?;
                return Ok(false);
            }
            _ => reply(wr, "502 Command not implemented").await?,
        }
        Ok(true)
    }

    async fn closing_reply(&self, wr: &mut OwnedWriteHalf) -> io::Result<()> {
        let text = self.config.closing_reply.as_deref().unwrap_or("226 Transfer complete");
        reply(wr, text).await
    }

    async fn open_data(&mut self) -> io::Result<u16> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        self.data = Some(listener);
        Ok(port)
    }

    async fn accept_data(&mut self) -> io::Result<TcpStream> {
        let listener = self
            .data
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no passive listener"))?;
        let (stream, _) = listener.accept().await?;
        Ok(stream)
    }

    /// Write `payload` and close. Write errors are ignored: the client
    /// may already have dropped its end.
    async fn send_data(&mut self, payload: &[u8]) -> io::Result<()> {
        let mut conn = self.accept_data().await?;
        let _ = conn.write_all(payload).await;
        let _ = conn.shutdown().await;
        Ok(())
    }

    async fn send_lines(&mut self, wr: &mut OwnedWriteHalf, lines: Vec<Vec<u8>>) -> io::Result<()> {
        let mut payload = Vec::new();
        for line in lines {
            payload.extend_from_slice(&line);
            payload.extend_from_slice(b"\r\n");
        }
        reply(wr, "150 Here comes the listing").await?;
        self.send_data(&payload).await?;
        reply(wr, "226 Directory send OK").await
    }
}

async fn reply(wr: &mut OwnedWriteHalf, text: &str) -> io::Result<()> {
    wr.write_all(text.as_bytes()).await?;
    wr.write_all(b"\r\n").await?;
    wr.flush().await
}
