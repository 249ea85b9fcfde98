//! # sorng-ftp-client: FTP protocol engine
//!
//! Implementation of the client side of the FTP protocol (RFC 959) with
//! extensions:
//! - **RFC 2389**: FEAT negotiation
//! - **RFC 2428**: EPSV
//! - **RFC 3659**: MLSD/MLST, REST STREAM
//!
//! Architecture:
//! - `types`: config, directory entries, file modes
//! - `error`: FTP-specific error type
//! - `status`: reply-code constants
//! - `reply`: reply value and expected-code classification
//! - `encoding`: ISO-8859-15 ⇄ UTF-8 transcoding of names
//! - `protocol`: low-level command/reply codec
//! - `connection`: control socket dial + greeting
//! - `client`: control session (login, FEAT, command helpers)
//! - `transfer`: data-connection negotiation (PASV/EPSV)
//! - `data`: data-connection handle bound to its session
//! - `file_ops`: REST / RETR / STOR sequencing
//! - `parser`: LIST and MLSD/MLST line parsers
//! - `directory`: listings and path commands
//! - `fileinfo`: file-info capability and filesystem facade

pub mod types;
pub mod error;
pub mod status;
pub mod reply;
pub mod encoding;
pub mod protocol;
pub mod connection;
pub mod client;
pub mod transfer;
pub mod data;
pub mod file_ops;
pub mod parser;
pub mod directory;
pub mod fileinfo;

pub use client::FtpSession;
pub use data::DataConnection;
pub use encoding::ServerEncoding;
pub use error::{FtpError, FtpErrorKind, FtpResult};
pub use fileinfo::{FileInfo, FileSystem};
pub use reply::{Expect, Reply};
pub use types::*;
