//! # SortOfRemote NG – FTP client core
//!
//! Protocol engine for talking to FTP servers (RFC 959 plus FEAT, EPSV,
//! MLSD/MLST and REST):
//!   • Control session with strict one-command/one-reply discipline
//!   • Feature discovery and server-encoding translation
//!   • PASV / EPSV data-connection negotiation
//!   • Resumable RETR / STOR transfers
//!   • Unix-style LIST and RFC 3659 fact listing parsers

pub mod ftp;
