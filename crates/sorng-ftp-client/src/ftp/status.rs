//! FTP reply codes (RFC 959 §4.2, RFC 2428, RFC 3659).
//!
//! Fixed constants compared against by the session; no runtime state.

// ── 1xx positive preliminary ────────────────────────────────────────────

pub const RESTART_MARKER: u16 = 110;
pub const READY_MINUTE: u16 = 120;
pub const ALREADY_OPEN: u16 = 125;
pub const ABOUT_TO_SEND: u16 = 150;

// ── 2xx positive completion ─────────────────────────────────────────────

pub const COMMAND_OK: u16 = 200;
pub const COMMAND_NOT_IMPLEMENTED: u16 = 202;
pub const SYSTEM: u16 = 211;
pub const DIRECTORY: u16 = 212;
pub const FILE: u16 = 213;
pub const HELP: u16 = 214;
pub const NAME: u16 = 215;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const DATA_CONNECTION_OPEN: u16 = 225;
pub const CLOSING_DATA_CONNECTION: u16 = 226;
pub const PASSIVE_MODE: u16 = 227;
pub const LONG_PASSIVE_MODE: u16 = 228;
pub const EXTENDED_PASSIVE_MODE: u16 = 229;
pub const LOGGED_IN: u16 = 230;
pub const LOGGED_OUT: u16 = 231;
pub const LOGOUT_ACK: u16 = 232;
pub const REQUESTED_FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;

// ── 3xx positive intermediate ───────────────────────────────────────────

pub const USER_OK: u16 = 331;
pub const LOGIN_NEED_ACCOUNT: u16 = 332;
pub const REQUEST_FILE_PENDING: u16 = 350;

// ── 4xx transient negative ──────────────────────────────────────────────

pub const NOT_AVAILABLE: u16 = 421;
pub const CANNOT_OPEN_DATA_CONNECTION: u16 = 425;
pub const TRANSFER_ABORTED: u16 = 426;
pub const INVALID_CREDENTIALS: u16 = 430;
pub const HOST_UNAVAILABLE: u16 = 434;
pub const FILE_ACTION_IGNORED: u16 = 450;
pub const ACTION_ABORTED: u16 = 451;
pub const INSUFFICIENT_STORAGE: u16 = 452;

// ── 5xx permanent negative ──────────────────────────────────────────────

pub const BAD_COMMAND: u16 = 500;
pub const BAD_ARGUMENTS: u16 = 501;
pub const NOT_IMPLEMENTED: u16 = 502;
pub const BAD_SEQUENCE: u16 = 503;
pub const NOT_IMPLEMENTED_PARAMETER: u16 = 504;
pub const NOT_LOGGED_IN: u16 = 530;
pub const STORING_NEED_ACCOUNT: u16 = 532;
pub const FILE_UNAVAILABLE: u16 = 550;
pub const PAGE_TYPE_UNKNOWN: u16 = 551;
pub const EXCEEDED_STORAGE: u16 = 552;
pub const BAD_FILE_NAME: u16 = 553;

/// Human-readable description of a reply code, if it is a known one.
pub fn status_text(code: u16) -> Option<&'static str> {
    let text = match code {
        RESTART_MARKER => "Restart marker reply.",
        READY_MINUTE => "Service ready in few minutes.",
        ALREADY_OPEN => "Data connection already opened, transfer starting.",
        ABOUT_TO_SEND => "File status okay, about to open data connection.",
        COMMAND_OK => "Command okay.",
        COMMAND_NOT_IMPLEMENTED => "Command not implemented, superfluous at this site.",
        SYSTEM => "System status, or system help reply.",
        DIRECTORY => "Directory status.",
        FILE => "File status.",
        HELP => "Help message.",
        NAME => "NAME system type.",
        READY => "Service ready for new user.",
        CLOSING => "Service closing control connection.",
        DATA_CONNECTION_OPEN => "Data connection open, no transfer in progress.",
        CLOSING_DATA_CONNECTION => "Closing data connection. Requested file action successful.",
        PASSIVE_MODE => "Entering Passive Mode.",
        LONG_PASSIVE_MODE => "Entering Long Passive Mode.",
        EXTENDED_PASSIVE_MODE => "Entering Extended Passive Mode.",
        LOGGED_IN => "User logged in, proceed.",
        LOGGED_OUT => "User logged out; service terminated.",
        LOGOUT_ACK => "Logout command noted, will complete when transfer done.",
        REQUESTED_FILE_ACTION_OK => "Requested file action okay, completed.",
        PATH_CREATED => "Path created.",
        USER_OK => "User name okay, need password.",
        LOGIN_NEED_ACCOUNT => "Need account for login.",
        REQUEST_FILE_PENDING => "Requested file action pending further information.",
        NOT_AVAILABLE => "Service not available, closing control connection.",
        CANNOT_OPEN_DATA_CONNECTION => "Can't open data connection.",
        TRANSFER_ABORTED => "Connection closed; transfer aborted.",
        INVALID_CREDENTIALS => "Invalid username or password.",
        HOST_UNAVAILABLE => "Requested host unavailable.",
        FILE_ACTION_IGNORED => "Requested file action not taken.",
        ACTION_ABORTED => "Requested action aborted. Local error in processing.",
        INSUFFICIENT_STORAGE => "Requested action not taken. Insufficient storage space in system.",
        BAD_COMMAND => "Syntax error, command unrecognized.",
        BAD_ARGUMENTS => "Syntax error in parameters or arguments.",
        NOT_IMPLEMENTED => "Command not implemented.",
        BAD_SEQUENCE => "Bad sequence of commands.",
        NOT_IMPLEMENTED_PARAMETER => "Command not implemented for that parameter.",
        NOT_LOGGED_IN => "Not logged in.",
        STORING_NEED_ACCOUNT => "Need account for storing files.",
        FILE_UNAVAILABLE => "Requested action not taken. File unavailable.",
        PAGE_TYPE_UNKNOWN => "Requested action aborted. Page type unknown.",
        EXCEEDED_STORAGE => "Requested file action aborted. Exceeded storage allocation.",
        BAD_FILE_NAME => "Requested action not taken. File name not allowed.",
        _ => return None,
    };
    Some(text)
}
