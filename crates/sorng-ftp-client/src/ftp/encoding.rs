//! Name transcoding between UTF-8 and ISO-8859-15 (Latin-9).
//!
//! Latin-9 is Latin-1 with eight code points replaced; every other byte
//! maps to the Unicode scalar of the same value.

/// Text encoding spoken on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerEncoding {
    #[default]
    Utf8,
    Latin9,
}

/// Bytes that differ between Latin-1 and Latin-9, with their Unicode scalar.
const LATIN9_OVERRIDES: [(u8, char); 8] = [
    (0xA4, '\u{20AC}'), // EURO SIGN
    (0xA6, '\u{0160}'), // S WITH CARON
    (0xA8, '\u{0161}'), // s with caron
    (0xB4, '\u{017D}'), // Z WITH CARON
    (0xB8, '\u{017E}'), // z with caron
    (0xBC, '\u{0152}'), // LIGATURE OE
    (0xBD, '\u{0153}'), // ligature oe
    (0xBE, '\u{0178}'), // Y WITH DIAERESIS
];

impl ServerEncoding {
    /// Encode text for the server.
    pub fn to_server(self, text: &str) -> Vec<u8> {
        match self {
            ServerEncoding::Utf8 => text.as_bytes().to_vec(),
            ServerEncoding::Latin9 => utf8_to_latin9(text),
        }
    }

    /// Decode bytes received from the server.
    pub fn from_server(self, bytes: &[u8]) -> String {
        match self {
            ServerEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            ServerEncoding::Latin9 => latin9_to_utf8(bytes),
        }
    }
}

pub fn latin9_to_utf8(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            LATIN9_OVERRIDES
                .iter()
                .find(|(byte, _)| *byte == b)
                .map(|(_, c)| *c)
                .unwrap_or(b as char)
        })
        .collect()
}

/// Characters with no Latin-9 byte are replaced by `?`.
pub fn utf8_to_latin9(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if let Some((byte, _)) = LATIN9_OVERRIDES.iter().find(|(_, ch)| *ch == c) {
                return *byte;
            }
            let cp = c as u32;
            let shadowed = LATIN9_OVERRIDES.iter().any(|(byte, _)| u32::from(*byte) == cp);
            if cp <= 0xFF && !shadowed {
                cp as u8
            } else {
                b'?'
            }
        })
        .collect()
}
