//! Text decoding helpers for the file-level wrappers.

use encoding_rs::Encoding;
use log::{debug, warn};

/// Resolves an encoding label (`"utf-8"`, `"windows-1252"`, `"GBK"` ...).
///
/// Unknown labels fall back to UTF-8.
pub fn parse_encoding(label: &str) -> &'static Encoding {
    let label = match label.trim() {
        "GBK" | "GB2312" => "GB18030",
        other => other,
    };
    Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
        warn!("Unknown text encoding '{}', using UTF-8", label);
        encoding_rs::UTF_8
    })
}

/// Decodes raw file bytes to text.
///
/// A byte order mark overrides `encoding`. Malformed sequences become U+FFFD
/// rather than failing the read.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        debug!("Byte order mark selects {} over {}", used.name(), encoding.name());
    }
    if had_errors {
        warn!("Replaced malformed {} sequences while decoding", used.name());
    }
    text.into_owned()
}
