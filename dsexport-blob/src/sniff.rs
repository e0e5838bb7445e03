//! MIME sniffing and MIME → extension mapping.

/// Generic binary MIME type, used when nothing better is detected.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Plain text MIME type.
pub const TEXT_PLAIN: &str = "text/plain";

/// Result of sniffing a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sniffed {
    pub mime_type: &'static str,
    /// Extension the detector associates with the match, without the dot.
    pub extension_hint: Option<&'static str>,
}

/// Detects a payload's MIME type from its leading bytes.
///
/// Magic-number matches win. Otherwise non-empty valid UTF-8 without
/// control characters (besides whitespace) is plain text, and anything else
/// is generic binary.
#[must_use]
pub fn sniff(bytes: &[u8]) -> Sniffed {
    if let Some(kind) = infer::get(bytes) {
        return Sniffed {
            mime_type: kind.mime_type(),
            extension_hint: Some(kind.extension()),
        };
    }
    if looks_like_text(bytes) {
        return Sniffed {
            mime_type: TEXT_PLAIN,
            extension_hint: Some("txt"),
        };
    }
    Sniffed {
        mime_type: OCTET_STREAM,
        extension_hint: None,
    }
}

fn looks_like_text(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && std::str::from_utf8(bytes).is_ok()
        && bytes
            .iter()
            .all(|&b| b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r' | 0x0c))
}

/// Maps a MIME type to a file extension, including the leading dot.
///
/// The detector's hint is used when the MIME registry lists it, otherwise
/// the registry's first extension. Unknown types map to an empty string, as
/// does generic binary when `drop_generic` is set.
#[must_use]
pub fn extension_for(mime_type: &str, hint: Option<&str>, drop_generic: bool) -> String {
    if mime_type == OCTET_STREAM {
        return if drop_generic { String::new() } else { ".bin".to_string() };
    }
    let Some(candidates) = mime_guess::get_mime_extensions_str(mime_type) else {
        return String::new();
    };
    let chosen = hint
        .and_then(|hint| candidates.iter().copied().find(|c| c.eq_ignore_ascii_case(hint)))
        .or_else(|| candidates.first().copied());
    match chosen {
        Some("bin") if drop_generic => String::new(),
        Some(ext) => format!(".{ext}"),
        None => String::new(),
    }
}
