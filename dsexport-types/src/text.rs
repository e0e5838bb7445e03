/// Decodes UTF-8, silently dropping invalid byte sequences.
///
/// Returns the decoded text and whether anything was dropped.
#[must_use]
pub fn decode_utf8_ignore(bytes: &[u8]) -> (String, bool) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = false;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped |= !chunk.invalid().is_empty();
    }
    (text, dropped)
}
