//! Small shared helpers: template decoding, chunk names and URL joining.

use std::borrow::Cow;

/// Decode template bytes to a string.
///
/// UTF-8 is tried first (a BOM is handled by encoding_rs). Templates that are
/// not valid UTF-8 are decoded as Windows-1252, which never fails.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Derive a chunk name from a resource URL by dropping its file extension.
///
/// Query strings and fragments are ignored. Only the last path segment is
/// considered, and a leading dot (`.hidden`) is not treated as an extension.
pub fn chunk_name(url: &str) -> &str {
    let url = match url.find(['?', '#']) {
        Some(end) => &url[..end],
        None => url,
    };

    let segment_start = url.rfind('/').map_or(0, |i| i + 1);
    match url[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &url[..segment_start + dot],
        _ => url,
    }
}

/// Join a public base path and a file name with exactly one `/` between them.
pub fn join_url(base: &str, file: &str) -> String {
    let file = file.trim_start_matches('/');
    if base.is_empty() {
        return file.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}
