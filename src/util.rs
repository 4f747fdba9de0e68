//! Text decoding and media type detection.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the encoding named in the XML declaration
/// 3. Falls back to Windows-1252 (superset of ISO-8859-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = extract_xml_encoding(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract encoding from XML declaration.
///
/// Parses `<?xml ... encoding="..." ?>` in the first 100 bytes.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

// ============================================================================
// Resource Format Detection
// ============================================================================

/// Media formats that commonly accompany page documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Jpeg,
    Png,
    Gif,
    Svg,
    WebP,
    Bmp,
    Ico,
    Avif,
    Ttf,
    Otf,
    Woff,
    Woff2,
    Css,
    /// Unknown/binary format
    Binary,
}

impl MediaFormat {
    /// Get the MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Png => "image/png",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Svg => "image/svg+xml",
            MediaFormat::WebP => "image/webp",
            MediaFormat::Bmp => "image/bmp",
            MediaFormat::Ico => "image/x-icon",
            MediaFormat::Avif => "image/avif",
            MediaFormat::Ttf => "font/ttf",
            MediaFormat::Otf => "font/otf",
            MediaFormat::Woff => "font/woff",
            MediaFormat::Woff2 => "font/woff2",
            MediaFormat::Css => "text/css",
            MediaFormat::Binary => "application/octet-stream",
        }
    }
}

const EXTENSIONS: &[(&str, MediaFormat)] = &[
    ("jpg", MediaFormat::Jpeg),
    ("jpeg", MediaFormat::Jpeg),
    ("png", MediaFormat::Png),
    ("gif", MediaFormat::Gif),
    ("svg", MediaFormat::Svg),
    ("webp", MediaFormat::WebP),
    ("bmp", MediaFormat::Bmp),
    ("ico", MediaFormat::Ico),
    ("avif", MediaFormat::Avif),
    ("ttf", MediaFormat::Ttf),
    ("otf", MediaFormat::Otf),
    ("woff", MediaFormat::Woff),
    ("woff2", MediaFormat::Woff2),
    ("css", MediaFormat::Css),
];

/// Detect resource format from file name and/or raw bytes.
///
/// Extension wins; magic bytes are the fallback; `Binary` if neither matches.
pub fn detect_media_format(name: &str, data: &[u8]) -> MediaFormat {
    if let Some((_, ext)) = name.rsplit_once('.') {
        let ext = ext.to_ascii_lowercase();
        if let Some((_, format)) = EXTENSIONS.iter().find(|(e, _)| *e == ext) {
            return *format;
        }
    }

    sniff(data)
}

fn sniff(data: &[u8]) -> MediaFormat {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        MediaFormat::Jpeg
    } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        MediaFormat::Png
    } else if data.starts_with(b"GIF8") {
        MediaFormat::Gif
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        MediaFormat::WebP
    } else if data.len() >= 12 && &data[4..8] == b"ftyp" && &data[8..12] == b"avif" {
        MediaFormat::Avif
    } else if data.starts_with(b"BM") && data.len() >= 14 {
        MediaFormat::Bmp
    } else if data.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        MediaFormat::Ico
    } else if data.starts_with(b"wOFF") {
        MediaFormat::Woff
    } else if data.starts_with(b"wOF2") {
        MediaFormat::Woff2
    } else if data.starts_with(b"OTTO") {
        MediaFormat::Otf
    } else if data.starts_with(&[0x00, 0x01, 0x00, 0x00]) {
        MediaFormat::Ttf
    } else if looks_like_svg(data) {
        MediaFormat::Svg
    } else {
        MediaFormat::Binary
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg")) && text.contains("<svg")
}

/// Detect MIME type from file name or magic bytes, defaulting to `application/octet-stream`.
pub fn guess_mime_type(name: &str, data: &[u8]) -> &'static str {
    detect_media_format(name, data).mime_type()
}

// ============================================================================
// Tests
// ============================================================================
