//! Filename selection for saved downloads

use reqwest::Url;
use uuid::Uuid;

/// Extension used when the content type is missing or unknown
pub const FALLBACK_EXTENSION: &str = ".bin";

/// Pick the on-disk name for a download.
///
/// The last path segment of `url` is used verbatim when it contains a `.`;
/// otherwise a fresh UUID plus an extension derived from `content_type`.
pub fn choose_filename(url: &Url, content_type: Option<&str>) -> String {
    match explicit_filename(url) {
        Some(name) => name.to_string(),
        None => generated_filename(extension_for(content_type)),
    }
}

/// Last path segment, if it looks like a file name
pub fn explicit_filename(url: &Url) -> Option<&str> {
    let last = url.path().rsplit('/').next()?;
    (!last.is_empty() && last.contains('.')).then_some(last)
}

pub fn generated_filename(extension: &str) -> String {
    format!("{}{}", Uuid::new_v4(), extension)
}

/// Map a `Content-Type` header value to a conventional extension (with leading dot)
pub fn extension_for(content_type: Option<&str>) -> &'static str {
    content_type
        .map(media_type)
        .and_then(|essence| extension_for_media_type(&essence))
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Media-type token before any parameters, lowercased
fn media_type(content_type: &str) -> String {
    match content_type.parse::<mime::Mime>() {
        Ok(parsed) => parsed.essence_str().to_ascii_lowercase(),
        Err(_) => content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase(),
    }
}

fn extension_for_media_type(essence: &str) -> Option<&'static str> {
    let ext = match essence {
        "application/json" => ".json",
        "application/pdf" => ".pdf",
        "application/zip" => ".zip",
        "application/gzip" | "application/x-gzip" => ".gz",
        "application/x-tar" => ".tar",
        "application/x-bzip2" => ".bz2",
        "application/x-7z-compressed" => ".7z",
        "application/xml" => ".xml",
        "application/javascript" | "text/javascript" => ".js",
        "application/octet-stream" => ".bin",
        "application/wasm" => ".wasm",
        "application/rtf" => ".rtf",
        "application/msword" => ".doc",
        "application/vnd.ms-excel" => ".xls",
        "application/vnd.ms-powerpoint" => ".ppt",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => ".docx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => ".xlsx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => ".pptx",
        "application/epub+zip" => ".epub",
        "text/plain" => ".txt",
        "text/html" => ".html",
        "text/css" => ".css",
        "text/csv" => ".csv",
        "text/markdown" => ".md",
        "text/xml" => ".xml",
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/svg+xml" => ".svg",
        "image/bmp" => ".bmp",
        "image/tiff" => ".tiff",
        "image/avif" => ".avif",
        "image/x-icon" | "image/vnd.microsoft.icon" => ".ico",
        "audio/mpeg" => ".mp3",
        "audio/wav" | "audio/x-wav" => ".wav",
        "audio/ogg" => ".ogg",
        "audio/flac" => ".flac",
        "audio/aac" => ".aac",
        "video/mp4" => ".mp4",
        "video/webm" => ".webm",
        "video/mpeg" => ".mpeg",
        "video/quicktime" => ".mov",
        "video/x-msvideo" => ".avi",
        "font/woff" => ".woff",
        "font/woff2" => ".woff2",
        "font/ttf" => ".ttf",
        "font/otf" => ".otf",
        _ => return None,
    };
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_explicit_filename_kept() {
        let name = choose_filename(&url("https://example.com/files/report.pdf"), Some("image/png"));
        assert_eq!(name, "report.pdf");
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        let u = url("https://example.com/a/archive.tar.gz?token=abc#frag");
        assert_eq!(explicit_filename(&u), Some("archive.tar.gz"));
    }

    #[test]
    fn test_missing_or_extensionless_segment() {
        assert_eq!(explicit_filename(&url("https://example.com")), None);
        assert_eq!(explicit_filename(&url("https://example.com/")), None);
        assert_eq!(explicit_filename(&url("https://example.com/dir/")), None);
        assert_eq!(explicit_filename(&url("https://example.com/image")), None);
    }

    #[test]
    fn test_generated_name_uses_content_type() {
        let name = choose_filename(&url("https://example.com/avatar"), Some("image/png"));
        let (stem, ext) = name.split_at(name.len() - 4);

        assert_eq!(ext, ".png");
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn test_generated_names_are_unique() {
        let u = url("https://example.com/");
        assert_ne!(
            choose_filename(&u, Some("image/png")),
            choose_filename(&u, Some("image/png"))
        );
    }

    #[test]
    fn test_extension_ignores_parameters_and_case() {
        assert_eq!(extension_for(Some("text/html; charset=utf-8")), ".html");
        assert_eq!(extension_for(Some("Image/JPEG")), ".jpg");
        assert_eq!(extension_for(Some("application/json;charset=UTF-8")), ".json");
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(extension_for(None), ".bin");
        assert_eq!(extension_for(Some("")), ".bin");
        assert_eq!(extension_for(Some("application/x-unknown-thing")), ".bin");
        assert_eq!(extension_for(Some("garbage")), ".bin");
    }
}
