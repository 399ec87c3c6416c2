//! Output filename derivation from the source URL path.

use super::validate::{InvalidUrl, SourceUrl};

/// Last non-empty segment of the URL path, as it appears in the URL.
pub fn basename_from_url_path(source: &SourceUrl) -> Option<&str> {
    source
        .url()
        .path()
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .last()
}

/// Derives the local file name for `source`: the path basename truncated to
/// `max_chars` characters with `.{extension}` appended.
pub fn output_file_name(
    source: &SourceUrl,
    max_chars: usize,
    extension: &str,
) -> Result<String, InvalidUrl> {
    let basename = basename_from_url_path(source).ok_or_else(|| InvalidUrl {
        url: source.as_str().to_string(),
        reason: "URL path has no file name",
    })?;
    let mut name: String = basename.chars().take(max_chars).collect();
    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }
    Ok(name)
}
