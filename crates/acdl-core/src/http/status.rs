//! Parse HTTP status lines delivered by the transport's header callback.

/// Returns the status code if `line` is an HTTP status line (`HTTP/1.1 200 OK`, `HTTP/2 404`).
pub(crate) fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    let code = line.split_whitespace().nth(1)?;
    if code.len() != 3 {
        return None;
    }
    code.parse::<u32>().ok()
}

pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
