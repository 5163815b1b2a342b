//! Formatting utilities for book metadata display.

/// Format a byte count for display (e.g., "512B", "1.2K", "3.4M").
pub fn format_size(size: Option<u64>) -> String {
    match size {
        None => "-".to_string(),
        Some(bytes) if bytes >= 1_000_000 => format!("{:.1}M", bytes as f64 / 1_000_000.0),
        Some(bytes) if bytes >= 1_000 => format!("{:.1}K", bytes as f64 / 1_000.0),
        Some(bytes) => format!("{}B", bytes),
    }
}

/// Format a page count, e.g. "1 page" or "352 pages".
pub fn format_pages(pages: Option<u32>) -> Option<String> {
    match pages? {
        1 => Some("1 page".to_string()),
        n => Some(format!("{} pages", n)),
    }
}

/// Shorten `text` to at most `max_chars` characters, appending "…" when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(None), "-");
        assert_eq!(format_size(Some(0)), "0B");
        assert_eq!(format_size(Some(999)), "999B");
        assert_eq!(format_size(Some(1_500)), "1.5K");
        assert_eq!(format_size(Some(2_400_000)), "2.4M");
    }

    #[test]
    fn test_format_pages() {
        assert_eq!(format_pages(None), None);
        assert_eq!(format_pages(Some(1)).as_deref(), Some("1 page"));
        assert_eq!(format_pages(Some(352)).as_deref(), Some("352 pages"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long description", 7), "a long…");
        assert_eq!(truncate("émigré", 6), "émigré");
    }
}
