/// Format whole seconds as `M:SS` (minutes unpadded, seconds zero-padded).
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
