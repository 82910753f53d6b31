// Display names derived from imported file names

use std::sync::OnceLock;
use regex::Regex;

static EXTENSION_RE: OnceLock<Regex> = OnceLock::new();

/// "Alien.mp4" -> "Alien". Drops any directory prefix and the last
/// extension-like suffix. When stripping the suffix would leave nothing,
/// the file name is kept as-is ("/dir/.hidden" -> ".hidden"); a hint with
/// no file name at all is returned unchanged.
pub fn display_name_from_hint(hint: &str) -> String {
    let file_name = hint.rsplit(['/', '\\']).next().unwrap_or(hint);
    let re = EXTENSION_RE.get_or_init(|| {
        Regex::new(r"\.[^/.]+$").expect("extension pattern is valid")
    });

    let stripped = re.replace(file_name, "");
    if stripped.trim().is_empty() {
        if file_name.is_empty() { hint.to_string() } else { file_name.to_string() }
    } else {
        stripped.into_owned()
    }
}
