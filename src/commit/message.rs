//! Cleaning raw model output into a usable commit message.

const FENCE: &str = "```";

/// Clean a raw model response into a commit message.
///
/// - Trims surrounding whitespace
/// - If the text opens with a code fence: drops the first and last lines when
///   there are more than two lines, otherwise removes every fence marker
/// - Drops blank lines and trims each remaining line
pub fn clean_message(raw: &str) -> String {
    let mut message = raw.trim().to_string();

    if message.starts_with(FENCE) {
        let lines: Vec<&str> = message.split('\n').collect();
        message = if lines.len() > 2 {
            lines[1..lines.len() - 1].join("\n")
        } else {
            message.replace(FENCE, "").trim().to_string()
        };
    }

    message
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
