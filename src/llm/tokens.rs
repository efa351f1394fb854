//! Rough prompt-size estimate.

/// Estimates above this are logged as a warning before sending.
pub const TOKEN_WARNING_THRESHOLD: usize = 8000;

const CJK_CHARS_PER_TOKEN: f64 = 1.5;
const OTHER_CHARS_PER_TOKEN: f64 = 4.0;

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Estimate the token count of `text`.
///
/// CJK ideographs count 1 token per 1.5 characters, everything else 1 token
/// per 4 characters; the sum is floored. Advisory only.
pub fn estimate_tokens(text: &str) -> usize {
    let (cjk, other) = text.chars().fold((0usize, 0usize), |(cjk, other), c| {
        if is_cjk(c) {
            (cjk + 1, other)
        } else {
            (cjk, other + 1)
        }
    });

    (cjk as f64 / CJK_CHARS_PER_TOKEN + other as f64 / OTHER_CHARS_PER_TOKEN).floor() as usize
}
