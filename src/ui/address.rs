use crate::core::constants::{ADDRESS_MIN_WORDS, ADDRESS_SEGMENT_MAX_CHARS, LINE_BREAK};

/// Line-wraps a formatted address for the fixed-width info panel.
///
/// The address is split on `", "`. A segment longer than 23 characters with
/// more than three words gets a break after its middle word; every segment
/// but the last is followed by a comma and a break.
pub fn wrap_address(formatted: &str) -> String {
    wrap_address_with(formatted, LINE_BREAK)
}

/// [`wrap_address`] with a custom break token (e.g. `"\n"` for plain text)
pub fn wrap_address_with(formatted: &str, line_break: &str) -> String {
    let segments: Vec<&str> = formatted.split(", ").collect();
    let last = segments.len().saturating_sub(1);
    let mut wrapped = String::with_capacity(formatted.len() + segments.len() * 8);

    for (i, segment) in segments.iter().enumerate() {
        wrapped.push_str(&break_segment(segment, line_break));
        if i < last {
            wrapped.push(',');
            wrapped.push_str(line_break);
        }
    }

    wrapped
}

fn break_segment(segment: &str, line_break: &str) -> String {
    if segment.chars().count() <= ADDRESS_SEGMENT_MAX_CHARS {
        return segment.to_string();
    }

    let mut words: Vec<String> = segment.split(' ').map(str::to_string).collect();
    if words.len() <= ADDRESS_MIN_WORDS {
        return segment.to_string();
    }

    let center = (words.len() - 1) / 2;
    words[center].push_str(line_break);
    words.join(" ").trim().to_string()
}
