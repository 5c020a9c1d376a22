use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut a display name to `max` terminal columns, marking the cut with `...`.
pub fn truncate_display(name: &str, max: usize) -> String {
    if UnicodeWidthStr::width(name) <= max {
        return name.to_owned();
    }

    let mut cut = String::new();
    let mut used = 0;
    for ch in name.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > max {
            break;
        }
        cut.push(ch);
        used += ch_width;
    }
    cut.push_str("...");
    cut
}

/// Format a count with a singular or plural noun (e.g. 1 -> "1 command", 2 -> "2 commands").
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Strip mention triggers from user-supplied text before echoing it back.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}
