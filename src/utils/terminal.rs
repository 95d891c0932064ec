//! Sanitising owner names before they reach the terminal
//!
//! Names come straight out of a third-party profile. A crafted name could
//! carry ANSI escape sequences that move the cursor or rewrite earlier output,
//! so every name is passed through [`sanitize_label`] before printing.

/// Longest label printed verbatim; longer names are cut with an ellipsis
pub const MAX_LABEL_CHARS: usize = 64;

/// Remove escape sequences and control characters, collapse the result to a
/// single trimmed line and cap its length.
///
/// ```
/// use jeveassets_companion::utils::terminal::sanitize_label;
///
/// assert_eq!(sanitize_label("\x1b[31mPilot One\x1b[0m"), "Pilot One");
/// ```
pub fn sanitize_label(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        match ch {
            // CSI: ESC '[' params final-byte
            '\x1b' => {
                let mut rest = chars.clone();
                if rest.next() == Some('[') {
                    chars = rest;
                    for next in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next) {
                            break;
                        }
                    }
                }
            }
            '\n' | '\r' | '\t' => cleaned.push(' '),
            c if c.is_control() => {}
            c => cleaned.push(c),
        }
    }

    let trimmed = cleaned.trim();
    if trimmed.chars().count() <= MAX_LABEL_CHARS {
        return trimmed.to_string();
    }

    let mut cut: String = trimmed.chars().take(MAX_LABEL_CHARS - 1).collect();
    cut.push('…');
    cut
}
