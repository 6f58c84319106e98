// Slug module: turns folder and note names into URL-safe identifiers and
// keeps them unique for the duration of one upload run.

use std::collections::HashSet;

/// Slug returned when a name has no characters left after cleaning.
pub const FALLBACK_SLUG: &str = "untitled";

/// Convert a display name into a lowercase, hyphen-separated slug.
///
/// Only ASCII lowercase letters, digits, Hangul syllables and hyphens
/// survive. Runs of whitespace become a single hyphen, repeated hyphens are
/// collapsed and leading/trailing hyphens are trimmed.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if is_slug_char(ch) {
            slug.push(ch);
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ('가'..='힣').contains(&ch)
}

/// Every slug handed out during a run. Folders and notes share it.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    issued: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `candidate`, or the first free `candidate-N` (N starting at 1)
    /// if it is already taken, and return the reserved slug.
    pub fn make_unique(&mut self, candidate: &str) -> String {
        if self.issued.insert(candidate.to_string()) {
            return candidate.to_string();
        }

        let mut counter: usize = 1;
        loop {
            let slug = format!("{candidate}-{counter}");
            if self.issued.insert(slug.clone()) {
                return slug;
            }
            counter += 1;
        }
    }
}
