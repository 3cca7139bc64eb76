// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text cleanup applied to extracted strings, descriptions in particular.

use regex::Regex;

use crate::tables::BOILERPLATE_PHRASES;

/// Insert a space after a period that is directly followed by a letter.
/// Rendered pages concatenate sentence fragments ("keimur.Ferskur"), and the
/// letter class must span the full Unicode range for Icelandic characters.
/// Idempotent: a period already followed by a space is left alone.
pub fn normalize_sentence_spacing(text: &str) -> String {
    let re = Regex::new(r"\.(\p{L})").expect("sentence spacing regex is valid");
    re.replace_all(text, ". $1").into_owned()
}

/// Remove "see more/less" UI phrases in both languages.
pub fn strip_boilerplate(text: &str) -> String {
    let mut out = text.to_string();
    for phrase in BOILERPLATE_PHRASES {
        out = out.replace(phrase, "");
    }
    out
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full cleanup pipeline for an accepted description candidate.
pub fn clean_description(text: &str) -> String {
    normalize_sentence_spacing(&collapse_whitespace(&strip_boilerplate(text)))
}

/// Strip a trailing parenthesized count from a product name ("Egils Gull (3)").
pub fn clean_product_name(name: &str) -> String {
    let re = Regex::new(r"\s*\(\d+\)$").expect("name count regex is valid");
    re.replace(name.trim(), "").into_owned()
}

/// True when the text is nothing but a parenthesized count, e.g. `(3)`.
/// Listing pages render such anchors next to the real product link.
pub fn is_parenthesized_count(text: &str) -> bool {
    let re = Regex::new(r"^\(\d+\)$").expect("count regex is valid");
    re.is_match(text.trim())
}

/// Clamp overly long text at a sentence boundary below `max_len`. Falls back
/// to a hard character cut with an ellipsis when no boundary fits.
pub fn clamp_at_sentence(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let sentence_re = Regex::new(r"[^.!?]+[.!?]+").expect("sentence regex is valid");
    let mut out = String::new();
    for mat in sentence_re.find_iter(text) {
        if out.chars().count() + mat.as_str().chars().count() > max_len {
            break;
        }
        out.push_str(mat.as_str());
    }
    let out = out.trim().to_string();
    if out.is_empty() {
        let cut: String = text.chars().take(max_len).collect();
        format!("{}...", cut.trim_end())
    } else {
        out
    }
}
