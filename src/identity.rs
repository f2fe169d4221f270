//! Identity token parsing and display-name resolution.
//!
//! Log files name attendees with a free-form token that may hold an id, a
//! name, both (in either order), or neither. Four shape rules split the token;
//! they are tried in a fixed priority order and the first full match wins.
//! "Alphanumeric" means ASCII `[a-zA-Z0-9]` — CJK name characters land in the
//! non-alphanumeric class, which is what makes `"A1张三"` split cleanly.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::ParsedIdentity;

// Compile-once shape patterns via OnceLock.
fn re_id_then_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-zA-Z0-9]+)([^a-zA-Z0-9]+)$").unwrap())
}

fn re_name_then_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^a-zA-Z0-9]+)([a-zA-Z0-9]+)$").unwrap())
}

fn re_id_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-zA-Z0-9]+)$").unwrap())
}

fn re_name_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^a-zA-Z0-9]+)$").unwrap())
}

/// Split a raw identity token into (id, name) parts.
///
/// Returns `None` when the token matches none of the four shapes: the empty
/// token, or a token with three or more alternating segments like `"A1-B2"`.
pub fn parse(token: &str) -> Option<ParsedIdentity> {
    type Extract = fn(&regex::Captures) -> ParsedIdentity;

    // Priority order is significant: two-part shapes before single-run shapes.
    let rules: [(&Regex, Extract); 4] = [
        (re_id_then_name(), |c| ParsedIdentity {
            id: c[1].to_string(),
            name: c[2].to_string(),
        }),
        (re_name_then_id(), |c| ParsedIdentity {
            id: c[2].to_string(),
            name: c[1].to_string(),
        }),
        (re_id_only(), |c| ParsedIdentity {
            id: c[1].to_string(),
            name: String::new(),
        }),
        (re_name_only(), |c| ParsedIdentity {
            id: String::new(),
            name: c[1].to_string(),
        }),
    ];

    for (pattern, extract) in rules {
        if let Some(captures) = pattern.captures(token) {
            return Some(extract(&captures));
        }
    }
    None
}

/// Resolve a raw identity token to a display name.
///
/// Preference order: the name embedded in the token, then the roster name for
/// the embedded id, then the id itself (id and name may be visually identical
/// at that point — degraded but acceptable). A token matching no shape
/// resolves to the empty string with a warning, so the row still lands in the
/// matrix instead of silently vanishing.
pub fn resolve_name(token: &str, id_to_name: &HashMap<String, String>) -> String {
    match parse(token) {
        Some(parsed) if !parsed.name.is_empty() => parsed.name,
        Some(parsed) => match id_to_name.get(&parsed.id) {
            Some(name) => name.clone(),
            None => parsed.id,
        },
        None => {
            log::warn!(
                "identity token {:?} matches no known shape, recording an empty name",
                token
            );
            String::new()
        }
    }
}
