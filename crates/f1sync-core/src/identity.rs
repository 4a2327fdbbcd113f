//! Member identity.
//!
//! Names are compared after trimming, collapsing internal whitespace and
//! lowercasing, so "McLaren", "mclaren" and " Mc  Laren"-style spacing
//! differences never produce spurious remove/add pairs. Display spelling is
//! kept wherever a name is shown to the site.

/// Normalize a member name for comparison.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether two names refer to the same member.
pub fn same_member(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Whether `name` appears in `members` under normalization.
pub(crate) fn contains_member<S: AsRef<str>>(members: &[S], name: &str) -> bool {
    let key = normalize_name(name);
    members.iter().any(|m| normalize_name(m.as_ref()) == key)
}
