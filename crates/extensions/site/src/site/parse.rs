//! Text extraction from the rendered team page.

use std::sync::OnceLock;

use f1sync_core::mappings::is_constructor_name;
use regex::Regex;
use url::Url;

use super::error::SiteError;

/// Compile a fixed pattern once.
fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn money_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(?i)\$\s*([0-9]+(?:\.[0-9]+)?)\s*M")
}

fn million_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(?i)([0-9]+(?:\.[0-9]+)?)\s*million")
}

fn cost_cap_html_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(
        &RE,
        r"(?i)Cost\s*Cap:\s*</span><em>\$\s*([0-9]+(?:\.[0-9]+)?)\s*M",
    )
}

fn boost_badge_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(?i)2x\s*([A-Z]\.[A-Z]+)")
}

fn first_number(re: Option<&Regex>, text: &str) -> Option<f64> {
    re?.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parse the first money amount in millions: `$12.3M` or `12.3 million`.
pub fn parse_money_millions(text: &str) -> Option<f64> {
    first_number(money_re(), text).or_else(|| first_number(million_re(), text))
}

/// Sum of every `$N M` amount in `text`.
pub fn sum_money_millions(text: &str) -> f64 {
    let Some(re) = money_re() else {
        return 0.0;
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .sum()
}

/// Remaining cost cap from the raw page markup.
pub fn cost_cap_from_html(html: &str) -> Option<f64> {
    first_number(cost_cap_html_re(), html)
}

/// Resolve a `2x L.NORRIS` style badge against the selected drivers.
///
/// Each driver is abbreviated as first initial, a dot, and last name.
pub fn boost_from_badge_text(body: &str, drivers: &[String]) -> Option<String> {
    let abbr = boost_badge_re()?
        .captures(body)?
        .get(1)?
        .as_str()
        .to_lowercase();

    drivers
        .iter()
        .find(|d| {
            let parts: Vec<&str> = d.split_whitespace().collect();
            match (parts.first(), parts.last()) {
                (Some(first), Some(last)) if parts.len() >= 2 => {
                    let initial: String = first.chars().take(1).collect();
                    format!("{}.{}", initial, last).to_lowercase() == abbr
                }
                _ => false,
            }
        })
        .cloned()
}

/// Split scraped lineup names into drivers and constructors.
pub fn split_roster(names: Vec<String>) -> (Vec<String>, Vec<String>) {
    names.into_iter().partition(|n| !is_constructor_name(n))
}

/// Whether `url` is the page of team `team_id`: a `my-team` path segment
/// directly followed by the id.
pub fn is_team_url(url: &str, team_id: u32) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(segments) = parsed.path_segments() else {
        return false;
    };
    let id = team_id.to_string();
    let segments: Vec<&str> = segments.collect();
    segments
        .windows(2)
        .any(|w| w[0] == "my-team" && w[1] == id)
}

/// Check the page text names the expected team and none of the forbidden ones.
pub fn check_team_identity(
    body: &str,
    expected: Option<&str>,
    forbidden: &[String],
) -> Result<(), SiteError> {
    if let Some(name) = forbidden.iter().find(|f| !f.is_empty() && body.contains(f.as_str())) {
        return Err(SiteError::SafetyCheck(format!(
            "page mentions forbidden team '{}'",
            name
        )));
    }

    if let Some(expected) = expected {
        if !body.contains(expected) {
            return Err(SiteError::SafetyCheck(format!(
                "expected team name '{}' not found on page",
                expected
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
