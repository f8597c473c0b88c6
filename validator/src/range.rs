//! Matching a hash suffix against a range response.
//!
//! A range response is a list of `SUFFIX:COUNT` lines separated by `\r\n`, e.g.
//! `1E4C9B93F3F0682250B6CF8331B7EE68FD8:10434004`.

/// Whether `suffix` appears anywhere in `body`, ignoring case.
///
/// This is a plain containment test, the breach counts are not looked at.
pub fn contains_suffix(body: &str, suffix: &str) -> bool {
    body.to_uppercase().contains(&suffix.to_uppercase())
}

/// How many times the suffix was seen in breaches, `None` when it is absent or its
/// line can't be parsed.
pub fn breach_count(body: &str, suffix: &str) -> Option<u64> {
    body.lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(line_suffix, _)| line_suffix.trim().eq_ignore_ascii_case(suffix))
        .and_then(|(_, count)| count.trim().parse().ok())
}
