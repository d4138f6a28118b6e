//! Display helpers for rupee amounts and timestamps.

use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime};

/// Formats a rupee amount with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹—".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}₹{}", group_indian(&digits))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Renders an RFC 3339 stamp as `01 May 2024, 10:00 UTC`; anything else is shown verbatim.
pub fn humanize_timestamp(raw: &str) -> String {
    let format = format_description!("[day] [month repr:short] [year], [hour]:[minute] UTC");
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .ok()
        .and_then(|stamp| stamp.to_offset(time::UtcOffset::UTC).format(&format).ok())
        .unwrap_or_else(|| raw.to_string())
}
