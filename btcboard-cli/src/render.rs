//! Terminal rendering for snapshots.

use btcboard_core::dashboard::{AverageSource, FallbackReason, Snapshot};
use btcboard_core::domain::{FeedSource, LiveQuote};
use btcboard_core::feeds::IndexReading;
use btcboard_core::indicators::{Comparison, Direction, MaValue, MovingAverageResult};

/// Compact number: `1.2B`, `3.4M`, `61.0K`, or up to two decimals with
/// digit grouping below a thousand.
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return "--".to_string();
    }
    if num >= 1e9 {
        format!("{:.1}B", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.1}M", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.1}K", num / 1e3)
    } else {
        group_thousands(num)
    }
}

pub fn format_usd(num: f64) -> String {
    format!("${}", format_number(num))
}

/// Signed percent with two decimals: `+1.69%`, `-0.50%`.
pub fn format_percent(pct: f64) -> String {
    if !pct.is_finite() {
        return "---%".to_string();
    }
    let sign = if pct >= 0.0 { "+" } else { "" };
    format!("{sign}{pct:.2}%")
}

/// Up to two decimals, trailing zeros trimmed, commas between thousands.
fn group_thousands(num: f64) -> String {
    let fixed = format!("{:.2}", num.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if num < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn quote_lines(quote: &LiveQuote) -> Vec<String> {
    let mut lines = vec![format!(
        "BTC {}  {} ({})",
        format_usd(quote.price),
        format_percent(quote.change_24h_pct),
        format_usd(quote.change_amount()),
    )];
    if let Some(cap) = quote.market_cap {
        lines.push(format!("Market cap: ${:.1}B", cap / 1e9));
    }
    match quote.source {
        FeedSource::Live => {}
        FeedSource::Fallback => {
            lines.push("(price feed unavailable, showing fallback values)".to_string())
        }
        FeedSource::Manual => lines.push("(price supplied manually)".to_string()),
    }
    lines
}

pub fn comparison_line(comparison: &Comparison) -> String {
    match comparison {
        Comparison::Available(result) => {
            let arrow = match result.direction {
                Direction::Up => "▲",
                Direction::Down => "▼",
                Direction::Unknown => "?",
            };
            format!(
                "vs prev: {} {arrow} (close ${:.2} on {})",
                format_percent(result.percent_change),
                result.previous_price,
                result.previous_date
            )
        }
        Comparison::InsufficientData { .. } => "vs prev: loading…".to_string(),
    }
}

pub fn average_line(result: &MovingAverageResult) -> String {
    let label = format!("MA{}", result.period);
    let status = match result.price_above {
        Some(true) => "price above",
        Some(false) => "price below",
        None => "",
    };
    match result.value {
        MaValue::Computed(v) => format!("{label:<7} {:>10}  {status}", format_usd(v)),
        MaValue::Estimated(v) => {
            format!("{label:<7} {:>10}  {status} (est.)", format_usd(v))
        }
        MaValue::Insufficient { .. } => format!(
            "{label:<7} {:>10}  needs {} days of history",
            "n/a", result.period
        ),
    }
}

pub fn index_line(reading: &IndexReading) -> String {
    let suffix = if reading.source == FeedSource::Fallback {
        " (fallback)"
    } else {
        ""
    };
    format!(
        "AHR999: {:.4}  {}  gauge {:.0}%{suffix}",
        reading.value,
        reading.zone.label(),
        reading.fill_pct
    )
}

fn source_line(source: &AverageSource) -> String {
    match source {
        AverageSource::History { records } => format!("Averages from {records} days of history"),
        AverageSource::Fallback(FallbackReason::EmptyHistory) => {
            "Averages estimated: no price history available".to_string()
        }
        AverageSource::Fallback(FallbackReason::NonFiniteAverage { period }) => {
            format!("Averages estimated: MA{period} over history was not a number")
        }
    }
}

pub fn print_snapshot(snapshot: &Snapshot) {
    println!();
    println!("=== BTCBoard {} ===", snapshot.taken_at.format("%Y-%m-%d %H:%M:%S"));
    for line in quote_lines(&snapshot.quote) {
        println!("{line}");
    }
    println!("{}", comparison_line(&snapshot.comparison));
    println!();
    println!("--- Moving Averages ---");
    println!("{}", source_line(&snapshot.averages.source));
    for result in snapshot.averages.averages.values() {
        println!("{}", average_line(result));
    }
    println!();
    println!("{}", index_line(&snapshot.index));
}
