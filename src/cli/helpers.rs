//! Shared helper functions for CLI commands

use console::style;
use std::str::FromStr;

use crate::core::Warning;

/// Format a damper length
pub fn format_length(value: f64) -> String {
    format!("{:.3}", value)
}

/// Format a signed length change, e.g. `+0.125`
pub fn format_delta(value: f64) -> String {
    format!("{:+.3}", value)
}

/// Format a mean rank or mean length
pub fn format_mean(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a weighted score; unscored pairs print as `inf`
pub fn format_score(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "inf".to_string()
    }
}

/// A `CENTER=VALUE` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionValue {
    pub center_section: String,
    pub value: String,
}

impl FromStr for SectionValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (center_section, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected CENTER=VALUE, got '{}'", s))?;
        let (center_section, value) = (center_section.trim(), value.trim());
        if center_section.is_empty() || value.is_empty() {
            return Err(format!("expected CENTER=VALUE, got '{}'", s));
        }
        Ok(Self {
            center_section: center_section.to_string(),
            value: value.to_string(),
        })
    }
}

/// Print warnings to stderr
pub fn print_warnings(warnings: &[Warning], quiet: bool) {
    if quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{} {}", style("!").yellow().bold(), warning);
    }
}

/// Print a status line to stderr
pub fn print_status(message: impl std::fmt::Display, quiet: bool) {
    if !quiet {
        eprintln!("{} {}", style("→").blue(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formats() {
        assert_eq!(format_length(12.34567), "12.346");
        assert_eq!(format_delta(0.125), "+0.125");
        assert_eq!(format_delta(-2.0), "-2.000");
        assert_eq!(format_mean(1.5), "1.50");
        assert_eq!(format_score(f64::INFINITY), "inf");
        assert_eq!(format_score(2.25), "2.25");
    }

    #[test]
    fn test_section_value() {
        let v: SectionValue = "S1 = F2".parse().unwrap();
        assert_eq!(v.center_section, "S1");
        assert_eq!(v.value, "F2");
        assert!("S1".parse::<SectionValue>().is_err());
        assert!("=F2".parse::<SectionValue>().is_err());
    }
}
