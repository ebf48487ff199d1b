use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::IssueCode;

// `[0-9]` rather than `\d`: the regex crate's `\d` is Unicode-aware.
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex"));
static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date regex"));
static URI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s]+$").expect("uri regex"));
static IPV4_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,3}\.){3}[0-9]{1,3}$").expect("ipv4 regex"));
static IPV6: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$|^::1$|^::$").expect("ipv6 regex"));

/// String formats the validator knows how to check. Any other `format`
/// value is accepted without a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Date,
    DateTime,
    Uri,
    Ipv4,
    Ipv6,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(Self::Email),
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            "uri" => Some(Self::Uri),
            "ipv4" => Some(Self::Ipv4),
            "ipv6" => Some(Self::Ipv6),
            _ => None,
        }
    }

    pub fn is_valid(self, s: &str) -> bool {
        match self {
            Self::Email => EMAIL.is_match(s),
            Self::Date => DATE_SHAPE.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            Self::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
            Self::Uri => URI.is_match(s),
            Self::Ipv4 => IPV4_SHAPE.is_match(s) && s.split('.').all(|octet| octet.parse::<u16>().is_ok_and(|n| n <= 255)),
            Self::Ipv6 => IPV6.is_match(s),
        }
    }

    pub fn code(self) -> IssueCode {
        match self {
            Self::Email => IssueCode::FormatEmail,
            Self::Date => IssueCode::FormatDate,
            Self::DateTime => IssueCode::FormatDatetime,
            Self::Uri => IssueCode::FormatUri,
            Self::Ipv4 => IssueCode::FormatIpv4,
            Self::Ipv6 => IssueCode::FormatIpv6,
        }
    }

    /// Completes "Field 'x' must be ...".
    pub fn describe(self) -> &'static str {
        match self {
            Self::Email => "a valid email address",
            Self::Date => "a valid date (YYYY-MM-DD)",
            Self::DateTime => "a valid date-time (RFC3339)",
            Self::Uri => "a valid URI",
            Self::Ipv4 => "a valid IPv4 address",
            Self::Ipv6 => "a valid IPv6 address",
        }
    }

    pub fn expected(self) -> &'static str {
        match self {
            Self::Email => "valid email format",
            Self::Date => "YYYY-MM-DD format",
            Self::DateTime => "RFC3339 format",
            Self::Uri => "valid URI format",
            Self::Ipv4 => "IPv4 format",
            Self::Ipv6 => "IPv6 format",
        }
    }
}
