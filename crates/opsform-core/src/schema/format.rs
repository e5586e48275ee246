// ── Value shape checks ──

use std::net::{IpAddr, Ipv4Addr};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use url::Url;

use crate::model::{Format, MessageKey, keys};

#[allow(clippy::unwrap_used)]
static MAC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{2}([:-])(?:[0-9A-Fa-f]{2}[:-]){4}[0-9A-Fa-f]{2}$").unwrap());

#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$").unwrap()
});

#[allow(clippy::unwrap_used)]
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9](?:[0-9 \-]{4,18})[0-9]$").unwrap());

#[allow(clippy::unwrap_used)]
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?\.)*[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?$").unwrap()
});

impl Format {
    /// Message key reported when a value fails this format.
    pub fn message(self) -> MessageKey {
        match self {
            Self::Ipv4 => keys::INVALID_IPV4,
            Self::Ip => keys::INVALID_IP,
            Self::Mac => keys::INVALID_MAC,
            Self::Url => keys::INVALID_URL,
            Self::Email => keys::INVALID_EMAIL,
            Self::Phone => keys::INVALID_PHONE,
            Self::Hostname => keys::INVALID_HOSTNAME,
        }
    }

    pub fn matches(self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            Self::Ipv4 => raw.parse::<Ipv4Addr>().is_ok(),
            Self::Ip => raw.parse::<IpAddr>().is_ok(),
            Self::Mac => is_mac(raw),
            Self::Url => is_web_url(raw),
            Self::Email => EMAIL.is_match(raw),
            Self::Phone => PHONE.is_match(raw),
            Self::Hostname => raw.len() <= 253 && HOSTNAME.is_match(raw),
        }
    }
}

/// Six octets with one consistent separator (`:` or `-`).
fn is_mac(raw: &str) -> bool {
    let Some(caps) = MAC.captures(raw) else {
        return false;
    };
    let sep = caps.get(1).map_or("", |m| m.as_str());
    raw.matches(sep).count() == 5
}

/// An http(s) URL with a host. A bare `host/path` is accepted as well,
/// since landing-page forms pick the scheme from a separate field.
fn is_web_url(raw: &str) -> bool {
    let parsed = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{raw}"))
    };
    match parsed {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| h.contains('.') || h == "localhost")
        }
        Err(_) => false,
    }
}

/// Parse a date from `YYYY-MM-DD` or the date part of an RFC 3339 stamp.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_formats() {
        assert!(Format::Ipv4.matches("10.0.0.1"));
        assert!(!Format::Ipv4.matches("10.0.0.256"));
        assert!(!Format::Ipv4.matches("::1"));
        assert!(Format::Ip.matches("::1"));
        assert!(Format::Ip.matches(" 192.168.1.1 "));
    }

    #[test]
    fn mac_requires_consistent_separator() {
        assert!(Format::Mac.matches("aa:bb:cc:dd:ee:ff"));
        assert!(Format::Mac.matches("AA-BB-CC-DD-EE-FF"));
        assert!(!Format::Mac.matches("aa:bb-cc:dd:ee:ff"));
        assert!(!Format::Mac.matches("aabbccddeeff"));
    }

    #[test]
    fn url_accepts_bare_host() {
        assert!(Format::Url.matches("https://example.com/welcome"));
        assert!(Format::Url.matches("example.com/welcome?x=1"));
        assert!(!Format::Url.matches("ftp://example.com"));
        assert!(!Format::Url.matches("not a url"));
        assert!(!Format::Url.matches("intranet"));
    }

    #[test]
    fn email_and_phone() {
        assert!(Format::Email.matches("ops@example.net"));
        assert!(!Format::Email.matches("ops@localhost"));
        assert!(Format::Phone.matches("+44 20 7946 0958"));
        assert!(!Format::Phone.matches("call me"));
    }

    #[test]
    fn hostname() {
        assert!(Format::Hostname.matches("radius-1.corp.example"));
        assert!(!Format::Hostname.matches("-bad.example"));
    }

    #[test]
    fn dates_parse_with_or_without_time() {
        assert_eq!(
            parse_date("2026-05-01T10:00:00Z"),
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
        assert_eq!(parse_date("2026-05-01"), NaiveDate::from_ymd_opt(2026, 5, 1));
        assert_eq!(parse_date("05/01/2026"), None);
    }
}
