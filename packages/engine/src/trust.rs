//! Source trust, recency, and reporting-language weighting.
//!
//! All three factors are pure functions of their inputs. The domain table
//! and the reporting pattern set are explicit, ordered rule tables rather
//! than hard-coded branches, so the cascade stays auditable and each rule
//! can be tested in isolation.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use regex::Regex;

/// Hosts whose refutations short-circuit the decision cascade. Order sets
/// the resort priority for retrieved documents.
pub const FACTCHECK_DOMAINS: [&str; 4] = [
    "snopes.com",
    "politifact.com",
    "factcheck.org",
    "apnews.com",
];

/// Trust assigned to hosts not present in the curated table.
pub const DEFAULT_TRUST: f64 = 0.4;

/// Canonical reporting-on-an-allegation patterns. A passage matching any of
/// these merely narrates a claim rather than assessing it.
const REPORTING_PATTERNS: [&str; 15] = [
    "alleged",
    "allegedly",
    "allege",
    "reports?",
    "reports that",
    "police said",
    "police have said",
    "according to police",
    "according to authorities",
    "claimed",
    "claim",
    "allegation",
    "investigation under way",
    "investigat",
    "hoax",
];

/// Curated, priority-ordered trust weights and the decay/penalty factors
/// applied to every evidence record.
#[derive(Debug, Clone)]
pub struct TrustModel {
    /// First entry whose domain is a substring of the host wins.
    table: IndexMap<String, f64>,
    default_trust: f64,
    /// Per-day decay constant for the recency factor.
    recency_decay: f64,
    /// Multiplier applied when reporting language matches.
    reporting_penalty: f64,
    reporting_regex: Regex,
}

impl Default for TrustModel {
    fn default() -> Self {
        let table: IndexMap<String, f64> = [
            ("snopes.com", 1.00),
            ("politifact.com", 1.00),
            ("factcheck.org", 1.00),
            ("apnews.com", 0.95),
            ("reuters.com", 0.95),
            ("bbc.co.uk", 0.95),
            ("nytimes.com", 0.90),
            ("theguardian.com", 0.90),
            ("timesofindia.com", 0.6),
            ("pune-pulse.com", 0.4),
        ]
        .into_iter()
        .map(|(d, t)| (d.to_string(), t))
        .collect();

        Self {
            table,
            default_trust: DEFAULT_TRUST,
            recency_decay: 0.0015,
            reporting_penalty: 0.4,
            reporting_regex: compile_patterns(&REPORTING_PATTERNS),
        }
    }
}

impl TrustModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the curated trust table. Entry order is match priority.
    pub fn with_table(mut self, entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.table = entries.into_iter().collect();
        self
    }

    /// Replace the reporting pattern set.
    pub fn with_reporting_patterns(mut self, patterns: &[&str]) -> Self {
        self.reporting_regex = compile_patterns(patterns);
        self
    }

    /// Set the penalty multiplier for reporting language.
    pub fn with_reporting_penalty(mut self, penalty: f64) -> Self {
        self.reporting_penalty = penalty;
        self
    }

    /// Set the per-day recency decay constant.
    pub fn with_recency_decay(mut self, k: f64) -> Self {
        self.recency_decay = k;
        self
    }

    /// Trust weight for a source URL.
    ///
    /// The first table entry whose domain string occurs in the lower-cased,
    /// `www.`-stripped host wins; unknown hosts get the default.
    pub fn domain_trust(&self, url: &str) -> f64 {
        let Some(host) = host_of(url) else {
            return self.default_trust;
        };
        for (domain, trust) in &self.table {
            if host.contains(domain.as_str()) {
                return *trust;
            }
        }
        self.default_trust
    }

    /// Recency multiplier for a publish timestamp, evaluated against now.
    pub fn recency_factor(&self, published_at: Option<&str>) -> f64 {
        self.recency_factor_at(published_at, Utc::now())
    }

    /// Recency multiplier against an explicit evaluation instant.
    ///
    /// A missing or unparseable timestamp yields 1.0: absence of data must
    /// not bias toward staleness. Otherwise `1 / (1 + k * days)`, clamping
    /// future dates to day zero.
    pub fn recency_factor_at(&self, published_at: Option<&str>, now: DateTime<Utc>) -> f64 {
        let Some(raw) = published_at else {
            return 1.0;
        };
        let Some(published) = parse_timestamp(raw) else {
            return 1.0;
        };
        let days = (now - published).num_days().max(0) as f64;
        1.0 / (1.0 + self.recency_decay * days)
    }

    /// Penalty multiplier for reporting-on-an-allegation language.
    pub fn reporting_penalty(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 1.0;
        }
        if self.reporting_regex.is_match(text) {
            self.reporting_penalty
        } else {
            1.0
        }
    }
}

fn compile_patterns(patterns: &[&str]) -> Regex {
    let alternation = patterns.join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("reporting patterns must compile")
}

/// Lower-cased host with any leading `www.` stripped.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Whether the URL's host belongs to the fixed fact-checking domain list.
pub fn is_factcheck_url(url: &str) -> bool {
    factcheck_rank(url).is_some()
}

/// Position of the URL's host in the fact-check list, if any. Lower ranks
/// sort earlier during document resorting.
pub fn factcheck_rank(url: &str) -> Option<usize> {
    let host = host_of(url)?;
    FACTCHECK_DOMAINS.iter().position(|d| host.contains(d))
}

/// Parse a loosely formatted publish timestamp.
///
/// Accepted: RFC 3339 (covers `...Z` and offset forms), RFC 2822 (news feed
/// style), and bare `%Y-%m-%d`.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn table_entry_matches_through_www_prefix() {
        let model = TrustModel::default();
        assert_eq!(model.domain_trust("https://www.politifact.com/x"), 1.0);
        assert_eq!(model.domain_trust("https://reuters.com/article/1"), 0.95);
    }

    #[test]
    fn unknown_host_gets_default_trust() {
        let model = TrustModel::default();
        assert_eq!(model.domain_trust("https://example-blog.net/post"), DEFAULT_TRUST);
    }

    #[test]
    fn unparseable_url_gets_default_trust() {
        let model = TrustModel::default();
        assert_eq!(model.domain_trust("not a url"), DEFAULT_TRUST);
    }

    #[test]
    fn recency_is_one_for_missing_or_garbage_timestamps() {
        let model = TrustModel::default();
        assert_eq!(model.recency_factor(None), 1.0);
        assert_eq!(model.recency_factor(Some("next Tuesday")), 1.0);
    }

    #[test]
    fn recency_is_one_on_publish_day() {
        let model = TrustModel::default();
        let now = Utc::now();
        let today = now.to_rfc3339();
        assert_eq!(model.recency_factor_at(Some(&today), now), 1.0);
    }

    #[test]
    fn recency_decays_gently() {
        let model = TrustModel::default();
        let now = DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let month_old = model.recency_factor_at(Some("2025-05-02"), now);
        assert!((month_old - 1.0 / (1.0 + 0.0015 * 30.0)).abs() < 1e-9);

        let year_old = model.recency_factor_at(Some("2024-06-01"), now);
        assert!(year_old > 0.6 && year_old < 0.7);
    }

    #[test]
    fn rfc2822_feed_timestamps_parse() {
        let model = TrustModel::default();
        let now = DateTime::parse_from_rfc3339("2022-01-31T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let factor = model.recency_factor_at(Some("Sat, 01 Jan 2022 12:00:00 GMT"), now);
        assert!((factor - 1.0 / (1.0 + 0.0015 * 30.0)).abs() < 1e-9);
    }

    #[test]
    fn future_timestamps_clamp_to_day_zero() {
        let model = TrustModel::default();
        let now = Utc::now();
        let future = (now + Duration::days(10)).to_rfc3339();
        assert_eq!(model.recency_factor_at(Some(&future), now), 1.0);
    }

    #[test]
    fn reporting_language_is_penalized() {
        let model = TrustModel::default();
        let penalty = model.reporting_penalty("police said the incident is under investigation");
        assert!(penalty < 1.0);
        assert_eq!(penalty, 0.4);
    }

    #[test]
    fn plain_assertions_are_not_penalized() {
        let model = TrustModel::default();
        assert_eq!(model.reporting_penalty("The company confirmed the merger on Monday"), 1.0);
        assert_eq!(model.reporting_penalty(""), 1.0);
    }

    #[test]
    fn factcheck_hosts_are_recognized_and_ranked() {
        assert!(is_factcheck_url("https://www.snopes.com/fact-check/x"));
        assert!(!is_factcheck_url("https://reuters.com/a"));
        assert_eq!(factcheck_rank("https://snopes.com/x"), Some(0));
        assert_eq!(factcheck_rank("https://apnews.com/x"), Some(3));
    }

    proptest! {
        /// 1/(1 + k*days) is non-increasing in days and always in (0, 1].
        #[test]
        fn recency_monotone_and_bounded(days in 0i64..36500) {
            let model = TrustModel::default();
            let now = DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc);
            let published = (now - Duration::days(days)).to_rfc3339();
            let factor = model.recency_factor_at(Some(&published), now);

            prop_assert!(factor > 0.0 && factor <= 1.0);

            let older = (now - Duration::days(days + 1)).to_rfc3339();
            let older_factor = model.recency_factor_at(Some(&older), now);
            prop_assert!(older_factor <= factor);
        }
    }
}
