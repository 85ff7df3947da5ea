//! Rule-based category and severity assignment.
//!
//! Both rule sets are plain data: categories are an ordered priority list
//! where the first label with any matching keyword wins, and severity is an
//! additive score over distinct keywords found anywhere in the text. Matching
//! is case-insensitive substring containment, so `cve-` matches
//! `CVE-2024-1234`.

use cybernews_core::Severity;

/// Label used when no category rule matches.
pub const DEFAULT_CATEGORY: &str = "general";

/// Ordered `(label, keywords)` pairs; earlier entries take priority.
pub const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("ransomware", &["ransomware", "encrypt", "extortion", "locker"]),
    (
        "vulnerabilidades",
        &[
            "cve-",
            "vulnerability",
            "zero-day",
            "0-day",
            "patch",
            "rce",
            "xss",
            "sqli",
            "csrf",
        ],
    ),
    ("apt", &["apt", "state-sponsored", "nation-state", "espionage"]),
    (
        "leaks/breaches",
        &[
            "breach",
            "leak",
            "data stolen",
            "exposed",
            "compromised",
            "stolen data",
        ],
    ),
    (
        "cloud",
        &[
            "aws",
            "azure",
            "gcp",
            "kubernetes",
            "docker",
            "cloud",
            "iam",
            "s3",
            "blob",
        ],
    ),
    (
        "phishing",
        &["phishing", "vishing", "smishing", "credential harvesting"],
    ),
    (
        "malware",
        &["malware", "trojan", "botnet", "loader", "backdoor", "rat"],
    ),
    ("ics/ot", &["ics", "scada", "ot", "plc"]),
];

pub const HIGH_SIGNAL_KEYWORDS: &[&str] = &[
    "zero-day",
    "0-day",
    "rce",
    "remote code execution",
    "worm",
    "critical",
    "actively exploited",
    "exploited in the wild",
    "cve-",
    "unauthenticated",
    "privilege escalation",
    "supply chain",
    "ransomware",
    "data leak",
    "breach",
    "mass exploitation",
];

pub const MEDIUM_SIGNAL_KEYWORDS: &[&str] = &[
    "vulnerability",
    "patch",
    "phishing",
    "malware",
    "botnet",
    "ddos",
    "credential",
    "token",
    "backdoor",
    "loader",
    "exploit",
    "poc",
];

/// Category-specific SOC guidance. Categories not listed fall back to
/// [`GENERIC_SOC_ACTION`].
const SOC_ACTIONS: &[(&str, &str)] = &[
    (
        "ransomware",
        "Review EDR for mass-encryption behaviour, verify backups and restore paths, look for ransom notes or extortion contact, and hunt IoCs (hashes, domains, IPs).",
    ),
    (
        "vulnerabilidades",
        "Prioritise patching or mitigation, check exposure against inventory and scans, and search WAF/IDS and authentication logs for exploit attempts.",
    ),
    (
        "apt",
        "Run TTP-driven hunts (MITRE ATT&CK) on critical endpoints, review credentials, persistence and C2 traffic, and enable temporary detections.",
    ),
    (
        "leaks/breaches",
        "Confirm scope, review anomalous access, rotate exposed credentials and tokens, check exfiltration logs, and notify internal stakeholders.",
    ),
    (
        "cloud",
        "Audit IAM, public exposure, policy changes, keys and tokens, and cloud audit logs (CloudTrail, Azure Activity); apply quick hardening.",
    ),
    (
        "phishing",
        "Search the mail gateway for the campaign, block sender domains and URLs, review endpoints that clicked, and force MFA resets where needed.",
    ),
    (
        "malware",
        "Isolate hosts showing indicators, extract IoCs, review persistence (run keys, services), and deploy YARA/EDR rules.",
    ),
    (
        "ics/ot",
        "Review network segmentation, remote access and VPN use, controller changes, and integrity alerts; coordinate with the OT team.",
    ),
];

pub const GENERIC_SOC_ACTION: &str =
    "Review relevant logs and telemetry, extract IoCs, validate exposure, and apply mitigations.";

/// First category whose keywords occur in `text`, or [`DEFAULT_CATEGORY`].
#[must_use]
pub fn categorize(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(DEFAULT_CATEGORY, |(label, _)| *label)
}

/// Weighted keyword scoring with tier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityRules {
    pub high_keywords: &'static [&'static str],
    pub medium_keywords: &'static [&'static str],
    pub high_weight: u32,
    pub medium_weight: u32,
    /// Minimum score for [`Severity::Alta`].
    pub alta_threshold: u32,
    /// Minimum score for [`Severity::Media`].
    pub media_threshold: u32,
}

impl SeverityRules {
    pub const DEFAULT: Self = Self {
        high_keywords: HIGH_SIGNAL_KEYWORDS,
        medium_keywords: MEDIUM_SIGNAL_KEYWORDS,
        high_weight: 3,
        medium_weight: 1,
        alta_threshold: 5,
        media_threshold: 2,
    };

    /// Sum of weights of the distinct keywords present in `text`.
    #[must_use]
    pub fn score(&self, text: &str) -> u32 {
        let lowered = text.to_lowercase();
        let hits = |keywords: &[&str]| -> u32 {
            let n = keywords.iter().filter(|k| lowered.contains(*k)).count();
            u32::try_from(n).unwrap_or(u32::MAX)
        };
        hits(self.high_keywords).saturating_mul(self.high_weight)
            + hits(self.medium_keywords).saturating_mul(self.medium_weight)
    }

    #[must_use]
    pub fn tier(&self, score: u32) -> Severity {
        if score >= self.alta_threshold {
            Severity::Alta
        } else if score >= self.media_threshold {
            Severity::Media
        } else {
            Severity::Baja
        }
    }

    #[must_use]
    pub fn estimate(&self, text: &str) -> Severity {
        self.tier(self.score(text))
    }
}

impl Default for SeverityRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// SOC guidance for a `(category, severity)` pair: the category's base action
/// followed by a severity-dependent suffix.
#[must_use]
pub fn soc_action(category: &str, severity: Severity) -> String {
    let base = SOC_ACTIONS
        .iter()
        .find(|(label, _)| *label == category)
        .map_or(GENERIC_SOC_ACTION, |(_, action)| *action);
    let suffix = match severity {
        Severity::Alta => "(ALTA) Escalate priority, open an investigation, and enable reinforced monitoring.",
        Severity::Media => "(MEDIA) Review the same day and tune detections.",
        Severity::Baja => "(BAJA) Monitor and log.",
    };
    format!("{base} {suffix}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: &'static str,
    pub severity: Severity,
    pub soc_action: String,
}

/// Applies the category table and a [`SeverityRules`] to article text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    pub severity_rules: SeverityRules,
}

impl Classifier {
    #[must_use]
    pub fn new(severity_rules: SeverityRules) -> Self {
        Self { severity_rules }
    }

    /// Classify `title` plus `body`, both read as one lower-cased text.
    #[must_use]
    pub fn classify(&self, title: &str, body: &str) -> Classification {
        let text = format!("{title} {body}");
        let category = categorize(&text);
        let severity = self.severity_rules.estimate(&text);
        Classification {
            category,
            severity,
            soc_action: soc_action(category, severity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ransomware_wins_over_later_categories() {
        assert_eq!(
            categorize("Ransomware crew adds extortion and a new loader"),
            "ransomware"
        );
    }

    #[test]
    fn priority_order_beats_keyword_count() {
        // Three malware keywords, one vulnerability keyword.
        assert_eq!(
            categorize("Trojan botnet malware abuses unpatched CVE-2024-1111"),
            "vulnerabilidades"
        );
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(categorize("Weekly events calendar"), DEFAULT_CATEGORY);
        assert_eq!(categorize(""), DEFAULT_CATEGORY);
    }

    #[test]
    fn matching_is_substring_based() {
        assert_eq!(categorize("SCADA vendor issues advisory"), "ics/ot");
        assert_eq!(categorize("New Azure tenant misconfigurations"), "cloud");
    }

    #[test]
    fn cve_and_actively_exploited_is_alta() {
        let rules = SeverityRules::default();
        let text = "cve-2023-0001 is being actively exploited";
        // cve- (3) + actively exploited (3) + exploit (1)
        assert_eq!(rules.score(text), 7);
        assert_eq!(rules.estimate(text), Severity::Alta);
    }

    #[test]
    fn keywords_count_once_each() {
        let rules = SeverityRules::default();
        assert_eq!(rules.score("patch patch patch"), 1);
        assert_eq!(rules.estimate("patch patch patch"), Severity::Baja);
    }

    #[test]
    fn medium_tier_from_medium_keywords() {
        let rules = SeverityRules::default();
        assert_eq!(rules.score("phishing kit steals a token"), 2);
        assert_eq!(rules.estimate("phishing kit steals a token"), Severity::Media);
    }

    #[test]
    fn thresholds_are_configurable() {
        let strict = SeverityRules {
            alta_threshold: 10,
            ..SeverityRules::default()
        };
        assert_eq!(strict.estimate("critical zero-day"), Severity::Media);
        assert_eq!(SeverityRules::default().estimate("critical zero-day"), Severity::Alta);
    }

    #[test]
    fn soc_action_appends_severity_suffix() {
        let action = soc_action("ransomware", Severity::Alta);
        assert!(action.starts_with("Review EDR"));
        assert!(action.ends_with("enable reinforced monitoring."));
        assert!(soc_action("phishing", Severity::Baja).ends_with("(BAJA) Monitor and log."));
    }

    #[test]
    fn unknown_category_uses_generic_action() {
        let action = soc_action("general", Severity::Media);
        assert!(action.starts_with(GENERIC_SOC_ACTION));
        assert!(action.contains("(MEDIA)"));
    }

    #[test]
    fn every_category_has_a_soc_action() {
        for (label, _) in CATEGORY_RULES {
            assert!(
                SOC_ACTIONS.iter().any(|(l, _)| l == label),
                "missing SOC action for {label}"
            );
        }
    }

    #[test]
    fn classify_reads_title_and_body() {
        let c = Classifier::default().classify(
            "Hospital hit",
            "The ransomware group demands extortion after a breach",
        );
        assert_eq!(c.category, "ransomware");
        assert_eq!(c.severity, Severity::Alta);
        assert_eq!(c.soc_action, soc_action("ransomware", Severity::Alta));
    }
}
