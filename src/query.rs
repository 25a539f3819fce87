//! Deterministic GitHub issue-search query, used when the LLM cannot
//! produce one.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyPref {
    GoodFirst,
    HelpWanted,
    Any,
}

impl DifficultyPref {
    /// `goodFirst` and `helpWanted` are recognised; everything else is `Any`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "goodFirst" => Self::GoodFirst,
            "helpWanted" => Self::HelpWanted,
            _ => Self::Any,
        }
    }

    fn label_clause(self) -> Option<&'static str> {
        match self {
            Self::GoodFirst => Some(r#"label:"good first issue""#),
            Self::HelpWanted => Some(r#"label:"help wanted""#),
            Self::Any => None,
        }
    }
}

pub fn build_fallback_query(
    languages: &[String],
    difficulty: DifficultyPref,
    activity_days: i64,
) -> String {
    build_fallback_query_at(languages, difficulty, activity_days, Utc::now())
}

pub fn build_fallback_query_at(
    languages: &[String],
    difficulty: DifficultyPref,
    activity_days: i64,
    now: DateTime<Utc>,
) -> String {
    let mut parts: Vec<String> = vec!["type:issue".into(), "state:open".into()];

    if !languages.is_empty() {
        let joined = languages
            .iter()
            .map(|l| format!("language:{}", l))
            .collect::<Vec<_>>()
            .join(" OR ");
        parts.push(format!("({})", joined));
    }

    if let Some(label) = difficulty.label_clause() {
        parts.push(label.to_string());
    }

    let cutoff = Duration::try_days(activity_days)
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(now);
    parts.push(format!("updated:>={}", cutoff.format("%Y-%m-%d")));

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn frozen() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0).unwrap()
    }

    fn langs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn always_has_mandatory_terms() {
        for pref in ["goodFirst", "helpWanted", "any", ""] {
            let q = build_fallback_query_at(&[], DifficultyPref::parse(pref), 30, frozen());
            assert!(q.contains("type:issue"));
            assert!(q.contains("state:open"));
            assert!(q.contains("updated:>="));
        }
    }

    #[test]
    fn label_clauses_follow_difficulty() {
        let gf = build_fallback_query_at(&[], DifficultyPref::parse("goodFirst"), 30, frozen());
        assert!(gf.contains(r#"label:"good first issue""#));
        assert!(!gf.contains(r#"label:"help wanted""#));

        let hw = build_fallback_query_at(&[], DifficultyPref::parse("helpWanted"), 30, frozen());
        assert!(hw.contains(r#"label:"help wanted""#));
        assert!(!hw.contains(r#"label:"good first issue""#));

        let any = build_fallback_query_at(&[], DifficultyPref::parse("hard"), 30, frozen());
        assert!(!any.contains("label:"));
    }

    #[test]
    fn languages_become_or_group() {
        let q = build_fallback_query_at(&langs(&["Go", "Rust"]), DifficultyPref::Any, 30, frozen());
        assert!(q.contains("(language:Go OR language:Rust)"));
    }

    #[test]
    fn full_query_in_fixed_order() {
        let q = build_fallback_query_at(
            &langs(&["Python"]),
            DifficultyPref::GoodFirst,
            180,
            frozen(),
        );
        assert_eq!(
            q,
            r#"type:issue state:open (language:Python) label:"good first issue" updated:>=2025-09-11"#
        );
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let a = build_fallback_query_at(&langs(&["Go"]), DifficultyPref::HelpWanted, 7, frozen());
        let b = build_fallback_query_at(&langs(&["Go"]), DifficultyPref::HelpWanted, 7, frozen());
        assert_eq!(a, b);
    }
}
