//! Verb rules: rewrites generated responsibilities so each one opens with an
//! action verb approved for the role's level.
//!
//! This is a cosmetic pass over LLM output. It never fails: an unknown level,
//! a blank sentence or a non-string item leaves the input as it was.

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;

use crate::models::jd::{JdDocument, Responsibility};

const SUPERVISORY_VERBS: &[&str] = &[
    "Manage",
    "Be responsible for",
    "Implement",
    "Execute",
    "Plan",
    "Monitor",
    "Ensure",
    "Assist",
    "Oversee",
];

const PROFESSIONAL_VERBS: &[&str] = &[
    "Prepare",
    "Report",
    "Ensure",
    "Execute",
    "Assist",
    "Coordinate",
    "Compile",
    "Organise",
    "Contribute",
];

const LEADERSHIP_VERBS: &[&str] = &[
    "Strategize",
    "Define",
    "Create",
    "Design",
    "Formulate",
    "Overlook",
    "Plan",
    "Identify",
    "Develop",
    "Evaluate",
    "Lead",
    "Establish",
];

/// A group of levels sharing one approved-verb vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbTier {
    /// Assistant Manager, Team Lead.
    Supervisory,
    /// Specialist, Analyst, Executive.
    Professional,
    /// Manager, Senior Manager, Director.
    Leadership,
}

impl VerbTier {
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            VerbTier::Supervisory => SUPERVISORY_VERBS,
            VerbTier::Professional => PROFESSIONAL_VERBS,
            VerbTier::Leadership => LEADERSHIP_VERBS,
        }
    }
}

/// Level keys in match order. A level belongs to the first key it contains,
/// so "Senior Manager" lands on "Manager" and "Executive Director" on
/// "Executive". Reordering this table changes which tier existing levels get.
const LEVEL_TIERS: &[(&str, VerbTier)] = &[
    ("Assistant Manager", VerbTier::Supervisory),
    ("Team Lead", VerbTier::Supervisory),
    ("Specialist", VerbTier::Professional),
    ("Analyst", VerbTier::Professional),
    ("Executive", VerbTier::Professional),
    ("Manager", VerbTier::Leadership),
    ("Senior Manager", VerbTier::Leadership),
    ("Director", VerbTier::Leadership),
];

/// Keyword groups scanned in order; the first group with a keyword anywhere in
/// the sentence picks the prefix verb.
const KEYWORD_VERBS: &[(&[&str], &str)] = &[
    (&["manage", "lead", "oversee"], "Manage"),
    (&["develop", "create", "design"], "Develop"),
    (&["coordinate", "support", "assist"], "Coordinate"),
    (&["ensure", "maintain"], "Ensure"),
    (&["prepare", "compile"], "Prepare"),
    (&["plan", "implement"], "Plan"),
    (&["execute", "carry out"], "Execute"),
    (&["report", "monitor"], "Report"),
    (&["organise", "organize"], "Organise"),
    (&["contribute", "participate"], "Contribute"),
];

const ARTICLES: &[&str] = &["the", "a", "an"];

/// Used when no keyword matches and the vocabulary is empty.
const FALLBACK_VERB: &str = "Manage";

/// Maps a free-text level onto its verb tier, if any key occurs in it.
pub fn resolve_tier(level: Option<&str>) -> Option<VerbTier> {
    let level = level?.trim().to_lowercase();
    if level.is_empty() {
        return None;
    }
    LEVEL_TIERS
        .iter()
        .find(|(key, _)| level.contains(&key.to_lowercase()))
        .map(|&(_, tier)| tier)
}

/// Returns the approved verbs for a level, or `None` when no rule applies.
pub fn resolve_vocabulary(level: Option<&str>) -> Option<&'static [&'static str]> {
    resolve_tier(level).map(VerbTier::vocabulary)
}

/// Rewrites one sentence to open with an approved verb.
///
/// Compliant and blank sentences come back borrowed and untouched.
pub fn normalize_sentence<'a>(sentence: &'a str, vocabulary: &[&str]) -> Cow<'a, str> {
    let trimmed = sentence.trim_matches(is_space);
    let Some(first_word) = trimmed.split(is_space).find(|w| !w.is_empty()) else {
        return Cow::Borrowed(sentence);
    };

    if starts_with_allowed_verb(first_word, vocabulary) {
        return Cow::Borrowed(sentence);
    }

    let verb = select_verb(trimmed, vocabulary);

    if ARTICLES.iter().any(|a| first_word.eq_ignore_ascii_case(a)) {
        return Cow::Owned(format!("{verb} {trimmed}"));
    }
    Cow::Owned(format!("{verb} {}", lowercase_first(trimmed)))
}

/// Normalizes a single bucket item. Non-string items pass through.
pub fn normalize_item(item: &Responsibility, vocabulary: &[&str]) -> Responsibility {
    match item.as_sentence() {
        Some(s) => Responsibility::Sentence(normalize_sentence(s, vocabulary).into_owned()),
        None => item.clone(),
    }
}

/// Applies the verb rules for `level` to every responsibility in `document`.
///
/// An absent document stays absent. A missing or unrecognised level returns
/// the document borrowed as-is. Otherwise a new document is built in which
/// only `responsibilities` differs, with the same buckets in the same order
/// and one output sentence per input sentence.
pub fn enforce_verb_rules<'a>(
    document: Option<&'a JdDocument>,
    level: Option<&str>,
) -> Option<Cow<'a, JdDocument>> {
    document.map(|doc| enforce_document(doc, level))
}

/// [`enforce_verb_rules`] for a document that is known to be present.
pub fn enforce_document<'a>(document: &'a JdDocument, level: Option<&str>) -> Cow<'a, JdDocument> {
    let Some(tier) = resolve_tier(level) else {
        return Cow::Borrowed(document);
    };
    let vocabulary = tier.vocabulary();

    let mut rewritten = 0usize;
    let responsibilities = document.responsibilities.as_ref().map(|buckets| {
        buckets.map_items(|item| {
            let out = normalize_item(item, vocabulary);
            if out != *item {
                rewritten += 1;
            }
            out
        })
    });

    debug!(?tier, rewritten, "Applied verb rules");

    Cow::Owned(JdDocument {
        responsibilities,
        ..document.clone()
    })
}

/// Unicode whitespace plus the byte-order mark, which editors and LLM output
/// sometimes leave at the start of a string.
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn starts_with_allowed_verb(first_word: &str, vocabulary: &[&str]) -> bool {
    // Word characters only, so "Manages," and "(Prepares)" still match.
    let bare: String = first_word
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase();
    let first_word = first_word.to_lowercase();

    vocabulary.iter().any(|verb| {
        let verb = verb.to_lowercase();
        bare.starts_with(&verb) || first_word == verb
    })
}

fn select_verb<'v>(sentence: &str, vocabulary: &[&'v str]) -> &'v str {
    let lower = sentence.to_lowercase();
    let keyword_verb: Option<&'v str> = KEYWORD_VERBS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|&(_, verb)| verb);
    keyword_verb
        .or_else(|| vocabulary.first().copied())
        .unwrap_or(FALLBACK_VERB)
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jd::Responsibilities;
    use serde_json::json;

    fn doc_with(buckets: serde_json::Value) -> JdDocument {
        serde_json::from_value(json!({
            "job_title": "People Operations Lead",
            "kpis": ["Time to hire under 30 days"],
            "responsibilities": buckets
        }))
        .unwrap()
    }

    fn sentences(doc: &JdDocument, bucket: &str) -> Vec<String> {
        doc.responsibilities
            .as_ref()
            .unwrap()
            .get(bucket)
            .unwrap()
            .iter()
            .map(|r| r.as_sentence().unwrap().to_string())
            .collect()
    }

    // ── level classification ────────────────────────────────────────────────

    #[test]
    fn test_exact_levels_resolve_to_their_tier() {
        assert_eq!(resolve_tier(Some("Assistant Manager")), Some(VerbTier::Supervisory));
        assert_eq!(resolve_tier(Some("Team Lead")), Some(VerbTier::Supervisory));
        assert_eq!(resolve_tier(Some("Specialist")), Some(VerbTier::Professional));
        assert_eq!(resolve_tier(Some("Analyst")), Some(VerbTier::Professional));
        assert_eq!(resolve_tier(Some("Executive")), Some(VerbTier::Professional));
        assert_eq!(resolve_tier(Some("Manager")), Some(VerbTier::Leadership));
        assert_eq!(resolve_tier(Some("Director")), Some(VerbTier::Leadership));
    }

    #[test]
    fn test_senior_manager_matches_manager_key_first() {
        // "Manager" precedes "Senior Manager" in the table; both are leadership.
        assert_eq!(resolve_tier(Some("Senior Manager")), Some(VerbTier::Leadership));
        assert_eq!(resolve_vocabulary(Some("Senior Manager")), Some(LEADERSHIP_VERBS));
    }

    #[test]
    fn test_assistant_manager_wins_over_manager() {
        assert_eq!(
            resolve_vocabulary(Some("Assistant Manager, Payroll")),
            Some(SUPERVISORY_VERBS)
        );
    }

    #[test]
    fn test_substring_match_uses_first_key_in_table_order() {
        // "Executive" is checked before "Director".
        assert_eq!(resolve_tier(Some("Executive Director")), Some(VerbTier::Professional));
        assert_eq!(resolve_tier(Some("Regional Sales Manager")), Some(VerbTier::Leadership));
    }

    #[test]
    fn test_level_match_is_case_insensitive_and_trimmed() {
        assert_eq!(resolve_tier(Some("  team lead  ")), Some(VerbTier::Supervisory));
        assert_eq!(resolve_tier(Some("SENIOR ANALYST")), Some(VerbTier::Professional));
    }

    #[test]
    fn test_unknown_or_missing_level_has_no_vocabulary() {
        assert_eq!(resolve_vocabulary(None), None);
        assert_eq!(resolve_vocabulary(Some("")), None);
        assert_eq!(resolve_vocabulary(Some("   ")), None);
        assert_eq!(resolve_vocabulary(Some("Intern")), None);
        assert_eq!(resolve_vocabulary(Some("Unrecognized Level XYZ")), None);
    }

    // ── sentence normalization ──────────────────────────────────────────────

    #[test]
    fn test_compliant_sentence_is_unchanged() {
        let out = normalize_sentence("Manages the onboarding process", SUPERVISORY_VERBS);
        assert_eq!(out, "Manages the onboarding process");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_compliance_ignores_punctuation_and_case() {
        assert_eq!(
            normalize_sentence("\"ensures\" data quality", PROFESSIONAL_VERBS),
            "\"ensures\" data quality"
        );
        assert_eq!(
            normalize_sentence("REPORTS: weekly headcount", PROFESSIONAL_VERBS),
            "REPORTS: weekly headcount"
        );
    }

    #[test]
    fn test_compliant_sentence_keeps_surrounding_whitespace() {
        let input = "  Prepare monthly payroll reconciliations  ";
        assert_eq!(normalize_sentence(input, PROFESSIONAL_VERBS), input);
    }

    #[test]
    fn test_keyword_picks_verb_and_lowercases_first_char() {
        assert_eq!(
            normalize_sentence("Supports recruitment drives", PROFESSIONAL_VERBS),
            "Coordinate supports recruitment drives"
        );
    }

    #[test]
    fn test_article_led_sentence_keeps_its_capital() {
        // "coordinates" hits the coordinate group before any fallback.
        assert_eq!(
            normalize_sentence("The team coordinates hiring events", PROFESSIONAL_VERBS),
            "Coordinate The team coordinates hiring events"
        );
        assert_eq!(
            normalize_sentence("An annual engagement survey", PROFESSIONAL_VERBS),
            "Prepare An annual engagement survey"
        );
    }

    #[test]
    fn test_no_keyword_falls_back_to_first_vocabulary_verb() {
        assert_eq!(
            normalize_sentence("Handles payroll queries", LEADERSHIP_VERBS),
            "Strategize handles payroll queries"
        );
    }

    #[test]
    fn test_empty_vocabulary_falls_back_to_manage() {
        assert_eq!(normalize_sentence("Handles payroll queries", &[]), "Manage handles payroll queries");
    }

    #[test]
    fn test_keyword_groups_scan_in_order() {
        // "lead" (group 1) beats "report" (group 8)
        assert_eq!(
            normalize_sentence("Quarterly leadership report", PROFESSIONAL_VERBS),
            "Manage quarterly leadership report"
        );
        assert_eq!(
            normalize_sentence("Keeps records to carry out audits", PROFESSIONAL_VERBS),
            "Execute keeps records to carry out audits"
        );
        assert_eq!(
            normalize_sentence("Takes part and participates in forums", SUPERVISORY_VERBS),
            "Contribute takes part and participates in forums"
        );
    }

    #[test]
    fn test_rewrite_trims_outer_whitespace() {
        assert_eq!(
            normalize_sentence("   Maintains HR policies ", PROFESSIONAL_VERBS),
            "Ensure maintains HR policies"
        );
    }

    #[test]
    fn test_byte_order_mark_is_trimmed() {
        assert_eq!(
            normalize_sentence("\u{feff}Handles payroll", LEADERSHIP_VERBS),
            "Strategize handles payroll"
        );
        assert_eq!(
            normalize_sentence("\u{feff}Prepares payslips", PROFESSIONAL_VERBS),
            "\u{feff}Prepares payslips"
        );
        assert_eq!(normalize_sentence("\u{feff} ", PROFESSIONAL_VERBS), "\u{feff} ");
    }

    #[test]
    fn test_blank_sentence_is_unchanged() {
        assert_eq!(normalize_sentence("", PROFESSIONAL_VERBS), "");
        assert_eq!(normalize_sentence("   \t", PROFESSIONAL_VERBS), "   \t");
    }

    #[test]
    fn test_multi_word_verbs_never_match_a_single_token() {
        // "Be responsible for" cannot be matched by the first token alone.
        assert_eq!(
            normalize_sentence("Be responsible for vendor contracts", SUPERVISORY_VERBS),
            "Manage be responsible for vendor contracts"
        );
    }

    #[test]
    fn test_normalizing_twice_is_stable_when_verb_is_in_vocabulary() {
        for s in [
            "Supports recruitment drives",
            "Compiles attendance data",
            "the onboarding checklist",
            "Handles payroll queries",
        ] {
            let once = normalize_sentence(s, PROFESSIONAL_VERBS).into_owned();
            let twice = normalize_sentence(&once, PROFESSIONAL_VERBS).into_owned();
            assert_eq!(once, twice, "not stable for {s:?}");
        }
    }

    #[test]
    fn test_prefix_verb_outside_vocabulary_is_prefixed_again() {
        // "Manage" is not a leadership verb, so a second pass adds another one.
        let once = normalize_sentence("Oversees budget planning", LEADERSHIP_VERBS).into_owned();
        assert_eq!(once, "Manage oversees budget planning");
        assert_eq!(
            normalize_sentence(&once, LEADERSHIP_VERBS),
            "Manage manage oversees budget planning"
        );
    }

    #[test]
    fn test_non_string_item_passes_through() {
        let item = Responsibility::Other(json!({"weight": 20}));
        assert_eq!(normalize_item(&item, PROFESSIONAL_VERBS), item);
    }

    // ── document enforcement ────────────────────────────────────────────────

    #[test]
    fn test_enforce_rewrites_responsibilities() {
        let doc = doc_with(json!({ "Ops": ["Oversees budget planning"] }));
        let out = enforce_verb_rules(Some(&doc), Some("Manager")).unwrap();
        assert_eq!(sentences(&out, "Ops"), vec!["Manage oversees budget planning"]);
        // input untouched
        assert_eq!(sentences(&doc, "Ops"), vec!["Oversees budget planning"]);
    }

    #[test]
    fn test_enforce_leaves_other_fields_alone() {
        let mut doc = doc_with(json!({ "Ops": ["Handles payroll"] }));
        doc.extra.insert("grade".into(), json!("G9"));
        let out = enforce_document(&doc, Some("Analyst")).into_owned();
        assert_eq!(out.job_title, doc.job_title);
        assert_eq!(out.kpis, doc.kpis);
        assert_eq!(out.extra, doc.extra);
        assert_ne!(out.responsibilities, doc.responsibilities);
    }

    #[test]
    fn test_enforce_preserves_shape_and_order() {
        let doc = doc_with(json!({
            "Talent": ["Leads hiring", "Reviews offers", "Prepares offer letters"],
            "Compliance": [],
            "Admin": ["Files records", 7]
        }));
        let out = enforce_document(&doc, Some("Specialist"));
        let before = doc.responsibilities.as_ref().unwrap();
        let after = out.responsibilities.as_ref().unwrap();

        let names_before: Vec<_> = before.bucket_names().collect();
        let names_after: Vec<_> = after.bucket_names().collect();
        assert_eq!(names_before, names_after);
        for (name, items) in before.iter() {
            assert_eq!(after.get(name).unwrap().len(), items.len(), "bucket {name}");
        }
        assert_eq!(after.get("Admin").unwrap()[1], Responsibility::Other(json!(7)));
    }

    #[test]
    fn test_enforce_is_noop_without_level() {
        let doc = doc_with(json!({ "Ops": ["Handles payroll"] }));
        let out = enforce_verb_rules(Some(&doc), None).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(*out, doc);
        assert_eq!(*enforce_document(&doc, Some("")), doc);
    }

    #[test]
    fn test_enforce_is_noop_for_unknown_level() {
        let doc = doc_with(json!({ "Ops": ["Handles payroll"] }));
        assert_eq!(*enforce_document(&doc, Some("Unrecognized Level XYZ")), doc);
    }

    #[test]
    fn test_enforce_absent_document_stays_absent() {
        assert!(enforce_verb_rules(None, Some("Manager")).is_none());
    }

    #[test]
    fn test_enforce_without_responsibilities() {
        let doc = JdDocument {
            job_title: Some("Analyst".into()),
            ..Default::default()
        };
        let out = enforce_document(&doc, Some("Analyst"));
        assert_eq!(*out, doc);
    }

    #[test]
    fn test_enforce_twice_keeps_bucket_counts() {
        let buckets: Responsibilities = [
            (
                "A",
                vec![
                    Responsibility::from("Leads audits"),
                    Responsibility::from("Designs surveys"),
                ],
            ),
            ("B", vec![Responsibility::from("Handles queries")]),
        ]
        .into_iter()
        .collect();
        let doc = JdDocument {
            responsibilities: Some(buckets),
            ..Default::default()
        };
        let once = enforce_document(&doc, Some("Director")).into_owned();
        let twice = enforce_document(&once, Some("Director")).into_owned();
        let a = twice.responsibilities.as_ref().unwrap();
        assert_eq!(a.get("A").unwrap().len(), 2);
        assert_eq!(a.get("B").unwrap().len(), 1);
    }
}
