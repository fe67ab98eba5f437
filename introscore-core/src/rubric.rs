//! Phrase tables that drive the content scorers, and their TOML overrides.
//!
//! [`Rubric::default`] carries the built-in tables.  A project can override
//! any of them with an `.introscore` file:
//!
//! ```toml
//! closings = ["thank you", "that is all"]
//! fillers  = ["um", "uh", "you know"]
//! ignored_grammar_rules = ["MORFOLOGIK_RULE_EN_US"]
//!
//! [keywords.must_have]
//! Name = ["myself", "my name is"]
//!
//! [keywords.good_to_have]
//! Goals = ["goal", "dream", "want to become"]
//!
//! [salutations]
//! good = ["good morning", "hello everyone"]
//! ```
//!
//! Keys that are absent keep their defaults.  Topic names must be one of the
//! built-in topics, since each tier has a fixed maximum.
//!
//! # Discovery
//! [`Rubric::load`] walks upward from a path looking for `.introscore` (or a
//! `.git` directory marking the project root), then falls back to
//! `<config dir>/introscore/rubric.toml`.  Parse failures are logged and the
//! defaults are used.  [`Rubric::from_file`] is the strict variant.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::SalutationLevel;
use crate::tiers::{self, TierError};

/// Config file name looked up by [`Rubric::load`].
pub const CONFIG_FILE: &str = ".introscore";

/// The two keyword tiers and their per-topic weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTier {
    MustHave,
    GoodToHave,
}

impl KeywordTier {
    pub fn weight(self) -> u32 {
        match self {
            KeywordTier::MustHave => 4,
            KeywordTier::GoodToHave => 2,
        }
    }
}

impl std::fmt::Display for KeywordTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordTier::MustHave => write!(f, "Must Have"),
            KeywordTier::GoodToHave => write!(f, "Good to Have"),
        }
    }
}

/// A keyword topic and the literal phrases that count as evidence for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub phrases: Vec<String>,
}

/// Ordered topics for both keyword tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseTable {
    pub must_have: Vec<Topic>,
    pub good_to_have: Vec<Topic>,
}

impl PhraseTable {
    /// Topics of both tiers, Must Have first, in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (KeywordTier, &Topic)> {
        self.must_have
            .iter()
            .map(|t| (KeywordTier::MustHave, t))
            .chain(self.good_to_have.iter().map(|t| (KeywordTier::GoodToHave, t)))
    }

    /// Phrases for a topic by name, or an empty slice if it is not configured.
    pub fn phrases(&self, topic: &str) -> &[String] {
        self.iter()
            .find(|(_, t)| t.name == topic)
            .map(|(_, t)| t.phrases.as_slice())
            .unwrap_or(&[])
    }

    /// Highest score the table can award.
    pub fn max_score(&self) -> u32 {
        self.iter().map(|(tier, _)| tier.weight()).sum()
    }
}

/// Greeting phrases per level, checked Excellent → Good → Normal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalutationTiers {
    pub excellent: Vec<String>,
    pub good: Vec<String>,
    pub normal: Vec<String>,
}

impl SalutationTiers {
    pub fn in_priority_order(&self) -> [(SalutationLevel, &[String]); 3] {
        [
            (SalutationLevel::Excellent, self.excellent.as_slice()),
            (SalutationLevel::Good, self.good.as_slice()),
            (SalutationLevel::Normal, self.normal.as_slice()),
        ]
    }

    /// Every greeting phrase regardless of level.
    pub fn all_phrases(&self) -> impl Iterator<Item = &String> {
        self.excellent.iter().chain(&self.good).chain(&self.normal)
    }
}

/// The complete, read-only configuration for one scoring process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rubric {
    pub keywords: PhraseTable,
    pub salutations: SalutationTiers,
    pub closings: Vec<String>,
    pub fillers: Vec<String>,
    /// Grammar rule ids whose issues are not counted (spelling of proper nouns).
    pub ignored_grammar_rules: Vec<String>,
}

// ── built-in tables ──────────────────────────────────────────────────────

const MUST_HAVE: &[(&str, &[&str])] = &[
    ("Name", &["myself", "i am", "name is", "this is"]),
    ("Age", &["years old", "age is"]),
    ("Class_School", &[
        "class", "grade", "standard", "studying in", "school", "academy",
        "college", "university", "institute",
    ]),
    ("Family", &["family", "mother", "father", "parents", "brother", "sister", "siblings"]),
    ("Hobbies", &[
        "hobby", "hobbies", "enjoy", "like to", "playing", "interest", "pastime",
        "favorite subject",
    ]),
];

const GOOD_TO_HAVE: &[(&str, &[&str])] = &[
    ("About Family", &["live with my family", "people in my family", "about my family"]),
    ("Origin", &["i am from", "parents are from", "native", "born in"]),
    ("Goals", &[
        "goal", "ambition", "want to become", "future", "aim", "dream", "explore",
        "improve", "become",
    ]),
    ("Unique", &[
        "special thing", "fun fact", "unique", "don't know about me", "secret",
        "interesting thing",
    ]),
    ("Strengths", &[
        "strength", "achievement", "good at", "proud of", "won", "award", "medal",
        "success", "excel", "talented",
    ]),
];

const SALUTATION_EXCELLENT: &[&str] = &["i am excited to introduce", "feeling great"];
const SALUTATION_GOOD: &[&str] = &[
    "good morning", "good afternoon", "good evening", "good day", "hello everyone",
];
const SALUTATION_NORMAL: &[&str] = &["hi", "hello"];

const CLOSINGS: &[&str] = &[
    "thank you", "thanks", "regards", "best", "sincerely", "that's all", "thanking you",
];

const FILLERS: &[&str] = &[
    "um", "uh", "like", "you know", "so", "actually", "basically", "right", "i mean",
    "well", "kinda", "sort of", "okay", "hmm", "ah",
];

const IGNORED_GRAMMAR_RULES: &[&str] = &["MORFOLOGIK_RULE_EN_US"];

/// Topics whose phrases mark the Details section in the flow check.
pub const DETAIL_TOPICS: &[&str] = &["Age", "Class_School", "Family"];

/// Topic whose phrases mark the Name section in the flow check.
pub const NAME_TOPIC: &str = "Name";

fn owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

fn topics(table: &[(&str, &[&str])]) -> Vec<Topic> {
    table
        .iter()
        .map(|(name, phrases)| Topic {
            name: name.to_string(),
            phrases: owned(phrases),
        })
        .collect()
}

impl Default for Rubric {
    fn default() -> Self {
        Rubric {
            keywords: PhraseTable {
                must_have: topics(MUST_HAVE),
                good_to_have: topics(GOOD_TO_HAVE),
            },
            salutations: SalutationTiers {
                excellent: owned(SALUTATION_EXCELLENT),
                good: owned(SALUTATION_GOOD),
                normal: owned(SALUTATION_NORMAL),
            },
            closings: owned(CLOSINGS),
            fillers: owned(FILLERS),
            ignored_grammar_rules: owned(IGNORED_GRAMMAR_RULES),
        }
    }
}

// ── TOML file types (private) ────────────────────────────────────────────

#[derive(Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RubricFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    closings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fillers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignored_grammar_rules: Option<Vec<String>>,
    #[serde(default)]
    keywords: KeywordSection,
    #[serde(default)]
    salutations: SalutationSection,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct KeywordSection {
    #[serde(default)]
    must_have: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    good_to_have: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SalutationSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    excellent: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    good: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normal: Option<Vec<String>>,
}

impl From<&Rubric> for RubricFile {
    fn from(r: &Rubric) -> Self {
        let table = |topics: &[Topic]| -> BTreeMap<String, Vec<String>> {
            topics
                .iter()
                .map(|t| (t.name.clone(), t.phrases.clone()))
                .collect()
        };
        RubricFile {
            closings: Some(r.closings.clone()),
            fillers: Some(r.fillers.clone()),
            ignored_grammar_rules: Some(r.ignored_grammar_rules.clone()),
            keywords: KeywordSection {
                must_have: table(&r.keywords.must_have),
                good_to_have: table(&r.keywords.good_to_have),
            },
            salutations: SalutationSection {
                excellent: Some(r.salutations.excellent.clone()),
                good: Some(r.salutations.good.clone()),
                normal: Some(r.salutations.normal.clone()),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum RubricError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid rubric TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown {tier} topic `{topic}`")]
    UnknownTopic { tier: KeywordTier, topic: String },
    #[error("{what} has no phrases")]
    NoPhrases { what: String },
    #[error("{what} contains a blank phrase")]
    BlankPhrase { what: String },
    #[error(transparent)]
    Tier(#[from] TierError),
    #[error("cannot render rubric as TOML: {0}")]
    Render(#[from] toml::ser::Error),
}

impl Rubric {
    /// Parse overrides from TOML text on top of the defaults and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, RubricError> {
        let file: RubricFile = toml::from_str(s)?;
        let rubric = Rubric::default().with_overrides(file)?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Load from an explicit file.  Any read, parse or validation failure is
    /// an error.
    pub fn from_file(path: &Path) -> Result<Self, RubricError> {
        let s = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RubricFile = toml::from_str(&s).map_err(|source| RubricError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let rubric = Rubric::default().with_overrides(file)?;
        rubric.validate()?;
        log::debug!("loaded rubric from {}", path.display());
        Ok(rubric)
    }

    /// Discover the nearest `.introscore` above `start`, falling back to the
    /// user config file and then to the defaults.  Never fails.
    pub fn load(start: &Path) -> Self {
        let candidate = find_config_root(start)
            .map(|root| root.join(CONFIG_FILE))
            .filter(|p| p.is_file())
            .or_else(user_config_path);

        match candidate {
            Some(path) => Rubric::from_file(&path).unwrap_or_else(|e| {
                log::warn!("{e}; using the default rubric");
                Rubric::default()
            }),
            None => Rubric::default(),
        }
    }

    /// The complete rubric in `.introscore` format.  Parsing the output
    /// yields an identical rubric.
    pub fn to_toml_string(&self) -> Result<String, RubricError> {
        Ok(toml::to_string_pretty(&RubricFile::from(self))?)
    }

    /// Startup validation: every phrase list is non-empty and free of blank
    /// entries, and every tier table partitions the real line.
    pub fn validate(&self) -> Result<(), RubricError> {
        for (tier, topic) in self.keywords.iter() {
            check_phrases(&format!("{tier} topic `{}`", topic.name), &topic.phrases)?;
        }
        for (level, phrases) in self.salutations.in_priority_order() {
            check_phrases(&format!("{level} salutations"), phrases)?;
        }
        check_phrases("closings", &self.closings)?;
        check_phrases("fillers", &self.fillers)?;
        for table in tiers::all_tables() {
            table.validate()?;
        }
        Ok(())
    }

    fn with_overrides(mut self, file: RubricFile) -> Result<Self, RubricError> {
        override_topics(&mut self.keywords.must_have, KeywordTier::MustHave, file.keywords.must_have)?;
        override_topics(
            &mut self.keywords.good_to_have,
            KeywordTier::GoodToHave,
            file.keywords.good_to_have,
        )?;

        let s = file.salutations;
        replace(&mut self.salutations.excellent, s.excellent);
        replace(&mut self.salutations.good, s.good);
        replace(&mut self.salutations.normal, s.normal);
        replace(&mut self.closings, file.closings);
        replace(&mut self.fillers, file.fillers);
        if let Some(rules) = file.ignored_grammar_rules {
            self.ignored_grammar_rules = rules;
        }
        Ok(self)
    }
}

/// Phrases are matched against lowercased text, so store them lowercased.
fn lowered(phrases: Vec<String>) -> Vec<String> {
    phrases.into_iter().map(|p| p.trim().to_lowercase()).collect()
}

fn replace(slot: &mut Vec<String>, value: Option<Vec<String>>) {
    if let Some(v) = value {
        *slot = lowered(v);
    }
}

fn override_topics(
    topics: &mut [Topic],
    tier: KeywordTier,
    overrides: BTreeMap<String, Vec<String>>,
) -> Result<(), RubricError> {
    for (name, phrases) in overrides {
        let topic = topics
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| RubricError::UnknownTopic { tier, topic: name.clone() })?;
        topic.phrases = lowered(phrases);
    }
    Ok(())
}

fn check_phrases(what: &str, phrases: &[String]) -> Result<(), RubricError> {
    if phrases.is_empty() {
        return Err(RubricError::NoPhrases { what: what.to_string() });
    }
    if phrases.iter().any(|p| p.trim().is_empty()) {
        return Err(RubricError::BlankPhrase { what: what.to_string() });
    }
    Ok(())
}

/// Walk upward from `start` looking for `.introscore` or a `.git` directory.
fn find_config_root(start: &Path) -> Option<PathBuf> {
    let dir = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };

    let mut current = dir;
    loop {
        if current.join(CONFIG_FILE).is_file() || current.join(".git").is_dir() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("introscore").join("rubric.toml"))
        .filter(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rubric_validates() {
        Rubric::default().validate().unwrap();
    }

    #[test]
    fn default_tiers_have_five_topics_each() {
        let r = Rubric::default();
        assert_eq!(r.keywords.must_have.len(), 5);
        assert_eq!(r.keywords.good_to_have.len(), 5);
        assert_eq!(r.keywords.max_score(), 30);
    }

    #[test]
    fn phrases_lookup_by_topic_name() {
        let r = Rubric::default();
        assert_eq!(r.keywords.phrases("Age"), &["years old", "age is"]);
        assert!(r.keywords.phrases("Nope").is_empty());
    }

    #[test]
    fn toml_overrides_replace_only_named_keys() {
        let r = Rubric::from_toml_str(
            "closings = [\"That Is All\"]\n\n[keywords.must_have]\nName = [\"My name is\"]\n",
        )
        .unwrap();
        assert_eq!(r.closings, vec!["that is all"]);
        assert_eq!(r.keywords.phrases("Name"), &["my name is"]);
        // untouched
        assert_eq!(r.fillers, Rubric::default().fillers);
        assert_eq!(r.keywords.phrases("Age"), &["years old", "age is"]);
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let err = Rubric::from_toml_str("[keywords.good_to_have]\nPets = [\"dog\"]\n").unwrap_err();
        assert!(matches!(err, RubricError::UnknownTopic { tier: KeywordTier::GoodToHave, .. }));
    }

    #[test]
    fn empty_phrase_list_is_rejected() {
        let err = Rubric::from_toml_str("fillers = []\n").unwrap_err();
        assert!(matches!(err, RubricError::NoPhrases { .. }));
    }

    #[test]
    fn blank_phrase_is_rejected() {
        let err = Rubric::from_toml_str("[salutations]\nnormal = [\"hi\", \"  \"]\n").unwrap_err();
        assert!(matches!(err, RubricError::BlankPhrase { .. }));
    }

    #[test]
    fn rendered_toml_parses_back_to_the_same_rubric() {
        let mut r = Rubric::default();
        r.closings = vec!["see you".into()];
        let text = r.to_toml_string().unwrap();
        assert!(text.contains("[keywords.must_have]"), "{text}");
        assert_eq!(Rubric::from_toml_str(&text).unwrap(), r);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Rubric::from_toml_str("greetings = [\"yo\"]\n").is_err());
    }

    #[test]
    fn load_defaults_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let r = Rubric::load(dir.path());
        assert_eq!(r.closings, Rubric::default().closings);
    }

    #[test]
    fn load_discovers_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "fillers = [\"erm\"]\n").unwrap();
        let sub = dir.path().join("transcripts/week1");
        std::fs::create_dir_all(&sub).unwrap();
        let r = Rubric::load(&sub);
        assert_eq!(r.fillers, vec!["erm"]);
    }

    #[test]
    fn load_falls_back_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "not valid toml ][[[").unwrap();
        let r = Rubric::load(dir.path());
        assert_eq!(r, Rubric::default());
    }

    #[test]
    fn from_file_errors_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "not valid toml ][[[").unwrap();
        assert!(matches!(Rubric::from_file(&bad), Err(RubricError::Parse { .. })));
    }

    #[test]
    fn from_file_errors_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Rubric::from_file(&missing), Err(RubricError::Io { .. })));
    }
}
