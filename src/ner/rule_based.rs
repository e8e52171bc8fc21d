//! Capitalisation-driven recognizer that needs no model files.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{Entity, EntityLabel, EntityRecognizer};
use crate::error::Result;

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "mx", "dr", "sir", "dame", "prof", "master",
];

const CORPORATE_SUFFIXES: &[&str] = &[
    "limited", "ltd", "inc", "incorporated", "plc", "llc", "corp", "corporation", "company",
    "co", "pty", "nz", "group",
];

/// Words that appear capitalised in policy documents but are not names.
const POLICY_VOCABULARY: &[&str] = &[
    // policy structure
    "policy", "policies", "schedule", "summary", "details", "plan", "quote", "proposal",
    "application", "certificate", "page", "section", "part", "notes", "note", "important",
    "information", "terms", "conditions", "number", "reference", "ref", "version",
    // cover
    "life", "cover", "covers", "insurance", "insurer", "insured", "assured", "income",
    "protection", "total", "permanent", "disablement", "disability", "standalone", "premium",
    "premiums", "monthly", "annual", "annually", "yearly", "fortnightly", "weekly", "level",
    "stepped", "benefit", "benefits", "type", "amount", "amounts", "sum", "health", "trauma",
    "mortgage", "repayment", "waiver", "cancer", "medical", "accident", "accidental",
    "critical", "illness", "serious", "funeral", "business", "expenses", "redundancy",
    "option", "options", "loading", "loadings", "discount", "exclusion", "exclusions",
    "indexation", "inflation", "waiting", "period", "agreed", "indemnity", "value",
    // parties and admin
    "owner", "owners", "holder", "holders", "client", "clients", "adviser", "advisor",
    "agent", "broker", "person", "persons", "name", "names", "contact", "phone", "mobile",
    "email", "address", "street", "road", "postal", "city", "signature", "signed", "dear",
    "regards", "yours", "sincerely", "customer", "service", "services", "team", "manager",
    // dates and payment
    "date", "dates", "effective", "anniversary", "start", "end", "commencement", "renewal",
    "expiry", "frequency", "payment", "payments", "direct", "debit", "credit", "card", "bank",
    "account", "gst", "tax", "fee", "fees", "rate", "rates", "term", "years", "year", "age",
    "smoker", "non", "male", "female", "gender", "occupation", "class", "weeks", "months",
    "days", "birth", "dob",
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday",
    "friday", "saturday", "sunday",
    // places and insurer brands
    "new", "zealand", "australia", "auckland", "wellington", "christchurch", "southern",
    "cross", "asteron", "chubb", "partner", "aia", "accuro", "fidelity", "assurance",
    // function words that start sentences
    "the", "a", "an", "and", "or", "of", "for", "to", "in", "on", "at", "with", "by", "from",
    "your", "our", "we", "you", "this", "that", "these", "those", "is", "are", "if", "it",
    "not", "no", "yes", "all", "any", "per", "please", "thank",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// Capitalised word that could be part of a name
    Name,
    /// Capitalised word from the policy vocabulary
    Vocabulary,
    /// Capitalised legal-form word such as `Limited`
    Corporate,
    /// Title such as `Mr` or `Dr`
    Honorific,
    /// Anything else: lowercase words, numbers, amounts
    Plain,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    start: usize,
    end: usize,
    kind: TokenKind,
    /// Trailing `,` or `.` closes the current span
    closes: bool,
}

/// Recognizes people and organizations from capitalisation patterns.
///
/// A person is 2–4 consecutive capitalised words outside the policy
/// vocabulary, or 1–3 such words right after an honorific. A run of
/// capitalised words ending in a legal-form suffix is an organization.
#[derive(Debug, Clone)]
pub struct RuleBasedRecognizer {
    vocabulary: HashSet<String>,
}

impl RuleBasedRecognizer {
    /// Create a recognizer with the built-in vocabulary.
    pub fn new() -> Self {
        Self {
            vocabulary: POLICY_VOCABULARY.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Treat additional words as non-name vocabulary.
    pub fn with_vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    fn classify(&self, word: &str, in_run: bool) -> TokenKind {
        let first = match word.chars().next() {
            Some(c) => c,
            None => return TokenKind::Plain,
        };
        if !first.is_uppercase() || !word.chars().all(|c| c.is_alphabetic() || c == '-') {
            return TokenKind::Plain;
        }

        let len = word.chars().count();
        if len == 1 {
            // initials only continue a name
            return if in_run { TokenKind::Name } else { TokenKind::Plain };
        }

        let lower = word.to_lowercase();
        if HONORIFICS.contains(&lower.as_str()) {
            return TokenKind::Honorific;
        }
        if CORPORATE_SUFFIXES.contains(&lower.as_str()) {
            return TokenKind::Corporate;
        }
        if self.vocabulary.contains(&lower) {
            return TokenKind::Vocabulary;
        }

        let all_upper = word.chars().all(|c| !c.is_lowercase());
        if all_upper && len <= 3 {
            return TokenKind::Vocabulary;
        }
        TokenKind::Name
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        for m in RE_TOKEN.find_iter(text) {
            let raw = m.as_str();
            let word = raw.trim_end_matches([',', '.']);
            let closes = word.len() != raw.len();
            let in_run = tokens
                .last()
                .map(|t| t.kind == TokenKind::Name && !t.closes)
                .unwrap_or(false);
            tokens.push(Token {
                start: m.start(),
                end: m.start() + word.len(),
                kind: self.classify(word, in_run),
                closes,
            });
        }
        tokens
    }

    fn push_person(text: &str, names: &[Token], honorific: bool, out: &mut Vec<Entity>) {
        let (min, max) = if honorific { (1, 3) } else { (2, 4) };
        if names.len() < min || names.len() > max {
            return;
        }
        out.push(Entity::from_span(
            text,
            names[0].start,
            names[names.len() - 1].end,
            EntityLabel::Person,
        ));
    }

    fn scan_run(text: &str, run: &[Token], after_honorific: bool, out: &mut Vec<Entity>) {
        if run.last().map(|t| t.kind) == Some(TokenKind::Corporate) && run.len() > 1 {
            out.push(Entity::from_span(
                text,
                run[0].start,
                run[run.len() - 1].end,
                EntityLabel::Organization,
            ));
            return;
        }

        let mut names: Vec<Token> = Vec::new();
        let mut honorific = after_honorific;
        for token in run {
            if token.kind == TokenKind::Name {
                names.push(*token);
            } else {
                Self::push_person(text, &names, honorific, out);
                names.clear();
                honorific = false;
            }
        }
        Self::push_person(text, &names, honorific, out);
    }
}

impl Default for RuleBasedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let tokens = self.tokenize(text);
        let mut entities = Vec::new();
        let mut run: Vec<Token> = Vec::new();
        let mut after_honorific = false;

        for token in tokens {
            match token.kind {
                TokenKind::Plain => {
                    Self::scan_run(text, &run, after_honorific, &mut entities);
                    run.clear();
                    after_honorific = false;
                }
                TokenKind::Honorific => {
                    Self::scan_run(text, &run, after_honorific, &mut entities);
                    run.clear();
                    after_honorific = true;
                }
                _ => {
                    run.push(token);
                    if token.closes {
                        Self::scan_run(text, &run, after_honorific, &mut entities);
                        run.clear();
                        after_honorific = false;
                    }
                }
            }
        }
        Self::scan_run(text, &run, after_honorific, &mut entities);

        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persons(text: &str) -> Vec<String> {
        RuleBasedRecognizer::new().persons(text).unwrap()
    }

    #[test]
    fn test_honorific_name() {
        let text = "Policy Schedule Life Assured Mr John Smith Date of Birth 01 02 1980";
        assert_eq!(persons(text), vec!["John Smith"]);
    }

    #[test]
    fn test_honorific_single_surname() {
        assert_eq!(persons("Dear Mrs Patel, thank you"), vec!["Patel"]);
    }

    #[test]
    fn test_honorific_with_period() {
        assert_eq!(persons("Insured Dr. Aroha Ngata signed"), vec!["Aroha Ngata"]);
    }

    #[test]
    fn test_bare_two_word_name() {
        let text = "Life Assured Sarah Jane Thompson Adviser Mark Lee Premium $45.10";
        assert_eq!(persons(text), vec!["Sarah Jane Thompson", "Mark Lee"]);
    }

    #[test]
    fn test_vocabulary_only_text_has_no_person() {
        let text = "Life Cover Standalone Total Permanent Disablement Income Protection";
        assert!(persons(text).is_empty());
    }

    #[test]
    fn test_insurer_names_are_not_people() {
        let text = "Underwritten by AIA New Zealand and Southern Cross with Chubb Life";
        assert!(persons(text).is_empty());
    }

    #[test]
    fn test_comma_ends_name() {
        assert_eq!(
            persons("Owners Ana Silva, Ben Carter and others"),
            vec!["Ana Silva", "Ben Carter"]
        );
    }

    #[test]
    fn test_upper_case_name_and_initial() {
        assert_eq!(persons("LIFE ASSURED JOHN A SMITH"), vec!["JOHN A SMITH"]);
    }

    #[test]
    fn test_organization_suffix() {
        let text = "Fidelity Life Assurance Company Limited issued this policy";
        let entities = RuleBasedRecognizer::new().recognize(text).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, EntityLabel::Organization);
        assert_eq!(entities[0].text, "Fidelity Life Assurance Company Limited");
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "for Mr Tama Wiremu today";
        let entities = RuleBasedRecognizer::new().recognize(text).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(&text[entities[0].start..entities[0].end], "Tama Wiremu");
    }

    #[test]
    fn test_extra_vocabulary() {
        let recognizer = RuleBasedRecognizer::new().with_vocabulary(["Kiwi", "Saver"]);
        assert!(recognizer.persons("Kiwi Saver Scheme").unwrap().is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(persons("").is_empty());
    }
}
