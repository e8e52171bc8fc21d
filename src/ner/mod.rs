//! Named-entity recognition used to find the assured person.
//!
//! Recognizers sit behind [`EntityRecognizer`]. One process-wide instance is
//! installed at start-up with [`install`] and read through [`global`]; when
//! nothing was installed, [`RuleBasedRecognizer`] is used.

mod rule_based;

#[cfg(feature = "onnx")]
mod onnx;

pub use rule_based::RuleBasedRecognizer;

#[cfg(feature = "onnx")]
pub use onnx::OnnxRecognizer;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category assigned to a recognized span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    /// A person's name
    Person,
    /// A company or other organization
    Organization,
    /// Any other label a model may emit
    Other(String),
}

impl EntityLabel {
    /// Map a model label (`PER`, `B-ORG`, `PERSON`, ...) to a category.
    pub fn from_tag(tag: &str) -> Self {
        let bare = tag
            .strip_prefix("B-")
            .or_else(|| tag.strip_prefix("I-"))
            .or_else(|| tag.strip_prefix("E-"))
            .or_else(|| tag.strip_prefix("S-"))
            .unwrap_or(tag);

        match bare.to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => EntityLabel::Person,
            "ORG" | "ORGANIZATION" | "ORGANISATION" => EntityLabel::Organization,
            _ => EntityLabel::Other(bare.to_string()),
        }
    }
}

/// A labelled span of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Span text as it appears in the input
    pub text: String,
    /// Category of the span
    pub label: EntityLabel,
    /// Byte offset where the span starts
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
}

impl Entity {
    /// Build an entity from a span of `source`.
    pub fn from_span(source: &str, start: usize, end: usize, label: EntityLabel) -> Self {
        Self {
            text: source[start..end].to_string(),
            label,
            start,
            end,
        }
    }

    /// Whether this entity is a person.
    pub fn is_person(&self) -> bool {
        self.label == EntityLabel::Person
    }
}

/// Classifies spans of text into entity categories.
///
/// Implementations return entities in document order.
pub trait EntityRecognizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Recognize entities in `text`.
    fn recognize(&self, text: &str) -> Result<Vec<Entity>>;

    /// Texts of all person entities, in document order.
    fn persons(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .recognize(text)?
            .into_iter()
            .filter(Entity::is_person)
            .map(|e| e.text)
            .collect())
    }
}

static GLOBAL: OnceCell<Box<dyn EntityRecognizer>> = OnceCell::new();

/// Install the process-wide recognizer. Only the first call succeeds.
pub fn install(recognizer: Box<dyn EntityRecognizer>) -> Result<()> {
    let name = recognizer.name().to_string();
    GLOBAL
        .set(recognizer)
        .map_err(|_| Error::RecognizerAlreadyInstalled)?;
    log::info!("installed entity recognizer: {}", name);
    Ok(())
}

/// The process-wide recognizer, defaulting to [`RuleBasedRecognizer`].
pub fn global() -> &'static dyn EntityRecognizer {
    GLOBAL
        .get_or_init(|| Box::new(RuleBasedRecognizer::new()))
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Entity>);

    impl EntityRecognizer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _text: &str) -> Result<Vec<Entity>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_label_from_tag() {
        assert_eq!(EntityLabel::from_tag("B-PER"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_tag("I-PER"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_tag("PERSON"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_tag("S-ORG"), EntityLabel::Organization);
        assert_eq!(
            EntityLabel::from_tag("B-LOC"),
            EntityLabel::Other("LOC".to_string())
        );
    }

    #[test]
    fn test_entity_from_span() {
        let source = "Dear Jane Doe,";
        let entity = Entity::from_span(source, 5, 13, EntityLabel::Person);
        assert_eq!(entity.text, "Jane Doe");
        assert!(entity.is_person());
    }

    #[test]
    fn test_persons_filters_and_keeps_order() {
        let text = "Acme Ltd John Smith Jane Doe";
        let recognizer = Fixed(vec![
            Entity::from_span(text, 0, 8, EntityLabel::Organization),
            Entity::from_span(text, 9, 19, EntityLabel::Person),
            Entity::from_span(text, 20, 28, EntityLabel::Person),
        ]);
        assert_eq!(
            recognizer.persons(text).unwrap(),
            vec!["John Smith".to_string(), "Jane Doe".to_string()]
        );
    }

    #[test]
    fn test_second_install_rejected() {
        let _ = global();
        let result = install(Box::new(RuleBasedRecognizer::new()));
        assert!(matches!(result, Err(Error::RecognizerAlreadyInstalled)));
    }
}
