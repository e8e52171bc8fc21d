//! Assured-name lookup via entity recognition.

use crate::ner::EntityRecognizer;

/// First person named in `text`, or `sentinel` when none is found.
///
/// A recognizer failure counts as no person found.
pub fn extract_assured_name(
    text: &str,
    recognizer: &dyn EntityRecognizer,
    sentinel: &str,
) -> String {
    let persons = match recognizer.persons(text) {
        Ok(persons) => persons,
        Err(e) => {
            log::warn!("{} recognizer failed: {}", recognizer.name(), e);
            Vec::new()
        }
    };

    log::debug!("{} person entities found", persons.len());
    persons
        .into_iter()
        .next()
        .unwrap_or_else(|| sentinel.to_string())
}
