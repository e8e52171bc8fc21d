//! Token-classification model run through ONNX Runtime.
//!
//! Expects a directory holding `model.onnx`, `tokenizer.json` and the
//! Hugging Face `config.json` whose `id2label` map names the output classes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputValue};
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::tokenizer::Tokenizer;

use super::{Entity, EntityLabel, EntityRecognizer};
use crate::error::{Error, Result};

/// Words per inference window; keeps encodings under the model's 512 tokens.
const WINDOW_WORDS: usize = 200;

/// Words shared by consecutive windows. Entities up to this long survive a window cut.
const WINDOW_OVERLAP: usize = 20;

#[derive(Debug, Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

/// Recognizer backed by a pretrained NER model.
pub struct OnnxRecognizer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    wants_token_types: bool,
}

fn recognizer_err(e: impl std::fmt::Display) -> Error {
    Error::Recognizer(e.to_string())
}

impl OnnxRecognizer {
    /// Load `model.onnx`, `tokenizer.json` and `config.json` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let model_path = dir.join("model.onnx");
        if !model_path.exists() {
            return Err(Error::Recognizer(format!(
                "model not found: {}",
                model_path.display()
            )));
        }

        let config: ModelConfig =
            serde_json::from_str(&std::fs::read_to_string(dir.join("config.json"))?)?;
        let mut indexed: Vec<(usize, String)> = config
            .id2label
            .into_iter()
            .map(|(id, label)| id.parse::<usize>().map(|id| (id, label)))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Config(format!("id2label key is not an index: {}", e)))?;
        indexed.sort_by_key(|(id, _)| *id);
        let labels = indexed.into_iter().map(|(_, label)| label).collect::<Vec<_>>();

        let tokenizer = Tokenizer::from_file(dir.join("tokenizer.json")).map_err(recognizer_err)?;

        let session = Session::builder()
            .map_err(recognizer_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(recognizer_err)?
            .commit_from_file(&model_path)
            .map_err(recognizer_err)?;
        let wants_token_types = session.inputs.iter().any(|i| i.name == "token_type_ids");

        log::info!(
            "loaded NER model {} ({} labels)",
            model_path.display(),
            labels.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            wants_token_types,
        })
    }

    /// Label every token of one window; returns (byte span, tag) pairs.
    fn tag_window(&self, window: &str) -> Result<Vec<((usize, usize), String)>> {
        let encoding = self.tokenizer.encode(window, true).map_err(recognizer_err)?;
        let len = encoding.get_ids().len();
        if len == 0 {
            return Ok(Vec::new());
        }

        let to_i64 = |v: &[u32]| v.iter().map(|&x| x as i64).collect::<Vec<_>>();
        let mut inputs: Vec<(String, SessionInputValue)> = vec![
            (
                "input_ids".to_string(),
                Tensor::from_array(([1usize, len], to_i64(encoding.get_ids())))
                    .map_err(recognizer_err)?
                    .into(),
            ),
            (
                "attention_mask".to_string(),
                Tensor::from_array(([1usize, len], to_i64(encoding.get_attention_mask())))
                    .map_err(recognizer_err)?
                    .into(),
            ),
        ];
        if self.wants_token_types {
            inputs.push((
                "token_type_ids".to_string(),
                Tensor::from_array(([1usize, len], to_i64(encoding.get_type_ids())))
                    .map_err(recognizer_err)?
                    .into(),
            ));
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Recognizer("model session poisoned".to_string()))?;
        let outputs = session.run(inputs).map_err(recognizer_err)?;
        let (_, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(recognizer_err)?;

        let classes = self.labels.len();
        if classes == 0 || logits.len() != len * classes {
            return Err(Error::Recognizer(format!(
                "unexpected logits size {} for {} tokens x {} labels",
                logits.len(),
                len,
                classes
            )));
        }

        let tags = logits
            .chunks(classes)
            .zip(encoding.get_offsets())
            .zip(encoding.get_special_tokens_mask())
            .filter(|(_, &special)| special == 0)
            .map(|((scores, &span), _)| {
                let best = scores
                    .iter()
                    .enumerate()
                    .fold((0, f32::MIN), |acc, (i, &s)| if s > acc.1 { (i, s) } else { acc });
                (span, self.labels[best.0].clone())
            })
            .collect();
        Ok(tags)
    }
}

/// Merge BIO tags into entity spans over `text` (offsets shifted by `base`).
fn merge_tags(
    text: &str,
    base: usize,
    tags: &[((usize, usize), String)],
    out: &mut Vec<Entity>,
) {
    let mut current: Option<(usize, usize, EntityLabel)> = None;

    for ((start, end), tag) in tags {
        let (start, end) = (base + start, base + end);
        if tag == "O" {
            if let Some((s, e, label)) = current.take() {
                out.push(Entity::from_span(text, s, e, label));
            }
            continue;
        }

        let label = EntityLabel::from_tag(tag);
        let begins = tag.starts_with("B-") || tag.starts_with("S-");
        match current.as_mut() {
            Some((_, e, l)) if !begins && *l == label => *e = end,
            _ => {
                if let Some((s, e, l)) = current.take() {
                    out.push(Entity::from_span(text, s, e, l));
                }
                current = Some((start, end, label));
            }
        }
    }

    if let Some((s, e, label)) = current {
        out.push(Entity::from_span(text, s, e, label));
    }
}

/// Byte ranges of overlapping word windows covering `text`.
///
/// Each window starts `WINDOW_WORDS - WINDOW_OVERLAP` words after the previous one.
fn windows(text: &str) -> Vec<(usize, usize)> {
    let words: Vec<(usize, usize)> = text
        .split_whitespace()
        .map(|w| {
            let start = w.as_ptr() as usize - text.as_ptr() as usize;
            (start, start + w.len())
        })
        .collect();

    let mut bounds = Vec::new();
    let mut first = 0;
    while first < words.len() {
        let last = (first + WINDOW_WORDS).min(words.len()) - 1;
        bounds.push((words[first].0, words[last].1));
        if last + 1 == words.len() {
            break;
        }
        first += WINDOW_WORDS - WINDOW_OVERLAP;
    }
    bounds
}

/// Append the entities of one window that start before `cut` (the next
/// window's start) and do not overlap what was already kept.
fn keep_window_entities(out: &mut Vec<Entity>, found: Vec<Entity>, cut: usize) {
    let resume = out.last().map(|e| e.end).unwrap_or(0);
    out.extend(
        found
            .into_iter()
            .filter(|e| e.start >= resume && e.start < cut),
    );
}

impl EntityRecognizer for OnnxRecognizer {
    fn name(&self) -> &str {
        "onnx"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let bounds = windows(text);
        let mut entities = Vec::new();
        for (i, &(start, end)) in bounds.iter().enumerate() {
            let cut = bounds.get(i + 1).map(|next| next.0).unwrap_or(end);
            let tags = self.tag_window(&text[start..end])?;

            let mut found = Vec::new();
            merge_tags(text, start, &tags, &mut found);
            keep_window_entities(&mut entities, found, cut);
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(start: usize, end: usize, t: &str) -> ((usize, usize), String) {
        ((start, end), t.to_string())
    }

    #[test]
    fn test_merge_bio_tags() {
        let text = "Dear John Smith of Acme";
        let tags = vec![
            tag(0, 4, "O"),
            tag(5, 9, "B-PER"),
            tag(10, 15, "I-PER"),
            tag(16, 18, "O"),
            tag(19, 23, "B-ORG"),
        ];
        let mut out = Vec::new();
        merge_tags(text, 0, &tags, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "John Smith");
        assert_eq!(out[0].label, EntityLabel::Person);
        assert_eq!(out[1].text, "Acme");
        assert_eq!(out[1].label, EntityLabel::Organization);
    }

    #[test]
    fn test_merge_adjacent_b_tags_split() {
        let text = "Ana Ben";
        let tags = vec![tag(0, 3, "B-PER"), tag(4, 7, "B-PER")];
        let mut out = Vec::new();
        merge_tags(text, 0, &tags, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_windows_cover_all_words() {
        let text = (0..450).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let bounds = windows(&text);
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds[0].0, 0);
        assert_eq!(bounds[2].1, text.len());
        assert!(bounds[1].0 < bounds[0].1);
        assert!(bounds[2].0 < bounds[1].1);
    }

    #[test]
    fn test_windows_overlap_by_fixed_words() {
        let text = (0..250).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let bounds = windows(&text);
        assert_eq!(bounds.len(), 2);

        let shared = text[bounds[1].0..bounds[0].1].split_whitespace().count();
        assert_eq!(shared, WINDOW_OVERLAP);
    }

    #[test]
    fn test_short_text_single_window() {
        assert_eq!(windows("Mr John Smith"), vec![(0, 13)]);
        assert!(windows("   ").is_empty());
    }

    #[test]
    fn test_name_across_window_cut_kept_whole() {
        let text = "aa John Smith bb Mary Jones";
        let person = |s: usize, e: usize| Entity::from_span(text, s, e, EntityLabel::Person);
        // next window starts at "Smith" (byte 8)
        let cut = 8;

        let mut out = Vec::new();
        keep_window_entities(&mut out, vec![person(3, 13)], cut);
        keep_window_entities(&mut out, vec![person(8, 13), person(17, 27)], text.len());

        let names: Vec<_> = out.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(names, vec!["John Smith", "Mary Jones"]);
    }

    #[test]
    fn test_entities_after_cut_left_to_next_window() {
        let text = "aa John Smith bb Mary Jones";
        let person = |s: usize, e: usize| Entity::from_span(text, s, e, EntityLabel::Person);

        let mut out = Vec::new();
        keep_window_entities(&mut out, vec![person(3, 13), person(17, 27)], 14);
        assert_eq!(out.len(), 1);
        keep_window_entities(&mut out, vec![person(17, 27)], text.len());
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].text, "Mary Jones");
    }

    #[test]
    fn test_missing_model_dir() {
        let result = OnnxRecognizer::from_dir("/no/such/model");
        assert!(matches!(result, Err(Error::Recognizer(_))));
    }
}
