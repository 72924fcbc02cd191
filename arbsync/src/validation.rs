//! Structural validation of translated ARB files against the source.
//!
//! Findings are data: [`Validation::iter`] yields one [`ValidationResult`]
//! per detected issue and can be restarted any number of times. The only fix
//! applied automatically is [`decode_html_entities`].

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

use crate::{
    error::Error,
    fingerprint::{TextFingerprint, count_occurrences_ignore_case},
    store::write_document,
    types::ArbDocument,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidType {
    NotExcluded,
    KeyNotFound,
    InvalidParameters,
    InvalidParentheses,
    InvalidLineBreaks,
    UndecodedHtmlEntityExists,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult<'a> {
    pub key: String,
    pub invalid_type: InvalidType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(serialize_with = "serialize_document")]
    pub source: &'a ArbDocument,
    #[serde(serialize_with = "serialize_document")]
    pub target: &'a ArbDocument,
}

fn serialize_document<S: Serializer>(
    document: &&ArbDocument,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&document.path.to_string_lossy())
}

/// Options for [`Validation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Terms that must occur equally often (ignoring case) in source and
    /// target, e.g. brand names.
    pub exclude_terms: Vec<String>,
    /// Also compare line-break counts.
    pub check_line_breaks: bool,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_line_breaks(mut self, check_line_breaks: bool) -> Self {
        self.check_line_breaks = check_line_breaks;
        self
    }
}

/// A validation run over one source document and its targets.
pub struct Validation<'a> {
    source: &'a ArbDocument,
    targets: Vec<&'a ArbDocument>,
    source_entries: Vec<(&'a str, &'a str)>,
    options: ValidationOptions,
}

impl<'a> Validation<'a> {
    /// Targets in the source language are ignored.
    pub fn new<I>(source: &'a ArbDocument, targets: I, options: ValidationOptions) -> Self
    where
        I: IntoIterator<Item = &'a ArbDocument>,
    {
        Self {
            source,
            targets: targets
                .into_iter()
                .filter(|target| target.language.code != source.language.code)
                .collect(),
            source_entries: source.translatable().collect(),
            options,
        }
    }

    /// Lazily yields every finding, target by target in key order.
    pub fn iter(&self) -> ValidationIter<'_, 'a> {
        ValidationIter {
            validation: self,
            target_index: 0,
            key_index: 0,
            pending: VecDeque::new(),
        }
    }
}

impl<'v, 'a> IntoIterator for &'v Validation<'a> {
    type Item = ValidationResult<'a>;
    type IntoIter = ValidationIter<'v, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ValidationIter<'v, 'a> {
    validation: &'v Validation<'a>,
    target_index: usize,
    key_index: usize,
    pending: VecDeque<ValidationResult<'a>>,
}

impl<'a> Iterator for ValidationIter<'_, 'a> {
    type Item = ValidationResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(result) = self.pending.pop_front() {
                return Some(result);
            }

            let validation = self.validation;
            let target = *validation.targets.get(self.target_index)?;
            let Some(&(key, source_value)) = validation.source_entries.get(self.key_index) else {
                self.target_index += 1;
                self.key_index = 0;
                continue;
            };
            self.key_index += 1;

            check_key(
                validation.source,
                target,
                key,
                source_value,
                &validation.options,
                &mut self.pending,
            );
        }
    }
}

fn check_key<'a>(
    source: &'a ArbDocument,
    target: &'a ArbDocument,
    key: &str,
    source_value: &str,
    options: &ValidationOptions,
    out: &mut VecDeque<ValidationResult<'a>>,
) {
    let mut emit = |invalid_type: InvalidType, message: Option<String>| {
        out.push_back(ValidationResult {
            key: key.to_string(),
            invalid_type,
            message,
            source,
            target,
        });
    };

    let target_value = target.get_str(key);
    for term in &options.exclude_terms {
        let in_source = count_occurrences_ignore_case(source_value, term);
        let in_target = count_occurrences_ignore_case(target_value.unwrap_or(""), term);
        if in_source != in_target {
            emit(
                InvalidType::NotExcluded,
                Some(format!(
                    "`{}` occurs {} time(s) in source but {} in target",
                    term, in_source, in_target
                )),
            );
            return;
        }
    }

    let Some(target_value) = target_value else {
        emit(
            InvalidType::KeyNotFound,
            Some(format!("missing from {}", target.path.display())),
        );
        return;
    };

    let source_print = TextFingerprint::of(source_value);
    let target_print = TextFingerprint::of(target_value);

    if target_print.html_entity_count > 0 {
        emit(
            InvalidType::UndecodedHtmlEntityExists,
            Some(format!(
                "{} undecoded HTML entit{}",
                target_print.html_entity_count,
                if target_print.html_entity_count == 1 { "y" } else { "ies" }
            )),
        );
    }
    if source_print.placeholder_count != target_print.placeholder_count {
        emit(
            InvalidType::InvalidParameters,
            Some(format!(
                "source has {} placeholder(s), target has {}",
                source_print.placeholder_count, target_print.placeholder_count
            )),
        );
    }
    if source_print.parentheses_count != target_print.parentheses_count {
        emit(
            InvalidType::InvalidParentheses,
            Some(format!(
                "source has {} bracket(s), target has {}",
                source_print.parentheses_count, target_print.parentheses_count
            )),
        );
    }
    if options.check_line_breaks && source_print.line_break_count != target_print.line_break_count
    {
        emit(
            InvalidType::InvalidLineBreaks,
            Some(format!(
                "source has {} line break(s), target has {}",
                source_print.line_break_count, target_print.line_break_count
            )),
        );
    }
}

/// HTML-decodes the listed values of `target` in place and writes the file
/// when anything changed. Returns the number of rewritten values.
pub fn decode_html_entities<S: AsRef<str>>(
    target: &mut ArbDocument,
    keys: &[S],
) -> Result<usize, Error> {
    let mut changed = 0;
    for key in keys {
        let key = key.as_ref();
        let Some(value) = target.get_str(key) else {
            continue;
        };
        let decoded = html_escape::decode_html_entities(value);
        if decoded != value {
            let decoded = decoded.into_owned();
            target.insert(key, decoded);
            changed += 1;
        }
    }
    if changed > 0 {
        write_document(target)?;
    }
    Ok(changed)
}
