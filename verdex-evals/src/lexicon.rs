// Copyright 2026 Verdex (https://github.com/verdex-eval/verdex)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Embedded English morphology lexicon.
//!
//! A TSV exception table (irregular forms, plus forms the regular
//! detachment rules would mangle) compiled into the crate. It is parsed
//! once per process; a parse failure leaves the normalizer in degraded
//! mode rather than failing any evaluation.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::{debug, warn};

use verdex_core::VerdexError;

const EMBEDDED_TSV: &str = include_str!("../assets/lexicon.tsv");

/// Grammatical role a token is lemmatized under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adjective,
    Verb,
    Noun,
    Adverb,
}

impl PartOfSpeech {
    fn from_tag(tag: &str) -> Option<PartOfSpeech> {
        match tag {
            "a" => Some(PartOfSpeech::Adjective),
            "v" => Some(PartOfSpeech::Verb),
            "n" => Some(PartOfSpeech::Noun),
            "r" => Some(PartOfSpeech::Adverb),
            _ => None,
        }
    }
}

/// Exception table mapping word forms to lemmas, conditioned on part
/// of speech.
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<(PartOfSpeech, String)>>,
}

impl Lexicon {
    /// Parse TSV data of `form <TAB> lemma <TAB> pos` lines. `#` lines
    /// and blank lines are ignored; any malformed line fails the whole
    /// parse so a broken asset cannot half-load.
    pub fn parse(data: &str) -> Result<Lexicon, VerdexError> {
        let mut entries: HashMap<String, Vec<(PartOfSpeech, String)>> = HashMap::new();

        for (line_number, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let (form, lemma, tag) = match (fields.next(), fields.next(), fields.next()) {
                (Some(form), Some(lemma), Some(tag)) if fields.next().is_none() => {
                    (form.trim(), lemma.trim(), tag.trim())
                }
                _ => {
                    return Err(VerdexError::Config(format!(
                        "lexicon line {}: expected 'form<TAB>lemma<TAB>pos'",
                        line_number + 1
                    )));
                }
            };

            let pos = PartOfSpeech::from_tag(tag).ok_or_else(|| {
                VerdexError::Config(format!(
                    "lexicon line {}: unknown part-of-speech tag '{}'",
                    line_number + 1,
                    tag
                ))
            })?;
            if form.is_empty() || lemma.is_empty() {
                return Err(VerdexError::Config(format!(
                    "lexicon line {}: empty form or lemma",
                    line_number + 1
                )));
            }

            entries
                .entry(form.to_lowercase())
                .or_default()
                .push((pos, lemma.to_lowercase()));
        }

        Ok(Lexicon { entries })
    }

    /// The embedded lexicon, parsed at most once per process. `None`
    /// means the asset failed to parse and callers must degrade.
    pub fn embedded() -> Option<&'static Lexicon> {
        static LEXICON: OnceLock<Option<Lexicon>> = OnceLock::new();
        LEXICON
            .get_or_init(|| match Lexicon::parse(EMBEDDED_TSV) {
                Ok(lexicon) => {
                    debug!(forms = lexicon.len(), "loaded embedded lexicon");
                    Some(lexicon)
                }
                Err(e) => {
                    warn!("embedded lexicon unusable, normalizer will degrade: {}", e);
                    None
                }
            })
            .as_ref()
    }

    /// Exception lemma for a form under the given part of speech.
    pub fn lemma(&self, form: &str, pos: PartOfSpeech) -> Option<&str> {
        self.entries
            .get(form)?
            .iter()
            .find(|(entry_pos, _)| *entry_pos == pos)
            .map(|(_, lemma)| lemma.as_str())
    }

    /// Part-of-speech hint for a form, when the table knows it.
    pub fn pos_hint(&self, form: &str) -> Option<PartOfSpeech> {
        self.entries.get(form)?.first().map(|(pos, _)| *pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
