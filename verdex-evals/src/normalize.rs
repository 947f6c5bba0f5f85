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

//! Text normalization: tokenize, tag, lemmatize.
//!
//! The full strategy lower-cases, scans words and numbers (mapping
//! currency and percent signs to words, so `$500` and `500 dollars`
//! meet on the same tokens), guesses a part of speech per token, and
//! lemmatizes with the embedded lexicon plus regular detachment rules.
//! When the lexicon is unusable the normalizer degrades: a permissive
//! scan, no lemmatization, never a failed row.

use crate::lexicon::{Lexicon, PartOfSpeech};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Full(&'static Lexicon),
    Degraded,
}

/// Deterministic text-to-tokens pipeline. Cheap to copy; the full mode
/// borrows the process-wide lexicon.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    mode: Mode,
}

impl Normalizer {
    /// The process-wide normalizer: full mode when the embedded lexicon
    /// parsed, degraded mode otherwise.
    pub fn shared() -> Normalizer {
        match Lexicon::embedded() {
            Some(lexicon) => Normalizer {
                mode: Mode::Full(lexicon),
            },
            None => Normalizer {
                mode: Mode::Degraded,
            },
        }
    }

    /// A normalizer pinned to degraded mode.
    pub fn degraded() -> Normalizer {
        Normalizer {
            mode: Mode::Degraded,
        }
    }

    /// False when operating without linguistic resources.
    pub fn is_ready(&self) -> bool {
        matches!(self.mode, Mode::Full(_))
    }

    /// Normalize free text into a token sequence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        match self.mode {
            Mode::Full(lexicon) => scan_tokens(text)
                .into_iter()
                .map(|token| {
                    if starts_with_digit(&token) {
                        // Numeric tokens pass through unchanged.
                        token
                    } else {
                        let pos = guess_pos(&token, lexicon);
                        lemmatize(&token, pos, lexicon)
                    }
                })
                .collect(),
            Mode::Degraded => scan_degraded(text),
        }
    }
}

fn starts_with_digit(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word a currency or percent sign stands for.
fn symbol_word(c: char) -> Option<&'static str> {
    match c {
        '$' => Some("dollar"),
        '€' => Some("euro"),
        '£' => Some("pound"),
        '¥' => Some("yen"),
        '%' => Some("percent"),
        _ => None,
    }
}

/// Full-mode scanner: lower-cased word and number tokens, currency and
/// percent signs spelled out, punctuation dropped. Internal `.`/`,`
/// stay inside a number only between digits.
fn scan_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if let Some(word) = symbol_word(c) {
            tokens.push(word.to_string());
            i += 1;
        } else if c.is_ascii_digit() {
            let mut number = String::new();
            while i < chars.len() {
                let c = chars[i];
                if c.is_ascii_digit() {
                    number.push(c);
                    i += 1;
                } else if (c == '.' || c == ',')
                    && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
                {
                    number.push(c);
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(number);
        } else if is_word_char(c) {
            let mut word = String::new();
            while i < chars.len() && is_word_char(chars[i]) {
                word.push(chars[i]);
                i += 1;
            }
            tokens.push(word);
        } else {
            i += 1;
        }
    }

    tokens
}

/// Degraded scanner: currency-prefixed numerics kept atomic, word runs
/// kept whole, single punctuation characters dropped, no lemmatization.
fn scan_degraded(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let is_currency = matches!(c, '$' | '€' | '£' | '¥');
        if (is_currency && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
            || c.is_ascii_digit()
        {
            let mut token = String::new();
            if is_currency {
                token.push(c);
                i += 1;
            }
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == ',')
            {
                token.push(chars[i]);
                i += 1;
            }
            if i < chars.len() && chars[i] == '%' {
                token.push('%');
                i += 1;
            }
            tokens.push(token);
        } else if is_word_char(c) {
            let mut word = String::new();
            while i < chars.len() && is_word_char(chars[i]) {
                word.push(chars[i]);
                i += 1;
            }
            tokens.push(word);
        } else {
            i += 1;
        }
    }

    tokens
}

/// Suffix-rule part-of-speech guess, defaulting to noun as the original
/// tagging scheme does. Lexicon hints win.
fn guess_pos(token: &str, lexicon: &Lexicon) -> PartOfSpeech {
    if let Some(pos) = lexicon.pos_hint(token) {
        return pos;
    }
    let n = token.chars().count();
    if token.ends_with("ly") && n > 3 {
        PartOfSpeech::Adverb
    } else if token.ends_with("ing") && n > 4 {
        PartOfSpeech::Verb
    } else if token.ends_with("ed") && n > 3 {
        PartOfSpeech::Verb
    } else if ["ous", "ful", "ive", "less", "able", "ible", "ish"]
        .iter()
        .any(|suffix| token.ends_with(suffix))
    {
        PartOfSpeech::Adjective
    } else {
        PartOfSpeech::Noun
    }
}

/// Lemmatize one token under a part of speech: exception table first,
/// then the regular detachment rules for that role.
fn lemmatize(token: &str, pos: PartOfSpeech, lexicon: &Lexicon) -> String {
    if let Some(lemma) = lexicon.lemma(token, pos) {
        return lemma.to_string();
    }
    match pos {
        PartOfSpeech::Noun => noun_lemma(token),
        PartOfSpeech::Verb => verb_lemma(token),
        PartOfSpeech::Adjective => adjective_lemma(token),
        // Adverbs have no regular detachments, only exceptions.
        PartOfSpeech::Adverb => token.to_string(),
    }
}

fn noun_lemma(token: &str) -> String {
    let n = token.chars().count();
    if token.ends_with("ies") && n > 4 {
        return format!("{}y", &token[..token.len() - 3]);
    }
    if token.ends_with("sses")
        || token.ends_with("ches")
        || token.ends_with("shes")
        || token.ends_with("xes")
        || token.ends_with("zes")
        || (token.ends_with("oes") && n > 5)
    {
        return token[..token.len() - 2].to_string();
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    if token.ends_with('s') && n > 3 {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

fn verb_lemma(token: &str) -> String {
    let n = token.chars().count();
    if token.ends_with("ies") && n > 4 {
        return format!("{}y", &token[..token.len() - 3]);
    }
    if token.ends_with("ing") && n > 5 {
        return restore_stem(token[..token.len() - 3].to_string());
    }
    if token.ends_with("eed") && n > 3 {
        // agreed -> agree, but feed stays feed.
        let stem = &token[..token.len() - 3];
        if measure(stem) > 0 {
            return format!("{}ee", stem);
        }
        return token.to_string();
    }
    if token.ends_with("ied") && n > 4 {
        return format!("{}y", &token[..token.len() - 3]);
    }
    if token.ends_with("ed") && n > 4 {
        return restore_stem(token[..token.len() - 2].to_string());
    }
    if token.ends_with("ches")
        || token.ends_with("shes")
        || token.ends_with("sses")
        || token.ends_with("xes")
        || token.ends_with("zes")
    {
        return token[..token.len() - 2].to_string();
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    if token.ends_with('s') && n > 3 {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

fn adjective_lemma(token: &str) -> String {
    let n = token.chars().count();
    if token.ends_with("iest") && n > 5 {
        return format!("{}y", &token[..token.len() - 4]);
    }
    if token.ends_with("ier") && n > 4 {
        return format!("{}y", &token[..token.len() - 3]);
    }
    if token.ends_with("est") && n > 4 {
        return restore_stem(token[..token.len() - 3].to_string());
    }
    if token.ends_with("er") && n > 3 {
        return restore_stem(token[..token.len() - 2].to_string());
    }
    token.to_string()
}

/// Repair a stem after `-ed`/`-ing`/`-er`/`-est` removal: restore a
/// dropped final `e` or undouble a doubled consonant.
fn restore_stem(stem: String) -> String {
    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        return format!("{}e", stem);
    }

    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 2 && chars[n - 1] == chars[n - 2] {
        let map = vowel_map(&stem);
        if !map[n - 1] && !matches!(chars[n - 1], 'l' | 's' | 'z') {
            let mut undoubled = stem;
            undoubled.pop();
            return undoubled;
        }
    }

    if measure(&stem) == 1 && ends_cvc(&stem) {
        return format!("{}e", stem);
    }
    stem
}

/// Vowel classification per position; `y` counts as a vowel after a
/// consonant.
fn vowel_map(word: &str) -> Vec<bool> {
    let chars: Vec<char> = word.chars().collect();
    let mut map = vec![false; chars.len()];
    for i in 0..chars.len() {
        map[i] = match chars[i] {
            'a' | 'e' | 'i' | 'o' | 'u' => true,
            'y' => i > 0 && !map[i - 1],
            _ => false,
        };
    }
    map
}

/// Number of vowel-to-consonant transitions, the classic stemmer
/// measure.
fn measure(word: &str) -> usize {
    let map = vowel_map(word);
    let mut m = 0;
    for i in 0..map.len().saturating_sub(1) {
        if map[i] && !map[i + 1] {
            m += 1;
        }
    }
    m
}

/// True when the word ends consonant-vowel-consonant with the final
/// consonant not `w`, `x` or `y`.
fn ends_cvc(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let map = vowel_map(word);
    let n = chars.len();
    n >= 3
        && !map[n - 3]
        && map[n - 2]
        && !map[n - 1]
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
}
