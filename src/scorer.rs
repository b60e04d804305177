use crate::hangul;
use serde::Serialize;
use std::collections::HashSet;

/// Snapshot of how a typing attempt scores against its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypingStatistics {
    pub time_elapsed_seconds: f64,
    pub words_per_minute: u32,
    pub accuracy_percent: u32,
    pub total_chars_compared: usize,
    pub correct_chars: usize,
    pub error_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CharacterStatus {
    Pending,
    Current,
    Correct,
    Incorrect,
}

/// Whitespace the renderer draws as a key glyph instead of the raw char
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpecialKey {
    Enter,
    Tab,
    Space,
}

impl SpecialKey {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\n' => Some(SpecialKey::Enter),
            '\t' => Some(SpecialKey::Tab),
            ' ' => Some(SpecialKey::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterState {
    pub ch: char,
    pub status: CharacterStatus,
    pub special_key: Option<SpecialKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordGroup {
    pub chars: Vec<CharacterState>,
    /// State of the space after this word, absent for the last word
    pub trailing_space: Option<CharacterState>,
}

/// Scores `user_input` against `target_text` position by position.
///
/// Only the overlapping prefix is compared; typed chars beyond the target and
/// target chars not yet reached do not count either way.
pub fn calculate(target_text: &str, user_input: &str, elapsed_seconds: f64) -> TypingStatistics {
    let (correct_chars, error_count) = target_text
        .chars()
        .zip(user_input.chars())
        .fold((0, 0), |(correct, errors), (expected, typed)| {
            if expected == typed {
                (correct + 1, errors)
            } else {
                (correct, errors + 1)
            }
        });
    let total_chars_compared = correct_chars + error_count;

    let accuracy_percent = if total_chars_compared > 0 {
        ((correct_chars as f64 / total_chars_compared as f64) * 100.0).round() as u32
    } else {
        0
    };

    let words_per_minute = if elapsed_seconds > 0.0 {
        (correct_chars as f64 / (elapsed_seconds / 60.0)).round() as u32
    } else {
        0
    };

    TypingStatistics {
        time_elapsed_seconds: elapsed_seconds,
        words_per_minute,
        accuracy_percent,
        total_chars_compared,
        correct_chars,
        error_count,
    }
}

/// A session is complete only when every target char was compared and all matched.
pub fn is_complete(stats: &TypingStatistics, target_text: &str) -> bool {
    stats.total_chars_compared == target_text.chars().count() && stats.accuracy_percent == 100
}

/// Render status of the char at `index`.
///
/// A position listed in `mistake_indices` stays `Incorrect` even after the
/// learner fixes it in place.
pub fn classify_character(
    index: usize,
    target_text: &str,
    current_index: usize,
    user_input: &str,
    mistake_indices: &HashSet<usize>,
) -> CharacterStatus {
    status_at(
        index,
        current_index,
        target_text.chars().nth(index),
        user_input.chars().nth(index),
        mistake_indices,
    )
}

fn status_at(
    index: usize,
    current_index: usize,
    expected: Option<char>,
    typed: Option<char>,
    mistake_indices: &HashSet<usize>,
) -> CharacterStatus {
    if index == current_index {
        CharacterStatus::Current
    } else if index > current_index {
        CharacterStatus::Pending
    } else if typed != expected || mistake_indices.contains(&index) {
        CharacterStatus::Incorrect
    } else {
        CharacterStatus::Correct
    }
}

/// Classifies every target position in one pass.
pub fn character_states(
    target_text: &str,
    current_index: usize,
    user_input: &str,
    mistake_indices: &HashSet<usize>,
) -> Vec<CharacterState> {
    let mut typed = user_input.chars();

    target_text
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            CharacterState {
                ch,
                status: status_at(index, current_index, Some(ch), typed.next(), mistake_indices),
                special_key: SpecialKey::from_char(ch),
            }
        })
        .collect()
}

/// Batches per-char states into words separated by `' '`.
pub fn group_by_words(target_text: &str, classified_states: &[CharacterState]) -> Vec<WordGroup> {
    let word_lengths: Vec<usize> = target_text.split(' ').map(|w| w.chars().count()).collect();
    let last = word_lengths.len().saturating_sub(1);

    let mut groups = Vec::with_capacity(word_lengths.len());
    let mut offset = 0;
    for (i, len) in word_lengths.into_iter().enumerate() {
        let end = (offset + len).min(classified_states.len());
        let start = offset.min(end);
        let chars = classified_states[start..end].to_vec();
        offset += len;

        let trailing_space = if i < last {
            let space = classified_states.get(offset).copied();
            offset += 1;
            space
        } else {
            None
        };

        groups.push(WordGroup {
            chars,
            trailing_space,
        });
    }
    groups
}

/// Progress of the IME's in-flight candidate toward the char under the cursor.
pub fn composing_progress(target_text: &str, current_index: usize, composing: &str) -> f64 {
    target_text
        .chars()
        .nth(current_index)
        .map_or(0.0, |target| hangul::partial_progress(target, composing))
}
