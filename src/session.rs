use crate::scorer::{self, CharacterState, TypingStatistics, WordGroup};
use crate::time_series::{self, WpmSample};
use crate::typing_policy::record_mistakes;
use chrono::{DateTime, Local};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TypingMode {
    #[default]
    Sentence,
    WordList,
}

/// One attempt at typing a target text, owned by whoever drives the input.
///
/// Once completed the timestamps and input are frozen; `reset` is the only way
/// back to a fresh attempt on the same text.
#[derive(Debug, Clone)]
pub struct TypingSession {
    id: u64,
    text: String,
    mode: TypingMode,
    start_time: Option<DateTime<Local>>,
    end_time: Option<DateTime<Local>>,
    current_input: String,
    current_position: usize,
    started: bool,
    completed: bool,
    mistakes: HashSet<usize>,
    wpm_samples: Vec<WpmSample>,
}

/// Finished-session value handed to whatever stores results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub session_id: u64,
    pub mode: TypingMode,
    pub text: String,
    pub statistics: TypingStatistics,
    pub elapsed_seconds: f64,
    pub mistake_count: usize,
    pub wpm_samples: Vec<WpmSample>,
    pub consistency: f64,
    pub finished_at: DateTime<Local>,
}

impl TypingSession {
    pub fn new(text: impl Into<String>, mode: TypingMode) -> Self {
        Self {
            id: rand::random(),
            text: text.into(),
            mode,
            start_time: None,
            end_time: None,
            current_input: String::new(),
            current_position: 0,
            started: false,
            completed: false,
            mistakes: HashSet::new(),
            wpm_samples: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> TypingMode {
        self.mode
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.end_time
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn current_position(&self) -> usize {
        self.current_position
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn has_completed(&self) -> bool {
        self.completed
    }

    pub fn mistakes(&self) -> &HashSet<usize> {
        &self.mistakes
    }

    pub fn wpm_samples(&self) -> &[WpmSample] {
        &self.wpm_samples
    }

    pub fn start(&mut self) {
        self.start_at(Local::now());
    }

    pub fn start_at(&mut self, now: DateTime<Local>) {
        if self.started {
            return;
        }
        debug!("session {} started", self.id);
        self.start_time = Some(now);
        self.started = true;
    }

    pub fn update_input(&mut self, input: &str) {
        self.update_input_at(input, Local::now());
    }

    /// Replaces the accumulated input. The first non-empty input starts the clock.
    pub fn update_input_at(&mut self, input: &str, now: DateTime<Local>) {
        if self.completed {
            debug!("session {} already completed, ignoring input", self.id);
            return;
        }
        if !input.is_empty() {
            self.start_at(now);
        }

        self.current_input = input.to_string();
        self.current_position = input.chars().count();
        record_mistakes(&self.text, &self.current_input, &mut self.mistakes);

        // no speed to report at the instant the clock starts
        let stats = self.statistics_at(now);
        if self.started && stats.time_elapsed_seconds > 0.0 {
            self.wpm_samples.push(WpmSample::new(
                stats.time_elapsed_seconds,
                stats.words_per_minute,
                stats.accuracy_percent,
            ));
        }
    }

    pub fn complete(&mut self) {
        self.complete_at(Local::now());
    }

    pub fn complete_at(&mut self, now: DateTime<Local>) {
        if !self.started || self.completed {
            return;
        }
        debug!("session {} completed", self.id);
        self.end_time = Some(now);
        self.completed = true;
    }

    pub fn reset(&mut self) {
        debug!("session {} reset", self.id);
        self.start_time = None;
        self.end_time = None;
        self.current_input.clear();
        self.current_position = 0;
        self.started = false;
        self.completed = false;
        self.mistakes.clear();
        self.wpm_samples.clear();
    }

    /// Seconds between start and end, or start and `now` while still running.
    pub fn elapsed_seconds(&self, now: DateTime<Local>) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        let end = self.end_time.unwrap_or(now);
        ((end - start).num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    pub fn statistics_at(&self, now: DateTime<Local>) -> TypingStatistics {
        scorer::calculate(&self.text, &self.current_input, self.elapsed_seconds(now))
    }

    pub fn is_complete_at(&self, now: DateTime<Local>) -> bool {
        scorer::is_complete(&self.statistics_at(now), &self.text)
    }

    pub fn character_states(&self) -> Vec<CharacterState> {
        scorer::character_states(
            &self.text,
            self.current_position,
            &self.current_input,
            &self.mistakes,
        )
    }

    pub fn word_groups(&self) -> Vec<WordGroup> {
        scorer::group_by_words(&self.text, &self.character_states())
    }

    pub fn composing_progress(&self, composing: &str) -> f64 {
        scorer::composing_progress(&self.text, self.current_position, composing)
    }

    /// Snapshot for storage; only available once the session is completed.
    pub fn result(&self) -> Option<SessionResult> {
        let finished_at = self.end_time?;
        let statistics = self.statistics_at(finished_at);

        Some(SessionResult {
            session_id: self.id,
            mode: self.mode,
            text: self.text.clone(),
            statistics,
            elapsed_seconds: statistics.time_elapsed_seconds,
            mistake_count: self.mistakes.len(),
            wpm_samples: self.wpm_samples.clone(),
            consistency: time_series::consistency(&self.wpm_samples),
            finished_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::CharacterStatus;
    use chrono::Duration;

    #[test]
    fn test_session_new() {
        let session = TypingSession::new("안녕하세요", TypingMode::Sentence);

        assert_eq!(session.text(), "안녕하세요");
        assert_eq!(session.mode(), TypingMode::Sentence);
        assert_eq!(session.current_input(), "");
        assert_eq!(session.current_position(), 0);
        assert_eq!(session.start_time(), None);
        assert_eq!(session.end_time(), None);
        assert!(!session.has_started());
        assert!(!session.has_completed());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut session = TypingSession::new("가나", TypingMode::WordList);
        let t0 = Local::now();

        session.start_at(t0);
        session.start_at(t0 + Duration::seconds(3));

        assert_eq!(session.start_time(), Some(t0));
        assert!(session.has_started());
    }

    #[test]
    fn test_first_input_starts_session() {
        let mut session = TypingSession::new("가나", TypingMode::Sentence);
        let t0 = Local::now();

        session.update_input_at("", t0);
        assert!(!session.has_started());

        session.update_input_at("가", t0);
        assert!(session.has_started());
        assert_eq!(session.start_time(), Some(t0));
        assert_eq!(session.current_position(), 1);
    }

    #[test]
    fn test_complete_requires_start() {
        let mut session = TypingSession::new("가나", TypingMode::Sentence);

        session.complete();
        assert!(!session.has_completed());
        assert_eq!(session.end_time(), None);
    }

    #[test]
    fn test_complete_is_idempotent_and_freezes() {
        let mut session = TypingSession::new("가나", TypingMode::Sentence);
        let t0 = Local::now();
        let t1 = t0 + Duration::seconds(5);

        session.update_input_at("가나", t0);
        session.complete_at(t1);
        session.complete_at(t1 + Duration::seconds(10));
        session.start_at(t1 + Duration::seconds(20));
        session.update_input_at("가", t1 + Duration::seconds(30));

        assert!(session.has_completed());
        assert_eq!(session.start_time(), Some(t0));
        assert_eq!(session.end_time(), Some(t1));
        assert_eq!(session.current_input(), "가나");
        assert_eq!(session.elapsed_seconds(t1 + Duration::seconds(99)), 5.0);
    }

    #[test]
    fn test_statistics_while_running() {
        let mut session = TypingSession::new("안녕하세요", TypingMode::Sentence);
        let t0 = Local::now();

        session.start_at(t0);
        session.update_input_at("안녕", t0 + Duration::seconds(30));

        let stats = session.statistics_at(t0 + Duration::seconds(60));
        assert_eq!(stats.words_per_minute, 2);
        assert_eq!(stats.accuracy_percent, 100);
        assert!(!session.is_complete_at(t0 + Duration::seconds(60)));
    }

    #[test]
    fn test_mistake_stays_flagged_after_correction() {
        let mut session = TypingSession::new("안녕하세요", TypingMode::Sentence);
        let t0 = Local::now();

        session.update_input_at("안녕히세", t0);
        session.update_input_at("안녕", t0);
        session.update_input_at("안녕하세", t0);

        assert_eq!(session.mistakes(), &HashSet::from([2]));
        let states = session.character_states();
        assert_eq!(states[2].status, CharacterStatus::Incorrect);
        assert_eq!(states[3].status, CharacterStatus::Correct);
        assert_eq!(states[4].status, CharacterStatus::Current);
        // scoring itself only looks at the current input
        assert_eq!(session.statistics_at(t0).accuracy_percent, 100);
    }

    #[test]
    fn test_reset_keeps_identity() {
        let mut session = TypingSession::new("가나 다", TypingMode::WordList);
        let id = session.id();
        let t0 = Local::now();

        session.update_input_at("가x", t0);
        session.complete_at(t0 + Duration::seconds(1));
        session.reset();

        assert_eq!(session.id(), id);
        assert_eq!(session.text(), "가나 다");
        assert_eq!(session.mode(), TypingMode::WordList);
        assert_eq!(session.current_input(), "");
        assert_eq!(session.current_position(), 0);
        assert!(session.mistakes().is_empty());
        assert!(session.wpm_samples().is_empty());
        assert!(!session.has_started());
        assert!(!session.has_completed());
        assert_eq!(session.start_time(), None);
        assert_eq!(session.end_time(), None);
    }

    #[test]
    fn test_word_groups() {
        let mut session = TypingSession::new("가나 다", TypingMode::WordList);
        session.update_input("가나");

        let groups = session.word_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].trailing_space.map(|s| s.status),
            Some(CharacterStatus::Current)
        );
    }

    #[test]
    fn test_composing_progress() {
        let mut session = TypingSession::new("안녕", TypingMode::Sentence);
        session.update_input("안");

        assert!((session.composing_progress("녀") - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_samples_skip_the_starting_keystroke() {
        let mut session = TypingSession::new("가나다", TypingMode::Sentence);
        let t0 = Local::now();

        session.update_input_at("가", t0);
        session.update_input_at("가나", t0 + Duration::seconds(1));
        session.update_input_at("가나다", t0 + Duration::seconds(2));
        session.complete_at(t0 + Duration::seconds(2));

        let samples: Vec<_> = session.wpm_samples().iter().map(|s| (s.t, s.wpm)).collect();
        assert_eq!(samples, vec![(1.0, 120), (2.0, 90)]);
        assert_eq!(session.result().unwrap().consistency, 15.0);
    }

    #[test]
    fn test_result() {
        let mut session = TypingSession::new("안녕하세요", TypingMode::Sentence);
        let t0 = Local::now();

        session.start_at(t0);
        for (i, prefix) in ["안", "안녕", "안녕하", "안녕하세", "안녕하세요"]
            .iter()
            .enumerate()
        {
            session.update_input_at(prefix, t0 + Duration::seconds(i as i64 + 1));
        }
        session.complete_at(t0 + Duration::seconds(5));

        let result = session.result().unwrap();
        assert_eq!(result.session_id, session.id());
        assert_eq!(result.mode, TypingMode::Sentence);
        assert_eq!(result.elapsed_seconds, 5.0);
        assert_eq!(result.statistics.correct_chars, 5);
        assert_eq!(result.statistics.words_per_minute, 60);
        assert_eq!(result.mistake_count, 0);
        assert_eq!(result.wpm_samples.len(), 5);
        // 60 chars/min at every step
        assert_eq!(result.consistency, 0.0);
        assert!(scorer::is_complete(&result.statistics, session.text()));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(TypingMode::Sentence.to_string(), "sentence");
        assert_eq!(TypingMode::WordList.to_string(), "word-list");
    }
}
