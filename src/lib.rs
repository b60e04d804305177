// Library surface shared by the CLI and integration tests.
pub mod app_dirs;
pub mod config;
pub mod hangul;
pub mod language;
pub mod scorer;
pub mod session;
pub mod time_series;
pub mod typing_policy;
pub mod word_generator;

pub use hangul::{compose, decompose, is_hangul_syllable, partial_progress, Composed, JamoDecomposition};
pub use scorer::{
    calculate, classify_character, group_by_words, is_complete, CharacterState, CharacterStatus,
    SpecialKey, TypingStatistics, WordGroup,
};
pub use session::{SessionResult, TypingMode, TypingSession};
