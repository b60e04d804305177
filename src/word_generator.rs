use crate::{language::Language, session::TypingMode};
use itertools::Itertools;
use log::debug;
use std::error::Error;

/// Configuration for target text generation
#[derive(Debug, Clone)]
pub struct TextGenConfig {
    pub mode: TypingMode,
    pub number_of_words: usize,
    pub number_of_sentences: usize,
    pub custom_prompt: Option<String>,
    pub language: String,
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            mode: TypingMode::Sentence,
            number_of_words: 10,
            number_of_sentences: 1,
            custom_prompt: None,
            language: "korean".to_string(),
        }
    }
}

/// Produces the text a session is typed against
pub struct TextGenerator {
    config: TextGenConfig,
}

impl TextGenerator {
    pub fn new(config: TextGenConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Result<String, Box<dyn Error>> {
        if let Some(ref custom_prompt) = self.config.custom_prompt {
            return Ok(custom_prompt.clone());
        }

        let language = Language::new(&self.config.language)?;
        let text = match self.config.mode {
            TypingMode::Sentence => language.random_sentences(self.config.number_of_sentences),
            TypingMode::WordList => language
                .random_words(self.config.number_of_words)
                .iter()
                .join(" "),
        };
        debug!(
            "generated {} text from {}: {} chars",
            self.config.mode,
            language.name,
            text.chars().count()
        );
        Ok(text)
    }
}
