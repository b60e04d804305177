use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
    #[serde(default)]
    pub sentences: Vec<String>,
}

impl Language {
    pub fn new(name: &str) -> Result<Self, Box<dyn Error>> {
        read_language_from_file(&format!("{name}.json"))
    }

    /// Up to `num` distinct words in random order.
    pub fn random_words(&self, num: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        self.words.choose_multiple(&mut rng, num).cloned().collect()
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language, Box<dyn Error>> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("language file not found: {file_name}"))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| format!("language file is not utf-8: {file_name}"))?;

    Ok(from_str(file_as_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hangul::is_hangul_syllable;

    #[test]
    fn test_language_new_korean() {
        let lang = Language::new("korean").unwrap();

        assert_eq!(lang.name, "korean");
        assert_eq!(lang.size as usize, lang.words.len());
        assert!(!lang.sentences.is_empty());
    }

    #[test]
    fn test_korean_words_are_hangul() {
        let lang = Language::new("korean").unwrap();
        for word in &lang.words {
            assert!(word.chars().all(is_hangul_syllable), "{word}");
        }
    }

    #[test]
    fn test_language_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["하나", "둘", "셋"]
        }
        "#;

        let lang: Language = from_str(json_data).expect("Failed to deserialize test language");

        assert_eq!(lang.name, "test");
        assert_eq!(lang.size, 3);
        assert_eq!(lang.words.len(), 3);
        assert!(lang.sentences.is_empty());
    }

    #[test]
    fn test_read_nonexistent_language_file() {
        let err = Language::new("nonexistent").unwrap_err();
        assert!(err.to_string().contains("nonexistent.json"));
    }

    #[test]
    fn test_random_words() {
        let lang = Language::new("korean").unwrap();

        let words = lang.random_words(5);
        assert_eq!(words.len(), 5);
        assert!(words.iter().all(|w| lang.words.contains(w)));

        assert_eq!(lang.random_words(0).len(), 0);
        assert_eq!(lang.random_words(10_000).len(), lang.words.len());
    }
}
