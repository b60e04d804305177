use super::core::Language;
use rand::seq::SliceRandom;

impl Language {
    pub fn random_sentence(&self) -> Option<&str> {
        let mut rng = rand::thread_rng();
        self.sentences.choose(&mut rng).map(String::as_str)
    }

    /// `num` sentences joined by a space, repeats allowed when `num` exceeds the pool.
    pub fn random_sentences(&self, num: usize) -> String {
        (0..num)
            .filter_map(|_| self.random_sentence())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
