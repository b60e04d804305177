use crate::hangul::{carries_next_initial, is_composing_prefix};
use std::collections::HashSet;

/// Records every position where `user_input` disagrees with `target_text`.
///
/// The last input char may still be mid-composition in the IME, either short
/// of the target (`하` on the way to `한`) or holding the next syllable's
/// initial as a final (`삭` on the way to `사과`). It only counts as a mistake
/// once it can no longer become the target syllable. Earlier positions are
/// committed and compared exactly. The set only grows: fixing a char later
/// does not erase the mistake.
pub fn record_mistakes(target_text: &str, user_input: &str, mistakes: &mut HashSet<usize>) {
    let target: Vec<char> = target_text.chars().collect();
    let typed_len = user_input.chars().count();

    for (idx, typed) in user_input.chars().enumerate().take(target.len()) {
        let expected = target[idx];
        if expected == typed {
            continue;
        }
        let is_last = idx + 1 == typed_len;
        if is_last && still_composing(expected, target.get(idx + 1).copied(), typed) {
            continue;
        }
        mistakes.insert(idx);
    }
}

fn still_composing(expected: char, next: Option<char>, typed: char) -> bool {
    let mut buf = [0; 4];
    let typed: &str = typed.encode_utf8(&mut buf);
    is_composing_prefix(expected, typed)
        || next.is_some_and(|next| carries_next_initial(expected, next, typed))
}

/// Same as [`record_mistakes`] but starting from an empty set.
pub fn mistakes_for(target_text: &str, user_input: &str) -> HashSet<usize> {
    let mut mistakes = HashSet::new();
    record_mistakes(target_text, user_input, &mut mistakes);
    mistakes
}
