use serde::Serialize;
use std::fmt;

/// First precomposed syllable (가)
pub const SYLLABLE_BASE: u32 = 0xAC00;
/// Last precomposed syllable (힣)
pub const SYLLABLE_LAST: u32 = 0xD7A3;

const INITIAL_COUNT: u32 = 19;
const MEDIAL_COUNT: u32 = 21;
/// Includes index 0, "no trailing consonant"
const FINAL_COUNT: u32 = 28;

const INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ',
    'ㅍ', 'ㅎ',
];

const MEDIALS: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ', 'ㅟ',
    'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

#[rustfmt::skip]
const FINALS: [Option<char>; 28] = [
    None,
    Some('ㄱ'), Some('ㄲ'), Some('ㄳ'), Some('ㄴ'), Some('ㄵ'), Some('ㄶ'), Some('ㄷ'),
    Some('ㄹ'), Some('ㄺ'), Some('ㄻ'), Some('ㄼ'), Some('ㄽ'), Some('ㄾ'), Some('ㄿ'),
    Some('ㅀ'), Some('ㅁ'), Some('ㅂ'), Some('ㅄ'), Some('ㅅ'), Some('ㅆ'), Some('ㅇ'),
    Some('ㅈ'), Some('ㅊ'), Some('ㅋ'), Some('ㅌ'), Some('ㅍ'), Some('ㅎ'),
];

/// The three structural slots of a precomposed syllable, as compatibility jamo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JamoDecomposition {
    pub initial: char,
    pub medial: char,
    /// `None` when the syllable has no trailing consonant
    #[serde(rename = "final")]
    pub final_: Option<char>,
}

impl JamoDecomposition {
    /// Components in typing order; an empty final contributes nothing.
    pub fn components(&self) -> Vec<char> {
        let mut out = vec![self.initial, self.medial];
        out.extend(self.final_);
        out
    }
}

/// Result of [`compose`]. A lookup miss degrades to the inputs concatenated verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
    Syllable(char),
    Fallback(String),
}

impl Composed {
    pub fn syllable(&self) -> Option<char> {
        match self {
            Composed::Syllable(c) => Some(*c),
            Composed::Fallback(_) => None,
        }
    }
}

impl fmt::Display for Composed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composed::Syllable(c) => write!(f, "{c}"),
            Composed::Fallback(s) => f.write_str(s),
        }
    }
}

pub fn is_hangul_syllable(ch: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(ch as u32))
}

/// Hangul compatibility jamo block (ㄱ..ㆎ)
pub fn is_jamo(ch: char) -> bool {
    (0x3131..=0x318E).contains(&(ch as u32))
}

/// Splits a precomposed syllable into initial/medial/final jamo.
/// Returns `None` for anything outside the syllable block, standalone jamo included.
pub fn decompose(ch: char) -> Option<JamoDecomposition> {
    if !is_hangul_syllable(ch) {
        return None;
    }
    let index = ch as u32 - SYLLABLE_BASE;
    let final_index = index % FINAL_COUNT;
    let medial_index = (index / FINAL_COUNT) % MEDIAL_COUNT;
    let initial_index = index / (FINAL_COUNT * MEDIAL_COUNT);

    Some(JamoDecomposition {
        initial: INITIALS[initial_index as usize],
        medial: MEDIALS[medial_index as usize],
        final_: FINALS[final_index as usize],
    })
}

/// Builds a syllable from table indices, `None` if any index is out of range.
pub fn compose_indices(initial: u32, medial: u32, final_: u32) -> Option<char> {
    if initial >= INITIAL_COUNT || medial >= MEDIAL_COUNT || final_ >= FINAL_COUNT {
        return None;
    }
    char::from_u32(SYLLABLE_BASE + (initial * MEDIAL_COUNT + medial) * FINAL_COUNT + final_)
}

/// Composes jamo into a syllable. `final_` may be empty for an open syllable.
///
/// Inputs that are not single jamo of the right slot are not an error: the
/// result falls back to `initial + medial + final_` so live feedback keeps
/// flowing while an IME is in an odd intermediate state.
pub fn compose(initial: &str, medial: &str, final_: &str) -> Composed {
    let initial_index = single_char(initial).and_then(|c| INITIALS.iter().position(|&j| j == c));
    let medial_index = single_char(medial).and_then(|c| MEDIALS.iter().position(|&j| j == c));
    let final_index = if final_.is_empty() {
        Some(0)
    } else {
        single_char(final_).and_then(|c| FINALS.iter().position(|&j| j == Some(c)))
    };

    match (initial_index, medial_index, final_index) {
        (Some(i), Some(m), Some(f)) => compose_indices(i as u32, m as u32, f as u32)
            .map(Composed::Syllable)
            .unwrap_or_else(|| Composed::Fallback(format!("{initial}{medial}{final_}"))),
        _ => Composed::Fallback(format!("{initial}{medial}{final_}")),
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Flattens text into structural components: syllables expand to their
/// initial/medial/final, every other char is kept as is.
pub fn jamo_sequence(text: &str) -> Vec<char> {
    text.chars()
        .flat_map(|c| match decompose(c) {
            Some(d) => d.components(),
            None => vec![c],
        })
        .collect()
}

/// Like [`jamo_sequence`] but compound vowels and compound finals are split
/// into the separate keys that build them on a 2-set keyboard.
pub fn keystroke_jamo(text: &str) -> Vec<char> {
    jamo_sequence(text)
        .into_iter()
        .flat_map(|c| match split_compound(c) {
            Some(pair) => pair.to_vec(),
            None => vec![c],
        })
        .collect()
}

fn split_compound(c: char) -> Option<[char; 2]> {
    match c {
        'ㅘ' => Some(['ㅗ', 'ㅏ']),
        'ㅙ' => Some(['ㅗ', 'ㅐ']),
        'ㅚ' => Some(['ㅗ', 'ㅣ']),
        'ㅝ' => Some(['ㅜ', 'ㅓ']),
        'ㅞ' => Some(['ㅜ', 'ㅔ']),
        'ㅟ' => Some(['ㅜ', 'ㅣ']),
        'ㅢ' => Some(['ㅡ', 'ㅣ']),
        'ㄳ' => Some(['ㄱ', 'ㅅ']),
        'ㄵ' => Some(['ㄴ', 'ㅈ']),
        'ㄶ' => Some(['ㄴ', 'ㅎ']),
        'ㄺ' => Some(['ㄹ', 'ㄱ']),
        'ㄻ' => Some(['ㄹ', 'ㅁ']),
        'ㄼ' => Some(['ㄹ', 'ㅂ']),
        'ㄽ' => Some(['ㄹ', 'ㅅ']),
        'ㄾ' => Some(['ㄹ', 'ㅌ']),
        'ㄿ' => Some(['ㄹ', 'ㅍ']),
        'ㅀ' => Some(['ㄹ', 'ㅎ']),
        'ㅄ' => Some(['ㅂ', 'ㅅ']),
        _ => None,
    }
}

/// How far `typed_so_far` has progressed toward `target`, in `[0, 1]`.
///
/// Components are matched in order and counting stops at the first mismatch,
/// so a correct jamo typed out of order earns nothing.
pub fn partial_progress(target: char, typed_so_far: &str) -> f64 {
    if !is_hangul_syllable(target) {
        return if single_char(typed_so_far) == Some(target) {
            1.0
        } else {
            0.0
        };
    }

    let expected = jamo_sequence(target.encode_utf8(&mut [0; 4]));
    let typed = jamo_sequence(typed_so_far);
    let matches = expected
        .iter()
        .zip(typed.iter())
        .take_while(|(e, t)| e == t)
        .count();

    matches as f64 / expected.len() as f64
}

/// True while `typed` is an unfinished composition of `target`: its
/// keystrokes are a proper, non-empty prefix of the target's keystrokes.
pub fn is_composing_prefix(target: char, typed: &str) -> bool {
    if !is_hangul_syllable(target) {
        return false;
    }
    let expected = keystroke_jamo(target.encode_utf8(&mut [0; 4]));
    let typed = keystroke_jamo(typed);
    !typed.is_empty() && typed.len() < expected.len() && expected.starts_with(&typed)
}

/// True when `typed` is `target` with the leading consonant of `next` hung
/// on as a final. A 2-set IME shows `삭` on the way to `사과` until the
/// following vowel moves `ㄱ` forward.
pub fn carries_next_initial(target: char, next: char, typed: &str) -> bool {
    if !is_hangul_syllable(target) {
        return false;
    }
    let Some(next_initial) = decompose(next).map(|d| d.initial) else {
        return false;
    };
    let mut expected = keystroke_jamo(target.encode_utf8(&mut [0; 4]));
    expected.push(next_initial);
    keystroke_jamo(typed) == expected
}
