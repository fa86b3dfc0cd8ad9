//! # Accent Stripping

use rand::Rng;

use crate::noise::tables::{ACCENTED, TONE_DEMOTED, TONED_MARKED, UNACCENTED, translate_char};

/// Strip every diacritic from `text` by direct character substitution.
///
/// ## Arguments
/// * `text` - The text to strip.
///
/// ## Returns
/// The text with each accented letter replaced by its base letter.
pub fn remove_accents(text: &str) -> String {
    text.chars()
        .map(|c| translate_char(c, ACCENTED, UNACCENTED).unwrap_or(c))
        .collect()
}

/// Partially strip diacritics from `text`.
///
/// Each toned vowel with a vowel mark is demoted to its untoned form with
/// probability `demote_prob`; then each (possibly demoted) accented letter is
/// stripped to its base letter with probability `strip_prob`.
///
/// A draw is consumed only for characters present in the relevant table.
pub fn degrade_accents<R: Rng + ?Sized>(
    rng: &mut R,
    text: &str,
    demote_prob: f64,
    strip_prob: f64,
) -> String {
    text.chars()
        .map(|c| {
            let mut c = c;
            if let Some(demoted) = translate_char(c, TONED_MARKED, TONE_DEMOTED)
                && rng.random::<f64>() < demote_prob
            {
                c = demoted;
            }
            if let Some(base) = translate_char(c, ACCENTED, UNACCENTED)
                && rng.random::<f64>() < strip_prob
            {
                c = base;
            }
            c
        })
        .collect()
}
