//! # Phonetic Rule Tables
//!
//! Static character tables for Vietnamese diacritics and tone placement.
//!
//! The paired tables are position-aligned by `char`: the `n`-th char of a
//! source table maps to the `n`-th char of its target table.

/// Accented letters; aligned with [`UNACCENTED`].
pub const ACCENTED: &str = concat!(
    "ÀÁÂÃÈÉÊÌÍÒÓÔÕÙÚÝàáâãèéêìíòóôõùúýĂăĐđĨĩŨũƠơƯưẠạẢảẤấẦầẨẩẪẫẬậẮắẰằẲẳẴẵẶặ",
    "ẸẹẺẻẼẽẾếỀềỂểỄễỆệỈỉỊịỌọỎỏỐốỒồỔổỖỗỘộỚớỜờỞởỠỡỢợỤụỦủỨứỪừỬửỮữỰựỲỳỴỵỶỷỸỹ",
);

/// Base letters for [`ACCENTED`].
pub const UNACCENTED: &str = concat!(
    "AAAAEEEIIOOOOUUYaaaaeeeiioooouuyAaDdIiUuOoUuAaAaAaAaAaAaAaAaAaAaAaAa",
    "EeEeEeEeEeEeEeEeIiIiOoOoOoOoOoOoOoOoOoOoOoOoUuUuUuUuUuUuUuYyYyYyYy",
);

/// Toned vowels carrying a circumflex, breve, or horn; aligned with [`TONE_DEMOTED`].
pub const TONED_MARKED: &str =
    "ẤấẦầẨẩẪẫẬậẮắẰằẲẳẴẵẶặẾếỀềỂểỄễỆệỐốỒồỔổỖỗỘộỚớỜờỞởỠỡỢợỨứỪừỬửỮữỰự";

/// [`TONED_MARKED`] with the tone mark dropped, keeping the vowel mark.
pub const TONE_DEMOTED: &str =
    "ÂâÂâÂâÂâÂâĂăĂăĂăĂăĂăÊêÊêÊêÊêÊêÔôÔôÔôÔôÔôƠơƠơƠơƠơƠơƯưƯưƯưƯưƯư";

/// Letters used for random insertion.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Tone-on-first-vowel digraphs; aligned with [`TONE_SHIFTED_DIGRAPHS`].
pub const TONE_DIGRAPHS: [&str; 10] = [
    "úy", "ùy", "ủy", "ũy", "ụy", "óa", "òa", "ỏa", "õa", "ọa",
];

/// [`TONE_DIGRAPHS`] with the tone moved to the second vowel.
pub const TONE_SHIFTED_DIGRAPHS: [&str; 10] = [
    "uý", "uỳ", "uỷ", "uỹ", "uỵ", "oá", "oà", "oả", "oã", "oạ",
];

/// Lowercase Vietnamese vowels, checked after a consonant prefix.
pub const VOWELS: [char; 60] = [
    'a', 'á', 'à', 'ả', 'ạ', 'ă', 'ắ', 'ằ', 'ẳ', 'ặ', 'â', 'ấ', 'ầ', 'ẩ', 'ậ', //
    'e', 'é', 'è', 'ẻ', 'ẹ', 'ê', 'ế', 'ề', 'ể', 'ệ', 'i', 'í', 'ì', 'ỉ', 'ị', //
    'o', 'ó', 'ò', 'ỏ', 'ọ', 'ô', 'ố', 'ồ', 'ổ', 'ộ', 'ơ', 'ớ', 'ờ', 'ở', 'ợ', //
    'u', 'ú', 'ù', 'ủ', 'ụ', 'ư', 'ứ', 'ừ', 'ử', 'ự', 'y', 'ý', 'ỳ', 'ỷ', 'ỵ',
];

/// Is `c` in [`VOWELS`]?
pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Look up `c` in `from` and return the aligned char of `to`.
pub fn translate_char(
    c: char,
    from: &str,
    to: &str,
) -> Option<char> {
    from.chars()
        .position(|x| x == c)
        .and_then(|idx| to.chars().nth(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_aligned() {
        assert_eq!(ACCENTED.chars().count(), 134);
        assert_eq!(ACCENTED.chars().count(), UNACCENTED.chars().count());
        assert_eq!(TONED_MARKED.chars().count(), 60);
        assert_eq!(TONED_MARKED.chars().count(), TONE_DEMOTED.chars().count());
        assert_eq!(TONE_DIGRAPHS.len(), TONE_SHIFTED_DIGRAPHS.len());
    }

    #[test]
    fn test_translate_char() {
        assert_eq!(translate_char('ò', ACCENTED, UNACCENTED), Some('o'));
        assert_eq!(translate_char('Đ', ACCENTED, UNACCENTED), Some('D'));
        assert_eq!(translate_char('ậ', TONED_MARKED, TONE_DEMOTED), Some('â'));
        assert_eq!(translate_char('x', ACCENTED, UNACCENTED), None);
    }

    #[test]
    fn test_is_vowel() {
        assert!(is_vowel('à'));
        assert!(is_vowel('ự'));
        assert!(!is_vowel('r'));
        assert!(!is_vowel('A'));
    }
}
