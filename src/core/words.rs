//! Arabic transcription of whole amounts (tafqeet).
//!
//! Amounts are split into millions, thousands and a remainder below one
//! thousand. The millions and thousands groups agree in grammatical number
//! with their count: singular for one, dual for two, plural for three to ten
//! and singular again from eleven upwards.

use std::fmt;

/// Largest magnitude that can be transcribed.
pub const MAX_WORDS: i64 = 999_999_999;

const ZERO: &str = "صفر";
const NEGATIVE: &str = "سالب";
const AND: &str = " و";

const ONES: [&str; 10] = [
    "", "واحد", "اثنان", "ثلاثة", "أربعة", "خمسة", "ستة", "سبعة", "ثمانية", "تسعة",
];
const TENS: [&str; 10] = [
    "", "عشرة", "عشرون", "ثلاثون", "أربعون", "خمسون", "ستون", "سبعون", "ثمانون", "تسعون",
];
const HUNDREDS: [&str; 10] = [
    "",
    "مائة",
    "مائتان",
    "ثلاثمائة",
    "أربعمائة",
    "خمسمائة",
    "ستمائة",
    "سبعمائة",
    "ثمانمائة",
    "تسعمائة",
];
const TEENS: [&str; 10] = [
    "عشرة",
    "أحد عشر",
    "اثنا عشر",
    "ثلاثة عشر",
    "أربعة عشر",
    "خمسة عشر",
    "ستة عشر",
    "سبعة عشر",
    "ثمانية عشر",
    "تسعة عشر",
];

/// Words used for a magnitude (thousand, million) in each grammatical number.
struct Magnitude {
    singular: &'static str,
    dual: &'static str,
    plural: &'static str,
}

const MILLION: Magnitude = Magnitude {
    singular: "مليون",
    dual: "مليونان",
    plural: "ملايين",
};

const THOUSAND: Magnitude = Magnitude {
    singular: "ألف",
    dual: "ألفان",
    plural: "آلاف",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordsError {
    /// The magnitude exceeds [`MAX_WORDS`].
    OutOfRange(i64),
}

impl fmt::Display for WordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordsError::OutOfRange(n) => {
                write!(f, "{n} is outside the transcribable range ±{MAX_WORDS}")
            }
        }
    }
}

impl std::error::Error for WordsError {}

/// Transcribes `n` into Arabic words.
pub fn to_words(n: i64) -> Result<String, WordsError> {
    if n.unsigned_abs() > MAX_WORDS as u64 {
        return Err(WordsError::OutOfRange(n));
    }
    if n == 0 {
        return Ok(ZERO.to_string());
    }
    if n < 0 {
        return Ok(format!("{NEGATIVE} {}", to_words(-n)?));
    }

    let n = n as u32;
    let millions = n / 1_000_000;
    let thousands = (n % 1_000_000) / 1_000;
    let remainder = n % 1_000;

    let parts: Vec<String> = [
        magnitude_group(millions, &MILLION),
        magnitude_group(thousands, &THOUSAND),
        group(remainder),
    ]
    .into_iter()
    .filter(|p| !p.is_empty())
    .collect();

    Ok(parts.join(AND).trim().to_string())
}

fn magnitude_group(count: u32, magnitude: &Magnitude) -> String {
    match count {
        0 => String::new(),
        1 => magnitude.singular.to_string(),
        2 => magnitude.dual.to_string(),
        3..=10 => format!("{} {}", group(count), magnitude.plural),
        _ => format!("{} {}", group(count), magnitude.singular),
    }
}

/// Renders a value below one thousand.
fn group(n: u32) -> String {
    let h = (n / 100) as usize;
    let t = ((n % 100) / 10) as usize;
    let o = (n % 10) as usize;

    let below_hundred = if t == 1 {
        TEENS[o].to_string()
    } else {
        // Units are read before tens: "واحد وعشرون".
        [ONES[o], TENS[t]]
            .into_iter()
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(AND)
    };

    [HUNDREDS[h], below_hundred.as_str()]
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(AND)
}
