//! Persian text repair for strings pulled out of PDF text layers.
//!
//! PDF generators usually store right-to-left scripts in visual order and
//! frequently emit Arabic code points (or presentation-form glyphs) where a
//! Persian reader expects Persian letters. [`TextPipeline`] combines
//! [`TextOrder`] reordering with [`PersianNormalizer`] clean-up so every
//! extracted cell goes through the same two steps.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_bidi::{BidiClass, bidi_class};
use unicode_normalization::UnicodeNormalization;

/// How an extracted string is reordered before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOrder {
    /// Leave the string exactly as extracted.
    Logical,
    /// Reverse every character of every string, including digits and Latin text.
    Reverse,
    /// Treat the string as visual order: reverse it, then restore the internal
    /// order of left-to-right runs (numbers, Latin words). Strings without any
    /// right-to-left character are left untouched.
    #[default]
    Visual,
}

/// Target representation for digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitStyle {
    /// Keep digits as extracted.
    #[default]
    Keep,
    /// Convert Persian and Arabic-Indic digits to ASCII `0-9`.
    Ascii,
    /// Convert ASCII and Arabic-Indic digits to Persian `۰-۹`.
    Persian,
}

/// Returns true if `text` contains at least one strong right-to-left character.
pub fn contains_rtl(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL))
}

/// Reorder `text` according to `order`.
pub fn fix_order(text: &str, order: TextOrder) -> String {
    match order {
        TextOrder::Logical => text.to_string(),
        TextOrder::Reverse => text.chars().rev().collect(),
        TextOrder::Visual => visual_to_logical(text),
    }
}

fn visual_to_logical(text: &str) -> String {
    if !contains_rtl(text) {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().rev().collect();
    let mut i = 0;
    while i < chars.len() {
        if !is_ltr(chars[i]) {
            chars[i] = mirror(chars[i]);
            i += 1;
            continue;
        }

        // Extend the run across separators only while another LTR char
        // follows. Spaces join runs that touch Latin text but keep
        // neighbouring numbers apart.
        let mut latin = bidi_class(chars[i]) == BidiClass::L;
        let start = i;
        let mut end = i + 1;
        let mut j = i + 1;
        while j < chars.len() {
            let c = chars[j];
            if is_ltr(c) {
                latin |= bidi_class(c) == BidiClass::L;
                end = j + 1;
            } else {
                let space = bidi_class(c) == BidiClass::WS;
                if !is_separator(c) && !(space && (latin || latin_follows(&chars[j..]))) {
                    break;
                }
            }
            j += 1;
        }
        chars[start..end].reverse();
        i = end;
    }

    chars.into_iter().collect()
}

fn is_ltr(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::L | BidiClass::EN | BidiClass::AN)
}

fn is_separator(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::ES | BidiClass::CS | BidiClass::ET)
}

/// Whether the first strong or numeric char after the leading spaces and
/// separators is Latin.
fn latin_follows(rest: &[char]) -> bool {
    rest.iter()
        .find(|&&c| !is_separator(c) && bidi_class(c) != BidiClass::WS)
        .is_some_and(|&c| bidi_class(c) == BidiClass::L)
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '\u{00AB}' => '\u{00BB}',
        '\u{00BB}' => '\u{00AB}',
        other => other,
    }
}

static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\S\n]+").expect("static whitespace pattern")
});

/// Character-level clean-up for Persian text.
///
/// Every step can be toggled; the defaults suit text extracted from
/// Iranian government and university PDFs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersianNormalizer {
    /// Map Arabic Yeh / Alef Maksura to Persian Yeh and Arabic Kaf to Keheh.
    pub unify_letters: bool,
    /// Fold Arabic presentation forms (U+FB50–U+FDFF, U+FE70–U+FEFF) to base letters.
    pub fold_presentation_forms: bool,
    /// Remove kashida (tatweel, U+0640).
    pub strip_tatweel: bool,
    /// Remove bidi marks, embeddings, isolates and the BOM. ZWNJ is kept.
    pub strip_bidi_controls: bool,
    /// Trim lines and collapse runs of horizontal whitespace.
    pub collapse_whitespace: bool,
    /// Keep line breaks inside a cell. When false they collapse to a space.
    pub keep_newlines: bool,
    /// Digit conversion.
    pub digits: DigitStyle,
}

impl Default for PersianNormalizer {
    fn default() -> Self {
        Self {
            unify_letters: true,
            fold_presentation_forms: true,
            strip_tatweel: true,
            strip_bidi_controls: true,
            collapse_whitespace: true,
            keep_newlines: true,
            digits: DigitStyle::Keep,
        }
    }
}

impl PersianNormalizer {
    /// A normalizer that changes nothing.
    pub fn disabled() -> Self {
        Self {
            unify_letters: false,
            fold_presentation_forms: false,
            strip_tatweel: false,
            strip_bidi_controls: false,
            collapse_whitespace: false,
            keep_newlines: true,
            digits: DigitStyle::Keep,
        }
    }

    /// Apply every enabled step to `text`.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());

        for c in text.chars() {
            if self.fold_presentation_forms && is_presentation_form(c) {
                for folded in c.to_string().nfkc() {
                    self.push_char(&mut out, folded);
                }
            } else {
                self.push_char(&mut out, c);
            }
        }

        if self.collapse_whitespace {
            out = collapse(&out, self.keep_newlines);
        } else if !self.keep_newlines {
            out = out.replace(['\r', '\n'], " ");
        }
        out
    }

    fn push_char(&self, out: &mut String, c: char) {
        if self.strip_tatweel && c == '\u{0640}' {
            return;
        }
        if self.strip_bidi_controls && is_bidi_control(c) {
            return;
        }
        let c = if self.unify_letters {
            unify_letter(c)
        } else {
            c
        };
        out.push(convert_digit(c, self.digits));
    }
}

fn is_presentation_form(c: char) -> bool {
    matches!(c, '\u{FB50}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFE}')
}

fn is_bidi_control(c: char) -> bool {
    matches!(
        c,
        '\u{200E}' | '\u{200F}' | '\u{061C}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}

fn unify_letter(c: char) -> char {
    match c {
        '\u{064A}' | '\u{0649}' => '\u{06CC}',
        '\u{0643}' => '\u{06A9}',
        other => other,
    }
}

fn convert_digit(c: char, style: DigitStyle) -> char {
    let value = match c {
        '0'..='9' => c as u32 - '0' as u32,
        '\u{06F0}'..='\u{06F9}' => c as u32 - 0x06F0,
        '\u{0660}'..='\u{0669}' => c as u32 - 0x0660,
        _ => return c,
    };
    let base = match style {
        DigitStyle::Keep => return c,
        DigitStyle::Ascii => '0' as u32,
        DigitStyle::Persian => 0x06F0,
    };
    char::from_u32(base + value).unwrap_or(c)
}

fn collapse(text: &str, keep_newlines: bool) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if !keep_newlines {
        return HORIZONTAL_SPACE
            .replace_all(&text.replace('\n', " "), " ")
            .trim()
            .to_string();
    }

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Reordering followed by normalization, applied to every extracted string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPipeline {
    pub order: TextOrder,
    pub normalizer: PersianNormalizer,
}

impl TextPipeline {
    /// A pipeline with the given ordering and the default normalizer.
    pub fn with_order(order: TextOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Reorder, then normalize.
    ///
    /// Ordering runs first so presentation-form ligatures are still a single
    /// code point while the string is being reversed.
    pub fn apply(&self, text: &str) -> String {
        self.normalizer.normalize(&fix_order(text, self.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rtl_detects_persian() {
        assert!(contains_rtl("سلام"));
        assert!(contains_rtl("abc سلام"));
        assert!(!contains_rtl("hello 123"));
        assert!(!contains_rtl(""));
    }

    #[test]
    fn logical_order_is_identity() {
        assert_eq!(fix_order("مالس", TextOrder::Logical), "مالس");
    }

    #[test]
    fn reverse_reverses_everything() {
        assert_eq!(fix_order("مالس", TextOrder::Reverse), "سلام");
        assert_eq!(fix_order("1394", TextOrder::Reverse), "4931");
    }

    #[test]
    fn reverse_twice_is_identity() {
        let text = "لاس 1394 (نومزآ)";
        let twice = fix_order(&fix_order(text, TextOrder::Reverse), TextOrder::Reverse);
        assert_eq!(twice, text);
    }

    #[test]
    fn visual_leaves_ltr_only_text_alone() {
        assert_eq!(fix_order("1394", TextOrder::Visual), "1394");
        assert_eq!(fix_order("Hello World", TextOrder::Visual), "Hello World");
    }

    #[test]
    fn visual_reverses_persian_word() {
        assert_eq!(fix_order("مالس", TextOrder::Visual), "سلام");
    }

    #[test]
    fn visual_keeps_numbers_intact() {
        // Displayed left-to-right as "1394 لاس", logically "سال 1394".
        assert_eq!(fix_order("1394 لاس", TextOrder::Visual), "سال 1394");
    }

    #[test]
    fn visual_keeps_decimal_numbers_intact() {
        assert_eq!(fix_order("12.5 هرمن", TextOrder::Visual), "نمره 12.5");
    }

    #[test]
    fn visual_keeps_latin_phrases_intact() {
        assert_eq!(fix_order("Hello World مالس", TextOrder::Visual), "سلام Hello World");
    }

    #[test]
    fn visual_keeps_separate_numbers_apart() {
        // Displayed as "12 34 سلام": two numbers, not one run.
        assert_eq!(
            fix_order("12 34 \u{0645}\u{0627}\u{0644}\u{0633}", TextOrder::Visual),
            "\u{0633}\u{0644}\u{0627}\u{0645} 34 12"
        );
    }

    #[test]
    fn visual_keeps_number_after_latin_word() {
        assert_eq!(
            fix_order("ISO 9001 \u{0645}\u{0627}\u{0644}\u{0633}", TextOrder::Visual),
            "\u{0633}\u{0644}\u{0627}\u{0645} ISO 9001"
        );
    }

    #[test]
    fn visual_mirrors_brackets() {
        assert_eq!(fix_order("(نتم)", TextOrder::Visual), "(متن)");
    }

    #[test]
    fn visual_persian_digits_stay_in_order() {
        assert_eq!(fix_order("۱۳۹۴ لاس", TextOrder::Visual), "سال ۱۳۹۴");
    }

    #[test]
    fn unify_letters_maps_arabic_yeh_and_kaf() {
        let n = PersianNormalizer::default();
        assert_eq!(n.normalize("\u{0643}\u{062A}\u{0627}\u{0628}"), "\u{06A9}\u{062A}\u{0627}\u{0628}");
        assert_eq!(n.normalize("\u{0639}\u{0644}\u{064A}"), "\u{0639}\u{0644}\u{06CC}");
        assert_eq!(n.normalize("\u{0645}\u{0648}\u{0633}\u{0649}"), "\u{0645}\u{0648}\u{0633}\u{06CC}");
    }

    #[test]
    fn presentation_forms_fold_to_base_letters() {
        let n = PersianNormalizer::default();
        // ARABIC LETTER BEH INITIAL FORM + ARABIC LETTER FARSI YEH FINAL FORM
        assert_eq!(n.normalize("\u{FE91}\u{FBFD}"), "\u{0628}\u{06CC}");
        // Arabic yeh isolated form folds to U+064A, then unifies to Persian yeh.
        assert_eq!(n.normalize("\u{FEF1}"), "\u{06CC}");
        // LAM WITH ALEF ligature expands to two letters.
        assert_eq!(n.normalize("\u{FEFB}"), "\u{0644}\u{0627}");
    }

    #[test]
    fn presentation_forms_survive_visual_reordering() {
        let pipeline = TextPipeline::default();
        // Visual "ﻻﺑ" (lam-alef ligature, beh) is logically "بلا".
        assert_eq!(pipeline.apply("\u{FEFB}\u{FE91}"), "\u{0628}\u{0644}\u{0627}");
    }

    #[test]
    fn tatweel_is_removed() {
        let n = PersianNormalizer::default();
        assert_eq!(n.normalize("سـلـام"), "سلام");
    }

    #[test]
    fn bidi_controls_removed_but_zwnj_kept() {
        let n = PersianNormalizer::default();
        assert_eq!(
            n.normalize("\u{200F}\u{0645}\u{06CC}\u{200C}\u{0631}\u{0648}\u{0645}\u{200E}"),
            "\u{0645}\u{06CC}\u{200C}\u{0631}\u{0648}\u{0645}"
        );
        assert_eq!(n.normalize("\u{FEFF}abc"), "abc");
    }

    #[test]
    fn digits_to_ascii() {
        let n = PersianNormalizer {
            digits: DigitStyle::Ascii,
            ..PersianNormalizer::default()
        };
        assert_eq!(n.normalize("۱۳۹۴"), "1394");
        assert_eq!(n.normalize("\u{0661}\u{0662}"), "12");
    }

    #[test]
    fn digits_to_persian() {
        let n = PersianNormalizer {
            digits: DigitStyle::Persian,
            ..PersianNormalizer::default()
        };
        assert_eq!(n.normalize("1394"), "۱۳۹۴");
        assert_eq!(n.normalize("\u{0665}"), "۵");
    }

    #[test]
    fn whitespace_collapses_per_line() {
        let n = PersianNormalizer::default();
        assert_eq!(n.normalize("  a \u{00A0}  b \n\n  c  \n"), "a b\n\nc");
    }

    #[test]
    fn newlines_collapse_when_not_kept() {
        let n = PersianNormalizer {
            keep_newlines: false,
            ..PersianNormalizer::default()
        };
        assert_eq!(n.normalize("a\nb\r\nc"), "a b c");
    }

    #[test]
    fn disabled_normalizer_changes_nothing() {
        let text = " \u{0643}ـ\u{200F}  ۱ ";
        assert_eq!(PersianNormalizer::disabled().normalize(text), text);
    }

    #[test]
    fn pipeline_orders_then_normalizes() {
        let pipeline = TextPipeline::with_order(TextOrder::Reverse);
        assert_eq!(pipeline.apply(" \u{0643}\u{FE91} "), "\u{0628}\u{06A9}");
    }

    #[test]
    fn pipeline_deserializes_from_partial_config() {
        let pipeline: TextPipeline =
            serde_json::from_str(r#"{"order":"reverse","normalizer":{"digits":"ascii"}}"#).unwrap();
        assert_eq!(pipeline.order, TextOrder::Reverse);
        assert_eq!(pipeline.normalizer.digits, DigitStyle::Ascii);
        assert!(pipeline.normalizer.unify_letters);
    }
}
