//! Metrics and encoding for the two standard Type 1 fonts the classic PDF
//! uses. Standard fonts need no embedding; every viewer ships them.

/// Font resource selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name in the page's font dictionary.
    pub fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    pub fn base_name(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }
}

// Glyph widths in 1/1000 em for WinAnsi codes 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const DEFAULT_WIDTH: u16 = 556;

/// Maps a character to its WinAnsi (cp1252) code. Characters outside the
/// encoding become `?`.
pub fn win_ansi(ch: char) -> u8 {
    match ch {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => u8::try_from(ch).unwrap_or(b'?'),
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        '\t' | '\n' | '\r' => b' ',
        _ => b'?',
    }
}

fn code_width(font: Font, code: u8) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    match code {
        32..=126 => table[usize::from(code - 32)],
        0x85 | 0x97 => 1000,
        0x91 | 0x92 => match font {
            Font::Regular => 222,
            Font::Bold => 278,
        },
        0x93 | 0x94 => match font {
            Font::Regular => 333,
            Font::Bold => 500,
        },
        0x95 => 350,
        0xa0 => 278,
        _ => DEFAULT_WIDTH,
    }
}

/// Rendered width of `text` in points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| u32::from(code_width(font, win_ansi(c))))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let units = units as f32;
    units * size / 1000.0
}

/// PDF literal string for `text`: parentheses, backslashes and every
/// non-ASCII byte escaped, so the content stream stays 7-bit clean.
pub fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for code in text.chars().map(win_ansi) {
        match code {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(char::from(code));
            }
            0x20..=0x7e => out.push(char::from(code)),
            _ => out.push_str(&format!("\\{code:03o}")),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pound_sign_is_octal_escaped() {
        assert_eq!(literal("£2,000"), "(\\2432,000)");
    }

    #[test]
    fn delimiters_are_escaped() {
        assert_eq!(literal("a (b) \\ c"), "(a \\(b\\) \\\\ c)");
    }

    #[test]
    fn unmapped_characters_degrade_to_question_mark() {
        assert_eq!(literal("✓ ok"), "(? ok)");
        assert_eq!(win_ansi('é'), 0xe9);
        assert_eq!(win_ansi('—'), 0x97);
    }

    #[test]
    fn widths_follow_font_metrics() {
        assert!((text_width("A", Font::Regular, 10.0) - 6.67).abs() < 1e-4);
        assert!((text_width("A", Font::Bold, 10.0) - 7.22).abs() < 1e-4);
        assert!(text_width("Wide words", Font::Bold, 12.0) > text_width("Wide words", Font::Regular, 12.0));
        assert!((text_width("", Font::Regular, 10.0)).abs() < f32::EPSILON);
    }
}
