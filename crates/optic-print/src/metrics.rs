//! Helvetica advance widths, for centering and wrapping.
//!
//! Widths are in thousandths of the font size, taken from the standard
//! Helvetica AFM. The table covers exactly the WinAnsi repertoire that the
//! builtin fonts can encode. [`printable`] maps everything else to `?`, so
//! measured text and drawn text always agree.

/// Widths for code points 32 (space) through 126 (`~`).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0-7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A-G
    722, 278, 500, 667, 556, 833, 722, 778, // H-O
    667, 778, 722, 667, 611, 722, 667, 944, // P-W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a-g
    556, 222, 222, 500, 222, 833, 556, 556, // h-o
    556, 556, 333, 500, 278, 556, 500, 722, // p-w
    500, 500, 500, 334, 260, 334, 584, // x y z { | } ~
];

/// Widths for code points 160 (no-break space) through 255 (`ÿ`).
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, // nbsp ¡ ¢ £ ¤ ¥ ¦ §
    333, 737, 370, 556, 584, 333, 737, 333, // ¨ © ª « ¬ shy ® ¯
    400, 584, 333, 333, 333, 556, 537, 278, // ° ± ² ³ ´ µ ¶ ·
    333, 333, 365, 556, 834, 834, 834, 611, // ¸ ¹ º » ¼ ½ ¾ ¿
    667, 667, 667, 667, 667, 667, 1000, 722, // À-Å Æ Ç
    667, 667, 667, 667, 278, 278, 278, 278, // È-Ë Ì-Ï
    722, 722, 778, 778, 778, 778, 778, 584, // Ð Ñ Ò-Ö ×
    778, 722, 722, 722, 722, 667, 667, 611, // Ø Ù-Ü Ý Þ ß
    556, 556, 556, 556, 556, 556, 889, 500, // à-å æ ç
    556, 556, 556, 556, 278, 278, 278, 278, // è-ë ì-ï
    556, 556, 556, 556, 556, 556, 556, 584, // ð ñ ò-ö ÷
    611, 556, 556, 556, 556, 500, 556, 500, // ø ù-ü ý þ ÿ
];

/// Drawn in place of any character the font cannot encode.
pub const REPLACEMENT: char = '?';

/// Width of [`REPLACEMENT`].
const REPLACEMENT_WIDTH: u16 = 556;

/// Width of a character the builtin font can encode, `None` otherwise.
fn char_width(c: char) -> Option<u16> {
    let code = c as u32;
    match code {
        32..=126 => Some(HELVETICA_WIDTHS[(code - 32) as usize]),
        160..=255 => Some(LATIN1_WIDTHS[(code - 160) as usize]),
        _ => winansi_extra_width(c),
    }
}

/// The WinAnsi characters that live in 128..=159 rather than at their
/// Unicode code point.
fn winansi_extra_width(c: char) -> Option<u16> {
    let width = match c {
        '€' => 556,
        '‚' => 222,
        'ƒ' => 556,
        '„' => 333,
        '…' => 1000,
        '†' | '‡' => 556,
        'ˆ' => 333,
        '‰' => 1000,
        'Š' => 667,
        '‹' => 333,
        'Œ' => 1000,
        'Ž' => 611,
        '‘' | '’' => 222,
        '“' | '”' => 333,
        '•' => 350,
        '–' => 556,
        '—' => 1000,
        '˜' => 333,
        '™' => 1000,
        'š' => 500,
        '›' => 333,
        'œ' => 944,
        'ž' => 500,
        'Ÿ' => 667,
        _ => return None,
    };
    Some(width)
}

/// Returns `text` restricted to characters the builtin font can draw.
///
/// Whitespace of any kind becomes a plain space and any unencodable
/// character becomes [`REPLACEMENT`].
///
/// ```rust
/// use optic_print::metrics::printable;
///
/// assert_eq!(printable("Café €12"), "Café €12");
/// assert_eq!(printable("Karim كريم"), "Karim ????");
/// ```
pub fn printable(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_whitespace() {
                ' '
            } else if char_width(c).is_some() {
                c
            } else {
                REPLACEMENT
            }
        })
        .collect()
}

/// Width of `text` in points when set at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| char_width(c).unwrap_or(REPLACEMENT_WIDTH) as u32)
        .sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap to `max_width` points.
///
/// Words longer than a line are split by character. Always returns at
/// least one (possibly empty) line.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(&current, size) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
