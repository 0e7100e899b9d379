//! Hebrew numeral formatting for chapter numbers.

const ONES: [char; 9] = ['א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט'];
const TENS: [char; 9] = ['י', 'כ', 'ל', 'מ', 'נ', 'ס', 'ע', 'פ', 'צ'];
const HUNDREDS: [char; 4] = ['ק', 'ר', 'ש', 'ת'];

const GERESH: char = '׳';
const GERSHAYIM: char = '"';

/// Letters for `num` without punctuation. 15 and 16 use ט"ו and ט"ז.
fn letters(num: u32) -> String {
    let mut out = String::new();
    let mut rest = num;

    while rest >= 400 {
        out.push('ת');
        rest -= 400;
    }
    if rest >= 100 {
        out.push(HUNDREDS[(rest / 100 - 1) as usize]);
        rest %= 100;
    }

    match rest {
        15 => out.push_str("טו"),
        16 => out.push_str("טז"),
        _ => {
            if rest >= 10 {
                out.push(TENS[(rest / 10 - 1) as usize]);
                rest %= 10;
            }
            if rest > 0 {
                out.push(ONES[(rest - 1) as usize]);
            }
        }
    }

    out
}

/// Format a chapter number the way it is printed in a siddur: `1 → א׳`,
/// `23 → כ"ג`, `150 → ק"נ`. Zero has no letters and stays `0`.
pub fn format_hebrew_numeral(num: u32) -> String {
    let letters: Vec<char> = letters(num).chars().collect();

    match letters.as_slice() {
        [] => num.to_string(),
        [single] => format!("{}{}", single, GERESH),
        [init @ .., last] => {
            let mut out: String = init.iter().collect();
            out.push(GERSHAYIM);
            out.push(*last);
            out
        }
    }
}
