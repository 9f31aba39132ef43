//! A1-style cell references

/// Parse an A1 reference (`"C12"`) into 0-based (row, column)
///
/// `$` markers are ignored; anything else that is not letters followed by a
/// row number >= 1 yields `None`.
pub(crate) fn parse(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.trim().replace('$', "");
    let split = reference.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let col = letters.chars().try_fold(0u32, |acc, c| {
        acc.checked_mul(26)?
            .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
    })?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA)
pub(crate) fn column_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        result.insert(0, ((n % 26) as u8 + b'A') as char);
        n /= 26;
    }

    result
}

/// Format a 0-based (row, column) pair as an A1 reference
pub(crate) fn format(row: u32, col: u32) -> String {
    format!("{}{}", column_letters(col), row + 1)
}
