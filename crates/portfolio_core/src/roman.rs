pub const MIN_ROMAN: u32 = 1;
pub const MAX_ROMAN: u32 = 3999;
/// Length of MMMDCCCLXXXVIII, the longest canonical numeral.
pub const MAX_NUMERAL_LEN: usize = 15;

pub const INVALID_INPUT_MESSAGE: &str =
    "Not Valid! Please enter a number between 1 and 3999, inclusively.";

const NUMERAL_TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RomanError {
    NotANumber,
    OutOfRange,
    InvalidNumeral(String),
}

impl RomanError {
    pub fn message(&self) -> String {
        match self {
            Self::NotANumber | Self::OutOfRange => INVALID_INPUT_MESSAGE.to_string(),
            Self::InvalidNumeral(raw) => format!("'{raw}' is not a canonical Roman numeral"),
        }
    }
}

impl std::fmt::Display for RomanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for RomanError {}

/// Converts `number` by greedily taking the largest table entry that fits.
pub fn int_to_roman(number: u32) -> Result<String, RomanError> {
    if !(MIN_ROMAN..=MAX_ROMAN).contains(&number) {
        return Err(RomanError::OutOfRange);
    }

    let mut remaining = number;
    let mut numeral = String::new();
    for (value, symbol) in NUMERAL_TABLE {
        while remaining >= value {
            numeral.push_str(symbol);
            remaining -= value;
        }
    }
    Ok(numeral)
}

/// Parses a form field that must consist of ASCII digits only.
pub fn parse_form_number(raw: &str) -> Result<u32, RomanError> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(RomanError::NotANumber);
    }

    // All-digit input that overflows u32 is still a number, just too large.
    let number = raw.parse::<u32>().map_err(|_| RomanError::OutOfRange)?;
    if !(MIN_ROMAN..=MAX_ROMAN).contains(&number) {
        return Err(RomanError::OutOfRange);
    }
    Ok(number)
}

/// Inverse of [`int_to_roman`]. Only canonical numerals are accepted.
pub fn roman_to_int(numeral: &str) -> Result<u32, RomanError> {
    let invalid = || RomanError::InvalidNumeral(numeral.to_string());
    if numeral.is_empty() || numeral.len() > MAX_NUMERAL_LEN {
        return Err(invalid());
    }

    let mut rest = numeral;
    let mut total = 0u32;
    for (value, symbol) in NUMERAL_TABLE {
        while let Some(tail) = rest.strip_prefix(symbol) {
            total = total.checked_add(value).ok_or_else(invalid)?;
            rest = tail;
        }
    }

    if !rest.is_empty() {
        return Err(invalid());
    }

    // Greedy parsing accepts forms like "IIII"; re-encoding rejects them.
    match int_to_roman(total) {
        Ok(canonical) if canonical == numeral => Ok(total),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_table_boundaries() {
        assert_eq!(int_to_roman(1).expect("valid"), "I");
        assert_eq!(int_to_roman(4).expect("valid"), "IV");
        assert_eq!(int_to_roman(9).expect("valid"), "IX");
        assert_eq!(int_to_roman(14).expect("valid"), "XIV");
        assert_eq!(int_to_roman(1994).expect("valid"), "MCMXCIV");
        assert_eq!(int_to_roman(3999).expect("valid"), "MMMCMXCIX");
    }

    #[test]
    fn rejects_values_outside_range() {
        assert_eq!(int_to_roman(0), Err(RomanError::OutOfRange));
        assert_eq!(int_to_roman(4000), Err(RomanError::OutOfRange));
    }

    #[test]
    fn form_number_requires_digits() {
        assert_eq!(parse_form_number(""), Err(RomanError::NotANumber));
        assert_eq!(parse_form_number("-5"), Err(RomanError::NotANumber));
        assert_eq!(parse_form_number("12a"), Err(RomanError::NotANumber));
        assert_eq!(parse_form_number(" 12"), Err(RomanError::NotANumber));
        assert_eq!(parse_form_number("12"), Ok(12));
    }

    #[test]
    fn form_number_enforces_range_even_when_overflowing() {
        assert_eq!(parse_form_number("0"), Err(RomanError::OutOfRange));
        assert_eq!(parse_form_number("4000"), Err(RomanError::OutOfRange));
        assert_eq!(
            parse_form_number("99999999999999999999"),
            Err(RomanError::OutOfRange)
        );
        assert_eq!(parse_form_number("0042"), Ok(42));
    }

    #[test]
    fn both_input_errors_share_user_message() {
        assert_eq!(RomanError::NotANumber.message(), INVALID_INPUT_MESSAGE);
        assert_eq!(RomanError::OutOfRange.to_string(), INVALID_INPUT_MESSAGE);
    }

    #[test]
    fn roman_to_int_rejects_non_canonical_forms() {
        assert!(roman_to_int("IIII").is_err());
        assert!(roman_to_int("VX").is_err());
        assert!(roman_to_int("MMMM").is_err());
        assert!(roman_to_int("ABC").is_err());
        assert!(roman_to_int("").is_err());
        assert_eq!(roman_to_int("XLII"), Ok(42));
    }

    #[test]
    fn roman_to_int_rejects_overlong_input_without_overflow() {
        let huge = "M".repeat(4_294_968);
        assert_eq!(
            roman_to_int(&huge),
            Err(RomanError::InvalidNumeral(huge.clone()))
        );
        assert!(roman_to_int("MMMDCCCLXXXVIIII").is_err());
        assert_eq!(roman_to_int("MMMDCCCLXXXVIII"), Ok(3888));
    }
}
