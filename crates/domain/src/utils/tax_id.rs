//! CPF/CNPJ handling
//!
//! Tax ids are stored digits-only; display formatting is applied at the edge
//! (listings and rendered documents). An 11-digit id is a natural person
//! (CPF), a 14-digit id an organization (CNPJ).

/// Strips everything that is not an ASCII digit.
pub fn canonicalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Applies the CPF or CNPJ display mask to a canonical tax id.
///
/// Values that are neither 11 nor 14 digits long are returned unchanged.
pub fn format_display(tax_id: &str) -> String {
    let digits = canonicalize(tax_id);
    match digits.len() {
        11 => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..]
        ),
        _ => tax_id.to_string(),
    }
}
