/// Australian postcodes are always four digits.
pub const POSTCODE_LEN: usize = 4;

/// Strips everything but ASCII digits and keeps at most four of them.
///
/// Applied on every keystroke in the manual postcode field, so `"12a3b456"`
/// becomes `"1234"`.
#[must_use]
pub fn sanitize_postcode_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(POSTCODE_LEN)
        .collect()
}

/// `true` when `candidate` is exactly four ASCII digits.
#[must_use]
pub fn is_valid_postcode(candidate: &str) -> bool {
    candidate.len() == POSTCODE_LEN && candidate.bytes().all(|b| b.is_ascii_digit())
}
