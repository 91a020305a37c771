//! Client identity types
//!
//! A client is the bank's identity record: a storage-assigned numeric id,
//! names, and an 11-digit national id unique across all clients. Passwords
//! never appear on this type; they live inside the storage collaborator
//! and are only compared there during authentication.

/// Client identifier, assigned by storage on creation
///
/// Supports client IDs from 1 to 4,294,967,295
pub type ClientId = u32;

/// Number of ASCII digits in a valid national id
pub const NATIONAL_ID_DIGITS: usize = 11;

/// Identity record for a bank client
///
/// Returned by storage lookups and authentication. The password column is
/// intentionally absent: session state and query responses must never
/// carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Storage-assigned id, immutable after creation
    pub id: ClientId,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// National id, exactly 11 ASCII digits, unique across all clients
    pub national_id: String,
}

/// Check that a candidate national id is exactly 11 ASCII digits
pub fn is_valid_national_id(candidate: &str) -> bool {
    candidate.len() == NATIONAL_ID_DIGITS && candidate.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::valid("12345678901", true)]
    #[case::all_zeros("00000000000", true)]
    #[case::too_short("1234567890", false)]
    #[case::too_long("123456789012", false)]
    #[case::letters("1234567890a", false)]
    #[case::empty("", false)]
    #[case::unicode_digits("١٢٣٤٥٦٧٨٩٠١", false)]
    fn test_national_id_validation(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(is_valid_national_id(candidate), expected);
    }
}
