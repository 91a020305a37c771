//! Account types and account-number format
//!
//! An account belongs to exactly one client and carries a non-negative
//! decimal balance. Account numbers are the literal prefix `PL` followed
//! by 26 decimal digits, generated randomly at creation and unique among
//! all accounts.

use super::client::ClientId;
use rust_decimal::Decimal;

/// Account identifier, assigned by storage on creation
pub type AccountId = u32;

/// Literal prefix of every account number
pub const ACCOUNT_NUMBER_PREFIX: &str = "PL";

/// Number of decimal digits following the prefix
pub const ACCOUNT_NUMBER_DIGITS: usize = 26;

/// Persistent account record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Storage-assigned id
    pub id: AccountId,

    /// Owning client id, immutable after creation
    pub client_id: ClientId,

    /// Account number: `PL` + 26 decimal digits, globally unique
    pub number: String,

    /// Current balance; never negative as an outcome of any ledger operation
    pub balance: Decimal,
}

/// Check that a candidate (already upper-cased) matches the
/// `PL` + 26 digits account-number format
pub fn is_valid_account_number(candidate: &str) -> bool {
    candidate.len() == ACCOUNT_NUMBER_PREFIX.len() + ACCOUNT_NUMBER_DIGITS
        && candidate.starts_with(ACCOUNT_NUMBER_PREFIX)
        && candidate[ACCOUNT_NUMBER_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::valid("PL12345678901234567890123456", true)]
    #[case::all_zeros("PL00000000000000000000000000", true)]
    #[case::short("PL1234567890123456789012345", false)]
    #[case::long("PL123456789012345678901234567", false)]
    #[case::wrong_prefix("DE12345678901234567890123456", false)]
    #[case::lowercase_prefix("pl12345678901234567890123456", false)]
    #[case::letters_in_digits("PL1234567890123456789012345X", false)]
    #[case::empty("", false)]
    fn test_account_number_validation(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(is_valid_account_number(candidate), expected);
    }
}
