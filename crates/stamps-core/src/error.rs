use thiserror::Error;

/// Errors surfaced by the stamps/SRC-20 transaction-construction core.
///
/// Every fallible operation in this crate returns `Result<T, StampError>`;
/// there is no ambient exception mechanism and no partially constructed
/// transaction is ever returned to the caller.
#[derive(Debug, Error)]
pub enum StampError {
    /// Malformed caller input: empty/oversize payload, invalid ticker,
    /// invalid asset id, negative amount, and similar validation failures.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A UTXO selector could not cover `target + fee` with the eligible set.
    #[error("insufficient funds: need {needed} sat, have {available} sat")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Branch-and-bound / blackjack exhausted their search space.
    #[error("no solution found: {0}")]
    NoSolution(String),

    /// A produced artifact would exceed a hard size ceiling.
    #[error("size exceeded: {actual} bytes against a limit of {limit} bytes ({context})")]
    SizeExceeded {
        limit: usize,
        actual: usize,
        context: String,
    },

    /// Internal consistency failure. Should not occur on well-formed input;
    /// indicates a bug in this crate rather than bad caller data.
    #[error("encoding error: {0}")]
    EncodingError(String),
}
