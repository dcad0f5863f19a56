use thiserror::Error;

/// Failure resolving a narrative.
///
/// Malformed codewords and unexpected line shapes are never errors; they are
/// resolved by falling back to unstructured or narrative fragments. The only
/// failure that reaches the caller is an amount that cannot be parsed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The digits following a currency code do not form a decimal number
    /// (for example they contain two decimal separators).
    #[error("invalid amount {amount:?}: {source}")]
    InvalidAmount {
        /// The amount text after separator normalization.
        amount: String,
        /// The underlying decimal parse error.
        #[source]
        source: bigdecimal::ParseBigDecimalError,
    },
}
