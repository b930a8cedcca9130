//! Liquidity program errors.

use {
    num_derive::FromPrimitive,
    solana_program::{decode_error::DecodeError, program_error::ProgramError},
    thiserror::Error,
};

/// Reasons a liquidity operation can fail.
///
/// Each variant has a stable discriminant which is surfaced to clients as a
/// `ProgramError::Custom` code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum LiquidityError {
    /// The target record, or the referenced vouch request, does not exist.
    #[error("not found")]
    NotFound,
    /// A record already exists under the given id.
    #[error("record already exists")]
    AlreadyExists,
    /// The signers do not include the required authority.
    #[error("unauthorized")]
    Unauthorized,
    /// A bounded sequence is full.
    #[error("capacity exceeded")]
    CapacityExceeded,
    /// Malformed, empty, oversized or non-positive payload.
    #[error("invalid input")]
    InvalidInput,
    /// Numeric accumulation would exceed its range.
    #[error("arithmetic overflow")]
    Overflow,
    /// The record was modified since it was loaded.
    #[error("record modified concurrently")]
    Conflict,
    /// Stored bytes are not a liquidity record.
    #[error("invalid account data")]
    InvalidAccountData,
    /// The record does not fit in its allocated space.
    #[error("account data too small")]
    AccountDataTooSmall,
}

impl From<LiquidityError> for ProgramError {
    fn from(e: LiquidityError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for LiquidityError {
    fn type_of() -> &'static str {
        "LiquidityError"
    }
}

#[cfg(test)]
mod tests {
    use {super::*, num_traits::FromPrimitive};

    #[test]
    fn test_custom_error_codes_round_trip() {
        for error in [
            LiquidityError::NotFound,
            LiquidityError::Unauthorized,
            LiquidityError::Conflict,
            LiquidityError::AccountDataTooSmall,
        ] {
            let program_error = ProgramError::from(error);
            let ProgramError::Custom(code) = program_error else {
                panic!("expected a custom program error, got {program_error:?}");
            };
            assert_eq!(LiquidityError::from_u32(code), Some(error));
        }
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ProgramError::from(LiquidityError::NotFound),
            ProgramError::Custom(0)
        );
        assert_eq!(
            ProgramError::from(LiquidityError::Conflict),
            ProgramError::Custom(6)
        );
        assert_eq!(LiquidityError::from_u32(42), None);
    }
}
