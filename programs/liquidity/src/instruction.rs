//! Instructions accepted by the liquidity program.

use {
    crate::{authority::Operation, error::LiquidityError},
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::pubkey::Pubkey,
};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum LiquidityInstruction {
    /// Create the record, controlled by `owner`.
    ///
    /// Signers: `owner`.
    Initialize { owner: Pubkey },

    /// Set the profile bio.
    ///
    /// Signers: the record owner.
    CreateProfile { bio: String },

    /// Replace the stored links.
    ///
    /// Signers: the record owner.
    StoreLinks { links: Vec<String> },

    /// Set the profile image URL.
    ///
    /// Signers: the record owner.
    StoreImage { image_url: String },

    /// Ask the owner for a vouch.
    RequestVouch {
        requested_by: Pubkey,
        comment: String,
    },

    /// Promote the first vouch request from `requested_by` to a vouch.
    ///
    /// Signers: the record owner.
    ApproveVouch { requested_by: Pubkey },

    /// Leave a message in the owner's inbox.
    ///
    /// Signers: `sender`.
    SendMessage { sender: Pubkey, content: String },

    /// Record a tip of `amount`, already settled elsewhere.
    Tip { amount: u64 },
}

impl LiquidityInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, LiquidityError> {
        borsh::from_slice(input).map_err(|_| LiquidityError::InvalidInput)
    }

    pub fn pack(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap()
    }

    pub fn operation(&self) -> Operation {
        match self {
            LiquidityInstruction::Initialize { .. } => Operation::Initialize,
            LiquidityInstruction::CreateProfile { .. } => Operation::CreateProfile,
            LiquidityInstruction::StoreLinks { .. } => Operation::StoreLinks,
            LiquidityInstruction::StoreImage { .. } => Operation::StoreImage,
            LiquidityInstruction::RequestVouch { .. } => Operation::RequestVouch,
            LiquidityInstruction::ApproveVouch { .. } => Operation::ApproveVouch,
            LiquidityInstruction::SendMessage { sender, .. } => {
                Operation::SendMessage { sender: *sender }
            }
            LiquidityInstruction::Tip { .. } => Operation::Tip,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn test_tip_layout() {
        let data = LiquidityInstruction::Tip { amount: 100 }.pack();
        // Variant index, then the little-endian amount.
        let mut expected = vec![7u8];
        expected.extend_from_slice(&100u64.to_le_bytes());
        assert_eq!(data, expected);
    }

    #[test]
    fn test_unpack() {
        let instruction = LiquidityInstruction::StoreLinks {
            links: vec!["myLink1".to_string(), "myLink2".to_string()],
        };
        assert_eq!(
            LiquidityInstruction::unpack(&instruction.pack()).unwrap(),
            instruction
        );
    }

    #[test]
    fn test_unpack_invalid() {
        assert_matches!(
            LiquidityInstruction::unpack(&[]),
            Err(LiquidityError::InvalidInput)
        );
        assert_matches!(
            LiquidityInstruction::unpack(&[8]),
            Err(LiquidityError::InvalidInput)
        );
        // Trailing bytes are rejected.
        let mut data = LiquidityInstruction::Tip { amount: 1 }.pack();
        data.push(0);
        assert_matches!(
            LiquidityInstruction::unpack(&data),
            Err(LiquidityError::InvalidInput)
        );
    }

    #[test]
    fn test_operation() {
        assert_eq!(
            LiquidityInstruction::ApproveVouch {
                requested_by: Pubkey::new_unique()
            }
            .operation(),
            Operation::ApproveVouch
        );
        assert!(!LiquidityInstruction::Tip { amount: 1 }
            .operation()
            .is_owner_gated());
    }
}
