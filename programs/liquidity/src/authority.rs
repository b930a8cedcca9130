//! Authority checks performed before any record is written.
//!
//! Callers are represented by the set of identities that signed the
//! request. Signature verification happens upstream; this module only checks
//! that the required identity is a member of that set.

use {
    crate::{error::LiquidityError, state::Liquidity},
    solana_program::pubkey::Pubkey,
    std::collections::HashSet,
};

/// Verified identities presented with a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signers(HashSet<Pubkey>);

impl Signers {
    pub fn new(signers: &[Pubkey]) -> Self {
        Self(signers.iter().copied().collect())
    }

    pub fn contains(&self, pubkey: &Pubkey) -> bool {
        self.0.contains(pubkey)
    }
}

impl From<&[Pubkey]> for Signers {
    fn from(signers: &[Pubkey]) -> Self {
        Self::new(signers)
    }
}

impl FromIterator<Pubkey> for Signers {
    fn from_iter<I: IntoIterator<Item = Pubkey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Operations distinguished by the authority rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    CreateProfile,
    StoreLinks,
    StoreImage,
    RequestVouch,
    ApproveVouch,
    /// Messages are open to anyone, but `sender` must have signed.
    SendMessage { sender: Pubkey },
    Tip,
}

impl Operation {
    pub fn is_owner_gated(&self) -> bool {
        matches!(
            self,
            Operation::CreateProfile
                | Operation::StoreLinks
                | Operation::StoreImage
                | Operation::ApproveVouch
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Allow,
    Deny(&'static str),
}

impl Authorization {
    pub fn into_result(self) -> Result<(), LiquidityError> {
        match self {
            Authorization::Allow => Ok(()),
            Authorization::Deny(reason) => {
                log::warn!("authorization denied: {reason}");
                Err(LiquidityError::Unauthorized)
            }
        }
    }
}

/// Decide whether `signers` may perform `operation` on an existing record.
pub fn authorize(liquidity: &Liquidity, operation: Operation, signers: &Signers) -> Authorization {
    if operation.is_owner_gated() && !signers.contains(&liquidity.owner) {
        return Authorization::Deny("owner signature missing");
    }
    if let Operation::SendMessage { sender } = operation {
        if !signers.contains(&sender) {
            return Authorization::Deny("sender signature missing");
        }
    }
    Authorization::Allow
}

/// Decide whether `signers` may create a record controlled by `owner`.
pub fn authorize_initialize(owner: &Pubkey, signers: &Signers) -> Authorization {
    if signers.contains(owner) {
        Authorization::Allow
    } else {
        Authorization::Deny("new owner signature missing")
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, test_case::test_case};

    #[test_case(Operation::CreateProfile; "create_profile")]
    #[test_case(Operation::StoreLinks; "store_links")]
    #[test_case(Operation::StoreImage; "store_image")]
    #[test_case(Operation::ApproveVouch; "approve_vouch")]
    fn test_owner_gated(operation: Operation) {
        let owner = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let liquidity = Liquidity::new(owner);

        assert_eq!(
            authorize(&liquidity, operation, &Signers::new(&[stranger])),
            Authorization::Deny("owner signature missing")
        );
        assert_eq!(
            authorize(&liquidity, operation, &Signers::default()),
            Authorization::Deny("owner signature missing")
        );
        assert_eq!(
            authorize(&liquidity, operation, &Signers::new(&[stranger, owner])),
            Authorization::Allow
        );
    }

    #[test_case(Operation::RequestVouch; "request_vouch")]
    #[test_case(Operation::Tip; "tip")]
    fn test_open(operation: Operation) {
        let liquidity = Liquidity::new(Pubkey::new_unique());
        assert_eq!(
            authorize(&liquidity, operation, &Signers::default()),
            Authorization::Allow
        );
        assert_eq!(
            authorize(
                &liquidity,
                operation,
                &Signers::new(&[Pubkey::new_unique()])
            ),
            Authorization::Allow
        );
    }

    #[test]
    fn test_send_message_requires_sender() {
        let owner = Pubkey::new_unique();
        let sender = Pubkey::new_unique();
        let liquidity = Liquidity::new(owner);
        let operation = Operation::SendMessage { sender };

        assert_eq!(
            authorize(&liquidity, operation, &Signers::default()),
            Authorization::Deny("sender signature missing")
        );
        // The owner's signature does not stand in for the sender's.
        assert_eq!(
            authorize(&liquidity, operation, &Signers::new(&[owner])),
            Authorization::Deny("sender signature missing")
        );
        assert_eq!(
            authorize(&liquidity, operation, &Signers::new(&[sender])),
            Authorization::Allow
        );
    }

    #[test]
    fn test_authorize_initialize() {
        let owner = Pubkey::new_unique();
        assert_eq!(
            authorize_initialize(&owner, &Signers::new(&[owner])),
            Authorization::Allow
        );
        assert_matches!(
            authorize_initialize(&owner, &Signers::new(&[Pubkey::new_unique()])).into_result(),
            Err(LiquidityError::Unauthorized)
        );
    }
}
