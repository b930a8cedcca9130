//! Liquidity record layout.
//!
//! A record is persisted as account data of a fixed size
//! (`LiquidityConfig::record_space`): the account discriminator followed by
//! the Borsh encoding of [`Liquidity`], zero padded to the end.

use {
    crate::{collection::BoundedVec, config::DISCRIMINATOR_LEN, error::LiquidityError},
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::{hash::hash, pubkey::Pubkey},
    std::io::Write,
};

/// Endorsement submitted by anyone, waiting for the owner's approval.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VouchRequest {
    pub requested_by: Pubkey,
    pub comment: String,
}

/// Endorsement approved by the owner.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Vouch {
    pub vouched_by: Pubkey,
    pub comment: String,
}

impl From<VouchRequest> for Vouch {
    fn from(request: VouchRequest) -> Self {
        Self {
            vouched_by: request.requested_by,
            comment: request.comment,
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub sender: Pubkey,
    pub content: String,
}

/// Profile record controlled by `owner`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Liquidity {
    /// Set when the record is created and never reassigned.
    pub owner: Pubkey,
    pub bio: String,
    pub links: BoundedVec<String>,
    pub image_url: String,
    pub vouch_requests: BoundedVec<VouchRequest>,
    pub vouches: BoundedVec<Vouch>,
    /// Inbox, oldest first.
    pub messages: BoundedVec<Message>,
    pub tip_total: u64,
}

impl Liquidity {
    pub fn new(owner: Pubkey) -> Self {
        Self {
            owner,
            bio: String::default(),
            links: BoundedVec::new(),
            image_url: String::default(),
            vouch_requests: BoundedVec::new(),
            vouches: BoundedVec::new(),
            messages: BoundedVec::new(),
            tip_total: 0,
        }
    }

    /// First bytes of every liquidity record's account data.
    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        let mut discriminator = [0u8; DISCRIMINATOR_LEN];
        discriminator.copy_from_slice(&hash(b"account:Liquidity").to_bytes()[..DISCRIMINATOR_LEN]);
        discriminator
    }

    /// Serialize into freshly allocated account data of exactly `space` bytes.
    pub fn pack(&self, space: usize) -> Result<Vec<u8>, LiquidityError> {
        let mut data = vec![0u8; space];
        let mut writer = &mut data[..];
        writer
            .write_all(&Self::discriminator())
            .map_err(|_| LiquidityError::AccountDataTooSmall)?;
        borsh::to_writer(&mut writer, self).map_err(|_| LiquidityError::AccountDataTooSmall)?;
        Ok(data)
    }

    pub fn unpack(data: &[u8]) -> Result<Self, LiquidityError> {
        if data.len() < DISCRIMINATOR_LEN || data[..DISCRIMINATOR_LEN] != Self::discriminator() {
            return Err(LiquidityError::InvalidAccountData);
        }
        let mut body = &data[DISCRIMINATOR_LEN..];
        // Trailing padding is expected, so `try_from_slice` is not used here.
        Self::deserialize(&mut body).map_err(|_| LiquidityError::InvalidAccountData)
    }
}
