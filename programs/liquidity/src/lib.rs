//! Liquidity profile program.
//!
//! Each liquidity record is a profile controlled by a single owner. The
//! owner curates the bio, links and image, and approves vouches. Anyone may
//! request a vouch, leave a message, or record a tip.
//!
//! The program is split the way Solana programs usually are:
//!
//! * [`state`] defines the record and its fixed-size account layout.
//! * [`instruction`] defines the operations and their wire encoding.
//! * [`authority`] decides which signers may run which operation.
//! * [`processor`] applies operations to records held in a [`store`].
//!
//! Records live behind the [`store::RecordStore`] trait. A store commits
//! each record atomically and rejects commits computed from a stale read
//! with [`error::LiquidityError::Conflict`]; callers can retry those with
//! [`processor::with_conflict_retry`].

pub mod authority;
pub mod collection;
pub mod config;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod store;
