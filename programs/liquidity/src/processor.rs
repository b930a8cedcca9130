//! Liquidity program processor.
//!
//! Every operation is a single-record transaction: the record is loaded,
//! the authority rules are checked, the payload is applied to the loaded
//! copy, and the copy is committed back. A failing operation never reaches
//! the commit, so the stored record keeps its pre-operation state.

use {
    crate::{
        authority::{authorize, authorize_initialize, Signers},
        config::LiquidityConfig,
        error::LiquidityError,
        instruction::LiquidityInstruction,
        state::{Liquidity, Message, Vouch, VouchRequest},
        store::RecordStore,
    },
    log::*,
    solana_program::pubkey::Pubkey,
    url::Url,
};

pub struct Processor<S: RecordStore> {
    config: LiquidityConfig,
    store: S,
}

impl<S: RecordStore> Processor<S> {
    pub fn new(config: LiquidityConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &LiquidityConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: &Pubkey) -> Result<Liquidity, LiquidityError> {
        self.store.load(id).map(|loaded| loaded.record)
    }

    /// Decode `data` as a [`LiquidityInstruction`] and process it.
    pub fn process_instruction(
        &self,
        id: &Pubkey,
        signers: &Signers,
        data: &[u8],
    ) -> Result<(), LiquidityError> {
        let instruction = LiquidityInstruction::unpack(data)?;
        self.process(id, signers, &instruction)
    }

    pub fn process(
        &self,
        id: &Pubkey,
        signers: &Signers,
        instruction: &LiquidityInstruction,
    ) -> Result<(), LiquidityError> {
        if let LiquidityInstruction::Initialize { owner } = instruction {
            if self.store.contains(id) {
                return Err(LiquidityError::AlreadyExists);
            }
            authorize_initialize(owner, signers).into_result()?;
            self.store.create(id, owner)?;
            info!("liquidity {id} initialized, owner {owner}");
            return Ok(());
        }

        let mut loaded = self.store.load(id)?;
        apply(&self.config, &mut loaded.record, signers, instruction)?;
        let version = self.store.commit(id, loaded.version, &loaded.record)?;
        debug!(
            "liquidity {id} {:?} committed at version {version}",
            instruction.operation()
        );
        Ok(())
    }

    /// Process `instruction`, reloading and reapplying it while the commit
    /// loses to a concurrent writer, up to `conflict_retries` attempts.
    pub fn process_with_retry(
        &self,
        id: &Pubkey,
        signers: &Signers,
        instruction: &LiquidityInstruction,
    ) -> Result<(), LiquidityError> {
        with_conflict_retry(self.config.conflict_retries, || {
            self.process(id, signers, instruction)
        })
    }

    pub fn initialize(
        &self,
        id: &Pubkey,
        owner: &Pubkey,
        signers: &Signers,
    ) -> Result<(), LiquidityError> {
        self.process(id, signers, &LiquidityInstruction::Initialize { owner: *owner })
    }

    pub fn create_profile(
        &self,
        id: &Pubkey,
        signers: &Signers,
        bio: String,
    ) -> Result<(), LiquidityError> {
        self.process(id, signers, &LiquidityInstruction::CreateProfile { bio })
    }

    pub fn store_links(
        &self,
        id: &Pubkey,
        signers: &Signers,
        links: Vec<String>,
    ) -> Result<(), LiquidityError> {
        self.process(id, signers, &LiquidityInstruction::StoreLinks { links })
    }

    pub fn store_image(
        &self,
        id: &Pubkey,
        signers: &Signers,
        image_url: String,
    ) -> Result<(), LiquidityError> {
        self.process(id, signers, &LiquidityInstruction::StoreImage { image_url })
    }

    pub fn request_vouch(
        &self,
        id: &Pubkey,
        signers: &Signers,
        requested_by: &Pubkey,
        comment: String,
    ) -> Result<(), LiquidityError> {
        self.process(
            id,
            signers,
            &LiquidityInstruction::RequestVouch {
                requested_by: *requested_by,
                comment,
            },
        )
    }

    pub fn approve_vouch(
        &self,
        id: &Pubkey,
        signers: &Signers,
        requested_by: &Pubkey,
    ) -> Result<(), LiquidityError> {
        self.process(
            id,
            signers,
            &LiquidityInstruction::ApproveVouch {
                requested_by: *requested_by,
            },
        )
    }

    pub fn send_message(
        &self,
        id: &Pubkey,
        signers: &Signers,
        sender: &Pubkey,
        content: String,
    ) -> Result<(), LiquidityError> {
        self.process(
            id,
            signers,
            &LiquidityInstruction::SendMessage {
                sender: *sender,
                content,
            },
        )
    }

    pub fn tip(&self, id: &Pubkey, signers: &Signers, amount: u64) -> Result<(), LiquidityError> {
        self.process(id, signers, &LiquidityInstruction::Tip { amount })
    }
}

/// Run `op` until it returns something other than `Conflict`, at most
/// `max_attempts` times. The last `Conflict` is returned if every attempt
/// lost.
pub fn with_conflict_retry<T, F>(max_attempts: usize, mut op: F) -> Result<T, LiquidityError>
where
    F: FnMut() -> Result<T, LiquidityError>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Err(LiquidityError::Conflict) if attempt < max_attempts => {
                debug!("conflict on attempt {attempt}, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Apply `instruction` to an already loaded record.
///
/// On error `liquidity` is left untouched.
pub fn apply(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    signers: &Signers,
    instruction: &LiquidityInstruction,
) -> Result<(), LiquidityError> {
    authorize(liquidity, instruction.operation(), signers).into_result()?;

    match instruction {
        LiquidityInstruction::Initialize { .. } => Err(LiquidityError::AlreadyExists),
        LiquidityInstruction::CreateProfile { bio } => {
            process_create_profile(config, liquidity, bio)
        }
        LiquidityInstruction::StoreLinks { links } => process_store_links(config, liquidity, links),
        LiquidityInstruction::StoreImage { image_url } => {
            process_store_image(config, liquidity, image_url)
        }
        LiquidityInstruction::RequestVouch {
            requested_by,
            comment,
        } => process_request_vouch(config, liquidity, requested_by, comment),
        LiquidityInstruction::ApproveVouch { requested_by } => {
            process_approve_vouch(config, liquidity, requested_by)
        }
        LiquidityInstruction::SendMessage { sender, content } => {
            process_send_message(config, liquidity, sender, content)
        }
        LiquidityInstruction::Tip { amount } => process_tip(liquidity, *amount),
    }
}

fn check_text_len(text: &str, max_len: usize) -> Result<(), LiquidityError> {
    if text.len() > max_len {
        return Err(LiquidityError::InvalidInput);
    }
    Ok(())
}

fn process_create_profile(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    bio: &str,
) -> Result<(), LiquidityError> {
    check_text_len(bio, config.max_bio_len)?;
    liquidity.bio = bio.to_string();
    Ok(())
}

fn process_store_links(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    links: &[String],
) -> Result<(), LiquidityError> {
    for link in links {
        if link.is_empty() {
            return Err(LiquidityError::InvalidInput);
        }
        check_text_len(link, config.max_link_len)?;
    }
    liquidity.links.replace(links.to_vec(), config.max_links)
}

fn process_store_image(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    image_url: &str,
) -> Result<(), LiquidityError> {
    if image_url.is_empty() {
        return Err(LiquidityError::InvalidInput);
    }
    check_text_len(image_url, config.max_image_url_len)?;
    Url::parse(image_url).map_err(|err| {
        debug!("rejected image url {image_url:?}: {err}");
        LiquidityError::InvalidInput
    })?;
    liquidity.image_url = image_url.to_string();
    Ok(())
}

fn process_request_vouch(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    requested_by: &Pubkey,
    comment: &str,
) -> Result<(), LiquidityError> {
    check_text_len(comment, config.max_comment_len)?;
    liquidity.vouch_requests.push(
        VouchRequest {
            requested_by: *requested_by,
            comment: comment.to_string(),
        },
        config.max_vouch_requests,
    )
}

fn process_approve_vouch(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    requested_by: &Pubkey,
) -> Result<(), LiquidityError> {
    if !liquidity
        .vouch_requests
        .iter()
        .any(|request| request.requested_by == *requested_by)
    {
        return Err(LiquidityError::NotFound);
    }
    // Check before removing so a full vouch list leaves the request queued.
    if liquidity.vouches.is_full(config.max_vouches) {
        return Err(LiquidityError::CapacityExceeded);
    }
    let request = liquidity
        .vouch_requests
        .remove_first(|request| request.requested_by == *requested_by)
        .ok_or(LiquidityError::NotFound)?;
    liquidity
        .vouches
        .push(Vouch::from(request), config.max_vouches)
}

fn process_send_message(
    config: &LiquidityConfig,
    liquidity: &mut Liquidity,
    sender: &Pubkey,
    content: &str,
) -> Result<(), LiquidityError> {
    if content.is_empty() {
        return Err(LiquidityError::InvalidInput);
    }
    check_text_len(content, config.max_message_len)?;
    liquidity.messages.push(
        Message {
            sender: *sender,
            content: content.to_string(),
        },
        config.max_messages,
    )
}

fn process_tip(liquidity: &mut Liquidity, amount: u64) -> Result<(), LiquidityError> {
    if amount == 0 {
        return Err(LiquidityError::InvalidInput);
    }
    liquidity.tip_total = liquidity
        .tip_total
        .checked_add(amount)
        .ok_or(LiquidityError::Overflow)?;
    Ok(())
}
