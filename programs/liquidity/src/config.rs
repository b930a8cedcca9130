//! Deployment limits for liquidity records.
//!
//! A `LiquidityConfig` is built once by the host and handed to both the
//! record store and the processor. Every limit here affects the fixed
//! amount of space reserved for each record, so changing a limit after
//! records were created makes the existing records unreadable.

use {
    serde_derive::{Deserialize, Serialize},
    std::{
        fs::{create_dir_all, File},
        io,
        path::Path,
    },
    thiserror::Error,
};

/// Length of the account discriminator that prefixes every record.
pub const DISCRIMINATOR_LEN: usize = 8;
const PUBKEY_LEN: usize = 32;
const U64_LEN: usize = 8;
// Borsh length prefix for strings and vectors.
const LEN_PREFIX: usize = 4;

pub const DEFAULT_MAX_BIO_LEN: usize = 256;
pub const DEFAULT_MAX_LINKS: usize = 10;
pub const DEFAULT_MAX_LINK_LEN: usize = 200;
pub const DEFAULT_MAX_IMAGE_URL_LEN: usize = 200;
pub const DEFAULT_MAX_VOUCH_REQUESTS: usize = 16;
pub const DEFAULT_MAX_VOUCHES: usize = 16;
pub const DEFAULT_MAX_COMMENT_LEN: usize = 200;
pub const DEFAULT_MAX_MESSAGES: usize = 32;
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 280;
pub const DEFAULT_CONFLICT_RETRIES: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("`{0}` must be greater than zero")]
    ZeroLimit(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LiquidityConfig {
    pub max_bio_len: usize,
    pub max_links: usize,
    pub max_link_len: usize,
    pub max_image_url_len: usize,
    pub max_vouch_requests: usize,
    pub max_vouches: usize,
    pub max_comment_len: usize,
    pub max_messages: usize,
    pub max_message_len: usize,
    /// Attempts made by `Processor::process_with_retry` before a `Conflict`
    /// is handed back to the caller.
    pub conflict_retries: usize,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            max_bio_len: DEFAULT_MAX_BIO_LEN,
            max_links: DEFAULT_MAX_LINKS,
            max_link_len: DEFAULT_MAX_LINK_LEN,
            max_image_url_len: DEFAULT_MAX_IMAGE_URL_LEN,
            max_vouch_requests: DEFAULT_MAX_VOUCH_REQUESTS,
            max_vouches: DEFAULT_MAX_VOUCHES,
            max_comment_len: DEFAULT_MAX_COMMENT_LEN,
            max_messages: DEFAULT_MAX_MESSAGES,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }
}

impl LiquidityConfig {
    /// Load a configuration from a YAML file and validate it.
    pub fn load<P: AsRef<Path>>(config_file: P) -> Result<Self, ConfigError> {
        let file = File::open(config_file)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as YAML, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, config_file: P) -> Result<(), ConfigError> {
        let config_file = config_file.as_ref();
        if let Some(outdir) = config_file.parent() {
            create_dir_all(outdir)?;
        }
        let file = File::create(config_file)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_bio_len", self.max_bio_len),
            ("max_links", self.max_links),
            ("max_link_len", self.max_link_len),
            ("max_image_url_len", self.max_image_url_len),
            ("max_vouch_requests", self.max_vouch_requests),
            ("max_vouches", self.max_vouches),
            ("max_comment_len", self.max_comment_len),
            ("max_messages", self.max_messages),
            ("max_message_len", self.max_message_len),
            ("conflict_retries", self.conflict_retries),
        ];
        match limits.iter().find(|(_, limit)| *limit == 0) {
            Some((name, _)) => Err(ConfigError::ZeroLimit(*name)),
            None => Ok(()),
        }
    }

    /// Number of bytes reserved for a record holding every field at its
    /// configured maximum.
    pub fn record_space(&self) -> usize {
        let text = |max_len: usize| LEN_PREFIX.saturating_add(max_len);
        let sequence = |capacity: usize, entry_len: usize| {
            LEN_PREFIX.saturating_add(capacity.saturating_mul(entry_len))
        };
        let endorsement = PUBKEY_LEN.saturating_add(text(self.max_comment_len));
        let message = PUBKEY_LEN.saturating_add(text(self.max_message_len));

        [
            DISCRIMINATOR_LEN,
            PUBKEY_LEN,
            text(self.max_bio_len),
            sequence(self.max_links, text(self.max_link_len)),
            text(self.max_image_url_len),
            sequence(self.max_vouch_requests, endorsement),
            sequence(self.max_vouches, endorsement),
            sequence(self.max_messages, message),
            U64_LEN,
        ]
        .iter()
        .fold(0usize, |space, len| space.saturating_add(*len))
    }
}
