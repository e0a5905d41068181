use crate::{config, mailerlite_client};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("mailerlite client error: {0}")]
    MailerLite(#[from] mailerlite_client::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
