//! 密码哈希契约
//!
//! 具体实现位于基础设施层（bcrypt）。

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PasswordHasherError {
    #[error("password hash failed: {message}")]
    Hash { message: String },
    #[error("password verify failed: {message}")]
    Verify { message: String },
}

impl PasswordHasherError {
    pub fn hash_error(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    pub fn verify_error(message: impl Into<String>) -> Self {
        Self::Verify {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError>;
    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError>;
}
