//! 领域模型错误定义

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("user not found")]
    UserNotFound,

    #[error("post not found")]
    PostNotFound,

    #[error("story not found")]
    StoryNotFound,

    #[error("like not found")]
    LikeNotFound,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("post already liked")]
    AlreadyLiked,

    #[error("story expired")]
    StoryExpired,

    #[error("only organizers can publish content")]
    PublishNotAllowed,

    #[error("only participants can interact with content")]
    InteractionNotAllowed,

    #[error("only the author can modify this content")]
    NotTheAuthor,

    /// 业务规则校验错误
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    /// 创建校验错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 仓储层错误类型；"未找到"通过 `Option` 表达，这里只承载存储故障
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// 仓储层结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
