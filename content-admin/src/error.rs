use listing_common::StoreError;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// 后台操作错误
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("需要登录后才能管理内容")]
    Unauthenticated,
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("文档 id 不能为空")]
    MissingId,
    #[error(transparent)]
    Store(#[from] StoreError),
}
