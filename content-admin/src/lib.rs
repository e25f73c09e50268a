//! 内容管理后台：表单校验、登录检查与写入

pub mod catalog;
pub mod dashboard;
pub mod drafts;
pub mod error;
pub mod session;
pub mod validation;

pub use catalog::ContentKind;
pub use dashboard::AdminDashboard;
pub use drafts::{BlogDraft, CareerDraft, Draft, GuideDraft, SuccessStoryDraft};
pub use error::AdminError;
pub use session::{AuthSession, Session, User};
pub use validation::{FieldError, ValidationErrors};
