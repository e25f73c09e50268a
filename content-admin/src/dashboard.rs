use listing_common::DocumentWriter;
use tracing::{info, warn};

use crate::catalog::ContentKind;
use crate::drafts::Draft;
use crate::error::AdminError;
use crate::session::{AuthSession, User};

/// 管理后台 - 文档库和登录状态由调用方注入
pub struct AdminDashboard<W, S> {
    writer: W,
    session: S,
}

impl<W: DocumentWriter, S: AuthSession> AdminDashboard<W, S> {
    pub fn new(writer: W, session: S) -> Self {
        Self { writer, session }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn require_user(&self) -> Result<User, AdminError> {
        self.session.current_user().ok_or_else(|| {
            warn!("未登录用户尝试修改内容");
            AdminError::Unauthenticated
        })
    }

    /// 校验并新建内容，返回新文档的 id
    pub async fn create<D: Draft>(&self, draft: &D) -> Result<String, AdminError> {
        let user = self.require_user()?;
        draft.validate()?;

        let collection = D::KIND.collection();
        let id = self.writer.add_document(collection, draft.to_fields()).await?;
        info!(collection, id = %id, uid = %user.uid, "内容已创建");
        Ok(id)
    }

    /// 删除内容
    pub async fn delete(&self, kind: ContentKind, id: &str) -> Result<(), AdminError> {
        let user = self.require_user()?;
        let id = id.trim();
        if id.is_empty() {
            return Err(AdminError::MissingId);
        }

        let collection = kind.collection();
        self.writer.delete_document(collection, id).await?;
        info!(collection, id, uid = %user.uid, "内容已删除");
        Ok(())
    }
}
