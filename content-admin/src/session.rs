use serde::{Deserialize, Serialize};

/// 已登录的作者
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// 登录状态来源，由身份认证服务提供
pub trait AuthSession {
    fn current_user(&self) -> Option<User>;
}

/// 固定的登录状态
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl AuthSession for Session {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
