use thiserror::Error;
use wasm_bindgen::JsValue;

/// JS 接口错误
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("未知的内容类型: {0}")]
    UnknownKind(String),
    #[error("未知的筛选属性: {0}")]
    UnknownFacet(String),
    #[error("解析{what}失败: {message}")]
    Decode { what: &'static str, message: String },
}

impl ListingError {
    pub fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        ListingError::Decode {
            what,
            message: err.to_string(),
        }
    }
}

impl From<ListingError> for JsValue {
    fn from(err: ListingError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}
