use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{FieldValue, RawDocument, CREATED_AT};

/// 排序方向
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// 文档库错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("文档库不可用: {0}")]
    Unavailable(String),
    #[error("没有权限访问: {0}")]
    PermissionDenied(String),
    #[error("文档不存在: {collection}/{id}")]
    NotFound { collection: String, id: String },
    #[error("无效的查询: {0}")]
    InvalidQuery(String),
}

/// 文档库查询接口
///
/// 浏览器端只有一个线程，因此不要求返回的 future 满足 `Send`。
#[async_trait(?Send)]
pub trait DocumentStore {
    /// 查询集合中的全部文档，按指定字段排序
    async fn query(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<RawDocument>, StoreError>;
}

/// 文档库写入接口，仅供管理后台使用
#[async_trait(?Send)]
pub trait DocumentWriter {
    /// 新增文档，`createdAt` 由存储端写入，返回新文档的 id
    async fn add_document(
        &self,
        collection: &str,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<String, StoreError>;

    /// 删除文档
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// 内存文档库 - 用于测试和本地预览
pub struct MemoryStore {
    collections: RefCell<BTreeMap<String, Vec<RawDocument>>>,
    next_id: Cell<u64>,
    clock: Box<dyn Fn() -> DateTime<Utc>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// 指定服务端时钟，便于测试写入时间
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self {
            collections: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            clock: Box::new(clock),
        }
    }

    /// 直接放入文档，不改动任何字段
    pub fn insert(&self, collection: &str, document: RawDocument) {
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .borrow()
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<RawDocument> {
        self.collections
            .borrow()
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned())
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        if order_by.trim().is_empty() {
            return Err(StoreError::InvalidQuery("排序字段不能为空".to_string()));
        }

        let mut documents = self
            .collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default();

        // 缺少排序字段的文档排在最后，稳定排序保持插入顺序
        documents.sort_by(|a, b| {
            let (ka, kb) = (a.timestamp(order_by), b.timestamp(order_by));
            match (ka, kb) {
                (Some(x), Some(y)) => match direction {
                    SortDirection::Ascending => x.cmp(&y),
                    SortDirection::Descending => y.cmp(&x),
                },
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });

        Ok(documents)
    }
}

#[async_trait(?Send)]
impl DocumentWriter for MemoryStore {
    async fn add_document(
        &self,
        collection: &str,
        mut fields: BTreeMap<String, FieldValue>,
    ) -> Result<String, StoreError> {
        let seq = self.next_id.get();
        self.next_id.set(seq + 1);

        let id = format!("{}-{:06}", collection, seq);
        fields.insert(CREATED_AT.to_string(), FieldValue::Timestamp((self.clock)()));

        self.insert(collection, RawDocument { id: id.clone(), fields });
        Ok(id)
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.borrow_mut();
        let docs = collections.get_mut(collection);
        let position = docs
            .as_ref()
            .and_then(|docs| docs.iter().position(|doc| doc.id == id));

        match (docs, position) {
            (Some(docs), Some(pos)) => {
                docs.remove(pos);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }
}
