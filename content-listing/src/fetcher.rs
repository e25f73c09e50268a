use listing_common::{DocumentStore, RawDocument, SortDirection, StoreError, CREATED_AT};

use crate::adapter::ContentAdapter;
use crate::console;

/// 读取集合中的全部文档，按创建时间倒序
///
/// 只发出一次查询，不做服务端筛选或分页。
pub async fn fetch_documents<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
) -> Result<Vec<RawDocument>, StoreError> {
    let documents = store
        .query(collection, CREATED_AT, SortDirection::Descending)
        .await?;
    console::info(&format!("已加载集合 {}，文档数量: {}", collection, documents.len()));
    Ok(documents)
}

/// 读取并转换为条目；失败时记录日志并返回空列表
pub async fn fetch_all<A, S>(store: &S, adapter: &A) -> Vec<A::Item>
where
    A: ContentAdapter,
    S: DocumentStore + ?Sized,
{
    match fetch_documents(store, adapter.collection()).await {
        Ok(documents) => documents.iter().map(|doc| adapter.materialize(doc)).collect(),
        Err(e) => {
            console::warn(&format!("加载集合 {} 失败: {}", adapter.collection(), e));
            Vec::new()
        }
    }
}
