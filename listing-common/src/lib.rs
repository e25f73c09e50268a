pub mod models;
pub mod store;

// 重新导出常用类型，方便直接使用
pub use models::{
    resolve_display, Facet, FieldValue, RawDocument, ResolvedFacets, CREATED_AT, OTHER,
};
pub use store::{DocumentStore, DocumentWriter, MemoryStore, SortDirection, StoreError};
