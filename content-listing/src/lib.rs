use wasm_bindgen::prelude::*;
use chrono::Utc;
use serde_json::Value;
use listing_common::{Facet, RawDocument, StoreError};

// 导出模块
pub mod adapter;
pub mod builder;
pub mod config;
pub mod console;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod search;
pub mod view;

pub use adapter::{BlogAdapter, ContentAdapter, SuccessStoryAdapter};
pub use builder::{FacetBuilder, FacetOptionSet};
pub use config::ListingConfig;
pub use error::ListingError;
pub use filter::FilterSelection;
pub use pagination::{paginate, Page};
pub use view::{Listing, ListingSnapshot, ListingView, LoadOutcome, LoadTicket, Phase};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 按集合名称创建列表视图
pub fn listing_for(kind: &str, config: &ListingConfig) -> Option<Box<dyn Listing>> {
    match kind {
        "blogs" | "blog" => Some(Box::new(ListingView::new(BlogAdapter::new(config), config))),
        "successStories" | "success-stories" | "success-story" => Some(Box::new(ListingView::new(
            SuccessStoryAdapter::new(config),
            config,
        ))),
        _ => None,
    }
}

/// 把浏览器传入的 `[{id, fields}]` 转为文档
///
/// 缺少可用 id 的条目被跳过并记录警告，其余条目照常加载。
pub fn documents_from_json(entries: Vec<Value>) -> Vec<RawDocument> {
    let mut documents = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(mut entry) = entry else {
            console::warn(&format!("跳过第 {} 条文档: 不是对象", index));
            continue;
        };

        let id = match entry.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                console::warn(&format!("跳过第 {} 条文档: 缺少 id", index));
                continue;
            }
        };

        let fields = match entry.remove("fields") {
            Some(Value::Object(fields)) => fields,
            _ => serde_json::Map::new(),
        };
        documents.push(RawDocument::from_json(id, fields));
    }
    documents
}

fn parse_facet(name: &str) -> Result<Facet, ListingError> {
    Facet::from_name(name).ok_or_else(|| ListingError::UnknownFacet(name.to_string()))
}

/// 列表页JS接口 - 每个挂载的列表页持有一个实例
///
/// 查询由页面发起：先调用 `begin_load` 取得凭据，查询结束后把凭据连同文档
/// （或错误）交回。页面卸载后到达的结果会被丢弃。
#[wasm_bindgen]
pub struct ListingJS {
    inner: Box<dyn Listing>,
}

#[wasm_bindgen]
impl ListingJS {
    /// 创建列表，`kind` 为 "blogs" 或 "successStories"，`options` 可省略
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, options: JsValue) -> Result<ListingJS, JsValue> {
        let config: ListingConfig = if options.is_undefined() || options.is_null() {
            ListingConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| ListingError::decode("列表配置", e))?
        };

        let inner = listing_for(kind, &config)
            .ok_or_else(|| ListingError::UnknownKind(kind.to_string()))?;

        Ok(ListingJS { inner })
    }

    /// 集合名称
    #[wasm_bindgen]
    pub fn collection(&self) -> String {
        self.inner.collection().to_string()
    }

    /// 开始加载，返回凭据；本次挂载已加载过时返回 undefined
    #[wasm_bindgen]
    pub fn begin_load(&mut self) -> Option<u32> {
        self.inner.begin_load().map(|ticket| ticket.generation())
    }

    /// 查询成功，交回文档列表 `[{id, fields}]`
    ///
    /// 整体无法解析时按加载失败处理，列表仍会进入就绪状态。
    #[wasm_bindgen]
    pub fn load_documents(&mut self, ticket: u32, documents: JsValue) -> Result<bool, JsValue> {
        let ticket = LoadTicket::from_generation(ticket);

        let entries: Vec<Value> = match serde_wasm_bindgen::from_value(documents) {
            Ok(entries) => entries,
            Err(e) => {
                let err = ListingError::decode("文档", e);
                self.inner
                    .complete_load(ticket, Err(StoreError::InvalidQuery(err.to_string())));
                return Err(err.into());
            }
        };

        Ok(self.inner.complete_load(ticket, Ok(documents_from_json(entries))))
    }

    /// 查询失败
    #[wasm_bindgen]
    pub fn load_failed(&mut self, ticket: u32, message: &str) -> bool {
        self.inner.complete_load(
            LoadTicket::from_generation(ticket),
            Err(StoreError::Unavailable(message.to_string())),
        )
    }

    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    #[wasm_bindgen]
    pub fn remount(&mut self) {
        self.inner.remount();
    }

    #[wasm_bindgen]
    pub fn set_search(&mut self, term: &str) {
        self.inner.set_search(term);
    }

    /// 切换勾选，返回切换后是否选中
    #[wasm_bindgen]
    pub fn toggle(&mut self, facet: &str, value: &str) -> Result<bool, JsValue> {
        Ok(self.inner.toggle(parse_facet(facet)?, value))
    }

    #[wasm_bindgen]
    pub fn apply_filters(&mut self) -> bool {
        self.inner.apply_filters()
    }

    #[wasm_bindgen]
    pub fn reset_filters(&mut self) {
        self.inner.reset_filters();
    }

    #[wasm_bindgen]
    pub fn remove_chip(&mut self, facet: &str, value: &str) -> Result<(), JsValue> {
        self.inner.remove_chip(parse_facet(facet)?, value);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.inner.go_to_page(page)
    }

    #[wasm_bindgen]
    pub fn next_page(&mut self) -> usize {
        self.inner.next_page()
    }

    #[wasm_bindgen]
    pub fn previous_page(&mut self) -> usize {
        self.inner.previous_page()
    }

    /// 渲染当前状态
    #[wasm_bindgen]
    pub fn render(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.render_at(Utc::now());
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }
}
