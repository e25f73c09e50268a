use chrono::{DateTime, Utc};
use listing_common::{DocumentStore, Facet, RawDocument, StoreError};
use serde::Serialize;
use std::cell::RefCell;

use crate::adapter::ContentAdapter;
use crate::builder::{derive_options, FacetOptionSet};
use crate::config::ListingConfig;
use crate::console;
use crate::fetcher::fetch_documents;
use crate::filter::{self, Chip, FilterSelection};
use crate::models::Card;
use crate::pagination::{clamp_page, paginate, total_pages};
use crate::search::highlight;

/// 列表页所处阶段
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
}

/// 加载结果 - 与界面无关，供日志和排查使用
///
/// 加载失败时界面与空集合一样显示"没有结果"，这里保留两者的区别。
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoadOutcome {
    Pending,
    Loaded { count: usize },
    Failed { message: String },
}

/// 加载凭据，绑定发起加载时的挂载代数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u32,
}

impl LoadTicket {
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn from_generation(generation: u32) -> Self {
        Self { generation }
    }
}

/// 渲染结果 - 宿主页面据此绘制搜索栏、筛选面板、结果卡片和分页
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot {
    pub collection: &'static str,
    pub phase: Phase,
    pub load: LoadOutcome,
    pub search_term: String,
    pub options: FacetOptionSet,
    pub selection: FilterSelection,
    pub chips: Vec<Chip>,
    pub can_apply: bool,
    pub cards: Vec<Card>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub page_numbers: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    /// 加载完成且没有任何结果
    pub empty: bool,
}

/// 列表视图 - 持有一次挂载期间的全部状态
pub struct ListingView<A: ContentAdapter> {
    adapter: A,
    page_size: usize,
    phase: Phase,
    outcome: LoadOutcome,
    items: Vec<A::Item>,
    options: FacetOptionSet,
    selection: FilterSelection,
    search_term: String,
    current_page: usize,
    generation: u32,
    mounted: bool,
}

impl<A: ContentAdapter> ListingView<A> {
    pub fn new(adapter: A, config: &ListingConfig) -> Self {
        Self {
            adapter,
            page_size: config.page_size.max(1),
            phase: Phase::Loading,
            outcome: LoadOutcome::Pending,
            items: Vec::new(),
            options: FacetOptionSet::default(),
            selection: FilterSelection::new(),
            search_term: String::new(),
            current_page: 1,
            generation: 1,
            mounted: true,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn items(&self) -> &[A::Item] {
        &self.items
    }

    pub fn options(&self) -> &FacetOptionSet {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// 开始加载；每次挂载只加载一次，已卸载或已加载时返回 None
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.mounted || self.phase == Phase::Ready {
            return None;
        }
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// 完成加载，返回结果是否被采用
    ///
    /// 凭据过期（期间发生过卸载）或本次挂载已加载过时，结果被丢弃。
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RawDocument>, StoreError>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation || self.phase == Phase::Ready {
            console::info(&format!(
                "丢弃过期的加载结果: {} (凭据 {}, 当前 {})",
                self.adapter.collection(),
                ticket.generation,
                self.generation
            ));
            return false;
        }

        match result {
            Ok(documents) => {
                self.items = documents.iter().map(|doc| self.adapter.materialize(doc)).collect();
                self.outcome = LoadOutcome::Loaded {
                    count: self.items.len(),
                };
            }
            Err(e) => {
                console::warn(&format!("加载集合 {} 失败: {}", self.adapter.collection(), e));
                self.items.clear();
                self.outcome = LoadOutcome::Failed {
                    message: e.to_string(),
                };
            }
        }

        self.options = derive_options(self.items.iter().map(|item| self.adapter.facets(item)));
        self.phase = Phase::Ready;
        self.current_page = 1;
        true
    }

    /// 直接从文档库加载（独占视图时使用）
    pub async fn load<S: DocumentStore + ?Sized>(&mut self, store: &S) -> bool {
        let Some(ticket) = self.begin_load() else {
            return false;
        };
        let result = fetch_documents(store, self.adapter.collection()).await;
        self.complete_load(ticket, result)
    }

    /// 卸载：丢弃全部状态，之后到达的加载结果不再生效
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Loading;
        self.outcome = LoadOutcome::Pending;
        self.items.clear();
        self.options = FacetOptionSet::default();
        self.selection.reset();
        self.search_term.clear();
        self.current_page = 1;
    }

    /// 重新挂载，需要再次加载
    pub fn remount(&mut self) {
        if !self.mounted {
            self.mounted = true;
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.reset_page_if_out_of_range();
    }

    /// 切换勾选；不在选项中的值被忽略
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        if !self.options.contains(facet, value) && !self.selection.is_selected(facet, value) {
            return false;
        }
        let selected = self.selection.toggle(facet, value);
        self.reset_page_if_out_of_range();
        selected
    }

    pub fn apply_filters(&mut self) -> bool {
        let applied = self.selection.apply();
        self.reset_page_if_out_of_range();
        applied
    }

    pub fn reset_filters(&mut self) {
        self.selection.reset();
        self.reset_page_if_out_of_range();
    }

    /// 清除单个已选条件
    pub fn remove_chip(&mut self, facet: Facet, value: &str) {
        self.selection.remove(facet, value);
        self.reset_page_if_out_of_range();
    }

    /// 跳转页码，越界时钳制，返回实际页码
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = clamp_page(page, self.total_pages());
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// 当前搜索词和已应用筛选下的全部结果
    pub fn filtered(&self) -> Vec<&A::Item> {
        filter::apply(&self.adapter, &self.items, &self.search_term, &self.selection)
    }

    /// 当前页的结果
    pub fn page_items(&self) -> Vec<&A::Item> {
        let filtered = self.filtered();
        paginate(&filtered, self.page_size, self.current_page).items.to_vec()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size)
    }

    // 结果减少到当前页之前时回到第一页
    fn reset_page_if_out_of_range(&mut self) {
        if self.current_page > self.total_pages() {
            self.current_page = 1;
        }
    }

    pub fn render(&self) -> ListingSnapshot {
        self.render_at(Utc::now())
    }

    /// 以指定时间渲染（"几天前"依赖当前时间）
    pub fn render_at(&self, now: DateTime<Utc>) -> ListingSnapshot {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.page_size, self.current_page);

        let cards = page
            .items
            .iter()
            .map(|item| {
                let mut card = self.adapter.card(item, now);
                card.title_html = highlight(&card.title, &self.search_term);
                card
            })
            .collect();

        ListingSnapshot {
            collection: self.adapter.collection(),
            phase: self.phase,
            load: self.outcome.clone(),
            search_term: self.search_term.clone(),
            options: self.options.clone(),
            selection: self.selection.clone(),
            chips: self.selection.chips(),
            can_apply: self.selection.can_apply(),
            cards,
            page: page.page,
            total_pages: page.total_pages,
            total: page.total,
            page_numbers: (1..=page.total_pages).collect(),
            has_previous: page.page > 1,
            has_next: page.page < page.total_pages,
            empty: self.phase == Phase::Ready && page.total == 0,
        }
    }
}

/// 共享视图的加载：等待期间不持有借用，卸载可以在结果到达前发生
pub async fn load_shared<A, S>(view: &RefCell<ListingView<A>>, store: &S) -> bool
where
    A: ContentAdapter,
    S: DocumentStore + ?Sized,
{
    let (ticket, collection) = {
        let mut view = view.borrow_mut();
        match view.begin_load() {
            Some(ticket) => (ticket, view.adapter.collection()),
            None => return false,
        }
    };

    let result = fetch_documents(store, collection).await;
    view.borrow_mut().complete_load(ticket, result)
}

/// 与具体内容类型无关的列表接口，供浏览器绑定按类型分发
pub trait Listing {
    fn collection(&self) -> &'static str;
    fn begin_load(&mut self) -> Option<LoadTicket>;
    fn complete_load(&mut self, ticket: LoadTicket, result: Result<Vec<RawDocument>, StoreError>) -> bool;
    fn unmount(&mut self);
    fn remount(&mut self);
    fn set_search(&mut self, term: &str);
    fn toggle(&mut self, facet: Facet, value: &str) -> bool;
    fn apply_filters(&mut self) -> bool;
    fn reset_filters(&mut self);
    fn remove_chip(&mut self, facet: Facet, value: &str);
    fn go_to_page(&mut self, page: usize) -> usize;
    fn next_page(&mut self) -> usize;
    fn previous_page(&mut self) -> usize;
    fn render_at(&self, now: DateTime<Utc>) -> ListingSnapshot;
}

impl<A: ContentAdapter> Listing for ListingView<A> {
    fn collection(&self) -> &'static str {
        self.adapter.collection()
    }

    fn begin_load(&mut self) -> Option<LoadTicket> {
        ListingView::begin_load(self)
    }

    fn complete_load(&mut self, ticket: LoadTicket, result: Result<Vec<RawDocument>, StoreError>) -> bool {
        ListingView::complete_load(self, ticket, result)
    }

    fn unmount(&mut self) {
        ListingView::unmount(self)
    }

    fn remount(&mut self) {
        ListingView::remount(self)
    }

    fn set_search(&mut self, term: &str) {
        ListingView::set_search(self, term)
    }

    fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        ListingView::toggle(self, facet, value)
    }

    fn apply_filters(&mut self) -> bool {
        ListingView::apply_filters(self)
    }

    fn reset_filters(&mut self) {
        ListingView::reset_filters(self)
    }

    fn remove_chip(&mut self, facet: Facet, value: &str) {
        ListingView::remove_chip(self, facet, value)
    }

    fn go_to_page(&mut self, page: usize) -> usize {
        ListingView::go_to_page(self, page)
    }

    fn next_page(&mut self) -> usize {
        ListingView::next_page(self)
    }

    fn previous_page(&mut self) -> usize {
        ListingView::previous_page(self)
    }

    fn render_at(&self, now: DateTime<Utc>) -> ListingSnapshot {
        ListingView::render_at(self, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::BlogAdapter;

    fn view() -> ListingView<BlogAdapter> {
        ListingView::new(BlogAdapter::default(), &ListingConfig::default())
    }

    fn docs(n: usize) -> Vec<RawDocument> {
        (1..=n)
            .map(|i| {
                RawDocument::new(i.to_string())
                    .with("title", format!("Post {i}"))
                    .with("industry", if i % 2 == 0 { "Banking" } else { "Retail" })
            })
            .collect()
    }

    #[test]
    fn loads_once_per_mount() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        assert!(view.complete_load(ticket, Ok(docs(3))));
        assert_eq!(view.phase(), Phase::Ready);
        assert!(view.begin_load().is_none());
        assert!(!view.complete_load(ticket, Ok(docs(9))));
        assert_eq!(view.items().len(), 3);
    }

    #[test]
    fn late_result_after_unmount_is_discarded() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        view.unmount();
        assert!(!view.complete_load(ticket, Ok(docs(3))));
        assert!(view.items().is_empty());

        view.remount();
        assert!(!view.complete_load(ticket, Ok(docs(3))));
        let fresh = view.begin_load().unwrap();
        assert_ne!(fresh, ticket);
        assert!(view.complete_load(fresh, Ok(docs(2))));
    }

    #[test]
    fn failure_renders_empty_but_is_recorded() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        view.complete_load(ticket, Err(StoreError::Unavailable("timeout".into())));

        let snapshot = view.render();
        assert_eq!(snapshot.phase, Phase::Ready);
        assert!(snapshot.empty);
        assert!(matches!(snapshot.load, LoadOutcome::Failed { .. }));
    }

    #[test]
    fn loading_is_not_the_empty_state() {
        let snapshot = view().render();
        assert_eq!(snapshot.phase, Phase::Loading);
        assert!(!snapshot.empty);
        assert_eq!(snapshot.total_pages, 1);
    }

    #[test]
    fn shrinking_results_return_to_first_page() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        view.complete_load(ticket, Ok(docs(14)));

        assert_eq!(view.go_to_page(3), 3);
        view.toggle(Facet::Industry, "Banking");
        view.apply_filters();
        assert_eq!(view.filtered().len(), 7);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.current_page(), 1);

        assert_eq!(view.go_to_page(2), 2);
        view.set_search("Post 1");
        // Post 10, 12, 14
        assert_eq!(view.filtered().len(), 3);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn page_survives_changes_that_keep_it_in_range() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        view.complete_load(ticket, Ok(docs(14)));

        assert_eq!(view.go_to_page(2), 2);
        view.toggle(Facet::Industry, "Banking");
        view.apply_filters();
        assert_eq!(view.current_page(), 2);

        view.reset_filters();
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn stepping_pages_stops_at_the_ends() {
        let mut listing: Box<dyn Listing> = Box::new(view());
        let ticket = listing.begin_load().unwrap();
        listing.complete_load(ticket, Ok(docs(14)));

        assert_eq!(listing.previous_page(), 1);
        assert_eq!(listing.next_page(), 2);
        assert_eq!(listing.next_page(), 3);
        assert_eq!(listing.next_page(), 3);
        assert_eq!(listing.previous_page(), 2);

        let snapshot = listing.render_at(Utc::now());
        assert!(snapshot.has_previous && snapshot.has_next);
    }

    #[test]
    fn unknown_values_cannot_be_selected() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        view.complete_load(ticket, Ok(docs(4)));

        assert!(!view.toggle(Facet::Industry, "Energy"));
        assert!(view.toggle(Facet::Industry, "Banking"));
        assert!(view.apply_filters());
        assert_eq!(view.filtered().len(), 2);
    }

    #[test]
    fn search_term_is_highlighted_in_cards() {
        let mut view = view();
        let ticket = view.begin_load().unwrap();
        view.complete_load(ticket, Ok(docs(1)));
        view.set_search("post");

        let snapshot = view.render();
        assert_eq!(snapshot.cards[0].title_html, "<mark>Post</mark> 1");
    }
}
