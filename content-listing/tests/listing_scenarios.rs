//! 列表页行为测试：搜索、筛选、分页与加载

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use content_listing::filter::{self, FilterSelection};
use content_listing::view::load_shared;
use content_listing::{
    paginate, BlogAdapter, ContentAdapter, ListingConfig, ListingView, LoadOutcome, Phase,
    SuccessStoryAdapter,
};
use listing_common::{
    DocumentStore, Facet, MemoryStore, RawDocument, SortDirection, StoreError, CREATED_AT,
};

/// 7 篇博客，id 1 最新；除 7 号外行业均为 Technology
fn seven_posts() -> MemoryStore {
    let store = MemoryStore::new();
    let newest = Utc.with_ymd_and_hms(2024, 9, 30, 12, 0, 0).unwrap();
    for i in 1..=7i64 {
        let mut doc = RawDocument::new(i.to_string())
            .with("title", format!("Post {i}"))
            .with(CREATED_AT, newest - Duration::days(i))
            .with("industry", if i == 7 { "Other" } else { "Technology" });
        if i == 7 {
            doc = doc.with("customIndustry", "Robotics");
        }
        store.insert(BlogAdapter::COLLECTION, doc);
    }
    store
}

async fn loaded_blog_view(store: &MemoryStore) -> ListingView<BlogAdapter> {
    let mut view = ListingView::new(BlogAdapter::default(), &ListingConfig::default());
    assert!(view.load(store).await);
    view
}

fn ids<T, F: Fn(&T) -> &str>(items: &[&T], id: F) -> Vec<String> {
    items.iter().map(|item| id(*item).to_string()).collect()
}

#[tokio::test]
async fn seven_posts_split_into_two_pages() {
    let store = seven_posts();
    let mut view = loaded_blog_view(&store).await;

    assert_eq!(view.total_pages(), 2);
    assert_eq!(ids(&view.page_items(), |p| p.id.as_str()), vec!["1", "2", "3", "4", "5", "6"]);

    view.go_to_page(2);
    assert_eq!(ids(&view.page_items(), |p| p.id.as_str()), vec!["7"]);
}

#[tokio::test]
async fn custom_industry_filter_selects_only_its_item() {
    let store = seven_posts();
    let mut view = loaded_blog_view(&store).await;

    assert_eq!(view.options().industries, vec!["Technology", "Robotics"]);
    assert!(view.toggle(Facet::Industry, "Robotics"));
    assert!(view.apply_filters());

    let snapshot = view.render();
    assert_eq!(snapshot.total_pages, 1);
    assert_eq!(snapshot.page, 1);
    assert_eq!(
        snapshot.cards.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        vec!["7"]
    );
}

#[tokio::test]
async fn blank_search_without_filters_returns_everything_in_order() {
    let store = seven_posts();
    let view = loaded_blog_view(&store).await;

    let all = view.filtered();
    assert_eq!(ids(&all, |p| p.id.as_str()), vec!["1", "2", "3", "4", "5", "6", "7"]);
}

#[tokio::test]
async fn toggling_only_selection_off_restores_search_only_results() {
    let store = seven_posts();
    let mut view = loaded_blog_view(&store).await;
    view.set_search("post");
    let unfiltered = ids(&view.filtered(), |p| p.id.as_str());

    view.toggle(Facet::Industry, "Robotics");
    view.apply_filters();
    assert_eq!(view.filtered().len(), 1);

    view.toggle(Facet::Industry, "Robotics");
    assert!(!view.selection().applied);
    assert_eq!(ids(&view.filtered(), |p| p.id.as_str()), unfiltered);
}

#[test]
fn search_is_case_insensitive() {
    let adapter = BlogAdapter::default();
    let items: Vec<_> = [
        RawDocument::new("a").with("title", "Purple ocean strategy"),
        RawDocument::new("b").with("description", "Why PURPLE matters"),
        RawDocument::new("c").with("content", "Nothing to see"),
    ]
    .iter()
    .map(|doc| adapter.materialize(doc))
    .collect();

    let selection = FilterSelection::new();
    let upper = filter::apply(&adapter, &items, "PURPLE", &selection);
    let lower = filter::apply(&adapter, &items, "purple", &selection);
    assert_eq!(upper, lower);
    assert_eq!(upper.len(), 2);
}

#[test]
fn empty_facet_selection_matches_accept_all() {
    let adapter = SuccessStoryAdapter::default();
    let combos = [
        ("Banking", "Cloud", "Consulting"),
        ("Retail", "Cloud", "Training"),
        ("Banking", "AI", "Consulting"),
        ("", "Cloud", "Consulting"),
    ];
    let items: Vec<_> = combos
        .iter()
        .enumerate()
        .map(|(i, (industry, topic, service))| {
            adapter.materialize(
                &RawDocument::new(i.to_string())
                    .with("industry", *industry)
                    .with("topic", *topic)
                    .with("service", *service),
            )
        })
        .collect();

    let mut empty_industry = FilterSelection::new();
    empty_industry.toggle(Facet::Topic, "Cloud");
    empty_industry.toggle(Facet::Service, "Consulting");
    empty_industry.apply();

    let mut all_industries = empty_industry.clone();
    for industry in ["Banking", "Retail", ""] {
        all_industries.toggle(Facet::Industry, industry);
    }

    let a = filter::apply(&adapter, &items, "", &empty_industry);
    let b = filter::apply(&adapter, &items, "", &all_industries);
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);

    // 行业缺失的条目在行业有选中值时被排除
    let mut banking = FilterSelection::new();
    banking.toggle(Facet::Industry, "Banking");
    banking.apply();
    assert!(filter::apply(&adapter, &items, "", &banking)
        .iter()
        .all(|story| story.facets.industry == "Banking"));
}

#[test]
fn out_of_range_pages_clamp_to_the_ends() {
    let items: Vec<u32> = (0..20).collect();
    let last = paginate(&items, 6, 4);
    assert_eq!(paginate(&items, 6, 0), paginate(&items, 6, 1));
    assert_eq!(paginate(&items, 6, 4 + 5), last);
    assert_eq!(last.items, &[18, 19]);
}

#[tokio::test]
async fn story_search_covers_feedback_challenges_and_help() {
    let store = MemoryStore::new();
    store.insert(
        SuccessStoryAdapter::COLLECTION,
        RawDocument::new("s1")
            .with("title", "Core banking")
            .with("keyChallenges", vec!["Mainframe lock-in".to_string()]),
    );
    store.insert(
        SuccessStoryAdapter::COLLECTION,
        RawDocument::new("s2")
            .with("title", "Retail analytics")
            .with("feedback", "They cut our reporting time in half"),
    );

    let mut view = ListingView::new(SuccessStoryAdapter::default(), &ListingConfig::default());
    view.load(&store).await;

    view.set_search("MAINFRAME");
    assert_eq!(ids(&view.filtered(), |s| s.id.as_str()), vec!["s1"]);
    view.set_search("reporting");
    assert_eq!(ids(&view.filtered(), |s| s.id.as_str()), vec!["s2"]);
}

struct OfflineStore;

#[async_trait(?Send)]
impl DocumentStore for OfflineStore {
    async fn query(
        &self,
        _collection: &str,
        _order_by: &str,
        _direction: SortDirection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        Err(StoreError::Unavailable("network down".into()))
    }
}

#[tokio::test]
async fn failed_fetch_looks_empty_but_is_distinguishable() {
    let mut failed = ListingView::new(BlogAdapter::default(), &ListingConfig::default());
    failed.load(&OfflineStore).await;

    let mut empty = ListingView::new(BlogAdapter::default(), &ListingConfig::default());
    empty.load(&MemoryStore::new()).await;

    let (a, b) = (failed.render(), empty.render());
    assert_eq!(a.phase, Phase::Ready);
    assert!(a.empty && b.empty);
    assert!(matches!(a.load, LoadOutcome::Failed { .. }));
    assert_eq!(b.load, LoadOutcome::Loaded { count: 0 });
}

/// 查询进行中页面被卸载
struct UnmountingStore {
    inner: MemoryStore,
    view: RefCell<Option<Rc<RefCell<ListingView<BlogAdapter>>>>>,
}

#[async_trait(?Send)]
impl DocumentStore for UnmountingStore {
    async fn query(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        if let Some(view) = self.view.borrow().as_ref() {
            view.borrow_mut().unmount();
        }
        self.inner.query(collection, order_by, direction).await
    }
}

#[tokio::test]
async fn results_arriving_after_unmount_are_dropped() {
    let view = Rc::new(RefCell::new(ListingView::new(
        BlogAdapter::default(),
        &ListingConfig::default(),
    )));
    let store = UnmountingStore {
        inner: seven_posts(),
        view: RefCell::new(Some(Rc::clone(&view))),
    };

    assert!(!load_shared(&view, &store).await);
    assert!(view.borrow().items().is_empty());
    assert_eq!(view.borrow().phase(), Phase::Loading);

    // 重新挂载后正常加载
    store.view.borrow_mut().take();
    view.borrow_mut().remount();
    assert!(load_shared(&view, &store).await);
    assert_eq!(view.borrow().items().len(), 7);
}

#[tokio::test]
async fn no_refetch_after_ready() {
    let store = seven_posts();
    let mut view = loaded_blog_view(&store).await;

    store.insert(BlogAdapter::COLLECTION, RawDocument::new("8").with("title", "Late post"));
    assert!(!view.load(&store).await);
    assert_eq!(view.items().len(), 7);
}
