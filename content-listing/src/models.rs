use chrono::{DateTime, Utc};
use listing_common::ResolvedFacets;
use serde::Serialize;

/// 博客文章 - 列表页内存中的形态，筛选属性已解析
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub facets: ResolvedFacets,
    pub tags: Vec<String>,
    pub description: String,
    pub content: String,
    pub author_name: String,
    pub thumbnail_url: String,
}

/// 成功案例中的数据指标
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Metric {
    pub label: String,
    pub percentage: f64,
}

/// 成功案例中"我们如何帮助"的条目
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HelpItem {
    pub label: String,
    pub value: String,
}

/// 成功案例
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuccessStory {
    pub id: String,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub facets: ResolvedFacets,
    pub tags: Vec<String>,
    pub company: String,
    pub feedback: String,
    pub numbers: Vec<Metric>,
    pub key_challenges: Vec<String>,
    pub how_we_helped: Vec<HelpItem>,
    pub thumbnail_url: String,
}

/// 列表卡片 - 渲染一条结果所需的全部数据
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    /// 详情页路径
    pub href: String,
    pub title: String,
    /// 转义后的标题，当前搜索词以 <mark> 标出
    pub title_html: String,
    pub summary: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub industry: String,
    pub topic: String,
    pub service: String,
    /// 作者或客户公司
    pub byline: String,
    pub read_minutes: u32,
    /// 距创建的天数，创建时间缺失时为空
    pub days_ago: Option<i64>,
}

/// 阅读速度（词/分钟）
const WORDS_PER_MINUTE: usize = 200;

/// 估算阅读时长，至少一分钟
pub fn read_minutes<'a>(texts: impl IntoIterator<Item = &'a str>) -> u32 {
    let words: usize = texts.into_iter().map(|t| t.split_whitespace().count()).sum();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// 距创建的天数，未来时间按 0 计
pub fn days_since(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    created_at.map(|created| (now - created).num_days().max(0))
}

/// 截取摘要，按字符截断并补省略号
pub fn summarize(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut summary: String = text.chars().take(max_chars).collect();
    summary.push_str("...");
    summary
}
