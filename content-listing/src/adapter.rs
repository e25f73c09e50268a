use chrono::{DateTime, Utc};
use listing_common::{RawDocument, ResolvedFacets};

use crate::config::ListingConfig;
use crate::models::{days_since, read_minutes, summarize, BlogPost, Card, HelpItem, Metric, SuccessStory};
use crate::search::escape_html;

/// 摘要最大字符数
const SUMMARY_CHARS: usize = 160;

/// 内容适配器 - 让同一套列表逻辑服务不同形态的内容
pub trait ContentAdapter {
    /// 内存中的条目类型
    type Item: Clone;

    /// 文档所在的集合
    fn collection(&self) -> &'static str;

    /// 将原始文档转为条目，在此一次性解析筛选属性并补齐缺失字段
    fn materialize(&self, document: &RawDocument) -> Self::Item;

    fn facets<'a>(&self, item: &'a Self::Item) -> &'a ResolvedFacets;

    /// 参与搜索的文本字段
    fn searchable_fields<'a>(&self, item: &'a Self::Item) -> Vec<&'a str>;

    /// 渲染卡片
    fn card(&self, item: &Self::Item, now: DateTime<Utc>) -> Card;
}

/// 标签缺失时用已解析的筛选属性代替，保证每次加载结果一致
fn tags_or_facets(document: &RawDocument, facets: &ResolvedFacets) -> Vec<String> {
    document.string_list("tags").unwrap_or_else(|| facets.values())
}

fn untitled(document: &RawDocument) -> String {
    document.text_or("title", "Untitled")
}

/// 博客列表
#[derive(Debug, Clone)]
pub struct BlogAdapter {
    placeholder: String,
}

impl BlogAdapter {
    pub const COLLECTION: &'static str = "blogs";

    pub fn new(config: &ListingConfig) -> Self {
        Self {
            placeholder: config.blog_placeholder.clone(),
        }
    }
}

impl Default for BlogAdapter {
    fn default() -> Self {
        Self::new(&ListingConfig::default())
    }
}

impl ContentAdapter for BlogAdapter {
    type Item = BlogPost;

    fn collection(&self) -> &'static str {
        Self::COLLECTION
    }

    fn materialize(&self, document: &RawDocument) -> BlogPost {
        let facets = ResolvedFacets::from_document(document);

        BlogPost {
            id: document.id.clone(),
            title: untitled(document),
            created_at: document.created_at(),
            tags: tags_or_facets(document, &facets),
            facets,
            description: document.text_or("description", ""),
            content: document.text_or("content", ""),
            author_name: document.text_or("authorName", "Anonymous"),
            thumbnail_url: document.text_or("thumbnailUrl", &self.placeholder),
        }
    }

    fn facets<'a>(&self, item: &'a BlogPost) -> &'a ResolvedFacets {
        &item.facets
    }

    fn searchable_fields<'a>(&self, item: &'a BlogPost) -> Vec<&'a str> {
        vec![item.title.as_str(), item.description.as_str(), item.content.as_str()]
    }

    fn card(&self, item: &BlogPost, now: DateTime<Utc>) -> Card {
        let summary_source = if item.description.is_empty() {
            &item.content
        } else {
            &item.description
        };

        Card {
            id: item.id.clone(),
            href: format!("/blog/{}", item.id),
            title: item.title.clone(),
            title_html: escape_html(&item.title),
            summary: summarize(summary_source, SUMMARY_CHARS),
            image_url: item.thumbnail_url.clone(),
            tags: item.tags.clone(),
            industry: item.facets.industry.clone(),
            topic: item.facets.topic.clone(),
            service: item.facets.service.clone(),
            byline: item.author_name.clone(),
            read_minutes: read_minutes([item.content.as_str()]),
            days_ago: days_since(item.created_at, now),
        }
    }
}

/// 成功案例列表
#[derive(Debug, Clone)]
pub struct SuccessStoryAdapter {
    placeholder: String,
}

impl SuccessStoryAdapter {
    pub const COLLECTION: &'static str = "successStories";

    pub fn new(config: &ListingConfig) -> Self {
        Self {
            placeholder: config.story_placeholder.clone(),
        }
    }
}

impl Default for SuccessStoryAdapter {
    fn default() -> Self {
        Self::new(&ListingConfig::default())
    }
}

impl ContentAdapter for SuccessStoryAdapter {
    type Item = SuccessStory;

    fn collection(&self) -> &'static str {
        Self::COLLECTION
    }

    fn materialize(&self, document: &RawDocument) -> SuccessStory {
        let facets = ResolvedFacets::from_document(document);

        let numbers = document
            .map_list("numbers")
            .into_iter()
            .filter_map(|entry| {
                let label = entry.get("label")?.as_text()?.trim();
                if label.is_empty() {
                    return None;
                }
                Some(Metric {
                    label: label.to_string(),
                    percentage: entry
                        .get("percentage")
                        .and_then(|v| v.as_f64())
                        .unwrap_or_default(),
                })
            })
            .collect();

        let how_we_helped = document
            .map_list("howWeHelped")
            .into_iter()
            .filter_map(|entry| {
                let label = entry.get("label").and_then(|v| v.as_text()).unwrap_or("").trim();
                let value = entry.get("value").and_then(|v| v.as_text()).unwrap_or("").trim();
                if label.is_empty() && value.is_empty() {
                    return None;
                }
                Some(HelpItem {
                    label: label.to_string(),
                    value: value.to_string(),
                })
            })
            .collect();

        SuccessStory {
            id: document.id.clone(),
            title: untitled(document),
            created_at: document.created_at(),
            tags: tags_or_facets(document, &facets),
            facets,
            company: document.text_or("company", ""),
            feedback: document.text_or("feedback", ""),
            numbers,
            key_challenges: document.string_list("keyChallenges").unwrap_or_default(),
            how_we_helped,
            thumbnail_url: document.text_or("thumbnailUrl", &self.placeholder),
        }
    }

    fn facets<'a>(&self, item: &'a SuccessStory) -> &'a ResolvedFacets {
        &item.facets
    }

    fn searchable_fields<'a>(&self, item: &'a SuccessStory) -> Vec<&'a str> {
        let mut fields = vec![item.title.as_str(), item.feedback.as_str()];
        fields.extend(item.key_challenges.iter().map(String::as_str));
        for help in &item.how_we_helped {
            fields.push(help.label.as_str());
            fields.push(help.value.as_str());
        }
        fields
    }

    fn card(&self, item: &SuccessStory, now: DateTime<Utc>) -> Card {
        let summary_source = if item.feedback.is_empty() {
            item.key_challenges.first().map(String::as_str).unwrap_or("")
        } else {
            item.feedback.as_str()
        };

        let mut texts = vec![item.feedback.as_str()];
        texts.extend(item.key_challenges.iter().map(String::as_str));

        Card {
            id: item.id.clone(),
            href: format!("/success-story/{}", item.id),
            title: item.title.clone(),
            title_html: escape_html(&item.title),
            summary: summarize(summary_source, SUMMARY_CHARS),
            image_url: item.thumbnail_url.clone(),
            tags: item.tags.clone(),
            industry: item.facets.industry.clone(),
            topic: item.facets.topic.clone(),
            service: item.facets.service.clone(),
            byline: item.company.clone(),
            read_minutes: read_minutes(texts),
            days_ago: days_since(item.created_at, now),
        }
    }
}
