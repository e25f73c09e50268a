use listing_common::{Facet, FieldValue, OTHER};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::catalog::{ContentKind, EMPLOYMENT_TYPES};
use crate::validation::ValidationErrors;

/// 标签数量上限
const MAX_TAGS: usize = 10;

/// 后台表单草稿 - 校验通过后才会写入文档库
pub trait Draft {
    const KIND: ContentKind;

    fn validate(&self) -> Result<(), ValidationErrors>;

    /// 写入的字段；`createdAt` 由文档库填写，这里永远不包含
    fn to_fields(&self) -> BTreeMap<String, FieldValue>;
}

/// 字段集合的构建辅助
#[derive(Default)]
struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    fn text(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), FieldValue::Text(value.trim().to_string()));
        self
    }

    fn optional_text(self, name: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    fn list(mut self, name: &str, values: &[String]) -> Self {
        let values = values
            .iter()
            .map(|v| FieldValue::Text(v.trim().to_string()))
            .collect();
        self.0.insert(name.to_string(), FieldValue::Array(values));
        self
    }

    fn value(mut self, name: &str, value: FieldValue) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    fn build(self) -> BTreeMap<String, FieldValue> {
        self.0
    }
}

/// 三个筛选属性的表单字段
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FacetFields {
    pub industry: String,
    #[serde(default)]
    pub custom_industry: Option<String>,
    pub topic: String,
    #[serde(default)]
    pub custom_topic: Option<String>,
    pub service: String,
    #[serde(default)]
    pub custom_service: Option<String>,
}

impl FacetFields {
    fn pair(&self, facet: Facet) -> (&str, Option<&str>) {
        match facet {
            Facet::Industry => (self.industry.as_str(), self.custom_industry.as_deref()),
            Facet::Topic => (self.topic.as_str(), self.custom_topic.as_deref()),
            Facet::Service => (self.service.as_str(), self.custom_service.as_deref()),
        }
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        for facet in Facet::ALL {
            let (value, custom) = self.pair(facet);
            errors.facet(facet, value, custom);
        }
    }

    /// 自定义标签只在选择 "Other" 时写入
    fn write(&self, mut fields: Fields) -> Fields {
        for facet in Facet::ALL {
            let (value, custom) = self.pair(facet);
            fields = fields.text(facet.field(), value);
            if value.trim() == OTHER {
                fields = fields.optional_text(facet.custom_field(), custom);
            }
        }
        fields
    }
}

/// 去除空白和重复的标签
fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !cleaned.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}

fn validate_tags(errors: &mut ValidationErrors, tags: &[String]) {
    if clean_tags(tags).len() > MAX_TAGS {
        errors.add("tags", format!("最多 {} 个标签", MAX_TAGS));
    }
}

// 标签为空时不写入字段，列表页会使用筛选属性代替
fn write_tags(fields: Fields, tags: &[String]) -> Fields {
    let tags = clean_tags(tags);
    if tags.is_empty() {
        fields
    } else {
        fields.list("tags", &tags)
    }
}

/// 博客文章
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(flatten)]
    pub facets: FacetFields,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Draft for BlogDraft {
    const KIND: ContentKind = ContentKind::Blog;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.require("description", &self.description);
        errors.require("content", &self.content);
        errors.optional_link("thumbnailUrl", self.thumbnail_url.as_deref());
        self.facets.validate(&mut errors);
        validate_tags(&mut errors, &self.tags);
        errors.into_result()
    }

    fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        let fields = Fields::default()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("content", &self.content)
            .optional_text("authorName", self.author_name.as_deref())
            .optional_text("thumbnailUrl", self.thumbnail_url.as_deref());
        let fields = self.facets.write(fields);
        write_tags(fields, &self.tags).build()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct MetricDraft {
    pub label: String,
    pub percentage: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HelpDraft {
    pub label: String,
    pub value: String,
}

/// 成功案例
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuccessStoryDraft {
    pub title: String,
    pub company: String,
    pub feedback: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(flatten)]
    pub facets: FacetFields,
    #[serde(default)]
    pub numbers: Vec<MetricDraft>,
    #[serde(default)]
    pub key_challenges: Vec<String>,
    #[serde(default)]
    pub how_we_helped: Vec<HelpDraft>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Draft for SuccessStoryDraft {
    const KIND: ContentKind = ContentKind::SuccessStory;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.require("company", &self.company);
        errors.require("feedback", &self.feedback);
        errors.optional_link("thumbnailUrl", self.thumbnail_url.as_deref());
        self.facets.validate(&mut errors);

        for (i, metric) in self.numbers.iter().enumerate() {
            errors.require(&format!("numbers[{}].label", i), &metric.label);
            if !metric.percentage.is_finite() || !(0.0..=100.0).contains(&metric.percentage) {
                errors.add(format!("numbers[{}].percentage", i), "必须在 0 到 100 之间");
            }
        }

        if self.key_challenges.is_empty() {
            errors.add("keyChallenges", "至少填写一项");
        }
        errors.non_empty_entries("keyChallenges", &self.key_challenges);

        for (i, help) in self.how_we_helped.iter().enumerate() {
            errors.require(&format!("howWeHelped[{}].label", i), &help.label);
            errors.require(&format!("howWeHelped[{}].value", i), &help.value);
        }

        validate_tags(&mut errors, &self.tags);
        errors.into_result()
    }

    fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        let numbers = self
            .numbers
            .iter()
            .map(|m| {
                FieldValue::Map(BTreeMap::from([
                    ("label".to_string(), FieldValue::Text(m.label.trim().to_string())),
                    ("percentage".to_string(), FieldValue::Double(m.percentage)),
                ]))
            })
            .collect();

        let how_we_helped = self
            .how_we_helped
            .iter()
            .map(|h| {
                FieldValue::Map(BTreeMap::from([
                    ("label".to_string(), FieldValue::Text(h.label.trim().to_string())),
                    ("value".to_string(), FieldValue::Text(h.value.trim().to_string())),
                ]))
            })
            .collect();

        let fields = Fields::default()
            .text("title", &self.title)
            .text("company", &self.company)
            .text("feedback", &self.feedback)
            .optional_text("thumbnailUrl", self.thumbnail_url.as_deref())
            .value("numbers", FieldValue::Array(numbers))
            .list("keyChallenges", &self.key_challenges)
            .value("howWeHelped", FieldValue::Array(how_we_helped));
        let fields = self.facets.write(fields);
        write_tags(fields, &self.tags).build()
    }
}

/// 招聘职位
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CareerDraft {
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub contact_email: String,
    #[serde(default)]
    pub apply_url: Option<String>,
}

impl Draft for CareerDraft {
    const KIND: ContentKind = ContentKind::Career;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.require("location", &self.location);
        errors.require("description", &self.description);
        if !EMPLOYMENT_TYPES.contains(&self.employment_type.trim()) {
            errors.add("employmentType", format!("不是有效选项: {}", self.employment_type));
        }
        errors.non_empty_entries("requirements", &self.requirements);
        errors.email("contactEmail", &self.contact_email);
        errors.optional_link("applyUrl", self.apply_url.as_deref());
        errors.into_result()
    }

    fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        Fields::default()
            .text("title", &self.title)
            .text("location", &self.location)
            .text("employmentType", &self.employment_type)
            .text("description", &self.description)
            .list("requirements", &self.requirements)
            .text("contactEmail", &self.contact_email)
            .optional_text("applyUrl", self.apply_url.as_deref())
            .build()
    }
}

/// 可下载指南的元数据
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GuideDraft {
    pub title: String,
    pub description: String,
    pub file_url: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

impl Draft for GuideDraft {
    const KIND: ContentKind = ContentKind::Guide;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.require("description", &self.description);
        if self.file_url.trim().is_empty() {
            errors.add("fileUrl", "不能为空");
        } else {
            errors.link("fileUrl", &self.file_url);
        }
        errors.optional_link("coverImageUrl", self.cover_image_url.as_deref());
        errors.into_result()
    }

    fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        Fields::default()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("fileUrl", &self.file_url)
            .optional_text("coverImageUrl", self.cover_image_url.as_deref())
            .build()
    }
}
