use listing_common::{Facet, OTHER};
use serde::{Deserialize, Serialize};

/// 可选行业
pub const INDUSTRIES: &[&str] = &[
    "Technology",
    "Banking",
    "Insurance",
    "Healthcare",
    "Retail",
    "Manufacturing",
    "Education",
    "Government",
    "Energy",
    "Telecommunications",
    OTHER,
];

/// 可选主题
pub const TOPICS: &[&str] = &[
    "Digital Transformation",
    "Cloud",
    "Data & Analytics",
    "Cybersecurity",
    "Artificial Intelligence",
    "Strategy",
    OTHER,
];

/// 可选服务
pub const SERVICES: &[&str] = &[
    "Consulting",
    "Software Development",
    "Managed Services",
    "Staff Augmentation",
    "Training",
    OTHER,
];

/// 职位类型
pub const EMPLOYMENT_TYPES: &[&str] = &["Full-time", "Part-time", "Contract", "Internship"];

pub fn choices(facet: Facet) -> &'static [&'static str] {
    match facet {
        Facet::Industry => INDUSTRIES,
        Facet::Topic => TOPICS,
        Facet::Service => SERVICES,
    }
}

/// 后台管理的内容类型
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    Blog,
    SuccessStory,
    Career,
    Guide,
}

impl ContentKind {
    /// 所在集合
    pub fn collection(self) -> &'static str {
        match self {
            ContentKind::Blog => "blogs",
            ContentKind::SuccessStory => "successStories",
            ContentKind::Career => "careers",
            ContentKind::Guide => "guides",
        }
    }
}
