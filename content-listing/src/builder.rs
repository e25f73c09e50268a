use listing_common::{Facet, ResolvedFacets};
use serde::Serialize;
use std::collections::HashSet;

/// 筛选选项 - 每个属性的可选值，按首次出现的顺序排列（最新文档优先）
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FacetOptionSet {
    pub industries: Vec<String>,
    pub topics: Vec<String>,
    pub services: Vec<String>,
}

impl FacetOptionSet {
    pub fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Industry => &self.industries,
            Facet::Topic => &self.topics,
            Facet::Service => &self.services,
        }
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).iter().any(|v| v == value)
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty() && self.topics.is_empty() && self.services.is_empty()
    }
}

/// 筛选选项构建器
#[derive(Debug, Default)]
pub struct FacetBuilder {
    options: FacetOptionSet,
    seen: [HashSet<String>; 3],
}

impl FacetBuilder {
    /// 创建新的筛选选项构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一个条目的已解析属性，空值不会成为选项
    pub fn add(&mut self, facets: &ResolvedFacets) {
        for (slot, facet) in Facet::ALL.into_iter().enumerate() {
            let value = facets.get(facet);
            if value.is_empty() || !self.seen[slot].insert(value.to_string()) {
                continue;
            }
            match facet {
                Facet::Industry => self.options.industries.push(value.to_string()),
                Facet::Topic => self.options.topics.push(value.to_string()),
                Facet::Service => self.options.services.push(value.to_string()),
            }
        }
    }

    /// 构建筛选选项
    pub fn build(self) -> FacetOptionSet {
        self.options
    }
}

/// 一次遍历得到全部筛选选项
pub fn derive_options<'a>(facets: impl IntoIterator<Item = &'a ResolvedFacets>) -> FacetOptionSet {
    let mut builder = FacetBuilder::new();
    for item in facets {
        builder.add(item);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facets(industry: &str, topic: &str, service: &str) -> ResolvedFacets {
        ResolvedFacets {
            industry: industry.into(),
            topic: topic.into(),
            service: service.into(),
        }
    }

    #[test]
    fn options_keep_first_seen_order() {
        let items = [
            facets("Technology", "Cloud", ""),
            facets("Banking", "Cloud", "Consulting"),
            facets("Technology", "AI", "Consulting"),
            facets("Robotics", "", ""),
        ];

        let options = derive_options(&items);
        assert_eq!(options.industries, vec!["Technology", "Banking", "Robotics"]);
        assert_eq!(options.topics, vec!["Cloud", "AI"]);
        assert_eq!(options.services, vec!["Consulting"]);
    }

    #[test]
    fn empty_values_never_become_options() {
        let options = derive_options(&[facets("", "", "")]);
        assert!(options.is_empty());
        assert!(!options.contains(Facet::Industry, ""));
    }
}
