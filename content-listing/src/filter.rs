use listing_common::{Facet, ResolvedFacets};
use serde::Serialize;

use crate::adapter::ContentAdapter;
use crate::search::{matches_any, normalize_term};

/// 已选中的筛选值（按勾选顺序），以及是否已经"应用"
///
/// 勾选只改变选中集合；只有 `apply` 会让筛选生效。所有属性的选中值都被清空时，
/// `applied` 自动回到 false。
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub industries: Vec<String>,
    pub topics: Vec<String>,
    pub services: Vec<String>,
    pub applied: bool,
}

/// 已选条件标签
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Chip {
    pub facet: Facet,
    pub value: String,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Industry => &self.industries,
            Facet::Topic => &self.topics,
            Facet::Service => &self.services,
        }
    }

    fn selected_mut(&mut self, facet: Facet) -> &mut Vec<String> {
        match facet {
            Facet::Industry => &mut self.industries,
            Facet::Topic => &mut self.topics,
            Facet::Service => &mut self.services,
        }
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.selected(facet).iter().any(|v| v == value)
    }

    /// 是否有任何选中值
    pub fn has_any(&self) -> bool {
        Facet::ALL.iter().any(|&facet| !self.selected(facet).is_empty())
    }

    /// "应用"按钮是否可用
    pub fn can_apply(&self) -> bool {
        self.has_any()
    }

    /// 切换勾选状态，返回切换后是否选中
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        if self.is_selected(facet, value) {
            self.remove(facet, value);
            false
        } else {
            self.selected_mut(facet).push(value.to_string());
            true
        }
    }

    /// 移除一个选中值（清除单个标签）
    pub fn remove(&mut self, facet: Facet, value: &str) {
        self.selected_mut(facet).retain(|v| v != value);
        if !self.has_any() {
            self.applied = false;
        }
    }

    /// 应用当前选择；没有任何选中值时不生效，返回是否已应用
    pub fn apply(&mut self) -> bool {
        if self.has_any() {
            self.applied = true;
        }
        self.applied
    }

    /// 清空全部选择
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 已选条件标签，按属性顺序排列
    pub fn chips(&self) -> Vec<Chip> {
        Facet::ALL
            .iter()
            .flat_map(|&facet| {
                self.selected(facet).iter().map(move |value| Chip {
                    facet,
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// 条目是否满足筛选：未应用时全部通过；属性的选中集合为空时该属性不限制
    pub fn accepts(&self, facets: &ResolvedFacets) -> bool {
        if !self.applied {
            return true;
        }
        Facet::ALL.iter().all(|&facet| {
            let selected = self.selected(facet);
            selected.is_empty() || selected.iter().any(|v| v == facets.get(facet))
        })
    }
}

/// 搜索并筛选条目，结果保持输入顺序
pub fn apply<'a, A: ContentAdapter>(
    adapter: &A,
    items: &'a [A::Item],
    search_term: &str,
    selection: &FilterSelection,
) -> Vec<&'a A::Item> {
    let needle = normalize_term(search_term);

    items
        .iter()
        .filter(|item| matches_any(&adapter.searchable_fields(item), &needle))
        .filter(|item| selection.accepts(adapter.facets(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_never_applies() {
        let mut selection = FilterSelection::new();
        assert!(selection.toggle(Facet::Industry, "Banking"));
        assert!(!selection.applied);
        assert!(selection.can_apply());
        assert!(selection.apply());
    }

    #[test]
    fn apply_without_selection_is_a_no_op() {
        let mut selection = FilterSelection::new();
        assert!(!selection.can_apply());
        assert!(!selection.apply());
    }

    #[test]
    fn clearing_last_selection_unapplies() {
        let mut selection = FilterSelection::new();
        selection.toggle(Facet::Topic, "Cloud");
        selection.toggle(Facet::Service, "Training");
        selection.apply();

        selection.remove(Facet::Topic, "Cloud");
        assert!(selection.applied);

        assert!(!selection.toggle(Facet::Service, "Training"));
        assert!(!selection.applied);
        assert!(selection.chips().is_empty());
    }

    #[test]
    fn empty_facet_is_a_wildcard() {
        let mut selection = FilterSelection::new();
        selection.toggle(Facet::Industry, "Banking");
        selection.apply();

        let banking_cloud = ResolvedFacets {
            industry: "Banking".into(),
            topic: "Cloud".into(),
            service: String::new(),
        };
        let retail = ResolvedFacets {
            industry: "Retail".into(),
            ..Default::default()
        };
        let missing = ResolvedFacets::default();

        assert!(selection.accepts(&banking_cloud));
        assert!(!selection.accepts(&retail));
        assert!(!selection.accepts(&missing));
    }

    #[test]
    fn chips_follow_facet_then_click_order() {
        let mut selection = FilterSelection::new();
        selection.toggle(Facet::Service, "Training");
        selection.toggle(Facet::Industry, "Retail");
        selection.toggle(Facet::Industry, "Banking");

        let values: Vec<String> = selection.chips().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["Retail", "Banking", "Training"]);
    }
}
