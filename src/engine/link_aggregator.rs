// ==========================================
// 运维工单报表系统 - 关联聚合引擎
// ==========================================
// 职责: 父子关联的单遍聚合(enlaces 计数 + 按父工单分组)
// 红线: 大批次导入的内环成本点, 计数必须单遍构建, 禁止逐行查询
// ==========================================

use crate::domain::link::{LinkGroup, TicketLink};
use std::collections::HashMap;

/// 关联聚合器
///
/// 一次遍历全部关联构建 request_id → 被引用次数 映射,
/// 派生流水线按行 O(1) 查询。
pub struct LinkAggregator {
    counts: HashMap<String, i64>,
}

impl LinkAggregator {
    /// 单遍构建计数映射(计子侧: 该工单被引用为依赖的次数)
    pub fn from_links(links: &[TicketLink]) -> Self {
        let mut counts: HashMap<String, i64> = HashMap::with_capacity(links.len());
        for link in links {
            *counts.entry(link.child_request_id.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// 查询某工单的被引用次数(无关联 → 0, 永不缺失)
    pub fn linked_count(&self, request_id: &str) -> i64 {
        self.counts.get(request_id).copied().unwrap_or(0)
    }
}

/// 按父工单号聚合全部关联
///
/// 组顺序取首次出现顺序; 组内保持输入顺序。
pub fn group_by_linked_id(links: &[TicketLink]) -> Vec<LinkGroup> {
    let mut groups: Vec<LinkGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for link in links {
        match index.get(&link.parent_request_id) {
            Some(&i) => groups[i].relationships.push(link.clone()),
            None => {
                index.insert(link.parent_request_id.clone(), groups.len());
                groups.push(LinkGroup {
                    linked_id: link.parent_request_id.clone(),
                    relationships: vec![link.clone()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(parent: &str, child: &str) -> TicketLink {
        TicketLink {
            parent_request_id: parent.to_string(),
            child_request_id: child.to_string(),
            parent_hyperlink: None,
            child_hyperlink: None,
        }
    }

    #[test]
    fn test_linked_count_single_pass() {
        let links = vec![
            link("1001", "2001"),
            link("1002", "2001"),
            link("1003", "2002"),
        ];
        let agg = LinkAggregator::from_links(&links);

        assert_eq!(agg.linked_count("2001"), 2);
        assert_eq!(agg.linked_count("2002"), 1);
    }

    #[test]
    fn test_linked_count_zero_for_unlinked() {
        let agg = LinkAggregator::from_links(&[link("1001", "2001")]);
        // 无关联工单 → 0, 不是缺失
        assert_eq!(agg.linked_count("9999"), 0);
        assert_eq!(agg.linked_count("1001"), 0); // 父侧不计数
    }

    #[test]
    fn test_group_by_linked_id_preserves_in_group_order() {
        let links = vec![
            link("B", "1"),
            link("A", "2"),
            link("B", "3"),
            link("B", "4"),
        ];
        let groups = group_by_linked_id(&links);

        assert_eq!(groups.len(), 2);
        let b = groups.iter().find(|g| g.linked_id == "B").expect("B group");
        let children: Vec<&str> = b
            .relationships
            .iter()
            .map(|l| l.child_request_id.as_str())
            .collect();
        assert_eq!(children, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_group_by_linked_id_empty() {
        assert!(group_by_linked_id(&[]).is_empty());
    }
}
