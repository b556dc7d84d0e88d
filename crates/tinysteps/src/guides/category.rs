//! Nested guide categories.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<CategoryId>,
}

/// Hierarchical name such as `Health > Sleep`.
///
/// Ancestors missing from `all` end the chain, and a parent cycle stops at
/// the first repeated category.
pub fn full_name(category: &Category, all: &[Category]) -> String {
    let by_id: HashMap<CategoryId, &Category> = all.iter().map(|c| (c.id, c)).collect();
    let mut names = vec![category.name.as_str()];
    let mut seen = HashSet::from([category.id]);
    let mut cursor = category.parent;
    while let Some(parent_id) = cursor {
        if !seen.insert(parent_id) {
            break;
        }
        let Some(parent) = by_id.get(&parent_id) else {
            break;
        };
        names.push(parent.name.as_str());
        cursor = parent.parent;
    }
    names.reverse();
    names.join(" > ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub full_name: String,
    pub children: Vec<CategoryNode>,
}

/// Roots are categories without a (known) parent; siblings keep the input order.
pub fn category_tree(all: &[Category]) -> Vec<CategoryNode> {
    let known: HashSet<CategoryId> = all.iter().map(|c| c.id).collect();
    let mut children: HashMap<CategoryId, Vec<&Category>> = HashMap::new();
    let mut roots = Vec::new();
    for category in all {
        match category.parent.filter(|parent| known.contains(parent)) {
            Some(parent) => children.entry(parent).or_default().push(category),
            None => roots.push(category),
        }
    }

    fn build(
        category: &Category,
        all: &[Category],
        children: &HashMap<CategoryId, Vec<&Category>>,
        path: &mut HashSet<CategoryId>,
    ) -> CategoryNode {
        path.insert(category.id);
        let mut nested = Vec::new();
        for child in children.get(&category.id).into_iter().flatten() {
            if !path.contains(&child.id) {
                nested.push(build(child, all, children, path));
            }
        }
        path.remove(&category.id);
        CategoryNode {
            category: category.clone(),
            full_name: full_name(category, all),
            children: nested,
        }
    }

    roots
        .into_iter()
        .map(|root| build(root, all, &children, &mut HashSet::new()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: Category,
    pub guide_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, name: &str, parent: Option<u64>) -> Category {
        Category {
            id: CategoryId(id),
            name: name.to_string(),
            description: None,
            parent: parent.map(CategoryId),
        }
    }

    #[test]
    fn full_name_walks_ancestors() {
        let all = vec![
            category(1, "Health", None),
            category(2, "Sleep", Some(1)),
            category(3, "Naps", Some(2)),
        ];
        assert_eq!(full_name(&all[2], &all), "Health > Sleep > Naps");
        assert_eq!(full_name(&all[0], &all), "Health");
    }

    #[test]
    fn full_name_survives_cycles() {
        let all = vec![category(1, "A", Some(2)), category(2, "B", Some(1))];
        assert_eq!(full_name(&all[0], &all), "B > A");
    }

    #[test]
    fn tree_nests_children_under_roots() {
        let all = vec![
            category(1, "Health", None),
            category(2, "Sleep", Some(1)),
            category(3, "Recipes", None),
            category(4, "Orphan", Some(99)),
        ];
        let tree = category_tree(&all);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].full_name, "Health > Sleep");
        assert_eq!(tree[2].category.name, "Orphan");
    }
}
