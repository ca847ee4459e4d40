use std::collections::HashMap;

use ov_core::{PageNode, PageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

// Built with explicit stacks; a long parent chain must not exhaust the call stack.
pub fn build_page_tree(records: Vec<PageRecord>) -> Vec<PageNode> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut parents = resolve_parents(&records);
    break_cycles(&mut parents);

    let mut roots = Vec::new();
    let mut children_of = vec![Vec::new(); records.len()];
    for (node, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children_of[*parent].push(node),
            None => roots.push(node),
        }
    }

    sort_siblings(&mut roots, &records);
    for group in &mut children_of {
        if group.len() > 1 {
            sort_siblings(group, &records);
        }
    }

    let mut levels = vec![0usize; records.len()];
    let mut visit_order = Vec::with_capacity(records.len());
    let mut pending = roots.clone();
    while let Some(node) = pending.pop() {
        visit_order.push(node);
        for &child in &children_of[node] {
            levels[child] = levels[node] + 1;
            pending.push(child);
        }
    }

    // Pre-order puts every descendant after its ancestor, so walking it in
    // reverse finishes children before their parent.
    let mut records = records.into_iter().map(Some).collect::<Vec<_>>();
    let mut built: Vec<Option<PageNode>> = (0..records.len()).map(|_| None).collect();
    for &node in visit_order.iter().rev() {
        let Some(record) = records[node].take() else {
            continue;
        };
        let children = children_of[node]
            .iter()
            .filter_map(|child| built[*child].take())
            .collect();
        built[node] = Some(PageNode {
            id: record.id,
            title: record.title,
            html_content: record.html_content,
            order: record.order,
            level: levels[node],
            children,
        });
    }

    roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}

fn resolve_parents(records: &[PageRecord]) -> Vec<Option<usize>> {
    let mut index_by_id: HashMap<&str, usize> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        index_by_id.entry(record.id.as_str()).or_insert(position);
    }

    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            if record.parent_id.is_empty() || record.parent_id == record.id {
                return None;
            }
            index_by_id
                .get(record.parent_id.as_str())
                .copied()
                .filter(|parent| *parent != position)
        })
        .collect()
}

fn break_cycles(parents: &mut [Option<usize>]) {
    let mut state = vec![Visit::New; parents.len()];
    for start in 0..parents.len() {
        let mut path = Vec::new();
        let mut current = start;
        loop {
            match state[current] {
                Visit::Done => break,
                Visit::Active => {
                    if let Some(&last) = path.last() {
                        parents[last] = None;
                    }
                    break;
                }
                Visit::New => {
                    state[current] = Visit::Active;
                    path.push(current);
                    match parents[current] {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
            }
        }
        for node in path {
            state[node] = Visit::Done;
        }
    }
}

fn sort_siblings(group: &mut [usize], records: &[PageRecord]) {
    group.sort_by(|left, right| {
        let left = &records[*left];
        let right = &records[*right];
        left.order
            .cmp(&right.order)
            .then_with(|| left.index.cmp(&right.index))
    });
}

#[cfg(test)]
mod hierarchy_tests {
    use super::*;

    fn record(id: &str, parent_id: &str, order: i64, index: usize) -> PageRecord {
        PageRecord {
            id: id.to_string(),
            title: id.to_uppercase(),
            html_content: String::new(),
            parent_id: parent_id.to_string(),
            order,
            index,
        }
    }

    fn ids(nodes: &[PageNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(build_page_tree(Vec::new()).is_empty());
    }

    #[test]
    fn nests_children_and_assigns_levels() {
        let tree = build_page_tree(vec![
            record("root", "", 0, 0),
            record("child", "root", 0, 1),
            record("grandchild", "child", 0, 2),
            record("other", "", 1, 3),
        ]);
        assert_eq!(ids(&tree), vec!["root", "other"]);
        assert_eq!(tree[0].level, 0);
        assert_eq!(tree[0].children[0].id, "child");
        assert_eq!(tree[0].children[0].level, 1);
        assert_eq!(tree[0].children[0].children[0].level, 2);
        assert!(tree[0].children[0].children[0].children.is_empty());
        assert_eq!(tree.iter().map(PageNode::count).sum::<usize>(), 4);
    }

    #[test]
    fn sorts_siblings_by_order_then_index() {
        let tree = build_page_tree(vec![
            record("c", "", 3, 0),
            record("a", "", 1, 1),
            record("b", "", 2, 2),
        ]);
        assert_eq!(tree.iter().map(|node| node.order).collect::<Vec<_>>(), vec![1, 2, 3]);

        let tree = build_page_tree(vec![
            record("p", "", 0, 0),
            record("x", "p", 5, 1),
            record("y", "p", 5, 2),
            record("z", "p", 5, 3),
        ]);
        assert_eq!(ids(&tree[0].children), vec!["x", "y", "z"]);
    }

    #[test]
    fn self_parent_and_dangling_parent_become_roots() {
        let tree = build_page_tree(vec![
            record("self", "self", 0, 0),
            record("orphan", "missing", 1, 1),
        ]);
        assert_eq!(ids(&tree), vec!["self", "orphan"]);
        assert!(tree.iter().all(|node| node.level == 0));
    }

    #[test]
    fn child_listed_before_parent_is_still_attached() {
        let tree = build_page_tree(vec![record("kid", "mom", 0, 0), record("mom", "", 0, 1)]);
        assert_eq!(ids(&tree), vec!["mom"]);
        assert_eq!(ids(&tree[0].children), vec!["kid"]);
    }

    #[test]
    fn parent_cycle_is_broken_without_losing_nodes() {
        let tree = build_page_tree(vec![
            record("a", "b", 0, 0),
            record("b", "a", 0, 1),
            record("c", "c", 0, 2),
        ]);
        let total = tree.iter().map(PageNode::count).sum::<usize>();
        assert_eq!(total, 3);
        assert_eq!(ids(&tree), vec!["b", "c"]);
        assert_eq!(ids(&tree[0].children), vec!["a"]);
    }

    #[test]
    fn duplicate_ids_attach_to_first_occurrence() {
        let tree = build_page_tree(vec![
            record("dup", "", 0, 0),
            record("dup", "", 1, 1),
            record("kid", "dup", 0, 2),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(ids(&tree[0].children), vec!["kid"]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn long_parent_chain_is_assembled() {
        let depth = 2_000;
        let mut records = vec![record("n0", "", 0, 0)];
        for position in 1..depth {
            records.push(record(
                &format!("n{}", position),
                &format!("n{}", position - 1),
                0,
                position,
            ));
        }
        let tree = build_page_tree(records);
        assert_eq!(tree.len(), 1);
        let mut node = &tree[0];
        while let Some(child) = node.children.first() {
            node = child;
        }
        assert_eq!(node.level, depth - 1);
    }
}
