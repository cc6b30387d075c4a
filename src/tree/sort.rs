use super::context::TreeContext;
use super::node::NodeKind;
use std::cmp::Ordering;
use std::path::Path;

/// Total sibling order: kind label ascending (directories, files, links,
/// unknowns), then full path ascending.
pub fn compare(a_kind: NodeKind, a_path: &Path, b_kind: NodeKind, b_path: &Path) -> Ordering {
    a_kind
        .label()
        .cmp(b_kind.label())
        .then_with(|| a_path.cmp(b_path))
}

/// Sort every directory's children in the arena.
///
/// Applied once after a batch completes, never incrementally while a scan
/// or search is still collecting.
pub fn sort_tree(ctx: &mut TreeContext) {
    for dir in ctx.directory_paths() {
        let Some(node) = ctx.node(&dir) else { continue };

        let mut keyed: Vec<(NodeKind, std::path::PathBuf)> = node
            .children
            .iter()
            .filter_map(|child| ctx.node(child).map(|n| (n.kind, n.path.clone())))
            .collect();
        keyed.sort_by(|a, b| compare(a.0, &a.1, b.0, &b.1));

        if let Some(node) = ctx.node_mut(&dir) {
            node.children = keyed.into_iter().map(|(_, path)| path).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::TreeNode;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn context_with_children(children: &[(&str, NodeKind)]) -> TreeContext {
        let root = PathBuf::from("/r");
        let mut ctx = TreeContext::new(1, root.clone(), false);
        let mut root_node = TreeNode::new(root.clone(), NodeKind::Directory, None);
        for (name, kind) in children {
            let path = root.join(name);
            root_node.children.push(path.clone());
            ctx.insert(TreeNode::new(path, *kind, Some(root.clone())));
        }
        ctx.insert(root_node);
        ctx
    }

    fn sorted_names(ctx: &TreeContext) -> Vec<String> {
        ctx.children_of(Path::new("/r"))
            .into_iter()
            .map(|n| n.name)
            .collect()
    }

    #[test]
    fn test_directories_before_files_then_by_path() {
        let mut ctx = context_with_children(&[
            ("b.txt", NodeKind::File),
            ("a.txt", NodeKind::File),
            ("sub", NodeKind::Directory),
        ]);

        sort_tree(&mut ctx);

        assert_eq!(sorted_names(&ctx), vec!["sub", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_links_and_unknowns_follow_files() {
        let mut ctx = context_with_children(&[
            ("zz_unknown", NodeKind::Unknown),
            ("dangling", NodeKind::Link),
            ("plain.txt", NodeKind::File),
            ("dir", NodeKind::Directory),
        ]);

        sort_tree(&mut ctx);

        assert_eq!(
            sorted_names(&ctx),
            vec!["dir", "plain.txt", "dangling", "zz_unknown"]
        );
    }

    #[test]
    fn test_nested_directories_sorted_too() {
        let root = PathBuf::from("/r");
        let mut ctx = TreeContext::new(1, root.clone(), false);

        let mut root_node = TreeNode::new(root.clone(), NodeKind::Directory, None);
        root_node.children = vec![root.join("sub")];
        ctx.insert(root_node);

        let mut sub = TreeNode::new(root.join("sub"), NodeKind::Directory, Some(root.clone()));
        sub.children = vec![root.join("sub/y.txt"), root.join("sub/x.txt")];
        ctx.insert(sub);
        ctx.insert(TreeNode::new(
            root.join("sub/y.txt"),
            NodeKind::File,
            Some(root.join("sub")),
        ));
        ctx.insert(TreeNode::new(
            root.join("sub/x.txt"),
            NodeKind::File,
            Some(root.join("sub")),
        ));

        sort_tree(&mut ctx);

        let sub_children: Vec<_> = ctx
            .children_of(&root.join("sub"))
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(sub_children, vec!["x.txt", "y.txt"]);
    }

    fn kind_strategy() -> impl Strategy<Value = NodeKind> {
        prop_oneof![
            Just(NodeKind::Directory),
            Just(NodeKind::File),
            Just(NodeKind::Link),
            Just(NodeKind::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn prop_compare_is_a_total_order(
            entries in prop::collection::vec((kind_strategy(), "[a-z]{1,8}"), 2..12)
        ) {
            let keyed: Vec<(NodeKind, PathBuf)> = entries
                .into_iter()
                .map(|(kind, name)| (kind, PathBuf::from("/r").join(name)))
                .collect();

            for a in &keyed {
                for b in &keyed {
                    let forward = compare(a.0, &a.1, b.0, &b.1);
                    let backward = compare(b.0, &b.1, a.0, &a.1);
                    prop_assert_eq!(forward, backward.reverse());
                }
            }
        }

        #[test]
        fn prop_sorting_is_deterministic(
            entries in prop::collection::vec((kind_strategy(), "[a-z]{1,8}"), 0..16)
        ) {
            let mut once: Vec<(NodeKind, PathBuf)> = entries
                .iter()
                .map(|(kind, name)| (*kind, PathBuf::from("/r").join(name)))
                .collect();
            let mut twice = once.clone();

            once.sort_by(|a, b| compare(a.0, &a.1, b.0, &b.1));
            twice.sort_by(|a, b| compare(a.0, &a.1, b.0, &b.1));
            twice.sort_by(|a, b| compare(a.0, &a.1, b.0, &b.1));

            prop_assert_eq!(&once, &twice);

            // Kind ranks never interleave after sorting.
            let labels: Vec<&str> = once.iter().map(|(kind, _)| kind.label()).collect();
            let mut ranked = labels.clone();
            ranked.sort();
            prop_assert_eq!(labels, ranked);
        }
    }
}
