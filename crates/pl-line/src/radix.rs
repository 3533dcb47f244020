//! Radix tree — compressed prefix index of the command vocabulary.
//!
//! Edges carry non-empty strings; nodes carry a terminal flag. A node's
//! outgoing edges never share a first character, and every non-root
//! internal node is either terminal or has at least two children — there
//! are no redundant single-child chains.
//!
//! Each edge owns its child subtree exclusively (`Box<Node>`). The only
//! point where a subtree changes owner is the split on insert: a new
//! intermediate node takes over the matching prefix of an existing edge
//! and the old child moves underneath it.
//!
//! Enumeration follows child insertion order. It is stable, not
//! lexicographic; callers must not depend on lexical ordering.

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Node {
    /// True if the edge labels from the root to this node spell a word.
    terminal: bool,
    /// Outgoing edges in insertion order. First characters are distinct.
    children: Vec<(String, Box<Node>)>,
}

impl Node {
    fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// RadixTree
// ---------------------------------------------------------------------------

/// Compressed prefix tree over a string vocabulary.
#[derive(Debug, Default)]
pub struct RadixTree {
    root: Node,
}

impl RadixTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word. The empty string is silently ignored.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        insert_at(&mut self.root, word);
    }

    /// True iff `word` was inserted. Proper prefixes of inserted words
    /// and partial edge matches are not members.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut node = &self.root;
        let mut rest = word;
        loop {
            let mut next = None;
            for (label, child) in &node.children {
                let shared = common_prefix_len(label, rest);
                if shared == 0 {
                    continue;
                }
                if shared == label.len() {
                    if shared == rest.len() {
                        return child.terminal;
                    }
                    next = Some((child.as_ref(), &rest[shared..]));
                }
                // shared < label.len(): the word ends or diverges
                // mid-edge — not a member either way.
                break;
            }
            match next {
                Some((child, remaining)) => {
                    node = child;
                    rest = remaining;
                }
                None => return false,
            }
        }
    }

    /// Every word in the tree, in depth-first insertion order.
    #[must_use]
    pub fn all_words(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect(&self.root, String::new(), &mut out);
        out
    }

    /// Every word starting with `prefix`, in depth-first insertion order.
    ///
    /// The walk may end mid-edge; the unmatched remainder of that edge
    /// joins the returned strings. A word that *is* the landing point is
    /// included. No path consuming `prefix` yields an empty result.
    #[must_use]
    pub fn match_prefix(&self, prefix: &str) -> Vec<String> {
        let Some((node, edge_suffix)) = self.locate(prefix) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        collect(node, format!("{prefix}{edge_suffix}"), &mut out);
        out
    }

    /// Render the tree shape: one edge label per line, depth shown as a
    /// run of `-`.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut s = String::new();
        dump_at(&self.root, 0, &mut s);
        s.push('\n');
        s
    }

    /// Find the deepest node reached by consuming `prefix`, together
    /// with the unconsumed remainder of the final edge label.
    fn locate(&self, prefix: &str) -> Option<(&Node, &str)> {
        let mut node = &self.root;
        let mut pos = 0;
        while pos < prefix.len() {
            let rest = &prefix[pos..];
            let mut next = None;
            for (label, child) in &node.children {
                let shared = common_prefix_len(label, rest);
                if shared == 0 {
                    continue;
                }
                if shared == rest.len() {
                    // Prefix fully consumed, possibly mid-edge.
                    return Some((child, &label[shared..]));
                }
                if shared < label.len() {
                    // Prefix diverges inside this edge.
                    return None;
                }
                next = Some((child.as_ref(), pos + shared));
                break;
            }
            let (child, new_pos) = next?;
            node = child;
            pos = new_pos;
        }
        Some((node, ""))
    }
}

impl<S: AsRef<str>> FromIterator<S> for RadixTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = Self::new();
        for word in iter {
            tree.insert(word.as_ref());
        }
        tree
    }
}

// ---------------------------------------------------------------------------
// Tree algorithms
// ---------------------------------------------------------------------------

/// Insert `rest` below `node`.
fn insert_at(node: &mut Node, rest: &str) {
    // At most one child can share a prefix — siblings have distinct
    // first characters.
    let found = node.children.iter().enumerate().find_map(|(i, (label, _))| {
        let shared = common_prefix_len(label, rest);
        (shared > 0).then_some((i, shared))
    });

    let Some((i, shared)) = found else {
        // No overlap with any edge: append a new terminal edge.
        let mut leaf = Node::new();
        leaf.terminal = true;
        node.children.push((rest.to_string(), Box::new(leaf)));
        return;
    };

    let label_len = node.children[i].0.len();
    if shared == label_len {
        // The whole edge matches: descend, or mark if fully consumed.
        if shared == rest.len() {
            node.children[i].1.terminal = true;
        } else {
            insert_at(&mut node.children[i].1, &rest[shared..]);
        }
        return;
    }

    // Partial edge match: split. A new intermediate node takes the
    // shared prefix; the old child moves under it keeping its subtree.
    let (old_label, old_child) = std::mem::replace(
        &mut node.children[i],
        (String::new(), Box::new(Node::new())),
    );
    let mut mid = Node::new();
    mid.children
        .push((old_label[shared..].to_string(), old_child));
    if shared == rest.len() {
        mid.terminal = true;
    } else {
        let mut leaf = Node::new();
        leaf.terminal = true;
        mid.children
            .push((rest[shared..].to_string(), Box::new(leaf)));
    }
    node.children[i] = (old_label[..shared].to_string(), Box::new(mid));
}

/// Depth-first collection of all words below `node`, `path` included.
fn collect(node: &Node, path: String, out: &mut Vec<String>) {
    if node.terminal {
        out.push(path.clone());
    }
    for (label, child) in &node.children {
        collect(child, format!("{path}{label}"), out);
    }
}

fn dump_at(node: &Node, depth: usize, out: &mut String) {
    for (label, child) in &node.children {
        for _ in 0..depth {
            out.push('-');
        }
        out.push(' ');
        out.push_str(label);
        out.push('\n');
        dump_at(child, depth + 1, out);
    }
}

/// Byte length of the longest common prefix, counted in whole characters
/// so the result is always a valid slice boundary for both strings.
fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the whole tree checking the structural invariants: sibling
    /// edges have distinct first characters and non-empty labels, and
    /// every non-root internal node is terminal or has ≥ 2 children.
    fn check_invariants(node: &Node, is_root: bool) {
        let mut firsts = Vec::new();
        for (label, child) in &node.children {
            assert!(!label.is_empty(), "empty edge label");
            let first = label.chars().next().unwrap();
            assert!(
                !firsts.contains(&first),
                "siblings share first char {first:?}"
            );
            firsts.push(first);
            check_invariants(child, false);
        }
        if !is_root && !node.terminal {
            assert!(
                node.children.len() >= 2,
                "non-terminal internal node with {} children",
                node.children.len()
            );
        }
    }

    fn tree(words: &[&str]) -> RadixTree {
        words.iter().collect()
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    // -- insert / contains --------------------------------------------------

    #[test]
    fn empty_tree_contains_nothing() {
        let t = RadixTree::new();
        assert!(!t.contains("a"));
        assert!(t.all_words().is_empty());
    }

    #[test]
    fn empty_string_is_ignored() {
        let mut t = RadixTree::new();
        t.insert("");
        assert!(!t.contains(""));
        assert!(t.all_words().is_empty());
    }

    #[test]
    fn single_word() {
        let t = tree(&["hello"]);
        assert!(t.contains("hello"));
        assert!(!t.contains("hell"));
        assert!(!t.contains("hellos"));
    }

    #[test]
    fn proper_prefix_is_not_a_member() {
        let t = tree(&["read_celllib"]);
        assert!(!t.contains("read"));
        assert!(!t.contains("r"));
    }

    #[test]
    fn disjoint_words() {
        let t = tree(&["cat", "dog"]);
        assert!(t.contains("cat"));
        assert!(t.contains("dog"));
        assert!(!t.contains("ca"));
    }

    #[test]
    fn split_on_shared_prefix() {
        let t = tree(&["asia", "american"]);
        assert!(t.contains("asia"));
        assert!(t.contains("american"));
        assert!(!t.contains("a"));
        check_invariants(&t.root, true);
    }

    #[test]
    fn word_equal_to_split_point() {
        let t = tree(&["asia", "american", "a"]);
        assert!(t.contains("a"));
        assert!(t.contains("asia"));
        assert!(t.contains("american"));
        check_invariants(&t.root, true);
    }

    #[test]
    fn inserting_a_prefix_of_an_existing_word() {
        let t = tree(&["hello", "hell"]);
        assert!(t.contains("hell"));
        assert!(t.contains("hello"));
        check_invariants(&t.root, true);
    }

    #[test]
    fn inserting_an_extension_of_an_existing_word() {
        let t = tree(&["hell", "hello"]);
        assert!(t.contains("hell"));
        assert!(t.contains("hello"));
        check_invariants(&t.root, true);
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let t = tree(&["word", "word", "word"]);
        assert_eq!(t.all_words(), vec!["word"]);
    }

    #[test]
    fn multibyte_words() {
        let t = tree(&["héllo", "hé", "日本語", "日本"]);
        assert!(t.contains("héllo"));
        assert!(t.contains("hé"));
        assert!(t.contains("日本語"));
        assert!(t.contains("日本"));
        assert!(!t.contains("日"));
        check_invariants(&t.root, true);
    }

    // -- all_words ----------------------------------------------------------

    #[test]
    fn all_words_returns_the_vocabulary() {
        let words = ["read_celllib", "report_timing", "report_power", "exit"];
        let t = tree(&words);
        assert_eq!(
            sorted(t.all_words()),
            sorted(words.iter().map(|s| (*s).to_string()).collect())
        );
    }

    #[test]
    fn all_words_follows_insertion_order() {
        let t = tree(&["b", "a", "c"]);
        assert_eq!(t.all_words(), vec!["b", "a", "c"]);
    }

    // -- match_prefix -------------------------------------------------------

    #[test]
    fn match_prefix_no_match() {
        let t = tree(&["alpha", "beta"]);
        assert!(t.match_prefix("x").is_empty());
    }

    #[test]
    fn match_prefix_mid_edge() {
        let t = tree(&["read_celllib"]);
        assert_eq!(t.match_prefix("re"), vec!["read_celllib"]);
    }

    #[test]
    fn match_prefix_exact_word() {
        let t = tree(&["read_celllib"]);
        assert_eq!(t.match_prefix("read_celllib"), vec!["read_celllib"]);
    }

    #[test]
    fn match_prefix_at_split_node() {
        let t = tree(&["asia", "american"]);
        assert_eq!(sorted(t.match_prefix("a")), vec!["american", "asia"]);
    }

    #[test]
    fn match_prefix_includes_the_prefix_word_itself() {
        let t = tree(&["a", "ab", "abc"]);
        assert_eq!(sorted(t.match_prefix("a")), vec!["a", "ab", "abc"]);
        assert_eq!(sorted(t.match_prefix("ab")), vec!["ab", "abc"]);
        assert_eq!(t.match_prefix("abc"), vec!["abc"]);
    }

    #[test]
    fn match_prefix_only_matching_subtree() {
        let t = tree(&["report", "repeat", "exit"]);
        assert_eq!(sorted(t.match_prefix("rep")), vec!["repeat", "report"]);
    }

    #[test]
    fn match_prefix_deeper_than_any_word() {
        let t = tree(&["abc"]);
        assert!(t.match_prefix("abcd").is_empty());
    }

    #[test]
    fn match_prefix_empty_prefix_returns_everything() {
        let t = tree(&["one", "two"]);
        assert_eq!(sorted(t.match_prefix("")), vec!["one", "two"]);
    }

    // -- dump ---------------------------------------------------------------

    #[test]
    fn dump_shows_depth() {
        let t = tree(&["asia", "american"]);
        assert_eq!(t.dump(), " a\n- sia\n- merican\n\n");
    }

    #[test]
    fn dump_empty_tree() {
        assert_eq!(RadixTree::new().dump(), "\n");
    }

    // -- helpers ------------------------------------------------------------

    #[test]
    fn common_prefix_len_basic() {
        assert_eq!(common_prefix_len("report", "repeat"), 3);
        assert_eq!(common_prefix_len("abc", "abc"), 3);
        assert_eq!(common_prefix_len("abc", "xyz"), 0);
        assert_eq!(common_prefix_len("", "abc"), 0);
    }

    #[test]
    fn common_prefix_len_is_a_char_boundary() {
        // 'é' is two bytes; a partial byte match must not be counted.
        assert_eq!(common_prefix_len("héllo", "hállo"), 1);
        assert_eq!(common_prefix_len("日本語", "日本"), 6);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;
    use std::collections::BTreeSet;

    /// Random non-empty words over a small alphabet so that shared
    /// prefixes (and therefore edge splits) are common.
    fn word() -> impl Strategy<Value = String> {
        "[abc]{1,8}"
    }

    fn vocab() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set(word(), 0..64)
    }

    proptest! {
        /// Membership is exactly the inserted set.
        #[test]
        fn prop_contains_iff_inserted(words in vocab(), probe in word()) {
            let tree: RadixTree = words.iter().collect();
            for w in &words {
                prop_assert!(tree.contains(w), "missing member {w:?}");
            }
            prop_assert_eq!(tree.contains(&probe), words.contains(&probe));
        }

        /// Enumeration returns each inserted word exactly once.
        #[test]
        fn prop_all_words_is_the_set(words in vocab()) {
            let tree: RadixTree = words.iter().collect();
            let mut listed = tree.all_words();
            listed.sort();
            let expected: Vec<String> = words.iter().cloned().collect();
            prop_assert_eq!(listed, expected);
        }

        /// Sibling edges never share a first character, labels are
        /// non-empty, and no node is a redundant single-child chain.
        #[test]
        fn prop_structural_invariants(words in vocab()) {
            fn walk(node: &Node, is_root: bool) -> Result<(), TestCaseError> {
                let mut firsts = BTreeSet::new();
                for (label, child) in &node.children {
                    prop_assert!(!label.is_empty());
                    let first = label.chars().next().unwrap();
                    prop_assert!(firsts.insert(first), "duplicate first char");
                    walk(child, false)?;
                }
                if !is_root && !node.terminal {
                    prop_assert!(node.children.len() >= 2);
                }
                Ok(())
            }
            let tree: RadixTree = words.iter().collect();
            walk(&tree.root, true)?;
        }

        /// Insert every proper prefix of a word (in shuffled order):
        /// matching the length-i prefix yields exactly L − i + 1 words,
        /// each a prefix of the word, with lengths stepping by one.
        #[test]
        fn prop_prefix_chain(s in "[ab]{1,10}", seed in any::<u64>()) {
            let len = s.chars().count();
            let mut prefixes: Vec<String> = (1..=len)
                .map(|i| s.chars().take(i).collect())
                .collect();
            // Deterministic shuffle so insertion order varies with seed.
            let mut state = seed | 1;
            for i in (1..prefixes.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                prefixes.swap(i, (state as usize) % (i + 1));
            }
            let tree: RadixTree = prefixes.iter().collect();

            for i in 1..=len {
                let p: String = s.chars().take(i).collect();
                let mut matches = tree.match_prefix(&p);
                prop_assert_eq!(matches.len(), len - i + 1);
                matches.sort_by_key(String::len);
                for (k, m) in matches.iter().enumerate() {
                    prop_assert!(s.starts_with(m.as_str()));
                    prop_assert_eq!(m.chars().count(), i + k);
                }
            }
        }

        /// Everything match_prefix returns starts with the prefix.
        #[test]
        fn prop_matches_start_with_prefix(words in vocab(), p in "[abc]{1,4}") {
            let tree: RadixTree = words.iter().collect();
            for m in tree.match_prefix(&p) {
                prop_assert!(m.starts_with(&p), "{m:?} does not start with {p:?}");
            }
        }
    }
}
