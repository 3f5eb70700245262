pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Default)]
pub struct TrieNode {
    children: Vec<(char, TrieNode)>,
    is_terminal: bool,
    frequency: u64,
}

impl TrieNode {
    fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, node)| node)
    }

    fn child_or_insert(&mut self, ch: char) -> &mut TrieNode {
        let index = match self.children.iter().position(|(c, _)| *c == ch) {
            Some(index) => index,
            None => {
                self.children.push((ch, TrieNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

// Dropping a long chain recursively can exhaust the stack.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut pending: Vec<TrieNode> = self.children.drain(..).map(|(_, node)| node).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.drain(..).map(|(_, child)| child));
        }
    }
}

/// Prefix tree counting how often each exact word was inserted.
///
/// Children keep the order in which their characters were first inserted,
/// and that order breaks frequency ties in [`Trie::suggest`].
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    word_count: usize,
}

struct RankFrame<'a> {
    node: &'a TrieNode,
    next_child: usize,
    ranked: Vec<(String, u64)>,
}

impl<'a> RankFrame<'a> {
    fn new(node: &'a TrieNode, path: &str) -> Self {
        let mut ranked = Vec::new();
        if node.is_terminal {
            ranked.push((path.to_string(), node.frequency));
        }
        RankFrame {
            node,
            next_child: 0,
            ranked,
        }
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    pub fn insert(&mut self, word: &str) {
        self.insert_with_frequency(word, 1);
    }

    /// Same as calling [`Trie::insert`] `count` times.
    pub fn insert_with_frequency(&mut self, word: &str, count: u64) {
        if count == 0 {
            return;
        }
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.child_or_insert(ch);
        }
        if !node.is_terminal {
            node.is_terminal = true;
            self.word_count += 1;
        }
        node.frequency = node.frequency.saturating_add(count);
    }

    pub fn search(&self, word: &str) -> bool {
        self.find_node(word).map_or(false, |node| node.is_terminal)
    }

    pub fn frequency(&self, word: &str) -> u64 {
        match self.find_node(word) {
            Some(node) if node.is_terminal => node.frequency,
            _ => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.suggest_ranked(prefix)
            .into_iter()
            .map(|(word, _)| word)
            .collect()
    }

    pub fn suggest_ranked(&self, prefix: &str) -> Vec<(String, u64)> {
        match self.find_node(prefix) {
            Some(node) => Self::collect_ranked(node, prefix),
            None => Vec::new(),
        }
    }

    /// Every word with its frequency, in pre-order: a node's own word first,
    /// then its children in insertion order. Inserting this sequence into an
    /// empty trie rebuilds the same tree.
    pub fn words(&self) -> Vec<(String, u64)> {
        let mut words = Vec::with_capacity(self.word_count);
        if self.root.is_terminal {
            words.push((String::new(), self.root.frequency));
        }

        // `None` marks the point where the last character leaves the path.
        let mut path = String::new();
        let mut stack: Vec<Option<(char, &TrieNode)>> = self
            .root
            .children
            .iter()
            .rev()
            .map(|(ch, child)| Some((*ch, child)))
            .collect();
        while let Some(entry) = stack.pop() {
            match entry {
                Some((ch, node)) => {
                    path.push(ch);
                    if node.is_terminal {
                        words.push((path.clone(), node.frequency));
                    }
                    stack.push(None);
                    stack.extend(
                        node.children
                            .iter()
                            .rev()
                            .map(|(ch, child)| Some((*ch, child))),
                    );
                }
                None => {
                    path.pop();
                }
            }
        }
        words
    }

    fn find_node(&self, word: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in word.chars() {
            node = node.child(ch)?;
        }
        Some(node)
    }

    // Post-order walk: every subtree is cut down to its best SUGGESTION_LIMIT
    // entries before being appended to its parent's list. The sort is stable,
    // so ties keep the node's own word ahead of its children, and children in
    // insertion order.
    fn collect_ranked(start: &TrieNode, prefix: &str) -> Vec<(String, u64)> {
        let mut path = prefix.to_string();
        let mut stack = vec![RankFrame::new(start, &path)];
        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if let Some((ch, child)) = node.children.get(frame.next_child) {
                frame.next_child += 1;
                path.push(*ch);
                stack.push(RankFrame::new(child, &path));
                continue;
            }

            let mut ranked = std::mem::take(&mut frame.ranked);
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            ranked.truncate(SUGGESTION_LIMIT);
            stack.pop();
            match stack.last_mut() {
                Some(parent) => {
                    path.pop();
                    parent.ranked.extend(ranked);
                }
                None => return ranked,
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn brute_force_suggest(words: &[(String, u64)], prefix: &str) -> Vec<u64> {
        let mut freqs: Vec<u64> = words
            .iter()
            .filter(|(w, _)| w.starts_with(prefix))
            .map(|(_, f)| *f)
            .collect();
        freqs.sort_by(|a, b| b.cmp(a));
        freqs.truncate(SUGGESTION_LIMIT);
        freqs
    }

    #[test]
    fn test_insert_and_search() {
        let mut trie = Trie::new();
        trie.insert("dog");
        assert!(trie.search("dog"));
        assert!(!trie.search("do"));
        assert!(!trie.search("dogs"));
        assert!(!trie.search("cat"));
    }

    #[test]
    fn test_frequency_counts_insertions() {
        let mut trie = Trie::new();
        for _ in 0..4 {
            trie.insert("car");
        }
        trie.insert("cart");
        assert_eq!(4, trie.frequency("car"));
        assert_eq!(1, trie.frequency("cart"));
        assert_eq!(0, trie.frequency("ca"));
        assert_eq!(0, trie.frequency("bus"));
        assert_eq!(2, trie.len());
    }

    #[test]
    fn test_suggest_ranks_by_frequency() {
        let mut trie = Trie::new();
        trie.insert("cat");
        for _ in 0..3 {
            trie.insert("car");
        }
        trie.insert("cap");
        trie.insert("cap");
        assert_eq!(vec!["car", "cap", "cat"], trie.suggest("ca"));
        assert_eq!(
            vec![
                ("car".to_string(), 3),
                ("cap".to_string(), 2),
                ("cat".to_string(), 1)
            ],
            trie.suggest_ranked("c")
        );
    }

    #[test]
    fn test_suggest_on_empty_trie() {
        let trie = Trie::new();
        assert!(trie.suggest("a").is_empty());
        assert!(trie.suggest("").is_empty());
        assert!(trie.is_empty());
    }

    #[test]
    fn test_suggest_includes_prefix_word() {
        let mut trie = Trie::new();
        trie.insert_with_frequency("a", 5);
        trie.insert("ab");
        assert_eq!(vec!["a", "ab"], trie.suggest("a"));
    }

    #[test]
    fn test_suggest_missing_prefix() {
        let mut trie = Trie::new();
        trie.insert("apple");
        assert!(trie.suggest("b").is_empty());
        assert!(trie.suggest("applesauce").is_empty());
    }

    #[test]
    fn test_ties_follow_child_insertion_order() {
        let mut trie = Trie::new();
        trie.insert_with_frequency("aa", 2);
        trie.insert_with_frequency("ab", 2);
        assert_eq!(vec!["aa", "ab"], trie.suggest("a"));

        let mut trie = Trie::new();
        trie.insert_with_frequency("ab", 2);
        trie.insert_with_frequency("aa", 2);
        assert_eq!(vec!["ab", "aa"], trie.suggest("a"));
    }

    #[test]
    fn test_ties_prefer_own_word_over_children() {
        let mut trie = Trie::new();
        trie.insert("ab");
        trie.insert("ab");
        trie.insert("a");
        trie.insert("a");
        assert_eq!(vec!["a", "ab"], trie.suggest("a"));
    }

    #[test]
    fn test_suggest_truncates_to_limit() {
        let mut trie = Trie::new();
        let words = ["ba", "bb", "bc", "bd", "be", "bf", "bg"];
        for (i, word) in words.iter().enumerate() {
            trie.insert_with_frequency(word, i as u64 + 1);
        }
        assert_eq!(vec!["bg", "bf", "be", "bd", "bc"], trie.suggest("b"));
        assert_eq!(SUGGESTION_LIMIT, trie.suggest("").len());
    }

    #[test]
    fn test_subtree_truncation_keeps_global_top() {
        let mut trie = Trie::new();
        let mut seed: u64 = 17;
        for _ in 0..400 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let len = 1 + (seed >> 60) as usize % 4;
            let word: String = (0..len)
                .map(|i| (b'a' + ((seed >> (8 * i + 8)) % 3) as u8) as char)
                .collect();
            trie.insert(&word);
        }

        let words = trie.words();
        for prefix in ["", "a", "b", "c", "ab", "ca", "bcc"] {
            let expected = brute_force_suggest(&words, prefix);
            let actual: Vec<u64> = trie
                .suggest_ranked(prefix)
                .into_iter()
                .map(|(_, f)| f)
                .collect();
            assert_eq!(expected, actual, "prefix {:?}", prefix);
        }
    }

    #[test]
    fn test_suggest_is_sorted_and_bounded() {
        let mut trie = Trie::new();
        for (i, word) in ["tea", "ten", "ted", "to", "tin", "tinsel", "t"].iter().enumerate() {
            trie.insert_with_frequency(word, (i as u64 * 7) % 5 + 1);
        }
        let ranked = trie.suggest_ranked("t");
        assert!(ranked.len() <= SUGGESTION_LIMIT);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(ranked.iter().all(|(w, _)| w.starts_with('t')));
    }

    #[test]
    fn test_read_operations_are_idempotent() {
        let mut trie = Trie::new();
        trie.insert("hello");
        trie.insert("help");
        trie.insert("help");
        let first = trie.suggest("he");
        assert_eq!(first, trie.suggest("he"));
        assert_eq!(trie.search("help"), trie.search("help"));
    }

    #[test]
    fn test_rank_is_monotonic() {
        let mut trie = Trie::new();
        trie.insert_with_frequency("sun", 3);
        trie.insert_with_frequency("sum", 3);
        trie.insert_with_frequency("sung", 2);
        let before = trie.suggest("su").iter().position(|w| w == "sung");
        trie.insert("sung");
        let after = trie.suggest("su").iter().position(|w| w == "sung");
        assert_eq!(Some(2), before);
        assert!(after <= before);
    }

    #[test]
    fn test_empty_word_marks_root() {
        let mut trie = Trie::new();
        assert!(!trie.search(""));
        trie.insert("");
        assert!(trie.search(""));
        assert_eq!(vec![""], trie.suggest(""));
    }

    #[test]
    fn test_insert_with_zero_frequency() {
        let mut trie = Trie::new();
        trie.insert_with_frequency("ghost", 0);
        assert!(!trie.search("ghost"));
        assert!(trie.suggest("g").is_empty());
        assert!(trie.is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let mut trie = Trie::new();
        trie.insert("café");
        trie.insert("café");
        trie.insert("cafard");
        assert_eq!(vec!["café", "cafard"], trie.suggest("caf"));
        assert!(trie.search("café"));
    }

    #[test]
    fn test_long_word_does_not_recurse() {
        let mut trie = Trie::new();
        let long_word = "x".repeat(50_000);
        trie.insert(&long_word);
        assert_eq!(vec![long_word.clone()], trie.suggest("x"));
        assert!(trie.search(&long_word));
    }

    #[test]
    fn test_words_rebuilds_same_tree() {
        let mut trie = Trie::new();
        trie.insert("zebra");
        trie.insert_with_frequency("zoo", 2);
        trie.insert_with_frequency("apple", 2);
        trie.insert("z");

        let words = trie.words();
        assert_eq!(
            vec![
                ("z".to_string(), 1),
                ("zebra".to_string(), 1),
                ("zoo".to_string(), 2),
                ("apple".to_string(), 2)
            ],
            words
        );

        let mut rebuilt = Trie::new();
        for (word, freq) in words.iter() {
            rebuilt.insert_with_frequency(word, *freq);
        }
        assert_eq!(trie.suggest(""), rebuilt.suggest(""));
        assert_eq!(words, rebuilt.words());
    }
}
