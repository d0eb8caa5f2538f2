//! Forward and reverse suffix tries (C5) with lazy deserialization of
//! subtrees and rules.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::format::Cursor;
use crate::rule::RuleTable;

/// `(rule_id, variant_id, coef)` -- a reverse-trie reference to a variant,
/// with a confidence coefficient (higher is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseRef {
    pub rule_id: i32,
    pub variant_id: i16,
    pub coef: i16,
}

#[derive(Debug)]
enum NodeState {
    /// Not yet parsed; holds the byte offset to parse from on first access.
    Lazy(usize),
    Loaded(Loaded),
}

#[derive(Debug)]
struct Loaded {
    rule_ids: Vec<i32>,
    reverse_refs: Vec<ReverseRef>,
    children: BTreeMap<u16, TrieNode>,
}

/// A single trie node. Interior mutability is confined to lazy expansion:
/// once a node is `Loaded`, its own fields never change again, only its
/// still-lazy children do (§4.4: single-writer-many-readers per node).
#[derive(Debug)]
pub struct TrieNode {
    state: Mutex<NodeState>,
}

impl TrieNode {
    fn lazy(offset: usize) -> TrieNode {
        TrieNode { state: Mutex::new(NodeState::Lazy(offset)) }
    }

    fn loaded(rule_ids: Vec<i32>, reverse_refs: Vec<ReverseRef>, children: BTreeMap<u16, TrieNode>) -> TrieNode {
        TrieNode { state: Mutex::new(NodeState::Loaded(Loaded { rule_ids, reverse_refs, children })) }
    }

    /// Ensure the node is parsed, materializing it from `data` on first
    /// access and eagerly resolving any rule its own lists reference.
    fn ensure_loaded(&self, data: &[u8], rules: &Mutex<RuleTable>) {
        let mut guard = self.state.lock();
        if let NodeState::Lazy(offset) = &*guard {
            let offset = *offset;
            let cur = Cursor::new(data);
            let mut pos = offset;
            let (rule_ids, reverse_refs, children) = deserialize_node_lazy(&cur, &mut pos, rules);
            *guard = NodeState::Loaded(Loaded { rule_ids, reverse_refs, children });
        }
    }

    pub fn rule_ids(&self, data: &[u8], rules: &Mutex<RuleTable>) -> Vec<i32> {
        self.ensure_loaded(data, rules);
        match &*self.state.lock() {
            NodeState::Loaded(n) => n.rule_ids.clone(),
            NodeState::Lazy(_) => unreachable!("just loaded"),
        }
    }

    pub fn reverse_refs(&self, data: &[u8], rules: &Mutex<RuleTable>) -> Vec<ReverseRef> {
        self.ensure_loaded(data, rules);
        match &*self.state.lock() {
            NodeState::Loaded(n) => n.reverse_refs.clone(),
            NodeState::Lazy(_) => unreachable!("just loaded"),
        }
    }

    pub fn child_keys(&self, data: &[u8], rules: &Mutex<RuleTable>) -> Vec<u16> {
        self.ensure_loaded(data, rules);
        match &*self.state.lock() {
            NodeState::Loaded(n) => n.children.keys().copied().collect(),
            NodeState::Lazy(_) => unreachable!("just loaded"),
        }
    }

    /// Descend to the child keyed by `unit`, materializing this node (but
    /// not necessarily the child itself) if lazy. The returned reference
    /// borrows from `self`, so the child is further expanded through
    /// `self.child(...)` calls in turn -- enumerating a node's metadata
    /// alone never triggers expansion of its children.
    pub fn with_child<R>(&self, unit: u16, data: &[u8], rules: &Mutex<RuleTable>, f: impl FnOnce(&TrieNode) -> R) -> Option<R> {
        self.ensure_loaded(data, rules);
        let guard = self.state.lock();
        match &*guard {
            NodeState::Loaded(n) => n.children.get(&unit).map(f),
            NodeState::Lazy(_) => unreachable!("just loaded"),
        }
    }
}

fn deserialize_base(cur: &Cursor, pos: &mut usize) -> (Vec<i32>, Vec<ReverseRef>) {
    let mut rule_ids = Vec::new();
    let count = cur.read_i16(pos);
    for _ in 0..count.max(0) {
        let id = cur.read_i16(pos);
        if id != 0 {
            rule_ids.push(id as i32);
        }
    }

    let mut reverse_refs = Vec::new();
    let count = cur.read_i16(pos);
    for _ in 0..count.max(0) {
        let rule_id = cur.read_i16(pos) as i32;
        let variant_id = cur.read_i16(pos);
        let coef = cur.read_i16(pos);
        reverse_refs.push(ReverseRef { rule_id, variant_id, coef });
    }
    (rule_ids, reverse_refs)
}

/// Parse one node eagerly: its own rule/reverse-ref lists, plus every
/// child's lists recursively (used when `eager_load` is set; see
/// `AnalyzerConfig`).
pub fn deserialize_node_eager(cur: &Cursor, pos: &mut usize) -> TrieNode {
    let (rule_ids, reverse_refs) = deserialize_base(cur, pos);
    let mut children = BTreeMap::new();
    let count = cur.read_i16(pos);
    for _ in 0..count.max(0) {
        let key = cur.read_i16(pos) as u16;
        let _end_offset = cur.read_i32(pos); // unused in full (non-lazy) load
        children.insert(key, deserialize_node_eager(cur, pos));
    }
    TrieNode::loaded(rule_ids, reverse_refs, children)
}

/// Parse one node's own lists eagerly, but leave children as lazy offsets.
/// Also resolves any rule referenced by this node that is itself still
/// lazy: the source loads rules referenced by a node inline, at the
/// moment the node itself is deserialized, not on first lookup.
fn deserialize_node_lazy(cur: &Cursor, pos: &mut usize, rules: &Mutex<RuleTable>) -> (Vec<i32>, Vec<ReverseRef>, BTreeMap<u16, TrieNode>) {
    let (rule_ids, reverse_refs) = deserialize_base(cur, pos);
    let mut children = BTreeMap::new();
    let count = cur.read_i16(pos);
    for _ in 0..count.max(0) {
        let key = cur.read_i16(pos) as u16;
        let end_offset = cur.read_i32(pos) as usize;
        children.insert(key, TrieNode::lazy(*pos));
        *pos = end_offset;
    }

    let saved_pos = *pos;
    let mut table = rules.lock();
    for &rid in &rule_ids {
        load_lazy_rule(cur, &mut table, rid);
    }
    for r in &reverse_refs {
        load_lazy_rule(cur, &mut table, r.rule_id);
    }
    drop(table);
    *pos = saved_pos;

    (rule_ids, reverse_refs, children)
}

fn load_lazy_rule(cur: &Cursor, table: &mut RuleTable, rule_id: i32) {
    if let Some(rule) = table.get_mut(rule_id) {
        if rule.lazy_pos > 0 {
            let mut pos = rule.lazy_pos;
            *rule = crate::rule::Rule::deserialize(cur, &mut pos);
        }
    }
}

/// Forward or reverse suffix trie. Forward: keyed by prefix of the surface
/// form. Reverse: keyed by the surface form read right-to-left.
#[derive(Debug)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new_lazy(offset: usize) -> Trie {
        Trie { root: TrieNode::lazy(offset) }
    }

    pub fn new_eager(root: TrieNode) -> Trie {
        Trie { root }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Walk the trie consuming `word` one code unit (as `u16`, truncating
    /// non-BMP characters) at a time, calling `visit` at every node
    /// reached, starting from the root, stopping at the first character
    /// with no matching child.
    pub fn walk(&self, word: &[char], data: &[u8], rules: &Mutex<RuleTable>, visit: &mut dyn FnMut(usize, &TrieNode)) {
        visit(0, &self.root);
        self.walk_from(&self.root, word, 0, data, rules, visit);
    }

    fn walk_from(&self, node: &TrieNode, word: &[char], depth: usize, data: &[u8], rules: &Mutex<RuleTable>, visit: &mut dyn FnMut(usize, &TrieNode)) {
        let Some(&c) = word.get(depth) else { return };
        let unit = c as u32 as u16;
        let descended = node.with_child(unit, data, rules, |child| {
            visit(depth + 1, child);
        });
        if descended.is_some() {
            // Re-borrow the child through another `with_child` call for the
            // recursive step, since the closure above cannot itself recurse
            // while holding the parent's lock.
            node.with_child(unit, data, rules, |child| {
                self.walk_from(child, word, depth + 1, data, rules, visit);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn empty_rules() -> Mutex<RuleTable> {
        Mutex::new(RuleTable::new(Vec::new()))
    }

    #[test]
    fn eager_node_round_trip() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1i16.to_le_bytes()); // 1 rule id
        buf.extend_from_slice(&7i16.to_le_bytes());
        buf.extend_from_slice(&0i16.to_le_bytes()); // 0 reverse refs
        buf.extend_from_slice(&0i16.to_le_bytes()); // 0 children

        let cur = Cursor::new(&buf);
        let mut pos = 0;
        let node = deserialize_node_eager(&cur, &mut pos);
        let rules = empty_rules();
        assert_eq!(node.rule_ids(&buf, &rules), vec![7]);
    }

    #[test]
    fn lazy_child_materializes_on_descent() {
        let mut child_body = Vec::new();
        child_body.extend_from_slice(&1i16.to_le_bytes()); // 1 rule id
        child_body.extend_from_slice(&9i16.to_le_bytes());
        child_body.extend_from_slice(&0i16.to_le_bytes()); // 0 reverse refs
        child_body.extend_from_slice(&0i16.to_le_bytes()); // 0 children

        let mut buf = Vec::new();
        buf.extend_from_slice(&0i16.to_le_bytes()); // 0 rule ids (root)
        buf.extend_from_slice(&0i16.to_le_bytes()); // 0 reverse refs (root)
        buf.extend_from_slice(&1i16.to_le_bytes()); // 1 child
        buf.extend_from_slice(&('A' as i16).to_le_bytes()); // key
        let child_start = buf.len() as i32 + 4;
        buf.extend_from_slice(&(child_start + child_body.len() as i32).to_le_bytes());
        buf.extend_from_slice(&child_body);

        let rules = Mutex::new(RuleTable::new(vec![Rule::default()]));
        let root = TrieNode::lazy(0);
        let child_keys = root.child_keys(&buf, &rules);
        assert_eq!(child_keys, vec!['A' as u16]);

        let ids = root.with_child('A' as u16, &buf, &rules, |child| child.rule_ids(&buf, &rules)).unwrap();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn walk_visits_root_then_matching_children() {
        let mut child_body = Vec::new();
        child_body.extend_from_slice(&1i16.to_le_bytes());
        child_body.extend_from_slice(&3i16.to_le_bytes());
        child_body.extend_from_slice(&0i16.to_le_bytes());
        child_body.extend_from_slice(&0i16.to_le_bytes());

        let mut buf = Vec::new();
        buf.extend_from_slice(&0i16.to_le_bytes());
        buf.extend_from_slice(&0i16.to_le_bytes());
        buf.extend_from_slice(&1i16.to_le_bytes());
        buf.extend_from_slice(&('K' as i16).to_le_bytes());
        let child_start = buf.len() as i32 + 4;
        buf.extend_from_slice(&(child_start + child_body.len() as i32).to_le_bytes());
        buf.extend_from_slice(&child_body);

        let rules = Mutex::new(RuleTable::new(vec![Rule::default()]));
        let trie = Trie::new_lazy(0);
        let mut depths = Vec::new();
        trie.walk(&['K', 'X'], &buf, &rules, &mut |depth, _node| depths.push(depth));
        assert_eq!(depths, vec![0, 1]);
    }
}
