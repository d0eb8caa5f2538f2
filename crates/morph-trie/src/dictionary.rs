//! GZIP decompression and top-level deserialization of a compiled
//! dictionary file (C6).

use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use morph_core::misc::MiscInfo;
use parking_lot::Mutex;

use crate::format::Cursor;
use crate::rule::{MiscTable, Rule, RuleTable};
use crate::trie::{deserialize_node_eager, Trie};
use crate::TrieError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub lazy: bool,
    pub ignore_reverse_tree: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { lazy: true, ignore_reverse_tree: false }
    }
}

/// A fully- or partially-materialized dictionary: rule table, misc table,
/// forward trie and (unless suppressed) reverse trie, all addressed by
/// offset into the owned, decompressed byte buffer.
#[derive(Debug)]
pub struct Dictionary {
    data: Vec<u8>,
    rules: Mutex<RuleTable>,
    misc: MiscTable,
    forward: Trie,
    reverse: Option<Trie>,
}

impl Dictionary {
    pub fn rules(&self) -> &Mutex<RuleTable> {
        &self.rules
    }

    pub fn misc(&self) -> &MiscTable {
        &self.misc
    }

    pub fn forward(&self) -> &Trie {
        &self.forward
    }

    pub fn reverse(&self) -> Option<&Trie> {
        self.reverse.as_ref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decompress `gz_bytes` and deserialize the layout described in §4.3:
    /// a rule-offset table, a misc-info table, the forward trie and
    /// (unless `ignore_reverse_tree`) the reverse trie.
    pub fn load(gz_bytes: &[u8], options: LoadOptions) -> Result<Dictionary, TrieError> {
        let data = inflate_tolerant(gz_bytes)?;
        let cur = Cursor::new(&data);
        let mut pos = 0usize;

        let rule_count = cur.read_i32(&mut pos).max(0) as usize;
        let mut rule_offsets = Vec::with_capacity(rule_count);
        for _ in 0..rule_count {
            rule_offsets.push(cur.read_i32(&mut pos) as usize);
        }

        let misc_count = cur.read_i32(&mut pos).max(0) as usize;
        let mut misc_entries = Vec::with_capacity(misc_count);
        for i in 0..misc_count {
            misc_entries.push(Arc::new(deserialize_misc_info(&cur, &mut pos, (i + 1) as u16)));
        }

        let rules: Vec<Rule> = rule_offsets
            .into_iter()
            .enumerate()
            .map(|(i, offset)| {
                if options.lazy {
                    Rule { id: (i + 1) as i32, lazy_pos: offset, ..Default::default() }
                } else {
                    let mut p = offset;
                    Rule::deserialize(&cur, &mut p)
                }
            })
            .collect();
        let rule_table = Mutex::new(RuleTable::new(rules));

        // Each tree section is prefixed with its own encoded length so the
        // reverse tree's start can be located without eagerly walking the
        // forward tree in lazy mode.
        let forward_len = cur.read_i32(&mut pos).max(0) as usize;
        let forward_start = pos;
        let forward = if options.lazy {
            Trie::new_lazy(forward_start)
        } else {
            Trie::new_eager(deserialize_node_eager(&cur, &mut pos))
        };
        pos = forward_start + forward_len;

        let reverse = if options.ignore_reverse_tree {
            None
        } else {
            let reverse_len = cur.read_i32(&mut pos).max(0) as usize;
            let reverse_start = pos;
            let tree = if options.lazy {
                Trie::new_lazy(reverse_start)
            } else {
                Trie::new_eager(deserialize_node_eager(&cur, &mut pos))
            };
            pos = reverse_start + reverse_len;
            Some(tree)
        };
        let _ = pos;

        Ok(Dictionary { data, rules: rule_table, misc: MiscTable::new(misc_entries), forward, reverse })
    }
}

fn deserialize_misc_info(cur: &Cursor, pos: &mut usize, id: u16) -> MiscInfo {
    let flags = cur.read_i16(pos) as u16;
    let mut info = MiscInfo { id, flags, attrs: Vec::new() };
    let attr_count = cur.read_i16(pos).max(0);
    for _ in 0..attr_count {
        info.add_attr(cur.read_string(pos));
    }
    info
}

fn inflate_tolerant(bytes: &[u8]) -> Result<Vec<u8>, TrieError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => Ok(out),
        Err(e) if !out.is_empty() => {
            log::warn!("dictionary stream truncated after {} bytes: {e}", out.len());
            Ok(out)
        }
        Err(e) => Err(TrieError::Gzip(e.to_string())),
    }
}
