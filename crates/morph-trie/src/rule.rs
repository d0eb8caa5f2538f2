//! Rule model (C4): inflectional rules and their per-variant morphological
//! attributes, plus the interned misc-info table.

use std::sync::Arc;

use morph_core::categories::{BaseMorphInfo, Case, Class, Gender, Number};
use morph_core::misc::MiscInfo;

use crate::format::Cursor;

/// `(id, rule_id, misc_id, tail, normal_tail, full_normal_tail,
/// base_morph_info)` from §3.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVariant {
    pub id: i16,
    pub rule_id: i32,
    pub misc_id: i16,
    pub tail: String,
    pub normal_tail: String,
    pub full_normal_tail: String,
    pub base: BaseMorphInfo,
}

impl RuleVariant {
    /// Deserialize one variant record: `misc_id:i16(>0), class_bits:i16,
    /// gender_bits:u8, number_bits:u8, case_bits:u8, normal_tail:string,
    /// full_normal_tail:string`. Returns `None` when `misc_id <= 0`,
    /// the sentinel for "no more variants for this tail".
    fn deserialize(cur: &Cursor, pos: &mut usize, rule_id: i32, id: i16, tail: &str) -> Option<RuleVariant> {
        let misc_id = cur.read_i16(pos);
        if misc_id <= 0 {
            return None;
        }
        let class_bits = cur.read_i16(pos);
        let mut class = Class::from_bits_truncate(class_bits as u16);
        class = class.normalize_from_dictionary();

        let gender = Gender::from_bits_truncate(cur.read_u8(pos));
        let number = Number::from_bits_truncate(cur.read_u8(pos));
        let case = Case::from_bits_truncate(cur.read_u8(pos) as u16);
        let normal_tail = cur.read_string(pos);
        let full_normal_tail = cur.read_string(pos);

        Some(RuleVariant {
            id,
            rule_id,
            misc_id,
            tail: tail.to_string(),
            normal_tail,
            full_normal_tail,
            base: BaseMorphInfo { class, gender, number, case, language: Default::default() },
        })
    }
}

/// `id`, parallel arrays `tails[]` and `variants[][]`.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub id: i32,
    pub tails: Vec<String>,
    pub variants: Vec<Vec<RuleVariant>>,
    /// Offset into the buffer; `> 0` means "not yet parsed, load on first access".
    pub lazy_pos: usize,
}

impl Rule {
    pub fn variants_for_tail(&self, tail: &str) -> Option<&[RuleVariant]> {
        self.tails.iter().position(|t| t == tail).map(|i| self.variants[i].as_slice())
    }

    pub fn contains_tail(&self, tail: &str) -> bool {
        self.tails.iter().any(|t| t == tail)
    }

    pub fn find_variant(&self, variant_id: i16) -> Option<&RuleVariant> {
        self.variants.iter().flatten().find(|v| v.id == variant_id)
    }

    /// Deserialize a rule body: `rule_id:i16`, then a stream of
    /// `(tail_string, variant*) | 0xFF`.
    pub fn deserialize(cur: &Cursor, pos: &mut usize) -> Rule {
        let rule_id = cur.read_i16(pos) as i32;
        let mut rule = Rule { id: rule_id, ..Default::default() };
        let mut id_counter: i16 = 1;

        while !cur.is_eof(*pos) {
            match cur.peek_u8(*pos) {
                Some(0xFF) => {
                    *pos += 1;
                    break;
                }
                None => break,
                _ => {}
            }
            let tail = cur.read_string(pos);
            let mut variants = Vec::new();
            while !cur.is_eof(*pos) {
                match RuleVariant::deserialize(cur, pos, rule_id, id_counter, &tail) {
                    Some(v) => {
                        id_counter += 1;
                        variants.push(v);
                    }
                    None => break,
                }
            }
            rule.tails.push(tail);
            rule.variants.push(variants);
        }
        rule
    }
}

/// Rules kept in a contiguous vector indexed by `rule_id - 1` (§9).
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleTable { rules }
    }

    pub fn get(&self, rule_id: i32) -> Option<&Rule> {
        if rule_id <= 0 {
            return None;
        }
        self.rules.get((rule_id - 1) as usize)
    }

    pub fn get_mut(&mut self, rule_id: i32) -> Option<&mut Rule> {
        if rule_id <= 0 {
            return None;
        }
        self.rules.get_mut((rule_id - 1) as usize)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Interned misc-info records, identified by a 1-based id.
#[derive(Debug, Default)]
pub struct MiscTable {
    entries: Vec<Arc<MiscInfo>>,
}

impl MiscTable {
    pub fn new(entries: Vec<Arc<MiscInfo>>) -> Self {
        MiscTable { entries }
    }

    pub fn get(&self, id: i16) -> Option<Arc<MiscInfo>> {
        if id <= 0 {
            return None;
        }
        self.entries.get((id - 1) as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_variant(buf: &mut Vec<u8>, misc_id: i16, class: i16, gender: u8, number: u8, case: u8, normal_tail: &str, full_tail: &str) {
        buf.extend_from_slice(&misc_id.to_le_bytes());
        buf.extend_from_slice(&class.to_le_bytes());
        buf.push(gender);
        buf.push(number);
        buf.push(case);
        buf.push(normal_tail.len() as u8);
        buf.extend_from_slice(normal_tail.as_bytes());
        buf.push(full_tail.len() as u8);
        buf.extend_from_slice(full_tail.as_bytes());
    }

    #[test]
    fn deserializes_rule_with_one_tail_and_variant() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1i16.to_le_bytes()); // rule id
        buf.push(1); // tail len
        buf.extend_from_slice(b"A");
        encode_variant(&mut buf, 5, 1, 1, 1, 1, "", "");
        buf.extend_from_slice(&0i16.to_le_bytes()); // terminate variant stream (misc_id <= 0)
        buf.push(0xFF); // terminate rule

        let cur = Cursor::new(&buf);
        let mut pos = 0;
        let rule = Rule::deserialize(&cur, &mut pos);
        assert_eq!(rule.id, 1);
        assert_eq!(rule.tails, vec!["A".to_string()]);
        assert_eq!(rule.variants[0].len(), 1);
        assert_eq!(rule.variants[0][0].misc_id, 5);
    }

    #[test]
    fn rule_table_indexes_by_id_minus_one() {
        let rules = vec![
            Rule { id: 1, ..Default::default() },
            Rule { id: 2, ..Default::default() },
        ];
        let table = RuleTable::new(rules);
        assert_eq!(table.get(1).unwrap().id, 1);
        assert_eq!(table.get(2).unwrap().id, 2);
        assert!(table.get(0).is_none());
    }

    #[test]
    fn misc_and_proper_class_drops_misc_on_deserialize() {
        let mut buf = Vec::new();
        let class_bits = (Class::MISC | Class::PROPER).bits() as i16;
        encode_variant(&mut buf, 1, class_bits, 0, 0, 0, "", "");
        let cur = Cursor::new(&buf);
        let mut pos = 0;
        let v = RuleVariant::deserialize(&cur, &mut pos, 1, 1, "X").unwrap();
        assert!(!v.base.class.is_misc());
        assert!(v.base.class.is_proper());
    }
}
