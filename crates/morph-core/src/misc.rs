//! Misc info record (C3/C4): additional morphological attributes that do
//! not fit the base tuple, stored as a flag word plus an ordered list of
//! short string tokens and decoded on demand.

use crate::categories::{Aspect, Mood, Person, Tense, Voice};

/// A small record of additional attributes. Interned in the dictionary and
/// identified by a 1-based id (`MiscInfo::id`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MiscInfo {
    pub id: u16,
    pub flags: u16,
    pub attrs: Vec<String>,
}

impl MiscInfo {
    pub fn new(id: u16) -> Self {
        MiscInfo { id, flags: 0, attrs: Vec::new() }
    }

    pub fn add_attr(&mut self, attr: impl Into<String>) {
        let attr = attr.into();
        if !self.attrs.iter().any(|a| *a == attr) {
            self.attrs.push(attr);
        }
    }

    pub fn has_attr(&self, attr: &str) -> bool {
        self.attrs.iter().any(|a| a == attr)
    }

    pub fn person(&self) -> Person {
        let mut result = Person::empty();
        for a in &self.attrs {
            match a.as_str() {
                "1 л." => result |= Person::FIRST,
                "2 л." => result |= Person::SECOND,
                "3 л." => result |= Person::THIRD,
                _ => {}
            }
        }
        result
    }

    pub fn tense(&self) -> Tense {
        for a in &self.attrs {
            match a.as_str() {
                "п.вр." => return Tense::PAST,
                "н.вр." => return Tense::PRESENT,
                "б.вр." => return Tense::FUTURE,
                _ => {}
            }
        }
        Tense::empty()
    }

    pub fn aspect(&self) -> Aspect {
        for a in &self.attrs {
            match a.as_str() {
                "сов.в." => return Aspect::PERFECTIVE,
                "нес.в." => return Aspect::IMPERFECTIVE,
                _ => {}
            }
        }
        Aspect::empty()
    }

    pub fn voice(&self) -> Voice {
        for a in &self.attrs {
            if a == "страд.з." {
                return Voice::PASSIVE;
            }
            if a == "действ.з." {
                return Voice::ACTIVE;
            }
        }
        Voice::empty()
    }

    pub fn mood(&self) -> Mood {
        if self.has_attr("пов.накл.") {
            return Mood::IMPERATIVE;
        }
        Mood::empty()
    }

    pub fn is_short_form(&self) -> bool {
        self.has_attr("к.ф.")
    }

    pub fn is_infinitive(&self) -> bool {
        self.has_attr("инф.")
    }

    pub fn is_synonym_form(&self) -> bool {
        self.has_attr("синон.ф.")
    }

    /// Ordinary method (not a trait) returning false when there is nothing
    /// to match against -- the only place polymorphism appears in the
    /// source (§9), modeled here as a plain struct method.
    pub fn contains_attr(&self, attr: &str) -> bool {
        self.has_attr(attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_person_from_attrs() {
        let mut m = MiscInfo::new(1);
        m.add_attr("1 л.");
        m.add_attr("3 л.");
        assert_eq!(m.person(), Person::FIRST | Person::THIRD);
    }

    #[test]
    fn add_attr_deduplicates() {
        let mut m = MiscInfo::new(1);
        m.add_attr("сов.в.");
        m.add_attr("сов.в.");
        assert_eq!(m.attrs.len(), 1);
    }

    #[test]
    fn decodes_tense_aspect_mood() {
        let mut m = MiscInfo::new(1);
        m.add_attr("п.вр.");
        m.add_attr("сов.в.");
        m.add_attr("пов.накл.");
        assert_eq!(m.tense(), Tense::PAST);
        assert_eq!(m.aspect(), Aspect::PERFECTIVE);
        assert_eq!(m.mood(), Mood::IMPERATIVE);
    }

    #[test]
    fn empty_misc_has_no_flags_defined() {
        let m = MiscInfo::new(1);
        assert!(m.person().is_empty());
        assert!(m.tense().is_empty());
    }
}
