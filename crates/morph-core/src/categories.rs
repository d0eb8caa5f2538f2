//! Grammatical feature bit-sets (C3).
//!
//! Each set is a `bitflags!` newtype with exact bit positions carried over
//! from the dictionary's on-disk layout (see DESIGN.md). `render`/`parse`
//! are driven by a constant `(flag, label)` table, the way the source
//! renders pipe-joined Russian labels.

use bitflags::bitflags;

macro_rules! render_parse {
    ($ty:ty, $table:expr) => {
        impl $ty {
            /// Render the set as a pipe-joined label string, e.g. `"родит.|дател."`.
            pub fn render(self) -> String {
                $table
                    .iter()
                    .filter(|(bit, _)| self.contains(*bit))
                    .map(|(_, label)| *label)
                    .collect::<Vec<_>>()
                    .join("|")
            }

            /// Parse a pipe-joined label string back into a set. Unknown
            /// labels are ignored.
            pub fn parse(s: &str) -> Self {
                let mut result = Self::empty();
                if s.is_empty() {
                    return result;
                }
                for part in s.split('|') {
                    for (bit, label) in $table.iter() {
                        if *label == part {
                            result |= *bit;
                        }
                    }
                }
                result
            }
        }
    };
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Case: u16 {
        const NOMINATIVE    = 1 << 0;
        const GENITIVE      = 1 << 1;
        const DATIVE        = 1 << 2;
        const ACCUSATIVE    = 1 << 3;
        const INSTRUMENTAL  = 1 << 4;
        const PREPOSITIONAL = 1 << 5;
        const VOCATIVE      = 1 << 6;
        const PARTIAL       = 1 << 7;
        const COMMON        = 1 << 8;
        const POSSESSIVE    = 1 << 9;
    }
}

const CASE_LABELS: &[(Case, &str)] = &[
    (Case::NOMINATIVE, "именит."),
    (Case::GENITIVE, "родит."),
    (Case::DATIVE, "дател."),
    (Case::ACCUSATIVE, "винит."),
    (Case::INSTRUMENTAL, "творит."),
    (Case::PREPOSITIONAL, "предлож."),
    (Case::VOCATIVE, "зват."),
    (Case::PARTIAL, "частич."),
    (Case::COMMON, "общ."),
    (Case::POSSESSIVE, "притяж."),
];
render_parse!(Case, CASE_LABELS);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Class: u16 {
        const NOUN              = 1 << 0;
        const ADJECTIVE         = 1 << 1;
        const VERB              = 1 << 2;
        const ADVERB            = 1 << 3;
        const PRONOUN           = 1 << 4;
        const MISC              = 1 << 5;
        const PREPOSITION       = 1 << 6;
        const CONJUNCTION       = 1 << 7;
        const PROPER            = 1 << 8;
        const PROPER_SURNAME    = 1 << 9;
        const PROPER_NAME       = 1 << 10;
        const PROPER_SECNAME    = 1 << 11;
        const PROPER_GEO        = 1 << 12;
        const PERSONAL_PRONOUN  = 1 << 13;
    }
}

impl Class {
    const PRIMARY: Class = Class::NOUN
        .union(Class::ADJECTIVE)
        .union(Class::VERB)
        .union(Class::ADVERB)
        .union(Class::PRONOUN)
        .union(Class::MISC);

    /// Set a primary category, resetting all other bits first (primary
    /// categories are mutually exclusive when freshly set).
    fn set_primary(self, bit: Class) -> Class {
        let _ = self;
        bit
    }

    pub fn with_noun() -> Class {
        Class::empty().set_primary(Class::NOUN)
    }
    pub fn with_adjective() -> Class {
        Class::empty().set_primary(Class::ADJECTIVE)
    }
    pub fn with_verb() -> Class {
        Class::empty().set_primary(Class::VERB)
    }
    pub fn with_adverb() -> Class {
        Class::empty().set_primary(Class::ADVERB)
    }
    pub fn with_pronoun() -> Class {
        Class::empty().set_primary(Class::PRONOUN)
    }
    pub fn with_misc() -> Class {
        Class::empty().set_primary(Class::MISC)
    }

    /// Subtypes imply the parent PROPER bit without clearing any other bit.
    pub fn set_proper_surname(self) -> Class {
        self | Class::PROPER_SURNAME | Class::PROPER
    }
    pub fn set_proper_name(self) -> Class {
        self | Class::PROPER_NAME | Class::PROPER
    }
    pub fn set_proper_secname(self) -> Class {
        self | Class::PROPER_SECNAME | Class::PROPER
    }
    pub fn set_proper_geo(self) -> Class {
        self | Class::PROPER_GEO | Class::PROPER
    }
    pub fn set_personal_pronoun(self) -> Class {
        self | Class::PERSONAL_PRONOUN
    }

    /// Drop the dictionary quirk of a variant tagged both MISC and PROPER:
    /// clears exactly {PROPER_SURNAME, PROPER_NAME, PROPER_SECNAME,
    /// PROPER_GEO, PERSONAL_PRONOUN}.
    pub fn clear_misc(self) -> Class {
        self & !(Class::PROPER_SURNAME
            | Class::PROPER_NAME
            | Class::PROPER_SECNAME
            | Class::PROPER_GEO
            | Class::PERSONAL_PRONOUN)
    }

    pub fn is_misc(self) -> bool {
        self.contains(Class::MISC)
    }
    pub fn is_proper(self) -> bool {
        self.contains(Class::PROPER)
    }
    pub fn is_noun(self) -> bool {
        self.intersects(Class::PRIMARY) && self.contains(Class::NOUN)
    }
    pub fn is_verb(self) -> bool {
        self.contains(Class::VERB)
    }
    pub fn is_adjective(self) -> bool {
        self.contains(Class::ADJECTIVE)
    }
    pub fn is_adverb(self) -> bool {
        self.contains(Class::ADVERB)
    }
    pub fn is_pronoun(self) -> bool {
        self.contains(Class::PRONOUN)
    }
    pub fn is_preposition(self) -> bool {
        self.contains(Class::PREPOSITION)
    }
    pub fn is_conjunction(self) -> bool {
        self.contains(Class::CONJUNCTION)
    }
    pub fn is_personal_pronoun(self) -> bool {
        self.contains(Class::PERSONAL_PRONOUN)
    }
    pub fn is_proper_surname(self) -> bool {
        self.contains(Class::PROPER_SURNAME)
    }
    pub fn is_proper_name(self) -> bool {
        self.contains(Class::PROPER_NAME)
    }
    pub fn is_proper_geo(self) -> bool {
        self.contains(Class::PROPER_GEO)
    }
    pub fn is_proper_secname(self) -> bool {
        self.contains(Class::PROPER_SECNAME)
    }

    /// Applies the dictionary quirk from §4.3: when a variant's class has
    /// both MISC and PROPER, drop MISC.
    pub fn normalize_from_dictionary(self) -> Class {
        if self.is_misc() && self.is_proper() {
            self & !Class::MISC
        } else {
            self
        }
    }
}

const CLASS_LABELS: &[(Class, &str)] = &[
    (Class::NOUN, "существ."),
    (Class::ADJECTIVE, "прилаг."),
    (Class::VERB, "глагол"),
    (Class::ADVERB, "наречие"),
    (Class::PRONOUN, "местоим."),
    (Class::PERSONAL_PRONOUN, "личн.местоим."),
    (Class::PREPOSITION, "предлог"),
    (Class::CONJUNCTION, "союз"),
    (Class::PROPER, "имя собств."),
    (Class::PROPER_SURNAME, "фамилия"),
    (Class::PROPER_NAME, "имя"),
    (Class::PROPER_SECNAME, "отчество"),
    (Class::PROPER_GEO, "географич."),
    (Class::MISC, "разное"),
];
render_parse!(Class, CLASS_LABELS);

macro_rules! simple_flag_set {
    ($name:ident, $repr:ty, $( $variant:ident = $bit:expr ),+ $(,)?) => {
        bitflags! {
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $name: $repr {
                $( const $variant = $bit; )+
            }
        }
    };
}

simple_flag_set!(Gender, u8, MASCULINE = 1 << 0, FEMININE = 1 << 1, NEUTER = 1 << 2);
const GENDER_LABELS: &[(Gender, &str)] = &[
    (Gender::MASCULINE, "муж."),
    (Gender::FEMININE, "жен."),
    (Gender::NEUTER, "средн."),
];
render_parse!(Gender, GENDER_LABELS);

simple_flag_set!(Number, u8, SINGULAR = 1 << 0, PLURAL = 1 << 1);
const NUMBER_LABELS: &[(Number, &str)] = &[
    (Number::SINGULAR, "единств."),
    (Number::PLURAL, "множеств."),
];
render_parse!(Number, NUMBER_LABELS);

simple_flag_set!(Person, u8, FIRST = 1 << 0, SECOND = 1 << 1, THIRD = 1 << 2);
const PERSON_LABELS: &[(Person, &str)] = &[
    (Person::FIRST, "1лицо"),
    (Person::SECOND, "2лицо"),
    (Person::THIRD, "3лицо"),
];
render_parse!(Person, PERSON_LABELS);

simple_flag_set!(Tense, u8, PAST = 1 << 0, PRESENT = 1 << 1, FUTURE = 1 << 2);
const TENSE_LABELS: &[(Tense, &str)] = &[
    (Tense::PAST, "прошедшее"),
    (Tense::PRESENT, "настоящее"),
    (Tense::FUTURE, "будущее"),
];
render_parse!(Tense, TENSE_LABELS);

simple_flag_set!(Aspect, u8, PERFECTIVE = 1 << 0, IMPERFECTIVE = 1 << 1);
const ASPECT_LABELS: &[(Aspect, &str)] = &[
    (Aspect::PERFECTIVE, "соверш."),
    (Aspect::IMPERFECTIVE, "несоверш."),
];
render_parse!(Aspect, ASPECT_LABELS);

simple_flag_set!(Voice, u8, ACTIVE = 1 << 0, PASSIVE = 1 << 1, MIDDLE = 1 << 2);
const VOICE_LABELS: &[(Voice, &str)] = &[
    (Voice::ACTIVE, "действит."),
    (Voice::PASSIVE, "страдат."),
    (Voice::MIDDLE, "средн."),
];
render_parse!(Voice, VOICE_LABELS);

simple_flag_set!(Mood, u8, INDICATIVE = 1 << 0, SUBJUNCTIVE = 1 << 1, IMPERATIVE = 1 << 2);
const MOOD_LABELS: &[(Mood, &str)] = &[
    (Mood::INDICATIVE, "изъявит."),
    (Mood::SUBJUNCTIVE, "условн."),
    (Mood::IMPERATIVE, "повелит."),
];
render_parse!(Mood, MOOD_LABELS);

simple_flag_set!(
    Form, u8,
    FINITE = 1 << 0,
    INFINITIVE = 1 << 1,
    PARTICIPLE = 1 << 2,
    GERUND = 1 << 3,
);
const FORM_LABELS: &[(Form, &str)] = &[
    (Form::FINITE, "finite"),
    (Form::GERUND, "gerund"),
    (Form::INFINITIVE, "infinitive"),
    (Form::PARTICIPLE, "participle"),
];
render_parse!(Form, FORM_LABELS);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Language: u8 {
        const RU = 1 << 0;
        const UA = 1 << 1;
        const BY = 1 << 2;
        const EN = 1 << 3;
        const IT = 1 << 4;
        const KZ = 1 << 5;
    }
}

impl Language {
    pub const CYRILLIC: Language = Language::RU
        .union(Language::UA)
        .union(Language::BY)
        .union(Language::KZ);

    pub fn is_cyrillic(self) -> bool {
        self.intersects(Self::CYRILLIC)
    }
}

const LANGUAGE_LABELS: &[(Language, &str)] = &[
    (Language::RU, "RU"),
    (Language::UA, "UA"),
    (Language::BY, "BY"),
    (Language::EN, "EN"),
    (Language::IT, "IT"),
    (Language::KZ, "KZ"),
];

impl Language {
    pub fn render(self) -> String {
        LANGUAGE_LABELS
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, label)| *label)
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn parse(s: &str) -> Language {
        let mut result = Language::empty();
        for part in s.to_uppercase().split(';') {
            for (bit, label) in LANGUAGE_LABELS {
                if *label == part {
                    result |= *bit;
                }
            }
        }
        result
    }
}

/// Tuple `(class, gender, number, case, language)` described in §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BaseMorphInfo {
    pub class: Class,
    pub gender: Gender,
    pub number: Number,
    pub case: Case,
    pub language: Language,
}
