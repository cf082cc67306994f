//! Part-of-speech tag normalization
//!
//! Maps fine-grained corpus tags (Brown, and the Penn Treebank tags that
//! share its shapes) onto the coarse universal tagset.

use serde::{Deserialize, Serialize};

/// Universal part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversalTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Numeral,
    Conjunction,
    Particle,
    Punctuation,
    Other,
}

impl UniversalTag {
    /// Tag string as written in the universal tagset
    pub fn as_str(&self) -> &'static str {
        match self {
            UniversalTag::Noun => "NOUN",
            UniversalTag::Verb => "VERB",
            UniversalTag::Adjective => "ADJ",
            UniversalTag::Adverb => "ADV",
            UniversalTag::Pronoun => "PRON",
            UniversalTag::Determiner => "DET",
            UniversalTag::Adposition => "ADP",
            UniversalTag::Numeral => "NUM",
            UniversalTag::Conjunction => "CONJ",
            UniversalTag::Particle => "PRT",
            UniversalTag::Punctuation => ".",
            UniversalTag::Other => "X",
        }
    }

    /// Parse a tag already written in the universal tagset
    pub fn from_universal(tag: &str) -> Option<Self> {
        let tag = match tag {
            "NOUN" => UniversalTag::Noun,
            "VERB" => UniversalTag::Verb,
            "ADJ" => UniversalTag::Adjective,
            "ADV" => UniversalTag::Adverb,
            "PRON" => UniversalTag::Pronoun,
            "DET" => UniversalTag::Determiner,
            "ADP" => UniversalTag::Adposition,
            "NUM" => UniversalTag::Numeral,
            "CONJ" => UniversalTag::Conjunction,
            "PRT" => UniversalTag::Particle,
            "." => UniversalTag::Punctuation,
            "X" => UniversalTag::Other,
            _ => return None,
        };
        Some(tag)
    }

    /// Map a Brown-style tag onto the universal tagset.
    ///
    /// Headline/title/cited markers (`-HL`, `-TL`, `-NC`) and negation stars
    /// are ignored, contracted tags (`PPS+BEZ`) use their first part and
    /// foreign words (`FW-...`) become `X`. Unrecognized tags map to `X`.
    pub fn from_brown(tag: &str) -> Self {
        let upper = tag.trim().to_uppercase();
        if let Some(tag) = Self::from_universal(&upper) {
            return tag;
        }
        if upper == "*" {
            return UniversalTag::Adverb;
        }
        if upper.starts_with("FW-") {
            return UniversalTag::Other;
        }

        let mut base = upper.split('+').next().unwrap_or("");
        loop {
            let stripped = base
                .strip_suffix("-HL")
                .or_else(|| base.strip_suffix("-TL"))
                .or_else(|| base.strip_suffix("-NC"));
            match stripped {
                Some(rest) => base = rest,
                None => break,
            }
        }
        let base = base.trim_end_matches('*');

        match base {
            "." | "," | ":" | ";" | "(" | ")" | "--" | "''" | "``" | "'" => {
                UniversalTag::Punctuation
            }
            "AT" | "ABN" | "ABX" | "ABL" | "AP" | "APS" | "EX" | "WDT" | "PDT" => {
                UniversalTag::Determiner
            }
            "CC" | "CS" => UniversalTag::Conjunction,
            "CD" | "OD" => UniversalTag::Numeral,
            "IN" => UniversalTag::Adposition,
            "TO" | "RP" | "POS" => UniversalTag::Particle,
            "MD" => UniversalTag::Verb,
            "QL" | "QLP" | "WQL" | "WRB" | "RN" => UniversalTag::Adverb,
            "UH" | "NIL" | "SYM" | "LS" | "" => UniversalTag::Other,
            b if b.starts_with("DT") => UniversalTag::Determiner,
            b if b.starts_with("RB") => UniversalTag::Adverb,
            b if b.starts_with("JJ") => UniversalTag::Adjective,
            b if b.starts_with("NN") || b.starts_with("NP") || b.starts_with("NR") => {
                UniversalTag::Noun
            }
            b if b.starts_with("PP")
                || b.starts_with("PRP")
                || b.starts_with("WP")
                || b.starts_with("PN") =>
            {
                UniversalTag::Pronoun
            }
            b if b.starts_with("VB")
                || b.starts_with("BE")
                || b.starts_with("DO")
                || b.starts_with("HV") =>
            {
                UniversalTag::Verb
            }
            _ => UniversalTag::Other,
        }
    }
}

/// Normalize a raw corpus tag: uppercased, and mapped to the universal
/// tagset when `use_universal` is set
pub fn normalize_tag(raw: &str, use_universal: bool) -> String {
    if use_universal {
        UniversalTag::from_brown(raw).as_str().to_string()
    } else {
        raw.trim().to_uppercase()
    }
}
