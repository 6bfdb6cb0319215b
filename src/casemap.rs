//! IRC case-mapping.
//!
//! Servers advertise how nicknames and channel names compare through the
//! `CASEMAPPING` ISUPPORT token. Until a server says otherwise, names are
//! compared exactly.

/// Case-mapping advertised by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseMapping {
    /// Byte-for-byte comparison (no `CASEMAPPING` advertised).
    #[default]
    Exact,
    /// `ascii`: only `A-Z` fold to `a-z`.
    Ascii,
    /// `rfc1459`: ASCII plus `[]\~` fold to `{}|^`.
    Rfc1459,
    /// `strict-rfc1459`: ASCII plus `[]\` fold to `{}|`.
    StrictRfc1459,
}

impl CaseMapping {
    /// Parse an ISUPPORT `CASEMAPPING` value. Unknown values compare exactly.
    pub fn from_isupport(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "ascii" => CaseMapping::Ascii,
            "rfc1459" => CaseMapping::Rfc1459,
            "strict-rfc1459" => CaseMapping::StrictRfc1459,
            _ => CaseMapping::Exact,
        }
    }

    fn fold_char(self, c: char) -> char {
        match (self, c) {
            (CaseMapping::Exact, _) => c,
            (_, 'A'..='Z') => c.to_ascii_lowercase(),
            (CaseMapping::Rfc1459 | CaseMapping::StrictRfc1459, '[') => '{',
            (CaseMapping::Rfc1459 | CaseMapping::StrictRfc1459, ']') => '}',
            (CaseMapping::Rfc1459 | CaseMapping::StrictRfc1459, '\\') => '|',
            (CaseMapping::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Canonical form of `s` under this mapping.
    pub fn fold(self, s: &str) -> String {
        s.chars().map(|c| self.fold_char(c)).collect()
    }

    /// Compare two names under this mapping.
    pub fn equal(self, a: &str, b: &str) -> bool {
        a.chars().count() == b.chars().count()
            && a
                .chars()
                .zip(b.chars())
                .all(|(ca, cb)| self.fold_char(ca) == self.fold_char(cb))
    }
}
