//! Agency selection value object
//!
//! A flag set over the two transit agencies served by the Transloc API:
//! the UChicago shuttle lines and the CTA bus lines.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::AgencySet;
//!
//! let both = AgencySet::UCHICAGO | AgencySet::CTA;
//! assert_eq!(both, AgencySet::ALL);
//! assert_eq!(both.fragment(), "agencies=104,100");
//!
//! // Out-of-range raw values are representable but flagged
//! assert!(!AgencySet::from_raw(4).is_valid());
//! ```

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Set of transit agencies a query targets
///
/// Backed by a raw bitset. Construction from a raw value never fails;
/// use [`AgencySet::is_valid`] to detect values outside the known bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgencySet(i32);

impl AgencySet {
    /// No agency
    pub const NONE: Self = Self(0);
    /// UChicago shuttle lines
    pub const UCHICAGO: Self = Self(1);
    /// CTA bus lines
    pub const CTA: Self = Self(2);
    /// Both agencies
    pub const ALL: Self = Self(Self::UCHICAGO.0 | Self::CTA.0);

    /// Each single agency, in index order. Not to be confused with [`AgencySet::ALL`].
    pub const EACH_SINGLE: [Self; 2] = [Self::UCHICAGO, Self::CTA];

    /// Order in which ids and names are listed
    const LISTING_ORDER: [Self; 2] = [Self::CTA, Self::UCHICAGO];

    /// Upstream agency id for UChicago
    pub const UCHICAGO_AGENCY_ID: u16 = 100;
    /// Upstream agency id for CTA
    pub const CTA_AGENCY_ID: u16 = 104;

    /// Wrap a raw bitset value
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw bitset value
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether no agency bit is set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Add the agencies of `other` to this set
    pub fn insert(&mut self, other: Self) {
        *self = self.union(other);
    }

    /// Remove the agencies of `other` from this set
    pub fn remove(&mut self, other: Self) {
        *self = self.difference(other);
    }

    /// Whether only known agency bits are set
    ///
    /// Holds exactly for raw values in `0..=3`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.difference(Self::ALL).is_empty()
    }

    /// Whether this set refers to one and only one agency
    #[must_use]
    pub const fn is_singular(self) -> bool {
        self.0 == Self::UCHICAGO.0 || self.0 == Self::CTA.0
    }

    #[track_caller]
    fn assert_singular(self) {
        assert!(
            self.is_singular(),
            "agency set ({}) isn't a single agency",
            self.0
        );
    }

    /// The upstream agency id (`100` or `104`)
    ///
    /// # Panics
    ///
    /// Panics if this set is not a single agency.
    #[must_use]
    #[track_caller]
    pub fn agency_id(self) -> u16 {
        self.assert_singular();
        if self == Self::UCHICAGO {
            Self::UCHICAGO_AGENCY_ID
        } else {
            Self::CTA_AGENCY_ID
        }
    }

    /// The upstream agency id as a string
    ///
    /// # Panics
    ///
    /// Panics if this set is not a single agency.
    #[must_use]
    #[track_caller]
    pub fn id(self) -> String {
        self.agency_id().to_string()
    }

    /// Human-readable agency name
    ///
    /// # Panics
    ///
    /// Panics if this set is not a single agency.
    #[must_use]
    #[track_caller]
    pub fn name(self) -> &'static str {
        self.assert_singular();
        if self == Self::UCHICAGO { "UChicago" } else { "CTA" }
    }

    /// Position of the agency in [`AgencySet::EACH_SINGLE`], or `None` for
    /// anything other than a single agency
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self.0 {
            1 => Some(0),
            2 => Some(1),
            _ => None,
        }
    }

    /// Single agency at `index` in [`AgencySet::EACH_SINGLE`]
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[track_caller]
    pub fn from_index(index: usize) -> Self {
        assert!(
            index < Self::EACH_SINGLE.len(),
            "attempt to create an indexed agency with out of bounds {index}"
        );
        Self::EACH_SINGLE[index]
    }

    /// Single agency for a raw bitset value of exactly one agency
    ///
    /// Returns `None` for anything but the UChicago or CTA bit alone.
    #[must_use]
    pub const fn try_single(raw: i32) -> Option<Self> {
        let agencies = Self(raw);
        if agencies.is_singular() {
            Some(agencies)
        } else {
            None
        }
    }

    /// Single agency for an upstream agency id, if known
    #[must_use]
    pub const fn try_from_agency_id(agency_id: u16) -> Option<Self> {
        match agency_id {
            Self::UCHICAGO_AGENCY_ID => Some(Self::UCHICAGO),
            Self::CTA_AGENCY_ID => Some(Self::CTA),
            _ => None,
        }
    }

    /// Single agency for an upstream agency id
    ///
    /// # Panics
    ///
    /// Panics on an id the client does not know about; that is a
    /// configuration fault, not a recoverable condition.
    #[must_use]
    #[track_caller]
    #[allow(clippy::panic)]
    pub fn from_agency_id(agency_id: u16) -> Self {
        match Self::try_from_agency_id(agency_id) {
            Some(agency) => agency,
            None => panic!("attempt to initialize agency with unknown transloc id {agency_id}"),
        }
    }

    /// Contained single agencies, CTA first
    pub fn singles(self) -> impl Iterator<Item = Self> {
        Self::LISTING_ORDER
            .into_iter()
            .filter(move |single| self.contains(*single))
    }

    /// Upstream ids of every contained agency
    #[must_use]
    pub fn ids(self) -> Vec<String> {
        self.singles().map(Self::id).collect()
    }

    /// Names of every contained agency
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.singles().map(Self::name).collect()
    }

    /// Comma-separated upstream ids, e.g. `104,100`
    #[must_use]
    pub fn number(self) -> String {
        self.ids().join(",")
    }

    /// Query fragment restricting a request to these agencies
    #[must_use]
    pub fn fragment(self) -> String {
        format!("agencies={}", self.number())
    }
}

impl fmt::Display for AgencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "invalid({})", self.0);
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&self.names().join(", "))
    }
}

impl FromStr for AgencySet {
    type Err = DomainError;

    /// Parse a comma-separated list of agency names or upstream ids
    ///
    /// Accepts `uchicago`, `cta`, `all`, `none`, `100` and `104`,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut agencies = Self::NONE;
        for token in s.split(',').map(str::trim) {
            let parsed = match token.to_lowercase().as_str() {
                "uchicago" | "uc" | "100" => Self::UCHICAGO,
                "cta" | "104" => Self::CTA,
                "all" | "both" => Self::ALL,
                "none" => Self::NONE,
                _ => return Err(DomainError::InvalidAgency(token.to_string())),
            };
            agencies |= parsed;
        }
        Ok(agencies)
    }
}

impl BitOr for AgencySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for AgencySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl BitAnd for AgencySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitAndAssign for AgencySet {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl Sub for AgencySet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl SubAssign for AgencySet {
    fn sub_assign(&mut self, rhs: Self) {
        self.remove(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EACH_CASE: [AgencySet; 4] = [
        AgencySet::UCHICAGO,
        AgencySet::CTA,
        AgencySet::ALL,
        AgencySet::NONE,
    ];

    #[test]
    fn raw_values() {
        assert_eq!(AgencySet::NONE.raw(), 0);
        assert_eq!(AgencySet::UCHICAGO.raw(), 1);
        assert_eq!(AgencySet::CTA.raw(), 2);
        assert_eq!(AgencySet::ALL.raw(), 3);
    }

    #[test]
    fn distinct_cases_are_unequal() {
        for a in EACH_CASE {
            for b in EACH_CASE {
                assert_eq!(a == b, a.raw() == b.raw());
            }
        }
    }

    #[test]
    fn from_raw_matches_constants() {
        for (agencies, raw) in EACH_CASE.into_iter().zip([1, 2, 3, 0]) {
            assert_eq!(AgencySet::from_raw(raw), agencies);
        }
    }

    #[test]
    fn all_is_union_of_singles() {
        assert_eq!(AgencySet::ALL, AgencySet::CTA | AgencySet::UCHICAGO);
    }

    #[test]
    fn insert_and_intersect() {
        let mut sum = AgencySet::NONE;
        sum.insert(AgencySet::CTA);
        assert_eq!(sum, AgencySet::CTA);
        sum.insert(AgencySet::UCHICAGO);
        assert_eq!(sum, AgencySet::ALL);

        sum &= AgencySet::CTA;
        assert_eq!(sum, AgencySet::CTA);

        let mut all = AgencySet::ALL;
        all &= AgencySet::NONE;
        assert_eq!(all, AgencySet::NONE);
    }

    #[test]
    fn remove_and_subtract() {
        let mut agencies = AgencySet::ALL;
        agencies.remove(AgencySet::UCHICAGO);
        assert_eq!(agencies, AgencySet::CTA);
        agencies -= AgencySet::CTA;
        assert!(agencies.is_empty());
    }

    #[test]
    fn validity_follows_raw_range() {
        for raw in -1..=5 {
            assert_eq!(
                AgencySet::from_raw(raw).is_valid(),
                (0..=3).contains(&raw),
                "raw {raw}"
            );
        }
    }

    #[test]
    fn singular_only_for_single_bits() {
        assert!(AgencySet::UCHICAGO.is_singular());
        assert!(AgencySet::CTA.is_singular());
        assert!(!AgencySet::NONE.is_singular());
        assert!(!AgencySet::ALL.is_singular());
        // out-of-range values are never singular
        assert!(!AgencySet::from_raw(4).is_singular());
        assert!(!AgencySet::from_raw(-2).is_singular());
    }

    #[test]
    fn upstream_ids_and_names() {
        assert_eq!(AgencySet::UCHICAGO.agency_id(), 100);
        assert_eq!(AgencySet::CTA.agency_id(), 104);
        assert_eq!(AgencySet::UCHICAGO.id(), "100");
        assert_eq!(AgencySet::CTA.name(), "CTA");
        assert_eq!(AgencySet::UCHICAGO.name(), "UChicago");
    }

    #[test]
    fn listing_is_cta_first() {
        assert_eq!(AgencySet::ALL.ids(), vec!["104", "100"]);
        assert_eq!(AgencySet::ALL.names(), vec!["CTA", "UChicago"]);
        assert_eq!(AgencySet::ALL.number(), "104,100");
        assert_eq!(AgencySet::UCHICAGO.fragment(), "agencies=100");
        assert!(AgencySet::NONE.ids().is_empty());
    }

    #[test]
    fn try_single_only_accepts_one_agency() {
        assert_eq!(AgencySet::try_single(1), Some(AgencySet::UCHICAGO));
        assert_eq!(AgencySet::try_single(2), Some(AgencySet::CTA));
        for raw in [0, 3, 4, -1, i32::MAX] {
            assert_eq!(AgencySet::try_single(raw), None);
        }
    }

    #[test]
    fn from_agency_id_known_values() {
        assert_eq!(AgencySet::from_agency_id(100), AgencySet::UCHICAGO);
        assert_eq!(AgencySet::from_agency_id(104), AgencySet::CTA);
        assert_eq!(AgencySet::try_from_agency_id(42), None);
    }

    #[test]
    #[should_panic(expected = "unknown transloc id 42")]
    fn from_agency_id_unknown_panics() {
        let _ = AgencySet::from_agency_id(42);
    }

    #[test]
    #[should_panic(expected = "isn't a single agency")]
    fn agency_id_of_all_panics() {
        let _ = AgencySet::ALL.agency_id();
    }

    #[test]
    #[should_panic(expected = "isn't a single agency")]
    fn name_of_out_of_range_panics() {
        let _ = AgencySet::from_raw(5).name();
    }

    #[test]
    fn index_round_trip() {
        for single in AgencySet::EACH_SINGLE {
            let index = single.index().unwrap();
            assert_eq!(AgencySet::from_index(index), single);
        }
        assert_eq!(AgencySet::ALL.index(), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds 2")]
    fn from_index_out_of_bounds_panics() {
        let _ = AgencySet::from_index(2);
    }

    #[test]
    fn display() {
        assert_eq!(AgencySet::ALL.to_string(), "CTA, UChicago");
        assert_eq!(AgencySet::NONE.to_string(), "none");
        assert_eq!(AgencySet::from_raw(9).to_string(), "invalid(9)");
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("cta".parse::<AgencySet>().unwrap(), AgencySet::CTA);
        assert_eq!("UChicago".parse::<AgencySet>().unwrap(), AgencySet::UCHICAGO);
        assert_eq!("cta, 100".parse::<AgencySet>().unwrap(), AgencySet::ALL);
        assert_eq!("all".parse::<AgencySet>().unwrap(), AgencySet::ALL);
        assert_eq!("none".parse::<AgencySet>().unwrap(), AgencySet::NONE);
    }

    #[test]
    fn parse_unknown_agency_fails() {
        let err = "metra".parse::<AgencySet>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid agency: metra");
    }

    #[test]
    fn serde_as_raw_integer() {
        let json = serde_json::to_string(&AgencySet::ALL).unwrap();
        assert_eq!(json, "3");
        let parsed: AgencySet = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.raw(), 7);
        assert!(!parsed.is_valid());
    }
}
