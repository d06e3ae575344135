// ── Object identifiers ──
//
// Owned-or-static dotted OIDs. Catalog entries are `const` and borrow
// their arcs; identifiers parsed from agent responses own theirs.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A device identifier (SNMP object identifier).
///
/// Displays in the leading-dot form used by UPS-MIB documentation
/// (`.1.3.6.1.2.1.33.1.2.1.0`). Parsing accepts both dotted forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Cow<'static, [u64]>);

impl ObjectId {
    /// Build an identifier from a static arc list. Usable in `const` items.
    pub const fn from_static(arcs: &'static [u64]) -> Self {
        Self(Cow::Borrowed(arcs))
    }

    /// Build an identifier from owned arcs.
    pub fn from_arcs(arcs: Vec<u64>) -> Self {
        Self(Cow::Owned(arcs))
    }

    pub fn arcs(&self) -> &[u64] {
        &self.0
    }

    /// `true` if `self` lies within the subtree rooted at `root`
    /// (a strict descendant, not `root` itself).
    pub fn is_under(&self, root: &ObjectId) -> bool {
        self.0.len() > root.0.len() && self.0.starts_with(&root.0)
    }

    /// Append arcs, producing a new identifier (e.g. a table column + index).
    pub fn child(&self, suffix: &[u64]) -> Self {
        let mut arcs = self.0.to_vec();
        arcs.extend_from_slice(suffix);
        Self::from_arcs(arcs)
    }

    /// Convert into the `snmp2` representation for the wire.
    pub(crate) fn to_snmp(&self) -> Result<snmp2::Oid<'static>, Error> {
        snmp2::Oid::from(self.arcs()).map_err(|e| Error::InvalidOid {
            oid: self.to_string(),
            reason: format!("{e:?}"),
        })
    }

    /// Copy an identifier out of an `snmp2` response.
    pub(crate) fn from_snmp(oid: &snmp2::Oid<'_>) -> Result<Self, Error> {
        oid.to_string().parse()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arc in self.0.iter() {
            write!(f, ".{arc}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let arcs = trimmed
            .split('.')
            .filter(|p| !p.is_empty())
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidOid {
                oid: trimmed.to_owned(),
                reason: e.to_string(),
            })?;

        if arcs.len() < 2 {
            return Err(Error::InvalidOid {
                oid: trimmed.to_owned(),
                reason: "an identifier needs at least two arcs".into(),
            });
        }
        Ok(Self::from_arcs(arcs))
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BATTERY_STATUS: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 2, 1, 0]);

    #[test]
    fn parses_leading_dot_form() {
        let oid: ObjectId = ".1.3.6.1.2.1.33.1.2.1.0".parse().unwrap();
        assert_eq!(oid, BATTERY_STATUS);
    }

    #[test]
    fn parses_bare_form() {
        let oid: ObjectId = "1.3.6.1.2.1.33.1.2.1.0".parse().unwrap();
        assert_eq!(oid, BATTERY_STATUS);
    }

    #[test]
    fn displays_with_leading_dot() {
        assert_eq!(BATTERY_STATUS.to_string(), ".1.3.6.1.2.1.33.1.2.1.0");
    }

    #[test]
    fn rejects_garbage() {
        assert!("1.3.six.1".parse::<ObjectId>().is_err());
        assert!("1".parse::<ObjectId>().is_err());
        assert!("".parse::<ObjectId>().is_err());
    }

    #[test]
    fn subtree_membership_is_strict() {
        let root: ObjectId = ".1.3.6.1.2.1.33.1.6.2".parse().unwrap();
        let row = root.child(&[1, 2, 1]);
        assert!(row.is_under(&root));
        assert!(!root.is_under(&root));
        assert!(!BATTERY_STATUS.is_under(&root));
    }
}
