//! Derivation paths within a hierarchical keyspace.
//!
//! A path is a chain of immutable, reference-counted nodes: extending a path
//! shares every ancestor node with the source, so sibling paths hold a single
//! copy of their common prefix. A rooted path (spelled with a leading `m`) is
//! anchored at a master key; a relative path (spelled with a leading `/`) is
//! a suffix applied to whatever key the caller already holds.

use crate::{ChildNumber, Error, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

/// Marker spelled before the segments of a rooted path.
const PREFIX: &str = "m";

#[derive(Debug)]
struct PathNode {
    index: ChildNumber,
    parent: Option<Arc<PathNode>>,
}

/// Derivation paths within a hierarchical keyspace.
#[derive(Clone, Debug)]
pub struct DerivationPath {
    tip: Option<Arc<PathNode>>,
    rooted: bool,
}

impl DerivationPath {
    /// The rooted empty path, `m`.
    pub fn master() -> Self {
        DerivationPath { tip: None, rooted: true }
    }

    /// The relative empty path, usable only as a suffix.
    pub fn relative() -> Self {
        DerivationPath { tip: None, rooted: false }
    }

    /// Extend by one segment. Ancestor nodes are shared with `self`, not
    /// copied.
    pub fn child(&self, child_number: ChildNumber) -> Self {
        DerivationPath {
            tip: Some(Arc::new(PathNode { index: child_number, parent: self.tip.clone() })),
            rooted: self.rooted,
        }
    }

    /// Drop the deepest segment.
    ///
    /// Returns `None` if the path has no segments.
    pub fn parent(&self) -> Option<Self> {
        self.tip.as_ref().map(|node| DerivationPath { tip: node.parent.clone(), rooted: self.rooted })
    }

    /// Push a [`ChildNumber`] onto an existing derivation path.
    pub fn push(&mut self, child_number: ChildNumber) {
        *self = self.child(child_number);
    }

    /// Whether this path is anchored at a master key.
    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    /// Is this derivation path empty? (i.e. the root)
    pub fn is_empty(&self) -> bool {
        self.tip.is_none()
    }

    /// Number of segments between the deepest node and the (possibly
    /// implicit) root.
    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut node = self.tip.as_deref();
        while let Some(current) = node {
            len += 1;
            node = current.parent.as_deref();
        }
        len
    }

    /// Iterate over the [`ChildNumber`] values in this derivation path,
    /// root-most segment first.
    pub fn iter(&self) -> impl Iterator<Item = ChildNumber> {
        let mut segments = Vec::with_capacity(self.len());
        let mut node = self.tip.as_deref();
        while let Some(current) = node {
            segments.push(current.index);
            node = current.parent.as_deref();
        }
        segments.into_iter().rev()
    }

    #[cfg(test)]
    fn shares_tip_with(&self, other: &Self) -> bool {
        match (&self.tip, &other.tip) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for DerivationPath {
    fn eq(&self, other: &Self) -> bool {
        if self.rooted != other.rooted {
            return false;
        }
        let mut a = &self.tip;
        let mut b = &other.tip;
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(left), Some(right)) => {
                    // identical nodes imply identical remaining chains
                    if Arc::ptr_eq(left, right) {
                        return true;
                    }
                    if left.index != right.index {
                        return false;
                    }
                    a = &left.parent;
                    b = &right.parent;
                }
                _ => return false,
            }
        }
    }
}

impl Eq for DerivationPath {}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::master()
    }
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooted {
            f.write_str(PREFIX)?;
        }
        for child_number in self.iter() {
            write!(f, "/{child_number}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<DerivationPath> {
        let (base, segments) = if let Some(rest) = path.strip_prefix(PREFIX) {
            (DerivationPath::master(), rest)
        } else if path.starts_with('/') {
            (DerivationPath::relative(), path)
        } else {
            return Err(Error::Path(path.to_string()));
        };

        // `m` alone is the empty rooted path
        if segments.is_empty() {
            return Ok(base);
        }
        let Some(segments) = segments.strip_prefix('/') else {
            return Err(Error::Path(path.to_string()));
        };

        segments.split('/').try_fold(base, |acc, segment| Ok(acc.child(segment.parse()?)))
    }
}

impl Extend<ChildNumber> for DerivationPath {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = ChildNumber>,
    {
        for child_number in iter {
            self.push(child_number);
        }
    }
}

impl FromIterator<ChildNumber> for DerivationPath {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = ChildNumber>,
    {
        let mut path = DerivationPath::relative();
        path.extend(iter);
        path
    }
}

impl IntoIterator for DerivationPath {
    type Item = ChildNumber;
    type IntoIter = std::vec::IntoIter<ChildNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D>(deserializer: D) -> std::result::Result<DerivationPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DerivationPathVisitor;
        impl de::Visitor<'_> for DerivationPathVisitor {
            type Value = DerivationPath;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a derivation path string such as `m/44'/0'`")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                DerivationPath::from_str(value).map_err(|err| de::Error::custom(err.to_string()))
            }
        }

        deserializer.deserialize_str(DerivationPathVisitor)
    }
}

impl Serialize for DerivationPath {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
