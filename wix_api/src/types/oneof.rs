//! Support for Wix "oneof" field groups.
//!
//! On the wire a oneof is a set of sibling optional fields of which at most
//! one may be populated. The public types model each group as an enum; the
//! private `*Wire` structs next to them flatten it back out.

use std::fmt;

/// Raised when a oneof group that requires a member has none, or has more
/// than one. `fields` lists the populated members and is empty in the first
/// case.
#[derive(Debug, Clone, PartialEq)]
pub struct OneofConflict {
    pub group: &'static str,
    pub fields: Vec<&'static str>,
}

impl OneofConflict {
    pub(crate) fn missing(group: &'static str) -> Self {
        Self {
            group,
            fields: Vec::new(),
        }
    }
}

impl fmt::Display for OneofConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "oneof `{}` has no recognised member set", self.group);
        }
        write!(
            f,
            "oneof `{}` has more than one member set: {}",
            self.group,
            self.fields.join(", ")
        )
    }
}

impl std::error::Error for OneofConflict {}

/// Picks the single populated member of a oneof group.
///
/// Returns `Ok(None)` when no member is set.
pub(crate) fn exclusive<T>(
    group: &'static str,
    members: Vec<(&'static str, Option<T>)>,
) -> Result<Option<T>, OneofConflict> {
    let mut chosen = None;
    let mut set = Vec::new();
    for (name, value) in members {
        if let Some(value) = value {
            set.push(name);
            if chosen.is_none() {
                chosen = Some(value);
            }
        }
    }
    if set.len() > 1 {
        return Err(OneofConflict { group, fields: set });
    }
    Ok(chosen)
}
