use std::fmt;
use std::str::FromStr;

use crate::model::EntityKind;

/// A typed drag/drop identifier.
///
/// On the wire it is the raw id with a kind prefix: `list-{id}`,
/// `sublist-{id}` or `sticker-{id}`. Parsed once where events enter the
/// engine; everything past that point works with the variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragTarget {
    List(String),
    SubList(String),
    Sticker(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a drag target: {0:?} (expected list-, sublist- or sticker- prefix)")]
pub struct TargetParseError(pub String);

impl DragTarget {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            EntityKind::List => DragTarget::List(id),
            EntityKind::SubList => DragTarget::SubList(id),
            EntityKind::Sticker => DragTarget::Sticker(id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            DragTarget::List(_) => EntityKind::List,
            DragTarget::SubList(_) => EntityKind::SubList,
            DragTarget::Sticker(_) => EntityKind::Sticker,
        }
    }

    /// The raw entity id, without the prefix
    pub fn id(&self) -> &str {
        match self {
            DragTarget::List(id) | DragTarget::SubList(id) | DragTarget::Sticker(id) => id,
        }
    }

    fn prefix(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::List => "list-",
            EntityKind::SubList => "sublist-",
            EntityKind::Sticker => "sticker-",
        }
    }
}

impl fmt::Display for DragTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DragTarget::prefix(self.kind()), self.id())
    }
}

impl FromStr for DragTarget {
    type Err = TargetParseError;

    /// Only the first prefix is stripped, so raw ids may themselves start
    /// with a kind word (`list-list-123` is the list `list-123`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for kind in [EntityKind::SubList, EntityKind::Sticker, EntityKind::List] {
            if let Some(rest) = s.strip_prefix(DragTarget::prefix(kind)) {
                if rest.is_empty() {
                    break;
                }
                return Ok(DragTarget::new(kind, rest));
            }
        }
        Err(TargetParseError(s.to_string()))
    }
}
