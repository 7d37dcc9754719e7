use crate::model::{Board, EntityKind, List, Sticker, SubList};

/// Error type for structural operations on the board tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("path not found: {0}")]
    PathNotFound(String),
    #[error("a {child} cannot be placed under {parent}")]
    LevelMismatch {
        child: EntityKind,
        parent: &'static str,
    },
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl HierarchyError {
    /// Stale-path failures are expected during fast gestures and are
    /// treated as no-ops by the drag engine.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HierarchyError::PathNotFound(_))
    }
}

/// Address of a container: the board root, a list, or a sub-list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentPath {
    Board,
    List { list: String },
    SubList { list: String, sub_list: String },
}

/// Address of an entity: the chain of ids from the root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    List {
        list: String,
    },
    SubList {
        list: String,
        sub_list: String,
    },
    Sticker {
        list: String,
        sub_list: String,
        sticker: String,
    },
}

/// An owned entity being inserted into or removed from the tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    List(List),
    SubList(SubList),
    Sticker(Sticker),
}

impl ParentPath {
    /// Kind of entity this container holds
    pub fn child_kind(&self) -> EntityKind {
        match self {
            ParentPath::Board => EntityKind::List,
            ParentPath::List { .. } => EntityKind::SubList,
            ParentPath::SubList { .. } => EntityKind::Sticker,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ParentPath::Board => "the board",
            ParentPath::List { .. } => "a list",
            ParentPath::SubList { .. } => "a sub-list",
        }
    }
}

impl NodePath {
    pub fn kind(&self) -> EntityKind {
        match self {
            NodePath::List { .. } => EntityKind::List,
            NodePath::SubList { .. } => EntityKind::SubList,
            NodePath::Sticker { .. } => EntityKind::Sticker,
        }
    }

    /// The container this entity lives in
    pub fn parent(&self) -> ParentPath {
        match self {
            NodePath::List { .. } => ParentPath::Board,
            NodePath::SubList { list, .. } => ParentPath::List { list: list.clone() },
            NodePath::Sticker { list, sub_list, .. } => ParentPath::SubList {
                list: list.clone(),
                sub_list: sub_list.clone(),
            },
        }
    }

    /// The entity's own id (last path segment)
    pub fn id(&self) -> &str {
        match self {
            NodePath::List { list } => list,
            NodePath::SubList { sub_list, .. } => sub_list,
            NodePath::Sticker { sticker, .. } => sticker,
        }
    }
}

impl Node {
    pub fn kind(&self) -> EntityKind {
        match self {
            Node::List(_) => EntityKind::List,
            Node::SubList(_) => EntityKind::SubList,
            Node::Sticker(_) => EntityKind::Sticker,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Node::List(l) => &l.id,
            Node::SubList(s) => &s.id,
            Node::Sticker(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::List(l) => &l.name,
            Node::SubList(s) => &s.name,
            Node::Sticker(s) => &s.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Pure operations: take a board, return a new one
// ---------------------------------------------------------------------------

/// Insert `node` into the container at `parent`, at `at` clamped to
/// `[0, len]`.
pub fn insert(
    board: &Board,
    parent: &ParentPath,
    node: Node,
    at: usize,
) -> Result<Board, HierarchyError> {
    let mut next = board.clone();
    insert_in(&mut next, parent, node, at)?;
    Ok(next)
}

/// Remove the entity at `path` (with all its descendants). Returns the new
/// board and the removed entity.
pub fn remove(board: &Board, path: &NodePath) -> Result<(Board, Node), HierarchyError> {
    let mut next = board.clone();
    let (node, _) = remove_in(&mut next, path)?;
    Ok((next, node))
}

/// Reorder inside one container by extracting the entity at `from` and
/// reinserting it at `to`. Siblings shift; this is not a pairwise swap.
pub fn move_within_parent(
    board: &Board,
    parent: &ParentPath,
    from: usize,
    to: usize,
) -> Result<Board, HierarchyError> {
    let mut next = board.clone();
    move_within_in(&mut next, parent, from, to)?;
    Ok(next)
}

/// Move an entity into another container of the same level, at
/// `dest_index` clamped to the destination length after removal.
pub fn move_across_parent(
    board: &Board,
    source: &NodePath,
    dest_parent: &ParentPath,
    dest_index: usize,
) -> Result<Board, HierarchyError> {
    let mut next = board.clone();
    move_across_in(&mut next, source, dest_parent, dest_index)?;
    Ok(next)
}

// ---------------------------------------------------------------------------
// In-place building blocks
// ---------------------------------------------------------------------------

enum Children<'a> {
    Lists(&'a mut Vec<List>),
    SubLists(&'a mut Vec<SubList>),
    Stickers(&'a mut Vec<Sticker>),
}

impl Children<'_> {
    fn len(&self) -> usize {
        match self {
            Children::Lists(v) => v.len(),
            Children::SubLists(v) => v.len(),
            Children::Stickers(v) => v.len(),
        }
    }
}

fn children_mut<'a>(
    board: &'a mut Board,
    parent: &ParentPath,
) -> Result<Children<'a>, HierarchyError> {
    match parent {
        ParentPath::Board => Ok(Children::Lists(&mut board.lists)),
        ParentPath::List { list } => {
            let l = board
                .find_list_mut(list)
                .ok_or_else(|| HierarchyError::PathNotFound(format!("list {}", list)))?;
            Ok(Children::SubLists(&mut l.sub_lists))
        }
        ParentPath::SubList { list, sub_list } => {
            let l = board
                .find_list_mut(list)
                .ok_or_else(|| HierarchyError::PathNotFound(format!("list {}", list)))?;
            let s = l.find_sub_list_mut(sub_list).ok_or_else(|| {
                HierarchyError::PathNotFound(format!("sub-list {} in list {}", sub_list, list))
            })?;
            Ok(Children::Stickers(&mut s.stickers))
        }
    }
}

pub(crate) fn insert_in(
    board: &mut Board,
    parent: &ParentPath,
    node: Node,
    at: usize,
) -> Result<usize, HierarchyError> {
    let level = parent.describe();
    let children = children_mut(board, parent)?;
    let at = at.min(children.len());
    match (children, node) {
        (Children::Lists(v), Node::List(l)) => v.insert(at, l),
        (Children::SubLists(v), Node::SubList(s)) => v.insert(at, s),
        (Children::Stickers(v), Node::Sticker(s)) => v.insert(at, s),
        (_, node) => {
            return Err(HierarchyError::LevelMismatch {
                child: node.kind(),
                parent: level,
            });
        }
    }
    Ok(at)
}

/// Remove the entity at `path`, returning it and the index it occupied.
pub(crate) fn remove_in(
    board: &mut Board,
    path: &NodePath,
) -> Result<(Node, usize), HierarchyError> {
    let id = path.id();
    let not_found = || HierarchyError::PathNotFound(format!("{} {}", path.kind(), id));
    match children_mut(board, &path.parent())? {
        Children::Lists(v) => {
            let idx = v.iter().position(|l| l.id == id).ok_or_else(not_found)?;
            Ok((Node::List(v.remove(idx)), idx))
        }
        Children::SubLists(v) => {
            let idx = v.iter().position(|s| s.id == id).ok_or_else(not_found)?;
            Ok((Node::SubList(v.remove(idx)), idx))
        }
        Children::Stickers(v) => {
            let idx = v.iter().position(|s| s.id == id).ok_or_else(not_found)?;
            Ok((Node::Sticker(v.remove(idx)), idx))
        }
    }
}

pub(crate) fn move_within_in(
    board: &mut Board,
    parent: &ParentPath,
    from: usize,
    to: usize,
) -> Result<(), HierarchyError> {
    match children_mut(board, parent)? {
        Children::Lists(v) => array_move(v, from, to),
        Children::SubLists(v) => array_move(v, from, to),
        Children::Stickers(v) => array_move(v, from, to),
    }
}

pub(crate) fn move_across_in(
    board: &mut Board,
    source: &NodePath,
    dest_parent: &ParentPath,
    dest_index: usize,
) -> Result<usize, HierarchyError> {
    if source.kind() == EntityKind::List || dest_parent.child_kind() != source.kind() {
        return Err(HierarchyError::LevelMismatch {
            child: source.kind(),
            parent: dest_parent.describe(),
        });
    }
    // Resolve the destination first so a stale target leaves the board intact.
    children_mut(board, dest_parent)?;
    let (node, _) = remove_in(board, source)?;
    insert_in(board, dest_parent, node, dest_index)
}

/// Extract the element at `from` and reinsert it at `to` (clamped to the
/// last position).
fn array_move<T>(v: &mut Vec<T>, from: usize, to: usize) -> Result<(), HierarchyError> {
    if from >= v.len() {
        return Err(HierarchyError::IndexOutOfRange {
            index: from,
            len: v.len(),
        });
    }
    let to = to.min(v.len() - 1);
    if from == to {
        return Ok(());
    }
    let item = v.remove(from);
    v.insert(to, item);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
