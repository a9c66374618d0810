//! The region tree.
//!
//! A [RegionTree] owns all of its nodes in a single arena. Nodes refer to
//! each other through [NodeId]s: the children map holds the ids of the nodes
//! a parent owns, and the parent link is a plain id as well, so ownership only
//! ever flows from the tree to its nodes.
//!
//! Trees are mutated in place by [RegionTree::insert] and
//! [RegionTree::load], which both take `&mut self`. Once a tree
//! is published through [Regions](crate::regions::Regions) it is only reachable
//! behind an `Arc` and can no longer be mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anybytes::Bytes;

use crate::segmentation::{IncorrectCode, Segmentation};

/// Index of a node in its [RegionTree].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    data: Bytes,
    parent: Option<NodeId>,
    depth: usize,
    children: BTreeMap<Box<str>, NodeId>,
}

impl Node {
    fn new(data: Bytes, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            data,
            parent,
            depth,
            children: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindError {
    /// The code does not end on a level boundary.
    IncorrectCode,
    /// The code is well formed but no region exists at that path.
    NotFound,
}

impl fmt::Display for FindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindError::IncorrectCode => write!(f, "region code incorrect"),
            FindError::NotFound => write!(f, "region not found"),
        }
    }
}

impl std::error::Error for FindError {}

impl From<IncorrectCode> for FindError {
    fn from(_: IncorrectCode) -> Self {
        FindError::IncorrectCode
    }
}

pub(crate) fn empty_bytes() -> Bytes {
    Bytes::from_source(Vec::<u8>::new())
}

/// A tree of regions keyed by fixed-width code segments.
///
/// The root stands for the global scope and carries its own payload.
#[derive(Debug, Clone)]
pub struct RegionTree {
    segmentation: Arc<Segmentation>,
    nodes: Vec<Node>,
}

impl RegionTree {
    pub fn new(segmentation: Arc<Segmentation>, root_data: Bytes) -> Self {
        Self {
            segmentation,
            nodes: vec![Node::new(root_data, None, 0)],
        }
    }

    /// Creates a tree whose root has an empty payload.
    pub fn with_segmentation(segmentation: Arc<Segmentation>) -> Self {
        Self::new(segmentation, empty_bytes())
    }

    /// A fresh, empty tree sharing this tree's segmentation and root payload.
    pub fn fresh(&self) -> Self {
        Self::new(self.segmentation.clone(), self.root().data().clone())
    }

    pub fn segmentation(&self) -> &Arc<Segmentation> {
        &self.segmentation
    }

    /// The number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Region<'_> {
        Region {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Region<'_>> {
        self.nodes.get(id.index())?;
        Some(Region { tree: self, id })
    }

    /// Sets the payload of the region at `code`, creating any missing
    /// regions along the path with empty payloads.
    ///
    /// A later insert for the same code replaces the earlier payload.
    pub fn insert(&mut self, code: &str, data: Bytes) -> Result<NodeId, IncorrectCode> {
        let id = self.path_to(code)?;
        self.set_data(id, data);
        Ok(id)
    }

    /// Walks the path for `code` from the root, creating missing nodes, and
    /// returns the terminal node.
    pub(crate) fn path_to(&mut self, code: &str) -> Result<NodeId, IncorrectCode> {
        let segmentation = self.segmentation.clone();
        let pieces = segmentation.decompose(code)?;

        let mut current = NodeId::ROOT;
        let mut depth = 0;
        for piece in pieces {
            depth += 1;
            let existing = self.nodes[current.index()].children.get(piece).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(Node::new(empty_bytes(), Some(current), depth));
                    self.nodes[current.index()]
                        .children
                        .insert(piece.into(), child);
                    child
                }
            };
        }
        Ok(current)
    }

    pub(crate) fn set_data(&mut self, id: NodeId, data: Bytes) {
        self.nodes[id.index()].data = data;
    }

    /// Resolves `code` to its region without modifying the tree.
    pub fn find(&self, code: &str) -> Result<Region<'_>, FindError> {
        let pieces = self.segmentation.decompose(code)?;

        let mut current = NodeId::ROOT;
        for piece in pieces {
            let Some(&child) = self.nodes[current.index()].children.get(piece) else {
                return Err(FindError::NotFound);
            };
            current = child;
        }
        Ok(Region {
            tree: self,
            id: current,
        })
    }
}

/// A borrowed view of one region in a [RegionTree].
#[derive(Clone, Copy)]
pub struct Region<'a> {
    tree: &'a RegionTree,
    id: NodeId,
}

impl<'a> Region<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The payload of the most recently loaded record for this region.
    pub fn data(&self) -> &'a Bytes {
        &self.node().data
    }

    /// The number of levels consumed to reach this region, zero for the root.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn parent(&self) -> Option<Region<'a>> {
        let parent = self.node().parent?;
        Some(Region {
            tree: self.tree,
            id: parent,
        })
    }

    pub fn child(&self, segment: &str) -> Option<Region<'a>> {
        let &id = self.node().children.get(segment)?;
        Some(Region {
            tree: self.tree,
            id,
        })
    }

    /// The direct sub-regions of this region in segment order.
    pub fn children(&self) -> impl Iterator<Item = (&'a str, Region<'a>)> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |(segment, &id)| (&**segment, Region { tree, id }))
    }

    /// The number of direct sub-regions.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }
}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("id", &self.id)
            .field("depth", &self.depth())
            .field("data", &String::from_utf8_lossy(self.data()))
            .field("children", &self.child_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Bytes {
        Bytes::from_source(s.as_bytes().to_vec())
    }

    fn tree() -> RegionTree {
        let seg = Segmentation::from_widths([
            ("continent", 1),
            ("country", 2),
            ("province", 2),
            ("city", 2),
            ("district", 2),
        ])
        .unwrap();
        RegionTree::new(Arc::new(seg), bytes("世界\tWorld"))
    }

    #[test]
    fn insert_creates_intermediate_regions() {
        let mut tree = tree();
        tree.insert("10101", bytes("北京")).unwrap();

        assert_eq!(tree.node_count(), 4);
        let country = tree.find("101").unwrap();
        assert!(country.data().is_empty());
        assert_eq!(country.depth(), 2);
        assert_eq!(&tree.find("10101").unwrap().data()[..], "北京".as_bytes());
    }

    #[test]
    fn insert_overwrites_payload() {
        let mut tree = tree();
        let first = tree.insert("101", bytes("China")).unwrap();
        let second = tree.insert("101", bytes("中国")).unwrap();

        assert_eq!(first, second);
        assert_eq!(&tree.find("101").unwrap().data()[..], "中国".as_bytes());
    }

    #[test]
    fn insert_rejects_incorrect_code() {
        let mut tree = tree();
        assert_eq!(tree.insert("10", bytes("x")), Err(IncorrectCode));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn find_distinguishes_errors() {
        let mut tree = tree();
        tree.insert("1", bytes("亚洲\tAsia")).unwrap();

        assert_eq!(tree.find("").unwrap_err(), FindError::IncorrectCode);
        assert_eq!(tree.find("10").unwrap_err(), FindError::IncorrectCode);
        assert_eq!(tree.find("2").unwrap_err(), FindError::NotFound);
        assert_eq!(tree.find("101").unwrap_err(), FindError::NotFound);
    }

    #[test]
    fn navigation() {
        let mut tree = tree();
        tree.insert("101", bytes("中国")).unwrap();
        tree.insert("102", bytes("日本")).unwrap();

        let root = tree.root();
        assert!(root.is_root());
        assert_eq!(&root.data()[..], "世界\tWorld".as_bytes());

        let asia = root.child("1").unwrap();
        let segments: Vec<&str> = asia.children().map(|(segment, _)| segment).collect();
        assert_eq!(segments, ["01", "02"]);

        let japan = asia.child("02").unwrap();
        assert_eq!(japan.parent().unwrap().id(), asia.id());
        assert_eq!(japan.parent().unwrap().parent().unwrap().id(), NodeId::ROOT);
        assert_eq!(tree.get(japan.id()).unwrap().depth(), 2);
    }

    #[test]
    fn node_ids_address_their_regions() {
        let mut tree = tree();
        let mut ids = Vec::new();
        for code in ["101010101", "101010102", "10102", "2"] {
            ids.push(tree.insert(code, bytes(code)).unwrap());
        }

        assert_eq!(tree.node_count(), 9);
        for (code, id) in ["101010101", "101010102", "10102", "2"].iter().zip(ids) {
            let region = tree.get(id).unwrap();
            assert_eq!(region.id(), id);
            assert_eq!(&region.data()[..], code.as_bytes());
            assert_eq!(tree.find(code).unwrap().id(), id);
        }

        // Every non-root node is listed as a child of its parent.
        for index in 1..tree.node_count() {
            let region = tree.get(NodeId(index)).unwrap();
            let parent = region.parent().unwrap();
            assert!(parent.children().any(|(_, child)| child.id() == region.id()));
        }
        assert!(tree.get(NodeId(tree.node_count())).is_none());
    }

    #[test]
    fn fresh_keeps_root_payload() {
        let mut tree = tree();
        tree.insert("101", bytes("中国")).unwrap();

        let fresh = tree.fresh();
        assert_eq!(fresh.node_count(), 1);
        assert!(Arc::ptr_eq(fresh.segmentation(), tree.segmentation()));
        assert_eq!(&fresh.root().data()[..], "世界\tWorld".as_bytes());
    }
}
