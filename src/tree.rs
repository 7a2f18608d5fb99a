//! Element Tree - host abstraction over the page's element hierarchy.
//!
//! The subsystem never touches a real DOM. Hosts expose their element tree
//! through the [`ElementTree`] trait; validation runs against synthetic
//! [`ElementSnapshot`] descriptors so the oracle stays pure and tests stay
//! fast and deterministic.
//!
//! [`StaticTree`] is the bundled in-memory implementation: embeddings mirror
//! their UI tree into it, and every test builds fixtures with it.
//!
//! # Example
//!
//! ```ignore
//! use reticle::tree::{StaticTree, ElementDesc};
//! use reticle::types::Rect;
//!
//! let mut tree = StaticTree::new();
//! let section = tree.insert(tree.root(), ElementDesc::new("section"));
//! let button = tree.insert(
//!     section,
//!     ElementDesc::new("button").rect(Rect::new(100.0, 100.0, 50.0, 50.0)),
//! );
//! ```

use std::collections::HashMap;

use crate::error::GeometryError;
use crate::oracle::OPT_OUT_CLASS;
use crate::types::Rect;

// =============================================================================
// ELEMENT ID
// =============================================================================

/// Opaque handle to one element in the host's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// COMPUTED STYLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Rendered,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEventsStyle {
    #[default]
    Auto,
    None,
}

/// The slice of an element's computed style the validity oracle reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
    pub opacity: f32,
    pub pointer_events: PointerEventsStyle,
    /// Inline `pointer-events` override, if the element carries one.
    pub inline_pointer_events: Option<PointerEventsStyle>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Rendered,
            visibility: Visibility::Visible,
            opacity: 1.0,
            pointer_events: PointerEventsStyle::Auto,
            inline_pointer_events: None,
        }
    }
}

// =============================================================================
// ELEMENT SNAPSHOT
// =============================================================================

/// Synthetic descriptor of one element at one instant.
///
/// Produced by the host tree; consumed by the validity oracle. Pure data, no
/// handles back into the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    /// Lowercase tag name.
    pub tag: String,
    pub classes: Vec<String>,
    pub style: ComputedStyle,
    pub rect: Rect,
    /// Whether any descendant carries the opt-out class. A container whose
    /// interior must stay cursor-free is itself untargetable.
    pub has_opt_out_descendant: bool,
    /// Name of the nearest enclosing page section, if any.
    pub section: Option<String>,
}

// =============================================================================
// ELEMENT TREE TRAIT
// =============================================================================

/// Host-side view of the element hierarchy.
///
/// Geometry queries are fallible: a bound element can be detached from the
/// tree mid-frame, and the subsystem must degrade rather than panic.
pub trait ElementTree {
    /// The document root ("body"). Ancestor walks stop here, exclusive.
    fn root(&self) -> ElementId;

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Full synthetic descriptor for validation.
    fn snapshot(&self, el: ElementId) -> Result<ElementSnapshot, GeometryError>;

    /// Live bounding rect, queried per alignment pass while bound.
    fn bounding_rect(&self, el: ElementId) -> Result<Rect, GeometryError>;

    /// Whether `el` is `ancestor` or lies inside its subtree.
    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

/// Hosts that mutate their tree while the cursor is live share it as
/// `Rc<RefCell<...>>`; queries borrow per call.
impl<T: ElementTree> ElementTree for std::cell::RefCell<T> {
    fn root(&self) -> ElementId {
        self.borrow().root()
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.borrow().parent(el)
    }

    fn snapshot(&self, el: ElementId) -> Result<ElementSnapshot, GeometryError> {
        self.borrow().snapshot(el)
    }

    fn bounding_rect(&self, el: ElementId) -> Result<Rect, GeometryError> {
        self.borrow().bounding_rect(el)
    }

    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        self.borrow().contains(ancestor, el)
    }
}

/// Walk up from `start` (inclusive) to the root (exclusive) and return the
/// first element satisfying `pred` — the innermost match.
pub fn first_matching_ancestor<T>(
    tree: &T,
    start: ElementId,
    mut pred: impl FnMut(ElementId) -> bool,
) -> Option<ElementId>
where
    T: ElementTree + ?Sized,
{
    let root = tree.root();
    let mut current = Some(start);
    while let Some(id) = current {
        if id == root {
            break;
        }
        if pred(id) {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

// =============================================================================
// STATIC TREE
// =============================================================================

/// Descriptor for inserting an element into a [`StaticTree`].
#[derive(Debug, Clone)]
pub struct ElementDesc {
    tag: String,
    classes: Vec<String>,
    style: ComputedStyle,
    rect: Rect,
    section: Option<String>,
}

impl ElementDesc {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            classes: Vec::new(),
            style: ComputedStyle::default(),
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            section: None,
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Name this element as a page section; descendants report it as their
    /// nearest enclosing section.
    pub fn section(mut self, name: &str) -> Self {
        self.section = Some(name.to_string());
        self
    }
}

struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    tag: String,
    classes: Vec<String>,
    style: ComputedStyle,
    rect: Rect,
    section: Option<String>,
    detached: bool,
}

/// In-memory [`ElementTree`] implementation.
pub struct StaticTree {
    nodes: HashMap<ElementId, Node>,
    root: ElementId,
    next_id: u32,
}

impl StaticTree {
    /// Create a tree containing only the root ("body") element.
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                parent: None,
                children: Vec::new(),
                tag: "body".to_string(),
                classes: Vec::new(),
                style: ComputedStyle::default(),
                rect: Rect::new(0.0, 0.0, 1920.0, 1080.0),
                section: None,
                detached: false,
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// Insert a new element under `parent`. Returns its handle.
    pub fn insert(&mut self, parent: ElementId, desc: ElementDesc) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                parent: Some(parent),
                children: Vec::new(),
                tag: desc.tag,
                classes: desc.classes,
                style: desc.style,
                rect: desc.rect,
                section: desc.section,
                detached: false,
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Detach an element (and implicitly its subtree) from the document.
    /// Subsequent geometry queries on it fail with `GeometryError::Detached`.
    pub fn detach(&mut self, el: ElementId) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.detached = true;
        }
    }

    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.rect = rect;
        }
    }

    pub fn set_style(&mut self, el: ElementId, style: ComputedStyle) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.style = style;
        }
    }

    fn is_attached(&self, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) if node.detached => return false,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        true
    }

    fn subtree_has_opt_out(&self, el: ElementId) -> bool {
        let Some(node) = self.nodes.get(&el) else {
            return false;
        };
        node.children.iter().any(|&child| {
            self.nodes
                .get(&child)
                .is_some_and(|n| n.classes.iter().any(|c| c == OPT_OUT_CLASS))
                || self.subtree_has_opt_out(child)
        })
    }

    fn nearest_section(&self, el: ElementId) -> Option<String> {
        let mut current = Some(el);
        while let Some(id) = current {
            let node = self.nodes.get(&id)?;
            if let Some(section) = &node.section {
                return Some(section.clone());
            }
            current = node.parent;
        }
        None
    }
}

impl Default for StaticTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree for StaticTree {
    fn root(&self) -> ElementId {
        self.root
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        let node = self.nodes.get(&el)?;
        // Removal severs the upward link of the removed element itself;
        // nodes inside the removed subtree keep their internal links.
        if node.detached {
            return None;
        }
        node.parent
    }

    fn snapshot(&self, el: ElementId) -> Result<ElementSnapshot, GeometryError> {
        if !self.is_attached(el) {
            return Err(GeometryError::Detached);
        }
        let node = self.nodes.get(&el).ok_or(GeometryError::Detached)?;
        Ok(ElementSnapshot {
            tag: node.tag.clone(),
            classes: node.classes.clone(),
            style: node.style,
            rect: node.rect,
            has_opt_out_descendant: self.subtree_has_opt_out(el),
            section: self.nearest_section(el),
        })
    }

    fn bounding_rect(&self, el: ElementId) -> Result<Rect, GeometryError> {
        if !self.is_attached(el) {
            return Err(GeometryError::Detached);
        }
        let node = self.nodes.get(&el).ok_or(GeometryError::Detached)?;
        if node.rect.is_degenerate() {
            return Err(GeometryError::Degenerate);
        }
        Ok(node.rect)
    }
}

// =============================================================================
// TESTS
// =============================================================================
