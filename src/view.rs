use super::*;

/// Handle to an element or text node owned by a [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendering surface the page behaviors read from and mutate.
///
/// Every behavior in this crate is written against this trait so that it can
/// run on the in-memory [`Dom`](crate::Dom) in tests or on any other surface
/// that honors the same class, attribute and style contracts.
pub trait View {
    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>>;

    fn query_within(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>>;

    fn query_first(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    fn query_first_within(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_within(root, selector)?.into_iter().next())
    }

    fn by_id(&self, id: &str) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn is_connected(&self, node: NodeId) -> bool;

    fn head(&self) -> Option<NodeId>;

    fn body(&self) -> Option<NodeId>;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    fn text_content(&self, node: NodeId) -> String;

    fn set_text_content(&mut self, node: NodeId, value: &str) -> Result<()>;

    fn has_class(&self, node: NodeId, class_name: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()>;

    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()>;

    /// Reads an inline style property by its CSS name (`--bar-width`, `opacity`).
    fn style(&self, node: NodeId, property: &str) -> String;

    /// Writes an inline style property; an empty value removes it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()>;

    /// Replaces the whole inline style, like assigning `style.cssText`.
    fn set_css_text(&mut self, node: NodeId, css_text: &str) -> Result<()>;

    /// Creates a detached element.
    fn create_element(&mut self, tag_name: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Detaches a node from its parent. Removing a detached node is a no-op.
    fn remove(&mut self, node: NodeId) -> Result<()>;

    /// Box relative to the document origin (`offsetTop`-style coordinates).
    fn layout_rect(&self, node: NodeId) -> Rect;

    /// Box relative to the viewport (`getBoundingClientRect`).
    fn bounding_rect(&self, node: NodeId) -> Rect {
        let mut rect = self.layout_rect(node);
        rect.top -= self.scroll_y();
        rect
    }

    fn viewport(&self) -> Viewport;

    fn scroll_y(&self) -> f64;

    /// Aligns the top of `node` with the top of the viewport.
    fn scroll_into_view(&mut self, node: NodeId) -> Result<()>;
}
