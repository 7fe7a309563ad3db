use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Stable identity of one scene node.
///
/// Slots are recycled after removal, but every reuse bumps the slot
/// generation, so a stale id is detected instead of silently addressing an
/// unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub text: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_owned(),
            attrs: IndexMap::new(),
            text: None,
            parent,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Retained-mode node tree standing in for the host document.
///
/// Every structural or attribute change that actually alters the tree bumps
/// `mutation_count`; writing an attribute with its current value does not.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<usize>,
    roots: Vec<NodeId>,
    mutations: u64,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_root(&mut self, tag: &str) -> NodeId {
        let id = self.alloc(SceneNode::new(tag, None));
        self.roots.push(id);
        id
    }

    /// Appends a new child as the last (topmost) child of `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let parent_alive = self.is_alive(parent);
        let id = self.alloc(SceneNode::new(tag, parent_alive.then_some(parent)));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        } else {
            self.roots.push(id);
        }
        id
    }

    /// Inserts a new child before `sibling` inside `parent`.
    pub fn insert_before(&mut self, parent: NodeId, sibling: NodeId, tag: &str) -> NodeId {
        let id = self.append(parent, tag);
        if let Some(node) = self.node_mut(parent) {
            node.children.pop();
            let position = node
                .children
                .iter()
                .position(|child| *child == sibling)
                .unwrap_or(node.children.len());
            node.children.insert(position, id);
        }
        id
    }

    /// Builder-style attribute setter for freshly created nodes.
    pub fn with_attrs(&mut self, id: NodeId, attrs: &[(&str, String)]) -> NodeId {
        for (name, value) in attrs {
            self.set_attr(id, name, value.clone());
        }
        id
    }

    /// Sets one attribute. Returns `true` when the stored value changed.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.attrs.get(name) == Some(&value) {
            return false;
        }
        trace!(node = id.index, name, value = %value, "set attribute");
        node.attrs.insert(name.to_owned(), value);
        self.mutations += 1;
        true
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        let removed = self
            .node_mut(id)
            .is_some_and(|node| node.attrs.shift_remove(name).is_some());
        if removed {
            self.mutations += 1;
        }
        removed
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let text = text.into();
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.text.as_deref() == Some(text.as_str()) {
            return false;
        }
        node.text = Some(text);
        self.mutations += 1;
        true
    }

    /// Removes `id` and its whole subtree. Returns the number of removed nodes.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.node(id).map(|node| node.parent) else {
            return 0;
        };
        match parent {
            Some(parent) => {
                if let Some(node) = self.node_mut(parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.release(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        self.mutations += 1;
        removed
    }

    /// Removes every child of `id`, keeping the node itself.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    /// Moves `id` to the end of its parent's child list so it paints on top.
    pub fn raise(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).and_then(|node| node.parent) else {
            return false;
        };
        let Some(node) = self.node_mut(parent) else {
            return false;
        };
        if node.children.last() == Some(&id) {
            return false;
        }
        node.children.retain(|child| *child != id);
        node.children.push(id);
        self.mutations += 1;
        true
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|node| node.attr(name))
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |node| node.children.as_slice())
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Depth-first, document-order list of `root` and its descendants.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// All nodes below `root` whose attribute `name` equals `value`.
    #[must_use]
    pub fn select_all(&self, root: NodeId, name: &str, value: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.attr(*id, name) == Some(value))
            .collect()
    }

    #[must_use]
    pub fn select(&self, root: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.select_all(root, name, value).into_iter().next()
    }

    /// All nodes below `root` carrying `class`.
    #[must_use]
    pub fn select_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.node(*id).is_some_and(|node| node.has_class(class)))
            .collect()
    }

    /// Direct child of `parent` keyed by `aria-describedby`.
    #[must_use]
    pub fn child_by_key(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.attr(*child, "aria-describedby") == Some(key))
    }

    #[must_use]
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    #[must_use]
    pub fn live_node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of node slots held by the arena, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn alloc(&mut self, node: SceneNode) -> NodeId {
        self.mutations += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Empties the slot of `id` and queues it for reuse under a new generation.
    fn release(&mut self, id: NodeId) -> Option<SceneNode> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }
}

/// Formats a pixel coordinate for attribute output.
///
/// Values are rounded to 1/1000 px so that recomputing identical geometry
/// yields byte-identical attributes.
#[must_use]
pub fn fmt_px(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_owned();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    let mut text = format!("{rounded:.3}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

#[must_use]
pub fn translate(x: f64, y: f64) -> String {
    format!("translate({},{})", fmt_px(x), fmt_px(y))
}

#[cfg(test)]
mod tests {
    use super::{SceneGraph, fmt_px};

    #[test]
    fn rewriting_same_value_is_not_a_mutation() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("svg");
        assert!(scene.set_attr(root, "width", "10"));
        let before = scene.mutation_count();
        assert!(!scene.set_attr(root, "width", "10"));
        assert_eq!(scene.mutation_count(), before);
    }

    #[test]
    fn removing_a_subtree_keeps_siblings() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("g");
        let a = scene.append(root, "g");
        scene.set_attr(a, "aria-describedby", "a");
        let a_child = scene.append(a, "circle");
        let b = scene.append(root, "g");
        scene.set_attr(b, "aria-describedby", "b");

        assert_eq!(scene.remove(a), 2);
        assert!(!scene.is_alive(a_child));
        assert_eq!(scene.children(root), &[b]);
        assert_eq!(scene.child_by_key(root, "b"), Some(b));
    }

    #[test]
    fn removed_slots_are_reused_without_reviving_stale_ids() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("g");
        for _ in 0..50 {
            let group = scene.append(root, "g");
            scene.append(group, "line");
            scene.remove(group);
        }
        assert_eq!(scene.capacity(), 3);
        assert_eq!(scene.live_node_count(), 1);

        let stale = scene.append(root, "g");
        scene.remove(stale);
        let fresh = scene.append(root, "rect");
        assert_eq!(fresh.index(), stale.index());
        assert!(!scene.is_alive(stale));
        assert!(!scene.set_attr(stale, "x", "1"));
        assert_eq!(scene.node(fresh).map(|node| node.tag.as_str()), Some("rect"));
    }

    #[test]
    fn raise_moves_node_to_top() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("g");
        let a = scene.append(root, "g");
        let b = scene.append(root, "g");
        assert!(scene.raise(a));
        assert_eq!(scene.children(root), &[b, a]);
        assert!(!scene.raise(a));
    }

    #[test]
    fn insert_before_places_node_ahead_of_sibling() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("g");
        let a = scene.append(root, "g");
        let b = scene.insert_before(root, a, "g");
        assert_eq!(scene.children(root), &[b, a]);
    }

    #[test]
    fn px_formatting_is_stable() {
        assert_eq!(fmt_px(10.0), "10");
        assert_eq!(fmt_px(10.12345), "10.123");
        assert_eq!(fmt_px(-0.0001), "0");
        assert_eq!(fmt_px(f64::NAN), "NaN");
    }
}
