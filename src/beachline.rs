// The beach line is a red-black tree whose nodes live in a slab. Nodes are
// never moved between slots, so a handle stays valid for as long as its node
// is in the tree, even across rotations and deletions of other nodes.
//
// The tree has no key of its own: nodes are placed relative to each other
// with `insert_after`/`insert_before`, and searches take a comparator. This
// lets the caller order arcs by a sweep position that keeps changing.

use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use slab::Slab;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Color {
    Red,
    Black,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct ArcHandle(usize);

impl ArcHandle {
    #[cfg(test)]
    pub(crate) fn from_raw(key: usize) -> ArcHandle {
        ArcHandle(key)
    }
}

// Note: this is only public because of the implementation of the `Index` trait
// which is useful for private use here.
pub struct Node<T> {
    color: Color,
    parent: Option<ArcHandle>,
    left: Option<ArcHandle>,
    right: Option<ArcHandle>,
    value: T,
}

pub struct BeachLine<T> {
    nodes: Slab<Node<T>>,
    root: Option<ArcHandle>,
}

// Just for convenience, so that we can type `self[i]` instead of `self.nodes[i.0]`.
impl<T> Index<ArcHandle> for BeachLine<T> {
    type Output = Node<T>;

    fn index(&self, index: ArcHandle) -> &Node<T> {
        &self.nodes[index.0]
    }
}

impl<T> IndexMut<ArcHandle> for BeachLine<T> {
    fn index_mut(&mut self, index: ArcHandle) -> &mut Node<T> {
        &mut self.nodes[index.0]
    }
}

impl<T> Default for BeachLine<T> {
    fn default() -> Self {
        BeachLine::new()
    }
}

impl<T> BeachLine<T> {
    pub fn new() -> BeachLine<T> {
        BeachLine {
            nodes: Slab::new(),
            root: None,
        }
    }

    pub fn with_capacity(n: usize) -> BeachLine<T> {
        BeachLine {
            nodes: Slab::with_capacity(n),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts the first node. Returns `None` if the tree is not empty.
    pub fn init(&mut self, value: T) -> Option<ArcHandle> {
        if self.root.is_some() {
            return None;
        }
        let at = ArcHandle(self.nodes.insert(Node {
            color: Color::Black,
            parent: None,
            left: None,
            right: None,
            value,
        }));
        self.root = Some(at);
        Some(at)
    }

    pub fn contains(&self, handle: ArcHandle) -> bool {
        self.nodes.contains(handle.0)
    }

    pub fn get(&self, handle: ArcHandle) -> &T {
        &self[handle].value
    }

    pub fn get_mut(&mut self, handle: ArcHandle) -> &mut T {
        &mut self[handle].value
    }

    pub fn insert_after(&mut self, at: ArcHandle, value: T) -> ArcHandle {
        match self[at].right {
            None => self.attach(at, value, false),
            Some(right) => {
                // The successor is the leftmost node of the right subtree
                let successor = self.leftmost(right);
                self.attach(successor, value, true)
            }
        }
    }

    pub fn insert_before(&mut self, at: ArcHandle, value: T) -> ArcHandle {
        match self[at].left {
            None => self.attach(at, value, true),
            Some(left) => {
                let predecessor = self.rightmost(left);
                self.attach(predecessor, value, false)
            }
        }
    }

    /// Binary search guided by `comparator`, which says where the searched
    /// key lies relative to the given node. Returns the node comparing
    /// `Equal`, or failing that the greatest node ordered before the key.
    pub fn floor<F>(&self, comparator: F) -> Option<ArcHandle>
    where
        F: Fn(&T) -> Ordering,
    {
        let mut current = self.root;
        let mut floor = None;
        while let Some(at) = current {
            match comparator(&self[at].value) {
                Ordering::Less => current = self[at].left,
                Ordering::Greater => {
                    floor = Some(at);
                    current = self[at].right;
                }
                Ordering::Equal => return Some(at),
            }
        }
        floor
    }

    pub fn first(&self) -> Option<ArcHandle> {
        self.root.map(|root| self.leftmost(root))
    }

    pub fn predecessor(&self, at: ArcHandle) -> Option<ArcHandle> {
        if let Some(left) = self[at].left {
            return Some(self.rightmost(left));
        }
        let mut child = at;
        let mut parent = self[at].parent;
        while let Some(p) = parent {
            if self[p].right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self[p].parent;
        }
        None
    }

    pub fn successor(&self, at: ArcHandle) -> Option<ArcHandle> {
        if let Some(right) = self[at].right {
            return Some(self.leftmost(right));
        }
        let mut child = at;
        let mut parent = self[at].parent;
        while let Some(p) = parent {
            if self[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self[p].parent;
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            next: self.first(),
        }
    }

    pub fn delete(&mut self, at: ArcHandle) -> Option<T> {
        if !self.contains(at) {
            return None;
        }

        if let (Some(left), Some(_)) = (self[at].left, self[at].right) {
            // Move the node into its predecessor's place, which has at most
            // one child, and delete it from there
            let predecessor = self.rightmost(left);
            self.swap(at, predecessor);
        }

        let child = self[at].left.or(self[at].right);
        match child {
            Some(child) => {
                // A node with a single child is black and the child is red
                self.replace_in_parent(at, Some(child));
                self[child].parent = self[at].parent;
                self[child].color = Color::Black;
            }
            None => {
                if self[at].color == Color::Black {
                    self.delete_repair(at);
                }
                self.replace_in_parent(at, None);
            }
        }

        Some(self.nodes.remove(at.0).value)
    }

    #[allow(dead_code)]
    pub fn depth(&self) -> usize {
        fn depth_inner<T>(tree: &BeachLine<T>, at: Option<ArcHandle>) -> usize {
            match at {
                None => 0,
                Some(at) => 1 + depth_inner(tree, tree[at].left).max(depth_inner(tree, tree[at].right)),
            }
        }

        depth_inner(self, self.root)
    }

    fn leftmost(&self, mut at: ArcHandle) -> ArcHandle {
        while let Some(left) = self[at].left {
            at = left;
        }
        at
    }

    fn rightmost(&self, mut at: ArcHandle) -> ArcHandle {
        while let Some(right) = self[at].right {
            at = right;
        }
        at
    }

    fn attach(&mut self, parent: ArcHandle, value: T, as_left: bool) -> ArcHandle {
        let at = ArcHandle(self.nodes.insert(Node {
            color: Color::Red,
            parent: Some(parent),
            left: None,
            right: None,
            value,
        }));
        if as_left {
            self[parent].left = Some(at);
        } else {
            self[parent].right = Some(at);
        }
        self.insert_repair(at);
        at
    }

    fn is_red(&self, at: Option<ArcHandle>) -> bool {
        at.map_or(false, |at| self[at].color == Color::Red)
    }

    fn replace_in_parent(&mut self, at: ArcHandle, with: Option<ArcHandle>) {
        match self[at].parent {
            None => self.root = with,
            Some(parent) => {
                if self[parent].left == Some(at) {
                    self[parent].left = with;
                } else {
                    self[parent].right = with;
                }
            }
        }
    }

    // Exchanges the tree positions (and colors) of two nodes. The values stay
    // in their slots, so outstanding handles keep pointing at the same value.
    fn swap(&mut self, a: ArcHandle, b: ArcHandle) {
        let relink = |x: Option<ArcHandle>| match x {
            Some(x) if x == a => Some(b),
            Some(x) if x == b => Some(a),
            other => other,
        };

        let (a_parent, a_left, a_right, a_color) = (self[a].parent, self[a].left, self[a].right, self[a].color);
        let (b_parent, b_left, b_right, b_color) = (self[b].parent, self[b].left, self[b].right, self[b].color);

        self[a].parent = relink(b_parent);
        self[a].left = relink(b_left);
        self[a].right = relink(b_right);
        self[a].color = b_color;
        self[b].parent = relink(a_parent);
        self[b].left = relink(a_left);
        self[b].right = relink(a_right);
        self[b].color = a_color;

        for (node, other) in [(a, b), (b, a)] {
            match self[node].parent {
                None => self.root = Some(node),
                Some(parent) if parent != a && parent != b => {
                    if self[parent].left == Some(other) {
                        self[parent].left = Some(node);
                    } else if self[parent].right == Some(other) {
                        self[parent].right = Some(node);
                    }
                }
                Some(_) => {}
            }
            for child in [self[node].left, self[node].right].into_iter().flatten() {
                if child != a && child != b {
                    self[child].parent = Some(node);
                }
            }
        }
    }

    fn insert_repair(&mut self, mut at: ArcHandle) {
        loop {
            let parent = match self[at].parent {
                None => {
                    self[at].color = Color::Black;
                    return;
                }
                Some(parent) => parent,
            };
            if self[parent].color == Color::Black {
                return;
            }
            let grandparent = match self[parent].parent {
                None => {
                    // Red root
                    self[parent].color = Color::Black;
                    return;
                }
                Some(grandparent) => grandparent,
            };
            let parent_is_left = self[grandparent].left == Some(parent);
            let uncle = if parent_is_left { self[grandparent].right } else { self[grandparent].left };

            if let Some(uncle) = uncle.filter(|&u| self[u].color == Color::Red) {
                self[uncle].color = Color::Black;
                self[parent].color = Color::Black;
                self[grandparent].color = Color::Red;
                at = grandparent;
                continue;
            }

            // Rotate an inner grandchild to the outside first
            let mut parent = parent;
            if parent_is_left && self[parent].right == Some(at) {
                self.rotate_left(parent);
                parent = at;
            } else if !parent_is_left && self[parent].left == Some(at) {
                self.rotate_right(parent);
                parent = at;
            }

            if parent_is_left {
                self.rotate_right(grandparent);
            } else {
                self.rotate_left(grandparent);
            }
            self[parent].color = Color::Black;
            self[grandparent].color = Color::Red;
            return;
        }
    }

    // Precondition: `at` is black and its paths hold one black node fewer
    // than its sibling's paths.
    fn delete_repair(&mut self, mut at: ArcHandle) {
        loop {
            let parent = match self[at].parent {
                None => return,
                Some(parent) => parent,
            };
            let is_left = self[parent].left == Some(at);
            let sibling_of = |tree: &Self| {
                if is_left { tree[parent].right } else { tree[parent].left }
            };

            let mut sibling = match sibling_of(&*self) {
                Some(sibling) => sibling,
                // A black node always has a sibling
                None => return,
            };

            if self[sibling].color == Color::Red {
                self[sibling].color = Color::Black;
                self[parent].color = Color::Red;
                if is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                sibling = match sibling_of(&*self) {
                    Some(sibling) => sibling,
                    None => return,
                };
            }

            let (close, distant) = if is_left {
                (self[sibling].left, self[sibling].right)
            } else {
                (self[sibling].right, self[sibling].left)
            };

            if !self.is_red(close) && !self.is_red(distant) {
                self[sibling].color = Color::Red;
                if self[parent].color == Color::Red {
                    self[parent].color = Color::Black;
                    return;
                }
                at = parent;
                continue;
            }

            let distant = match (self.is_red(distant), close) {
                (true, _) => distant,
                (false, Some(close)) => {
                    // Close nephew is red: rotate it above the sibling
                    self[close].color = Color::Black;
                    self[sibling].color = Color::Red;
                    if is_left {
                        self.rotate_right(sibling);
                    } else {
                        self.rotate_left(sibling);
                    }
                    let old_sibling = sibling;
                    sibling = close;
                    Some(old_sibling)
                }
                (false, None) => return,
            };

            self[sibling].color = self[parent].color;
            self[parent].color = Color::Black;
            if let Some(distant) = distant {
                self[distant].color = Color::Black;
            }
            if is_left {
                self.rotate_left(parent);
            } else {
                self.rotate_right(parent);
            }
            return;
        }
    }

    fn rotate_left(&mut self, at: ArcHandle) {
        let pivot = match self[at].right {
            Some(pivot) => pivot,
            None => return,
        };
        let inner = self[pivot].left;
        self[at].right = inner;
        if let Some(inner) = inner {
            self[inner].parent = Some(at);
        }
        self.replace_in_parent(at, Some(pivot));
        self[pivot].parent = self[at].parent;
        self[pivot].left = Some(at);
        self[at].parent = Some(pivot);
    }

    fn rotate_right(&mut self, at: ArcHandle) {
        let pivot = match self[at].left {
            Some(pivot) => pivot,
            None => return,
        };
        let inner = self[pivot].right;
        self[at].left = inner;
        if let Some(inner) = inner {
            self[inner].parent = Some(at);
        }
        self.replace_in_parent(at, Some(pivot));
        self[pivot].parent = self[at].parent;
        self[pivot].right = Some(at);
        self[at].parent = Some(pivot);
    }

    /// Checks the red-black properties and parent links. Returns the black
    /// height on success.
    pub fn validate(&self) -> Result<usize, String> {
        fn validate_at<T>(tree: &BeachLine<T>, at: Option<ArcHandle>, parent: Option<ArcHandle>) -> Result<usize, String> {
            let at = match at {
                None => return Ok(1),
                Some(at) => at,
            };
            if tree[at].parent != parent {
                return Err(format!("node {:?} has a stale parent link", at));
            }
            if tree[at].color == Color::Red && (tree.is_red(tree[at].left) || tree.is_red(tree[at].right)) {
                return Err(format!("red node {:?} has a red child", at));
            }
            let left = validate_at(tree, tree[at].left, Some(at))?;
            let right = validate_at(tree, tree[at].right, Some(at))?;
            if left != right {
                return Err(format!("black heights differ below {:?}", at));
            }
            Ok(left + if tree[at].color == Color::Black { 1 } else { 0 })
        }

        if self.is_red(self.root) {
            return Err("root is red".to_string());
        }
        validate_at(self, self.root, None)
    }
}

pub struct Iter<'a, T> {
    tree: &'a BeachLine<T>,
    next: Option<ArcHandle>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (ArcHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let at = self.next?;
        self.next = tree.successor(at);
        Some((at, &tree[at].value))
    }
}
