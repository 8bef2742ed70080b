use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};

/// The red-black tree engine backing `RbTreeMap`.
///
/// Nodes live in an arena and link to each other by handle. Slot 0
/// always holds the shared sentinel: a black, entry-less node standing
/// in for every absent child, so rotations and fix-ups walk uniform
/// link structure. The sentinel's parent link is deliberately writable;
/// deletion fix-up climbs through it after a transplant.
pub(crate) struct RawRbTreeMap<K, V> {
    /// Arena storing the sentinel and all live nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node; `NIL` when the tree is empty.
    root: Handle,
    /// Number of live (non-sentinel) nodes.
    len: usize,
}

impl<K, V> RawRbTreeMap<K, V> {
    /// Creates a new, empty tree. The first allocation pins the
    /// sentinel into slot 0 so `Handle::NIL` always resolves.
    pub(crate) fn new() -> Self {
        let mut nodes = Arena::new();
        let nil = nodes.alloc(Node::sentinel());
        debug_assert!(nil == Handle::NIL);
        Self {
            nodes,
            root: Handle::NIL,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears all elements, resetting to a lone sentinel.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        let nil = self.nodes.alloc(Node::sentinel());
        debug_assert!(nil == Handle::NIL);
        debug_assert!(self.nodes.len() == 1);
        self.root = Handle::NIL;
        self.len = 0;
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn is_sentinel(&self, handle: Handle) -> bool {
        self.nodes.get(handle).is_sentinel()
    }

    /// Descends left from `node` to the smallest key of its subtree.
    /// Returns the sentinel handle if `node` is the sentinel.
    pub(crate) fn minimum(&self, mut node: Handle) -> Handle {
        while !self.is_sentinel(self.node(node).left()) {
            node = self.node(node).left();
        }
        node
    }

    /// Mirror of [`minimum`](Self::minimum).
    pub(crate) fn maximum(&self, mut node: Handle) -> Handle {
        while !self.is_sentinel(self.node(node).right()) {
            node = self.node(node).right();
        }
        node
    }

    /// Returns the node holding the next key in sorted order, or the
    /// sentinel if `x` holds the maximum.
    pub(crate) fn successor(&self, mut x: Handle) -> Handle {
        if !self.is_sentinel(self.node(x).right()) {
            return self.minimum(self.node(x).right());
        }
        let mut y = self.node(x).parent();
        while !self.is_sentinel(y) && x == self.node(y).right() {
            x = y;
            y = self.node(y).parent();
        }
        y
    }

    /// Mirror of [`successor`](Self::successor).
    pub(crate) fn predecessor(&self, mut x: Handle) -> Handle {
        if !self.is_sentinel(self.node(x).left()) {
            return self.maximum(self.node(x).left());
        }
        let mut y = self.node(x).parent();
        while !self.is_sentinel(y) && x == self.node(y).left() {
            x = y;
            y = self.node(y).parent();
        }
        y
    }

    /// Handle of the smallest live node, if any.
    pub(crate) fn first_node(&self) -> Option<Handle> {
        let min = self.minimum(self.root);
        if self.is_sentinel(min) { None } else { Some(min) }
    }

    /// Handle of the largest live node, if any.
    pub(crate) fn last_node(&self) -> Option<Handle> {
        let max = self.maximum(self.root);
        if self.is_sentinel(max) { None } else { Some(max) }
    }

    /// Returns the first key-value pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_node().map(|h| self.node(h).key_value())
    }

    /// Returns the last key-value pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_node().map(|h| self.node(h).key_value())
    }

    /// Drains all key-value pairs in sorted order, leaving the tree
    /// empty. O(n); avoids the rebalancing of repeated `pop_first`.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut current = self.minimum(self.root);
        while !self.is_sentinel(current) {
            handles.push(current);
            current = self.successor(current);
        }

        let mut result = Vec::with_capacity(handles.len());
        for handle in handles {
            result.push(self.nodes.take(handle).into_entry());
        }
        self.clear();
        result
    }
}

impl<K: Ord, V> RawRbTreeMap<K, V> {
    /// Iterative descent to the node with an exactly matching key.
    fn search_node<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while !self.is_sentinel(current) {
            match key.cmp(self.node(current).key().borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current = self.node(current).left(),
                Ordering::Greater => current = self.node(current).right(),
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search_node(key).map(|h| self.node(h).value())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search_node(key)?;
        Some(self.node_mut(handle).value_mut())
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search_node(key).map(|h| self.node(h).key_value())
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search_node(key).is_some()
    }

    /// In-order scan for a stored value, stopping at the first match.
    /// O(n); key order decides which equal value is seen first.
    pub(crate) fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let mut current = self.minimum(self.root);
        while !self.is_sentinel(current) {
            if self.node(current).value() == value {
                return true;
            }
            current = self.successor(current);
        }
        false
    }

    /// Handle of the node with the least key `>=` the given key.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while !self.is_sentinel(current) {
            match key.cmp(self.node(current).key().borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => {
                    candidate = Some(current);
                    current = self.node(current).left();
                }
                Ordering::Greater => current = self.node(current).right(),
            }
        }
        candidate
    }

    /// Handle of the node with the least key `>` the given key.
    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while !self.is_sentinel(current) {
            if key.cmp(self.node(current).key().borrow()) == Ordering::Less {
                candidate = Some(current);
                current = self.node(current).left();
            } else {
                current = self.node(current).right();
            }
        }
        candidate
    }

    /// Handle of the node with the greatest key `<=` the given key.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while !self.is_sentinel(current) {
            match key.cmp(self.node(current).key().borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Greater => {
                    candidate = Some(current);
                    current = self.node(current).right();
                }
                Ordering::Less => current = self.node(current).left(),
            }
        }
        candidate
    }

    /// Handle of the node with the greatest key `<` the given key.
    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while !self.is_sentinel(current) {
            if key.cmp(self.node(current).key().borrow()) == Ordering::Greater {
                candidate = Some(current);
                current = self.node(current).right();
            } else {
                current = self.node(current).left();
            }
        }
        candidate
    }

    /// Inserts a key-value pair, rebalancing as needed.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        // Descend, remembering the last live node as the future parent.
        let mut x = self.root;
        let mut y = Handle::NIL;
        while !self.is_sentinel(x) {
            y = x;
            match key.cmp(self.node(x).key()) {
                Ordering::Less => x = self.node(x).left(),
                Ordering::Greater => x = self.node(x).right(),
                Ordering::Equal => {
                    // Existing key: overwrite in place, no fix-up.
                    return Some(self.node_mut(x).replace_value(value));
                }
            }
        }

        self.len += 1;

        if self.is_sentinel(y) {
            // First node becomes the black root.
            let z = self.nodes.alloc(Node::new(key, value, Handle::NIL));
            self.node_mut(z).set_color(Color::Black);
            self.root = z;
            return None;
        }

        let is_left = key < *self.node(y).key();
        let z = self.nodes.alloc(Node::new(key, value, y));
        if is_left {
            self.node_mut(y).set_left(z);
        } else {
            self.node_mut(y).set_right(z);
        }

        // A red child under the black root cannot violate anything.
        if self.is_sentinel(self.node(y).parent()) {
            return None;
        }

        self.fix_insert(z);
        None
    }

    /// Restores the red-black invariants after `z` was inserted red.
    fn fix_insert(&mut self, mut z: Handle) {
        while self.node(self.node(z).parent()).color() == Color::Red {
            let parent = self.node(z).parent();
            let grandparent = self.node(parent).parent();
            if parent == self.node(grandparent).right() {
                let uncle = self.node(grandparent).left();
                if self.node(uncle).color() == Color::Red {
                    // Red uncle: push the violation two levels up.
                    self.node_mut(uncle).set_color(Color::Black);
                    self.node_mut(parent).set_color(Color::Black);
                    self.node_mut(grandparent).set_color(Color::Red);
                    z = grandparent;
                } else {
                    if z == self.node(parent).left() {
                        // Inner grandchild: straighten first.
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.node(z).parent();
                    let grandparent = self.node(parent).parent();
                    self.node_mut(parent).set_color(Color::Black);
                    self.node_mut(grandparent).set_color(Color::Red);
                    self.rotate_left(grandparent);
                }
            } else {
                let uncle = self.node(grandparent).right();
                if self.node(uncle).color() == Color::Red {
                    self.node_mut(uncle).set_color(Color::Black);
                    self.node_mut(parent).set_color(Color::Black);
                    self.node_mut(grandparent).set_color(Color::Red);
                    z = grandparent;
                } else {
                    if z == self.node(parent).right() {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.node(z).parent();
                    let grandparent = self.node(parent).parent();
                    self.node_mut(parent).set_color(Color::Black);
                    self.node_mut(grandparent).set_color(Color::Red);
                    self.rotate_right(grandparent);
                }
            }
            if z == self.root {
                break;
            }
        }
        let root = self.root;
        self.node_mut(root).set_color(Color::Black);
    }

    /// Removes a key from the tree and returns its value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the tree and returns the key-value pair.
    /// Absent keys yield `None`; they are not a fault.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let z = self.search_node(key)?;
        Some(self.remove_at(z))
    }

    /// Removes and returns the first key-value pair.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let min = self.first_node()?;
        Some(self.remove_at(min))
    }

    /// Removes and returns the last key-value pair.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let max = self.last_node()?;
        Some(self.remove_at(max))
    }

    /// Splices the live node `z` out of the tree and reclaims its slot.
    fn remove_at(&mut self, z: Handle) -> (K, V) {
        debug_assert!(!self.is_sentinel(z));
        self.len -= 1;

        if self.len == 0 {
            // Sole node: reset to a lone sentinel root.
            self.root = Handle::NIL;
            self.node_mut(Handle::NIL).set_parent(Handle::NIL);
            return self.nodes.take(z).into_entry();
        }

        // Color physically removed from the tree; a removed red node
        // cannot break any invariant.
        let mut spliced_color = self.node(z).color();
        let anchor;

        if self.is_sentinel(self.node(z).left()) {
            anchor = self.node(z).right();
            self.transplant(z, anchor);
        } else if self.is_sentinel(self.node(z).right()) {
            anchor = self.node(z).left();
            self.transplant(z, anchor);
        } else {
            // Two children: the successor of z is the minimum of the
            // right subtree and takes z's place.
            let y = self.minimum(self.node(z).right());
            spliced_color = self.node(y).color();
            anchor = self.node(y).right();
            if self.node(y).parent() == z {
                // y is z's direct child; only the anchor reparents,
                // even when it is the sentinel.
                self.node_mut(anchor).set_parent(y);
            } else {
                // Detach y first, then hand it z's right subtree.
                self.transplant(y, anchor);
                let right = self.node(z).right();
                self.node_mut(y).set_right(right);
                self.node_mut(right).set_parent(y);
            }
            self.transplant(z, y);
            let left = self.node(z).left();
            self.node_mut(y).set_left(left);
            self.node_mut(left).set_parent(y);
            let color = self.node(z).color();
            self.node_mut(y).set_color(color);
        }

        if spliced_color == Color::Black {
            self.fix_delete(anchor);
        }

        self.nodes.take(z).into_entry()
    }

    /// Restores the black-height invariant after a black node was
    /// spliced out, starting from the anchor left in its place.
    fn fix_delete(&mut self, mut x: Handle) {
        while x != self.root && self.node(x).color() == Color::Black {
            let parent = self.node(x).parent();
            if x == self.node(parent).left() {
                let mut s = self.node(parent).right();
                if self.node(s).color() == Color::Red {
                    // Red sibling: rotate it above the parent.
                    self.node_mut(s).set_color(Color::Black);
                    self.node_mut(parent).set_color(Color::Red);
                    self.rotate_left(parent);
                    s = self.node(self.node(x).parent()).right();
                }
                if !self.is_sentinel(s)
                    && self.node(self.node(s).left()).color() == Color::Black
                    && self.node(self.node(s).right()).color() == Color::Black
                {
                    // Both nephews black: drop a black level, move up.
                    self.node_mut(s).set_color(Color::Red);
                    x = self.node(x).parent();
                } else {
                    if !self.is_sentinel(s) && self.node(self.node(s).right()).color() == Color::Black {
                        // Far nephew black: straighten toward it.
                        let near = self.node(s).left();
                        self.node_mut(near).set_color(Color::Black);
                        self.node_mut(s).set_color(Color::Red);
                        self.rotate_right(s);
                        s = self.node(self.node(x).parent()).right();
                    }
                    if !self.is_sentinel(s) {
                        // Far nephew red: borrow a black and finish.
                        let parent = self.node(x).parent();
                        let parent_color = self.node(parent).color();
                        self.node_mut(s).set_color(parent_color);
                        self.node_mut(parent).set_color(Color::Black);
                        let far = self.node(s).right();
                        self.node_mut(far).set_color(Color::Black);
                        self.rotate_left(parent);
                    }
                    x = self.root;
                }
            } else {
                let mut s = self.node(parent).left();
                if self.node(s).color() == Color::Red {
                    self.node_mut(s).set_color(Color::Black);
                    self.node_mut(parent).set_color(Color::Red);
                    self.rotate_right(parent);
                    s = self.node(self.node(x).parent()).left();
                }
                if !self.is_sentinel(s)
                    && self.node(self.node(s).left()).color() == Color::Black
                    && self.node(self.node(s).right()).color() == Color::Black
                {
                    self.node_mut(s).set_color(Color::Red);
                    x = self.node(x).parent();
                } else {
                    if !self.is_sentinel(s) && self.node(self.node(s).left()).color() == Color::Black {
                        let near = self.node(s).right();
                        self.node_mut(near).set_color(Color::Black);
                        self.node_mut(s).set_color(Color::Red);
                        self.rotate_left(s);
                        s = self.node(self.node(x).parent()).left();
                    }
                    if !self.is_sentinel(s) {
                        let parent = self.node(x).parent();
                        let parent_color = self.node(parent).color();
                        self.node_mut(s).set_color(parent_color);
                        self.node_mut(parent).set_color(Color::Black);
                        let far = self.node(s).left();
                        self.node_mut(far).set_color(Color::Black);
                        self.rotate_right(parent);
                    }
                    x = self.root;
                }
            }
        }
        self.node_mut(x).set_color(Color::Black);
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v` in
    /// u's parent slot (or at the root). v's parent is set even when v
    /// is the sentinel: deletion fix-up climbs through it afterwards.
    fn transplant(&mut self, u: Handle, v: Handle) {
        let parent = self.node(u).parent();
        if self.is_sentinel(parent) {
            self.root = v;
        } else if u == self.node(parent).left() {
            self.node_mut(parent).set_left(v);
        } else {
            self.node_mut(parent).set_right(v);
        }
        self.node_mut(v).set_parent(parent);
    }

    /// Single left rotation around `x`; x's right child takes its place.
    fn rotate_left(&mut self, x: Handle) {
        let y = self.node(x).right();
        let inherited = self.node(y).left();
        self.node_mut(x).set_right(inherited);
        if !self.is_sentinel(inherited) {
            self.node_mut(inherited).set_parent(x);
        }
        let parent = self.node(x).parent();
        self.node_mut(y).set_parent(parent);
        if self.is_sentinel(parent) {
            self.root = y;
        } else if x == self.node(parent).left() {
            self.node_mut(parent).set_left(y);
        } else {
            self.node_mut(parent).set_right(y);
        }
        self.node_mut(y).set_left(x);
        self.node_mut(x).set_parent(y);
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, x: Handle) {
        let y = self.node(x).left();
        let inherited = self.node(y).right();
        self.node_mut(x).set_left(inherited);
        if !self.is_sentinel(inherited) {
            self.node_mut(inherited).set_parent(x);
        }
        let parent = self.node(x).parent();
        self.node_mut(y).set_parent(parent);
        if self.is_sentinel(parent) {
            self.root = y;
        } else if x == self.node(parent).right() {
            self.node_mut(parent).set_right(y);
        } else {
            self.node_mut(parent).set_left(y);
        }
        self.node_mut(y).set_right(x);
        self.node_mut(x).set_parent(y);
    }
}

impl<K: Clone, V: Clone> Clone for RawRbTreeMap<K, V> {
    fn clone(&self) -> Self {
        // Handles are arena indices, so a slot-for-slot copy preserves
        // the whole link structure.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}
