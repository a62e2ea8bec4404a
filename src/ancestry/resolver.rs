//! Ancestor chains, common-ancestor forks and relative paint order.

use smallvec::SmallVec;

use crate::scene::{id::NodeId, tree::Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// An entry of an ancestor chain: a node or the canvas root.
pub enum Ancestor {
    /// A node in the arena.
    Node(NodeId),
    /// The canvas container holding root-level objects.
    Canvas,
}

/// Ancestor chain, nearest first.
pub type Ancestors = SmallVec<[Ancestor; 8]>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Result of [`Scene::find_common_ancestors`].
pub struct AncestryComparison {
    /// Shared chain, starting at the nearest common ancestor found.
    pub common: Ancestors,
    /// Chain from the first node up to (excluding) `common[0]`.
    pub fork: Ancestors,
    /// Chain from the other node up to (excluding) `common[0]`.
    pub other_fork: Ancestors,
}

fn chain(head: Ancestor, rest: &[Ancestor]) -> Ancestors {
    let mut out = Ancestors::with_capacity(rest.len() + 1);
    out.push(head);
    out.extend_from_slice(rest);
    out
}

impl Scene {
    fn parent_entry(&self, of: Ancestor, strict: bool) -> Option<Ancestor> {
        let Ancestor::Node(id) = of else {
            return None;
        };
        let node = self.node(id)?;
        match node.group {
            Some(g) => Some(Ancestor::Node(g)),
            None if !strict && node.canvas => Some(Ancestor::Canvas),
            None => None,
        }
    }

    /// Parents of `id`, nearest first.
    ///
    /// In strict mode the walk stops at the topmost group and never yields
    /// [`Ancestor::Canvas`].
    pub fn ancestors(&self, id: NodeId, strict: bool) -> Ancestors {
        let mut out = Ancestors::new();
        let mut cursor = self.parent_entry(Ancestor::Node(id), strict);
        while let Some(entry) = cursor {
            if out.contains(&entry) {
                debug_assert!(false, "cycle in ancestor chain of {id}");
                break;
            }
            out.push(entry);
            cursor = self.parent_entry(entry, strict);
        }
        out
    }

    /// Whether `target` appears in the ancestor chain of `id`.
    pub fn is_descendant_of(&self, id: NodeId, target: Ancestor) -> bool {
        let mut cursor = self.parent_entry(Ancestor::Node(id), false);
        let mut remaining = self.len();
        while let Some(entry) = cursor {
            if entry == target {
                return true;
            }
            if entry == Ancestor::Canvas || remaining == 0 {
                return false;
            }
            remaining -= 1;
            cursor = self.parent_entry(entry, false);
        }
        false
    }

    /// Split the chains of `id` and `other` at their first shared ancestor.
    ///
    /// The shared ancestor is the first match found while walking `id`'s chain
    /// outward (checking, for each of its ancestors, every entry of `other`'s
    /// chain), which is not necessarily the pair with the smallest total
    /// distance. Disjoint trees yield an empty `common`.
    pub fn find_common_ancestors(
        &self,
        id: NodeId,
        other: NodeId,
        strict: bool,
    ) -> AncestryComparison {
        let this = Ancestor::Node(id);
        let that = Ancestor::Node(other);
        if id == other {
            return AncestryComparison {
                common: chain(this, &self.ancestors(id, strict)),
                ..AncestryComparison::default()
            };
        }

        let ancestors = self.ancestors(id, strict);
        let other_ancestors = self.ancestors(other, strict);

        if ancestors.is_empty() && other_ancestors.last() == Some(&this) {
            let top = other_ancestors.len() - 1;
            return AncestryComparison {
                common: chain(this, &[]),
                fork: Ancestors::new(),
                other_fork: chain(that, &other_ancestors[..top]),
            };
        }

        for (i, &ancestor) in ancestors.iter().enumerate() {
            if ancestor == that {
                return AncestryComparison {
                    common: ancestors[i..].iter().copied().collect(),
                    fork: chain(this, &ancestors[..i]),
                    other_fork: Ancestors::new(),
                };
            }
            for (j, &other_ancestor) in other_ancestors.iter().enumerate() {
                if other_ancestor == this {
                    return AncestryComparison {
                        common: chain(this, &ancestors),
                        fork: Ancestors::new(),
                        other_fork: chain(that, &other_ancestors[..j]),
                    };
                }
                if other_ancestor == ancestor {
                    return AncestryComparison {
                        common: ancestors[i..].iter().copied().collect(),
                        fork: chain(this, &ancestors[..i]),
                        other_fork: chain(that, &other_ancestors[..j]),
                    };
                }
            }
        }

        AncestryComparison {
            common: Ancestors::new(),
            fork: chain(this, &ancestors),
            other_fork: chain(that, &other_ancestors),
        }
    }

    pub fn has_common_ancestors(&self, id: NodeId, other: NodeId, strict: bool) -> bool {
        !self
            .find_common_ancestors(id, other, strict)
            .common
            .is_empty()
    }

    /// Whether `id` paints after `other`.
    ///
    /// `None` for identical nodes and for nodes without a common ancestor. A
    /// node nested inside `other` is in front of it.
    pub fn is_in_front_of(&self, id: NodeId, other: NodeId) -> Option<bool> {
        if id == other {
            return None;
        }
        let cmp = self.find_common_ancestors(id, other, false);
        if cmp.fork.contains(&Ancestor::Node(other)) {
            return Some(true);
        }
        if cmp.other_fork.contains(&Ancestor::Node(id)) {
            return Some(false);
        }
        let first = *cmp.common.first()?;
        let siblings = match first {
            Ancestor::Canvas => self.canvas_objects(),
            Ancestor::Node(n) => self.children(n),
        };
        let index_of = |head: Option<&Ancestor>| match head {
            Some(Ancestor::Node(n)) => siblings.iter().position(|c| c == n),
            _ => None,
        };
        let this_index = index_of(cmp.fork.last());
        let other_index = index_of(cmp.other_fork.last());
        Some(match (this_index, other_index) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ancestry/resolver.rs"]
mod tests;
