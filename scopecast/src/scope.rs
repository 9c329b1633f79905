//! Scope boundary resolution.
//!
//! Every scope wrapper node marks its own root as a boundary, so nested
//! wrapped subtrees automatically shield their internal events from outer
//! subscribers without any configuration: the walk below stops at the first
//! boundary it meets.

use scopecast_core::ScopeNode;

/// Decide whether an event observed at `scope_root` belongs to that scope.
///
/// Starting at the event's original target, walk the ancestor chain upward:
///
/// - reaching `scope_root` → `true`;
/// - reaching any node carrying a boundary marker other than `scope_root`
///   itself → `false` (nested scopes are opaque to outer scopes);
/// - running off the tree without reaching `scope_root` → `false`.
pub fn belongs_to_scope<N: ScopeNode>(target: &N, scope_root: &N) -> bool {
    let mut cursor = Some(target.clone());
    while let Some(node) = cursor {
        if node.id() == scope_root.id() {
            return true;
        }
        if node.is_boundary() {
            return false;
        }
        cursor = node.parent();
    }
    false
}
