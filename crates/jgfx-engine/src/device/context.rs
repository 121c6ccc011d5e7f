use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::{ResourceId, TargetId};
use crate::backend::ContextId;

/// Outcome of marking a render target active on a native context.
///
/// The caller uses this to decide how much of its state cache survives
/// the activation: GPU state is bound to the context, so a target that
/// was not the last one active there cannot trust anything it cached.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Activation {
    /// No target was tracked for this context before.
    ///
    /// Nothing about the context's state is known; the caller must also
    /// re-establish its persistent baseline state.
    FirstInContext,
    /// A different target was tracked and has been replaced.
    ///
    /// Cached per-draw state (blend, texture, transform) is stale, but
    /// the persistent baseline set up on this context still holds.
    ReplacedOther,
    /// This target was already the active one; nothing changed.
    AlreadyActive,
}

/// Process-wide graphics bookkeeping, made explicit and injectable.
///
/// Render targets and resources share one `GraphicsDeviceContext`
/// (usually behind an `Arc`). It owns two monotonically increasing id
/// pools and the map from native context to the target last activated
/// on it.
#[derive(Debug, Default)]
pub struct GraphicsDeviceContext {
    /// Id pool for render targets. 0 is reserved for "none".
    target_ids: AtomicU64,
    /// Id pool for mutable resource states (texture contents).
    resource_ids: AtomicU64,
    /// Native context id → target last activated on that context.
    active_targets: Mutex<HashMap<ContextId, TargetId>>,
}

impl GraphicsDeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next render-target id. Thread-safe, starts at 1.
    #[inline]
    pub fn next_target_id(&self) -> TargetId {
        TargetId(self.target_ids.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Issues the next resource-state id. Thread-safe, starts at 1.
    #[inline]
    pub fn next_resource_id(&self) -> ResourceId {
        ResourceId(self.resource_ids.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Whether `target` is the one last activated on `context`.
    pub fn is_active(&self, context: ContextId, target: TargetId) -> bool {
        self.active_targets.lock().get(&context) == Some(&target)
    }

    /// Records `target` as the active one on `context`.
    pub fn mark_active(&self, context: ContextId, target: TargetId) -> Activation {
        match self.active_targets.lock().insert(context, target) {
            None => Activation::FirstInContext,
            Some(previous) if previous == target => Activation::AlreadyActive,
            Some(_) => Activation::ReplacedOther,
        }
    }

    /// Removes the tracking entry for `context` if it names `target`.
    ///
    /// A different target's entry is left alone: deactivating a target
    /// that was already superseded must not erase its successor.
    pub fn mark_inactive(&self, context: ContextId, target: TargetId) {
        let mut active = self.active_targets.lock();
        if active.get(&context) == Some(&target) {
            active.remove(&context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: ContextId = 1;

    // ── id pools ──────────────────────────────────────────────────────────

    #[test]
    fn target_ids_start_at_one_and_increase() {
        let device = GraphicsDeviceContext::new();
        let a = device.next_target_id();
        let b = device.next_target_id();
        assert_eq!(a, TargetId(1));
        assert_eq!(b, TargetId(2));
        assert_ne!(a, TargetId::NONE);
    }

    #[test]
    fn id_pools_are_independent() {
        let device = GraphicsDeviceContext::new();
        device.next_target_id();
        assert_eq!(device.next_resource_id(), ResourceId(1));
    }

    // ── active-target tracking ────────────────────────────────────────────

    #[test]
    fn first_activation_in_context() {
        let device = GraphicsDeviceContext::new();
        let id = device.next_target_id();

        assert!(!device.is_active(CTX, id));
        assert_eq!(device.mark_active(CTX, id), Activation::FirstInContext);
        assert!(device.is_active(CTX, id));
    }

    #[test]
    fn reactivation_is_a_noop() {
        let device = GraphicsDeviceContext::new();
        let id = device.next_target_id();

        device.mark_active(CTX, id);
        assert_eq!(device.mark_active(CTX, id), Activation::AlreadyActive);
    }

    #[test]
    fn switching_targets_replaces_entry() {
        let device = GraphicsDeviceContext::new();
        let a = device.next_target_id();
        let b = device.next_target_id();

        device.mark_active(CTX, a);
        assert_eq!(device.mark_active(CTX, b), Activation::ReplacedOther);
        assert!(device.is_active(CTX, b));
        assert!(!device.is_active(CTX, a));
    }

    #[test]
    fn contexts_are_tracked_independently() {
        let device = GraphicsDeviceContext::new();
        let a = device.next_target_id();
        let b = device.next_target_id();

        device.mark_active(1, a);
        assert_eq!(device.mark_active(2, b), Activation::FirstInContext);
        assert!(device.is_active(1, a));
        assert!(device.is_active(2, b));
    }

    #[test]
    fn deactivation_removes_own_entry_only() {
        let device = GraphicsDeviceContext::new();
        let a = device.next_target_id();
        let b = device.next_target_id();

        device.mark_active(CTX, a);
        device.mark_active(CTX, b);

        // `a` was superseded; its deactivation must not evict `b`.
        device.mark_inactive(CTX, a);
        assert!(device.is_active(CTX, b));

        device.mark_inactive(CTX, b);
        assert!(!device.is_active(CTX, b));
    }
}
