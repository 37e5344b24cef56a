//! Named merge operations.
//!
//! The artifact format records the comparator's merge step by name rather
//! than embedding its implementation, so every merge operation used inside a
//! model must be registered here before an artifact referencing it can be
//! loaded. Call [`register_builtin_ops`] once at process start, before any
//! artifact load.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::LazyLock;

use candle_core::Tensor;
use parking_lot::RwLock;

/// Signature of a merge operation: two embedding batches of identical shape
/// in, one batch of the same shape out.
pub type MergeFn = fn(&Tensor, &Tensor) -> candle_core::Result<Tensor>;

/// Registered name of [`absolute_difference`].
pub const ABSOLUTE_DIFFERENCE: &str = "absolute_difference";

static REGISTRY: LazyLock<RwLock<HashMap<String, MergeFn>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Element-wise absolute difference between two embedding batches.
///
/// Commutative by construction (`|a - b| == |b - a|`) and zero exactly when
/// the embeddings are identical.
pub fn absolute_difference(a: &Tensor, b: &Tensor) -> candle_core::Result<Tensor> {
    a.sub(b)?.abs()
}

/// Registers a merge operation under `name`, replacing any previous entry.
pub fn register_merge_op(name: &str, op: MergeFn) {
    REGISTRY.write().insert(name.to_string(), op);
}

/// Removes a merge operation from the registry. Returns `true` if it was
/// present.
pub fn unregister_merge_op(name: &str) -> bool {
    REGISTRY.write().remove(name).is_some()
}

/// Looks up a merge operation by name.
pub fn resolve_merge_op(name: &str) -> Option<MergeFn> {
    REGISTRY.read().get(name).copied()
}

/// Returns `true` if `name` is registered.
pub fn is_registered(name: &str) -> bool {
    REGISTRY.read().contains_key(name)
}

/// Registers every built-in merge operation. Idempotent.
pub fn register_builtin_ops() {
    register_merge_op(ABSOLUTE_DIFFERENCE, absolute_difference);
}
