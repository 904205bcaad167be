//! Plan reuse policy.
//!
//! Some backends cannot express "column = null" through a placeholder that
//! was compiled for a non-null value, so a null predicate argument forces a
//! structural rebuild where the backend can emit an IS NULL form instead.

///
/// RebuildReason
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RebuildReason {
    /// No cached plan exists for this preparer.
    Uncached,

    /// A cached plan exists but a bindable argument is null.
    NullParameter,
}

/// Return true when the cached plan may serve this call.
#[must_use]
pub(crate) const fn is_plan_reusable(cached_present: bool, any_bindable_null: bool) -> bool {
    cached_present && !any_bindable_null
}

/// Classify why a call that failed the reuse test must rebuild.
#[must_use]
pub(crate) const fn rebuild_reason(cached_present: bool) -> RebuildReason {
    if cached_present {
        RebuildReason::NullParameter
    } else {
        RebuildReason::Uncached
    }
}
