//! Result-window correction for limiting and existence intents.

use crate::query::{backend::ExecutableQuery, intent::QueryIntent};

/// Apply the intent's result cap to an already-bound query.
///
/// When pagination asked for a page larger than the method's own cap, the
/// page offset was computed from the larger size; it is shifted back by the
/// difference so the capped window lands on the same absolute position.
/// Existence checks always end with a cap of one row.
pub fn restrict_max_results<Q, I>(query: &mut Q, intent: &I)
where
    Q: ExecutableQuery + ?Sized,
    I: QueryIntent + ?Sized,
{
    if intent.is_limiting()
        && let Some(limit) = intent.max_results()
    {
        if let Some(requested) = query.max_results()
            && requested > limit
            && query.first_result() > 0
        {
            let shift = u64::from(requested - limit);
            query.set_first_result(query.first_result().saturating_sub(shift));
        }

        query.set_max_results(limit);
    }

    if intent.is_exists_projection() {
        query.set_max_results(1);
    }
}
