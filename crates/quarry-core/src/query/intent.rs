///
/// QueryIntent
///
/// Parsed, immutable description of a derived query. Built by the backend
/// from a method name; this crate only reads its result-shaping flags.
///

pub trait QueryIntent {
    /// Result cap declared by the method (`findTop5By...`), if any.
    fn max_results(&self) -> Option<u32>;

    /// True when the method declares a result cap.
    fn is_limiting(&self) -> bool {
        self.max_results().is_some()
    }

    /// True for `existsBy...` methods.
    fn is_exists_projection(&self) -> bool;

    /// True for `countBy...` methods, whose primary result is itself a count.
    fn is_count_projection(&self) -> bool;
}
