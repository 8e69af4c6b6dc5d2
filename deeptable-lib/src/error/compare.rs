//! Comparator fault types

use crate::model::SemanticType;

/// A cell the comparator could not coerce to its column's type.
///
/// These never reach callers of [`Comparator::compare`](crate::sort::Comparator::compare):
/// they are logged and the pair is treated as equal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot order {found} cell as {semantic_type:?} in column '{column}'")]
pub struct CompareError {
    pub column: String,
    pub semantic_type: SemanticType,
    /// Type name of the offending cell.
    pub found: &'static str,
}
