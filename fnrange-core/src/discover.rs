//! Function discovery over a lowered syntax tree
//!
//! Global invariants enforced:
//! - The global-code record comes first and spans the whole text
//! - Function-like nodes are reported in pre-order (document order)
//! - Every node is visited, whatever the nesting depth

use crate::ast::SyntaxTree;
use crate::naming::{NamingContext, NamingMode, GLOBAL_CODE_PREFIX};
use crate::position::LineIndex;
use crate::range::{NamedRange, RangeError};

/// Collect the named ranges for one file
///
/// `source` must be the text `tree` was lowered from.
pub fn discover_named_ranges(
    tree: &SyntaxTree,
    source: &str,
    file_identifier: &str,
    mode: NamingMode,
) -> Result<Vec<NamedRange>, RangeError> {
    let index = LineIndex::new(source);
    let naming = NamingContext::new(tree, mode);

    let mut ranges = vec![NamedRange::new(
        format!("{}{}", GLOBAL_CODE_PREFIX, file_identifier),
        index.position_at(0),
        index.position_at(source.len()),
    )?];

    for id in tree.preorder() {
        if !tree.kind(id).is_function_like() {
            continue;
        }

        let range = tree.node(id).range;
        ranges.push(NamedRange::new(
            naming.infer_name(id),
            index.position_at(range.start),
            index.position_at(range.end),
        )?);
    }

    Ok(ranges)
}

#[cfg(test)]
#[path = "discover/tests.rs"]
mod tests;
