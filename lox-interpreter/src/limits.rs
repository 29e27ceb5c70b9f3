/// Deepest nesting of expressions or statements the parser accepts. Both the parser and the
/// tree-walking interpreter recurse once per level, so this bounds their stack usage.
pub(crate) const MAX_NESTING_DEPTH: usize = 128;
