//! Various constants used for laying out the chars of a line.

/// The char tabs are replaced with.
pub const TAB_REPLACEMENT: char = ' ';

/// The tab char.
pub const TAB: char = '\t';
