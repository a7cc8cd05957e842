//! Mapping between VM memory segments and the Hack RAM layout.

use crate::parser::Segment;

/// Base address of the temp segment (RAM[5..13]).
pub const TEMP_BASE: u16 = 5;

/// How a segment's operand address is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// The index itself is the operand (constant).
    Immediate,
    /// Base register plus index (argument, local, this, that).
    Pointed(&'static str),
    /// A fixed RAM address or predefined symbol (temp, pointer).
    Fixed,
    /// A symbol named after the current source unit (static).
    Unit,
}

/// Classify a segment for code generation.
pub fn segment_kind(segment: Segment) -> SegmentKind {
    match segment {
        Segment::Constant => SegmentKind::Immediate,
        Segment::Argument => SegmentKind::Pointed("ARG"),
        Segment::Local => SegmentKind::Pointed("LCL"),
        Segment::This => SegmentKind::Pointed("THIS"),
        Segment::That => SegmentKind::Pointed("THAT"),
        Segment::Pointer | Segment::Temp => SegmentKind::Fixed,
        Segment::Static => SegmentKind::Unit,
    }
}

/// RAM address of a temp slot. The parser guarantees `index <= 7`.
#[inline]
pub fn temp_address(index: u16) -> u16 {
    TEMP_BASE + index
}

/// Predefined symbol addressed by the pointer segment.
/// The parser guarantees `index` is 0 or 1.
#[inline]
pub fn pointer_symbol(index: u16) -> &'static str {
    if index == 0 { "THIS" } else { "THAT" }
}
