use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifier of the source file a span points into, as assigned by the parser.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl Display for FileId {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "FileId({})", self.0)
    }
}

/// Represents a single compressed source location (file_id + offset).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocation(u32);

impl SourceLocation {
    const OFFSET_BITS: u32 = 22; // 4 MB max per file
    const OFFSET_MASK: u32 = (1 << Self::OFFSET_BITS) - 1;

    #[inline(always)]
    pub fn new(file_id: FileId, offset: u32) -> Self {
        debug_assert!(file_id.0 < (1 << (32 - Self::OFFSET_BITS)), "file_id overflow");
        debug_assert!(offset < (1 << Self::OFFSET_BITS), "offset overflow");
        let value = (file_id.0 << Self::OFFSET_BITS) | (offset & Self::OFFSET_MASK);
        Self(value)
    }

    #[inline(always)]
    pub fn file_id(&self) -> FileId {
        FileId(self.0 >> Self::OFFSET_BITS)
    }

    #[inline(always)]
    pub fn offset(&self) -> u32 {
        self.0 & Self::OFFSET_MASK
    }
}

/// Represents a span in a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        debug_assert_eq!(start.file_id(), end.file_id(), "Span across files not allowed");
        Self { start, end }
    }

    /// Span covering `start..end` offsets of a single file.
    pub fn from_offsets(file_id: FileId, start: u32, end: u32) -> Self {
        Self::new(SourceLocation::new(file_id, start), SourceLocation::new(file_id, end))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn file_id(&self) -> FileId {
        self.start.file_id()
    }

    pub fn start_offset(&self) -> u32 {
        self.start.offset()
    }

    pub fn end_offset(&self) -> u32 {
        self.end.offset()
    }
}

impl Debug for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SourceSpan(fileid={}, offset={}..{})",
            self.start.file_id().0,
            self.start.offset(),
            self.end.offset()
        )
    }
}

impl Display for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.file_id().0, self.start_offset(), self.end_offset())
    }
}
