//! Constants for the fixed-width reader
//!
//! Element and attribute names of the schema document, plus the byte
//! signatures used when sniffing data files.

// =============================================================================
// Schema Document Vocabulary
// =============================================================================

/// Element and attribute names used by DDI-style codebooks
pub mod schema {
    /// Variable definition element, one per output column
    pub const VAR: &str = "var";

    /// Stable column identifier attribute on `var`
    pub const ID: &str = "ID";

    /// Implied decimal places attribute on `var` (0 = integer)
    pub const DECIMALS: &str = "dcml";

    /// Largest accepted `dcml`; 10^22 is the last exact power of ten in an f64
    pub const MAX_DECIMALS: u32 = 22;

    /// Child of `var` carrying the byte range
    pub const LOCATION: &str = "location";

    /// One-based inclusive first column of the field
    pub const START_POS: &str = "StartPos";

    /// One-based inclusive last column of the field
    pub const END_POS: &str = "EndPos";

    /// Category element, zero or more per `var`
    pub const CATEGORY: &str = "catgry";

    /// Child of `catgry` holding the raw code text
    pub const CATEGORY_VALUE: &str = "catValu";

    /// Child of `catgry` holding the human-readable label
    pub const CATEGORY_LABEL: &str = "labl";

    /// Attribute form of the raw code, used when `catValu` is absent
    pub const CATEGORY_VALUE_ATTR: &str = "value";
}

// =============================================================================
// Data File Sniffing
// =============================================================================

/// Leading bytes of every gzip member (RFC 1952)
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Read buffer capacity for data files
pub const READ_BUFFER_CAPACITY: usize = 64 * 1024;


// =============================================================================
// Read Statistics
// =============================================================================

/// Unmapped category diagnostics kept verbatim per table; later ones are only counted
pub const UNMAPPED_SAMPLE_LIMIT: usize = 100;
