//! Optimizations declared to the surrounding storage layer

use bitflags::bitflags;

bitflags! {
    /// Capability flags consumed by the storage layer when planning I/O.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PluginFlags: u32 {
        /// Reads may fetch only the shards covering the requested range.
        const PARTIAL_READ   = 0x0000_0001;
        /// Writes may rewrite only the touched shards.
        const PARTIAL_WRITE  = 0x0000_0002;
        /// Generic optimized erasure-coding path.
        const OPTIMIZED      = 0x0000_0004;
        /// Zero-length buffers are handled without padding them out.
        const ZERO_PADDING   = 0x0000_0008;
        /// Parity may be patched with a data delta.
        const PARITY_DELTA   = 0x0000_0010;
    }
}

impl PluginFlags {
    /// What this codec supports. Every operation is a full stripe round trip,
    /// so nothing partial and no delta updates.
    pub const fn supported() -> Self {
        Self::OPTIMIZED.union(Self::ZERO_PADDING)
    }
}
