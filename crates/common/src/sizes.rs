//! Legal-size descriptors and the capability report.
//!
//! These types are serialised as JSON when a host surfaces cipher metadata
//! (e.g. in a health or diagnostics endpoint).

use serde::{Deserialize, Serialize};

/// The only authentication tag length accepted, in bytes.
pub const TAG_LEN: usize = 16;

/// AES-GCM nonce length, in bytes.
pub const NONCE_LEN: usize = 12;

// ---------------------------------------------------------------------------
// KeySizes
// ---------------------------------------------------------------------------

/// A set of legal byte lengths described as `min..=max` in steps of `skip`.
///
/// A `skip_size` of zero means only `min_size` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySizes {
    /// Smallest legal length.
    pub min_size: usize,
    /// Largest legal length.
    pub max_size: usize,
    /// Step between legal lengths.
    pub skip_size: usize,
}

impl KeySizes {
    /// Construct a size set.
    pub const fn new(min_size: usize, max_size: usize, skip_size: usize) -> Self {
        Self {
            min_size,
            max_size,
            skip_size,
        }
    }

    /// A set containing exactly one length.
    pub const fn fixed(size: usize) -> Self {
        Self::new(size, size, 1)
    }

    /// Returns `true` if `len` is one of the legal lengths.
    pub fn contains(&self, len: usize) -> bool {
        if len < self.min_size || len > self.max_size {
            return false;
        }
        if self.skip_size == 0 {
            return len == self.min_size;
        }
        (len - self.min_size) % self.skip_size == 0
    }

    /// Iterate over every legal length in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let step = self.skip_size.max(1);
        let max = if self.skip_size == 0 {
            self.min_size
        } else {
            self.max_size
        };
        (self.min_size..=max).step_by(step)
    }
}

// ---------------------------------------------------------------------------
// Capability report
// ---------------------------------------------------------------------------

/// Snapshot of what the strict AES-GCM implementation accepts on this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    /// Whether AES-GCM can be used at all on this platform.
    pub supported: bool,
    /// Whether the CPU provides AES and carry-less multiply instructions.
    pub hardware_accelerated: bool,
    /// Legal key lengths.
    pub key_sizes: KeySizes,
    /// Legal nonce lengths.
    pub nonce_sizes: KeySizes,
    /// Legal tag lengths. Always exactly [`TAG_LEN`].
    pub tag_sizes: KeySizes,
}
