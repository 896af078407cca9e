//! Runtime platform capability queries.
//!
//! Both answers are advisory. The cipher selects its backend at runtime and
//! falls back to a constant-time software implementation, so acceleration
//! only affects speed.

/// Whether AES-GCM can be used on this platform.
///
/// Always `true`: the portable backend has no platform requirements.
pub fn is_supported() -> bool {
    true
}

/// Whether the CPU exposes AES round and carry-less multiply instructions.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn is_hardware_accelerated() -> bool {
    std::arch::is_x86_feature_detected!("aes") && std::arch::is_x86_feature_detected!("pclmulqdq")
}

/// Whether the CPU exposes AES round and polynomial multiply instructions.
///
/// Rust's aarch64 `aes` target feature covers both AES and PMULL.
#[cfg(target_arch = "aarch64")]
pub fn is_hardware_accelerated() -> bool {
    std::arch::is_aarch64_feature_detected!("aes")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub fn is_hardware_accelerated() -> bool {
    false
}
