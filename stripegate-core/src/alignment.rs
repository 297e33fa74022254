//! Stripe/chunk size arithmetic
//!
//! `k × chunk_size_for(w)` is the smallest multiple of `k × base_alignment`
//! that is at least `w`, so stripe-to-chunk conversion stays invertible.

use crate::profile::Profile;

/// Round `value` up to the next multiple of `multiple`.
///
/// Saturates at the largest multiple that fits in a `usize` when the exact
/// result would overflow.
pub fn round_up_to(value: usize, multiple: usize) -> usize {
    value
        .div_ceil(multiple)
        .checked_mul(multiple)
        .unwrap_or(usize::MAX / multiple * multiple)
}

/// Padded stripe length for a stripe of `stripe_width` bytes
pub fn aligned_size(profile: &Profile, stripe_width: usize) -> usize {
    round_up_to(stripe_width, profile.k_alignment())
}

/// Per-shard chunk size for a stripe of `stripe_width` bytes.
///
/// Widths within `k × base_alignment` of `usize::MAX` saturate to the largest
/// aligned chunk size instead of overflowing.
pub fn chunk_size_for(profile: &Profile, stripe_width: usize) -> usize {
    aligned_size(profile, stripe_width) / profile.k
}

/// Stripe length implied by a chunk size.
///
/// Only meaningful for chunk sizes produced by [`chunk_size_for`]; the result
/// includes any padding added at encode time.
pub fn original_size_for(profile: &Profile, chunk_size: usize) -> usize {
    chunk_size * profile.k
}
