//! Single-threaded bulk fill and copy
//!
//! These are the baselines: one call over the whole region that lowers to the
//! platform `memset` / `memcpy`, independent of build profile.

use crate::error::{Error, Result};

/// Fill `buf` with `value` via `memset`
#[inline]
pub fn bulk_set(buf: &mut [u8], value: u8) {
    // SAFETY: the pointer and length come from a live exclusive slice
    unsafe {
        std::ptr::write_bytes(buf.as_mut_ptr(), value, buf.len());
    }
}

/// Copy `src` into `dest` via `memcpy`
#[inline]
pub fn bulk_copy(dest: &mut [u8], src: &[u8]) -> Result<()> {
    if dest.len() != src.len() {
        return Err(Error::LengthMismatch {
            src: src.len(),
            dest: dest.len(),
        });
    }
    dest.copy_from_slice(src);
    Ok(())
}
