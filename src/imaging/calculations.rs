//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `original` into the `max` box, preserving aspect ratio, never upscaling.
///
/// The width constraint is tried first: if scaling to `max.0` leaves the
/// height strictly under `max.1`, width is the limiting edge. Otherwise the
/// height is pinned to `max.1`. The free edge is rounded up.
///
/// # Arguments
/// * `original` - Source image dimensions (width, height)
/// * `max` - Bounding box (width, height)
///
/// # Examples
/// ```
/// # use photo_squeeze::imaging::fit_within;
/// // Already fits → unchanged
/// assert_eq!(fit_within((800, 600), (1280, 960)), (800, 600));
///
/// // 4:3 exactly filling the box takes the height branch
/// assert_eq!(fit_within((2048, 1536), (1280, 960)), (1280, 960));
///
/// // Panorama is width-limited
/// assert_eq!(fit_within((4000, 1000), (1280, 960)), (1280, 320));
/// ```
pub fn fit_within(original: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    let (max_w, max_h) = max;

    if orig_w <= max_w && orig_h <= max_h {
        return original;
    }

    // Cross-multiplied in u64 so no float rounding can push an edge past the box
    let (ow, oh, mw, mh) = (orig_w as u64, orig_h as u64, max_w as u64, max_h as u64);

    if mw * oh < mh * ow {
        // Width-constrained
        (max_w, (mw * oh).div_ceil(ow) as u32)
    } else {
        // Height-constrained
        ((mh * ow).div_ceil(oh) as u32, max_h)
    }
}
