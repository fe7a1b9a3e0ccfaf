//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the output dimensions for a width-constrained resize.
///
/// Never enlarges: if the requested width is at least the original width,
/// the original dimensions are returned unchanged. Otherwise the height is
/// scaled to preserve the aspect ratio, rounded, and kept at least 1px.
///
/// # Arguments
/// * `original` - Display-oriented source dimensions (width, height)
/// * `requested_width` - Target width in pixels
///
/// # Returns
/// * `(width, height)` - Output dimensions, `width <= min(requested, original)`
///
/// # Examples
/// ```
/// # use photo_variants::imaging::calculate_resize_dimensions;
/// // 2000x1500 landscape at 800px wide → 800x600
/// assert_eq!(calculate_resize_dimensions((2000, 1500), 800), (800, 600));
///
/// // Requested width beyond the original is not upscaled
/// assert_eq!(calculate_resize_dimensions((2000, 1500), 3000), (2000, 1500));
/// ```
pub fn calculate_resize_dimensions(original: (u32, u32), requested_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;

    if requested_width >= orig_w || orig_w == 0 {
        return original;
    }

    let ratio = requested_width as f64 / orig_w as f64;
    let height = ((orig_h as f64 * ratio).round() as u32).max(1);
    (requested_width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_landscape_scales_height() {
        // 2000x1500 at 1000 → 1000x750
        assert_eq!(calculate_resize_dimensions((2000, 1500), 1000), (1000, 750));
    }

    #[test]
    fn resize_portrait_scales_height() {
        // 1500x2000 at 480 → 480x640
        assert_eq!(calculate_resize_dimensions((1500, 2000), 480), (480, 640));
    }

    #[test]
    fn resize_never_enlarges() {
        assert_eq!(calculate_resize_dimensions((2000, 1500), 3000), (2000, 1500));
    }

    #[test]
    fn resize_equal_width_keeps_original() {
        assert_eq!(calculate_resize_dimensions((1600, 900), 1600), (1600, 900));
    }

    #[test]
    fn resize_rounds_height() {
        // 1000x333 at 500 → 166.5 rounds to 167
        assert_eq!(calculate_resize_dimensions((1000, 333), 500), (500, 167));
    }

    #[test]
    fn resize_extreme_panorama_keeps_one_pixel_height() {
        assert_eq!(calculate_resize_dimensions((10000, 2), 100), (100, 1));
    }

    #[test]
    fn resize_output_width_bounded_by_request_and_original() {
        for &(orig, req) in &[((640, 480), 480), ((640, 480), 800), ((300, 900), 1280)] {
            let (w, _) = calculate_resize_dimensions(orig, req);
            assert!(w <= req.min(orig.0), "{orig:?} at {req} gave width {w}");
        }
    }
}
