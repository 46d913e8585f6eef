//! Page and figure geometry shared by the rendering backends.
//!
//! Reports are laid out on US-letter pages with one-inch margins; figures
//! are rasterized at print resolution and placed at their nominal inch
//! dimensions.

pub const PAGE_WIDTH_PT: f64 = 612.0;
pub const PAGE_HEIGHT_PT: f64 = 792.0;
pub const PAGE_MARGIN_PT: f64 = 72.0;
pub const CONTENT_WIDTH_PT: f64 = PAGE_WIDTH_PT - 2.0 * PAGE_MARGIN_PT;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const FIGURE_DPI: u32 = 300;
pub const FIGURE_WIDTH_IN: f64 = 6.0;

#[cfg(test)]
mod tests {
    use super::{
        CONTENT_WIDTH_PT, FIGURE_DPI, FIGURE_WIDTH_IN, PAGE_HEIGHT_PT, PAGE_MARGIN_PT,
        PAGE_WIDTH_PT, POINTS_PER_INCH,
    };

    #[test]
    fn page_geometry_is_consistent() {
        assert_eq!(CONTENT_WIDTH_PT, 468.0);
        assert!(PAGE_WIDTH_PT < PAGE_HEIGHT_PT);
        assert!(2.0 * PAGE_MARGIN_PT < PAGE_WIDTH_PT);
        assert_eq!(FIGURE_WIDTH_IN * POINTS_PER_INCH, CONTENT_WIDTH_PT);
    }

    #[test]
    fn figure_resolution_is_print_quality() {
        assert!(FIGURE_DPI >= 150);
    }
}
