//! Pure calculation functions for grid geometry and annotation placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Size of the composed canvas for a `rows × cols` grid of equal cells.
///
/// # Examples
/// ```
/// # use cropgrid::imaging::calculations::canvas_dimensions;
/// // 2×2 grid of 1000×500 crops → 2000×1000
/// assert_eq!(canvas_dimensions(2, 2, (1000, 500)), (2000, 1000));
/// ```
pub fn canvas_dimensions(rows: u32, cols: u32, cell: (u32, u32)) -> (u32, u32) {
    (cols * cell.0, rows * cell.1)
}

/// Top-left pixel of the grid cell holding image `index`.
///
/// Cells are filled row-major: `row = index / cols`, `col = index % cols`.
pub fn cell_origin(index: usize, cols: u32, cell: (u32, u32)) -> (u32, u32) {
    let cols = cols as usize;
    let row = (index / cols) as u32;
    let col = (index % cols) as u32;
    (col * cell.0, row * cell.1)
}

/// Annotation font size in pixels, proportional to the crop height.
///
/// Never smaller than one pixel, so tiny crops still get (unreadable) text
/// rather than a zero-sized scale.
pub fn font_px(crop_height: u32, divisor: u32) -> u32 {
    (crop_height / divisor.max(1)).max(1)
}

/// Outline thickness for annotation text, scaled from the font size.
pub fn outline_radius(font_px: u32, divisor: u32) -> u32 {
    (font_px / divisor.max(1)).max(1)
}

/// Origin of annotation line `line` (0-based), stacked downward from the margins.
///
/// Coordinates saturate at `i32::MAX`; such a line is simply off the canvas.
pub fn line_origin(line: usize, margin: (u32, u32), line_height: u32) -> (i32, i32) {
    let (margin_x, margin_y) = margin;
    let y = (line as u64)
        .saturating_mul(line_height as u64)
        .saturating_add(margin_y as u64);
    (clamp_to_i32(margin_x as u64), clamp_to_i32(y))
}

fn clamp_to_i32(value: u64) -> i32 {
    value.min(i32::MAX as u64) as i32
}

/// The eight offsets at which the shadow copy of a line is drawn.
///
/// Axis-aligned neighbours first, then diagonals; together they form a
/// border of `radius` pixels around the glyphs.
pub fn outline_offsets(radius: i32) -> [(i32, i32); 8] {
    let r = radius;
    [
        (-r, 0),
        (r, 0),
        (0, -r),
        (0, r),
        (-r, -r),
        (r, -r),
        (-r, r),
        (r, r),
    ]
}
