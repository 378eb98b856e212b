//! Graph geometry: fixed spacing constants, grid placement and normalization

use kubeforge_common::{FlowNode, Position};

/// Horizontal distance between neighbouring columns
pub const COLUMN_SPACING: f64 = 250.0;
/// Vertical space taken by one workload row without upstream nodes
pub const ROW_HEIGHT: f64 = 180.0;
/// Vertical distance between stacked upstream ConfigMap/Secret nodes
pub const UPSTREAM_SPACING: f64 = 90.0;
/// Pod nodes sit one column left of their workload and this much lower
pub const POD_OFFSET_Y: f64 = 60.0;
/// Height of one grid cell before attached nodes
pub const CELL_HEIGHT: f64 = 130.0;
/// Vertical distance between a ServiceAccount and its attached secret nodes
pub const ATTACHED_SPACING: f64 = 80.0;
/// Gap left under a namespace node before the next group starts
pub const GROUP_GAP: f64 = 120.0;
/// x of the anchor column (workloads and grid origins)
pub const ANCHOR_X: f64 = 500.0;
/// Columns used by per-namespace grids
pub const GROUP_COLUMNS: usize = 2;
/// Columns used when a single kind is shown on its own
pub const STANDALONE_COLUMNS: usize = 3;
/// Inset of the top-left node after normalization
pub const CANVAS_PADDING: f64 = 50.0;

/// Row-major placement of cells with per-cell heights.
///
/// Every row is as tall as its tallest cell. Returns the top-left corner of
/// each cell and the total height consumed.
pub fn grid_positions(origin: Position, columns: usize, heights: &[f64]) -> (Vec<Position>, f64) {
    let columns = columns.max(1);
    let mut positions = Vec::with_capacity(heights.len());
    let mut y = origin.y;

    for row in heights.chunks(columns) {
        for (col, _) in row.iter().enumerate() {
            positions.push(Position::new(origin.x + col as f64 * COLUMN_SPACING, y));
        }
        y += row.iter().copied().fold(0.0, f64::max);
    }

    (positions, y - origin.y)
}

/// Uniform grid of `count` cells
pub fn uniform_grid(origin: Position, columns: usize, count: usize) -> (Vec<Position>, f64) {
    grid_positions(origin, columns, &vec![CELL_HEIGHT; count])
}

/// Translate every node so the smallest x and y sit at [`CANVAS_PADDING`]
pub fn normalize(nodes: &mut [FlowNode]) {
    if nodes.is_empty() {
        return;
    }

    let min_x = nodes.iter().map(|n| n.position.x).fold(f64::INFINITY, f64::min);
    let min_y = nodes.iter().map(|n| n.position.y).fold(f64::INFINITY, f64::min);
    let dx = CANVAS_PADDING - min_x;
    let dy = CANVAS_PADDING - min_y;

    for node in nodes {
        node.position.x += dx;
        node.position.y += dy;
    }
}
