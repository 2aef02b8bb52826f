/// Painter's algorithm ordering
///
/// Sorting by mean depth is exact for convex meshes and can pop or overlap
/// wrongly on concave or interpenetrating geometry.
use crate::frame::DrawCommand;
use crate::geometry::Triangle;

/// Mean camera-space z of the three vertices
pub fn avg_z(triangle: &Triangle) -> f32 {
    let [a, b, c] = &triangle.vertices;
    (a.z + b.z + c.z) / 3.0
}

/// Order draw commands farthest first. The sort is stable, so commands at
/// equal depth keep their mesh order.
pub fn depth_sort(commands: &mut [DrawCommand]) {
    commands.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}
