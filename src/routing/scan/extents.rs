//! Find the part of the grid covered by level geometry so the routing
//! passes can skip the empty space around a map
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Whether any geometry lies within the columns `x0..=x1` by `y0..=y1`,
/// from one quant below the grid to its top
fn slab_is_occupied(
	trace: &dyn TraceService,
	dimensions: &GridDimensions,
	exclude: &ExcludeList,
	(x0, x1): (usize, usize),
	(y0, y1): (usize, usize),
) -> bool {
	let mins = Vec3::new(x0 as f32 * UNIT_SIZE, y0 as f32 * UNIT_SIZE, -QUANT);
	let maxs = Vec3::new(
		(x1 + 1) as f32 * UNIT_SIZE,
		(y1 + 1) as f32 * UNIT_SIZE,
		dimensions.model_top(),
	);
	let centre = (mins + maxs) / 2.0;
	let extents = TraceBox::new(mins - centre, maxs - centre);
	trace
		.trace(centre, centre, &extents, TraceMode::Solid, exclude)
		.is_obstructed()
}

/// Shrink the full grid along `x` and `y` to the smallest box of columns
/// holding geometry. Every level is kept. `None` when the grid is empty
pub fn find_map_extents(
	trace: &dyn TraceService,
	dimensions: &GridDimensions,
	exclude: &ExcludeList,
) -> Option<GridBox> {
	let last = dimensions.width() - 1;
	let all = (0, last);
	let occupied_x = |x: usize| slab_is_occupied(trace, dimensions, exclude, (x, x), all);
	let occupied_y = |y: usize| slab_is_occupied(trace, dimensions, exclude, all, (y, y));
	let min_x = (0..=last).find(|x| occupied_x(*x))?;
	let max_x = (min_x..=last).rev().find(|x| occupied_x(*x))?;
	let min_y = (0..=last).find(|y| occupied_y(*y))?;
	let max_y = (min_y..=last).rev().find(|y| occupied_y(*y))?;
	let extents = GridBox::new(
		GridPos::new(min_x, min_y, 0),
		GridPos::new(max_x, max_y, dimensions.height() - 1),
	);
	debug!("Map extents {:?}", extents);
	Some(extents)
}
