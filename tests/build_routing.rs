//! Build the routing tables of small hand made worlds and check the moves
//! they allow
//!

use bevy::prelude::*;
use bevy_grid_routing_plugin::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Width of every test grid
const WIDTH: usize = 8;
/// Height of every test grid
const HEIGHT: usize = 4;

/// Model space box spanning the given cells, `z` in model units
fn cells(x0: usize, y0: usize, x1: usize, y1: usize, z0: f32, z1: f32) -> Brush {
	Brush::new(
		Vec3::new(x0 as f32 * UNIT_SIZE, y0 as f32 * UNIT_SIZE, z0),
		Vec3::new((x1 + 1) as f32 * UNIT_SIZE, (y1 + 1) as f32 * UNIT_SIZE, z1),
	)
}

/// Ground over the whole grid with its surface at `z = 0`
fn ground() -> Brush {
	cells(0, 0, WIDTH - 1, WIDTH - 1, -16.0, 0.0)
}

/// A roofed hall split along `x = 4` by a wall with a doorway at `y = 2`
/// open from `sill` up to `lintel` model units
fn doorway_world(sill: f32, lintel: f32) -> BrushWorld {
	let mut world = BrushWorld::new(vec![
		ground(),
		cells(0, 0, WIDTH - 1, WIDTH - 1, UNIT_HEIGHT, UNIT_HEIGHT + 16.0),
		cells(4, 0, 4, 1, 0.0, UNIT_HEIGHT),
		cells(4, 3, 4, WIDTH - 1, 0.0, UNIT_HEIGHT),
		cells(4, 2, 4, 2, lintel, UNIT_HEIGHT),
	]);
	if sill > 0.0 {
		world.add(cells(4, 2, 4, 2, 0.0, sill));
	}
	world
}

/// A roofed room over the cells `1..=3` along both axes
fn room_world() -> BrushWorld {
	let top = UNIT_HEIGHT;
	BrushWorld::new(vec![
		ground(),
		cells(0, 0, WIDTH - 1, WIDTH - 1, top, top + 16.0),
		cells(0, 0, 0, WIDTH - 1, 0.0, top),
		cells(4, 0, WIDTH - 1, WIDTH - 1, 0.0, top),
		cells(1, 0, 3, 0, 0.0, top),
		cells(1, 4, 3, WIDTH - 1, 0.0, top),
	])
}

/// Two terraces meeting at `x = 4`, the eastern one high enough that its
/// floor sits within the level above
fn terrace_world() -> BrushWorld {
	BrushWorld::new(vec![
		ground(),
		cells(0, 0, 3, WIDTH - 1, 0.0, 56.0),
		cells(4, 0, WIDTH - 1, WIDTH - 1, 0.0, 68.0),
	])
}

/// Open ground scattered with blocks of random heights and a door, an
/// inline model, covering the cells `(3..=4, 5)`
fn cluttered_world(seed: u64) -> BrushWorld {
	let mut rng = StdRng::seed_from_u64(seed);
	let mut world = BrushWorld::new(vec![ground()]);
	for _ in 0..12 {
		let x = rng.random_range(0..WIDTH);
		let y = rng.random_range(0..WIDTH);
		let height = rng.random_range(1..48) as f32 * 4.0;
		world.add(cells(x, y, x, y, 0.0, height));
	}
	world.add(cells(3, 5, 4, 5, 0.0, UNIT_HEIGHT).with_model("*door"));
	world
}

fn build(world: &BrushWorld, settings: &RoutingSettings) -> RoutingTables {
	let mut tables = RoutingTables::new(GridDimensions::new(WIDTH, HEIGHT));
	tables.build(world, &ExcludeList::default(), settings);
	tables
}

/// Every distinct place of the column `(x, y)` as absolute `(floor, ceiling)`
fn column_places(table: &RoutingTable, x: usize, y: usize) -> Vec<(i32, i32)> {
	let mut places: Vec<(i32, i32)> = (0..HEIGHT)
		.map(|z| Place::new(table, x, y, z))
		.filter(|place| place.is_usable())
		.map(|place| (place.floor(), place.ceiling()))
		.collect();
	places.dedup();
	places
}

#[test]
fn flat_room_is_fully_connected() {
	let tables = build(&room_world(), &RoutingSettings::default());
	let size = ActorSize::Normal;
	let room = 1..=3;
	for y in room.clone() {
		for x in room.clone() {
			assert_eq!(0, tables.get_floor(size, x, y, 0));
			assert_eq!(CELL_HEIGHT, tables.get_ceiling(size, x, y, 0));
			for ordinal in Ordinal::ALL {
				let (dx, dy) = ordinal.offset();
				let ax = x as i32 + dx;
				let ay = y as i32 + dy;
				let inside = (1..=3).contains(&ax) && (1..=3).contains(&ay);
				let connection = tables.get_connection(size, x, y, 0, ordinal);
				if inside {
					assert_eq!(CELL_HEIGHT, connection);
					assert_eq!(Stepup::FLAT, tables.get_stepup(size, x, y, 0, ordinal));
				} else {
					assert_eq!(0, connection);
				}
			}
		}
	}
}

#[test]
fn step_onto_block() {
	let world = BrushWorld::new(vec![ground(), cells(4, 0, WIDTH - 1, WIDTH - 1, 0.0, 12.0)]);
	let tables = build(&world, &RoutingSettings::default());
	let size = ActorSize::Normal;
	assert_eq!(
		Stepup::new(3, LevelChange::Same),
		tables.get_stepup(size, 3, 3, 0, Ordinal::East)
	);
	assert_eq!(HEIGHT as i32 * CELL_HEIGHT - 3, tables.get_connection(size, 3, 3, 0, Ordinal::East));
	// stepping down is never a climb
	assert_eq!(Stepup::FLAT, tables.get_stepup(size, 4, 3, 0, Ordinal::West));
}

#[test]
fn doorway_of_smallest_opening() {
	let tables = build(&doorway_world(8.0, 32.0), &RoutingSettings::default());
	let size = ActorSize::Normal;
	assert_eq!(2, tables.get_floor(size, 4, 2, 0));
	assert_eq!(8, tables.get_ceiling(size, 4, 2, 0));
	// measured from the sill rather than the floor of the hall
	assert_eq!(MIN_OPENING, tables.get_connection(size, 3, 2, 0, Ordinal::East));
	assert_eq!(
		Stepup::new(2, LevelChange::Same),
		tables.get_stepup(size, 3, 2, 0, Ordinal::East)
	);
}

#[test]
fn doorway() {
	let tables = build(&doorway_world(0.0, 48.0), &RoutingSettings::default());
	let size = ActorSize::Normal;
	assert_eq!(12, tables.get_connection(size, 3, 2, 0, Ordinal::East));
	assert_eq!(Stepup::FLAT, tables.get_stepup(size, 3, 2, 0, Ordinal::East));
	assert_eq!(0, tables.get_connection(size, 3, 1, 0, Ordinal::East));
	assert_eq!(12, tables.get_ceiling(size, 4, 2, 0));
	// the hall is tall enough to stand in, the doorway is not
	assert!(tables.can_actor_stand_here(size, GridPos::new(3, 2, 0)));
	assert!(!tables.can_actor_stand_here(size, GridPos::new(4, 2, 0)));
}

#[test]
fn doorway_too_low_is_closed() {
	let tables = build(&doorway_world(0.0, 20.0), &RoutingSettings::default());
	let size = ActorSize::Normal;
	assert!(tables.get(size).is_filled(4, 2, 0));
	assert_eq!(0, tables.get_connection(size, 3, 2, 0, Ordinal::East));
	assert_eq!(Stepup::NO_STEPUP, tables.get_stepup(size, 3, 2, 0, Ordinal::East));
}

#[test]
fn roof_of_the_hall() {
	let tables = build(&doorway_world(0.0, 48.0), &RoutingSettings::default());
	let size = ActorSize::Normal;
	let roof = GridPos::new(2, 2, 1);
	assert_eq!(80.0, tables.floor_model(size, roof));
	assert_eq!(Some(1), tables.fall(size, GridPos::new(2, 2, 3)));
	assert!(tables.all_cells_below_are_filled(size, GridPos::new(4, 1, 1)));
	// open sky above the roof, measured from the roof surface
	let roof_top = 20;
	assert_eq!(
		HEIGHT as i32 * CELL_HEIGHT - roof_top,
		tables.get_connection(size, 2, 2, 1, Ordinal::North)
	);
}

#[test]
fn climb_onto_higher_terrace() {
	let tables = build(&terrace_world(), &RoutingSettings::default());
	let size = ActorSize::Normal;
	let stepup = tables.get_stepup(size, 3, 3, 0, Ordinal::East);
	assert_eq!(StepHeight::Height(3), stepup.height());
	assert_eq!(LevelChange::Up, stepup.level_change());
	assert_eq!("3^", stepup.to_string());
	let expected = [47, 47, 32, 16];
	for (z, size_quant) in expected.iter().enumerate() {
		assert_eq!(*size_quant, tables.get_connection(size, 3, 3, z, Ordinal::East));
	}
	// the levels above only continue the passage
	assert_eq!(Stepup::FLAT, tables.get_stepup(size, 3, 3, 1, Ordinal::East));
	// the way back down lands on the level below
	let back = tables.get_stepup(size, 4, 3, 1, Ordinal::West);
	assert_eq!(LevelChange::Down, back.level_change());
	assert!(back.climb() <= MAX_STEPUP);
	assert_eq!(47, tables.get_connection(size, 4, 3, 1, Ordinal::West));
	assert!(tables.get(size).is_filled(4, 3, 0));
}

#[test]
fn reverse_connection_of_level_change() {
	let world = terrace_world();
	let dimensions = GridDimensions::new(WIDTH, HEIGHT);
	let exclude = ExcludeList::default();
	let settings = RoutingSettings {
		write_reverse_connections: true,
		..Default::default()
	};
	let mut table = RoutingTable::new(dimensions);
	let mut ctx = RoutingContext::new(&world, &mut table, ActorSize::Normal, &exclude, &settings);
	ctx.scan_floors_in_box(&GridBox::full(&dimensions));
	ctx.update_connection_column(3, 3, Ordinal::East);
	assert_eq!(47, table.get_connection(4, 3, 1, Ordinal::West));
	assert_eq!(
		Stepup::new(0, LevelChange::Down),
		table.get_stepup(4, 3, 1, Ordinal::West)
	);
}

#[test]
fn reverse_connection_respects_write_bounds() {
	let world = terrace_world();
	let dimensions = GridDimensions::new(WIDTH, HEIGHT);
	let exclude = ExcludeList::default();
	let settings = RoutingSettings {
		write_reverse_connections: true,
		..Default::default()
	};
	let mut table = RoutingTable::new(dimensions);
	let bounds = GridBox::new(GridPos::new(0, 0, 0), GridPos::new(3, WIDTH - 1, HEIGHT - 1));
	let mut ctx = RoutingContext::new(&world, &mut table, ActorSize::Normal, &exclude, &settings)
		.with_write_bounds(bounds);
	ctx.scan_floors_in_box(&GridBox::full(&dimensions));
	ctx.update_connection_column(3, 3, Ordinal::East);
	assert!(ctx.table().get_connection(3, 3, 0, Ordinal::East) > 0);
	assert_eq!(0, ctx.table().get_connection(4, 3, 1, Ordinal::West));
}

#[test]
fn table_invariants() {
	for seed in 0..4 {
		let tables = build(&cluttered_world(seed), &RoutingSettings::default());
		for size in ActorSize::ALL {
			let table = tables.get(size);
			for z in 0..HEIGHT {
				for y in 0..WIDTH {
					for x in 0..WIDTH {
						let filled = table.is_filled(x, y, z);
						if !filled {
							let floor = table.get_floor(x, y, z);
							let ceiling = table.get_ceiling(x, y, z);
							assert!(ceiling - floor >= MIN_OPENING);
							assert!(ceiling + z as i32 * CELL_HEIGHT <= HEIGHT as i32 * CELL_HEIGHT);
						}
						for ordinal in Ordinal::ALL {
							let connection = table.get_connection(x, y, z, ordinal);
							if filled {
								assert_eq!(0, connection);
							}
							if connection == 0 {
								assert_eq!(Stepup::NO_STEPUP, table.get_stepup(x, y, z, ordinal));
							}
						}
					}
				}
			}
		}
	}
}

#[test]
fn rerouting_unchanged_world_changes_nothing() {
	let world = cluttered_world(11);
	let settings = RoutingSettings::default();
	let mut tables = build(&world, &settings);
	let before = tables.clone();
	let everything = GridBox::full(tables.dimensions());
	tables.reroute_box(&world, &ExcludeList::default(), &settings, &everything);
	assert_eq!(before, tables);
}

#[test]
fn opening_a_door_matches_rebuild() {
	for seed in 0..4 {
		let mut world = cluttered_world(seed);
		let settings = RoutingSettings::default();
		let mut tables = build(&world, &settings);
		assert_eq!(1, world.remove_model("*door"));
		let region = GridBox::new(GridPos::new(3, 5, 0), GridPos::new(4, 5, HEIGHT - 1));
		tables.reroute_box(&world, &ExcludeList::default(), &settings, &region);
		assert_eq!(build(&world, &settings), tables);
	}
}

#[test]
fn excluding_the_door_matches_removing_it() {
	let world = cluttered_world(7);
	let settings = RoutingSettings::default();
	let mut tables = RoutingTables::new(GridDimensions::new(WIDTH, HEIGHT));
	let exclude = ExcludeList::new(vec!["*door".to_string()]);
	tables.build(&world, &exclude, &settings);
	let mut without = world.clone();
	without.remove_model("*door");
	assert_eq!(build(&without, &settings), tables);
}

#[test]
fn rescanning_from_higher_levels_never_lowers_a_ceiling() {
	let worlds = [
		(doorway_world(8.0, 32.0), [(2, 2), (4, 2)]),
		(terrace_world(), [(3, 3), (4, 3)]),
	];
	let exclude = ExcludeList::default();
	let settings = RoutingSettings::default();
	for (world, columns) in worlds.iter() {
		for (x, y) in columns.iter().copied() {
			let mut previous: Vec<(i32, i32)> = Vec::new();
			for max_z in 0..HEIGHT {
				let mut table = RoutingTable::new(GridDimensions::new(WIDTH, HEIGHT));
				RoutingContext::new(world, &mut table, ActorSize::Normal, &exclude, &settings)
					.scan_column(x, y, max_z);
				let places = column_places(&table, x, y);
				for (floor, ceiling) in places.iter() {
					// the ground is the lowest surface of every column
					assert!(*floor >= 0, "({}, {}) from {} floor {}", x, y, max_z, floor);
					if let Some((_, earlier)) = previous.iter().find(|(f, _)| f == floor) {
						assert!(
							ceiling >= earlier,
							"({}, {}) from {} lowered ceiling {} to {}",
							x,
							y,
							max_z,
							earlier,
							ceiling
						);
					}
				}
				previous = places;
			}
		}
	}
}
