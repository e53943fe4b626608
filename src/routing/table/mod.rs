//! The routing table records, for every cell and actor size, the floor and
//! ceiling of the space an actor can occupy along with the size of the
//! opening and the step needed to move into each of the 8 neighbours.
//!
//! Heights are stored in quant relative to the bottom of their cell. A
//! ceiling of `0` marks a cell that is filled, its floor is then
//! meaningless. A negative floor means the floor that belongs to the cell
//! lies further down the column.
//!

#[cfg(feature = "csv")]
pub mod csv_dump;
pub mod stepup;

use crate::prelude::*;
use bevy::prelude::*;

/// Routing data of one actor size
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTable {
	/// Shape of the grid the table covers
	dimensions: GridDimensions,
	/// Floor of each cell, quant above the bottom of the cell
	floor: Vec<i16>,
	/// Ceiling of each cell, quant above the bottom of the cell
	ceiling: Vec<u16>,
	/// Size in quant of the opening towards each neighbour
	connection: Vec<[u8; 8]>,
	/// Step needed to move towards each neighbour
	stepup: Vec<[Stepup; 8]>,
}

impl RoutingTable {
	/// Create a new instance of [RoutingTable] where every cell is filled
	/// and has no connections
	pub fn new(dimensions: GridDimensions) -> Self {
		let cells = dimensions.level_area() * dimensions.height();
		RoutingTable {
			dimensions,
			floor: vec![CELL_HEIGHT as i16; cells],
			ceiling: vec![0; cells],
			connection: vec![[0; 8]; cells],
			stepup: vec![[Stepup::NO_STEPUP; 8]; cells],
		}
	}
	/// Shape of the grid the table covers
	pub fn dimensions(&self) -> &GridDimensions {
		&self.dimensions
	}
	/// Flat index of a cell
	fn index(&self, x: usize, y: usize, z: usize) -> usize {
		let width = self.dimensions.width();
		if x >= width || y >= width || z >= self.dimensions.height() {
			panic!(
				"Cell ({}, {}, {}) is outside of a {}x{}x{} routing table",
				x,
				y,
				z,
				width,
				width,
				self.dimensions.height()
			);
		}
		(z * width + y) * width + x
	}
	/// Floor of a cell in quant relative to the bottom of the cell
	pub fn get_floor(&self, x: usize, y: usize, z: usize) -> i32 {
		self.floor[self.index(x, y, z)] as i32
	}
	/// Set the floor of a cell in quant relative to the bottom of the cell
	pub fn set_floor(&mut self, x: usize, y: usize, z: usize, floor: i32) {
		let i = self.index(x, y, z);
		self.floor[i] = floor as i16;
	}
	/// Ceiling of a cell in quant relative to the bottom of the cell
	pub fn get_ceiling(&self, x: usize, y: usize, z: usize) -> i32 {
		self.ceiling[self.index(x, y, z)] as i32
	}
	/// Set the ceiling of a cell in quant relative to the bottom of the cell
	pub fn set_ceiling(&mut self, x: usize, y: usize, z: usize, ceiling: i32) {
		if ceiling < 0 {
			panic!("Ceiling of cell ({}, {}, {}) cannot be negative: {}", x, y, z, ceiling);
		}
		let i = self.index(x, y, z);
		self.ceiling[i] = ceiling as u16;
	}
	/// Mark every level from `z_low` to `z_high` inclusive of the column as
	/// filled
	pub fn set_filled(&mut self, x: usize, y: usize, z_low: usize, z_high: usize) {
		for z in z_low..=z_high {
			self.set_floor(x, y, z, CELL_HEIGHT);
			self.set_ceiling(x, y, z, 0);
		}
	}
	/// Whether a cell is filled
	pub fn is_filled(&self, x: usize, y: usize, z: usize) -> bool {
		self.get_ceiling(x, y, z) == 0
	}
	/// Size in quant of the opening from a cell towards `ordinal`
	pub fn get_connection(&self, x: usize, y: usize, z: usize, ordinal: Ordinal) -> i32 {
		self.connection[self.index(x, y, z)][ordinal.index()] as i32
	}
	/// Set the size in quant of the opening from a cell towards `ordinal`
	pub fn set_connection(&mut self, x: usize, y: usize, z: usize, ordinal: Ordinal, size: i32) {
		if !(0..=u8::MAX as i32).contains(&size) {
			panic!(
				"Connection {} of cell ({}, {}, {}) towards {:?} is out of range",
				size, x, y, z, ordinal
			);
		}
		let i = self.index(x, y, z);
		self.connection[i][ordinal.index()] = size as u8;
	}
	/// Step needed to move from a cell towards `ordinal`
	pub fn get_stepup(&self, x: usize, y: usize, z: usize, ordinal: Ordinal) -> Stepup {
		self.stepup[self.index(x, y, z)][ordinal.index()]
	}
	/// Set the step needed to move from a cell towards `ordinal`
	pub fn set_stepup(&mut self, x: usize, y: usize, z: usize, ordinal: Ordinal, stepup: Stepup) {
		let i = self.index(x, y, z);
		self.stepup[i][ordinal.index()] = stepup;
	}
	/// Record that a cell cannot be left towards `ordinal`
	pub fn set_no_connection(&mut self, x: usize, y: usize, z: usize, ordinal: Ordinal) {
		self.set_connection(x, y, z, ordinal, 0);
		self.set_stepup(x, y, z, ordinal, Stepup::NO_STEPUP);
	}
	/// Remove every connection leading out of `region` from the cells along
	/// its edges so nothing beyond the region can be reached
	pub fn close_borders(&mut self, region: &GridBox) {
		let mins = region.mins();
		let maxs = region.maxs();
		for z in mins.z..=maxs.z {
			for y in mins.y..=maxs.y {
				for x in mins.x..=maxs.x {
					for ordinal in Ordinal::ALL {
						let (dx, dy) = ordinal.offset();
						let leaves = (x == mins.x && dx < 0)
							|| (x == maxs.x && dx > 0)
							|| (y == mins.y && dy < 0)
							|| (y == maxs.y && dy > 0);
						if leaves {
							self.set_no_connection(x, y, z, ordinal);
						}
					}
				}
			}
		}
	}
	/// Render the levels of `region` as text, one character per cell. A `#`
	/// marks a filled cell, otherwise the digit counts the open directions
	/// out of the cell
	pub fn dump_layers(&self, region: &GridBox) -> String {
		let mins = region.mins();
		let maxs = region.maxs();
		let mut out = String::new();
		for z in (mins.z..=maxs.z).rev() {
			out.push_str(&format!("z:{}\n", z));
			for y in (mins.y..=maxs.y).rev() {
				for x in mins.x..=maxs.x {
					if self.is_filled(x, y, z) {
						out.push('#');
					} else {
						let open = Ordinal::ALL
							.iter()
							.filter(|o| self.get_connection(x, y, z, **o) > 0)
							.count();
						out.push_str(&open.to_string());
					}
				}
				out.push('\n');
			}
		}
		out
	}
}

/// Behaviour shared by the routing settings of an entity
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct RoutingSettings {
	/// When a move changes level, also record the move back from the
	/// neighbour if that direction has no connection yet
	pub write_reverse_connections: bool,
	/// Log every sample taken by the micro trace
	pub trace_microsteps: bool,
}

impl RoutingSettings {
	/// Load [RoutingSettings] from a `.ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Self {
		let file = match std::fs::File::open(&path) {
			Ok(file) => file,
			Err(e) => panic!("Failed opening RoutingSettings file {}: {}", path, e),
		};
		match ron::de::from_reader(file) {
			Ok(settings) => settings,
			Err(e) => panic!("Failed deserializing RoutingSettings: {}", e),
		}
	}
}

/// A [RoutingTable] for every [ActorSize]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, PartialEq)]
pub struct RoutingTables {
	/// Shape of the grid the tables cover
	dimensions: GridDimensions,
	/// Tables indexed by [ActorSize::index]
	tables: Vec<RoutingTable>,
}

impl Default for RoutingTables {
	fn default() -> Self {
		RoutingTables::new(GridDimensions::default())
	}
}

impl RoutingTables {
	/// Create a new instance of [RoutingTables] with every cell filled
	pub fn new(dimensions: GridDimensions) -> Self {
		RoutingTables {
			dimensions,
			tables: ActorSize::ALL
				.iter()
				.map(|_| RoutingTable::new(dimensions))
				.collect(),
		}
	}
	/// Shape of the grid the tables cover
	pub fn dimensions(&self) -> &GridDimensions {
		&self.dimensions
	}
	/// Get the table of an actor size
	pub fn get(&self, actor_size: ActorSize) -> &RoutingTable {
		&self.tables[actor_size.index()]
	}
	/// Get a mutable reference to the table of an actor size
	pub fn get_mut(&mut self, actor_size: ActorSize) -> &mut RoutingTable {
		&mut self.tables[actor_size.index()]
	}
	/// Floor in quant relative to the bottom of the cell
	pub fn get_floor(&self, actor_size: ActorSize, x: usize, y: usize, z: usize) -> i32 {
		self.get(actor_size).get_floor(x, y, z)
	}
	/// Ceiling in quant relative to the bottom of the cell
	pub fn get_ceiling(&self, actor_size: ActorSize, x: usize, y: usize, z: usize) -> i32 {
		self.get(actor_size).get_ceiling(x, y, z)
	}
	/// Size in quant of the opening from a cell towards `ordinal`
	pub fn get_connection(
		&self,
		actor_size: ActorSize,
		x: usize,
		y: usize,
		z: usize,
		ordinal: Ordinal,
	) -> i32 {
		self.get(actor_size).get_connection(x, y, z, ordinal)
	}
	/// Step needed to move from a cell towards `ordinal`
	pub fn get_stepup(
		&self,
		actor_size: ActorSize,
		x: usize,
		y: usize,
		z: usize,
		ordinal: Ordinal,
	) -> Stepup {
		self.get(actor_size).get_stepup(x, y, z, ordinal)
	}
	/// Log the connections of `region` level by level
	pub fn log_layers(&self, actor_size: ActorSize, region: &GridBox) {
		debug!(
			"Routing of {:?} actors\n{}",
			actor_size,
			self.get(actor_size).dump_layers(region)
		);
	}
	/// Model space height of the floor of a cell
	pub fn floor_model(&self, actor_size: ActorSize, pos: GridPos) -> f32 {
		let floor = self.get_floor(actor_size, pos.x, pos.y, pos.z);
		quant_to_model(floor + pos.z as i32 * CELL_HEIGHT)
	}
	/// Model space height of the ceiling of a cell
	pub fn ceiling_model(&self, actor_size: ActorSize, pos: GridPos) -> f32 {
		let ceiling = self.get_ceiling(actor_size, pos.x, pos.y, pos.z);
		quant_to_model(ceiling + pos.z as i32 * CELL_HEIGHT)
	}
	/// Whether an actor has the headroom to stand upright in a cell rather
	/// than crouch
	pub fn can_actor_stand_here(&self, actor_size: ActorSize, pos: GridPos) -> bool {
		let table = self.get(actor_size);
		let ceiling = table.get_ceiling(pos.x, pos.y, pos.z);
		let floor = table.get_floor(pos.x, pos.y, pos.z);
		ceiling != 0 && quant_to_model(ceiling - floor) >= PLAYER_STANDING_HEIGHT
	}
	/// Whether every level of the column below `pos` is filled
	pub fn all_cells_below_are_filled(&self, actor_size: ActorSize, pos: GridPos) -> bool {
		let table = self.get(actor_size);
		(0..pos.z).all(|z| table.is_filled(pos.x, pos.y, z))
	}
	/// Find the level holding the floor an actor at `pos` would land on.
	/// `None` when `pos` is filled or the column has no floor below it
	pub fn fall(&self, actor_size: ActorSize, pos: GridPos) -> Option<usize> {
		let table = self.get(actor_size);
		if table.is_filled(pos.x, pos.y, pos.z) {
			return None;
		}
		let floor = table.get_floor(pos.x, pos.y, pos.z) + pos.z as i32 * CELL_HEIGHT;
		if floor < 0 {
			return None;
		}
		Some((floor / CELL_HEIGHT) as usize)
	}
}
