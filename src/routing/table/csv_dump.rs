//! Write the routing tables as CSV grids for offline inspection and
//! regression comparisons. Each level is written top down with north at
//! the top of the grid
//!

use crate::prelude::*;
use std::io::Write;

impl RoutingTables {
	/// Columns of `region` an actor of `actor_size` can stand in
	fn csv_columns(&self, actor_size: ActorSize, region: &GridBox) -> (Vec<usize>, Vec<usize>) {
		let Some(limit) = self.dimensions().width().checked_sub(actor_size.cells()) else {
			return (Vec::new(), Vec::new());
		};
		let xs = (region.mins().x..=region.maxs().x.min(limit)).collect();
		let ys = (region.mins().y..=region.maxs().y.min(limit)).rev().collect();
		(xs, ys)
	}
	/// Write the floor and ceiling of every cell of `region` as
	/// `h:<floor> c:<ceiling>`
	pub fn write_elevation_csv<W: Write>(
		&self,
		actor_size: ActorSize,
		region: &GridBox,
		writer: W,
	) -> Result<(), csv::Error> {
		let table = self.get(actor_size);
		let (xs, ys) = self.csv_columns(actor_size, region);
		let mut wtr = csv::Writer::from_writer(writer);
		let mut header = vec![String::new()];
		header.extend(xs.iter().map(|x| format!("x:{}", x)));
		wtr.write_record(&header)?;
		for z in (region.mins().z..=region.maxs().z).rev() {
			for y in ys.iter() {
				let mut record = vec![format!("z:{}  y:{}", z, y)];
				for x in xs.iter() {
					record.push(format!(
						"h:{} c:{}",
						table.get_floor(*x, *y, z),
						table.get_ceiling(*x, *y, z)
					));
				}
				wtr.write_record(&record)?;
			}
		}
		wtr.flush()?;
		Ok(())
	}
	/// Write the connection and stepup of every direction of every cell of
	/// `region`. Each cell is a three line block laid out like a compass
	/// with the floor in the centre
	pub fn write_walls_csv<W: Write>(
		&self,
		actor_size: ActorSize,
		region: &GridBox,
		writer: W,
	) -> Result<(), csv::Error> {
		let table = self.get(actor_size);
		let (xs, ys) = self.csv_columns(actor_size, region);
		let mut wtr = csv::Writer::from_writer(writer);
		let mut header = vec![String::new()];
		header.extend(xs.iter().map(|x| format!("x:{}", x)));
		wtr.write_record(&header)?;
		let wall = |x: usize, y: usize, z: usize, ordinal: Ordinal| {
			format!(
				"{:>3}-{:>3}",
				table.get_connection(x, y, z, ordinal),
				table.get_stepup(x, y, z, ordinal).to_string()
			)
		};
		for z in (region.mins().z..=region.maxs().z).rev() {
			for y in ys.iter() {
				let mut record = vec![format!("z:{}  y:{}", z, y)];
				for x in xs.iter() {
					let (x, y) = (*x, *y);
					record.push(format!(
						"{} {} {}\n{} _{:+}_ {}\n{} {} {}",
						wall(x, y, z, Ordinal::NorthWest),
						wall(x, y, z, Ordinal::North),
						wall(x, y, z, Ordinal::NorthEast),
						wall(x, y, z, Ordinal::West),
						table.get_floor(x, y, z),
						wall(x, y, z, Ordinal::East),
						wall(x, y, z, Ordinal::SouthWest),
						wall(x, y, z, Ordinal::South),
						wall(x, y, z, Ordinal::SouthEast),
					));
				}
				wtr.write_record(&record)?;
			}
		}
		wtr.flush()?;
		Ok(())
	}
	/// Write `<base>.<size>.elevation.csv` and `<base>.<size>.walls.csv` for
	/// every actor size
	pub fn dump_csv_files(&self, base: &str, region: &GridBox) -> Result<(), csv::Error> {
		for actor_size in ActorSize::ALL {
			let cells = actor_size.cells();
			let elevation = std::fs::File::create(format!("{}.{}.elevation.csv", base, cells))?;
			self.write_elevation_csv(actor_size, region, elevation)?;
			let walls = std::fs::File::create(format!("{}.{}.walls.csv", base, cells))?;
			self.write_walls_csv(actor_size, region, walls)?;
		}
		Ok(())
	}
}
