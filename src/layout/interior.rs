use std::f32::consts::TAU;

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector2, Vector3};

use super::PlacedDome;
use crate::{
    config::LayoutConfig,
    error::{GeodomeError, Result},
};

/// Number of office sectors per floor
pub const SECTOR_COUNT: usize = 3;

/// Angular width of one sector
pub const SECTOR_SPAN: Deg<f32> = Deg(360.0 / SECTOR_COUNT as f32);

/// One of the equal angular partitions of a floor disc, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub index: usize,
    pub start: Deg<f32>,
    pub end: Deg<f32>,
}

impl Sector {
    /// Boundaries are built from whole degrees so they stay exact
    pub fn new(index: usize) -> Self {
        Self {
            index,
            start: SECTOR_SPAN * index as f32,
            end: SECTOR_SPAN * (index + 1) as f32,
        }
    }

    pub fn midpoint(&self) -> Deg<f32> {
        self.start + SECTOR_SPAN / 2.0
    }

    /// Whether `angle` (any winding) falls inside this sector
    pub fn contains(&self, angle: Deg<f32>) -> bool {
        let wrapped = Deg(angle.0.rem_euclid(360.0));
        wrapped >= self.start && wrapped < self.end
    }
}

/// The sectors of every floor, in boundary order
pub fn sectors() -> [Sector; SECTOR_COUNT] {
    std::array::from_fn(Sector::new)
}

/// Circular floor inside a dome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    /// Disc center, already at floor height
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Floor {
    /// Point on the floor plane at `distance` from the center along `angle`
    pub fn point_at(&self, angle: Rad<f32>, distance: f32) -> Point3<f32> {
        self.center + Vector3::new(angle.0.cos() * distance, 0.0, angle.0.sin() * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table {
    pub sector: usize,
    pub position: Point3<f32>,
    /// Angle of the anchor around the floor center
    pub angle: Rad<f32>,
    pub radius: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chair {
    pub sector: usize,
    /// Seat number around the table, starting at the table's own angle
    pub seat: usize,
    pub position: Point3<f32>,
    pub size: Vector3<f32>,
}

/// Pot with a ball of foliage above it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plant {
    pub sector: usize,
    pub pot: Point3<f32>,
    pub foliage: Point3<f32>,
}

/// Straight dividing wall standing on the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub sector: usize,
    /// Foot of the wall nearest the floor center
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub height: f32,
    pub thickness: f32,
}

impl Wall {
    pub fn length(&self) -> f32 {
        (self.end - self.start).magnitude()
    }

    /// Rotation about +Y that maps a box's local +X onto the wall direction
    pub fn heading(&self) -> Rad<f32> {
        let run = self.end - self.start;
        Rad((-run.z).atan2(run.x))
    }

    /// Center of the wall box
    pub fn center(&self) -> Point3<f32> {
        self.start.midpoint(self.end) + Vector3::new(0.0, self.height * 0.5, 0.0)
    }

    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.center().to_vec()) * Matrix4::from_angle_y(self.heading())
    }

    /// Horizontal distance from `point` to the wall's center line
    pub fn planar_distance(&self, point: Point3<f32>) -> f32 {
        let a = Vector2::new(self.start.x, self.start.z);
        let b = Vector2::new(self.end.x, self.end.z);
        let p = Vector2::new(point.x, point.z);

        let run = b - a;
        let len2 = run.magnitude2();
        if len2 == 0.0 {
            return (p - a).magnitude();
        }
        let t = ((p - a).dot(run) / len2).clamp(0.0, 1.0);
        (p - (a + run * t)).magnitude()
    }

    /// Distances of both ends from `center`, measured on the floor plane
    pub fn radial_span(&self, center: Point3<f32>) -> (f32, f32) {
        let planar = |p: Point3<f32>| Vector2::new(p.x - center.x, p.z - center.z).magnitude();
        (planar(self.start), planar(self.end))
    }
}

/// Furnished interior of one dome
#[derive(Debug, Clone, PartialEq)]
pub struct InteriorLayout {
    pub dome: usize,
    pub floor: Floor,
    pub sectors: Vec<Sector>,
    pub tables: Vec<Table>,
    pub chairs: Vec<Chair>,
    pub plants: Vec<Plant>,
    pub walls: Vec<Wall>,
}

impl InteriorLayout {
    /// Smallest horizontal gap between any wall and any table anchor
    pub fn wall_clearance(&self) -> f32 {
        self.walls
            .iter()
            .flat_map(|wall| self.tables.iter().map(move |t| wall.planar_distance(t.position)))
            .fold(f32::INFINITY, f32::min)
    }
}

/// Lays out floor, furniture and walls of a dome
///
/// Fails when the configured constants would let a wall cut through a table
/// ensemble, which happens for domes too small for the fixed furniture sizes.
pub fn layout_interior(dome: &PlacedDome, config: &LayoutConfig) -> Result<InteriorLayout> {
    let radius = dome.radius();
    let center = dome.center();

    let floor_radius = radius * config.floor_radius_ratio;
    let floor = Floor {
        center: Point3::new(
            center.x,
            center.y - radius * config.floor_drop_ratio + config.floor_lift,
            center.z,
        ),
        radius: floor_radius,
    };

    let mut interior = InteriorLayout {
        dome: dome.index,
        floor,
        sectors: sectors().to_vec(),
        tables: Vec::with_capacity(SECTOR_COUNT),
        chairs: Vec::with_capacity(SECTOR_COUNT * config.chairs_per_table),
        plants: Vec::with_capacity(SECTOR_COUNT),
        walls: Vec::with_capacity(SECTOR_COUNT),
    };

    for sector in sectors() {
        let boundary = Rad::from(sector.start);
        interior.walls.push(Wall {
            sector: sector.index,
            start: floor.point_at(boundary, floor_radius * config.wall_start_ratio),
            end: floor.point_at(boundary, floor_radius * config.wall_end_ratio),
            height: config.wall_height,
            thickness: config.wall_thickness,
        });

        let table_angle = Rad::from(sector.midpoint());
        let anchor = floor.point_at(table_angle, floor_radius * config.table_distance_ratio);
        let table = Table {
            sector: sector.index,
            position: anchor + Vector3::new(0.0, config.table_elevation, 0.0),
            angle: table_angle,
            radius: config.table_radius,
            height: config.table_height,
        };
        interior.tables.push(table);

        let [sx, sy, sz] = config.chair_size;
        for seat in 0..config.chairs_per_table {
            let angle = table_angle.0 + TAU * seat as f32 / config.chairs_per_table as f32;
            interior.chairs.push(Chair {
                sector: sector.index,
                seat,
                position: anchor
                    + Vector3::new(
                        angle.cos() * config.chair_offset,
                        config.chair_elevation,
                        angle.sin() * config.chair_offset,
                    ),
                size: Vector3::new(sx, sy, sz),
            });
        }

        let pot = anchor + Vector3::new(0.0, config.plant_elevation, 0.0);
        interior.plants.push(Plant {
            sector: sector.index,
            pot,
            foliage: pot + Vector3::new(0.0, config.foliage_lift, 0.0),
        });
    }

    let clearance = interior.wall_clearance();
    let required = config.required_wall_clearance();
    if clearance < required {
        return Err(GeodomeError::WallIntersectsTable {
            dome: dome.index,
            clearance,
            required,
        });
    }

    log::trace!(
        "Dome #{}: floor radius {:.2}, wall clearance {:.2}",
        dome.index,
        floor_radius,
        clearance
    );
    Ok(interior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::reference_domes, layout::place_domes, layout::DomeDescriptor};

    fn interiors() -> Vec<InteriorLayout> {
        let config = LayoutConfig::default();
        place_domes(&reference_domes(), &config)
            .unwrap()
            .iter()
            .map(|dome| layout_interior(dome, &config).unwrap())
            .collect()
    }

    #[test]
    fn test_sector_boundaries_are_exact() {
        let starts: Vec<Deg<f32>> = sectors().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![Deg(0.0), Deg(120.0), Deg(240.0)]);
        assert_eq!(sectors()[2].end, Deg(360.0));
    }

    #[test]
    fn test_sectors_partition_the_disc() {
        let all = sectors();
        for tenth in 0..3600 {
            let angle = Deg(tenth as f32 * 0.1);
            let owners = all.iter().filter(|s| s.contains(angle)).count();
            assert_eq!(owners, 1, "angle {:?} owned by {} sectors", angle, owners);
        }
        assert!(all[2].contains(Deg(-10.0)));
        assert!(all[0].contains(Deg(370.0)));
    }

    #[test]
    fn test_furniture_counts() {
        for interior in interiors() {
            assert_eq!(interior.sectors.len(), 3);
            assert_eq!(interior.tables.len(), 3);
            assert_eq!(interior.chairs.len(), 12);
            assert_eq!(interior.plants.len(), 3);
            assert_eq!(interior.walls.len(), 3);
        }
    }

    #[test]
    fn test_floor_geometry_follows_radius() {
        let interiors = interiors();
        let big = &interiors[0];
        assert!((big.floor.radius - 24.0).abs() < 1e-5);
        // 30 - 0.1 * 30 + 0.1
        assert!((big.floor.center.y - 27.1).abs() < 1e-4);
    }

    #[test]
    fn test_tables_sit_mid_sector() {
        for interior in interiors() {
            for (table, sector) in interior.tables.iter().zip(&interior.sectors) {
                assert!((Deg::from(table.angle).0 - sector.midpoint().0).abs() < 1e-3);
                let offset = Vector2::new(
                    table.position.x - interior.floor.center.x,
                    table.position.z - interior.floor.center.z,
                );
                assert!((offset.magnitude() - 0.5 * interior.floor.radius).abs() < 1e-3);
                assert!((table.position.y - (interior.floor.center.y + 0.8)).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_chairs_ring_their_table() {
        for interior in interiors() {
            for chair in &interior.chairs {
                let table = &interior.tables[chair.sector];
                let offset = Vector2::new(
                    chair.position.x - table.position.x,
                    chair.position.z - table.position.z,
                );
                assert!((offset.magnitude() - 3.0).abs() < 1e-4);

                let angle = offset.y.atan2(offset.x);
                let expected = table.angle.0 + TAU * chair.seat as f32 / 4.0;
                let diff = (angle - expected).rem_euclid(TAU);
                assert!(diff < 1e-3 || diff > TAU - 1e-3);
            }
        }
    }

    #[test]
    fn test_walls_run_along_boundaries() {
        for interior in interiors() {
            let rf = interior.floor.radius;
            for (wall, sector) in interior.walls.iter().zip(&interior.sectors) {
                let (inner, outer) = wall.radial_span(interior.floor.center);
                assert!(inner > 0.0 && outer < rf);
                assert!((inner - 0.2 * rf).abs() < 1e-3);
                assert!((outer - 0.85 * rf).abs() < 1e-3);

                let run = wall.end - wall.start;
                let expected = Rad::from(sector.start).0;
                let diff = (run.z.atan2(run.x) - expected).rem_euclid(TAU);
                assert!(diff < 1e-4 || diff > TAU - 1e-4);
            }
        }
    }

    #[test]
    fn test_wall_transform_maps_box_onto_segment() {
        let interior = &interiors()[0];
        for wall in &interior.walls {
            let local_end = cgmath::Vector4::new(wall.length() * 0.5, -wall.height * 0.5, 0.0, 1.0);
            let world_end = wall.transform() * local_end;
            assert!((world_end.x - wall.end.x).abs() < 1e-3);
            assert!((world_end.y - wall.end.y).abs() < 1e-3);
            assert!((world_end.z - wall.end.z).abs() < 1e-3);
        }
    }

    #[test]
    fn test_wall_reaching_past_table_radius_still_clears_table() {
        let config = LayoutConfig::default();
        assert!(config.wall_end_ratio > config.table_distance_ratio);
        for interior in interiors() {
            assert!(interior.wall_clearance() >= config.required_wall_clearance());
            for wall in &interior.walls {
                for table in &interior.tables {
                    assert!(wall.planar_distance(table.position) > table.radius);
                }
            }
        }
    }

    #[test]
    fn test_small_dome_rejected() {
        let config = LayoutConfig::default();
        let descriptor = DomeDescriptor::new(Point3::new(0.0, 10.0, 0.0), 10.0, [1.0, 1.0, 1.0]);
        let dome = &place_domes(&[descriptor], &config).unwrap()[0];

        match layout_interior(dome, &config) {
            Err(GeodomeError::WallIntersectsTable { dome, clearance, required }) => {
                assert_eq!(dome, 0);
                assert!(clearance < required);
            }
            other => panic!("expected WallIntersectsTable, got {:?}", other),
        }
    }

    #[test]
    fn test_plants_stack_over_tables() {
        for interior in interiors() {
            for (plant, table) in interior.plants.iter().zip(&interior.tables) {
                assert_eq!(plant.pot.x, table.position.x);
                assert_eq!(plant.pot.z, table.position.z);
                assert!((plant.foliage.y - plant.pot.y - 0.5).abs() < 1e-5);
            }
        }
    }
}
