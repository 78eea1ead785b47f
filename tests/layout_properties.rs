use cgmath::{Deg, InnerSpace, Point3};
use geodome::{
    config::{reference_domes, LayoutConfig},
    layout::{generate, sectors, DomeDescriptor, DomeLayout},
    GeodomeError,
};

const EPS: f32 = 1e-3;

fn reference_layouts() -> Vec<DomeLayout> {
    generate(&reference_domes(), &LayoutConfig::default()).expect("reference layout")
}

#[test]
fn every_dome_gets_three_bands_of_twelve_panels() {
    for layout in reference_layouts() {
        assert_eq!(layout.hex_panels.len(), 36);
        for band in 0..3 {
            let ring = layout.hex_panels.iter().filter(|p| p.band == band).count();
            assert_eq!(ring, 12, "dome {} band {}", layout.dome.index, band);
        }
    }
}

#[test]
fn panels_sit_on_the_sphere_and_face_its_center() {
    for layout in reference_layouts() {
        let center = layout.dome.center();
        let radius = layout.dome.radius();
        for panel in &layout.hex_panels {
            let offset = panel.position - center;
            assert!(
                (offset.magnitude() - radius).abs() < EPS * radius,
                "panel {}.{} off the sphere",
                panel.band,
                panel.slot
            );
            let inward = (-offset).normalize();
            assert!(panel.facing().dot(inward) > 1.0 - EPS);
            assert!((panel.radius - 0.2 * radius).abs() < EPS);
        }
    }
}

#[test]
fn panel_latitudes_are_pinned() {
    let layout = &reference_layouts()[0];
    let mut latitudes: Vec<f32> = layout.hex_panels.iter().map(|p| p.latitude).collect();
    latitudes.dedup();
    assert_eq!(latitudes.len(), 3);
    for (got, want) in latitudes.iter().zip([0.2, 0.35, 0.5]) {
        assert!((got - want).abs() < 1e-6);
    }
}

#[test]
fn sector_boundaries_are_exact() {
    let starts: Vec<Deg<f32>> = sectors().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![Deg(0.0), Deg(120.0), Deg(240.0)]);

    for layout in reference_layouts() {
        let starts: Vec<Deg<f32>> = layout.interior.sectors.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![Deg(0.0), Deg(120.0), Deg(240.0)]);
    }
}

#[test]
fn interiors_are_fully_furnished() {
    for layout in reference_layouts() {
        let interior = &layout.interior;
        assert_eq!(interior.tables.len(), 3);
        assert_eq!(interior.chairs.len(), 12);
        assert_eq!(interior.plants.len(), 3);
        assert_eq!(interior.walls.len(), 3);
        assert!((interior.floor.radius - 0.8 * layout.dome.radius()).abs() < EPS);
    }
}

#[test]
fn walls_stay_inside_the_floor_and_clear_of_tables() {
    let config = LayoutConfig::default();
    for layout in reference_layouts() {
        let floor = layout.interior.floor;
        for wall in &layout.interior.walls {
            let (near, far) = wall.radial_span(floor.center);
            assert!(near > 0.0 && near < floor.radius);
            assert!(far > 0.0 && far < floor.radius);
            assert!((wall.start.y - floor.center.y).abs() < EPS);
        }
        assert!(layout.interior.wall_clearance() >= config.required_wall_clearance());
    }
}

#[test]
fn small_dome_is_rejected() {
    let mut domes = reference_domes();
    domes.push(DomeDescriptor::new(Point3::new(0.0, 10.0, 100.0), 10.0, [1.0, 1.0, 1.0]));
    match generate(&domes, &LayoutConfig::default()) {
        Err(GeodomeError::WallIntersectsTable {
            dome,
            clearance,
            required,
        }) => {
            assert_eq!(dome, 3);
            assert!(clearance < required);
        }
        other => panic!("expected WallIntersectsTable, got {:?}", other.map(|l| l.len())),
    }
}

#[test]
fn layout_is_deterministic() {
    assert_eq!(reference_layouts(), reference_layouts());
}

#[test]
fn invalid_descriptors_report_their_index() {
    let cases = [
        DomeDescriptor::new(Point3::new(0.0, 0.0, 0.0), 0.0, [0.5; 3]),
        DomeDescriptor::new(Point3::new(0.0, 0.0, 0.0), -5.0, [0.5; 3]),
        DomeDescriptor::new(Point3::new(0.0, 0.0, 0.0), f32::NAN, [0.5; 3]),
        DomeDescriptor::new(Point3::new(f32::INFINITY, 0.0, 0.0), 20.0, [0.5; 3]),
    ];

    for bad in cases {
        let mut domes = reference_domes();
        domes.insert(1, bad);
        match generate(&domes, &LayoutConfig::default()) {
            Err(GeodomeError::InvalidDescriptor { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidDescriptor, got {:?}", other.map(|l| l.len())),
        }
    }
}
