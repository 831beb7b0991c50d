use glam::Vec2;
use sim::entity::speed_for;
use sim::{Config, Simulation, Status};
use surface::{Color, FixedPointer, InputEvent, PointerSource};

const DT: f32 = 1.0 / 144.0;

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.autonomous.count = 0;
    config.autonomous.max_count = 1;
    config
}

fn total_mass(sim: &Simulation) -> u64 {
    sim.population().iter_by_mass().map(|c| c.mass() as u64).sum()
}

#[test]
fn player_absorbs_adjacent_prey() {
    let mut sim = Simulation::empty(quiet_config(), Some(1)).unwrap();
    let player = sim.spawn_player(Vec2::new(300.0, 300.0), Color::new(255, 0, 0), 1000, 1);
    let prey_owner = sim.spawn_autonomous(Some(Vec2::new(303.0, 300.0)), Some(Color::WHITE), 500, 1);
    let predator = sim.entity(player).unwrap().cells()[0];
    let prey = sim.entity(prey_owner).unwrap().cells()[0];

    let report = sim.tick(DT, &FixedPointer(Vec2::new(300.0, 300.0)));

    assert_eq!(report.absorptions.len(), 1);
    assert_eq!(report.absorptions[0].prey, prey);
    assert_eq!(sim.population().mass_of(predator), 1500);
    assert!(!sim.population().contains(prey));
    assert_eq!(report.reaped, vec![prey_owner]);
    assert!(sim.entity(prey_owner).is_none());
    assert_eq!(sim.status(), Status::Won);
}

#[test]
fn distant_autonomous_entity_only_drifts() {
    let mut sim = Simulation::empty(quiet_config(), Some(2)).unwrap();
    let center = Vec2::new(360.0, 360.0);
    sim.spawn_player(center, Color::new(255, 0, 0), 4096, 2);
    let drifter = sim.spawn_autonomous(Some(Vec2::new(50.0, 50.0)), None, 512, 2);

    let destination = sim.entity(drifter).unwrap().destination();
    let start = sim.entity(drifter).unwrap().centroid(sim.population()).unwrap();
    let pointer = FixedPointer(center);

    let frames = 144;
    for _ in 0..frames {
        sim.tick(DT, &pointer);
    }

    let entity = sim.entity(drifter).unwrap();
    assert_eq!(entity.total_mass(sim.population()), 1024);
    assert_eq!(entity.destination(), destination);

    let end = entity.centroid(sim.population()).unwrap();
    let budget = speed_for(512) * DT * frames as f32;
    assert!(end.distance(start) <= budget + 1e-3);
    assert!(end.distance(destination) <= start.distance(destination) + 1e-2);
    assert_eq!(sim.status(), Status::Running);
}

/// Pointer circling the world center.
struct Orbit {
    angle: f32,
}

impl PointerSource for Orbit {
    fn pointer_position(&self) -> Vec2 {
        Vec2::new(360.0, 360.0) + Vec2::from_angle(self.angle) * 250.0
    }
}

#[test]
fn full_level_keeps_invariants() {
    let config = Config::default();
    let respawn_mass = config.autonomous.mass as u64 * config.autonomous.cells as u64;
    let mut sim = Simulation::new(config, Some(1234)).unwrap();
    let mut expected_mass = total_mass(&sim);
    let mut pointer = Orbit { angle: 0.0 };

    for frame in 0..3000u32 {
        if frame % 500 == 250 {
            sim.handle_input(&[InputEvent::Split]).unwrap();
        }
        pointer.angle += 0.01;
        let report = sim.tick(DT, &pointer);
        expected_mass += report.spawned.len() as u64 * respawn_mass;

        let population = sim.population();
        assert!(population.is_sorted(), "unsorted after frame {frame}");
        assert_eq!(total_mass(&sim), expected_mass, "mass drift at frame {frame}");
        for cell in population.iter_by_mass() {
            assert!(sim.bounds().contains(cell.position()));
            let owner = sim.entity(cell.owner()).expect("cell owned by a live entity");
            assert!(owner.cells().contains(&cell.id()));
        }
        assert!(sim.player().unwrap().cells().len() <= sim.config().player.max_cells);

        if sim.status() != Status::Running {
            break;
        }
    }
}
