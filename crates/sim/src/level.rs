//! Level state and the per-frame update.

use crate::ai::AutonomousState;
use crate::config::Config;
use crate::entity::{Behavior, CellId, Entity, EntityId, Frame, PlayerState};
use crate::error::SimError;
use crate::population::{Absorption, Population};
use crate::world::{WorldBounds, random_color};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use surface::{Color, InputEvent, PointerSource, RenderSink};
use tracing::{debug, info};

/// Frames between performance summaries.
const SUMMARY_INTERVAL: u64 = 400;

/// Where the level stands after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// The player owns every live cell.
    Won,
    /// Escape was pressed; control goes back to the menu layer.
    Yielded,
    /// Quit was requested.
    Quit,
}

/// What happened during one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub absorptions: Vec<Absorption>,
    /// Entities removed because their last cell was absorbed.
    pub reaped: Vec<EntityId>,
    /// Autonomous entities spawned by the respawn timer.
    pub spawned: Vec<EntityId>,
}

/// The cell growth level.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    bounds: WorldBounds,
    population: Population,
    entities: Vec<Entity>,
    next_entity_id: u32,
    player: Option<EntityId>,
    /// Seconds accumulated towards the next respawn check.
    spawn_timer: f32,
    frame_count: u64,
    status: Status,
    rng: StdRng,
}

impl Simulation {
    /// Empty level: validated config, no entities.
    pub fn empty(config: Config, seed: Option<u64>) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            bounds: WorldBounds::new(config.world.width, config.world.height),
            config,
            population: Population::new(),
            entities: Vec::with_capacity(16),
            next_entity_id: 1,
            player: None,
            spawn_timer: 0.0,
            frame_count: 0,
            status: Status::Running,
            rng,
        })
    }

    /// Level start: the player in the center plus the configured autonomous entities.
    pub fn new(config: Config, seed: Option<u64>) -> Result<Self, SimError> {
        let mut sim = Self::empty(config, seed)?;
        let player = sim.config.player.clone();
        let center = sim.bounds.center();
        sim.spawn_player(center, player.color, player.mass, player.cells);

        let autonomous = sim.config.autonomous.clone();
        for _ in 0..autonomous.count {
            sim.spawn_autonomous(None, None, autonomous.mass, autonomous.cells);
        }

        info!(
            "Level started: {} entities, {} cells",
            sim.entities.len(),
            sim.population.len()
        );
        Ok(sim)
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Add the pointer-driven entity. Replaces the previous player as the
    /// pointer target if one exists.
    pub fn spawn_player(&mut self, position: Vec2, color: Color, mass: u32, cells: usize) -> EntityId {
        let id = self.next_entity_id();
        let position = self.bounds.clamp(position);
        let mut entity = Entity::new(id, Behavior::Player(PlayerState::default()), position, color);
        entity.spawn_cells(&mut self.population, &self.bounds, position, cells, mass);
        self.entities.push(entity);
        self.player = Some(id);
        id
    }

    /// Add an autonomous entity; missing position or color are picked at random.
    pub fn spawn_autonomous(
        &mut self,
        position: Option<Vec2>,
        color: Option<Color>,
        mass: u32,
        cells: usize,
    ) -> EntityId {
        let id = self.next_entity_id();
        let position = match position {
            Some(p) => self.bounds.clamp(p),
            None => self.bounds.random_position(&mut self.rng),
        };
        let color = color.unwrap_or_else(|| random_color(&mut self.rng));
        let mut entity = Entity::new(id, Behavior::Autonomous(AutonomousState::default()), position, color);
        entity.spawn_cells(&mut self.population, &self.bounds, position, cells, mass);
        self.entities.push(entity);
        id
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    #[inline]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    #[inline]
    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entity(id))
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn autonomous_count(&self) -> usize {
        self.entities.iter().filter(|e| !e.is_player()).count()
    }

    /// Apply the input events polled for this frame.
    pub fn handle_input(&mut self, events: &[InputEvent]) -> Result<(), SimError> {
        for event in events {
            match event {
                InputEvent::Quit => {
                    info!("Quit requested");
                    self.status = Status::Quit;
                }
                InputEvent::Escape => {
                    info!("Escape pressed, yielding to menu");
                    self.status = Status::Yielded;
                }
                InputEvent::Split => {
                    self.split_player()?;
                }
            }
        }
        Ok(())
    }

    /// Split the player's cells. Returns the new cell ids.
    pub fn split_player(&mut self) -> Result<Vec<CellId>, SimError> {
        let Some(player_id) = self.player else {
            return Ok(Vec::new());
        };
        let max_cells = self.config.player.max_cells;
        let min_split_mass = self.config.player.min_split_mass;
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id() == player_id)
            .ok_or(SimError::UnknownEntity(player_id))?;
        entity.split(&mut self.population, &self.bounds, max_cells, min_split_mass)
    }

    /// Advance one frame by `dt` seconds.
    pub fn tick(&mut self, dt: f32, pointer: &dyn PointerSource) -> FrameReport {
        let mut report = FrameReport::default();
        if self.status != Status::Running {
            return report;
        }
        let tick_start = std::time::Instant::now();
        self.frame_count += 1;

        let frame = Frame {
            dt,
            bounds: self.bounds,
            pointer,
        };
        for entity in &mut self.entities {
            report.absorptions.extend(entity.update(&mut self.population, &frame));
        }

        self.reap(&mut report);
        self.advance_spawn_timer(dt, &mut report);
        debug_assert!(self.population.is_sorted());

        if self.player_owns_everything() {
            info!(
                "Player owns all {} cells after {} frames",
                self.population.len(),
                self.frame_count
            );
            self.status = Status::Won;
        }

        if self.frame_count % SUMMARY_INTERVAL == 0 {
            debug!(
                "Frame #{}: {:.3}ms | {} entities, {} cells",
                self.frame_count,
                tick_start.elapsed().as_secs_f64() * 1000.0,
                self.entities.len(),
                self.population.len()
            );
        }
        report
    }

    /// Drop entities whose cells are all gone. The player is kept.
    fn reap(&mut self, report: &mut FrameReport) {
        let population = &self.population;
        self.entities.retain_mut(|entity| {
            entity.prune(population);
            if entity.is_player() || !entity.cells().is_empty() {
                return true;
            }
            debug!("{} lost its last cell", entity.id());
            report.reaped.push(entity.id());
            false
        });
    }

    fn advance_spawn_timer(&mut self, dt: f32, report: &mut FrameReport) {
        let cooldown = self.config.autonomous.respawn_cooldown;
        self.spawn_timer += dt;
        if self.spawn_timer < cooldown {
            return;
        }
        let elapsed = (self.spawn_timer / cooldown).floor();
        self.spawn_timer %= cooldown;

        let vacant = self
            .config
            .autonomous
            .max_count
            .saturating_sub(self.autonomous_count());
        let due = vacant.min(elapsed as usize);
        let (mass, cells) = (self.config.autonomous.mass, self.config.autonomous.cells);
        for _ in 0..due {
            let id = self.spawn_autonomous(None, None, mass, cells);
            debug!("Respawned {}", id);
            report.spawned.push(id);
        }
    }

    fn player_owns_everything(&self) -> bool {
        match self.player {
            Some(player) => {
                !self.population.is_empty()
                    && self.population.iter_by_mass().all(|cell| cell.owner() == player)
            }
            None => false,
        }
    }

    /// Draw every cell, lightest first.
    pub fn draw(&self, sink: &mut dyn RenderSink) {
        let render = &self.config.render;
        for cell in self.population.iter_by_mass() {
            cell.draw(sink, render.outline_width, render.label_min_mass);
        }
    }
}
