//! Grid - spatial index and activation loop
//!
//! Entity data lives in a `hecs::World`; the grid adds the cell buckets and
//! the ordered roster of entities that act each tick. Behaviors never touch
//! bucket bookkeeping themselves; they go through `move_entity`/`remove`.

use std::collections::HashSet;

use hecs::{Component, ComponentError, Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::components::*;
use crate::coords::{chebyshev_offsets, Offset, Torus, DIRECTIONS};
use crate::error::GridError;
use crate::events::TickReport;
use crate::systems;

/// Largest accepted side length. Keeps `size * size` buckets addressable and
/// every coordinate representable as `i64` for wrapping.
pub const MAX_GRID_SIZE: usize = 4096;

pub struct Grid<R = ChaCha8Rng> {
    pub(crate) world: World,
    torus: Torus,
    cells: Vec<Vec<Entity>>,
    active: Vec<Entity>,
    rng: R,
    tick: u64,
}

impl Grid<ChaCha8Rng> {
    /// Grid with a seeded ChaCha8 stream; same seed, same run.
    pub fn new(size: usize, seed: u64) -> Result<Self, GridError> {
        Self::with_rng(size, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Grid<R> {
    /// Grid drawing its random walks from `rng`.
    pub fn with_rng(size: usize, rng: R) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::InvalidConfig("grid size must be positive".into()));
        }
        if size > MAX_GRID_SIZE {
            return Err(GridError::InvalidConfig(format!(
                "grid size {} exceeds the maximum of {}",
                size, MAX_GRID_SIZE
            )));
        }
        let cell_count = size
            .checked_mul(size)
            .ok_or_else(|| GridError::InvalidConfig(format!("grid size {} overflows", size)))?;
        Ok(Self {
            world: World::new(),
            torus: Torus::new(size),
            cells: vec![Vec::new(); cell_count],
            active: Vec::new(),
            rng,
            tick: 0,
        })
    }

    // ------------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------------

    /// Create an entity's components without placing it.
    pub fn spawn(&mut self, body: Body) -> Entity {
        let kind = body.kind();
        match body {
            Body::Resource(resource) => self.world.spawn((kind, resource)),
            Body::Station(station) => self.world.spawn((kind, station)),
            Body::Gatherer { state, energy } => self.world.spawn((kind, state, energy)),
            Body::Predator { energy } => self.world.spawn((kind, energy)),
            Body::Swarm(swarm) => self.world.spawn((kind, swarm)),
        }
    }

    /// Put a spawned entity on the grid at the wrapped `(x, y)`. Active kinds
    /// join the end of the roster.
    pub fn place(&mut self, entity: Entity, x: i64, y: i64) -> Result<Position, GridError> {
        let kind = self.kind(entity)?;
        if self.world.get::<&Position>(entity).is_ok() {
            return Err(GridError::DoublePlacement(entity));
        }

        let pos = self.torus.wrap(x, y);
        self.world
            .insert_one(entity, pos)
            .map_err(|_| GridError::StaleEntityReference(entity))?;
        let idx = self.torus.index(pos);
        self.cells[idx].push(entity);
        if kind.is_active() {
            self.active.push(entity);
        }
        Ok(pos)
    }

    pub fn spawn_at(&mut self, body: Body, x: i64, y: i64) -> Result<Entity, GridError> {
        let entity = self.spawn(body);
        self.place(entity, x, y)?;
        Ok(entity)
    }

    /// Uniformly random cell, drawn from the grid's own random source.
    pub fn random_position(&mut self) -> Position {
        let size = self.torus.size() as i64;
        let x = self.rng.gen_range(0..size);
        let y = self.rng.gen_range(0..size);
        self.torus.wrap(x, y)
    }

    // ------------------------------------------------------------------------
    // Movement and removal
    // ------------------------------------------------------------------------

    /// Relocate `entity` to the wrapped `(x, y)`.
    pub fn move_entity(&mut self, entity: Entity, x: i64, y: i64) -> Result<Position, GridError> {
        let from = self.position(entity)?;
        self.take_from_bucket(entity, from)?;

        let to = self.torus.wrap(x, y);
        let idx = self.torus.index(to);
        self.cells[idx].push(entity);
        *self
            .world
            .get::<&mut Position>(entity)
            .map_err(|_| GridError::StaleEntityReference(entity))? = to;
        trace!(?entity, from = ?from, to = ?to, "moved");
        Ok(to)
    }

    /// Move by `offset` relative to the current position.
    pub fn step(&mut self, entity: Entity, offset: Offset) -> Result<Position, GridError> {
        let from = self.position(entity)?;
        self.move_entity(entity, from.x as i64 + offset.dx, from.y as i64 + offset.dy)
    }

    /// One unit move in a uniformly chosen axis direction.
    pub fn random_step(&mut self, entity: Entity) -> Result<Position, GridError> {
        let dir = DIRECTIONS[self.rng.gen_range(0..DIRECTIONS.len())];
        self.step(entity, dir)
    }

    /// Take `entity` off the grid and out of the roster, then despawn it.
    /// Returns the cell it last occupied.
    pub fn remove(&mut self, entity: Entity) -> Result<Position, GridError> {
        let pos = self.position(entity)?;
        self.take_from_bucket(entity, pos)?;
        self.active.retain(|e| *e != entity);
        self.world
            .despawn(entity)
            .map_err(|_| GridError::StaleEntityReference(entity))?;
        Ok(pos)
    }

    fn take_from_bucket(&mut self, entity: Entity, pos: Position) -> Result<(), GridError> {
        let bucket = &mut self.cells[self.torus.index(pos)];
        let slot = bucket
            .iter()
            .position(|e| *e == entity)
            .ok_or(GridError::StaleEntityReference(entity))?;
        // Keep bucket order stable; it decides which equidistant target a scan finds first
        bucket.remove(slot);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Perception
    // ------------------------------------------------------------------------

    /// First entity within the Chebyshev `radius` of `origin` whose kind is
    /// `wanted`, in scan order (dx outer, dy inner, then bucket order).
    /// The offset returned is the scan offset, so it points the short way
    /// around the torus.
    pub fn scan_first(
        &self,
        origin: Position,
        radius: u32,
        mut wanted: impl FnMut(EntityKind) -> bool,
    ) -> Option<(Offset, Entity)> {
        for offset in chebyshev_offsets(radius) {
            let cell = self.torus.offset(origin, offset);
            for &entity in &self.cells[self.torus.index(cell)] {
                if matches!(self.kind(entity), Ok(kind) if wanted(kind)) {
                    return Some((offset, entity));
                }
            }
        }
        None
    }

    /// Every entity within the Chebyshev `radius` of `origin` whose kind is
    /// `wanted`, each listed once even when offsets alias on a small torus.
    pub fn scan_all(
        &self,
        origin: Position,
        radius: u32,
        mut wanted: impl FnMut(EntityKind) -> bool,
    ) -> Vec<Entity> {
        let mut seen_cells = HashSet::new();
        let mut found = Vec::new();
        for offset in chebyshev_offsets(radius) {
            let idx = self.torus.index(self.torus.offset(origin, offset));
            if !seen_cells.insert(idx) {
                continue;
            }
            for &entity in &self.cells[idx] {
                if matches!(self.kind(entity), Ok(kind) if wanted(kind)) {
                    found.push(entity);
                }
            }
        }
        found
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advance one step: every entity on the roster at the start of the tick
    /// acts once, in roster order. Self-removal during the pass edits the live
    /// roster only.
    pub fn tick(&mut self) -> Result<TickReport, GridError> {
        self.tick += 1;
        let mut report = TickReport::new(self.tick);
        let roster = self.active.clone();

        for entity in roster {
            if !self.world.contains(entity) {
                continue;
            }
            report.activations += 1;
            match self.kind(entity)? {
                EntityKind::Gatherer => systems::gatherer_system(self, entity, &mut report)?,
                EntityKind::Predator => systems::predator_system(self, entity, &mut report)?,
                EntityKind::Swarm => systems::swarm_system(self, entity, &mut report)?,
                EntityKind::Resource | EntityKind::Station => {}
            }
        }

        debug!(
            tick = self.tick,
            activations = report.activations,
            events = report.events.len(),
            roster = self.active.len(),
            "tick complete"
        );
        Ok(report)
    }

    // ------------------------------------------------------------------------
    // Stations and resources
    // ------------------------------------------------------------------------

    /// Queue a part at a station.
    pub fn store_part(&mut self, station: Entity, part: Resource) -> Result<(), GridError> {
        self.expect_kind(station, EntityKind::Station)?;
        self.world
            .get::<&mut Station>(station)
            .map_err(component_error(station, "Station"))?
            .store_part(part);
        Ok(())
    }

    /// Let `station` recharge the gatherer `bot` from its oldest stored part.
    /// `Ok(false)` when the queue is empty or the bot is already full.
    pub fn recharge_bot(&mut self, station: Entity, bot: Entity) -> Result<bool, GridError> {
        self.expect_kind(station, EntityKind::Station)?;
        self.expect_kind(bot, EntityKind::Gatherer)?;
        let mut stored = self
            .world
            .get::<&mut Station>(station)
            .map_err(component_error(station, "Station"))?;
        let mut energy = self
            .world
            .get::<&mut Energy>(bot)
            .map_err(component_error(bot, "Energy"))?;
        Ok(stored.recharge(&mut energy))
    }

    /// Decay every resource lying on the grid. Returns how many aged.
    pub fn age_resources(&mut self) -> usize {
        let mut aged = 0;
        for (_, resource) in self.world.query_mut::<&mut Resource>().with::<&Position>() {
            resource.decay();
            aged += 1;
        }
        aged
    }

    // ------------------------------------------------------------------------
    // Component access
    // ------------------------------------------------------------------------

    pub(crate) fn component<T: Component + Copy>(
        &self,
        entity: Entity,
        name: &'static str,
    ) -> Result<T, GridError> {
        self.world
            .get::<&T>(entity)
            .map(|c| *c)
            .map_err(component_error(entity, name))
    }

    /// Subtract `amount` and return what is left.
    pub(crate) fn drain_energy(&mut self, entity: Entity, amount: f32) -> Result<Energy, GridError> {
        let mut energy = self
            .world
            .get::<&mut Energy>(entity)
            .map_err(component_error(entity, "Energy"))?;
        energy.drain(amount);
        Ok(*energy)
    }

    /// Add `amount` up to the cap and return the result.
    pub(crate) fn restore_energy(&mut self, entity: Entity, amount: f32) -> Result<Energy, GridError> {
        let mut energy = self
            .world
            .get::<&mut Energy>(entity)
            .map_err(component_error(entity, "Energy"))?;
        energy.restore(amount);
        Ok(*energy)
    }

    fn expect_kind(&self, entity: Entity, expected: EntityKind) -> Result<(), GridError> {
        if self.kind(entity)? == expected {
            Ok(())
        } else {
            Err(GridError::WrongKind { entity, expected })
        }
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    pub fn size(&self) -> usize {
        self.torus.size()
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Roster in activation order.
    pub fn active(&self) -> &[Entity] {
        &self.active
    }

    /// Bucket at the wrapped `(x, y)`.
    pub fn entities_at(&self, x: i64, y: i64) -> &[Entity] {
        &self.cells[self.torus.index(self.torus.wrap(x, y))]
    }

    pub fn kind(&self, entity: Entity) -> Result<EntityKind, GridError> {
        self.world
            .get::<&EntityKind>(entity)
            .map(|k| *k)
            .map_err(|_| GridError::StaleEntityReference(entity))
    }

    pub fn position(&self, entity: Entity) -> Result<Position, GridError> {
        self.world
            .get::<&Position>(entity)
            .map(|p| *p)
            .map_err(|_| GridError::StaleEntityReference(entity))
    }

    /// `None` for unpowered kinds and despawned entities.
    pub fn energy(&self, entity: Entity) -> Option<f32> {
        self.world.get::<&Energy>(entity).ok().map(|e| e.0)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Live entities, placed or not.
    pub fn entity_count(&self) -> usize {
        self.world.len() as usize
    }

    /// Read-only access to the underlying ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn cells(&self) -> &[Vec<Entity>] {
        &self.cells
    }
}

fn component_error(entity: Entity, component: &'static str) -> impl Fn(ComponentError) -> GridError {
    move |err| match err {
        ComponentError::NoSuchEntity => GridError::StaleEntityReference(entity),
        _ => GridError::MissingComponent { entity, component },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(10, 7).unwrap()
    }

    fn buckets_holding(grid: &Grid, entity: Entity) -> Vec<Position> {
        let mut found = Vec::new();
        for x in 0..grid.size() {
            for y in 0..grid.size() {
                let here = grid.entities_at(x as i64, y as i64);
                for _ in here.iter().filter(|e| **e == entity) {
                    found.push(Position { x, y });
                }
            }
        }
        found
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Grid::new(0, 1), Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        assert!(matches!(Grid::new(MAX_GRID_SIZE + 1, 1), Err(GridError::InvalidConfig(_))));
        assert!(matches!(Grid::new(usize::MAX, 1), Err(GridError::InvalidConfig(_))));
        assert!(matches!(Grid::new(MAX_GRID_SIZE * 2, 1), Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn test_place_wraps_and_rosters_active_kinds() {
        let mut grid = grid();
        let bot = grid.spawn_at(Body::gatherer(100.0), -1, 12).unwrap();
        let part = grid.spawn_at(Body::resource(ResourceSize::Small), 3, 3).unwrap();

        assert_eq!(grid.position(bot).unwrap(), Position { x: 9, y: 2 });
        assert_eq!(grid.entities_at(9, 2), &[bot]);
        assert_eq!(grid.active(), &[bot]);
        assert!(!grid.active().contains(&part));
    }

    #[test]
    fn test_double_placement_rejected() {
        let mut grid = grid();
        let bot = grid.spawn_at(Body::gatherer(100.0), 1, 1).unwrap();
        assert_eq!(grid.place(bot, 2, 2), Err(GridError::DoublePlacement(bot)));
        assert_eq!(buckets_holding(&grid, bot), vec![Position { x: 1, y: 1 }]);
        assert_eq!(grid.active().len(), 1);
    }

    #[test]
    fn test_move_by_identity() {
        let mut grid = grid();
        let a = grid.spawn_at(Body::gatherer(100.0), 4, 4).unwrap();
        let b = grid.spawn_at(Body::gatherer(100.0), 4, 4).unwrap();

        let to = grid.move_entity(b, 4, -6).unwrap();
        assert_eq!(to, Position { x: 4, y: 4 });
        assert_eq!(grid.entities_at(4, 4), &[a, b]);

        grid.move_entity(a, 15, 5).unwrap();
        assert_eq!(grid.entities_at(4, 4), &[b]);
        assert_eq!(buckets_holding(&grid, a), vec![Position { x: 5, y: 5 }]);
        assert_eq!(grid.position(a).unwrap(), Position { x: 5, y: 5 });
    }

    #[test]
    fn test_stale_references_fail_loudly() {
        let mut grid = grid();
        let bot = grid.spawn_at(Body::gatherer(100.0), 0, 0).unwrap();
        grid.remove(bot).unwrap();

        assert_eq!(grid.move_entity(bot, 1, 1), Err(GridError::StaleEntityReference(bot)));
        assert_eq!(grid.remove(bot), Err(GridError::StaleEntityReference(bot)));
        assert_eq!(grid.place(bot, 1, 1), Err(GridError::StaleEntityReference(bot)));

        // Spawned but never placed has no bucket to move out of
        let loose = grid.spawn(Body::predator(50.0));
        assert_eq!(grid.move_entity(loose, 1, 1), Err(GridError::StaleEntityReference(loose)));
    }

    #[test]
    fn test_scan_first_prefers_scan_order() {
        let mut grid = grid();
        let near = grid.spawn_at(Body::resource(ResourceSize::Small), 4, 5).unwrap();
        let _far = grid.spawn_at(Body::resource(ResourceSize::Large), 6, 6).unwrap();
        let origin = Position { x: 5, y: 5 };

        let (offset, found) = grid
            .scan_first(origin, 1, |k| k == EntityKind::Resource)
            .unwrap();
        assert_eq!(found, near);
        assert_eq!(offset, Offset::new(-1, 0));
        assert!(grid.scan_first(origin, 1, |k| k == EntityKind::Swarm).is_none());
    }

    #[test]
    fn test_scan_all_dedupes_aliased_cells() {
        // On a 2×2 torus offsets -1 and +1 land on the same cell
        let mut grid = Grid::new(2, 1).unwrap();
        let bot = grid.spawn_at(Body::gatherer(100.0), 1, 1).unwrap();
        let found = grid.scan_all(Position { x: 0, y: 0 }, 1, |k| k == EntityKind::Gatherer);
        assert_eq!(found, vec![bot]);
    }

    #[test]
    fn test_recharge_bot_checks_kinds() {
        let mut grid = grid();
        let station = grid.spawn_at(Body::station(), 2, 2).unwrap();
        let bot = grid.spawn_at(Body::gatherer(40.0), 2, 2).unwrap();

        assert_eq!(grid.recharge_bot(station, bot), Ok(false));
        grid.store_part(station, Resource::new(ResourceSize::Large)).unwrap();
        assert_eq!(grid.recharge_bot(station, bot), Ok(true));
        assert_eq!(grid.energy(bot), Some(47.0));

        assert_eq!(
            grid.recharge_bot(bot, station),
            Err(GridError::WrongKind { entity: bot, expected: EntityKind::Station })
        );
    }

    #[test]
    fn test_recharge_bot_refuses_drones() {
        let mut grid = grid();
        let station = grid.spawn_at(Body::station(), 2, 2).unwrap();
        grid.store_part(station, Resource::new(ResourceSize::Small)).unwrap();
        let drone = grid.spawn_at(Body::predator(40.0), 2, 2).unwrap();

        assert_eq!(
            grid.recharge_bot(station, drone),
            Err(GridError::WrongKind { entity: drone, expected: EntityKind::Gatherer })
        );
        assert_eq!(grid.energy(drone), Some(40.0));
        let snap = grid.snapshot();
        let view = snap.entities.iter().find(|e| e.kind == EntityKind::Station).unwrap();
        assert_eq!(view.stored_parts, Some(1));
    }

    #[test]
    fn test_age_resources_only_touches_resources() {
        let mut grid = grid();
        let part = grid.spawn_at(Body::resource(ResourceSize::Medium), 1, 1).unwrap();
        grid.spawn_at(Body::gatherer(100.0), 1, 1).unwrap();

        assert_eq!(grid.age_resources(), 1);
        let resource = grid.component::<Resource>(part, "Resource").unwrap();
        assert!((resource.enhancement - 4.9).abs() < 1e-5);
    }
}
