//! # Dungeon State Module
//!
//! Level transitions for a run through the dungeon.
//!
//! A run owns exactly one level at a time. Descending generates the next level
//! from a seed derived from the run seed and the new depth, and replaces the
//! previous level wholesale; nothing carries over between levels.

use crate::generation::utils;
use crate::{
    GenerationConfig, Generator, GridlockError, GridlockResult, Level, SectorDungeonGenerator,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// State of a run: the configuration, the current depth and its level.
#[derive(Debug, Clone)]
pub struct DungeonState {
    /// Configuration whose seed is the run seed
    pub config: GenerationConfig,
    /// Depth of the current level, starting at 0
    pub depth: u32,
    /// The level the player is on
    pub level: Level,
    /// Deepest level allowed, if the run has an end
    pub max_depth: Option<u32>,
    generator: SectorDungeonGenerator,
}

impl DungeonState {
    /// Starts a run by generating depth 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridlock::{DungeonState, GenerationConfig};
    ///
    /// let mut state = DungeonState::new(GenerationConfig::new(12345)).unwrap();
    /// assert_eq!(state.depth, 0);
    /// state.descend().unwrap();
    /// assert_eq!(state.level.number, 1);
    /// ```
    pub fn new(config: GenerationConfig) -> GridlockResult<Self> {
        Self::with_generator(config, SectorDungeonGenerator::new())
    }

    /// Starts a run with a custom generator.
    pub fn with_generator(
        config: GenerationConfig,
        generator: SectorDungeonGenerator,
    ) -> GridlockResult<Self> {
        config.validate()?;
        let level = Self::generate_at(&config, &generator, 0)?;

        Ok(Self {
            config,
            depth: 0,
            level,
            max_depth: None,
            generator,
        })
    }

    /// Limits how deep the run can go.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Generates the next level and replaces the current one.
    pub fn descend(&mut self) -> GridlockResult<&Level> {
        let next = self.depth + 1;
        if let Some(max) = self.max_depth {
            if next > max {
                return Err(GridlockError::InvalidState(format!(
                    "cannot descend below depth {}",
                    max
                )));
            }
        }

        self.level = Self::generate_at(&self.config, &self.generator, next)?;
        self.depth = next;
        info!("Descended to depth {}", self.depth);
        Ok(&self.level)
    }

    /// Seed used for the level at `depth` of this run.
    pub fn seed_for_depth(&self, depth: u32) -> u64 {
        utils::level_seed(self.config.seed, depth)
    }

    fn generate_at(
        config: &GenerationConfig,
        generator: &SectorDungeonGenerator,
        depth: u32,
    ) -> GridlockResult<Level> {
        let seed = utils::level_seed(config.seed, depth);
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = generator.clone().with_level_number(depth);
        generator.generate(config, &mut rng)
    }
}
