//! Ordered sequence of live obstacles: spawn, scroll, pass detection, retirement

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::ObstacleConfig;

use super::obstacle::Obstacle;

/// Live obstacles, oldest first
///
/// The stream never runs empty: it starts with one obstacle and spawns a
/// replacement whenever retirement would leave nothing behind.
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    obstacles: VecDeque<Obstacle>,
    params: ObstacleConfig,
    segment_height: i32,
    width: f32,
    rng: Xoshiro256StarStar,
    spawned: u64,
}

impl ObstacleStream {
    /// Seeded stream holding a single obstacle at the spawn line
    pub fn new(params: ObstacleConfig, segment_height: i32, width: f32, seed: u64) -> Self {
        let mut stream = Self {
            obstacles: VecDeque::new(),
            params,
            segment_height,
            width,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            spawned: 0,
        };
        stream.spawn();
        stream
    }

    fn spawn(&mut self) {
        let obstacle = Obstacle::generate(
            self.params.spawn_x,
            &self.params,
            self.segment_height,
            self.width,
            &mut self.rng,
        );
        log::debug!(
            "Spawned obstacle #{} at x={:.0} with gap {}..{}",
            self.spawned,
            obstacle.x,
            obstacle.gap_top(),
            obstacle.gap_bottom()
        );
        self.obstacles.push_back(obstacle);
        self.spawned += 1;
    }

    /// Scroll every obstacle by the shared speed
    pub fn advance(&mut self) {
        let speed = self.params.scroll_speed;
        for obstacle in &mut self.obstacles {
            obstacle.advance(speed);
        }
    }

    /// Flag obstacles cleared by `leading_x` and spawn one replacement per newly passed obstacle
    ///
    /// Returns the number of pass transitions this call.
    pub fn update_passes(&mut self, leading_x: f32) -> u32 {
        let mut passes = 0;
        for obstacle in &mut self.obstacles {
            if obstacle.is_cleared_by(leading_x) && obstacle.mark_passed() {
                passes += 1;
            }
        }
        for _ in 0..passes {
            self.spawn();
        }
        passes
    }

    /// Drop obstacles from the front whose trailing edge crossed the retirement line
    pub fn retire(&mut self) -> usize {
        let retire_x = self.params.retire_x;
        let mut retired = 0;
        while self
            .obstacles
            .front()
            .is_some_and(|o| o.trailing_edge() < retire_x)
        {
            self.obstacles.pop_front();
            retired += 1;
        }
        if retired > 0 {
            log::debug!("Retired {} obstacle(s), {} live", retired, self.obstacles.len());
        }
        if self.obstacles.is_empty() {
            self.spawn();
        }
        retired
    }

    /// First obstacle the reference agent has not yet cleared
    ///
    /// Falls back to the newest obstacle when every live one is cleared,
    /// which happens on the tick a pass is made, before its replacement
    /// spawns. `None` only for an empty stream.
    pub fn relevant(&self, reference_x: f32) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|o| !o.is_cleared_by(reference_x))
            .or_else(|| self.obstacles.back())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Total obstacles created so far, including retired ones
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn obstacle_width(&self) -> f32 {
        self.width
    }
}
