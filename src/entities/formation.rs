use rand::Rng;

use super::alien::Alien;
use crate::config::WaveConfig;

/// Result of a formation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Direction for the following steps
    pub moving_right: bool,
    /// The step hit a wall: it was undone and the formation dropped a row
    pub bounced: bool,
}

/// Fixed rows x columns grid of alien slots.
///
/// Row 0 is the lowest row. Slots are emptied in place when an alien is
/// destroyed and the grid is never resized, so column membership is
/// stable for the whole wave.
#[derive(Debug, Clone)]
pub struct Formation {
    slots: Vec<Vec<Option<Alien>>>,
    columns: usize,
    /// Seconds accumulated since the last step
    timer: f32,
    h_walk: f32,
    h_sep: f32,
    v_sep: f32,
    playfield_width: f32,
}

impl Formation {
    /// Lays out a full formation centered horizontally below the ceiling
    pub fn build(config: &WaveConfig) -> Self {
        let rows = config.alien_rows;
        let columns = config.aliens_in_row;
        let first_x =
            (config.game_width - config.formation_width()) / 2.0 + config.alien_width / 2.0;
        let top_y = config.game_height - config.alien_ceiling - config.alien_height / 2.0;
        let variants = config.alien_variants.len().max(1);

        let slots = (0..rows)
            .map(|row| {
                let rows_above = (rows - 1 - row) as f32;
                let y = top_y - rows_above * (config.alien_height + config.alien_v_sep);
                let variant = (row / 2) % variants;
                (0..columns)
                    .map(|col| {
                        let x = first_x + col as f32 * (config.alien_width + config.alien_h_sep);
                        Some(Alien::new(
                            x,
                            y,
                            config.alien_width,
                            config.alien_height,
                            variant,
                        ))
                    })
                    .collect()
            })
            .collect();

        Self::from_slots(slots, config)
    }

    /// Wraps an explicit grid of slots.
    ///
    /// # Panics
    ///
    /// Panics if the grid is empty or not rectangular.
    pub fn from_slots(slots: Vec<Vec<Option<Alien>>>, config: &WaveConfig) -> Self {
        assert!(!slots.is_empty(), "a formation needs at least one row");
        let columns = slots[0].len();
        assert!(
            slots.iter().all(|row| row.len() == columns),
            "formation rows must all have {columns} slots"
        );

        Self {
            slots,
            columns,
            timer: 0.0,
            h_walk: config.alien_h_walk,
            h_sep: config.alien_h_sep,
            v_sep: config.alien_v_sep,
            playfield_width: config.game_width,
        }
    }

    pub fn rows(&self) -> usize {
        self.slots.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Seconds accumulated towards the next step
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` is outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&Alien> {
        self.check_index(row, col);
        self.slots[row][col].as_ref()
    }

    /// Live aliens in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Alien> {
        self.slots.iter().flatten().flatten()
    }

    pub fn live_count(&self) -> usize {
        self.iter().count()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Alien> {
        self.slots.iter_mut().flatten().flatten()
    }

    fn check_index(&self, row: usize, col: usize) {
        assert!(
            row < self.rows() && col < self.columns,
            "slot ({row}, {col}) is outside the {}x{} formation",
            self.rows(),
            self.columns
        );
    }

    /// Accumulates `dt` until `interval` is reached, then moves every live
    /// alien one step.
    ///
    /// A step that carries the formation past a wall is undone, the whole
    /// formation drops by the vertical separation and the direction flips.
    /// Returns `None` when no step was taken this frame.
    pub fn step(&mut self, moving_right: bool, dt: f32, interval: f32) -> Option<StepOutcome> {
        if self.timer < interval {
            self.timer += dt;
            return None;
        }
        self.timer = 0.0;

        let dx = if moving_right { self.h_walk } else { -self.h_walk };
        let mut right_edge = f32::NEG_INFINITY;
        let mut left_edge = f32::INFINITY;
        for alien in self.iter_mut() {
            alien.x += dx;
            right_edge = right_edge.max(alien.x + alien.width / 2.0);
            left_edge = left_edge.min(alien.x - alien.width / 2.0);
        }

        let bounced = if moving_right {
            right_edge > self.playfield_width - self.h_sep
        } else {
            left_edge < self.h_sep
        };

        if bounced {
            let v_sep = self.v_sep;
            for alien in self.iter_mut() {
                alien.x -= dx;
                alien.y -= v_sep;
            }
        }

        Some(StepOutcome {
            moving_right: moving_right != bounced,
            bounced,
        })
    }

    /// Empties a slot for the rest of the wave, returning what was there
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside the grid.
    pub fn remove_at(&mut self, row: usize, col: usize) -> Option<Alien> {
        self.check_index(row, col);
        self.slots[row][col].take()
    }

    /// Lowest live alien of every non-empty column
    pub fn fire_candidates(&self) -> Vec<&Alien> {
        (0..self.columns)
            .filter_map(|col| {
                self.slots
                    .iter()
                    .filter_map(|row| row[col].as_ref())
                    .min_by(|a, b| a.y.total_cmp(&b.y))
            })
            .collect()
    }

    /// Picks the alien that fires next: uniformly among the lowest live
    /// alien of each column. `None` once every alien is gone.
    pub fn select_fire_target<R: Rng>(&self, rng: &mut R) -> Option<&Alien> {
        let candidates = self.fire_candidates();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }

    pub fn all_destroyed(&self) -> bool {
        self.iter().next().is_none()
    }

    /// True when any live alien's bottom edge is at or below `defense_line`
    pub fn any_breached(&self, defense_line: f32) -> bool {
        self.iter().any(|alien| alien.bottom() <= defense_line)
    }
}
