use std::time::Duration;

use crate::config::GameConfig;

/// Cumulative score, level and the gravity period that goes with the level
#[derive(Debug, Clone)]
pub struct Scoring {
    score: u64,
    level: u64,
    gravity_period: Duration,
    line_scores: Vec<u64>,
    speed_table_ms: Vec<u64>,
    level_threshold: u64,
}

impl Scoring {
    pub fn new(config: &GameConfig) -> Self {
        let mut scoring = Scoring {
            score: 0,
            level: 0,
            gravity_period: Duration::ZERO,
            line_scores: config.line_scores.clone(),
            speed_table_ms: config.speed_table_ms.clone(),
            level_threshold: config.level_threshold.max(1),
        };
        scoring.gravity_period = scoring.period_for(0);
        scoring
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 0;
        self.gravity_period = self.period_for(0);
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn gravity_period(&self) -> Duration {
        self.gravity_period
    }

    /// Points for clearing `lines` rows at once; the table starts at one line
    pub fn reward(&self, lines: usize) -> u64 {
        if lines == 0 {
            return 0;
        }
        let index = (lines - 1).min(self.line_scores.len().saturating_sub(1));
        self.line_scores.get(index).copied().unwrap_or(0)
    }

    // Levels past the end of the table keep the last entry
    fn period_for(&self, level: u64) -> Duration {
        let last = self.speed_table_ms.len().saturating_sub(1);
        let index = usize::try_from(level).unwrap_or(usize::MAX).min(last);
        Duration::from_millis(self.speed_table_ms.get(index).copied().unwrap_or(0))
    }

    /// Award points for a lock, returns the points added
    pub fn add_lines(&mut self, lines: usize) -> u64 {
        let points = self.reward(lines);
        self.score += points;

        let new_level = self.score / self.level_threshold;
        if new_level > self.level {
            self.level = new_level;
            self.gravity_period = self.period_for(new_level);
            tracing::debug!(
                level = self.level,
                gravity_ms = self.gravity_period.as_millis() as u64,
                "level up"
            );
        }
        points
    }
}
