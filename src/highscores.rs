//! Best-score tracking
//!
//! Read once at startup, written whenever a run ends. Storage failures never
//! reach the game: an unreadable score counts as zero and a failed write is
//! dropped with a warning.

use crate::persistence::HighScoreStore;

pub struct HighScore {
    best: u64,
    store: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// Load the stored best score
    pub fn load(store: impl HighScoreStore + 'static) -> Self {
        let best = match store.read() {
            Ok(Some(score)) => {
                log::info!("Loaded high score {score}");
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(err) => {
                log::warn!("{err}; high score reset to 0");
                0
            }
        };
        Self {
            best,
            store: Box::new(store),
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Fold a finished run into the best score and persist the result.
    /// Returns true when the run set a new record.
    pub fn record(&mut self, score: u64) -> bool {
        let improved = score > self.best;
        self.best = self.best.max(score);
        if let Err(err) = self.store.write(self.best) {
            log::warn!("{err}; high score not saved");
        }
        if improved {
            log::info!("New high score: {score}");
        }
        improved
    }
}
