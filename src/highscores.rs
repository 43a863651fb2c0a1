//! Best score and currency bookkeeping
//!
//! Read once when a harness is built, written back only when something
//! actually changed.

use serde::Serialize;

use crate::games::GameId;
use crate::persistence::{CURRENCY_KEY, KeyValueStore, best_score_key, read_u64, write_u64};

/// Outcome of recording one finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub score: u64,
    pub best: u64,
    pub new_best: bool,
    pub coins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBook {
    game: GameId,
    best: u64,
    currency: u64,
}

impl ScoreBook {
    pub fn load<S: KeyValueStore + ?Sized>(game: GameId, store: &S) -> Self {
        let best = read_u64(store, &best_score_key(game));
        let currency = read_u64(store, CURRENCY_KEY);
        log::info!("Loaded {game}: best {best}, currency {currency}");
        Self {
            game,
            best,
            currency,
        }
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn currency(&self) -> u64 {
        self.currency
    }

    /// Fold a finished run in. The best score is written only when it grows,
    /// the currency total only when coins were collected.
    pub fn record_run<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        score: u64,
        coins: u32,
    ) -> RunRecord {
        let new_best = score > self.best;
        if new_best {
            self.best = score;
            write_u64(store, &best_score_key(self.game), score);
            log::info!("New best for {}: {}", self.game, score);
        }

        if coins > 0 {
            self.currency = self.currency.saturating_add(coins as u64);
            write_u64(store, CURRENCY_KEY, self.currency);
        }

        RunRecord {
            score,
            best: self.best,
            new_best,
            coins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_lower_score_keeps_best_without_writing() {
        let mut store = MemoryStore::with_entries([("pulse_arcade.best.lane-dash", "80")]);
        let mut book = ScoreBook::load(GameId::LaneDash, &store);
        assert_eq!(book.best(), 80);

        let record = book.record_run(&mut store, 50, 0);
        assert_eq!(record.best, 80);
        assert!(!record.new_best);
        assert_eq!(book.best(), 80);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_equal_score_is_not_a_new_best() {
        let mut store = MemoryStore::with_entries([("pulse_arcade.best.wave-rider", "12")]);
        let mut book = ScoreBook::load(GameId::WaveRider, &store);
        assert!(!book.record_run(&mut store, 12, 0).new_best);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_higher_score_is_written() {
        let mut store = MemoryStore::new();
        let mut book = ScoreBook::load(GameId::PulseParry, &store);
        let record = book.record_run(&mut store, 31, 0);
        assert!(record.new_best);
        assert_eq!(store.get("pulse_arcade.best.pulse-parry").as_deref(), Some("31"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_coins_accumulate_across_games() {
        let mut store = MemoryStore::with_entries([("pulse_arcade.currency", "10")]);
        let mut lane = ScoreBook::load(GameId::LaneDash, &store);
        lane.record_run(&mut store, 0, 3);
        let mut spiral = ScoreBook::load(GameId::SpiralRun, &store);
        assert_eq!(spiral.currency(), 13);
        spiral.record_run(&mut store, 0, 2);
        assert_eq!(store.get(CURRENCY_KEY).as_deref(), Some("15"));
    }

    #[test]
    fn test_corrupt_values_start_from_zero() {
        let store = MemoryStore::with_entries([
            ("pulse_arcade.best.echo-guard", "NaN"),
            ("pulse_arcade.currency", ""),
        ]);
        let book = ScoreBook::load(GameId::EchoGuard, &store);
        assert_eq!(book.best(), 0);
        assert_eq!(book.currency(), 0);
    }
}
