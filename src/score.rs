//! Ranking and score deltas for finished games.
//!
//! Players are ranked by ascending remaining hand size (ties keep seating
//! order). Each rank maps to a fixed delta that depends on the game mode and
//! the number of players:
//!
//! | players | rating                      | evaluate                     |
//! |---------|-----------------------------|------------------------------|
//! | 4       | 10 4 -3 -9                  | 10 4 -4 -10                  |
//! | 5       | 12 6 1 -5 -11               | 12 6 0 -6 -12                |
//! | 6       | 15 9 4 -3 -8 -13            | 15 9 3 -3 -9 -15             |
//! | 7       | 18 12 7 2 -4 -10 -16        | 18 12 6 0 -6 -12 -18         |
//!
//! Any other table size scores zero for every rank.

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::store::{ScoreRepository, StoreError};

/// Leaderboard a game counts towards.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Rating,
    Evaluate,
}

impl GameMode {
    pub fn name(self) -> &'static str {
        match self {
            GameMode::Rating => "rating",
            GameMode::Evaluate => "evaluate",
        }
    }
}

const RATING_4: [i32; 4] = [10, 4, -3, -9];
const RATING_5: [i32; 5] = [12, 6, 1, -5, -11];
const RATING_6: [i32; 6] = [15, 9, 4, -3, -8, -13];
const RATING_7: [i32; 7] = [18, 12, 7, 2, -4, -10, -16];
const EVALUATE_4: [i32; 4] = [10, 4, -4, -10];
const EVALUATE_5: [i32; 5] = [12, 6, 0, -6, -12];
const EVALUATE_6: [i32; 6] = [15, 9, 3, -3, -9, -15];
const EVALUATE_7: [i32; 7] = [18, 12, 6, 0, -6, -12, -18];

/// Score deltas for ranks `1..=num_players`, in rank order.
pub fn rank_deltas(mode: GameMode, num_players: usize) -> Vec<i32> {
    let table: &[i32] = match (mode, num_players) {
        (GameMode::Rating, 4) => &RATING_4,
        (GameMode::Rating, 5) => &RATING_5,
        (GameMode::Rating, 6) => &RATING_6,
        (GameMode::Rating, 7) => &RATING_7,
        (GameMode::Evaluate, 4) => &EVALUATE_4,
        (GameMode::Evaluate, 5) => &EVALUATE_5,
        (GameMode::Evaluate, 6) => &EVALUATE_6,
        (GameMode::Evaluate, 7) => &EVALUATE_7,
        _ => return vec![0; num_players],
    };
    table.to_vec()
}

/// Delta for a single 1-based rank. Unknown ranks score zero.
pub fn rank_delta(mode: GameMode, num_players: usize, rank: usize) -> i32 {
    rank.checked_sub(1)
        .and_then(|idx| rank_deltas(mode, num_players).get(idx).copied())
        .unwrap_or(0)
}

/// Final standing of one player.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ranking {
    pub player: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub hand_size: usize,
    pub rank: usize,
    pub delta: i32,
}

/// Minimal per-player input to the ranking.
#[derive(Clone, Debug)]
pub struct Standing<'a> {
    pub name: &'a str,
    pub is_human: bool,
    pub hand_size: usize,
}

/// Ranks players by ascending hand size. The sort is stable so ties keep
/// their seating order.
pub fn rank_players(standings: &[Standing<'_>], mode: GameMode) -> Vec<Ranking> {
    let mut order: Vec<PlayerId> = (0..standings.len()).collect();
    order.sort_by_key(|&idx| standings[idx].hand_size);
    let deltas = rank_deltas(mode, standings.len());
    order
        .into_iter()
        .enumerate()
        .map(|(position, player)| Ranking {
            player,
            name: standings[player].name.to_string(),
            is_human: standings[player].is_human,
            hand_size: standings[player].hand_size,
            rank: position + 1,
            delta: deltas.get(position).copied().unwrap_or(0),
        })
        .collect()
}

/// Final standings of a finished game.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResult {
    pub winner: PlayerId,
    pub mode: GameMode,
    pub rankings: Vec<Ranking>,
    /// Standing of the first human seat, if any.
    pub human: Option<Ranking>,
}

impl GameResult {
    pub fn ranking_of(&self, player: PlayerId) -> Option<&Ranking> {
        self.rankings.iter().find(|ranking| ranking.player == player)
    }
}

/// Change applied to a persisted score.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub account: String,
    pub mode: GameMode,
    pub old_score: i64,
    pub new_score: i64,
    pub delta: i32,
}

/// Reads the stored score (missing records count as zero), applies `delta`
/// clamped at zero and writes it back.
pub fn apply_delta(
    store: &mut dyn ScoreRepository,
    account: &str,
    mode: GameMode,
    delta: i32,
) -> Result<ScoreUpdate, StoreError> {
    let old_score = store.fetch(account, mode)?.unwrap_or(0);
    let new_score = (old_score + i64::from(delta)).max(0);
    store.store(account, mode, new_score)?;
    Ok(ScoreUpdate {
        account: account.to_string(),
        mode,
        old_score,
        new_score,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryScoreStore;

    fn standing(name: &str, hand_size: usize) -> Standing<'_> {
        Standing {
            name,
            is_human: name == "A",
            hand_size,
        }
    }

    #[test]
    fn four_player_rating_ranks_by_hand_size() {
        let standings = [
            standing("A", 0),
            standing("B", 3),
            standing("C", 5),
            standing("D", 7),
        ];
        let rankings = rank_players(&standings, GameMode::Rating);
        let ranks: Vec<_> = rankings.iter().map(|r| (r.name.as_str(), r.rank, r.delta)).collect();
        assert_eq!(
            ranks,
            vec![("A", 1, 10), ("B", 2, 4), ("C", 3, -3), ("D", 4, -9)]
        );
    }

    #[test]
    fn ties_keep_seating_order() {
        let standings = [
            standing("A", 4),
            standing("B", 0),
            standing("C", 4),
            standing("D", 2),
        ];
        let rankings = rank_players(&standings, GameMode::Evaluate);
        let order: Vec<_> = rankings.iter().map(|r| r.player).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(rankings[2].delta, -4);
        assert_eq!(rankings[3].delta, -10);
    }

    #[test]
    fn unknown_table_sizes_score_zero() {
        assert_eq!(rank_deltas(GameMode::Rating, 3), vec![0, 0, 0]);
        assert_eq!(rank_deltas(GameMode::Evaluate, 8), vec![0; 8]);
        assert_eq!(rank_delta(GameMode::Rating, 2, 1), 0);
        assert_eq!(rank_delta(GameMode::Rating, 7, 7), -16);
        assert_eq!(rank_delta(GameMode::Evaluate, 5, 3), 0);
        assert_eq!(rank_delta(GameMode::Rating, 4, 0), 0);
    }

    #[test]
    fn tables_are_sized_to_player_count() {
        for players in 4..=7 {
            for mode in [GameMode::Rating, GameMode::Evaluate] {
                assert_eq!(rank_deltas(mode, players).len(), players);
            }
        }
    }

    #[test]
    fn apply_delta_clamps_at_zero() -> Result<(), StoreError> {
        let mut store = MemoryScoreStore::new();
        let update = apply_delta(&mut store, "alice", GameMode::Rating, -9)?;
        assert_eq!((update.old_score, update.new_score), (0, 0));
        store.store("alice", GameMode::Rating, 20)?;
        let update = apply_delta(&mut store, "alice", GameMode::Rating, 4)?;
        assert_eq!((update.old_score, update.new_score, update.delta), (20, 24, 4));
        assert_eq!(store.fetch("alice", GameMode::Rating)?, Some(24));
        assert_eq!(store.fetch("alice", GameMode::Evaluate)?, None);
        Ok(())
    }
}
