//! Match standings
//!
//! Ranks the player slots by score. Rebuilt from the NanoBots on demand;
//! nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::sim::NanoBot;

/// One player's line in the standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub slot: usize,
    pub score: i32,
    pub kills: u32,
    pub deaths: u32,
    pub playing: bool,
}

impl Standing {
    pub fn from_bot(bot: &NanoBot) -> Self {
        Self {
            slot: bot.slot,
            score: bot.score,
            kills: bot.kills,
            deaths: bot.deaths,
            playing: bot.playing,
        }
    }
}

/// Standings sorted by descending score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub entries: Vec<Standing>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rank a set of bots; ties keep the order they were given in
    pub fn from_bots<'a>(bots: impl IntoIterator<Item = &'a NanoBot>) -> Self {
        let mut board = Self::new();
        for bot in bots {
            board.record(Standing::from_bot(bot));
        }
        board
    }

    /// Insert a standing at its rank; returns the rank (1-indexed)
    pub fn record(&mut self, standing: Standing) -> usize {
        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| standing.score > e.score);
        match pos {
            Some(i) => {
                self.entries.insert(i, standing);
                i + 1
            }
            None => {
                self.entries.push(standing);
                self.entries.len()
            }
        }
    }

    /// Rank of a slot (1-indexed)
    pub fn rank_of(&self, slot: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.slot == slot)
            .map(|i| i + 1)
    }

    /// Top standing among players currently in the match
    pub fn leader(&self) -> Option<&Standing> {
        self.entries.iter().find(|e| e.playing)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(slot: usize, score: i32, playing: bool) -> Standing {
        Standing {
            slot,
            score,
            kills: 0,
            deaths: 0,
            playing,
        }
    }

    #[test]
    fn test_record_orders_descending() {
        let mut board = Scoreboard::new();
        assert_eq!(board.record(standing(0, 2, true)), 1);
        assert_eq!(board.record(standing(1, 5, true)), 1);
        assert_eq!(board.record(standing(2, -1, true)), 3);
        let scores: Vec<i32> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![5, 2, -1]);
    }

    #[test]
    fn test_ties_keep_slot_order() {
        let mut board = Scoreboard::new();
        board.record(standing(0, 1, true));
        board.record(standing(1, 1, true));
        assert_eq!(board.rank_of(0), Some(1));
        assert_eq!(board.rank_of(1), Some(2));
    }

    #[test]
    fn test_leader_skips_idle_players() {
        let mut board = Scoreboard::new();
        board.record(standing(0, 9, false));
        board.record(standing(1, 3, true));
        assert_eq!(board.leader().map(|s| s.slot), Some(1));
    }

    #[test]
    fn test_from_bots() {
        let mut a = NanoBot::new(0);
        let mut b = NanoBot::new(1);
        a.score = 1;
        b.score = 4;
        let board = Scoreboard::from_bots([&a, &b]);
        assert_eq!(board.entries[0].slot, 1);
        assert_eq!(board.len(), 2);
    }
}
