//! Zobrist hashing for Blooms positions.
//!
//! One random key per (cell, colour) and one per (player, capture count).
//! The fingerprint is the XOR of the keys present in a position.

use rand::RngCore;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use super::board::{BloomsConfig, Colour, Position};
use crate::game_trait::Player;

/// Fixed seed so fingerprints agree across hasher instances.
pub const DEFAULT_SEED: u64 = 0x5EED_B100_D5;

fn rand63(rng: &mut Pcg64) -> u64 {
    rng.next_u64() & ((1u64 << 63) - 1)
}

fn make_matrix(rng: &mut Pcg64, width: usize) -> Vec<Vec<u64>> {
    (0..width)
        .map(|_| (0..width).map(|_| rand63(rng)).collect())
        .collect()
}

#[derive(Clone, Debug)]
pub struct ZobristHasher {
    width: usize,
    stone: [Vec<Vec<u64>>; 4],
    captured: [Vec<u64>; 2],
}

impl ZobristHasher {
    pub fn new(config: &BloomsConfig, seed: u64) -> Self {
        let width = config.width();
        let mut rng = Pcg64::seed_from_u64(seed);

        let stone = [
            make_matrix(&mut rng, width),
            make_matrix(&mut rng, width),
            make_matrix(&mut rng, width),
            make_matrix(&mut rng, width),
        ];

        // A game ends once a counter reaches the target, and one move captures
        // at most every cell, so counts stay below target + cells.
        let limit = config.score_target() as usize + config.cell_count() + 1;
        let captured = [
            (0..limit).map(|_| rand63(&mut rng)).collect(),
            (0..limit).map(|_| rand63(&mut rng)).collect(),
        ];

        Self {
            width,
            stone,
            captured,
        }
    }

    fn capture_key(&self, player: Player, count: u32) -> u64 {
        let table = &self.captured[player.index()];
        let count = count as usize;
        match table.get(count) {
            Some(&key) => key,
            // Only reachable for hand-built positions
            None => table[table.len() - 1] ^ (count as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        }
    }

    pub fn hash(&self, position: &Position) -> u64 {
        let mut h = 0u64;

        for ((r, q), &cell) in position.cells().indexed_iter() {
            if r >= self.width || q >= self.width {
                continue;
            }
            if let Some(colour) = Colour::from_cell(cell) {
                h ^= self.stone[colour.plane()][r][q];
            }
        }

        for player in Player::BOTH {
            h ^= self.capture_key(player, position.captures_of(player));
        }

        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (BloomsConfig, ZobristHasher) {
        let config = BloomsConfig::recommended(4).unwrap();
        (config, ZobristHasher::new(&config, DEFAULT_SEED))
    }

    #[test]
    fn test_hash_is_deterministic() {
        let (config, hasher) = setup();
        let other = ZobristHasher::new(&config, DEFAULT_SEED);
        let mut pos = Position::new(config);
        pos.place_stone(3, 3, Colour::Two).unwrap();
        assert_eq!(hasher.hash(&pos), other.hash(&pos));
    }

    #[test]
    fn test_hash_distinguishes_colour_and_cell() {
        let (config, hasher) = setup();
        let empty = Position::new(config);

        let mut a = empty.clone();
        a.place_stone(3, 3, Colour::One).unwrap();
        let mut b = empty.clone();
        b.place_stone(3, 3, Colour::Two).unwrap();
        let mut c = empty.clone();
        c.place_stone(4, 3, Colour::One).unwrap();

        let hashes = [hasher.hash(&empty), hasher.hash(&a), hasher.hash(&b), hasher.hash(&c)];
        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(hashes[i], hashes[j]);
            }
        }
    }

    #[test]
    fn test_hash_distinguishes_captures() {
        let (config, hasher) = setup();
        let mut a = Position::new(config);
        let mut b = a.clone();
        a.set_captures([1, 0]);
        b.set_captures([0, 1]);
        assert_ne!(hasher.hash(&a), hasher.hash(&b));
        assert_ne!(hasher.hash(&a), hasher.hash(&Position::new(config)));
    }

    #[test]
    fn test_hash_handles_counts_beyond_table() {
        let (config, hasher) = setup();
        let mut a = Position::new(config);
        let mut b = a.clone();
        a.set_captures([500, 0]);
        b.set_captures([501, 0]);
        assert_ne!(hasher.hash(&a), hasher.hash(&b));
    }
}
