//! Tests for Blooms rules: move generation, legality, bloom resolution and
//! game end.

use super::*;
use crate::games::blooms::board::BloomsConfig;

mod tests {
    use super::*;

    fn base3() -> Position {
        Position::new(BloomsConfig::recommended(3).unwrap())
    }

    fn base4() -> Position {
        Position::new(BloomsConfig::recommended(4).unwrap())
    }

    fn single(q: usize, r: usize, colour: Colour) -> Move {
        Move::Single(Placement::new(q, r, colour))
    }

    /// Base-4 bloom of four cells around the centre and the eleven cells
    /// surrounding it.
    const BLOOM: [(usize, usize); 4] = [(3, 2), (3, 3), (3, 4), (4, 3)];
    const FENCE: [(usize, usize); 11] = [
        (4, 2), (4, 1), (3, 1), (2, 2), (2, 3), (2, 4),
        (4, 4), (2, 5), (3, 5), (5, 3), (5, 2),
    ];

    // ========================================================================
    // Move generation
    // ========================================================================

    #[test]
    fn test_empty_spaces_on_new_board() {
        for size in 3..=6 {
            let pos = Position::new(BloomsConfig::recommended(size).unwrap());
            assert_eq!(pos.empty_spaces().len(), 3 * size * size - 3 * size + 1);
        }
    }

    #[test]
    fn test_empty_spaces_row_major() {
        let spaces = base3().empty_spaces();
        // First row r = 0 holds q = 2..=4 on a base-3 board
        assert_eq!(&spaces[..3], &[(2, 0), (3, 0), (4, 0)]);
        assert_eq!(spaces.last(), Some(&(2, 4)));
    }

    #[test]
    fn test_legal_move_count_matches_action_size() {
        let pos = base3();
        let e = 19;
        let moves = pos.legal_moves(Player::One);
        assert_eq!(moves.len(), 2 * e + e * (e - 1));
        assert_eq!(moves.len(), pos.config().action_size());
    }

    #[test]
    fn test_legal_moves_order_and_colours() {
        let pos = base3();
        let moves = pos.legal_moves(Player::Two);
        assert_eq!(moves[0], single(2, 0, Colour::Three));
        assert_eq!(moves[19], single(2, 0, Colour::Four));
        assert_eq!(
            moves[38],
            Move::Double(
                Placement::new(2, 0, Colour::Three),
                Placement::new(3, 0, Colour::Four)
            )
        );
        assert!(moves.iter().all(|m| m.belongs_to(Player::Two)));
    }

    #[test]
    fn test_legal_moves_shrink_with_stones() {
        let mut pos = base3();
        pos.place_stone(2, 2, Colour::One).unwrap();
        let e = 18;
        assert_eq!(pos.legal_moves(Player::One).len(), 2 * e + e * (e - 1));
        assert!(pos
            .legal_moves(Player::One)
            .iter()
            .all(|m| m.placements().all(|p| (p.q, p.r) != (2, 2))));
    }

    // ========================================================================
    // Legality
    // ========================================================================

    #[test]
    fn test_illegal_moves_rejected() {
        let mut pos = base4();
        pos.place_stone(3, 3, Colour::Three).unwrap();

        let occupied = single(3, 3, Colour::One);
        let off_board = single(0, 0, Colour::One);
        let same_colour = Move::Double(
            Placement::new(2, 3, Colour::One),
            Placement::new(4, 3, Colour::One),
        );
        let same_cell = Move::Double(
            Placement::new(2, 3, Colour::One),
            Placement::new(2, 3, Colour::Two),
        );
        let mixed_owner = Move::Double(
            Placement::new(2, 3, Colour::One),
            Placement::new(4, 3, Colour::Three),
        );

        for mv in [occupied, off_board, same_colour, same_cell, mixed_owner] {
            assert!(!pos.is_legal_move(&mv), "{mv} should be illegal");
            assert_eq!(
                pos.apply_move(&mv),
                Err(BloomsError::IllegalMove { mv }),
            );
        }
    }

    #[test]
    fn test_failed_move_leaves_position_unchanged() {
        let mut pos = base4();
        pos.place_stone(3, 3, Colour::One).unwrap();
        let before = pos.clone();
        let mv = Move::Double(
            Placement::new(2, 3, Colour::One),
            Placement::new(3, 3, Colour::Two),
        );
        assert!(pos.apply_move_in_place(&mv).is_err());
        assert_eq!(pos, before);
    }

    // ========================================================================
    // Move application
    // ========================================================================

    #[test]
    fn test_single_placement_on_empty_board() {
        let pos = base4();
        let next = pos.apply_move(&single(6, 2, Colour::Two)).unwrap();
        assert_eq!(next.cells()[[2, 6]], 2);
        assert_eq!(next.stone_count(), 1);
        assert_eq!(next.captures(), [0, 0]);
        // Copy-on-write
        assert_eq!(pos.stone_count(), 0);
    }

    #[test]
    fn test_double_placement() {
        let pos = base4();
        let mv = Move::Double(
            Placement::new(3, 3, Colour::Three),
            Placement::new(4, 3, Colour::Four),
        );
        let next = pos.apply_move(&mv).unwrap();
        assert_eq!(next.colour_at(3, 3), Some(Colour::Three));
        assert_eq!(next.colour_at(4, 3), Some(Colour::Four));
        assert_eq!(next.captures(), [0, 0]);
    }

    // ========================================================================
    // Blooms
    // ========================================================================

    #[test]
    fn test_find_bloom_connects_same_colour_only() {
        let mut pos = base4();
        pos.place_stone(3, 3, Colour::One).unwrap();
        pos.place_stone(4, 3, Colour::One).unwrap();
        pos.place_stone(2, 3, Colour::Two).unwrap();

        let bloom = pos.find_bloom(4, 3).unwrap();
        assert_eq!(bloom.colour, Colour::One);
        let mut cells = bloom.cells.clone();
        cells.sort();
        assert_eq!(cells, vec![(3, 3), (4, 3)]);

        assert_eq!(pos.find_bloom(2, 3).unwrap().len(), 1);
        assert!(pos.find_bloom(5, 5).is_none());
        assert_eq!(pos.blooms().len(), 2);
    }

    #[test]
    fn test_single_stone_is_not_fenced() {
        let mut pos = base4();
        pos.place_stone(3, 3, Colour::One).unwrap();
        assert!(!pos.is_fenced(&[(3, 3)]));
    }

    fn fenced_position(bloom: Colour, fence: Colour) -> Position {
        let mut pos = base4();
        for &(q, r) in &BLOOM {
            pos.place_stone(q, r, bloom).unwrap();
        }
        // Leave (5, 2) open for the capturing move
        for &(q, r) in &FENCE[..FENCE.len() - 1] {
            pos.place_stone(q, r, fence).unwrap();
        }
        pos
    }

    #[test]
    fn test_fenced_bloom_credits_opponent_of_owner() {
        let pos = fenced_position(Colour::One, Colour::Three);
        assert!(!pos.is_fenced(&BLOOM));

        let next = pos.apply_move(&single(5, 2, Colour::Three)).unwrap();

        for &(q, r) in &BLOOM {
            assert!(next.is_empty_space(q, r), "({q}, {r}) should be cleared");
        }
        for &(q, r) in &FENCE {
            assert_eq!(next.colour_at(q, r), Some(Colour::Three));
        }
        assert_eq!(next.captures_of(Player::Two), 4);
        assert_eq!(next.captures_of(Player::One), 0);
    }

    #[test]
    fn test_own_colour_fence_still_credits_opponent() {
        // Player One's colour 2 surrounding Player One's colour 1
        let pos = fenced_position(Colour::One, Colour::Two);
        let next = pos.apply_move(&single(5, 2, Colour::Two)).unwrap();
        assert_eq!(next.captures(), [0, 4]);
    }

    #[test]
    fn test_fenced_opponent_bloom_credits_mover() {
        let pos = fenced_position(Colour::Four, Colour::Two);
        let next = pos.apply_move(&single(5, 2, Colour::Two)).unwrap();
        assert_eq!(next.captures(), [4, 0]);
    }

    #[test]
    fn test_suicide_placement_at_corner() {
        // (4, 0) is a base-3 corner with on-board neighbours (3, 0), (3, 1), (4, 1)
        let mut pos = base3();
        for (q, r) in [(3, 0), (3, 1), (4, 1)] {
            pos.place_stone(q, r, Colour::Three).unwrap();
        }
        let next = pos.apply_move(&single(4, 0, Colour::One)).unwrap();
        assert!(next.is_empty_space(4, 0));
        assert_eq!(next.captures(), [0, 1]);
        assert_eq!(next.stone_count(), 3);
    }

    #[test]
    fn test_edge_fence_ignores_off_board() {
        let mut pos = base3();
        pos.place_stone(4, 0, Colour::One).unwrap();
        pos.place_stone(3, 0, Colour::Four).unwrap();
        pos.place_stone(3, 1, Colour::Four).unwrap();
        let mv = single(4, 1, Colour::Three);
        let next = pos.apply_move(&mv).unwrap();
        assert!(next.is_empty_space(4, 0));
        assert_eq!(next.captures(), [0, 1]);
    }

    #[test]
    fn test_fenced_blooms_resolve_simultaneously() {
        // Colour-3 group around the corner, itself surrounded by colour 2.
        // Filling the corner fences both the new stone and the colour-3 group.
        let mut pos = base3();
        for (q, r) in [(3, 0), (3, 1), (4, 1)] {
            pos.place_stone(q, r, Colour::Three).unwrap();
        }
        for (q, r) in [(2, 0), (2, 1), (2, 2), (3, 2), (4, 2)] {
            pos.place_stone(q, r, Colour::Two).unwrap();
        }

        let gained = pos.apply_move_in_place(&single(4, 0, Colour::One)).unwrap();

        assert_eq!(gained, [3, 1]);
        assert_eq!(pos.captures(), [3, 1]);
        for (q, r) in [(4, 0), (3, 0), (3, 1), (4, 1)] {
            assert!(pos.is_empty_space(q, r));
        }
        assert_eq!(pos.stone_count(), 5);
    }

    // ========================================================================
    // Game end
    // ========================================================================

    #[test]
    fn test_outcome_ongoing_on_new_board() {
        let pos = base4();
        assert_eq!(pos.outcome(Player::One), GameOutcome::Ongoing);
        assert!(!pos.is_win(Player::One));
    }

    #[test]
    fn test_outcome_win_and_loss() {
        let mut pos = base4();
        pos.set_captures([15, 3]);
        assert!(pos.is_win(Player::One));
        assert_eq!(pos.outcome(Player::One), GameOutcome::Win);
        assert_eq!(pos.outcome(Player::Two), GameOutcome::Loss);
    }

    #[test]
    fn test_outcome_both_reach_target_is_draw() {
        let mut pos = base4();
        pos.set_captures([16, 15]);
        assert_eq!(pos.outcome(Player::One), GameOutcome::Draw);
        assert_eq!(pos.outcome(Player::Two), GameOutcome::Draw);
    }

    #[test]
    fn test_full_board_without_winner_is_draw() {
        let mut pos = base3();
        for (q, r) in pos.empty_spaces() {
            pos.place_stone(q, r, Colour::One).unwrap();
        }
        assert!(!pos.has_legal_moves());
        assert!(pos.legal_moves(Player::Two).is_empty());
        assert_eq!(pos.outcome(Player::One), GameOutcome::Draw);
    }
}
