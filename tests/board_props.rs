use flotilla::{AttackOutcome, Board, Coordinate, Ship, BOARD_SIZE};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Coordinate construction fails exactly when a component leaves [0, 10).
    #[test]
    fn coordinate_bounds_law(col in 0u8..=255, row in 0u8..=255) {
        let result = Coordinate::new(col, row);
        prop_assert_eq!(result.is_ok(), col < BOARD_SIZE && row < BOARD_SIZE);
    }

    /// An aligned pair of endpoints yields a run of length |end-start|+1
    /// containing both endpoints, whichever way round they are given.
    #[test]
    fn ship_run_length_law(
        fixed in 0u8..BOARD_SIZE,
        a in 0u8..BOARD_SIZE,
        b in 0u8..BOARD_SIZE,
        vertical in any::<bool>(),
    ) {
        let (start, end) = if vertical {
            (Coordinate::new(fixed, a).unwrap(), Coordinate::new(fixed, b).unwrap())
        } else {
            (Coordinate::new(a, fixed).unwrap(), Coordinate::new(b, fixed).unwrap())
        };
        let ship = Ship::new(start, end).unwrap();
        prop_assert_eq!(ship.len(), a.abs_diff(b) as usize + 1);
        prop_assert!(ship.occupies(start));
        prop_assert!(ship.occupies(end));
    }

    /// First attack on a cell is never AlreadyAttacked; every later attack on
    /// that cell always is, and changes nothing.
    #[test]
    fn attack_idempotence_law(
        ship_col in 0u8..BOARD_SIZE,
        target_col in 0u8..BOARD_SIZE,
        target_row in 0u8..BOARD_SIZE,
        repeats in 1usize..4,
    ) {
        let mut board = Board::new();
        let start = Coordinate::new(ship_col, 0).unwrap();
        let end = Coordinate::new(ship_col, 2).unwrap();
        board.place_ship(start, end).unwrap();

        let target = Coordinate::new(target_col, target_row).unwrap();
        let first = board.receive_attack(target);
        prop_assert_ne!(first, AttackOutcome::AlreadyAttacked);

        let hit_before = board.is_hit(target);
        for _ in 0..repeats {
            prop_assert_eq!(board.receive_attack(target), AttackOutcome::AlreadyAttacked);
            prop_assert_eq!(board.is_hit(target), hit_before);
        }
    }

    /// Ships separated by at least two cells on one axis always coexist.
    #[test]
    fn spaced_ships_coexist(
        col_a in 0u8..4,
        gap in 2u8..4,
        len_a in 1u8..5,
        len_b in 1u8..5,
    ) {
        let col_b = col_a + gap;
        prop_assume!(col_b < BOARD_SIZE);
        let mut board = Board::new();
        board
            .place_ship(
                Coordinate::new(col_a, 0).unwrap(),
                Coordinate::new(col_a, len_a - 1).unwrap(),
            )
            .unwrap();
        prop_assert!(board
            .place_ship(
                Coordinate::new(col_b, 0).unwrap(),
                Coordinate::new(col_b, len_b - 1).unwrap(),
            )
            .is_ok());
    }
}
