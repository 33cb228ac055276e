use tetris_connect::tetris_core::{
    ActivePiece, BOARD_HEIGHT, BOARD_WIDTH, CELL_EMPTY, DropResult, Piece, TetrisCore, Vec2i,
};

fn started_core(seed: u64) -> TetrisCore {
    let mut core = TetrisCore::new(seed);
    core.initialize_game();
    core
}

fn fill_row(core: &mut TetrisCore, y: usize) {
    for x in 0..BOARD_WIDTH {
        core.set_cell(x, y, Piece::I.cell_value());
    }
}

#[test]
fn initializes_board_and_spawns_piece() {
    let core = started_core(0);

    assert_eq!(core.board().len(), BOARD_HEIGHT);
    for row in core.board() {
        assert_eq!(row.len(), BOARD_WIDTH);
        assert!(row.iter().all(|&cell| cell == CELL_EMPTY));
    }

    let piece = core.active_piece().expect("piece spawned");
    assert_eq!(core.current_piece_pos(), piece.spawn_position());
    assert!(core.next_piece().is_some());
    assert!(core.held_piece().is_none());
    assert!(core.can_hold());
    assert_eq!(core.score(), 0);
    assert_eq!(core.level(), 1);
    assert_eq!(core.lines_cleared(), 0);
    assert_eq!(core.drop_interval_ms(), 1_000);
    assert!(!core.is_game_over());
}

#[test]
fn is_valid_move_rejects_walls_floor_and_overlap() {
    let mut core = TetrisCore::new(0);
    let o = ActivePiece::new(Piece::O);

    assert!(core.is_valid_move(&o, Vec2i::new(0, 0)));
    assert!(core.is_valid_move(&o, Vec2i::new(8, 18)));
    assert!(!core.is_valid_move(&o, Vec2i::new(-1, 0)));
    assert!(!core.is_valid_move(&o, Vec2i::new(9, 0)));
    assert!(!core.is_valid_move(&o, Vec2i::new(0, 19)));

    // Rows above the board are open.
    assert!(core.is_valid_move(&o, Vec2i::new(0, -1)));
    assert!(core.is_valid_move(&o, Vec2i::new(0, -5)));

    core.set_cell(1, 1, Piece::T.cell_value());
    assert!(!core.is_valid_move(&o, Vec2i::new(0, 0)));
    assert!(core.is_valid_move(&o, Vec2i::new(2, 0)));
}

#[test]
fn clearing_a_row_shifts_board_down() {
    let mut core = TetrisCore::new(0);
    fill_row(&mut core, 19);
    core.set_cell(0, 18, Piece::Z.cell_value());

    assert_eq!(core.clear_lines(), 1);
    assert_eq!(core.board().len(), BOARD_HEIGHT);
    assert!(core.board()[0].iter().all(|&c| c == CELL_EMPTY));
    assert_eq!(core.board()[19][0], Piece::Z.cell_value());
    assert_eq!(core.board()[19][1], CELL_EMPTY);
    assert_eq!(core.score(), 100);
    assert_eq!(core.lines_cleared(), 1);
}

#[test]
fn adjacent_full_rows_are_all_cleared() {
    let mut core = TetrisCore::new(0);
    fill_row(&mut core, 18);
    fill_row(&mut core, 19);
    core.set_cell(3, 17, Piece::S.cell_value());

    assert_eq!(core.clear_lines(), 2);
    assert_eq!(core.board()[19][3], Piece::S.cell_value());
    let filled: usize = core
        .board()
        .iter()
        .map(|row| row.iter().filter(|&&c| c != CELL_EMPTY).count())
        .sum();
    assert_eq!(filled, 1);
}

#[test]
fn line_score_uses_level_before_the_clear() {
    let mut core = TetrisCore::new(0);
    for y in 10..BOARD_HEIGHT {
        fill_row(&mut core, y);
    }
    assert_eq!(core.clear_lines(), 10);
    assert_eq!(core.score(), 10 * 100);
    assert_eq!(core.level(), 2);
    assert_eq!(core.drop_interval_ms(), 950);

    fill_row(&mut core, 18);
    fill_row(&mut core, 19);
    assert_eq!(core.clear_lines(), 2);
    assert_eq!(core.score(), 1_000 + 2 * 100 * 2);
    assert_eq!(core.lines_cleared(), 12);
    assert_eq!(core.level(), 2);
}

#[test]
fn hard_drop_scores_two_per_row_and_locks() {
    let mut core = started_core(3);
    core.set_current_piece_for_test(Piece::O, Vec2i::new(4, 0), 0);

    assert_eq!(core.hard_drop(), 18);
    assert_eq!(core.score(), 36);
    let o = Piece::O.cell_value();
    assert_eq!(core.board()[18][4], o);
    assert_eq!(core.board()[19][5], o);
    assert!(core.current_piece().is_some());
    assert!(core.can_hold());
}

#[test]
fn soft_drop_moves_one_row_for_one_point() {
    let mut core = started_core(3);
    core.set_current_piece_for_test(Piece::O, Vec2i::new(4, 0), 0);

    assert_eq!(core.soft_drop(), DropResult::Moved);
    assert_eq!(core.current_piece_pos(), Vec2i::new(4, 1));
    assert_eq!(core.score(), 1);
}

#[test]
fn drop_locks_when_blocked_below() {
    let mut core = started_core(3);
    core.set_current_piece_for_test(Piece::O, Vec2i::new(0, 18), 0);

    assert_eq!(core.drop_piece(), DropResult::Locked { lines_cleared: 0 });
    assert_eq!(core.board()[19][0], Piece::O.cell_value());
    assert_eq!(core.score(), 0);
}

#[test]
fn ghost_lands_on_stack() {
    let mut core = started_core(3);
    core.set_current_piece_for_test(Piece::O, Vec2i::new(4, 0), 0);
    core.set_cell(4, 10, Piece::J.cell_value());

    assert_eq!(core.ghost_piece_pos(), Some(Vec2i::new(4, 8)));
    // Reading the ghost does not move the piece.
    assert_eq!(core.current_piece_pos(), Vec2i::new(4, 0));
}

#[test]
fn movement_and_rotation_respect_walls() {
    let mut core = started_core(3);
    core.set_current_piece_for_test(Piece::O, Vec2i::new(0, 0), 0);
    assert!(!core.move_piece(-1));
    assert!(core.move_piece(1));
    assert_eq!(core.current_piece_pos(), Vec2i::new(1, 0));

    // Vertical I against the right wall cannot turn flat: no kicks.
    core.set_current_piece_for_test(Piece::I, Vec2i::new(9, 0), 1);
    assert_eq!(core.active_piece().map(|p| p.shape().rows()), Some(4));
    assert!(!core.rotate_piece());
    assert_eq!(core.active_piece().map(|p| p.shape().rows()), Some(4));

    core.set_current_piece_for_test(Piece::I, Vec2i::new(3, 0), 1);
    assert!(core.rotate_piece());
    assert_eq!(core.active_piece().map(|p| p.shape().cols()), Some(4));
}

#[test]
fn first_hold_pulls_in_next_piece() {
    let mut core = started_core(7);
    core.set_current_piece_for_test(Piece::T, Vec2i::new(4, 3), 0);
    core.set_next_piece_for_test(Piece::I);

    assert!(core.hold_piece());
    assert_eq!(core.held_piece(), Some(Piece::T));
    assert_eq!(core.current_piece(), Some(Piece::I));
    assert_eq!(core.current_piece_pos(), Vec2i::new(3, 0));
    assert!(core.next_piece().is_some());
    assert!(!core.can_hold());

    // One hold per piece.
    assert!(!core.hold_piece());
    assert_eq!(core.current_piece(), Some(Piece::I));
}

#[test]
fn held_piece_keeps_its_rotation() {
    let mut core = started_core(7);
    core.set_current_piece_for_test(Piece::T, Vec2i::new(4, 0), 1);
    assert!(core.hold_piece());

    core.hard_drop();
    assert!(core.can_hold());
    assert!(core.hold_piece());

    assert_eq!(core.current_piece(), Some(Piece::T));
    let shape = core.active_piece().map(|p| p.shape().clone());
    assert_eq!(shape, Some(Piece::T.shape().rotated_cw()));
}

#[test]
fn blocked_spawn_ends_the_game() {
    let mut core = started_core(7);
    for x in 3..7 {
        core.set_cell(x, 0, Piece::L.cell_value());
    }
    core.set_next_piece_for_test(Piece::O);
    core.set_current_piece_for_test(Piece::O, Vec2i::new(0, 10), 0);

    core.hard_drop();
    assert!(core.is_game_over());
    assert!(core.snapshot().game_over);
    assert!(!core.move_piece(1));
    assert!(!core.hold_piece());
    assert_eq!(core.drop_piece(), DropResult::NoActivePiece);
}

#[test]
fn hold_into_blocked_spawn_ends_the_game() {
    let mut core = started_core(7);
    core.set_current_piece_for_test(Piece::T, Vec2i::new(0, 10), 0);
    for x in 3..7 {
        core.set_cell(x, 0, Piece::L.cell_value());
    }
    core.set_next_piece_for_test(Piece::O);

    assert!(!core.hold_piece());
    assert!(core.is_game_over());
    assert_eq!(core.held_piece(), Some(Piece::T));
}
