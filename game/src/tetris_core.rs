use std::ops::Add;

use serde::{Deserialize, Serialize};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
pub const CELL_EMPTY: u8 = 0;

pub const BASE_DROP_INTERVAL_MS: u32 = 1_000;
pub const MIN_DROP_INTERVAL_MS: u32 = 100;
const DROP_INTERVAL_STEP_MS: u32 = 50;
const LINES_PER_LEVEL: u32 = 10;
const POINTS_PER_LINE: u32 = 100;

pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;
pub const SOFT_DROP_POINTS: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Piece {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::O,
        Piece::T,
        Piece::S,
        Piece::Z,
        Piece::J,
        Piece::L,
    ];

    /// Board cell value written when this piece locks.
    pub const fn cell_value(self) -> u8 {
        match self {
            Piece::I => 1,
            Piece::O => 2,
            Piece::T => 3,
            Piece::S => 4,
            Piece::Z => 5,
            Piece::J => 6,
            Piece::L => 7,
        }
    }

    pub fn from_cell(value: u8) -> Option<Piece> {
        Self::ALL.into_iter().find(|p| p.cell_value() == value)
    }

    pub const fn color(self) -> [u8; 4] {
        match self {
            Piece::I => [0x00, 0xf0, 0xf0, 0xff],
            Piece::O => [0xf0, 0xf0, 0x00, 0xff],
            Piece::T => [0xa0, 0x00, 0xf0, 0xff],
            Piece::S => [0x00, 0xf0, 0x00, 0xff],
            Piece::Z => [0xf0, 0x00, 0x00, 0xff],
            Piece::J => [0x00, 0x00, 0xf0, 0xff],
            Piece::L => [0xf0, 0xa0, 0x00, 0xff],
        }
    }

    /// Spawn orientation.
    pub fn shape(self) -> Shape {
        match self {
            Piece::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            Piece::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            Piece::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            Piece::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            Piece::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            Piece::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            Piece::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2i {
    type Output = Vec2i;

    fn add(self, rhs: Vec2i) -> Self::Output {
        Vec2i::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Rectangular filled/empty matrix, `cells[row][col]` with row 0 on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// `(row, col)` of every filled cell.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(col, _)| (row, col))
        })
    }

    /// Clockwise quarter turn: `rotated[col][rows-1-row] = cells[row][col]`.
    pub fn rotated_cw(&self) -> Shape {
        let rows = self.rows();
        let cols = self.cols();
        let mut cells = vec![vec![false; rows]; cols];
        for (row, src) in self.cells.iter().enumerate() {
            for (col, &filled) in src.iter().enumerate() {
                cells[col][rows - 1 - row] = filled;
            }
        }
        Shape { cells }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    kind: Piece,
    shape: Shape,
}

impl ActivePiece {
    pub fn new(kind: Piece) -> Self {
        Self {
            kind,
            shape: kind.shape(),
        }
    }

    pub fn kind(&self) -> Piece {
        self.kind
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rotated(&self) -> ActivePiece {
        ActivePiece {
            kind: self.kind,
            shape: self.shape.rotated_cw(),
        }
    }

    /// Board coordinates covered when the shape's top-left sits at `pos`.
    pub fn cells_at(&self, pos: Vec2i) -> impl Iterator<Item = Vec2i> + '_ {
        self.shape
            .filled_cells()
            .map(move |(row, col)| Vec2i::new(pos.x + col as i32, pos.y + row as i32))
    }

    pub fn spawn_position(&self) -> Vec2i {
        let x = (BOARD_WIDTH / 2) as i32 - (self.shape.cols() / 2) as i32;
        Vec2i::new(x, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    Moved,
    Locked { lines_cleared: u32 },
    NoActivePiece,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TetrisSnapshot {
    pub board: Vec<Vec<u8>>,
    pub current_piece: Option<Piece>,
    pub current_piece_pos: Vec2i,
    pub next_piece: Option<Piece>,
    pub held_piece: Option<Piece>,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub drop_interval_ms: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetrisCore {
    board: Vec<Vec<u8>>,
    current_piece: Option<ActivePiece>,
    current_piece_pos: Vec2i,
    next_piece: Option<Piece>,
    held_piece: Option<ActivePiece>,
    can_hold: bool,
    rng: Rng,
    score: u32,
    level: u32,
    lines_cleared: u32,
    drop_interval_ms: u32,
    game_over: bool,
}

pub fn drop_interval_for_level(level: u32) -> u32 {
    BASE_DROP_INTERVAL_MS
        .saturating_sub(level.saturating_sub(1).saturating_mul(DROP_INTERVAL_STEP_MS))
        .max(MIN_DROP_INTERVAL_MS)
}

pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

fn empty_row() -> Vec<u8> {
    vec![CELL_EMPTY; BOARD_WIDTH]
}

impl TetrisCore {
    pub fn new(seed: u64) -> Self {
        Self {
            board: vec![empty_row(); BOARD_HEIGHT],
            current_piece: None,
            current_piece_pos: Vec2i::ZERO,
            next_piece: None,
            held_piece: None,
            can_hold: true,
            rng: Rng::new(seed),
            score: 0,
            level: 1,
            lines_cleared: 0,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
            game_over: false,
        }
    }

    /// Clears the board and counters and spawns the first piece. The RNG keeps
    /// its state so consecutive games draw different sequences.
    pub fn initialize_game(&mut self) {
        self.board = vec![empty_row(); BOARD_HEIGHT];
        self.current_piece = None;
        self.current_piece_pos = Vec2i::ZERO;
        self.next_piece = None;
        self.held_piece = None;
        self.can_hold = true;
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.drop_interval_ms = BASE_DROP_INTERVAL_MS;
        self.game_over = false;
        self.spawn_new_piece();
    }

    pub fn board(&self) -> &[Vec<u8>] {
        &self.board
    }

    pub fn current_piece(&self) -> Option<Piece> {
        self.current_piece.as_ref().map(ActivePiece::kind)
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.current_piece.as_ref()
    }

    pub fn current_piece_pos(&self) -> Vec2i {
        self.current_piece_pos
    }

    pub fn next_piece(&self) -> Option<Piece> {
        self.next_piece
    }

    pub fn held_piece(&self) -> Option<Piece> {
        self.held_piece.as_ref().map(ActivePiece::kind)
    }

    pub fn held_active_piece(&self) -> Option<&ActivePiece> {
        self.held_piece.as_ref()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn add_score(&mut self, bonus: u32) {
        self.score = self.score.saturating_add(bonus);
    }

    pub fn snapshot(&self) -> TetrisSnapshot {
        TetrisSnapshot {
            board: self.board.clone(),
            current_piece: self.current_piece(),
            current_piece_pos: self.current_piece_pos,
            next_piece: self.next_piece,
            held_piece: self.held_piece(),
            can_hold: self.can_hold,
            score: self.score,
            level: self.level,
            lines_cleared: self.lines_cleared,
            drop_interval_ms: self.drop_interval_ms,
            game_over: self.game_over,
        }
    }

    pub fn set_current_piece_for_test(&mut self, piece: Piece, pos: Vec2i, rotation: u8) {
        let mut active = ActivePiece::new(piece);
        for _ in 0..rotation % 4 {
            active = active.rotated();
        }
        self.current_piece = Some(active);
        self.current_piece_pos = pos;
    }

    pub fn set_next_piece_for_test(&mut self, piece: Piece) {
        self.next_piece = Some(piece);
    }

    pub fn set_cell(&mut self, x: usize, y: usize, value: u8) {
        if y < BOARD_HEIGHT && x < BOARD_WIDTH {
            self.board[y][x] = value;
        }
    }

    pub fn draw_piece(&mut self) -> Piece {
        let idx = self.rng.next_u32() as usize % Piece::ALL.len();
        Piece::ALL[idx]
    }

    /// True when every filled cell of `piece` at `pos` is inside the side walls,
    /// above the floor and not on a filled cell. Rows above the board are allowed.
    pub fn is_valid_move(&self, piece: &ActivePiece, pos: Vec2i) -> bool {
        piece.cells_at(pos).all(|cell| {
            if cell.x < 0 || cell.x >= BOARD_WIDTH as i32 || cell.y >= BOARD_HEIGHT as i32 {
                return false;
            }
            cell.y < 0 || self.board[cell.y as usize][cell.x as usize] == CELL_EMPTY
        })
    }

    /// Writes the piece's color into the board. Cells above the board are dropped.
    pub fn place_piece(&mut self, piece: &ActivePiece, pos: Vec2i) {
        let value = piece.kind().cell_value();
        for cell in piece.cells_at(pos) {
            if cell.y < 0 || cell.x < 0 {
                continue;
            }
            let (x, y) = (cell.x as usize, cell.y as usize);
            if y < BOARD_HEIGHT && x < BOARD_WIDTH {
                self.board[y][x] = value;
            }
        }
    }

    /// Removes full rows bottom-up, re-checking the same index after each shift,
    /// then applies line score, level and drop speed. Returns the rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0u32;
        let mut row = BOARD_HEIGHT;
        while row > 0 {
            let idx = row - 1;
            if self.board[idx].iter().all(|&cell| cell != CELL_EMPTY) {
                self.board.remove(idx);
                self.board.insert(0, empty_row());
                cleared += 1;
            } else {
                row -= 1;
            }
        }

        if cleared > 0 {
            self.lines_cleared = self.lines_cleared.saturating_add(cleared);
            self.add_score(cleared.saturating_mul(POINTS_PER_LINE).saturating_mul(self.level));
            self.level = level_for_lines(self.lines_cleared);
            self.drop_interval_ms = drop_interval_for_level(self.level);
        }
        cleared
    }

    /// Promotes the queued piece (or a fresh draw) into play at the spawn point.
    /// Returns false and flags game over when the spawn point is blocked.
    pub fn spawn_new_piece(&mut self) -> bool {
        let kind = match self.next_piece.take() {
            Some(kind) => kind,
            None => self.draw_piece(),
        };
        self.next_piece = Some(self.draw_piece());

        let piece = ActivePiece::new(kind);
        self.current_piece_pos = piece.spawn_position();
        self.current_piece = Some(piece);
        self.can_hold = true;

        if !self.current_fits(self.current_piece_pos) {
            self.game_over = true;
            return false;
        }
        true
    }

    pub fn hold_piece(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }
        let Some(current) = self.current_piece.take() else {
            return false;
        };

        let incoming = match self.held_piece.replace(current) {
            Some(held) => held,
            None => {
                // Empty hold: the queued piece comes into play.
                let kind = match self.next_piece.take() {
                    Some(kind) => kind,
                    None => self.draw_piece(),
                };
                self.next_piece = Some(self.draw_piece());
                ActivePiece::new(kind)
            }
        };

        self.current_piece_pos = incoming.spawn_position();
        self.current_piece = Some(incoming);

        if !self.current_fits(self.current_piece_pos) {
            self.game_over = true;
            return false;
        }
        self.can_hold = false;
        true
    }

    pub fn move_piece(&mut self, dx: i32) -> bool {
        if self.game_over {
            return false;
        }
        let new_pos = self.current_piece_pos + Vec2i::new(dx, 0);
        if self.current_fits(new_pos) {
            self.current_piece_pos = new_pos;
            return true;
        }
        false
    }

    /// Quarter turn clockwise in place; no kicks, so a blocked rotation is dropped.
    pub fn rotate_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(rotated) = self.current_piece.as_ref().map(ActivePiece::rotated) else {
            return false;
        };
        if self.is_valid_move(&rotated, self.current_piece_pos) {
            self.current_piece = Some(rotated);
            return true;
        }
        false
    }

    /// One row of gravity: moves down, or locks and spawns when blocked below.
    pub fn drop_piece(&mut self) -> DropResult {
        if self.game_over || self.current_piece.is_none() {
            return DropResult::NoActivePiece;
        }
        let below = self.current_piece_pos + Vec2i::new(0, 1);
        if self.current_fits(below) {
            self.current_piece_pos = below;
            return DropResult::Moved;
        }
        let lines_cleared = self.lock_active_piece();
        DropResult::Locked { lines_cleared }
    }

    pub fn soft_drop(&mut self) -> DropResult {
        let result = self.drop_piece();
        if result != DropResult::NoActivePiece {
            self.add_score(SOFT_DROP_POINTS);
        }
        result
    }

    /// Drops to the lowest valid row, scoring per row fallen, then locks.
    /// Returns the distance dropped.
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over || self.current_piece.is_none() {
            return 0;
        }
        let mut distance = 0u32;
        while self.current_fits(self.current_piece_pos + Vec2i::new(0, 1)) {
            self.current_piece_pos = self.current_piece_pos + Vec2i::new(0, 1);
            distance += 1;
        }
        self.add_score(distance.saturating_mul(HARD_DROP_POINTS_PER_ROW));
        self.lock_active_piece();
        distance
    }

    /// Landing position of a hard drop, without mutating state.
    pub fn ghost_piece_pos(&self) -> Option<Vec2i> {
        self.current_piece.as_ref()?;
        if !self.current_fits(self.current_piece_pos) {
            return None;
        }
        let mut pos = self.current_piece_pos;
        while self.current_fits(pos + Vec2i::new(0, 1)) {
            pos = pos + Vec2i::new(0, 1);
        }
        Some(pos)
    }

    fn current_fits(&self, pos: Vec2i) -> bool {
        self.current_piece
            .as_ref()
            .is_some_and(|piece| self.is_valid_move(piece, pos))
    }

    fn lock_active_piece(&mut self) -> u32 {
        let Some(piece) = self.current_piece.take() else {
            return 0;
        };
        self.place_piece(&piece, self.current_piece_pos);
        let cleared = self.clear_lines();
        self.spawn_new_piece();
        cleared
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            seed
        };
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }
}
