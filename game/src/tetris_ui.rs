use engine::graphics::{BLACK, Canvas, Color, Rect, WHITE, text_height, text_width};

use crate::input::ScorePrompt;
use crate::leaderboard::ScoreRecord;
use crate::session::GameSession;
use crate::tetris_core::{ActivePiece, BOARD_HEIGHT, BOARD_WIDTH, Piece, Vec2i};
use crate::view::GameView;

pub const BLOCK_SIZE: u32 = 30;
pub const PREVIEW_BLOCK_SIZE: u32 = 25;

const MARGIN: u32 = 20;
const LEFT_COLUMN_W: u32 = 150;
const RIGHT_COLUMN_W: u32 = 250;
const PREVIEW_PANEL_H: u32 = 130;
const LABEL_H: u32 = 24;
const LINE_H: u32 = 22;

const BOARD_X: u32 = MARGIN + LEFT_COLUMN_W + MARGIN;
const BOARD_PIXEL_W: u32 = BOARD_WIDTH as u32 * BLOCK_SIZE;
const BOARD_PIXEL_H: u32 = BOARD_HEIGHT as u32 * BLOCK_SIZE;
const RIGHT_X: u32 = BOARD_X + BOARD_PIXEL_W + MARGIN;

pub const FRAME_WIDTH: u32 = RIGHT_X + RIGHT_COLUMN_W + MARGIN;
pub const FRAME_HEIGHT: u32 = MARGIN + BOARD_PIXEL_H + MARGIN;

pub const COLOR_BACKGROUND: Color = [0x0a, 0x0a, 0x0a, 0xff];
pub const COLOR_GRID: Color = [0x1a, 0x1a, 0x1a, 0xff];
const COLOR_PANEL_BORDER: Color = [0x33, 0x33, 0x3f, 0xff];
const COLOR_TEXT: Color = [0xe8, 0xe8, 0xf0, 0xff];
const COLOR_TEXT_DIM: Color = [0x88, 0x88, 0x98, 0xff];
const COLOR_RANK_TOP: Color = [0xff, 0xd7, 0x00, 0xff];
const COLOR_STATUS: Color = [0xf0, 0xa0, 0x00, 0xff];

// 0.3, 0.2 and 0.5 opacity.
const HIGHLIGHT_ALPHA: u8 = 77;
const GHOST_FILL_ALPHA: u8 = 51;
const GHOST_OUTLINE_ALPHA: u8 = 128;
const OVERLAY_ALPHA: u8 = 200;
const HOLD_LOCKED_ALPHA: u8 = 150;

const RANKING_NAME_CHARS: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiLayout {
    pub board: Rect,
    pub hold_panel: Rect,
    pub stats: Rect,
    pub next_panel: Rect,
    pub ranking: Rect,
}

/// Everything drawn besides the session itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudInfo<'a> {
    pub ranking: &'a [ScoreRecord],
    /// One-line message such as a network failure.
    pub status: Option<&'a str>,
    pub prompt: Option<&'a ScorePrompt>,
}

pub fn compute_layout() -> UiLayout {
    let board = Rect::new(BOARD_X, MARGIN, BOARD_PIXEL_W, BOARD_PIXEL_H);
    let hold_panel = Rect::new(MARGIN, MARGIN, LEFT_COLUMN_W, PREVIEW_PANEL_H);
    let stats = Rect::new(
        MARGIN,
        hold_panel.bottom() + MARGIN,
        LEFT_COLUMN_W,
        LABEL_H + LINE_H * 6,
    );
    let next_panel = Rect::new(RIGHT_X, MARGIN, RIGHT_COLUMN_W, PREVIEW_PANEL_H);
    let ranking_y = next_panel.bottom() + MARGIN;
    let ranking = Rect::new(
        RIGHT_X,
        ranking_y,
        RIGHT_COLUMN_W,
        board.bottom().saturating_sub(ranking_y),
    );

    UiLayout {
        board,
        hold_panel,
        stats,
        next_panel,
        ranking,
    }
}

/// Screen rect of board cell `(x, y)`; `None` above or outside the board.
pub fn cell_rect(board: Rect, cell: Vec2i) -> Option<Rect> {
    if cell.x < 0 || cell.y < 0 || cell.x >= BOARD_WIDTH as i32 || cell.y >= BOARD_HEIGHT as i32 {
        return None;
    }
    Some(Rect::new(
        board.x + cell.x as u32 * BLOCK_SIZE,
        board.y + cell.y as u32 * BLOCK_SIZE,
        BLOCK_SIZE,
        BLOCK_SIZE,
    ))
}

pub fn draw_session(canvas: &mut Canvas<'_>, session: &GameSession, hud: HudInfo<'_>) -> UiLayout {
    let layout = compute_layout();
    canvas.clear(COLOR_BACKGROUND);

    draw_board(canvas, layout.board, session);
    draw_hold_panel(canvas, layout.hold_panel, session);
    draw_stats(canvas, layout.stats, session);
    draw_next_panel(canvas, layout.next_panel, session);
    draw_ranking(canvas, layout.ranking, hud.ranking, hud.status);
    draw_overlay(canvas, layout.board, session, hud.prompt);

    layout
}

fn draw_board(canvas: &mut Canvas<'_>, board: Rect, session: &GameSession) {
    for col in 0..=BOARD_WIDTH as u32 {
        canvas.vline(board.x + col * BLOCK_SIZE, board.y, board.h, COLOR_GRID);
    }
    for row in 0..=BOARD_HEIGHT as u32 {
        canvas.hline(board.x, board.y + row * BLOCK_SIZE, board.w, COLOR_GRID);
    }

    let tetris = session.tetris();
    for (y, row) in tetris.board().iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let Some(piece) = Piece::from_cell(value) else {
                continue;
            };
            if let Some(rect) = cell_rect(board, Vec2i::new(x as i32, y as i32)) {
                draw_block(canvas, rect, piece.color());
            }
        }
    }

    if session.view != (GameView::Playing { paused: false }) {
        return;
    }
    let Some(piece) = tetris.active_piece() else {
        return;
    };
    let pos = tetris.current_piece_pos();
    let color = piece.kind().color();

    if let Some(ghost) = tetris.ghost_piece_pos().filter(|ghost| ghost.y > pos.y) {
        for cell in piece.cells_at(ghost) {
            if let Some(rect) = cell_rect(board, cell) {
                draw_ghost_block(canvas, rect, color);
            }
        }
    }
    for cell in piece.cells_at(pos) {
        if let Some(rect) = cell_rect(board, cell) {
            draw_block(canvas, rect, color);
        }
    }
}

/// Filled cell with a black border and a light top-left corner.
pub fn draw_block(canvas: &mut Canvas<'_>, rect: Rect, color: Color) {
    canvas.fill_rect(rect, color);
    canvas.stroke_rect(rect, BLACK, 2);
    canvas.blend_rect(
        Rect::new(rect.x, rect.y, rect.w / 3, rect.h / 3),
        WHITE,
        HIGHLIGHT_ALPHA,
    );
}

fn draw_ghost_block(canvas: &mut Canvas<'_>, rect: Rect, color: Color) {
    canvas.blend_rect(rect, color, GHOST_FILL_ALPHA);
    canvas.blend_stroke_rect(rect, color, 2, GHOST_OUTLINE_ALPHA);
}

fn draw_panel(canvas: &mut Canvas<'_>, rect: Rect, title: &str) -> Rect {
    canvas.stroke_rect(rect, COLOR_PANEL_BORDER, 1);
    canvas.draw_text(rect.x + 8, rect.y + 8, title, COLOR_TEXT_DIM);
    Rect::new(
        rect.x + 1,
        rect.y + LABEL_H,
        rect.w.saturating_sub(2),
        rect.h.saturating_sub(LABEL_H + 1),
    )
}

/// Draws `piece` centered in `area` with preview-sized cells.
fn draw_preview(canvas: &mut Canvas<'_>, area: Rect, piece: &ActivePiece, alpha: u8) {
    let shape = piece.shape();
    let w = shape.cols() as u32 * PREVIEW_BLOCK_SIZE;
    let h = shape.rows() as u32 * PREVIEW_BLOCK_SIZE;
    let x0 = area.x + area.w.saturating_sub(w) / 2;
    let y0 = area.y + area.h.saturating_sub(h) / 2;
    let color = piece.kind().color();

    for (row, col) in shape.filled_cells() {
        let rect = Rect::new(
            x0 + col as u32 * PREVIEW_BLOCK_SIZE,
            y0 + row as u32 * PREVIEW_BLOCK_SIZE,
            PREVIEW_BLOCK_SIZE,
            PREVIEW_BLOCK_SIZE,
        );
        canvas.blend_rect(rect, color, alpha);
        canvas.stroke_rect(rect, BLACK, 2);
    }
}

fn draw_hold_panel(canvas: &mut Canvas<'_>, rect: Rect, session: &GameSession) {
    let area = draw_panel(canvas, rect, "HOLD");
    let tetris = session.tetris();
    if let Some(held) = tetris.held_active_piece() {
        let alpha = if tetris.can_hold() { 255 } else { HOLD_LOCKED_ALPHA };
        draw_preview(canvas, area, held, alpha);
    }
}

fn draw_next_panel(canvas: &mut Canvas<'_>, rect: Rect, session: &GameSession) {
    let area = draw_panel(canvas, rect, "NEXT");
    if let Some(next) = session.tetris().next_piece() {
        draw_preview(canvas, area, &ActivePiece::new(next), 255);
    }
}

fn draw_stats(canvas: &mut Canvas<'_>, rect: Rect, session: &GameSession) {
    let area = draw_panel(canvas, rect, "STATS");
    let tetris = session.tetris();
    let rows = [
        ("SCORE", tetris.score()),
        ("LEVEL", tetris.level()),
        ("LINES", tetris.lines_cleared()),
    ];
    let mut y = area.y + 4;
    for (label, value) in rows {
        canvas.draw_text(area.x + 8, y, label, COLOR_TEXT_DIM);
        canvas.draw_text(area.x + 8, y + LINE_H - 4, &value.to_string(), COLOR_TEXT);
        y += LINE_H * 2;
    }
}

fn draw_ranking(canvas: &mut Canvas<'_>, rect: Rect, ranking: &[ScoreRecord], status: Option<&str>) {
    let area = draw_panel(canvas, rect, "RANKING");
    let mut y = area.y + 4;

    if ranking.is_empty() {
        canvas.draw_text(area.x + 8, y, "NO SCORES YET", COLOR_TEXT_DIM);
        y += LINE_H;
    }
    for (idx, record) in ranking.iter().enumerate() {
        let color = if idx == 0 { COLOR_RANK_TOP } else { COLOR_TEXT };
        let name: String = record.nickname.chars().take(RANKING_NAME_CHARS).collect();
        canvas.draw_text(area.x + 8, y, &format!("{}. {name}", idx + 1), color);

        let score = record.score.to_string();
        let score_x = area.right().saturating_sub(8 + text_width(&score, 2));
        canvas.draw_text(score_x, y, &score, color);
        y += LINE_H;
    }

    if let Some(status) = status {
        canvas.draw_text(area.x + 8, area.bottom().saturating_sub(LINE_H), status, COLOR_STATUS);
    }
}

fn draw_overlay(
    canvas: &mut Canvas<'_>,
    board: Rect,
    session: &GameSession,
    prompt: Option<&ScorePrompt>,
) {
    let lines: Vec<(String, Color)> = match session.view {
        GameView::Ready => vec![("PRESS ENTER".to_string(), COLOR_TEXT)],
        GameView::Playing { paused: true } => vec![
            ("PAUSED".to_string(), COLOR_TEXT),
            ("SPACE TO RESUME".to_string(), COLOR_TEXT_DIM),
        ],
        GameView::Playing { paused: false } => return,
        GameView::GameOver => {
            let mut lines = vec![
                ("GAME OVER".to_string(), COLOR_STATUS),
                (format!("SCORE {}", session.tetris().score()), COLOR_TEXT),
            ];
            match prompt {
                Some(prompt) => {
                    lines.push((format!("NAME: {}_", prompt.nickname()), COLOR_TEXT));
                    lines.push(("ENTER SAVE  ESC SKIP".to_string(), COLOR_TEXT_DIM));
                }
                None => lines.push(("ENTER TO RESTART".to_string(), COLOR_TEXT_DIM)),
            }
            lines
        }
    };

    canvas.blend_rect(board, BLACK, OVERLAY_ALPHA);
    let block_h = lines.len() as u32 * LINE_H;
    let mut y = board.y + board.h.saturating_sub(block_h) / 2;
    for (text, color) in &lines {
        let x = board.x + board.w.saturating_sub(text_width(text, 2)) / 2;
        canvas.draw_text(x, y + (LINE_H - text_height(2)) / 2, text, *color);
        y += LINE_H;
    }
}
