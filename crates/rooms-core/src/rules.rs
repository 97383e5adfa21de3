//! Rules-engine adapter.
//!
//! Wraps the `chess` crate behind the narrow contract rooms need:
//! - apply a candidate move (or say why not),
//! - list legal moves from one square,
//! - report check and terminal status,
//! - render the position as FEN.
//!
//! Nothing outside this module touches `chess` types, so swapping the
//! rules engine stays a one-file change.

use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Game, GameResult, MoveGen, Piece, Rank, Square};

use crate::color::Color;
use crate::messages::{LegalMove, MoveRequest};
use crate::snapshot::{MoveRecord, Promotion};

/// Why the rules engine refused a candidate move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReject {
    /// A square or promotion piece did not parse.
    Malformed(String),
    /// The move is not legal in the current position.
    Illegal,
}

/// Terminal classification of a position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionStatus {
    Ongoing,
    /// The side to move is checkmated.
    Checkmate,
    Stalemate,
    /// Drawn by rule (threefold repetition or the fifty-move rule).
    Draw,
}

impl From<chess::Color> for Color {
    fn from(color: chess::Color) -> Self {
        match color {
            chess::Color::White => Color::White,
            chess::Color::Black => Color::Black,
        }
    }
}

/// Authoritative position of one game.
pub struct Position {
    game: Game,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        Position { game: Game::new() }
    }

    #[cfg(test)]
    pub(crate) fn from_fen(fen: &str) -> Self {
        let board = Board::from_str(fen).expect("valid test FEN");
        Position {
            game: Game::new_with_board(board),
        }
    }

    /// Color to move.
    pub fn turn(&self) -> Color {
        Color::from(self.game.side_to_move())
    }

    /// Current position in Forsyth-Edwards Notation.
    pub fn fen(&self) -> String {
        self.game.current_position().to_string()
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.game.current_position().checkers().popcnt() > 0
    }

    pub fn status(&self) -> PositionStatus {
        match self.game.current_position().status() {
            BoardStatus::Checkmate => PositionStatus::Checkmate,
            BoardStatus::Stalemate => PositionStatus::Stalemate,
            BoardStatus::Ongoing => match self.game.result() {
                Some(GameResult::DrawDeclared | GameResult::DrawAccepted) => PositionStatus::Draw,
                _ => PositionStatus::Ongoing,
            },
        }
    }

    /// Validate and apply one move for the side to move.
    ///
    /// A promotion piece is honored only when the move actually promotes;
    /// clients routinely send a default `"q"` on every move and the
    /// extra field must not make an ordinary move illegal. Draws by rule
    /// are declared as soon as they become available.
    pub fn apply(&mut self, req: &MoveRequest) -> Result<MoveRecord, MoveReject> {
        let from = parse_square(&req.from)?;
        let to = parse_square(&req.to)?;
        let board = self.game.current_position();
        let promotion = effective_promotion(&board, from, to, req.promotion);
        let captured = is_capture(&board, from, to);
        let color = self.turn();

        let mv = ChessMove::new(from, to, promotion.map(promotion_piece));
        if !self.game.make_move(mv) {
            return Err(MoveReject::Illegal);
        }
        if self.game.can_declare_draw() {
            self.game.declare_draw();
        }

        Ok(MoveRecord {
            color,
            from: from.to_string(),
            to: to.to_string(),
            promotion,
            captured,
            san: notation(from, to, captured, promotion),
        })
    }

    /// All legal moves starting from `square`. Promotion moves show up
    /// once per promotion piece.
    pub fn legal_moves_from(&self, square: &str) -> Result<Vec<LegalMove>, MoveReject> {
        let from = parse_square(square)?;
        let board = self.game.current_position();
        let mut moves = Vec::new();
        for mv in MoveGen::new_legal(&board) {
            if mv.get_source() != from {
                continue;
            }
            let to = mv.get_dest();
            moves.push(LegalMove {
                to: to.to_string(),
                captured: is_capture(&board, from, to),
                promotion: mv.get_promotion().and_then(promotion_from_piece),
            });
        }
        Ok(moves)
    }

    /// Back to the starting position, history and all.
    pub fn reset(&mut self) {
        self.game = Game::new();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn parse_square(raw: &str) -> Result<Square, MoveReject> {
    Square::from_str(raw.trim().to_ascii_lowercase().as_str())
        .map_err(|_| MoveReject::Malformed(format!("invalid square: {raw:?}")))
}

/// A promotion piece counts only when a pawn is moving to the back rank.
fn effective_promotion(
    board: &Board,
    from: Square,
    to: Square,
    requested: Option<Promotion>,
) -> Option<Promotion> {
    let requested = requested?;
    if board.piece_on(from) != Some(Piece::Pawn) {
        return None;
    }
    match to.get_rank() {
        Rank::First | Rank::Eighth => Some(requested),
        _ => None,
    }
}

/// Destination occupied, or a pawn changing file onto an empty square
/// (en passant).
fn is_capture(board: &Board, from: Square, to: Square) -> bool {
    if board.piece_on(to).is_some() {
        return true;
    }
    board.piece_on(from) == Some(Piece::Pawn) && from.get_file() != to.get_file()
}

fn promotion_piece(promotion: Promotion) -> Piece {
    match promotion {
        Promotion::Queen => Piece::Queen,
        Promotion::Rook => Piece::Rook,
        Promotion::Bishop => Piece::Bishop,
        Promotion::Knight => Piece::Knight,
    }
}

fn promotion_from_piece(piece: Piece) -> Option<Promotion> {
    match piece {
        Piece::Queen => Some(Promotion::Queen),
        Piece::Rook => Some(Promotion::Rook),
        Piece::Bishop => Some(Promotion::Bishop),
        Piece::Knight => Some(Promotion::Knight),
        _ => None,
    }
}

fn notation(from: Square, to: Square, captured: bool, promotion: Option<Promotion>) -> String {
    let mut s = String::with_capacity(8);
    s.push_str(&from.to_string());
    if captured {
        s.push('x');
    }
    s.push_str(&to.to_string());
    if let Some(p) = promotion {
        s.push('=');
        s.push(match p {
            Promotion::Queen => 'Q',
            Promotion::Rook => 'R',
            Promotion::Bishop => 'B',
            Promotion::Knight => 'N',
        });
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: &str, to: &str) -> MoveRequest {
        MoveRequest {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    fn mv_promo(from: &str, to: &str, promotion: Promotion) -> MoveRequest {
        MoveRequest {
            from: from.into(),
            to: to.into(),
            promotion: Some(promotion),
        }
    }

    fn play(position: &mut Position, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            position.apply(&mv(from, to)).unwrap();
        }
    }

    #[test]
    fn applies_a_simple_pawn_push() {
        let mut position = Position::new();
        let record = position.apply(&mv("e2", "e4")).unwrap();
        assert_eq!(record.color, Color::White);
        assert_eq!(record.from, "e2");
        assert_eq!(record.to, "e4");
        assert!(!record.captured);
        assert_eq!(record.san, "e2e4");
        assert_eq!(position.turn(), Color::Black);
        assert!(position
            .fen()
            .starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
    }

    #[test]
    fn rejects_an_illegal_move_without_touching_the_position() {
        let mut position = Position::new();
        let before = position.fen();
        assert_eq!(position.apply(&mv("e2", "e5")), Err(MoveReject::Illegal));
        assert_eq!(position.apply(&mv("e7", "e5")), Err(MoveReject::Illegal));
        assert_eq!(position.fen(), before);
        assert_eq!(position.turn(), Color::White);
    }

    #[test]
    fn rejects_unparseable_squares() {
        let mut position = Position::new();
        assert!(matches!(
            position.apply(&mv("e9", "e4")),
            Err(MoveReject::Malformed(_))
        ));
        assert!(matches!(
            position.apply(&mv("e2", "zz")),
            Err(MoveReject::Malformed(_))
        ));
    }

    #[test]
    fn flags_ordinary_captures() {
        let mut position = Position::new();
        play(&mut position, &[("e2", "e4"), ("d7", "d5")]);
        let record = position.apply(&mv("e4", "d5")).unwrap();
        assert!(record.captured);
        assert_eq!(record.san, "e4xd5");
    }

    #[test]
    fn flags_en_passant_as_a_capture() {
        let mut position = Position::new();
        play(
            &mut position,
            &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
        );
        let record = position.apply(&mv("e5", "d6")).unwrap();
        assert!(record.captured);
        assert_eq!(record.san, "e5xd6");
    }

    #[test]
    fn promotes_when_asked() {
        let mut position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let record = position.apply(&mv_promo("a7", "a8", Promotion::Queen)).unwrap();
        assert_eq!(record.promotion, Some(Promotion::Queen));
        assert_eq!(record.san, "a7a8=Q");
        assert!(position.fen().starts_with("Q7/"));
    }

    #[test]
    fn ignores_a_promotion_piece_on_a_non_promoting_move() {
        let mut position = Position::new();
        let record = position.apply(&mv_promo("e2", "e4", Promotion::Queen)).unwrap();
        assert_eq!(record.promotion, None);
        assert_eq!(record.san, "e2e4");
    }

    #[test]
    fn requires_a_promotion_piece_to_promote() {
        let mut position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        assert_eq!(position.apply(&mv("a7", "a8")), Err(MoveReject::Illegal));
    }

    #[test]
    fn lists_legal_moves_from_a_square() {
        let position = Position::new();
        let moves = position.legal_moves_from("e2").unwrap();
        let targets: Vec<&str> = moves.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(moves.len(), 2);
        assert!(targets.contains(&"e3"));
        assert!(targets.contains(&"e4"));
        assert!(moves.iter().all(|m| !m.captured && m.promotion.is_none()));
    }

    #[test]
    fn lists_each_promotion_piece_separately() {
        let position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let moves = position.legal_moves_from("a7").unwrap();
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.to == "a8" && m.promotion.is_some()));
    }

    #[test]
    fn empty_square_has_no_moves() {
        let position = Position::new();
        assert!(position.legal_moves_from("e4").unwrap().is_empty());
    }

    #[test]
    fn detects_checkmate() {
        let mut position = Position::new();
        play(
            &mut position,
            &[("f2", "f3"), ("e7", "e5"), ("g2", "g4")],
        );
        position.apply(&mv("d8", "h4")).unwrap();
        assert_eq!(position.status(), PositionStatus::Checkmate);
        assert!(position.is_check());
        assert_eq!(position.turn(), Color::White);
    }

    #[test]
    fn detects_stalemate() {
        let mut position = Position::from_fen("k7/8/1K6/2Q5/8/8/8/8 w - - 0 1");
        position.apply(&mv("c5", "c7")).unwrap();
        assert_eq!(position.status(), PositionStatus::Stalemate);
        assert!(!position.is_check());
    }

    #[test]
    fn declares_threefold_repetition_draws() {
        let mut position = Position::new();
        play(
            &mut position,
            &[
                ("g1", "f3"),
                ("g8", "f6"),
                ("f3", "g1"),
                ("f6", "g8"),
                ("g1", "f3"),
                ("g8", "f6"),
                ("f3", "g1"),
            ],
        );
        assert_eq!(position.status(), PositionStatus::Ongoing);
        position.apply(&mv("f6", "g8")).unwrap();
        assert_eq!(position.status(), PositionStatus::Draw);
    }

    #[test]
    fn reset_restores_the_starting_position() {
        let mut position = Position::new();
        play(&mut position, &[("e2", "e4"), ("e7", "e5")]);
        position.reset();
        assert_eq!(position.turn(), Color::White);
        assert_eq!(
            position.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }
}
