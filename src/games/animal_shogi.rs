//! Animal shogi (dobutsu shogi) on a 4×3 board.
//!
//! Ranks `1..4` run from White's camp to Black's, files are `A..C`. A square
//! `(x, y)` with rank `x` and file `y` has position `y * 4 + x`; positions
//! `12..16` stand for the hand of the mover, one per droppable kind, and
//! print as `*1..*4`. An action is `to * 16 + from` and prints as
//! `<from><to>`, e.g. `B3B2`.
//!
//! Giraffes slide orthogonally and elephants diagonally, stopping before
//! an own piece or on a capture.
//!
//! A game ends when a lion is captured, when a lion that reached the far
//! rank survives the opponent's reply, or on the first repeated position
//! (a draw).

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::board::{label_at, label_index, step};
use crate::core::{ActionId, Color, ColorMap, GameError, GameRng, Result};
use crate::nn::EncodedState;
use crate::rules::BoardGame;

const LX: usize = 4;
const LY: usize = 3;
const B: usize = LX * LY;
const HAND_SLOTS: usize = 4;
const X: &str = "1234";
const Y: &str = "ABC*";
const PIECE_CHARS: &str = "LGECFlgecf";
const INITIAL: &str = "gle c  C ELG";
const CHANNELS: usize = 27;

/// Kind of a piece, promoted chick included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Lion,
    Giraffe,
    Elephant,
    Chick,
    Fowl,
}

impl PieceKind {
    const ALL: [PieceKind; 5] = [
        PieceKind::Lion,
        PieceKind::Giraffe,
        PieceKind::Elephant,
        PieceKind::Chick,
        PieceKind::Fowl,
    ];

    /// Kinds that can sit in hand, in hand-slot order.
    pub const IN_HAND: [PieceKind; HAND_SLOTS] = [
        PieceKind::Lion,
        PieceKind::Giraffe,
        PieceKind::Elephant,
        PieceKind::Chick,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Kind a captured piece becomes in hand.
    #[must_use]
    pub fn unpromoted(self) -> Self {
        match self {
            PieceKind::Fowl => PieceKind::Chick,
            kind => kind,
        }
    }

    /// One-square move directions for a piece of `color`.
    fn steps(self, color: Color) -> &'static [usize] {
        match (self, color) {
            (PieceKind::Lion, _) => &[0, 1, 2, 3, 4, 5, 6, 7],
            (PieceKind::Giraffe | PieceKind::Elephant, _) => &[],
            (PieceKind::Chick, Color::Black) => &[0],
            (PieceKind::Chick, Color::White) => &[3],
            (PieceKind::Fowl, Color::Black) => &[0, 1, 2, 3, 4, 5],
            (PieceKind::Fowl, Color::White) => &[0, 1, 2, 3, 6, 7],
        }
    }

    /// Directions the piece slides along until blocked or capturing.
    fn slides(self) -> &'static [usize] {
        match self {
            PieceKind::Giraffe => &[0, 1, 2, 3],
            PieceKind::Elephant => &[4, 5, 6, 7],
            _ => &[],
        }
    }
}

/// A piece on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    fn index(self) -> usize {
        self.color.index() * 5 + self.kind.index()
    }

    fn from_char(c: char) -> Option<Self> {
        let index = label_index(PIECE_CHARS, c)?;
        Some(Piece {
            color: Color::from_index(index / 5),
            kind: PieceKind::ALL[index % 5],
        })
    }

    fn to_char(self) -> char {
        label_at(PIECE_CHARS, self.index())
    }
}

struct Zobrist {
    piece: [[u64; B]; 10],
    hand: [[u64; HAND_SLOTS]; 2],
}

fn zobrist() -> &'static Zobrist {
    static TABLE: OnceLock<Zobrist> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut rng = GameRng::new(0);
        let mut table = Zobrist {
            piece: [[0; B]; 10],
            hand: [[0; HAND_SLOTS]; 2],
        };
        for row in table.piece.iter_mut() {
            for key in row.iter_mut() {
                *key = rng.gen_u64();
            }
        }
        for row in table.hand.iter_mut() {
            for key in row.iter_mut() {
                *key = rng.gen_u64();
            }
        }
        table
    })
}

fn xy_to_pos(x: usize, y: usize) -> usize {
    y * LX + x
}

fn promotion_rank(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => LX - 1,
    }
}

fn encode(from: usize, to: usize) -> ActionId {
    ActionId::from_index(to * (B + HAND_SLOTS) + from)
}

fn decode(action: ActionId) -> (usize, usize) {
    let a = action.index();
    (a % (B + HAND_SLOTS), a / (B + HAND_SLOTS))
}

fn position_to_string(pos: usize) -> String {
    format!("{}{}", label_at(Y, pos / LX), label_at(X, pos % LX))
}

fn parse_position(file: char, rank: char) -> Option<usize> {
    let y = label_index(Y, file)?;
    let x = label_index(X, rank)?;
    Some(xy_to_pos(x, y))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Undo {
    captured: Option<Piece>,
    promoted: bool,
}

/// Animal shogi position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalShogi {
    board: [Option<Piece>; B],
    hand: ColorMap<[u8; HAND_SLOTS]>,
    color: Color,
    key: u64,
    /// `key ^ colour` of every position a move was played from.
    seen: im::HashSet<u64>,
    history: Vec<Undo>,
    record: Vec<ActionId>,
}

impl Default for AnimalShogi {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimalShogi {
    /// Standard setup, Black to move.
    pub fn new() -> Self {
        let mut state = Self {
            board: [None; B],
            hand: ColorMap::with_value([0; HAND_SLOTS]),
            color: Color::Black,
            key: 0,
            seen: im::HashSet::new(),
            history: Vec::new(),
            record: Vec::new(),
        };
        let table = zobrist();
        for (i, c) in INITIAL.chars().enumerate() {
            if let Some(piece) = Piece::from_char(c) {
                let pos = xy_to_pos(i / LY, i % LY);
                state.board[pos] = Some(piece);
                state.key = state.key.wrapping_add(table.piece[piece.index()][pos]);
            }
        }
        state
    }

    /// Piece on rank `x`, file `y`.
    #[must_use]
    pub fn piece(&self, x: usize, y: usize) -> Option<Piece> {
        self.board[xy_to_pos(x, y)]
    }

    /// Number of `kind` pieces `color` holds in hand.
    #[must_use]
    pub fn hand_count(&self, color: Color, kind: PieceKind) -> u8 {
        PieceKind::IN_HAND
            .iter()
            .position(|&k| k == kind)
            .map_or(0, |slot| self.hand[color][slot])
    }

    fn position_key(&self) -> u64 {
        self.key ^ self.color.index() as u64
    }

    fn is_repetition(&self) -> bool {
        self.seen.contains(&self.position_key())
    }

    fn add_to_hand(&mut self, color: Color, slot: usize) {
        self.hand[color][slot] += 1;
        self.key = self.key.wrapping_add(zobrist().hand[color.index()][slot]);
    }

    fn take_from_hand(&mut self, color: Color, slot: usize) {
        self.hand[color][slot] -= 1;
        self.key = self.key.wrapping_sub(zobrist().hand[color.index()][slot]);
    }

    fn put(&mut self, pos: usize, piece: Piece) {
        self.board[pos] = Some(piece);
        self.key = self.key.wrapping_add(zobrist().piece[piece.index()][pos]);
    }

    fn lift(&mut self, pos: usize) -> Option<Piece> {
        let piece = self.board[pos].take()?;
        self.key = self.key.wrapping_sub(zobrist().piece[piece.index()][pos]);
        Some(piece)
    }

    fn hand_string(&self, color: Color) -> String {
        let pieces: String = PieceKind::IN_HAND
            .iter()
            .enumerate()
            .flat_map(|(slot, &kind)| {
                let c = Piece { color, kind }.to_char();
                std::iter::repeat(c).take(self.hand[color][slot] as usize)
            })
            .collect();
        if pieces.is_empty() {
            "-".to_string()
        } else {
            pieces
        }
    }

    fn objective_reward(&self) -> f32 {
        if self.is_repetition() {
            return 0.0;
        }
        let lion = PieceKind::Lion.index();
        let mut reward = 0.0;
        if self.hand[Color::Black][lion] > 0 {
            reward = 1.0;
        }
        if self.hand[Color::White][lion] > 0 {
            reward = -1.0;
        }
        // A lion still on the far rank when its side is to move again.
        let own_lion = Piece {
            color: self.color,
            kind: PieceKind::Lion,
        };
        let rank = promotion_rank(self.color);
        if (0..LY).any(|y| self.piece(rank, y) == Some(own_lion)) {
            reward = self.color.sign();
        }
        reward
    }
}

impl BoardGame for AnimalShogi {
    fn name(&self) -> &'static str {
        "AnimalShogi"
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size(&self) -> [usize; 2] {
        [LX, LY]
    }

    fn to_move(&self) -> Color {
        self.color
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        let mut actions = Vec::new();

        for from in 0..B {
            let Some(piece) = self.board[from] else {
                continue;
            };
            if piece.color != self.color {
                continue;
            }
            let (x, y) = (from % LX, from / LX);
            for &d in piece.kind.steps(self.color) {
                if let Some((nx, ny)) = step(x, y, d, LX, LY) {
                    let to = xy_to_pos(nx, ny);
                    if self.board[to].map_or(true, |p| p.color != self.color) {
                        actions.push(encode(from, to));
                    }
                }
            }
            for &d in piece.kind.slides() {
                let (mut cx, mut cy) = (x, y);
                while let Some((nx, ny)) = step(cx, cy, d, LX, LY) {
                    let to = xy_to_pos(nx, ny);
                    match self.board[to] {
                        Some(p) if p.color == self.color => break,
                        Some(_) => {
                            actions.push(encode(from, to));
                            break;
                        }
                        None => actions.push(encode(from, to)),
                    }
                    (cx, cy) = (nx, ny);
                }
            }
        }

        for slot in 0..HAND_SLOTS {
            if self.hand[self.color][slot] > 0 {
                for to in (0..B).filter(|&to| self.board[to].is_none()) {
                    actions.push(encode(B + slot, to));
                }
            }
        }

        actions
    }

    fn play(&mut self, action: ActionId) {
        debug_assert!(self.is_legal(action), "illegal action {}", action);
        self.seen.insert(self.position_key());
        let (from, to) = decode(action);
        let color = self.color;

        let captured = self.lift(to);
        if let Some(cap) = captured {
            self.add_to_hand(color, cap.kind.unpromoted().index());
        }

        let mut promoted = false;
        let moving = if from >= B {
            let slot = from - B;
            self.take_from_hand(color, slot);
            Some(Piece {
                color,
                kind: PieceKind::IN_HAND[slot],
            })
        } else {
            self.lift(from).map(|mut piece| {
                if piece.kind == PieceKind::Chick && to % LX == promotion_rank(color) {
                    piece.kind = PieceKind::Fowl;
                    promoted = true;
                }
                piece
            })
        };
        if let Some(piece) = moving {
            self.put(to, piece);
        }

        self.history.push(Undo { captured, promoted });
        self.color = color.opponent();
        self.record.push(action);
    }

    fn undo(&mut self) -> Result<()> {
        let action = self.record.pop().ok_or(GameError::NothingToUndo)?;
        let undo = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.color = self.color.opponent();
        let color = self.color;
        let (from, to) = decode(action);

        if let Some(mut piece) = self.lift(to) {
            if from >= B {
                self.add_to_hand(color, from - B);
            } else {
                if undo.promoted {
                    piece.kind = PieceKind::Chick;
                }
                self.put(from, piece);
            }
        }

        if let Some(cap) = undo.captured {
            self.take_from_hand(color, cap.kind.unpromoted().index());
            self.put(to, cap);
        }

        self.seen.remove(&self.position_key());
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.is_repetition() || self.objective_reward() != 0.0
    }

    fn reward(&self, subjective: bool) -> f32 {
        let reward = self.objective_reward();
        if subjective {
            reward * self.color.sign()
        } else {
            reward
        }
    }

    fn action_length(&self) -> usize {
        (B + HAND_SLOTS) * B
    }

    fn feature(&self) -> EncodedState {
        let mut encoded = EncodedState::planes(CHANNELS, LX, LY);
        for pos in 0..B {
            if let Some(piece) = self.board[pos] {
                let mut channel = piece.kind.index();
                if piece.color != self.color {
                    channel += 5;
                }
                encoded.set(channel, pos % LX, pos / LX, 1.0);
            }
        }
        for (i, color) in [self.color, self.color.opponent()].into_iter().enumerate() {
            for slot in 0..HAND_SLOTS {
                let count = self.hand[color][slot].min(2) as usize;
                if count > 0 {
                    encoded.fill_plane(10 + i * 8 + slot * 2 + count - 1, 1.0);
                }
            }
        }
        if self.color == Color::White {
            encoded.fill_plane(CHANNELS - 1, 1.0);
        }
        encoded
    }

    fn action_to_string(&self, action: ActionId) -> String {
        let (from, to) = decode(action);
        format!("{}{}", position_to_string(from), position_to_string(to))
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        let chars: Vec<char> = s.chars().collect();
        let parsed = match chars.as_slice() {
            &[f0, r0, f1, r1] => parse_position(f0, r0)
                .zip(parse_position(f1, r1))
                .filter(|&(_, to)| to < B),
            _ => None,
        };
        parsed
            .map(|(from, to)| encode(from, to))
            .ok_or_else(|| GameError::notation(self.name(), s))
    }

    fn record(&self) -> &[ActionId] {
        &self.record
    }
}

impl fmt::Display for AnimalShogi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", &Y[..LY])?;
        for x in 0..LX {
            write!(f, "{} ", label_at(X, x))?;
            for y in 0..LY {
                let c = self.piece(x, y).map_or('.', Piece::to_char);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "hand = {} / {}",
            self.hand_string(Color::Black),
            self.hand_string(Color::White)
        )?;
        write!(f, "record = {}", self.record_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let state = AnimalShogi::new();

        assert_eq!(
            state.to_string(),
            "  ABC\n1 gle\n2 .c.\n3 .C.\n4 ELG\nhand = - / -\nrecord = "
        );
        assert_eq!(
            state.path_to_string(&state.legal_actions()),
            "B3B2 B4A3 B4C3 C4C3 C4C2 C4C1"
        );
        assert_eq!(state.action_length(), 192);
        assert_eq!(state.size(), [4, 3]);
    }

    #[test]
    fn test_capture_goes_to_hand() {
        let mut state = AnimalShogi::new();
        state.plays("B3B2").unwrap();

        assert_eq!(state.hand_count(Color::Black, PieceKind::Chick), 1);
        assert!(state.to_string().contains("hand = C / -"));
    }

    #[test]
    fn test_giraffe_slides_to_capture() {
        let mut state = AnimalShogi::new();
        state.plays("C4C3 A1A2").unwrap();

        let strings: Vec<String> = state
            .legal_actions()
            .into_iter()
            .map(|a| state.action_to_string(a))
            .collect();
        assert!(strings.contains(&"C3C2".to_string()));
        assert!(strings.contains(&"C3C1".to_string()));

        state.plays("C3C1").unwrap();
        assert_eq!(state.hand_count(Color::Black, PieceKind::Elephant), 1);
    }

    #[test]
    fn test_elephant_slides_until_edge() {
        let mut state = AnimalShogi::new();
        // Own chick blocks the diagonal.
        let a4b3 = state.string_to_action("A4B3").unwrap();
        assert!(!state.is_legal(a4b3));

        state.plays("B3B2 A1A2").unwrap();
        let a4c2 = state.string_to_action("A4C2").unwrap();
        assert!(state.is_legal(a4b3));
        assert!(state.is_legal(a4c2));
    }

    #[test]
    fn test_captured_fowl_returns_as_chick() {
        let mut state = AnimalShogi::new();
        state.plays("B3B2 C1B2 *4C2 A1A2 C2C1").unwrap();
        let fowl = Piece {
            color: Color::Black,
            kind: PieceKind::Fowl,
        };
        assert_eq!(state.piece(0, 2), Some(fowl));
        assert_eq!(state.hand_count(Color::White, PieceKind::Chick), 1);
        assert!(!state.is_terminal());

        state.plays("B1C1").unwrap();
        assert_eq!(state.hand_count(Color::White, PieceKind::Chick), 2);
        assert_eq!(state.hand_count(Color::White, PieceKind::Fowl), 0);

        state.undo().unwrap();
        assert_eq!(state.piece(0, 2), Some(fowl));
        assert_eq!(state.hand_count(Color::White, PieceKind::Chick), 1);
        assert_eq!(
            state.piece(0, 1),
            Some(Piece {
                color: Color::White,
                kind: PieceKind::Lion
            })
        );
    }

    #[test]
    fn test_drop_notation() {
        let mut state = AnimalShogi::new();
        state.plays("B3B2 A1A2").unwrap();

        let drop = state.string_to_action("*4C3").unwrap();
        assert!(state.legal_actions().contains(&drop));
        state.play(drop);
        assert_eq!(
            state.piece(2, 2),
            Some(Piece {
                color: Color::Black,
                kind: PieceKind::Chick
            })
        );
        assert_eq!(state.hand_count(Color::Black, PieceKind::Chick), 0);
    }

    #[test]
    fn test_lion_capture_ends_game() {
        let mut state = AnimalShogi::new();
        state.plays("B3B2 B1B2 B4B3 B2B3").unwrap();

        assert!(state.is_terminal());
        assert_eq!(state.reward(false), -1.0);
        // Black to move and has lost.
        assert_eq!(state.reward(true), -1.0);
    }

    #[test]
    fn test_promotion_and_undo() {
        let mut state = AnimalShogi::new();
        state.plays("B3B2 A1A2").unwrap();
        let before = state.clone();

        state.plays("B2B1").unwrap();
        assert_eq!(
            state.piece(0, 1),
            Some(Piece {
                color: Color::Black,
                kind: PieceKind::Fowl
            })
        );
        assert_eq!(state.reward(false), 1.0);

        state.undo().unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_repetition_is_draw() {
        let mut state = AnimalShogi::new();
        state.plays("B4A3 B1A2 A3B4").unwrap();
        assert!(!state.is_terminal());

        state.plays("A2B1").unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.reward(false), 0.0);
    }

    #[test]
    fn test_try_win() {
        let mut state = AnimalShogi::new();
        state.board = [None; B];
        state.board[xy_to_pos(0, 0)] = Some(Piece {
            color: Color::Black,
            kind: PieceKind::Lion,
        });
        state.board[xy_to_pos(3, 2)] = Some(Piece {
            color: Color::White,
            kind: PieceKind::Lion,
        });

        assert!(state.is_terminal());
        assert_eq!(state.reward(false), 1.0);
        assert_eq!(state.reward(true), 1.0);
    }

    #[test]
    fn test_undo_through_random_game() {
        let mut rng = GameRng::new(9);
        let mut state = AnimalShogi::new();
        let mut history = vec![state.clone()];
        for _ in 0..60 {
            if state.is_terminal() {
                break;
            }
            let actions = state.legal_actions();
            state.play(*rng.choose(&actions).unwrap());
            history.push(state.clone());
        }
        history.pop();
        while let Some(previous) = history.pop() {
            state.undo().unwrap();
            assert_eq!(state, previous);
        }
    }

    #[test]
    fn test_feature_planes() {
        let mut state = AnimalShogi::new();
        let feature = state.feature();
        assert_eq!(feature.shape, vec![27, 4, 3]);
        // Own lion on rank 4, file B.
        assert_eq!(feature.at(0, 3, 1), 1.0);
        // Opponent lion on rank 1, file B.
        assert_eq!(feature.at(5, 0, 1), 1.0);
        assert_eq!(feature.at(26, 0, 0), 0.0);

        state.plays("B3B2").unwrap();
        let feature = state.feature();
        // White to move; Black holds one chick.
        assert_eq!(feature.at(26, 2, 2), 1.0);
        assert_eq!(feature.at(10 + 8 + 3 * 2, 1, 1), 1.0);
    }

    #[test]
    fn test_bad_notation() {
        let state = AnimalShogi::new();
        assert!(state.string_to_action("B3").is_err());
        assert!(state.string_to_action("D3B2").is_err());
        assert!(state.string_to_action("B3*1").is_err());
    }
}
