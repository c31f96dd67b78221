//! Geister on a 6×6 board.
//!
//! Columns `A..F`, rows `1..6`; square `(x, y)` is position `x * 6 + y`.
//! Every ghost steps one square orthogonally and an action is
//! `direction * 36 + from`. A blue ghost next to a corner of the opponent's
//! back row may step off the board, printed `**`, which wins.
//!
//! Both sides' ghost colours are stored, so this is the full-information
//! version of the game. The starting arrangement is shuffled from a seed.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::board::{label_at, label_index, DIRECTIONS, ORTHOGONAL};
use crate::core::{ActionId, Color, ColorMap, GameError, GameRng, Result};
use crate::nn::EncodedState;
use crate::rules::{BoardGame, GameResult};

const L: usize = 6;
const B: usize = L * L;
const GHOSTS: usize = 8;
const X: &str = "ABCDEF";
const Y: &str = "123456";
const OFF_BOARD: &str = "**";
const CHANNELS: usize = 8;

/// Starting squares, in ghost-index order.
const SETUP: [[(usize, usize); GHOSTS]; 2] = [
    [(1, 0), (2, 0), (3, 0), (4, 0), (1, 1), (2, 1), (3, 1), (4, 1)],
    [(1, 4), (2, 4), (3, 4), (4, 4), (1, 5), (2, 5), (3, 5), (4, 5)],
];

/// Off-board squares a blue ghost of each colour escapes to.
const GOALS: [[(i32, i32); 2]; 2] = [[(-1, 5), (6, 5)], [(-1, 0), (6, 0)]];

/// Ghost colour; blue ghosts are good, red ghosts are bad to capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ghost {
    Blue,
    Red,
}

impl Ghost {
    fn index(self) -> usize {
        match self {
            Ghost::Blue => 0,
            Ghost::Red => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Piece {
    color: Color,
    ghost: Ghost,
    /// `color * 8 + setup slot`, stable for the whole game.
    id: usize,
}

impl Piece {
    fn to_char(self) -> char {
        match (self.color, self.ghost) {
            (Color::Black, Ghost::Blue) => 'B',
            (Color::Black, Ghost::Red) => 'R',
            (Color::White, Ghost::Blue) => 'b',
            (Color::White, Ghost::Red) => 'r',
        }
    }
}

fn position_keys() -> &'static [[u64; 2 * GHOSTS]; B] {
    static TABLE: OnceLock<[[u64; 2 * GHOSTS]; B]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut rng = GameRng::new(0);
        let mut table = [[0; 2 * GHOSTS]; B];
        for row in table.iter_mut() {
            for key in row.iter_mut() {
                *key = rng.gen_u64();
            }
        }
        table
    })
}

fn xy_to_pos(x: usize, y: usize) -> usize {
    x * L + y
}

fn target(pos: usize, d: usize) -> (i32, i32) {
    let (dx, dy) = DIRECTIONS[d];
    ((pos / L) as i32 + dx, (pos % L) as i32 + dy)
}

fn on_board(x: i32, y: i32) -> Option<usize> {
    if (0..L as i32).contains(&x) && (0..L as i32).contains(&y) {
        Some(xy_to_pos(x as usize, y as usize))
    } else {
        None
    }
}

fn position_to_string(pos: usize) -> String {
    format!("{}{}", label_at(X, pos / L), label_at(Y, pos % L))
}

/// Geister position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Geister {
    seed: u64,
    board: [Option<Piece>; B],
    color: Color,
    outcome: Option<GameResult>,
    /// Remaining ghosts per owner, indexed by `Ghost::index`.
    counts: ColorMap<[usize; 2]>,
    positions: [Option<usize>; 2 * GHOSTS],
    key: u64,
    /// Occurrences of `key ^ colour`.
    occurrences: im::HashMap<u64, u8>,
    record: Vec<ActionId>,
}

impl Default for Geister {
    fn default() -> Self {
        Self::new()
    }
}

impl Geister {
    /// Setup shuffled from seed 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Setup shuffled from `seed`: for each side four of the eight
    /// starting squares get blue ghosts, the rest red.
    pub fn with_seed(seed: u64) -> Self {
        let mut state = Self::empty(seed);
        let mut rng = GameRng::new(seed);
        for color in Color::ALL {
            let mut slots: Vec<usize> = (0..GHOSTS).collect();
            rng.shuffle(&mut slots);
            for (i, &slot) in slots.iter().enumerate() {
                let ghost = if i < GHOSTS / 2 { Ghost::Blue } else { Ghost::Red };
                let (x, y) = SETUP[color.index()][slot];
                state.put(
                    xy_to_pos(x, y),
                    Piece {
                        color,
                        ghost,
                        id: color.index() * GHOSTS + slot,
                    },
                );
            }
        }
        state.count_position();
        state
    }

    fn empty(seed: u64) -> Self {
        Self {
            seed,
            board: [None; B],
            color: Color::Black,
            outcome: None,
            counts: ColorMap::with_value([0; 2]),
            positions: [None; 2 * GHOSTS],
            key: 0,
            occurrences: im::HashMap::new(),
            record: Vec::new(),
        }
    }

    /// Seed the setup was shuffled from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ghost on column `x`, row `y`, with its owner.
    #[must_use]
    pub fn ghost(&self, x: usize, y: usize) -> Option<(Color, Ghost)> {
        self.board[xy_to_pos(x, y)].map(|p| (p.color, p.ghost))
    }

    /// Remaining ghosts of one kind.
    #[must_use]
    pub fn count(&self, color: Color, ghost: Ghost) -> usize {
        self.counts[color][ghost.index()]
    }

    fn put(&mut self, pos: usize, piece: Piece) {
        self.board[pos] = Some(piece);
        self.positions[piece.id] = Some(pos);
        self.counts[piece.color][piece.ghost.index()] += 1;
        self.key ^= position_keys()[pos][piece.id];
    }

    fn remove(&mut self, pos: usize) -> Option<Piece> {
        let piece = self.board[pos].take()?;
        self.positions[piece.id] = None;
        self.counts[piece.color][piece.ghost.index()] -= 1;
        self.key ^= position_keys()[pos][piece.id];
        Some(piece)
    }

    fn count_position(&mut self) {
        let key = self.key ^ self.color.index() as u64;
        let seen = self.occurrences.entry(key).or_insert(0);
        *seen += 1;
        if *seen >= 3 {
            self.outcome = Some(GameResult::Draw);
        }
    }

    fn is_goal(&self, color: Color, (x, y): (i32, i32)) -> bool {
        GOALS[color.index()].contains(&(x, y))
    }

    fn move_legal(&self, piece: Piece, from: usize, d: usize) -> bool {
        let to = target(from, d);
        match on_board(to.0, to.1) {
            Some(pos) => self.board[pos].map_or(true, |p| p.color != piece.color),
            None => piece.ghost == Ghost::Blue && self.is_goal(piece.color, to),
        }
    }
}

impl BoardGame for Geister {
    fn name(&self) -> &'static str {
        "Geister"
    }

    /// Restart with the same seed.
    fn clear(&mut self) {
        *self = Self::with_seed(self.seed);
    }

    fn size(&self) -> [usize; 2] {
        [L, L]
    }

    fn to_move(&self) -> Color {
        self.color
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        let first = self.color.index() * GHOSTS;
        let mut actions = Vec::new();
        for id in first..first + GHOSTS {
            let Some(from) = self.positions[id] else {
                continue;
            };
            let Some(piece) = self.board[from] else {
                continue;
            };
            for d in 0..ORTHOGONAL {
                if self.move_legal(piece, from, d) {
                    actions.push(ActionId::from_index(d * B + from));
                }
            }
        }
        actions
    }

    fn is_legal(&self, action: ActionId) -> bool {
        let (from, d) = (action.index() % B, action.index() / B);
        d < ORTHOGONAL
            && self.board[from]
                .filter(|p| p.color == self.color)
                .map_or(false, |p| self.move_legal(p, from, d))
    }

    fn play(&mut self, action: ActionId) {
        debug_assert!(self.is_legal(action), "illegal action {}", action);
        let (from, d) = (action.index() % B, action.index() / B);
        let mover = self.color;
        let to = target(from, d);

        match on_board(to.0, to.1) {
            None => {
                self.remove(from);
                self.outcome = Some(GameResult::Winner(mover));
            }
            Some(pos) => {
                if let Some(captured) = self.remove(pos) {
                    if self.counts[captured.color][captured.ghost.index()] == 0 {
                        let winner = match captured.ghost {
                            Ghost::Blue => mover,
                            Ghost::Red => mover.opponent(),
                        };
                        self.outcome = Some(GameResult::Winner(winner));
                    }
                }
                if let Some(piece) = self.remove(from) {
                    self.put(pos, piece);
                }
            }
        }

        self.color = mover.opponent();
        if self.outcome.is_none() {
            self.count_position();
        }
        self.record.push(action);
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    fn reward(&self, subjective: bool) -> f32 {
        let objective = match self.outcome {
            Some(GameResult::Winner(color)) => color.sign(),
            _ => 0.0,
        };
        if subjective {
            objective * self.color.sign()
        } else {
            objective
        }
    }

    fn action_length(&self) -> usize {
        ORTHOGONAL * B
    }

    /// Turn plane, own blue, own red, opponent ghosts, then the four ghost
    /// counts scaled to `0..=1`.
    fn feature(&self) -> EncodedState {
        let mut encoded = EncodedState::planes(CHANNELS, L, L);
        if self.color == Color::Black {
            encoded.fill_plane(0, 1.0);
        }
        for pos in 0..B {
            if let Some(piece) = self.board[pos] {
                let channel = if piece.color != self.color {
                    3
                } else {
                    1 + piece.ghost.index()
                };
                encoded.set(channel, pos / L, pos % L, 1.0);
            }
        }
        let opponent = self.color.opponent();
        let counts = [
            self.count(self.color, Ghost::Blue),
            self.count(self.color, Ghost::Red),
            self.count(opponent, Ghost::Blue),
            self.count(opponent, Ghost::Red),
        ];
        for (i, &count) in counts.iter().enumerate() {
            encoded.fill_plane(4 + i, count as f32 / (GHOSTS / 2) as f32);
        }
        encoded
    }

    fn action_to_string(&self, action: ActionId) -> String {
        let (from, d) = (action.index() % B, action.index() / B);
        let to = target(from, d);
        let to = on_board(to.0, to.1).map_or_else(|| OFF_BOARD.to_string(), position_to_string);
        format!("{}{}", position_to_string(from), to)
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        let err = || GameError::notation(self.name(), s);
        let chars: Vec<char> = s.chars().collect();
        let &[fx, fy, tx, ty] = chars.as_slice() else {
            return Err(err());
        };
        let x = label_index(X, fx).ok_or_else(err)?;
        let y = label_index(Y, fy).ok_or_else(err)?;
        let from = xy_to_pos(x, y);

        let d = if (tx, ty) == ('*', '*') {
            (0..ORTHOGONAL).find(|&d| {
                let to = target(from, d);
                Color::ALL.iter().any(|&c| self.is_goal(c, to))
            })
        } else {
            let to_x = label_index(X, tx).ok_or_else(err)? as i32;
            let to_y = label_index(Y, ty).ok_or_else(err)? as i32;
            (0..ORTHOGONAL).find(|&d| DIRECTIONS[d] == (to_x - x as i32, to_y - y as i32))
        };
        d.map(|d| ActionId::from_index(d * B + from)).ok_or_else(err)
    }

    fn record(&self) -> &[ActionId] {
        &self.record
    }
}

impl fmt::Display for Geister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", Y)?;
        for x in 0..L {
            write!(f, "{} ", label_at(X, x))?;
            for y in 0..L {
                let c = self.board[xy_to_pos(x, y)].map_or('_', Piece::to_char);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "record = {}", self.record_string())
    }
}
