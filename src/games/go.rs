//! Go on a small square board with area scoring.
//!
//! Columns are `A..` skipping `I`, rows `1..9` then `a..`; the top row is
//! displayed first and action `0` is its leftmost point. The pass action
//! equals the number of points and prints as `PASS`.
//!
//! Chains ("rens") are kept incrementally: every stone points at the id of
//! its chain, stones of one chain form a ring through `next`, and each
//! chain owns its liberty set and Zobrist key.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::board::{label_at, label_index, step, ORTHOGONAL};
use crate::core::{ActionId, Color, ColorMap, GameError, GameRng, Result};
use crate::nn::EncodedState;
use crate::rules::BoardGame;

const X: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";
const Y: &str = "123456789abcdefghjklmnopq";
const MAX_SIZE: usize = 25;

/// Board size, komi and ko rule.
///
/// ## Example
///
/// ```
/// use games::games::{Go, GoConfig};
///
/// let config = GoConfig::new(5).with_komi(0.5).with_superko(true);
/// let go = Go::with_config(config).unwrap();
/// assert_eq!(go.legal_actions_count(), 26);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoConfig {
    /// Points per side.
    pub size: usize,
    /// Points added to White's area.
    pub komi: f32,
    /// Forbid recreating any earlier stone configuration.
    pub superko: bool,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            size: 3,
            komi: 7.0,
            superko: false,
        }
    }
}

impl GoConfig {
    /// Defaults with a different board size.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_komi(mut self, komi: f32) -> Self {
        self.komi = komi;
        self
    }

    pub fn with_superko(mut self, superko: bool) -> Self {
        self.superko = superko;
        self
    }

    /// Check the size fits the coordinate labels and komi is finite.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SIZE).contains(&self.size) {
            return Err(GameError::InvalidConfig {
                message: format!("Go board size must be 1..={}, got {}", MAX_SIZE, self.size),
            });
        }
        if !self.komi.is_finite() {
            return Err(GameError::InvalidConfig {
                message: format!("Go komi must be finite, got {}", self.komi),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Ren {
    libs: FxHashSet<usize>,
    size: usize,
    key: u64,
}

impl Ren {
    fn reset(&mut self, key: u64) {
        self.libs.clear();
        self.size = usize::from(key != 0);
        self.key = key;
    }
}

/// Go position.
#[derive(Clone, Debug, PartialEq)]
pub struct Go {
    config: GoConfig,
    stone_keys: Vec<ColorMap<u64>>,
    board: Vec<Option<Color>>,
    color: Color,
    ko: Option<usize>,
    rens: Vec<Ren>,
    ren_id: Vec<usize>,
    next: Vec<usize>,
    key: u64,
    /// Stone configurations seen so far, for positional superko.
    keys: im::HashSet<u64>,
    record: Vec<ActionId>,
}

impl Default for Go {
    fn default() -> Self {
        Self::new()
    }
}

impl Go {
    /// 3×3 board, komi 7, no superko.
    pub fn new() -> Self {
        Self::build(GoConfig::default())
    }

    /// Board from a validated configuration.
    pub fn with_config(config: GoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GoConfig) -> Self {
        let points = config.size * config.size;
        let mut rng = GameRng::new(0);
        let stone_keys = (0..points)
            .map(|_| {
                let black = rng.gen_u64();
                let white = rng.gen_u64();
                ColorMap::new(black, white)
            })
            .collect();
        let mut state = Self {
            config,
            stone_keys,
            board: Vec::new(),
            color: Color::Black,
            ko: None,
            rens: Vec::new(),
            ren_id: Vec::new(),
            next: Vec::new(),
            key: 0,
            keys: im::HashSet::new(),
            record: Vec::new(),
        };
        state.reset();
        state
    }

    fn reset(&mut self) {
        let points = self.points();
        self.board = vec![None; points];
        self.color = Color::Black;
        self.ko = None;
        self.rens = vec![Ren::default(); points];
        self.ren_id = (0..points).collect();
        self.next = (0..points).collect();
        self.key = 0;
        self.keys = im::HashSet::unit(0);
        self.record.clear();
    }

    #[must_use]
    pub fn config(&self) -> &GoConfig {
        &self.config
    }

    fn side(&self) -> usize {
        self.config.size
    }

    fn points(&self) -> usize {
        self.config.size * self.config.size
    }

    fn pass(&self) -> usize {
        self.points()
    }

    fn xy_to_pos(&self, x: usize, y: usize) -> usize {
        (self.side() - 1 - y) * self.side() + x
    }

    fn pos_to_xy(&self, pos: usize) -> (usize, usize) {
        (pos % self.side(), self.side() - 1 - pos / self.side())
    }

    fn neighbours(&self, pos: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = self.pos_to_xy(pos);
        let side = self.side();
        (0..ORTHOGONAL).filter_map(move |d| step(x, y, d, side, side).map(|(nx, ny)| self.xy_to_pos(nx, ny)))
    }

    fn chain(&self, pos: usize) -> &Ren {
        &self.rens[self.ren_id[pos]]
    }

    /// Stone at column `x`, row `y` (row 0 is the bottom row).
    #[must_use]
    pub fn stone(&self, x: usize, y: usize) -> Option<Color> {
        self.board[self.xy_to_pos(x, y)]
    }

    /// Number of legal actions, pass included.
    #[must_use]
    pub fn legal_actions_count(&self) -> usize {
        self.legal_actions().len()
    }

    /// Point currently forbidden by simple ko.
    #[must_use]
    pub fn ko_point(&self) -> Option<ActionId> {
        self.ko.map(ActionId::from_index)
    }

    /// Whether a stone of the mover on `pos` keeps or gains a liberty.
    fn placement_legal(&self, pos: usize) -> bool {
        if self.board[pos].is_some() || self.ko == Some(pos) {
            return false;
        }
        self.neighbours(pos).any(|npos| match self.board[npos] {
            None => true,
            Some(c) if c == self.color => self.chain(npos).libs.len() >= 2,
            // The last liberty of an adjacent enemy chain is this point.
            Some(_) => self.chain(npos).libs.len() == 1,
        })
    }

    /// Stone configuration key after the mover plays `pos`.
    fn next_position_key(&self, pos: usize) -> u64 {
        let mut key = self.key ^ self.stone_keys[pos][self.color];
        let mut captured: Vec<usize> = Vec::new();
        for npos in self.neighbours(pos) {
            let id = self.ren_id[npos];
            if self.board[npos] == Some(self.color.opponent())
                && self.rens[id].libs.len() == 1
                && !captured.contains(&id)
            {
                captured.push(id);
                key ^= self.rens[id].key;
            }
        }
        key
    }

    fn merge(&mut self, pos0: usize, pos1: usize) {
        let id0 = self.ren_id[pos0];
        let id1 = self.ren_id[pos1];
        let absorbed = std::mem::take(&mut self.rens[id1]);
        let target = &mut self.rens[id0];
        target.libs.extend(absorbed.libs);
        target.size += absorbed.size;
        target.key ^= absorbed.key;

        let mut p = id1;
        loop {
            self.ren_id[p] = id0;
            p = self.next[p];
            if p == id1 {
                break;
            }
        }
        self.next.swap(pos0, pos1);
    }

    fn remove(&mut self, pos: usize) -> usize {
        let id = self.ren_id[pos];
        let removed = self.rens[id].size;
        self.key ^= self.rens[id].key;
        self.rens[id] = Ren::default();

        let mut p = pos;
        loop {
            self.board[p] = None;
            self.ren_id[p] = p;
            let adjacent: Vec<usize> = self.neighbours(p).collect();
            for npos in adjacent {
                if self.board[npos].is_some() {
                    let nid = self.ren_id[npos];
                    self.rens[nid].libs.insert(p);
                }
            }
            let next = self.next[p];
            self.next[p] = p;
            p = next;
            if p == pos {
                break;
            }
        }
        removed
    }

    /// Area score (stones plus surrounded empty regions) minus komi.
    #[must_use]
    pub fn score(&self, subjective: bool) -> f32 {
        let mut area = ColorMap::with_value(0usize);
        for stone in self.board.iter().flatten() {
            area[*stone] += 1;
        }

        let mut visited = vec![false; self.points()];
        for start in 0..self.points() {
            if visited[start] || self.board[start].is_some() {
                continue;
            }
            let mut region = 0;
            let mut borders = ColorMap::with_value(false);
            let mut stack = vec![start];
            visited[start] = true;
            while let Some(p) = stack.pop() {
                region += 1;
                for npos in self.neighbours(p) {
                    match self.board[npos] {
                        Some(c) => borders[c] = true,
                        None if !visited[npos] => {
                            visited[npos] = true;
                            stack.push(npos);
                        }
                        None => {}
                    }
                }
            }
            match (borders[Color::Black], borders[Color::White]) {
                (true, false) => area[Color::Black] += region,
                (false, true) => area[Color::White] += region,
                _ => {}
            }
        }

        let diff = area[Color::Black] as f32 - area[Color::White] as f32 - self.config.komi;
        if subjective && self.color == Color::White {
            -diff
        } else {
            diff
        }
    }
}

impl BoardGame for Go {
    fn name(&self) -> &'static str {
        "Go"
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn size(&self) -> [usize; 2] {
        [self.side(), self.side()]
    }

    fn to_move(&self) -> Color {
        self.color
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        let mut actions: Vec<ActionId> = (0..self.points())
            .filter(|&pos| self.placement_legal(pos))
            .filter(|&pos| !self.config.superko || !self.keys.contains(&self.next_position_key(pos)))
            .map(ActionId::from_index)
            .collect();
        actions.push(ActionId::from_index(self.pass()));
        actions
    }

    fn is_legal(&self, action: ActionId) -> bool {
        let pos = action.index();
        if pos == self.pass() {
            return true;
        }
        pos < self.points()
            && self.placement_legal(pos)
            && !(self.config.superko && self.keys.contains(&self.next_position_key(pos)))
    }

    fn play(&mut self, action: ActionId) {
        debug_assert!(self.is_legal(action), "illegal action {}", action);
        self.ko = None;
        let pos = action.index();
        if pos != self.pass() {
            let color = self.color;
            self.board[pos] = Some(color);
            self.ren_id[pos] = pos;
            self.next[pos] = pos;
            let stone_key = self.stone_keys[pos][color];
            self.rens[pos].reset(stone_key);
            self.key ^= stone_key;

            let adjacent: Vec<usize> = self.neighbours(pos).collect();
            for &npos in &adjacent {
                if self.board[npos].is_none() {
                    self.rens[pos].libs.insert(npos);
                } else {
                    let nid = self.ren_id[npos];
                    self.rens[nid].libs.remove(&pos);
                }
            }
            for &npos in &adjacent {
                if self.board[npos] == Some(color) && self.ren_id[pos] != self.ren_id[npos] {
                    self.merge(pos, npos);
                }
            }
            let mut removed = 0;
            for &npos in &adjacent {
                if self.board[npos] == Some(color.opponent()) && self.chain(npos).libs.is_empty() {
                    removed += self.remove(npos);
                }
            }

            let ren = self.chain(pos);
            let ko = if removed == 1 && ren.size == 1 && ren.libs.len() == 1 {
                ren.libs.iter().next().copied()
            } else {
                None
            };
            self.ko = ko;
            self.keys.insert(self.key);
        }
        self.color = self.color.opponent();
        self.record.push(action);
    }

    fn is_terminal(&self) -> bool {
        let n = self.record.len();
        if n >= self.points() * 3 {
            return true;
        }
        let pass = self.pass();
        n >= 2 && self.record[n - 2..].iter().all(|a| a.index() == pass)
    }

    fn reward(&self, subjective: bool) -> f32 {
        let score = self.score(subjective);
        if score > 0.0 {
            1.0
        } else if score < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    fn action_length(&self) -> usize {
        self.points() + 1
    }

    fn feature(&self) -> EncodedState {
        let side = self.side();
        let mut encoded = EncodedState::planes(3, side, side);
        for pos in 0..self.points() {
            let (row, col) = (pos / side, pos % side);
            match self.board[pos] {
                Some(c) if c == self.color => encoded.set(0, row, col, 1.0),
                Some(_) => encoded.set(1, row, col, 1.0),
                None => {}
            }
        }
        if self.color == Color::Black {
            encoded.fill_plane(2, 1.0);
        }
        encoded
    }

    fn action_to_string(&self, action: ActionId) -> String {
        let pos = action.index();
        if pos == self.pass() {
            return "PASS".to_string();
        }
        let (x, y) = self.pos_to_xy(pos);
        format!("{}{}", label_at(X, x), label_at(Y, y))
    }

    fn string_to_action(&self, s: &str) -> Result<ActionId> {
        if s == "PASS" {
            return Ok(ActionId::from_index(self.pass()));
        }
        let mut chars = s.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(cx), Some(cy), None) => label_index(X, cx)
                .zip(label_index(Y, cy))
                .filter(|&(x, y)| x < self.side() && y < self.side()),
            _ => None,
        };
        parsed
            .map(|(x, y)| ActionId::from_index(self.xy_to_pos(x, y)))
            .ok_or_else(|| GameError::notation(self.name(), s))
    }

    fn record(&self) -> &[ActionId] {
        &self.record
    }
}

impl fmt::Display for Go {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.side()).rev() {
            write!(f, "{} ", label_at(Y, y))?;
            for x in 0..self.side() {
                let c = match self.stone(x, y) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  {}", &X[..self.side()])?;
        write!(f, "record = {}", self.record_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go(size: usize) -> Go {
        Go::with_config(GoConfig::new(size)).unwrap()
    }

    #[test]
    fn test_initial_position() {
        let state = Go::new();

        assert_eq!(state.to_string(), "3 ...\n2 ...\n1 ...\n  ABC\nrecord = ");
        assert_eq!(state.legal_actions().len(), 10);
        assert_eq!(
            state.path_to_string(&state.legal_actions()),
            "A3 B3 C3 A2 B2 C2 A1 B1 C1 PASS"
        );
    }

    #[test]
    fn test_notation_skips_i() {
        let state = go(9);

        assert_eq!(state.action_to_string(ActionId(8)), "J9");
        assert_eq!(state.string_to_action("J9").unwrap(), ActionId(8));
        assert_eq!(state.string_to_action("A1").unwrap(), ActionId(72));
        assert!(state.string_to_action("I1").is_err());
        assert!(state.string_to_action("K1").is_err());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Go::with_config(GoConfig::new(26)),
            Err(GameError::InvalidConfig { .. })
        ));
        assert!(Go::with_config(GoConfig::new(3).with_komi(f32::NAN)).is_err());
    }

    #[test]
    fn test_capture_removes_stone() {
        let mut state = go(5);
        // White B2 surrounded by Black A2 B3 C2 B1.
        state.plays("A2 B2 B3 PASS C2 PASS B1").unwrap();

        assert_eq!(state.stone(1, 1), None);
        assert_eq!(state.stone(0, 1), Some(Color::Black));
    }

    #[test]
    fn test_suicide_is_illegal() {
        let mut state = go(5);
        state.plays("A2 PASS B1").unwrap();

        let corner = state.string_to_action("A1").unwrap();
        assert!(!state.is_legal(corner));
        assert!(!state.legal_actions().contains(&corner));
    }

    #[test]
    fn test_capture_into_single_liberty_point_is_legal() {
        let mut state = go(5);
        // White A2 and B1 each have A1 as their only liberty.
        state.plays("A3 A2 B2 B1 C1 PASS").unwrap();

        let a1 = state.string_to_action("A1").unwrap();
        assert!(state.is_legal(a1));
        state.play(a1);
        assert_eq!(state.stone(0, 0), Some(Color::Black));
        assert_eq!(state.stone(0, 1), None);
        assert_eq!(state.stone(1, 0), None);
        // Two stones captured: no ko.
        assert_eq!(state.ko_point(), None);
    }

    #[test]
    fn test_simple_ko() {
        let mut state = go(5);
        // Ko shape around B2 / C2.
        state.plays("B3 C3 A2 D2 B1 C1 PASS B2 C2").unwrap();

        assert_eq!(state.stone(1, 1), None);
        let retake = state.string_to_action("B2").unwrap();
        assert_eq!(state.ko_point(), Some(retake));
        assert!(!state.is_legal(retake));

        // After a move elsewhere the ko may be retaken.
        state.plays("E5 E4").unwrap();
        assert!(state.is_legal(retake));
    }

    #[test]
    fn test_next_position_key_matches_play() {
        let mut state = go(5);
        state.plays("B3 C3 A2 D2 B1 C1 PASS B2").unwrap();

        // Black C2 captures B2.
        let c2 = state.string_to_action("C2").unwrap();
        let predicted = state.next_position_key(c2.index());
        state.play(c2);
        assert_eq!(state.key, predicted);
        assert!(state.keys.contains(&predicted));
    }

    #[test]
    fn test_superko_blocks_seen_configuration() {
        let mut plain = go(5);
        let mut strict = Go::with_config(GoConfig::new(5).with_superko(true)).unwrap();
        plain.plays("C3").unwrap();
        strict.plays("C3").unwrap();

        let d4 = strict.string_to_action("D4").unwrap();
        let key = strict.next_position_key(d4.index());
        plain.keys.insert(key);
        strict.keys.insert(key);

        assert!(plain.is_legal(d4));
        assert!(!strict.is_legal(d4));
        assert!(!strict.legal_actions().contains(&d4));
        assert_eq!(strict.legal_actions().len(), plain.legal_actions().len() - 1);
    }

    #[test]
    fn test_area_score_and_reward() {
        let mut state = Go::new();
        state.plays("B2 PASS PASS").unwrap();

        assert!(state.is_terminal());
        // Black owns all nine points; komi 7.
        assert_eq!(state.score(false), 2.0);
        assert_eq!(state.reward(false), 1.0);
        // White to move sees a loss.
        assert_eq!(state.reward(true), -1.0);
    }

    #[test]
    fn test_move_limit_terminates() {
        let mut rng = GameRng::new(4);
        let mut state = Go::new();
        while !state.is_terminal() {
            let actions = state.legal_actions();
            // Prefer stones so the game runs long.
            let stones: Vec<ActionId> = actions.iter().copied().filter(|a| a.index() < 9).collect();
            let action = *rng.choose(&stones).or_else(|| rng.choose(&actions)).unwrap();
            state.play(action);
        }
        assert!(state.record().len() <= 27);
    }

    #[test]
    fn test_undo_unsupported() {
        let mut state = Go::new();
        state.plays("B2").unwrap();
        assert_eq!(state.undo(), Err(GameError::UndoUnsupported("Go")));
    }

    #[test]
    fn test_feature_planes() {
        let mut state = Go::new();
        state.plays("A3").unwrap();

        let feature = state.feature();
        assert_eq!(feature.shape, vec![3, 3, 3]);
        // White to move: Black's A3 (row 0, col 0) is the opponent.
        assert_eq!(feature.at(1, 0, 0), 1.0);
        assert_eq!(feature.at(2, 1, 1), 0.0);
    }
}
