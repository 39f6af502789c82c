//! 盤面。全 40 枚の駒の集合として表す。
//!
//! 盤上の駒は位置付きで保持し、駒台の駒は (陣営, 駒種) ごとの枚数のみを保持する。
//! 同じ陣営の同じ駒種の持ち駒は区別できないが、局面の同一性には影響しない。
//!
//! 盤面は不変値として扱う。指し手の適用は常に新しい盤面を返す。

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BoardError, ReplayError};
use crate::mylog::*;
use crate::shogi::*;
use crate::step::Step;

/// 駒台。成っていない駒種ごとの枚数。
///
/// 合法性は気にしないので、玉も載りうる。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Hand([u32; 9]);

impl Hand {
    /// 空の駒台を返す。
    pub const fn empty() -> Self {
        Self([0; 9])
    }

    /// 駒台が空かどうかを返す。
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// 指定した駒種の枚数を返す。駒台に載りえない駒種なら 0。
    pub fn count(&self, pk: PieceKind) -> u32 {
        if Self::accepts(pk) {
            self.0[usize::from(pk)]
        } else {
            0
        }
    }

    /// 駒を 1 枚載せる。成駒は成っていない駒種として載せる。
    pub fn put(&mut self, pk: PieceKind) {
        let pk = pk.to_unpromoted();
        debug_assert!(Self::accepts(pk));

        self.0[usize::from(pk)] += 1;
    }

    /// 駒を 1 枚取り出す。なければ false を返す。
    pub fn take(&mut self, pk: PieceKind) -> bool {
        if self.count(pk) == 0 {
            return false;
        }

        self.0[usize::from(pk)] -= 1;
        true
    }

    /// 載っている駒の総数を返す。
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    fn accepts(pk: PieceKind) -> bool {
        pk.is_piece() && !pk.is_promoted()
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const PKS: [PieceKind; 8] = [KING, ROOK, BISHOP, GOLD, SILVER, KNIGHT, LANCE, PAWN];

        for pk in PKS {
            let n = self.count(pk);
            if n == 0 {
                continue;
            }

            write!(f, "{}", pk)?;
            if n >= 2 {
                write!(f, "{}", n)?;
            }
        }

        Ok(())
    }
}

/// 両陣営の駒台。`Side` でインデックスアクセスできる。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Hands([Hand; 2]);

impl Hands {
    /// 先手、後手の順に駒台を列挙する。
    pub fn iter(&self) -> impl Iterator<Item = &Hand> {
        self.0.iter()
    }
}

impl std::ops::Index<Side> for Hands {
    type Output = Hand;

    fn index(&self, side: Side) -> &Self::Output {
        &self.0[usize::from(side)]
    }
}

impl std::ops::IndexMut<Side> for Hands {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.0[usize::from(side)]
    }
}

/// 盤面。
///
/// シリアライズ時は正規順序に並べた 40 枚の駒の列として表す。
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "Vec<Piece>", try_from = "Vec<Piece>")]
pub struct Board {
    /// 盤上の駒。順序は問わない。
    on_board: Vec<Piece>,
    hands: Hands,
}

impl Board {
    /// 平手初期盤面の駒。
    #[rustfmt::skip]
    const INIT: [Piece; 40] = [
        Piece::new(LANCE,  SECOND, Position::new(9, 1)),
        Piece::new(KNIGHT, SECOND, Position::new(8, 1)),
        Piece::new(SILVER, SECOND, Position::new(7, 1)),
        Piece::new(GOLD,   SECOND, Position::new(6, 1)),
        Piece::new(KING,   SECOND, Position::new(5, 1)),
        Piece::new(GOLD,   SECOND, Position::new(4, 1)),
        Piece::new(SILVER, SECOND, Position::new(3, 1)),
        Piece::new(KNIGHT, SECOND, Position::new(2, 1)),
        Piece::new(LANCE,  SECOND, Position::new(1, 1)),
        Piece::new(ROOK,   SECOND, Position::new(8, 2)),
        Piece::new(BISHOP, SECOND, Position::new(2, 2)),
        Piece::new(PAWN,   SECOND, Position::new(9, 3)),
        Piece::new(PAWN,   SECOND, Position::new(8, 3)),
        Piece::new(PAWN,   SECOND, Position::new(7, 3)),
        Piece::new(PAWN,   SECOND, Position::new(6, 3)),
        Piece::new(PAWN,   SECOND, Position::new(5, 3)),
        Piece::new(PAWN,   SECOND, Position::new(4, 3)),
        Piece::new(PAWN,   SECOND, Position::new(3, 3)),
        Piece::new(PAWN,   SECOND, Position::new(2, 3)),
        Piece::new(PAWN,   SECOND, Position::new(1, 3)),
        Piece::new(PAWN,   FIRST,  Position::new(9, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(8, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(7, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(6, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(5, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(4, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(3, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(2, 7)),
        Piece::new(PAWN,   FIRST,  Position::new(1, 7)),
        Piece::new(BISHOP, FIRST,  Position::new(8, 8)),
        Piece::new(ROOK,   FIRST,  Position::new(2, 8)),
        Piece::new(LANCE,  FIRST,  Position::new(9, 9)),
        Piece::new(KNIGHT, FIRST,  Position::new(8, 9)),
        Piece::new(SILVER, FIRST,  Position::new(7, 9)),
        Piece::new(GOLD,   FIRST,  Position::new(6, 9)),
        Piece::new(KING,   FIRST,  Position::new(5, 9)),
        Piece::new(GOLD,   FIRST,  Position::new(4, 9)),
        Piece::new(SILVER, FIRST,  Position::new(3, 9)),
        Piece::new(KNIGHT, FIRST,  Position::new(2, 9)),
        Piece::new(LANCE,  FIRST,  Position::new(1, 9)),
    ];

    /// 平手初期盤面を返す。
    pub fn init() -> Self {
        Self::from_pieces(Self::INIT)
    }

    /// 駒の集合から盤面を作る。駒の順序は問わない。
    ///
    /// 位置が番兵の駒は駒台に載せる。成駒であっても成っていない駒種として載る。
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        let mut on_board = vec![];
        let mut hands = Hands::default();

        for pc in pieces {
            if pc.is_captured() {
                hands[pc.side].put(pc.kind);
            } else {
                on_board.push(pc);
            }
        }

        Self { on_board, hands }
    }

    /// 全ての駒を正規順序で返す。駒台の駒が先に来る。
    pub fn pieces(&self) -> Vec<Piece> {
        let mut res = Vec::with_capacity(self.len());

        for side in Side::iter() {
            for pk in PieceKind::iter_hand() {
                let n = self.hands[side].count(pk);
                res.extend((0..n).map(|_| Piece::captured(pk, side)));
            }
        }
        res.extend_from_slice(&self.on_board);

        res.sort_unstable();
        res
    }

    /// 駒の総数を返す。
    pub fn len(&self) -> usize {
        let n_hand: u32 = self.hands.iter().map(Hand::total).sum();
        self.on_board.len() + n_hand as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 両陣営の駒台を返す。
    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// 指定したマスにある駒を返す。
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.on_board.iter().find(|pc| pc.position == pos)
    }

    /// 盤上の駒を正規順序に並べ替えた盤面を返す。
    ///
    /// 同じ局面なら、構築経路によらず同じ盤面になる。冪等。
    pub fn normalize(&self) -> Self {
        let mut on_board = self.on_board.clone();
        on_board.sort_unstable();

        Self {
            on_board,
            hands: self.hands,
        }
    }

    /// 盤面をハッシュ用のバイト列にする。
    ///
    /// 正規順序の各駒について [駒種, 陣営, 筋, 段] の 4 バイトを並べる。
    pub fn serialize(&self) -> Vec<u8> {
        self.pieces()
            .iter()
            .flat_map(|pc| {
                [
                    pc.kind.inner() as u8,
                    pc.side.inner() as u8,
                    pc.position.x(),
                    pc.position.y(),
                ]
            })
            .collect()
    }

    /// 盤面のキー(正規化したバイト列の SHA-256 の 16 進表記)を返す。
    ///
    /// 局面の同一性を表し、棋譜をまたいだ局面検索に使われる。
    pub fn to_key(&self) -> String {
        hex::encode(Sha256::digest(self.serialize()))
    }

    /// 指し手を適用した新しい盤面を返す。`self` は変更しない。
    ///
    /// 合法性チェックは一切行わない。棋譜と盤面が矛盾する場合はエラーを返す。
    pub fn apply_step(&self, step: &Step) -> Result<Self, ReplayError> {
        // 投了では駒は動かない。
        if step.finished {
            return Ok(self.clone());
        }

        let side = step.side();
        let mut next = self.clone();

        // 移動先に駒があれば取る。
        if let Some(idx) = next.index_at(step.destination) {
            let captured = next.on_board.swap_remove(idx);
            log_capture(step, &captured);
            next.hands[side].put(captured.kind);
        }

        let mut mover = if step.dropped {
            if !next.hands[side].take(step.piece_kind) {
                return Err(ReplayError::CapturedNotFound {
                    seq: step.seq,
                    side,
                    kind: step.piece_kind,
                });
            }
            Piece::captured(step.piece_kind, side)
        } else {
            let idx = next
                .index_at(step.origin)
                .ok_or(ReplayError::OriginNotFound {
                    seq: step.seq,
                    origin: step.origin,
                })?;
            let pc = next.on_board.swap_remove(idx);
            if pc.kind != step.piece_kind {
                log_kind_mismatch(step, &pc);
            }
            pc
        };

        mover.position = step.destination;

        if step.promoted {
            mover.kind = mover
                .kind
                .to_promoted()
                .ok_or(ReplayError::NotPromotable {
                    seq: step.seq,
                    kind: mover.kind,
                })?;
        }

        next.on_board.push(mover);

        Ok(next.normalize())
    }

    fn index_at(&self, pos: Position) -> Option<usize> {
        if pos.is_captured() {
            return None;
        }

        self.on_board.iter().position(|pc| pc.position == pos)
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces() == other.pieces()
    }
}

impl Eq for Board {}

impl From<Board> for Vec<Piece> {
    fn from(board: Board) -> Self {
        board.pieces()
    }
}

/// 外部から読み込んだ駒の列を検査して盤面にする。
impl TryFrom<Vec<Piece>> for Board {
    type Error = BoardError;

    fn try_from(pieces: Vec<Piece>) -> Result<Self, Self::Error> {
        if pieces.len() != Self::INIT.len() {
            return Err(BoardError::PieceCount(pieces.len()));
        }
        if let Some(&pc) = pieces.iter().find(|pc| !pc.is_valid()) {
            return Err(BoardError::InvalidPiece(pc));
        }

        let board = Self::from_pieces(pieces).normalize();

        // 正規化後は同じマスの駒が隣り合う。
        if let Some(w) = board
            .on_board
            .windows(2)
            .find(|w| w[0].position == w[1].position)
        {
            return Err(BoardError::SquareConflict(w[1].position));
        }

        Ok(board)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "後手 駒台: {}", self.hands[SECOND])?;

        for y in 1..=9 {
            for x in (1..=9).rev() {
                match self.piece_at(Position::new(x, y)) {
                    None => f.write_str("  ・")?,
                    Some(pc) => {
                        f.write_str(if pc.side == FIRST { " " } else { "v" })?;
                        // 成香などの 2 文字の駒名は 1 文字に詰める。
                        match pc.kind {
                            PRO_LANCE => f.write_str(" 杏")?,
                            PRO_KNIGHT => f.write_str(" 圭")?,
                            PRO_SILVER => f.write_str(" 全")?,
                            pk => write!(f, " {}", pk)?,
                        }
                    }
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "先手 駒台: {}", self.hands[FIRST])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        let board = Board::init();

        assert_eq!(board.len(), 40);
        for side in Side::iter() {
            assert_eq!(board.pieces().iter().filter(|pc| pc.side == side).count(), 20);
            assert!(board.hands()[side].is_empty());
        }
        assert_eq!(board.to_key(), Board::init().to_key());
        assert_eq!(board.to_key().len(), 64);
    }

    #[test]
    fn test_normalize_idempotent() {
        let board = Board::from_pieces(Board::INIT.iter().rev().copied());
        let once = board.normalize();
        let twice = once.normalize();

        assert_eq!(once.serialize(), twice.serialize());
        assert_eq!(board.serialize(), Board::init().serialize());
    }

    #[test]
    fn test_hand() {
        let mut hand = Hand::empty();
        hand.put(HORSE);
        hand.put(PAWN);
        hand.put(PAWN);

        assert_eq!(hand.count(BISHOP), 1);
        assert_eq!(hand.count(HORSE), 0);
        assert_eq!(hand.to_string(), "角歩2");
        assert!(hand.take(PAWN));
        assert!(hand.take(PAWN));
        assert!(!hand.take(PAWN));
        assert!(!hand.take(NO_PIECE_KIND));
        assert_eq!(hand.total(), 1);
    }

    #[test]
    fn test_hands_by_side() {
        let mut hands = Hands::default();
        hands[SECOND].put(DRAGON);

        assert!(hands[FIRST].is_empty());
        assert_eq!(hands[SECOND].count(ROOK), 1);
        assert_eq!(hands.iter().map(Hand::total).sum::<u32>(), 1);
    }

    #[test]
    fn test_promote_gold_fails() {
        let step = Step::new_walk(1, Position::new(6, 9), Position::new(6, 8), GOLD, true);

        assert_eq!(
            Board::init().apply_step(&step),
            Err(ReplayError::NotPromotable { seq: 1, kind: GOLD })
        );
    }

    #[test]
    fn test_promote_promoted_fails() {
        let board = Board::from_pieces([
            Piece::new(KING, FIRST, Position::new(5, 9)),
            Piece::new(DRAGON, FIRST, Position::new(2, 2)),
            Piece::new(KING, SECOND, Position::new(5, 1)),
        ]);
        let step = Step::new_walk(1, Position::new(2, 2), Position::new(2, 1), DRAGON, true);

        assert_eq!(
            board.apply_step(&step),
            Err(ReplayError::NotPromotable {
                seq: 1,
                kind: DRAGON
            })
        );
    }

    #[test]
    fn test_display() {
        let s = Board::init().to_string();
        let lines: Vec<_> = s.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "v 香v 桂v 銀v 金v 玉v 金v 銀v 桂v 香");
        assert_eq!(lines[9], "  香  桂  銀  金  玉  金  銀  桂  香");
    }
}
