//! 将棋の基本要素たち。
//!
//! 陣営、駒種などは enum ではなく、いわゆる newtype で表現する。
//! 駒種の内部値は成駒を容易に求められるように割り当ててある。
//!
//! マスは筋 `x`, 段 `y` の組で表し、いずれも 1..=9 の値をとる。
//! ただし (0, 0) は「盤上にない」ことを表す番兵であり、駒台の駒の位置、駒打ちの移動元、
//! 投了の移動先に使われる。

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

/// 陣営。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Side(u32);

pub const FIRST: Side = Side(0);
pub const SECOND: Side = Side(1);

impl Side {
    /// 有効値かどうかを返す。
    pub const fn is_valid(self) -> bool {
        self.0 == FIRST.0 || self.0 == SECOND.0
    }

    /// 敵陣営を返す。
    pub const fn flip(self) -> Side {
        Self(self.0 ^ 1)
    }

    /// 手数に対応する陣営を返す。奇数手目は先手、偶数手目は後手。
    pub const fn from_seq(seq: u32) -> Side {
        if seq % 2 == 1 {
            FIRST
        } else {
            SECOND
        }
    }

    /// 表示用ラベルを返す。棋譜ヘッダのラベルとしても使われる。
    pub const fn label(self) -> &'static str {
        match self.0 {
            0 => "先手",
            1 => "後手",
            _ => "無効な陣営",
        }
    }

    /// 陣営を昇順に列挙する。(`FIRST`、`SECOND` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [FIRST, SECOND].into_iter()
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> u32 {
        self.0
    }
}

impl From<Side> for usize {
    fn from(side: Side) -> Self {
        debug_assert!(side.is_valid());

        side.0 as Self
    }
}

impl std::fmt::Debug for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            FIRST => write!(f, "FIRST"),
            SECOND => write!(f, "SECOND"),
            _ => write!(f, "Side({})", self.0),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            FIRST | SECOND => f.write_str(self.label()),
            side => write!(f, "無効な陣営({})", side.0),
        }
    }
}

/// 駒種(陣営の区別なし)。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct PieceKind(u32);

// 値が連続で、かつ (1 << 3) を OR することで成駒になる。

pub const NO_PIECE_KIND: PieceKind = PieceKind(0);
pub const PAWN: PieceKind = PieceKind(1);
pub const LANCE: PieceKind = PieceKind(2);
pub const KNIGHT: PieceKind = PieceKind(3);
pub const SILVER: PieceKind = PieceKind(4);
pub const BISHOP: PieceKind = PieceKind(5);
pub const ROOK: PieceKind = PieceKind(6);
pub const GOLD: PieceKind = PieceKind(7);
pub const KING: PieceKind = PieceKind(8);
pub const PRO_PAWN: PieceKind = PieceKind(9);
pub const PRO_LANCE: PieceKind = PieceKind(10);
pub const PRO_KNIGHT: PieceKind = PieceKind(11);
pub const PRO_SILVER: PieceKind = PieceKind(12);
pub const HORSE: PieceKind = PieceKind(13);
pub const DRAGON: PieceKind = PieceKind(14);

impl PieceKind {
    /// 棋譜中の駒名と駒種の対応表。別表記も含む。
    ///
    /// 正規表現の選択肢として使うので、前方一致しうる名前は長いものを先に置く。
    pub const NAMES: [(&'static str, PieceKind); 19] = [
        ("成銀", PRO_SILVER),
        ("成桂", PRO_KNIGHT),
        ("成香", PRO_LANCE),
        ("玉", KING),
        ("王", KING),
        ("飛", ROOK),
        ("角", BISHOP),
        ("金", GOLD),
        ("銀", SILVER),
        ("桂", KNIGHT),
        ("香", LANCE),
        ("歩", PAWN),
        ("龍", DRAGON),
        ("竜", DRAGON),
        ("馬", HORSE),
        ("と", PRO_PAWN),
        ("全", PRO_SILVER),
        ("圭", PRO_KNIGHT),
        ("杏", PRO_LANCE),
    ];

    /// 有効値かどうかを返す。`NO_PIECE_KIND` も有効とみなす。
    pub const fn is_valid(self) -> bool {
        NO_PIECE_KIND.0 <= self.0 && self.0 <= DRAGON.0
    }

    /// 有効値かつ実際の駒かどうかを返す。`NO_PIECE_KIND` は実際の駒ではない。
    pub const fn is_piece(self) -> bool {
        PAWN.0 <= self.0 && self.0 <= DRAGON.0
    }

    /// 成れる駒種かどうかを返す。
    pub const fn is_promotable(self) -> bool {
        PAWN.0 <= self.0 && self.0 <= ROOK.0
    }

    /// 成駒かどうかを返す。
    pub const fn is_promoted(self) -> bool {
        PRO_PAWN.0 <= self.0 && self.0 <= DRAGON.0
    }

    /// 成った駒種を返す。成れない駒種(玉、金、成駒)なら `None` を返す。
    pub const fn to_promoted(self) -> Option<Self> {
        if self.is_promotable() {
            Some(Self(self.0 | (1 << 3)))
        } else {
            None
        }
    }

    /// 成っていない駒種を返す。成駒でなければ `self` をそのまま返す。
    pub const fn to_unpromoted(self) -> Self {
        if self.is_promoted() {
            Self(self.0 & 7)
        } else {
            self
        }
    }

    /// 棋譜中の駒名から駒種を得る。
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(s, _)| *s == name)
            .map(|&(_, pk)| pk)
    }

    /// 実際の駒である駒種を昇順に列挙する。
    pub fn iter_piece(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        // ExactSizeIterator にするため、配列をベタ書きする。
        [
            PAWN, LANCE, KNIGHT, SILVER, BISHOP, ROOK, GOLD, KING, PRO_PAWN, PRO_LANCE, PRO_KNIGHT,
            PRO_SILVER, HORSE, DRAGON,
        ]
        .into_iter()
    }

    /// 駒台に載りうる駒種を昇順に列挙する。
    pub fn iter_hand(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [PAWN, LANCE, KNIGHT, SILVER, BISHOP, ROOK, GOLD, KING].into_iter()
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> u32 {
        self.0
    }
}

impl From<PieceKind> for usize {
    fn from(pk: PieceKind) -> Self {
        debug_assert!(pk.is_valid());

        pk.0 as Self
    }
}

impl std::fmt::Debug for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            NO_PIECE_KIND => write!(f, "NO_PIECE_KIND"),
            PAWN => write!(f, "PAWN"),
            LANCE => write!(f, "LANCE"),
            KNIGHT => write!(f, "KNIGHT"),
            SILVER => write!(f, "SILVER"),
            BISHOP => write!(f, "BISHOP"),
            ROOK => write!(f, "ROOK"),
            GOLD => write!(f, "GOLD"),
            KING => write!(f, "KING"),
            PRO_PAWN => write!(f, "PRO_PAWN"),
            PRO_LANCE => write!(f, "PRO_LANCE"),
            PRO_KNIGHT => write!(f, "PRO_KNIGHT"),
            PRO_SILVER => write!(f, "PRO_SILVER"),
            HORSE => write!(f, "HORSE"),
            DRAGON => write!(f, "DRAGON"),
            _ => write!(f, "PieceKind({})", self.0),
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            NO_PIECE_KIND => write!(f, "・"),
            PAWN => write!(f, "歩"),
            LANCE => write!(f, "香"),
            KNIGHT => write!(f, "桂"),
            SILVER => write!(f, "銀"),
            BISHOP => write!(f, "角"),
            ROOK => write!(f, "飛"),
            GOLD => write!(f, "金"),
            KING => write!(f, "玉"),
            PRO_PAWN => write!(f, "と"),
            PRO_LANCE => write!(f, "成香"),
            PRO_KNIGHT => write!(f, "成桂"),
            PRO_SILVER => write!(f, "成銀"),
            HORSE => write!(f, "馬"),
            DRAGON => write!(f, "龍"),
            _ => write!(f, "無効な駒種({})", self.0),
        }
    }
}

/// 盤面のマス、または盤上にないことを表す番兵。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// 盤上にないことを表す番兵。
    pub const CAPTURED: Position = Position { x: 0, y: 0 };

    /// 筋の表記(全角数字)。
    pub const X_CHARS: [char; 9] = ['１', '２', '３', '４', '５', '６', '７', '８', '９'];

    /// 段の表記(漢数字)。
    pub const Y_CHARS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

    /// 筋と段からマスを作る。盤面外の値を渡してはならない。
    pub const fn new(x: u8, y: u8) -> Self {
        debug_assert!(1 <= x && x <= 9);
        debug_assert!(1 <= y && y <= 9);

        Self { x, y }
    }

    /// 筋と段からマスを作る。盤面外なら `None` を返す。
    pub const fn checked_new(x: u8, y: u8) -> Option<Self> {
        if 1 <= x && x <= 9 && 1 <= y && y <= 9 {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// 筋の表記文字から筋を得る。
    pub fn x_from_char(c: char) -> Option<u8> {
        Self::X_CHARS
            .iter()
            .position(|&x| x == c)
            .map(|i| i as u8 + 1)
    }

    /// 段の表記文字から段を得る。
    pub fn y_from_char(c: char) -> Option<u8> {
        Self::Y_CHARS
            .iter()
            .position(|&y| y == c)
            .map(|i| i as u8 + 1)
    }

    pub const fn x(self) -> u8 {
        self.x
    }

    pub const fn y(self) -> u8 {
        self.y
    }

    /// 番兵かどうかを返す。
    pub const fn is_captured(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match Self::checked_new(self.x, self.y) {
            Some(pos) => write!(
                f,
                "{}{}",
                Self::X_CHARS[usize::from(pos.x - 1)],
                Self::Y_CHARS[usize::from(pos.y - 1)]
            ),
            None if self.is_captured() => f.write_str("駒台"),
            None => write!(f, "無効なマス({}, {})", self.x, self.y),
        }
    }
}

/// 駒。物理的な 1 枚の駒を表す。
///
/// 位置が `Position::CAPTURED` であることと、駒台にあることは同値。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub position: Position,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side, position: Position) -> Self {
        debug_assert!(kind.is_piece());

        Self {
            kind,
            side,
            position,
        }
    }

    /// 駒台の駒を作る。
    pub const fn captured(kind: PieceKind, side: Side) -> Self {
        Self::new(kind, side, Position::CAPTURED)
    }

    /// 駒台にあるかどうかを返す。
    pub const fn is_captured(&self) -> bool {
        self.position.is_captured()
    }

    /// 陣営、駒種、位置がいずれも有効かどうかを返す。
    pub const fn is_valid(&self) -> bool {
        let on_board = Position::checked_new(self.position.x, self.position.y).is_some();

        self.side.is_valid() && self.kind.is_piece() && (on_board || self.is_captured())
    }

    /// 正規順序のキー。段、筋、陣営、駒種の順に比較する。
    ///
    /// 駒台の駒は番兵 (0, 0) を持つので、常に盤上の駒より前に来る。
    fn sort_key(&self) -> (u8, u8, Side, PieceKind) {
        (self.position.y, self.position.x, self.side, self.kind)
    }
}

impl Ord for Piece {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Piece {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}{}", self.side, self.position, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_table() {
        let pairs = [
            (SILVER, PRO_SILVER),
            (KNIGHT, PRO_KNIGHT),
            (LANCE, PRO_LANCE),
            (BISHOP, HORSE),
            (ROOK, DRAGON),
            (PAWN, PRO_PAWN),
        ];
        for (raw, promoted) in pairs {
            assert_eq!(raw.to_promoted(), Some(promoted));
            assert_eq!(promoted.to_unpromoted(), raw);
            assert_eq!(raw.to_unpromoted(), raw);
            assert_eq!(promoted.to_promoted(), None);
        }

        assert_eq!(KING.to_promoted(), None);
        assert_eq!(GOLD.to_promoted(), None);
        assert_eq!(KING.to_unpromoted(), KING);
        assert_eq!(GOLD.to_unpromoted(), GOLD);
    }

    #[test]
    fn test_side() {
        assert_eq!(FIRST.flip(), SECOND);
        assert_eq!(SECOND.flip(), FIRST);
        assert_eq!(Side::from_seq(1), FIRST);
        assert_eq!(Side::from_seq(2), SECOND);
        assert_eq!(FIRST.to_string(), "先手");
    }

    #[test]
    fn test_piece_names() {
        assert_eq!(PieceKind::from_name("成銀"), Some(PRO_SILVER));
        assert_eq!(PieceKind::from_name("竜"), Some(DRAGON));
        assert_eq!(PieceKind::from_name("王"), Some(KING));
        assert_eq!(PieceKind::from_name("象"), None);

        // 正式名は全て表示名と一致する。
        for pk in PieceKind::iter_piece() {
            assert_eq!(PieceKind::from_name(&pk.to_string()), Some(pk));
        }
    }

    #[test]
    fn test_position() {
        assert_eq!(Position::new(7, 6).to_string(), "７六");
        assert_eq!(Position::CAPTURED.to_string(), "駒台");
        assert_eq!(Position::x_from_char('９'), Some(9));
        assert_eq!(Position::y_from_char('一'), Some(1));
        assert_eq!(Position::checked_new(0, 5), None);
    }

    #[test]
    fn test_piece_order() {
        let captured = Piece::captured(GOLD, SECOND);
        let top = Piece::new(LANCE, SECOND, Position::new(9, 1));
        let bottom = Piece::new(LANCE, FIRST, Position::new(1, 9));

        assert!(captured < top);
        assert!(top < bottom);
        assert!(Piece::captured(PAWN, FIRST) < Piece::captured(PAWN, SECOND));
    }

    #[test]
    fn test_piece_valid() {
        assert!(Piece::new(PAWN, FIRST, Position::new(7, 7)).is_valid());
        assert!(Piece::captured(ROOK, SECOND).is_valid());

        let pc = Piece::new(PAWN, FIRST, Position::new(7, 7));
        assert!(!Piece { side: Side(5), ..pc }.is_valid());
        assert!(!Piece { kind: PieceKind(99), ..pc }.is_valid());
        assert!(!Piece { kind: NO_PIECE_KIND, ..pc }.is_valid());
        assert!(!Piece { position: Position { x: 10, y: 1 }, ..pc }.is_valid());
        assert!(!Piece { position: Position { x: 0, y: 3 }, ..pc }.is_valid());
    }
}
