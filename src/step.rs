//! 棋譜の表記形式によらない指し手と対局者。

use serde::{Deserialize, Serialize};

use crate::shogi::*;

/// 指し手 1 手分の記録。
///
/// 陣営は手数の偶奇から決まるので、フィールドとしては持たない。
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 手数(1 始まり)。
    pub seq: u32,
    /// 移動先。投了なら番兵。
    pub destination: Position,
    /// 移動元。駒打ちなら番兵。
    pub origin: Position,
    /// 棋譜に書かれた駒種。投了なら `NO_PIECE_KIND`。
    pub piece_kind: PieceKind,
    pub promoted: bool,
    pub dropped: bool,
    /// 投了のときのみ真。
    pub finished: bool,
    /// この手の消費時間(秒)。
    pub thinking_sec: u32,
    /// この手までの累計消費時間(秒)。
    pub cumulative_sec: u32,
    /// 指し手に付けられた注釈。
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Step {
    /// 盤上の駒を動かす指し手を作る。
    pub fn new_walk(
        seq: u32,
        origin: Position,
        destination: Position,
        piece_kind: PieceKind,
        promoted: bool,
    ) -> Self {
        debug_assert!(!origin.is_captured());
        debug_assert!(!destination.is_captured());

        Self {
            seq,
            destination,
            origin,
            piece_kind,
            promoted,
            dropped: false,
            finished: false,
            thinking_sec: 0,
            cumulative_sec: 0,
            notes: vec![],
        }
    }

    /// 駒打ちの指し手を作る。
    pub fn new_drop(seq: u32, destination: Position, piece_kind: PieceKind) -> Self {
        debug_assert!(!destination.is_captured());

        Self {
            seq,
            destination,
            origin: Position::CAPTURED,
            piece_kind,
            promoted: false,
            dropped: true,
            finished: false,
            thinking_sec: 0,
            cumulative_sec: 0,
            notes: vec![],
        }
    }

    /// 投了を作る。
    pub fn new_resign(seq: u32) -> Self {
        Self {
            seq,
            destination: Position::CAPTURED,
            origin: Position::CAPTURED,
            piece_kind: NO_PIECE_KIND,
            promoted: false,
            dropped: false,
            finished: true,
            thinking_sec: 0,
            cumulative_sec: 0,
            notes: vec![],
        }
    }

    /// 消費時間を設定する。
    pub fn with_clock(mut self, thinking_sec: u32, cumulative_sec: u32) -> Self {
        self.thinking_sec = thinking_sec;
        self.cumulative_sec = cumulative_sec;
        self
    }

    /// 指した陣営を返す。
    pub const fn side(&self) -> Side {
        Side::from_seq(self.seq)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mark = if self.side() == FIRST { "▲" } else { "△" };
        write!(f, "{} {}", self.seq, mark)?;

        if self.finished {
            return f.write_str("投了");
        }

        write!(f, "{}{}", self.destination, self.piece_kind)?;
        if self.promoted {
            f.write_str("成")?;
        }
        if self.dropped {
            f.write_str("打")?;
        } else {
            write!(f, "({}{})", self.origin.x(), self.origin.y())?;
        }

        Ok(())
    }
}

/// 対局者。
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    pub name: String,
    /// 所属などの付記。
    #[serde(default)]
    pub note: Option<String>,
}

impl Player {
    pub fn new(side: Side, name: impl Into<String>, note: Option<String>) -> Self {
        Self {
            side,
            name: name.into(),
            note,
        }
    }
}
