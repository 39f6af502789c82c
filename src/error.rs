//! 棋譜の解析エラーと、盤面再生時の不整合エラー。

use thiserror::Error;

use crate::shogi::*;

/// 棋譜テキストの解析エラー。1 つの棋譜の解析のみを打ち切る。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("line {line}: {kind}: {text:?}")]
pub struct ParseError {
    /// 問題のある行番号(1 始まり)。
    pub line: usize,
    /// 問題のある行(またはフィールド)の内容。
    pub text: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, text: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("header separator not found")]
    MissingSeparator,
    #[error("date does not match the expected pattern")]
    InvalidDate,
    #[error("malformed clock field")]
    InvalidClock,
    #[error("malformed move number")]
    InvalidSeq,
    #[error("malformed move token")]
    InvalidMoveToken,
    #[error("unknown piece name")]
    UnknownPiece,
    #[error("origin square must be present exactly when the move is not a drop")]
    OriginMismatch,
}

/// 指し手の並びが盤面と矛盾している。その棋譜の再生全体を失敗させる。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ReplayError {
    #[error("move {seq}: no piece at origin {origin}")]
    OriginNotFound { seq: u32, origin: Position },
    #[error("move {seq}: {side} has no captured {kind} to drop")]
    CapturedNotFound {
        seq: u32,
        side: Side,
        kind: PieceKind,
    },
    #[error("move {seq}: {kind} cannot be promoted")]
    NotPromotable { seq: u32, kind: PieceKind },
}

/// 直列化された盤面が不正。外部から読み込んだ盤面の検査で使う。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BoardError {
    #[error("board must have 40 pieces, got {0}")]
    PieceCount(usize),
    #[error("invalid piece: {0:?}")]
    InvalidPiece(Piece),
    #[error("two pieces on {0}")]
    SquareConflict(Position),
}
