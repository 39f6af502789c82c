//! 両形式に共通する字句: ヘッダ行、日時、指し手行、消費時間。

use chrono::{NaiveDate, TimeZone as _, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, ParseErrorKind};
use crate::shogi::*;
use crate::step::Step;

/// ヘッダ行のラベルと値の区切り(全角コロン)。
pub const SEP: char = '：';

/// 投了を表す指し手トークン。
pub const RESIGN: &str = "投了";

/// 直前の指し手と同じ移動先を表す記号。
const SAME: &str = "同";

/// 指し手トークンの正規表現。
///
/// 移動先(または「同」)、駒名、成/不成、打、括弧つきの移動元からなる。
static MOVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let xs: String = Position::X_CHARS.iter().collect();
    let ys: String = Position::Y_CHARS.iter().collect();
    let names: Vec<_> = PieceKind::NAMES.iter().map(|(name, _)| *name).collect();

    let pattern = format!(
        r"^(?:([{}])([{}])|{})({})(不成|成)?(打)?(?:\(([1-9])([1-9])\))?$",
        xs,
        ys,
        SAME,
        names.join("|")
    );

    Regex::new(&pattern).expect("move pattern must compile")
});

static DATE_KANJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)年(\d+)月(\d+)日\((\S)\) (\d+):(\d+):(\d+)").expect("date pattern")
});

static DATE_SLASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)/(\d+)/(\d+)\s+(\d+):(\d+):(\d+)$").expect("date pattern")
});

/// 行を 1 行ずつ読み進めるカーソル。行番号は 1 始まり。
#[derive(Debug)]
pub(crate) struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        // BOM つきのファイルもある。
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    /// 次の行を (行番号, 内容) で返す。入力の終わりならエラー。
    pub(crate) fn next_line(&mut self) -> Result<(usize, &'a str), ParseError> {
        let line = self.lines.get(self.pos).copied().ok_or_else(|| {
            ParseError::new(self.pos + 1, "", ParseErrorKind::UnexpectedEof)
        })?;
        self.pos += 1;

        Ok((self.pos, line))
    }

    /// 次の空行でない行を返す。入力の終わりなら `None`。
    pub(crate) fn next_nonblank(&mut self) -> Option<(usize, &'a str)> {
        while let Some(&line) = self.lines.get(self.pos) {
            self.pos += 1;
            if !line.trim().is_empty() {
                return Some((self.pos, line));
            }
        }

        None
    }

    /// 次の行を読み進めずに返す。
    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }
}

/// ヘッダ行を (ラベル, 値) に分ける。値の前後の空白は除く。
pub(crate) fn split_header(lineno: usize, line: &str) -> Result<(&str, &str), ParseError> {
    line.split_once(SEP)
        .map(|(label, value)| (label.trim(), value.trim()))
        .ok_or_else(|| ParseError::new(lineno, line, ParseErrorKind::MissingSeparator))
}

/// `YYYY年MM月DD日(曜) HH:MM:SS` 形式の日時を Unix 秒に変換する。
///
/// タイムゾーンの情報はないので UTC とみなす。
pub(crate) fn parse_date_kanji(s: &str) -> Option<i64> {
    let caps = DATE_KANJI.captures(s)?;

    to_timestamp([1, 2, 3, 5, 6, 7].map(|i| &caps[i]))
}

/// 日時を Unix 秒に変換する。
///
/// `parse_date_kanji` の形式に加えて `YYYY/MM/DD HH:MM:SS` も受け付ける。
pub(crate) fn parse_date(s: &str) -> Option<i64> {
    parse_date_kanji(s).or_else(|| {
        let caps = DATE_SLASH.captures(s.trim())?;
        to_timestamp([1, 2, 3, 4, 5, 6].map(|i| &caps[i]))
    })
}

/// [年, 月, 日, 時, 分, 秒] を UTC として Unix 秒にする。
fn to_timestamp(fields: [&str; 6]) -> Option<i64> {
    let [year, month, day, hour, min, sec] = fields;
    let dt = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?
        .and_hms_opt(hour.parse().ok()?, min.parse().ok()?, sec.parse().ok()?)?;

    Some(Utc.from_utc_datetime(&dt).timestamp())
}

/// 消費時間 `MM:SS/HH:MM:SS` を (消費時間, 累計消費時間) の秒数に変換する。
///
/// 前後の空白、括弧、変化記号 '+' は無視する。
pub(crate) fn parse_clock(s: &str) -> Option<(u32, u32)> {
    let s = s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '+'));
    let (thinking, total) = s.split_once('/')?;

    let thinking: Vec<u32> = thinking
        .trim()
        .split(':')
        .map(|t| t.trim().parse().ok())
        .collect::<Option<_>>()?;
    let total: Vec<u32> = total
        .trim()
        .split(':')
        .map(|t| t.trim().parse().ok())
        .collect::<Option<_>>()?;

    match (thinking.as_slice(), total.as_slice()) {
        (&[tm, ts], &[h, m, s]) => Some((to_sec(&[tm, ts])?, to_sec(&[h, m, s])?)),
        _ => None,
    }
}

/// `[.., 時, 分, 秒]` を秒数にする。溢れたら `None`。
fn to_sec(fields: &[u32]) -> Option<u32> {
    fields
        .iter()
        .try_fold(0_u32, |acc, &x| acc.checked_mul(60)?.checked_add(x))
}

/// 指し手トークンの解析結果。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MoveToken {
    pub destination: Position,
    pub origin: Position,
    pub piece_kind: PieceKind,
    pub promoted: bool,
    pub dropped: bool,
    pub finished: bool,
}

/// 指し手トークンを解析する。
///
/// `prev_destination` は直前の指し手の移動先で、「同」の解決に使う。
pub(crate) fn parse_move_token(
    token: &str,
    prev_destination: Option<Position>,
) -> Result<MoveToken, ParseErrorKind> {
    if token == RESIGN {
        return Ok(MoveToken {
            destination: Position::CAPTURED,
            origin: Position::CAPTURED,
            piece_kind: NO_PIECE_KIND,
            promoted: false,
            dropped: false,
            finished: true,
        });
    }

    let caps = match MOVE_PATTERN.captures(token) {
        Some(caps) => caps,
        None => return Err(classify_move_failure(token)),
    };

    let destination = match (caps.get(1), caps.get(2)) {
        (Some(x), Some(y)) => {
            let x = x.as_str().chars().next().and_then(Position::x_from_char);
            let y = y.as_str().chars().next().and_then(Position::y_from_char);
            match (x, y) {
                (Some(x), Some(y)) => Position::new(x, y),
                _ => return Err(ParseErrorKind::InvalidMoveToken),
            }
        }
        _ => prev_destination.ok_or(ParseErrorKind::InvalidMoveToken)?,
    };

    let piece_kind = PieceKind::from_name(&caps[3]).ok_or(ParseErrorKind::UnknownPiece)?;
    let promoted = caps.get(4).map_or(false, |m| m.as_str() == "成");
    let dropped = caps.get(5).is_some();

    let origin = match (caps.get(6), caps.get(7)) {
        (Some(x), Some(y)) => {
            let x = x.as_str().parse().map_err(|_| ParseErrorKind::InvalidMoveToken)?;
            let y = y.as_str().parse().map_err(|_| ParseErrorKind::InvalidMoveToken)?;
            Some(Position::checked_new(x, y).ok_or(ParseErrorKind::InvalidMoveToken)?)
        }
        _ => None,
    };

    // 移動元は駒打ちのときに限って省略される。
    let origin = match (origin, dropped) {
        (Some(origin), false) => origin,
        (None, true) => Position::CAPTURED,
        _ => return Err(ParseErrorKind::OriginMismatch),
    };

    Ok(MoveToken {
        destination,
        origin,
        piece_kind,
        promoted,
        dropped,
        finished: false,
    })
}

/// 正規表現にマッチしなかった指し手トークンについて、駒名が未知なのかどうかを判定する。
fn classify_move_failure(token: &str) -> ParseErrorKind {
    let rest = token.strip_prefix(SAME).or_else(|| {
        let mut it = token.chars();
        let x = Position::x_from_char(it.next()?);
        let y = Position::y_from_char(it.next()?);
        (x.is_some() && y.is_some()).then(|| it.as_str())
    });

    let known = |rest: &str| {
        PieceKind::NAMES
            .iter()
            .any(|&(name, _)| rest.starts_with(name))
    };

    match rest {
        Some(rest) if !rest.is_empty() && !known(rest) => ParseErrorKind::UnknownPiece,
        _ => ParseErrorKind::InvalidMoveToken,
    }
}

/// 指し手行(手数、指し手、消費時間)を解析する。
///
/// フィールドは空白の連続で区切られる。消費時間は括弧と空白で区切られていてもよい。
pub(crate) fn parse_step_line(
    lineno: usize,
    line: &str,
    prev_destination: Option<Position>,
) -> Result<Step, ParseError> {
    let err = |kind| ParseError::new(lineno, line, kind);

    // 「同　歩」の全角空白は区切りではない。
    let normalized = line.replace("同\u{3000}", SAME);
    let mut fields = normalized.split_whitespace();

    let seq: u32 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .filter(|&seq| seq >= 1)
        .ok_or_else(|| err(ParseErrorKind::InvalidSeq))?;

    let token = fields
        .next()
        .ok_or_else(|| err(ParseErrorKind::InvalidMoveToken))?;
    let mv = parse_move_token(token, prev_destination).map_err(err)?;

    let rest: Vec<_> = fields.collect();
    let (thinking_sec, cumulative_sec) =
        parse_clock(&rest.join(" ")).ok_or_else(|| err(ParseErrorKind::InvalidClock))?;

    Ok(Step {
        seq,
        destination: mv.destination,
        origin: mv.origin,
        piece_kind: mv.piece_kind,
        promoted: mv.promoted,
        dropped: mv.dropped,
        finished: mv.finished,
        thinking_sec,
        cumulative_sec,
        notes: vec![],
    })
}
