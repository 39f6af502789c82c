//! KIF 形式の棋譜。
//!
//! ```text
//! # ---- Kifu for Windows V7 棋譜ファイル ----
//! 棋戦：練習対局
//! 開始日時：2018年01月02日(火) 10:00:00
//! 終了日時：2018年01月02日(火) 11:00:00
//! 手合割：平手
//! 先手：山田太郎(東京支部)
//! 後手：鈴木花子(大阪支部)
//! 手数----指手---------消費時間--
//!    1 ７六歩(77)   ( 0:03/00:00:03)
//! *#角道を開ける
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, ParseErrorKind};
use crate::shogi::*;
use crate::step::{Player, Step};

use super::token::*;
use super::Header;

/// 指し手の直後に続く注釈行の接頭辞。
const NOTE_PREFIX: &str = "*#";

/// `名前(備考)` 形式の対局者。
static PLAYER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\((.+)\)$").expect("player pattern"));

/// KIF 形式の棋譜テキストを解析する。
pub fn parse_kif(text: &str) -> Result<(Header, Vec<Step>), ParseError> {
    let mut cursor = LineCursor::new(text);

    cursor.next_line()?; // コメント
    let game_name = read_header(&mut cursor)?;
    let start_ts = read_date(&mut cursor)?;
    let end_ts = read_date(&mut cursor)?;
    let handicap = read_header(&mut cursor)?;
    let players = Side::iter()
        .map(|side| read_player(&mut cursor, side))
        .collect::<Result<Vec<_>, _>>()?;
    cursor.next_line()?; // 指し手の見出し

    let steps = read_steps(&mut cursor)?;

    let header = Header {
        start_ts,
        end_ts,
        handicap,
        game_name,
        players,
    };

    Ok((header, steps))
}

fn read_header(cursor: &mut LineCursor) -> Result<String, ParseError> {
    let (lineno, line) = cursor.next_line()?;
    let (_, value) = split_header(lineno, line)?;

    Ok(value.to_owned())
}

fn read_date(cursor: &mut LineCursor) -> Result<i64, ParseError> {
    let (lineno, line) = cursor.next_line()?;
    let (_, value) = split_header(lineno, line)?;

    parse_date_kanji(value)
        .ok_or_else(|| ParseError::new(lineno, line, ParseErrorKind::InvalidDate))
}

/// 備考は省略されていてもよい。
fn read_player(cursor: &mut LineCursor, side: Side) -> Result<Player, ParseError> {
    let (lineno, line) = cursor.next_line()?;
    let (_, value) = split_header(lineno, line)?;

    let player = match PLAYER_PATTERN.captures(value) {
        Some(caps) => Player::new(side, &caps[1], Some(caps[2].to_owned())),
        None => Player::new(side, value, None),
    };

    Ok(player)
}

/// 入力の終わりか投了まで指し手を読む。
fn read_steps(cursor: &mut LineCursor) -> Result<Vec<Step>, ParseError> {
    let mut steps = Vec::<Step>::new();

    while let Some((lineno, line)) = cursor.next_nonblank() {
        let prev_destination = steps.last().map(|step| step.destination);
        let mut step = parse_step_line(lineno, line, prev_destination)?;
        step.notes = read_notes(cursor);

        let finished = step.finished;
        steps.push(step);

        if finished {
            break;
        }
    }

    Ok(steps)
}

fn read_notes(cursor: &mut LineCursor) -> Vec<String> {
    let mut notes = vec![];

    while let Some(note) = cursor
        .peek()
        .and_then(|line| line.trim_start().strip_prefix(NOTE_PREFIX))
    {
        notes.push(note.trim().to_owned());
        cursor.next_nonblank();
    }

    notes
}
