//! 表形式の棋譜。
//!
//! ```text
//! 開始日時：2019/03/04 20:00:00
//! 終了日時：2019/03/04 21:30:00
//! 手合割：平手
//! 棋戦：研究会
//! 先手：田中
//! 後手：佐藤
//! 手数----指手---------消費時間--
//!    1 ７六歩(77)   ( 0:03/00:00:03)
//! ```

use crate::error::{ParseError, ParseErrorKind};
use crate::shogi::*;
use crate::step::{Player, Step};

use super::token::*;
use super::Header;

/// 表形式の棋譜テキストを解析する。
pub fn parse_table(text: &str) -> Result<(Header, Vec<Step>), ParseError> {
    let mut cursor = LineCursor::new(text);

    let start_ts = read_date(&mut cursor)?;
    let end_ts = read_date(&mut cursor)?;
    let handicap = read_echo(&mut cursor)?;
    let game_name = read_echo(&mut cursor)?;
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

fn read_date(cursor: &mut LineCursor) -> Result<i64, ParseError> {
    let (lineno, line) = cursor.next_line()?;
    let (_, value) = split_header(lineno, line)?;

    parse_date(value).ok_or_else(|| ParseError::new(lineno, line, ParseErrorKind::InvalidDate))
}

/// ラベルつきなら値を、そうでなければ行全体を返す。
fn read_echo(cursor: &mut LineCursor) -> Result<String, ParseError> {
    let (_, line) = cursor.next_line()?;

    let value = line
        .split_once(SEP)
        .map_or(line, |(_, value)| value)
        .trim();

    Ok(value.to_owned())
}

/// 陣営は行の位置で決まる。ラベルは見ない。
fn read_player(cursor: &mut LineCursor, side: Side) -> Result<Player, ParseError> {
    let (lineno, line) = cursor.next_line()?;
    let (_, name) = split_header(lineno, line)?;

    Ok(Player::new(side, name, None))
}

/// 入力の終わりか投了まで指し手を読む。空行は飛ばす。
fn read_steps(cursor: &mut LineCursor) -> Result<Vec<Step>, ParseError> {
    let mut steps = Vec::<Step>::new();

    while let Some((lineno, line)) = cursor.next_nonblank() {
        let prev_destination = steps.last().map(|step| step.destination);
        let step = parse_step_line(lineno, line, prev_destination)?;
        let finished = step.finished;
        steps.push(step);

        if finished {
            break;
        }
    }

    Ok(steps)
}
