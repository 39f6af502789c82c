//! 棋譜テキストの解析。
//!
//! 表形式(7 行固定ヘッダ)と KIF 形式(注釈つき)の 2 形式に対応する。
//! いずれも構文はチェックするが、合法性チェックは一切行わない。

mod kif;
mod table;
mod token;

pub use self::kif::*;
pub use self::table::*;

use clap::arg_enum;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::kifu::Kifu;
use crate::step::{Player, Step};

/// 棋譜ヘッダから得られる情報。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Header {
    pub start_ts: i64,
    pub end_ts: i64,
    pub handicap: String,
    pub game_name: String,
    pub players: Vec<Player>,
}

arg_enum! {
    /// 棋譜の表記形式。
    ///
    /// `Table` は 7 行固定ヘッダの表形式、`Kif` は注釈つきの KIF 形式。
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
    pub enum Notation {
        Table,
        Kif,
    }
}

impl Notation {
    /// 棋譜テキストを解析し、(ヘッダ, 指し手の列) を返す。
    pub fn parse(self, text: &str) -> Result<(Header, Vec<Step>), ParseError> {
        match self {
            Self::Table => parse_table(text),
            Self::Kif => parse_kif(text),
        }
    }

    /// 棋譜テキストを解析し、正規化した棋譜を返す。盤面キーは空。
    pub fn parse_kifu(self, text: &str) -> Result<Kifu, ParseError> {
        let (header, steps) = self.parse(text)?;

        Ok(Kifu::new(header, steps, self).normalize())
    }
}
