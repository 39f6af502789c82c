//! 外部の検索インデックスに渡すエントリ。
//!
//! 棋譜を対局者名で、指し手を盤面キーで引けるようにするためのもの。

use serde::{Deserialize, Serialize};

use crate::kifu::Kifu;
use crate::shogi::*;

/// 棋譜 1 件分のエントリ。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KifuEntry {
    pub id: String,
    pub first_players: Vec<String>,
    pub second_players: Vec<String>,
    pub start_ts: i64,
    pub end_ts: i64,
    pub board_ids: Vec<String>,
    pub alias: bool,
}

impl KifuEntry {
    pub fn from_kifu(kifu: &Kifu) -> Self {
        let names = |side| {
            kifu.players_of(side)
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
        };

        Self {
            id: kifu.id(),
            first_players: names(FIRST),
            second_players: names(SECOND),
            start_ts: kifu.start_ts,
            end_ts: kifu.end_ts,
            board_ids: kifu.board_keys.clone(),
            alias: kifu.is_alias(),
        }
    }
}

/// 指し手 1 手分のエントリ。指し手前後の盤面キーを持つ。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StepEntry {
    pub kifu_id: String,
    pub seq: u32,
    pub finished: bool,
    pub board_id: String,
    pub prev_board_id: String,
    pub game_start_ts: i64,
}

impl StepEntry {
    /// 棋譜の全指し手のエントリを返す。
    ///
    /// `kifu` は正規化・再生済みでなければならない。再生されていなければ空を返す。
    pub fn from_kifu(kifu: &Kifu) -> Vec<Self> {
        if kifu.board_keys.len() != kifu.steps.len() + 1 {
            return vec![];
        }

        let kifu_id = kifu.id();

        kifu.steps
            .iter()
            .zip(kifu.board_keys.windows(2))
            .map(|(step, keys)| Self {
                kifu_id: kifu_id.clone(),
                seq: step.seq,
                finished: step.finished,
                board_id: keys[1].clone(),
                prev_board_id: keys[0].clone(),
                game_start_ts: kifu.start_ts,
            })
            .collect()
    }

    /// インデックス上の文書 ID。
    pub fn doc_id(&self) -> String {
        format!("STEP:{}:{}:{}", self.kifu_id, self.seq, self.finished)
    }
}
