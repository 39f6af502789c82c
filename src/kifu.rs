//! 棋譜。ヘッダ情報、指し手の列、そこから導かれる盤面キーの列からなる。

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::board::Board;
use crate::error::ReplayError;
use crate::mylog::*;
use crate::notation::{Header, Notation};
use crate::shogi::Side;
use crate::step::{Player, Step};

/// 棋譜。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Kifu {
    /// 対局開始時刻(Unix 秒)。
    pub start_ts: i64,
    /// 対局終了時刻(Unix 秒)。
    pub end_ts: i64,
    pub handicap: String,
    pub game_name: String,
    /// 対局者。正規化後は陣営順。
    pub players: Vec<Player>,
    /// 指し手。正規化後は手数順。
    pub steps: Vec<Step>,
    /// 初期盤面および各指し手適用後の盤面キー。再生後は `steps.len() + 1` 個。
    #[serde(default)]
    pub board_keys: Vec<String>,
    /// 別の棋譜の別名である場合、その棋譜 ID。
    #[serde(default)]
    pub alias: Option<String>,
    /// この棋譜を生成した表記形式。
    pub format: Notation,
}

impl Kifu {
    /// 解析結果から棋譜を作る。盤面キーは空。
    pub fn new(header: Header, steps: Vec<Step>, format: Notation) -> Self {
        Self {
            start_ts: header.start_ts,
            end_ts: header.end_ts,
            handicap: header.handicap,
            game_name: header.game_name,
            players: header.players,
            steps,
            board_keys: vec![],
            alias: None,
            format,
        }
    }

    /// 棋譜 ID を返す。
    ///
    /// 開始時刻と対局者名のみから決まるので、同じヘッダを持つ棋譜を再解析しても変わらない。
    pub fn id(&self) -> String {
        let names: Vec<_> = self.players.iter().map(|p| p.name.as_str()).collect();
        let src = format!("{}:{}", self.start_ts, names.join("-"));

        hex::encode(Sha256::digest(src.as_bytes()))
    }

    /// 対局者を陣営順に、指し手を手数順に並べ替える。冪等。
    pub fn normalize(mut self) -> Self {
        self.players.sort_by_key(|p| p.side);
        self.steps.sort_by_key(|step| step.seq);
        self
    }

    /// 指定した陣営の対局者を返す。
    pub fn players_of(&self, side: Side) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.side == side)
    }

    /// 別名を設定する。
    pub fn set_alias(&mut self, target_id: impl Into<String>) {
        self.alias = Some(target_id.into());
    }

    /// 別名かどうかを返す。
    pub fn is_alias(&self) -> bool {
        self.alias.as_deref().map_or(false, |s| !s.is_empty())
    }

    /// 平手初期盤面から全指し手を再生し、盤面キーの列を `board_keys` に格納する。
    /// 再生した盤面の列を返す。
    ///
    /// 途中で矛盾が見つかった場合はエラーを返し、`board_keys` は変更しない。
    pub fn compute_boards(&mut self) -> Result<Vec<Board>, ReplayError> {
        log_replay_start(&self.id(), self.steps.len());

        let mut steps: Vec<_> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.seq);

        let boards = replay(steps)?;
        self.board_keys = boards.iter().map(Board::to_key).collect();

        Ok(boards)
    }
}

/// 平手初期盤面から指し手を順に適用し、初期盤面を含む盤面の列を返す。
///
/// 1 手でも適用に失敗したら全体が失敗する。
pub fn replay<'a, I>(steps: I) -> Result<Vec<Board>, ReplayError>
where
    I: IntoIterator<Item = &'a Step>,
{
    let mut boards = vec![];
    let mut board = Board::init();

    for step in steps {
        let next = board.apply_step(step)?;
        log_step_applied(step, &next);
        boards.push(std::mem::replace(&mut board, next));
    }
    boards.push(board);

    Ok(boards)
}
