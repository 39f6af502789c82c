//! 解析・再生処理のログ出力。

use log::{debug, info, log_enabled, trace, warn, Level};

use crate::board::Board;
use crate::kifu::Kifu;
use crate::shogi::*;
use crate::step::Step;

/// 盤面再生開始ログを出力する。
pub fn log_replay_start(kifu_id: &str, n_step: usize) {
    debug!("replay start: {} ({} steps)", kifu_id, n_step);
}

/// 指し手を適用した結果の盤面キーをログ出力する。
///
/// キーの計算はハッシュを伴うので、trace が無効なら何もしない。
pub fn log_step_applied(step: &Step, board: &Board) {
    if log_enabled!(Level::Trace) {
        trace!("{} -> {}", step, board.to_key());
    }
}

/// 駒取りをログ出力する。
pub fn log_capture(step: &Step, captured: &Piece) {
    trace!("{}: captured {}", step, captured);
}

/// 棋譜上の駒種と移動元の実際の駒が食い違っていることをログ出力する。
///
/// 合法性チェックはしないので、再生自体は続行する。
pub fn log_kind_mismatch(step: &Step, actual: &Piece) {
    warn!("{}: notation says {}, but found {}", step, step.piece_kind, actual);
}

/// 棋譜の取り込み完了ログを出力する。
pub fn log_kifu_imported(kifu: &Kifu) {
    let names: Vec<_> = kifu.players.iter().map(|p| p.name.as_str()).collect();
    info!(
        "imported {} [{}] {} steps, final {}",
        kifu.id(),
        names.join(" vs "),
        kifu.steps.len(),
        kifu.board_keys.last().map_or("-", String::as_str)
    );
}
