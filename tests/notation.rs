use std::path::PathBuf;

#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};
use walkdir::WalkDir;

use kifulog::*;

const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/asset");

const KIF: &str = include_str!("asset/kif/sample.kif");
const TABLE: &str = include_str!("asset/table/sample.txt");

/// アセット内の全棋譜を (表記形式, パス) で返す。表記形式はディレクトリ名で決まる。
fn get_kifu_paths() -> impl Iterator<Item = (Notation, PathBuf)> {
    WalkDir::new(ASSET_DIR)
        .into_iter()
        .map(|entry| entry.expect("invalid directory entry").into_path())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let dir = path.parent()?.file_name()?.to_str()?;
            let notation = dir.parse::<Notation>().ok()?;
            Some((notation, path))
        })
}

#[test]
fn test_parse_all_assets() {
    let mut n = 0;

    for (notation, path) in get_kifu_paths() {
        let text = std::fs::read_to_string(&path).expect("cannot read kifu file");
        let kifu = notation.parse_kifu(&text).unwrap();

        assert_eq!(kifu.format, notation);
        assert_eq!(kifu.players.len(), 2);
        assert_eq!(kifu.players[0].side, FIRST);
        assert_eq!(kifu.players[1].side, SECOND);
        assert!(kifu.board_keys.is_empty());
        assert!(kifu
            .steps
            .iter()
            .zip(1..)
            .all(|(step, seq)| step.seq == seq && step.side() == Side::from_seq(seq)));

        n += 1;
    }

    assert!(n >= 2);
}

#[test]
fn test_parse_kif_header() {
    let kifu = Notation::Kif.parse_kifu(KIF).unwrap();

    assert_eq!(kifu.game_name, "練習対局");
    assert_eq!(kifu.handicap, "平手");
    assert_eq!(kifu.start_ts, 1_514_887_200);
    assert_eq!(kifu.end_ts, 1_514_887_200 + 30 * 60);
    assert_eq!(kifu.players[0].name, "山田太郎");
    assert_eq!(kifu.players[0].note.as_deref(), Some("東京支部"));
    assert_eq!(kifu.players[1].name, "鈴木花子");
    assert_eq!(kifu.players[1].note.as_deref(), Some("大阪支部"));
}

#[test]
fn test_parse_kif_steps() {
    let kifu = Notation::Kif.parse_kifu(KIF).unwrap();
    let steps = &kifu.steps;

    assert_eq!(steps.len(), 8);

    assert_eq!(steps[1].notes, ["角道を開ける"]);
    assert_eq!(steps[2].notes, ["角交換", "乱戦模様"]);
    assert!(steps[0].notes.is_empty());

    // ２二角成(88)
    assert_eq!(steps[2].piece_kind, BISHOP);
    assert!(steps[2].promoted);

    // 同　銀(31)
    assert_eq!(steps[3].destination, Position::new(2, 2));
    assert_eq!(steps[3].origin, Position::new(3, 1));
    assert_eq!(steps[3].side(), SECOND);

    // ４五角打
    assert!(steps[4].dropped);
    assert_eq!(steps[4].origin, Position::CAPTURED);

    assert_eq!(steps[4].thinking_sec, 80);
    assert_eq!(steps[4].cumulative_sec, 93);

    let last = steps.last().unwrap();
    assert!(last.finished);
    assert_eq!(last.destination, Position::CAPTURED);
    assert_eq!(last.piece_kind, NO_PIECE_KIND);
}

#[test]
fn test_parse_table() {
    let kifu = Notation::Table.parse_kifu(TABLE).unwrap();

    assert_eq!(kifu.handicap, "平手");
    assert_eq!(kifu.game_name, "研究会");
    assert_eq!(kifu.players[0].name, "田中");
    assert_eq!(kifu.players[1].name, "佐藤");
    assert_eq!(kifu.players[0].note, None);
    assert_eq!(kifu.end_ts - kifu.start_ts, 90 * 60);
    assert_eq!(kifu.steps.len(), 8);

    // 盤上の動きは KIF 版と同じ棋譜。
    let kif = Notation::Kif.parse_kifu(KIF).unwrap();
    for (a, b) in kifu.steps.iter().zip(&kif.steps) {
        assert_eq!(
            (a.seq, a.destination, a.origin, a.piece_kind, a.promoted, a.dropped),
            (b.seq, b.destination, b.origin, b.piece_kind, b.promoted, b.dropped)
        );
    }
}

#[test]
fn test_missing_separator() {
    let text = TABLE.replacen("終了日時：", "終了日時 ", 1);
    let err = Notation::Table.parse_kifu(&text).unwrap_err();

    assert_eq!(err.line, 2);
    assert_eq!(err.kind, ParseErrorKind::MissingSeparator);
    assert!(err.to_string().starts_with("line 2:"));
}

#[test]
fn test_unknown_piece() {
    let text = KIF.replacen("５五角打", "５五象打", 1);
    let err = Notation::Kif.parse_kifu(&text).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::UnknownPiece);
    assert!(err.text.contains("５五象打"));
}

#[test]
fn test_invalid_date() {
    let text = KIF.replacen("2018年01月02日(火) 10:00:00", "2018/01/02", 1);
    let err = Notation::Kif.parse_kifu(&text).unwrap_err();

    assert_eq!(err.line, 3);
    assert_eq!(err.kind, ParseErrorKind::InvalidDate);
}

#[test]
fn test_invalid_clock() {
    let text = TABLE.replacen("( 0:05/00:00:05)", "( 0:05)", 1);
    let err = Notation::Table.parse_kifu(&text).unwrap_err();

    assert_eq!(err.line, 9);
    assert_eq!(err.kind, ParseErrorKind::InvalidClock);
}

#[test]
fn test_id_depends_only_on_start_and_names() {
    let kifu = Notation::Kif.parse_kifu(KIF).unwrap();

    // 棋戦名や指し手が違っても ID は同じ。
    let text = KIF
        .replacen("練習対局", "公式戦", 1)
        .replacen("   8 投了   ( 2:00/00:02:47)", "", 1);
    let other = Notation::Kif.parse_kifu(&text).unwrap();
    assert_ne!(kifu, other);
    assert_eq!(kifu.id(), other.id());

    let text = KIF.replacen("10:00:00", "10:00:01", 1);
    assert_ne!(kifu.id(), Notation::Kif.parse_kifu(&text).unwrap().id());

    let text = KIF.replacen("鈴木花子", "鈴木次郎", 1);
    assert_ne!(kifu.id(), Notation::Kif.parse_kifu(&text).unwrap().id());

    assert_eq!(kifu.id().len(), 64);
}
