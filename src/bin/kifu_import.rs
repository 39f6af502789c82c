//! 棋譜ファイルを解析・再生し、盤面キーを求める。
//!
//! 各棋譜は独立に処理される。解析か再生に失敗した棋譜は何も出力されない。

use std::ffi::OsStr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context as _};
use log::{error, info, LevelFilter};
use structopt::StructOpt;

use kifulog::mylog::log_kifu_imported;
use kifulog::*;

#[derive(Debug, StructOpt)]
struct Opt {
    /// 棋譜の表記形式。
    #[structopt(
        long,
        possible_values = &Notation::variants(),
        case_insensitive = true,
        default_value = "Kif"
    )]
    format: Notation,

    /// 棋譜ファイルを棋譜 ID に基づく名前に変更する。
    #[structopt(long)]
    rename: bool,

    /// 解析結果を JSON で標準出力に書き出す。
    #[structopt(long)]
    json: bool,

    /// スレッド数。省略した場合、論理 CPU 数となる。
    #[structopt(long)]
    threads: Option<NonZeroUsize>,

    /// ログを詳細にする。(-v: debug, -vv: trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// 棋譜ファイル、または棋譜ファイルを含むディレクトリ。
    #[structopt(required = true, parse(from_os_str))]
    paths: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    let paths = collect_paths(&opt.paths)?;
    let thread_count = opt
        .threads
        .map_or_else(num_cpus::get, NonZeroUsize::get)
        .min(paths.len().max(1));
    info!("{} files, {} threads", paths.len(), thread_count);

    let results = import_parallel(paths, thread_count, opt.format)?;

    let mut n_fail = 0;
    for (path, res) in results {
        let kifu = match res {
            Ok(kifu) => kifu,
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                n_fail += 1;
                continue;
            }
        };

        log_kifu_imported(&kifu);

        if opt.json {
            println!("{}", serde_json::to_string(&kifu)?);
        }
        if opt.rename {
            rename_to_id(&path, &kifu.id())?;
        }
    }

    if n_fail > 0 {
        bail!("{} files failed", n_fail);
    }

    Ok(())
}

/// ディレクトリは 1 段だけ展開する。結果はパス順。
fn collect_paths(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut res = Vec::<PathBuf>::new();

    for path in paths {
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let path = entry?.path();
                if path.is_file() {
                    res.push(path);
                }
            }
        } else {
            res.push(path.clone());
        }
    }

    res.sort();
    res.dedup();

    Ok(res)
}

/// ファイルをスレッドに振り分けて処理し、入力順に結果を返す。
fn import_parallel(
    paths: Vec<PathBuf>,
    thread_count: usize,
    notation: Notation,
) -> anyhow::Result<Vec<(PathBuf, anyhow::Result<Kifu>)>> {
    let mut buckets = vec![Vec::<(usize, PathBuf)>::new(); thread_count];
    for (i, path) in paths.into_iter().enumerate() {
        buckets[i % thread_count].push((i, path));
    }

    let handles: Vec<_> = buckets
        .into_iter()
        .map(|bucket| {
            std::thread::spawn(move || {
                bucket
                    .into_iter()
                    .map(|(i, path)| {
                        let res = import(&path, notation);
                        (i, path, res)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        let part = handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))?;
        results.extend(part);
    }
    results.sort_by_key(|(i, _, _)| *i);

    Ok(results
        .into_iter()
        .map(|(_, path, res)| (path, res))
        .collect())
}

/// 1 つの棋譜ファイルを解析・再生する。
fn import(path: &Path, notation: Notation) -> anyhow::Result<Kifu> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let mut kifu = notation.parse_kifu(&text)?;
    kifu.compute_boards()?;

    Ok(kifu)
}

/// 棋譜ファイルを `{棋譜 ID}.{拡張子}` に変更する。既にその名前なら何もしない。
fn rename_to_id(path: &Path, id: &str) -> anyhow::Result<()> {
    if path.file_stem().and_then(OsStr::to_str) == Some(id) {
        return Ok(());
    }

    let mut dst = path.with_file_name(id);
    if let Some(ext) = path.extension() {
        dst.set_extension(ext);
    }
    if dst.exists() {
        bail!("{} already exists", dst.display());
    }

    std::fs::rename(path, &dst)?;
    info!("renamed {} -> {}", path.display(), dst.display());

    Ok(())
}
