use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kifulog::*;

const KIF: &str = include_str!("../tests/asset/kif/sample.kif");

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    c.bench_function("parse_kif", |b| {
        b.iter(|| Notation::Kif.parse_kifu(black_box(KIF)).unwrap())
    });

    let kifu = Notation::Kif.parse_kifu(KIF).unwrap();
    c.bench_function("replay", |b| b.iter(|| replay(black_box(&kifu.steps)).unwrap()));
}
