use criterion::{criterion_group, criterion_main, Criterion};
use engine::Tokenizer;

fn bench_tokenize(c: &mut Criterion) {
    let text = include_str!("../../README.md");
    let tokenizer = Tokenizer::default();
    c.bench_function("tokenize_readme", |b| {
        b.iter(|| tokenizer.terms(text).unwrap().count())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
