//! Criterion micro-benchmarks for the front-end pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use autodrone::prelude::*;
use autodrone::syntax::{lex, parse};
use autodrone_bench::patrol_script;

/// Benchmark: tokenize the patrol script in both families.
fn bench_lex(c: &mut Criterion) {
    for family in [SyntaxFamily::Block, SyntaxFamily::Brace] {
        let source = patrol_script(family);
        let name = match family {
            SyntaxFamily::Block => "lex_block_patrol",
            SyntaxFamily::Brace => "lex_brace_patrol",
        };
        c.bench_function(name, |b| {
            b.iter(|| {
                let tokens = lex(family, black_box(source)).unwrap();
                black_box(&tokens);
            });
        });
    }
}

/// Benchmark: full lex + parse of the patrol script.
fn bench_parse(c: &mut Criterion) {
    for family in [SyntaxFamily::Block, SyntaxFamily::Brace] {
        let source = patrol_script(family);
        let name = match family {
            SyntaxFamily::Block => "parse_block_patrol",
            SyntaxFamily::Brace => "parse_brace_patrol",
        };
        c.bench_function(name, |b| {
            b.iter(|| {
                let tokens = lex(family, black_box(source)).unwrap();
                let parsed = parse(family, tokens).unwrap();
                black_box(&parsed);
            });
        });
    }
}

/// Benchmark: the whole pipeline, source to bytecode.
fn bench_compile(c: &mut Criterion) {
    let source = patrol_script(SyntaxFamily::Block);
    c.bench_function("compile_block_patrol", |b| {
        b.iter(|| {
            let compiled = compile_source(SyntaxFamily::Block, black_box(source)).unwrap();
            black_box(&compiled);
        });
    });
}

criterion_group!(benches, bench_lex, bench_parse, bench_compile);
criterion_main!(benches);
