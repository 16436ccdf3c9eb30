use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use search_query::lexer::Splitter;
use search_query::parser::{ClauseParser, Syntax};
use search_query::{Operator, SearchDefinition, SqlCompiler};
use std::hint::black_box;

const CASES: [(&str, &str); 3] = [
    ("simple", "name:Python"),
    ("medium", "name__co__Prog+author__co__Ritchie+age__lt__18"),
    (
        "complex",
        "name__in__[Python,Ruby,Swift,Go,Rust]+author__co__Ritchie+age__gte__18+lang__ni__[fr,de]+ghost:x",
    ),
];

// Clause splitting
fn benchmark_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitter_performance");

    for (name, raw) in CASES {
        group.bench_with_input(BenchmarkId::new("split", name), &raw, |b, &raw| {
            b.iter(|| {
                let tokens: Vec<_> = Splitter::new(black_box(raw)).collect();
                black_box(tokens)
            })
        });
    }

    group.finish();
}

// Clause interpretation
fn benchmark_clause_parser(c: &mut Criterion) {
    let syntax = Syntax::default();
    let parser = ClauseParser::new(&syntax, Operator::Equals);
    let mut group = c.benchmark_group("clause_parser_performance");

    for (name, raw) in CASES {
        let tokens: Vec<_> = Splitter::new(raw).collect();

        group.bench_with_input(BenchmarkId::new("interpret", name), &tokens, |b, tokens| {
            b.iter(|| {
                for token in tokens {
                    let _ = black_box(parser.parse(black_box(token)));
                }
            })
        });
    }

    group.finish();
}

// Full parse against a definition
fn benchmark_end_to_end(c: &mut Criterion) {
    let definition = SearchDefinition::demo();
    let mut group = c.benchmark_group("end_to_end_performance");

    for (name, raw) in CASES {
        group.bench_with_input(BenchmarkId::new("parse", name), &raw, |b, &raw| {
            b.iter(|| {
                let tree = definition.parse(black_box(raw)).expect("parse should succeed");
                black_box(tree)
            })
        });
    }

    group.finish();
}

// SQL compilation of parsed trees
fn benchmark_sql_compiler(c: &mut Criterion) {
    let definition = SearchDefinition::demo();
    let compiler = SqlCompiler::new("books");
    let mut group = c.benchmark_group("sql_compiler_performance");

    for (name, raw) in CASES {
        let tree = definition.parse(raw).expect("parse should succeed");

        group.bench_with_input(BenchmarkId::new("compile", name), &tree, |b, tree| {
            b.iter(|| {
                let sql = compiler
                    .compile_select(black_box(tree))
                    .expect("compile should succeed");
                black_box(sql)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_splitter,
    benchmark_clause_parser,
    benchmark_end_to_end,
    benchmark_sql_compiler
);
criterion_main!(benches);
