//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package basc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use basc_lex::Lexer;
use basc_util::Handler;

fn lexer_token_count(source: &str) -> usize {
    let handler = Handler::new();
    let lexer = Lexer::new(source, &handler);
    lexer.count()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "sub main()\n    x = 42\n    print x\nend sub";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_assignment", |b| {
        b.iter(|| lexer_token_count(black_box("x = 42")))
    });

    group.bench_function("sub_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        class Point
            x as integer
            y as integer

            function distanceTo(other as object) as float
                dx = m.x - other.x
                dy = m.y - other.y
                return (dx * dx + dy * dy)
            end function
        end class

        function main() as void
            points = [{x: 1, y: 2}, {x: 3, y: 4}]
            for each p in points
                print `point: (${p.x}, ${p.y})`
            end for
        end function
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_token_count(black_box(r#"s = "hello""#)))
    });

    group.bench_function("string_with_escaped_quote", |b| {
        b.iter(|| lexer_token_count(black_box(r#"s = "say ""hi"" to them""#)))
    });

    group.bench_function("template_string_with_interpolation", |b| {
        b.iter(|| lexer_token_count(black_box("s = `hello ${name}, you are ${age} years old`")))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("x = 123456")))
    });

    group.bench_function("double", |b| {
        b.iter(|| lexer_token_count(black_box("x = 3.14159")))
    });

    group.bench_function("hex", |b| {
        b.iter(|| lexer_token_count(black_box("x = &hDEADBEEF")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("x = 42")))
    });

    group.bench_function("long_ident_with_sigil", |b| {
        b.iter(|| lexer_token_count(black_box("veryLongVariableName% = 42")))
    });

    group.bench_function("many_idents", |b| {
        b.iter(|| lexer_token_count(black_box("a = 1\nb = 2\nc = 3\nd = 4\ne = 5")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
