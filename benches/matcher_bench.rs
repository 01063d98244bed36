use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flowtext::{
    extract_all_parallel, AhoCorasickAutomaton, EntityExtractor, LiteralScanner, Tokenizer,
};

const SHORT_TEXT: &str = "Invoice dated 03/15/2024 for $1,250.00 sent to billing@acme.com";

fn long_text() -> String {
    // ~256 KiB of mixed prose with embedded dates, amounts, and addresses
    let paragraph = "The quarterly statement dated 03/15/2024 lists a payment of \
$1,250.00 to Acme Corp, confirmed by billing@acme.com on Jan 7, 2024. \
A follow-up wire of 500 EUR cleared 2024-04-01, roughly 3 thousand short \
of the forecast. ";
    paragraph.repeat(1200)
}

fn bench_literal_scan(c: &mut Criterion) {
    let text = long_text();
    let mut scanner = LiteralScanner::new();
    scanner.add_pattern("payment", 1, 0.8);
    scanner.add_pattern("acme", 2, 0.8);
    scanner.add_pattern("forecast", 3, 0.8);
    scanner.add_pattern("wire", 4, 0.8);

    let mut group = c.benchmark_group("literal_scan");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("find_all_4_patterns", |b| {
        b.iter(|| scanner.find_all(black_box(&text)))
    });
    group.finish();
}

fn bench_automaton_search(c: &mut Criterion) {
    let text = long_text();
    let mut automaton = AhoCorasickAutomaton::new();
    for (i, keyword) in ["payment", "acme", "forecast", "wire", "statement", "cleared"]
        .iter()
        .enumerate()
    {
        automaton.add_pattern(keyword, i);
    }
    automaton.build();

    let mut group = c.benchmark_group("automaton_search");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("search_6_patterns", |b| {
        b.iter(|| automaton.search(black_box(&text)))
    });
    group.finish();
}

fn bench_automaton_build(c: &mut Criterion) {
    c.bench_function("automaton_build_100_patterns", |b| {
        b.iter(|| {
            let mut automaton = AhoCorasickAutomaton::new();
            for i in 0..100usize {
                automaton.add_pattern(&format!("keyword{i:03}"), i);
            }
            automaton.build();
            black_box(automaton.node_count())
        })
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let text = long_text();
    let tokenizer = Tokenizer::new();

    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("mixed_prose", |b| {
        b.iter(|| tokenizer.tokenize(black_box(&text)))
    });
    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let text = long_text();
    let mut extractor = EntityExtractor::new();
    extractor.add_date_patterns();
    extractor.add_amount_patterns();

    let mut group = c.benchmark_group("extraction");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("sequential_extract", |b| {
        b.iter(|| extractor.extract(black_box(&text)))
    });
    group.bench_function("parallel_extract", |b| {
        b.iter(|| extract_all_parallel(black_box(&text)))
    });
    group.finish();

    c.bench_function("short_text_extract", |b| {
        let mut short = EntityExtractor::new();
        short.add_date_patterns();
        short.add_amount_patterns();
        b.iter(|| short.extract(black_box(SHORT_TEXT)))
    });
}

criterion_group!(
    benches,
    bench_literal_scan,
    bench_automaton_search,
    bench_automaton_build,
    bench_tokenize,
    bench_extraction
);
criterion_main!(benches);
