// Criterion benchmarks for morph-lang.
//
// Requires a compiled m_RU.dat dictionary file. Set MORPH_DICT_DIR to the
// directory containing it, or place it at ../../test-data/m_RU.dat relative
// to the crate root. If the dictionary is not found the benchmarks print a
// message and run no-op iterations.
//
// Run:
//   cargo bench -p morph-lang
//   MORPH_DICT_DIR=/path/to/dict cargo bench -p morph-lang

use criterion::{criterion_group, criterion_main, Criterion};
use morph_core::categories::Language;
use morph_lang::service::{AnalyzerConfig, Service};

fn find_ru_dict() -> Option<std::path::PathBuf> {
    if let Ok(dir) = std::env::var("MORPH_DICT_DIR") {
        let path = std::path::PathBuf::from(&dir).join("m_RU.dat");
        if path.exists() {
            return Some(path);
        }
    }
    let fallback = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-data/m_RU.dat");
    if fallback.exists() {
        return Some(fallback);
    }
    None
}

fn load_service() -> Option<Service> {
    let dict_path = find_ru_dict()?;
    let dir = dict_path.parent()?.to_path_buf();
    let service = Service::new(AnalyzerConfig::new());
    let statuses = service.load_languages(&[Language::RU], Some(&dir));
    statuses.get(&Language::RU)?.as_ref().ok()?;
    Some(service)
}

fn bench_analyze_wordlist(c: &mut Criterion) {
    let Some(service) = load_service() else {
        eprintln!("[bench_analyze_wordlist] m_RU.dat not found — skipping (set MORPH_DICT_DIR)");
        c.bench_function("analyze_wordlist (skipped)", |b| b.iter(|| {}));
        return;
    };

    let words = ["ДОМ", "СТОЛЫ", "ХОДИТЬ", "КРАСИВЫЙ", "МОСКВА", "ИВАНОВ", "БЫСТРО", "КНИГА"];

    c.bench_function("get_all_wordforms_8_words", |b| {
        b.iter(|| {
            for word in &words {
                std::hint::black_box(service.get_all_wordforms(word, Some(Language::RU)).ok());
            }
        });
    });
}

fn bench_process_paragraph(c: &mut Criterion) {
    let Some(service) = load_service() else {
        eprintln!("[bench_process_paragraph] m_RU.dat not found — skipping (set MORPH_DICT_DIR)");
        c.bench_function("process_paragraph (skipped)", |b| b.iter(|| {}));
        return;
    };

    let text = "Дом стоит на горе. Быстро бежит собака по зелёной траве. \
                Иванов написал красивую книгу о путешествиях.";

    c.bench_function("process_3_sentences", |b| {
        b.iter(|| {
            std::hint::black_box(service.process(text, Some(Language::RU)).ok());
        });
    });
}

fn bench_tokenize_only(c: &mut Criterion) {
    let service = Service::new(AnalyzerConfig::new());
    let text = "Дом стоит на горе. Быстро бежит собака по зелёной траве.";

    c.bench_function("tokenize_2_sentences", |b| {
        b.iter(|| {
            std::hint::black_box(service.tokenize(text));
        });
    });
}

criterion_group!(benches, bench_analyze_wordlist, bench_process_paragraph, bench_tokenize_only);
criterion_main!(benches);
