//! Vocabulary fitting tool
//!
//! Reads a CSV corpus, runs every row through the normalizer and fits the
//! vocabulary the model is trained against. The result is written in the
//! Keras tokenizer JSON layout that the prediction server loads at startup.
//!
//! ## Usage
//!
//! ```bash
//! # Fit on the `text` column, keep the 10_000 most frequent ids
//! ./target/release/fit_vocab measuring_hate_speech.csv -o tokenizer.json
//!
//! # Different column, reserved OOV token
//! ./target/release/fit_vocab corpus.csv --column comment --oov "<OOV>"
//! ```
//!
//! ## Output
//!
//! ```text
//! === Fit ===
//! --------------------------------
//! Rows        : 135_556
//! Elapsed     : 3.102 s
//! Rows/sec    : 43_699
//! Tokens      : 1_874_012
//! Vocabulary  : 135_556 docs, 38_212 unique words, 1_874_012 occurrences, 9_999 usable ids
//! Coverage    : 96.4%
//! Truncated   : 212 rows longer than 50 ids
//! --------------------------------
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use hatescan_core::analyzer::TextNormalizer;
use hatescan_core::vocab::{Vocabulary, VocabularyConfig};
use hatescan_types::DEFAULT_MAX_LENGTH;

#[derive(Parser)]
#[command(name = "fit_vocab")]
#[command(about = "Fit the word vocabulary on a CSV corpus")]
struct Args {
    /// CSV file with a header row
    corpus: PathBuf,

    /// Column holding the raw text
    #[arg(short = 'c', long, default_value = "text")]
    column: String,

    /// Where to write the vocabulary JSON
    #[arg(short = 'o', long, default_value = "tokenizer.json")]
    output: PathBuf,

    /// Ids at or above this value are treated as unknown (0 keeps all)
    #[arg(short = 'n', long, default_value_t = 10_000)]
    num_words: usize,

    /// Reserved token for unknown words
    #[arg(long)]
    oov: Option<String>,

    /// Sequence length used to report truncated rows
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,
}

struct FitReport {
    rows: u64,
    tokens: u64,
    truncated: u64,
    elapsed: Duration,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading corpus...");
    let texts = read_column(&args)?;
    println!("Rows:      {}", fmt_count(texts.len() as u64));
    println!("Column:    {}\n", args.column);

    let mut vocab = Vocabulary::with_config(VocabularyConfig {
        num_words: Some(args.num_words),
        oov_token: args.oov.clone(),
        ..VocabularyConfig::default()
    });

    println!("=== Fit ===");
    let report = fit(&mut vocab, &texts, args.max_length);
    print_report(&vocab, &report, args.max_length);

    vocab
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Saved vocabulary to {}", args.output.display());

    Ok(())
}

fn read_column(args: &Args) -> Result<Vec<String>> {
    let file = File::open(&args.corpus)
        .with_context(|| format!("failed to open {}", args.corpus.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers().context("failed to read CSV header")?;
    let Some(column) = headers.iter().position(|h| h == args.column) else {
        bail!("column {:?} not found in {}", args.column, args.corpus.display());
    };

    let mut texts = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to parse row {}", line + 1))?;
        texts.push(record.get(column).unwrap_or_default().to_owned());
    }

    Ok(texts)
}

fn fit(vocab: &mut Vocabulary, texts: &[String], max_length: usize) -> FitReport {
    let normalizer = TextNormalizer::default();
    let start = Instant::now();

    let documents: Vec<Vec<String>> = texts
        .iter()
        .map(|text| normalizer.normalize_to_tokens(text))
        .collect();
    vocab.fit_on_tokens(&documents);

    let elapsed = start.elapsed();

    let mut tokens = 0u64;
    let mut truncated = 0u64;
    for document in &documents {
        tokens += document.len() as u64;
        if vocab.tokens_to_sequence(document).len() > max_length {
            truncated += 1;
        }
    }

    FitReport {
        rows: texts.len() as u64,
        tokens,
        truncated,
        elapsed,
    }
}

fn print_report(vocab: &Vocabulary, report: &FitReport, max_length: usize) {
    let secs = report.elapsed.as_secs_f64().max(f64::EPSILON);
    let stats = vocab.stats();

    println!("--------------------------------");
    println!("Rows        : {}", fmt_count(report.rows));
    println!("Elapsed     : {:.3} s", secs);
    println!("Rows/sec    : {}", fmt_count((report.rows as f64 / secs) as u64));
    println!("Tokens      : {}", fmt_count(report.tokens));
    println!("Vocabulary  : {}", stats);
    println!("Coverage    : {:.1}%", stats.coverage(vocab) * 100.0);
    println!(
        "Truncated   : {} rows longer than {} ids",
        fmt_count(report.truncated),
        max_length
    );
    println!("--------------------------------\n");
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
