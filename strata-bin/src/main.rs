mod debug;

use std::fs;

use clap::Parser;
use log::LevelFilter;

use strata::trace::TraceEntry;
use strata::{CacheStats, MultiLevelCache};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    trace: Option<String>,

    #[arg(short, long)]
    debug: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        log::set_logger(&STDERR_LOG).expect("logger already installed");
        log::set_max_level(LevelFilter::Trace);
    }

    let mut memory = MultiLevelCache::two_level();

    if args.debug {
        debug::debug_mode(memory);
        return;
    }

    let pattern = match &args.trace {
        Some(path) => {
            let text = fs::read_to_string(path).expect("could not read trace file");
            match strata::trace::parse(&text) {
                Ok(pattern) => pattern,
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    std::process::exit(1);
                },
            }
        },
        None => demo_pattern(),
    };

    run(&mut memory, &pattern);
}

/// Run a pattern through the hierarchy and report.
fn run(memory: &mut MultiLevelCache, pattern: &[TraceEntry]) {
    let l1_flushes = memory.level_mut(0).watch_flushes();
    let l2_flushes = memory.level_mut(1).watch_flushes();

    let start = chrono::Utc::now();
    for entry in pattern {
        let result = memory.access_memory(entry.addr, entry.is_write);
        let kind = if entry.is_write { "write" } else { "read" };
        println!("{:5} {:#010X}: {}", kind, entry.addr, result);
    }
    let elapsed = chrono::Utc::now() - start;

    println!();
    report("L1", memory.level(0).stats(), l1_flushes.try_iter().count());
    report("L2", memory.level(1).stats(), l2_flushes.try_iter().count());
    println!(
        "{} accesses in {}us",
        pattern.len(),
        elapsed.num_microseconds().unwrap_or_default()
    );
}

fn report(name: &str, stats: &CacheStats, flushed: usize) {
    println!(
        "{}: {} hits / {} accesses ({:.1}%), {} victim hits, {} evictions, {} write-backs ({} observed), {} prefetches, {} fills",
        name,
        stats.hits,
        stats.accesses(),
        stats.hit_rate() * 100.0,
        stats.victim_hits,
        stats.evictions,
        stats.write_backs,
        flushed,
        stats.prefetches,
        stats.fills,
    );
}

/// The access pattern from the reference simulation.
fn demo_pattern() -> Vec<TraceEntry> {
    vec![
        TraceEntry { addr: 100, is_write: false },
        TraceEntry { addr: 120, is_write: false },
        TraceEntry { addr: 100, is_write: false },
        TraceEntry { addr: 200, is_write: true },
        TraceEntry { addr: 100, is_write: false },
    ]
}

struct StderrLog;

impl log::Log for StderrLog {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        eprintln!("{:5} {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static STDERR_LOG: StderrLog = StderrLog;
