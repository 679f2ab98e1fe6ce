use scout_core::{Allocation, Context, Job, Node, Resource};
use scout_search::{FuzzyOptions, Searcher};
use scout_store::StateStore;
use std::time::Instant;

fn uuid(i: usize, salt: u32) -> String {
    format!("{:08x}-{:04x}-4000-8000-{:012x}", (i as u64).wrapping_mul(2_654_435_761) as u32, salt, i)
}

fn gen_rows(n: usize) -> Vec<Resource> {
    let mut rows = Vec::with_capacity(n * 3);
    for i in 0..n {
        let app = match i % 3 {
            0 => "web",
            1 => "api",
            _ => "batch",
        };
        let job = format!("{app}-{i:06}");
        rows.push(Resource::Allocation(Allocation {
            id: uuid(i, 1),
            namespace: format!("ns{}", i % 10),
            name: format!("{job}.{app}[0]"),
            job_id: job.clone(),
            node_id: uuid(i % 500, 2),
        }));
        rows.push(Resource::Job(Job {
            id: job.clone(),
            namespace: format!("ns{}", i % 10),
            name: job,
            status: "running".into(),
        }));
        if i < 500 {
            rows.push(Resource::Node(Node {
                id: uuid(i, 2),
                name: format!("client-{i:04}"),
                datacenter: format!("dc{}", i % 3),
                node_class: String::new(),
                status: "ready".into(),
            }));
        }
    }
    rows
}

fn percentile_us(xs: &mut [u128], p: f64) -> u128 {
    xs.sort_unstable();
    let idx = ((xs.len() as f64 - 1.0) * p).round() as usize;
    xs[idx]
}

fn main() {
    let n: usize = std::env::var("SCOUT_BENCH_DOCS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);
    let limit_query: usize = std::env::var("SCOUT_BENCH_LIMIT_QUERY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    eprintln!("building state: {} jobs", n);
    let t0 = Instant::now();
    let store = StateStore::new();
    if let Err(e) = store.restore(1, gen_rows(n)) {
        eprintln!("restore failed: {e}");
        return;
    }
    let build_ms = t0.elapsed().as_secs_f64() * 1_000.0;
    let snap = store.current();

    let fuzzy = FuzzyOptions { limit_query, ..FuzzyOptions::default() };
    let searcher = Searcher::new().fuzzy_options(fuzzy);

    let mut uuid_prefixes: Vec<String> = Vec::new();
    for step in (0..n).step_by(n.saturating_div(200).max(1)) {
        uuid_prefixes.push(uuid(step, 1)[..6].to_string());
    }
    let mut job_prefixes: Vec<String> = Vec::new();
    for step in (0..n).step_by(n.saturating_div(200).max(1)) {
        job_prefixes.push(format!("web-{:04}", step / 100));
    }
    let fuzzy_texts: Vec<String> = ["web", "api-0001", "batch", "client-00"].iter().map(|s| s.to_string()).collect();

    let run = |label: &str, qs: &[String], f: &dyn Fn(&str) -> bool| {
        let mut times: Vec<u128> = Vec::with_capacity(qs.len());
        let mut errors = 0usize;
        for q in qs {
            let t = Instant::now();
            if !f(q) {
                errors += 1;
            }
            times.push(t.elapsed().as_micros());
        }
        let p50 = percentile_us(&mut times.clone(), 0.50) as f64 / 1000.0;
        let p99 = percentile_us(&mut times, 0.99) as f64 / 1000.0;
        println!("{}: p50={:.3}ms p99={:.3}ms ({} queries, errors={})", label, p50, p99, qs.len(), errors);
    };

    println!("state_build: {:.1}ms jobs={}", build_ms, n);
    run("prefix_allocs", &uuid_prefixes, &|q| {
        searcher.prefix_search(&*snap, None, "ns0", q, &Context::Allocs).is_ok()
    });
    run("prefix_all", &job_prefixes, &|q| searcher.prefix_search(&*snap, None, "ns0", q, &Context::All).is_ok());
    run("fuzzy_all", &fuzzy_texts, &|q| searcher.fuzzy_search(&*snap, None, "ns0", q, &Context::All).is_ok());
}
