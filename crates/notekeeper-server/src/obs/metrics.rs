//! Process-wide request metrics.
//!
//! Counter and histogram series carry dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors, and rendering sorts series so
//! the exposition text is stable between scrapes. Histogram buckets are fixed
//! in microseconds to avoid floating point math.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value, zero for a label set never observed.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.value().load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let mut series: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort();
        for (key, val) in series {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(&key), val);
        }
    }
}

/// Unlabelled gauge. Writes are last-write-wins.
#[derive(Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn set(&self, v: u64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [
    100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations for a label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.value().count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: microseconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "histogram");
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(hist) = self.map.get(&key) else { continue };
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

/// Default process metrics. Start time is fixed when the registry is built;
/// CPU and resident memory are sampled on every render where the platform
/// exposes them.
struct ProcessMetrics {
    start_time_seconds: u64,
}

impl ProcessMetrics {
    fn capture() -> Self {
        let start_time_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self { start_time_seconds }
    }

    fn render(&self, out: &mut String) {
        write_header(out, "process_start_time_seconds", "Start time of the process since unix epoch in seconds", "gauge");
        let _ = writeln!(out, "process_start_time_seconds {}", self.start_time_seconds);

        if let Some(cpu) = proc_stat::cpu_seconds() {
            write_header(out, "process_cpu_seconds_total", "Total user and system CPU time spent in seconds", "counter");
            let _ = writeln!(out, "process_cpu_seconds_total {}", cpu);
        }
        if let Some(rss) = proc_stat::resident_memory_bytes() {
            write_header(out, "process_resident_memory_bytes", "Resident memory size in bytes", "gauge");
            let _ = writeln!(out, "process_resident_memory_bytes {}", rss);
        }
    }
}

#[cfg(target_os = "linux")]
mod proc_stat {
    use std::fs;

    // USER_HZ, the fixed tick rate /proc reports in.
    const TICKS_PER_SECOND: f64 = 100.0;

    /// utime + stime from /proc/self/stat.
    pub(super) fn cpu_seconds() -> Option<f64> {
        let stat = fs::read_to_string("/proc/self/stat").ok()?;
        // The command name may contain spaces; fields resume after its ')'.
        let rest = &stat[stat.rfind(')')? + 1..];
        let mut fields = rest.split_whitespace();
        // rest starts at field 3 (state); utime and stime are fields 14 and 15.
        let utime: u64 = fields.nth(11)?.parse().ok()?;
        let stime: u64 = fields.next()?.parse().ok()?;
        Some((utime + stime) as f64 / TICKS_PER_SECOND)
    }

    /// VmRSS from /proc/self/status.
    pub(super) fn resident_memory_bytes() -> Option<u64> {
        let status = fs::read_to_string("/proc/self/status").ok()?;
        let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
        let kib: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
        Some(kib * 1024)
    }
}

#[cfg(not(target_os = "linux"))]
mod proc_stat {
    pub(super) fn cpu_seconds() -> Option<f64> {
        None
    }

    pub(super) fn resident_memory_bytes() -> Option<u64> {
        None
    }
}

/// Result of [`RequestMetrics::basic_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicSnapshot {
    pub request_count: u64,
    pub record_count: u64,
}

/// Registry shared by the request pipeline and the metrics endpoints.
pub struct RequestMetrics {
    http_requests: CounterVec,
    request_duration: HistogramVec,
    notes_count: Gauge,
    request_tally: AtomicU64,
    process: ProcessMetrics,
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            http_requests: CounterVec::default(),
            request_duration: HistogramVec::default(),
            notes_count: Gauge::default(),
            request_tally: AtomicU64::new(0),
            process: ProcessMetrics::capture(),
        }
    }

    /// Count a request on arrival. Returns the new tally.
    pub fn begin_request(&self) -> u64 {
        self.request_tally.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Every request ever received, including ones still in flight.
    pub fn request_count(&self) -> u64 {
        self.request_tally.load(Ordering::Relaxed)
    }

    pub fn increment_request(&self, method: &str, route: &str, status: u16) {
        let status = status.to_string();
        self.http_requests
            .inc(&[("method", method), ("route", route), ("status", &status)]);
    }

    /// Completed requests for one label triple.
    pub fn requests_for(&self, method: &str, route: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.http_requests
            .get(&[("method", method), ("route", route), ("status", &status)])
    }

    pub fn observe_duration(&self, method: &str, route: &str, elapsed: Duration) {
        self.request_duration
            .observe(&[("method", method), ("route", route)], elapsed);
    }

    pub fn durations_observed(&self, method: &str, route: &str) -> u64 {
        self.request_duration.count(&[("method", method), ("route", route)])
    }

    pub fn set_live_count(&self, n: usize) {
        self.notes_count.set(u64::try_from(n).unwrap_or(u64::MAX));
    }

    pub fn live_count(&self) -> u64 {
        self.notes_count.get()
    }

    /// Render every family in Prometheus text exposition format.
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        self.http_requests.render(
            "http_requests_total",
            "Total number of HTTP requests",
            &mut out,
        );
        self.request_duration.render(
            "http_request_duration_micros",
            "HTTP request latency in microseconds",
            &mut out,
        );
        self.notes_count.render(
            "notes_count",
            "Current number of notes stored in memory",
            &mut out,
        );
        self.process.render(&mut out);
        out
    }

    pub fn basic_snapshot(&self) -> BasicSnapshot {
        BasicSnapshot {
            request_count: self.request_count(),
            record_count: self.live_count(),
        }
    }
}
