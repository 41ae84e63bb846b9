//! Polls `GET {MONITOR_URL}/health` on an interval and logs availability.
//!
//! Keeps the most recent 1000 samples in memory and logs a summary on exit
//! (after MONITOR_ITERATIONS probes, or on Ctrl-C).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobagent::config::Config;

const MAX_SAMPLES: usize = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ProbeStatus {
    Healthy,
    Unhealthy,
    Unreachable,
    Timeout,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct Sample {
    timestamp: DateTime<Utc>,
    status: ProbeStatus,
    status_code: Option<u16>,
    latency_ms: Option<f64>,
    error: Option<String>,
}

#[derive(Debug, PartialEq)]
struct Summary {
    samples: usize,
    healthy: usize,
    availability_pct: f64,
    mean_latency_ms: Option<f64>,
}

#[derive(Default)]
struct SampleLog {
    samples: VecDeque<Sample>,
}

impl SampleLog {
    fn push(&mut self, sample: Sample) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    fn summary(&self) -> Summary {
        let healthy = self
            .samples
            .iter()
            .filter(|s| s.status == ProbeStatus::Healthy)
            .count();
        let latencies: Vec<f64> = self.samples.iter().filter_map(|s| s.latency_ms).collect();

        Summary {
            samples: self.samples.len(),
            healthy,
            availability_pct: if self.samples.is_empty() {
                0.0
            } else {
                healthy as f64 / self.samples.len() as f64 * 100.0
            },
            mean_latency_ms: if latencies.is_empty() {
                None
            } else {
                Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
            },
        }
    }
}

fn classify_status(code: u16) -> ProbeStatus {
    if code == 200 {
        ProbeStatus::Healthy
    } else {
        ProbeStatus::Unhealthy
    }
}

fn classify_error(err: &reqwest::Error) -> ProbeStatus {
    if err.is_timeout() {
        ProbeStatus::Timeout
    } else if err.is_connect() {
        ProbeStatus::Unreachable
    } else {
        ProbeStatus::Error
    }
}

async fn probe(client: &reqwest::Client, url: &str) -> Sample {
    let started = Instant::now();
    let timestamp = Utc::now();

    match client.get(url).send().await {
        Ok(response) => {
            let code = response.status().as_u16();
            Sample {
                timestamp,
                status: classify_status(code),
                status_code: Some(code),
                latency_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
                error: None,
            }
        }
        Err(err) => Sample {
            timestamp,
            status: classify_error(&err),
            status_code: None,
            latency_ms: None,
            error: Some(err.to_string()),
        },
    }
}

fn log_sample(sample: &Sample) {
    debug!("{}", serde_json::to_string(sample).unwrap_or_default());
    match sample.status {
        ProbeStatus::Healthy => info!(
            "API healthy ({:.1} ms)",
            sample.latency_ms.unwrap_or_default()
        ),
        ProbeStatus::Unhealthy => warn!(
            "API unhealthy: HTTP {}",
            sample.status_code.unwrap_or_default()
        ),
        status => warn!(
            "API {:?}: {}",
            status,
            sample.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn log_summary(log: &SampleLog) {
    let summary = log.summary();
    info!(
        "Monitor summary: {} samples, {} healthy, availability {:.1}%, mean latency {}",
        summary.samples,
        summary.healthy,
        summary.availability_pct,
        summary
            .mean_latency_ms
            .map(|ms| format!("{ms:.1} ms"))
            .unwrap_or_else(|| "n/a".to_string())
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = &config.monitor;
    let url = format!("{}/health", settings.url.trim_end_matches('/'));
    info!(
        "Monitoring {} every {}s ({})",
        url,
        settings.interval_secs,
        if settings.iterations == 0 {
            "until interrupted".to_string()
        } else {
            format!("{} probes", settings.iterations)
        }
    );

    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let mut interval = tokio::time::interval(Duration::from_secs(settings.interval_secs.max(1)));
    let mut log = SampleLog::default();
    let mut probes = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let sample = probe(&client, &url).await;
                log_sample(&sample);
                log.push(sample);
                probes += 1;
                if settings.iterations > 0 && probes >= settings.iterations {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    log_summary(&log);
    Ok(())
}
