//! Bounded-concurrency dispatch of probes
//!
//! A feeder task pushes host names into a bounded request channel that is
//! shared by a fixed pool of `min(width, hosts)` workers. Each worker runs
//! one probe at a time, so the pool size is the cap on live ping processes.
//! Results flow back through a second channel that the caller drains until
//! every worker has dropped its sender; a worker that dies early therefore
//! cannot make the collector wait forever.
//!
//! Outside of cancellation every host yields exactly one [`ProbeResult`]:
//! failures become sentinel rows, and hosts lost with a crashed worker are
//! filled in after the pool drains.

use crate::{
    error::{AppError, Result},
    logging::ProbeLogger,
    models::{Config, FailureKind, HostStat, ProbeResult},
    probe::{parse_output, ProbeRunner},
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

/// Parameters of one dispatch run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Maximum number of probes in flight
    pub width: usize,
    /// Echo requests per host
    pub probe_count: u32,
    /// Latency recorded for failed hosts
    pub sentinel_ms: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            width: crate::defaults::DEFAULT_CONCURRENCY,
            probe_count: crate::defaults::DEFAULT_PROBE_COUNT,
            sentinel_ms: crate::defaults::SENTINEL_MS,
        }
    }
}

impl From<&Config> for ExecutionConfig {
    fn from(config: &Config) -> Self {
        Self {
            width: config.concurrency,
            probe_count: config.probe_count,
            sentinel_ms: config.sentinel_ms,
        }
    }
}

/// Everything the dispatcher collected, in completion order
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub results: Vec<ProbeResult>,
    /// Number of workers that were started
    pub workers: usize,
    /// True when the run was interrupted; `results` may then be short
    pub cancelled: bool,
    pub elapsed: Duration,
    sentinel_ms: f64,
}

impl DispatchReport {
    /// Per-host statistics, failures mapped to the sentinel
    pub fn stats(&self) -> Vec<HostStat> {
        self.results.iter().map(|r| r.to_stat(self.sentinel_ms)).collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs a [`ProbeRunner`] over a host list with bounded parallelism
pub struct DispatchEngine<R: ProbeRunner + ?Sized> {
    runner: Arc<R>,
    config: ExecutionConfig,
    logger: ProbeLogger,
}

impl<R: ProbeRunner + ?Sized + 'static> DispatchEngine<R> {
    pub fn new(runner: Arc<R>, config: ExecutionConfig, logger: ProbeLogger) -> Self {
        Self { runner, config, logger }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Workers started for `hosts` entries; never more than there is work
    pub fn pool_size(&self, hosts: usize) -> usize {
        self.config.width.min(hosts)
    }

    /// Probe every host and collect one result per host.
    ///
    /// When `cancel` fires, no further hosts are handed out, in-flight
    /// probes are dropped (killing their processes) and the results that
    /// had already completed are returned.
    pub async fn dispatch(&self, hosts: &[String], cancel: CancellationToken) -> Result<DispatchReport> {
        if self.config.width == 0 {
            return Err(AppError::validation("Pool width must be at least 1"));
        }
        if self.config.probe_count == 0 {
            return Err(AppError::validation("Probe count must be at least 1"));
        }

        let started = Instant::now();
        let workers = self.pool_size(hosts.len());
        if workers == 0 {
            return Ok(self.report(Vec::new(), 0, cancel.is_cancelled(), started));
        }

        let (request_tx, request_rx) = mpsc::channel::<String>(workers);
        let (result_tx, mut result_rx) = mpsc::channel::<ProbeResult>(workers);
        let requests = Arc::new(Mutex::new(request_rx));

        let mut tasks = JoinSet::new();

        let feed = hosts.to_vec();
        let feeder_cancel = cancel.clone();
        tasks.spawn(async move {
            for host in feed {
                tokio::select! {
                    biased;
                    _ = feeder_cancel.cancelled() => break,
                    sent = request_tx.send(host) => {
                        // Every worker is gone
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        for id in 0..workers {
            let worker = Worker {
                id,
                runner: Arc::clone(&self.runner),
                requests: Arc::clone(&requests),
                results: result_tx.clone(),
                cancel: cancel.clone(),
                probe_count: self.config.probe_count,
                logger: self.logger.clone(),
            };
            tasks.spawn(worker.run());
        }
        drop(result_tx);
        drop(requests);

        let mut results = Vec::with_capacity(hosts.len());
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                let error = AppError::from(e);
                self.logger.logger().error("Dispatch task stopped abnormally")
                    .error_info(&error)
                    .field("reason", error.to_string())
                    .log();
            }
        }

        let cancelled = cancel.is_cancelled();
        if !cancelled && results.len() < hosts.len() {
            for host in unreported(hosts, &results) {
                self.logger.probe_failed(&host, "worker stopped before reporting");
                results.push(ProbeResult::failed(host, FailureKind::Lost, "worker stopped before reporting"));
            }
        }

        let report = self.report(results, workers, cancelled, started);
        self.logger.dispatch_summary(
            hosts.len(),
            workers,
            report.failed_count(),
            report.cancelled,
            report.elapsed.as_secs_f64() * 1000.0,
        );

        Ok(report)
    }

    fn report(&self, results: Vec<ProbeResult>, workers: usize, cancelled: bool, started: Instant) -> DispatchReport {
        DispatchReport {
            results,
            workers,
            cancelled,
            elapsed: started.elapsed(),
            sentinel_ms: self.config.sentinel_ms,
        }
    }
}

/// Hosts (with multiplicity) that have no result yet
fn unreported(hosts: &[String], results: &[ProbeResult]) -> Vec<String> {
    let mut reported: HashMap<&str, usize> = HashMap::new();
    for result in results {
        *reported.entry(result.host.as_str()).or_default() += 1;
    }

    hosts
        .iter()
        .filter(|host| match reported.get_mut(host.as_str()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

struct Worker<R: ProbeRunner + ?Sized> {
    id: usize,
    runner: Arc<R>,
    requests: Arc<Mutex<mpsc::Receiver<String>>>,
    results: mpsc::Sender<ProbeResult>,
    cancel: CancellationToken,
    probe_count: u32,
    logger: ProbeLogger,
}

impl<R: ProbeRunner + ?Sized> Worker<R> {
    async fn run(self) {
        loop {
            let host = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return,
                next = next_request(&self.requests) => match next {
                    Some(host) => host,
                    None => return,
                },
            };

            self.logger.probe_started(self.id, &host);

            // Losing this race drops the probe future and kills the child
            let output = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return,
                output = self.runner.run(&host, self.probe_count) => output,
            };

            let result = self.interpret(host, output);
            if self.results.send(result).await.is_err() {
                return;
            }
        }
    }

    fn interpret(&self, host: String, output: Result<String>) -> ProbeResult {
        let text = match output {
            Ok(text) => text,
            Err(error) => {
                let kind = match error {
                    AppError::Timeout(_) => FailureKind::Timeout,
                    _ => FailureKind::Invocation,
                };
                self.logger.probe_failed(&host, &error.to_string());
                return ProbeResult::failed(host, kind, error.to_string());
            }
        };

        match parse_output(&text, self.runner.format()) {
            Ok(parsed) => {
                let stat = HostStat::measured(host, parsed);
                self.logger.probe_finished(self.id, &stat);
                ProbeResult::measured(stat)
            }
            Err(failure) => {
                self.logger.probe_failed(&host, &failure.to_string());
                ProbeResult::failed(host, FailureKind::Unparsed, failure.to_string())
            }
        }
    }
}

async fn next_request(requests: &Mutex<mpsc::Receiver<String>>) -> Option<String> {
    requests.lock().await.recv().await
}
