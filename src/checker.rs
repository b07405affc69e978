use log::{debug, info, warn};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::{
    sync::{Semaphore, mpsc},
    time::timeout,
};

use crate::config::ConfigOptions;
use crate::probe::Probe;
use crate::sites::SiteList;

/// Site name to reachability, one entry per distinct input name.
pub type Reachability = BTreeMap<String, bool>;

/// What a probe task hands back to the orchestrator.
struct Report {
    index: usize,
    up: bool,
}

/// Runs one probe per site concurrently and gathers every outcome.
pub struct Checker<P> {
    probe: Arc<P>,
    deadline: Option<Duration>,
    limiter: Option<Arc<Semaphore>>,
}

impl<P: Probe> Checker<P> {
    /// Unbounded fan-out with no deadline beyond the probe's own.
    pub fn new(probe: P) -> Self {
        Self {
            probe: Arc::new(probe),
            deadline: None,
            limiter: None,
        }
    }

    pub fn from_config(probe: P, options: &ConfigOptions) -> Self {
        let mut checker = Self::new(probe);
        if options.timeout_secs > 0 {
            checker = checker.with_deadline(Duration::from_secs(options.timeout_secs));
        }
        if let Some(max) = options.max_in_flight {
            checker = checker.with_max_in_flight(max);
        }
        checker
    }

    /// Bounds every probe; an expired probe counts as unreachable.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Caps how many probes may be in flight at once. Zero means no cap.
    ///
    /// Values above [`Semaphore::MAX_PERMITS`] are clamped to it.
    #[must_use]
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        let max = max.min(Semaphore::MAX_PERMITS);
        self.limiter = (max > 0).then(|| Arc::new(Semaphore::new(max)));
        self
    }

    /// Probes every site and returns once all of them have reported.
    ///
    /// Probe tasks never touch the result; they send reports over a channel
    /// and this function is the only writer. Outcomes are slotted by list
    /// position, so if two sites share a name the later one in the list wins.
    pub async fn check_all(&self, sites: &SiteList) -> Reachability {
        if sites.is_empty() {
            return Reachability::new();
        }

        let expected = sites.len();
        let (tx, mut rx) = mpsc::channel::<Report>(expected);

        for (index, site) in sites.iter().enumerate() {
            let tx = tx.clone();
            let probe = Arc::clone(&self.probe);
            let limiter = self.limiter.clone();
            let deadline = self.deadline;
            let url = site.url.clone();

            tokio::spawn(async move {
                // Held until the report is sent.
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };

                let up = match deadline {
                    Some(limit) => timeout(limit, probe.check(&url)).await.unwrap_or_else(|_| {
                        info!("Checking {url} timed out after {limit:?}");
                        false
                    }),
                    None => probe.check(&url).await,
                };

                // The receiver only goes away if the caller dropped check_all.
                let _ = tx.send(Report { index, up }).await;
            });
        }
        drop(tx);

        let mut outcomes: Vec<Option<bool>> = vec![None; expected];
        let mut received = 0;
        while received < expected {
            if let Some(Report { index, up }) = rx.recv().await {
                outcomes[index] = Some(up);
                received += 1;
            } else {
                warn!(
                    "{} probe(s) ended without reporting, marking them as down",
                    expected - received
                );
                break;
            }
        }
        debug!("Collected {received}/{expected} probe reports");

        sites
            .iter()
            .zip(outcomes)
            .map(|(site, up)| (site.name.clone(), up.unwrap_or(false)))
            .collect()
    }
}
