//! Pairing of the two deployments and per-endpoint reporting

use crate::client::{ApiClient, RequestParams};
use crate::compare::{diff_values, DiffEntry, DiffOptions};
use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use serde_json::Value;

/// Result of comparing one logical resource across both deployments
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub path: String,
    pub params: RequestParams,
    pub entries: Vec<DiffEntry>,
    /// Baseline pagination stopped before the end-of-data sentinel
    pub baseline_truncated: bool,
    /// Candidate pagination stopped before the end-of-data sentinel
    pub candidate_truncated: bool,
    /// Advisory outcomes are reported but never counted as regressions
    pub advisory: bool,
}

impl ComparisonOutcome {
    /// True when the payloads agree and both sides paginated to the end
    ///
    /// A truncated side means the comparison is incomplete, so agreement
    /// of the collected items is not treated as a match.
    pub fn matched(&self) -> bool {
        self.entries.is_empty() && !self.baseline_truncated && !self.candidate_truncated
    }

    fn print_report(&self) {
        if self.matched() {
            println!("✅ {} {} - no differences", self.path, self.params);
            return;
        }

        println!(
            "❌ {} {} - {} differences",
            self.path,
            self.params,
            self.entries.len()
        );
        for entry in &self.entries {
            println!(
                "   [{:>7}] {} : baseline={} candidate={}",
                entry.kind, entry.path, entry.baseline, entry.candidate
            );
        }
        if self.baseline_truncated {
            println!("   baseline pagination stopped early; comparison is partial");
        }
        if self.candidate_truncated {
            println!("   candidate pagination stopped early; comparison is partial");
        }
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub compared: usize,
    pub mismatched: usize,
    pub truncated: usize,
}

/// Fetches each resource from both deployments and diffs the payloads
pub struct Comparator {
    baseline: ApiClient,
    candidate: ApiClient,
    options: DiffOptions,
    page_limit: u32,
    outcomes: Vec<ComparisonOutcome>,
}

impl Comparator {
    pub fn new(config: &HarnessConfig) -> Self {
        let baseline = ApiClient::new(
            "baseline",
            &config.baseline_url,
            &config.auth_token,
            config.request_timeout,
        );
        let candidate = ApiClient::new(
            "candidate",
            &config.candidate_url,
            &config.auth_token,
            config.request_timeout,
        );

        Self {
            baseline,
            candidate,
            options: DiffOptions::default(),
            page_limit: config.page_limit,
            outcomes: Vec::new(),
        }
    }

    /// Compare one non-paginated resource
    pub async fn compare(
        &mut self,
        path: &str,
        params: &RequestParams,
    ) -> HarnessResult<&ComparisonOutcome> {
        self.compare_inner(path, params, false).await
    }

    /// Compare a non-paginated resource whose outcome is advisory only
    ///
    /// Used for endpoints that cannot produce a stable diff, such as the
    /// random hadith.
    pub async fn compare_advisory(
        &mut self,
        path: &str,
        params: &RequestParams,
    ) -> HarnessResult<&ComparisonOutcome> {
        self.compare_inner(path, params, true).await
    }

    async fn compare_inner(
        &mut self,
        path: &str,
        params: &RequestParams,
        advisory: bool,
    ) -> HarnessResult<&ComparisonOutcome> {
        let baseline_body = self.baseline.get_json(path, params).await?;
        let candidate_body = self.candidate.get_json(path, params).await?;

        let entries = diff_values(&baseline_body, &candidate_body, &self.options);
        Ok(self.record(ComparisonOutcome {
            path: path.to_string(),
            params: params.clone(),
            entries,
            baseline_truncated: false,
            candidate_truncated: false,
            advisory,
        }))
    }

    /// Compare one paginated resource, aggregating all pages on each side
    pub async fn compare_paginated(
        &mut self,
        path: &str,
        params: &RequestParams,
    ) -> HarnessResult<&ComparisonOutcome> {
        let baseline_pages = self
            .baseline
            .get_paginated(path, params, self.page_limit)
            .await?;
        let candidate_pages = self
            .candidate
            .get_paginated(path, params, self.page_limit)
            .await?;

        let baseline_body = Value::Array(baseline_pages.items);
        let candidate_body = Value::Array(candidate_pages.items);
        let entries = diff_values(&baseline_body, &candidate_body, &self.options);

        Ok(self.record(ComparisonOutcome {
            path: path.to_string(),
            params: params.clone(),
            entries,
            baseline_truncated: baseline_pages.truncated,
            candidate_truncated: candidate_pages.truncated,
            advisory: false,
        }))
    }

    fn record(&mut self, outcome: ComparisonOutcome) -> &ComparisonOutcome {
        outcome.print_report();
        self.outcomes.push(outcome);
        self.outcomes.last().expect("outcome just pushed")
    }

    pub fn outcomes(&self) -> &[ComparisonOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            compared: self.outcomes.len(),
            mismatched: self
                .outcomes
                .iter()
                .filter(|o| !o.matched() && !o.advisory)
                .count(),
            truncated: self
                .outcomes
                .iter()
                .filter(|o| o.baseline_truncated || o.candidate_truncated)
                .count(),
        }
    }

    /// Print totals for the whole run
    pub fn print_summary(&self) {
        let summary = self.summary();

        println!("\n=== Regression Comparison Summary ===");
        println!("Baseline:  {}", self.baseline.base_url());
        println!("Candidate: {}", self.candidate.base_url());
        println!(
            "Results: {}/{} matched",
            summary.compared - summary.mismatched,
            summary.compared
        );
        if summary.truncated > 0 {
            println!("{} endpoints aggregated only partially", summary.truncated);
        }
        if summary.mismatched == 0 {
            println!("✅ No regressions found");
        } else {
            println!("❌ {} endpoints differ", summary.mismatched);
        }
    }
}
