// Tue Jan 13 2026 - Alex

use crate::asn::LazyLookup;
use crate::config::{Config, ConfigError};
use crate::engine::context::TaskContext;
use crate::engine::result::RunSummary;
use crate::engine::scheduler::TaskScheduler;
use crate::error::Result;
use crate::graph::{self, GraphBuilder, Plan};
use crate::report::ResultMatrix;
use crate::transform::ExternalFilter;
use crate::utils::logging::scoped_timer;
use indicatif::ProgressBar;

#[derive(Debug)]
pub struct PipelineOutcome {
    pub plan: Plan,
    pub summary: RunSummary,
    pub report: ResultMatrix,
}

/// Discovery, graph construction, validation and execution for one config.
pub struct Pipeline {
    config: Config,
    progress: Option<ProgressBar>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds and validates the task graph without running anything.
    pub fn plan(&self) -> Result<Plan> {
        self.config.validate()?;
        let _timer = scoped_timer("planning");

        let scan_file = self
            .config
            .scan_file
            .clone()
            .ok_or(ConfigError::Missing("scan_file"))?;
        let blocklist = self
            .config
            .blocklist
            .clone()
            .ok_or(ConfigError::Missing("blocklist"))?;

        let discovery = graph::discover(&self.config.generation_roots, &self.config.algorithms)?;

        let plan = GraphBuilder::new(&self.config.work_dir, scan_file, blocklist)
            .with_scan_results(self.config.scan_results.clone())
            .with_algorithms(self.config.algorithms.clone())
            .with_ip_field(self.config.ip_field)
            .with_skip_header(self.config.skip_header)
            .with_as_aggregation(self.config.aggregates_ases())
            .build(&discovery)?;

        plan.graph.check_inputs()?;
        Ok(plan)
    }

    pub fn context(&self) -> TaskContext {
        let mut context = TaskContext::new();
        if let Some(program) = &self.config.grepcidr {
            context = context.with_external(ExternalFilter::grepcidr(program));
        }
        if let Some(db) = &self.config.asn_db {
            context = context.with_lookup(LazyLookup::new(db, self.config.asn_db_date));
        }
        context
    }

    pub fn run(&self) -> Result<PipelineOutcome> {
        let plan = self.plan()?;
        let context = self.context();

        let mut scheduler = TaskScheduler::new(self.config.workers).with_mode(self.config.schedule);
        if let Some(progress) = &self.progress {
            progress.set_length(plan.graph.len() as u64);
            scheduler = scheduler.with_progress(progress.clone());
        }

        let summary = scheduler.run(&plan.graph, &context)?;
        log::info!(
            "Executed {}, skipped {} of {} tasks in {:.2?}",
            summary.executed,
            summary.skipped,
            summary.total_tasks,
            summary.wall_time
        );

        let report = ResultMatrix::collect(&plan)?;
        if let Some(path) = &self.config.report {
            report.write_json(path)?;
            log::info!("Wrote report to {}", path.display());
        }

        Ok(PipelineOutcome {
            plan,
            summary,
            report,
        })
    }
}
