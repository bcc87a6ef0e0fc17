// Wed Jan 15 2026 - Alex

use super::args::{AnnotateArgs, Args, Command, RunArgs, StabilityArgs};
use crate::asn::{self, snapshot, LazyLookup};
use crate::engine::Pipeline;
use crate::graph::Plan;
use crate::stability;
use crate::ui::progress::ProgressManager;
use crate::ui::table::{Alignment, BorderStyle, TableBuilder};
use crate::utils::{self, logging};
use colored::Colorize;

pub struct CommandHandler {
    use_color: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { use_color: true }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args);

        match args.command {
            Command::Run(run_args) => self.handle_run(run_args, args.quiet),
            Command::Plan(run_args) => self.handle_plan(run_args),
            Command::Annotate(annotate_args) => self.handle_annotate(annotate_args, args.quiet),
            Command::Stability(stability_args) => self.handle_stability(stability_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = if args.quiet {
            log::LevelFilter::Warn
        } else {
            logging::level_from_str(&args.log_level)
        };
        logging::init_logger(level, self.use_color);
    }

    fn handle_run(&self, args: RunArgs, quiet: bool) -> anyhow::Result<()> {
        let config = args.to_config()?;
        println!(
            "{} Evaluating {} against {}",
            "[*]".cyan(),
            utils::pluralize(config.algorithms.len(), "algorithm", "algorithms"),
            utils::pluralize(config.scan_results.len(), "scan result", "scan results")
        );

        let progress = ProgressManager::new().with_enabled(!args.no_progress && !quiet);
        let bar = progress.task_bar("tasks");

        let outcome = Pipeline::new(config).with_progress(bar.clone()).run();
        bar.finish_and_clear();
        let outcome = outcome?;

        let summary = &outcome.summary;
        println!(
            "{} {} executed, {} skipped, {} records written in {}",
            "[+]".green(),
            utils::pluralize(summary.executed, "task", "tasks"),
            summary.skipped,
            summary.records_written,
            utils::format_duration(summary.wall_time)
        );
        self.print_stale(&outcome.plan);
        if outcome.plan.combinations.iter().any(|c| c.placeholder) {
            println!(
                "{} Combinations marked * had no candidate file and count as empty",
                "[!]".yellow()
            );
        }
        println!();
        println!("{}", outcome.report.render(self.use_color));

        Ok(())
    }

    fn handle_plan(&self, args: RunArgs) -> anyhow::Result<()> {
        let config = args.to_config()?;
        let plan = Pipeline::new(config).plan()?;

        println!(
            "{} {} in {}",
            "[*]".cyan(),
            utils::pluralize(plan.graph.len(), "task", "tasks"),
            utils::pluralize(plan.graph.stage_count(), "stage", "stages")
        );

        for (index, stage) in plan.graph.stages().iter().enumerate() {
            println!();
            println!("{}", format!("Stage {}", index).bold());
            for task in stage {
                let marker = if task.output().exists() {
                    "done".green()
                } else {
                    "pending".yellow()
                };
                println!(
                    "  [{}] {:<10} {}",
                    marker,
                    task.op().name(),
                    task.output().display()
                );
            }
        }

        println!();
        println!(
            "{} {} pending",
            "[*]".cyan(),
            utils::pluralize(plan.graph.pending(), "task", "tasks")
        );
        self.print_stale(&plan);

        Ok(())
    }

    fn print_stale(&self, plan: &Plan) {
        for path in &plan.stale_outputs {
            println!(
                "{} {} predates its candidate file and was reused",
                "[!]".yellow(),
                path.display()
            );
        }
    }

    fn handle_annotate(&self, args: AnnotateArgs, quiet: bool) -> anyhow::Result<()> {
        let date = args
            .date
            .or_else(|| snapshot::date_from_path(&args.input));
        let lookup = LazyLookup::new(&args.asn_db, date);
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| asn::default_output(&args.input, args.out_dir.as_deref()));

        println!(
            "{} Annotating {} with {}",
            "[*]".cyan(),
            args.input.display(),
            args.asn_db.display()
        );

        let spinner = ProgressManager::new()
            .with_enabled(!quiet)
            .spinner("Loading routing snapshot");
        let table = lookup.get();
        spinner.finish_and_clear();

        let stats = asn::annotate_csv(&args.input, &output, args.field, table?)?;

        println!(
            "{} {} annotated ({} resolved, {} unparsed) -> {}",
            "[+]".green(),
            utils::pluralize(stats.rows, "row", "rows"),
            stats.resolved,
            stats.unparsed,
            output.display()
        );

        Ok(())
    }

    fn handle_stability(&self, args: StabilityArgs) -> anyhow::Result<()> {
        let files = stability::find_snapshots(
            &args.base_dir,
            &args.extension,
            args.start,
            args.end,
            args.limit,
        )?;
        println!(
            "{} Going through {} in {}",
            "[*]".cyan(),
            utils::pluralize(files.len(), "snapshot", "snapshots"),
            args.base_dir.display()
        );
        if files.is_empty() {
            println!("{} No {} snapshots from {}", "[!]".yellow(), args.extension, args.start);
        }

        let report = stability::analyze(&files)?;
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| stability::default_output(args.start, &args.extension));
        let written = report.write(&output)?;

        let mut table = TableBuilder::new()
            .with_headers(&["date", "total", "current", "stayed", "readded", "new", "gone"])
            .with_color(self.use_color)
            .with_border_style(if self.use_color {
                BorderStyle::Unicode
            } else {
                BorderStyle::Ascii
            });
        for column in 1..7 {
            table = table.with_alignment(column, Alignment::Right);
        }
        for step in report.steps() {
            table = table.add_row(&[
                step.date.to_string(),
                step.total.to_string(),
                step.current.to_string(),
                step.stayed.to_string(),
                step.readded.to_string(),
                step.new.to_string(),
                step.gone.to_string(),
            ]);
        }
        if !report.steps().is_empty() {
            println!();
            println!("{}", table.build());
        }

        println!(
            "{} {} tracked -> {}",
            "[+]".green(),
            utils::pluralize(written, "record", "records"),
            output.display()
        );

        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
