// main.rs - CLI entry point

use std::time::Instant;
use ukbprep::cli::validation::{CompilePlan, JoinPlan, SelectPlan};
use ukbprep::cli::{Config, TaskPlan};
use ukbprep::output::{summary_path, write_compiled, write_summary};
use ukbprep::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<()> {
    let args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    if args.list_selectors {
        println!("Available selectors:");
        for (name, desc) in SelectorRegistry::new().list_selectors() {
            println!("  - {}: {}", name, desc);
        }
        return Ok(());
    }

    let env = Environment::from_env();
    let args = args.with_environment(&env)?;
    let validation = validate_args(&args, &env)?;

    ukbprep::logging::init(validation.output_dir.as_deref())?;

    println!("🚀 {}", ukbprep::get_info());
    println!("📋 Task: {}", validation.task.as_str());

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| PrepError::config(format!("Failed to configure thread pool: {}", e)))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    let total_start = Instant::now();
    tracing::info!(command = %command_line, "run started");

    match &validation.plan {
        TaskPlan::Join(plan) => run_join(plan, args.dry_run, &command_line)?,
        TaskPlan::Compile(plan) => run_compile(plan, args.dry_run, &command_line)?,
        TaskPlan::Select(plan) => run_select(plan, args.dry_run, &command_line)?,
    }

    println!(
        "\n🎉 Completed in {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_join(plan: &JoinPlan, dry_run: bool, command_line: &str) -> Result<()> {
    let loader = DataLoader::with_options(plan.options.clone());

    if dry_run {
        let phenotypes = loader.load_phenotypes(&plan.phenotypes)?;
        let link = loader.load_link(&plan.link)?;
        println!("✅ Dry run completed successfully");
        println!(
            "📊 Inputs: {} phenotype rows × {} fields, {} link rows",
            phenotypes.len(),
            phenotypes.fields.len(),
            link.len()
        );
        return Ok(());
    }

    let joined = loader.load_and_join(&plan.phenotypes, &plan.link)?;

    if let Some(output) = &plan.output {
        write_joined(output, &plan.format, &joined)?;

        let mut summary = RunSummary::new("join", command_line);
        summary.add_input(&plan.phenotypes)?;
        summary.add_input(&plan.link)?;
        summary.add_output(output);
        summary.report = Some(joined.report.clone());
        write_summary(&summary_path(output), &summary)?;
    }
    Ok(())
}

fn run_compile(plan: &CompilePlan, dry_run: bool, command_line: &str) -> Result<()> {
    if dry_run {
        let files = ukbprep::core::compile::list_chromosome_files(&plan.chromosome_dir)?;
        println!("✅ Dry run completed successfully");
        println!(
            "📊 {} SNPs requested across {} chromosome files",
            plan.snps.len(),
            files.len()
        );
        return Ok(());
    }

    let compiled = compile_snps(
        &plan.snps,
        &plan.factors,
        &plan.chromosome_dir,
        &plan.id_column,
    )?;

    if let Some(output) = &plan.output {
        write_compiled(output, &compiled)?;

        let mut summary = RunSummary::new("compile", command_line);
        for file in ukbprep::core::compile::list_chromosome_files(&plan.chromosome_dir)? {
            summary.add_input(&file)?;
        }
        summary.add_output(output);
        write_summary(&summary_path(output), &summary)?;
    }
    Ok(())
}

fn run_select(plan: &SelectPlan, dry_run: bool, command_line: &str) -> Result<()> {
    let data = Dataset::from_csv(&plan.data, &plan.id_column, &plan.target, &plan.drop_columns)?;

    if dry_run {
        println!("✅ Dry run completed successfully");
        println!(
            "📊 Would run {} over {} bootstraps",
            plan.selectors.join(", "),
            plan.bootstrap
                .bootstraps
                .as_ref()
                .map_or(plan.bootstrap.n_bootstraps, |b| b.len())
        );
        return Ok(());
    }

    let registry = SelectorRegistry::new();
    let selectors = registry.resolve(&plan.selectors)?;

    let mut run = SelectionRun::new(data, &plan.out_dir, plan.seed)?;
    run.bootstrapped_feat_select(&plan.bootstrap, &selectors, &plan.selectors, &plan.params)?;

    let aggregate = plan.out_dir.join(format!("{}.csv", plan.bootstrap.out_name));
    let mut summary = RunSummary::new("select", command_line);
    summary.add_input(&plan.data)?;
    summary.add_output(&aggregate);
    summary.add_output(
        &plan
            .out_dir
            .join(format!("{}_bootstraps.csv", plan.bootstrap.out_name)),
    );
    write_summary(&summary_path(&aggregate), &summary)?;
    Ok(())
}
