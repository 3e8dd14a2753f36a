use clap::Parser;
use denpa::prelude::*;
use std::fs;
use std::time::Instant;

/// A dependency-graph recalculation and what-if simulation engine CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the canvas graph JSON file
    graph_path: String,

    /// Run a sensitivity simulation against this target, as 'module:metric'
    #[arg(long, requires = "simulate_input")]
    simulate_target: Option<String>,

    /// The input to perturb, as 'module:port'
    #[arg(long, requires = "simulate_target")]
    simulate_input: Option<String>,

    /// Percentage applied to the perturbed input
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    percent: f64,

    /// Trace the upstream sources of a metric, as 'module:metric'
    #[arg(long)]
    trace: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. File loading and conversion ---
    let load_start = Instant::now();
    let graph_json = fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            &cli.graph_path, e
        ))
    });
    let document: CanvasDocument = serde_json::from_str(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)));
    let graph = document
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert document: {}", e)));
    let load_duration = load_start.elapsed();

    println!(
        "Loaded graph: {} modules, {} connections",
        graph.modules().len(),
        graph.connections().len()
    );

    // --- 2. Recalculation ---
    let recalc_start = Instant::now();
    let mut engine = Recalculator::new(graph);
    let updated = engine.recalculate();
    let recalc_duration = recalc_start.elapsed();

    println!("\nRecalculation finished: {} modules updated", updated.len());
    for module in engine.graph().modules() {
        println!("  {}:", module.id);
        for (port, value) in &module.outputs {
            println!("    {} = {}", port, value);
        }
    }

    // --- 3. Optional analysis ---
    if let Some(spec) = &cli.trace {
        let (module, metric) = parse_pair(spec, "--trace");
        println!("\nUpstream sources of {}:{}", module, metric);
        for source in engine.trace_sources(module, metric) {
            println!(
                "  {}:{}  impact {}  direct {}  via {}",
                source.module,
                source.metric,
                source.impact_score,
                source.direct_impact,
                source.path.join(" <- ")
            );
        }
    }

    if let (Some(target), Some(input)) = (&cli.simulate_target, &cli.simulate_input) {
        let (target_module, target_metric) = parse_pair(target, "--simulate-target");
        let (input_module, input_port) = parse_pair(input, "--simulate-input");

        let report = engine
            .simulate(target_module, target_metric, input_module, input_port, cli.percent)
            .unwrap_or_else(|e| exit_with_error(&format!("Simulation failed: {}", e)));

        println!(
            "\nSimulation: {}:{} {:+}% -> {} = {}",
            input_module, input_port, cli.percent, input_port, report.changed_input.new_value
        );
        println!(
            "  {}:{}  {} -> {}  ({:+.2}%)",
            target_module,
            target_metric,
            report.target_metric.original_value,
            report.target_metric.new_value,
            report.target_metric.percent_change
        );
        println!("  Affected modules: {}", report.affected_modules.len());
        for affected in &report.affected_modules {
            println!("    {}", affected.module);
        }
    }

    // --- 4. Summary ---
    println!("\n--- Performance Summary ---");
    println!("File Loading:     {:?}", load_duration);
    println!("Recalculation:    {:?}", recalc_duration);
    println!("---------------------------");
    println!("Total Execution:  {:?}", total_start.elapsed());
}

/// Splits a 'module:port' argument, exiting with a usage error otherwise.
fn parse_pair<'a>(spec: &'a str, flag: &str) -> (&'a str, &'a str) {
    spec.split_once(':').unwrap_or_else(|| {
        exit_with_error(&format!("{} expects 'module:port', got '{}'", flag, spec))
    })
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
