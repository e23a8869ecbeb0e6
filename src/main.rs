//! denoise - DeepFilterNet speech denoiser

use clap::Parser;
use deepfilter_denoise::processing::DenoiseProcessor;
use deepfilter_denoise::{init_logging, Args, Config, DeepFilterEnhancer, Result};
use std::process;

fn main() {
    let args = Args::parse();

    // `run` returns before exiting so temporary files are dropped first.
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        eprintln!("Processing aborted.");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args_and_config(args)?;

    // CLI flag or `[output] verbose` from the config file.
    init_logging(config.verbose());
    if config.verbose() {
        println!("{}", deepfilter_denoise::get_library_info());
        println!();
    }
    log::debug!("Model directory: {}", config.model_dir().display());

    println!("=== DeepFilterNet Denoise ===");
    println!("Input: {}", config.input_path.display());
    println!("Output: {}", config.output_path.display());
    println!("Model: {} ({})", config.variant(), config.variant().description());
    println!("=============================\n");

    let enhancer = DeepFilterEnhancer::load(&config)?;
    let mut processor = DenoiseProcessor::from_config(&config, enhancer);
    let result = processor.process_file(&config.input_path, &config.output_path)?;

    println!("=== Processing Complete ===");
    println!("Output: {}", result.output_path.display());
    println!("Time: {:.2}s", result.performance_metrics.processing_time_seconds);
    if config.verbose() {
        match result.original_sample_rate {
            Some(rate) => println!("Sample rate: {} Hz -> {} Hz", rate, result.target_sample_rate),
            None => println!("Sample rate: unknown -> {} Hz", result.target_sample_rate),
        }
        println!("Resampling: {}", result.resample_method.name());
        println!("RTF: {:.3}", result.performance_metrics.real_time_factor);
        println!("Inference: {:.2}ms", result.performance_metrics.inference_time_ms);
    }

    Ok(())
}
