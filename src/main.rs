use clap::Parser;
use handle_verifier::utils::logger;
use handle_verifier::{CliConfig, HttpClassifier, RunReport, VerifierEngine, VerifyError};

fn fail(e: &VerifyError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting handle-verifier");
    tracing::debug!("CLI config: {:?}", config);

    // Input problems end the run before any probing.
    let selection = config.selection().unwrap_or_else(|e| fail(&e));
    let settings = config.settings().unwrap_or_else(|e| fail(&e));
    let classifier = HttpClassifier::new(&settings)?;
    let engine = VerifierEngine::new(classifier, settings);

    match engine.run(&config.input, selection).await {
        Ok(RunReport::Probed(passes)) => {
            for (platform, summary) in passes {
                println!(
                    "✅ {}: {} probed, {} exist, {} missing, {} skipped",
                    platform, summary.probed, summary.existing, summary.missing, summary.skipped
                );
            }
        }
        Ok(RunReport::Combined(summary)) => {
            for platform in &summary.missing_logs {
                println!("⚠️ No {} log found; its columns are empty", platform);
            }
            println!(
                "✅ Finished writing {} rows to {}",
                summary.rows,
                summary.report_path.display()
            );
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
