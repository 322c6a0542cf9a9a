use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::handler::{self, HandlerResponse};
use crate::output::{render_markdown, write_report};
use crate::provider::create_gateway;
use crate::runner::{Orchestrator, OrchestratorOptions};
use anyhow::Context;
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};

const EXIT_SERVER_ERROR: i32 = 1;
const EXIT_CLIENT_ERROR: i32 = 2;

pub async fn execute(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = args.config.load()?;

    // Apply CLI overrides
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    config.validate()?;

    let registry = Arc::new(config.registry()?);
    let options = OrchestratorOptions {
        concurrency: config.concurrency,
        request_timeout: config.request_timeout(),
    };

    // A missing credential is reported by the handler, after the story is validated
    let orchestrator = create_gateway(&config, args.config.api_key.as_deref())
        .map(|gateway| Orchestrator::new(registry.clone(), gateway, options));
    if let Err(e) = &orchestrator {
        warn!("Completion gateway unavailable: {}", e);
    }

    let input = read_input(&args)?;
    let body = if args.json {
        input
    } else {
        serde_json::json!({ "story": input }).to_string()
    };

    let rendered = match args.format {
        OutputFormat::Json => {
            let response = handler::handle_analyze(orchestrator.as_ref(), &body).await;
            if !response.is_success() {
                return fail(response);
            }
            serde_json::to_string_pretty(&response.body)?
        }
        OutputFormat::Markdown => {
            let outcome = match handler::parse_request(&body) {
                Ok(story) => handler::analyze_story(orchestrator.as_ref(), &story).await,
                Err(e) => Err(HandlerResponse::from(e)),
            };
            match outcome {
                Ok(result) => render_markdown(&result, &registry),
                Err(response) => return fail(response),
            }
        }
    };

    println!("{}", rendered);

    if let Some(path) = &args.output {
        write_report(path, &rendered)?;
        info!("Wrote analysis to {:?}", path);
    }

    Ok(())
}

fn read_input(args: &AnalyzeArgs) -> anyhow::Result<String> {
    if let Some(story) = &args.story {
        return Ok(story.clone());
    }

    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read story from {:?}", path));
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read story from stdin")?;
    Ok(input)
}

/// Print the error body and exit with a status reflecting who is at fault
fn fail(response: HandlerResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    let code = if response.is_client_error() {
        EXIT_CLIENT_ERROR
    } else {
        EXIT_SERVER_ERROR
    };
    eprintln!(
        "Analysis failed ({}): {}",
        response.status,
        response.error_code().unwrap_or("UNKNOWN")
    );
    std::process::exit(code);
}
