//! Presence Client Entry Point
//!
//! Operator front end for the liveness verifier. Uses `anyhow` for startup
//! errors; session-level errors are `liveness::LivenessError` and are
//! rendered as operator text rather than propagated.

use clap::{Parser, Subcommand};
use liveness::application::sampler::lock_sampler;
use liveness::presentation::render;
use liveness::{
    AgeEstimate, AgeEstimationUseCase, AgePrediction, DirectoryDevice, FacingMode, FrameSampler,
    HttpVerifier, LivenessConfig, Phase, SessionController, SessionView, SharedSampler,
    StatusLine,
};
use kernel::error::app_error::AppError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "presence", version, about = "Proof-of-presence liveness client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory of JPEG stills used as the camera (`front/` and `rear/` optional)
    #[arg(long, env = "PRESENCE_CAPTURE_DIR", default_value = "captures")]
    capture_dir: PathBuf,

    /// Camera to open: `user` or `environment`
    #[arg(long)]
    facing: Option<FacingMode>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Run one challenge session until it succeeds, fails or is interrupted
    Session,
    /// Capture one frame and ask the verifier for an age estimate
    Age,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presence=info,liveness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = LivenessConfig::from_env()?;
    if let Some(facing) = cli.facing {
        config.facing_mode = facing;
    }
    tracing::info!(
        verifier = %config.verifier_base_url,
        capture_dir = %cli.capture_dir.display(),
        facing = %config.facing_mode,
        "Presence client configured"
    );

    let verifier = Arc::new(HttpVerifier::new(&config)?);

    let mut sampler = FrameSampler::new(
        Box::new(DirectoryDevice::new(cli.capture_dir.clone())),
        config.facing_mode,
    );
    if let Err(e) = sampler.start_camera(config.facing_mode) {
        let err: AppError = e.into();
        eprintln!("{}", err.action().unwrap_or(err.message()));
        tracing::error!(error = %err, "Camera unavailable");
        return Ok(ExitCode::from(2));
    }
    let sampler = sampler.into_shared();

    let code = match cli.command.unwrap_or(Command::Session) {
        Command::Session => run_session(verifier, Arc::clone(&sampler), &config).await?,
        Command::Age => run_age_estimation(verifier, Arc::clone(&sampler)).await?,
    };

    lock_sampler(&sampler).stop();
    Ok(code)
}

async fn run_session(
    verifier: Arc<HttpVerifier>,
    sampler: SharedSampler,
    config: &LivenessConfig,
) -> anyhow::Result<ExitCode> {
    let controller = SessionController::spawn(verifier, sampler, config);

    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let line = render::session_line(&updates.borrow_and_update());
            println!("{line}");
        }
    });

    controller.start()?;
    let view = tokio::select! {
        outcome = controller.wait_for_outcome() => outcome?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cancelling session");
            controller.stop()?;
            controller.wait_for_outcome().await?
        }
    };

    controller.dispose().await;
    let _ = printer.await;

    Ok(session_exit_code(&view))
}

fn session_exit_code(view: &SessionView) -> ExitCode {
    match (view.phase, &view.status) {
        (Phase::Done, _) => ExitCode::SUCCESS,
        (Phase::Failed, _) => ExitCode::from(1),
        (_, StatusLine::Cancelled) => ExitCode::from(130),
        // Session never started
        _ => ExitCode::from(2),
    }
}

async fn run_age_estimation(
    verifier: Arc<HttpVerifier>,
    sampler: SharedSampler,
) -> anyhow::Result<ExitCode> {
    let use_case = AgeEstimationUseCase::new(verifier, sampler);
    let estimate = use_case.execute().await?;
    println!("{}", render::age_text(&estimate));

    Ok(match estimate {
        AgeEstimate::Answered(AgePrediction::Estimated(_)) => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    })
}
