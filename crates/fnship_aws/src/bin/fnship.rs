use std::process::ExitCode;

use chrono::Utc;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fnship_aws::adapters::git::GitBranchLookup;
use fnship_aws::adapters::lambda::LambdaFunctionPlatform;
use fnship_aws::adapters::sts::StsIdentityProvider;
use fnship_core::driver::DriverConfig;
use fnship_core::error::DeployError;
use fnship_core::request::DeploymentInputs;
use fnship_core::retry::ThreadSleeper;
use fnship_core::workflow::{run_deployment, DeployOutcome, DeploymentEnv, WorkflowConfig};

#[derive(Debug, Parser)]
#[command(
    name = "fnship",
    version,
    about = "Deploy a packaged function and repoint its branch alias"
)]
struct Cli {
    /// Function to deploy
    function_name: String,

    /// Region hosting the function
    region: String,

    /// Branch choosing the alias; defaults to the checked-out branch
    branch_name: Option<String>,

    /// Print the outcome as a single JSON object on stdout
    #[arg(long)]
    json: bool,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, env = "FNSHIP_VERBOSE")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(parse_error) => return report_parse_failure(&parse_error),
    };

    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(runtime_error) => {
            eprintln!("fnship: async runtime failed to start: {runtime_error}");
            return ExitCode::FAILURE;
        }
    };

    match deploy(&cli, &runtime) {
        Ok(outcome) => {
            print_outcome(&outcome, cli.json);
            ExitCode::SUCCESS
        }
        Err(deploy_error) => report_failure(&deploy_error),
    }
}

fn deploy(cli: &Cli, runtime: &tokio::runtime::Runtime) -> Result<DeployOutcome, DeployError> {
    let aws_config = runtime.block_on(
        aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(cli.region.trim().to_string()))
            .load(),
    );

    let platform = LambdaFunctionPlatform::new(
        aws_sdk_lambda::Client::new(&aws_config),
        runtime.handle().clone(),
    );
    let identity =
        StsIdentityProvider::new(aws_sdk_sts::Client::new(&aws_config), runtime.handle().clone());
    let branches = GitBranchLookup;
    let sleeper = ThreadSleeper;

    let search_root = std::env::current_dir().map_err(|error| DeployError::ArtifactNotFound {
        detail: format!("working directory is not accessible: {error}"),
    })?;

    let env = DeploymentEnv {
        search_root: &search_root,
        branches: &branches,
        identity: &identity,
        platform: &platform,
        sleeper: &sleeper,
    };
    let config = WorkflowConfig {
        driver: DriverConfig::default(),
        deployed_at: Utc::now().to_rfc3339(),
    };
    let inputs = DeploymentInputs {
        function_name: cli.function_name.clone(),
        region: cli.region.clone(),
        branch: cli.branch_name.clone(),
    };

    run_deployment(inputs, &env, &config)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_outcome(outcome: &DeployOutcome, json: bool) {
    if json {
        let line = serde_json::to_string(outcome).expect("outcome serialization should not fail");
        println!("{line}");
    } else {
        println!("{}", human_line(outcome));
    }
}

fn human_line(outcome: &DeployOutcome) -> String {
    format!(
        "deployed {} version {} in {}; alias {} {} for branch {}",
        outcome.function_name,
        outcome.version,
        outcome.region,
        outcome.alias_name,
        outcome.alias_action.as_str(),
        outcome.branch_name
    )
}

fn report_failure(deploy_error: &DeployError) -> ExitCode {
    error!(
        classification = deploy_error.classification(),
        %deploy_error,
        "deployment failed"
    );
    eprintln!(
        "deploy failed [{}]: {} ({})",
        deploy_error.classification(),
        deploy_error,
        deploy_error.recovery_hint()
    );
    ExitCode::FAILURE
}

fn report_parse_failure(parse_error: &clap::Error) -> ExitCode {
    let _ = parse_error.print();
    if is_informational(parse_error.kind()) {
        return ExitCode::SUCCESS;
    }

    let classified = DeployError::InvalidArguments {
        detail: "see the usage above".to_string(),
    };
    eprintln!(
        "deploy failed [{}]: {} ({})",
        classified.classification(),
        classified,
        classified.recovery_hint()
    );
    ExitCode::FAILURE
}

/// Help and version requests surface as parse errors but exit zero.
fn is_informational(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}
