//! Command-line surface and process driver

use crate::config::LoadConfig;
use crate::context::{LoadOptions, PipelineContext};
use crate::error::Result;
use crate::format::{PackageFormat, DEFAULT_FORMAT};
use crate::pipeline::{Pipeline, RunSummary};
use crate::source::NdjsonSource;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncRead;
use tracing::{debug, info};

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for a failed run, an unknown format, or a startup error
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-load")]
#[command(author, version, about = "Load dummy work records from NDJSON on stdin")]
pub struct Cli {
    /// Verbose output
    #[arg(long)]
    pub verbose: bool,

    /// User the records are loaded on behalf of
    #[arg(long)]
    pub user: Option<String>,

    /// Mark loaded works as private
    #[arg(long)]
    pub private: bool,

    /// Input package format
    #[arg(long, default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Organization that owns the loaded works
    #[arg(long = "ownerOrg")]
    pub owner_org: Option<String>,

    /// Keep going after failures
    #[arg(long)]
    pub keepgoing: bool,

    /// Directory for the output and error logs
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Package arguments
    #[arg(required = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Resolve `--format`; an unknown format fails before any input is read
    pub fn package_format(&self) -> Result<PackageFormat> {
        self.format.parse()
    }

    /// Apply command-line overrides to the environment configuration
    pub fn apply(&self, mut config: LoadConfig) -> Result<LoadConfig> {
        if let Some(ref dir) = self.output_dir {
            config.output_dir = dir.clone();
            config.validate()?;
        }

        Ok(config)
    }

    pub fn context(&self) -> PipelineContext {
        PipelineContext {
            user_id: self.user.clone(),
        }
    }

    pub fn options(&self) -> LoadOptions {
        LoadOptions {
            owner_org: self.owner_org.clone(),
            private: self.private,
            keepgoing: self.keepgoing,
            verbose: self.verbose,
        }
    }
}

/// Run the selected pipeline over `input`
pub async fn execute<R>(
    cli: &Cli,
    format: PackageFormat,
    config: &LoadConfig,
    input: R,
) -> Result<RunSummary>
where
    R: AsyncRead + Unpin + Send,
{
    debug!(args = ?cli.args, %format, "Loading package");

    match format {
        PackageFormat::DataPackage => {
            let (mut pipeline, artifacts) =
                Pipeline::datapackage(config, cli.context(), cli.options());

            info!(
                output = %artifacts.output_path.display(),
                errors = %artifacts.error_path.display(),
                "Logging records"
            );

            pipeline.run(NdjsonSource::new(input)).await
        },
    }
}

/// Map a completion result to the process exit code
pub fn exit_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
