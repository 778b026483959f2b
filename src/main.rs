//! Binary entry point for the `octo-infra` CLI.

use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use thiserror::Error;

use octo_infra::logging::{self, LoggingError};
use octo_infra::models::{
    AssetFilter, CredentialsQuery, InstanceTeardown, ObjectInfo, ObjectQuery, ObjectRef,
    ParameterQuery, Region, ServiceInstance, ServiceQuery, VpcTeardown,
};
use octo_infra::{
    AwsConfig, AwsControlPlane, ConfigError, Ec2, Identity, InfraError, Network, ObjectStore,
    ParameterStore, ServiceDiscovery, TeardownReport, Timings,
};

mod cli;

use cli::{
    Cli, InstanceCommand, S3Command, ServiceCommand, SsmCommand, TagArgs, VpcCommand,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("teardown of {vpc_id} left {failures} resource(s) behind")]
    IncompleteTeardown { vpc_id: String, failures: usize },
}

struct Session {
    control_plane: Arc<AwsControlPlane>,
    timings: Timings,
}

impl Session {
    async fn open() -> Result<Self, CliError> {
        let config = AwsConfig::load_without_cli_args()?;
        let timings = config.timings()?;
        logging::init(&config.log_level)?;
        let control_plane = Arc::new(AwsControlPlane::from_config(&config).await);
        Ok(Self {
            control_plane,
            timings,
        })
    }

    fn network(&self) -> Network<AwsControlPlane> {
        Network::new(Arc::clone(&self.control_plane), self.timings)
    }

    fn ec2(&self) -> Ec2<AwsControlPlane> {
        Ec2::new(Arc::clone(&self.control_plane), self.timings)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    let exit_code = match dispatch(cli, &mut stdout).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    match cli {
        Cli::Regions => write_regions(out),
        Cli::Identity => {
            let session = Session::open().await?;
            let identity = Identity::new(Arc::clone(&session.control_plane))
                .caller_identity()
                .await?;
            writeln!(out, "account: {}", identity.account)?;
            writeln!(out, "arn: {}", identity.arn)?;
            writeln!(out, "user id: {}", identity.user_id)?;
            Ok(())
        }
        Cli::Vpc(command) => run_vpc(command, out).await,
        Cli::Instance(command) => run_instance(command, out).await,
        Cli::S3(command) => run_s3(command, out).await,
        Cli::Ssm(SsmCommand::Get(args)) => {
            let session = Session::open().await?;
            let value = ParameterStore::new(Arc::clone(&session.control_plane))
                .get_parameter(&ParameterQuery::new(args.name).decrypt(!args.no_decrypt))
                .await?;
            writeln!(out, "{value}")?;
            Ok(())
        }
        Cli::Service(ServiceCommand::Find(args)) => {
            let session = Session::open().await?;
            let mut query = ServiceQuery::new(args.namespace, args.service);
            for (key, value) in args.attributes {
                query = query.attribute(key, value);
            }
            if let Some(region) = args.region {
                query = query.region(region);
            }
            let instance = ServiceDiscovery::new(Arc::clone(&session.control_plane))
                .find_service_instance(&query)
                .await?;
            write_service_instance(out, &instance)
        }
    }
}

async fn run_vpc(command: VpcCommand, out: &mut impl Write) -> Result<(), CliError> {
    let session = Session::open().await?;
    match command {
        VpcCommand::Destroy(args) => {
            let teardown = VpcTeardown::new(args.vpc_id).full_cleanup(!args.keep_resources);
            let report = session.network().destroy_vpc(&teardown).await?;
            write_report(out, &report)?;
            let failures = report.failures().count();
            if failures > 0 {
                return Err(CliError::IncompleteTeardown {
                    vpc_id: report.vpc_id,
                    failures,
                });
            }
            Ok(())
        }
        VpcCommand::Find(args) => {
            let vpc_id = session.network().find_vpc(&tag_filter(args)).await?;
            writeln!(out, "{vpc_id}")?;
            Ok(())
        }
    }
}

async fn run_instance(command: InstanceCommand, out: &mut impl Write) -> Result<(), CliError> {
    let session = Session::open().await?;
    match command {
        InstanceCommand::Find(args) => {
            let mut filter = tag_filter(args.tags);
            if let Some(vpc_id) = args.vpc {
                filter = filter.vpc_id(vpc_id);
            }
            if let Some(state) = args.state {
                filter = filter.state(state);
            }
            let found = if args.types {
                session.ec2().find_instance_types(&filter).await?
            } else {
                session.ec2().find_instances(&filter).await?
            };
            write_lines(out, &found)
        }
        InstanceCommand::Credentials(args) => {
            let query = CredentialsQuery::new(args.instance_id, Utf8PathBuf::from(args.key))
                .timeout(Duration::from_secs(args.timeout));
            let credentials = session.ec2().find_credentials(&query).await?;
            writeln!(out, "username: {}", credentials.username)?;
            writeln!(out, "password: {}", credentials.password)?;
            Ok(())
        }
        InstanceCommand::Destroy(args) => {
            let teardown = InstanceTeardown::new(args.instance_id)
                .destroy_keypair(!args.keep_keypair)
                .wait_for_stopped(args.wait_stopped)
                .wait_for_termination(!args.no_wait);
            session.ec2().destroy_instance(&teardown).await?;
            writeln!(out, "destroyed {}", teardown.instance_id)?;
            Ok(())
        }
    }
}

async fn run_s3(command: S3Command, out: &mut impl Write) -> Result<(), CliError> {
    let session = Session::open().await?;
    let store = ObjectStore::new(Arc::clone(&session.control_plane));
    match command {
        S3Command::Find(args) => {
            let mut query = ObjectQuery::new(args.bucket)
                .prefix(args.prefix)
                .folders_only(args.folders);
            for pattern in args.filters {
                query = query.filter(pattern);
            }
            let found = store.find_objects(&query).await?;
            write_objects(out, &found)
        }
        S3Command::Exists(args) => {
            let exists = store
                .check_object_exists(&ObjectRef::new(args.bucket, args.key))
                .await?;
            writeln!(out, "{exists}")?;
            Ok(())
        }
    }
}

fn tag_filter(args: TagArgs) -> AssetFilter {
    args.tags
        .into_iter()
        .fold(AssetFilter::new(), |filter, (key, value)| filter.tag(key, value))
}

fn write_regions(out: &mut impl Write) -> Result<(), CliError> {
    for region in Region::ALL {
        writeln!(out, "{}", region.full_name())?;
    }
    Ok(())
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> Result<(), CliError> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_objects(out: &mut impl Write, objects: &[ObjectInfo]) -> Result<(), CliError> {
    for object in objects {
        writeln!(out, "{}\t{}", object.size, object.key)?;
    }
    Ok(())
}

fn write_service_instance(out: &mut impl Write, instance: &ServiceInstance) -> Result<(), CliError> {
    writeln!(out, "{}", instance.instance)?;
    for (key, value) in &instance.attributes {
        writeln!(out, "  {key}={value}")?;
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &TeardownReport) -> Result<(), CliError> {
    for stage in &report.stages {
        writeln!(
            out,
            "{:<20} removed {:>3}  failed {:>3}",
            stage.stage,
            stage.succeeded.len(),
            stage.failed.len()
        )?;
        for failure in &stage.failed {
            writeln!(out, "  {}: {}", failure.resource, failure.error)?;
        }
    }
    let outcome = if report.vpc_deleted() {
        "deleted"
    } else {
        "still present"
    };
    writeln!(out, "{}: {outcome}", report.vpc_id)?;
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
