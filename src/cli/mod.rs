//! Command-line interface definitions for the `octo-infra` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI for the `octo-infra` binary.
#[derive(Debug, Parser)]
#[command(
    name = "octo-infra",
    about = "Inspect and tear down short-lived AWS build infrastructure",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Print the account and principal behind the configured credentials.
    Identity,
    /// List the region codes the tool knows friendly names for.
    Regions,
    /// VPC lookup and teardown.
    #[command(subcommand)]
    Vpc(VpcCommand),
    /// Instance lookup, credentials and teardown.
    #[command(subcommand)]
    Instance(InstanceCommand),
    /// Object storage queries.
    #[command(subcommand)]
    S3(S3Command),
    /// Parameter store reads.
    #[command(subcommand)]
    Ssm(SsmCommand),
    /// Service registry lookups.
    #[command(subcommand)]
    Service(ServiceCommand),
}

/// `octo-infra vpc` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum VpcCommand {
    /// Delete a VPC, removing its dependent resources first.
    Destroy(VpcDestroyArgs),
    /// Print the identifier of the first VPC carrying every tag.
    Find(TagArgs),
}

/// Arguments for `octo-infra vpc destroy`.
#[derive(Debug, Args)]
pub(crate) struct VpcDestroyArgs {
    /// VPC identifier.
    pub(crate) vpc_id: String,
    /// Skip dependent-resource cleanup and only reset DHCP options before
    /// deleting the VPC.
    #[arg(long)]
    pub(crate) keep_resources: bool,
}

/// Repeated `--tag KEY=VALUE` predicates.
#[derive(Debug, Args)]
pub(crate) struct TagArgs {
    /// Tag predicate; repeat to require several tags.
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub(crate) tags: Vec<(String, String)>,
}

/// `octo-infra instance` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum InstanceCommand {
    /// Print the identifiers of matching instances.
    Find(InstanceFindArgs),
    /// Retrieve and decrypt the Windows administrator password.
    Credentials(CredentialsArgs),
    /// Stop and terminate an instance.
    Destroy(InstanceDestroyArgs),
}

/// Arguments for `octo-infra instance find`.
#[derive(Debug, Args)]
pub(crate) struct InstanceFindArgs {
    /// Restrict to a VPC.
    #[arg(long, value_name = "VPC_ID")]
    pub(crate) vpc: Option<String>,
    /// Restrict to a lifecycle state, for example `running`.
    #[arg(long, value_name = "STATE")]
    pub(crate) state: Option<String>,
    /// Print instance types instead of identifiers.
    #[arg(long)]
    pub(crate) types: bool,
    #[command(flatten)]
    pub(crate) tags: TagArgs,
}

/// Arguments for `octo-infra instance credentials`.
#[derive(Debug, Args)]
pub(crate) struct CredentialsArgs {
    /// Instance identifier.
    pub(crate) instance_id: String,
    /// PEM private key of the instance keypair.
    #[arg(long, value_name = "PATH")]
    pub(crate) key: String,
    /// Seconds to wait for password data, at most one day.
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 240,
        value_parser = clap::value_parser!(u64).range(1..=86_400)
    )]
    pub(crate) timeout: u64,
}

/// Arguments for `octo-infra instance destroy`.
#[derive(Debug, Args)]
pub(crate) struct InstanceDestroyArgs {
    /// Instance identifier.
    pub(crate) instance_id: String,
    /// Leave the instance keypair in place.
    #[arg(long)]
    pub(crate) keep_keypair: bool,
    /// Wait for the instance to stop before terminating it.
    #[arg(long)]
    pub(crate) wait_stopped: bool,
    /// Return as soon as termination is requested.
    #[arg(long)]
    pub(crate) no_wait: bool,
}

/// `octo-infra s3` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum S3Command {
    /// List matching objects or folder prefixes.
    Find(S3FindArgs),
    /// Report whether an object exists.
    Exists(S3ExistsArgs),
}

/// Arguments for `octo-infra s3 find`.
#[derive(Debug, Args)]
pub(crate) struct S3FindArgs {
    /// Bucket to search.
    pub(crate) bucket: String,
    /// Key prefix.
    #[arg(long, default_value = "")]
    pub(crate) prefix: String,
    /// Shell-style pattern; repeat to accept several.
    #[arg(long = "filter", value_name = "GLOB")]
    pub(crate) filters: Vec<String>,
    /// List one level of folder prefixes instead of objects.
    #[arg(long)]
    pub(crate) folders: bool,
}

/// Arguments for `octo-infra s3 exists`.
#[derive(Debug, Args)]
pub(crate) struct S3ExistsArgs {
    /// Bucket name.
    pub(crate) bucket: String,
    /// Object key.
    pub(crate) key: String,
}

/// `octo-infra ssm` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum SsmCommand {
    /// Print a parameter value.
    Get(SsmGetArgs),
}

/// Arguments for `octo-infra ssm get`.
#[derive(Debug, Args)]
pub(crate) struct SsmGetArgs {
    /// Parameter name.
    pub(crate) name: String,
    /// Print secure strings in their encrypted form.
    #[arg(long)]
    pub(crate) no_decrypt: bool,
}

/// `octo-infra service` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum ServiceCommand {
    /// Print the first registered instance of a service.
    Find(ServiceFindArgs),
}

/// Arguments for `octo-infra service find`.
#[derive(Debug, Args)]
pub(crate) struct ServiceFindArgs {
    /// Namespace name.
    pub(crate) namespace: String,
    /// Service name.
    pub(crate) service: String,
    /// Attribute predicate; repeat to require several.
    #[arg(long = "attribute", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub(crate) attributes: Vec<(String, String)>,
    /// Region override for the lookup.
    #[arg(long, value_name = "REGION")]
    pub(crate) region: Option<String>,
}

/// Parses `KEY=VALUE`, splitting on the first `=`.
pub(crate) fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{raw}'"));
    };
    let trimmed_key = key.trim();
    if trimmed_key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((trimmed_key.to_owned(), value.trim().to_owned()))
}
