use std::ffi::OsString;

use clap::Parser;
use ov_api::{inspect_manifest_at, inspect_package, PackageReport};
use ov_core::{OdeError, ParseOptions};

mod cli_args;
mod error_map;
mod package_loader;
mod report_output;

pub(crate) use cli_args::{Cli, InspectArgs, Mode, ValidateArgs};
pub(crate) use error_map::{emit_error, map_cli_output, map_package_path};
pub(crate) use package_loader::{load_package, LoadedPackage};
#[cfg(test)]
pub(crate) use package_loader::resolve_package_path;
pub(crate) use report_output::{emit_json, emit_report};
#[cfg(test)]
pub(crate) use report_output::flatten_pages;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, OdeError> {
    match cli.command {
        Mode::Inspect(args) => run_inspect(args),
        Mode::Validate(args) => run_validate(args),
    }
}

fn run_inspect(args: InspectArgs) -> Result<i32, OdeError> {
    let package = inspect(&args.package, args.manifest.as_deref(), args.max_depth)?;
    if args.json {
        emit_json(&package)?;
    } else {
        emit_report(&package)?;
    }
    Ok(0)
}

/// Same report as `inspect`, but the exit code reflects error-level checks.
fn run_validate(args: ValidateArgs) -> Result<i32, OdeError> {
    let package = inspect(&args.package, None, args.max_depth)?;
    emit_report(&package)?;
    let valid = !package.report.has_errors();
    println!("VALID:{}", valid);
    Ok(if valid { 0 } else { 1 })
}

fn inspect(
    package: &str,
    manifest: Option<&str>,
    max_depth: usize,
) -> Result<PackageReport, OdeError> {
    let LoadedPackage {
        container,
        manifest,
    } = load_package(package, manifest)?;
    let options = ParseOptions { max_depth };
    match manifest {
        Some(manifest) => inspect_manifest_at(container.as_ref(), &manifest, &options),
        None => inspect_package(container.as_ref(), &options),
    }
}
