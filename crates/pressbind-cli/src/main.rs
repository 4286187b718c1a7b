// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pressbind: compose raster images into a paginated PDF.
//
// Entry point. Parses arguments, initialises logging, and runs a single
// composition or lock operation.

mod args;

use std::process::ExitCode;

use clap::Parser;
use pressbind_core::error::{ErrorKind, PressbindError};
use pressbind_core::ImageRef;
use pressbind_document::{Composer, FileImageSource};

use args::{Args, Operation};

fn main() -> ExitCode {
    // Usage errors exit with status 2 from inside clap.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "pressbind failed");
            eprintln!("pressbind: {err}");
            ExitCode::from(exit_code(err.kind()))
        }
    }
}

fn run(args: &Args) -> Result<(), PressbindError> {
    let config = args.config()?;
    let source = FileImageSource::new().with_jpeg_quality(config.jpeg_quality);
    let composer = Composer::new(&source, config);

    match args.operation() {
        Operation::Compose {
            images,
            output,
            password,
        } => {
            tracing::info!(
                images = images.len(),
                layout = %composer.config().layout,
                output = %output.display(),
                "Pressbind starting"
            );
            let refs: Vec<ImageRef> = images.into_iter().map(ImageRef::new).collect();
            composer.compose_to_file(&refs, &output, password.as_deref())
        }
        Operation::Lock {
            source,
            output,
            password,
        } => {
            tracing::info!(
                source = %source.display(),
                output = %output.display(),
                "Pressbind locking existing PDF"
            );
            composer.lock_file(&source, &output, &password)
        }
    }
}

/// Process exit status for each failure class; 2 is reserved for usage errors.
fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Configuration => 3,
        ErrorKind::Resolution => 4,
        ErrorKind::Encryption => 5,
        ErrorKind::Output => 6,
        ErrorKind::Cancelled => 130,
    }
}
