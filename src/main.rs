// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowgen CLI entrypoint.
//!
//! By default this runs the interactive TUI against the configured generation endpoint.
//!
//! `--demo` starts the built-in stub service on an ephemeral port and points the TUI at it;
//! `--serve` runs only the stub service.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use flowgen::api::HttpGenerationClient;
use flowgen::config::{parse_endpoint, Config};
use flowgen::render::{self, RenderSettings};
use flowgen::stub::{self, StubServer};
use flowgen::tui::{self, TuiSettings};

const DEFAULT_SERVE_PORT: u16 = 8000;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--endpoint <url>] [--config <path>] [--export-dir <dir>] [--debug]\n  {program} --demo [--config <path>] [--export-dir <dir>] [--debug]\n  {program} --serve [--port <port>] [--config <path>] [--debug]\n\nThe endpoint defaults to `FLOWGEN_ENDPOINT`, then `endpoint` in the config file\n(~/.config/flowgen/config.toml), then http://127.0.0.1:8000/generate_flowchart.\n\n--demo runs a built-in stub generation service on an ephemeral port and cannot be combined\nwith --endpoint or --serve.\n--serve runs only the stub service on 127.0.0.1 (default port {DEFAULT_SERVE_PORT})."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    endpoint: Option<String>,
    config: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    debug: bool,
    demo: bool,
    serve: bool,
    port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--endpoint" => {
                if options.endpoint.is_some() {
                    return Err(());
                }
                options.endpoint = Some(args.next().ok_or(())?);
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--export-dir" => {
                if options.export_dir.is_some() {
                    return Err(());
                }
                options.export_dir = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--debug" => {
                if options.debug {
                    return Err(());
                }
                options.debug = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--serve" => {
                if options.serve {
                    return Err(());
                }
                options.serve = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.port = Some(raw.parse().map_err(|_| ())?);
            }
            _ => return Err(()),
        }
    }

    if options.demo && (options.endpoint.is_some() || options.serve) {
        return Err(());
    }

    if options.port.is_some() && !options.serve {
        return Err(());
    }

    if options.serve && (options.endpoint.is_some() || options.export_dir.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "flowgen".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let mut config = Config::load(options.config.as_deref())?;
        config.apply_env()?;
        if let Some(endpoint) = options.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(export_dir) = options.export_dir {
            config.export_dir = export_dir;
        }
        config.debug |= options.debug;

        let _log_guard = flowgen::logging::init(&config.log_path, config.debug)?;
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "flowgen starting");

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.serve {
            let port = options.port.unwrap_or(DEFAULT_SERVE_PORT);
            eprintln!("flowgen: stub generation service on http://127.0.0.1:{port}");
            runtime.block_on(stub::serve(port))?;
            return Ok(());
        }

        // Fail on a bad endpoint before the terminal is taken over.
        let configured_endpoint = config.endpoint_url()?;
        render::initialize(RenderSettings::default());
        let demo_mode = options.demo;

        runtime.block_on(async move {
            let demo = if demo_mode { Some(StubServer::spawn(0).await?) } else { None };
            let endpoint = match &demo {
                Some(server) => parse_endpoint(&server.endpoint())?,
                None => configured_endpoint,
            };

            let client = Arc::new(HttpGenerationClient::new(endpoint.clone())?);
            let settings = TuiSettings {
                endpoint: endpoint.to_string(),
                export_dir: config.export_dir.clone(),
            };
            let handle = tokio::runtime::Handle::current();

            let tui_result = tokio::task::spawn_blocking(move || {
                tui::run(client, handle, settings).map_err(|err| err.to_string())
            })
            .await;

            drop(demo);

            let tui_result = tui_result.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        tracing::info!("flowgen exiting");
        Ok(())
    })();

    if let Err(err) = result {
        tracing::error!(error = %err, "flowgen failed");
        eprintln!("flowgen: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};
    use std::path::PathBuf;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|arg| (*arg).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_tui_flags() {
        let options = parse_options(args(&[
            "--endpoint",
            "http://localhost:9000/generate_flowchart",
            "--config",
            "flowgen.toml",
            "--export-dir",
            "out",
            "--debug",
        ]))
        .expect("parse options");

        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:9000/generate_flowchart"));
        assert_eq!(options.config, Some(PathBuf::from("flowgen.toml")));
        assert_eq!(options.export_dir, Some(PathBuf::from("out")));
        assert!(options.debug);
        assert!(!options.demo);
        assert!(!options.serve);
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse_options(args(&["--demo", "--debug"])).expect("parse options");
        assert!(options.demo);
        assert!(options.endpoint.is_none());
    }

    #[test]
    fn parses_serve_with_port() {
        let options = parse_options(args(&["--serve", "--port", "0"])).expect("parse options");
        assert!(options.serve);
        assert_eq!(options.port, Some(0));

        let options = parse_options(args(&["--port", "8123", "--serve"])).expect("parse options");
        assert_eq!(options.port, Some(8123));
    }

    #[test]
    fn rejects_port_without_serve() {
        parse_options(args(&["--port", "8000"])).unwrap_err();
    }

    #[test]
    fn rejects_invalid_port() {
        parse_options(args(&["--serve", "--port", "http"])).unwrap_err();
        parse_options(args(&["--serve", "--port", "70000"])).unwrap_err();
    }

    #[test]
    fn rejects_demo_with_endpoint_or_serve() {
        parse_options(args(&["--demo", "--endpoint", "http://x/generate_flowchart"])).unwrap_err();
        parse_options(args(&["--demo", "--serve"])).unwrap_err();
    }

    #[test]
    fn rejects_tui_flags_in_serve_mode() {
        parse_options(args(&["--serve", "--endpoint", "http://x/generate_flowchart"]))
            .unwrap_err();
        parse_options(args(&["--serve", "--export-dir", "out"])).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_positional_args() {
        parse_options(args(&["--nope"])).unwrap_err();
        parse_options(args(&["some/dir"])).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(args(&["--demo", "--demo"])).unwrap_err();
        parse_options(args(&["--debug", "--debug"])).unwrap_err();
        parse_options(args(&["--endpoint", "a", "--endpoint", "b"])).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse_options(args(&["--endpoint"])).unwrap_err();
        parse_options(args(&["--config"])).unwrap_err();
        parse_options(args(&["--serve", "--port"])).unwrap_err();
    }
}
