//! Argument parsing and the process-level run loop.
//!
//! Every setting can be given as a flag or through the environment variable
//! the downloader exports for post-processing scripts.

use clap::error::ErrorKind;
use clap::Parser;
use plexhook_config::{RawSettings, RunConfig};
use plexhook_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::client::build_http_client;
use crate::controller::execute;
use crate::outcome::RunResult;

#[derive(Parser, Debug)]
#[command(
    name = "plexhook",
    version,
    about = "Post-processing hook that refreshes Plex libraries and notifies media-center clients"
)]
pub(crate) struct Cli {
    /// Final status of the download job.
    #[arg(long, env = "NZBPP_STATUS")]
    status: Option<String>,
    /// Category assigned to the job.
    #[arg(long, env = "NZBPP_CATEGORY")]
    category: Option<String>,
    /// Display name of the job.
    #[arg(long = "nzb-name", env = "NZBPP_NZBNAME")]
    display_name: Option<String>,
    /// Proper title from direct-download headers.
    #[arg(long = "proper-name", env = "NZBPR__DNZB_PROPERNAME")]
    proper_title: Option<String>,
    /// Episode label from direct-download headers.
    #[arg(long = "episode-name", env = "NZBPR__DNZB_EPISODENAME")]
    episode: Option<String>,
    /// Release year from direct-download headers.
    #[arg(long = "movie-year", env = "NZBPR__DNZB_MOVIEYEAR")]
    year: Option<String>,
    /// Report success even when the library refresh fails (yes/no).
    #[arg(long, env = "NZBPO_SILENTFAILURE")]
    silent_failure: Option<String>,
    /// Refresh Plex library sections (yes/no).
    #[arg(long, env = "NZBPO_REFRESHLIBRARY")]
    refresh_library: Option<String>,
    /// Section targeting: Auto, Custom or Both.
    #[arg(long, env = "NZBPO_REFRESHMODE")]
    refresh_mode: Option<String>,
    /// Comma-separated movie categories.
    #[arg(long = "movies-cat", env = "NZBPO_MOVIESCAT")]
    movie_categories: Option<String>,
    /// Comma-separated TV categories.
    #[arg(long = "tv-cat", env = "NZBPO_TVCAT")]
    tv_categories: Option<String>,
    /// Comma-separated section identifiers for Custom targeting.
    #[arg(long, env = "NZBPO_CUSTOMPLEXSECTION")]
    custom_sections: Option<String>,
    /// Plex server host, `host[:port]` or a full URL.
    #[arg(long, env = "NZBPO_PLEXIP")]
    plex_host: Option<String>,
    /// Plex token; skips the sign-in exchange.
    #[arg(long, env = "NZBPO_PLEXTOKEN", hide_env_values = true)]
    plex_token: Option<String>,
    /// Plex account login.
    #[arg(long, env = "NZBPO_PLEXUSER")]
    plex_user: Option<String>,
    /// Plex account password.
    #[arg(long = "plex-pass", env = "NZBPO_PLEXPASS", hide_env_values = true)]
    plex_password: Option<String>,
    /// Sign-in endpoint override.
    #[arg(long, env = "NZBPO_PLEXSIGNINURL")]
    plex_signin_url: Option<String>,
    /// Send GUI notifications to media-center clients (yes/no).
    #[arg(long, env = "NZBPO_GUISHOW")]
    gui_show: Option<String>,
    /// Build notification text from direct-download headers (yes/no).
    #[arg(long, env = "NZBPO_DHEADERS")]
    direct_headers: Option<String>,
    /// Comma-separated client addresses.
    #[arg(long, env = "NZBPO_CLIENTSIP")]
    clients: Option<String>,
    /// JSON-RPC port for clients given without one.
    #[arg(long = "clients-port", env = "NZBPO_CLIENTSPORT")]
    client_port: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long, env = "PLEXHOOK_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<String>,
    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, env = "PLEXHOOK_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    /// Log output format.
    #[arg(
        long,
        env = "PLEXHOOK_LOG_FORMAT",
        default_value = LogFormat::Nzbget.as_str(),
        value_parser = parse_log_format
    )]
    log_format: LogFormat,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|err| err.to_string())
}

impl Cli {
    fn into_raw(self) -> RawSettings {
        RawSettings {
            status: self.status,
            category: self.category,
            display_name: self.display_name,
            proper_title: self.proper_title,
            episode: self.episode,
            year: self.year,
            silent_failure: self.silent_failure,
            refresh_library: self.refresh_library,
            refresh_mode: self.refresh_mode,
            movie_categories: self.movie_categories,
            tv_categories: self.tv_categories,
            custom_sections: self.custom_sections,
            plex_host: self.plex_host,
            plex_token: self.plex_token,
            plex_user: self.plex_user,
            plex_password: self.plex_password,
            plex_signin_url: self.plex_signin_url,
            gui_show: self.gui_show,
            direct_headers: self.direct_headers,
            clients: self.clients,
            client_port: self.client_port,
            http_timeout_secs: self.http_timeout_secs,
        }
    }
}

/// Parses arguments, runs the hook, and returns the outcome whose exit code
/// the process should report.
pub async fn run() -> RunResult {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_failure(&err),
    };

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("[WARNING] logging unavailable: {err}");
    }

    let config = match RunConfig::from_raw(&cli.into_raw()) {
        Ok(config) => config,
        Err(err) => {
            error!(setting = err.field(), "{err}; check the script settings");
            return RunResult::ProceedError;
        }
    };

    let run_id = Uuid::new_v4().to_string();
    let http = match build_http_client(config.http_timeout, &run_id) {
        Ok(http) => http,
        Err(err) => {
            error!(error = %err, "cannot prepare HTTP client");
            return RunResult::ProceedError;
        }
    };

    let span = info_span!("run", run_id = %run_id);
    let result = execute(&config, &http).instrument(span).await;
    info!(
        result = result.as_str(),
        exit_code = result.exit_code(),
        "post-processing finished"
    );
    result
}

fn parse_failure(err: &clap::Error) -> RunResult {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => RunResult::Skipped,
        _ => RunResult::ProceedError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("plexhook").chain(args.iter().copied()))
    }

    #[test]
    fn flags_map_onto_raw_settings() -> Result<()> {
        let cli = parse(&[
            "--status",
            "SUCCESS/ALL",
            "--category",
            "tv",
            "--nzb-name",
            "show.x.s01e02",
            "--refresh-mode",
            "Both",
            "--plex-pass",
            "hunter2",
            "--clients-port",
            "8080",
        ])?;
        let raw = cli.into_raw();
        assert_eq!(raw.status.as_deref(), Some("SUCCESS/ALL"));
        assert_eq!(raw.category.as_deref(), Some("tv"));
        assert_eq!(raw.display_name.as_deref(), Some("show.x.s01e02"));
        assert_eq!(raw.refresh_mode.as_deref(), Some("Both"));
        assert_eq!(raw.plex_password.as_deref(), Some("hunter2"));
        assert_eq!(raw.client_port.as_deref(), Some("8080"));
        Ok(())
    }

    #[test]
    fn logging_defaults_follow_downloader_format() -> Result<()> {
        let cli = parse(&["--log-format", "json"])?;
        assert_eq!(cli.log_format, LogFormat::Json);
        let cli = parse(&["--log-format", "Pretty"])?;
        assert_eq!(cli.log_format, LogFormat::Pretty);
        let cli = parse(&[])?;
        assert_eq!(cli.log_format, LogFormat::Nzbget);
        Ok(())
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = parse(&["--log-format", "xml"]).err();
        assert!(
            err.as_ref()
                .is_some_and(|err| err.to_string().contains("unknown log format 'xml'"))
        );
        assert_eq!(err.as_ref().map(parse_failure), Some(RunResult::ProceedError));
    }

    #[test]
    fn help_and_unknown_flags_map_to_exit_codes() {
        let help = parse(&["--help"]).err();
        assert_eq!(help.as_ref().map(parse_failure), Some(RunResult::Skipped));
        let unknown = parse(&["--no-such-flag"]).err();
        assert_eq!(
            unknown.as_ref().map(parse_failure),
            Some(RunResult::ProceedError)
        );
    }
}
