//! Replay command implementation for the inspection CLI.

use std::io::{BufReader, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::{Parser, ValueEnum};
use inspection_core::{InferenceKind, InferenceService, MapEvent, MapSession, Notice};
use inspection_data::{HttpInferenceClient, HttpInferenceClientConfig, InferenceDispatcher};
use inspection_scorer::{DomainTableScorer, FeatureDomainTable};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_REPLAY_ACTION, ARG_REPLAY_DOMAIN_TABLE, ARG_REPLAY_EVENTS, ARG_REPLAY_SERVICE_URL,
    ARG_REPLAY_TIMEOUT_SECS, CliError, ENV_REPLAY_EVENTS,
};

/// What to do with the selection left after replaying the events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ReplayAction {
    /// Print the feature vector as a JSON array.
    Features,
    /// Ask the model whether the establishment is open.
    #[default]
    Predict,
    /// Ask the model to explain its decision.
    Explain,
}

impl ReplayAction {
    const fn inference_kind(self) -> Option<InferenceKind> {
        match self {
            Self::Features => None,
            Self::Predict => Some(InferenceKind::Predict),
            Self::Explain => Some(InferenceKind::Explain),
        }
    }
}

/// CLI arguments for the `replay` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Replay a JSON array of recorded map events (click, \
                 mouseenter, mouseleave, or {\"type\": \"dismiss\"}) through \
                 a map session, then print the feature vector of the final \
                 selection or send it to the model service.",
    about = "Replay recorded map events"
)]
#[ortho_config(prefix = "INSPECTION")]
pub(crate) struct ReplayArgs {
    /// Path to a JSON file containing the recorded events.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) events: Option<Utf8PathBuf>,
    /// Path to a JSON feature domain table; defaults to the built-in table.
    #[arg(long = ARG_REPLAY_DOMAIN_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) domain_table: Option<Utf8PathBuf>,
    /// Base URL of the model service (e.g. "http://localhost:8000").
    #[arg(long = ARG_REPLAY_SERVICE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) service_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_REPLAY_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Action to run on the final selection.
    #[arg(long = ARG_REPLAY_ACTION, value_enum)]
    #[serde(default)]
    pub(crate) action: Option<ReplayAction>,
}

impl ReplayArgs {
    pub(crate) fn into_config(self) -> Result<ReplayConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReplayConfig::try_from(merged)
    }
}

/// Resolved `replay` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplayConfig {
    /// Path to the recorded events.
    pub(crate) events: Utf8PathBuf,
    /// Optional domain table replacing the built-in one.
    pub(crate) domain_table: Option<Utf8PathBuf>,
    /// Model service connection settings.
    pub(crate) service: HttpInferenceClientConfig,
    /// Action to run on the final selection.
    pub(crate) action: ReplayAction,
}

impl ReplayConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.events, ARG_REPLAY_EVENTS)?;
        if let Some(table) = &self.domain_table {
            Self::require_existing(table, ARG_REPLAY_DOMAIN_TABLE)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<ReplayArgs> for ReplayConfig {
    type Error = CliError;

    fn try_from(args: ReplayArgs) -> Result<Self, Self::Error> {
        let events = args.events.ok_or(CliError::MissingPositional {
            field: ARG_REPLAY_EVENTS,
            env: ENV_REPLAY_EVENTS,
        })?;

        let mut service = HttpInferenceClientConfig::default();
        if let Some(base_url) = args.service_url {
            service.base_url = base_url;
        }
        if let Some(seconds) = args.timeout_secs {
            service = service.with_timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            events,
            domain_table: args.domain_table,
            service,
            action: args.action.unwrap_or_default(),
        })
    }
}

/// Return whether `path` is a regular file, using the ambient authority.
fn file_is_file(path: &Utf8Path) -> std::io::Result<bool> {
    fs_utf8::Dir::open_ambient_dir(parent_dir(path), ambient_authority())?
        .metadata(path.file_name().unwrap_or(path.as_str()))
        .map(|meta| meta.is_file())
}

fn parent_dir(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Control entries recorded alongside map events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum ControlStep {
    /// The user closed the popup.
    Dismiss,
}

/// One entry of a recorded replay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReplayStep {
    /// A map event.
    Event(MapEvent),
    /// A popup control action.
    Control(ControlStep),
}

/// Builds the inference service used by `predict` and `explain`.
pub(super) trait ServiceBuilder {
    fn build(&self, config: &ReplayConfig) -> Result<Arc<dyn InferenceService>, CliError>;
}

pub(super) struct HttpServiceBuilder;

impl ServiceBuilder for HttpServiceBuilder {
    fn build(&self, config: &ReplayConfig) -> Result<Arc<dyn InferenceService>, CliError> {
        let client = HttpInferenceClient::with_config(config.service.clone()).map_err(
            |source| CliError::BuildClient {
                base_url: config.service.base_url.clone(),
                source,
            },
        )?;
        Ok(Arc::new(client))
    }
}

pub(super) fn run_replay(args: ReplayArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_replay_with(args, &HttpServiceBuilder, &mut stdout)
}

pub(super) fn run_replay_with(
    args: ReplayArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_replay_config(args)?;
    let session = replay_session(&config)?;
    match config.action.inference_kind() {
        None => write_features(writer, &session),
        Some(kind) => run_inference(&config, &session, kind, builder, writer),
    }
}

fn resolve_replay_config(args: ReplayArgs) -> Result<ReplayConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Load the scorer and apply every recorded step to a fresh session.
pub(super) fn replay_session(config: &ReplayConfig) -> Result<MapSession, CliError> {
    let scorer = match &config.domain_table {
        Some(path) => DomainTableScorer::new(FeatureDomainTable::load(path)?),
        None => DomainTableScorer::default(),
    };
    let steps = load_replay_steps(&config.events)?;
    let mut session = MapSession::new(scorer);
    for (index, step) in steps.iter().enumerate() {
        let transition = match step {
            ReplayStep::Event(event) => session.handle_event(event),
            ReplayStep::Control(ControlStep::Dismiss) => session.dismiss(),
        };
        info!("step {index}: {transition:?}");
    }
    Ok(session)
}

/// Loads a JSON array of replay steps from disk.
pub(super) fn load_replay_steps(path: &Utf8Path) -> Result<Vec<ReplayStep>, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenEvents {
            path: path.to_path_buf(),
            source,
        }
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseEvents {
        path: path.to_path_buf(),
        source,
    })
}

fn write_features(writer: &mut dyn Write, session: &MapSession) -> Result<(), CliError> {
    let features = session.features()?;
    let payload = serde_json::to_string(&features).map_err(CliError::SerialiseFeatures)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}

fn run_inference(
    config: &ReplayConfig,
    session: &MapSession,
    kind: InferenceKind,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let ticket = session.request(kind)?;
    let service = builder.build(config)?;
    let mut dispatcher = InferenceDispatcher::new(service).map_err(CliError::BuildDispatcher)?;
    info!("sending {kind} request to {}", config.service.base_url);
    dispatcher.dispatch(ticket);
    while let Some(outcome) = dispatcher.next_blocking() {
        match session.resolve(outcome) {
            Some(Notice::Failure(message)) => return Err(CliError::InferenceFailed(message)),
            Some(notice) => writeln!(writer, "{notice}").map_err(CliError::WriteOutput)?,
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReplayConfig, CliError> {
    let merged = ReplayArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ReplayConfig::try_from(merged)
}
