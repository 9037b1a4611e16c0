//! Subcommand implementations, kept apart from argument parsing so they can
//! be tested without a process.

use std::path::{Path, PathBuf};

use switchboard_core::codec::{DecodeMode, Decoded, read_preamble};
use switchboard_core::document::{CircuitDocument, DocumentError};
use switchboard_core::payload::{PayloadError, circuit_id, decode_guarded, payload_digest};
use switchboard_core::{Circuit, DecodeError, EncodeError, HEADER, encode};
use switchboard_data::{DataLoadError, SettingsData, find_data_file, load_atlas, load_settings};
use switchboard_render::{RenderPlan, SpriteAtlas};

/// Extension given to encoded files when no output path is named.
pub const STREAM_EXTENSION: &str = "swc";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Data(#[from] DataLoadError),
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("{path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
    #[error("{path}: {source}")]
    Payload {
        path: PathBuf,
        #[source]
        source: PayloadError,
    },
    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub lenient: bool,
    pub pretty: bool,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Context {
    settings: SettingsData,
}

impl Context {
    /// Load settings from `path`, or from `switchboard.{ron,toml,json}` in the
    /// working directory, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let found = match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let cwd = std::env::current_dir().map_err(|source| CliError::Read {
                    path: PathBuf::from("."),
                    source,
                })?;
                find_data_file(&cwd, "switchboard")?
            }
        };

        let settings = match found {
            Some(path) => load_settings(&path)?,
            None => {
                log::debug!("no settings file, using defaults");
                SettingsData::default()
            }
        };
        Ok(Self::with_settings(settings))
    }

    pub fn with_settings(settings: SettingsData) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SettingsData {
        &self.settings
    }

    fn mode(&self, lenient: bool) -> DecodeMode {
        DecodeMode::from_lenient(lenient || self.settings.lenient)
    }

    /// Encode a JSON document; returns the path written.
    pub fn encode(&self, file: &Path, output: Option<PathBuf>) -> Result<PathBuf, CliError> {
        let json = std::fs::read_to_string(file).map_err(|source| CliError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        let circuit = CircuitDocument::from_json_str(&json)
            .and_then(CircuitDocument::into_circuit)
            .map_err(|source| CliError::Document {
                path: file.to_path_buf(),
                source,
            })?;
        let bytes = encode(&circuit).map_err(|source| CliError::Encode {
            path: file.to_path_buf(),
            source,
        })?;

        let output = output.unwrap_or_else(|| file.with_extension(STREAM_EXTENSION));
        std::fs::write(&output, &bytes).map_err(|source| CliError::Write {
            path: output.clone(),
            source,
        })?;
        log::info!(
            "encoded {} cells into {} bytes",
            circuit.cells.len(),
            bytes.len()
        );
        Ok(output)
    }

    /// Decode a stream to its JSON document. In lenient mode a bad header
    /// gives `{"s":[],"d":[]}`.
    pub fn decode(&self, file: &Path, options: DecodeOptions) -> Result<String, CliError> {
        let bytes = read_bytes(file)?;
        let decoded = self.decode_payload(file, &bytes, self.mode(options.lenient))?;
        let document = CircuitDocument::from(&decoded);

        let json = if options.pretty {
            document.to_json_string_pretty()
        } else {
            document.to_json_string()
        };
        json.map_err(|source| CliError::Document {
            path: file.to_path_buf(),
            source,
        })
    }

    /// Human-readable summary of a stream.
    pub fn inspect(&self, file: &Path) -> Result<String, CliError> {
        let bytes = read_bytes(file)?;
        let mut lines = vec![
            format!("file:    {}", file.display()),
            format!("bytes:   {}", bytes.len()),
            format!("id:      {}", circuit_id(&bytes)),
        ];

        match read_preamble(&bytes) {
            Ok(size) => {
                lines.push("header:  ok".to_string());
                lines.push(format!("grid:    {}x{}", size.width, size.height));
                let limits = self.settings.limits();
                let cells = match decode_guarded(&bytes, &limits, self.mode(false)) {
                    Ok(decoded) => decoded.circuit().map_or(0, Circuit::len).to_string(),
                    Err(e) => format!("unreadable ({e})"),
                };
                lines.push(format!("cells:   {cells}"));
            }
            Err(DecodeError::InvalidHeader { found }) => lines.push(format!(
                "header:  invalid (found {found:#010x}, expected {HEADER:#010x})"
            )),
            Err(e) => lines.push(format!("header:  unreadable ({e})")),
        }

        let mut report = lines.join("\n");
        report.push('\n');
        Ok(report)
    }

    /// Render plan for a stream, as JSON. In lenient mode a bad header gives
    /// `null`.
    pub fn plan(
        &self,
        file: &Path,
        atlas: Option<&Path>,
        lenient: bool,
    ) -> Result<String, CliError> {
        let atlas = match atlas {
            Some(path) => load_atlas(path)?,
            None => SpriteAtlas::standard(),
        };
        let bytes = read_bytes(file)?;
        let decoded = self.decode_payload(file, &bytes, self.mode(lenient))?;
        let plan = decoded
            .circuit()
            .map(|circuit| RenderPlan::build(circuit, &atlas, self.settings.output_cell_size));
        Ok(serde_json::to_string(&plan)?)
    }

    fn decode_payload(
        &self,
        file: &Path,
        bytes: &[u8],
        mode: DecodeMode,
    ) -> Result<Decoded, CliError> {
        let decoded = decode_guarded(bytes, &self.settings.limits(), mode).map_err(|source| {
            CliError::Payload {
                path: file.to_path_buf(),
                source,
            }
        })?;
        log::debug!(
            "{}: payload {} ({})",
            file.display(),
            payload_digest(bytes),
            if decoded.is_invalid_header() { "invalid header" } else { "ok" }
        );
        Ok(decoded)
    }
}

fn read_bytes(file: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })
}

/// Write `text` to `output`, or to stdout.
pub fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
