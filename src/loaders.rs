//! Model asset loading for Hugging Face Hub repositories.
//!
//! Three things are needed to stand a sentiment classifier up:
//! - the tokenizer (`tokenizer.json`), configured for truncation and padding
//! - the model config (`config.json`), which names the architecture and the
//!   label set
//! - the weights (`model.safetensors`, falling back to `pytorch_model.bin`)
//!
//! Each can be overridden by a local file. Hub downloads retry when the hub
//! cache lock is contended.

use crate::core::{LoadError, ModelConfig};
use hf_hub::api::tokio::{Api, ApiBuilder, ApiError};
use hf_hub::{Repo, RepoType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokenizers::{PaddingParams, PaddingStrategy, PostProcessor, Tokenizer, TruncationParams};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub revision: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, revision: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
            filename: filename.into(),
        }
    }

    pub async fn load(&self) -> Result<PathBuf, LoadError> {
        let api = ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|source| self.hub_error(source))?;
        self.load_with(&api).await
    }

    async fn load_with(&self, api: &Api) -> Result<PathBuf, LoadError> {
        let repo = api.repo(Repo::with_revision(
            self.repo.clone(),
            RepoType::Model,
            self.revision.clone(),
        ));

        let mut attempt = 0;
        loop {
            match repo.get(&self.filename).await {
                Ok(path) => return Ok(path),
                Err(e) if is_lock_contention(&e) && attempt + 1 < MAX_RETRIES => {
                    let wait = Duration::from_millis(100 * (1 << attempt));
                    tracing::warn!(
                        repo = %self.repo,
                        file = %self.filename,
                        ?wait,
                        "hub cache lock busy, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(self.hub_error(e)),
            }
        }
    }

    fn hub_error(&self, source: ApiError) -> LoadError {
        LoadError::Hub {
            repo: self.repo.clone(),
            filename: self.filename.clone(),
            source,
        }
    }
}

fn is_lock_contention(err: &ApiError) -> bool {
    err.to_string().contains("Lock acquisition failed")
}

/// Loads `tokenizer.json` and configures it the way the classifier expects:
/// truncation at `max_length` tokens and padding to the longest sequence.
#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
    pub max_length: usize,
}

impl TokenizerLoader {
    pub fn new(repo: &str, revision: &str, max_length: usize) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, revision, "tokenizer.json"),
            max_length,
        }
    }

    pub async fn load(&self) -> Result<Tokenizer, LoadError> {
        let path = self.tokenizer_file_loader.load().await?;
        self.load_file(&path)
    }

    pub fn load_file(&self, path: &Path) -> Result<Tokenizer, LoadError> {
        let tokenizer =
            Tokenizer::from_file(path).map_err(|e| LoadError::Tokenizer(e.to_string()))?;
        configure_tokenizer(tokenizer, self.max_length)
    }
}

/// Fails when `max_length` leaves no room for text next to the special
/// tokens the post-processor adds.
pub fn configure_tokenizer(
    mut tokenizer: Tokenizer,
    max_length: usize,
) -> Result<Tokenizer, LoadError> {
    let special_tokens = tokenizer
        .get_post_processor()
        .map_or(0, |processor| processor.added_tokens(false));
    if max_length <= special_tokens {
        return Err(LoadError::MaxLength {
            requested: max_length,
            min: special_tokens + 1,
        });
    }

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| LoadError::Tokenizer(e.to_string()))?;

    let pad_id = tokenizer.get_padding().map_or(0, |p| p.pad_id);
    let pad_token = tokenizer
        .id_to_token(pad_id)
        .unwrap_or_else(|| "[PAD]".to_string());
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        pad_id,
        pad_token,
        ..Default::default()
    }));

    Ok(tokenizer)
}

/// The subset of `config.json` needed before picking an architecture.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierMetadata {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub id2label: Option<HashMap<String, String>>,
    #[serde(default)]
    pub num_labels: Option<usize>,
    /// Size of the position table; inputs must be truncated to fit it.
    #[serde(default)]
    pub max_position_embeddings: Option<usize>,
}

impl ClassifierMetadata {
    /// Number of classes the checkpoint's head was trained for, if stated.
    pub fn class_count(&self) -> Option<usize> {
        self.id2label
            .as_ref()
            .map(HashMap::len)
            .or(self.num_labels)
    }
}

/// Raw `config.json` text plus its parsed classifier metadata. The text is
/// kept so each architecture can deserialize its own config from it.
#[derive(Debug, Clone)]
pub struct ModelConfigFile {
    pub raw: String,
    pub metadata: ClassifierMetadata,
}

impl ModelConfigFile {
    pub fn parse(raw: String) -> Result<Self, LoadError> {
        let metadata = serde_json::from_str(&raw)?;
        Ok(Self { raw, metadata })
    }

    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(raw)
    }
}

/// Resolves the weight file, preferring safetensors.
#[derive(Debug, Clone)]
pub struct WeightsLoader {
    pub repo: String,
    pub revision: String,
}

impl WeightsLoader {
    pub fn new(repo: &str, revision: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
        }
    }

    pub async fn load(&self) -> Result<PathBuf, LoadError> {
        match HfLoader::new(&self.repo, &self.revision, "model.safetensors")
            .load()
            .await
        {
            Ok(path) => Ok(path),
            Err(safetensors_err) => HfLoader::new(&self.repo, &self.revision, "pytorch_model.bin")
                .load()
                .await
                .map_err(|bin_err| {
                    LoadError::MissingWeights(format!(
                        "expected `model.safetensors` or `pytorch_model.bin` in `{}` ({safetensors_err}; {bin_err})",
                        self.repo
                    ))
                }),
        }
    }
}

/// Everything a classifier needs, fetched and parsed.
#[derive(Debug, Clone)]
pub struct ModelAssets {
    pub tokenizer: Tokenizer,
    pub config: ModelConfigFile,
    pub weights: PathBuf,
}

impl ModelAssets {
    /// Fetches the tokenizer, config and weights, honouring local overrides.
    pub async fn load(config: &ModelConfig) -> Result<Self, LoadError> {
        let repo = config.model_id.as_str();
        let revision = config.revision.as_str();

        let tokenizer_loader = TokenizerLoader::new(repo, revision, config.max_length);
        let tokenizer = match &config.tokenizer_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "using local tokenizer file");
                tokenizer_loader.load_file(path)?
            }
            None => tokenizer_loader.load().await?,
        };

        let config_path = match &config.config_file {
            Some(path) => path.clone(),
            None => HfLoader::new(repo, revision, "config.json").load().await?,
        };
        let model_config = ModelConfigFile::read(&config_path)?;

        let weights = match &config.weight_file {
            Some(path) => path.clone(),
            None => WeightsLoader::new(repo, revision).load().await?,
        };

        Ok(Self {
            tokenizer,
            config: model_config,
            weights,
        })
    }
}
