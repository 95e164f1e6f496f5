use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

use crate::generator::ir::SpecDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  /// Parses a whole document from an in-memory buffer.
  pub fn parse(self, content: &[u8]) -> anyhow::Result<SpecDocument> {
    match self {
      Self::Json => Ok(serde_json::from_slice::<SpecDocument>(content)?),
      Self::Yaml => Ok(serde_yaml::from_slice::<SpecDocument>(content)?),
    }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path).await?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<SpecDocument> {
    self.format.parse(self.file.as_slice())
  }
}

/// Loads the base document and folds every override into it, in order.
///
/// The result has implicit names filled in and has passed structural validation.
pub async fn load_document(base: &Path, overrides: &[impl AsRef<Path>]) -> anyhow::Result<SpecDocument> {
  let mut document = SpecLoader::open(base)
    .await
    .with_context(|| format!("failed to open {}", base.display()))?
    .parse()
    .with_context(|| format!("failed to parse {}", base.display()))?;

  for path in overrides {
    let path = path.as_ref();
    let overlay = SpecLoader::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?
      .parse()
      .with_context(|| format!("failed to parse {}", path.display()))?;
    document
      .apply_override(overlay)
      .with_context(|| format!("failed to apply override {}", path.display()))?;
  }

  document.normalize();
  document.validate().context("document failed validation")?;
  Ok(document)
}
