use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::OpenApiV3Spec;

/// Serialization of an OpenAPI description, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(OsStr::to_str).map(str::to_ascii_lowercase).as_deref() {
      Some("yaml" | "yml") => Self::Yaml,
      _ => Self::Json,
    }
  }
}

/// A memory-mapped OpenAPI description waiting to be parsed.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
  source: String,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("cannot open {}", path.display()))?;

    Ok(Self {
      file,
      format: SpecFormat::from_path(path),
      source: path.display().to_string(),
    })
  }

  pub fn format(&self) -> SpecFormat {
    self.format
  }

  pub fn parse(&self) -> anyhow::Result<oas3::Spec> {
    let parsed = match self.format {
      SpecFormat::Json => serde_json::from_slice::<OpenApiV3Spec>(self.file.as_slice()).map_err(anyhow::Error::from),
      SpecFormat::Yaml => std::str::from_utf8(self.file.as_slice())
        .map_err(anyhow::Error::from)
        .and_then(|content| oas3::from_yaml(content).map_err(anyhow::Error::from)),
    };
    parsed.with_context(|| format!("{} is not a valid OpenAPI description", self.source))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const MINIMAL_YAML: &str = "openapi: 3.1.0\ninfo:\n  title: Tiny\n  version: 1.0.0\npaths:\n  /ping:\n    get:\n      responses:\n        '204':\n          description: pong\n";

  #[test]
  fn format_follows_the_extension() {
    assert_eq!(SpecFormat::from_path(Path::new("api.yaml")), SpecFormat::Yaml);
    assert_eq!(SpecFormat::from_path(Path::new("api.YML")), SpecFormat::Yaml);
    assert_eq!(SpecFormat::from_path(Path::new("api.json")), SpecFormat::Json);
    assert_eq!(SpecFormat::from_path(Path::new("api")), SpecFormat::Json);
  }

  #[tokio::test]
  async fn loads_yaml_descriptions() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = temp.path().join("tiny.yaml");
    std::fs::write(&path, MINIMAL_YAML).expect("write description");

    let loader = SpecLoader::open(&path).await.expect("file opens");
    let spec = loader.parse().expect("description parses");

    assert_eq!(loader.format(), SpecFormat::Yaml);
    assert_eq!(spec.info.title, "Tiny");
    assert!(spec.paths.is_some_and(|paths| paths.contains_key("/ping")));
  }

  #[tokio::test]
  async fn parse_errors_name_the_file() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = temp.path().join("broken.json");
    std::fs::write(&path, "{ \"openapi\": ").expect("write description");

    let loader = SpecLoader::open(&path).await.expect("file opens");
    let error = loader.parse().expect_err("truncated json is rejected");

    assert!(error.to_string().contains("broken.json"));
  }

  #[tokio::test]
  async fn missing_files_are_reported() {
    let error = SpecLoader::open(Path::new("does/not/exist.json")).await.err().expect("open fails");
    assert!(error.to_string().contains("does/not/exist.json"));
  }
}
