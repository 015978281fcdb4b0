use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const DATA_PREFIX: &str = "data/";
pub const BUNDLE_FORMAT_V1: &str = "rosterd-bundle-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub restored: Vec<String>,
}

/// Zips the named files from `data_dir` together with a manifest carrying a
/// sha256 per file.
pub fn export_bundle(
    data_dir: &Path,
    file_names: &[&str],
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let mut payloads: Vec<(&str, Vec<u8>)> = Vec::new();
    for name in file_names {
        let src = data_dir.join(name);
        if !src.is_file() {
            return Err(anyhow!("data file not found: {}", src.to_string_lossy()));
        }
        let bytes =
            std::fs::read(&src).with_context(|| format!("failed to read {}", src.to_string_lossy()))?;
        payloads.push((*name, bytes));
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let files: Vec<serde_json::Value> = payloads
        .iter()
        .map(|(name, bytes)| {
            json!({
                "name": name,
                "size": bytes.len(),
                "sha256": sha256_hex(bytes),
            })
        })
        .collect();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "files": files,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (name, bytes) in &payloads {
        zip.start_file(format!("{}{}", DATA_PREFIX, name), opts)
            .with_context(|| format!("failed to start entry {}", name))?;
        zip.write_all(bytes)
            .with_context(|| format!("failed to write entry {}", name))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: payloads.len() + 1,
    })
}

/// Restores the files listed in the bundle manifest into `data_dir`.
/// Only names in `allowed` may be restored, and all entries are verified
/// before any existing file is replaced.
pub fn import_bundle(
    in_path: &Path,
    data_dir: &Path,
    allowed: &[&str],
) -> anyhow::Result<ImportSummary> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let files = manifest
        .get("files")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("manifest.json has no files list"))?;

    let mut verified: Vec<(String, Vec<u8>)> = Vec::new();
    for f in files {
        let name = f
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("manifest entry without name"))?;
        if !allowed.contains(&name) {
            return Err(anyhow!("bundle entry is not a workspace file: {:?}", name));
        }
        let expected = f.get("sha256").and_then(|v| v.as_str()).unwrap_or("");

        let mut bytes = Vec::new();
        archive
            .by_name(&format!("{}{}", DATA_PREFIX, name))
            .with_context(|| format!("bundle missing {}{}", DATA_PREFIX, name))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read entry {}", name))?;
        if sha256_hex(&bytes) != expected {
            return Err(anyhow!("checksum mismatch for {}", name));
        }
        verified.push((name.to_string(), bytes));
    }

    std::fs::create_dir_all(data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            data_dir.to_string_lossy()
        )
    })?;

    let mut restored = Vec::new();
    for (name, bytes) in verified {
        let dst = data_dir.join(&name);
        let tmp = data_dir.join(format!("{}.importing", name));
        let mut out = File::create(&tmp)
            .with_context(|| format!("failed to create temp file {}", tmp.to_string_lossy()))?;
        out.write_all(&bytes)
            .with_context(|| format!("failed to write temp file {}", tmp.to_string_lossy()))?;
        out.flush().context("failed to flush restored file")?;
        drop(out);

        if dst.exists() {
            std::fs::remove_file(&dst).with_context(|| {
                format!("failed to remove existing file {}", dst.to_string_lossy())
            })?;
        }
        std::fs::rename(&tmp, &dst)
            .with_context(|| format!("failed to move restored file to {}", dst.to_string_lossy()))?;
        restored.push(name);
    }

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        restored,
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
