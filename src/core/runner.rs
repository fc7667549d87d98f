//! Build runner
//!
//! Runs the stages once, top to bottom: collect symbols, allocate
//! replacements, merge every target, then write the artifacts.

use crate::artifacts::{write_replacement_map, ChecksumManifest, PreviewRenderer};
use crate::core::cli::CliArgs;
use crate::core::config_file::BuildConfig;
use crate::core::errors::BuildError;
use crate::merge::{FontBackend, FontCompiler, Merger, UfoBackend};
use crate::symbols::{allocate, collect, ReplacementMap};
use anyhow::Result;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a completed build wrote
#[derive(Debug)]
pub struct BuildSummary {
    pub map: ReplacementMap,
    /// Target identity → generated binary
    pub fonts: IndexMap<String, PathBuf>,
    pub checksums: ChecksumManifest,
    pub replacement_map_path: PathBuf,
    pub checksum_path: PathBuf,
    pub previews: Vec<PathBuf>,
}

/// Run one build as described by the CLI arguments.
pub fn run(cli_args: &CliArgs) -> Result<()> {
    cli_args.validate().map_err(anyhow::Error::msg)?;

    let config = BuildConfig::load(&cli_args.config)?;
    prepare_output_dir(&cli_args.output_dir)?;

    if cli_args.map_only {
        let map = build_map(&config)?;
        write_replacement_map(&map, &cli_args.output_dir)?;
        info!(
            "Allocated {} symbol(s) across {} font(s); skipping merge",
            map.len(),
            map.font_names().count()
        );
        return Ok(());
    }

    let backend = UfoBackend::new(FontCompiler::new(config.compiler.clone()));
    let summary = build(&config, &backend, &cli_args.output_dir)?;
    info!(
        "Built {} target(s) into {:?}",
        summary.fonts.len(),
        cli_args.output_dir
    );
    Ok(())
}

fn prepare_output_dir(output_dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(output_dir).map_err(|e| BuildError::artifact_io(output_dir, e))?;
    debug!("Output directory ready: {:?}", output_dir);
    Ok(())
}

/// Collect every declared font's symbols, in declaration order
pub fn collect_symbols(config: &BuildConfig) -> Result<IndexMap<String, Vec<char>>, BuildError> {
    config
        .fonts
        .iter()
        .map(|(font_name, font)| {
            let symbols = collect(font_name, font, &config.corpus_path(font))?;
            Ok((font_name.clone(), symbols))
        })
        .collect()
}

/// Collect and allocate
pub fn build_map(config: &BuildConfig) -> Result<ReplacementMap, BuildError> {
    let symbols = collect_symbols(config)?;
    let map = allocate(&symbols, config.default_font.as_deref(), config.private_range)?;
    info!(
        "Allocated {} symbol(s) across {} font(s) in U+{:04X}..U+{:04X}",
        map.len(),
        map.font_names().count(),
        config.private_range.lower(),
        config.private_range.upper()
    );
    Ok(map)
}

/// Run the full build against `backend`, writing into `output_dir`.
///
/// The output directory must exist. A `checksum.json` left by an earlier run
/// is removed first, and the new one is only written once every target has
/// been generated, so after a failed run the directory holds no manifest.
pub fn build<B: FontBackend>(
    config: &BuildConfig,
    backend: &B,
    output_dir: &Path,
) -> Result<BuildSummary, BuildError> {
    ChecksumManifest::remove_stale(output_dir)?;
    let map = build_map(config)?;
    let replacement_map_path = write_replacement_map(&map, output_dir)?;

    let sources: IndexMap<String, PathBuf> = config
        .fonts
        .iter()
        .map(|(font_name, font)| (font_name.clone(), config.font_path(font)))
        .collect();
    let template_path = config.template_path();
    let renderer = PreviewRenderer::load(
        template_path.as_deref(),
        &config.fallback_font_path(),
        &map,
    )?;
    let merger = Merger::new(backend, &map, &sources);

    let mut fonts = IndexMap::new();
    let mut checksums = ChecksumManifest::default();
    let mut previews = Vec::new();

    for (target_name, target) in &config.targets {
        let output_path = output_dir.join(&target.filename);
        merger.merge_into(
            target_name,
            target,
            &config.base_font_path(target),
            &output_path,
        )?;

        let font_data =
            fs::read(&output_path).map_err(|e| BuildError::artifact_io(&output_path, e))?;
        let digest = checksums.record(target_name, &font_data);
        info!("Target '{}' MD5: {}", target_name, digest);

        previews.push(renderer.write(target_name, &font_data, output_dir)?);
        fonts.insert(target_name.clone(), output_path);
    }

    let checksum_path = checksums.write(output_dir)?;

    Ok(BuildSummary {
        map,
        fonts,
        checksums,
        replacement_map_path,
        checksum_path,
        previews,
    })
}
