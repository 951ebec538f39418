use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};

use pkg_review::build::{
    BuildCoordinator, Builder, CachedBuilder, MockBuilder, PrebuiltBuilder,
};
use pkg_review::check::Check;
use pkg_review::cli::Cli;
use pkg_review::config::{Config, ConfigLoader, FileConfigLoader};
use pkg_review::context::{AnalysisContext, SpecFile, Srpm};
use pkg_review::error::{ReviewError, Result};
use pkg_review::fetch::{ArtifactSource, Fetcher, ReqwestDownloader};
use pkg_review::registry::{RegistryLoader, split_search_path};
use pkg_review::report::{Renderer, TextRenderer, XmlRenderer, aggregate, source_checksums};
use pkg_review::selection::Selection;
use pkg_review::workdir::{WorkDir, report_path};
use pkg_review::{EXIT_SUCCESS, plan, scheduler};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().filter_or("REVIEW_LOGLEVEL", default);
    env_logger::Builder::from_env(env).init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = FileConfigLoader::new().load()?;
    let loader = registry_loader(&config);

    let Some(source) = cli.artifact_source()? else {
        return display_checks(&loader);
    };

    let cwd = std::env::current_dir()?;
    let preserve = cli.cache || cli.no_build;
    let workdir = WorkDir::prepare(workdir_root(cli, &cwd, &source), preserve)?;

    let downloader = ReqwestDownloader;
    let fetcher = Fetcher::new(&downloader, cli.offline, &config.bug_url_template);
    let artifacts = fetcher.fetch(&source, &cwd, &workdir.srpm_dir())?;
    let unpacked = workdir.unpack_srpm(&artifacts.srpm)?;

    let spec_path = match artifacts.spec {
        Some(path) => path,
        None => spec_from_unpacked(&unpacked)?,
    };
    let spec = SpecFile::parse(&spec_path)?;
    let srpm = Srpm::new(artifacts.srpm.clone(), unpacked);

    if !cli.offline {
        fetch_upstream_sources(&fetcher, &spec, &workdir);
    }

    let mut build = BuildCoordinator::new(
        select_builder(cli, &config, &workdir),
        artifacts.srpm,
        workdir.root().to_path_buf(),
    );
    if !cli.cache && !cli.no_build {
        build = build.persisting_to(workdir.results_dir());
    }

    let ctx = AnalysisContext::new(
        spec,
        srpm,
        build,
        upstream_trees(&workdir),
        workdir.root().to_path_buf(),
    );

    let loaded = loader.load(&ctx)?;
    let descriptors: Vec<_> = loaded
        .checks
        .values()
        .map(|c| c.descriptor().clone())
        .collect();
    let execution_plan = plan::resolve(&descriptors)?;

    let selection = Selection::from_cli(cli.single.as_deref(), &cli.exclude);
    let selection_plan = selection.apply(&execution_plan);
    let results = scheduler::execute(&execution_plan, &selection_plan, &loaded.checks, &ctx);

    let rpmlint = ctx.rpmlint_output().unwrap_or_default().to_string();
    let checksums = source_checksums(&ctx.srpm().source_files())?;
    let document = aggregate(
        &ctx.review_name(),
        &results,
        loaded.groups,
        &rpmlint,
        checksums,
        ctx.build_error().map(|reason| format!("build failed: {reason}")),
    );

    let text_path = report_path(&cwd, &document.package, TextRenderer.extension());
    fs::write(&text_path, TextRenderer.render(&document)?)?;
    info!("report written to {}", text_path.display());
    println!("Review written to {}", text_path.display());

    if config.report.xml {
        let xml_path = report_path(&cwd, &document.package, XmlRenderer.extension());
        fs::write(&xml_path, XmlRenderer.render(&document)?)?;
        info!("XML report written to {}", xml_path.display());
    }

    Ok(())
}

fn registry_loader(config: &Config) -> RegistryLoader {
    let mut ext_dirs = config.checks.ext_dirs.clone();
    if let Ok(value) = std::env::var("REVIEW_EXT_DIRS") {
        ext_dirs.extend(split_search_path(&value));
    }
    let mut script_dirs = config.checks.script_dirs.clone();
    if let Ok(value) = std::env::var("REVIEW_SCRIPT_DIRS") {
        script_dirs.extend(split_search_path(&value));
    }
    RegistryLoader::new(config.groups.clone())
        .with_ext_dirs(ext_dirs)
        .with_script_dirs(script_dirs)
}

/// `--display`: every known check, sorted by group then name.
fn display_checks(loader: &RegistryLoader) -> Result<()> {
    let mut lines = Vec::new();
    for registry in loader.registries()? {
        for check in registry.checks() {
            let d = check.descriptor();
            lines.push((
                d.order_key(),
                format!("{} [{}] ({}): {}", d.name, d.kind, d.group, d.text),
            ));
        }
    }
    for script in loader.script_checks() {
        let d = script.descriptor();
        lines.push((
            d.order_key(),
            format!("{} [{}] ({}): {}", d.name, d.kind, d.group, d.text),
        ));
    }
    lines.sort();
    for (_, line) in lines {
        println!("{line}");
    }
    Ok(())
}

fn workdir_root(cli: &Cli, cwd: &Path, source: &ArtifactSource) -> PathBuf {
    if let Some(dir) = &cli.workdir {
        return dir.clone();
    }
    let label = match source {
        ArtifactSource::Bug(id) => id.clone(),
        ArtifactSource::Name(name) => name.clone(),
        ArtifactSource::Url(url) => url
            .rsplit('/')
            .next()
            .unwrap_or(url)
            .trim_end_matches(".src.rpm")
            .to_string(),
    };
    cwd.join(format!("{label}-review"))
}

fn select_builder(cli: &Cli, config: &Config, workdir: &WorkDir) -> Box<dyn Builder> {
    if let Some(dir) = &cli.prebuilt {
        return Box::new(PrebuiltBuilder::new(dir.clone()));
    }
    if cli.cache || cli.no_build {
        return Box::new(CachedBuilder::new(workdir.results_dir()));
    }
    let mock_config = cli
        .mock_config
        .clone()
        .or_else(|| config.build.mock_config.clone());
    let mut options = config.build.mock_options.clone();
    options.extend(cli.mock_option_list());
    Box::new(MockBuilder::new(mock_config, options))
}

fn spec_from_unpacked(unpacked: &Path) -> Result<PathBuf> {
    let mut specs: Vec<PathBuf> = fs::read_dir(unpacked)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "spec"))
        .collect();
    specs.sort();
    specs.pop().ok_or_else(|| ReviewError::ArtifactNotFound {
        reference: format!("*.spec in {}", unpacked.display()),
    })
}

/// Best-effort download of the upstream tarballs named in Source tags.
/// Failures only warn; the checks that compare against upstream go
/// pending without them.
fn fetch_upstream_sources(fetcher: &Fetcher<'_>, spec: &SpecFile, workdir: &WorkDir) {
    for source in spec.sources() {
        if !source.starts_with("http://") && !source.starts_with("https://") {
            continue;
        }
        if let Err(e) = fetcher.download(&source, &workdir.upstream_dir()) {
            warn!("could not fetch upstream source {source}: {e}");
        }
    }
}

fn upstream_trees(workdir: &WorkDir) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(workdir.upstream_unpacked_dir()) else {
        return Vec::new();
    };
    let mut trees: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    trees.sort();
    trees
}
