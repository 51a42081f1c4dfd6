mod config;
mod logging;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bag_config_adapters::{
    default_renderer, fetcher_for_root, present_catalog_row, present_scene_summary,
    BackgroundAssetPipeline, BackgroundCatalogLoader, CachedAssetLoader, CpuFrameRenderer,
    GltfAssetLoader, JsonCatalogSource,
};
use bag_config_application::{
    ApplicationError, ApplicationService, AssetLoader, ControlsQuery, FrameRenderer, PollCommand,
    RenderFrameCommand, SetIndexCommand, StartCommand, ViewportStatusQuery,
};
use bag_config_domain::{CatalogStatus, RenderedFrame, ViewportStatus};
use config::AppConfig;
use log::info;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn main() -> ExitCode {
    logging::init_logging();
    let args: Vec<String> = std::env::args().collect();

    let invocation = match parse_command(&args) {
        Ok(invocation) => invocation,
        Err(error) => return report_failure(error),
    };
    let config = AppConfig::default().with_root(invocation.root);

    match run_command(invocation.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(error),
    }
}

fn report_failure(error: CommandError) -> ExitCode {
    match error {
        CommandError::Usage(msg) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        CommandError::Runtime(msg) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

/// The cache handle is returned alongside the service so its counters can be shown.
fn build_application_service(
    config: &AppConfig,
    renderer: Box<dyn FrameRenderer>,
) -> Result<(ApplicationService, Arc<CachedAssetLoader>), ApplicationError> {
    let fetcher = fetcher_for_root(&config.asset_root)?;
    let catalog_source = JsonCatalogSource::new(Arc::clone(&fetcher), config.catalog_path.clone());
    let gltf: Arc<dyn AssetLoader> = Arc::new(GltfAssetLoader::new(fetcher));
    let cache = Arc::new(CachedAssetLoader::new(gltf, config.asset_cache_capacity)?);
    let loader: Arc<dyn AssetLoader> = Arc::clone(&cache) as Arc<dyn AssetLoader>;
    info!(
        "serving templates from {} (catalog {})",
        config.asset_root, config.catalog_path
    );

    let service = ApplicationService::new(
        Box::new(BackgroundCatalogLoader::new(Arc::new(catalog_source))),
        Box::new(BackgroundAssetPipeline::new(loader)?),
        renderer,
    );
    Ok((service, cache))
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Ui,
    List,
    Inspect { index: i64 },
    Snapshot { index: i64, output: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    command: Command,
    root: Option<String>,
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Invocation, CommandError> {
    let mut root = None;
    let mut positional = Vec::new();
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--root" {
            let value = rest
                .next()
                .ok_or_else(|| CommandError::Usage("missing value for --root".to_string()))?;
            root = Some(value.clone());
        } else if let Some(value) = arg.strip_prefix("--root=") {
            root = Some(value.to_string());
        } else if arg.starts_with("--") {
            return Err(CommandError::Usage(format!("unknown option: {arg}")));
        } else {
            positional.push(arg.as_str());
        }
    }
    if root.as_deref().is_some_and(|value| value.trim().is_empty()) {
        return Err(CommandError::Usage("--root must not be empty".to_string()));
    }

    let command = match positional.as_slice() {
        [] | ["ui"] => Command::Ui,
        ["list"] => Command::List,
        ["inspect"] => return Err(CommandError::Usage("missing template index".to_string())),
        ["inspect", index] => Command::Inspect {
            index: parse_index(index)?,
        },
        ["snapshot"] | ["snapshot", _] => {
            return Err(CommandError::Usage(
                "snapshot needs a template index and an output path".to_string(),
            ))
        }
        ["snapshot", index, output] => Command::Snapshot {
            index: parse_index(index)?,
            output: PathBuf::from(output),
        },
        [command, ..] if matches!(*command, "ui" | "list" | "inspect" | "snapshot") => {
            return Err(CommandError::Usage(format!(
                "too many arguments for {command}"
            )))
        }
        [other, ..] => return Err(CommandError::Usage(format!("unknown command: {other}"))),
    };

    Ok(Invocation { command, root })
}

fn parse_index(value: &str) -> Result<i64, CommandError> {
    value
        .parse::<i64>()
        .map_err(|_| CommandError::Usage(format!("invalid template index: {value}")))
}

fn run_command(command: Command, config: &AppConfig) -> Result<(), CommandError> {
    match command {
        Command::Ui => {
            let (service, cache) = build_application_service(config, default_renderer())
                .map_err(|error| CommandError::Runtime(format!("startup failed: {error}")))?;
            ui::launch_window(service, &cache, config).map_err(CommandError::Runtime)
        }
        Command::List => {
            let mut service = headless_service(config)?;
            if !load_catalog(&mut service)? {
                println!("no templates in catalog");
                return Ok(());
            }
            let Some(catalog) = service.catalog() else {
                println!("no templates in catalog");
                return Ok(());
            };
            for (index, template) in catalog.iter().enumerate() {
                println!("{}", present_catalog_row(index, template));
            }
            Ok(())
        }
        Command::Inspect { index } => {
            let mut service = headless_service(config)?;
            let index = show_template(&mut service, index)?;
            let (Some(catalog), Some(scene), Some(report)) = (
                service.catalog(),
                service.displayed_scene(),
                service.displayed_report(),
            ) else {
                return Err(CommandError::Runtime("no template on display".to_string()));
            };
            let Some(template) = catalog.get(index) else {
                return Err(CommandError::Runtime(format!("no template at {index}")));
            };
            println!("{}", present_scene_summary(index, template, scene, &report));
            Ok(())
        }
        Command::Snapshot { index, output } => {
            let (mut service, _) = build_application_service(config, default_renderer())
                .map_err(|error| CommandError::Runtime(format!("startup failed: {error}")))?;
            show_template(&mut service, index)?;
            let frame = service
                .render_frame(RenderFrameCommand {
                    width: config.snapshot_width,
                    height: config.snapshot_height,
                })
                .map_err(|error| CommandError::Runtime(format!("render failed: {error}")))?;
            write_png(&frame, &output)?;
            println!(
                "wrote {} ({}x{}, backend={}, {}ms)",
                output.display(),
                frame.width,
                frame.height,
                service.renderer_backend(),
                frame.render_time_ms
            );
            Ok(())
        }
    }
}

fn headless_service(config: &AppConfig) -> Result<ApplicationService, CommandError> {
    build_application_service(config, Box::new(CpuFrameRenderer))
        .map(|(service, _)| service)
        .map_err(|error| CommandError::Runtime(format!("startup failed: {error}")))
}

/// Returns `false` when the catalog loaded but holds no templates.
fn load_catalog(service: &mut ApplicationService) -> Result<bool, CommandError> {
    service
        .start(StartCommand)
        .map_err(|error| CommandError::Runtime(format!("start failed: {error}")))?;
    wait_until(service, |service| {
        service.controls(ControlsQuery).status != CatalogStatus::Pending
    })?;

    match service.controls(ControlsQuery).status {
        CatalogStatus::Ready => Ok(true),
        CatalogStatus::NoTemplates => Ok(false),
        CatalogStatus::Unavailable(reason) => Err(CommandError::Runtime(format!(
            "template catalog unavailable: {reason}"
        ))),
        CatalogStatus::Pending => Err(CommandError::Runtime(
            "template catalog still loading".to_string(),
        )),
    }
}

/// Moves the cursor like the slider would and waits for that template to be on display.
fn show_template(service: &mut ApplicationService, index: i64) -> Result<usize, CommandError> {
    if !load_catalog(service)? {
        return Err(CommandError::Runtime("no templates in catalog".to_string()));
    }
    service
        .set_index(SetIndexCommand { index })
        .map_err(|error| CommandError::Runtime(format!("select failed: {error}")))?;
    wait_until(service, |service| {
        !matches!(
            service.viewport_status(ViewportStatusQuery),
            ViewportStatus::Loading { .. }
        )
    })?;

    match service.viewport_status(ViewportStatusQuery) {
        ViewportStatus::Showing { .. } => service
            .displayed_index()
            .ok_or_else(|| CommandError::Runtime("no template on display".to_string())),
        ViewportStatus::Failed { name, reason } => Err(CommandError::Runtime(format!(
            "template {name} failed to load: {reason}"
        ))),
        ViewportStatus::Idle | ViewportStatus::Loading { .. } => Err(CommandError::Runtime(
            "no template on display".to_string(),
        )),
    }
}

fn wait_until(
    service: &mut ApplicationService,
    mut done: impl FnMut(&ApplicationService) -> bool,
) -> Result<(), CommandError> {
    let started = Instant::now();
    loop {
        service
            .poll(PollCommand)
            .map_err(|error| CommandError::Runtime(format!("poll failed: {error}")))?;
        if done(service) {
            return Ok(());
        }
        if started.elapsed() > SETTLE_TIMEOUT {
            return Err(CommandError::Runtime(format!(
                "gave up waiting after {}s",
                SETTLE_TIMEOUT.as_secs()
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn write_png(frame: &RenderedFrame, output: &Path) -> Result<(), CommandError> {
    let mut bytes = Vec::with_capacity(frame.pixels.len() * 3);
    for pixel in &frame.pixels {
        bytes.extend_from_slice(&[
            ((pixel >> 16) & 0xFF) as u8,
            ((pixel >> 8) & 0xFF) as u8,
            (pixel & 0xFF) as u8,
        ]);
    }
    let image = image::RgbImage::from_raw(frame.width, frame.height, bytes)
        .ok_or_else(|| CommandError::Runtime("frame buffer size mismatch".to_string()))?;
    image
        .save_with_format(output, image::ImageFormat::Png)
        .map_err(|error| {
            CommandError::Runtime(format!("failed to write {}: {error}", output.display()))
        })
}

fn print_usage() {
    println!("usage:");
    println!("  bag-config [ui] [--root <dir|url>]");
    println!("  bag-config list [--root <dir|url>]");
    println!("  bag-config inspect <index> [--root <dir|url>]");
    println!("  bag-config snapshot <index> <out.png> [--root <dir|url>]");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("bag-config")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_open_the_window() {
        let invocation = parse_command(&args(&[])).expect("ui should parse");
        assert_eq!(invocation.command, Command::Ui);
        assert_eq!(invocation.root, None);
    }

    #[test]
    fn root_flag_is_accepted_anywhere() {
        let before = parse_command(&args(&["--root", "https://cdn.example", "list"])).expect("list");
        let after = parse_command(&args(&["list", "--root=assets"])).expect("list");
        assert_eq!(before.command, Command::List);
        assert_eq!(before.root.as_deref(), Some("https://cdn.example"));
        assert_eq!(after.root.as_deref(), Some("assets"));
    }

    #[test]
    fn parse_snapshot_command() {
        let invocation = parse_command(&args(&["snapshot", "3", "out.png"])).expect("snapshot");
        assert_eq!(
            invocation.command,
            Command::Snapshot {
                index: 3,
                output: PathBuf::from("out.png")
            }
        );
    }

    #[test]
    fn inspect_accepts_out_of_range_indices() {
        let invocation = parse_command(&args(&["inspect", "-4"])).expect("inspect");
        assert_eq!(invocation.command, Command::Inspect { index: -4 });
    }

    #[test]
    fn usage_errors() {
        for bad in [
            args(&["inspect"]),
            args(&["inspect", "abc"]),
            args(&["snapshot", "1"]),
            args(&["list", "extra"]),
            args(&["export"]),
            args(&["--root"]),
            args(&["--verbose"]),
        ] {
            assert!(
                matches!(parse_command(&bad), Err(CommandError::Usage(_))),
                "{bad:?} should be a usage error"
            );
        }
    }
}
