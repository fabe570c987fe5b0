use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use sign_interp_rs::frame_pipeline::{
    CannyEdgeProcessor, ColorThresholdProcessor, DisplayObserver, Frame, FrameTimestamp,
    InterpreterConfig, InterpreterFacade, LogDiagnosticObserver, LogObserver, PixelFormat,
    ProcessingPipeline, TemplateClassifier,
};
use sign_interp_rs::logger;

use tracing::info;

const CONFIG_ENV: &str = "SIGN_INTERP_CONFIG";
const FRAME_SIZE: usize = 64;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const UI_QUEUE: usize = 16;

const SKIN: [u8; 3] = [220, 180, 150];
const BACKGROUND: [u8; 3] = [30, 30, 40];

type Region = (Range<usize>, Range<usize>);

/// Synthetic hand silhouettes standing in for a camera.
fn gesture_regions(name: &str) -> Vec<Region> {
    match name {
        "open_hand" => vec![
            (16..48, 32..56),
            (16..21, 8..32),
            (24..29, 6..32),
            (32..37, 6..32),
            (40..45, 10..32),
        ],
        "fist" => vec![(18..46, 22..52)],
        "point" => vec![(18..46, 34..56), (28..34, 4..34)],
        _ => Vec::new(),
    }
}

fn render(regions: &[Region], timestamp: FrameTimestamp) -> Result<Frame> {
    let data = (0..FRAME_SIZE * FRAME_SIZE)
        .flat_map(|i| {
            let (x, y) = (i % FRAME_SIZE, i / FRAME_SIZE);
            let inside = regions.iter().any(|(xs, ys)| xs.contains(&x) && ys.contains(&y));
            if inside { SKIN } else { BACKGROUND }
        })
        .collect();
    Ok(Frame::new(data, FRAME_SIZE, FRAME_SIZE, PixelFormat::Rgb, timestamp)?)
}

/// Feeds frames at camera rate, including one the pipeline cannot handle.
fn simulate_capture(facade: &InterpreterFacade, origin: Instant) -> Result<()> {
    for name in ["open_hand", "fist", "yuv", "point", "nothing", "open_hand"] {
        let timestamp = FrameTimestamp::since(origin, Instant::now());
        let frame = if name == "yuv" {
            Frame::filled(FRAME_SIZE, FRAME_SIZE, PixelFormat::Yuv, 128, timestamp)?
        } else {
            render(&gesture_regions(name), timestamp)?
        };
        facade.submit_frame(frame);
        thread::sleep(FRAME_INTERVAL);
    }
    Ok(())
}

fn main() -> Result<()> {
    logger::init();

    info!("Starting sign language interpreter...");

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => InterpreterConfig::from_json_file(&path)
            .with_context(|| format!("Loading config from {}", path.to_string_lossy()))?,
        None => InterpreterConfig::default(),
    };
    info!(?config, "Configuration loaded");

    // Templates go through the same stages the facade will apply.
    let reference = ProcessingPipeline::new()
        .with_stage(ColorThresholdProcessor::with_range(
            config.color_threshold,
            config.color_threshold_high,
        )?)
        .with_stage(CannyEdgeProcessor::new(config.canny_low, config.canny_high)?);

    let mut classifier = TemplateClassifier::new(8)?;
    for name in ["open_hand", "fist", "point"] {
        let example = reference.run(render(&gesture_regions(name), FrameTimestamp(0))?)?;
        classifier.add_template(name, &example)?;
    }
    info!(labels = ?classifier.labels(), "Gesture templates ready");

    let facade = InterpreterFacade::from_config(config, classifier)?;

    let log_observer = Arc::new(LogObserver);
    let diagnostics = Arc::new(LogDiagnosticObserver);
    let (display, ui) = DisplayObserver::channel(UI_QUEUE);
    let display = Arc::new(display);
    facade.add_observer(&log_observer);
    facade.add_observer(&display);
    facade.add_diagnostic_observer(&diagnostics);

    let origin = Instant::now();
    thread::scope(|scope| scope.spawn(|| simulate_capture(&facade, origin)).join())
        .map_err(|_| anyhow!("Capture thread panicked"))??;
    let elapsed = FrameTimestamp::since(origin, Instant::now()).as_duration();
    info!(?elapsed, "Capture finished");

    facade.shutdown();

    for text in ui.try_iter() {
        info!("{text}");
    }

    Ok(())
}
