use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sign_interp_rs::frame_pipeline::{
    CannyEdgeProcessor, ColorThresholdProcessor, Frame, FrameTimestamp, GestureInterpreter,
    GrayscaleProcessor, PixelFormat, ProcessingPipeline, TemplateClassifier,
};

fn generate_mock_frame(width: usize, height: usize) -> Frame {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = ((x + y) % 256) as u8;
            data.extend_from_slice(&[value, value / 2, 255 - value]);
        }
    }
    Frame::new(data, width, height, PixelFormat::Rgb, FrameTimestamp(0)).unwrap()
}

fn default_pipeline() -> ProcessingPipeline {
    ProcessingPipeline::new()
        .with_stage(ColorThresholdProcessor::new(128))
        .with_stage(CannyEdgeProcessor::new(50.0, 150.0).unwrap())
}

fn benchmark_pipeline_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_by_size");

    let sizes = vec![
        (160, 120, "160x120"),
        (320, 240, "320x240"),
        (640, 480, "640x480"),
    ];

    for (width, height, label) in sizes {
        let frame = generate_mock_frame(width, height);
        let pipeline = default_pipeline();

        group.bench_with_input(BenchmarkId::from_parameter(label), &frame, |b, frame| {
            b.iter(|| pipeline.run(black_box(frame.clone())));
        });
    }

    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let frame = generate_mock_frame(320, 240);
    let gray = ProcessingPipeline::new()
        .with_stage(GrayscaleProcessor)
        .run(frame.clone())
        .unwrap();

    group.bench_function("grayscale", |b| {
        let pipeline = ProcessingPipeline::new().with_stage(GrayscaleProcessor);
        b.iter(|| pipeline.run(black_box(frame.clone())));
    });

    group.bench_function("color_threshold", |b| {
        let pipeline = ProcessingPipeline::new().with_stage(ColorThresholdProcessor::new(128));
        b.iter(|| pipeline.run(black_box(frame.clone())));
    });

    group.bench_function("canny_edge", |b| {
        let pipeline = ProcessingPipeline::new().with_stage(CannyEdgeProcessor::new(50.0, 150.0).unwrap());
        b.iter(|| pipeline.run(black_box(gray.clone())));
    });

    group.finish();
}

fn benchmark_interpretation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpretation");
    let processed = default_pipeline().run(generate_mock_frame(320, 240)).unwrap();

    for grid in [8, 16, 32] {
        let mut classifier = TemplateClassifier::new(grid).unwrap();
        for label in ["a", "b", "c", "d"] {
            classifier.add_template(label, &processed).unwrap();
        }
        let interpreter = GestureInterpreter::new(classifier, 0.5).unwrap();

        group.bench_with_input(BenchmarkId::new("template_grid", grid), &processed, |b, frame| {
            b.iter(|| interpreter.interpret(black_box(frame)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pipeline_sizes,
    benchmark_stages,
    benchmark_interpretation
);
criterion_main!(benches);
