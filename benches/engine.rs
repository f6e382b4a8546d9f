use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mosaic_mvp::logging::{LogRecord, LogSink, LoggingResult};
use mosaic_mvp::{Command, Logger, MosaicRuntime, Result, Side, Size};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _record: &LogRecord) -> LoggingResult<()> {
        Ok(())
    }
}

fn engine_tiling_script(c: &mut Criterion) {
    let script = tiling_script();
    c.bench_function("engine_tiling_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime().expect("runtime");
            runtime
                .run_script(black_box(script.clone()))
                .expect("scripted run");
            runtime.take_dirty()
        });
    });
}

fn engine_churn_script(c: &mut Criterion) {
    let script = churn_script();
    c.bench_function("engine_churn_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime().expect("runtime");
            runtime
                .run_script(black_box(script.clone()))
                .expect("scripted run");
            runtime.engine().snapshot()
        });
    });
}

fn build_runtime() -> Result<MosaicRuntime> {
    let mut runtime = MosaicRuntime::with_root(Size::new(1920, 1080), "workbench".to_string())?;
    runtime.config_mut().logger = Some(Logger::new(NullSink));
    runtime.config_mut().enable_metrics();
    Ok(runtime)
}

/// Build a 3x3-ish irregular board, then navigate and resize across it.
fn tiling_script() -> Vec<Command> {
    vec![
        Command::Split(Side::Right),
        Command::New("editor".to_string()),
        Command::Split(Side::Below),
        Command::New("terminal".to_string()),
        Command::Switch(Side::Left),
        Command::Split(Side::Above),
        Command::New("outline".to_string()),
        Command::Split(Side::Left),
        Command::New("tree".to_string()),
        Command::Switch(Side::Right),
        Command::Swap(Side::Below),
        Command::Resize(Size::new(2560, 1440)),
        Command::Switch(Side::Above),
        Command::Resize(Size::new(1920, 1080)),
    ]
}

/// Repeated split/close churn to exercise relinking and reclamation.
fn churn_script() -> Vec<Command> {
    let mut script = Vec::new();
    for round in 0..12 {
        let side = Side::ALL[round % 4];
        script.push(Command::Split(side));
        script.push(Command::New(format!("pane-{round}")));
    }
    for _ in 0..8 {
        script.push(Command::Close);
    }
    script
}

criterion_group!(benches, engine_tiling_script, engine_churn_script);
criterion_main!(benches);
