//! Walkthrough demo: drives a board through the text command form and
//! prints the resulting tiling after every step.
//!
//! ```text
//! cargo run --example splitboard
//! ```

use mosaic_mvp::{MosaicRuntime, Side, Size};

fn main() -> mosaic_mvp::Result<()> {
    let mut runtime = MosaicRuntime::with_root(Size::new(80, 24), "shell".to_string())?;

    let script = [
        "split right",
        "new editor",
        "split below",
        "new log tail",
        "switch left",
        "split above",
        "new scratch",
        "resize 30 120",
    ];

    print_board(&runtime, "initial board");
    for line in script {
        runtime.dispatch_line(line)?;
        print_board(&runtime, line);
    }

    // Adjacency from the active pane's point of view.
    if let Some(active) = runtime.engine().active() {
        println!("adjacency of the active pane:");
        for side in Side::ALL {
            let labels: Vec<String> = runtime
                .engine()
                .neighbors(active, side)
                .into_iter()
                .map(|id| {
                    runtime
                        .engine()
                        .pane(id)
                        .map(|p| p.content().clone())
                        .unwrap_or_default()
                })
                .collect();
            println!("  {side:>5}: {labels:?}");
        }
    }

    Ok(())
}

fn print_board(runtime: &MosaicRuntime, step: &str) {
    println!("after `{step}`:");
    for snap in runtime.engine().snapshot() {
        let marker = if snap.is_active { "*" } else { " " };
        println!(
            "  {marker} {:>4},{:<4} {:>4}x{:<4} {}",
            snap.rect.x, snap.rect.y, snap.rect.width, snap.rect.height, snap.content
        );
    }
    println!();
}
