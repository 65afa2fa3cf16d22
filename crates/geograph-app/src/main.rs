//! GeoGraph 演示程序入口
//! 构造示例图形，拖动自由点并输出各图元的派生值

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use geograph_core::prelude::*;

/// 示例图形中的图元
struct Demo {
    points: Vec<NodeId>,
    intersections: Vec<NodeId>,
    drag: NodeId,
}

fn load_config(path: Option<&str>) -> Result<DocumentConfig> {
    let Some(path) = path else {
        return Ok(DocumentConfig::default());
    };
    let text = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read config {}", path))?;
    DocumentConfig::from_json_str(&text).with_context(|| format!("invalid config {}", path))
}

fn create_demo_content(doc: &mut Document) -> Result<Demo> {
    // 三角形与外接于原点的圆
    let a = doc.create_independent_point(-6, 0);
    let b = doc.create_independent_point(6, 0);
    let c = doc.create_independent_point(0, 8);
    let o = doc.create_independent_point(0, 0);
    let e = doc.create_independent_point(5, 0);

    let ab = doc.create_line(a, b)?;
    let bc = doc.create_line(b, c)?;
    let ca = doc.create_line(c, a)?;
    let circle = doc.create_circle(o, e)?;

    let left = doc.create_intersection(ab, circle, Pos::new(-5, 0))?;
    let right = doc.create_intersection(ab, circle, Pos::new(5, 0))?;
    let apex = doc.create_intersection(bc, ca, Pos::new(0, 8))?;
    let on_bc = doc.create_constrained_point(bc, Pos::new(4, 4))?;

    info!(
        "Created demo diagram with {} entities",
        doc.graph().available_count()
    );
    Ok(Demo {
        points: vec![a, b, c, o, e],
        intersections: vec![left, right, apex, on_bc],
        drag: e,
    })
}

fn print_points(doc: &Document, ids: &[NodeId]) {
    for id in ids {
        let label = doc.label(*id).unwrap_or("?");
        match doc.position(*id) {
            Some(pos) => match pos.to_display() {
                Some(p) => println!(
                    "  {:<4} ({}, {})  ~ ({:.3}, {:.3})",
                    label, pos.x, pos.y, p.x, p.y
                ),
                None => println!("  {:<4} ({}, {})", label, pos.x, pos.y),
            },
            None => println!("  {:<4} undefined", label),
        }
    }
}

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref())?;

    // 初始化日志
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(level).finish(),
    )?;

    info!("Starting GeoGraph...");

    let mut doc = Document::with_config(config);
    let demo = create_demo_content(&mut doc)?;

    println!("Initial positions:");
    print_points(&doc, &demo.points);
    print_points(&doc, &demo.intersections);

    // 拖动圆上的点，半径增大后两个交点随之外移
    for x in [7, 10] {
        let report = doc.move_point(demo.drag, Pos::new(x, 0))?;
        info!(
            "Moved {} to ({}, 0), {} entities recomputed",
            doc.label(demo.drag).unwrap_or("?"),
            x,
            report.recomputed.len()
        );
        println!("After moving edge point to ({}, 0):", x);
        print_points(&doc, &demo.intersections);
    }

    let removed = doc.remove(demo.points[2]);
    if removed.is_empty() {
        warn!("Nothing removed");
    }
    info!("Removed {} entities", removed.len());
    println!("After removing the apex vertex:");
    print_points(&doc, &demo.intersections);

    Ok(())
}
