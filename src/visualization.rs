use petgraph::visit::{EdgeRef, IntoNodeReferences};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;

use crate::mineral_network::BipartiteGraph;

const SKYBLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHTGREEN: RGBColor = RGBColor(144, 238, 144);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const MUNICIPIO_COLOR: RGBColor = RGBColor(0x1f, 0x78, 0xb4);
const RECURSO_COLOR: RGBColor = RGBColor(0x33, 0xa0, 0x2c);

/// Two horizontal bar panels: municipalities ranked by royalties and by
/// produced tonnes.
pub fn plot_top_municipalities(
    top_regalias: &[(String, f64)],
    top_toneladas: &[(String, f64)],
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(700);

    draw_barh(
        &left,
        top_regalias,
        "Top 10 Municipios por Regalías",
        "Regalías",
        SKYBLUE,
    )?;
    draw_barh(
        &right,
        top_toneladas,
        "Top 10 Municipios por Toneladas Producidas",
        "Toneladas",
        LIGHTGREEN,
    )?;

    root.present()?;
    Ok(())
}

fn draw_barh(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    ranking: &[(String, f64)],
    title: &str,
    x_label: &str,
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    // Highest-ranked municipality at the top of the panel.
    let names: Vec<&str> = ranking.iter().rev().map(|(name, _)| name.as_str()).collect();
    let values: Vec<f64> = ranking.iter().rev().map(|(_, value)| *value).collect();
    let max_value = values.iter().fold(0.0f64, |acc, &v| acc.max(v)).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(180)
        .build_cartesian_2d(
            0.0..max_value * 1.05,
            (0..ranking.len() as i32).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_label)
        .y_label_formatter(&|segment: &SegmentValue<i32>| match segment {
            SegmentValue::CenterOf(index) => names
                .get(*index as usize)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(index, value)| {
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(index as i32)),
                (*value, SegmentValue::Exact(index as i32 + 1)),
            ],
            color.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    Ok(())
}

/// Node-link diagram of the bipartite graph, municipalities in blue and
/// resources in green.
pub fn plot_bipartite_graph(graph: &BipartiteGraph, path: &str) -> Result<(), Box<dyn Error>> {
    let positions = spring_layout(graph, 0.1, 20);

    let root = SVGBackend::new(path, (1200, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "Red Bipartita entre Municipios y Recursos Naturales",
        ("sans-serif", 24),
    )?;

    let mut chart = ChartBuilder::on(&root).build_cartesian_2d(-1.1f64..1.1f64, -1.1f64..1.1f64)?;

    chart.draw_series(graph.edge_references().map(|edge| {
        let (x1, y1) = positions[edge.source().index()];
        let (x2, y2) = positions[edge.target().index()];
        PathElement::new(vec![(x1, y1), (x2, y2)], &GRAY)
    }))?;

    chart.draw_series(graph.node_references().map(|(index, node)| {
        let (x, y) = positions[index.index()];
        let color = if node.is_municipio() {
            MUNICIPIO_COLOR
        } else {
            RECURSO_COLOR
        };
        EmptyElement::at((x, y))
            + Circle::new((0, 0), 4, color.filled())
            + Text::new(node.nombre().to_string(), (6, -3), ("sans-serif", 8))
    }))?;

    root.present()?;
    Ok(())
}

/// Fruchterman-Reingold force-directed layout. Initial positions follow a
/// golden-angle spiral, so the same graph always yields the same picture.
/// Final positions are rescaled to the unit disc.
pub fn spring_layout(graph: &BipartiteGraph, k: f64, iterations: usize) -> Vec<(f64, f64)> {
    const GOLDEN_ANGLE: f64 = 2.399963229728653;

    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut positions: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let radius = ((i + 1) as f64 / n as f64).sqrt();
            let theta = i as f64 * GOLDEN_ANGLE;
            (radius * theta.cos(), radius * theta.sin())
        })
        .collect();

    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut displacement = vec![(0.0f64, 0.0f64); n];

        // Repulsion between every pair of nodes.
        for i in 0..n {
            for j in i + 1..n {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
                let force = k * k / distance;
                let fx = dx / distance * force;
                let fy = dy / distance * force;
                displacement[i].0 += fx;
                displacement[i].1 += fy;
                displacement[j].0 -= fx;
                displacement[j].1 -= fy;
            }
        }

        // Attraction along edges.
        for edge in graph.edge_references() {
            let a = edge.source().index();
            let b = edge.target().index();
            let dx = positions[a].0 - positions[b].0;
            let dy = positions[a].1 - positions[b].1;
            let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
            let force = distance * distance / k;
            let fx = dx / distance * force;
            let fy = dy / distance * force;
            displacement[a].0 -= fx;
            displacement[a].1 -= fy;
            displacement[b].0 += fx;
            displacement[b].1 += fy;
        }

        for i in 0..n {
            let (dx, dy) = displacement[i];
            let length = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = length.min(temperature);
            positions[i].0 += dx / length * step;
            positions[i].1 += dy / length * step;
        }

        temperature -= cooling;
    }

    rescale(&mut positions);
    positions
}

/// Center positions on the origin and scale the farthest node onto the unit
/// circle.
fn rescale(positions: &mut [(f64, f64)]) {
    if positions.is_empty() {
        return;
    }

    let n = positions.len() as f64;
    let (sum_x, sum_y) = positions
        .iter()
        .fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
    let (center_x, center_y) = (sum_x / n, sum_y / n);

    let mut max_radius = 0.0f64;
    for p in positions.iter_mut() {
        p.0 -= center_x;
        p.1 -= center_y;
        max_radius = max_radius.max((p.0 * p.0 + p.1 * p.1).sqrt());
    }

    if max_radius > 0.0 {
        for p in positions.iter_mut() {
            p.0 /= max_radius;
            p.1 /= max_radius;
        }
    }
}
