mod cooccurrence;
mod export;
mod mineral_network;
mod visualization;

use std::error::Error;
use std::fs;

use petgraph::algo::connected_components;

use crate::cooccurrence::cooccurrence_graph;
use crate::export::{ranking_entries, NetworkSummary};
use crate::mineral_network::{
    create_bipartite_graph, load_data, node_kind_counts, top_municipalities, RankAttribute,
};

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = "datos/processed/mineria_limpia.csv";
    let out_dir = "datos/processed";
    fs::create_dir_all(out_dir)?;

    let registros = load_data(file_path)?;
    println!("Number of records loaded: {}", registros.len());

    let red = create_bipartite_graph(&registros);
    let (municipios, recursos) = node_kind_counts(&red);
    println!("Number of nodes in bipartite graph: {}", red.node_count());
    println!("Number of edges in bipartite graph: {}", red.edge_count());
    println!("Municipalities: {}, resources: {}", municipios, recursos);

    let top_regalias = top_municipalities(&red, RankAttribute::Regalias, 10);
    let top_toneladas = top_municipalities(&red, RankAttribute::Toneladas, 10);

    visualization::plot_top_municipalities(
        &top_regalias,
        &top_toneladas,
        &format!("{}/top_municipios.svg", out_dir),
    )?;
    visualization::plot_bipartite_graph(&red, &format!("{}/red_bipartita.svg", out_dir))?;

    export::save_bipartite_graphml(
        &red,
        &format!("{}/red_bipartita_municipios_recursos.graphml", out_dir),
    )?;

    let coocurrencia_recursos = cooccurrence_graph(
        &registros,
        |r| r.municipio.as_str(),
        |r| r.recurso_natural.as_str(),
    );
    let coocurrencia_municipios = cooccurrence_graph(
        &registros,
        |r| r.recurso_natural.as_str(),
        |r| r.municipio.as_str(),
    );

    println!(
        "Resource co-occurrence: {} nodes, {} edges, {} components",
        coocurrencia_recursos.node_count(),
        coocurrencia_recursos.edge_count(),
        connected_components(&coocurrencia_recursos)
    );
    println!(
        "Municipality co-occurrence: {} nodes, {} edges, {} components",
        coocurrencia_municipios.node_count(),
        coocurrencia_municipios.edge_count(),
        connected_components(&coocurrencia_municipios)
    );

    export::save_cooccurrence_graphml(
        &coocurrencia_recursos,
        &format!("{}/coocurrencia_recursos.graphml", out_dir),
    )?;
    export::save_cooccurrence_graphml(
        &coocurrencia_municipios,
        &format!("{}/coocurrencia_municipios.graphml", out_dir),
    )?;

    let summary = NetworkSummary {
        registros: registros.len(),
        municipios,
        recursos,
        aristas_bipartita: red.edge_count(),
        componentes_coocurrencia_recursos: connected_components(&coocurrencia_recursos),
        componentes_coocurrencia_municipios: connected_components(&coocurrencia_municipios),
        top_regalias: ranking_entries(&top_regalias),
        top_toneladas: ranking_entries(&top_toneladas),
    };
    export::save_summary(&summary, &format!("{}/resumen_redes.json", out_dir))?;

    Ok(())
}
