use petgraph_graphml::GraphMl;
use serde::Serialize;
use std::fs;
use std::io;

use crate::cooccurrence::CooccurrenceGraph;
use crate::mineral_network::{BipartiteGraph, MineralNode};

/// Serialize the bipartite graph to GraphML. Municipality nodes carry their
/// royalty and production figures; both sides carry `tipo` and the bipartite
/// set marker.
pub fn save_bipartite_graphml(graph: &BipartiteGraph, path: &str) -> io::Result<()> {
    let graphml = GraphMl::new(graph)
        .pretty_print(true)
        .export_node_weights(Box::new(|node: &MineralNode| match node {
            MineralNode::Municipio {
                nombre,
                regalias,
                toneladas,
            } => vec![
                ("nombre".into(), nombre.clone().into()),
                ("tipo".into(), "municipio".into()),
                ("bipartite".into(), "0".into()),
                ("regalias".into(), regalias.to_string().into()),
                ("toneladas".into(), toneladas.to_string().into()),
            ],
            MineralNode::Recurso { nombre } => vec![
                ("nombre".into(), nombre.clone().into()),
                ("tipo".into(), "recurso".into()),
                ("bipartite".into(), "1".into()),
            ],
        }));

    fs::write(path, graphml.to_string())
}

/// Serialize a co-occurrence graph to GraphML with its edge weights.
pub fn save_cooccurrence_graphml(graph: &CooccurrenceGraph, path: &str) -> io::Result<()> {
    let graphml = GraphMl::new(graph)
        .pretty_print(true)
        .export_node_weights(Box::new(|nombre: &String| {
            vec![("nombre".into(), nombre.clone().into())]
        }))
        .export_edge_weights(Box::new(|weight: &u32| {
            vec![("weight".into(), weight.to_string().into())]
        }));

    fs::write(path, graphml.to_string())
}

#[derive(Debug, Serialize)]
pub struct RankingEntry {
    pub municipio: String,
    pub valor: f64,
}

/// Headline numbers for the run, written next to the exported graphs.
#[derive(Debug, Serialize)]
pub struct NetworkSummary {
    pub registros: usize,
    pub municipios: usize,
    pub recursos: usize,
    pub aristas_bipartita: usize,
    pub componentes_coocurrencia_recursos: usize,
    pub componentes_coocurrencia_municipios: usize,
    pub top_regalias: Vec<RankingEntry>,
    pub top_toneladas: Vec<RankingEntry>,
}

pub fn ranking_entries(ranking: &[(String, f64)]) -> Vec<RankingEntry> {
    ranking
        .iter()
        .map(|(municipio, valor)| RankingEntry {
            municipio: municipio.clone(),
            valor: *valor,
        })
        .collect()
}

pub fn save_summary(summary: &NetworkSummary, path: &str) -> io::Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooccurrence::cooccurrence_graph;
    use crate::mineral_network::{create_bipartite_graph, Registro};

    fn registros() -> Vec<Registro> {
        vec![
            Registro {
                municipio: "Segovia".to_string(),
                recurso_natural: "Oro".to_string(),
                valor_contraprestacion: 500.0,
                cantidad_produccion: 12.5,
            },
            Registro {
                municipio: "Segovia".to_string(),
                recurso_natural: "Plata".to_string(),
                valor_contraprestacion: 150.0,
                cantidad_produccion: 3.0,
            },
        ]
    }

    #[test]
    fn test_bipartite_graphml_attributes() {
        let graph = create_bipartite_graph(&registros());
        let path = std::env::temp_dir().join("mineria_test_red_bipartita.graphml");

        save_bipartite_graphml(&graph, path.to_str().unwrap()).unwrap();
        let graphml = fs::read_to_string(&path).unwrap();

        assert!(graphml.contains("graphml"));
        assert!(graphml.contains("Segovia"));
        assert!(graphml.contains("regalias"));
        assert!(graphml.contains("500"));
        assert!(graphml.contains("municipio"));
        assert!(graphml.contains("recurso"));
    }

    #[test]
    fn test_cooccurrence_graphml_edge_weight() {
        let graph = cooccurrence_graph(
            &registros(),
            |r| r.municipio.as_str(),
            |r| r.recurso_natural.as_str(),
        );
        let path = std::env::temp_dir().join("mineria_test_coocurrencia.graphml");

        save_cooccurrence_graphml(&graph, path.to_str().unwrap()).unwrap();
        let graphml = fs::read_to_string(&path).unwrap();

        assert!(graphml.contains("weight"));
        assert!(graphml.contains("<edge"));
        assert!(graphml.contains("Oro"));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = NetworkSummary {
            registros: 2,
            municipios: 1,
            recursos: 2,
            aristas_bipartita: 2,
            componentes_coocurrencia_recursos: 1,
            componentes_coocurrencia_municipios: 0,
            top_regalias: ranking_entries(&[("Segovia".to_string(), 500.0)]),
            top_toneladas: ranking_entries(&[("Segovia".to_string(), 12.5)]),
        };

        let json = serde_json::to_string_pretty(&summary).unwrap();
        assert!(json.contains("\"registros\": 2"));
        assert!(json.contains("Segovia"));
        assert!(json.contains("top_regalias"));
    }
}
