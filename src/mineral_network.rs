use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::IntoNodeReferences;
use petgraph::Undirected;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Error type for loading the cleaned extraction dataset.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("problem reading from path: {source}")]
    Open { source: csv::Error },
    #[error("problem with record: {source}")]
    Record { source: csv::Error },
}

/// One row of the cleaned dataset: a municipality extracting a natural
/// resource, with the royalties it paid and the tonnes it produced.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Registro {
    pub municipio: String,
    pub recurso_natural: String,
    pub valor_contraprestacion: f64,
    pub cantidad_produccion: f64,
}

/// A node is either a municipality (carrying its royalty and production
/// figures) or a natural resource.
#[derive(Debug, Clone, PartialEq)]
pub enum MineralNode {
    Municipio {
        nombre: String,
        regalias: f64,
        toneladas: f64,
    },
    Recurso {
        nombre: String,
    },
}

impl MineralNode {
    pub fn nombre(&self) -> &str {
        match self {
            MineralNode::Municipio { nombre, .. } => nombre,
            MineralNode::Recurso { nombre } => nombre,
        }
    }

    pub fn is_municipio(&self) -> bool {
        matches!(self, MineralNode::Municipio { .. })
    }
}

pub type BipartiteGraph = Graph<MineralNode, (), Undirected>;

/// Which municipality attribute a ranking is computed over.
#[derive(Debug, Clone, Copy)]
pub enum RankAttribute {
    Regalias,
    Toneladas,
}

pub fn load_data<P: AsRef<Path>>(path: P) -> Result<Vec<Registro>, DataError> {
    let reader = csv::ReaderBuilder::new()
        .from_path(path)
        .map_err(|source| DataError::Open { source })?;

    collect_registros(reader)
}

fn collect_registros<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Registro>, DataError> {
    let mut registros = Vec::new();
    for result in reader.deserialize() {
        let registro: Registro = result.map_err(|source| DataError::Record { source })?;
        registros.push(registro);
    }
    Ok(registros)
}

/// Build the municipality/resource bipartite graph. One node per distinct
/// municipality, one per distinct resource, one edge per record; duplicate
/// municipality-resource pairs collapse to a single edge.
///
/// When a municipality shows up in several rows, each later row overwrites
/// the stored royalty and production figures (the last row wins).
pub fn create_bipartite_graph(registros: &[Registro]) -> BipartiteGraph {
    let mut graph = Graph::new_undirected();
    let mut municipios: HashMap<String, NodeIndex> = HashMap::new();
    let mut recursos: HashMap<String, NodeIndex> = HashMap::new();

    for registro in registros {
        let municipio = match municipios.get(&registro.municipio) {
            Some(&index) => {
                if let Some(MineralNode::Municipio {
                    regalias,
                    toneladas,
                    ..
                }) = graph.node_weight_mut(index)
                {
                    *regalias = registro.valor_contraprestacion;
                    *toneladas = registro.cantidad_produccion;
                }
                index
            }
            None => {
                let index = graph.add_node(MineralNode::Municipio {
                    nombre: registro.municipio.clone(),
                    regalias: registro.valor_contraprestacion,
                    toneladas: registro.cantidad_produccion,
                });
                municipios.insert(registro.municipio.clone(), index);
                index
            }
        };

        let recurso = *recursos
            .entry(registro.recurso_natural.clone())
            .or_insert_with(|| {
                graph.add_node(MineralNode::Recurso {
                    nombre: registro.recurso_natural.clone(),
                })
            });

        graph.update_edge(municipio, recurso, ());
    }

    graph
}

/// Count (municipality, resource) nodes in the bipartite graph.
pub fn node_kind_counts(graph: &BipartiteGraph) -> (usize, usize) {
    let municipios = graph
        .node_references()
        .filter(|(_, node)| node.is_municipio())
        .count();
    (municipios, graph.node_count() - municipios)
}

/// Top `n` municipalities by the chosen attribute, descending. The sort is
/// stable, so ties keep the order in which the nodes entered the graph.
pub fn top_municipalities(
    graph: &BipartiteGraph,
    attribute: RankAttribute,
    n: usize,
) -> Vec<(String, f64)> {
    let mut ranking: Vec<(String, f64)> = graph
        .node_references()
        .filter_map(|(_, node)| match node {
            MineralNode::Municipio {
                nombre,
                regalias,
                toneladas,
            } => {
                let value = match attribute {
                    RankAttribute::Regalias => *regalias,
                    RankAttribute::Toneladas => *toneladas,
                };
                Some((nombre.clone(), value))
            }
            MineralNode::Recurso { .. } => None,
        })
        .collect();

    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking.truncate(n);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registro(municipio: &str, recurso: &str, regalias: f64, toneladas: f64) -> Registro {
        Registro {
            municipio: municipio.to_string(),
            recurso_natural: recurso.to_string(),
            valor_contraprestacion: regalias,
            cantidad_produccion: toneladas,
        }
    }

    fn sample_registros() -> Vec<Registro> {
        vec![
            registro("Segovia", "Oro", 500.0, 12.0),
            registro("Montelibano", "Niquel", 900.0, 40.0),
            registro("Segovia", "Plata", 150.0, 3.0),
            registro("Zipaquira", "Sal", 80.0, 25.0),
            registro("Montelibano", "Niquel", 910.0, 41.0),
        ]
    }

    #[test]
    fn test_bipartite_counts() {
        let graph = create_bipartite_graph(&sample_registros());

        // 3 municipalities + 4 resources; the duplicated Montelibano-Niquel
        // pair collapses to one edge.
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(node_kind_counts(&graph), (3, 4));
    }

    #[test]
    fn test_last_row_wins() {
        let graph = create_bipartite_graph(&sample_registros());

        let montelibano = graph
            .node_references()
            .find_map(|(_, node)| match node {
                MineralNode::Municipio {
                    nombre,
                    regalias,
                    toneladas,
                } if nombre == "Montelibano" => Some((*regalias, *toneladas)),
                _ => None,
            })
            .unwrap();

        assert_eq!(montelibano, (910.0, 41.0));
    }

    #[test]
    fn test_top_municipalities_descending() {
        let graph = create_bipartite_graph(&sample_registros());

        let top = top_municipalities(&graph, RankAttribute::Regalias, 10);
        assert_eq!(
            top,
            vec![
                ("Montelibano".to_string(), 910.0),
                ("Segovia".to_string(), 150.0),
                ("Zipaquira".to_string(), 80.0),
            ]
        );

        let top2 = top_municipalities(&graph, RankAttribute::Toneladas, 2);
        assert_eq!(
            top2,
            vec![
                ("Montelibano".to_string(), 41.0),
                ("Zipaquira".to_string(), 25.0),
            ]
        );
    }

    #[test]
    fn test_top_municipalities_tie_keeps_insertion_order() {
        let registros = vec![
            registro("Nobsa", "Caliza", 100.0, 5.0),
            registro("Sogamoso", "Caliza", 100.0, 5.0),
            registro("Topaga", "Carbon", 300.0, 9.0),
        ];
        let graph = create_bipartite_graph(&registros);

        let top = top_municipalities(&graph, RankAttribute::Regalias, 10);
        assert_eq!(top[0].0, "Topaga");
        assert_eq!(top[1].0, "Nobsa");
        assert_eq!(top[2].0, "Sogamoso");
    }

    #[test]
    fn test_collect_registros() {
        let data = "\
municipio,recurso_natural,valor_contraprestacion,cantidad_produccion
Segovia,Oro,500.5,12.25
Zipaquira,Sal,80.0,25.0
";
        let reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let registros = collect_registros(reader).unwrap();

        assert_eq!(registros.len(), 2);
        assert_eq!(registros[0], registro("Segovia", "Oro", 500.5, 12.25));
    }

    #[test]
    fn test_collect_registros_rejects_bad_record() {
        let data = "\
municipio,recurso_natural,valor_contraprestacion,cantidad_produccion
Segovia,Oro,not-a-number,12.25
";
        let reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        assert!(matches!(
            collect_registros(reader),
            Err(DataError::Record { .. })
        ));
    }
}
