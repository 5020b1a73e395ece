use polars::prelude::*;
use std::fs::File;

const RAW_PATH: &str = "datos/raw/Volúmen de explotación de minerales en Colombia.csv";
const CLEAN_PATH: &str = "datos/processed/mineria_limpia.csv";

// Monetary and production figures arrive as text like "$ 1,234,567.89".
fn parse_cifra(val: &str) -> f64 {
    val.replace('$', "")
        .replace(',', "")
        .trim()
        .parse::<f64>()
        .unwrap_or_default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let df = CsvReader::from_path(RAW_PATH)?
        .infer_schema(None)
        .finish()?;

    let df = df.select(&[
        "municipio",
        "recurso_natural",
        "valor_contraprestacion",
        "cantidad_produccion",
    ])?;

    // Rows missing either side of the municipality-resource relation are
    // useless for the graphs.
    let mut df = df
        .lazy()
        .filter(
            col("municipio")
                .is_not_null()
                .and(col("recurso_natural").is_not_null()),
        )
        .collect()?;

    let mut regalias = df
        .column("valor_contraprestacion")?
        .utf8()?
        .into_iter()
        .map(|opt_val| opt_val.map(parse_cifra))
        .collect::<Float64Chunked>();
    regalias.rename("valor_contraprestacion");
    df.with_column(regalias)?;

    let mut toneladas = df
        .column("cantidad_produccion")?
        .utf8()?
        .into_iter()
        .map(|opt_val| opt_val.map(parse_cifra))
        .collect::<Float64Chunked>();
    toneladas.rename("cantidad_produccion");
    df.with_column(toneladas)?;

    // The raw export pads names with stray whitespace.
    let mut municipios = df
        .column("municipio")?
        .utf8()?
        .into_iter()
        .map(|opt_val| opt_val.map(|val| val.trim()))
        .collect::<Utf8Chunked>();
    municipios.rename("municipio");
    df.with_column(municipios)?;

    let mut recursos = df
        .column("recurso_natural")?
        .utf8()?
        .into_iter()
        .map(|opt_val| opt_val.map(|val| val.trim()))
        .collect::<Utf8Chunked>();
    recursos.rename("recurso_natural");
    df.with_column(recursos)?;

    // print the first 5 rows
    println!("{:?}", df.head(Some(5)));

    std::fs::create_dir_all("datos/processed")?;
    let mut file = File::create(CLEAN_PATH)?;
    CsvWriter::new(&mut file).finish(&mut df)?;

    Ok(())
}
