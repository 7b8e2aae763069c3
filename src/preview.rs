use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    catalog::FormatCatalog,
    cli::PreviewArgs,
    compiler::CastRequest,
    data::{Value, coerce_value},
    io_utils,
    plan::ImportPlan,
    table,
};

pub const NULL_DISPLAY: &str = "NULL";

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let plan = ImportPlan::load(&args.plan)?;
    let catalog = match &args.catalog {
        Some(path) => FormatCatalog::load(path)?,
        None => plan.resolve_catalog()?,
    };
    let requests = plan.requests()?;

    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let indices = plan
        .columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header == &column.name)
                .ok_or_else(|| anyhow!("Column '{}' not found in {:?}", column.name, args.input))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        if idx >= args.rows {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)?;
        rows.push(preview_row(&requests, &indices, &decoded, &catalog)?);
    }

    let output_headers = plan
        .columns
        .iter()
        .map(|column| column.output_name().to_string())
        .collect::<Vec<_>>();
    table::print_table(&output_headers, &rows);
    info!("Previewed {} row(s) from {:?}", rows.len(), args.input);
    Ok(())
}

/// Coerces the planned cells of one raw row into display strings.
pub fn preview_row(
    requests: &[CastRequest],
    indices: &[usize],
    raw: &[String],
    catalog: &FormatCatalog,
) -> Result<Vec<String>> {
    requests
        .iter()
        .zip(indices)
        .map(|(request, &index)| {
            let cell = raw.get(index).map(String::as_str).unwrap_or_default();
            let coerced = coerce_value(request, catalog, cell)?;
            Ok(coerced
                .as_ref()
                .map(Value::as_display)
                .unwrap_or_else(|| NULL_DISPLAY.to_string()))
        })
        .collect()
}
