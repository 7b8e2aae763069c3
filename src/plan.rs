//! YAML import plans.
//!
//! An [`ImportPlan`] lists the columns of one raw text source together with
//! the semantic type each should load as. The plan is configuration only:
//! compiling it yields SQL text, nothing is executed.
//!
//! ```yaml
//! source: staging.raw_orders
//! target: orders
//! date_format: mdy
//! columns:
//!   - name: Order Date
//!     datatype: Date
//!     name_mapping: ordered_on
//!   - name: Tags
//!     datatype: MultiSelect
//!     options: [gift, express]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{DEFAULT_DATE_FORMAT, FormatCatalog},
    compiler::{CastCompiler, CastRequest},
    error::CoerceError,
    formatter::ColumnFormatter,
    sql,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnPlan {
    pub name: String,
    /// Semantic type name; parsed when the plan is compiled so an unsupported
    /// type is reported against its column.
    pub datatype: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "name_mapping"
    )]
    pub rename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ColumnPlan {
    pub fn output_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    pub fn request(&self, default_date_format: &str) -> Result<CastRequest, CoerceError> {
        let mut request = CastRequest::named(&self.datatype, sql::quote_ident(&self.name))?
            .with_date_format(
                self.date_format
                    .as_deref()
                    .unwrap_or(default_date_format)
                    .to_string(),
            )
            .with_options(self.options.iter().cloned());
        request.limit = self.limit;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledColumn {
    pub name: String,
    pub output_name: String,
    pub expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPlan {
    /// Table name or parenthesized sub-query, emitted verbatim after `FROM`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default = "ImportPlan::default_date_format")]
    pub date_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    pub columns: Vec<ColumnPlan>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ImportPlan {
    pub fn default_date_format() -> String {
        DEFAULT_DATE_FORMAT.to_string()
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let plan: ImportPlan = serde_yaml::from_str(contents).context("Parsing import plan YAML")?;
        anyhow::ensure!(
            !plan.columns.is_empty(),
            "Import plan must list at least one column"
        );
        if let Some((name, _)) = plan
            .columns
            .iter()
            .map(|c| c.output_name())
            .counts()
            .into_iter()
            .find(|(_, count)| *count > 1)
        {
            anyhow::bail!("Output column '{name}' appears more than once in the import plan");
        }
        Ok(plan)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading import plan {path:?}"))?;
        let mut plan =
            Self::from_yaml_str(&contents).with_context(|| format!("Loading plan {path:?}"))?;
        plan.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Loaded import plan {:?} ({} column(s))", path, plan.columns.len());
        Ok(plan)
    }

    /// Catalog referenced by the plan, resolved relative to the plan file, or
    /// the built-in catalog when none is referenced.
    pub fn resolve_catalog(&self) -> Result<FormatCatalog> {
        match &self.catalog {
            Some(path) => {
                let resolved = match &self.base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                FormatCatalog::load(&resolved)
            }
            None => Ok(FormatCatalog::builtin()),
        }
    }

    pub fn requests(&self) -> Result<Vec<CastRequest>> {
        self.columns
            .iter()
            .map(|column| {
                column
                    .request(&self.date_format)
                    .with_context(|| format!("Column '{}'", column.name))
            })
            .collect()
    }

    pub fn compile(&self, compiler: &CastCompiler) -> Result<Vec<CompiledColumn>> {
        self.columns
            .iter()
            .map(|column| {
                let request = column
                    .request(&self.date_format)
                    .with_context(|| format!("Column '{}'", column.name))?;
                let expression = compiler
                    .compile(&request)
                    .with_context(|| format!("Compiling column '{}'", column.name))?;
                Ok(CompiledColumn {
                    name: column.name.clone(),
                    output_name: column.output_name().to_string(),
                    expression,
                })
            })
            .collect()
    }

    pub fn select_statement(&self, compiled: &[CompiledColumn]) -> String {
        let projection = compiled
            .iter()
            .map(|column| {
                format!(
                    "  {} AS {}",
                    column.expression,
                    sql::quote_ident(&column.output_name)
                )
            })
            .join(",\n");
        format!("SELECT\n{projection}\nFROM {}", self.source)
    }

    /// `INSERT INTO target (...) SELECT ...` when a target is configured,
    /// otherwise the bare `SELECT`.
    pub fn insert_statement(&self, compiled: &[CompiledColumn]) -> String {
        let select = self.select_statement(compiled);
        match &self.target {
            Some(target) => {
                let columns = compiled
                    .iter()
                    .map(|column| sql::quote_ident(&column.output_name))
                    .join(", ");
                format!("INSERT INTO {target} ({columns})\n{select}")
            }
            None => select,
        }
    }

    /// Export projection over the typed table (the target, or the source when
    /// no target is configured).
    pub fn format_statement(&self, formatter: &ColumnFormatter) -> String {
        let projection = self
            .columns
            .iter()
            .map(|column| {
                let output = column.output_name();
                format!(
                    "  {} AS {}",
                    formatter.format_named(output, &column.datatype),
                    sql::quote_ident(output)
                )
            })
            .join(",\n");
        let table = self.target.as_deref().unwrap_or(&self.source);
        format!("SELECT\n{projection}\nFROM {table}")
    }
}
