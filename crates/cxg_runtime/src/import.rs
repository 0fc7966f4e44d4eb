//! Bulk import of construction definitions.
//!
//! An import file is JSON: either an array of construction rows or an
//! object with a `constructions` array. Each row uses the field names of
//! [`Construction`], with `components` in raw list form:
//!
//! ```json
//! [
//!   {"name": "de-acordo-com", "type": "mwe", "pattern": "de acordo com",
//!    "components": ["de", "acordo", "com"]},
//!   {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}",
//!    "priority": 80, "phrasal_ce": "Subject"}
//! ]
//! ```
//!
//! Rows are validated and compiled one at a time; a bad row is reported
//! and the rest of the batch still goes in.

use std::collections::BTreeMap;
use std::path::Path;

use cxg_engine::compile;
use cxg_foundation::{
    Construction, ConstructionId, Error, ErrorContext, ErrorKind, GrammarGraph, Result,
    Vocabulary,
};
use cxg_pattern::validate_components;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// One rejected row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based row number.
    pub row: usize,
    /// Error kind name, e.g. `PatternSyntaxError`.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of an import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows added as new constructions.
    pub created: usize,
    /// Rows that replaced an existing construction of the same name.
    pub updated: usize,
    /// Rows whose name already existed, left alone.
    pub skipped: usize,
    /// Rows that failed validation or compilation.
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Returns true if every row went in.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Imports a JSON document into `graph`.
///
/// # Errors
/// Returns an `Import` error if the document is not JSON or holds no row
/// list. Row-level failures are reported in the [`ImportReport`].
pub fn import_str(
    graph: &GrammarGraph,
    base: &Vocabulary,
    json: &str,
    overwrite: bool,
) -> Result<(GrammarGraph, ImportReport)> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| Error::new(ErrorKind::Import(format!("not valid JSON: {e}"))))?;
    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(mut object) => match object.remove("constructions") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(Error::new(ErrorKind::Import(
                    "expected a 'constructions' array".to_string(),
                )));
            }
        },
        _ => {
            return Err(Error::new(ErrorKind::Import(
                "expected an array of constructions".to_string(),
            )));
        }
    };
    Ok(import_rows(graph, base, rows, overwrite))
}

/// Imports a JSON file into `graph`; see [`import_str`].
///
/// # Errors
/// Returns an `IoError` if the file cannot be read, or an `Import` error
/// carrying the file name as context.
pub fn import_file(
    graph: &GrammarGraph,
    base: &Vocabulary,
    path: impl AsRef<Path>,
    overwrite: bool,
) -> Result<(GrammarGraph, ImportReport)> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;
    import_str(graph, base, &json, overwrite)
        .map_err(|e| e.with_context(ErrorContext::new().with_source(path.display().to_string())))
}

/// Imports already-decoded rows into `graph`.
///
/// Labels declared by accepted rows are known to every row, so a row may
/// reference a CE label introduced later in the same batch. A row that
/// only compiles against labels of rejected or skipped rows is rejected in
/// turn, so the returned graph always loads.
#[must_use]
pub fn import_rows(
    graph: &GrammarGraph,
    base: &Vocabulary,
    rows: Vec<Value>,
    overwrite: bool,
) -> (GrammarGraph, ImportReport) {
    let mut rejected: BTreeMap<usize, Error> = BTreeMap::new();
    let decoded: Vec<Option<(Construction, Option<Value>)>> = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| match decode_row(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                rejected.insert(index, e);
                None
            }
        })
        .collect();

    // Every pass rejects at least one more row or commits, so this ends.
    loop {
        let vocabulary = decoded
            .iter()
            .enumerate()
            .filter(|(index, _)| !rejected.contains_key(index))
            .filter_map(|(_, row)| row.as_ref())
            .flat_map(|(c, _)| c.exposed_labels())
            .fold(graph.vocabulary(base), |v, label| v.with_ce_label(label));

        let mut next = graph.clone();
        let mut report = ImportReport::default();
        let mut origin: BTreeMap<ConstructionId, usize> = BTreeMap::new();

        for (index, row) in decoded.iter().enumerate() {
            if rejected.contains_key(&index) {
                continue;
            }
            let Some((construction, raw)) = row else {
                continue;
            };
            let outcome = checked(construction.clone(), raw.as_ref(), &vocabulary)
                .and_then(|construction| place(&next, construction, overwrite));
            match outcome {
                Ok(Placement::Created(placed, id)) => {
                    next = placed;
                    origin.insert(id, index);
                    report.created += 1;
                }
                Ok(Placement::Updated(placed, id)) => {
                    next = placed;
                    origin.insert(id, index);
                    report.updated += 1;
                }
                Ok(Placement::Skipped) => report.skipped += 1,
                Err(e) => {
                    rejected.insert(index, e);
                }
            }
        }

        let committed = next.vocabulary(base);
        let dangling: Vec<(usize, Error)> = origin
            .iter()
            .filter_map(|(id, index)| {
                let construction = next.get(*id)?;
                compile(construction, &committed).err().map(|e| (*index, e))
            })
            .collect();
        if dangling.is_empty() {
            return finish(next, report, rejected);
        }
        for (index, e) in dangling {
            debug!(row = index + 1, "row depends on a label no accepted row declares");
            rejected.insert(index, e);
        }
    }
}

fn finish(
    graph: GrammarGraph,
    mut report: ImportReport,
    rejected: BTreeMap<usize, Error>,
) -> (GrammarGraph, ImportReport) {
    for (index, e) in rejected {
        let number = index + 1;
        warn!(row = number, kind = e.kind_name(), error = %e, "import row rejected");
        report.errors.push(RowError {
            row: number,
            kind: e.kind_name().to_string(),
            message: e.to_string(),
        });
    }
    debug!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        errors = report.errors.len(),
        "import finished"
    );
    (graph, report)
}

enum Placement {
    Created(GrammarGraph, ConstructionId),
    Updated(GrammarGraph, ConstructionId),
    Skipped,
}

/// Splits the raw component list off a row and decodes the rest.
fn decode_row(row: Value) -> Result<(Construction, Option<Value>)> {
    let Value::Object(mut object) = row else {
        return Err(Error::validation(None, "row must be a JSON object"));
    };
    let components = object.remove("components").filter(|v| !v.is_null());
    object.remove("id");
    let construction: Construction = serde_json::from_value(Value::Object(object))
        .map_err(|e| Error::validation(None, format!("malformed construction row: {e}")))?;
    Ok((construction, components))
}

fn checked(
    mut construction: Construction,
    components: Option<&Value>,
    vocabulary: &Vocabulary,
) -> Result<Construction> {
    if let Some(raw) = components {
        construction.components = Some(validate_components(raw, vocabulary)?);
    }
    compile(&construction, vocabulary)?;
    Ok(construction)
}

fn place(graph: &GrammarGraph, mut construction: Construction, overwrite: bool) -> Result<Placement> {
    match graph.find_by_name(&construction.name) {
        Some(existing) if overwrite => {
            let id = existing.id;
            construction.id = id;
            Ok(Placement::Updated(graph.replace(construction)?, id))
        }
        Some(_) => Ok(Placement::Skipped),
        None => {
            let (graph, id) = graph.add(construction);
            Ok(Placement::Created(graph, id))
        }
    }
}
