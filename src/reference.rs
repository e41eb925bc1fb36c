use crate::errors::{LoadError, LoadResult};
use crate::names::NameIndex;
use schema::{FamilyRow, LearnEdge, LearnMethod, MethodId, MoveData, MoveId, Species, SpeciesId};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

pub const SPECIES_TABLE: &str = "pokemon.csv";
pub const MOVES_TABLE: &str = "moves.csv";
pub const METHODS_TABLE: &str = "learn_methods.csv";
pub const EDGES_TABLE: &str = "pokemon_moves.csv";
pub const FAMILIES_TABLE: &str = "families.csv";

/// The four indexed reference tables plus the derived species name
/// index and raw lineage rows. Built once at startup, immutable after.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub species: HashMap<SpeciesId, Species>,
    pub moves: HashMap<MoveId, MoveData>,
    pub methods: HashMap<MethodId, LearnMethod>,
    pub edges: HashMap<SpeciesId, Vec<LearnEdge>>,
    pub families: Vec<FamilyRow>,
    pub names: NameIndex,
}

impl ReferenceData {
    /// Load every reference table from `dir`. Any missing file, missing
    /// required column or malformed row aborts the whole load; there is
    /// no partial snapshot.
    pub fn load_dir(dir: &Path) -> LoadResult<ReferenceData> {
        let open = |table: &str| -> LoadResult<File> {
            let path = dir.join(table);
            File::open(&path).map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))
        };

        let species = load_species(SPECIES_TABLE, open(SPECIES_TABLE)?)?;
        let moves = load_moves(MOVES_TABLE, open(MOVES_TABLE)?)?;
        let methods = load_methods(METHODS_TABLE, open(METHODS_TABLE)?)?;
        let edges = load_edges(EDGES_TABLE, open(EDGES_TABLE)?)?;
        let families = load_families(FAMILIES_TABLE, open(FAMILIES_TABLE)?)?;

        Ok(ReferenceData::from_rows(
            species, moves, methods, edges, families,
        ))
    }

    /// Index already-parsed rows. Split out from [`load_dir`] so tests
    /// can feed in-memory tables.
    pub fn from_rows(
        species_rows: Vec<Species>,
        move_rows: Vec<MoveData>,
        method_rows: Vec<LearnMethod>,
        edge_rows: Vec<LearnEdge>,
        families: Vec<FamilyRow>,
    ) -> ReferenceData {
        let mut names = NameIndex::new();
        let mut species = HashMap::new();
        for row in species_rows {
            names.insert(&row.identifier, row.id);
            names.insert(&row.name, row.id);
            species.insert(row.id, row);
        }
        names.finalize();

        let moves: HashMap<MoveId, MoveData> = move_rows.into_iter().map(|m| (m.id, m)).collect();
        let methods: HashMap<MethodId, LearnMethod> =
            method_rows.into_iter().map(|m| (m.id, m)).collect();

        let mut edges: HashMap<SpeciesId, Vec<LearnEdge>> = HashMap::new();
        for edge in edge_rows {
            edges.entry(edge.species_id).or_default().push(edge);
        }

        debug!(
            species = species.len(),
            moves = moves.len(),
            methods = methods.len(),
            families = families.len(),
            "reference tables indexed"
        );

        ReferenceData {
            species,
            moves,
            methods,
            edges,
            families,
            names,
        }
    }
}

/// Locate a required column in the header row; tolerant of column order
/// and extra columns, fatal when the column is absent.
fn required_column(
    headers: &csv::StringRecord,
    table: &str,
    column: &'static str,
) -> LoadResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| LoadError::MissingColumn {
            table: table.to_string(),
            column,
        })
}

fn table_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn read_headers<R: io::Read>(reader: &mut csv::Reader<R>, table: &str) -> LoadResult<csv::StringRecord> {
    reader
        .headers()
        .map(Clone::clone)
        .map_err(|e| LoadError::Io(format!("{}: {}", table, e)))
}

fn malformed(table: &str, line: u64, detail: impl Into<String>) -> LoadError {
    LoadError::MalformedRow {
        table: table.to_string(),
        line,
        detail: detail.into(),
    }
}

fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'a>(record: &'a csv::StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

fn parse_num<T: std::str::FromStr>(
    table: &str,
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> LoadResult<T> {
    let value = field(record, index);
    value.parse().map_err(|_| {
        malformed(
            table,
            record_line(record),
            format!("column '{}' has non-numeric value '{}'", column, value),
        )
    })
}

/// Parse an optional numeric column; empty and `0` both mean "none".
fn parse_opt_id(
    table: &str,
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> LoadResult<Option<u32>> {
    let value = field(record, index);
    if value.is_empty() {
        return Ok(None);
    }
    let id: u32 = parse_num(table, record, index, column)?;
    Ok((id != 0).then_some(id))
}

fn parse_opt_num(
    table: &str,
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> LoadResult<Option<u8>> {
    let value = field(record, index);
    if value.is_empty() {
        return Ok(None);
    }
    parse_num(table, record, index, column).map(Some)
}

pub fn load_species<R: io::Read>(table: &str, reader: R) -> LoadResult<Vec<Species>> {
    let mut rdr = table_reader(reader);
    let headers = read_headers(&mut rdr, table)?;
    let id = required_column(&headers, table, "id")?;
    let identifier = required_column(&headers, table, "identifier")?;
    let name = required_column(&headers, table, "name")?;
    let group_id = required_column(&headers, table, "group_id")?;
    let height = required_column(&headers, table, "height")?;
    let weight = required_column(&headers, table, "weight")?;
    let evolves_from = required_column(&headers, table, "evolves_from_id")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Io(format!("{}: {}", table, e)))?;
        rows.push(Species {
            id: parse_num(table, &record, id, "id")?,
            identifier: field(&record, identifier).to_string(),
            name: field(&record, name).to_string(),
            group_id: parse_num(table, &record, group_id, "group_id")?,
            height_dm: parse_num(table, &record, height, "height")?,
            weight_hg: parse_num(table, &record, weight, "weight")?,
            evolves_from: parse_opt_id(table, &record, evolves_from, "evolves_from_id")?,
        });
    }
    Ok(rows)
}

pub fn load_moves<R: io::Read>(table: &str, reader: R) -> LoadResult<Vec<MoveData>> {
    let mut rdr = table_reader(reader);
    let headers = read_headers(&mut rdr, table)?;
    let id = required_column(&headers, table, "id")?;
    let name = required_column(&headers, table, "name")?;
    let type_id = required_column(&headers, table, "type_id")?;
    let power = required_column(&headers, table, "power")?;
    let accuracy = required_column(&headers, table, "accuracy")?;
    let pp = required_column(&headers, table, "pp")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Io(format!("{}: {}", table, e)))?;
        rows.push(MoveData {
            id: parse_num(table, &record, id, "id")?,
            name: field(&record, name).to_string(),
            type_id: parse_num(table, &record, type_id, "type_id")?,
            power: parse_opt_num(table, &record, power, "power")?,
            accuracy: parse_opt_num(table, &record, accuracy, "accuracy")?,
            pp: parse_opt_num(table, &record, pp, "pp")?.unwrap_or(0),
        });
    }
    Ok(rows)
}

pub fn load_methods<R: io::Read>(table: &str, reader: R) -> LoadResult<Vec<LearnMethod>> {
    let mut rdr = table_reader(reader);
    let headers = read_headers(&mut rdr, table)?;
    let id = required_column(&headers, table, "id")?;
    let label = required_column(&headers, table, "label")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Io(format!("{}: {}", table, e)))?;
        rows.push(LearnMethod {
            id: parse_num(table, &record, id, "id")?,
            label: field(&record, label).to_string(),
        });
    }
    Ok(rows)
}

pub fn load_edges<R: io::Read>(table: &str, reader: R) -> LoadResult<Vec<LearnEdge>> {
    let mut rdr = table_reader(reader);
    let headers = read_headers(&mut rdr, table)?;
    let species_id = required_column(&headers, table, "species_id")?;
    let move_id = required_column(&headers, table, "move_id")?;
    let method_id = required_column(&headers, table, "method_id")?;
    let level = required_column(&headers, table, "level")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Io(format!("{}: {}", table, e)))?;
        rows.push(LearnEdge {
            species_id: parse_num(table, &record, species_id, "species_id")?,
            move_id: parse_num(table, &record, move_id, "move_id")?,
            method_id: parse_num(table, &record, method_id, "method_id")?,
            level: parse_opt_num(table, &record, level, "level")?.filter(|&l| l != 0),
        });
    }
    Ok(rows)
}

pub fn load_families<R: io::Read>(table: &str, reader: R) -> LoadResult<Vec<FamilyRow>> {
    let mut rdr = table_reader(reader);
    let headers = read_headers(&mut rdr, table)?;
    let species_id = required_column(&headers, table, "species_id")?;
    let ancestor_id = required_column(&headers, table, "ancestor_id")?;
    let family_id = required_column(&headers, table, "family_id")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Io(format!("{}: {}", table, e)))?;
        rows.push(FamilyRow {
            species_id: parse_num(table, &record, species_id, "species_id")?,
            ancestor_id: parse_opt_id(table, &record, ancestor_id, "ancestor_id")?,
            family_id: parse_num(table, &record, family_id, "family_id")?,
        });
    }
    Ok(rows)
}
