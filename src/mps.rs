// Reader for linear programs stored in (free-format) MPS files.
//
// Fields are separated by whitespace, so names may not contain spaces.
// Only continuous models are accepted: integer markers and integer bound
// types are rejected, and RANGES are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::Error;
use crate::problem::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
    End,
}

#[derive(Debug, Clone, Copy)]
enum RowRef {
    Objective,
    Free,
    Constraint(usize),
}

#[derive(Default)]
struct MpsBuilder {
    name: Option<String>,
    objective_row: Option<String>,
    rows: HashMap<String, RowRef>,
    row_names: Vec<String>,
    kinds: Vec<ConstraintType>,
    rhs: Vec<f64>,
    columns: HashMap<String, usize>,
    column_names: Vec<String>,
    objective: Vec<f64>,
    // (row, column, value)
    entries: Vec<(usize, usize, f64)>,
    limits: Vec<(f64, f64)>,
    warned_ranges: bool,
}

fn number(line: usize, token: &str) -> Result<f64, Error> {
    token
        .parse::<f64>()
        .map_err(|_| Error::parse(line, format!("invalid number {:?}", token)))
}

// Splits `[set] name value [name value]` records, where the set name is
// optional.
fn pairs<'t>(line: usize, fields: &[&'t str]) -> Result<Vec<(&'t str, &'t str)>, Error> {
    let fields = if fields.len() % 2 == 1 { &fields[1..] } else { fields };
    if fields.is_empty() {
        return Err(Error::parse(line, "expected a row name and a value"));
    }
    Ok(fields.chunks(2).map(|c| (c[0], c[1])).collect())
}

impl MpsBuilder {
    fn header(&mut self, line: usize, fields: &[&str]) -> Result<Section, Error> {
        let section = match fields[0] {
            "NAME" => {
                self.name = fields.get(1).map(|s| s.to_string());
                Section::Preamble
            },
            "ROWS" => Section::Rows,
            "COLUMNS" => Section::Columns,
            "RHS" => Section::Rhs,
            "RANGES" => Section::Ranges,
            "BOUNDS" => Section::Bounds,
            "ENDATA" => Section::End,
            other => return Err(Error::parse(line, format!("unknown section {:?}", other))),
        };
        Ok(section)
    }

    fn row(&mut self, line: usize, fields: &[&str]) -> Result<(), Error> {
        if fields.len() != 2 {
            return Err(Error::parse(line, "expected a row type and a row name"));
        }
        let name = fields[1].to_string();
        if self.rows.contains_key(&name) {
            return Err(Error::parse(line, format!("duplicate row {:?}", name)));
        }
        let kind = match fields[0] {
            "N" if self.objective_row.is_none() => {
                self.objective_row = Some(name.clone());
                self.rows.insert(name, RowRef::Objective);
                return Ok(());
            },
            "N" => {
                warn!("line {}: ignoring extra objective row {:?}", line, name);
                self.rows.insert(name, RowRef::Free);
                return Ok(());
            },
            "L" => ConstraintType::Le,
            "G" => ConstraintType::Ge,
            "E" => ConstraintType::Eq,
            other => return Err(Error::parse(line, format!("unknown row type {:?}", other))),
        };
        self.rows.insert(name.clone(), RowRef::Constraint(self.kinds.len()));
        self.row_names.push(name);
        self.kinds.push(kind);
        self.rhs.push(0.0);
        Ok(())
    }

    fn lookup_row(&self, line: usize, name: &str) -> Result<RowRef, Error> {
        self.rows
            .get(name)
            .cloned()
            .ok_or_else(|| Error::parse(line, format!("unknown row {:?}", name)))
    }

    fn lookup_column(&self, line: usize, name: &str) -> Result<usize, Error> {
        self.columns
            .get(name)
            .cloned()
            .ok_or_else(|| Error::parse(line, format!("unknown column {:?}", name)))
    }

    fn column(&mut self, line: usize, fields: &[&str]) -> Result<(), Error> {
        if fields.iter().any(|f| *f == "'MARKER'") {
            return Err(Error::parse(line, "integer markers are not supported"));
        }
        if fields.len() != 3 && fields.len() != 5 {
            return Err(Error::parse(line, "expected a column name and one or two entries"));
        }
        let j = match self.columns.get(fields[0]) {
            Some(&j) => j,
            None => {
                let j = self.column_names.len();
                self.columns.insert(fields[0].to_string(), j);
                self.column_names.push(fields[0].to_string());
                self.objective.push(0.0);
                self.limits.push((0.0, f64::INFINITY));
                j
            },
        };
        for (row, value) in pairs(line, &fields[1..])? {
            let value = number(line, value)?;
            match self.lookup_row(line, row)? {
                RowRef::Objective => self.objective[j] = value,
                RowRef::Free => {},
                RowRef::Constraint(i) => self.entries.push((i, j, value)),
            }
        }
        Ok(())
    }

    fn rhs(&mut self, line: usize, fields: &[&str]) -> Result<(), Error> {
        for (row, value) in pairs(line, fields)? {
            let value = number(line, value)?;
            match self.lookup_row(line, row)? {
                RowRef::Constraint(i) => self.rhs[i] = value,
                RowRef::Objective | RowRef::Free => {
                    warn!("line {}: ignoring right-hand side of objective row {:?}", line, row)
                },
            }
        }
        Ok(())
    }

    fn bound(&mut self, line: usize, fields: &[&str]) -> Result<(), Error> {
        let kind = fields[0];
        let takes_value = match kind {
            "UP" | "LO" | "FX" => true,
            "FR" | "MI" | "PL" => false,
            "BV" | "LI" | "UI" | "SC" => {
                return Err(Error::parse(line, format!("integer bound {} is not supported", kind)))
            },
            other => return Err(Error::parse(line, format!("unknown bound type {:?}", other))),
        };
        // Type, optional set name, column, optional value.
        let rest = &fields[1..];
        let (column, value) = match (takes_value, rest.len()) {
            (true, 3) => (rest[1], Some(number(line, rest[2])?)),
            (true, 2) => (rest[0], Some(number(line, rest[1])?)),
            (false, 2) => (rest[1], None),
            (false, 1) => (rest[0], None),
            _ => return Err(Error::parse(line, format!("malformed {} bound", kind))),
        };
        let j = self.lookup_column(line, column)?;
        let limits = &mut self.limits[j];
        match (kind, value) {
            ("UP", Some(v)) => limits.1 = v,
            ("LO", Some(v)) => limits.0 = v,
            ("FX", Some(v)) => *limits = (v, v),
            ("FR", None) => *limits = (f64::NEG_INFINITY, f64::INFINITY),
            ("MI", None) => limits.0 = f64::NEG_INFINITY,
            ("PL", None) => limits.1 = f64::INFINITY,
            _ => return Err(Error::parse(line, format!("malformed {} bound", kind))),
        }
        Ok(())
    }

    fn finish(self) -> Result<Model, Error> {
        if self.objective_row.is_none() {
            return Err(Error::parse(0, "no objective row"));
        }
        let n = self.column_names.len();
        let mut constraints: Vec<LinearConstraint> = self
            .kinds
            .iter()
            .zip(&self.rhs)
            .map(|(&kind, &rhs)| LinearConstraint::new(n).value(kind, rhs))
            .collect();
        for &(i, j, value) in &self.entries {
            constraints[i].coefficients[j] += value;
        }

        let default = |&(lb, ub): &(f64, f64)| lb == 0.0 && ub == f64::INFINITY;
        let bounds = if self.limits.iter().all(default) {
            None
        } else {
            let mut bounds = Vec::with_capacity(n);
            for (j, &(lb, ub)) in self.limits.iter().enumerate() {
                let bound = VariableBound::from_limits(lb, ub).ok_or_else(|| {
                    Error::parse(
                        0,
                        format!("column {:?} has an upper bound but no lower bound", self.column_names[j]),
                    )
                })?;
                bounds.push(bound);
            }
            Some(bounds)
        };

        debug!(
            "mps model {:?}: {} rows, {} columns, {} nonzeros",
            self.name,
            constraints.len(),
            n,
            self.entries.len()
        );
        Ok(Model {
            name: self.name,
            objective: self.objective,
            constraints,
            bounds,
            row_names: self.row_names,
            column_names: self.column_names,
        })
    }
}

/// Parses the text of an MPS file. Every column defaults to `x >= 0`.
pub fn parse_mps(text: &str) -> Result<Model, Error> {
    let mut builder = MpsBuilder::default();
    let mut section = Section::Preamble;
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() || raw.starts_with('*') {
            continue;
        }
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if !raw.starts_with(char::is_whitespace) {
            section = builder.header(line, &fields)?;
            if section == Section::End {
                break;
            }
            continue;
        }
        match section {
            Section::Preamble => return Err(Error::parse(line, "data outside of a section")),
            Section::Rows => builder.row(line, &fields)?,
            Section::Columns => builder.column(line, &fields)?,
            Section::Rhs => builder.rhs(line, &fields)?,
            Section::Ranges => {
                if !builder.warned_ranges {
                    warn!("line {}: RANGES are not supported and are ignored", line);
                    builder.warned_ranges = true;
                }
            },
            Section::Bounds => builder.bound(line, &fields)?,
            Section::End => break,
        }
    }
    builder.finish()
}

pub fn read_mps<P: AsRef<Path>>(path: P) -> Result<Model, Error> {
    let text = fs::read_to_string(path)?;
    parse_mps(&text)
}

impl Model {
    pub fn from_mps_str(text: &str) -> Result<Model, Error> {
        parse_mps(text)
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Model, Error> {
        parse_mps(s)
    }
}
