use super::row::{AveragedRow, RowShape, ShapeMismatch, SpectralRow, TableRow};

/// One non-comment line of a table, before any shape is imposed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<f64>,
}

/// Shape-agnostic parse result, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

/// Conversion failure carrying the offending line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowShapeError {
    pub line: usize,
    pub mismatch: ShapeMismatch,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows<R: TableRow>(self) -> Result<Vec<R>, RowShapeError> {
        self.rows
            .into_iter()
            .map(|raw| {
                R::from_fields(raw.line, &raw.fields).map_err(|mismatch| RowShapeError {
                    line: raw.line,
                    mismatch,
                })
            })
            .collect()
    }
}

/// A parsed output file with its record layout made explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Averaged(Vec<AveragedRow>),
    Spectral(Vec<SpectralRow>),
}

impl Dataset {
    pub fn from_raw(raw: RawTable, shape: RowShape) -> Result<Self, RowShapeError> {
        match shape {
            RowShape::Averaged => raw.into_rows().map(Self::Averaged),
            RowShape::Spectral => raw.into_rows().map(Self::Spectral),
        }
    }

    pub fn shape(&self) -> RowShape {
        match self {
            Self::Averaged(_) => RowShape::Averaged,
            Self::Spectral(_) => RowShape::Spectral,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Averaged(rows) => rows.len(),
            Self::Spectral(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_averaged(&self) -> Option<&[AveragedRow]> {
        match self {
            Self::Averaged(rows) => Some(rows),
            Self::Spectral(_) => None,
        }
    }

    pub fn as_spectral(&self) -> Option<&[SpectralRow]> {
        match self {
            Self::Spectral(rows) => Some(rows),
            Self::Averaged(_) => None,
        }
    }
}
