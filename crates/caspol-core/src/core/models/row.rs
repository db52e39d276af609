use nalgebra::Point3;
use std::fmt;

/// The two record layouts the simulation tool writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowShape {
    /// `x y z potential`, written to frequency-averaged `.out` files.
    Averaged,
    /// `x y z frequency polarizability potential`, written to per-frequency `.byXi` files.
    Spectral,
}

impl RowShape {
    pub fn field_count(self) -> usize {
        match self {
            Self::Averaged => 4,
            Self::Spectral => 6,
        }
    }
}

impl fmt::Display for RowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Averaged => write!(f, "averaged (4 fields)"),
            Self::Spectral => write!(f, "spectral (6 fields)"),
        }
    }
}

/// Returned when a line does not carry the field count its shape requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub expected: RowShape,
    pub found: usize,
}

/// A typed record built from the raw floats of one table line.
pub trait TableRow: Sized {
    const SHAPE: RowShape;

    fn from_fields(line: usize, fields: &[f64]) -> Result<Self, ShapeMismatch>;

    fn to_fields(&self) -> Vec<f64>;

    fn line(&self) -> usize;

    fn position(&self) -> Point3<f64>;

    fn potential(&self) -> f64;

    /// Separation from the surface, read off the `z` coordinate of the evaluation point.
    #[inline]
    fn distance(&self) -> f64 {
        self.position().z
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedRow {
    pub line: usize,
    pub position: Point3<f64>,
    pub potential: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralRow {
    pub line: usize,
    pub position: Point3<f64>,
    pub frequency: f64,
    pub polarizability: f64,
    pub potential: f64,
}

fn check_width(fields: &[f64], expected: RowShape) -> Result<(), ShapeMismatch> {
    if fields.len() == expected.field_count() {
        Ok(())
    } else {
        Err(ShapeMismatch {
            expected,
            found: fields.len(),
        })
    }
}

impl TableRow for AveragedRow {
    const SHAPE: RowShape = RowShape::Averaged;

    fn from_fields(line: usize, fields: &[f64]) -> Result<Self, ShapeMismatch> {
        check_width(fields, Self::SHAPE)?;
        Ok(Self {
            line,
            position: Point3::new(fields[0], fields[1], fields[2]),
            potential: fields[3],
        })
    }

    fn to_fields(&self) -> Vec<f64> {
        vec![
            self.position.x,
            self.position.y,
            self.position.z,
            self.potential,
        ]
    }

    fn line(&self) -> usize {
        self.line
    }

    fn position(&self) -> Point3<f64> {
        self.position
    }

    fn potential(&self) -> f64 {
        self.potential
    }
}

impl TableRow for SpectralRow {
    const SHAPE: RowShape = RowShape::Spectral;

    fn from_fields(line: usize, fields: &[f64]) -> Result<Self, ShapeMismatch> {
        check_width(fields, Self::SHAPE)?;
        Ok(Self {
            line,
            position: Point3::new(fields[0], fields[1], fields[2]),
            frequency: fields[3],
            polarizability: fields[4],
            potential: fields[5],
        })
    }

    fn to_fields(&self) -> Vec<f64> {
        vec![
            self.position.x,
            self.position.y,
            self.position.z,
            self.frequency,
            self.polarizability,
            self.potential,
        ]
    }

    fn line(&self) -> usize {
        self.line
    }

    fn position(&self) -> Point3<f64> {
        self.position
    }

    fn potential(&self) -> f64 {
        self.potential
    }
}
