use crate::core::io::table::{TableError, parse_table};
use crate::core::io::traits::OutputFile;
use crate::core::models::dataset::Dataset;
use crate::core::models::row::{AveragedRow, RowShape, SpectralRow};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const BY_XI_EXTENSION: &str = "byXi";
pub const AVERAGED_EXTENSION: &str = "out";

/// Per-frequency table: one row per evaluation point and imaginary frequency.
pub struct ByXiFile;

impl OutputFile for ByXiFile {
    type Row = SpectralRow;
    const COLUMNS: &'static [&'static str] = &["x", "y", "z", "xi", "polarizability", "U_CP"];
}

/// Frequency-integrated (or Matsubara-summed) table: one row per evaluation point.
pub struct AveragedFile;

impl OutputFile for AveragedFile {
    type Row = AveragedRow;
    const COLUMNS: &'static [&'static str] = &["x", "y", "z", "U_CP"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    ByXi,
    Averaged,
}

impl OutputKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            BY_XI_EXTENSION => Some(Self::ByXi),
            AVERAGED_EXTENSION => Some(Self::Averaged),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::ByXi => BY_XI_EXTENSION,
            Self::Averaged => AVERAGED_EXTENSION,
        }
    }

    pub fn shape(self) -> RowShape {
        match self {
            Self::ByXi => RowShape::Spectral,
            Self::Averaged => RowShape::Averaged,
        }
    }

    /// File name the tool writes for a geometry identifier.
    pub fn file_name(self, geometry_id: &str) -> String {
        format!("{}.{}", geometry_id, self.extension())
    }
}

/// Reads a table in the layout its extension names, or in `fallback` when the name is not
/// one the tool writes.
pub fn read_dataset(path: &Path, fallback: OutputKind) -> Result<Dataset, TableError> {
    let kind = OutputKind::from_path(path).unwrap_or(fallback);
    let mut reader = BufReader::new(File::open(path)?);
    let raw = parse_table(&mut reader)?;
    Ok(Dataset::from_raw(raw, kind.shape())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn spectral(z: f64, xi: f64, alpha: f64, u: f64) -> SpectralRow {
        SpectralRow {
            line: 0,
            position: Point3::new(0.0, 0.0, z),
            frequency: xi,
            polarizability: alpha,
            potential: u,
        }
    }

    #[test]
    fn by_xi_file_reads_tool_formatted_output() {
        let content = "\
# scuff-caspol run on host
# columns: 1,2,3 x,y,z  4 xi  5 alpha  6 U
0.000000e+00 0.000000e+00 1.000000e-01 1.000000e-06 3.186000e+02 -2.029004e-01
0.000000e+00 0.000000e+00 1.000000e-01 6.000000e+00 2.074813e+02 -1.168001e-01
";
        let rows = ByXiFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].frequency, 6.0);
        assert_eq!(rows[1].potential, -1.168001e-1);
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn averaged_file_rejects_spectral_rows() {
        let content = "0 0 0.1 6.0 207.4813 -0.1168001\n";
        let err = AveragedFile::read_from(&mut Cursor::new(content)).unwrap_err();
        assert!(matches!(
            err,
            TableError::Shape {
                line: 1,
                expected: RowShape::Averaged,
                found: 6
            }
        ));
    }

    #[test]
    fn written_file_reads_back_with_header_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(OutputKind::ByXi.file_name("tetrahedron_pec_6"));
        let rows = vec![
            spectral(0.1, 6.0, 2.074813e2, -1.168001e-1),
            spectral(10.0, 6.0, 2.074813e2, -6.149101e-58),
        ];
        ByXiFile::write_to_path(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# 1:x 2:y 3:z 4:xi"));

        let read = ByXiFile::read_from_path(&path).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].potential, -6.149101e-58);
        assert_eq!(read[1].line, 3);
    }

    #[test]
    fn output_kind_is_recognised_from_extension() {
        assert_eq!(
            OutputKind::from_path(Path::new("work/PECPlate.byXi")),
            Some(OutputKind::ByXi)
        );
        assert_eq!(
            OutputKind::from_path(Path::new("thinplate_pec.out")),
            Some(OutputKind::Averaged)
        );
        assert_eq!(OutputKind::from_path(Path::new("dist.txt")), None);
        assert_eq!(OutputKind::Averaged.file_name("PECPlate"), "PECPlate.out");
    }

    #[test]
    fn dataset_layout_follows_the_extension() {
        let dir = tempdir().unwrap();
        let by_xi = dir.path().join("PECPlate.byXi");
        std::fs::write(&by_xi, "0 0 0.1 6.0 207.4813 -0.4249017\n").unwrap();
        let dataset = read_dataset(&by_xi, OutputKind::Averaged).unwrap();
        assert_eq!(dataset.shape(), RowShape::Spectral);
        assert_eq!(dataset.len(), 1);

        let unnamed = dir.path().join("plate.dat");
        std::fs::write(&unnamed, "0 0 0.001 -1.38e7\n").unwrap();
        let dataset = read_dataset(&unnamed, OutputKind::Averaged).unwrap();
        assert_eq!(dataset.as_averaged().unwrap()[0].potential, -1.38e7);
    }

    #[test]
    fn dataset_with_wrong_width_for_its_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("PECPlate.out");
        std::fs::write(&path, "0 0 0.1 6.0 207.4813 -0.4249017\n").unwrap();
        assert!(matches!(
            read_dataset(&path, OutputKind::ByXi),
            Err(TableError::Shape { line: 1, found: 6, .. })
        ));
    }
}
