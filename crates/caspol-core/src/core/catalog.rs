use crate::core::asymptotics::model::{AsymptoticModel, ModelParams};
use crate::core::reference::table::{ReferencePoint, ReferenceTable};
use phf::{Map, phf_map};

const XI_STATIC: f64 = 1.0e-6;
const XI_OPTICAL: f64 = 6.0;

const ALPHA_STATIC: f64 = 3.186000e+02;
const ALPHA_OPTICAL: f64 = 2.074813e+02;

/// Rubidium near a perfectly conducting half space (C_SR in neV·µm³, C_LR in neV·µm⁴).
pub static BUILTIN_MODELS: Map<&'static str, ModelParams> = phf_map! {
    "pec-plate" => ModelParams {
        short_threshold: 0.001,
        long_threshold: 0.02,
        c_sr: 0.0138,
        c_lr: 8.83e-5,
    },
    "pec-plate-far-field" => ModelParams {
        short_threshold: 0.001,
        long_threshold: 1.00,
        c_sr: 0.0138,
        c_lr: 1.11e-3,
    },
};

/// Rubidium evaluated at z = 0.1, 1 and 10 µm above each geometry.
pub static BUILTIN_REFERENCES: Map<&'static str, &'static [ReferencePoint]> = phf_map! {
    "PECPlate" => &PEC_PLATE,
    "coin_pec_144" => &COIN_PEC_144,
    "tetrahedron_pec_6" => &TETRAHEDRON_PEC_6,
    "tetrahedron_eps10_6" => &TETRAHEDRON_EPS10_6,
};

static PEC_PLATE: [ReferencePoint; 6] = [
    ReferencePoint::new(XI_STATIC, 0.1, ALPHA_STATIC, -7.418665e-01),
    ReferencePoint::new(XI_STATIC, 1.0, ALPHA_STATIC, -7.418665e-04),
    ReferencePoint::new(XI_STATIC, 10.0, ALPHA_STATIC, -7.418665e-07),
    ReferencePoint::new(XI_OPTICAL, 0.1, ALPHA_OPTICAL, -4.249017e-01),
    ReferencePoint::new(XI_OPTICAL, 1.0, ALPHA_OPTICAL, -2.523156e-07),
    ReferencePoint::new(XI_OPTICAL, 10.0, ALPHA_OPTICAL, -2.712012e-55),
];

static COIN_PEC_144: [ReferencePoint; 6] = [
    ReferencePoint::new(XI_STATIC, 0.1, ALPHA_STATIC, -6.313080e-01),
    ReferencePoint::new(XI_STATIC, 1.0, ALPHA_STATIC, -1.248351e-04),
    ReferencePoint::new(XI_STATIC, 10.0, ALPHA_STATIC, -2.273920e-10),
    ReferencePoint::new(XI_OPTICAL, 0.1, ALPHA_OPTICAL, -3.599895e-01),
    ReferencePoint::new(XI_OPTICAL, 1.0, ALPHA_OPTICAL, -1.923850e-07),
    ReferencePoint::new(XI_OPTICAL, 10.0, ALPHA_OPTICAL, -3.601550e-56),
];

static TETRAHEDRON_PEC_6: [ReferencePoint; 6] = [
    ReferencePoint::new(XI_STATIC, 0.1, ALPHA_STATIC, -2.029004e-01),
    ReferencePoint::new(XI_STATIC, 1.0, ALPHA_STATIC, -2.493534e-06),
    ReferencePoint::new(XI_STATIC, 10.0, ALPHA_STATIC, -3.243498e-12),
    ReferencePoint::new(XI_OPTICAL, 0.1, ALPHA_OPTICAL, -1.168001e-01),
    ReferencePoint::new(XI_OPTICAL, 1.0, ALPHA_OPTICAL, -6.200486e-09),
    ReferencePoint::new(XI_OPTICAL, 10.0, ALPHA_OPTICAL, -6.149101e-58),
];

static TETRAHEDRON_EPS10_6: [ReferencePoint; 3] = [
    ReferencePoint::new(XI_OPTICAL, 0.1, ALPHA_OPTICAL, -7.722056e-02),
    ReferencePoint::new(XI_OPTICAL, 1.0, ALPHA_OPTICAL, -3.197261e-09),
    ReferencePoint::new(XI_OPTICAL, 10.0, ALPHA_OPTICAL, -3.089228e-58),
];

pub fn builtin_model(name: &str) -> Option<AsymptoticModel> {
    BUILTIN_MODELS.get(name.trim()).map(|params| {
        AsymptoticModel::new(*params).expect("built-in model parameters are valid")
    })
}

pub fn builtin_model_names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_MODELS.keys().copied().collect();
    names.sort_unstable();
    names
}

impl ReferenceTable {
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (geometry, points) in BUILTIN_REFERENCES.entries() {
            for point in points.iter() {
                table
                    .insert(geometry, *point)
                    .expect("catalog points never conflict within a geometry");
            }
        }
        table
    }
}
