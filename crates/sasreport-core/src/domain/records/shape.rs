/// Summary of a bead-model reconstruction run parsed from the run's
/// summary file.
#[derive(Debug, Clone, PartialEq)]
pub struct BeadModelRecord {
    pub prefix: String,
    pub program: String,
    pub mode: String,
    pub symmetry: String,
    pub anisometry: String,
    pub reconstructions: i64,
    pub damaver: bool,
    pub damclust: bool,
    pub refined: bool,
    pub nsd: f64,
    pub nsd_std: f64,
    pub included_models: i64,
    pub resolution: f64,
    pub resolution_err: f64,
    pub clusters: i64,
    pub representative_model: i64,
}

impl Default for BeadModelRecord {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            program: String::new(),
            mode: String::new(),
            symmetry: String::new(),
            anisometry: String::new(),
            reconstructions: -1,
            damaver: false,
            damclust: false,
            refined: false,
            nsd: -1.0,
            nsd_std: -1.0,
            included_models: -1,
            resolution: -1.0,
            resolution_err: -1.0,
            clusters: -1,
            representative_model: -1,
        }
    }
}
