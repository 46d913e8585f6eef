use crate::domain::records::metadata::MetadataRecord;

/// Indirect Fourier transform algorithms with report support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionMethod {
    Gnom,
    Bift,
}

impl DistributionMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            DistributionMethod::Gnom => "GNOM",
            DistributionMethod::Bift => "BIFT",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "GNOM" => Some(DistributionMethod::Gnom),
            "BIFT" => Some(DistributionMethod::Bift),
            _ => None,
        }
    }
}

/// Outcome of the optional shape-ambiguity assessment.
///
/// The assessment can fail or be skipped without invalidating the
/// distribution itself, so absence is a first-class state rather than a
/// sentinel value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Ambiguity {
    Computed {
        score: f64,
        categories: i64,
        interpretation: String,
    },
    #[default]
    NotComputed,
}

impl Ambiguity {
    pub fn from_outcome<E>(outcome: Result<(f64, i64, String), E>) -> Self {
        match outcome {
            Ok((score, categories, interpretation)) => Ambiguity::Computed {
                score,
                categories,
                interpretation,
            },
            Err(_) => Ambiguity::NotComputed,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Ambiguity::Computed { .. })
    }
}

/// A real-space distance distribution `P(r)` and the fit it came from.
///
/// `p` and `p_err` are stored normalized by `I(0)`. Method-specific scalars
/// (`dmax_err` for one algorithm, `total_estimate`/`quality` for the other)
/// stay at their defaults for the method that does not produce them.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRecord {
    pub filename: String,
    pub r: Vec<f64>,
    pub p: Vec<f64>,
    pub p_err: Vec<f64>,
    pub q: Vec<f64>,
    pub i: Vec<f64>,
    pub i_err: Vec<f64>,
    pub i_fit: Vec<f64>,
    pub q_extrap: Vec<f64>,
    pub i_extrap: Vec<f64>,
    pub dmax: f64,
    pub rg: f64,
    pub i0: f64,
    pub rg_err: f64,
    pub i0_err: f64,
    pub chi_sq: f64,
    pub method: DistributionMethod,
    pub dmax_err: f64,
    pub total_estimate: f64,
    pub quality: String,
    pub ambiguity: Ambiguity,
    pub metadata: MetadataRecord,
}

impl DistributionRecord {
    pub fn label(&self) -> &str {
        self.metadata.label_or(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::{Ambiguity, DistributionMethod};

    #[test]
    fn method_labels_round_trip() {
        assert_eq!(
            DistributionMethod::parse("GNOM"),
            Some(DistributionMethod::Gnom)
        );
        assert_eq!(
            DistributionMethod::parse("BIFT"),
            Some(DistributionMethod::Bift)
        );
        assert_eq!(DistributionMethod::parse("DATGNOM"), None);
        assert_eq!(DistributionMethod::Gnom.as_str(), "GNOM");
    }

    #[test]
    fn failed_assessment_maps_to_not_computed() {
        let failed: Result<(f64, i64, String), &str> = Err("no executable");
        assert_eq!(Ambiguity::from_outcome(failed), Ambiguity::NotComputed);

        let ok: Result<(f64, i64, String), &str> =
            Ok((1.5, 12, "Potentially ambiguous".to_string()));
        assert!(Ambiguity::from_outcome(ok).is_computed());
    }
}
