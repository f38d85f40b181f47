//! Synthetic student table and its placement labels.

use machine_learning::dataset::Dataset;
use ndarray::{Array1, Zip};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{
    configs::GeneratorConfig,
    error::{PlacementErr, Result},
};

/// Column names in table order, the label goes last.
pub const FEATURES: [&str; 5] = [
    "cgpa",
    "internships",
    "projects",
    "skill_level",
    "communication_score",
];
pub const LABEL: &str = "placed";

/// One student. Field order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub cgpa: f64,
    pub internships: u32,
    pub projects: u32,
    pub skill_level: u32,
    pub communication_score: u32,
    pub placed: u8,
}

impl StudentRecord {
    /// The features as floats, in `FEATURES` order.
    pub fn features(&self) -> [f64; 5] {
        [
            self.cgpa,
            self.internships as f64,
            self.projects as f64,
            self.skill_level as f64,
            self.communication_score as f64,
        ]
    }
}

/// The noiseless placement score of a student.
pub fn placement_score(features: &[f64; 5]) -> f64 {
    let [cgpa, internships, projects, skill, communication] = *features;

    15. * (cgpa - 6.) + 10. * internships + 5. * projects + 2. * skill + 2. * communication
}

/// The generated table, immutable once drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementData {
    records: Vec<StudentRecord>,
}

impl PlacementData {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The fraction of placed students.
    pub fn positive_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.;
        }

        let placed = self.records.iter().filter(|r| r.placed == 1).count();
        placed as f64 / self.records.len() as f64
    }

    /// Lays the table out as five feature columns followed by the label.
    pub fn to_dataset(&self) -> Result<Dataset> {
        let data = self
            .records
            .iter()
            .flat_map(|r| {
                let [a, b, c, d, e] = r.features();
                [a, b, c, d, e, r.placed as f64]
            })
            .collect();

        Ok(Dataset::new(data, FEATURES.len(), 1)?)
    }
}

fn invalid(what: &str, e: impl std::fmt::Display) -> PlacementErr {
    PlacementErr::InvalidConfig(format!("bad {what} distribution: {e}"))
}

/// Draws a table of `config.n_samples` students and labels them.
///
/// Every column is drawn in full before the next one, in table order, followed by the noise, so
/// the same seed always yields the same table.
///
/// # Arguments
/// * `config` - Sample count, noise and threshold.
/// * `rng` - The random number generator, usually seeded from `config.seed`.
///
/// # Errors
/// Returns `PlacementErr::InvalidConfig` if the noise deviation is negative or not finite.
pub fn generate<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Result<PlacementData> {
    let n = config.n_samples.get();
    let noise_std = config.noise_std;
    if !(noise_std.is_finite() && noise_std >= 0.) {
        return Err(PlacementErr::InvalidConfig(format!(
            "noise_std must be finite and non negative, got {noise_std}"
        )));
    }

    let uniform = Uniform::new(6., 10.).map_err(|e| invalid("cgpa", e))?;
    let cgpa = Array1::<f64>::random_using(n, uniform, rng);
    let internships = draw_counts(n, 0, 4, rng)?;
    let projects = draw_counts(n, 0, 6, rng)?;
    let skill_level = draw_counts(n, 1, 11, rng)?;
    let communication_score = draw_counts(n, 1, 11, rng)?;

    let normal = Normal::new(0., noise_std).map_err(|e| invalid("noise", e))?;
    let noise = Array1::<f64>::random_using(n, normal, rng);

    let mut records = Vec::with_capacity(n);
    Zip::from(&cgpa)
        .and(&internships)
        .and(&projects)
        .and(&skill_level)
        .and(&communication_score)
        .and(&noise)
        .for_each(|&cgpa, &internships, &projects, &skill_level, &communication_score, &noise| {
            let mut record = StudentRecord {
                cgpa,
                internships,
                projects,
                skill_level,
                communication_score,
                placed: 0,
            };

            let score = placement_score(&record.features()) + noise;
            record.placed = u8::from(score > config.threshold);
            records.push(record);
        });

    let data = PlacementData::new(records);
    log::info!(
        "generated {} students, {:.1}% placed",
        data.len(),
        100. * data.positive_rate()
    );

    Ok(data)
}

/// Draws `n` integers uniformly from `[low, high)`.
fn draw_counts<R>(n: usize, low: u32, high: u32, rng: &mut R) -> Result<Array1<u32>>
where
    R: Rng + ?Sized,
{
    let uniform = Uniform::new(low, high).map_err(|e| invalid("count", e))?;
    Ok(Array1::random_using(n, uniform, rng))
}
