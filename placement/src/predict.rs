//! Scores a single candidate against a fitted model and suggests what to work on.

use std::{io, path::Path};

use machine_learning::arch::activations::Sigmoid;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlacementErr, Result},
    model::ModelParams,
    persistence,
};

/// A student to score. Same fields as a generated record, minus the label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub cgpa: f64,
    pub internships: u32,
    pub projects: u32,
    pub skill_level: u32,
    pub communication_score: u32,
}

impl Candidate {
    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PlacementErr::InvalidInput(msg));

        if !(0. ..=10.).contains(&self.cgpa) {
            return invalid(format!("cgpa must lie in [0, 10], got {}", self.cgpa));
        }

        for (name, value) in [
            ("skill_level", self.skill_level),
            ("communication_score", self.communication_score),
        ] {
            if !(1..=10).contains(&value) {
                return invalid(format!("{name} must lie in [1, 10], got {value}"));
            }
        }

        Ok(())
    }

    fn features(&self) -> [f64; 5] {
        [
            self.cgpa,
            self.internships as f64,
            self.projects as f64,
            self.skill_level as f64,
            self.communication_score as f64,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_probability(p: f64) -> Self {
        if p > 0.8 {
            Self::High
        } else if p > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Complete,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub title: &'static str,
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub placed: bool,
    pub probability: f64,
    pub confidence: Confidence,
    pub recommendations: Vec<&'static str>,
    pub roadmap: Vec<Milestone>,
}

/// A goal per feature: the milestone, the advice while it's pending and whether it's met.
struct Goal {
    title: &'static str,
    advice: &'static str,
    met: fn(&Candidate) -> bool,
}

const GOALS: [Goal; 5] = [
    Goal {
        title: "Academic Excellence (CGPA 8+)",
        advice: "Improve CGPA to 8+.",
        met: |c| c.cgpa >= 8.,
    },
    Goal {
        title: "Industry Internship",
        advice: "Get at least one internship.",
        met: |c| c.internships >= 1,
    },
    Goal {
        title: "Project Portfolio (3+ Projects)",
        advice: "Build more projects.",
        met: |c| c.projects >= 3,
    },
    Goal {
        title: "Advanced Technical Upskilling",
        advice: "Upskill technical strengths.",
        met: |c| c.skill_level >= 7,
    },
    Goal {
        title: "Soft Skills & Mock Interviews",
        advice: "Improve communication skills.",
        met: |c| c.communication_score >= 7,
    },
];

/// Weights of the hand tuned score used while there's no trained model, in `FEATURES` order.
const FALLBACK_WEIGHTS: [f64; 5] = [1.5, 2.0, 1.5, 1.0, 0.8];
/// The fallback score of a candidate that's certain to be placed.
const FALLBACK_SCALE: f64 = 45.;

#[derive(Debug, Clone)]
enum Scorer {
    Model { params: ModelParams, sigmoid: Sigmoid },
    Heuristic,
}

/// Applies a fitted `ModelParams` to candidates, or a fixed heuristic when there's none.
#[derive(Debug, Clone)]
pub struct Predictor {
    scorer: Scorer,
}

impl Predictor {
    /// # Errors
    /// Returns `PlacementErr::InvalidInput` if the model doesn't have the expected shape.
    pub fn from_params(params: ModelParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            scorer: Scorer::Model {
                params,
                sigmoid: Sigmoid::new(),
            },
        })
    }

    /// Loads the model document written by a training run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_params(persistence::read_model(path)?)
    }

    /// Scores candidates with a weighted sum of their features instead of a trained model.
    pub fn fallback() -> Self {
        Self {
            scorer: Scorer::Heuristic,
        }
    }

    /// Like `load`, but falls back to the heuristic if nothing has been trained yet.
    ///
    /// # Errors
    /// Returns a `PlacementErr` if the model file exists but can't be read or parsed.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match Self::load(path) {
            Err(PlacementErr::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::warn!("no model at {}, using the fallback scorer", path.display());
                Ok(Self::fallback())
            }
            res => res,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.scorer, Scorer::Heuristic)
    }

    /// The probability of placement.
    pub fn probability(&self, candidate: &Candidate) -> Result<f64> {
        candidate.validate()?;
        let features = candidate.features();

        let p = match &self.scorer {
            Scorer::Model { params, sigmoid } => sigmoid.f(params.logit(&features)),
            Scorer::Heuristic => {
                let score: f64 = FALLBACK_WEIGHTS
                    .iter()
                    .zip(&features)
                    .map(|(w, x)| w * x)
                    .sum();
                (score / FALLBACK_SCALE).clamp(0., 1.)
            }
        };

        Ok(p)
    }

    /// The probability above which a candidate counts as placed.
    fn threshold(&self) -> f64 {
        match self.scorer {
            Scorer::Model { .. } => 0.5,
            Scorer::Heuristic => 0.6,
        }
    }

    /// Scores a candidate and lays out the roadmap of goals it still has to meet.
    ///
    /// # Errors
    /// Returns `PlacementErr::InvalidInput` if the candidate is out of range.
    pub fn predict(&self, candidate: &Candidate) -> Result<Prediction> {
        let probability = self.probability(candidate)?;

        let mut recommendations = Vec::new();
        let roadmap = GOALS
            .iter()
            .map(|goal| {
                let status = if (goal.met)(candidate) {
                    MilestoneStatus::Complete
                } else {
                    recommendations.push(goal.advice);
                    MilestoneStatus::Pending
                };

                Milestone {
                    title: goal.title,
                    status,
                }
            })
            .collect();

        Ok(Prediction {
            placed: probability > self.threshold(),
            probability,
            confidence: Confidence::from_probability(probability),
            recommendations,
            roadmap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor(bias: f64) -> Predictor {
        let model = ModelParams::from_flat(&[1., 1., 1., 0., 0., bias], 0.8).unwrap();
        Predictor::from_params(model).unwrap()
    }

    fn strong() -> Candidate {
        Candidate {
            cgpa: 9.1,
            internships: 2,
            projects: 4,
            skill_level: 8,
            communication_score: 9,
        }
    }

    #[test]
    fn probability_is_sigmoid_of_logit() {
        let candidate = Candidate {
            cgpa: 2.,
            internships: 1,
            projects: 0,
            skill_level: 5,
            communication_score: 5,
        };

        let p = predictor(-3.).probability(&candidate).unwrap();
        assert_eq!(p, 0.5);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(Confidence::from_probability(0.95), Confidence::High);
        assert_eq!(Confidence::from_probability(0.8), Confidence::Medium);
        assert_eq!(Confidence::from_probability(0.41), Confidence::Medium);
        assert_eq!(Confidence::from_probability(0.4), Confidence::Low);
        assert_eq!(Confidence::from_probability(0.), Confidence::Low);
    }

    #[test]
    fn strong_candidate_has_nothing_pending() {
        let prediction = predictor(0.).predict(&strong()).unwrap();

        assert!(prediction.placed);
        assert_eq!(prediction.confidence, Confidence::High);
        assert!(prediction.recommendations.is_empty());
        assert_eq!(prediction.roadmap.len(), 5);
        assert!(
            prediction
                .roadmap
                .iter()
                .all(|m| m.status == MilestoneStatus::Complete)
        );
    }

    #[test]
    fn weak_spots_become_recommendations() {
        let candidate = Candidate {
            internships: 0,
            communication_score: 6,
            ..strong()
        };

        let prediction = predictor(-100.).predict(&candidate).unwrap();

        assert!(!prediction.placed);
        assert_eq!(prediction.confidence, Confidence::Low);
        assert_eq!(
            prediction.recommendations,
            ["Get at least one internship.", "Improve communication skills."]
        );

        let pending: Vec<_> = prediction
            .roadmap
            .iter()
            .filter(|m| m.status == MilestoneStatus::Pending)
            .map(|m| m.title)
            .collect();
        assert_eq!(
            pending,
            ["Industry Internship", "Soft Skills & Mock Interviews"]
        );
    }

    #[test]
    fn thresholds_are_inclusive_on_the_met_side() {
        let candidate = Candidate {
            cgpa: 8.,
            internships: 1,
            projects: 3,
            skill_level: 7,
            communication_score: 7,
        };

        let prediction = predictor(0.).predict(&candidate).unwrap();
        assert!(prediction.recommendations.is_empty());
    }

    #[test]
    fn rejects_out_of_range_candidates() {
        let p = predictor(0.);

        let bad_cgpa = Candidate {
            cgpa: 10.5,
            ..strong()
        };
        let res = p.predict(&bad_cgpa);
        assert!(matches!(res, Err(PlacementErr::InvalidInput(_))));

        let bad_skill = Candidate {
            skill_level: 0,
            ..strong()
        };
        assert!(p.predict(&bad_skill).is_err());
    }

    #[test]
    fn fallback_scores_with_fixed_weights() {
        let predictor = Predictor::fallback();
        assert!(predictor.is_fallback());

        let edge = Candidate {
            cgpa: 8.,
            internships: 1,
            projects: 2,
            skill_level: 6,
            communication_score: 5,
        };
        let prediction = predictor.predict(&edge).unwrap();
        assert_eq!(prediction.probability, 0.6);
        assert!(!prediction.placed);
        assert_eq!(prediction.confidence, Confidence::Medium);
        assert_eq!(
            prediction.recommendations,
            [
                "Build more projects.",
                "Upskill technical strengths.",
                "Improve communication skills."
            ]
        );

        let best = Candidate {
            cgpa: 10.,
            internships: 3,
            projects: 5,
            skill_level: 10,
            communication_score: 10,
        };
        let prediction = predictor.predict(&best).unwrap();
        assert_eq!(prediction.probability, 1.);
        assert!(prediction.placed);
    }

    #[test]
    fn missing_model_falls_back() {
        let tmp = tempfile::tempdir().unwrap();

        let predictor = Predictor::load_or_fallback(tmp.path().join("model.json")).unwrap();
        assert!(predictor.is_fallback());
        assert!(predictor.predict(&strong()).unwrap().placed);
    }

    #[test]
    fn broken_model_is_still_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();

        let res = Predictor::load_or_fallback(&path);
        assert!(matches!(res, Err(PlacementErr::Json(_))));
    }

    #[test]
    fn saved_model_is_preferred() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        let model = ModelParams::from_flat(&[1., 1., 1., 0., 0., -100.], 0.8).unwrap();
        persistence::write_model(&path, &model).unwrap();

        let predictor = Predictor::load_or_fallback(&path).unwrap();
        assert!(!predictor.is_fallback());
        assert!(!predictor.predict(&strong()).unwrap().placed);
    }
}
