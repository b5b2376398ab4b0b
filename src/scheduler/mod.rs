// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Descriptions of the objects handed to the external scheduling engine.
//!
//! Nothing here evaluates a basis function or picks an observation; these
//! types only record which basis functions, surveys and tiers the engine
//! should build, and with which parameters.

mod basis_function;
mod survey;
#[cfg(test)]
mod tests;

pub use basis_function::{BasisFunction, BasisFunctionSettings, WeightedBasisFunction};
pub use survey::{Survey, SurveyError};

use serde::{Deserialize, Serialize};
use vec1::Vec1;

use crate::healpix::Nside;

/// Ordered tiers of surveys. Surveys in an earlier tier take precedence over
/// those in later tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreScheduler {
    surveys: Vec1<Vec1<Survey>>,
    nside: Nside,
}

impl CoreScheduler {
    /// Every survey must be at the scheduler's resolution.
    pub fn new(surveys: Vec1<Vec1<Survey>>, nside: Nside) -> Result<CoreScheduler, SurveyError> {
        for survey in surveys.iter().flatten() {
            if survey.nside() != nside {
                return Err(SurveyError::NsideMismatch {
                    scheduler: nside,
                    survey: survey.nside(),
                });
            }
        }
        Ok(CoreScheduler { surveys, nside })
    }

    pub fn tiers(&self) -> &[Vec1<Survey>] {
        self.surveys.as_slice()
    }

    pub fn nside(&self) -> Nside {
        self.nside
    }

    pub fn num_surveys(&self) -> usize {
        self.surveys.iter().map(|tier| tier.len()).sum()
    }
}

/// The proposals the observatory control system is told about. The counts
/// are derived from the name lists and can't disagree with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyTopology {
    num_general_props: usize,
    general_propos: Vec<String>,
    num_seq_props: usize,
    sequence_propos: Vec<String>,
}

impl SurveyTopology {
    pub fn new(general_propos: Vec<String>, sequence_propos: Vec<String>) -> SurveyTopology {
        SurveyTopology {
            num_general_props: general_propos.len(),
            general_propos,
            num_seq_props: sequence_propos.len(),
            sequence_propos,
        }
    }

    pub fn general_proposals(&self) -> &[String] {
        &self.general_propos
    }

    pub fn sequence_proposals(&self) -> &[String] {
        &self.sequence_propos
    }

    pub fn num_general_props(&self) -> usize {
        self.num_general_props
    }

    pub fn num_seq_props(&self) -> usize {
        self.num_seq_props
    }
}

impl<'de> Deserialize<'de> for SurveyTopology {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Names {
            #[serde(default)]
            general_propos: Vec<String>,
            #[serde(default)]
            sequence_propos: Vec<String>,
        }

        let Names {
            general_propos,
            sequence_propos,
        } = Names::deserialize(deserializer)?;
        Ok(SurveyTopology::new(general_propos, sequence_propos))
    }
}
