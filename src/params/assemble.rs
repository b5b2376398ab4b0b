// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{num::NonZeroUsize, path::PathBuf};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;
use vec1::Vec1;

use super::target_maps::{TargetMapProducts, TargetMapsDocument, TargetMapsParams};
use crate::{
    config::{ParkPosition, SchedulerDriverConfig},
    io::write::{write_document, WriteError},
    scheduler::{BasisFunctionSettings, CoreScheduler, Survey, SurveyError, SurveyTopology},
    target_map::{ConfigurationError, TargetMapError},
};

pub(crate) struct AssembleParams {
    pub(crate) target_maps: TargetMapsParams,
    pub(crate) topology: SurveyTopology,
    pub(crate) park: ParkPosition,
    pub(crate) driver: SchedulerDriverConfig,
    pub(crate) basis_functions: BasisFunctionSettings,
    pub(crate) block_size: NonZeroUsize,
    pub(crate) dither: bool,
    pub(crate) ignore_obs: Option<String>,
    pub(crate) output: PathBuf,
}

impl AssembleParams {
    /// One greedy survey per filter, all in a single tier.
    pub(crate) fn make_scheduler(
        &self,
        products: &TargetMapProducts,
    ) -> Result<CoreScheduler, AssembleError> {
        let nside = self.target_maps.nside();
        let mut surveys = Vec::with_capacity(self.target_maps.fractions.len());
        for (&filter, goal_map) in products.goal_maps.iter() {
            let norm_factor = products
                .fov_norm_factor
                .get(filter)
                .ok_or(TargetMapError::from(ConfigurationError::MissingFilter(filter)))?;
            let bfs = self
                .basis_functions
                .basis_functions(filter, nside, norm_factor);
            let survey = Survey::greedy(bfs, &self.basis_functions.weights, filter, nside)?
                .block_size(self.block_size)
                .dither(self.dither)
                .ignore_obs(self.ignore_obs.clone())
                .tag_with(goal_map)?;
            debug!(
                "Survey for filter {filter}: {} basis functions",
                survey.basis_functions().len()
            );
            surveys.push(survey);
        }

        let tier = Vec1::try_from_vec(surveys).map_err(|_| SurveyError::NoSurveys)?;
        Ok(CoreScheduler::new(Vec1::new(tier), nside)?)
    }

    pub(crate) fn run(&self) -> Result<(), AssembleError> {
        let products = self.target_maps.make()?;
        let scheduler = self.make_scheduler(&products)?;
        info!(
            "Assembled a scheduler with {} survey(s) at nside {}",
            scheduler.num_surveys(),
            scheduler.nside()
        );

        let document = SchedulerConfigDocument {
            survey_topology: &self.topology,
            park: &self.park,
            driver: &self.driver,
            target_maps: TargetMapsDocument::new(&self.target_maps, &products),
            scheduler,
        };
        write_document(&document, &self.output)?;
        info!("Scheduler configuration written to {}", self.output.display());
        Ok(())
    }
}

/// Everything the scheduler driver needs to start.
#[derive(Debug, Serialize)]
struct SchedulerConfigDocument<'a> {
    survey_topology: &'a SurveyTopology,
    park: &'a ParkPosition,
    driver: &'a SchedulerDriverConfig,
    target_maps: TargetMapsDocument,
    scheduler: CoreScheduler,
}

#[derive(Error, Debug)]
pub(crate) enum AssembleError {
    #[error(transparent)]
    TargetMap(#[from] TargetMapError),

    #[error(transparent)]
    Survey(#[from] SurveyError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
