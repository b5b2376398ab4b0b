// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::num::NonZeroUsize;

use vec1::vec1;

use super::*;
use crate::{
    constants::UNSEEN,
    filter::Filter,
    footprint::{Region, RegionFractions},
    target_map::TargetMapBuilder,
};

fn nside32() -> Nside {
    Nside::new(32).unwrap()
}

fn standard_survey(filter: Filter) -> Survey {
    let settings = BasisFunctionSettings::default();
    let bfs = settings.basis_functions(filter, nside32(), 0.5);
    Survey::greedy(bfs, &settings.weights, filter, nside32()).unwrap()
}

#[test]
fn test_standard_basis_functions() {
    let settings = BasisFunctionSettings::default();
    let bfs = settings.basis_functions(Filter::R, nside32(), 0.25);
    let names: Vec<_> = bfs.iter().map(|bf| bf.name()).collect();
    assert_eq!(
        names,
        [
            "hour_angle_bonus",
            "target_map",
            "meridian_stripe",
            "aggressive_slewtime",
            "avoid_fast_revisits"
        ]
    );
    assert_eq!(settings.weights, [1.0, 0.1, 1.0, 1.0, 1.0]);

    assert_eq!(bfs[0], BasisFunction::HourAngleBonus { max_hourangle: 4.0 });
    assert_eq!(
        bfs[1],
        BasisFunction::TargetMap {
            filter: Filter::R,
            nside: nside32(),
            norm_factor: 0.25,
            out_of_bounds_val: UNSEEN,
        }
    );
    assert_eq!(
        bfs[2],
        BasisFunction::MeridianStripe {
            nside: nside32(),
            width: vec![20.0],
            weight: vec![1.0],
            height: vec![80.0],
            zenith_pad: vec![28.0],
        }
    );
    assert_eq!(
        bfs[3],
        BasisFunction::AggressiveSlewtime {
            filter: Filter::R,
            nside: nside32(),
            order: 6.0,
            hard_max: 120.0,
        }
    );
    assert_eq!(bfs[4].filter(), None);
    assert_eq!(bfs[4].nside(), Some(nside32()));
}

#[test]
fn test_basis_function_serde_is_tagged() {
    let bf = BasisFunction::HourAngleBonus { max_hourangle: 4.0 };
    let json = serde_json::to_value(&bf).unwrap();
    assert_eq!(json["type"], "hour_angle_bonus");
    assert_eq!(json["max_hourangle"], 4.0);

    let bf: BasisFunction = serde_json::from_str(
        r#"{"type": "avoid_fast_revisits", "nside": 16, "gap_min": 30.0}"#,
    )
    .unwrap();
    assert_eq!(
        bf,
        BasisFunction::AvoidFastRevisits {
            filter: None,
            nside: Nside::new(16).unwrap(),
            gap_min: 30.0
        }
    );

    // An nside that isn't a power of two is rejected.
    let result: Result<BasisFunction, _> =
        serde_json::from_str(r#"{"type": "avoid_fast_revisits", "nside": 12, "gap_min": 30.0}"#);
    assert!(result.is_err());
}

#[test]
fn test_greedy_survey_defaults() {
    let survey = standard_survey(Filter::G);
    assert_eq!(survey.filter(), Filter::G);
    assert_eq!(survey.basis_functions().len(), 5);
    assert_eq!(survey.basis_functions()[1].weight, 0.1);
    assert_eq!(survey.get_block_size().get(), 1);
    assert!(survey.is_dithered());
    assert_eq!(survey.get_ignore_obs(), Some("DD"));
    assert!(survey.tag_map().is_none());
    assert!(survey.tag_names().is_empty());

    let survey = survey
        .block_size(NonZeroUsize::new(3).unwrap())
        .dither(false)
        .ignore_obs(None);
    assert_eq!(survey.get_block_size().get(), 3);
    assert!(!survey.is_dithered());
    assert_eq!(survey.get_ignore_obs(), None);
}

#[test]
fn test_greedy_survey_validation() {
    let settings = BasisFunctionSettings::default();
    let bfs = settings.basis_functions(Filter::R, nside32(), 1.0);

    let result = Survey::greedy(bfs.clone(), &[1.0, 1.0], Filter::R, nside32());
    assert_eq!(
        result,
        Err(SurveyError::WeightCountMismatch {
            num_basis_functions: 5,
            num_weights: 2
        })
    );

    let result = Survey::greedy(vec![], &[], Filter::R, nside32());
    assert_eq!(result, Err(SurveyError::NoBasisFunctions));

    let result = Survey::greedy(
        bfs.clone(),
        &[1.0, -0.1, 1.0, 1.0, 1.0],
        Filter::R,
        nside32(),
    );
    assert!(matches!(
        result,
        Err(SurveyError::InvalidWeight {
            basis_function: "target_map",
            ..
        })
    ));

    let result = Survey::greedy(bfs, &settings.weights, Filter::R, Nside::new(64).unwrap());
    assert!(matches!(result, Err(SurveyError::NsideMismatch { .. })));
}

#[test]
fn test_survey_tags_come_from_the_goal_map() {
    let builder = TargetMapBuilder::new(32).unwrap();
    let goal = builder.build_goal_map(&RegionFractions::default()).unwrap();
    let survey = standard_survey(Filter::R).tag_with(&goal).unwrap();

    let tag_map = survey.tag_map().unwrap();
    assert_eq!(tag_map.len(), 12_288);
    assert_eq!(tag_map, goal.region_ids.as_slice().unwrap());
    assert!(survey
        .tag_names()
        .contains(&(Region::WideFastDeep.id(), Region::WideFastDeep)));
    // Every tag that appears in the map is named.
    for &id in tag_map.iter().filter(|&&id| id != 0) {
        assert!(survey.tag_names().iter().any(|&(tag, _)| tag == id));
    }

    let other = TargetMapBuilder::new(16)
        .unwrap()
        .build_goal_map(&RegionFractions::default())
        .unwrap();
    assert!(standard_survey(Filter::R).tag_with(&other).is_err());
}

#[test]
fn test_core_scheduler() {
    let scheduler = CoreScheduler::new(
        vec1![vec1![standard_survey(Filter::R), standard_survey(Filter::I)]],
        nside32(),
    )
    .unwrap();
    assert_eq!(scheduler.tiers().len(), 1);
    assert_eq!(scheduler.num_surveys(), 2);
    assert_eq!(scheduler.nside(), nside32());

    let result = CoreScheduler::new(
        vec1![vec1![standard_survey(Filter::R)]],
        Nside::new(64).unwrap(),
    );
    assert!(matches!(result, Err(SurveyError::NsideMismatch { .. })));
}

#[test]
fn test_survey_topology_counts() {
    let topology = SurveyTopology::new(vec!["TMA_test".to_string()], vec![]);
    assert_eq!(topology.num_general_props(), 1);
    assert_eq!(topology.num_seq_props(), 0);

    let json = serde_json::to_value(&topology).unwrap();
    assert_eq!(json["num_general_props"], 1);
    assert_eq!(json["general_propos"][0], "TMA_test");

    // Counts in the input are ignored; they are always derived.
    let topology: SurveyTopology = serde_json::from_str(
        r#"{"num_general_props": 5, "general_propos": ["a", "b"], "sequence_propos": ["c"]}"#,
    )
    .unwrap();
    assert_eq!(topology.num_general_props(), 2);
    assert_eq!(topology.num_seq_props(), 1);
}
