// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;
use indexmap::IndexMap;

use fbs_config::{
    footprint::{RegionBounds, RegionFractions},
    normalize, split_year_parity,
    target_map::TargetMapBuilder,
    Filter,
};

fn region_masks(c: &mut Criterion) {
    c.bench_function("region masks, nside 64", |b| {
        b.iter(|| TargetMapBuilder::with_bounds(64, RegionBounds::default()).unwrap())
    });
}

fn target_maps(c: &mut Criterion) {
    let builder = TargetMapBuilder::new(64).unwrap().full_map(true);
    let mut fractions = IndexMap::new();
    for filter in [Filter::U, Filter::G, Filter::R, Filter::I, Filter::Z, Filter::Y] {
        fractions.insert(filter, RegionFractions::default());
    }

    c.bench_function("goal maps for six filters, nside 64", |b| {
        b.iter(|| builder.build_filter_goal_maps(&fractions).unwrap())
    });

    let set = builder
        .build_filter_goal_maps(&fractions)
        .unwrap()
        .target_set();
    c.bench_function("normalise six filters, nside 64", |b| {
        b.iter(|| normalize(&set).unwrap())
    });

    let reference = set.get(Filter::R).unwrap();
    c.bench_function("year parity for six filters, nside 64", |b| {
        b.iter(|| split_year_parity(reference, &set, 1.75, 0.25).unwrap())
    });
}

criterion_group!(benches, region_masks, target_maps);
criterion_main!(benches);
