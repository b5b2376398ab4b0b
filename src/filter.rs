// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Camera filter bands.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static::lazy_static! {
    pub(crate) static ref FILTERS_COMMA_SEPARATED: String = Filter::iter().join(", ");
}

/// A named wavelength channel in which an observation is taken.
#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[strum(serialize = "u")]
    U,
    #[strum(serialize = "g")]
    G,
    #[strum(serialize = "r")]
    R,
    #[strum(serialize = "i")]
    I,
    #[strum(serialize = "z")]
    Z,
    #[strum(serialize = "y")]
    Y,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn filter_names_round_trip_through_strings() {
        for f in Filter::iter() {
            assert_eq!(Filter::from_str(&f.to_string()).unwrap(), f);
        }
        assert!(Filter::from_str("R").is_err());
        assert!(Filter::from_str("x").is_err());
        assert_eq!(FILTERS_COMMA_SEPARATED.as_str(), "u, g, r, i, z, y");
    }

    #[test]
    fn filter_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Filter::Z).unwrap(), "\"z\"");
        let f: Filter = serde_json::from_str("\"g\"").unwrap();
        assert_eq!(f, Filter::G);
    }
}
