// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters that are ready to be used.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and validated and are ready to be used directly.

mod assemble;
mod target_maps;

pub(crate) use assemble::{AssembleError, AssembleParams};
pub(crate) use target_maps::{TargetMapsError, TargetMapsParams, YearParityParams};
